//! Interactive player: the single task that owns the session.
//!
//! Stdin lines, probe results, backend replies and a clock tick all arrive
//! on one `select!` loop, so the session is never touched concurrently.
//! Backend work runs on spawned tasks and reports back as a [`Completion`].

use crate::input::{self, Action, FilterChange, Listing, HELP};
use crate::media::{ProbeOutput, TaggedMediaEvent};
use crate::render;
use leakify_client::LeakifyClient;
use leakify_core::{LeakifyError, LibraryBackend, Song};
use leakify_playback::{
    Command, LoadTicket, MediaEvent, PlaybackConfig, PlaybackEvent, PlayerSession,
};
use leakify_storage::{KeyValueStore, PreferenceStore};
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// How often the playhead and the sleep timer are advanced
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

const QUEUE_PREVIEW: usize = 10;

/// Result of a spawned backend call
#[derive(Debug)]
pub enum Completion {
    Catalog(leakify_core::Result<Vec<Song>>),
    UrlRefresh {
        ticket: LoadTicket,
        result: leakify_core::Result<String>,
    },
    Login(leakify_core::Result<()>),
}

pub struct Player<S: KeyValueStore, W: Write> {
    session: PlayerSession<ProbeOutput, S>,
    client: LeakifyClient,
    media_rx: UnboundedReceiver<TaggedMediaEvent>,
    done_tx: UnboundedSender<Completion>,
    done_rx: UnboundedReceiver<Completion>,
    out: W,
    json: bool,
}

impl<S: KeyValueStore, W: Write> Player<S, W> {
    pub fn new(
        config: &PlaybackConfig,
        bitrate_kbps: u32,
        client: LeakifyClient,
        preferences: PreferenceStore<S>,
        out: W,
    ) -> Self {
        let (media_tx, media_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let output = ProbeOutput::new(client.clone(), media_tx, bitrate_kbps);

        Self {
            session: PlayerSession::new(config, output, preferences),
            client,
            media_rx,
            done_tx,
            done_rx,
            out,
            json: false,
        }
    }

    /// Print events as JSON lines instead of text
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn session(&self) -> &PlayerSession<ProbeOutput, S> {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Fetch the song list in the background
    pub fn request_catalog(&self) {
        let client = self.client.clone();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_songs().await;
            let _ = done.send(Completion::Catalog(result));
        });
    }

    fn request_url_refresh(&self, ticket: LoadTicket, song_id: String) {
        let client = self.client.clone();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = client.fresh_url(&song_id).await;
            let _ = done.send(Completion::UrlRefresh { ticket, result });
        });
    }

    fn request_login(&self, user: String, pass: String) {
        let client = self.client.clone();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = client
                .login(&user, &pass)
                .await
                .map_err(LeakifyError::from);
            let _ = done.send(Completion::Login(result));
        });
    }

    /// Run until `quit` or end of input
    pub async fn run<R>(mut self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::debug!("Input closed");
                        break;
                    };
                    if !self.handle_line(&line)? {
                        break;
                    }
                }
                Some((ticket, event)) = self.media_rx.recv() => {
                    self.handle_media(ticket, event, Instant::now())?;
                }
                Some(completion) = self.done_rx.recv() => {
                    self.handle_completion(completion)?;
                }
                _ = ticker.tick() => {
                    self.tick(Instant::now())?;
                }
            }
        }

        tracing::info!("Player stopped");
        Ok(())
    }

    /// Wait for the next media event or backend reply and apply it
    pub async fn pump(&mut self) -> anyhow::Result<()> {
        tokio::select! {
            Some((ticket, event)) = self.media_rx.recv() => {
                self.handle_media(ticket, event, Instant::now())?;
            }
            Some(completion) = self.done_rx.recv() => {
                self.handle_completion(completion)?;
            }
            else => anyhow::bail!("media and backend channels closed"),
        }
        Ok(())
    }

    /// Print the startup hint. JSON output stays machine-readable only.
    pub fn greet(&mut self) -> std::io::Result<()> {
        if !self.json {
            writeln!(self.out, "type `help` for commands")?;
        }
        Ok(())
    }

    /// Apply one input line. Returns false when the user quits.
    pub fn handle_line(&mut self, line: &str) -> std::io::Result<bool> {
        let action = match input::parse(line) {
            Ok(Some(action)) => action,
            Ok(None) => return Ok(true),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                return Ok(true);
            }
        };

        match action {
            Action::Dispatch(command) => self.dispatch(command)?,
            Action::Filter(change) => {
                let mut filter = self.session.catalog().filter().clone();
                match change {
                    FilterChange::Scope(scope) => filter.scope = scope,
                    FilterChange::Search(term) => filter.search = term,
                }
                self.dispatch(Command::ApplyFilter(filter))?;
            }
            Action::Show(listing) => self.show(listing)?,
            Action::Refresh => {
                writeln!(self.out, "reloading library...")?;
                self.request_catalog();
            }
            Action::Login { user, pass } => self.request_login(user, pass),
            Action::Help => writeln!(self.out, "{HELP}")?,
            Action::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn dispatch(&mut self, command: Command) -> std::io::Result<()> {
        if let Err(e) = self.session.dispatch(command, Instant::now()) {
            writeln!(self.out, "error: {e}")?;
        }
        self.flush_events()
    }

    fn show(&mut self, listing: Listing) -> std::io::Result<()> {
        let text = match listing {
            Listing::Songs => {
                render::song_list(self.session.catalog(), self.session.navigator().current())
            }
            Listing::Queue => render::upcoming(&self.session.upcoming(QUEUE_PREVIEW)),
            Listing::Recent => render::recent(&self.session.recently_played()),
            Listing::Liked => {
                let labels: Vec<String> = self
                    .session
                    .liked_songs()
                    .into_iter()
                    .map(render::song_label)
                    .collect();
                render::names("liked songs", &labels)
            }
            Listing::NowPlaying => render::now_playing(&self.session.now_playing(Instant::now())),
            Listing::Artists => render::names("artists", &self.session.catalog().artists()),
            Listing::Tags => render::names("tags", &self.session.catalog().tags()),
        };
        write!(self.out, "{text}")
    }

    pub fn handle_media(
        &mut self,
        ticket: LoadTicket,
        event: MediaEvent,
        now: Instant,
    ) -> std::io::Result<()> {
        self.session.output_mut().observe(ticket, &event, now);
        self.session.handle_media_event(ticket, event);
        self.flush_events()
    }

    pub fn handle_completion(&mut self, completion: Completion) -> std::io::Result<()> {
        match completion {
            Completion::Catalog(result) => self.session.load_catalog(result),
            Completion::UrlRefresh { ticket, result } => {
                self.session.complete_url_refresh(ticket, result);
            }
            Completion::Login(Ok(())) => {
                writeln!(self.out, "logged in")?;
                self.request_catalog();
            }
            Completion::Login(Err(e)) => writeln!(self.out, "login failed: {e}")?,
        }
        self.flush_events()
    }

    pub fn tick(&mut self, now: Instant) -> std::io::Result<()> {
        for (ticket, event) in self.session.output_mut().poll(now) {
            self.session.handle_media_event(ticket, event);
        }
        self.session.tick(now);
        self.flush_events()
    }

    fn flush_events(&mut self) -> std::io::Result<()> {
        for event in self.session.drain_events() {
            if let PlaybackEvent::UrlRefreshRequested { ticket, song_id } = &event {
                self.request_url_refresh(*ticket, song_id.clone());
            }

            if self.json {
                match serde_json::to_string(&event) {
                    Ok(line) => writeln!(self.out, "{line}")?,
                    Err(e) => tracing::warn!(error = %e, "Could not encode event"),
                }
            } else if let Some(line) = render::describe_event(&event, self.session.catalog()) {
                writeln!(self.out, "{line}")?;
            }
        }
        Ok(())
    }
}
