//! Playback controller
//!
//! Drives the single media output: loads, pause/resume, the one-shot URL
//! refresh retry, progress and seek, volume and the sleep fade.
//!
//! The controller never blocks. `play` hands a source to the output under a
//! fresh `LoadTicket`; the output later reports back through
//! `handle_media_event`. Reports for any other ticket are stale and dropped,
//! so rapid skipping can only ever surface the last requested track.

use crate::events::PlaybackEvent;
use crate::output::MediaOutput;
use crate::sleep_timer::{SleepTick, SleepTimer};
use crate::types::{
    Attempt, LoadTicket, MediaErrorKind, MediaEvent, MediaSource, PlaybackConfig, PlaybackState,
};
use crate::volume::Volume;
use leakify_core::Song;
use std::time::{Duration, Instant};

/// What a media event meant for the caller
#[derive(Debug, Clone, PartialEq)]
pub enum MediaOutcome {
    /// Audio began for this song (first start of this load)
    Started(Song),
    /// The track played to its end
    Ended,
    /// Loading gave up for good
    Failed(Song),
}

#[derive(Debug, Clone)]
struct LoadedTrack {
    ticket: LoadTicket,
    song: Song,
    attempt: Attempt,
    /// Waiting for a fresh URL before the retry
    awaiting_url: bool,
}

pub struct PlaybackController<M: MediaOutput> {
    output: M,
    state: PlaybackState,
    current: Option<LoadedTrack>,
    next_ticket: u64,

    volume: Volume,
    position: Duration,
    duration: Option<Duration>,
    seeking: bool,

    sleep: SleepTimer,

    pending_events: Vec<PlaybackEvent>,
}

impl<M: MediaOutput> PlaybackController<M> {
    pub fn new(output: M, config: &PlaybackConfig) -> Self {
        let volume = Volume::new(config.default_volume);
        let mut output = output;
        output.set_gain(volume.gain());

        Self {
            output,
            state: PlaybackState::Unloaded,
            current: None,
            next_ticket: 0,
            volume,
            position: Duration::ZERO,
            duration: None,
            seeking: false,
            sleep: SleepTimer::new(config.fade_duration),
            pending_events: Vec::new(),
        }
    }

    // ===== Loading =====

    /// Start playing `song`, superseding whatever was loading or playing
    pub fn play(&mut self, song: Song) -> LoadTicket {
        let previous_song_id = self.current.as_ref().map(|t| t.song.filename.clone());
        let source = MediaSource::for_song(&song);
        let ticket = self.load(&source);

        tracing::debug!(song = %song.filename, %ticket, "Loading track");
        self.pending_events.push(PlaybackEvent::TrackChanged {
            song_id: song.filename.clone(),
            previous_song_id,
        });

        self.current = Some(LoadedTrack {
            ticket,
            song,
            attempt: Attempt::First,
            awaiting_url: false,
        });
        ticket
    }

    fn load(&mut self, source: &MediaSource) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);

        self.position = Duration::ZERO;
        self.duration = None;
        self.output.load(ticket, source);
        self.set_state(PlaybackState::Loading);
        ticket
    }

    /// Report the result of the URL refresh requested for `ticket`
    pub fn complete_url_refresh(
        &mut self,
        ticket: LoadTicket,
        result: leakify_core::Result<String>,
    ) {
        let Some(track) = self
            .current
            .as_ref()
            .filter(|t| t.ticket == ticket && t.awaiting_url)
            .cloned()
        else {
            tracing::trace!(%ticket, "Dropping stale URL refresh");
            return;
        };

        match result {
            Ok(url) => {
                tracing::info!(song = %track.song.filename, "Retrying with fresh playback URL");
                let new_ticket = self.load(&MediaSource::Url(url));
                self.current = Some(LoadedTrack {
                    ticket: new_ticket,
                    song: track.song,
                    attempt: Attempt::Retried,
                    awaiting_url: false,
                });
            }
            Err(e) => {
                self.give_up(&track.song, format!("could not refresh playback URL: {e}"));
            }
        }
    }

    /// Feed a media output notification into the controller
    pub fn handle_media_event(
        &mut self,
        ticket: LoadTicket,
        event: MediaEvent,
    ) -> Option<MediaOutcome> {
        if self.current.as_ref().map(|t| t.ticket) != Some(ticket) {
            tracing::trace!(%ticket, ?event, "Dropping stale media event");
            return None;
        }

        match event {
            MediaEvent::Started => {
                if self.state != PlaybackState::Loading {
                    return None;
                }
                self.set_state(PlaybackState::Playing);
                let song = self.current.as_ref()?.song.clone();
                self.pending_events.push(PlaybackEvent::PlaybackStarted {
                    song_id: song.filename.clone(),
                });
                Some(MediaOutcome::Started(song))
            }
            MediaEvent::Failed { kind, message } => self.handle_failure(kind, &message),
            MediaEvent::MetadataLoaded { duration } => {
                self.duration = Some(duration);
                self.emit_position();
                None
            }
            MediaEvent::TimeUpdate { position } => {
                self.position = position;
                if self.state == PlaybackState::Playing {
                    self.emit_position();
                }
                None
            }
            MediaEvent::Ended => {
                if !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
                    return None;
                }
                if let Some(duration) = self.duration {
                    self.position = duration;
                }
                Some(MediaOutcome::Ended)
            }
        }
    }

    fn handle_failure(&mut self, kind: MediaErrorKind, message: &str) -> Option<MediaOutcome> {
        let track = self.current.as_mut()?;

        if track.awaiting_url {
            return None;
        }

        let retry = self.state == PlaybackState::Loading
            && track.attempt == Attempt::First
            && kind.is_retryable();

        if retry {
            tracing::warn!(
                song = %track.song.filename,
                ?kind,
                error = %message,
                "Playback failed, requesting fresh URL"
            );
            track.awaiting_url = true;
            let event = PlaybackEvent::UrlRefreshRequested {
                ticket: track.ticket,
                song_id: track.song.filename.clone(),
            };
            self.pending_events.push(event);
            return None;
        }

        let song = track.song.clone();
        self.give_up(&song, format!("{kind:?}: {message}"));
        Some(MediaOutcome::Failed(song))
    }

    fn give_up(&mut self, song: &Song, reason: String) {
        tracing::warn!(song = %song.filename, %reason, "Playback failed");
        if let Some(track) = self.current.as_mut() {
            track.awaiting_url = false;
        }
        self.pending_events.push(PlaybackEvent::PlaybackFailed {
            song_id: song.filename.clone(),
            reason,
        });
        self.set_state(PlaybackState::Stopped);
    }

    // ===== Transport =====

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.output.pause();
            self.set_state(PlaybackState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.output.play();
            self.set_state(PlaybackState::Playing);
        }
    }

    /// Flip between playing and paused. Returns false if neither applies.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing => {
                self.pause();
                true
            }
            PlaybackState::Paused => {
                self.resume();
                true
            }
            _ => false,
        }
    }

    /// Play the loaded track again from zero
    pub fn restart(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.output.seek(Duration::ZERO);
        self.output.play();
        self.position = Duration::ZERO;
        self.set_state(PlaybackState::Playing);
        self.emit_position();
    }

    /// Halt playback, keeping the track selected
    pub fn stop(&mut self) {
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Loading) {
            self.output.pause();
        }
        if let Some(track) = self.current.as_mut() {
            // A URL refresh that lands after this must not restart the load
            track.awaiting_url = false;
            self.set_state(PlaybackState::Stopped);
        }
    }

    // ===== Seek =====

    /// Seek to `fraction` of the track, clamped to [0, 1].
    ///
    /// Returns false without touching the output when the duration is not
    /// known yet.
    pub fn seek(&mut self, fraction: f32) -> bool {
        let Some(duration) = self.duration else {
            return false;
        };
        if self.current.is_none() {
            return false;
        }

        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let position = duration.mul_f32(fraction);

        self.output.seek(position);
        self.position = position;
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_ms: duration_ms(position),
            duration_ms: Some(duration_ms(duration)),
        });
        true
    }

    /// User started dragging the progress bar
    pub fn begin_seek(&mut self) {
        self.seeking = true;
    }

    pub fn end_seek(&mut self) {
        self.seeking = false;
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    // ===== Volume =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        if !self.sleep.is_fading() {
            self.output.set_gain(self.volume.gain());
        }
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
        });
    }

    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    // ===== Sleep timer =====

    /// Arm (`Some`) or cancel (`None`) the sleep timer
    pub fn set_sleep_timer(&mut self, after: Option<Duration>, now: Instant) {
        if self.sleep.cancel() {
            self.output.set_gain(self.volume.gain());
        }
        if let Some(after) = after {
            self.sleep.set(after, now);
            tracing::info!(minutes = after.as_secs() / 60, "Sleep timer set");
        } else {
            tracing::info!("Sleep timer cancelled");
        }

        self.pending_events.push(PlaybackEvent::SleepTimerChanged {
            remaining_secs: self.sleep.remaining(now).map(|d| d.as_secs()),
        });
    }

    pub fn sleep_remaining(&self, now: Instant) -> Option<Duration> {
        self.sleep.remaining(now)
    }

    /// Advance time-driven behavior (the sleep fade).
    ///
    /// A track that is still loading counts as playing: the fade carries on
    /// across track changes and a pending load is stopped when it ends.
    pub fn tick(&mut self, now: Instant) {
        let playing = matches!(self.state, PlaybackState::Playing | PlaybackState::Loading);
        match self.sleep.tick(now, playing, self.volume.gain()) {
            SleepTick::Idle => {}
            SleepTick::Fading { gain } => self.output.set_gain(gain),
            SleepTick::Finished => {
                tracing::info!(state = %self.state, "Sleep timer finished, pausing");
                if self.state == PlaybackState::Loading {
                    self.stop();
                } else {
                    self.pause();
                }
                self.output.set_gain(self.volume.gain());
                self.pending_events.push(PlaybackEvent::SleepTimerExpired);
            }
            SleepTick::Expired => {
                self.pending_events.push(PlaybackEvent::SleepTimerExpired);
            }
        }
    }

    // ===== State =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Song handed to the output most recently
    pub fn current_song(&self) -> Option<&Song> {
        self.current.as_ref().map(|t| &t.song)
    }

    /// Ticket of the load that is currently allowed to report
    pub fn current_ticket(&self) -> Option<LoadTicket> {
        self.current.as_ref().map(|t| t.ticket)
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn output(&self) -> &M {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut M {
        &mut self.output
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.pending_events
                .push(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_position(&mut self) {
        if self.seeking {
            return;
        }
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_ms: duration_ms(self.position),
            duration_ms: self.duration.map(duration_ms),
        });
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
