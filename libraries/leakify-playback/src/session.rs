//! Player session: the single owner of all playback state
//!
//! Ties the catalog, the navigator, the playback controller and the
//! preference store together. Everything that changes state enters through
//! one of the methods below and runs to completion before the next one, so
//! no locking is needed; asynchronous work (fetching the library, refreshing
//! a playback URL, buffering audio) happens outside and reports back in.

use crate::command::Command;
use crate::controller::{MediaOutcome, PlaybackController};
use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::navigation::{Navigator, TrackEndAction};
use crate::output::MediaOutput;
use crate::types::{LoadTicket, MediaEvent, PlaybackConfig, PlaybackState};
use leakify_core::{Catalog, LeakifyError, Song};
use leakify_storage::{KeyValueStore, PreferenceStore};
use std::time::Instant;

pub struct PlayerSession<M: MediaOutput, S: KeyValueStore> {
    pub(crate) catalog: Catalog,
    pub(crate) navigator: Navigator,
    pub(crate) controller: PlaybackController<M>,
    pub(crate) preferences: PreferenceStore<S>,
    pending_events: Vec<PlaybackEvent>,
}

impl<M: MediaOutput, S: KeyValueStore> PlayerSession<M, S> {
    pub fn new(config: &PlaybackConfig, output: M, preferences: PreferenceStore<S>) -> Self {
        let mut navigator = match config.shuffle_seed {
            Some(seed) => Navigator::with_seed(config.history_size, seed),
            None => Navigator::new(config.history_size),
        };
        navigator.set_shuffle(config.shuffle);
        navigator.set_repeat(config.repeat);

        Self {
            catalog: Catalog::new(),
            navigator,
            controller: PlaybackController::new(output, config),
            preferences,
            pending_events: Vec::new(),
        }
    }

    // ===== Commands =====

    /// Apply one user command
    pub fn dispatch(&mut self, command: Command, now: Instant) -> Result<()> {
        tracing::debug!(?command, "Dispatching command");

        let result = match command {
            Command::SelectTrack(index) => {
                let len = self.catalog.view_len();
                if let Some(index) = self.navigator.select_track(index, len, true) {
                    self.play_index(index);
                }
                Ok(())
            }
            Command::Next => {
                if let Some(index) = self.navigator.next(self.catalog.view_len()) {
                    self.play_index(index);
                }
                Ok(())
            }
            Command::Previous => {
                if let Some(index) = self.navigator.previous(self.catalog.view_len()) {
                    self.play_index(index);
                }
                Ok(())
            }
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::ToggleShuffle => {
                self.navigator.toggle_shuffle();
                self.emit_modes();
                Ok(())
            }
            Command::ToggleRepeat => {
                self.navigator.toggle_repeat();
                self.emit_modes();
                Ok(())
            }
            Command::Seek(fraction) => {
                self.controller.seek(fraction);
                Ok(())
            }
            Command::BeginSeek => {
                self.controller.begin_seek();
                Ok(())
            }
            Command::EndSeek => {
                self.controller.end_seek();
                Ok(())
            }
            Command::SetVolume(level) => {
                self.controller.set_volume(level);
                Ok(())
            }
            Command::ToggleLike(id) => self.toggle_like(&id).map(|_| ()),
            Command::ToggleLikeCurrent => {
                let id = self
                    .controller
                    .current_song()
                    .map(|song| song.filename.clone())
                    .ok_or(PlaybackError::NoTrackLoaded)?;
                self.toggle_like(&id).map(|_| ())
            }
            Command::SetSleepTimer(after) => {
                self.controller.set_sleep_timer(after, now);
                Ok(())
            }
            Command::ApplyFilter(filter) => {
                self.catalog.apply_filter(filter);
                self.emit_library();
                Ok(())
            }
            Command::ClearRecent => {
                self.preferences.clear_recent()?;
                self.emit(PlaybackEvent::RecentChanged { len: 0 });
                Ok(())
            }
            Command::ClearLikes => {
                self.preferences.clear_likes()?;
                tracing::info!("Cleared liked songs");
                Ok(())
            }
        };

        self.collect_controller_events();
        result
    }

    fn toggle_play_pause(&mut self) -> Result<()> {
        match self.controller.state() {
            PlaybackState::Playing | PlaybackState::Paused => {
                self.controller.toggle_pause();
                Ok(())
            }
            PlaybackState::Loading => Ok(()),
            PlaybackState::Stopped => {
                let len = self.catalog.view_len();
                let index = self
                    .navigator
                    .current()
                    .filter(|&i| i < len)
                    .or_else(|| self.navigator.select_track(0, len, true))
                    .ok_or(PlaybackError::EmptyView)?;
                self.play_index(index);
                Ok(())
            }
            PlaybackState::Unloaded => {
                let index = self
                    .navigator
                    .select_track(0, self.catalog.view_len(), true)
                    .ok_or(PlaybackError::EmptyView)?;
                self.play_index(index);
                Ok(())
            }
        }
    }

    fn toggle_like(&mut self, id: &str) -> Result<bool> {
        let liked = self.preferences.toggle_like(id)?;
        self.emit(PlaybackEvent::LikeChanged {
            song_id: id.to_string(),
            liked,
        });
        Ok(liked)
    }

    fn play_index(&mut self, index: usize) {
        match self.catalog.song_at(index).cloned() {
            Some(song) => {
                self.controller.play(song);
            }
            None => tracing::warn!(index, "Selected index has no song"),
        }
    }

    // ===== Inputs from the outside world =====

    /// Feed a media output notification
    pub fn handle_media_event(&mut self, ticket: LoadTicket, event: MediaEvent) {
        match self.controller.handle_media_event(ticket, event) {
            Some(MediaOutcome::Started(song)) => self.record_play(&song),
            Some(MediaOutcome::Ended) => self.on_track_end(),
            Some(MediaOutcome::Failed(_)) | None => {}
        }
        self.collect_controller_events();
    }

    fn record_play(&mut self, song: &Song) {
        match self.preferences.record_play(song) {
            Ok(()) => self.emit(PlaybackEvent::RecentChanged {
                len: self.preferences.recent_len(),
            }),
            Err(e) => {
                tracing::warn!(song = %song.filename, error = %e, "Could not record play");
                self.emit(PlaybackEvent::Error {
                    message: format!("Could not save recently played: {e}"),
                });
            }
        }
    }

    fn on_track_end(&mut self) {
        match self.navigator.on_track_end(self.catalog.view_len()) {
            TrackEndAction::Restart => self.controller.restart(),
            TrackEndAction::Advance(index) => self.play_index(index),
            TrackEndAction::Stop => self.controller.stop(),
        }
    }

    /// Report the result of a `UrlRefreshRequested` event
    pub fn complete_url_refresh(&mut self, ticket: LoadTicket, result: leakify_core::Result<String>) {
        self.controller.complete_url_refresh(ticket, result);
        self.collect_controller_events();
    }

    /// Install a freshly fetched library, or record why fetching failed.
    ///
    /// Success replaces the catalog wholesale and clears the back-stack. A
    /// failure drops the old catalog.
    pub fn load_catalog(&mut self, result: leakify_core::Result<Vec<Song>>) {
        match result {
            Ok(songs) => {
                tracing::info!(count = songs.len(), "Library loaded");
                self.catalog.replace(songs);
                self.navigator.clear_history();
            }
            Err(LeakifyError::AuthRequired) => {
                tracing::warn!("Library load rejected, login required");
                self.catalog.mark_failed("login required");
                self.navigator.clear_history();
                self.emit(PlaybackEvent::AuthRequired);
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not load library");
                self.catalog.mark_failed(e.to_string());
                self.navigator.clear_history();
            }
        }
        self.emit_library();
    }

    /// Advance the clock-driven parts (sleep timer)
    pub fn tick(&mut self, now: Instant) {
        self.controller.tick(now);
        self.collect_controller_events();
    }

    // ===== Accessors =====

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn controller(&self) -> &PlaybackController<M> {
        &self.controller
    }

    pub fn preferences(&self) -> &PreferenceStore<S> {
        &self.preferences
    }

    pub fn output_mut(&mut self) -> &mut M {
        self.controller.output_mut()
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.collect_controller_events();
        std::mem::take(&mut self.pending_events)
    }

    /// Queue a session event after whatever the controller has queued so far
    fn emit(&mut self, event: PlaybackEvent) {
        self.collect_controller_events();
        self.pending_events.push(event);
    }

    fn collect_controller_events(&mut self) {
        let events = self.controller.drain_events();
        self.pending_events.extend(events);
    }

    fn emit_modes(&mut self) {
        self.emit(PlaybackEvent::ModesChanged {
            shuffle: self.navigator.is_shuffle(),
            repeat: self.navigator.is_repeat(),
        });
    }

    fn emit_library(&mut self) {
        self.emit(PlaybackEvent::LibraryChanged {
            status: self.catalog.status(),
        });
    }
}
