//! Commands the presentation layer sends into the session

use leakify_core::FilterSpec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User intent, applied synchronously by `PlayerSession::dispatch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "arg", rename_all = "snake_case")]
pub enum Command {
    /// Play the song at this position of the filtered view
    SelectTrack(usize),
    Next,
    Previous,
    TogglePlayPause,
    ToggleShuffle,
    ToggleRepeat,
    /// Jump to a fraction of the track
    Seek(f32),
    /// Progress-bar drag started; position reports are held back
    BeginSeek,
    EndSeek,
    /// Volume level 0-100
    SetVolume(u8),
    ToggleLike(String),
    /// Like or unlike whatever is loaded
    ToggleLikeCurrent,
    /// `None` cancels
    SetSleepTimer(Option<Duration>),
    ApplyFilter(FilterSpec),
    ClearRecent,
    ClearLikes,
}
