//! Platform-agnostic media output trait
//!
//! Abstracts the thing that actually streams audio (an HTML audio element in
//! a browser, an HTTP probe in the CLI). Calls are fire-and-forget: outcomes
//! come back later as `MediaEvent`s tagged with the load ticket.

use crate::types::{LoadTicket, MediaSource};
use std::time::Duration;

/// Single exclusive media playback resource
pub trait MediaOutput {
    /// Replace the current source and start playing it
    ///
    /// Any previous load is abandoned; its events may still arrive and are
    /// discarded by ticket.
    fn load(&mut self, ticket: LoadTicket, source: &MediaSource);

    /// Resume the loaded source
    fn play(&mut self);

    fn pause(&mut self);

    /// Jump to `position` from the start of the track
    fn seek(&mut self, position: Duration);

    /// Output gain in [0.0, 1.0]
    fn set_gain(&mut self, gain: f32);
}
