//! Sleep timer with linear fade-out
//!
//! The timer is driven by explicit `tick(now)` calls so the engine stays free
//! of background threads; the front-end ticks it from its event loop.

use std::time::{Duration, Instant};

/// Result of advancing the timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SleepTick {
    /// Nothing to do
    Idle,
    /// Fade in progress, apply this gain
    Fading { gain: f32 },
    /// Fade complete: pause and restore the configured volume
    Finished,
    /// Deadline passed while nothing was playing
    Expired,
}

/// Longest delay the timer accepts
pub const MAX_DELAY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct Fade {
    started: Instant,
    from: f32,
}

#[derive(Debug, Clone)]
pub struct SleepTimer {
    deadline: Option<Instant>,
    fade: Option<Fade>,
    fade_duration: Duration,
}

impl SleepTimer {
    pub fn new(fade_duration: Duration) -> Self {
        Self {
            deadline: None,
            fade: None,
            fade_duration,
        }
    }

    /// Arm the timer to expire `after` from `now`, replacing any pending one.
    ///
    /// Delays longer than [`MAX_DELAY`] are clamped to it.
    pub fn set(&mut self, after: Duration, now: Instant) {
        self.deadline = now.checked_add(after.min(MAX_DELAY));
        if self.deadline.is_none() {
            tracing::warn!(?after, "Sleep delay out of range, timer not armed");
        }
        self.fade = None;
    }

    /// Disarm the timer. Returns true if a fade was interrupted.
    pub fn cancel(&mut self) -> bool {
        self.deadline = None;
        self.fade.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some() || self.fade.is_some()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Time left until the fade starts; zero while fading
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if self.fade.is_some() {
            return Some(Duration::ZERO);
        }
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Advance the timer.
    ///
    /// `playing` tells whether audio is running, `gain` is the level to fade
    /// down from if a fade starts on this tick.
    pub fn tick(&mut self, now: Instant, playing: bool, gain: f32) -> SleepTick {
        if let Some(fade) = self.fade {
            if !playing {
                self.fade = None;
                return SleepTick::Finished;
            }
            return self.fade_step(fade, now);
        }

        let Some(deadline) = self.deadline else {
            return SleepTick::Idle;
        };
        if now < deadline {
            return SleepTick::Idle;
        }

        self.deadline = None;
        if !playing {
            return SleepTick::Expired;
        }

        let fade = Fade {
            started: deadline,
            from: gain,
        };
        self.fade = Some(fade);
        self.fade_step(fade, now)
    }

    fn fade_step(&mut self, fade: Fade, now: Instant) -> SleepTick {
        let elapsed = now.saturating_duration_since(fade.started);
        if self.fade_duration.is_zero() || elapsed >= self.fade_duration {
            self.fade = None;
            return SleepTick::Finished;
        }

        let progress = elapsed.as_secs_f32() / self.fade_duration.as_secs_f32();
        SleepTick::Fading {
            gain: fade.from * (1.0 - progress),
        }
    }
}

impl Default for SleepTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}
