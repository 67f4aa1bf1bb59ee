use std::fmt;

use serde::Serialize;

/// Remaining time at or below which the countdown is shown as a warning.
pub const WARNING_THRESHOLD_SECS: u32 = 5 * 60;

/// One phase countdown, advanced by explicit one-second ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { duration: seconds, remaining: seconds, running: false }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Freezes the countdown at its current value. There is no resume.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Back to the full configured duration, running.
    pub fn restart(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    /// Advances one second. Returns true exactly once, on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_warning(&self) -> bool {
        self.remaining > 0 && self.remaining <= WARNING_THRESHOLD_SECS
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.remaining / 3600;
        let minutes = (self.remaining % 3600) / 60;
        let seconds = self.remaining % 60;
        if hours > 0 {
            write!(f, "{hours}:{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{minutes:02}:{seconds:02}")
        }
    }
}
