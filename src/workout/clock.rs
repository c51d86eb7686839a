//! Whole-workout clock
//!
//! Duration is configured in minutes and tracked in seconds. The clock never
//! reports a value at or past its bound: the tick that reaches it wraps back
//! to zero and reports completion.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    Running { elapsed: u32 },
    Completed,
}

#[derive(Debug, Clone)]
pub struct WorkoutClock {
    elapsed_seconds: u32,
    duration_minutes: u32,
}

impl WorkoutClock {
    pub fn new(duration_minutes: u32) -> Self {
        Self {
            elapsed_seconds: 0,
            duration_minutes,
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn total_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.total_seconds().saturating_sub(self.elapsed_seconds)
    }

    pub fn progress_percent(&self) -> f64 {
        match self.total_seconds() {
            0 => 0.0,
            total => self.elapsed_seconds as f64 / total as f64 * 100.0,
        }
    }

    pub fn tick(&mut self) -> ClockTick {
        let next = self.elapsed_seconds + 1;
        if next >= self.total_seconds() {
            self.elapsed_seconds = 0;
            ClockTick::Completed
        } else {
            self.elapsed_seconds = next;
            ClockTick::Running { elapsed: next }
        }
    }

    /// Change the bound. Returns true when the elapsed time already meets the
    /// new bound, in which case the caller must complete the workout.
    pub fn set_duration_minutes(&mut self, minutes: u32) -> bool {
        self.duration_minutes = minutes;
        self.elapsed_seconds > 0 && self.elapsed_seconds >= self.total_seconds()
    }

    pub fn reset(&mut self) {
        self.elapsed_seconds = 0;
    }
}

/// `MM:SS`, minutes are not capped at 59
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
