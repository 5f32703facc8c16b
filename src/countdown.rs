//! Countdown Engine
//!
//! Pure time-remaining arithmetic for the dinner and registration countdowns.
//!
//! - [`compute`]: breakdown of the time left between two instants
//! - [`Countdown`]: a named target instant with its finished message
//! - [`CountdownResult`]: the days/hours/minutes/seconds breakdown

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const SECONDS_PER_HOUR: u64 = 60 * 60;
const SECONDS_PER_MINUTE: u64 = 60;

/// Time remaining until a target instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountdownResult {
    pub days: u64,
    /// 0-23
    pub hours: u8,
    /// 0-59
    pub minutes: u8,
    /// 0-59
    pub seconds: u8,
    pub finished: bool,
}

impl CountdownResult {
    /// The terminal all-zero result
    pub const FINISHED: CountdownResult = CountdownResult {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        finished: true,
    };

    /// Whole seconds represented by the breakdown
    pub fn total_seconds(&self) -> u64 {
        self.days * SECONDS_PER_DAY
            + u64::from(self.hours) * SECONDS_PER_HOUR
            + u64::from(self.minutes) * SECONDS_PER_MINUTE
            + u64::from(self.seconds)
    }

    /// Display strings for the four text fields.
    ///
    /// Days are unpadded; hours, minutes and seconds are padded to two digits.
    pub fn fields(&self) -> CountdownFields {
        CountdownFields {
            days: self.days.to_string(),
            hours: format!("{:02}", self.hours),
            minutes: format!("{:02}", self.minutes),
            seconds: format!("{:02}", self.seconds),
        }
    }
}

impl std::fmt::Display for CountdownResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self.fields();
        write!(
            f,
            "{}d {}:{}:{}",
            fields.days, fields.hours, fields.minutes, fields.seconds
        )
    }
}

/// Formatted countdown fields, ready for a text sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownFields {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

/// Compute the time remaining from `now_ms` until `target_ms` (epoch milliseconds).
///
/// Any non-positive difference yields [`CountdownResult::FINISHED`].
pub fn compute(target_ms: i64, now_ms: i64) -> CountdownResult {
    let diff = target_ms.saturating_sub(now_ms);
    if diff <= 0 {
        return CountdownResult::FINISHED;
    }

    let total_seconds = (diff / 1000) as u64;

    CountdownResult {
        days: total_seconds / SECONDS_PER_DAY,
        hours: ((total_seconds / SECONDS_PER_HOUR) % 24) as u8,
        minutes: ((total_seconds / SECONDS_PER_MINUTE) % 60) as u8,
        seconds: (total_seconds % 60) as u8,
        finished: false,
    }
}

/// A named countdown to a fixed target instant
#[derive(Debug, Clone)]
pub struct Countdown {
    name: String,
    target: DateTime<FixedOffset>,
    finished_message: String,
    finished: bool,
}

impl Countdown {
    /// Create a countdown to `target`
    pub fn new(
        name: impl Into<String>,
        target: DateTime<FixedOffset>,
        finished_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            finished_message: finished_message.into(),
            finished: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> DateTime<FixedOffset> {
        self.target
    }

    /// Target instant in epoch milliseconds
    pub fn target_ms(&self) -> i64 {
        self.target.timestamp_millis()
    }

    pub fn finished_message(&self) -> &str {
        &self.finished_message
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Recompute the breakdown for `now_ms`.
    ///
    /// Once a tick has reported the countdown finished, later ticks stay finished
    /// even if the wall clock steps backwards.
    pub fn tick(&mut self, now_ms: i64) -> CountdownResult {
        if self.finished {
            return CountdownResult::FINISHED;
        }

        let result = compute(self.target_ms(), now_ms);
        if result.finished {
            tracing::info!(countdown = %self.name, "Countdown reached its target");
            self.finished = true;
        }
        result
    }
}
