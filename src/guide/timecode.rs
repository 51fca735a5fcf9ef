use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

use crate::error::OffsetError;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

/// A span of time with microsecond resolution.
///
/// Renders as `H:MM:SS`, or `H:MM:SS.ffffff` when there is a fractional
/// part. Spans of a day or more get a `N day(s), ` prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timecode {
    micros: i64,
}

impl Timecode {
    pub const ZERO: Self = Self { micros: 0 };

    /// Parse a clock-style `HH:MM:SS` offset (24h clock, single-digit fields allowed)
    pub fn parse(input: &str) -> Result<Self, OffsetError> {
        let invalid = || OffsetError::InvalidFormat {
            input: input.to_string(),
        };

        if input.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let time = NaiveTime::parse_from_str(input, "%H:%M:%S").map_err(|_| invalid())?;

        // chrono reads second 60 as a leap second; clock offsets stop at 59
        if time.nanosecond() >= 1_000_000_000 {
            return Err(invalid());
        }

        let seconds = i64::from(time.num_seconds_from_midnight());
        Ok(Self::from_micros(seconds * MICROS_PER_SECOND))
    }

    /// Round a position in seconds to the nearest microsecond
    pub fn from_seconds(seconds: f64) -> Self {
        Self::from_micros((seconds * MICROS_PER_SECOND as f64).round_ties_even() as i64)
    }

    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    pub fn as_micros(&self) -> i64 {
        self.micros
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / MICROS_PER_SECOND as f64
    }
}

impl Add for Timecode {
    type Output = Timecode;

    fn add(self, rhs: Timecode) -> Timecode {
        Timecode::from_micros(self.micros.saturating_add(rhs.micros))
    }
}

impl FromStr for Timecode {
    type Err = OffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.micros.div_euclid(MICROS_PER_DAY);
        let rest = self.micros.rem_euclid(MICROS_PER_DAY);

        if days != 0 {
            let plural = if days.abs() == 1 { "" } else { "s" };
            write!(f, "{} day{}, ", days, plural)?;
        }

        let hours = rest / MICROS_PER_HOUR;
        let minutes = rest % MICROS_PER_HOUR / MICROS_PER_MINUTE;
        let seconds = rest % MICROS_PER_MINUTE / MICROS_PER_SECOND;
        let micros = rest % MICROS_PER_SECOND;

        write!(f, "{}:{:02}:{:02}", hours, minutes, seconds)?;
        if micros != 0 {
            write!(f, ".{:06}", micros)?;
        }
        Ok(())
    }
}
