//! ISO-8601 durations used by timed conditions (delays) and timed responses (deadlines).
//!
//! Example values: `P2D`, `PT4H30M`, `P1DT12H`, `P1W`.
//!
//! Durations are stored as `std::time::Duration` with whole-second resolution and
//! formatted back at a chosen [`TimePrecision`].

use crate::{DcrError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// Capture: 1) weeks 2) days 3) hours 4) minutes 5) seconds
static ISO_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").unwrap()
});

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;

/// Smallest unit kept when a duration is printed on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimePrecision {
    #[default]
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimePrecision {
    /// The rendering of a zero duration at this precision; such labels are not drawn.
    pub fn zero_label(self) -> &'static str {
        match self {
            TimePrecision::Days => "P0D",
            TimePrecision::Hours => "P0DT0H",
            TimePrecision::Minutes => "P0DT0H0M",
            TimePrecision::Seconds => "P0DT0H0M0S",
        }
    }
}

impl FromStr for TimePrecision {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "D" | "DAYS" => Ok(TimePrecision::Days),
            "H" | "HOURS" => Ok(TimePrecision::Hours),
            "M" | "MINUTES" => Ok(TimePrecision::Minutes),
            "S" | "SECONDS" => Ok(TimePrecision::Seconds),
            other => Err(format!("unknown time precision {other:?} (expected D, H, M or S)")),
        }
    }
}

impl fmt::Display for TimePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimePrecision::Days => "D",
            TimePrecision::Hours => "H",
            TimePrecision::Minutes => "M",
            TimePrecision::Seconds => "S",
        };
        f.write_str(s)
    }
}

/// Parse an ISO-8601 duration (weeks, days, hours, minutes, seconds).
pub fn parse_iso_duration(s: &str) -> Result<Duration> {
    let invalid = || DcrError::InvalidDuration {
        value: s.to_string(),
    };

    let s = s.trim();
    let caps = ISO_DURATION_RE.captures(s).ok_or_else(invalid)?;

    // "P" and "PT" match the pattern but carry no component.
    if caps.iter().skip(1).all(|c| c.is_none()) || s.ends_with('T') {
        return Err(invalid());
    }

    let units = [SECS_PER_WEEK, SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE, 1];
    let mut total: u64 = 0;
    for (i, unit) in units.iter().enumerate() {
        if let Some(m) = caps.get(i + 1) {
            let n: u64 = m.as_str().parse().map_err(|_| invalid())?;
            total = n
                .checked_mul(*unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(invalid)?;
        }
    }

    Ok(Duration::from_secs(total))
}

/// Format a duration down to `precision`, truncating smaller units.
pub fn format_iso_duration(duration: Duration, precision: TimePrecision) -> String {
    let total = duration.as_secs();
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    match precision {
        TimePrecision::Days => format!("P{days}D"),
        TimePrecision::Hours => format!("P{days}DT{hours}H"),
        TimePrecision::Minutes => format!("P{days}DT{hours}H{minutes}M"),
        TimePrecision::Seconds => format!("P{days}DT{hours}H{minutes}M{seconds}S"),
    }
}

/// Edge label for a duration, or `None` when it rounds to zero at `precision`.
pub fn duration_label(duration: Duration, precision: TimePrecision) -> Option<String> {
    let text = format_iso_duration(duration, precision);
    if text == precision.zero_label() {
        None
    } else {
        Some(text)
    }
}

/// Template representation of a duration: an ISO-8601 string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDuration(pub Duration);

impl Serialize for IsoDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_iso_duration(self.0, TimePrecision::Seconds))
    }
}

impl<'de> Deserialize<'de> for IsoDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_iso_duration(&s).map(IsoDuration).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_mixed_components() {
        let d = parse_iso_duration("P1DT2H30M").unwrap();
        assert_eq!(d.as_secs(), SECS_PER_DAY + 2 * SECS_PER_HOUR + 30 * SECS_PER_MINUTE);
        assert_eq!(parse_iso_duration("P2W").unwrap().as_secs(), 14 * SECS_PER_DAY);
        assert_eq!(parse_iso_duration("PT45S").unwrap().as_secs(), 45);
    }

    #[test]
    fn rejects_empty_and_garbage() {
        for bad in ["", "P", "PT", "P1DT", "1D", "P1H", "PT-3H"] {
            assert!(
                matches!(parse_iso_duration(bad), Err(DcrError::InvalidDuration { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn formats_at_each_precision() {
        let d = parse_iso_duration("P3DT4H5M6S").unwrap();
        assert_eq!(format_iso_duration(d, TimePrecision::Days), "P3D");
        assert_eq!(format_iso_duration(d, TimePrecision::Hours), "P3DT4H");
        assert_eq!(format_iso_duration(d, TimePrecision::Minutes), "P3DT4H5M");
        assert_eq!(format_iso_duration(d, TimePrecision::Seconds), "P3DT4H5M6S");
    }

    #[test]
    fn sub_precision_durations_are_suppressed() {
        let five_hours = parse_iso_duration("PT5H").unwrap();
        assert_eq!(duration_label(five_hours, TimePrecision::Days), None);
        assert_eq!(
            duration_label(five_hours, TimePrecision::Hours),
            Some("P0DT5H".to_string())
        );
        assert_eq!(duration_label(Duration::ZERO, TimePrecision::Seconds), None);
    }

    #[test]
    fn precision_from_str() {
        assert_eq!("h".parse::<TimePrecision>(), Ok(TimePrecision::Hours));
        assert_eq!("Seconds".parse::<TimePrecision>(), Ok(TimePrecision::Seconds));
        assert!("weeks".parse::<TimePrecision>().is_err());
    }
}
