use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::calendar::{self, CalendarFields, Instant};
use crate::error::{Error, Result};

/// Anything that can be coerced to an [`Instant`].
#[derive(Clone, Debug, PartialEq)]
pub enum DateInput {
    Instant(Instant),
    /// Milliseconds since the Unix epoch.
    EpochMillis(f64),
    /// ISO 8601, RFC 3339 or RFC 2822 text.
    Text(String),
    DateTime(DateTime<Utc>),
    System(SystemTime),
}

impl From<Instant> for DateInput {
    fn from(i: Instant) -> DateInput {
        DateInput::Instant(i)
    }
}

impl From<&Instant> for DateInput {
    fn from(i: &Instant) -> DateInput {
        DateInput::Instant(*i)
    }
}

impl From<f64> for DateInput {
    fn from(ms: f64) -> DateInput {
        DateInput::EpochMillis(ms)
    }
}

impl From<i64> for DateInput {
    fn from(ms: i64) -> DateInput {
        DateInput::EpochMillis(ms as f64)
    }
}

impl From<&str> for DateInput {
    fn from(s: &str) -> DateInput {
        DateInput::Text(s.to_string())
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> DateInput {
        DateInput::Text(s)
    }
}

impl<Tz: chrono::TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(dt: DateTime<Tz>) -> DateInput {
        DateInput::DateTime(dt.with_timezone(&Utc))
    }
}

impl From<SystemTime> for DateInput {
    fn from(t: SystemTime) -> DateInput {
        DateInput::System(t)
    }
}

pub fn coerce_date(input: impl Into<DateInput>) -> Result<Instant> {
    match input.into() {
        DateInput::Instant(i) => Ok(i),
        DateInput::EpochMillis(ms) => {
            let invalid = || Error::InvalidDate { input: ms.to_string() };
            let t = calendar::time_clip(ms).map_err(|_| invalid())?;
            Instant::from_epoch_millis(t).map_err(|_| invalid())
        }
        DateInput::Text(s) => {
            let invalid = || Error::InvalidDate { input: s.clone() };
            let t = parse_date_string(&s).ok_or_else(invalid)?;
            Instant::from_epoch_millis(t).map_err(|_| invalid())
        }
        DateInput::DateTime(dt) => Instant::from_epoch_millis(dt.timestamp_millis())
            .map_err(|_| Error::InvalidDate { input: dt.to_rfc3339() }),
        DateInput::System(t) => {
            let ms = match t.duration_since(SystemTime::UNIX_EPOCH) {
                Ok(d) => d.as_millis() as f64,
                Err(e) => -(e.duration().as_millis() as f64),
            };
            calendar::time_clip(ms)
                .and_then(Instant::from_epoch_millis)
                .map_err(|_| Error::InvalidDate { input: format!("{t:?}") })
        }
    }
}

fn parse_date_string(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(t) = parse_iso_date(s) {
        return Some(t);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    None
}

// YYYY, YYYY-MM, YYYY-MM-DD and YYYY-MM-DDTHH:MM[:SS[.fff]] with an optional
// Z or ±HH[:]MM offset. Without an offset the time is taken as UTC.
fn parse_iso_date(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    let (year, pos) = parse_iso_year(s)?;
    let mut fields = CalendarFields {
        year,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
    };

    if pos >= len {
        return Instant::from_fields(fields).ok().map(|i| i.epoch_millis());
    }

    if bytes[pos] != b'-' {
        return None;
    }
    let pos = pos + 1;
    fields.month = s.get(pos..pos + 2)?.parse().ok()?;
    if !(1..=12).contains(&fields.month) {
        return None;
    }
    let pos = pos + 2;

    if pos >= len {
        return Instant::from_fields(fields).ok().map(|i| i.epoch_millis());
    }

    if bytes[pos] != b'-' {
        return None;
    }
    let pos = pos + 1;
    fields.day = s.get(pos..pos + 2)?.parse().ok()?;
    if !(1..=31).contains(&fields.day) {
        return None;
    }
    let pos = pos + 2;

    if pos >= len {
        return Instant::from_fields(fields).ok().map(|i| i.epoch_millis());
    }

    if bytes[pos] != b'T' && bytes[pos] != b't' && bytes[pos] != b' ' {
        return None;
    }
    let pos = pos + 1;

    fields.hour = s.get(pos..pos + 2)?.parse().ok()?;
    let pos = pos + 2;
    if pos >= len || bytes[pos] != b':' {
        return None;
    }
    let pos = pos + 1;
    fields.minute = s.get(pos..pos + 2)?.parse().ok()?;
    let mut pos = pos + 2;

    if pos < len && bytes[pos] == b':' {
        pos += 1;
        fields.second = s.get(pos..pos + 2)?.parse().ok()?;
        pos += 2;
        if pos < len && bytes[pos] == b'.' {
            pos += 1;
            let frac_start = pos;
            while pos < len && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let frac_str = s.get(frac_start..pos)?;
            fields.millisecond = match frac_str.len() {
                0 => return None,
                1 => frac_str.parse::<i64>().ok()? * 100,
                2 => frac_str.parse::<i64>().ok()? * 10,
                _ => frac_str[..3].parse::<i64>().ok()?,
            };
        }
    }
    if fields.hour > 24 || fields.minute > 59 || fields.second > 59 {
        return None;
    }
    // 24:00 is the end of the day; no later time on hour 24 exists.
    if fields.hour == 24 && (fields.minute, fields.second, fields.millisecond) != (0, 0, 0) {
        return None;
    }

    let dt = Instant::from_fields(fields).ok()?.epoch_millis();

    if pos >= len {
        return Some(dt);
    }

    let ch = bytes[pos];
    if (ch == b'Z' || ch == b'z') && pos + 1 == len {
        return Some(dt);
    }

    if ch == b'+' || ch == b'-' {
        let sign: i64 = if ch == b'+' { 1 } else { -1 };
        let pos = pos + 1;
        let tz_hour: i64 = s.get(pos..pos + 2)?.parse().ok()?;
        let pos = pos + 2;
        let (tz_min, end): (i64, usize) = if pos < len && bytes[pos] == b':' {
            (s.get(pos + 1..pos + 3)?.parse().ok()?, pos + 3)
        } else if pos < len {
            (s.get(pos..pos + 2)?.parse().ok()?, pos + 2)
        } else {
            (0, pos)
        };
        if end != len || tz_hour > 23 || tz_min > 59 {
            return None;
        }
        let offset = sign * (tz_hour * 60 + tz_min) * 60_000;
        return Some(dt - offset);
    }

    None
}

fn parse_iso_year(s: &str) -> Option<(i64, usize)> {
    let bytes = s.as_bytes();
    match *bytes.first()? {
        b'+' | b'-' => {
            // Extended year ±YYYYYY
            let sign: i64 = if bytes[0] == b'+' { 1 } else { -1 };
            let digits = s.get(1..7)?;
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some((sign * digits.parse::<i64>().ok()?, 7))
        }
        _ => {
            let digits = s.get(0..4)?;
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some((digits.parse().ok()?, 4))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(input: &str) -> i64 {
        coerce_date(input).unwrap().epoch_millis()
    }

    #[test]
    fn iso_forms() {
        assert_eq!(ms("1970-01-01"), 0);
        assert_eq!(ms("1970"), 0);
        assert_eq!(ms("1970-02"), 31 * 86_400_000);
        assert_eq!(ms("2024-02-29T12:34:56.789Z"), 1_709_210_096_789);
        assert_eq!(ms("2024-02-29T12:34:56.789"), 1_709_210_096_789);
        assert_eq!(ms("2024-02-29T12:34"), 1_709_210_040_000);
        assert_eq!(ms("2024-02-29 12:34:56.7Z"), 1_709_210_096_700);
        assert_eq!(ms("+002024-02-29T12:34:56.789Z"), 1_709_210_096_789);
    }

    #[test]
    fn hour_24_is_only_midnight() {
        assert_eq!(ms("1970-01-01T24:00"), 86_400_000);
        assert_eq!(ms("1970-01-01T24:00:00.000Z"), 86_400_000);
        for s in ["1970-01-01T24:59", "1970-01-01T24:00:01", "1970-01-01T24:00:00.001Z"] {
            assert!(matches!(coerce_date(s), Err(Error::InvalidDate { .. })), "{s:?} should be rejected");
        }
    }

    #[test]
    fn offsets() {
        assert_eq!(ms("1970-01-01T01:00:00+01:00"), 0);
        assert_eq!(ms("1970-01-01T00:00:00-0130"), 5_400_000);
        assert_eq!(ms("1970-01-01T01:00+01"), 0);
    }

    #[test]
    fn chrono_fallbacks() {
        assert_eq!(ms("Thu, 01 Jan 1970 00:00:01 +0000"), 1_000);
        assert_eq!(ms("Fri, 02 Jan 1970 00:00:00 GMT"), 86_400_000);
    }

    #[test]
    fn non_text_inputs() {
        assert_eq!(coerce_date(1_000.9).unwrap().epoch_millis(), 1_000);
        assert_eq!(coerce_date(-5_i64).unwrap().epoch_millis(), -5);
        let dt = DateTime::from_timestamp_millis(123_456).unwrap();
        assert_eq!(coerce_date(dt).unwrap().epoch_millis(), 123_456);
        let st = SystemTime::UNIX_EPOCH + std::time::Duration::from_millis(42);
        assert_eq!(coerce_date(st).unwrap().epoch_millis(), 42);
        let st = SystemTime::UNIX_EPOCH - std::time::Duration::from_millis(42);
        assert_eq!(coerce_date(st).unwrap().epoch_millis(), -42);
        let i = Instant::from_epoch_millis(7).unwrap();
        assert_eq!(coerce_date(i).unwrap(), i);
    }

    #[test]
    fn rejects_invalid() {
        for s in ["", "yesterday", "2024-13-01", "2024-02-30T25:00", "2024-1-1", "2024-02-29T12:34:56Zjunk"] {
            assert!(
                matches!(coerce_date(s), Err(Error::InvalidDate { .. })),
                "{s:?} should be rejected"
            );
        }
        assert!(matches!(coerce_date(f64::NAN), Err(Error::InvalidDate { .. })));
        assert!(matches!(coerce_date(1e16), Err(Error::InvalidDate { .. })));
    }
}
