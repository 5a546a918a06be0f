//! Tokenizer for textual durations.
//!
//! Three forms are accepted:
//!
//! ```text
//! "1500"                 bare number: milliseconds
//! "1h 30m", "2 days, 3 hours and 4 min", "-1.5h", "1h -30m"
//! "P1Y2M3W4DT5H6M7.5S"   ISO 8601
//! ```
//!
//! Whatever `Duration`'s Display impl writes reads back to the same net
//! value. Fields come back unchanged except that fractional seconds are split
//! into seconds and milliseconds, kept to microsecond precision.
//!
//! A sign in front of the first term of the unit-term form applies to
//! every term. Repeated units accumulate.

use std::sync::LazyLock;

use regex::Regex;

use crate::duration::PartialDuration;
use crate::error::{Error, Result};
use crate::units::Unit;

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").unwrap());

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[\s,]*(?:and\s+)?([+-])?\s*(\d+(?:\.\d*)?|\.\d+)\s*([a-z]+)").unwrap()
});

pub fn tokenize(input: &str) -> Result<PartialDuration> {
    let invalid = || Error::InvalidDurationString { input: input.to_string() };
    let s = input.trim();
    if s.is_empty() {
        return Err(invalid());
    }

    if BARE_NUMBER.is_match(s) {
        let ms: f64 = s.parse().map_err(|_| invalid())?;
        return Ok(PartialDuration::new().set(Unit::Milliseconds, ms));
    }

    let unsigned = s.trim_start_matches(['+', '-']);
    if unsigned.starts_with(['P', 'p']) {
        return parse_iso_duration(s).ok_or_else(invalid);
    }

    parse_terms(s).ok_or_else(invalid)
}

fn parse_terms(s: &str) -> Option<PartialDuration> {
    let (global, mut rest) = match s.as_bytes()[0] {
        b'-' => (-1.0, &s[1..]),
        b'+' => (1.0, &s[1..]),
        _ => (1.0, s),
    };

    let mut parsed = PartialDuration::new();
    while let Some(caps) = TERM.captures(rest) {
        let sign = match caps.get(1).map(|m| m.as_str()) {
            Some("-") => -1.0,
            _ => 1.0,
        };
        let value: f64 = caps[2].parse().ok()?;
        let unit = Unit::from_name(&caps[3])?;
        parsed.accumulate(unit, global * sign * value);
        rest = &rest[caps.get(0)?.end()..];
    }

    if parsed.is_empty() || !rest.trim_matches(|c: char| c.is_whitespace() || c == ',').is_empty() {
        return None;
    }
    Some(parsed)
}

// Format: [±]PnYnMnWnDTnHnMnS, each component optional. Components may
// carry their own '-', a fraction or an exponent, as written by `Duration`'s
// Display impl. A fraction stays in its own field, except on seconds where
// it becomes milliseconds.
fn parse_iso_duration(s: &str) -> Option<PartialDuration> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let sign = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            -1.0
        }
        Some(b'+') => {
            pos += 1;
            1.0
        }
        _ => 1.0,
    };

    if !matches!(bytes.get(pos), Some(b'P' | b'p')) {
        return None;
    }
    pos += 1;

    let mut parsed = PartialDuration::new();
    let mut has_t = false;

    while pos < bytes.len() {
        if matches!(bytes[pos], b'T' | b't') {
            has_t = true;
            pos += 1;
            break;
        }
        let (num, new_pos) = parse_duration_number(s, pos)?;
        pos = new_pos;
        let unit = match *bytes.get(pos)? {
            b'Y' | b'y' => Unit::Years,
            b'M' | b'm' => Unit::Months,
            b'W' | b'w' => Unit::Weeks,
            b'D' | b'd' => Unit::Days,
            _ => return None,
        };
        if parsed.get(unit).is_some() {
            return None;
        }
        parsed = parsed.set(unit, sign * num);
        pos += 1;
    }

    if has_t {
        let mut last_time_unit = Unit::Years;
        let mut time_any = false;
        while pos < bytes.len() {
            let (num, new_pos) = parse_duration_number(s, pos)?;
            pos = new_pos;
            let unit = match *bytes.get(pos)? {
                b'H' | b'h' => Unit::Hours,
                b'M' | b'm' => Unit::Minutes,
                b'S' | b's' => Unit::Seconds,
                _ => return None,
            };
            if unit >= last_time_unit {
                return None;
            }
            last_time_unit = unit;
            time_any = true;
            pos += 1;

            if unit == Unit::Seconds && num.fract() != 0.0 {
                let whole = num.trunc();
                // Sub-microsecond noise from the decimal split is dropped.
                let ms = ((num - whole) * 1_000_000.0).round() / 1_000.0;
                parsed = parsed
                    .set(Unit::Seconds, sign * whole)
                    .set(Unit::Milliseconds, sign * ms);
            } else {
                parsed = parsed.set(unit, sign * num);
            }
        }
        if !time_any {
            return None;
        }
    }

    if pos != bytes.len() || parsed.is_empty() {
        return None;
    }
    Some(parsed)
}

// -?digits[(.|,)digits][(e|E)[±]digits]
fn parse_duration_number(s: &str, start: usize) -> Option<(f64, usize)> {
    let bytes = s.as_bytes();
    let digits_from = |mut pos: usize| {
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        pos
    };

    let mut pos = start;
    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
    }
    let int_end = digits_from(pos);
    if int_end == pos {
        return None;
    }
    pos = int_end;

    if matches!(bytes.get(pos), Some(b'.' | b',')) {
        let frac_end = digits_from(pos + 1);
        if frac_end == pos + 1 {
            return None;
        }
        pos = frac_end;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end == exp {
            return None;
        }
        pos = exp_end;
    }

    let value: f64 = s.get(start..pos)?.replace(',', ".").parse().ok()?;
    value.is_finite().then_some((value, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;

    fn full(s: &str) -> Duration {
        tokenize(s).unwrap().into_full()
    }

    #[test]
    fn bare_number_is_milliseconds() {
        assert_eq!(full("1500"), Duration { milliseconds: 1500.0, ..Duration::ZERO });
        assert_eq!(full(" -2.5 "), Duration { milliseconds: -2.5, ..Duration::ZERO });
    }

    #[test]
    fn unit_terms() {
        assert_eq!(full("1h 30m"), Duration { hours: 1.0, minutes: 30.0, ..Duration::ZERO });
        assert_eq!(full("1h30m"), Duration { hours: 1.0, minutes: 30.0, ..Duration::ZERO });
        assert_eq!(
            full("2 days, 3 hours and 4 min"),
            Duration { days: 2.0, hours: 3.0, minutes: 4.0, ..Duration::ZERO }
        );
        assert_eq!(full("1.5h"), Duration { hours: 1.5, ..Duration::ZERO });
        assert_eq!(full("3 Weeks"), Duration { weeks: 3.0, ..Duration::ZERO });
        assert_eq!(full("1y 2mo"), Duration { years: 1.0, months: 2.0, ..Duration::ZERO });
        assert_eq!(full("250ms"), Duration { milliseconds: 250.0, ..Duration::ZERO });
    }

    #[test]
    fn signs() {
        assert_eq!(full("-1h 30m"), Duration { hours: -1.0, minutes: -30.0, ..Duration::ZERO });
        assert_eq!(full("1h -30m"), Duration { hours: 1.0, minutes: -30.0, ..Duration::ZERO });
        assert_eq!(full("-10s"), Duration { seconds: -10.0, ..Duration::ZERO });
        assert_eq!(full("+2d"), Duration { days: 2.0, ..Duration::ZERO });
    }

    #[test]
    fn repeated_units_accumulate() {
        assert_eq!(full("1m 1m 1m"), Duration { minutes: 3.0, ..Duration::ZERO });
    }

    #[test]
    fn iso_durations() {
        assert_eq!(
            full("P1Y2M3W4DT5H6M7S"),
            Duration {
                years: 1.0,
                months: 2.0,
                weeks: 3.0,
                days: 4.0,
                hours: 5.0,
                minutes: 6.0,
                seconds: 7.0,
                milliseconds: 0.0,
            }
        );
        assert_eq!(full("PT1.5S"), Duration { seconds: 1.0, milliseconds: 500.0, ..Duration::ZERO });
        assert_eq!(full("PT1.5H"), Duration { hours: 1.5, ..Duration::ZERO });
        assert_eq!(full("P0.5D"), Duration { days: 0.5, ..Duration::ZERO });
        assert_eq!(full("PT1.5H1M"), Duration { hours: 1.5, minutes: 1.0, ..Duration::ZERO });
        assert_eq!(full("PT1,25S"), Duration { seconds: 1.0, milliseconds: 250.0, ..Duration::ZERO });
        assert_eq!(full("PT1e-4S"), Duration { milliseconds: 0.1, ..Duration::ZERO });
        assert_eq!(full("-P1D"), Duration { days: -1.0, ..Duration::ZERO });
        assert_eq!(full("pt2h-10s"), Duration { hours: 2.0, seconds: -10.0, ..Duration::ZERO });
        assert_eq!(full("-PT0.25S"), Duration { milliseconds: -250.0, ..Duration::ZERO });
        assert_eq!(full("PT-0.5S"), Duration { milliseconds: -500.0, ..Duration::ZERO });
        assert_eq!(full("-PT-0.5S"), Duration { milliseconds: 500.0, ..Duration::ZERO });
    }

    #[test]
    fn display_output_tokenizes_back() {
        let samples = [
            Duration { hours: 2.0, seconds: -10.0, ..Duration::ZERO },
            Duration { years: -1.0, days: -3.0, ..Duration::ZERO },
            Duration { weeks: 2.0, minutes: 45.0, seconds: 1.0, milliseconds: 250.0, ..Duration::ZERO },
            Duration { hours: 2.0, milliseconds: -500.0, ..Duration::ZERO },
            Duration { days: 0.5, ..Duration::ZERO },
            Duration { years: -0.25, months: -1.5, ..Duration::ZERO },
            Duration { hours: 1.5, minutes: 1.0, ..Duration::ZERO },
            Duration { seconds: 7.0, milliseconds: 8.0, ..Duration::ZERO },
        ];
        for d in samples {
            assert_eq!(full(&d.to_string()), d, "{d}");
        }
    }

    #[test]
    fn display_output_keeps_net_value() {
        use crate::convert::net_millis;

        let samples = [
            Duration { seconds: 1.5, ..Duration::ZERO },
            Duration { seconds: -1.0, milliseconds: 500.0, ..Duration::ZERO },
            Duration { minutes: 3.0, seconds: 1.0, milliseconds: -1_000.0, ..Duration::ZERO },
        ];
        for d in samples {
            assert_eq!(net_millis(&full(&d.to_string())), net_millis(&d), "{d}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for s in ["", "   ", "soon", "1 fortnight", "h", "1h xyz", "P", "PT", "P1H", "PT1S2H", "P1.D", "PT1e S", "1h,, 2"] {
            assert!(
                matches!(tokenize(s), Err(Error::InvalidDurationString { .. })),
                "{s:?} should be rejected"
            );
        }
    }
}
