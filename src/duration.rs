use std::fmt;
use std::ops::{Add, Index, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// A complete, signed, per-unit span of time.
///
/// Every unit is always present. Fields keep their own signs, so
/// `{ hours: 2, seconds: -10 }` is a valid duration whose net effect is
/// 7190 seconds. Magnitudes are never rebalanced across units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Duration {
    pub years: f64,
    pub months: f64,
    pub weeks: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub milliseconds: f64,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        years: 0.0,
        months: 0.0,
        weeks: 0.0,
        days: 0.0,
        hours: 0.0,
        minutes: 0.0,
        seconds: 0.0,
        milliseconds: 0.0,
    };

    /// Build a duration by computing each field from its unit.
    pub fn from_fn(mut f: impl FnMut(Unit) -> f64) -> Duration {
        Duration {
            years: f(Unit::Years),
            months: f(Unit::Months),
            weeks: f(Unit::Weeks),
            days: f(Unit::Days),
            hours: f(Unit::Hours),
            minutes: f(Unit::Minutes),
            seconds: f(Unit::Seconds),
            milliseconds: f(Unit::Milliseconds),
        }
    }

    pub fn get(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Years => self.years,
            Unit::Months => self.months,
            Unit::Weeks => self.weeks,
            Unit::Days => self.days,
            Unit::Hours => self.hours,
            Unit::Minutes => self.minutes,
            Unit::Seconds => self.seconds,
            Unit::Milliseconds => self.milliseconds,
        }
    }

    /// Copy of `self` with one field replaced.
    pub fn with(self, unit: Unit, value: f64) -> Duration {
        let mut out = self;
        *out.field_mut(unit) = value;
        out
    }

    /// Every field negated. Zero fields stay zero (never `-0`).
    pub fn negated(self) -> Duration {
        Duration::from_fn(|unit| {
            let v = self.get(unit);
            if v == 0.0 { 0.0 } else { -v }
        })
    }

    /// `(unit, value)` pairs, smallest unit first.
    pub fn fields(&self) -> impl DoubleEndedIterator<Item = (Unit, f64)> + '_ {
        Unit::ALL.into_iter().map(move |unit| (unit, self.get(unit)))
    }

    fn field_mut(&mut self, unit: Unit) -> &mut f64 {
        match unit {
            Unit::Years => &mut self.years,
            Unit::Months => &mut self.months,
            Unit::Weeks => &mut self.weeks,
            Unit::Days => &mut self.days,
            Unit::Hours => &mut self.hours,
            Unit::Minutes => &mut self.minutes,
            Unit::Seconds => &mut self.seconds,
            Unit::Milliseconds => &mut self.milliseconds,
        }
    }
}

impl Index<Unit> for Duration {
    type Output = f64;

    fn index(&self, unit: Unit) -> &f64 {
        match unit {
            Unit::Years => &self.years,
            Unit::Months => &self.months,
            Unit::Weeks => &self.weeks,
            Unit::Days => &self.days,
            Unit::Hours => &self.hours,
            Unit::Minutes => &self.minutes,
            Unit::Seconds => &self.seconds,
            Unit::Milliseconds => &self.milliseconds,
        }
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        self.negated()
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration::from_fn(|unit| self.get(unit) + rhs.get(unit))
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        self + rhs.negated()
    }
}

// ISO 8601 rendering: PnYnMnWnDTnHnMnS. When every non-zero field is
// negative the whole duration gets a leading '-'; otherwise negative fields
// carry their own sign. Milliseconds fold into fractional seconds.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nonzero = self.fields().map(|(_, v)| v).filter(|v| *v != 0.0).peekable();
        if nonzero.peek().is_none() {
            return f.write_str("PT0S");
        }
        let all_negative = nonzero.all(|v| v < 0.0);
        let d = if all_negative { self.negated() } else { *self };

        let mut result = String::new();
        if all_negative {
            result.push('-');
        }
        result.push('P');

        for (value, designator) in [(d.years, 'Y'), (d.months, 'M'), (d.weeks, 'W'), (d.days, 'D')] {
            if value != 0.0 {
                result.push_str(&format_number(value));
                result.push(designator);
            }
        }

        let seconds = d.seconds + d.milliseconds / 1_000.0;
        let has_time = d.hours != 0.0 || d.minutes != 0.0 || d.seconds != 0.0 || d.milliseconds != 0.0;
        if has_time {
            result.push('T');
            if d.hours != 0.0 {
                result.push_str(&format_number(d.hours));
                result.push('H');
            }
            if d.minutes != 0.0 {
                result.push_str(&format_number(d.minutes));
                result.push('M');
            }
            if seconds != 0.0 {
                result.push_str(&format_number(seconds));
                result.push('S');
            } else if d.seconds != 0.0 || d.milliseconds != 0.0 {
                // Seconds and milliseconds cancel out exactly.
                result.push_str("0S");
            }
        }
        f.write_str(&result)
    }
}

/// Shortest round-tripping decimal form, without a trailing `.0`.
pub fn format_number(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let mut buf = ryu_js::Buffer::new();
        buf.format(v).to_string()
    }
}

/// A subset of unit fields. Absent fields read as zero once completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialDuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milliseconds: Option<f64>,
}

impl PartialDuration {
    pub fn new() -> PartialDuration {
        PartialDuration::default()
    }

    pub fn get(&self, unit: Unit) -> Option<f64> {
        match unit {
            Unit::Years => self.years,
            Unit::Months => self.months,
            Unit::Weeks => self.weeks,
            Unit::Days => self.days,
            Unit::Hours => self.hours,
            Unit::Minutes => self.minutes,
            Unit::Seconds => self.seconds,
            Unit::Milliseconds => self.milliseconds,
        }
    }

    /// Builder-style setter.
    pub fn set(mut self, unit: Unit, value: f64) -> PartialDuration {
        *self.slot(unit) = Some(value);
        self
    }

    /// Add `value` to a field, treating an absent field as zero.
    pub fn accumulate(&mut self, unit: Unit, value: f64) {
        let slot = self.slot(unit);
        *slot = Some(slot.unwrap_or(0.0) + value);
    }

    pub fn is_empty(&self) -> bool {
        Unit::ALL.iter().all(|unit| self.get(*unit).is_none())
    }

    /// Zero-fill every absent field.
    pub fn into_full(self) -> Duration {
        Duration::from_fn(|unit| self.get(unit).unwrap_or(0.0))
    }

    fn slot(&mut self, unit: Unit) -> &mut Option<f64> {
        match unit {
            Unit::Years => &mut self.years,
            Unit::Months => &mut self.months,
            Unit::Weeks => &mut self.weeks,
            Unit::Days => &mut self.days,
            Unit::Hours => &mut self.hours,
            Unit::Minutes => &mut self.minutes,
            Unit::Seconds => &mut self.seconds,
            Unit::Milliseconds => &mut self.milliseconds,
        }
    }
}

impl From<Duration> for PartialDuration {
    fn from(d: Duration) -> PartialDuration {
        d.fields().fold(PartialDuration::new(), |p, (unit, v)| p.set(unit, v))
    }
}

/// Anything accepted as a span of time.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeInput {
    /// A plain number of milliseconds.
    Millis(f64),
    Fields(PartialDuration),
    /// Shorthand text such as `"1h 30m"` or `"P1DT2H"`.
    Text(String),
}

impl From<f64> for TimeInput {
    fn from(ms: f64) -> TimeInput {
        TimeInput::Millis(ms)
    }
}

impl From<i64> for TimeInput {
    fn from(ms: i64) -> TimeInput {
        TimeInput::Millis(ms as f64)
    }
}

impl From<i32> for TimeInput {
    fn from(ms: i32) -> TimeInput {
        TimeInput::Millis(f64::from(ms))
    }
}

impl From<std::time::Duration> for TimeInput {
    fn from(d: std::time::Duration) -> TimeInput {
        TimeInput::Millis(d.as_secs_f64() * 1_000.0)
    }
}

impl From<PartialDuration> for TimeInput {
    fn from(p: PartialDuration) -> TimeInput {
        TimeInput::Fields(p)
    }
}

impl From<Duration> for TimeInput {
    fn from(d: Duration) -> TimeInput {
        TimeInput::Fields(d.into())
    }
}

impl From<&Duration> for TimeInput {
    fn from(d: &Duration) -> TimeInput {
        TimeInput::Fields((*d).into())
    }
}

impl From<&str> for TimeInput {
    fn from(s: &str) -> TimeInput {
        TimeInput::Text(s.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(s: String) -> TimeInput {
        TimeInput::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negated_keeps_zero_positive() {
        let d = Duration { hours: 2.0, seconds: -10.0, ..Duration::ZERO };
        let n = d.negated();
        assert_eq!(n, Duration { hours: -2.0, seconds: 10.0, ..Duration::ZERO });
        assert!(n.days.is_sign_positive());
        assert_eq!(-n, d);
    }

    #[test]
    fn index_and_with() {
        let d = Duration::ZERO.with(Unit::Weeks, 3.0);
        assert_eq!(d[Unit::Weeks], 3.0);
        assert_eq!(d.get(Unit::Days), 0.0);
        assert_eq!(d.fields().filter(|(_, v)| *v != 0.0).count(), 1);
    }

    #[test]
    fn add_and_sub_are_field_wise() {
        let a = Duration { minutes: 90.0, ..Duration::ZERO };
        let b = Duration { hours: 1.0, minutes: -30.0, ..Duration::ZERO };
        assert_eq!(a + b, Duration { hours: 1.0, minutes: 60.0, ..Duration::ZERO });
        assert_eq!(a - b, Duration { hours: -1.0, minutes: 120.0, ..Duration::ZERO });
    }

    #[test]
    fn partial_into_full_zero_fills() {
        let p = PartialDuration::new().set(Unit::Hours, 1.0).set(Unit::Seconds, -5.0);
        assert_eq!(p.into_full(), Duration { hours: 1.0, seconds: -5.0, ..Duration::ZERO });
        assert!(PartialDuration::new().is_empty());
        assert_eq!(PartialDuration::new().into_full(), Duration::ZERO);
    }

    #[test]
    fn partial_accumulates() {
        let mut p = PartialDuration::new();
        p.accumulate(Unit::Minutes, 10.0);
        p.accumulate(Unit::Minutes, 5.0);
        assert_eq!(p.minutes, Some(15.0));
    }

    #[test]
    fn display_iso() {
        let d = Duration {
            years: 1.0,
            months: 2.0,
            weeks: 3.0,
            days: 4.0,
            hours: 5.0,
            minutes: 6.0,
            seconds: 7.0,
            milliseconds: 8.0,
        };
        assert_eq!(d.to_string(), "P1Y2M3W4DT5H6M7.008S");
        assert_eq!(Duration::ZERO.to_string(), "PT0S");
        assert_eq!(Duration { days: -1.0, hours: -12.0, ..Duration::ZERO }.to_string(), "-P1DT12H");
        assert_eq!(Duration { hours: 2.0, seconds: -10.0, ..Duration::ZERO }.to_string(), "PT2H-10S");
        assert_eq!(Duration { milliseconds: 1500.0, ..Duration::ZERO }.to_string(), "PT1.5S");
        assert_eq!(Duration { days: 0.5, ..Duration::ZERO }.to_string(), "P0.5D");
    }

    #[test]
    fn serde_fills_missing_fields() {
        let d: Duration = serde_json::from_str(r#"{"hours": 2}"#).unwrap();
        assert_eq!(d, Duration { hours: 2.0, ..Duration::ZERO });
        let p: PartialDuration = serde_json::from_str(r#"{"seconds": -1}"#).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"seconds":-1.0}"#);
    }

    #[test]
    fn time_input_conversions() {
        assert_eq!(TimeInput::from(5), TimeInput::Millis(5.0));
        assert_eq!(
            TimeInput::from(std::time::Duration::from_millis(1500)),
            TimeInput::Millis(1500.0)
        );
        assert_eq!(TimeInput::from("1h"), TimeInput::Text("1h".to_string()));
        let d = Duration { days: 1.0, ..Duration::ZERO };
        match TimeInput::from(d) {
            TimeInput::Fields(p) => assert_eq!(p.days, Some(1.0)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
