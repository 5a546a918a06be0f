use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MS_PER_SECOND: f64 = 1_000.0;
pub const MS_PER_MINUTE: f64 = 60_000.0;
pub const MS_PER_HOUR: f64 = 3_600_000.0;
pub const MS_PER_DAY: f64 = 86_400_000.0;
pub const MS_PER_WEEK: f64 = 604_800_000.0;
/// Mean Gregorian month: 365.2425 days / 12.
pub const MS_PER_MONTH: f64 = 2_629_746_000.0;
/// Mean Gregorian year: 365.2425 days.
pub const MS_PER_YEAR: f64 = 31_556_952_000.0;

/// A unit of time, ordered from smallest to largest.
///
/// `Months` and `Years` are calendar-variable: their length in milliseconds
/// is only exact relative to an anchor date. Without one, the mean
/// Gregorian lengths [`MS_PER_MONTH`] and [`MS_PER_YEAR`] are used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

/// Conversion factor of a unit to milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSpec {
    pub unit: Unit,
    pub millis: f64,
}

/// Every supported unit, smallest first. Indexed by `Unit as usize`.
pub const UNITS: [UnitSpec; 8] = [
    UnitSpec { unit: Unit::Milliseconds, millis: 1.0 },
    UnitSpec { unit: Unit::Seconds, millis: MS_PER_SECOND },
    UnitSpec { unit: Unit::Minutes, millis: MS_PER_MINUTE },
    UnitSpec { unit: Unit::Hours, millis: MS_PER_HOUR },
    UnitSpec { unit: Unit::Days, millis: MS_PER_DAY },
    UnitSpec { unit: Unit::Weeks, millis: MS_PER_WEEK },
    UnitSpec { unit: Unit::Months, millis: MS_PER_MONTH },
    UnitSpec { unit: Unit::Years, millis: MS_PER_YEAR },
];

impl Unit {
    pub const ALL: [Unit; 8] = [
        Unit::Milliseconds,
        Unit::Seconds,
        Unit::Minutes,
        Unit::Hours,
        Unit::Days,
        Unit::Weeks,
        Unit::Months,
        Unit::Years,
    ];

    pub fn spec(self) -> &'static UnitSpec {
        &UNITS[self as usize]
    }

    /// Milliseconds in one of this unit.
    pub fn millis(self) -> f64 {
        self.spec().millis
    }

    pub fn is_calendar(self) -> bool {
        matches!(self, Unit::Months | Unit::Years)
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Milliseconds => "milliseconds",
            Unit::Seconds => "seconds",
            Unit::Minutes => "minutes",
            Unit::Hours => "hours",
            Unit::Days => "days",
            Unit::Weeks => "weeks",
            Unit::Months => "months",
            Unit::Years => "years",
        }
    }

    /// Resolve a unit from its plural, singular or abbreviated name.
    /// Matching ignores ASCII case, so `"M"` is minutes, not months.
    pub fn from_name(name: &str) -> Option<Unit> {
        let lower = name.trim().to_ascii_lowercase();
        let unit = match lower.as_str() {
            "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => Unit::Milliseconds,
            "s" | "sec" | "secs" | "second" | "seconds" => Unit::Seconds,
            "m" | "min" | "mins" | "minute" | "minutes" => Unit::Minutes,
            "h" | "hr" | "hrs" | "hour" | "hours" => Unit::Hours,
            "d" | "day" | "days" => Unit::Days,
            "w" | "wk" | "wks" | "week" | "weeks" => Unit::Weeks,
            "mo" | "mos" | "mon" | "mons" | "month" | "months" => Unit::Months,
            "y" | "yr" | "yrs" | "year" | "years" => Unit::Years,
            _ => return None,
        };
        Some(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::from_name(s).ok_or_else(|| format!("unknown time unit {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_unit() {
        for unit in Unit::ALL {
            assert_eq!(unit.spec().unit, unit);
        }
    }

    #[test]
    fn fixed_factors_are_exact() {
        assert_eq!(Unit::Milliseconds.millis(), 1.0);
        assert_eq!(Unit::Seconds.millis(), 1_000.0);
        assert_eq!(Unit::Minutes.millis(), 60_000.0);
        assert_eq!(Unit::Hours.millis(), 3_600_000.0);
        assert_eq!(Unit::Days.millis(), 86_400_000.0);
        assert_eq!(Unit::Weeks.millis(), 604_800_000.0);
    }

    #[test]
    fn calendar_factors_are_mean_gregorian() {
        assert_eq!(Unit::Years.millis(), 365.2425 * MS_PER_DAY);
        assert_eq!(Unit::Months.millis() * 12.0, Unit::Years.millis());
        assert!(Unit::Months.is_calendar());
        assert!(!Unit::Weeks.is_calendar());
    }

    #[test]
    fn units_sort_by_magnitude() {
        for pair in UNITS.windows(2) {
            assert!(pair[0].unit < pair[1].unit);
            assert!(pair[0].millis < pair[1].millis);
        }
    }

    #[test]
    fn unit_names() {
        assert_eq!(Unit::from_name("ms"), Some(Unit::Milliseconds));
        assert_eq!(Unit::from_name("Hours"), Some(Unit::Hours));
        assert_eq!(Unit::from_name("m"), Some(Unit::Minutes));
        assert_eq!(Unit::from_name("mo"), Some(Unit::Months));
        assert_eq!(Unit::from_name("yr"), Some(Unit::Years));
        assert_eq!(Unit::from_name("fortnight"), None);
        assert_eq!("weeks".parse::<Unit>(), Ok(Unit::Weeks));
        assert_eq!(Unit::Days.to_string(), "days");
    }
}
