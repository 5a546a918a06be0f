//! Reduction of a duration to a single unit.
//!
//! Two paths exist, and they disagree for months and years:
//!
//! - [`to_milliseconds`] sums each field times its unit factor. It does not
//!   depend on any date, and months and years use their mean lengths.
//! - [`to_milliseconds_at`] applies the duration to a reference date with
//!   [`apply`] and measures the elapsed time, so "1 month" from February 1
//!   is 28 or 29 days.
//!
//! The per-unit converters divide either result by the target unit's
//! factor. Nothing is rounded.

use tracing::debug;

use crate::apply::apply;
use crate::date_input::{DateInput, coerce_date};
use crate::duration::{Duration, TimeInput};
use crate::error::Result;
use crate::parse::parse;
use crate::units::{UNITS, Unit};

pub fn to_milliseconds(time: impl Into<TimeInput>) -> Result<f64> {
    Ok(net_millis(&parse(time)?))
}

pub fn to_milliseconds_at(time: impl Into<TimeInput>, reference: impl Into<DateInput>) -> Result<f64> {
    let reference = coerce_date(reference)?;
    let end = apply(reference, time)?;
    let elapsed = (end.epoch_millis() - reference.epoch_millis()) as f64;
    debug!(%reference, %end, elapsed, "measured duration against reference date");
    Ok(elapsed)
}

pub fn to_unit(unit: Unit, time: impl Into<TimeInput>) -> Result<f64> {
    Ok(to_milliseconds(time)? / unit.millis())
}

pub fn to_unit_at(unit: Unit, time: impl Into<TimeInput>, reference: impl Into<DateInput>) -> Result<f64> {
    Ok(to_milliseconds_at(time, reference)? / unit.millis())
}

/// Algebraic sum of every field's contribution, in milliseconds.
pub(crate) fn net_millis(duration: &Duration) -> f64 {
    UNITS
        .iter()
        .fold(0.0, |total, spec| total + duration.get(spec.unit) * spec.millis)
}

macro_rules! unit_converters {
    ($($name:ident, $name_at:ident => $unit:ident, $label:literal, $example:literal;)*) => {
        $(
            #[doc = concat!("Convert to ", $label, ".")]
            #[doc = ""]
            #[doc = concat!("```\n", $example, "\n```")]
            pub fn $name(time: impl Into<TimeInput>) -> Result<f64> {
                to_unit(Unit::$unit, time)
            }

            #[doc = concat!(
                "Convert to ", $label, ", measuring calendar units from `reference`."
            )]
            pub fn $name_at(time: impl Into<TimeInput>, reference: impl Into<DateInput>) -> Result<f64> {
                to_unit_at(Unit::$unit, time, reference)
            }
        )*
    };
}

unit_converters! {
    to_seconds, to_seconds_at => Seconds, "seconds",
        "assert_eq!(duration_fns::to_seconds(\"2m\").unwrap(), 120.0);";
    to_minutes, to_minutes_at => Minutes, "minutes",
        "assert_eq!(duration_fns::to_minutes(\"1h 10m\").unwrap(), 70.0);";
    to_hours, to_hours_at => Hours, "hours",
        "assert_eq!(duration_fns::to_hours(\"1d\").unwrap(), 24.0);";
    to_days, to_days_at => Days, "days",
        "assert_eq!(duration_fns::to_days(\"12h\").unwrap(), 0.5);";
    to_weeks, to_weeks_at => Weeks, "weeks",
        "assert_eq!(duration_fns::to_weeks(\"14d\").unwrap(), 2.0);";
    to_months, to_months_at => Months, "months, using the mean month length",
        "assert_eq!(duration_fns::to_months(\"1y\").unwrap(), 12.0);";
    to_years, to_years_at => Years, "years, using the mean year length",
        "assert_eq!(duration_fns::to_years(\"24mo\").unwrap(), 2.0);";
}
