use tracing::{debug, trace};

use crate::calendar::Instant;
use crate::date_input::{DateInput, coerce_date};
use crate::duration::{Duration, TimeInput};
use crate::error::{Error, Result};
use crate::parse::parse;
use crate::units::{UNITS, Unit};

// Beyond this many years or months any reference date leaves the
// representable range, so the step is rejected before integer conversion.
const MAX_CALENDAR_STEP: f64 = 1e9;

/// Shift a date by a duration.
///
/// Years are added to the calendar year, then months to the calendar month,
/// each step normalizing overflow the way `Date.UTC` does (February 29 plus
/// one year is March 1; January 31 plus one month is March 2 or 3).
/// Fractional years and months are truncated toward zero. The fixed units
/// are then summed into one millisecond offset and added linearly.
pub fn apply(reference: impl Into<DateInput>, time: impl Into<TimeInput>) -> Result<Instant> {
    let start = coerce_date(reference)?;
    let duration = parse(time)?;

    let mut instant = start;
    for unit in [Unit::Years, Unit::Months] {
        let step = calendar_step(instant, unit, duration.get(unit))?;
        if step == 0 {
            continue;
        }
        let mut fields = instant.fields();
        match unit {
            Unit::Years => fields.year += step,
            _ => fields.month += step,
        }
        instant = Instant::from_fields(fields)?;
        trace!(%unit, step, %instant, "applied calendar step");
    }

    let offset = linear_millis(&duration);
    let end = instant.add_millis(offset)?;
    debug!(%start, duration = %duration, %end, "applied duration");
    Ok(end)
}

fn calendar_step(instant: Instant, unit: Unit, value: f64) -> Result<i64> {
    let whole = value.trunc();
    if whole.abs() > MAX_CALENDAR_STEP {
        return Err(Error::OutOfRange {
            epoch_millis: instant.epoch_millis() as f64 + whole * unit.millis(),
        });
    }
    Ok(whole as i64)
}

/// Milliseconds contributed by the fixed-length units.
fn linear_millis(duration: &Duration) -> f64 {
    UNITS
        .iter()
        .filter(|spec| !spec.unit.is_calendar())
        .fold(0.0, |total, spec| total + duration.get(spec.unit) * spec.millis)
}
