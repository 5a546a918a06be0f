//! Field-wise duration arithmetic. None of these rebalance units.

use crate::convert::net_millis;
use crate::date_input::{DateInput, coerce_date};
use crate::duration::{Duration, TimeInput};
use crate::error::Result;
use crate::parse::parse;

pub fn negate(time: impl Into<TimeInput>) -> Result<Duration> {
    Ok(parse(time)?.negated())
}

pub fn sum<I, T>(times: I) -> Result<Duration>
where
    I: IntoIterator<Item = T>,
    T: Into<TimeInput>,
{
    times
        .into_iter()
        .try_fold(Duration::ZERO, |total, time| Ok(total + parse(time)?))
}

pub fn subtract(a: impl Into<TimeInput>, b: impl Into<TimeInput>) -> Result<Duration> {
    Ok(parse(a)? - parse(b)?)
}

/// Whether the net effect is zero, e.g. `{ hours: 1, minutes: -60 }`.
pub fn is_zero(time: impl Into<TimeInput>) -> Result<bool> {
    Ok(net_millis(&parse(time)?) == 0.0)
}

/// Whether two durations have the same anchor-free net effect.
pub fn is_equal(a: impl Into<TimeInput>, b: impl Into<TimeInput>) -> Result<bool> {
    Ok(net_millis(&parse(a)?) == net_millis(&parse(b)?))
}

/// Elapsed time from `from` to `to`, as milliseconds only.
pub fn between(from: impl Into<DateInput>, to: impl Into<DateInput>) -> Result<Duration> {
    let from = coerce_date(from)?;
    let to = coerce_date(to)?;
    Ok(Duration {
        milliseconds: (to.epoch_millis() - from.epoch_millis()) as f64,
        ..Duration::ZERO
    })
}
