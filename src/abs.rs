use crate::convert::net_millis;
use crate::duration::{Duration, TimeInput};
use crate::error::Result;
use crate::parse::parse;

/// The duration with a non-negative net effect.
///
/// The sign is chosen once for the whole duration from its anchor-free net
/// millisecond value. A negative duration has every field negated; any other
/// duration is returned as is, so individual fields may stay negative:
///
/// ```
/// use duration_fns::{Duration, abs};
///
/// let d = Duration { hours: -2.0, seconds: 10.0, ..Duration::ZERO };
/// assert_eq!(abs(d).unwrap(), Duration { hours: 2.0, seconds: -10.0, ..Duration::ZERO });
/// ```
pub fn abs(time: impl Into<TimeInput>) -> Result<Duration> {
    let duration = parse(time)?;
    if net_millis(&duration) < 0.0 {
        Ok(duration.negated())
    } else {
        Ok(duration)
    }
}
