use crate::convert::net_millis;
use crate::duration::{Duration, TimeInput};
use crate::error::{Error, Result};
use crate::shorthand::tokenize;

/// Canonicalize any accepted input into a complete [`Duration`].
///
/// A number becomes milliseconds, a partial set of fields is zero-filled,
/// and text goes through [`tokenize`] first. Magnitudes are copied as given:
/// `{ seconds: 90 }` stays 90 seconds. Every field, and the millisecond total
/// they add up to, must be finite.
pub fn parse(input: impl Into<TimeInput>) -> Result<Duration> {
    let duration = match input.into() {
        TimeInput::Millis(ms) => {
            if !ms.is_finite() {
                return Err(Error::InvalidInput { field: None, value: ms });
            }
            Duration { milliseconds: ms, ..Duration::ZERO }
        }
        TimeInput::Fields(partial) => partial.into_full(),
        TimeInput::Text(text) => tokenize(&text)?.into_full(),
    };

    if let Some((unit, value)) = duration.fields().find(|(_, v)| !v.is_finite()) {
        return Err(Error::InvalidInput { field: Some(unit), value });
    }
    // Finite fields can still overflow once scaled to milliseconds.
    let net = net_millis(&duration);
    if !net.is_finite() {
        return Err(Error::InvalidInput { field: None, value: net });
    }
    Ok(duration)
}
