use crate::units::Unit;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A unit field, or the millisecond total, is NaN or infinite.
    #[error("invalid duration input: {} value {value} is not a finite number", field_label(.field))]
    InvalidInput { field: Option<Unit>, value: f64 },

    #[error("invalid date: {input:?}")]
    InvalidDate { input: String },

    #[error("invalid duration string: {input:?}")]
    InvalidDurationString { input: String },

    /// Date arithmetic left the representable range of ±8.64e15 ms.
    #[error("date out of range: {epoch_millis} ms from the epoch")]
    OutOfRange { epoch_millis: f64 },
}

fn field_label(field: &Option<Unit>) -> &'static str {
    match field {
        Some(unit) => unit.name(),
        None => "millisecond total",
    }
}
