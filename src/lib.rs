//! Duration arithmetic over multi-unit, signed durations.
//!
//! A duration can be given as a number of milliseconds, as a set of unit
//! fields ([`PartialDuration`], [`Duration`]) or as text (`"1h 30m"`,
//! `"P1M2D"`). Every operation first canonicalizes its input with [`parse`]
//! into a complete [`Duration`], then:
//!
//! - [`to_milliseconds`] and the per-unit converters ([`to_days`], ...)
//!   reduce it to one number using fixed factors, with mean lengths for
//!   months and years;
//! - the `_at` variants ([`to_milliseconds_at`], [`to_days_at`], ...)
//!   measure it against a reference date instead, so months and years have
//!   their real calendar lengths;
//! - [`apply`] shifts a date by it;
//! - [`abs`] flips its sign when its net effect is negative.
//!
//! ```
//! use duration_fns::{Duration, apply, to_days, to_days_at};
//!
//! assert_eq!(to_days("12h").unwrap(), 0.5);
//! assert_eq!(to_days_at("1 month", "2024-02-01").unwrap(), 29.0);
//! let end = apply("2024-01-31", Duration { months: 1.0, ..Duration::ZERO }).unwrap();
//! assert_eq!(end.to_string(), "2024-03-02T00:00:00.000Z");
//! ```
//!
//! Dates use the proleptic Gregorian calendar in UTC.

pub mod abs;
pub mod apply;
pub mod calendar;
pub mod convert;
pub mod date_input;
pub mod duration;
pub mod error;
pub mod ops;
pub mod parse;
pub mod shorthand;
pub mod units;

pub use abs::abs;
pub use apply::apply;
pub use calendar::{CalendarFields, Instant};
pub use convert::{
    to_days, to_days_at, to_hours, to_hours_at, to_milliseconds, to_milliseconds_at, to_minutes,
    to_minutes_at, to_months, to_months_at, to_seconds, to_seconds_at, to_unit, to_unit_at,
    to_weeks, to_weeks_at, to_years, to_years_at,
};
pub use date_input::{DateInput, coerce_date};
pub use duration::{Duration, PartialDuration, TimeInput};
pub use error::{Error, Result};
pub use ops::{between, is_equal, is_zero, negate, subtract, sum};
pub use parse::parse;
pub use shorthand::tokenize;
pub use units::{UNITS, Unit, UnitSpec};
