//! Proleptic Gregorian calendar arithmetic over UTC epoch milliseconds.
//!
//! Day and month arithmetic follows ECMAScript `Date` semantics: month
//! indices overflow into the year, and day-of-month overflow rolls into the
//! following month (January 31 plus one month is March 3, or March 2 in a
//! leap year).

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::units::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

/// Largest representable distance from the epoch: 100,000,000 days.
pub const MAX_EPOCH_MILLIS: f64 = 8.64e15;

pub(crate) fn day(t: f64) -> f64 {
    (t / MS_PER_DAY).floor()
}

pub(crate) fn time_within_day(t: f64) -> f64 {
    t.rem_euclid(MS_PER_DAY)
}

pub(crate) fn days_in_year(y: i64) -> f64 {
    if y % 4 != 0 {
        365.0
    } else if y % 100 != 0 {
        366.0
    } else if y % 400 != 0 {
        365.0
    } else {
        366.0
    }
}

pub(crate) fn day_from_year(y: i64) -> f64 {
    (365 * (y - 1970) + (y - 1969).div_euclid(4) - (y - 1901).div_euclid(100)
        + (y - 1601).div_euclid(400)) as f64
}

pub(crate) fn time_from_year(y: i64) -> f64 {
    day_from_year(y) * MS_PER_DAY
}

pub(crate) fn year_from_time(t: f64) -> i64 {
    let mut lo = (t / MS_PER_DAY / 366.0 + 1970.0).floor() as i64 - 1;
    let mut hi = (t / MS_PER_DAY / 365.0 + 1970.0).ceil() as i64 + 1;
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if time_from_year(mid) <= t {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo - 1
}

fn in_leap_year(t: f64) -> bool {
    days_in_year(year_from_time(t)) == 366.0
}

fn day_within_year(t: f64) -> f64 {
    day(t) - day_from_year(year_from_time(t))
}

/// Zero-based month of `t`.
pub(crate) fn month_from_time(t: f64) -> i64 {
    let d = day_within_year(t) as i64;
    let leap = in_leap_year(t) as i64;
    match d {
        d if d < 31 => 0,
        d if d < 59 + leap => 1,
        d if d < 90 + leap => 2,
        d if d < 120 + leap => 3,
        d if d < 151 + leap => 4,
        d if d < 181 + leap => 5,
        d if d < 212 + leap => 6,
        d if d < 243 + leap => 7,
        d if d < 273 + leap => 8,
        d if d < 304 + leap => 9,
        d if d < 334 + leap => 10,
        _ => 11,
    }
}

/// One-based day of month of `t`.
pub(crate) fn date_from_time(t: f64) -> i64 {
    let d = day_within_year(t) as i64;
    let leap = in_leap_year(t) as i64;
    match month_from_time(t) {
        0 => d + 1,
        1 => d - 30,
        2 => d - 58 - leap,
        3 => d - 89 - leap,
        4 => d - 119 - leap,
        5 => d - 150 - leap,
        6 => d - 180 - leap,
        7 => d - 211 - leap,
        8 => d - 242 - leap,
        9 => d - 272 - leap,
        10 => d - 303 - leap,
        _ => d - 333 - leap,
    }
}

pub(crate) fn make_time(hour: i64, min: i64, sec: i64, ms: i64) -> f64 {
    hour as f64 * MS_PER_HOUR + min as f64 * MS_PER_MINUTE + sec as f64 * MS_PER_SECOND + ms as f64
}

/// Day number of `date` in zero-based `month` of `year`. Both `month` and
/// `date` may lie outside their usual ranges.
pub(crate) fn make_day(year: i64, month: i64, date: i64) -> f64 {
    const MONTH_STARTS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let ym = year + month.div_euclid(12);
    let mn = month.rem_euclid(12);
    let leap = if days_in_year(ym) == 366.0 && mn >= 2 { 1 } else { 0 };
    day_from_year(ym) + (MONTH_STARTS[mn as usize] + leap + date - 1) as f64
}

pub(crate) fn make_date(day: f64, time: f64) -> f64 {
    day * MS_PER_DAY + time
}

/// Validate a time value and truncate it to whole milliseconds.
pub(crate) fn time_clip(time: f64) -> Result<i64> {
    if !time.is_finite() || time.abs() > MAX_EPOCH_MILLIS {
        return Err(Error::OutOfRange { epoch_millis: time });
    }
    Ok(time.trunc() as i64)
}

/// Broken-down UTC calendar fields. `month` is one-based.
///
/// Fields may be out of range when passed to [`Instant::from_fields`];
/// overflow is normalized the way `Date.UTC` does it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millisecond: i64,
}

/// An absolute point in time, in milliseconds since 1970-01-01T00:00:00Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    epoch_millis: i64,
}

impl Instant {
    pub const EPOCH: Instant = Instant { epoch_millis: 0 };

    pub fn from_epoch_millis(epoch_millis: i64) -> Result<Instant> {
        if epoch_millis.unsigned_abs() as f64 > MAX_EPOCH_MILLIS {
            return Err(Error::OutOfRange { epoch_millis: epoch_millis as f64 });
        }
        Ok(Instant { epoch_millis })
    }

    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    pub fn fields(&self) -> CalendarFields {
        let t = self.epoch_millis as f64;
        let within = time_within_day(t) as i64;
        CalendarFields {
            year: year_from_time(t),
            month: month_from_time(t) + 1,
            day: date_from_time(t),
            hour: within / 3_600_000,
            minute: within / 60_000 % 60,
            second: within / 1_000 % 60,
            millisecond: within % 1_000,
        }
    }

    pub fn from_fields(fields: CalendarFields) -> Result<Instant> {
        let day = make_day(fields.year, fields.month - 1, fields.day);
        let time = make_time(fields.hour, fields.minute, fields.second, fields.millisecond);
        Ok(Instant { epoch_millis: time_clip(make_date(day, time))? })
    }

    /// Shift by a linear offset, truncated toward zero to whole milliseconds.
    pub fn add_millis(self, millis: f64) -> Result<Instant> {
        Ok(Instant { epoch_millis: time_clip(self.epoch_millis as f64 + millis.trunc())? })
    }

    pub fn to_chrono(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.epoch_millis)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.fields();
        if (0..=9999).contains(&c.year) {
            write!(f, "{:04}", c.year)?;
        } else if c.year >= 0 {
            write!(f, "+{:06}", c.year)?;
        } else {
            write!(f, "-{:06}", c.year.unsigned_abs())?;
        }
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            c.month, c.day, c.hour, c.minute, c.second, c.millisecond
        )
    }
}
