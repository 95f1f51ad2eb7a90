//! Element-set epoch handling: the `YYDDD.dddddd` encoding, day counts from
//! 1950 Jan 0.0, Julian dates and the Greenwich sidereal angle at epoch.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};

use crate::constants::{JD_1950_JAN_0, MINUTES_PER_DAY, SECONDS_PER_DAY};
use crate::error::Sdp4Error;
use crate::kepler::wrap_to_2pi;

/// Julian date as (midnight-aligned whole part, fraction of day).
///
/// The whole part always ends in `.5`. `jday(2020, 2, 11, 13, 57, 0.0)` is
/// `(2458890.5, 0.58125)`.
pub fn jday(year: i32, mon: u32, day: u32, hr: u32, minute: u32, sec: f64) -> (f64, f64) {
    let year_f = year as f64;
    let m = ((mon as f64 + 9.0) / 12.0).floor();
    let jd = 367.0 * year_f - (7.0 * (year_f + m) * 0.25).floor()
        + (275.0 * mon as f64 / 9.0).floor()
        + day as f64
        + 1_721_013.5;
    let fr = (sec + minute as f64 * 60.0 + hr as f64 * 3600.0) / SECONDS_PER_DAY;
    (jd, fr)
}

/// Split Julian date of a UTC instant.
pub fn jday_datetime(t: &DateTime<Utc>) -> (f64, f64) {
    let sec = t.second() as f64 + t.nanosecond() as f64 * 1e-9;
    jday(t.year(), t.month(), t.day(), t.hour(), t.minute(), sec)
}

/// Greenwich sidereal angle (rad) for a day count from 1950 Jan 0.0 UT.
pub fn thetag(ds50: f64) -> f64 {
    wrap_to_2pi(1.729_444_94 + 6.300_388_098_7 * ds50)
}

/// Decoded element-set epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TleEpoch {
    year: i32,
    day_of_year: f64,
    /// Julian date of Jan 1 0h of `year`.
    year_start_jd: f64,
}

impl TleEpoch {
    /// Decodes `YYDDD.dddddd`. Two-digit years below 57 are 20xx, the rest
    /// 19xx.
    pub fn from_yyddd(epoch: f64) -> Result<Self, Sdp4Error> {
        if !epoch.is_finite() || !(0.0..100_000.0).contains(&epoch) {
            return Err(Sdp4Error::InvalidElements(format!(
                "epoch {epoch} is not a YYDDD.dddddd value"
            )));
        }
        let yy = (epoch / 1000.0).floor() as i32;
        let day_of_year = epoch - yy as f64 * 1000.0;
        let year = if yy < 57 { 2000 + yy } else { 1900 + yy };
        Self::from_year_day(year, day_of_year)
    }

    /// Builds an epoch from a four-digit year and a 1-based fractional day.
    pub fn from_year_day(year: i32, day_of_year: f64) -> Result<Self, Sdp4Error> {
        if !day_of_year.is_finite() || !(1.0..367.0).contains(&day_of_year) {
            return Err(Sdp4Error::InvalidElements(format!(
                "epoch day of year {day_of_year} outside [1, 367)"
            )));
        }
        let (year_start_jd, _) = jday(year, 1, 1, 0, 0, 0.0);
        Ok(TleEpoch {
            year,
            day_of_year,
            year_start_jd,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn day_of_year(&self) -> f64 {
        self.day_of_year
    }

    /// Days elapsed since 1950 Jan 0.0 UT (1949-12-31 0h).
    pub fn days_since_1950(&self) -> f64 {
        self.year_start_jd - JD_1950_JAN_0 + self.day_of_year - 1.0
    }

    pub fn julian_date(&self) -> f64 {
        let (jd, fr) = self.julian_date_split();
        jd + fr
    }

    /// Julian date as whole (`.5`) and fractional day, keeping the
    /// sub-day precision of the encoded epoch.
    pub fn julian_date_split(&self) -> (f64, f64) {
        let whole_days = (self.day_of_year - 1.0).floor();
        (
            self.year_start_jd + whole_days,
            self.day_of_year - 1.0 - whole_days,
        )
    }

    /// Minutes from this epoch to the split Julian date `(jd, fr)`.
    pub fn minutes_until(&self, jd: f64, fr: f64) -> f64 {
        let (ejd, efr) = self.julian_date_split();
        ((jd - ejd) + (fr - efr)) * MINUTES_PER_DAY
    }

    /// Greenwich sidereal angle at the epoch.
    pub fn gmst(&self) -> f64 {
        thetag(self.days_since_1950())
    }

    /// The epoch as a UTC instant, to the microsecond.
    pub fn datetime(&self) -> Result<DateTime<Utc>, Sdp4Error> {
        let start = NaiveDate::from_yo_opt(self.year, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                Sdp4Error::InvalidElements(format!("epoch year {} out of range", self.year))
            })?;
        let micros = ((self.day_of_year - 1.0) * SECONDS_PER_DAY * 1e6).round() as i64;
        Ok(start.and_utc() + Duration::microseconds(micros))
    }
}
