//! Calendar arithmetic for GRIB forecast/statistical-process end times.
//!
//! GRIB expresses durations in one of several time units (minute, hour,
//! day, month, year, …); adding one to a reference instant must follow
//! Gregorian leap-year rules. `chrono` does the actual calendar math, the
//! same dependency the teacher crate gates behind its `time-calculation`
//! feature (`src/time.rs`) — here it is a hard dependency since both
//! editions need reference-time and statistical end-time arithmetic
//! unconditionally.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::DecodeError;

/// GRIB Code Table 4.4 — unit of time for forecast/statistical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
    Decade,
    Normal30Years,
    Century,
    Hours3,
    Hours6,
    Hours12,
    Second,
}

impl TimeUnit {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Minute,
            1 => Self::Hour,
            2 => Self::Day,
            3 => Self::Month,
            4 => Self::Year,
            5 => Self::Decade,
            6 => Self::Normal30Years,
            7 => Self::Century,
            10 => Self::Hours3,
            11 => Self::Hours6,
            12 => Self::Hours12,
            13 => Self::Second,
            _ => return None,
        })
    }

    pub fn to_code(self) -> u8 {
        match self {
            Self::Minute => 0,
            Self::Hour => 1,
            Self::Day => 2,
            Self::Month => 3,
            Self::Year => 4,
            Self::Decade => 5,
            Self::Normal30Years => 6,
            Self::Century => 7,
            Self::Hours3 => 10,
            Self::Hours6 => 11,
            Self::Hours12 => 12,
            Self::Second => 13,
        }
    }
}

/// A reference instant as decoded from a GRIB section, kept in its own
/// (year, month, day, hour, minute, second) fields since GRIB fields are
/// four-digit years with no timezone, unlike a general-purpose `DateTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    fn to_naive(self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?;
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, self.second)?;
        Some(NaiveDateTime::new(date, time))
    }

    fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }
}

/// Adds `amount` GRIB time-units of `unit` to `start`, following Gregorian
/// leap-year rules (a century year is a leap year only when divisible by
/// 400 — `2100` is not, `2000` is).
pub fn add_time(start: CalendarTime, unit: TimeUnit, amount: i64) -> Result<CalendarTime, DecodeError> {
    let naive = start
        .to_naive()
        .ok_or(DecodeError::UnsupportedPacking { reason: "invalid reference time" })?;

    let result = match unit {
        TimeUnit::Second => naive + Duration::seconds(amount),
        TimeUnit::Minute => naive + Duration::minutes(amount),
        TimeUnit::Hour => naive + Duration::hours(amount),
        TimeUnit::Hours3 => naive + Duration::hours(amount * 3),
        TimeUnit::Hours6 => naive + Duration::hours(amount * 6),
        TimeUnit::Hours12 => naive + Duration::hours(amount * 12),
        TimeUnit::Day => naive + Duration::days(amount),
        TimeUnit::Month => add_months(naive, amount)?,
        TimeUnit::Year => add_months(naive, amount * 12)?,
        TimeUnit::Decade => add_months(naive, amount * 120)?,
        TimeUnit::Normal30Years => add_months(naive, amount * 360)?,
        TimeUnit::Century => add_months(naive, amount * 1200)?,
    };

    Ok(CalendarTime::from_naive(result))
}

fn add_months(naive: NaiveDateTime, months: i64) -> Result<NaiveDateTime, DecodeError> {
    let total_months = naive.year() as i64 * 12 + (naive.month() as i64 - 1) + months;
    let year = total_months.div_euclid(12) as i32;
    let month = (total_months.rem_euclid(12) + 1) as u32;
    // Clamp the day to the last valid day of the target month, matching the
    // usual GRIB convention that never needs fractional-month rollovers
    // (P1/P2 land on whole units).
    let mut day = naive.day();
    loop {
        if NaiveDate::from_ymd_opt(year, month, day).is_some() {
            break;
        }
        day -= 1;
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DecodeError::UnsupportedPacking { reason: "month overflow" })?;
    Ok(NaiveDateTime::new(date, naive.time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_roll_2020() {
        let start = CalendarTime::new(2020, 2, 28, 12, 0, 0);
        let end = add_time(start, TimeUnit::Hour, 48).unwrap();
        assert_eq!(end, CalendarTime::new(2020, 3, 1, 12, 0, 0));
    }

    #[test]
    fn non_leap_century_2100() {
        let start = CalendarTime::new(2100, 2, 28, 12, 0, 0);
        let end = add_time(start, TimeUnit::Hour, 48).unwrap();
        assert_eq!(end, CalendarTime::new(2100, 3, 2, 12, 0, 0));
    }

    #[test]
    fn statistical_end_time_scenario() {
        // yr=2017, mo=7, dy=10, HHMM=0600, fcst_units=hour, P1=0, P2=48
        let start = CalendarTime::new(2017, 7, 10, 6, 0, 0);
        let end = add_time(start, TimeUnit::Hour, 48).unwrap();
        assert_eq!(end, CalendarTime::new(2017, 7, 12, 6, 0, 0));
    }

    #[test]
    fn month_unit_clamps_day() {
        let start = CalendarTime::new(2024, 1, 31, 0, 0, 0);
        let end = add_time(start, TimeUnit::Month, 1).unwrap();
        assert_eq!(end, CalendarTime::new(2024, 2, 29, 0, 0, 0));
    }

    #[test]
    fn time_unit_code_roundtrip() {
        for code in [0, 1, 2, 3, 4, 5, 6, 7, 10, 11, 12, 13] {
            let unit = TimeUnit::from_code(code).unwrap();
            assert_eq!(unit.to_code(), code);
        }
        assert!(TimeUnit::from_code(8).is_none());
    }
}
