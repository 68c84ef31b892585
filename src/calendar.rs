// 🌙 Calendar Conversion - Hebrew ⇄ Gregorian
//
// The validator only talks to the `CalendarConverter` trait. `HebrewCalendar` is
// the bundled implementation: fixed day numbers (day 1 = 0001-01-01 Gregorian),
// molad-based new year with the postponement rules, 19-year leap cycle.

use crate::gematria::{encode, format_hebrew_year};
use crate::months::{display_name, TISHREI};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Hebrew year {0} is outside the supported range 1-9999")]
    YearOutOfRange(i32),

    #[error("month {month} does not exist in Hebrew year {year}")]
    InvalidMonth { month: u32, year: i32 },

    #[error("day {day} does not exist in month {month} of Hebrew year {year} ({length} days)")]
    InvalidDay {
        day: u32,
        month: u32,
        year: i32,
        length: u32,
    },

    #[error("Gregorian date {0} is outside the supported range")]
    DateOutOfRange(NaiveDate),
}

/// A Hebrew calendar date as returned by the converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HebrewDate {
    pub day: u32,
    pub month: u32,
    pub month_name: String,
    pub year: i32,
}

impl HebrewDate {
    /// Render in Hebrew letters, e.g. ד׳ טבת תש״נ
    pub fn format_hebrew(&self) -> String {
        let day = encode(self.day).unwrap_or_else(|| self.day.to_string());
        let year = format_hebrew_year(self.year).unwrap_or_else(|| self.year.to_string());
        format!("{} {} {}", day, self.month_name, year)
    }
}

/// Exact conversion between the two calendars.
///
/// Months are numbered from Nisan (1) to Adar II (13). Errors mean "this date
/// does not exist", never an I/O problem.
pub trait CalendarConverter: Send + Sync {
    fn hebrew_to_gregorian(&self, day: u32, month: u32, year: i32) -> Result<NaiveDate, CalendarError>;

    fn gregorian_to_hebrew(&self, date: NaiveDate) -> Result<HebrewDate, CalendarError>;
}

// ============================================================================
// HEBREW CALENDAR ARITHMETIC
// ============================================================================

/// Fixed day number of 1 Tishrei AM 1
const HEBREW_EPOCH: i64 = -1_373_427;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Mean year length as a fraction: 35975351 / 98496 days
const MEAN_YEAR_NUMERATOR: i64 = 35_975_351;
const MEAN_YEAR_DENOMINATOR: i64 = 98_496;

/// Arithmetic Hebrew calendar
#[derive(Debug, Clone, Copy, Default)]
pub struct HebrewCalendar;

impl HebrewCalendar {
    pub fn new() -> Self {
        HebrewCalendar
    }

    pub fn is_leap_year(year: i32) -> bool {
        is_leap(i64::from(year))
    }

    /// Number of days in a month, or `None` if the month is not in that year
    pub fn month_length(month: u32, year: i32) -> Option<u32> {
        let year = i64::from(year);
        (1..=last_month(year))
            .contains(&month)
            .then(|| month_length(month, year))
    }

    pub fn days_in_year(year: i32) -> i64 {
        days_in_year(i64::from(year))
    }
}

fn is_leap(year: i64) -> bool {
    (7 * year + 1).rem_euclid(19) < 7
}

fn last_month(year: i64) -> u32 {
    if is_leap(year) {
        13
    } else {
        12
    }
}

/// Days from the epoch to the molad of Tishrei, with the weekday postponement
fn elapsed_days(year: i64) -> i64 {
    let months = (235 * year - 234).div_euclid(19);
    let parts = 12_084 + 13_753 * months;
    let days = 29 * months + parts.div_euclid(25_920);

    if (3 * (days + 1)).rem_euclid(7) < 3 {
        days + 1
    } else {
        days
    }
}

/// Keeps year lengths within 353-355 / 383-385
fn year_length_correction(year: i64) -> i64 {
    let previous = elapsed_days(year - 1);
    let current = elapsed_days(year);
    let next = elapsed_days(year + 1);

    if next - current == 356 {
        2
    } else if current - previous == 382 {
        1
    } else {
        0
    }
}

fn new_year(year: i64) -> i64 {
    HEBREW_EPOCH + elapsed_days(year) + year_length_correction(year)
}

fn days_in_year(year: i64) -> i64 {
    new_year(year + 1) - new_year(year)
}

fn long_marheshvan(year: i64) -> bool {
    days_in_year(year).rem_euclid(10) == 5
}

fn short_kislev(year: i64) -> bool {
    days_in_year(year).rem_euclid(10) == 3
}

fn month_length(month: u32, year: i64) -> u32 {
    match month {
        2 | 4 | 6 | 10 | 13 => 29,
        12 if !is_leap(year) => 29,
        8 if !long_marheshvan(year) => 29,
        9 if short_kislev(year) => 29,
        _ => 30,
    }
}

/// The year starts at Tishrei: Nisan..Elul follow Tishrei..Adar of the same year
fn fixed_from_hebrew(year: i64, month: u32, day: u32) -> i64 {
    let mut fixed = new_year(year) + i64::from(day) - 1;

    if month < TISHREI {
        for m in TISHREI..=last_month(year) {
            fixed += i64::from(month_length(m, year));
        }
        for m in 1..month {
            fixed += i64::from(month_length(m, year));
        }
    } else {
        for m in TISHREI..month {
            fixed += i64::from(month_length(m, year));
        }
    }

    fixed
}

fn hebrew_from_fixed(fixed: i64) -> (i64, u32, u32) {
    let approx = ((fixed - HEBREW_EPOCH) * MEAN_YEAR_DENOMINATOR).div_euclid(MEAN_YEAR_NUMERATOR) + 1;
    let mut year = approx - 1;
    while new_year(year + 1) <= fixed {
        year += 1;
    }

    let first_month = if fixed < fixed_from_hebrew(year, 1, 1) {
        TISHREI
    } else {
        1
    };

    let month = (first_month..=last_month(year))
        .find(|&m| fixed <= fixed_from_hebrew(year, m, month_length(m, year)))
        .unwrap_or_else(|| last_month(year));

    let day = fixed - fixed_from_hebrew(year, month, 1) + 1;
    (year, month, day as u32)
}

// ============================================================================
// CONVERTER
// ============================================================================

impl CalendarConverter for HebrewCalendar {
    fn hebrew_to_gregorian(&self, day: u32, month: u32, year: i32) -> Result<NaiveDate, CalendarError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::YearOutOfRange(year));
        }

        let length = HebrewCalendar::month_length(month, year)
            .ok_or(CalendarError::InvalidMonth { month, year })?;

        if day == 0 || day > length {
            return Err(CalendarError::InvalidDay {
                day,
                month,
                year,
                length,
            });
        }

        let fixed = fixed_from_hebrew(i64::from(year), month, day);
        i32::try_from(fixed)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or(CalendarError::YearOutOfRange(year))
    }

    fn gregorian_to_hebrew(&self, date: NaiveDate) -> Result<HebrewDate, CalendarError> {
        let (year, month, day) = hebrew_from_fixed(i64::from(date.num_days_from_ce()));

        let year = i32::try_from(year)
            .ok()
            .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
            .ok_or(CalendarError::DateOutOfRange(date))?;

        let month_name = display_name(month, HebrewCalendar::is_leap_year(year))
            .unwrap_or_default()
            .to_string();

        Ok(HebrewDate {
            day,
            month,
            month_name,
            year,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
