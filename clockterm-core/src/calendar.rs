// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

//! Calendar arithmetic shared by the console workflows and the DST engine.
//!
//! Weekdays follow the clock hardware's convention of 1 = Sunday through
//! 7 = Saturday.

pub const MONTHS_PER_YEAR: u8 = 12;
pub const DAYS_PER_WEEK: u8 = 7;

/// Days in each month of a non-leap year.
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days before the first of each month in a non-leap year.
const CUMULATIVE_DAYS: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

pub fn is_leap_year(year: u32) -> bool {
    ((year % 4 == 0) && (year % 100 != 0)) || (year % 400 == 0)
}

/// Number of days in `month` (1..=12) of `year`, leap-adjusted.
pub fn days_in_month(month: u8, year: u32) -> u8 {
    let mut days = DAYS_IN_MONTH[usize::from(month - 1)];
    if month == 2 && is_leap_year(year) {
        days += 1;
    }
    days
}

/// Weekday of a date, 1 = Sunday through 7 = Saturday.
pub fn day_of_week(day: u8, month: u8, year: u32) -> u8 {
    // Zeller's congruence; January and February count as months 13 and 14
    // of the previous year.
    let (m, y) = if month < 3 {
        (u32::from(month) + 12, year - 1)
    } else {
        (u32::from(month), year)
    };
    let k = y % 100;
    let j = y / 100;
    let h = (u32::from(day) + (13 * (m + 1)) / 5 + k + k / 4 + j / 4 + 5 * j) % 7;
    // Zeller yields 0 = Saturday; rotate so Sunday lands on 1.
    (((h + 6) % 7) + 1) as u8
}

/// Days since 1 January, 0-based (the `tm_yday` convention).
pub fn day_of_year(day: u8, month: u8, year: u32) -> u16 {
    let mut year_day = CUMULATIVE_DAYS[usize::from(month - 1)] + u16::from(day - 1);
    if month >= 3 && is_leap_year(year) {
        year_day += 1;
    }
    year_day
}

/// Week bucket that `day` of the month falls into.
///
/// Buckets are anchored to the 1st: days 1 through `8 - weekday(1st)` are
/// week 1 and every 7 days after that open a new bucket. This is the
/// hardware's relative-DST numbering, not an ISO week number.
pub fn week_of_month(day: u8, month: u8, year: u32) -> u8 {
    let mut count = 1;
    let mut week_end = 8 - day_of_week(1, month, year);
    while day > week_end {
        count += 1;
        week_end += DAYS_PER_WEEK;
    }
    count
}
