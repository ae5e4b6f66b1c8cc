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

//! Packed and expanded time representations.

use crate::calendar::day_of_year;
use core::fmt;

/// Century assumed for the packed two-digit year until an operator commits
/// a full date.
pub const DEFAULT_CENTURY: u32 = 2000;

/// Century anchor for a full year, e.g. 2024 -> 2000.
pub fn century_of(year: u32) -> u32 {
    (year / 100) * 100
}

/// The packed record the clock hardware trades in.
///
/// Two-digit year; weekday runs 1 = Sunday through 7 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcDateTime {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub year: u8,
    pub weekday: u8,
}

impl Default for RtcDateTime {
    /// Midnight, 1 January 2000 (a Saturday).
    fn default() -> Self {
        Self {
            second: 0,
            minute: 0,
            hour: 0,
            day: 1,
            month: 1,
            year: 0,
            weekday: 7,
        }
    }
}

/// A packed record expanded against a century anchor.
///
/// Weekday here is 0 = Sunday through 6 = Saturday and `year_day` counts
/// days since 1 January, matching the C library's `struct tm` conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub year: u32,
    pub weekday: u8,
    pub year_day: u16,
}

impl CalendarTime {
    pub fn from_rtc(raw: &RtcDateTime, century: u32) -> Self {
        let year = century + u32::from(raw.year);
        Self {
            second: raw.second,
            minute: raw.minute,
            hour: raw.hour,
            day: raw.day,
            month: raw.month,
            year,
            weekday: raw.weekday - 1,
            year_day: day_of_year(raw.day, raw.month, year),
        }
    }
}

const WEEKDAY_ABBREV: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl fmt::Display for CalendarTime {
    /// `strftime("%c")`-style rendering, e.g. `Sat Jun 15 10:30:00 2024`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:2} {:02}:{:02}:{:02} {}",
            WEEKDAY_ABBREV[usize::from(self.weekday)],
            MONTH_ABBREV[usize::from(self.month - 1)],
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.year
        )
    }
}
