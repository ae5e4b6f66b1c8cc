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

//! Daylight-saving rules: transition specs, the derived activation window,
//! and the configuration lifecycle.

use crate::calendar::{day_of_week, day_of_year, days_in_month, week_of_month, DAYS_PER_WEEK};
use crate::datetime::CalendarTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DstFormat {
    /// Transition pinned to a literal day of the month.
    Fixed,
    /// Transition on the Nth occurrence of a weekday in the month.
    Relative,
}

/// One edge of the DST window.
///
/// Fixed format keeps `day_of_month` literal and pins `day_of_week` and
/// `week_of_month` to 1. Relative format derives those two from an example
/// date and pins `day_of_month` to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DstTransition {
    pub format: DstFormat,
    pub hour: u8,
    pub month: u8,
    pub day_of_week: u8,
    pub day_of_month: u8,
    pub week_of_month: u8,
}

impl DstTransition {
    pub fn fixed(hour: u8, day: u8, month: u8) -> Self {
        Self {
            format: DstFormat::Fixed,
            hour,
            month,
            day_of_week: 1,
            day_of_month: day,
            week_of_month: 1,
        }
    }

    pub fn relative(hour: u8, day: u8, month: u8, year: u32) -> Self {
        Self {
            format: DstFormat::Relative,
            hour,
            month,
            day_of_week: day_of_week(day, month, year),
            day_of_month: 1,
            week_of_month: week_of_month(day, month, year),
        }
    }

    /// The transition the disable command programs: midnight, 1 January,
    /// week 1, Sunday.
    pub const fn inert() -> Self {
        Self {
            format: DstFormat::Fixed,
            hour: 0,
            month: 1,
            day_of_week: 1,
            day_of_month: 1,
            week_of_month: 1,
        }
    }

    /// Concrete day of the month this transition lands on in `year`.
    ///
    /// Relative specs start the scan at the first day of the stored week
    /// bucket and walk forward to the stored weekday, stepping back a week
    /// if that overshoots the month.
    pub fn resolve_day(&self, year: u32) -> u8 {
        match self.format {
            DstFormat::Fixed => self.day_of_month,
            DstFormat::Relative => {
                let mut day = (self.week_of_month - 1) * DAYS_PER_WEEK + 1;
                while day_of_week(day, self.month, year) != self.day_of_week {
                    day += 1;
                }
                while day > days_in_month(self.month, year) {
                    day -= DAYS_PER_WEEK;
                }
                day
            }
        }
    }

    /// Hour-resolution position of this transition within `year`.
    fn ordinal_hour(&self, year: u32) -> u32 {
        u32::from(day_of_year(self.resolve_day(year), self.month, year)) * 24
            + u32::from(self.hour)
    }
}

/// A full DST rule, committed to the clock only as a validated whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DstRule {
    pub start: DstTransition,
    pub end: DstTransition,
}

impl DstRule {
    /// Both edges collapsed to the same inert point, so no window ever
    /// opens.
    pub const fn disabled() -> Self {
        Self {
            start: DstTransition::inert(),
            end: DstTransition::inert(),
        }
    }

    /// Whether `time` falls inside the shifted window.
    ///
    /// Windows whose start lies after their end wrap across the year
    /// boundary (southern-hemisphere rules).
    pub fn is_active(&self, time: &CalendarTime) -> bool {
        let now = u32::from(time.year_day) * 24 + u32::from(time.hour);
        let start = self.start.ordinal_hour(time.year);
        let end = self.end.ordinal_hour(time.year);
        if start < end {
            now >= start && now < end
        } else if start > end {
            now >= start || now < end
        } else {
            false
        }
    }
}

/// Where the one in-flight DST configuration stands.
///
/// `EndAccepted` is only reachable from `StartAccepted` and `Enabled` only
/// from `EndAccepted`; the disable command drops back to `Disabled` from
/// anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DstState {
    #[default]
    Disabled,
    StartAccepted,
    EndAccepted,
    Enabled,
}
