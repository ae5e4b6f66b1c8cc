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

pub mod accessor;
mod signal;

use crate::clock::signal::{CLOCK_SET_DST, CLOCK_SET_TIME, CLOCK_TIME_UPDATE};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use clockterm_core::datetime::{CalendarTime, RtcDateTime, DEFAULT_CENTURY};
use clockterm_core::dst::DstRule;
use defmt::{debug, error, trace, Debug2Format};
use ds323x::ic;
use ds323x::interface::I2cInterface;
use ds323x::{DateTimeAccess, Ds323x};
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C1;
use embassy_time::{Duration, Ticker};

pub type SystemRtc = Ds323x<I2cInterface<I2c<'static, I2C1, Async>>, ic::DS3231>;

/// Owns the RTC chip: services set-time and program-DST requests posted by
/// the console, broadcasts the packed time once a second, and shifts the
/// clock by an hour on DST window edges.
pub struct ClockControl {
    rtc: SystemRtc,
    dst_rule: DstRule,
    dst_applied: bool,
}

impl ClockControl {
    pub fn new(rtc: SystemRtc) -> Self {
        Self {
            rtc,
            dst_rule: DstRule::disabled(),
            dst_applied: false,
        }
    }

    pub async fn run(&mut self) -> ! {
        let sender = CLOCK_TIME_UPDATE.sender();
        let mut one_second_ticker = Ticker::every(Duration::from_secs(1));
        loop {
            one_second_ticker.next().await;
            if let Some(new_time) = CLOCK_SET_TIME.try_take() {
                match to_chip_datetime(&new_time) {
                    Some(dt) => {
                        self.rtc.set_datetime(&dt).unwrap_or_else(|e| {
                            defmt::panic!("unable to set RTC time: {}", Debug2Format(&e))
                        });
                        debug!("Time set to {}", Debug2Format(&dt));
                    }
                    None => error!("discarding unrepresentable time update"),
                }
            }
            if let Some(rule) = CLOCK_SET_DST.try_take() {
                self.program_dst(rule);
            }
            if let Ok(dt) = self.rtc.datetime() {
                let dt = self.apply_dst_shift(dt);
                trace!("New RTC time: {}", Debug2Format(&dt));
                sender.send(to_packed(&dt));
            }
        }
    }

    /// Adopt a freshly validated rule. The current activity counts as
    /// already applied so enabling DST mid-window does not jump the clock.
    fn program_dst(&mut self, rule: DstRule) {
        self.dst_applied = match self.rtc.datetime() {
            Ok(dt) => rule.is_active(&to_calendar(&dt)),
            Err(_) => false,
        };
        self.dst_rule = rule;
        debug!(
            "DST rule programmed, currently {}",
            if self.dst_applied { "active" } else { "inactive" }
        );
    }

    /// Shift the hardware clock when the rule's window opens or closes.
    ///
    /// The window is evaluated in standard (unshifted) time so the
    /// end-of-window shift cannot land back inside the window it just
    /// left. Returns the post-shift time for broadcasting.
    fn apply_dst_shift(&mut self, dt: NaiveDateTime) -> NaiveDateTime {
        let standard = if self.dst_applied {
            dt - chrono::Duration::hours(1)
        } else {
            dt
        };
        let active = self.dst_rule.is_active(&to_calendar(&standard));
        if active == self.dst_applied {
            return dt;
        }

        let shifted = if active {
            dt + chrono::Duration::hours(1)
        } else {
            dt - chrono::Duration::hours(1)
        };
        self.dst_applied = active;
        self.rtc.set_datetime(&shifted).unwrap_or_else(|e| {
            defmt::panic!("unable to shift RTC time for DST: {}", Debug2Format(&e))
        });
        debug!("DST {} shift applied", if active { "start" } else { "end" });
        shifted
    }
}

/// Expand a packed record into the chip's datetime. `None` only for day
/// values the month cannot hold, which validation upstream rules out.
fn to_chip_datetime(time: &RtcDateTime) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(
        (DEFAULT_CENTURY + u32::from(time.year)) as i32,
        u32::from(time.month),
        u32::from(time.day),
    )?
    .and_hms_opt(
        u32::from(time.hour),
        u32::from(time.minute),
        u32::from(time.second),
    )
}

fn to_packed(dt: &NaiveDateTime) -> RtcDateTime {
    RtcDateTime {
        second: dt.second() as u8,
        minute: dt.minute() as u8,
        hour: dt.hour() as u8,
        day: dt.day() as u8,
        month: dt.month() as u8,
        year: dt.year().rem_euclid(100) as u8,
        weekday: dt.weekday().num_days_from_sunday() as u8 + 1,
    }
}

fn to_calendar(dt: &NaiveDateTime) -> CalendarTime {
    CalendarTime::from_rtc(&to_packed(dt), DEFAULT_CENTURY)
}
