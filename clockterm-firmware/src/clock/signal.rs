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

use clockterm_core::datetime::RtcDateTime;
use clockterm_core::dst::DstRule;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_sync::watch::{Receiver, Watch};

const CLOCK_WATCH_RECEIVER_COUNT: usize = 2;
pub type ClockWatchReceiver =
    Receiver<'static, CriticalSectionRawMutex, RtcDateTime, CLOCK_WATCH_RECEIVER_COUNT>;
pub static CLOCK_TIME_UPDATE: Watch<CriticalSectionRawMutex, RtcDateTime, CLOCK_WATCH_RECEIVER_COUNT> =
    Watch::new();
pub static CLOCK_SET_TIME: Signal<CriticalSectionRawMutex, RtcDateTime> = Signal::new();
pub static CLOCK_SET_DST: Signal<CriticalSectionRawMutex, DstRule> = Signal::new();
