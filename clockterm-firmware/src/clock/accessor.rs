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

use crate::clock::signal::{ClockWatchReceiver, CLOCK_SET_DST, CLOCK_SET_TIME, CLOCK_TIME_UPDATE};
use clockterm_core::clock::{ClockError, ClockInterface};
use clockterm_core::datetime::RtcDateTime;
use clockterm_core::dst::DstRule;
use defmt::warn;

pub enum ClockAccessorError {
    NoWatchSlotsAvailable,
}

/// Console-side handle to the clock task.
pub struct ClockAccessor {
    receiver: ClockWatchReceiver,
}

impl ClockAccessor {
    pub fn new() -> Result<ClockAccessor, ClockAccessorError> {
        if let Some(receiver) = CLOCK_TIME_UPDATE.receiver() {
            Ok(Self { receiver })
        } else {
            warn!("Unable to obtain clock update receiver");
            Err(ClockAccessorError::NoWatchSlotsAvailable)
        }
    }
}

impl ClockInterface for ClockAccessor {
    async fn now(&mut self) -> RtcDateTime {
        // Waits for the clock task's first broadcast; the watch publishes
        // under its critical-section mutex, so the snapshot cannot tear
        // against the one-second update.
        self.receiver.get().await
    }

    async fn set_time(&mut self, time: RtcDateTime) -> Result<(), ClockError> {
        CLOCK_SET_TIME.signal(time);
        Ok(())
    }

    async fn set_dst(&mut self, rule: &DstRule) -> Result<(), ClockError> {
        CLOCK_SET_DST.signal(*rule);
        Ok(())
    }
}
