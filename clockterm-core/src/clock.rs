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

//! Seam to the time source. The console never touches hardware; it reads
//! and commits through this trait.

use crate::datetime::RtcDateTime;
use crate::dst::DstRule;

/// The time source rejected a commit. Validation happens before any commit
/// reaches the clock, so this indicates a hardware or driver fault rather
/// than bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("clock rejected the update")]
pub struct ClockError;

#[allow(async_fn_in_trait)]
pub trait ClockInterface {
    /// Torn-free snapshot of the current time.
    async fn now(&mut self) -> RtcDateTime;

    /// Replace the current date and time.
    async fn set_time(&mut self, time: RtcDateTime) -> Result<(), ClockError>;

    /// Program a complete DST rule (or the inert disable rule).
    async fn set_dst(&mut self, rule: &DstRule) -> Result<(), ClockError>;
}

impl<T: ClockInterface + ?Sized> ClockInterface for &mut T {
    async fn now(&mut self) -> RtcDateTime {
        T::now(self).await
    }

    async fn set_time(&mut self, time: RtcDateTime) -> Result<(), ClockError> {
        T::set_time(self, time).await
    }

    async fn set_dst(&mut self, rule: &DstRule) -> Result<(), ClockError> {
        T::set_dst(self, rule).await
    }
}
