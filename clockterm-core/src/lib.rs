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

//! Core logic of the clockterm RTC console: calendar arithmetic, operator
//! input parsing and validation, and the daylight-saving rule lifecycle.
//!
//! Hardware stays behind two seams: [`clock::ClockInterface`] for the time
//! source and `embedded_io_async::{Read, Write}` for the serial character
//! stream. Everything in this crate runs on the host.

#![no_std]

pub mod calendar;
pub mod clock;
pub mod console;
pub mod datetime;
pub mod dst;
pub mod validate;
