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

//! Polled line reader with echo and delimiter counting.

use embassy_time::{with_timeout, Duration, Instant};
use embedded_io_async::{Read, Write};
use heapless::Vec;

/// Capacity of one prompt/response exchange.
pub const LINE_CAPACITY: usize = 80;

/// One collected input line plus its interior-space count.
#[derive(Debug, Default)]
pub struct LineInput {
    bytes: Vec<u8, LINE_CAPACITY>,
    spaces: u32,
}

impl LineInput {
    pub fn space_count(&self) -> u32 {
        self.spaces
    }

    /// The collected characters, if they form valid UTF-8. Operator input
    /// is expected to be plain ASCII digits and spaces.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// No line terminator arrived within the prompt budget.
    #[error("input timed out")]
    Timeout,
    /// The line outgrew the input buffer before a terminator; the whole
    /// line is rejected rather than truncated.
    #[error("line exceeded the input buffer")]
    Overflow,
    /// The serial link failed or closed.
    #[error("serial link failed")]
    Link,
}

pub(crate) async fn read_byte<R: Read>(rx: &mut R) -> Result<u8, ()> {
    let mut byte = [0u8; 1];
    match rx.read(&mut byte).await {
        Ok(1..) => Ok(byte[0]),
        _ => Err(()),
    }
}

/// Read one line, echoing every character, until CR/LF, the prompt
/// deadline, or capacity runs out.
///
/// Each poll costs up to `char_timeout` whether or not a character arrived;
/// the prompt times out once the next poll could no longer complete before
/// `deadline`. A trailing `\n\r` is emitted in every outcome so subsequent
/// output starts on a fresh line.
pub(crate) async fn read_line<R: Read, W: Write>(
    rx: &mut R,
    tx: &mut W,
    char_timeout: Duration,
    deadline: Instant,
) -> Result<LineInput, LineError> {
    let mut line = LineInput::default();
    let outcome = loop {
        if Instant::now() + char_timeout >= deadline {
            break Err(LineError::Timeout);
        }

        let byte = match with_timeout(char_timeout, read_byte(rx)).await {
            Ok(Ok(byte)) => byte,
            Ok(Err(())) => return Err(LineError::Link),
            Err(_) => continue,
        };

        if byte == b'\r' || byte == b'\n' {
            break Ok(line);
        }
        if byte == b' ' {
            line.spaces += 1;
        }
        if line.bytes.push(byte).is_err() {
            break Err(LineError::Overflow);
        }
        write_bytes(tx, &[byte]).await?;
    };
    write_bytes(tx, b"\n\r").await?;
    outcome
}

async fn write_bytes<W: Write>(tx: &mut W, bytes: &[u8]) -> Result<(), LineError> {
    tx.write_all(bytes).await.map_err(|_| LineError::Link)
}
