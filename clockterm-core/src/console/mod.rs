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

//! Serial command console: reprints the running clock and dispatches the
//! set-time and DST configuration commands.

mod dst_config;
mod line;
mod set_time;

pub use line::{LineError, LineInput, LINE_CAPACITY};

use crate::clock::{ClockError, ClockInterface};
use crate::datetime::{CalendarTime, DEFAULT_CENTURY};
use crate::dst::{DstRule, DstState};
use core::fmt::Write as _;
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, Write};

/// Top-level menu command bytes.
pub const CMD_SET_DATE_TIME: u8 = b'1';
pub const CMD_CONFIG_DST: u8 = b'2';

pub(crate) const DST_CMD_ENABLE: u8 = b'1';
pub(crate) const DST_CMD_DISABLE: u8 = b'2';
pub(crate) const DST_CMD_QUIT: u8 = b'3';
pub(crate) const DST_FORMAT_FIXED: u8 = b'1';
pub(crate) const DST_FORMAT_RELATIVE: u8 = b'2';

pub(crate) const INVALID_INPUT_MSG: &str =
    "\rInvalid values! Please enter the values in specified format\r\n";
pub(crate) const TIMEOUT_MSG: &str = "\rTimeout \r\n";

/// Timeout knobs for the polled reads.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleConfig {
    /// Budget for a single character poll; also the idle command poll.
    pub char_timeout: Duration,
    /// Overall budget for one prompt/response exchange.
    pub input_timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            char_timeout: Duration::from_millis(10),
            input_timeout: Duration::from_millis(120_000),
        }
    }
}

/// Process-wide console state: the century anchor plus the single DST
/// configuration in flight. Written only by the command loop.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSession {
    pub century: u32,
    pub dst_rule: DstRule,
    pub dst_state: DstState,
}

impl Default for ConsoleSession {
    fn default() -> Self {
        Self {
            century: DEFAULT_CENTURY,
            dst_rule: DstRule::disabled(),
            dst_state: DstState::Disabled,
        }
    }
}

/// Failures that end the command loop. Input timeouts and malformed lines
/// are reported to the operator and recovered in place; they never surface
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// The serial link failed or closed.
    #[error("serial link failed")]
    Link,
    /// The time source refused a fully validated commit.
    #[error(transparent)]
    Clock(#[from] ClockError),
}

pub struct Console<C, R, W> {
    clock: C,
    rx: R,
    tx: W,
    config: ConsoleConfig,
    session: ConsoleSession,
}

impl<C, R, W> Console<C, R, W>
where
    C: ClockInterface,
    R: Read,
    W: Write,
{
    pub fn new(clock: C, rx: R, tx: W, config: ConsoleConfig) -> Self {
        Self {
            clock,
            rx,
            tx,
            config,
            session: ConsoleSession::default(),
        }
    }

    pub fn session(&self) -> &ConsoleSession {
        &self.session
    }

    /// Command loop: snapshot and reprint the running clock, poll briefly
    /// for a command byte, route it. Returns only if the serial link or the
    /// clock fails.
    pub async fn run(&mut self) -> Result<(), ConsoleError> {
        self.print_banner().await?;
        loop {
            let now = self.clock.now().await;
            let calendar = CalendarTime::from_rtc(&now, self.session.century);
            let mut ticker_line: heapless::String<40> = heapless::String::new();
            let _ = write!(ticker_line, "\r{calendar}");
            self.write_str(&ticker_line).await?;

            match self.poll_char(self.config.char_timeout).await? {
                Some(CMD_SET_DATE_TIME) => {
                    self.write_str("\r[Command] : Set new time\r\n").await?;
                    self.set_new_time().await?;
                }
                Some(CMD_CONFIG_DST) => {
                    self.write_str("\r[Command] : Configure DST feature\r\n")
                        .await?;
                    self.configure_dst().await?;
                }
                _ => {}
            }
        }
    }

    async fn print_banner(&mut self) -> Result<(), ConsoleError> {
        // ANSI clear screen plus home.
        self.write_str("\x1b[2J\x1b[;H").await?;
        self.write_str("****************** clockterm ******************\r\n\n")
            .await?;
        self.write_str("Available commands \r\n").await?;
        self.write_str("1 : Set new time and date\r\n").await?;
        self.write_str("2 : Configure DST feature\r\n\n").await
    }

    pub(crate) async fn write_str(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.tx
            .write_all(text.as_bytes())
            .await
            .map_err(|_| ConsoleError::Link)
    }

    /// Poll for one raw command byte, bounded by `timeout`. Commands are
    /// not echoed.
    pub(crate) async fn poll_char(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<u8>, ConsoleError> {
        match with_timeout(timeout, line::read_byte(&mut self.rx)).await {
            Ok(Ok(byte)) => Ok(Some(byte)),
            Ok(Err(())) => Err(ConsoleError::Link),
            Err(_) => Ok(None),
        }
    }
}

/// Parse exactly `N` whitespace-separated unsigned integers. Anything
/// unparseable rejects the whole line; trailing tokens are ignored.
pub(crate) fn parse_fields<const N: usize>(input: &str) -> Option<[u32; N]> {
    let mut fields = [0u32; N];
    let mut tokens = input.split_ascii_whitespace();
    for field in &mut fields {
        *field = tokens.next()?.parse().ok()?;
    }
    Some(fields)
}
