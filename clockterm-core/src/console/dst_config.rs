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

//! Interactive DST configuration: status display, the enable/disable/quit
//! sub-menu, and collection of the start and end transition rules.

use super::line::{read_line, LineError};
use super::{
    parse_fields, Console, ConsoleError, DST_CMD_DISABLE, DST_CMD_ENABLE, DST_CMD_QUIT,
    DST_FORMAT_FIXED, DST_FORMAT_RELATIVE, INVALID_INPUT_MSG, TIMEOUT_MSG,
};
use crate::clock::ClockInterface;
use crate::datetime::CalendarTime;
use crate::dst::{DstFormat, DstRule, DstState, DstTransition};
use crate::validate::validate_date_time;
use embassy_time::Instant;
use embedded_io_async::{Read, Write};

/// Interior spaces in a well-formed "HH dd mm yyyy" rule line.
const DST_TIME_SPACE_COUNT: u32 = 3;

impl<C, R, W> Console<C, R, W>
where
    C: ClockInterface,
    R: Read,
    W: Write,
{
    /// DST sub-menu entry point. Times out silently back to the command
    /// loop; an unrecognised command byte does the same.
    pub async fn configure_dst(&mut self) -> Result<(), ConsoleError> {
        if self.session.dst_state == DstState::Enabled {
            let now = self.clock.now().await;
            let calendar = CalendarTime::from_rtc(&now, self.session.century);
            if self.session.dst_rule.is_active(&calendar) {
                self.write_str("\rCurrent DST Status :: Active\r\n\n").await?;
            } else {
                self.write_str("\rCurrent DST Status :: Inactive\r\n\n")
                    .await?;
            }
        } else {
            self.write_str("\rCurrent DST Status :: Disabled\r\n\n")
                .await?;
        }

        self.write_str("Available DST commands \r\n").await?;
        self.write_str("1 : Enable DST feature\r\n").await?;
        self.write_str("2 : Disable DST feature\r\n").await?;
        self.write_str("3 : Quit DST Configuration\r\n\n").await?;

        let Some(command) = self.poll_char(self.config.input_timeout).await? else {
            return self.write_str(TIMEOUT_MSG).await;
        };
        match command {
            DST_CMD_ENABLE => self.enable_dst().await,
            DST_CMD_DISABLE => self.disable_dst().await,
            DST_CMD_QUIT => self.write_str("\rExit from DST Configuration \r\n\n").await,
            _ => Ok(()),
        }
    }

    /// Collect format, start rule and end rule, then program the assembled
    /// rule. Any rejected line aborts the attempt; a fresh enable starts
    /// over from the format prompt and no partial rule is ever committed.
    async fn enable_dst(&mut self) -> Result<(), ConsoleError> {
        self.write_str("Enter DST format \r\n").await?;
        self.write_str("1 : Fixed DST format\r\n").await?;
        self.write_str("2 : Relative DST format\r\n\n").await?;

        let Some(format_cmd) = self.poll_char(self.config.input_timeout).await? else {
            return self.write_str(TIMEOUT_MSG).await;
        };
        // An unknown byte is carried along and rejected with the rule line,
        // so the operator still sees the prompt before the diagnostic.
        let format = match format_cmd {
            DST_FORMAT_FIXED => Some(DstFormat::Fixed),
            DST_FORMAT_RELATIVE => Some(DstFormat::Relative),
            _ => None,
        };

        self.write_str("Enter DST start time in \"HH dd mm yyyy\" format\r\n")
            .await?;
        let Some(start) = self.read_transition(format).await? else {
            return Ok(());
        };
        self.session.dst_state = DstState::StartAccepted;

        self.write_str("Enter DST end time in \"HH dd mm yyyy\" format\r\n")
            .await?;
        let Some(end) = self.read_transition(format).await? else {
            return Ok(());
        };
        self.session.dst_state = DstState::EndAccepted;

        let rule = DstRule { start, end };
        self.clock.set_dst(&rule).await?;
        self.session.dst_rule = rule;
        self.session.dst_state = DstState::Enabled;
        self.write_str("\rDST time updated\r\n\n").await
    }

    /// Read and validate one "HH dd mm yyyy" rule line. `None` means the
    /// line was rejected and the diagnostic already printed; the enable
    /// attempt stops there.
    async fn read_transition(
        &mut self,
        format: Option<DstFormat>,
    ) -> Result<Option<DstTransition>, ConsoleError> {
        let deadline = Instant::now() + self.config.input_timeout;
        let line = match read_line(&mut self.rx, &mut self.tx, self.config.char_timeout, deadline)
            .await
        {
            Ok(line) => line,
            Err(LineError::Timeout) => {
                self.write_str(TIMEOUT_MSG).await?;
                return Ok(None);
            }
            Err(LineError::Overflow) => {
                self.write_str(INVALID_INPUT_MSG).await?;
                return Ok(None);
            }
            Err(LineError::Link) => return Err(ConsoleError::Link),
        };

        if line.space_count() != DST_TIME_SPACE_COUNT {
            self.write_str(INVALID_INPUT_MSG).await?;
            return Ok(None);
        }
        let Some([hour, day, month, year]) = line.as_str().and_then(parse_fields::<4>) else {
            self.write_str(INVALID_INPUT_MSG).await?;
            return Ok(None);
        };

        // A rule line carries no seconds or minutes; they validate as 0.
        match format {
            Some(format) if validate_date_time(0, 0, hour, day, month, year) => {
                let transition = match format {
                    DstFormat::Fixed => {
                        DstTransition::fixed(hour as u8, day as u8, month as u8)
                    }
                    DstFormat::Relative => {
                        DstTransition::relative(hour as u8, day as u8, month as u8, year)
                    }
                };
                Ok(Some(transition))
            }
            _ => {
                self.write_str(INVALID_INPUT_MSG).await?;
                Ok(None)
            }
        }
    }

    /// Program the inert reset rule and drop back to `Disabled`.
    async fn disable_dst(&mut self) -> Result<(), ConsoleError> {
        let rule = DstRule::disabled();
        self.clock.set_dst(&rule).await?;
        self.session.dst_rule = rule;
        self.session.dst_state = DstState::Disabled;
        self.write_str("\rDST feature disabled\r\n\n").await
    }
}
