use super::line::{read_line, LineError};
use super::{parse_fields, Console, ConsoleError, INVALID_INPUT_MSG, TIMEOUT_MSG};
use crate::calendar::day_of_week;
use crate::clock::ClockInterface;
use crate::datetime::{century_of, RtcDateTime};
use crate::validate::validate_date_time;
use embassy_time::Instant;
use embedded_io_async::{Read, Write};

/// Interior spaces in a well-formed "HH MM SS dd mm yyyy" line.
const NEW_TIME_SPACE_COUNT: u32 = 5;

impl<C, R, W> Console<C, R, W>
where
    C: ClockInterface,
    R: Read,
    W: Write,
{
    /// Prompt for a full date/time line and commit it if valid.
    ///
    /// The commit is all-or-nothing: nothing reaches the clock or the
    /// session until every field has validated. A rejected or timed-out
    /// line leaves the previous time and century anchor untouched.
    pub async fn set_new_time(&mut self) -> Result<(), ConsoleError> {
        self.write_str("\rEnter time in \"HH MM SS dd mm yyyy\" format \r\n")
            .await?;

        let deadline = Instant::now() + self.config.input_timeout;
        let line = match read_line(&mut self.rx, &mut self.tx, self.config.char_timeout, deadline)
            .await
        {
            Ok(line) => line,
            Err(LineError::Timeout) => return self.write_str(TIMEOUT_MSG).await,
            Err(LineError::Overflow) => return self.write_str(INVALID_INPUT_MSG).await,
            Err(LineError::Link) => return Err(ConsoleError::Link),
        };

        if line.space_count() != NEW_TIME_SPACE_COUNT {
            return self.write_str(INVALID_INPUT_MSG).await;
        }
        let Some([hour, minute, second, day, month, year]) =
            line.as_str().and_then(parse_fields::<6>)
        else {
            return self.write_str(INVALID_INPUT_MSG).await;
        };
        if !validate_date_time(second, minute, hour, day, month, year) {
            return self.write_str(INVALID_INPUT_MSG).await;
        }

        let time = RtcDateTime {
            second: second as u8,
            minute: minute as u8,
            hour: hour as u8,
            day: day as u8,
            month: month as u8,
            year: (year % 100) as u8,
            weekday: day_of_week(day as u8, month as u8, year),
        };
        self.clock.set_time(time).await?;
        self.session.century = century_of(year);
        self.write_str("\rRTC time updated\r\n\n").await
    }
}
