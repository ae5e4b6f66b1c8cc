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

//! Console workflows driven end-to-end through scripted serial IO and a
//! fake clock, on the host via `block_on` and the embassy-time std driver.

use clockterm_core::clock::{ClockError, ClockInterface};
use clockterm_core::console::{Console, ConsoleConfig, ConsoleError};
use clockterm_core::datetime::{CalendarTime, RtcDateTime};
use clockterm_core::dst::{DstFormat, DstRule, DstState, DstTransition};
use core::convert::Infallible;
use embassy_futures::block_on;
use embassy_time::Duration;
use std::collections::VecDeque;

/// Serves a canned byte script; once drained it either reports a closed
/// link or goes silent (for timeout scenarios).
struct ScriptRx {
    bytes: VecDeque<u8>,
    hold_when_drained: bool,
}

impl ScriptRx {
    fn script(script: &str) -> Self {
        Self {
            bytes: script.bytes().collect(),
            hold_when_drained: false,
        }
    }

    fn script_then_silence(script: &str) -> Self {
        Self {
            bytes: script.bytes().collect(),
            hold_when_drained: true,
        }
    }

    fn silent() -> Self {
        Self::script_then_silence("")
    }
}

impl embedded_io_async::ErrorType for ScriptRx {
    type Error = Infallible;
}

impl embedded_io_async::Read for ScriptRx {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        match self.bytes.pop_front() {
            Some(byte) => {
                buf[0] = byte;
                Ok(1)
            }
            None if self.hold_when_drained => core::future::pending().await,
            None => Ok(0),
        }
    }
}

#[derive(Default)]
struct CapturedTx {
    bytes: Vec<u8>,
}

impl CapturedTx {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl embedded_io_async::ErrorType for CapturedTx {
    type Error = Infallible;
}

impl embedded_io_async::Write for CapturedTx {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }
}

struct FakeClock {
    now: RtcDateTime,
    time_commits: Vec<RtcDateTime>,
    dst_commits: Vec<DstRule>,
    reject_commits: bool,
}

impl FakeClock {
    fn new() -> Self {
        Self {
            now: RtcDateTime::default(),
            time_commits: Vec::new(),
            dst_commits: Vec::new(),
            reject_commits: false,
        }
    }

    fn rejecting() -> Self {
        Self {
            reject_commits: true,
            ..Self::new()
        }
    }
}

impl ClockInterface for FakeClock {
    async fn now(&mut self) -> RtcDateTime {
        self.now
    }

    async fn set_time(&mut self, time: RtcDateTime) -> Result<(), ClockError> {
        if self.reject_commits {
            return Err(ClockError);
        }
        self.now = time;
        self.time_commits.push(time);
        Ok(())
    }

    async fn set_dst(&mut self, rule: &DstRule) -> Result<(), ClockError> {
        if self.reject_commits {
            return Err(ClockError);
        }
        self.dst_commits.push(*rule);
        Ok(())
    }
}

fn test_config() -> ConsoleConfig {
    ConsoleConfig {
        char_timeout: Duration::from_millis(2),
        input_timeout: Duration::from_millis(60),
    }
}

#[test]
fn commits_full_date_time_line() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("10 30 00 15 06 2024\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.set_new_time()).unwrap();

    assert_eq!(console.session().century, 2000);
    drop(console);
    assert_eq!(
        clock.time_commits,
        vec![RtcDateTime {
            second: 0,
            minute: 30,
            hour: 10,
            day: 15,
            month: 6,
            year: 24,
            weekday: 7,
        }]
    );
    assert!(tx.text().contains("RTC time updated"));
}

#[test]
fn century_follows_committed_year() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("23 59 59 31 12 1999\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.set_new_time()).unwrap();

    assert_eq!(console.session().century, 1900);
    drop(console);
    let commit = clock.time_commits[0];
    assert_eq!(commit.year, 99);
    assert_eq!(commit.weekday, 6);
}

#[test]
fn committed_time_reads_back_through_display_conversion() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("10 30 00 15 06 2024\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.set_new_time()).unwrap();

    let century = console.session().century;
    drop(console);
    let calendar = CalendarTime::from_rtc(&clock.now, century);
    assert_eq!(
        (calendar.hour, calendar.minute, calendar.second),
        (10, 30, 0)
    );
    assert_eq!((calendar.day, calendar.month, calendar.year), (15, 6, 2024));
}

#[test]
fn rejects_wrong_delimiter_count() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("10 30 00 15 06\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.set_new_time()).unwrap();

    assert_eq!(console.session().century, 2000);
    drop(console);
    assert!(clock.time_commits.is_empty());
    assert!(tx.text().contains("Invalid values"));
}

#[test]
fn rejects_out_of_range_fields() {
    for line in ["10 61 00 15 06 2024\r", "00 00 00 30 02 2023\r"] {
        let mut clock = FakeClock::new();
        let mut rx = ScriptRx::script(line);
        let mut tx = CapturedTx::default();
        let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

        block_on(console.set_new_time()).unwrap();

        drop(console);
        assert!(clock.time_commits.is_empty(), "accepted {line:?}");
        assert!(tx.text().contains("Invalid values"));
    }
}

#[test]
fn rejects_unparseable_fields() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("aa bb cc dd ee ffff\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.set_new_time()).unwrap();

    drop(console);
    assert!(clock.time_commits.is_empty());
    assert!(tx.text().contains("Invalid values"));
}

#[test]
fn prompt_timeout_reports_and_preserves_state() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::silent();
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.set_new_time()).unwrap();

    assert_eq!(console.session().century, 2000);
    assert_eq!(console.session().dst_state, DstState::Disabled);
    assert_eq!(console.session().dst_rule, DstRule::disabled());
    drop(console);
    assert!(clock.time_commits.is_empty());
    assert!(tx.text().contains("Timeout"));
}

#[test]
fn enable_dst_fixed_full_sequence() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("1102 15 06 2024\r02 01 11 2024\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.configure_dst()).unwrap();

    assert_eq!(console.session().dst_state, DstState::Enabled);
    let expected = DstRule {
        start: DstTransition::fixed(2, 15, 6),
        end: DstTransition::fixed(2, 1, 11),
    };
    assert_eq!(console.session().dst_rule, expected);
    drop(console);
    assert_eq!(clock.dst_commits, vec![expected]);
    let output = tx.text();
    assert!(output.contains("Current DST Status :: Disabled"));
    assert!(output.contains("DST time updated"));
}

#[test]
fn enable_dst_relative_derives_specs() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("1202 09 06 2024\r02 03 11 2024\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.configure_dst()).unwrap();

    assert_eq!(console.session().dst_state, DstState::Enabled);
    let rule = console.session().dst_rule;
    assert_eq!(rule.start.format, DstFormat::Relative);
    // 2024-06-09: Sunday of week bucket 3.
    assert_eq!(rule.start.day_of_week, 1);
    assert_eq!(rule.start.week_of_month, 3);
    assert_eq!(rule.start.day_of_month, 1);
    // 2024-11-03: Sunday of week bucket 2.
    assert_eq!(rule.end.day_of_week, 1);
    assert_eq!(rule.end.week_of_month, 2);
    assert_eq!(rule.end.day_of_month, 1);
}

#[test]
fn invalid_start_rule_aborts_before_end_prompt() {
    let mut clock = FakeClock::new();
    // Start line has only two interior spaces; the end line must stay
    // unread in the script.
    let mut rx = ScriptRx::script("1102 15 06\r02 01 11 2024\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.configure_dst()).unwrap();

    assert_eq!(console.session().dst_state, DstState::Disabled);
    assert_eq!(console.session().dst_rule, DstRule::disabled());
    drop(console);
    assert!(clock.dst_commits.is_empty());
    let output = tx.text();
    assert!(output.contains("Invalid values"));
    assert!(!output.contains("Enter DST end time"));
    assert_eq!(rx.bytes.len(), "02 01 11 2024\r".len());
}

#[test]
fn end_rule_timeout_leaves_rule_uncommitted() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script_then_silence("1102 15 06 2024\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.configure_dst()).unwrap();

    assert_eq!(console.session().dst_state, DstState::StartAccepted);
    assert_eq!(console.session().dst_rule, DstRule::disabled());
    drop(console);
    assert!(clock.dst_commits.is_empty());
    assert!(tx.text().contains("Timeout"));
}

#[test]
fn disable_resets_rule_from_enabled_state() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("1102 15 06 2024\r02 01 11 2024\r2");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.configure_dst()).unwrap();
    assert_eq!(console.session().dst_state, DstState::Enabled);

    block_on(console.configure_dst()).unwrap();

    assert_eq!(console.session().dst_state, DstState::Disabled);
    assert_eq!(console.session().dst_rule, DstRule::disabled());
    drop(console);
    assert_eq!(clock.dst_commits.len(), 2);
    assert_eq!(clock.dst_commits[1], DstRule::disabled());
    let output = tx.text();
    // The second pass sees the enabled rule, outside its window.
    assert!(output.contains("Current DST Status :: Inactive"));
    assert!(output.contains("DST feature disabled"));
}

#[test]
fn disable_without_prior_rule_still_programs_reset() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("2");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.configure_dst()).unwrap();

    assert_eq!(console.session().dst_state, DstState::Disabled);
    drop(console);
    assert_eq!(clock.dst_commits, vec![DstRule::disabled()]);
}

#[test]
fn quit_leaves_configuration_untouched() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("3");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.configure_dst()).unwrap();

    assert_eq!(console.session().dst_state, DstState::Disabled);
    drop(console);
    assert!(clock.dst_commits.is_empty());
    assert!(tx.text().contains("Exit from DST Configuration"));
}

#[test]
fn dst_menu_timeout_is_reported() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::silent();
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    block_on(console.configure_dst()).unwrap();

    assert_eq!(console.session().dst_state, DstState::Disabled);
    drop(console);
    assert!(clock.dst_commits.is_empty());
    assert!(tx.text().contains("Timeout"));
}

#[test]
fn rejected_commit_is_fatal() {
    let mut clock = FakeClock::rejecting();
    let mut rx = ScriptRx::script("10 30 00 15 06 2024\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    let result = block_on(console.set_new_time());

    assert_eq!(result, Err(ConsoleError::Clock(ClockError)));
    // The century anchor only moves after a successful commit.
    assert_eq!(console.session().century, 2000);
}

#[test]
fn run_loop_routes_commands_until_link_closes() {
    let mut clock = FakeClock::new();
    let mut rx = ScriptRx::script("110 30 00 15 06 2024\r");
    let mut tx = CapturedTx::default();
    let mut console = Console::new(&mut clock, &mut rx, &mut tx, test_config());

    let result = block_on(console.run());

    assert_eq!(result, Err(ConsoleError::Link));
    drop(console);
    assert_eq!(clock.time_commits.len(), 1);
    let output = tx.text();
    assert!(output.contains("Available commands"));
    assert!(output.contains("[Command] : Set new time"));
    assert!(output.contains("RTC time updated"));
}
