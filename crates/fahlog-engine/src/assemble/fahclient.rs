use once_cell::sync::Lazy;
use regex::Regex;

use fahlog_parse::LogLine;
use fahlog_types::{Dialect, LogLineData, LogLineType};

use crate::run::{ClientRun, UnitRun};

/// Work-unit routing prefix: `WU01:FS00:` names the queue entry and slot a
/// line belongs to.
static WORK_UNIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"WU(?P<queue>\d+):FS(?P<slot>\d+)").unwrap());

/// Streaming assembler for the FahClient dialect.
///
/// v7 logs name their slot and queue on every work-unit line, so routing is
/// direct; the only buffering needed is for lines that precede the first
/// log-open banner.
#[derive(Debug)]
pub(crate) struct FahClientState {
    buffer: Vec<LogLine>,
}

impl FahClientState {
    pub(crate) fn new() -> Self {
        FahClientState { buffer: Vec::new() }
    }

    pub(crate) fn pending_lines(&self) -> &[LogLine] {
        &self.buffer
    }

    pub(crate) fn handle(&mut self, runs: &mut Vec<ClientRun>, line: LogLine) {
        if let Some(caps) = WORK_UNIT_RE.captures(line.raw()) {
            let queue = parse_u32(&caps["queue"]);
            let slot = parse_u32(&caps["slot"]);
            self.push_work_unit_line(runs, line, queue, slot);
            return;
        }

        if line.line_type() == LogLineType::LogOpen {
            if let Some(prev) = runs.last_mut() {
                prev.close_open_units(false);
            }
            let mut run = ClientRun::new(Dialect::FahClient, line.index());
            for buffered in self.buffer.drain(..) {
                run.push_line(buffered);
            }
            run.push_line(line);
            runs.push(run);
            return;
        }

        match runs.last_mut() {
            Some(run) => run.push_line(line),
            None => self.buffer.push(line),
        }
    }

    fn push_work_unit_line(
        &mut self,
        runs: &mut Vec<ClientRun>,
        line: LogLine,
        queue: u32,
        slot: u32,
    ) {
        // A terminating line closes its unit; later lines for the same
        // queue entry start a fresh one.
        let terminating = match line.line_type() {
            LogLineType::WorkUnitCleaningUp => true,
            LogLineType::WorkUnitCoreReturn => matches!(
                line.data(),
                Some(Ok(LogLineData::CoreReturn(result))) if result.is_terminating()
            ),
            _ => false,
        };

        let run = self.ensure_run(runs, line.index());
        let slot_run = run.slot_run_entry(slot);
        match slot_run.open_unit_mut(queue) {
            Some(unit) => {
                if unit.closed_at_eol {
                    unit.reopen();
                }
                unit.push_line(line);
                if terminating {
                    unit.close_at_last_line(false);
                }
            }
            None => {
                let mut unit = UnitRun::new(Dialect::FahClient, line.index(), true);
                unit.set_queue_index(queue);
                unit.push_line(line);
                if terminating {
                    unit.close_at_last_line(false);
                }
                slot_run.push_unit(unit);
            }
        }
    }

    fn ensure_run<'r>(&mut self, runs: &'r mut Vec<ClientRun>, index: u32) -> &'r mut ClientRun {
        if runs.is_empty() {
            // Truncated log with no banner: the buffered preamble seeds a
            // synthetic run.
            let start = self
                .buffer
                .first()
                .map(LogLine::index)
                .unwrap_or(index);
            let mut run = ClientRun::new(Dialect::FahClient, start);
            for buffered in self.buffer.drain(..) {
                run.push_line(buffered);
            }
            runs.push(run);
        }
        match runs.last_mut() {
            Some(run) => run,
            None => unreachable!("run pushed above"),
        }
    }

    /// At end of input, a bannerless log still becomes one client run.
    pub(crate) fn flush_at_end(&mut self, runs: &mut Vec<ClientRun>) {
        if runs.is_empty() && !self.buffer.is_empty() {
            let start = match self.buffer.first() {
                Some(first) => first.index(),
                None => return,
            };
            let mut run = ClientRun::new(Dialect::FahClient, start);
            for buffered in self.buffer.drain(..) {
                run.push_line(buffered);
            }
            runs.push(run);
        }
    }
}

fn parse_u32(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}
