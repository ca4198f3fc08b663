use fahlog_parse::LogLine;
use fahlog_types::{Dialect, LogLineData, LogLineType};

use crate::run::{ClientRun, UnitRun};

/// Everything Legacy logs route through slot 0; the dialect predates
/// multi-slot clients.
const ONLY_SLOT: u32 = 0;

/// Streaming assembler for the Legacy dialect.
///
/// Unit boundaries are not explicit in v6 logs. Boundary-candidate lines
/// open a tentative, uncommitted unit that doubles as the holding buffer;
/// the first running evidence commits it and settles its true start line.
#[derive(Debug)]
pub(crate) struct LegacyState {
    /// The most recent non-`None` tag, used both for boundary decisions
    /// (a header right after a log-open banner is the same restart) and to
    /// collapse consecutive running evidence into one signal.
    last_recognized: LogLineType,
    candidates: UnitStartCandidates,
}

/// Line indices of the boundary candidates seen since the last commit.
#[derive(Debug, Default)]
struct UnitStartCandidates {
    processing: Option<u32>,
    core_download: Option<u32>,
    working: Option<u32>,
    explicit_start: Option<u32>,
    /// Queue number parsed from the most recent queue-slot line.
    queue_index: Option<u32>,
}

impl UnitStartCandidates {
    fn reset(&mut self) {
        *self = UnitStartCandidates::default();
    }

    /// The committed unit's first line: the earliest reliable candidate,
    /// falling back to the running evidence itself. A processing index that
    /// a later core download made stale is skipped, not merely demoted.
    fn choose_start(&self, signal_index: u32) -> u32 {
        let processing = match (self.processing, self.core_download) {
            (Some(processing), Some(download)) if download > processing => None,
            (processing, _) => processing,
        };
        processing
            .or(self.working)
            .or(self.explicit_start)
            .unwrap_or(signal_index)
    }
}

impl LegacyState {
    pub(crate) fn new() -> Self {
        LegacyState {
            last_recognized: LogLineType::None,
            candidates: UnitStartCandidates::default(),
        }
    }

    pub(crate) fn handle(&mut self, runs: &mut Vec<ClientRun>, line: LogLine) {
        let line_type = line.line_type();
        match line_type {
            LogLineType::LogOpen => self.start_client_run(runs, line),
            LogLineType::LogHeader => {
                // A header row inside the startup banner belongs to the
                // restart already opened; the banner is open line, header
                // rows, and the client version between them. A header with
                // none of those before it means the top of the file was
                // truncated.
                if matches!(
                    self.last_recognized,
                    LogLineType::LogOpen | LogLineType::LogHeader | LogLineType::ClientVersion
                ) {
                    self.push_body_line(runs, line);
                } else {
                    self.start_client_run(runs, line);
                }
            }
            LogLineType::WorkUnitProcessing
            | LogLineType::WorkUnitCoreDownload
            | LogLineType::WorkUnitQueueIndex
            | LogLineType::WorkUnitWorking
            | LogLineType::WorkUnitStart => self.push_candidate_line(runs, line),
            LogLineType::WorkUnitRunning => self.push_running_line(runs, line),
            _ => self.push_body_line(runs, line),
        }
        if line_type != LogLineType::None {
            self.last_recognized = line_type;
        }
    }

    fn start_client_run(&mut self, runs: &mut Vec<ClientRun>, line: LogLine) {
        if let Some(prev) = runs.last_mut() {
            // Units cut off by a client restart stay closed for good.
            prev.close_open_units(false);
        }
        let mut run = ClientRun::new(Dialect::Legacy, line.index());
        run.push_line(line);
        runs.push(run);
        self.candidates.reset();
    }

    fn push_candidate_line(&mut self, runs: &mut Vec<ClientRun>, line: LogLine) {
        let index = line.index();
        match line.line_type() {
            LogLineType::WorkUnitProcessing => {
                // A fresh processing line supersedes one that a core
                // download has since made stale.
                let stale = match (self.candidates.processing, self.candidates.core_download) {
                    (Some(processing), Some(download)) => download > processing,
                    _ => false,
                };
                if self.candidates.processing.is_none() || stale {
                    self.candidates.processing = Some(index);
                }
            }
            LogLineType::WorkUnitCoreDownload => {
                self.candidates.core_download = Some(index);
            }
            LogLineType::WorkUnitQueueIndex => {
                if let Some(Ok(LogLineData::QueueIndex(queue))) = line.data() {
                    self.candidates.queue_index = Some(*queue);
                }
            }
            LogLineType::WorkUnitWorking => {
                if self.candidates.working.is_none() {
                    self.candidates.working = Some(index);
                }
            }
            LogLineType::WorkUnitStart => {
                if self.candidates.explicit_start.is_none() {
                    self.candidates.explicit_start = Some(index);
                }
            }
            _ => {}
        }

        let run = ensure_run(runs, index);
        let slot = run.slot_run_entry(ONLY_SLOT);
        let open_tentative = matches!(
            slot.current_unit_run(),
            Some(unit) if !unit.committed
        );
        if open_tentative {
            let unit = match slot.current_unit_run_mut() {
                Some(unit) => unit,
                None => return,
            };
            if unit.closed_at_eol {
                unit.reopen();
            }
            unit.push_line(line);
        } else {
            // First candidate after a committed unit: that unit is done,
            // and a new tentative one starts here.
            if let Some(current) = slot.current_unit_run_mut() {
                current.close_at_last_line(false);
            }
            let mut unit = UnitRun::new(Dialect::Legacy, index, false);
            unit.push_line(line);
            slot.push_unit(unit);
        }
    }

    fn push_running_line(&mut self, runs: &mut Vec<ClientRun>, line: LogLine) {
        let index = line.index();
        let is_signal = self.last_recognized != LogLineType::WorkUnitRunning;
        let run = ensure_run(runs, index);

        let mut reclaimed = Vec::new();
        {
            let slot = run.slot_run_entry(ONLY_SLOT);
            match slot.current_unit_run_mut() {
                Some(unit) if !unit.committed && is_signal => {
                    let start = self.candidates.choose_start(index);
                    reclaimed = unit.drain_lines_below(start);
                    unit.set_start_index(start);
                    if let Some(queue) = self.candidates.queue_index {
                        unit.set_queue_index(queue);
                    }
                    unit.mark_committed();
                    unit.push_line(line);
                    self.candidates.reset();
                }
                Some(unit) => {
                    // Already committed: this is a resume, or more running
                    // chatter within the same unit.
                    if unit.closed_at_eol {
                        unit.reopen();
                    }
                    unit.push_line(line);
                }
                None => {
                    // Running evidence with no lead-up at all; the signal
                    // line is the best start we have.
                    let mut unit = UnitRun::new(Dialect::Legacy, index, true);
                    unit.push_line(line);
                    slot.push_unit(unit);
                    self.candidates.reset();
                }
            }
        }
        run.reclaim_lines(reclaimed);
    }

    fn push_body_line(&mut self, runs: &mut Vec<ClientRun>, line: LogLine) {
        let run = ensure_run(runs, line.index());
        let slot = run.slot_run_entry(ONLY_SLOT);
        match slot.current_unit_run_mut() {
            Some(unit) if !unit.is_complete() || unit.closed_at_eol => {
                if unit.closed_at_eol {
                    unit.reopen();
                }
                unit.push_line(line);
            }
            _ => run.push_line(line),
        }
    }
}

/// Logs that start mid-stream get a synthetic client run at the first line.
fn ensure_run(runs: &mut Vec<ClientRun>, index: u32) -> &mut ClientRun {
    if runs.is_empty() {
        runs.push(ClientRun::new(Dialect::Legacy, index));
    }
    match runs.last_mut() {
        Some(run) => run,
        None => unreachable!("run pushed above"),
    }
}
