//! Run assembly and aggregation: turns a stream of classified log lines
//! into a tree of client runs, their slots, and the work units each slot
//! processed, with derived statistics cached behind dirty flags.

mod aggregate;
mod assemble;
mod cell;
mod run;

use std::io::BufRead;
use std::path::Path;

use fahlog_parse::{LogLine, LogLineReader, Result};
use fahlog_types::Dialect;

use assemble::AssemblerState;

pub use aggregate::{ClientRunData, FrameRecord, SlotRunData, UnitRunData};
pub use run::{ClientRun, SlotRun, UnitRun};

/// The assembled view of one log stream.
///
/// Feed lines with [`append`], in index order; call [`finish`] when the
/// stream ends. Both are resumable: appending after a finish reopens the
/// units the finish had to close, which is what makes live tailing of a
/// growing log file work.
///
/// [`append`]: RunLog::append
/// [`finish`]: RunLog::finish
#[derive(Debug)]
pub struct RunLog {
    dialect: Dialect,
    client_runs: Vec<ClientRun>,
    state: AssemblerState,
}

impl RunLog {
    pub fn new(dialect: Dialect) -> Self {
        RunLog {
            dialect,
            client_runs: Vec::new(),
            state: AssemblerState::new(dialect),
        }
    }

    /// Parse a whole log file in one call.
    pub fn read_file(path: impl AsRef<Path>, dialect: Dialect) -> Result<Self> {
        let mut reader = LogLineReader::open(path, dialect)?;
        let mut log = RunLog::new(dialect);
        log.read_from(&mut reader)?;
        log.finish();
        Ok(log)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Route one line into the tree.
    pub fn append(&mut self, line: LogLine) {
        debug_assert_eq!(line.dialect(), self.dialect);
        self.state.handle(&mut self.client_runs, line);
    }

    /// Drain a reader into the tree. Stops at whatever the reader's read
    /// mode treats as the end, so it works for both whole-file and tailing
    /// loops.
    pub fn read_from<R: BufRead>(&mut self, reader: &mut LogLineReader<R>) -> Result<()> {
        while let Some(line) = reader.next_line()? {
            self.append(line);
        }
        Ok(())
    }

    /// Mark end of input: units still open close as end-of-log, which
    /// leaves them eligible to reopen if the log turns out to grow.
    pub fn finish(&mut self) {
        self.state.finish(&mut self.client_runs);
    }

    /// All client runs, oldest first.
    pub fn client_runs(&self) -> &[ClientRun] {
        &self.client_runs
    }

    pub fn current_client_run(&self) -> Option<&ClientRun> {
        self.client_runs.last()
    }

    /// Every line fed in so far, in index order, wherever it ended up in
    /// the tree. The concatenated raw text round-trips the input.
    pub fn lines(&self) -> Vec<&LogLine> {
        let mut lines: Vec<&LogLine> = Vec::new();
        for run in &self.client_runs {
            lines.extend(run.log_lines());
            for slot in run.slot_runs() {
                for unit in slot.unit_runs() {
                    lines.extend(unit.log_lines());
                }
            }
        }
        lines.extend(self.state.pending_lines());
        lines.sort_by_key(|line| line.index());
        lines
    }
}
