//! Streaming run-assembly state machines, one per dialect.
//!
//! Both machines are driven one line at a time and may be resumed after
//! [`finish`](crate::RunLog::finish): appending more lines reopens units
//! that were closed only because the log had ended.

pub(crate) mod fahclient;
pub(crate) mod legacy;

use fahlog_parse::LogLine;
use fahlog_types::Dialect;

use crate::run::ClientRun;

#[derive(Debug)]
pub(crate) enum AssemblerState {
    Legacy(legacy::LegacyState),
    FahClient(fahclient::FahClientState),
}

impl AssemblerState {
    pub(crate) fn new(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Legacy => AssemblerState::Legacy(legacy::LegacyState::new()),
            Dialect::FahClient => AssemblerState::FahClient(fahclient::FahClientState::new()),
        }
    }

    pub(crate) fn handle(&mut self, runs: &mut Vec<ClientRun>, line: LogLine) {
        match self {
            AssemblerState::Legacy(state) => state.handle(runs, line),
            AssemblerState::FahClient(state) => state.handle(runs, line),
        }
    }

    pub(crate) fn finish(&mut self, runs: &mut Vec<ClientRun>) {
        if let AssemblerState::FahClient(state) = self {
            state.flush_at_end(runs);
        }
        for run in runs.iter_mut() {
            run.close_open_units(true);
        }
    }

    /// Lines accepted but not yet attached to any run.
    pub(crate) fn pending_lines(&self) -> &[LogLine] {
        match self {
            AssemblerState::Legacy(_) => &[],
            AssemblerState::FahClient(state) => state.pending_lines(),
        }
    }
}
