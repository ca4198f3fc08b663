use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::Path;

use crate::error::Result;
use crate::line::LogLine;
use fahlog_types::Dialect;

/// Pull-based line source: wraps any `BufRead` and hands back classified
/// [`LogLine`]s with monotonically increasing indices.
///
/// Two read modes cover the two consumers. [`next_line`] is for whole-file
/// parsing: it drains to EOF and emits a final unterminated line as-is.
/// [`poll_line`] is for tailing a file that is still being written: it
/// refuses to emit a line until its terminator arrives, stashing the
/// partial tail so the next poll resumes where this one stopped.
///
/// [`next_line`]: LogLineReader::next_line
/// [`poll_line`]: LogLineReader::poll_line
pub struct LogLineReader<R> {
    source: R,
    dialect: Dialect,
    next_index: u32,
    pending: String,
}

impl LogLineReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>, dialect: Dialect) -> Result<Self> {
        let file = File::open(path)?;
        Ok(LogLineReader::new(BufReader::new(file), dialect))
    }
}

impl<R: BufRead> LogLineReader<R> {
    pub fn new(source: R, dialect: Dialect) -> Self {
        LogLineReader {
            source,
            dialect,
            next_index: 0,
            pending: String::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Read the next line, blocking until a line or EOF.
    ///
    /// At EOF a non-empty tail without a terminator is still emitted; the
    /// last line of a finished log file often lacks one.
    pub fn next_line(&mut self) -> Result<Option<LogLine>> {
        let mut buf = mem::take(&mut self.pending);
        let read = self.source.read_line(&mut buf)?;
        if read == 0 && buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.emit(buf)))
    }

    /// Read the next complete line, or `None` if the source has no complete
    /// line available yet.
    ///
    /// Unterminated data is stashed and re-joined on the next call, so a
    /// line split across two file-append events is emitted exactly once,
    /// whole.
    pub fn poll_line(&mut self) -> Result<Option<LogLine>> {
        let mut buf = mem::take(&mut self.pending);
        let read = self.source.read_line(&mut buf)?;
        if read == 0 || !buf.ends_with('\n') {
            self.pending = buf;
            return Ok(None);
        }
        Ok(Some(self.emit(buf)))
    }

    fn emit(&mut self, mut buf: String) -> LogLine {
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        let line = LogLine::parse(self.dialect, self.next_index, buf);
        self.next_index += 1;
        line
    }
}
