use std::cell::OnceCell;
use std::fmt;

use chrono::NaiveTime;

use crate::{fahclient, legacy};
use fahlog_types::{Dialect, LogLineData, LogLineParseError, LogLineType};

/// Outcome of running a line's payload parser: either the typed payload or
/// a diagnostic describing why the body did not match its tag's grammar.
pub type LineDataResult = Result<LogLineData, LogLineParseError>;

/// One classified log line.
///
/// Classification is eager (it is one substring cascade), but the payload
/// and timestamp are parsed on first request and memoized. The caches use
/// `OnceCell`, so a `LogLine` is single-thread data; share the derived
/// values, not the line.
#[derive(Debug, Clone)]
pub struct LogLine {
    index: u32,
    raw: String,
    line_type: LogLineType,
    dialect: Dialect,
    data: OnceCell<Option<LineDataResult>>,
    timestamp: OnceCell<Option<NaiveTime>>,
}

impl LogLine {
    /// Classify `raw` under `dialect` at position `index`.
    pub fn parse(dialect: Dialect, index: u32, raw: String) -> Self {
        let line_type = match dialect {
            Dialect::Legacy => legacy::resolve_line_type(&raw),
            Dialect::FahClient => fahclient::resolve_line_type(&raw),
        };
        LogLine {
            index,
            raw,
            line_type,
            dialect,
            data: OnceCell::new(),
            timestamp: OnceCell::new(),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn line_type(&self) -> LogLineType {
        self.line_type
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The line's typed payload, parsed on first call.
    ///
    /// `None` means this tag carries no payload. `Some(Err(..))` means the
    /// tag matched but the body did not; callers fold over the `Ok` values
    /// and treat parse errors as absent data.
    pub fn data(&self) -> Option<&LineDataResult> {
        self.data
            .get_or_init(|| match self.dialect {
                Dialect::Legacy => legacy::parse_line_data(self),
                Dialect::FahClient => fahclient::parse_line_data(self),
            })
            .as_ref()
    }

    /// The wall-clock time prefix, parsed on first call.
    ///
    /// Legacy lines open with `[HH:MM:SS]`; FahClient lines open with
    /// `HH:MM:SS:`. Lines without either prefix have no timestamp.
    pub fn timestamp(&self) -> Option<NaiveTime> {
        *self.timestamp.get_or_init(|| {
            let bytes = self.raw.as_bytes();
            if bytes.len() >= 10 && bytes[0] == b'[' && bytes[9] == b']' {
                return self
                    .raw
                    .get(1..9)
                    .and_then(|stamp| NaiveTime::parse_from_str(stamp, "%H:%M:%S").ok());
            }
            if bytes.len() >= 9 && bytes[8] == b':' {
                return self
                    .raw
                    .get(..8)
                    .and_then(|stamp| NaiveTime::parse_from_str(stamp, "%H:%M:%S").ok());
            }
            None
        })
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
