use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic payload cached on a line whose parser could not extract the
/// expected value.
///
/// A parse failure never aborts a scan; the line keeps its classification and
/// raw text, and consumers see this error through the payload accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLineParseError {
    message: String,
}

impl LogLineParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LogLineParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log line parse error: {}", self.message)
    }
}

impl std::error::Error for LogLineParseError {}
