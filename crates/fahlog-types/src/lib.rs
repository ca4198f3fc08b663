pub mod data;
pub mod error;
pub mod line_type;
pub mod project;
pub mod result;
pub mod status;

pub use data::*;
pub use error::LogLineParseError;
pub use line_type::LogLineType;
pub use project::ProjectInfo;
pub use result::WorkUnitResult;
pub use status::SlotStatus;

use serde::{Deserialize, Serialize};

/// Log dialect emitted by a particular generation of the client.
///
/// The dialect is selected by the caller; nothing in this workspace
/// auto-detects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// v6-era single-slot client: `[HH:MM:SS]` prefixes, `#` banner headers.
    Legacy,
    /// v7+ multi-slot client: `HH:MM:SS:` prefixes, `WUxx:FSyy:` routing.
    FahClient,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Legacy => "legacy",
            Dialect::FahClient => "fahclient",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
