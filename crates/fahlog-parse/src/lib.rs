// Error types
pub mod error;

// Dialect-agnostic classification and shared grammar helpers
mod common;

// Dialect adapters
pub mod fahclient;
pub mod legacy;

// Parsed line and pull-based reader
pub mod line;
pub mod reader;

// Unit-info side-channel file
pub mod unitinfo;

pub use error::{Error, Result};
pub use line::{LineDataResult, LogLine};
pub use reader::LogLineReader;
pub use unitinfo::{UnitInfo, parse_unit_info, project_from_tag, read_unit_info};
