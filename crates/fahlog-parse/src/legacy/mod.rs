//! Legacy (v6-era) single-slot dialect: `[HH:MM:SS]` prefixes, `#` banner
//! headers, one implicit compute slot.

mod data;
mod resolver;

pub use data::parse_line_data;
pub use resolver::resolve_line_type;
