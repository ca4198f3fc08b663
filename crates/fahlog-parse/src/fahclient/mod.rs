//! FahClient (v7) dialect: multi-slot logs with `WU##:FS##` routing
//! prefixes, an RFC 3339 log open banner, and core results reported both
//! by the core (`Core Shutdown:`) and the client (`FahCore returned:`).

mod data;
mod resolver;

pub use data::parse_line_data;
pub use resolver::resolve_line_type;
