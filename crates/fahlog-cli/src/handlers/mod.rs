pub mod summary;
pub mod units;
pub mod watch;
