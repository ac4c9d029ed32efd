mod mode;
pub mod parser;
mod store;
mod table;
pub mod watch;
pub mod worker;

pub use mode::{LoadStatus, Mode};
pub use store::{RuleStore, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use table::RuleTable;
pub use watch::RuleWatcher;
