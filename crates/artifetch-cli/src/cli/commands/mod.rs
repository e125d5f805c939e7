//! CLI command handlers. Each command is in its own file.

mod checksum;
mod fetch;
mod progress;
mod resolve;

pub use checksum::run_checksum;
pub use fetch::{run_fetch, FetchOverrides};
pub use resolve::run_resolve;
