//! Logging setup shared by prio binaries.
mod logger;
pub use logger::*;
