// src/pipeline/mod.rs

//! Pipeline entry points for monitor operations.
//!
//! - `run_cycle`: one fetch -> parse -> classify -> state-update pass
//! - `run_watch`: the polling loop around it

mod announce;
mod cycle;
mod watch;

pub use announce::{Announcer, LogAnnouncer};
pub use cycle::{run_cycle, CycleContext, CycleReport, FetchStatus};
pub use watch::{refresh_channel, run_watch, RefreshHandle};
