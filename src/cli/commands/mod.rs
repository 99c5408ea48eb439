//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting exit codes. Commands are
//! dispatched via [`CommandDispatcher`].

pub mod check;
pub mod dispatcher;
pub mod update;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use crate::pipeline::SyncReport;

/// Human-readable run summary, printed after the machine-readable sink lines.
pub(crate) fn summarize(report: &SyncReport) {
    let current = report
        .current
        .as_ref()
        .map_or_else(|| "unknown".to_string(), |v| v.to_string());
    let new = report
        .new_version()
        .map_or_else(|| "unknown".to_string(), |v| v.to_string());

    println!("Current {} version: {}", report.channel, current);
    println!("Available {} version: {}", report.channel, new);
    println!("Update needed: {}", report.has_update);
}
