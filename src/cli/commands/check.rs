//! Check command implementation.
//!
//! `ibsync check <channel>` resolves the page, compares against the local
//! baseline, and reports. It never touches the destination tree.

use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::output;
use crate::pipeline::SyncPipeline;

use super::dispatcher::{Command, CommandResult};
use super::summarize;

/// The check command implementation.
pub struct CheckCommand {
    pipeline: SyncPipeline,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(pipeline: SyncPipeline, args: CheckArgs) -> Self {
        Self { pipeline, args }
    }
}

impl Command for CheckCommand {
    fn execute(&self) -> Result<CommandResult> {
        let report = self.pipeline.run(self.args.channel, false)?;

        output::emit(&report)?;
        summarize(&report);

        Ok(if report.has_update {
            CommandResult::update_available()
        } else {
            CommandResult::up_to_date()
        })
    }
}
