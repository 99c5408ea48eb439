//! Update command implementation.
//!
//! `ibsync update <channel>` runs the same resolution as `check` and, when
//! the remote version is newer, installs it into the destination tree.

use crate::cli::args::UpdateArgs;
use crate::error::Result;
use crate::output;
use crate::pipeline::SyncPipeline;

use super::dispatcher::{Command, CommandResult};
use super::summarize;

/// The update command implementation.
pub struct UpdateCommand {
    pipeline: SyncPipeline,
    args: UpdateArgs,
}

impl UpdateCommand {
    /// Create a new update command.
    pub fn new(pipeline: SyncPipeline, args: UpdateArgs) -> Self {
        Self { pipeline, args }
    }
}

impl Command for UpdateCommand {
    fn execute(&self) -> Result<CommandResult> {
        let report = self.pipeline.run(self.args.channel, true)?;

        output::emit(&report)?;
        summarize(&report);

        if report.installed.is_some() {
            println!(
                "Update complete: {} files are current in {}",
                report.channel,
                self.pipeline.dest_root().display()
            );
        }

        Ok(if report.has_update {
            CommandResult::update_available()
        } else {
            CommandResult::up_to_date()
        })
    }
}
