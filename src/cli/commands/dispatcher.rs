//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::pipeline::SyncPipeline;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self) -> Result<CommandResult>;
}

/// Result of command execution.
///
/// Exit codes follow the CI-friendly polarity: 0 when an update exists or
/// was applied, 1 when the destination is already up to date. Fatal errors
/// exit with 2 from `main`, so callers can tell "nothing to do" apart from
/// "the run broke".
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command completed without a fatal error.
    pub success: bool,

    /// Exit code to use.
    pub exit_code: i32,
}

impl CommandResult {
    /// An update exists or was applied.
    pub fn update_available() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// The destination is already up to date.
    pub fn up_to_date() -> Self {
        Self {
            success: true,
            exit_code: 1,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    dest_root: PathBuf,
    page_url: Option<String>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given destination tree.
    pub fn new(dest_root: PathBuf, page_url: Option<String>) -> Self {
        Self {
            dest_root,
            page_url,
        }
    }

    /// Get the destination tree path.
    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli) -> Result<CommandResult> {
        match &cli.command {
            Commands::Check(args) => {
                let cmd = super::check::CheckCommand::new(self.pipeline(), args.clone());
                cmd.execute()
            }
            Commands::Update(args) => {
                let cmd = super::update::UpdateCommand::new(self.pipeline(), args.clone());
                cmd.execute()
            }
        }
    }

    fn pipeline(&self) -> SyncPipeline {
        match &self.page_url {
            Some(url) => SyncPipeline::with_page_url(&self.dest_root, url),
            None => SyncPipeline::new(&self.dest_root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_available_exits_zero() {
        let result = CommandResult::update_available();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn up_to_date_exits_one() {
        let result = CommandResult::up_to_date();
        assert!(result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_keeps_dest_root() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/tmp/project"), None);
        assert_eq!(dispatcher.dest_root(), Path::new("/tmp/project"));
    }

    #[test]
    fn dispatcher_pipeline_honors_page_url() {
        let dispatcher = CommandDispatcher::new(
            PathBuf::from("/tmp/project"),
            Some("http://127.0.0.1:1/".to_string()),
        );
        let _ = dispatcher.pipeline();
    }
}
