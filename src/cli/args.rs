//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::channel::Channel;

/// ibsync - Keeps a vendored TWS API client in sync with upstream releases.
#[derive(Debug, Parser)]
#[command(name = "ibsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Destination tree holding the vendored client (overrides current directory)
    #[arg(short, long, global = true)]
    pub dest: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override the upstream download page URL (for testing)
    #[arg(long, global = true, hide = true)]
    pub page_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check whether a newer release is available
    Check(CheckArgs),

    /// Check and install a newer release if one is available
    Update(UpdateArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Release channel to check
    #[arg(value_enum)]
    pub channel: Channel,
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, clap::Args)]
pub struct UpdateArgs {
    /// Release channel to install
    #[arg(value_enum)]
    pub channel: Channel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_with_channel() {
        let cli = Cli::try_parse_from(["ibsync", "check", "stable"]).unwrap();
        match cli.command {
            Commands::Check(args) => assert_eq!(args.channel, Channel::Stable),
            other => panic!("expected check command, got {other:?}"),
        }
    }

    #[test]
    fn parses_update_with_channel() {
        let cli = Cli::try_parse_from(["ibsync", "update", "latest"]).unwrap();
        match cli.command {
            Commands::Update(args) => assert_eq!(args.channel, Channel::Latest),
            other => panic!("expected update command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_channel() {
        assert!(Cli::try_parse_from(["ibsync", "check", "nightly"]).is_err());
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Cli::try_parse_from(["ibsync"]).is_err());
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ibsync", "check", "stable", "--dest", "/tmp/x", "--debug"])
                .unwrap();
        assert_eq!(cli.dest, Some(PathBuf::from("/tmp/x")));
        assert!(cli.debug);
    }

    #[test]
    fn page_url_override_is_accepted() {
        let cli = Cli::try_parse_from([
            "ibsync",
            "check",
            "stable",
            "--page-url",
            "http://127.0.0.1:9999/",
        ])
        .unwrap();
        assert_eq!(cli.page_url.as_deref(), Some("http://127.0.0.1:9999/"));
    }
}
