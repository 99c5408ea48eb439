//! Release channels published on the upstream download page.

use std::fmt;

use clap::ValueEnum;

/// Upstream release track.
///
/// The download page lists exactly two tracks, each in its own table row.
/// The row label is the only reliable way to tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Channel {
    /// The current stable release.
    Stable,
    /// The current pre-release ("latest") build.
    Latest,
}

impl Channel {
    /// Lowercase channel name, as used in record files and CLI arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Latest => "latest",
        }
    }

    /// Visible text that identifies this channel's table row on the page.
    pub fn row_label(&self) -> &'static str {
        match self {
            Channel::Stable => "TWS API Stable",
            Channel::Latest => "TWS API Latest",
        }
    }

    /// File name of this channel's version record in the destination tree.
    pub fn record_file_name(&self) -> String {
        format!(".ibapi_{}_version", self.name())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
