//! Persisted version records.
//!
//! The destination tree owns one small JSON record per channel, recording the
//! last version installed from that channel. Records are the only state that
//! outlives a run. Reads fall back through an ordered chain of sources;
//! anything absent or malformed falls through to the next source, so a
//! damaged record means "no baseline", never a hard failure.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::install;
use crate::version::Version;

/// Legacy shared record file, tagged with the channel it belongs to.
pub const SHARED_RECORD_FILE: &str = ".ibapi_version";

/// On-disk shape of a version record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Channel name ("stable" or "latest").
    #[serde(rename = "type")]
    pub channel: String,
    /// Last installed version string.
    pub version: String,
}

/// Reads and writes per-channel version records in a destination tree.
pub struct VersionStore {
    root: PathBuf,
}

impl VersionStore {
    /// Create a store rooted at the destination tree.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Path of the channel-specific record file.
    pub fn record_path(&self, channel: Channel) -> PathBuf {
        self.root.join(channel.record_file_name())
    }

    /// Read the last installed version for a channel.
    ///
    /// Fallback order: channel-specific record file, then the shared record
    /// file (only when its channel tag matches), then the version embedded
    /// in the installed client metadata. `None` means no baseline exists and
    /// any remote version counts as an update.
    pub fn read(&self, channel: Channel) -> Option<Version> {
        self.read_channel_file(channel)
            .or_else(|| self.read_shared_file(channel))
            .or_else(|| self.read_installed_metadata())
    }

    /// Write the channel-specific record, overwriting any previous one.
    pub fn write(&self, channel: Channel, version: &Version) -> anyhow::Result<()> {
        let record = VersionRecord {
            channel: channel.name().to_string(),
            version: version.to_string(),
        };
        let path = self.record_path(channel);
        let content = serde_json::to_string_pretty(&record)?;
        fs::write(&path, content)?;
        tracing::debug!("Wrote version record {}", path.display());
        Ok(())
    }

    fn read_channel_file(&self, channel: Channel) -> Option<Version> {
        let record = load_record(&self.record_path(channel))?;
        Version::parse(&record.version)
    }

    fn read_shared_file(&self, channel: Channel) -> Option<Version> {
        let record = load_record(&self.root.join(SHARED_RECORD_FILE))?;
        if record.channel != channel.name() {
            return None;
        }
        Version::parse(&record.version)
    }

    fn read_installed_metadata(&self) -> Option<Version> {
        install::installed_version(&self.root)
    }
}

/// Load a record file, tolerating absence and malformed content.
fn load_record(path: &Path) -> Option<VersionRecord> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("Ignoring malformed version record {}: {}", path.display(), e);
            None
        }
    }
}
