//! The version-resolution-and-sync pipeline.
//!
//! Sequences page resolution, version comparison, and the
//! fetch→extract→locate→copy→commit chain. Discovery, fetch, extraction and
//! layout problems abort the run; version record and per-entry copy problems
//! are reported and the run continues. The install stage runs only when an
//! update was both requested and found; a plain check never downloads the
//! archive, though the page is always fetched since resolution is what tells
//! us whether an update exists.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::archive::ArchiveFetcher;
use crate::channel::Channel;
use crate::error::Result;
use crate::install;
use crate::page::{PageLocator, ReleaseArtifact};
use crate::payload;
use crate::record::VersionStore;
use crate::version::{is_newer, Version};

/// Outcome of one synchronization run.
#[derive(Debug)]
pub struct SyncReport {
    pub channel: Channel,
    /// Baseline read from the version store, if any.
    pub current: Option<Version>,
    /// Version advertised on the download page, if any.
    pub available: Option<Version>,
    /// Authoritative version written after an install, if one ran.
    pub installed: Option<Version>,
    /// Whether the remote version is newer than the baseline.
    pub has_update: bool,
}

impl SyncReport {
    /// The version to report as "new": the installed (payload metadata)
    /// value when an install ran, else the page-advertised one.
    pub fn new_version(&self) -> Option<&Version> {
        self.installed.as_ref().or(self.available.as_ref())
    }
}

/// Orchestrates a full check or update run against one destination tree.
pub struct SyncPipeline {
    dest_root: PathBuf,
    locator: PageLocator,
}

impl SyncPipeline {
    /// Create a pipeline against the real upstream page.
    pub fn new(dest_root: &Path) -> Self {
        Self {
            dest_root: dest_root.to_path_buf(),
            locator: PageLocator::new(),
        }
    }

    /// Create a pipeline scraping an alternate page URL (used by tests).
    pub fn with_page_url(dest_root: &Path, page_url: &str) -> Self {
        Self {
            dest_root: dest_root.to_path_buf(),
            locator: PageLocator::with_page_url(page_url),
        }
    }

    /// Get the destination tree this pipeline syncs into.
    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Run the pipeline for `channel`, installing only when `apply` is set
    /// and the remote version is newer than the local baseline.
    pub fn run(&self, channel: Channel, apply: bool) -> Result<SyncReport> {
        let store = VersionStore::new(&self.dest_root);
        let current = store.read(channel);

        let artifact = self.locator.resolve(channel)?;
        tracing::info!(
            "Channel {}: current {}, available {}",
            channel,
            display_or_unknown(current.as_ref()),
            display_or_unknown(artifact.version.as_ref()),
        );

        let has_update = is_newer(artifact.version.as_ref(), current.as_ref());

        let installed = if apply && has_update {
            self.perform_install(channel, &artifact, &store)?
        } else {
            if !has_update {
                tracing::info!("Channel {} is up to date", channel);
            } else if !apply {
                tracing::info!("Update available for {}; not requested", channel);
            }
            None
        };

        Ok(SyncReport {
            channel,
            current,
            available: artifact.version,
            installed,
            has_update,
        })
    }

    /// Fetch, extract, locate, copy, and commit the version record.
    ///
    /// The whole attempt works inside one scoped temporary workspace, removed
    /// when this function returns on any path.
    fn perform_install(
        &self,
        channel: Channel,
        artifact: &ReleaseArtifact,
        store: &VersionStore,
    ) -> Result<Option<Version>> {
        let fetcher = ArchiveFetcher::new();
        let workspace = TempDir::new()?;

        let archive = fetcher.download(&artifact.download_url, workspace.path())?;

        let extract_dir = workspace.path().join("extracted");
        fs::create_dir(&extract_dir)?;
        fetcher.extract(&archive, &extract_dir)?;

        let payload_dir = payload::locate(&extract_dir)?;
        let installed = install::install(&payload_dir, &self.dest_root);

        // Metadata embedded in the payload is authoritative; the page value
        // only stands in when the metadata was unreadable.
        let recorded = installed.or_else(|| artifact.version.clone());
        match &recorded {
            Some(version) => {
                if let Err(e) = store.write(channel, version) {
                    tracing::warn!("Could not write version record: {}", e);
                } else {
                    tracing::info!("Installed {} version {}", channel, version);
                }
            }
            None => tracing::warn!("No version could be determined for the installed payload"),
        }

        Ok(recorded)
    }
}

fn display_or_unknown(version: Option<&Version>) -> String {
    version.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_version_prefers_installed_over_available() {
        let report = SyncReport {
            channel: Channel::Stable,
            current: Version::parse("10.30.0"),
            available: Version::parse("10.37"),
            installed: Version::parse("10.37.1"),
            has_update: true,
        };
        assert_eq!(report.new_version(), Version::parse("10.37.1").as_ref());
    }

    #[test]
    fn new_version_falls_back_to_available() {
        let report = SyncReport {
            channel: Channel::Stable,
            current: None,
            available: Version::parse("10.41"),
            installed: None,
            has_update: true,
        };
        assert_eq!(report.new_version(), Version::parse("10.41").as_ref());
    }

    #[test]
    fn new_version_may_be_absent() {
        let report = SyncReport {
            channel: Channel::Latest,
            current: None,
            available: None,
            installed: None,
            has_update: false,
        };
        assert!(report.new_version().is_none());
    }
}
