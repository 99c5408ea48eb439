//! Archive download and extraction.
//!
//! Downloads stream to disk in bounded chunks inside a caller-owned scoped
//! workspace; nothing here allocates the whole archive in memory. The
//! progress bar is a side effect only and never affects correctness.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::Url;

use crate::error::{Result, SyncError};

/// Archives run to tens of megabytes; allow more time than the page fetch.
const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(60);

const CHUNK_SIZE: usize = 8192;

/// Downloads and extracts release archives.
pub struct ArchiveFetcher {
    client: Client,
}

impl ArchiveFetcher {
    /// Create a fetcher with the archive download timeout.
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("ibsync")
                .timeout(ARCHIVE_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Download `url` into `dest_dir`, returning the archive path.
    ///
    /// Fails with [`SyncError::Fetch`] on network errors, non-success status,
    /// or an empty body (a zero-byte ZIP can never extract).
    pub fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        tracing::info!("Downloading {}", url);

        let mut response = self.client.get(url).send().map_err(|e| SyncError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(SyncError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let bar = progress_bar(total);

        let dest = dest_dir.join(archive_file_name(url));
        let mut file = File::create(&dest)?;
        let mut buf = [0u8; CHUNK_SIZE];
        let mut downloaded: u64 = 0;

        loop {
            let n = response.read(&mut buf).map_err(|e| SyncError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            downloaded += n as u64;
            bar.set_position(downloaded);
        }
        bar.finish_and_clear();

        if downloaded == 0 {
            return Err(SyncError::Fetch {
                url: url.to_string(),
                message: "empty response body".to_string(),
            });
        }

        tracing::info!("Download complete: {} ({} bytes)", dest.display(), downloaded);
        Ok(dest)
    }

    /// Extract a ZIP archive into `dest_dir`.
    ///
    /// The caller owns `dest_dir` as a scoped workspace, so a failed
    /// extraction leaves no partial state behind once that scope exits.
    pub fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        tracing::info!("Extracting {} to {}", archive.display(), dest_dir.display());

        let file = File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file).map_err(|e| SyncError::Extract {
            path: archive.to_path_buf(),
            message: e.to_string(),
        })?;
        zip.extract(dest_dir).map_err(|e| SyncError::Extract {
            path: archive.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::info!("Extraction complete");
        Ok(())
    }
}

impl Default for ArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    if total == 0 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan} {bytes}/{total_bytes} ({eta})")
            .expect("static progress template"),
    );
    bar
}

/// Last path segment of the download URL, for a recognizable temp file name.
fn archive_file_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.last())
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| "download.zip".to_string())
}
