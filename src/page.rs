//! Download page scraping.
//!
//! The upstream distribution has no feed or registry; the only discovery
//! surface is an HTML landing page with one table row per release channel.
//! A qualifying row contains an anchor whose href carries the platform
//! archive marker and a `.zip` suffix, plus the channel's label and an
//! `API major.minor` version in its visible text.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::channel::Channel;
use crate::error::{Result, SyncError};
use crate::version::Version;

/// Upstream landing page listing both release channels.
pub const DOWNLOAD_PAGE_URL: &str = "https://interactivebrokers.github.io/#";

/// Filename marker identifying the Mac/Unix archive among the row's links.
const ARCHIVE_MARKER: &str = "twsapi_macunix";

/// Page fetches are small; keep this shorter than the archive timeout.
const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

static RE_ROW_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"API\s+(\d+)\.(\d+)").unwrap());

static RE_FILENAME_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"twsapi_macunix\.(\d+)\.(\d+)").unwrap());

/// Result of resolving one channel against the current page.
#[derive(Debug, Clone)]
pub struct ReleaseArtifact {
    pub channel: Channel,
    /// Absolute download URL for the channel's ZIP archive.
    pub download_url: String,
    /// Version advertised on the page, if it could be extracted.
    pub version: Option<Version>,
}

/// Resolves a release channel to its download URL and advertised version.
pub struct PageLocator {
    client: Client,
    page_url: String,
}

impl PageLocator {
    /// Create a locator for the real upstream page.
    pub fn new() -> Self {
        Self::with_page_url(DOWNLOAD_PAGE_URL)
    }

    /// Create a locator against an alternate page URL (used by tests).
    pub fn with_page_url(page_url: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent("ibsync")
                .timeout(PAGE_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            page_url: page_url.to_string(),
        }
    }

    /// Get the page URL this locator scrapes.
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// Fetch the page and locate `channel`'s download link and version.
    pub fn resolve(&self, channel: Channel) -> Result<ReleaseArtifact> {
        tracing::debug!("Fetching download page {}", self.page_url);

        let response = self
            .client
            .get(&self.page_url)
            .send()
            .map_err(|e| SyncError::Discovery {
                message: format!("failed to fetch {}: {}", self.page_url, e),
            })?;

        if !response.status().is_success() {
            return Err(SyncError::Discovery {
                message: format!("HTTP {} fetching {}", response.status(), self.page_url),
            });
        }

        let html = response.text().map_err(|e| SyncError::Discovery {
            message: format!("failed to read {}: {}", self.page_url, e),
        })?;

        resolve_in_page(&html, channel, &self.page_url)
    }
}

impl Default for PageLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate a channel's artifact inside an already-fetched page.
///
/// Split from the fetch for testability with static HTML. The page is
/// assumed to list each channel's link exactly once; the first matching
/// row wins and no further disambiguation is attempted.
fn resolve_in_page(html: &str, channel: Channel, page_url: &str) -> Result<ReleaseArtifact> {
    let document = Html::parse_document(html);
    let anchor_sel = Selector::parse("a[href]").expect("static selector");

    for anchor in document.select(&anchor_sel) {
        let href = anchor.value().attr("href").unwrap_or_default();
        if !href.contains(ARCHIVE_MARKER) || !href.contains(".zip") {
            continue;
        }

        let Some(row) = enclosing_row(anchor) else {
            continue;
        };
        let row_text = row.text().collect::<String>();
        if !row_text.contains(channel.row_label()) {
            continue;
        }

        let version = row_version(&row_text).or_else(|| filename_version(href));
        if version.is_none() {
            tracing::warn!("Could not extract a version for '{}'", channel.row_label());
        }

        return Ok(ReleaseArtifact {
            channel,
            download_url: normalize_url(href, page_url),
            version,
        });
    }

    Err(SyncError::Discovery {
        message: format!(
            "no '{}' download link found on {}",
            channel.row_label(),
            page_url
        ),
    })
}

/// Walk up from an anchor to its enclosing table row.
fn enclosing_row(anchor: ElementRef<'_>) -> Option<ElementRef<'_>> {
    anchor.ancestors().find_map(|node| {
        let element = ElementRef::wrap(node)?;
        (element.value().name() == "tr").then_some(element)
    })
}

/// Extract `major.minor` from row text like "TWS API Stable - API 10.37".
fn row_version(row_text: &str) -> Option<Version> {
    let caps = RE_ROW_VERSION.captures(row_text)?;
    Some(Version::new(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        None,
    ))
}

/// Fallback: extract `major.minor` from the archive filename itself.
fn filename_version(href: &str) -> Option<Version> {
    let caps = RE_FILENAME_VERSION.captures(href)?;
    Some(Version::new(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        None,
    ))
}

/// Rewrite protocol-relative and root-relative hrefs to absolute URLs.
///
/// `//host/path` gets an `https:` prefix; `/path` is resolved against the
/// page's own origin; anything else is used verbatim.
pub fn normalize_url(href: &str, page_url: &str) -> String {
    if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        match Url::parse(page_url).and_then(|base| base.join(href)) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Could not resolve {} against {}: {}", href, page_url, e);
                href.to_string()
            }
        }
    } else {
        href.to_string()
    }
}
