//! ibsync - Keeps a vendored Interactive Brokers TWS API client in sync
//! with the upstream distribution.
//!
//! Upstream publishes the client only as a versioned ZIP archive linked from
//! an HTML landing page, one table row per release channel. ibsync scrapes
//! that page, compares the advertised version against a persisted per-channel
//! record, and on request downloads, extracts, and selectively installs the
//! new payload into the destination tree.
//!
//! # Modules
//!
//! - [`archive`] - Streaming archive download and ZIP extraction
//! - [`channel`] - The two upstream release channels
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`install`] - Allow-listed copy of the payload into the destination
//! - [`output`] - CI result sink (`key=value` lines)
//! - [`page`] - Download page scraping and URL normalization
//! - [`payload`] - Payload location inside an extracted archive
//! - [`pipeline`] - Orchestration of a full check or update run
//! - [`record`] - Persisted per-channel version records
//! - [`version`] - Version parsing and comparison
//!
//! # Example
//!
//! ```
//! use ibsync::version::{is_newer, Version};
//!
//! let local = Version::parse("10.30.0");
//! let remote = Version::parse("10.37");
//! assert!(is_newer(remote.as_ref(), local.as_ref()));
//! ```

pub mod archive;
pub mod channel;
pub mod cli;
pub mod error;
pub mod install;
pub mod output;
pub mod page;
pub mod payload;
pub mod pipeline;
pub mod record;
pub mod version;

pub use error::{Result, SyncError};
