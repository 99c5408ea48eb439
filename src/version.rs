//! Version parsing and comparison.
//!
//! Upstream publishes versions in two shapes: the download page shows
//! `major.minor` (e.g. "10.37") while the installed client's metadata carries
//! the full `major.minor.micro` triple (e.g. "10.37.1"). Comparison always
//! happens over the normalized integer triple, never string order; display
//! preserves whichever shape the value was parsed from.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static RE_DOTTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").unwrap());

/// Version embedded in the client package metadata, e.g.
/// `VERSION = {"major": 10, "minor": 37, "micro": 1}`.
static RE_METADATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"VERSION\s*=\s*\{\s*"major":\s*(\d+),\s*"minor":\s*(\d+),\s*"micro":\s*(\d+)\s*\}"#)
        .unwrap()
});

/// A dotted numeric version with two or three components.
#[derive(Debug, Clone)]
pub struct Version {
    major: u32,
    minor: u32,
    micro: Option<u32>,
}

impl Version {
    /// Create a version from explicit components.
    pub fn new(major: u32, minor: u32, micro: Option<u32>) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// Parse a `major.minor[.micro]` string.
    ///
    /// Returns `None` for anything else; callers treat unparsable versions
    /// as absent rather than failing.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = RE_DOTTED.captures(s.trim())?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            micro: match caps.get(3) {
                Some(m) => Some(m.as_str().parse().ok()?),
                None => None,
            },
        })
    }

    /// Extract the version from client package metadata text.
    pub fn from_metadata(content: &str) -> Option<Self> {
        let caps = RE_METADATA.captures(content)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            micro: Some(caps[3].parse().ok()?),
        })
    }

    /// Normalize to a three-component tuple; a missing micro counts as zero.
    pub fn normalized(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.micro.unwrap_or(0))
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| anyhow::anyhow!("invalid version string: {s:?}"))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.micro {
            Some(micro) => write!(f, "{}.{}.{}", self.major, self.minor, micro),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

// Equality and ordering follow the normalized triple, so "10.37" == "10.37.0".
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }
}

/// Decide whether `remote` is strictly newer than `local`.
///
/// No local baseline means any remote version counts as an update; no remote
/// version means an update can never be asserted.
pub fn is_newer(remote: Option<&Version>, local: Option<&Version>) -> bool {
    match (remote, local) {
        (Some(remote), Some(local)) => remote > local,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
