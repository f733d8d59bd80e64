use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Serialize, Serializer};

/// A dotted numeric release version such as `1`, `1.2` or `1.2.3`.
///
/// Components are compared as integers, so `1.10` is newer than `1.9`.
/// The text the version was parsed from is kept for display, which means
/// `1.2` and `1.2.0` compare equal but render differently.
#[derive(Debug, Clone)]
pub struct VersionNumber {
    raw: String,
    parsed: Version,
}

impl VersionNumber {
    /// Returns the version as it was written in the catalog or request
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the normalized `major.minor.patch` form
    pub fn normalized(&self) -> &Version {
        &self.parsed
    }
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros and
/// accepts an optional leading `v`. Each component is read as an integer,
/// so leading zeros are allowed and `1.02` is `1.2.0`. Pre-release and build
/// metadata are rejected: release maturity is expressed through the channel
/// instead.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "1.02.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.strip_prefix('v').unwrap_or(version);
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let parts = version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [major] => Some(Version::new(*major, 0, 0)),
        [major, minor] => Some(Version::new(*major, *minor, 0)),
        [major, minor, patch] => Some(Version::new(*major, *minor, *patch)),
        _ => None,
    }
}

/// Error returned when a version string is not a dotted numeric version
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a numeric version (expected e.g. 1, 1.2 or 1.2.3)")]
pub struct InvalidVersion(pub String);

impl FromStr for VersionNumber {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        parse_version(trimmed)
            .map(|parsed| Self {
                raw: trimmed.to_string(),
                parsed,
            })
            .ok_or_else(|| InvalidVersion(s.to_string()))
    }
}

impl From<u64> for VersionNumber {
    fn from(major: u64) -> Self {
        Self {
            raw: major.to_string(),
            parsed: Version::new(major, 0, 0),
        }
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for VersionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl PartialEq for VersionNumber {
    fn eq(&self, other: &Self) -> bool {
        self.parsed == other.parsed
    }
}

impl Eq for VersionNumber {}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parsed.cmp(&other.parsed)
    }
}
