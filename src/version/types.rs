//! Common types shared by the catalog, the checker and the HTTP layer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::version::semver::{InvalidVersion, VersionNumber};

/// Release maturity tier
///
/// Variants are declared from least to most stable so that the derived
/// ordering reads naturally: `Stable > ReleaseCandidate > Beta > Alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseChannel {
    Alpha,
    Beta,
    ReleaseCandidate,
    Stable,
}

impl ReleaseChannel {
    /// All channels, most stable first
    pub const BY_STABILITY: [ReleaseChannel; 4] = [
        ReleaseChannel::Stable,
        ReleaseChannel::ReleaseCandidate,
        ReleaseChannel::Beta,
        ReleaseChannel::Alpha,
    ];

    /// Returns the canonical label used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseChannel::Stable => "STABLE",
            ReleaseChannel::ReleaseCandidate => "RC",
            ReleaseChannel::Beta => "BETA",
            ReleaseChannel::Alpha => "ALPHA",
        }
    }

    /// Maps the legacy `isBeta` / `isRC` flags onto a channel.
    ///
    /// Beta wins when a client sets both.
    pub fn from_flags(is_beta: bool, is_rc: bool) -> Self {
        match (is_beta, is_rc) {
            (true, _) => ReleaseChannel::Beta,
            (false, true) => ReleaseChannel::ReleaseCandidate,
            (false, false) => ReleaseChannel::Stable,
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown release channel '{0}' (expected STABLE, RC, BETA or ALPHA)")]
pub struct UnknownChannel(pub String);

impl FromStr for ReleaseChannel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "STABLE" => Ok(ReleaseChannel::Stable),
            "RC" | "RELEASE_CANDIDATE" => Ok(ReleaseChannel::ReleaseCandidate),
            "BETA" => Ok(ReleaseChannel::Beta),
            "ALPHA" => Ok(ReleaseChannel::Alpha),
            _ => Err(UnknownChannel(s.to_string())),
        }
    }
}

impl Serialize for ReleaseChannel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReleaseChannel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when a `<version>b<build> <LABEL>` string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("empty release descriptor")]
    Empty,

    #[error(transparent)]
    Version(#[from] InvalidVersion),

    #[error("build number '{0}' is not a non-negative integer")]
    Build(String),

    #[error(transparent)]
    Channel(#[from] UnknownChannel),
}

/// A specific release: version, build number and channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDescriptor {
    version: VersionNumber,
    build: u64,
    channel: ReleaseChannel,
}

impl VersionDescriptor {
    pub fn new(version: VersionNumber, build: u64, channel: ReleaseChannel) -> Self {
        Self {
            version,
            build,
            channel,
        }
    }

    pub fn version(&self) -> &VersionNumber {
        &self.version
    }

    pub fn build(&self) -> u64 {
        self.build
    }

    pub fn channel(&self) -> ReleaseChannel {
        self.channel
    }

    /// Whether this release supersedes `other`.
    ///
    /// A higher version always wins; on equal versions the higher build
    /// wins. The channel takes no part in the comparison.
    pub fn is_newer_than(&self, other: &VersionDescriptor) -> bool {
        self.version > other.version
            || (self.version == other.version && self.build > other.build)
    }
}

/// Renders `<version>b<build>` followed by the channel label, which is
/// omitted for stable releases.
impl fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}b{}", self.version, self.build)?;
        if self.channel != ReleaseChannel::Stable {
            write!(f, " {}", self.channel)?;
        }
        Ok(())
    }
}

/// Parses the form produced by `Display`. The build and the label are
/// optional: `1.2` is stable build 0, `1.2b5` is stable build 5.
impl FromStr for VersionDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (release, label) = match s.split_once(char::is_whitespace) {
            Some((release, label)) => (release, Some(label)),
            None => (s, None),
        };
        if release.is_empty() {
            return Err(DescriptorError::Empty);
        }

        let (version, build) = match release.split_once('b') {
            Some((version, build)) => {
                let build = build
                    .parse::<u64>()
                    .map_err(|_| DescriptorError::Build(build.to_string()))?;
                (version, build)
            }
            None => (release, 0),
        };

        let channel = match label {
            Some(label) => label.parse()?,
            None => ReleaseChannel::Stable,
        };

        Ok(Self::new(version.parse()?, build, channel))
    }
}

/// Outcome of a version check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Whether the client already runs the newest eligible release
    pub up_to_date: bool,
    /// The release to upgrade to, present only when outdated
    pub latest: Option<VersionDescriptor>,
}

impl CheckResult {
    pub fn up_to_date() -> Self {
        Self {
            up_to_date: true,
            latest: None,
        }
    }

    pub fn outdated(latest: VersionDescriptor) -> Self {
        Self {
            up_to_date: false,
            latest: Some(latest),
        }
    }
}
