//! Swift tools versions.
//!
//! Wraps `semver::Version` and remembers how many components were written,
//! since `Package@swift-5.9.swift` and `Package@swift-5.9.0.swift` are
//! different files to SwiftPM.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};

static PROBE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Swift version (\d+)\.(\d+)(?:\.(\d+))?").expect("static pattern is valid")
});

/// A Swift tools version such as `5.9` or `5.10.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ToolsVersionRepr", into = "ToolsVersionRepr")]
pub struct ToolsVersion {
    version: semver::Version,
    explicit_patch: bool,
}

/// dump-package writes `{"_version": "5.7.0"}`; config files write `"5.7"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ToolsVersionRepr {
    Wrapped {
        #[serde(rename = "_version")]
        version: String,
    },
    Plain(String),
}

impl ToolsVersion {
    /// Construct from components. `patch: None` means "major.minor".
    pub fn new(major: u64, minor: u64, patch: Option<u64>) -> Self {
        Self {
            version: semver::Version::new(major, minor, patch.unwrap_or(0)),
            explicit_patch: patch.is_some(),
        }
    }

    /// Parse `5`, `5.9` or `5.9.2`.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || ManifestError::InvalidToolsVersion {
            raw: raw.to_string(),
        };
        let parts = raw
            .trim()
            .split('.')
            .map(|p| p.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        match parts.as_slice() {
            [major] => Ok(Self::new(*major, 0, None)),
            [major, minor] => Ok(Self::new(*major, *minor, None)),
            [major, minor, patch] => Ok(Self::new(*major, *minor, Some(*patch))),
            _ => Err(invalid()),
        }
    }

    /// Extract the compiler version from `swift --version` output.
    ///
    /// The driver prints its own version first
    /// (`swift-driver version: 1.90.11.1 Apple Swift version 5.10 ...`),
    /// so only the number following `Swift version` is accepted.
    pub fn from_probe_output(output: &str) -> Option<Self> {
        let caps = PROBE_PATTERN.captures(output)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        Some(Self::new(major, minor, patch))
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> Option<u64> {
        self.explicit_patch.then_some(self.version.patch)
    }

    /// The version-specific manifest file SwiftPM prefers for this version,
    /// e.g. `Package@swift-5.9.swift`.
    pub fn pinned_manifest_name(&self) -> String {
        format!("Package@swift-{self}.swift")
    }

    /// The value written after `// swift-tools-version:`.
    ///
    /// A zero patch is dropped so `5.7.0` renders as `5.7`.
    pub fn header(&self) -> String {
        if self.version.patch == 0 {
            format!("{}.{}", self.version.major, self.version.minor)
        } else {
            self.version.to_string()
        }
    }
}

impl fmt::Display for ToolsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch() {
            Some(patch) => write!(f, "{}.{}.{}", self.major(), self.minor(), patch),
            None => write!(f, "{}.{}", self.major(), self.minor()),
        }
    }
}

impl TryFrom<ToolsVersionRepr> for ToolsVersion {
    type Error = ManifestError;

    fn try_from(repr: ToolsVersionRepr) -> Result<Self> {
        match repr {
            ToolsVersionRepr::Wrapped { version } | ToolsVersionRepr::Plain(version) => {
                Self::parse(&version)
            }
        }
    }
}

impl From<ToolsVersion> for ToolsVersionRepr {
    fn from(v: ToolsVersion) -> Self {
        ToolsVersionRepr::Wrapped {
            version: v.version.to_string(),
        }
    }
}
