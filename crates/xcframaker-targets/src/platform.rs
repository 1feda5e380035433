//! The set of platforms a library can be archived for.
//!
//! Each variant maps to a generic `xcodebuild` destination and to the SDK
//! name Xcode uses when it lays out intermediates for that destination.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// A target platform destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// iPhone and iPad devices.
    Ios,
    /// The iOS simulator.
    IosSimulator,
    /// Native macOS.
    Macos,
    /// iPad apps running on macOS.
    MacCatalyst,
    /// Apple TV devices.
    Tvos,
    /// The tvOS simulator.
    TvosSimulator,
    /// Apple Watch devices.
    Watchos,
    /// The watchOS simulator.
    WatchosSimulator,
    /// Apple Vision Pro devices.
    Visionos,
    /// The visionOS simulator.
    VisionosSimulator,
}

impl Platform {
    /// Every known platform, in the order builds are attempted by default.
    pub const ALL: [Platform; 10] = [
        Platform::Ios,
        Platform::IosSimulator,
        Platform::Macos,
        Platform::MacCatalyst,
        Platform::Tvos,
        Platform::TvosSimulator,
        Platform::Watchos,
        Platform::WatchosSimulator,
        Platform::Visionos,
        Platform::VisionosSimulator,
    ];

    /// The canonical identifier (e.g., "ios-simulator").
    pub fn identifier(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::IosSimulator => "ios-simulator",
            Platform::Macos => "macos",
            Platform::MacCatalyst => "mac-catalyst",
            Platform::Tvos => "tvos",
            Platform::TvosSimulator => "tvos-simulator",
            Platform::Watchos => "watchos",
            Platform::WatchosSimulator => "watchos-simulator",
            Platform::Visionos => "visionos",
            Platform::VisionosSimulator => "visionos-simulator",
        }
    }

    /// The generic destination passed to `xcodebuild -destination`.
    pub fn generic_destination(&self) -> &'static str {
        match self {
            Platform::Ios => "generic/platform=iOS",
            Platform::IosSimulator => "generic/platform=iOS Simulator",
            Platform::Macos => "generic/platform=macOS",
            Platform::MacCatalyst => "generic/platform=macOS,variant=Mac Catalyst",
            Platform::Tvos => "generic/platform=tvOS",
            Platform::TvosSimulator => "generic/platform=tvOS Simulator",
            Platform::Watchos => "generic/platform=watchOS",
            Platform::WatchosSimulator => "generic/platform=watchOS Simulator",
            Platform::Visionos => "generic/platform=visionOS",
            Platform::VisionosSimulator => "generic/platform=visionOS Simulator",
        }
    }

    /// Filesystem-safe suffix (the SDK name) used to namespace outputs.
    pub fn suffix(&self) -> &'static str {
        match self {
            Platform::Ios => "iphoneos",
            Platform::IosSimulator => "iphonesimulator",
            Platform::Macos => "macosx",
            Platform::MacCatalyst => "maccatalyst",
            Platform::Tvos => "appletvos",
            Platform::TvosSimulator => "appletvsimulator",
            Platform::Watchos => "watchos",
            Platform::WatchosSimulator => "watchsimulator",
            Platform::Visionos => "xros",
            Platform::VisionosSimulator => "xrsimulator",
        }
    }

    /// Resolve a platform from its suffix.
    pub fn from_suffix(suffix: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.suffix() == suffix)
            .ok_or_else(|| TargetError::UnknownSuffix {
                suffix: suffix.to_string(),
            })
    }

    /// Name of the directory Xcode uses for this platform's build products
    /// and intermediates under the given configuration.
    ///
    /// macOS products are not suffixed: a Release build lands in `Release`,
    /// while an iOS device build lands in `Release-iphoneos`.
    pub fn build_products_dir(&self, configuration: &str) -> String {
        match self {
            Platform::Macos => configuration.to_string(),
            _ => format!("{configuration}-{}", self.suffix()),
        }
    }

    fn expected_identifiers() -> String {
        Self::ALL
            .iter()
            .map(|p| p.identifier())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Platform {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.identifier() == wanted)
            .ok_or_else(|| TargetError::UnknownPlatform {
                name: s.to_string(),
                expected: Self::expected_identifiers(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identifiers_round_trip() {
        for platform in Platform::ALL {
            let parsed: Platform = platform.identifier().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn suffixes_are_bijective() {
        let suffixes: HashSet<_> = Platform::ALL.iter().map(|p| p.suffix()).collect();
        assert_eq!(suffixes.len(), Platform::ALL.len());

        for platform in Platform::ALL {
            assert_eq!(Platform::from_suffix(platform.suffix()).unwrap(), platform);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("iOS-Simulator".parse::<Platform>().unwrap(), Platform::IosSimulator);
        assert_eq!(" macos ".parse::<Platform>().unwrap(), Platform::Macos);
    }

    #[test]
    fn unknown_identifier_lists_choices() {
        let err = "android".parse::<Platform>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("android"));
        assert!(msg.contains("ios-simulator"));
    }

    #[test]
    fn unknown_suffix_is_rejected() {
        assert!(Platform::from_suffix("linux").is_err());
    }

    #[test]
    fn destinations_match_xcodebuild_syntax() {
        assert_eq!(Platform::Ios.generic_destination(), "generic/platform=iOS");
        assert_eq!(
            Platform::IosSimulator.generic_destination(),
            "generic/platform=iOS Simulator"
        );
        for platform in Platform::ALL {
            assert!(platform.generic_destination().starts_with("generic/platform="));
        }
    }

    #[test]
    fn build_products_dir_for_macos_is_unsuffixed() {
        assert_eq!(Platform::Macos.build_products_dir("Release"), "Release");
        assert_eq!(Platform::Ios.build_products_dir("Release"), "Release-iphoneos");
        assert_eq!(
            Platform::WatchosSimulator.build_products_dir("Debug"),
            "Debug-watchsimulator"
        );
    }

    #[test]
    fn serde_uses_identifiers() {
        let json = serde_json::to_string(&Platform::VisionosSimulator).unwrap();
        assert_eq!(json, "\"visionos-simulator\"");
        let back: Platform = serde_json::from_str("\"mac-catalyst\"").unwrap();
        assert_eq!(back, Platform::MacCatalyst);
    }
}
