//! Paths inside a staged workspace.
//!
//! Every file the pipeline reads or writes is derived here from explicit
//! inputs; nothing depends on the process working directory.

use std::path::{Path, PathBuf};

use xcframaker_manifest::{ToolsVersion, MANIFEST_FILE};
use xcframaker_targets::Platform;

/// File name of the per-run command log.
pub const BUILD_LOG: &str = "build.log";

/// A staged copy of a package and the scheme being packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    original: PathBuf,
    staged: PathBuf,
    scheme: String,
    configuration: String,
    derived_data: PathBuf,
}

impl Workspace {
    /// `derived_data` is resolved against the staged directory when relative.
    pub fn new(
        original: impl Into<PathBuf>,
        staged: impl Into<PathBuf>,
        scheme: impl Into<String>,
        configuration: impl Into<String>,
        derived_data: impl AsRef<Path>,
    ) -> Self {
        let staged = staged.into();
        let derived_data = staged.join(derived_data);
        Self {
            original: original.into(),
            staged,
            scheme: scheme.into(),
            configuration: configuration.into(),
            derived_data,
        }
    }

    pub fn original(&self) -> &Path {
        &self.original
    }

    pub fn staged(&self) -> &Path {
        &self.staged
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn derived_data(&self) -> &Path {
        &self.derived_data
    }

    pub fn log_path(&self) -> PathBuf {
        self.staged.join(BUILD_LOG)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.staged.join(MANIFEST_FILE)
    }

    /// `Package@swift-X.Y.swift` for the given tools version.
    pub fn pinned_manifest_path(&self, version: &ToolsVersion) -> PathBuf {
        self.staged.join(version.pinned_manifest_name())
    }

    /// `<staged>/Release-iphoneos.xcarchive`
    pub fn archive_path(&self, platform: Platform) -> PathBuf {
        self.staged.join(format!(
            "{}-{}.xcarchive",
            self.configuration,
            platform.suffix()
        ))
    }

    /// The framework bundle inside a platform's archive.
    pub fn framework_path(&self, platform: Platform) -> PathBuf {
        self.archive_path(platform)
            .join("Products/usr/local/lib")
            .join(format!("{}.framework", self.scheme))
    }

    pub fn modules_dir(&self, platform: Platform) -> PathBuf {
        self.framework_path(platform).join("Modules")
    }

    pub fn headers_dir(&self, platform: Platform) -> PathBuf {
        self.framework_path(platform).join("Headers")
    }

    fn archive_intermediates(&self) -> PathBuf {
        self.derived_data
            .join("Build/Intermediates.noindex/ArchiveIntermediates")
            .join(&self.scheme)
    }

    /// The `.swiftmodule` directory xcodebuild leaves in derived data.
    pub fn swiftmodule_path(&self, platform: Platform) -> PathBuf {
        self.archive_intermediates()
            .join("BuildProductsPath")
            .join(platform.build_products_dir(&self.configuration))
            .join(format!("{}.swiftmodule", self.scheme))
    }

    /// The generated module map for the scheme's target.
    pub fn module_map_path(&self, platform: Platform) -> PathBuf {
        let build_dir = format!("{}.build", self.scheme);
        self.archive_intermediates()
            .join("IntermediateBuildFilesPath")
            .join(&build_dir)
            .join(platform.build_products_dir(&self.configuration))
            .join(&build_dir)
            .join(format!("{}.modulemap", self.scheme))
    }

    /// The generated Objective-C interface header, `<Scheme>-Swift.h`.
    pub fn swift_header_path(&self, platform: Platform) -> PathBuf {
        self.archive_intermediates()
            .join("IntermediateBuildFilesPath")
            .join(platform.build_products_dir("GeneratedModuleMaps"))
            .join(format!("{}-Swift.h", self.scheme))
    }

    /// `<staged>/<Scheme>.xcframework`
    pub fn bundle_path(&self) -> PathBuf {
        self.staged.join(format!("{}.xcframework", self.scheme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws() -> Workspace {
        Workspace::new("/src/Widgets", "/tmp/xcf/Widgets", "Widgets", "Release", "DerivedData")
    }

    #[test]
    fn archive_and_framework_layout() {
        let ws = ws();
        assert_eq!(
            ws.archive_path(Platform::Ios),
            PathBuf::from("/tmp/xcf/Widgets/Release-iphoneos.xcarchive")
        );
        assert_eq!(
            ws.modules_dir(Platform::IosSimulator),
            PathBuf::from(
                "/tmp/xcf/Widgets/Release-iphonesimulator.xcarchive/Products/usr/local/lib/Widgets.framework/Modules"
            )
        );
        assert!(ws
            .headers_dir(Platform::Macos)
            .ends_with("Release-macosx.xcarchive/Products/usr/local/lib/Widgets.framework/Headers"));
    }

    #[test]
    fn intermediate_artifact_paths() {
        let ws = ws();
        let base = "/tmp/xcf/Widgets/DerivedData/Build/Intermediates.noindex/ArchiveIntermediates/Widgets";
        assert_eq!(
            ws.swiftmodule_path(Platform::Ios),
            PathBuf::from(format!(
                "{base}/BuildProductsPath/Release-iphoneos/Widgets.swiftmodule"
            ))
        );
        assert_eq!(
            ws.module_map_path(Platform::Ios),
            PathBuf::from(format!(
                "{base}/IntermediateBuildFilesPath/Widgets.build/Release-iphoneos/Widgets.build/Widgets.modulemap"
            ))
        );
        assert_eq!(
            ws.swift_header_path(Platform::IosSimulator),
            PathBuf::from(format!(
                "{base}/IntermediateBuildFilesPath/GeneratedModuleMaps-iphonesimulator/Widgets-Swift.h"
            ))
        );
    }

    #[test]
    fn macos_intermediates_are_unsuffixed() {
        let ws = ws();
        assert!(ws
            .swiftmodule_path(Platform::Macos)
            .ends_with("BuildProductsPath/Release/Widgets.swiftmodule"));
        assert!(ws
            .swift_header_path(Platform::Macos)
            .ends_with("GeneratedModuleMaps/Widgets-Swift.h"));
    }

    #[test]
    fn absolute_derived_data_is_kept() {
        let ws = Workspace::new("/a", "/b/S", "S", "Release", "/var/dd");
        assert_eq!(ws.derived_data(), Path::new("/var/dd"));
    }

    #[test]
    fn manifests_log_and_bundle() {
        let ws = ws();
        let v = ToolsVersion::new(5, 9, None);
        assert_eq!(ws.manifest_path(), PathBuf::from("/tmp/xcf/Widgets/Package.swift"));
        assert_eq!(
            ws.pinned_manifest_path(&v),
            PathBuf::from("/tmp/xcf/Widgets/Package@swift-5.9.swift")
        );
        assert_eq!(ws.log_path(), PathBuf::from("/tmp/xcf/Widgets/build.log"));
        assert_eq!(ws.bundle_path(), PathBuf::from("/tmp/xcf/Widgets/Widgets.xcframework"));
        assert_ne!(ws.original(), ws.staged());
    }
}
