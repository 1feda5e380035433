//! Summary of a packaging run.

use std::fmt;
use std::path::PathBuf;

use xcframaker_manifest::ToolsVersion;
use xcframaker_targets::Platform;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PackageReport {
    /// Product (and scheme) name.
    pub scheme: String,
    /// Staged workspace directory.
    pub workspace: PathBuf,
    /// Swift tools version the manifest was pinned for.
    pub tools_version: ToolsVersion,
    /// Platforms merged into the bundle, in request order.
    pub succeeded: Vec<Platform>,
    /// Platforms that failed or were cancelled.
    pub failed: Vec<Platform>,
    /// The `.xcframework` path.
    pub bundle: PathBuf,
    /// The command log.
    pub log: PathBuf,
    /// Total run duration in milliseconds.
    pub duration_ms: u64,
}

impl PackageReport {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

fn join(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.identifier())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for PackageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== XCFramework Report ===")?;
        writeln!(f, "Scheme: {}", self.scheme)?;
        writeln!(f, "Swift tools: {}", self.tools_version)?;
        writeln!(f, "Duration: {} ms", self.duration_ms)?;
        writeln!(f)?;

        writeln!(f, "--- Platforms ---")?;
        writeln!(f, "  Built ({}): {}", self.succeeded.len(), join(&self.succeeded))?;
        if self.is_partial() {
            writeln!(f, "  Failed ({}): {}", self.failed.len(), join(&self.failed))?;
        }

        writeln!(f)?;
        writeln!(f, "--- Output ---")?;
        writeln!(f, "  Bundle: {}", self.bundle.display())?;
        writeln!(f, "  Workspace: {}", self.workspace.display())?;
        writeln!(f, "  Log: {}", self.log.display())?;
        Ok(())
    }
}
