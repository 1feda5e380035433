//! End-to-end packaging pipeline.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use tracing::info;
use xcframaker_manifest::ToolsVersion;
use xcframaker_targets::Platform;

use crate::assembler::BundleAssembler;
use crate::cancel::CancelToken;
use crate::error::{BuildError, Result};
use crate::executor::{BuildLog, CommandExecutor};
use crate::orchestrator::PlatformBuildOrchestrator;
use crate::patcher::{ManifestPatcher, PatchOutcome};
use crate::process::ProcessRunner;
use crate::report::PackageReport;
use crate::stager::WorkspaceStager;
use crate::toolchain::{Toolchain, ToolchainConfig};
use crate::workspace::Workspace;

/// What to package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    /// Library product name, also used as the xcodebuild scheme.
    pub scheme: String,
    /// Root of the Swift package.
    pub library: PathBuf,
    /// Platforms to archive, in order.
    pub platforms: Vec<Platform>,
}

/// Configuration for a packaging run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Parent of the per-scheme staged workspaces.
    pub temp_root: PathBuf,
    /// xcodebuild configuration, e.g. `Release`.
    pub configuration: String,
    /// Derived data directory, relative to the staged workspace.
    pub derived_data: PathBuf,
    /// Used when the Swift version cannot be detected.
    pub default_tools_version: ToolsVersion,
    /// Extra `KEY=VALUE` settings for every archive.
    pub build_settings: Vec<String>,
    pub tools: ToolchainConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temp_root: std::env::temp_dir().join("xcframaker"),
            configuration: "Release".to_string(),
            derived_data: PathBuf::from("DerivedData"),
            default_tools_version: ToolsVersion::new(5, 9, None),
            build_settings: Vec::new(),
            tools: ToolchainConfig::default(),
        }
    }
}

/// How a run ended when no fatal error occurred.
#[derive(Debug, Clone)]
pub enum PackageOutcome {
    Bundled(PackageReport),
    /// The scheme names no library product; no build commands were issued.
    Skipped { reason: String, log: PathBuf },
}

/// Run the full pipeline:
/// stage -> open log -> patch manifest -> archive platforms -> merge.
///
/// `xcodebuild` is located only after the manifest patch succeeds, so a
/// scheme with no library product is skipped even where only `swift` exists.
pub fn package<R: ProcessRunner>(
    request: &PackageRequest,
    config: &PipelineConfig,
    runner: R,
    cancel: &CancelToken,
) -> Result<PackageOutcome> {
    let start = Instant::now();

    // Stage 1: Workspace
    let original = fs::canonicalize(&request.library).map_err(|source| BuildError::Staging {
        path: request.library.clone(),
        source,
    })?;
    let staged = WorkspaceStager::new(&config.temp_root).stage(&original, &request.scheme)?;
    let workspace = Workspace::new(
        original,
        staged,
        &request.scheme,
        &config.configuration,
        &config.derived_data,
    );

    let log = BuildLog::open(workspace.log_path())?;
    let mut executor = CommandExecutor::new(runner, log);
    let mut toolchain = Toolchain::new(config.tools.clone());

    // Stage 2: Manifest
    let swift = toolchain.swift(&mut executor)?;
    let patcher = ManifestPatcher::new(&swift, config.default_tools_version.clone());
    let tools_version = match patcher.patch(&mut executor, &workspace)? {
        PatchOutcome::Patched { tools_version, .. } => tools_version,
        PatchOutcome::ProductMissing(reason) => {
            return Ok(PackageOutcome::Skipped {
                reason,
                log: workspace.log_path(),
            })
        }
    };

    // Stage 3: Platforms
    let xcodebuild = toolchain.xcodebuild(&mut executor)?;
    let platforms = dedup(&request.platforms);
    let summary = PlatformBuildOrchestrator::new(
        &workspace,
        &xcodebuild,
        &config.build_settings,
        cancel.clone(),
    )
    .build(&mut executor, &platforms)?;

    // Stage 4: Merge
    let succeeded = summary.succeeded();
    let bundle =
        BundleAssembler::new(&workspace, &xcodebuild).assemble(&mut executor, &succeeded)?;

    let report = PackageReport {
        scheme: request.scheme.clone(),
        workspace: workspace.staged().to_path_buf(),
        tools_version,
        succeeded,
        failed: summary.failed(),
        bundle,
        log: workspace.log_path(),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(bundle = %report.bundle.display(), "done");
    Ok(PackageOutcome::Bundled(report))
}

/// Drop repeated platforms, keeping first occurrences in order.
fn dedup(platforms: &[Platform]) -> Vec<Platform> {
    let mut out = Vec::with_capacity(platforms.len());
    for &p in platforms {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}
