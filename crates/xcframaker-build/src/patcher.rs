//! Forcing the scheme's library product to link dynamically.
//!
//! xcodebuild only emits a framework for dynamic library products, so the
//! staged manifest is rewritten before archiving. SwiftPM prefers
//! `Package@swift-X.Y.swift` over `Package.swift` when it matches the
//! running toolchain, so both files are written.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use xcframaker_manifest::{Manifest, ToolsVersion};

use crate::error::{BuildError, Result};
use crate::executor::{CommandExecutor, StepOutcome};
use crate::process::ProcessRunner;
use crate::task::BuildTask;
use crate::workspace::Workspace;

/// Result of a patch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOutcome {
    /// The manifest was rewritten and saved to every path in `written`.
    Patched {
        manifest: Manifest,
        tools_version: ToolsVersion,
        written: Vec<PathBuf>,
    },
    /// The scheme names no library product; nothing was written.
    ProductMissing(String),
}

pub struct ManifestPatcher<'a> {
    swift: &'a Path,
    fallback_version: ToolsVersion,
}

impl<'a> ManifestPatcher<'a> {
    /// `fallback_version` is used when `swift --version` cannot be parsed.
    pub fn new(swift: &'a Path, fallback_version: ToolsVersion) -> Self {
        Self {
            swift,
            fallback_version,
        }
    }

    /// The version of the active Swift toolchain.
    pub fn detect_tools_version<R: ProcessRunner>(
        &self,
        executor: &mut CommandExecutor<R>,
    ) -> Result<ToolsVersion> {
        let probe = BuildTask::tolerant(self.swift).arg("--version");
        let detected = match executor.execute(&probe)? {
            StepOutcome::Succeeded(out) => ToolsVersion::from_probe_output(&out.combined()),
            StepOutcome::Tolerated(_) => None,
        };

        Ok(match detected {
            Some(version) => {
                debug!(%version, "detected swift toolchain");
                version
            }
            None => {
                warn!(fallback = %self.fallback_version, "could not detect swift version");
                self.fallback_version.clone()
            }
        })
    }

    /// Load the staged package's manifest through `swift package dump-package`.
    pub fn load<R: ProcessRunner>(
        &self,
        executor: &mut CommandExecutor<R>,
        workspace: &Workspace,
    ) -> Result<Manifest> {
        let path = workspace.manifest_path();
        let task = BuildTask::strict(self.swift)
            .args(["package", "dump-package", "--package-path"])
            .path_arg(workspace.staged())
            .in_dir(workspace.staged());

        let out = match executor.execute(&task) {
            Ok(outcome) => outcome.output().clone(),
            Err(BuildError::StepFailed { status, .. }) => {
                return Err(BuildError::ManifestLoad {
                    path,
                    message: format!("dump-package failed ({status}), see {}", executor.log_path().display()),
                })
            }
            Err(e) => return Err(e),
        };

        Manifest::from_dump_json(&out.stdout, &path).map_err(|e| BuildError::ManifestLoad {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    /// Patch the staged manifest so the scheme's product links dynamically.
    pub fn patch<R: ProcessRunner>(
        &self,
        executor: &mut CommandExecutor<R>,
        workspace: &Workspace,
    ) -> Result<PatchOutcome> {
        let tools_version = self.detect_tools_version(executor)?;
        let manifest = self.load(executor, workspace)?;

        let patched = match manifest.with_dynamic_library(workspace.scheme()) {
            Ok(patched) => patched,
            Err(e) if e.is_missing_product() => {
                warn!(scheme = workspace.scheme(), "{e}");
                return Ok(PatchOutcome::ProductMissing(e.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let source = patched.render()?;
        debug!(manifest = %source, "patched manifest");

        let written = vec![
            workspace.manifest_path(),
            workspace.pinned_manifest_path(&tools_version),
        ];
        for path in &written {
            fs::write(path, &source).map_err(|source| BuildError::ManifestWrite {
                path: path.clone(),
                source,
            })?;
        }

        info!(
            product = workspace.scheme(),
            pinned = %tools_version.pinned_manifest_name(),
            "product now links dynamically"
        );
        Ok(PatchOutcome::Patched {
            manifest: patched,
            tools_version,
            written,
        })
    }
}
