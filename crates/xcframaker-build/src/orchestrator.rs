//! Per-platform archiving.
//!
//! Each platform runs `Pending -> Archiving -> {Success, Failed}` exactly
//! once. Only the archive step is strict; the artifact copies that complete
//! the framework layout are tolerant, since a pure Objective-C or C target
//! produces no `.swiftmodule` or `-Swift.h`.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};
use xcframaker_targets::Platform;

use crate::cancel::CancelToken;
use crate::error::{BuildError, Result};
use crate::executor::CommandExecutor;
use crate::process::ProcessRunner;
use crate::task::BuildTask;
use crate::workspace::Workspace;

/// Terminal state of one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformResult {
    pub platform: Platform,
    pub outcome: BuildOutcome,
}

/// Outcomes for every requested platform, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub results: Vec<PlatformResult>,
}

impl BuildSummary {
    fn platforms(&self, outcome: BuildOutcome) -> Vec<Platform> {
        self.results
            .iter()
            .filter(|r| r.outcome == outcome)
            .map(|r| r.platform)
            .collect()
    }

    /// Platforms that archived, in request order.
    pub fn succeeded(&self) -> Vec<Platform> {
        self.platforms(BuildOutcome::Success)
    }

    pub fn failed(&self) -> Vec<Platform> {
        self.platforms(BuildOutcome::Failed)
    }
}

pub struct PlatformBuildOrchestrator<'a> {
    workspace: &'a Workspace,
    xcodebuild: &'a Path,
    build_settings: &'a [String],
    cancel: CancelToken,
}

impl<'a> PlatformBuildOrchestrator<'a> {
    /// `build_settings` are extra `KEY=VALUE` arguments for every archive.
    pub fn new(
        workspace: &'a Workspace,
        xcodebuild: &'a Path,
        build_settings: &'a [String],
        cancel: CancelToken,
    ) -> Self {
        Self {
            workspace,
            xcodebuild,
            build_settings,
            cancel,
        }
    }

    /// Archive every platform in order.
    ///
    /// A failed platform never stops the run; only build log errors do.
    pub fn build<R: ProcessRunner>(
        &self,
        executor: &mut CommandExecutor<R>,
        platforms: &[Platform],
    ) -> Result<BuildSummary> {
        let mut summary = BuildSummary::default();

        for &platform in platforms {
            let outcome = if self.cancel.is_cancelled() {
                warn!(%platform, "cancelled before start");
                BuildOutcome::Failed
            } else {
                info!(%platform, "archiving");
                match self.build_platform(executor, platform) {
                    Ok(()) => {
                        info!(%platform, "archived");
                        BuildOutcome::Success
                    }
                    Err(BuildError::StepFailed { status, .. }) => {
                        warn!(%platform, %status, "archive failed, skipping platform");
                        self.discard_partial(platform);
                        BuildOutcome::Failed
                    }
                    Err(e) => return Err(e),
                }
            };
            summary.results.push(PlatformResult { platform, outcome });
        }

        Ok(summary)
    }

    /// The strict `xcodebuild archive` task for one platform.
    pub fn archive_task(&self, platform: Platform) -> BuildTask {
        let ws = self.workspace;
        BuildTask::strict(self.xcodebuild)
            .args(["archive", "-scheme", ws.scheme()])
            .args(["-configuration", ws.configuration()])
            .args(["-destination", platform.generic_destination()])
            .arg("-archivePath")
            .path_arg(&ws.archive_path(platform))
            .arg("-derivedDataPath")
            .path_arg(ws.derived_data())
            .args(["SKIP_INSTALL=NO", "BUILD_LIBRARY_FOR_DISTRIBUTION=YES"])
            .args(self.build_settings.iter().cloned())
            .in_dir(ws.staged())
    }

    /// Tolerant copies of the module interface, module map and generated
    /// header into the framework.
    pub fn copy_tasks(&self, platform: Platform) -> Vec<BuildTask> {
        let ws = self.workspace;
        let modules = ws.modules_dir(platform);
        let copy = |from: &Path, to: &Path| {
            BuildTask::tolerant("cp")
                .arg("-R")
                .path_arg(from)
                .path_arg(to)
                .in_dir(ws.staged())
        };

        vec![
            copy(
                &ws.swiftmodule_path(platform),
                &modules.join(format!("{}.swiftmodule", ws.scheme())),
            ),
            copy(&ws.module_map_path(platform), &modules),
            copy(&ws.swift_header_path(platform), &ws.headers_dir(platform)),
        ]
    }

    fn build_platform<R: ProcessRunner>(
        &self,
        executor: &mut CommandExecutor<R>,
        platform: Platform,
    ) -> Result<()> {
        executor.execute(&self.archive_task(platform))?;

        for dir in [
            self.workspace.modules_dir(platform),
            self.workspace.headers_dir(platform),
        ] {
            let command = BuildTask::strict("mkdir").arg("-p").path_arg(&dir).to_string();
            match fs::create_dir_all(&dir) {
                Ok(()) => executor.record(&command, "", "ok")?,
                Err(e) => {
                    let status = e.to_string();
                    executor.record(&command, "", &format!("failed ({status})"))?;
                    return Err(BuildError::StepFailed { command, status });
                }
            }
        }

        for task in self.copy_tasks(platform) {
            executor.execute(&task)?;
        }
        Ok(())
    }

    /// Remove whatever a failed platform left behind so a later merge or
    /// rerun cannot pick it up.
    fn discard_partial(&self, platform: Platform) {
        let archive = self.workspace.archive_path(platform);
        match fs::remove_dir_all(&archive) {
            Ok(()) => debug!(path = %archive.display(), "removed partial archive"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %archive.display(), error = %e, "could not remove partial archive"),
        }
    }
}
