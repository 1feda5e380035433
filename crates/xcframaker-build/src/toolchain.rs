//! Locating `xcodebuild` and `swift`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{BuildError, Result};
use crate::executor::{CommandExecutor, StepOutcome};
use crate::process::ProcessRunner;
use crate::task::BuildTask;

/// Explicit tool paths; `None` means discover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainConfig {
    pub xcodebuild: Option<PathBuf>,
    pub swift: Option<PathBuf>,
}

/// Developer-directory relative locations used when a tool is not on `PATH`.
const XCODEBUILD_IN_DEVELOPER_DIR: &str = "usr/bin/xcodebuild";
const SWIFT_IN_DEVELOPER_DIR: &str = "Toolchains/XcodeDefault.xctoolchain/usr/bin/swift";

/// Tool paths for a run, resolved on first use.
///
/// Each tool comes from the configured path if any, then `PATH`, then the
/// active developer directory reported by `xcode-select --print-path`. A run
/// that stops before building never looks for `xcodebuild`.
#[derive(Debug, Clone)]
pub struct Toolchain {
    config: ToolchainConfig,
    developer_dir: Option<Option<PathBuf>>,
    xcodebuild: Option<PathBuf>,
    swift: Option<PathBuf>,
}

impl Toolchain {
    pub fn new(config: ToolchainConfig) -> Self {
        Self {
            config,
            developer_dir: None,
            xcodebuild: None,
            swift: None,
        }
    }

    pub fn swift<R: ProcessRunner>(&mut self, executor: &mut CommandExecutor<R>) -> Result<PathBuf> {
        if let Some(path) = &self.swift {
            return Ok(path.clone());
        }
        let path = match self.config.swift.clone() {
            Some(path) => path,
            None => locate("swift", SWIFT_IN_DEVELOPER_DIR, executor, &mut self.developer_dir)?,
        };
        info!(swift = %path.display(), "toolchain");
        self.swift = Some(path.clone());
        Ok(path)
    }

    pub fn xcodebuild<R: ProcessRunner>(
        &mut self,
        executor: &mut CommandExecutor<R>,
    ) -> Result<PathBuf> {
        if let Some(path) = &self.xcodebuild {
            return Ok(path.clone());
        }
        let path = match self.config.xcodebuild.clone() {
            Some(path) => path,
            None => locate(
                "xcodebuild",
                XCODEBUILD_IN_DEVELOPER_DIR,
                executor,
                &mut self.developer_dir,
            )?,
        };
        info!(xcodebuild = %path.display(), "toolchain");
        self.xcodebuild = Some(path.clone());
        Ok(path)
    }
}

fn locate<R: ProcessRunner>(
    name: &str,
    relative: &str,
    executor: &mut CommandExecutor<R>,
    developer_dir: &mut Option<Option<PathBuf>>,
) -> Result<PathBuf> {
    if let Ok(path) = which::which(name) {
        debug!(tool = name, path = %path.display(), "found on PATH");
        return Ok(path);
    }

    if developer_dir.is_none() {
        *developer_dir = Some(print_developer_dir(executor)?);
    }
    if let Some(Some(dir)) = developer_dir.as_ref() {
        let candidate = dir.join(relative);
        if candidate.is_file() {
            debug!(tool = name, path = %candidate.display(), "found in developer dir");
            return Ok(candidate);
        }
    }

    Err(BuildError::ToolNotFound {
        tool: name.to_string(),
    })
}

fn print_developer_dir<R: ProcessRunner>(
    executor: &mut CommandExecutor<R>,
) -> Result<Option<PathBuf>> {
    let task = BuildTask::tolerant("xcode-select").arg("--print-path");
    Ok(match executor.execute(&task)? {
        StepOutcome::Succeeded(out) => {
            let dir = out.stdout.trim();
            (!dir.is_empty()).then(|| Path::new(dir).to_path_buf())
        }
        StepOutcome::Tolerated(_) => None,
    })
}
