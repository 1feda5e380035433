//! Merging per-platform frameworks into one XCFramework.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use xcframaker_targets::Platform;

use crate::error::{BuildError, Result};
use crate::executor::CommandExecutor;
use crate::process::ProcessRunner;
use crate::task::BuildTask;
use crate::workspace::Workspace;

pub struct BundleAssembler<'a> {
    workspace: &'a Workspace,
    xcodebuild: &'a Path,
}

impl<'a> BundleAssembler<'a> {
    pub fn new(workspace: &'a Workspace, xcodebuild: &'a Path) -> Self {
        Self {
            workspace,
            xcodebuild,
        }
    }

    /// `xcodebuild -create-xcframework` over the given platforms' frameworks.
    pub fn merge_task(&self, succeeded: &[Platform]) -> BuildTask {
        let mut task = BuildTask::strict(self.xcodebuild).arg("-create-xcframework");
        for &platform in succeeded {
            task = task
                .arg("-framework")
                .path_arg(&self.workspace.framework_path(platform));
        }
        task.arg("-output")
            .path_arg(&self.workspace.bundle_path())
            .in_dir(self.workspace.staged())
    }

    /// Build `<staged>/<Scheme>.xcframework` from the succeeded platforms.
    ///
    /// Fails without running anything when `succeeded` is empty.
    pub fn assemble<R: ProcessRunner>(
        &self,
        executor: &mut CommandExecutor<R>,
        succeeded: &[Platform],
    ) -> Result<PathBuf> {
        if succeeded.is_empty() {
            return Err(BuildError::EmptySucceededSet);
        }

        let output = self.workspace.bundle_path();
        match fs::remove_dir_all(&output) {
            Ok(()) => debug!(path = %output.display(), "removed stale bundle"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %output.display(), error = %e, "could not remove stale bundle"),
        }

        info!(frameworks = succeeded.len(), output = %output.display(), "creating xcframework");
        match executor.execute(&self.merge_task(succeeded)) {
            Ok(_) => Ok(output),
            Err(BuildError::StepFailed { status, .. }) => Err(BuildError::MergeFailed {
                output,
                detail: format!("xcodebuild {status}, see {}", executor.log_path().display()),
            }),
            Err(e) => Err(e),
        }
    }
}
