//! Build engine for xcframaker.
//!
//! Packages a Swift package library into an XCFramework through a staged
//! pipeline: stage a private copy of the package, patch its manifest so the
//! product links dynamically, archive it once per platform, and merge the
//! platforms that built into one bundle.
//!
//! Every external program runs through a [`CommandExecutor`], which appends
//! to the workspace build log and decides whether a failure is tolerated.
//! The [`ProcessRunner`] seam lets tests drive the whole pipeline with
//! `testing::ScriptedRunner` (behind the `testing` feature) instead of real
//! tools.

pub mod assembler;
pub mod cancel;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod patcher;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod stager;
pub mod task;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod toolchain;
pub mod workspace;

pub use assembler::BundleAssembler;
pub use cancel::CancelToken;
pub use error::{BuildError, Result};
pub use executor::{BuildLog, CommandExecutor, StepOutcome};
pub use orchestrator::{BuildOutcome, BuildSummary, PlatformBuildOrchestrator, PlatformResult};
pub use patcher::{ManifestPatcher, PatchOutcome};
pub use pipeline::{package, PackageOutcome, PackageRequest, PipelineConfig};
pub use process::{ProcessOutput, ProcessRunner, SystemRunner};
pub use report::PackageReport;
pub use stager::WorkspaceStager;
pub use task::BuildTask;
pub use toolchain::{Toolchain, ToolchainConfig};
pub use workspace::Workspace;
