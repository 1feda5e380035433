//! Build engine errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use xcframaker_manifest::ManifestError;

/// Errors that abort a packaging run (or, for [`BuildError::StepFailed`],
/// the current platform).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("staging {path} failed: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to stage {original} into {staged}: the two trees overlap")]
    StagingConflict { original: PathBuf, staged: PathBuf },

    #[error("'{scheme}' cannot be used as a workspace directory name")]
    InvalidScheme { scheme: String },

    #[error("failed to load manifest {path}: {message}")]
    ManifestLoad { path: PathBuf, message: String },

    #[error("failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("command failed ({status}): {command}")]
    StepFailed { command: String, status: String },

    #[error("build log {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not locate '{tool}' (set it under [tools] in xcframaker.toml)")]
    ToolNotFound { tool: String },

    #[error("no platform built successfully, nothing to merge")]
    EmptySucceededSet,

    #[error("creating {output} failed: {detail}")]
    MergeFailed { output: PathBuf, detail: String },
}

/// Result type alias for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
