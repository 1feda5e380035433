//! Manifest error types.

/// Errors that can occur while loading, patching, or rendering a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The dump-package output was not valid manifest JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structurally valid JSON that does not describe a usable manifest.
    #[error("invalid manifest: {detail}")]
    Invalid { detail: String },

    /// A tools version string could not be parsed.
    #[error("invalid tools version '{raw}'")]
    InvalidToolsVersion { raw: String },

    /// No product carries the requested name.
    #[error("no product named '{name}' in manifest (available: {available})")]
    ProductNotFound { name: String, available: String },

    /// The named product exists but is not a library.
    #[error("product '{name}' is {kind} product, not a library")]
    NotALibrary { name: String, kind: String },

    /// The model contains something the renderer cannot express.
    #[error("cannot render {what} into Package.swift")]
    Unsupported { what: String },
}

impl ManifestError {
    /// Whether this error means the requested product cannot be packaged,
    /// as opposed to the manifest itself being unusable.
    pub fn is_missing_product(&self) -> bool {
        matches!(
            self,
            ManifestError::ProductNotFound { .. } | ManifestError::NotALibrary { .. }
        )
    }
}

/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, ManifestError>;
