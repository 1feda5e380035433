//! Error types for platform lookups.

/// Errors that can occur while resolving a platform.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The identifier does not name a known platform.
    #[error("unknown platform '{name}' (expected one of: {expected})")]
    UnknownPlatform {
        /// The identifier that was given.
        name: String,
        /// Comma-separated list of valid identifiers.
        expected: String,
    },

    /// The SDK suffix does not belong to a known platform.
    #[error("unknown platform suffix '{suffix}'")]
    UnknownSuffix {
        /// The suffix that was given.
        suffix: String,
    },
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, TargetError>;
