//! Swift package manifest handling for xcframaker.
//!
//! A manifest is loaded from the JSON that `swift package dump-package`
//! prints, transformed as an immutable value, and rendered back to
//! `Package.swift` source.
//!
//! # Architecture
//!
//! - **Model**: serde types mirroring the dump-package JSON
//! - **Patch**: pure product rewrites (`with_dynamic_library`)
//! - **Render**: `Package.swift` source generation
//! - **Version**: tools-version parsing and version-pinned manifest names

pub mod error;
pub mod model;
pub mod patch;
pub mod render;
pub mod version;

pub use error::{ManifestError, Result};
pub use model::{
    Condition, LibraryLinkage, Manifest, PackageDependency, Product, ProductType, Requirement,
    Target, TargetDependency, TargetKind,
};
pub use version::ToolsVersion;

/// File name of the canonical manifest.
pub const MANIFEST_FILE: &str = "Package.swift";
