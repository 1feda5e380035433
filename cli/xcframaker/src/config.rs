//! `xcframaker.toml` parsing and settings resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use xcframaker_build::{PipelineConfig, ToolchainConfig};
use xcframaker_manifest::ToolsVersion;
use xcframaker_targets::Platform;

/// File name looked up in the library folder.
pub const CONFIG_FILE: &str = "xcframaker.toml";

/// The top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XcframakerConfig {
    /// Build defaults.
    #[serde(default)]
    pub build: BuildConfig,
    /// Explicit tool locations.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Directory relative paths in this file are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Platforms to build when `--platforms` is not given.
    #[serde(default)]
    pub platforms: Option<Vec<Platform>>,
    /// xcodebuild configuration (default: Release).
    #[serde(default)]
    pub configuration: Option<String>,
    /// Parent directory of staged workspaces.
    #[serde(default)]
    pub temp_root: Option<PathBuf>,
    /// Derived data directory inside the workspace.
    #[serde(default)]
    pub derived_data: Option<PathBuf>,
    /// Swift tools version to assume when detection fails.
    #[serde(default)]
    pub default_tools_version: Option<ToolsVersion>,
    /// Extra `KEY=VALUE` build settings passed to every archive.
    #[serde(default)]
    pub build_settings: Vec<String>,
}

/// `[tools]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub xcodebuild: Option<PathBuf>,
    #[serde(default)]
    pub swift: Option<PathBuf>,
}

/// Values given on the command line; these win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub platforms: Option<Vec<Platform>>,
    pub temp_root: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub platforms: Vec<Platform>,
}

impl XcframakerConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Load `xcframaker.toml` from `library` if it exists.
    pub fn find(library: &Path) -> Result<Option<Self>> {
        let candidate = library.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid xcframaker configuration")
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Merge with command-line overrides and built-in defaults, in that
    /// order of precedence.
    pub fn resolve(&self, overrides: Overrides) -> Settings {
        let defaults = PipelineConfig::default();
        let build = &self.build;

        let temp_root = match overrides.temp_root {
            Some(dir) => dir,
            None => build
                .temp_root
                .as_deref()
                .map(|p| self.resolve_path(p))
                .unwrap_or(defaults.temp_root),
        };

        let pipeline = PipelineConfig {
            temp_root,
            configuration: build
                .configuration
                .clone()
                .unwrap_or(defaults.configuration),
            derived_data: build.derived_data.clone().unwrap_or(defaults.derived_data),
            default_tools_version: build
                .default_tools_version
                .clone()
                .unwrap_or(defaults.default_tools_version),
            build_settings: build.build_settings.clone(),
            tools: ToolchainConfig {
                xcodebuild: self.tools.xcodebuild.as_deref().map(|p| self.resolve_path(p)),
                swift: self.tools.swift.as_deref().map(|p| self.resolve_path(p)),
            },
        };

        let platforms = overrides
            .platforms
            .or_else(|| build.platforms.clone())
            .unwrap_or_else(|| Platform::ALL.to_vec());

        Settings {
            pipeline,
            platforms,
        }
    }
}
