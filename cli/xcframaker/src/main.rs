//! xcframaker: package a Swift package library as a multi-platform XCFramework.

mod config;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};

use config::{Overrides, XcframakerConfig};
use xcframaker_build::{package, CancelToken, PackageOutcome, PackageRequest, SystemRunner};
use xcframaker_targets::Platform;

/// Exit status when the scheme names no library product.
const EXIT_SKIPPED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "xcframaker",
    version,
    about = "Package a Swift package library as an XCFramework"
)]
struct Cli {
    /// Library product to package (also used as the xcodebuild scheme)
    scheme: String,
    /// Swift package folder (default: current directory)
    library_folder: Option<PathBuf>,
    /// Platforms to build, comma-separated (default: all)
    #[arg(long, value_delimiter = ',')]
    platforms: Option<Vec<Platform>>,
    /// Configuration file (default: <library>/xcframaker.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Parent directory for staged workspaces
    #[arg(long)]
    temp_root: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let library = match cli.library_folder {
        Some(dir) => dir,
        None => std::env::current_dir().context("reading current directory")?,
    };

    let file = match &cli.config {
        Some(path) => XcframakerConfig::load(path)?,
        None => XcframakerConfig::find(&library)?.unwrap_or_default(),
    };
    if let Some(base) = &file.base_dir {
        tracing::debug!(dir = %base.display(), "loaded configuration");
    }
    let settings = file.resolve(Overrides {
        platforms: cli.platforms,
        temp_root: cli.temp_root,
    });

    // Signals stop new platforms from starting. A terminal Ctrl-C also hits
    // the running xcodebuild, so the platform in flight may fail; only
    // platforms that completed are merged.
    let cancel = CancelToken::new();
    for signal in [SIGINT, SIGTERM] {
        // A second signal while the first is pending terminates immediately.
        signal_hook::flag::register_conditional_shutdown(signal, 1, cancel.flag())
            .context("installing signal handler")?;
        signal_hook::flag::register(signal, cancel.flag()).context("installing signal handler")?;
    }

    let request = PackageRequest {
        scheme: cli.scheme,
        library,
        platforms: settings.platforms,
    };

    let outcome = package(&request, &settings.pipeline, SystemRunner, &cancel)
        .with_context(|| format!("packaging {}", request.scheme))?;

    match outcome {
        PackageOutcome::Bundled(report) => {
            print!("{report}");
            Ok(0)
        }
        PackageOutcome::Skipped { reason, log } => {
            eprintln!("skipped: {reason}");
            eprintln!("log: {}", log.display());
            Ok(EXIT_SKIPPED)
        }
    }
}
