//! End-to-end pipeline runs against a scripted toolchain.

use std::fs;
use std::path::{Path, PathBuf};

use xcframaker_build::testing::ScriptedRunner;
use xcframaker_build::{
    package, BuildError, BuildTask, CancelToken, PackageOutcome, PackageRequest, PipelineConfig,
    ToolchainConfig,
};
use xcframaker_targets::Platform;

const DUMP: &str = r#"{
  "name": "Widgets",
  "toolsVersion": { "_version": "5.9.0" },
  "platforms": [ { "platformName": "ios", "version": "15.0", "options": [] } ],
  "products": [
    { "name": "Widgets", "type": { "library": [ "automatic" ] }, "targets": [ "Widgets" ] }
  ],
  "dependencies": [],
  "targets": [
    { "name": "Widgets", "type": "regular", "dependencies": [], "exclude": [], "resources": [], "settings": [] },
    { "name": "WidgetsTests", "type": "test", "dependencies": [ { "byName": [ "Widgets", null ] } ] }
  ]
}"#;

const PROBE: &str = "swift-driver version: 1.87.1 Apple Swift version 5.9.2 (swiftlang-5.9.2.2.56 clang-1500.1.0.2.5)\n";

struct Harness {
    library: tempfile::TempDir,
    temp_root: tempfile::TempDir,
    runner: ScriptedRunner,
}

impl Harness {
    fn new() -> Self {
        let library = tempfile::tempdir().unwrap();
        let root = library.path();
        fs::create_dir_all(root.join("Sources/Widgets")).unwrap();
        fs::write(root.join("Package.swift"), "// swift-tools-version:5.9\n").unwrap();
        fs::write(root.join("Sources/Widgets/Widgets.swift"), "public struct Widget {}\n").unwrap();
        fs::create_dir_all(root.join("Widgets.xcodeproj")).unwrap();

        let runner = ScriptedRunner::new();
        runner
            .respond_when(|t| t.has_arg("--version"), PROBE)
            .respond_when(|t| t.has_arg("dump-package"), DUMP);

        Self {
            library,
            temp_root: tempfile::tempdir().unwrap(),
            runner,
        }
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            temp_root: self.temp_root.path().to_path_buf(),
            tools: ToolchainConfig {
                xcodebuild: Some("/usr/bin/xcodebuild".into()),
                swift: Some("/usr/bin/swift".into()),
            },
            ..PipelineConfig::default()
        }
    }

    fn run(&self, scheme: &str, platforms: &[Platform]) -> xcframaker_build::Result<PackageOutcome> {
        self.run_with(scheme, platforms, &self.config(), &CancelToken::new())
    }

    fn run_with(
        &self,
        scheme: &str,
        platforms: &[Platform],
        config: &PipelineConfig,
        cancel: &CancelToken,
    ) -> xcframaker_build::Result<PackageOutcome> {
        let request = PackageRequest {
            scheme: scheme.to_string(),
            library: self.library.path().to_path_buf(),
            platforms: platforms.to_vec(),
        };
        package(&request, config, self.runner.clone(), cancel)
    }

    fn staged(&self, scheme: &str) -> PathBuf {
        fs::canonicalize(self.temp_root.path()).unwrap().join(scheme)
    }

    fn archives(&self) -> Vec<BuildTask> {
        self.runner
            .calls()
            .into_iter()
            .filter(|t| t.has_arg("archive"))
            .collect()
    }

    fn merges(&self) -> Vec<BuildTask> {
        self.runner
            .calls()
            .into_iter()
            .filter(|t| t.has_arg("-create-xcframework"))
            .collect()
    }
}

fn fail_archive(runner: &ScriptedRunner, platform: Platform) {
    runner.fail_when(move |t| {
        t.has_arg("archive") && t.arg_after("-destination") == Some(platform.generic_destination())
    });
}

/// `(command, status)` pairs from a build log.
fn log_entries(path: &Path) -> Vec<(String, String)> {
    let log = fs::read_to_string(path).unwrap();
    let mut entries = Vec::new();
    let mut command = None;
    for line in log.lines() {
        if let Some(cmd) = line.strip_prefix("==> ") {
            command = Some(cmd.to_string());
        } else if let Some(status) = line.strip_prefix("<== ") {
            entries.push((command.take().unwrap(), status.to_string()));
        }
    }
    entries
}

fn framework_args(task: &BuildTask) -> Vec<String> {
    task.arguments()
        .windows(2)
        .filter(|w| w[0] == "-framework")
        .map(|w| w[1].clone())
        .collect()
}

#[test]
fn scenario_a_all_platforms_bundle() {
    let h = Harness::new();
    let outcome = h.run("Widgets", &[Platform::Ios, Platform::IosSimulator]).unwrap();

    let PackageOutcome::Bundled(report) = outcome else {
        panic!("expected a bundle");
    };
    assert_eq!(report.succeeded, vec![Platform::Ios, Platform::IosSimulator]);
    assert!(report.failed.is_empty());
    assert_eq!(report.bundle, h.staged("Widgets").join("Widgets.xcframework"));
    assert_eq!(report.tools_version.to_string(), "5.9.2");

    let merges = h.merges();
    assert_eq!(merges.len(), 1);
    let frameworks = framework_args(&merges[0]);
    assert_eq!(frameworks.len(), 2);
    assert!(frameworks[0].ends_with("Release-iphoneos.xcarchive/Products/usr/local/lib/Widgets.framework"));
    assert!(frameworks[1].ends_with("Release-iphonesimulator.xcarchive/Products/usr/local/lib/Widgets.framework"));
}

#[test]
fn scenario_b_failed_platform_is_excluded() {
    let h = Harness::new();
    fail_archive(&h.runner, Platform::Ios);

    let outcome = h.run("Widgets", &[Platform::Ios, Platform::IosSimulator]).unwrap();
    let PackageOutcome::Bundled(report) = outcome else {
        panic!("expected a bundle");
    };
    assert_eq!(report.succeeded, vec![Platform::IosSimulator]);
    assert_eq!(report.failed, vec![Platform::Ios]);

    let frameworks = framework_args(&h.merges()[0]);
    assert_eq!(frameworks.len(), 1);
    assert!(frameworks[0].contains("Release-iphonesimulator.xcarchive"));

    let entries = log_entries(&report.log);
    let archive_entries: Vec<_> = entries.iter().filter(|(cmd, _)| cmd.contains(" archive ")).collect();
    assert_eq!(archive_entries.len(), 2);
    assert!(archive_entries[0].0.contains("generic/platform=iOS "));
    assert_eq!(archive_entries[0].1, "failed (exit code 1)");
    assert!(archive_entries[1].0.contains("'generic/platform=iOS Simulator'"));
    assert_eq!(archive_entries[1].1, "ok");

    let device_failures = entries
        .iter()
        .filter(|(cmd, status)| cmd.contains("Release-iphoneos") && status.starts_with("failed"))
        .count();
    assert_eq!(device_failures, 1);
}

#[test]
fn scenario_c_unknown_product_issues_no_build_commands() {
    let h = Harness::new();
    let outcome = h.run("Gadgets", &[Platform::Ios, Platform::Macos]).unwrap();

    let PackageOutcome::Skipped { reason, log } = outcome else {
        panic!("expected a skipped run");
    };
    assert!(reason.contains("Gadgets"));
    assert!(h.archives().is_empty());
    assert!(h.merges().is_empty());

    let entries = log_entries(&log);
    assert!(entries.iter().all(|(cmd, _)| !cmd.contains("xcodebuild")));

    // The staged manifest is untouched.
    let manifest = fs::read_to_string(h.staged("Gadgets").join("Package.swift")).unwrap();
    assert_eq!(manifest, "// swift-tools-version:5.9\n");
}

#[test]
fn scenario_d_all_platforms_fail() {
    let h = Harness::new();
    h.runner.fail_when(|t| t.has_arg("archive"));

    let err = h.run("Widgets", &[Platform::Ios, Platform::IosSimulator]).unwrap_err();
    assert!(matches!(err, BuildError::EmptySucceededSet));
    assert_eq!(h.archives().len(), 2);
    assert!(h.merges().is_empty());
}

#[test]
fn merge_failure_is_fatal() {
    let h = Harness::new();
    h.runner.fail_when(|t| t.has_arg("-create-xcframework"));

    let err = h.run("Widgets", &[Platform::Macos]).unwrap_err();
    assert!(matches!(err, BuildError::MergeFailed { .. }));
}

#[test]
fn staged_manifests_are_patched_and_original_untouched() {
    let h = Harness::new();
    h.run("Widgets", &[Platform::Macos]).unwrap();

    let staged = h.staged("Widgets");
    assert_ne!(staged, fs::canonicalize(h.library.path()).unwrap());
    let canonical = fs::read_to_string(staged.join("Package.swift")).unwrap();
    let pinned = fs::read_to_string(staged.join("Package@swift-5.9.2.swift")).unwrap();
    assert_eq!(canonical, pinned);
    assert!(canonical.contains("type: .dynamic"));
    assert!(canonical.contains(".iOS(\"15.0\")"));

    assert_eq!(
        fs::read_to_string(h.library.path().join("Package.swift")).unwrap(),
        "// swift-tools-version:5.9\n"
    );
    assert!(h.library.path().join("Widgets.xcodeproj").exists());
    assert!(!staged.join("Widgets.xcodeproj").exists());
}

#[test]
fn rerun_restages_from_scratch() {
    let h = Harness::new();
    h.run("Widgets", &[Platform::Ios]).unwrap();
    let staged = h.staged("Widgets");
    fs::write(staged.join("stale.txt"), "left over").unwrap();

    h.run("Widgets", &[Platform::Ios]).unwrap();
    assert!(!staged.join("stale.txt").exists());

    // The log restarts with the workspace.
    let entries = log_entries(&staged.join("build.log"));
    let archives = entries.iter().filter(|(cmd, _)| cmd.contains(" archive ")).count();
    assert_eq!(archives, 1);
}

#[test]
fn succeeded_preserves_request_order() {
    let h = Harness::new();
    fail_archive(&h.runner, Platform::Tvos);
    let requested = [
        Platform::VisionosSimulator,
        Platform::Tvos,
        Platform::Macos,
        Platform::Ios,
    ];

    let PackageOutcome::Bundled(report) = h.run("Widgets", &requested).unwrap() else {
        panic!("expected a bundle");
    };
    assert_eq!(
        report.succeeded,
        vec![Platform::VisionosSimulator, Platform::Macos, Platform::Ios]
    );

    let destinations: Vec<_> = h
        .archives()
        .iter()
        .map(|t| t.arg_after("-destination").unwrap().to_string())
        .collect();
    let expected: Vec<_> = requested
        .iter()
        .map(|p| p.generic_destination().to_string())
        .collect();
    assert_eq!(destinations, expected);
}

#[test]
fn cancelled_run_merges_nothing() {
    let h = Harness::new();
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = h
        .run_with("Widgets", &[Platform::Ios], &h.config(), &cancel)
        .unwrap_err();
    assert!(matches!(err, BuildError::EmptySucceededSet));
    assert!(h.archives().is_empty());
}

#[test]
fn cancel_during_first_platform_merges_what_finished() {
    let h = Harness::new();
    let cancel = CancelToken::new();
    let token = cancel.clone();
    // The signal arrives while the iOS archive is running.
    h.runner.respond_when(
        move |t| {
            let ios = t.has_arg("archive")
                && t.arg_after("-destination") == Some(Platform::Ios.generic_destination());
            if ios {
                token.cancel();
            }
            ios
        },
        "** ARCHIVE SUCCEEDED **\n",
    );

    let platforms = [Platform::Ios, Platform::IosSimulator, Platform::Macos];
    let outcome = h
        .run_with("Widgets", &platforms, &h.config(), &cancel)
        .unwrap();
    let PackageOutcome::Bundled(report) = outcome else {
        panic!("expected a bundle");
    };
    assert_eq!(report.succeeded, vec![Platform::Ios]);
    assert_eq!(report.failed, vec![Platform::IosSimulator, Platform::Macos]);
    assert_eq!(h.archives().len(), 1);

    let merges = h.merges();
    assert_eq!(merges.len(), 1);
    let frameworks = framework_args(&merges[0]);
    assert_eq!(frameworks.len(), 1);
    assert!(frameworks[0].contains("Release-iphoneos.xcarchive"));
}

#[test]
fn interrupted_platform_fails_and_only_completed_ones_merge() {
    let h = Harness::new();
    let cancel = CancelToken::new();
    let token = cancel.clone();
    // Ctrl-C reaches the simulator archive too, which then exits non-zero.
    h.runner.fail_when(move |t| {
        let simulator = t.has_arg("archive")
            && t.arg_after("-destination") == Some(Platform::IosSimulator.generic_destination());
        if simulator {
            token.cancel();
        }
        simulator
    });

    let platforms = [Platform::Ios, Platform::IosSimulator, Platform::Macos];
    let PackageOutcome::Bundled(report) = h
        .run_with("Widgets", &platforms, &h.config(), &cancel)
        .unwrap()
    else {
        panic!("expected a bundle");
    };
    assert_eq!(report.succeeded, vec![Platform::Ios]);
    assert_eq!(report.failed, vec![Platform::IosSimulator, Platform::Macos]);
    assert_eq!(h.archives().len(), 2);
    assert!(!h.staged("Widgets").join("Release-iphonesimulator.xcarchive").exists());

    let frameworks = framework_args(&h.merges()[0]);
    assert_eq!(frameworks.len(), 1);
    assert!(frameworks[0].contains("Release-iphoneos.xcarchive"));
}

#[test]
fn unknown_product_is_skipped_without_xcodebuild() {
    let h = Harness::new();
    h.runner.missing_when(|t| t.program_name() == "xcode-select");
    let mut config = h.config();
    config.tools.xcodebuild = None;

    let outcome = h
        .run_with("Gadgets", &[Platform::Ios], &config, &CancelToken::new())
        .unwrap();
    assert!(matches!(outcome, PackageOutcome::Skipped { .. }));
    assert!(h.runner.calls_to("xcode-select").is_empty());
}
