//! Disposable workspace copies.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{BuildError, Result};

/// Top-level entries that make xcodebuild pick a project instead of the
/// package description.
const COMPETING_EXTENSIONS: [&str; 2] = ["xcodeproj", "xcworkspace"];

/// Stages packages under `temp_root/<scheme>`.
#[derive(Debug, Clone)]
pub struct WorkspaceStager {
    temp_root: PathBuf,
}

impl WorkspaceStager {
    pub fn new(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
        }
    }

    /// Replace `temp_root/<scheme>` with a fresh copy of `original` and
    /// return the staged path. The original tree is only read.
    pub fn stage(&self, original: &Path, scheme: &str) -> Result<PathBuf> {
        validate_scheme(scheme)?;

        let original = fs::canonicalize(original).map_err(|source| BuildError::Staging {
            path: original.to_path_buf(),
            source,
        })?;
        let root = resolve(&self.temp_root).map_err(|source| BuildError::Staging {
            path: self.temp_root.clone(),
            source,
        })?;
        let staged = root.join(scheme);

        if staged == original || staged.starts_with(&original) || original.starts_with(&staged) {
            return Err(BuildError::StagingConflict { original, staged });
        }

        fs::create_dir_all(&root).map_err(|source| BuildError::Staging {
            path: root.clone(),
            source,
        })?;

        match fs::remove_dir_all(&staged) {
            Ok(()) => debug!(path = %staged.display(), "removed previous workspace"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(BuildError::Staging {
                    path: staged,
                    source,
                })
            }
        }

        info!(from = %original.display(), to = %staged.display(), "staging package");
        copy_dir_all(&original, &staged).map_err(|source| BuildError::Staging {
            path: staged.clone(),
            source,
        })?;
        remove_competing_descriptors(&staged);

        Ok(staged)
    }
}

/// Canonical form of `path`, which need not exist yet: the deepest existing
/// ancestor is canonicalized and the remaining components appended.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let path = std::path::absolute(path)?;
    match fs::canonicalize(&path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == io::ErrorKind::NotFound => match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => Ok(resolve(parent)?.join(name)),
            _ => Err(e),
        },
        Err(e) => Err(e),
    }
}

/// The scheme doubles as a directory name, so it must be one plain component.
fn validate_scheme(scheme: &str) -> Result<()> {
    let mut components = Path::new(scheme).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !scheme.contains(['/', '\\']) => Ok(()),
        _ => Err(BuildError::InvalidScheme {
            scheme: scheme.to_string(),
        }),
    }
}

/// Recursively copy `src` into `dst`, recreating symlinks rather than
/// following them.
pub fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else if ty.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        copy_dir_all(src, dst)
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}

fn remove_competing_descriptors(staged: &Path) {
    let entries = match fs::read_dir(staged) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %staged.display(), error = %e, "could not scan staged workspace");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let competing = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| COMPETING_EXTENSIONS.contains(&ext));
        if !competing {
            continue;
        }

        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => debug!(path = %path.display(), "removed competing project descriptor"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not remove project descriptor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(dir: &Path) {
        fs::create_dir_all(dir.join("Sources/Widgets")).unwrap();
        fs::write(dir.join("Package.swift"), "// swift-tools-version:5.9\n").unwrap();
        fs::write(dir.join("Sources/Widgets/Widgets.swift"), "public struct W {}\n").unwrap();
    }

    #[test]
    fn stage_copies_the_tree() {
        let src = tempfile::tempdir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        package(src.path());

        let staged = WorkspaceStager::new(tmp.path()).stage(src.path(), "Widgets").unwrap();
        assert!(staged.ends_with("Widgets"));
        assert_ne!(staged, fs::canonicalize(src.path()).unwrap());
        assert_eq!(
            fs::read_to_string(staged.join("Sources/Widgets/Widgets.swift")).unwrap(),
            "public struct W {}\n"
        );
    }

    #[test]
    fn restaging_leaves_no_leftovers() {
        let src = tempfile::tempdir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        package(src.path());
        let stager = WorkspaceStager::new(tmp.path());

        let first = stager.stage(src.path(), "Widgets").unwrap();
        fs::write(first.join("leftover.txt"), "stale").unwrap();
        fs::write(first.join("Package.swift"), "patched").unwrap();

        let second = stager.stage(src.path(), "Widgets").unwrap();
        assert_eq!(first, second);
        assert!(!second.join("leftover.txt").exists());
        assert_eq!(
            fs::read_to_string(second.join("Package.swift")).unwrap(),
            "// swift-tools-version:5.9\n"
        );
    }

    #[test]
    fn competing_descriptors_are_removed_from_copy_only() {
        let src = tempfile::tempdir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        package(src.path());
        fs::create_dir_all(src.path().join("Widgets.xcodeproj")).unwrap();
        fs::create_dir_all(src.path().join("Widgets.xcworkspace")).unwrap();
        fs::create_dir_all(src.path().join("Sources/Nested.xcodeproj")).unwrap();

        let staged = WorkspaceStager::new(tmp.path()).stage(src.path(), "Widgets").unwrap();
        assert!(!staged.join("Widgets.xcodeproj").exists());
        assert!(!staged.join("Widgets.xcworkspace").exists());
        assert!(staged.join("Sources/Nested.xcodeproj").exists());
        assert!(src.path().join("Widgets.xcodeproj").exists());
    }

    #[test]
    fn staging_inside_the_original_is_refused() {
        let src = tempfile::tempdir().unwrap();
        package(src.path());
        let err = WorkspaceStager::new(src.path().join("build"))
            .stage(src.path(), "Widgets")
            .unwrap_err();
        assert!(matches!(err, BuildError::StagingConflict { .. }));
        assert!(!src.path().join("build").exists());
    }

    #[test]
    fn staging_over_the_original_is_refused() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("Widgets");
        package(&src);
        let err = WorkspaceStager::new(root.path()).stage(&src, "Widgets").unwrap_err();
        assert!(matches!(err, BuildError::StagingConflict { .. }));
        assert!(src.join("Package.swift").exists());
    }

    #[test]
    fn missing_original_is_a_staging_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = WorkspaceStager::new(tmp.path())
            .stage(&tmp.path().join("nope"), "Widgets")
            .unwrap_err();
        assert!(matches!(err, BuildError::Staging { .. }));
    }

    #[test]
    fn path_like_schemes_are_rejected() {
        for scheme in ["", ".", "..", "a/b", "../x"] {
            assert!(validate_scheme(scheme).is_err(), "{scheme:?} accepted");
        }
        assert!(validate_scheme("Widgets").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_recreated() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("real.txt"), "x").unwrap();
        std::os::unix::fs::symlink("real.txt", src.path().join("link.txt")).unwrap();

        copy_dir_all(src.path(), &dst.path().join("copy")).unwrap();
        let link = dst.path().join("copy/link.txt");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("real.txt"));
    }
}
