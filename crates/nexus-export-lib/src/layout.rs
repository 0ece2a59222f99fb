//! Maps repository-relative asset paths onto the output directory.
//!
//! Asset paths come from the server, so anything that could climb out of the
//! output root is rejected rather than rewritten.

use crate::error::NexusExportError;
use std::path::{Component, Path, PathBuf};

/// Computes the local path of an asset without touching the filesystem.
pub fn target_path(output_root: &Path, asset_path: &str) -> Result<PathBuf, NexusExportError> {
    let unsafe_path = || NexusExportError::UnsafeAssetPath {
        path: asset_path.to_string(),
    };

    let mut relative = PathBuf::new();
    for segment in asset_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(unsafe_path()),
            s if s.contains('\\') || s.contains('\0') => return Err(unsafe_path()),
            // Drive prefixes and the like, on platforms that have them.
            s if !matches!(
                Path::new(s).components().collect::<Vec<_>>().as_slice(),
                [Component::Normal(_)]
            ) =>
            {
                return Err(unsafe_path());
            }
            s => relative.push(s),
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(unsafe_path());
    }

    Ok(output_root.join(relative))
}

/// Computes the local path of an asset and creates its parent directories.
pub fn prepare_target_path(
    output_root: &Path,
    asset_path: &str,
) -> Result<PathBuf, NexusExportError> {
    let target = target_path(output_root, asset_path)?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|source| NexusExportError::Filesystem {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path_strips_leading_slash() {
        let root = Path::new("out");
        assert_eq!(
            target_path(root, "/org/example/lib/1.0/lib-1.0.jar").unwrap(),
            Path::new("out/org/example/lib/1.0/lib-1.0.jar")
        );
        assert_eq!(
            target_path(root, "a//./b.txt").unwrap(),
            Path::new("out/a/b.txt")
        );
    }

    #[test]
    fn test_target_path_rejects_traversal() {
        let root = Path::new("out");
        for path in [
            "../escape.jar",
            "a/../../escape.jar",
            "a/..",
            "..\\escape.jar",
            "",
            "/",
            "./.",
        ] {
            let result = target_path(root, path);
            assert!(
                matches!(result, Err(NexusExportError::UnsafeAssetPath { .. })),
                "{path:?} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_target_path_allows_dots_inside_names() {
        let root = Path::new("out");
        assert_eq!(
            target_path(root, "a/..b/c..d/.hidden").unwrap(),
            Path::new("out/a/..b/c..d/.hidden")
        );
    }

    #[test]
    fn test_prepare_target_path_creates_parents_idempotently() {
        let temp_dir = tempfile::tempdir().unwrap();

        let first = prepare_target_path(temp_dir.path(), "x/y/z.bin").unwrap();
        let second = prepare_target_path(temp_dir.path(), "x/y/z.bin").unwrap();

        assert_eq!(first, second);
        assert!(temp_dir.path().join("x/y").is_dir());
        assert!(!first.exists());
        assert!(first.starts_with(temp_dir.path()));
    }

    #[test]
    fn test_prepare_target_path_does_not_create_anything_for_unsafe_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("out");

        assert!(prepare_target_path(&root, "../outside/file").is_err());
        assert!(!root.exists());
        assert!(!temp_dir.path().join("outside").exists());
    }
}
