//! Directory locator - resolves a logical directory name under a root
//!
//! Performs a recursive enumeration of the root looking for the first
//! directory entry whose base name equals the requested name. Match order
//! follows enumeration order and is not guaranteed deterministic across
//! runs. On a hit the returned path is the name joined onto the root,
//! which is where callers re-anchor the scan.

use crate::error::LocateError;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Find a directory named `name` anywhere under `root`.
///
/// Returns `root/name` on the first match, a not-found error when the
/// search exhausts without one, and an enumeration error if reading any
/// directory along the way fails.
pub fn locate(root: &Path, name: &str) -> Result<PathBuf, LocateError> {
    if search(root, OsStr::new(name))? {
        Ok(root.join(name))
    } else {
        Err(LocateError::NotFound {
            name: name.to_string(),
            root: root.to_path_buf(),
        })
    }
}

fn search(dir: &Path, name: &OsStr) -> Result<bool, LocateError> {
    let entries = fs::read_dir(dir).map_err(|e| LocateError::Enumeration {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| LocateError::Enumeration {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let file_type = entry.file_type().map_err(|e| LocateError::Enumeration {
            path: entry.path(),
            reason: e.to_string(),
        })?;

        if !file_type.is_dir() {
            continue;
        }

        if entry.file_name().as_os_str() == name {
            return Ok(true);
        }

        if search(&entry.path(), name)? {
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_locate_direct_child() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("books")).unwrap();

        let found = locate(root.path(), "books").unwrap();
        assert_eq!(found, root.path().join("books"));
    }

    #[test]
    fn test_locate_nested_directory() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("archive/2024/books")).unwrap();

        // The match is deep, but the returned path is anchored at the root
        let found = locate(root.path(), "books").unwrap();
        assert_eq!(found, root.path().join("books"));
        assert_eq!(found.file_name().unwrap(), "books");
    }

    #[test]
    fn test_locate_missing_directory() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("other")).unwrap();

        let err = locate(root.path(), "books").unwrap_err();
        assert!(matches!(err, LocateError::NotFound { .. }));
    }

    #[test]
    fn test_locate_ignores_files_with_matching_name() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("books"), b"not a directory").unwrap();

        assert!(locate(root.path(), "books").is_err());
    }

    #[test]
    fn test_locate_missing_root_is_enumeration_error() {
        let err = locate(Path::new("/nonexistent-root"), "books").unwrap_err();
        assert!(matches!(err, LocateError::Enumeration { .. }));
    }
}
