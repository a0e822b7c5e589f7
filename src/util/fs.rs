//! Filesystem utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// True when `path` holds exactly `contents`.
pub fn is_up_to_date(path: &Path, contents: &[u8]) -> Result<bool> {
    match fs::read(path) {
        Ok(existing) => Ok(existing == contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("failed to read file: {}", path.display())),
    }
}

/// Write `contents` to `path` unless the file already holds exactly those
/// bytes. Parent directories are created as needed.
///
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, contents: &[u8]) -> Result<bool> {
    if is_up_to_date(path, contents)? {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))?;

    tracing::debug!("wrote {}", path.display());
    Ok(true)
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Render a path with `\` separators, as project and solution files expect.
pub fn to_windows_separators(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("\\")
}

/// Path of `item` as seen from `from_dir`, with `\` separators.
///
/// Both paths are expected to share a root (normally the generation root).
pub fn artifact_relative_path(from_dir: &Path, item: &Path) -> String {
    let from_dir = normalize_path(from_dir);
    let item = normalize_path(item);
    to_windows_separators(&relative_path(&from_dir, &item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_if_changed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/out.txt");

        assert!(write_if_changed(&path, b"one").unwrap());
        assert!(!write_if_changed(&path, b"one").unwrap());
        assert!(write_if_changed(&path, b"two").unwrap());
        assert_eq!(fs::read(&path).unwrap(), b"two");
    }

    #[test]
    fn test_unchanged_file_is_not_touched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        fs::write(&path, b"same").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(!write_if_changed(&path, b"same").unwrap());

        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
    }

    #[test]
    fn test_artifact_relative_path() {
        assert_eq!(
            artifact_relative_path(Path::new("root/Game"), Path::new("root/Game/src/main.cpp")),
            "src\\main.cpp"
        );
        assert_eq!(
            artifact_relative_path(Path::new("root/Game"), Path::new("root/shared/common.h")),
            "..\\shared\\common.h"
        );
        assert_eq!(
            artifact_relative_path(Path::new("root/Game"), Path::new("root/./props/Debug.props")),
            "..\\props\\Debug.props"
        );
    }
}
