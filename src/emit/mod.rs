//! Artifact emission.
//!
//! Every artifact is rendered into an [`OutputFiles`] collection first and
//! only flushed to disk once the whole run has succeeded. Flushing skips
//! files whose bytes are already on disk, so an unchanged input leaves every
//! timestamp alone.

pub mod filters;
pub mod module_list;
pub mod solution;
pub mod vcxproj;
pub mod xml;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::{is_up_to_date, write_if_changed};

pub use filters::render_filters;
pub use module_list::render_module_list;
pub use solution::render_solution;
pub use vcxproj::render_project;

/// Line ending used by every text artifact.
pub const LINE_ENDING: &str = "\r\n";

/// UTF-8 byte order mark written before XML and solution files.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// File stem of a project's artifacts: the last segment of its name.
pub fn project_file_stem(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// `<name>/<stem>.vcxproj`, relative to the root.
pub fn project_file_path(name: &str) -> PathBuf {
    Path::new(name).join(format!("{}.vcxproj", project_file_stem(name)))
}

/// `<name>/<stem>.vcxproj.filters`, relative to the root.
pub fn filters_file_path(name: &str) -> PathBuf {
    Path::new(name).join(format!("{}.vcxproj.filters", project_file_stem(name)))
}

/// `<name>/<stem>.generated.cpp`, relative to the root.
pub fn generated_module_list_path(name: &str) -> PathBuf {
    Path::new(name).join(format!("{}.generated.cpp", project_file_stem(name)))
}

/// `<solution>.sln`, relative to the root.
pub fn solution_file_path(solution_name: &str) -> PathBuf {
    PathBuf::from(format!("{}.sln", solution_name))
}

/// Builds CRLF-terminated text.
#[derive(Debug, Default)]
pub struct TextBuilder {
    text: String,
}

impl TextBuilder {
    pub fn new() -> Self {
        TextBuilder::default()
    }

    pub fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push_str(LINE_ENDING);
    }

    pub fn blank(&mut self) {
        self.text.push_str(LINE_ENDING);
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Rendered artifacts keyed by root-relative path.
#[derive(Debug, Clone, Default)]
pub struct OutputFiles {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

/// Outcome of flushing (or comparing) an [`OutputFiles`] collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Files that were (or would be) written
    pub written: Vec<PathBuf>,
    /// Files already up to date on disk
    pub unchanged: Vec<PathBuf>,
}

impl OutputFiles {
    pub fn new() -> Self {
        OutputFiles::default()
    }

    /// Add an artifact, replacing any earlier one at the same path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        if self.files.insert(path.clone(), contents.into()).is_some() {
            tracing::warn!("artifact {} rendered twice", path.display());
        }
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every artifact below `root` whose contents changed.
    pub fn flush(&self, root: &Path) -> Result<FlushReport> {
        let mut report = FlushReport::default();
        for (path, contents) in &self.files {
            if write_if_changed(&root.join(path), contents)? {
                report.written.push(path.clone());
            } else {
                report.unchanged.push(path.clone());
            }
        }
        Ok(report)
    }

    /// Report what [`flush`](Self::flush) would do, without writing.
    pub fn compare(&self, root: &Path) -> Result<FlushReport> {
        let mut report = FlushReport::default();
        for (path, contents) in &self.files {
            if is_up_to_date(&root.join(path), contents)? {
                report.unchanged.push(path.clone());
            } else {
                report.written.push(path.clone());
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_paths() {
        assert_eq!(project_file_path("Core"), PathBuf::from("Core/Core.vcxproj"));
        assert_eq!(
            filters_file_path("Core"),
            PathBuf::from("Core/Core.vcxproj.filters")
        );
        assert_eq!(
            generated_module_list_path("Game"),
            PathBuf::from("Game/Game.generated.cpp")
        );
        assert_eq!(project_file_stem("tools/Packer"), "Packer");
        assert_eq!(solution_file_path("Engine"), PathBuf::from("Engine.sln"));
    }

    #[test]
    fn test_text_builder_uses_crlf() {
        let mut text = TextBuilder::new();
        text.line("a");
        text.blank();
        text.line("b");
        assert_eq!(text.into_string(), "a\r\n\r\nb\r\n");
    }

    #[test]
    fn test_flush_then_compare() {
        let tmp = TempDir::new().unwrap();
        let mut outputs = OutputFiles::new();
        outputs.insert("Core/Core.vcxproj", b"project".to_vec());
        outputs.insert("Engine.sln", b"solution".to_vec());

        let before = outputs.compare(tmp.path()).unwrap();
        assert_eq!(before.written.len(), 2);
        assert!(!tmp.path().join("Engine.sln").exists());

        let first = outputs.flush(tmp.path()).unwrap();
        assert_eq!(first.written.len(), 2);
        assert!(first.unchanged.is_empty());

        let second = outputs.flush(tmp.path()).unwrap();
        assert!(second.written.is_empty());
        assert_eq!(second.unchanged.len(), 2);
        assert_eq!(outputs.compare(tmp.path()).unwrap(), second);
    }
}
