//! Discovery of the files that make up a project.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::{glob, Pattern};
use walkdir::WalkDir;

use crate::core::project::{DirectoryMapping, ExtraFile, FileType, ProjectDef, ProjectRole};
use crate::emit::generated_module_list_path;
use crate::util::fs::to_windows_separators;

const SOURCE_EXTENSIONS: &[&str] = &["c", "cxx", "cpp"];
const HEADER_EXTENSIONS: &[&str] = &["h", "hxx", "inl"];

/// A file that belongs to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Path relative to the generation root
    pub path: PathBuf,
    /// Virtual path in the IDE, ending in the file name
    pub filter_path: PathBuf,
    /// Never `Auto`
    pub file_type: FileType,
}

/// Classify a listed file by extension, ignoring case. Unknown extensions
/// are `Misc`.
pub fn classify_listed_file(path: &Path) -> FileType {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
        return FileType::Misc;
    };

    if SOURCE_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)) {
        FileType::Source
    } else if HEADER_EXTENSIONS.iter().any(|h| ext.eq_ignore_ascii_case(h)) {
        FileType::Include
    } else {
        FileType::Misc
    }
}

/// Classify a file found by a directory walk. Only exact-case source and
/// header extensions are picked up.
pub fn classify_walked_file(path: &Path) -> Option<FileType> {
    let ext = path.extension()?.to_str()?;

    if HEADER_EXTENSIONS.contains(&ext) {
        Some(FileType::Include)
    } else if SOURCE_EXTENSIONS.contains(&ext) {
        Some(FileType::Source)
    } else {
        None
    }
}

fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

fn file_name(path: &Path) -> PathBuf {
    path.file_name().map(PathBuf::from).unwrap_or_default()
}

fn resolved_type(declared: FileType, path: &Path) -> FileType {
    match declared {
        FileType::Auto => classify_listed_file(path),
        other => other,
    }
}

/// Collect every file of project `name`, sorted case-insensitively by path.
pub fn collect_project_files(root: &Path, name: &str, def: &ProjectDef) -> Result<Vec<ResolvedFile>> {
    let mut files = Vec::new();

    for extra in &def.extra_files {
        expand_extra_file(root, extra, &mut files)
            .with_context(|| format!("in extra files of project `{}`", name))?;
    }

    let project_dir = DirectoryMapping::new(name, "");
    if root.join(name).is_dir() {
        expand_directory(root, &project_dir, &mut files)?;
    } else {
        tracing::debug!("project `{}` has no directory of its own", name);
    }

    for mapping in &def.directory_mappings {
        if !root.join(&mapping.source_dir).is_dir() {
            bail!(
                "project `{}` maps directory `{}`, which does not exist",
                name,
                mapping.source_dir
            );
        }
        expand_directory(root, mapping, &mut files)?;
    }

    if def.role == ProjectRole::Executable {
        let generated = generated_module_list_path(name);
        if !files.iter().any(|f| f.path == generated) {
            files.push(ResolvedFile {
                filter_path: file_name(&generated),
                path: generated,
                file_type: FileType::Source,
            });
        }
    }

    files.sort_by_cached_key(|f| to_windows_separators(&f.path).to_uppercase());
    files.dedup_by(|a, b| a.path == b.path);

    tracing::debug!("project `{}`: {} files", name, files.len());
    Ok(files)
}

fn expand_extra_file(root: &Path, extra: &ExtraFile, files: &mut Vec<ResolvedFile>) -> Result<()> {
    if !is_pattern(&extra.path) {
        let path = PathBuf::from(&extra.path);
        if !root.join(&path).is_file() {
            bail!("file `{}` was not found under {}", extra.path, root.display());
        }

        files.push(ResolvedFile {
            file_type: resolved_type(extra.file_type, &path),
            filter_path: file_name(&path),
            path,
        });
        return Ok(());
    }

    // Only the listed path is a pattern; the root is matched literally.
    let full_pattern = PathBuf::from(Pattern::escape(&root.to_string_lossy())).join(&extra.path);
    let pattern_str = full_pattern.to_string_lossy();

    let mut matched = 0;
    for entry in glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", extra.path))? {
        match entry {
            Ok(found) => {
                if !found.is_file() {
                    continue;
                }
                let path = found.strip_prefix(root).unwrap_or(&found).to_path_buf();
                files.push(ResolvedFile {
                    file_type: resolved_type(extra.file_type, &path),
                    filter_path: file_name(&path),
                    path,
                });
                matched += 1;
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    if matched == 0 {
        tracing::warn!("pattern `{}` matched no files", extra.path);
    }
    Ok(())
}

fn expand_directory(root: &Path, mapping: &DirectoryMapping, files: &mut Vec<ResolvedFile>) -> Result<()> {
    let source_dir = root.join(&mapping.source_dir);

    let mut walker = WalkDir::new(&source_dir).sort_by_file_name();
    if !mapping.is_recursive() {
        walker = walker.max_depth(1);
    }

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk directory: {}", source_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_type) = classify_walked_file(entry.path()) else {
            continue;
        };

        let within = entry.path().strip_prefix(&source_dir).unwrap_or(entry.path());
        files.push(ResolvedFile {
            path: Path::new(&mapping.source_dir).join(within),
            filter_path: Path::new(&mapping.filter_dir).join(within),
            file_type,
        });
    }

    Ok(())
}
