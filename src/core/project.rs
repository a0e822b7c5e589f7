//! Project definitions and the project graph.
//!
//! The graph is loaded once from `ProjectDefs.json` and is read-only
//! afterwards. Projects are keyed by name in a `BTreeMap`, so every
//! iteration over the graph is ordinal by name.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// The role a project plays in the build.
///
/// `Module` and `LinkedModule` are abstract: their concrete form is picked
/// per target configuration. Every other role is the same in all
/// configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// Plugin module, statically linked or loaded as a DLL depending on configuration
    Module,
    /// Plugin module that is always linked directly into its dependents
    LinkedModule,
    /// Static library (.lib)
    StaticLib,
    /// Application
    Executable,
    /// DLL loaded at runtime by the module loader
    LooseDll,
    /// DLL linked through its import library
    LinkedDll,
    /// DLL that every configuration links through its import library
    AlwaysLinkedDll,
    /// DLL that is built alongside its dependents but never linked
    NeverLinkedDll,
}

impl ProjectRole {
    /// Snake-case name, as used in `Generator.toml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Module => "module",
            ProjectRole::LinkedModule => "linked_module",
            ProjectRole::StaticLib => "static_lib",
            ProjectRole::Executable => "executable",
            ProjectRole::LooseDll => "loose_dll",
            ProjectRole::LinkedDll => "linked_dll",
            ProjectRole::AlwaysLinkedDll => "always_linked_dll",
            ProjectRole::NeverLinkedDll => "never_linked_dll",
        }
    }

    /// True for roles whose concrete form depends on the configuration.
    pub fn is_abstract(&self) -> bool {
        matches!(self, ProjectRole::Module | ProjectRole::LinkedModule)
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project kind as spelled in `ProjectDefs.json`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DeclaredKind {
    Module,
    LinkedModule,
    Lib,
    Dll,
    LooseDll,
    Exe,
}

impl From<DeclaredKind> for ProjectRole {
    fn from(kind: DeclaredKind) -> Self {
        match kind {
            DeclaredKind::Module => ProjectRole::Module,
            DeclaredKind::LinkedModule => ProjectRole::LinkedModule,
            DeclaredKind::Lib => ProjectRole::StaticLib,
            DeclaredKind::Dll => ProjectRole::AlwaysLinkedDll,
            DeclaredKind::LooseDll => ProjectRole::NeverLinkedDll,
            DeclaredKind::Exe => ProjectRole::Executable,
        }
    }
}

/// Classification of a file within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Classify by extension
    #[default]
    Auto,
    Source,
    Include,
    /// Deployed next to the output binary
    Content,
    #[serde(skip_deserializing)]
    Misc,
    #[serde(skip_deserializing)]
    Resource,
}

/// An explicitly listed file, possibly a wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawExtraFile")]
pub struct ExtraFile {
    /// Root-relative path or glob pattern
    pub path: String,
    pub file_type: FileType,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExtraFile {
    Path(String),
    Detailed(DetailedExtraFile),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedExtraFile {
    path: String,
    #[serde(default, rename = "type")]
    file_type: FileType,
}

impl From<RawExtraFile> for ExtraFile {
    fn from(raw: RawExtraFile) -> Self {
        match raw {
            RawExtraFile::Path(path) => ExtraFile {
                path,
                file_type: FileType::Auto,
            },
            RawExtraFile::Detailed(d) => ExtraFile {
                path: d.path,
                file_type: d.file_type,
            },
        }
    }
}

/// Maps a source directory onto a virtual folder in the IDE.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDirectoryMapping")]
pub struct DirectoryMapping {
    /// Root-relative source directory
    pub source_dir: String,
    /// Virtual folder the directory's files appear under ("" for the top level)
    pub filter_dir: String,
    /// Walk sub-directories (defaults to true)
    pub recursive: Option<bool>,
}

impl DirectoryMapping {
    pub fn new(source_dir: impl Into<String>, filter_dir: impl Into<String>) -> Self {
        DirectoryMapping {
            source_dir: source_dir.into(),
            filter_dir: filter_dir.into(),
            recursive: None,
        }
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive.unwrap_or(true)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDirectoryMapping {
    Path(String),
    Detailed(DetailedDirectoryMapping),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedDirectoryMapping {
    path: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    recursive: Option<bool>,
}

impl From<RawDirectoryMapping> for DirectoryMapping {
    fn from(raw: RawDirectoryMapping) -> Self {
        match raw {
            RawDirectoryMapping::Path(path) => DirectoryMapping::new(path, ""),
            RawDirectoryMapping::Detailed(d) => DirectoryMapping {
                source_dir: d.path,
                filter_dir: d.target,
                recursive: d.recursive,
            },
        }
    }
}

/// A single project definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawProjectDef")]
pub struct ProjectDef {
    pub role: ProjectRole,

    /// Only needed by developer builds
    pub dev_only: bool,

    /// Names of referenced projects, in declared order
    pub references: Vec<String>,

    /// Property sheets imported by every configuration
    pub property_sheets: Vec<String>,

    pub directory_mappings: Vec<DirectoryMapping>,

    pub extra_files: Vec<ExtraFile>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProjectDef {
    #[serde(rename = "type")]
    kind: DeclaredKind,
    #[serde(default)]
    dev_only: bool,
    #[serde(default)]
    refs: Vec<String>,
    #[serde(default)]
    configs: Vec<String>,
    #[serde(default)]
    extra_dirs: Vec<DirectoryMapping>,
    #[serde(default)]
    extra_files: Vec<ExtraFile>,
}

impl From<RawProjectDef> for ProjectDef {
    fn from(raw: RawProjectDef) -> Self {
        ProjectDef {
            role: raw.kind.into(),
            dev_only: raw.dev_only,
            references: raw.refs,
            property_sheets: raw.configs,
            directory_mappings: raw.extra_dirs,
            extra_files: raw.extra_files,
        }
    }
}

impl ProjectDef {
    /// Create a definition with no references or files.
    pub fn new(role: ProjectRole) -> Self {
        ProjectDef {
            role,
            dev_only: false,
            references: Vec::new(),
            property_sheets: Vec::new(),
            directory_mappings: Vec::new(),
            extra_files: Vec::new(),
        }
    }

    pub fn with_dev_only(mut self, dev_only: bool) -> Self {
        self.dev_only = dev_only;
        self
    }

    pub fn with_refs(mut self, refs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.references = refs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property_sheets(
        mut self,
        sheets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.property_sheets = sheets.into_iter().map(Into::into).collect();
        self
    }
}

/// All project definitions, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectGraph {
    projects: BTreeMap<String, ProjectDef>,
}

impl ProjectGraph {
    /// File name of the definitions document inside the defs directory.
    pub const FILE_NAME: &'static str = "ProjectDefs.json";

    pub fn new() -> Self {
        ProjectGraph {
            projects: BTreeMap::new(),
        }
    }

    /// Load and validate a definitions document.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read project definitions: {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("failed to load project definitions: {}", path.display()))
    }

    /// Parse and validate a definitions document.
    pub fn from_json(json: &str) -> Result<Self> {
        let projects: BTreeMap<String, ProjectDef> =
            serde_json::from_str(json).context("invalid project definitions")?;

        let graph = ProjectGraph { projects };
        graph.validate()?;

        tracing::debug!("loaded {} project definitions", graph.len());
        Ok(graph)
    }

    /// Check that every reference names a project in the graph.
    pub fn validate(&self) -> Result<()> {
        for (name, def) in &self.projects {
            for reference in &def.references {
                if !self.projects.contains_key(reference) {
                    bail!(
                        "project `{}` references `{}`, which is not defined",
                        name,
                        reference
                    );
                }
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, name: impl Into<String>, def: ProjectDef) {
        self.projects.insert(name.into(), def);
    }

    pub fn get(&self, name: &str) -> Option<&ProjectDef> {
        self.projects.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    /// Iterate over all projects, ordinal by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProjectDef)> {
        self.projects.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Iterate over executable projects, ordinal by name.
    pub fn executables(&self) -> impl Iterator<Item = (&str, &ProjectDef)> {
        self.iter()
            .filter(|(_, def)| def.role == ProjectRole::Executable)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl FromIterator<(String, ProjectDef)> for ProjectGraph {
    fn from_iter<I: IntoIterator<Item = (String, ProjectDef)>>(iter: I) -> Self {
        ProjectGraph {
            projects: iter.into_iter().collect(),
        }
    }
}
