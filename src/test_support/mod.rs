//! Test fixtures for projgen unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{default_targets, GraphBuilder};
//!
//! let graph = GraphBuilder::new()
//!     .exe("Game", &["Render"])
//!     .module("Render", &[])
//!     .build();
//! let targets = default_targets();
//! ```

use std::path::Path;

use crate::core::project::{ProjectDef, ProjectGraph, ProjectRole};
use crate::core::targets::TargetDefs;
use crate::util::config::GeneratorConfig;

/// Target definitions of the built-in configuration:
/// `Debug` and `Release` on `x86/Win32` and `x64/x64`.
pub fn default_targets() -> TargetDefs {
    GeneratorConfig::default()
        .target_defs()
        .expect("built-in target definitions are valid")
}

/// Fluent builder for project graphs.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: ProjectGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder::default()
    }

    /// Add a project with an explicit role.
    pub fn project(mut self, name: &str, role: ProjectRole, dev_only: bool, refs: &[&str]) -> Self {
        self.graph.insert(
            name,
            ProjectDef::new(role)
                .with_dev_only(dev_only)
                .with_refs(refs.iter().copied()),
        );
        self
    }

    pub fn exe(self, name: &str, refs: &[&str]) -> Self {
        self.project(name, ProjectRole::Executable, false, refs)
    }

    pub fn dev_exe(self, name: &str, refs: &[&str]) -> Self {
        self.project(name, ProjectRole::Executable, true, refs)
    }

    pub fn lib(self, name: &str, refs: &[&str]) -> Self {
        self.project(name, ProjectRole::StaticLib, false, refs)
    }

    pub fn module(self, name: &str, refs: &[&str]) -> Self {
        self.project(name, ProjectRole::Module, false, refs)
    }

    pub fn dev_module(self, name: &str, refs: &[&str]) -> Self {
        self.project(name, ProjectRole::Module, true, refs)
    }

    pub fn linked_module(self, name: &str, refs: &[&str]) -> Self {
        self.project(name, ProjectRole::LinkedModule, false, refs)
    }

    pub fn never_linked_dll(self, name: &str) -> Self {
        self.project(name, ProjectRole::NeverLinkedDll, false, &[])
    }

    pub fn always_linked_dll(self, name: &str) -> Self {
        self.project(name, ProjectRole::AlwaysLinkedDll, false, &[])
    }

    /// Set the property sheets of an already added project.
    pub fn with_property_sheets(mut self, name: &str, sheets: &[&str]) -> Self {
        let def = self
            .graph
            .get(name)
            .cloned()
            .expect("project must be added before its property sheets")
            .with_property_sheets(sheets.iter().copied());
        self.graph.insert(name, def);
        self
    }

    /// Finish, checking that every reference resolves.
    pub fn build(self) -> ProjectGraph {
        self.graph.validate().expect("fixture graph is consistent");
        self.graph
    }

    /// Finish without validation, for tests of invalid graphs.
    pub fn build_unchecked(self) -> ProjectGraph {
        self.graph
    }
}

/// Write a file below `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
