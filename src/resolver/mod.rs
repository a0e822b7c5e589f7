//! Resolution of the project graph into concrete decisions.
//!
//! The resolver is pure and deterministic: all I/O happens before it runs
//! (loading definitions) and after it finishes (emitting artifacts).

pub mod classify;
pub mod errors;
pub mod modules;
pub mod references;

pub use classify::{concrete_role, is_valid_reference, ConfigurationType};
pub use errors::ResolveError;
pub use modules::{resolve_all_module_exports, resolve_module_exports, ModuleExportSet, Taint};
pub use references::{classify_references, ConditionalReferences, ReferenceSet};

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::core::project::{ProjectDef, ProjectGraph, ProjectRole};
use crate::core::targets::{TargetConfiguration, TargetDefs};
use crate::util::hash::identifier_for;

/// Everything the emitters need, for every project and configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    pub projects: BTreeMap<String, ResolvedProject>,
    /// Keyed by executable name
    pub module_exports: BTreeMap<String, ModuleExportSet>,
}

/// Decisions for one project.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedProject {
    pub identifier: Uuid,
    pub role: ProjectRole,
    pub references: ReferenceSet,
    /// One entry per buildable configuration, in configuration order
    pub configurations: Vec<ResolvedConfiguration>,
}

/// Decisions for one project under one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfiguration {
    pub configuration: String,
    pub role: ProjectRole,
    pub configuration_type: ConfigurationType,
    pub platform_toolset: String,
    pub use_debug_libraries: bool,
    /// Property sheet names, sorted case-insensitively without duplicates
    pub property_sheets: Vec<String>,
}

impl Resolution {
    pub fn project(&self, name: &str) -> Option<&ResolvedProject> {
        self.projects.get(name)
    }

    /// Identifier of a project. Identifiers are a pure function of the name,
    /// so names outside the resolution get the same value they always would.
    pub fn identifier(&self, name: &str) -> Uuid {
        self.projects
            .get(name)
            .map(|p| p.identifier)
            .unwrap_or_else(|| identifier_for(name))
    }

    pub fn module_exports(&self, executable: &str) -> Option<&ModuleExportSet> {
        self.module_exports.get(executable)
    }
}

/// Resolve every project of `graph` against `targets`.
pub fn resolve(graph: &ProjectGraph, targets: &TargetDefs) -> Result<Resolution, ResolveError> {
    let module_exports = resolve_all_module_exports(graph)?;

    let mut projects = BTreeMap::new();
    for (name, def) in graph.iter() {
        let project = resolve_project(name, def, graph, targets).map_err(|e| e.in_project(name))?;
        projects.insert(name.to_string(), project);
    }

    tracing::debug!(
        "resolved {} projects across {} configurations",
        projects.len(),
        targets.configurations.len()
    );

    Ok(Resolution {
        projects,
        module_exports,
    })
}

fn resolve_project(
    name: &str,
    def: &ProjectDef,
    graph: &ProjectGraph,
    targets: &TargetDefs,
) -> Result<ResolvedProject, ResolveError> {
    let references = classify_references(name, def, graph, targets)?;

    let configurations = targets
        .configurations
        .iter()
        .map(|config| resolve_configuration(def, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedProject {
        identifier: identifier_for(name),
        role: def.role,
        references,
        configurations,
    })
}

fn resolve_configuration(
    def: &ProjectDef,
    config: &TargetConfiguration,
) -> Result<ResolvedConfiguration, ResolveError> {
    let role = concrete_role(def.role, config)?;
    let configuration_type = ConfigurationType::for_role(role)?;

    let mut property_sheets: Vec<String> = config
        .inheritance_chain()
        .into_iter()
        .map(str::to_string)
        .chain(def.property_sheets.iter().cloned())
        .collect();
    // Sheet names are file names; case variants import the same file.
    property_sheets.sort_by_cached_key(|s| s.to_uppercase());
    property_sheets.dedup_by(|a, b| a.to_uppercase() == b.to_uppercase());

    Ok(ResolvedConfiguration {
        configuration: config.name.clone(),
        role,
        configuration_type,
        platform_toolset: config.resolve_platform_toolset()?,
        use_debug_libraries: config.resolve_use_debug_libraries(),
        property_sheets,
    })
}
