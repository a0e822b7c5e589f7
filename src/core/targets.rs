//! Target platforms and target configurations.
//!
//! Configurations form a DAG: each one lists the configurations it inherits
//! from, in priority order. Properties are resolved depth-first, first match
//! wins, so a diamond never needs special handling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::project::ProjectRole;
use crate::resolver::errors::ResolveError;

/// A solution platform and the architecture it builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetPlatform {
    /// Name shown in the solution (e.g. `x86`)
    #[serde(rename = "solution")]
    pub solution_name: String,

    /// Project platform name (e.g. `Win32`)
    #[serde(rename = "arch")]
    pub arch_name: String,
}

impl TargetPlatform {
    pub fn new(solution_name: impl Into<String>, arch_name: impl Into<String>) -> Self {
        TargetPlatform {
            solution_name: solution_name.into(),
            arch_name: arch_name.into(),
        }
    }
}

/// A named build configuration.
///
/// Every property except `is_developer_config` is optional and, when absent,
/// deferred to the inherited configurations.
#[derive(Debug, Clone, Default)]
pub struct TargetConfiguration {
    pub name: String,
    pub inherits: Vec<Arc<TargetConfiguration>>,
    pub module_role: Option<ProjectRole>,
    pub linked_module_role: Option<ProjectRole>,
    pub platform_toolset: Option<String>,
    pub use_debug_libraries: Option<bool>,
    /// Local only, never inherited.
    pub is_developer_config: bool,
}

impl TargetConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        TargetConfiguration {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn inherit(mut self, parent: Arc<TargetConfiguration>) -> Self {
        self.inherits.push(parent);
        self
    }

    pub fn with_module_role(mut self, role: ProjectRole) -> Self {
        self.module_role = Some(role);
        self
    }

    pub fn with_linked_module_role(mut self, role: ProjectRole) -> Self {
        self.linked_module_role = Some(role);
        self
    }

    pub fn with_platform_toolset(mut self, toolset: impl Into<String>) -> Self {
        self.platform_toolset = Some(toolset.into());
        self
    }

    pub fn with_debug_libraries(mut self, enabled: bool) -> Self {
        self.use_debug_libraries = Some(enabled);
        self
    }

    pub fn developer(mut self) -> Self {
        self.is_developer_config = true;
        self
    }

    /// Resolve a property: the local value, else the first inherited
    /// configuration (depth-first, in declared order) that supplies one.
    pub fn resolve<T>(&self, read: &dyn Fn(&TargetConfiguration) -> Option<T>) -> Option<T> {
        if let Some(value) = read(self) {
            return Some(value);
        }

        self.inherits.iter().find_map(|parent| parent.resolve(read))
    }

    /// Like [`resolve`](Self::resolve), but absence is an error.
    pub fn require<T>(
        &self,
        property: &'static str,
        read: &dyn Fn(&TargetConfiguration) -> Option<T>,
    ) -> Result<T, ResolveError> {
        self.resolve(read)
            .ok_or_else(|| ResolveError::UnresolvedProperty {
                configuration: self.name.clone(),
                property,
            })
    }

    /// Concrete role that `Module` projects take in this configuration.
    pub fn resolve_module_role(&self) -> Result<ProjectRole, ResolveError> {
        self.require("module_role", &|c| c.module_role)
    }

    /// Concrete role that `LinkedModule` projects take in this configuration.
    pub fn resolve_linked_module_role(&self) -> Result<ProjectRole, ResolveError> {
        self.require("linked_module_role", &|c| c.linked_module_role)
    }

    pub fn resolve_platform_toolset(&self) -> Result<String, ResolveError> {
        self.require("platform_toolset", &|c| c.platform_toolset.clone())
    }

    /// Defaults to false when no configuration in the chain sets it.
    pub fn resolve_use_debug_libraries(&self) -> bool {
        self.resolve(&|c| c.use_debug_libraries).unwrap_or(false)
    }

    /// Names of this configuration and all of its ancestors, ancestors
    /// first. A configuration reached twice through a diamond appears twice.
    pub fn inheritance_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        self.collect_chain(&mut chain);
        chain
    }

    fn collect_chain<'a>(&'a self, chain: &mut Vec<&'a str>) {
        for parent in &self.inherits {
            parent.collect_chain(chain);
        }
        chain.push(&self.name);
    }
}

/// Platforms and the configurations that make up the solution matrix.
#[derive(Debug, Clone, Default)]
pub struct TargetDefs {
    pub platforms: Vec<TargetPlatform>,
    /// Buildable configurations; abstract bases are only reachable through `inherits`.
    pub configurations: Vec<Arc<TargetConfiguration>>,
}

impl TargetDefs {
    pub fn configuration(&self, name: &str) -> Option<&Arc<TargetConfiguration>> {
        self.configurations.iter().find(|c| c.name == name)
    }
}
