//! Module reachability for executables.
//!
//! Every executable statically registers the `Module` projects it reaches
//! through `Module`/`LinkedModule` intermediaries. Each module is tagged
//! with a taint: `Release` if at least one path to it is free of
//! developer-only projects, `DeveloperOnly` otherwise.
//!
//! The traversal is a worklist over a two-point lattice. `Release` is
//! terminal, so a name is processed at most once per taint value and a
//! diamond never re-expands a subtree that has nothing new to learn.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use rayon::prelude::*;
use serde::Serialize;

use crate::core::project::{ProjectGraph, ProjectRole};
use crate::resolver::errors::ResolveError;

/// Whether a dependency is needed by every build or only by developer builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Taint {
    Release,
    DeveloperOnly,
}

impl Taint {
    pub fn from_dev_only(dev_only: bool) -> Self {
        if dev_only {
            Taint::DeveloperOnly
        } else {
            Taint::Release
        }
    }

    /// A project's own developer-only flag can only strengthen the taint.
    pub fn with_dev_only(self, dev_only: bool) -> Self {
        if dev_only {
            Taint::DeveloperOnly
        } else {
            self
        }
    }
}

/// Modules an executable registers, split by taint. Both lists are sorted
/// ordinally and disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleExportSet {
    pub release_modules: Vec<String>,
    pub developer_modules: Vec<String>,
}

impl ModuleExportSet {
    pub fn is_empty(&self) -> bool {
        self.release_modules.is_empty() && self.developer_modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.release_modules.len() + self.developer_modules.len()
    }

    /// The taint a module was registered with, if it is registered at all.
    pub fn taint_of(&self, module: &str) -> Option<Taint> {
        if self.release_modules.iter().any(|m| m == module) {
            Some(Taint::Release)
        } else if self.developer_modules.iter().any(|m| m == module) {
            Some(Taint::DeveloperOnly)
        } else {
            None
        }
    }
}

struct TaintedRef<'a> {
    name: &'a str,
    referrer: &'a str,
    taint: Taint,
}

/// Compute the modules `executable` must statically register.
pub fn resolve_module_exports(
    graph: &ProjectGraph,
    executable: &str,
) -> Result<ModuleExportSet, ResolveError> {
    let exe = graph.get(executable).ok_or_else(|| ResolveError::UnknownProject {
        name: executable.to_string(),
    })?;

    let seed = Taint::from_dev_only(exe.dev_only);
    let mut queue: VecDeque<TaintedRef<'_>> = exe
        .references
        .iter()
        .map(|name| TaintedRef {
            name,
            referrer: executable,
            taint: seed,
        })
        .collect();

    let mut recorded: HashMap<&str, Taint> = HashMap::new();
    let mut modules: BTreeSet<&str> = BTreeSet::new();

    while let Some(item) = queue.pop_front() {
        match recorded.get(item.name) {
            Some(Taint::Release) => continue,
            Some(Taint::DeveloperOnly) if item.taint == Taint::DeveloperOnly => continue,
            _ => {}
        }

        let dep = graph
            .get(item.name)
            .ok_or_else(|| ResolveError::UnknownReference {
                project: item.referrer.to_string(),
                reference: item.name.to_string(),
            })?;

        let taint = item.taint.with_dev_only(dep.dev_only);
        recorded.insert(item.name, taint);

        if dep.role == ProjectRole::Module {
            modules.insert(item.name);
        }

        if dep.role.is_abstract() {
            queue.extend(dep.references.iter().map(|name| TaintedRef {
                name,
                referrer: item.name,
                taint,
            }));
        }
    }

    let mut exports = ModuleExportSet::default();
    for module in modules {
        if recorded.get(module) == Some(&Taint::Release) {
            exports.release_modules.push(module.to_string());
        } else {
            exports.developer_modules.push(module.to_string());
        }
    }

    tracing::debug!(
        "`{}` registers {} release and {} developer modules",
        executable,
        exports.release_modules.len(),
        exports.developer_modules.len()
    );

    Ok(exports)
}

/// Compute the module export set of every executable in the graph.
///
/// Executables are independent of each other and resolved in parallel; the
/// result is keyed by name, so ordering never depends on scheduling.
pub fn resolve_all_module_exports(
    graph: &ProjectGraph,
) -> Result<BTreeMap<String, ModuleExportSet>, ResolveError> {
    let executables: Vec<&str> = graph.executables().map(|(name, _)| name).collect();

    executables
        .par_iter()
        .map(|name| {
            resolve_module_exports(graph, name)
                .map(|exports| (name.to_string(), exports))
                .map_err(|e| e.in_project(name))
        })
        .collect()
}
