//! Reference classification.
//!
//! A project's declared references split three ways:
//! - unconditional link references, whose target role never changes;
//! - conditional link references to `Module` projects, decided per
//!   configuration;
//! - solution-level ordering edges, which ignore link validity.

use serde::Serialize;

use crate::core::project::{ProjectDef, ProjectGraph, ProjectRole};
use crate::core::targets::TargetDefs;
use crate::resolver::classify::{concrete_role, is_solution_dependency, is_valid_reference};
use crate::resolver::errors::ResolveError;

/// Link references valid under one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConditionalReferences {
    pub configuration: String,
    pub references: Vec<String>,
}

/// The classified references of one project. All lists keep declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceSet {
    pub unconditional: Vec<String>,
    /// One entry per buildable configuration, in configuration order
    pub conditional: Vec<ConditionalReferences>,
    pub solution_dependencies: Vec<String>,
}

impl ReferenceSet {
    /// Conditional references for a configuration (empty if unknown).
    pub fn for_configuration(&self, configuration: &str) -> &[String] {
        self.conditional
            .iter()
            .find(|c| c.configuration == configuration)
            .map(|c| c.references.as_slice())
            .unwrap_or(&[])
    }
}

/// Classify the references of `project`.
pub fn classify_references(
    project: &str,
    def: &ProjectDef,
    graph: &ProjectGraph,
    targets: &TargetDefs,
) -> Result<ReferenceSet, ResolveError> {
    let mut unconditional = Vec::new();
    let mut modules = Vec::new();
    let mut solution_dependencies = Vec::new();

    for reference in &def.references {
        let target = graph
            .get(reference)
            .ok_or_else(|| ResolveError::UnknownReference {
                project: project.to_string(),
                reference: reference.clone(),
            })?;

        if is_solution_dependency(target.role) {
            solution_dependencies.push(reference.clone());
        }

        if target.role == ProjectRole::Module {
            modules.push(reference);
        } else if is_valid_reference(target.role) {
            unconditional.push(reference.clone());
        }
    }

    let mut conditional = Vec::with_capacity(targets.configurations.len());
    for config in &targets.configurations {
        let mut references = Vec::new();
        for reference in &modules {
            if is_valid_reference(concrete_role(ProjectRole::Module, config)?) {
                references.push((*reference).clone());
            }
        }
        conditional.push(ConditionalReferences {
            configuration: config.name.clone(),
            references,
        });
    }

    Ok(ReferenceSet {
        unconditional,
        conditional,
        solution_dependencies,
    })
}
