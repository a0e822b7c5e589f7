//! Resolution error types and diagnostics.

use std::path::Path;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::project::{ProjectGraph, ProjectRole};
use crate::util::config::GeneratorConfig;
use crate::util::diagnostic::Diagnostic;

/// Error while turning the project graph into concrete decisions.
///
/// None of these are recoverable; the whole generation run stops.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("configuration `{configuration}` does not resolve `{property}`")]
    #[diagnostic(
        code(projgen::resolve::unresolved_property),
        help("Set the property on the configuration or on one it inherits from")
    )]
    UnresolvedProperty {
        configuration: String,
        property: &'static str,
    },

    #[error("project `{project}` references unknown project `{reference}`")]
    #[diagnostic(code(projgen::resolve::unknown_reference))]
    UnknownReference { project: String, reference: String },

    #[error("project `{name}` is not defined")]
    #[diagnostic(code(projgen::resolve::unknown_project))]
    UnknownProject { name: String },

    #[error("role `{role}` has no IDE configuration type")]
    #[diagnostic(
        code(projgen::resolve::unclassifiable_role),
        help("Map abstract roles to a concrete role in every configuration")
    )]
    UnclassifiableRole { role: ProjectRole },

    #[error("failed to resolve project `{project}`")]
    #[diagnostic(code(projgen::resolve::project))]
    InProject {
        project: String,
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Attach the project that triggered this error. Idempotent.
    pub fn in_project(self, project: &str) -> Self {
        match self {
            err @ ResolveError::InProject { .. } => err,
            err => ResolveError::InProject {
                project: project.to_string(),
                source: Box::new(err),
            },
        }
    }

    /// The underlying error, without project context.
    pub fn root(&self) -> &ResolveError {
        match self {
            ResolveError::InProject { source, .. } => source.root(),
            err => err,
        }
    }

    /// The definitions file that has to change to fix this error.
    pub fn definitions_file(&self) -> &'static str {
        match self.root() {
            ResolveError::UnknownReference { .. } | ResolveError::UnknownProject { .. } => {
                ProjectGraph::FILE_NAME
            }
            _ => GeneratorConfig::FILE_NAME,
        }
    }

    /// Like [`to_diagnostic`](Self::to_diagnostic), pointing at the
    /// offending file in `defs_dir`.
    pub fn to_diagnostic_in(&self, defs_dir: &Path) -> Diagnostic {
        self.to_diagnostic()
            .with_location(defs_dir.join(self.definitions_file()))
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnresolvedProperty {
                configuration,
                property,
            } => Diagnostic::error(format!(
                "configuration `{}` has no `{}`",
                configuration, property
            ))
            .with_context("no configuration in its inheritance chain sets it")
            .with_suggestion(format!(
                "Set `{}` on `{}` in Generator.toml",
                property, configuration
            ))
            .with_suggestion("Or set it on a configuration that it inherits from"),

            ResolveError::UnknownReference { project, reference } => Diagnostic::error(format!(
                "project `{}` references `{}`, which is not defined",
                project, reference
            ))
            .with_suggestion(format!("Add `{}` to ProjectDefs.json", reference))
            .with_suggestion(format!("Remove it from the `refs` of `{}`", project)),

            ResolveError::UnknownProject { name } => {
                Diagnostic::error(format!("project `{}` is not defined", name))
                    .with_suggestion("Run `projgen resolve` to list the defined projects")
            }

            ResolveError::UnclassifiableRole { role } => Diagnostic::error(format!(
                "role `{}` has no IDE configuration type",
                role
            ))
            .with_context("only static libraries, DLLs and executables can be emitted")
            .with_suggestion(
                "Map `module_role` and `linked_module_role` to a concrete role in every configuration",
            ),

            ResolveError::InProject { project, source } => source
                .to_diagnostic()
                .with_context(format!("while resolving project `{}`", project)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_property_diagnostic() {
        let err = ResolveError::UnresolvedProperty {
            configuration: "Profile".to_string(),
            property: "platform_toolset",
        }
        .in_project("Game");

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("error: configuration `Profile` has no `platform_toolset`"));
        assert!(output.contains("while resolving project `Game`"));
        assert!(output.contains("help: consider:"));
    }

    #[test]
    fn test_diagnostic_points_at_definitions_file() {
        let defs = Path::new("defs");

        let unresolved = ResolveError::UnresolvedProperty {
            configuration: "Profile".to_string(),
            property: "platform_toolset",
        }
        .in_project("Game");
        assert_eq!(
            unresolved.to_diagnostic_in(defs).location,
            Some(defs.join("Generator.toml"))
        );

        let unknown = ResolveError::UnknownReference {
            project: "Game".to_string(),
            reference: "Missing".to_string(),
        };
        let output = unknown.to_diagnostic_in(defs).format(false);
        assert!(output.contains(&format!("--> {}", defs.join("ProjectDefs.json").display())));
    }

    #[test]
    fn test_in_project_is_idempotent() {
        let err = ResolveError::UnclassifiableRole {
            role: ProjectRole::Module,
        }
        .in_project("Inner")
        .in_project("Outer");

        match &err {
            ResolveError::InProject { project, .. } => assert_eq!(project, "Inner"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(err.root(), ResolveError::UnclassifiableRole { .. }));
    }
}
