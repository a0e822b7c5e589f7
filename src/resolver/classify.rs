//! Project-type classification.
//!
//! Maps abstract roles to concrete ones per configuration, decides which
//! concrete roles can be linked against, and picks the IDE configuration
//! type for each concrete role.

use serde::Serialize;

use crate::core::project::ProjectRole;
use crate::core::targets::TargetConfiguration;
use crate::resolver::errors::ResolveError;

/// The concrete role of a project under `config`.
///
/// Only `Module` and `LinkedModule` vary by configuration; every other role
/// is returned unchanged.
pub fn concrete_role(
    role: ProjectRole,
    config: &TargetConfiguration,
) -> Result<ProjectRole, ResolveError> {
    match role {
        ProjectRole::Module => config.resolve_module_role(),
        ProjectRole::LinkedModule => config.resolve_linked_module_role(),
        other => Ok(other),
    }
}

/// Whether a project of this role is linker input for its dependents.
pub fn is_valid_reference(role: ProjectRole) -> bool {
    matches!(
        role,
        ProjectRole::StaticLib
            | ProjectRole::LinkedModule
            | ProjectRole::LinkedDll
            | ProjectRole::AlwaysLinkedDll
    )
}

/// Whether a reference to a project of this role orders the solution build.
///
/// These edges are independent of link validity: a loose plugin still has
/// to be built before the executable that loads it.
pub fn is_solution_dependency(role: ProjectRole) -> bool {
    matches!(
        role,
        ProjectRole::Module | ProjectRole::Executable | ProjectRole::NeverLinkedDll
    )
}

/// Visual Studio `ConfigurationType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConfigurationType {
    Application,
    DynamicLibrary,
    StaticLibrary,
}

impl ConfigurationType {
    /// Classify a concrete role. Abstract roles have no configuration type.
    pub fn for_role(role: ProjectRole) -> Result<Self, ResolveError> {
        match role {
            ProjectRole::LooseDll
            | ProjectRole::LinkedDll
            | ProjectRole::AlwaysLinkedDll
            | ProjectRole::NeverLinkedDll => Ok(ConfigurationType::DynamicLibrary),
            ProjectRole::StaticLib => Ok(ConfigurationType::StaticLibrary),
            ProjectRole::Executable => Ok(ConfigurationType::Application),
            ProjectRole::Module | ProjectRole::LinkedModule => {
                Err(ResolveError::UnclassifiableRole { role })
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigurationType::Application => "Application",
            ConfigurationType::DynamicLibrary => "DynamicLibrary",
            ConfigurationType::StaticLibrary => "StaticLibrary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::default_targets;

    #[test]
    fn test_concrete_role_per_configuration() {
        let targets = default_targets();
        let debug = targets.configuration("Debug").unwrap();
        let release = targets.configuration("Release").unwrap();

        assert_eq!(concrete_role(ProjectRole::Module, debug).unwrap(), ProjectRole::LooseDll);
        assert_eq!(concrete_role(ProjectRole::Module, release).unwrap(), ProjectRole::StaticLib);
        assert_eq!(
            concrete_role(ProjectRole::LinkedModule, debug).unwrap(),
            ProjectRole::LinkedDll
        );
        assert_eq!(
            concrete_role(ProjectRole::LinkedModule, release).unwrap(),
            ProjectRole::StaticLib
        );
    }

    #[test]
    fn test_fixed_roles_are_configuration_invariant() {
        let targets = default_targets();
        for config in &targets.configurations {
            for role in [
                ProjectRole::StaticLib,
                ProjectRole::Executable,
                ProjectRole::AlwaysLinkedDll,
                ProjectRole::NeverLinkedDll,
            ] {
                assert_eq!(concrete_role(role, config).unwrap(), role);
            }
        }
    }

    #[test]
    fn test_module_without_mapping_fails() {
        let bare = TargetConfiguration::new("Bare");
        let err = concrete_role(ProjectRole::Module, &bare).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnresolvedProperty {
                property: "module_role",
                ..
            }
        ));
    }

    #[test]
    fn test_reference_validity() {
        assert!(is_valid_reference(ProjectRole::StaticLib));
        assert!(is_valid_reference(ProjectRole::LinkedModule));
        assert!(is_valid_reference(ProjectRole::LinkedDll));
        assert!(is_valid_reference(ProjectRole::AlwaysLinkedDll));

        assert!(!is_valid_reference(ProjectRole::LooseDll));
        assert!(!is_valid_reference(ProjectRole::NeverLinkedDll));
        assert!(!is_valid_reference(ProjectRole::Executable));
        assert!(!is_valid_reference(ProjectRole::Module));
    }

    #[test]
    fn test_configuration_types() {
        assert_eq!(
            ConfigurationType::for_role(ProjectRole::LooseDll).unwrap(),
            ConfigurationType::DynamicLibrary
        );
        assert_eq!(
            ConfigurationType::for_role(ProjectRole::StaticLib).unwrap().as_str(),
            "StaticLibrary"
        );
        assert_eq!(
            ConfigurationType::for_role(ProjectRole::Executable).unwrap().as_str(),
            "Application"
        );
        assert!(ConfigurationType::for_role(ProjectRole::Module).is_err());
        assert!(ConfigurationType::for_role(ProjectRole::LinkedModule).is_err());
    }
}
