//! Generator configuration.
//!
//! Read from `Generator.toml` next to `ProjectDefs.json`. Every section is
//! optional; an absent file yields the built-in setup:
//!
//! - platforms `x86` (Win32) and `x64` (x64);
//! - an abstract `Common` base that sets the `v143` toolset;
//! - `Debug`, which loads modules as loose DLLs and is a developer config;
//! - `Release`, which links every module statically.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::project::ProjectRole;
use crate::core::targets::{TargetConfiguration, TargetDefs, TargetPlatform};

/// projgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Solution platforms, in solution order
    #[serde(rename = "platform")]
    pub platforms: Vec<TargetPlatform>,

    /// All configurations, abstract bases included, in solution order
    #[serde(rename = "configuration")]
    pub configurations: Vec<ConfigurationSpec>,

    pub solution: SolutionConfig,

    pub module_list: ModuleListConfig,
}

/// One `[[configuration]]` entry. Parents are referenced by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationSpec {
    pub name: String,

    #[serde(default)]
    pub inherits: Vec<String>,

    #[serde(default)]
    pub module_role: Option<ProjectRole>,

    #[serde(default)]
    pub linked_module_role: Option<ProjectRole>,

    #[serde(default)]
    pub platform_toolset: Option<String>,

    #[serde(default)]
    pub use_debug_libraries: Option<bool>,

    /// Developer configurations build developer-only modules
    #[serde(default)]
    pub developer: bool,

    /// Abstract configurations are inheritance bases only
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

impl ConfigurationSpec {
    fn new(name: &str) -> Self {
        ConfigurationSpec {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// `[solution]` settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolutionConfig {
    /// Files listed under the "Solution Items" folder
    pub items: Vec<String>,
}

/// `[module_list]` settings: the glue the generated registration file is
/// written against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleListConfig {
    pub glue_header: String,
    pub namespace: String,
    /// Preprocessor condition for static module linking
    pub static_guard: String,
    /// Preprocessor condition for developer builds
    pub debug_guard: String,
    pub symbol_prefix: String,
    pub info_type: String,
    pub list_type: String,
}

impl Default for ModuleListConfig {
    fn default() -> Self {
        ModuleListConfig {
            glue_header: "rkit/Core/ModuleGlue.h".to_string(),
            namespace: "rkit::moduleloader".to_string(),
            static_guard: "RKIT_MODULE_LINKER_TYPE == RKIT_MODULE_LINKER_TYPE_STATIC".to_string(),
            debug_guard: "RKIT_IS_DEBUG != 0".to_string(),
            symbol_prefix: "g_module_".to_string(),
            info_type: "ModuleInfo".to_string(),
            list_type: "ModuleList".to_string(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let common = ConfigurationSpec {
            platform_toolset: Some("v143".to_string()),
            is_abstract: true,
            ..ConfigurationSpec::new("Common")
        };

        let debug = ConfigurationSpec {
            inherits: vec!["Common".to_string()],
            module_role: Some(ProjectRole::LooseDll),
            linked_module_role: Some(ProjectRole::LinkedDll),
            use_debug_libraries: Some(true),
            developer: true,
            ..ConfigurationSpec::new("Debug")
        };

        let release = ConfigurationSpec {
            inherits: vec!["Common".to_string()],
            module_role: Some(ProjectRole::StaticLib),
            linked_module_role: Some(ProjectRole::StaticLib),
            ..ConfigurationSpec::new("Release")
        };

        GeneratorConfig {
            platforms: vec![
                TargetPlatform::new("x86", "Win32"),
                TargetPlatform::new("x64", "x64"),
            ],
            configurations: vec![common, debug, release],
            solution: SolutionConfig::default(),
            module_list: ModuleListConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// File name of the configuration inside the defs directory.
    pub const FILE_NAME: &'static str = "Generator.toml";

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Load `Generator.toml` from `defs_dir`, or the built-in defaults if
    /// there is none. A file that exists but does not parse is an error.
    pub fn load_or_default(defs_dir: &Path) -> Result<Self> {
        let path = defs_dir.join(Self::FILE_NAME);
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(&path)
        } else {
            tracing::debug!("no {} in {}, using defaults", Self::FILE_NAME, defs_dir.display());
            Ok(Self::default())
        }
    }

    /// Link configurations by name into [`TargetDefs`].
    pub fn target_defs(&self) -> Result<TargetDefs> {
        if self.platforms.is_empty() {
            bail!("no platforms configured");
        }

        let mut specs: HashMap<&str, &ConfigurationSpec> = HashMap::new();
        for spec in &self.configurations {
            if specs.insert(spec.name.as_str(), spec).is_some() {
                bail!("configuration `{}` is defined more than once", spec.name);
            }
        }

        let mut linked = HashMap::new();
        let mut configurations = Vec::new();
        for spec in &self.configurations {
            let config = link_configuration(&spec.name, &specs, &mut linked, &mut Vec::new())?;
            if !spec.is_abstract {
                configurations.push(config);
            }
        }

        if configurations.is_empty() {
            bail!("no buildable configurations; every configuration is abstract");
        }

        Ok(TargetDefs {
            platforms: self.platforms.clone(),
            configurations,
        })
    }
}

fn link_configuration<'a>(
    name: &'a str,
    specs: &HashMap<&'a str, &'a ConfigurationSpec>,
    linked: &mut HashMap<&'a str, Arc<TargetConfiguration>>,
    stack: &mut Vec<&'a str>,
) -> Result<Arc<TargetConfiguration>> {
    if let Some(config) = linked.get(name) {
        return Ok(config.clone());
    }

    if stack.contains(&name) {
        stack.push(name);
        bail!("configuration inheritance cycle: {}", stack.join(" -> "));
    }

    let spec = specs
        .get(name)
        .with_context(|| format!("unknown configuration `{}`", name))?;

    stack.push(name);
    let mut config = TargetConfiguration {
        name: spec.name.clone(),
        inherits: Vec::with_capacity(spec.inherits.len()),
        module_role: spec.module_role,
        linked_module_role: spec.linked_module_role,
        platform_toolset: spec.platform_toolset.clone(),
        use_debug_libraries: spec.use_debug_libraries,
        is_developer_config: spec.developer,
    };
    for parent in &spec.inherits {
        let parent = link_configuration(parent, specs, linked, stack)
            .with_context(|| format!("in configuration `{}`", name))?;
        config.inherits.push(parent);
    }
    stack.pop();

    let config = Arc::new(config);
    linked.insert(name, config.clone());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_target_defs() {
        let targets = GeneratorConfig::default().target_defs().unwrap();

        let platforms: Vec<_> = targets
            .platforms
            .iter()
            .map(|p| (p.solution_name.as_str(), p.arch_name.as_str()))
            .collect();
        assert_eq!(platforms, vec![("x86", "Win32"), ("x64", "x64")]);

        let names: Vec<_> = targets.configurations.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Debug", "Release"]);

        let debug = targets.configuration("Debug").unwrap();
        assert!(debug.is_developer_config);
        assert_eq!(debug.resolve_platform_toolset().unwrap(), "v143");
        assert_eq!(debug.resolve_module_role().unwrap(), ProjectRole::LooseDll);

        let release = targets.configuration("Release").unwrap();
        assert!(!release.is_developer_config);
        assert!(!release.resolve_use_debug_libraries());
    }

    #[test]
    fn test_parse_config() {
        let config = GeneratorConfig::from_toml(
            r#"
            [[platform]]
            solution = "x64"
            arch = "x64"

            [[configuration]]
            name = "Base"
            abstract = true
            platform_toolset = "v142"
            module_role = "static_lib"
            linked_module_role = "static_lib"

            [[configuration]]
            name = "Shipping"
            inherits = ["Base"]

            [solution]
            items = ["engine.natvis"]

            [module_list]
            namespace = "engine::modules"
            "#,
        )
        .unwrap();

        assert_eq!(config.solution.items, vec!["engine.natvis"]);
        assert_eq!(config.module_list.namespace, "engine::modules");
        assert_eq!(config.module_list.glue_header, "rkit/Core/ModuleGlue.h");

        let targets = config.target_defs().unwrap();
        assert_eq!(targets.configurations.len(), 1);
        let shipping = &targets.configurations[0];
        assert_eq!(shipping.resolve_platform_toolset().unwrap(), "v142");
        assert_eq!(shipping.resolve_module_role().unwrap(), ProjectRole::StaticLib);
    }

    #[test]
    fn test_shared_parent_is_linked_once() {
        let config = GeneratorConfig::from_toml(
            r#"
            [[platform]]
            solution = "x64"
            arch = "x64"

            [[configuration]]
            name = "Base"
            abstract = true

            [[configuration]]
            name = "A"
            inherits = ["Base"]

            [[configuration]]
            name = "B"
            inherits = ["Base"]
            "#,
        )
        .unwrap();

        let targets = config.target_defs().unwrap();
        assert!(Arc::ptr_eq(
            &targets.configurations[0].inherits[0],
            &targets.configurations[1].inherits[0]
        ));
    }

    #[test]
    fn test_unknown_parent() {
        let config = GeneratorConfig {
            configurations: vec![ConfigurationSpec {
                inherits: vec!["Missing".to_string()],
                ..ConfigurationSpec::new("Debug")
            }],
            ..GeneratorConfig::default()
        };

        let err = config.target_defs().unwrap_err();
        assert!(format!("{:#}", err).contains("unknown configuration `Missing`"));
    }

    #[test]
    fn test_inheritance_cycle() {
        let config = GeneratorConfig {
            configurations: vec![
                ConfigurationSpec {
                    inherits: vec!["B".to_string()],
                    ..ConfigurationSpec::new("A")
                },
                ConfigurationSpec {
                    inherits: vec!["A".to_string()],
                    ..ConfigurationSpec::new("B")
                },
            ],
            ..GeneratorConfig::default()
        };

        let err = config.target_defs().unwrap_err();
        assert!(format!("{:#}", err).contains("A -> B -> A"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(GeneratorConfig::from_toml("[solution]\nfolders = []\n").is_err());
    }

    #[test]
    fn test_load_or_default() {
        let tmp = TempDir::new().unwrap();
        let config = GeneratorConfig::load_or_default(tmp.path()).unwrap();
        assert_eq!(config.configurations.len(), 3);

        std::fs::write(tmp.path().join(GeneratorConfig::FILE_NAME), "not = [valid").unwrap();
        assert!(GeneratorConfig::load_or_default(tmp.path()).is_err());
    }
}
