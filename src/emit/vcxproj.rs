//! `.vcxproj` project files.

use std::path::Path;

use crate::core::project::{FileType, ProjectRole};
use crate::core::targets::TargetDefs;
use crate::emit::project_file_path;
use crate::emit::xml::{render_document, Element, MSBUILD_NAMESPACE};
use crate::resolver::{Resolution, ResolvedConfiguration, ResolvedProject};
use crate::sources::ResolvedFile;
use crate::util::fs::artifact_relative_path;
use crate::util::hash::braced_lower;

const USER_PROPS: &str = r"$(UserRootDir)\Microsoft.Cpp.$(Platform).user.props";

fn config_platform_condition(configuration: &str, arch: &str) -> String {
    format!("'$(Configuration)|$(Platform)'=='{}|{}'", configuration, arch)
}

fn import(project: &str) -> Element {
    Element::new("Import").attr("Project", project)
}

/// `RootNamespace` value: the project name without underscores.
pub fn root_namespace(name: &str) -> String {
    name.replace('_', "")
}

/// Render the project file of `name`.
pub fn render_project(
    name: &str,
    project: &ResolvedProject,
    files: &[ResolvedFile],
    targets: &TargetDefs,
    resolution: &Resolution,
) -> Vec<u8> {
    let project_dir = Path::new(name);

    let mut root = Element::new("Project")
        .attr("DefaultTargets", "Build")
        .attr("xmlns", MSBUILD_NAMESPACE);

    root.push(project_configurations(project, targets));
    root.push(globals(name, project));
    root.push(import(r"$(VCTargetsPath)\Microsoft.Cpp.Default.props"));

    for platform in &targets.platforms {
        for config in &project.configurations {
            root.push(configuration_properties(config, &platform.arch_name));
        }
    }

    root.push(import(r"$(VCTargetsPath)\Microsoft.Cpp.props"));

    for platform in &targets.platforms {
        for config in &project.configurations {
            root.push(property_sheet_imports(project_dir, config, &platform.arch_name));
        }
    }

    for group in file_groups(project_dir, files) {
        root.push(group);
    }

    for group in reference_groups(project_dir, project, resolution) {
        root.push(group);
    }

    root.push(import(r"$(VCTargetsPath)\Microsoft.Cpp.targets"));

    render_document(&root)
}

fn project_configurations(project: &ResolvedProject, targets: &TargetDefs) -> Element {
    let mut group = Element::new("ItemGroup").attr("Label", "ProjectConfigurations");
    for platform in &targets.platforms {
        for config in &project.configurations {
            let mut entry = Element::new("ProjectConfiguration").attr(
                "Include",
                format!("{}|{}", config.configuration, platform.arch_name),
            );
            entry.push_key("Configuration", &config.configuration);
            entry.push_key("Platform", &platform.arch_name);
            group.push(entry);
        }
    }
    group
}

fn globals(name: &str, project: &ResolvedProject) -> Element {
    let mut group = Element::new("PropertyGroup").attr("Label", "Globals");
    group.push_key("VCProjectVersion", "17.0");
    group.push_key("Keyword", "Win32Proj");
    group.push_key("ProjectGuid", braced_lower(project.identifier));
    group.push_key("RootNamespace", root_namespace(name));
    group.push_key("WindowsTargetPlatformVersion", "10.0");
    group
}

fn configuration_properties(config: &ResolvedConfiguration, arch: &str) -> Element {
    let mut group = Element::new("PropertyGroup")
        .attr("Condition", config_platform_condition(&config.configuration, arch))
        .attr("Label", "Configuration");

    group.push_key("ConfigurationType", config.configuration_type.as_str());
    group.push_key(
        "UseDebugLibraries",
        if config.use_debug_libraries { "true" } else { "false" },
    );
    group.push_key("PlatformToolset", &config.platform_toolset);
    group.push_key("CharacterSet", "Unicode");

    if config.role == ProjectRole::Executable {
        group.push_key("CopyLocalDeploymentContent", "true");
    }
    group
}

fn property_sheet_imports(project_dir: &Path, config: &ResolvedConfiguration, arch: &str) -> Element {
    let mut group = Element::new("ImportGroup")
        .attr("Label", "PropertySheets")
        .attr("Condition", config_platform_condition(&config.configuration, arch));

    group.push(
        import(USER_PROPS)
            .attr("Condition", format!("exists('{}')", USER_PROPS))
            .attr("Label", "LocalAppDataPlatform"),
    );

    for sheet in &config.property_sheets {
        let path = artifact_relative_path(project_dir, Path::new(&format!("{}.props", sheet)));
        group.push(import(&path));
    }
    group
}

fn file_groups(project_dir: &Path, files: &[ResolvedFile]) -> Vec<Element> {
    let mut compile = Element::new("ItemGroup");
    let mut include = Element::new("ItemGroup");
    let mut none = Element::new("ItemGroup");

    for file in files {
        let path = artifact_relative_path(project_dir, &file.path);
        match file.file_type {
            FileType::Source => compile.push(Element::new("ClCompile").attr("Include", path)),
            FileType::Include => include.push(Element::new("ClInclude").attr("Include", path)),
            FileType::Content => none.push(
                Element::new("None")
                    .attr("Include", path)
                    .with_child(Element::new("DeploymentContent").text("true")),
            ),
            FileType::Misc => none.push(Element::new("None").attr("Include", path)),
            FileType::Resource | FileType::Auto => {}
        }
    }

    [compile, include, none]
        .into_iter()
        .filter(|group| !group.is_empty())
        .collect()
}

fn reference_groups(
    project_dir: &Path,
    project: &ResolvedProject,
    resolution: &Resolution,
) -> Vec<Element> {
    let mut groups = Vec::new();

    if !project.references.unconditional.is_empty() {
        let mut group = Element::new("ItemGroup");
        push_references(&mut group, project_dir, &project.references.unconditional, resolution);
        groups.push(group);
    }

    for conditional in &project.references.conditional {
        if conditional.references.is_empty() {
            continue;
        }
        let mut group = Element::new("ItemGroup").attr(
            "Condition",
            format!("'$(Configuration)'=='{}'", conditional.configuration),
        );
        push_references(&mut group, project_dir, &conditional.references, resolution);
        groups.push(group);
    }

    groups
}

fn push_references(group: &mut Element, project_dir: &Path, references: &[String], resolution: &Resolution) {
    for reference in references {
        let path = artifact_relative_path(project_dir, &project_file_path(reference));
        group.push(
            Element::new("ProjectReference")
                .attr("Include", path)
                .with_child(
                    Element::new("Project").text(braced_lower(resolution.identifier(reference))),
                ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::test_support::{default_targets, GraphBuilder};
    use crate::util::hash::identifier_for;
    use std::path::PathBuf;

    fn source(path: &str, file_type: FileType) -> ResolvedFile {
        ResolvedFile {
            path: PathBuf::from(path),
            filter_path: PathBuf::from(Path::new(path).file_name().unwrap()),
            file_type,
        }
    }

    fn render(name: &str, files: &[ResolvedFile]) -> String {
        let graph = GraphBuilder::new()
            .exe("Game", &["Core", "Render", "Tools", "Shader"])
            .lib("Core", &[])
            .module("Render", &["Core"])
            .linked_module("Tools", &[])
            .never_linked_dll("Shader")
            .with_property_sheets("Game", &["warnings"])
            .build();
        let targets = default_targets();
        let resolution = resolve(&graph, &targets).unwrap();

        let bytes = render_project(name, resolution.project(name).unwrap(), files, &targets, &resolution);
        String::from_utf8(bytes[3..].to_vec()).unwrap()
    }

    #[test]
    fn test_globals() {
        let text = render("Game", &[]);
        let guid = format!("<ProjectGuid>{{{}}}</ProjectGuid>", identifier_for("Game"));
        assert!(text.contains(&guid));
        assert!(text.contains("<RootNamespace>Game</RootNamespace>"));
        assert!(text.contains("<VCProjectVersion>17.0</VCProjectVersion>"));
        assert_eq!(root_namespace("render_vk"), "rendervk");
    }

    #[test]
    fn test_configuration_matrix() {
        let text = render("Render", &[]);

        let entries: Vec<_> = text
            .lines()
            .filter(|l| l.contains("<ProjectConfiguration "))
            .map(str::trim)
            .collect();
        assert_eq!(
            entries,
            vec![
                "<ProjectConfiguration Include=\"Debug|Win32\">",
                "<ProjectConfiguration Include=\"Release|Win32\">",
                "<ProjectConfiguration Include=\"Debug|x64\">",
                "<ProjectConfiguration Include=\"Release|x64\">",
            ]
        );

        let types: Vec<_> = text
            .lines()
            .filter(|l| l.contains("<ConfigurationType>"))
            .map(str::trim)
            .collect();
        assert_eq!(
            types,
            vec![
                "<ConfigurationType>DynamicLibrary</ConfigurationType>",
                "<ConfigurationType>StaticLibrary</ConfigurationType>",
                "<ConfigurationType>DynamicLibrary</ConfigurationType>",
                "<ConfigurationType>StaticLibrary</ConfigurationType>",
            ]
        );
        assert!(!text.contains("CopyLocalDeploymentContent"));
    }

    #[test]
    fn test_executable_copies_deployment_content() {
        let text = render("Game", &[]);
        assert_eq!(text.matches("<CopyLocalDeploymentContent>true</CopyLocalDeploymentContent>").count(), 4);
    }

    #[test]
    fn test_property_sheets() {
        let text = render("Game", &[]);
        assert!(text.contains(
            "<ImportGroup Label=\"PropertySheets\" Condition=\"'$(Configuration)|$(Platform)'=='Debug|Win32'\">"
        ));
        assert!(text.contains("<Import Project=\"..\\Common.props\" />"));
        assert!(text.contains("<Import Project=\"..\\Debug.props\" />"));
        assert!(text.contains("<Import Project=\"..\\warnings.props\" />"));
    }

    #[test]
    fn test_files() {
        let text = render(
            "Game",
            &[
                source("Game/main.cpp", FileType::Source),
                source("Game/main.h", FileType::Include),
                source("data/level.json", FileType::Content),
                source("docs/notes.txt", FileType::Misc),
            ],
        );
        assert!(text.contains("<ClCompile Include=\"main.cpp\" />"));
        assert!(text.contains("<ClInclude Include=\"main.h\" />"));
        assert!(text.contains(
            "<None Include=\"..\\data\\level.json\">\r\n      <DeploymentContent>true</DeploymentContent>\r\n    </None>"
        ));
        assert!(text.contains("<None Include=\"..\\docs\\notes.txt\" />"));
    }

    #[test]
    fn test_empty_file_groups_are_omitted() {
        let text = render("Core", &[source("Core/core.h", FileType::Include)]);
        assert!(!text.contains("ClCompile"));
        assert!(!text.contains("<None"));
    }

    #[test]
    fn test_references() {
        let text = render("Game", &[]);

        let core = format!(
            "<ProjectReference Include=\"..\\Core\\Core.vcxproj\">\r\n      <Project>{{{}}}</Project>",
            identifier_for("Core")
        );
        assert!(text.contains(&core));
        assert!(text.contains("..\\Tools\\Tools.vcxproj"));
        assert!(!text.contains("Shader.vcxproj"));

        // Render is a loose DLL in Debug, so only Release links it.
        assert!(!text.contains("'$(Configuration)'=='Debug'"));
        let release = text
            .split("<ItemGroup Condition=\"'$(Configuration)'=='Release'\">")
            .nth(1)
            .unwrap();
        assert!(release.trim_start().starts_with("<ProjectReference Include=\"..\\Render\\Render.vcxproj\">"));
    }

    #[test]
    fn test_project_without_references_has_no_reference_groups() {
        let text = render("Core", &[]);
        assert!(!text.contains("ProjectReference"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let files = [source("Game/main.cpp", FileType::Source)];
        assert_eq!(render("Game", &files), render("Game", &files));
    }
}
