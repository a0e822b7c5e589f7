//! The `.sln` solution file.

use crate::core::targets::TargetDefs;
use crate::emit::{project_file_path, project_file_stem, TextBuilder, UTF8_BOM};
use crate::resolver::Resolution;
use crate::util::fs::to_windows_separators;
use crate::util::hash::{identifier_for, upper};

/// Project type of Visual C++ projects.
const VCXPROJ_TYPE: &str = "8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942";
/// Project type of solution folders.
const SOLUTION_FOLDER_TYPE: &str = "2150E333-8FDC-42A3-9474-1A3956D46DE8";
/// Identifier of the "Solution Items" folder.
const SOLUTION_ITEMS_ID: &str = "8EC462FD-D22E-90A8-E5CE-7E832BA40C5D";

/// Render the solution `solution_name` listing every resolved project.
pub fn render_solution(
    solution_name: &str,
    resolution: &Resolution,
    targets: &TargetDefs,
    solution_items: &[String],
) -> Vec<u8> {
    let mut sln = TextBuilder::new();

    sln.blank();
    sln.line("Microsoft Visual Studio Solution File, Format Version 12.00");
    sln.line("# Visual Studio Version 17");
    sln.line("VisualStudioVersion = 17.9.34607.119");
    sln.line("MinimumVisualStudioVersion = 10.0.40219.1");

    for (name, project) in &resolution.projects {
        sln.line(format!(
            "Project(\"{{{}}}\") = \"{}\", \"{}\", \"{{{}}}\"",
            VCXPROJ_TYPE,
            project_file_stem(name),
            to_windows_separators(&project_file_path(name)),
            upper(project.identifier)
        ));

        let dependencies = &project.references.solution_dependencies;
        if !dependencies.is_empty() {
            sln.line("\tProjectSection(ProjectDependencies) = postProject");
            for dependency in dependencies {
                let id = upper(resolution.identifier(dependency));
                sln.line(format!("\t\t{{{}}} = {{{}}}", id, id));
            }
            sln.line("\tEndProjectSection");
        }
        sln.line("EndProject");
    }

    if !solution_items.is_empty() {
        sln.line(format!(
            "Project(\"{{{}}}\") = \"Solution Items\", \"Solution Items\", \"{{{}}}\"",
            SOLUTION_FOLDER_TYPE, SOLUTION_ITEMS_ID
        ));
        sln.line("\tProjectSection(SolutionItems) = preProject");
        for item in solution_items {
            sln.line(format!("\t\t{} = {}", item, item));
        }
        sln.line("\tEndProjectSection");
        sln.line("EndProject");
    }

    sln.line("Global");
    sln.line("\tGlobalSection(SolutionConfigurationPlatforms) = preSolution");
    for config in &targets.configurations {
        for platform in &targets.platforms {
            let pair = format!("{}|{}", config.name, platform.solution_name);
            sln.line(format!("\t\t{} = {}", pair, pair));
        }
    }
    sln.line("\tEndGlobalSection");

    sln.line("\tGlobalSection(ProjectConfigurationPlatforms) = postSolution");
    for project in resolution.projects.values() {
        let id = upper(project.identifier);
        for config in &targets.configurations {
            for platform in &targets.platforms {
                let solution_pair = format!("{}|{}", config.name, platform.solution_name);
                let project_pair = format!("{}|{}", config.name, platform.arch_name);
                sln.line(format!("\t\t{{{}}}.{}.ActiveCfg = {}", id, solution_pair, project_pair));
                sln.line(format!("\t\t{{{}}}.{}.Build.0 = {}", id, solution_pair, project_pair));
            }
        }
    }
    sln.line("\tEndGlobalSection");

    sln.line("\tGlobalSection(SolutionProperties) = preSolution");
    sln.line("\t\tHideSolutionNode = FALSE");
    sln.line("\tEndGlobalSection");
    sln.line("\tGlobalSection(ExtensibilityGlobals) = postSolution");
    sln.line(format!(
        "\t\tHideSolutionNode = {{{}}}",
        upper(identifier_for(solution_name))
    ));
    sln.line("\tEndGlobalSection");
    sln.line("EndGlobal");

    let text = sln.into_string();
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(text.as_bytes());
    bytes
}
