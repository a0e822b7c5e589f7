//! Implementation of `projgen generate`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::core::project::ProjectGraph;
use crate::core::targets::TargetDefs;
use crate::emit::{
    filters_file_path, generated_module_list_path, project_file_path, render_filters,
    render_module_list, render_project, render_solution, solution_file_path, FlushReport,
    OutputFiles,
};
use crate::resolver::{resolve, Resolution};
use crate::sources::{collect_project_files, ResolvedFile};
use crate::util::config::GeneratorConfig;
use crate::util::diagnostic::Diagnostic;

/// Options for generating a solution.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Root the projects live under and artifacts are written to
    pub root: PathBuf,

    /// Directory holding `ProjectDefs.json` and, optionally, `Generator.toml`
    pub defs_dir: PathBuf,

    /// Solution file name, without extension
    pub solution_name: String,

    /// Render everything but write nothing
    pub dry_run: bool,
}

/// Everything read from the definitions directory.
#[derive(Debug, Clone)]
pub struct GeneratorInputs {
    pub graph: ProjectGraph,
    pub config: GeneratorConfig,
    pub targets: TargetDefs,
}

impl GeneratorInputs {
    /// Load the project graph and generator configuration from `defs_dir`.
    pub fn load(defs_dir: &Path) -> Result<Self> {
        if !defs_dir.is_dir() {
            bail!("definitions directory not found: {}", defs_dir.display());
        }

        let graph = ProjectGraph::load(&defs_dir.join(ProjectGraph::FILE_NAME))?;
        let config = GeneratorConfig::load_or_default(defs_dir)?;
        let targets = config.target_defs().with_context(|| {
            format!(
                "invalid target configuration in {}",
                defs_dir.join(GeneratorConfig::FILE_NAME).display()
            )
        })?;

        Ok(GeneratorInputs {
            graph,
            config,
            targets,
        })
    }
}

/// Result of a generate run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub projects: usize,
    pub executables: usize,
    pub files: FlushReport,
    pub dry_run: bool,
    /// Suspicious but valid input
    pub warnings: Vec<Diagnostic>,
}

/// Load, resolve, render and flush.
pub fn generate(opts: &GenerateOptions) -> Result<GenerateReport> {
    if !opts.root.is_dir() {
        bail!("root directory not found: {}", opts.root.display());
    }
    if opts.solution_name.trim().is_empty() {
        bail!("solution name must not be empty");
    }

    let inputs = GeneratorInputs::load(&opts.defs_dir)?;
    let resolution = resolve(&inputs.graph, &inputs.targets)?;

    let warnings = module_warnings(&opts.defs_dir, &resolution);

    let outputs = render_all(&opts.root, &opts.solution_name, &inputs, &resolution)?;

    let files = if opts.dry_run {
        outputs.compare(&opts.root)?
    } else {
        outputs.flush(&opts.root)?
    };

    tracing::info!(
        "{} projects, {} written, {} unchanged",
        inputs.graph.len(),
        files.written.len(),
        files.unchanged.len()
    );

    Ok(GenerateReport {
        projects: inputs.graph.len(),
        executables: resolution.module_exports.len(),
        files,
        dry_run: opts.dry_run,
        warnings,
    })
}

/// One warning per executable that registers no modules.
fn module_warnings(defs_dir: &Path, resolution: &Resolution) -> Vec<Diagnostic> {
    resolution
        .module_exports
        .iter()
        .filter(|(_, exports)| exports.is_empty())
        .map(|(exe, _)| {
            tracing::debug!("executable `{}` registers no modules", exe);
            Diagnostic::warning(format!("executable `{}` registers no modules", exe))
                .with_location(defs_dir.join(ProjectGraph::FILE_NAME))
                .with_context("its module list is generated empty")
                .with_suggestion(format!("Add a `module` project to the `refs` of `{}`", exe))
        })
        .collect()
}

/// Render every artifact of a resolved graph into memory.
pub fn render_all(
    root: &Path,
    solution_name: &str,
    inputs: &GeneratorInputs,
    resolution: &Resolution,
) -> Result<OutputFiles> {
    let projects: Vec<_> = inputs.graph.iter().collect();

    let project_files: Vec<(&str, Vec<ResolvedFile>)> = projects
        .par_iter()
        .map(|(name, def)| {
            collect_project_files(root, name, def)
                .with_context(|| format!("failed to collect files of project `{}`", name))
                .map(|files| (*name, files))
        })
        .collect::<Result<_>>()?;

    let mut outputs = OutputFiles::new();

    for (name, files) in &project_files {
        let project = resolution
            .project(name)
            .with_context(|| format!("project `{}` was not resolved", name))?;

        outputs.insert(
            project_file_path(name),
            render_project(name, project, files, &inputs.targets, resolution),
        );
        outputs.insert(filters_file_path(name), render_filters(name, files));
    }

    for (exe, exports) in &resolution.module_exports {
        outputs.insert(
            generated_module_list_path(exe),
            render_module_list(exports, &inputs.config.module_list),
        );
    }

    outputs.insert(
        solution_file_path(solution_name),
        render_solution(
            solution_name,
            resolution,
            &inputs.targets,
            &inputs.config.solution.items,
        ),
    );

    Ok(outputs)
}
