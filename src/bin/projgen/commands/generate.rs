//! `projgen generate` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use projgen::ops::{generate, GenerateOptions};
use projgen::util::diagnostic::emit;

pub fn execute(args: GenerateArgs, color: bool) -> Result<()> {
    let opts = GenerateOptions {
        root: args.root,
        defs_dir: args.defs_dir,
        solution_name: args.solution_name,
        dry_run: args.dry_run,
    };

    let report = generate(&opts)?;

    for warning in &report.warnings {
        emit(warning, color);
    }

    let verb = if report.dry_run { "Would write" } else { "Wrote" };
    for path in &report.files.written {
        eprintln!("{:>12} {}", verb, path.display());
    }

    eprintln!(
        "{:>12} {} projects ({} executables): {} written, {} unchanged",
        "Generated",
        report.projects,
        report.executables,
        report.files.written.len(),
        report.files.unchanged.len()
    );

    Ok(())
}
