//! `projgen modules` command

use anyhow::{bail, Result};

use crate::cli::ModulesArgs;
use projgen::core::ProjectGraph;
use projgen::resolver::{resolve_all_module_exports, ModuleExportSet};

pub fn execute(args: ModulesArgs) -> Result<()> {
    let graph = ProjectGraph::load(&args.defs_dir.join(ProjectGraph::FILE_NAME))?;
    let exports = resolve_all_module_exports(&graph)?;

    if let Some(exe) = &args.executable {
        let Some(set) = exports.get(exe) else {
            bail!("`{}` is not an executable project", exe);
        };
        print_exports(exe, set);
        return Ok(());
    }

    if exports.is_empty() {
        eprintln!("no executable projects");
    }
    for (exe, set) in &exports {
        print_exports(exe, set);
    }

    Ok(())
}

fn print_exports(exe: &str, set: &ModuleExportSet) {
    println!("{}", exe);
    for module in &set.release_modules {
        println!("  {}", module);
    }
    for module in &set.developer_modules {
        println!("  {} (developer)", module);
    }
}
