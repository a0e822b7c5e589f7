//! `projgen resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use projgen::ops::GeneratorInputs;
use projgen::resolver::resolve;

pub fn execute(args: ResolveArgs) -> Result<()> {
    let inputs = GeneratorInputs::load(&args.defs_dir)?;
    let resolution = resolve(&inputs.graph, &inputs.targets)?;

    println!("{}", serde_json::to_string_pretty(&resolution)?);

    Ok(())
}
