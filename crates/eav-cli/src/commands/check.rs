//! Check command
//!
//! Usage: eav check <CONFIG>

use clap::Args;
use eav_core::FamilyLookup;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Model configuration file (YAML, or JSON with a .json extension)
    pub config: PathBuf,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let model = super::load_model("check", &args.config, None)?;

    let families = model.families.families();
    let instantiable = families
        .iter()
        .filter(|family| family.is_instantiable() && !family.is_singleton())
        .count();

    println!(
        "✓ Model OK: {} families ({} instantiable), {} global attributes",
        families.len(),
        instantiable,
        model.attributes.attributes().len()
    );
    Ok(())
}
