//! Tree command
//!
//! Usage: eav tree <CONFIG>

use clap::Args;
use eav_core::FamilyDefinition;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Model configuration file
    pub config: PathBuf,
}

/// Execute tree command
pub fn execute(args: TreeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let model = super::load_model("tree", &args.config, None)?;

    let mut out = String::new();
    for root in model.root_families() {
        render(&root, 0, &mut out);
    }
    print!("{}", out);
    Ok(())
}

fn render(family: &FamilyDefinition, depth: usize, out: &mut String) {
    let mut flags = Vec::new();
    if !family.is_instantiable() {
        flags.push("abstract");
    }
    if family.is_singleton() {
        flags.push("singleton");
    }

    out.push_str(&"  ".repeat(depth));
    out.push_str(family.code());
    if !flags.is_empty() {
        out.push_str(&format!(" [{}]", flags.join(", ")));
    }
    out.push('\n');

    for child in family.children() {
        render(&child, depth + 1, out);
    }
}
