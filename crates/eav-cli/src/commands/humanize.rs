//! Humanize command
//!
//! Usage: eav humanize <CODE>...

use clap::Args;

#[derive(Debug, Args)]
pub struct HumanizeArgs {
    /// Codes to humanize
    #[arg(required = true)]
    pub codes: Vec<String>,
}

/// Execute humanize command
pub fn execute(args: HumanizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    for code in &args.codes {
        println!("{}", eav_core::humanize(code));
    }
    Ok(())
}
