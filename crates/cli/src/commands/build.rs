use anyhow::Result;
use ekmelos_core::{ExportFormat, pipeline};
use log::info;

use crate::cli::BuildArgs;

pub fn build(args: BuildArgs) -> Result<()> {
    let ctx = args.context()?;
    let summary = pipeline::build(&ctx)?;
    info!("Wrote {} files for {} variants", summary.written.len(), summary.variants.len());
    Ok(())
}

/// Print one exported variant to stdout.
pub fn derive(args: BuildArgs, profile: &str, format: ExportFormat) -> Result<()> {
    let ctx = args.context()?;
    let output = pipeline::derive_variant(&ctx, profile, format)?;
    print!("{output}");
    Ok(())
}
