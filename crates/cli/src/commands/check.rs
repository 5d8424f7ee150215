use anyhow::{Result, bail};
use ekmelos_core::pipeline;

use crate::cli::SourceArgs;

pub fn check(args: &SourceArgs) -> Result<()> {
    let sources = args.sources()?;
    let report = pipeline::check(&sources)?;

    println!("{report}");
    if report.has_errors() {
        bail!("Metadata check failed with {} error(s)", report.error_count());
    }
    println!("✓ {} is consistent", args.metadata_dir.display());
    Ok(())
}
