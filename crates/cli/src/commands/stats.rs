use anyhow::Result;
use ekmelos_core::registry_stats;

use crate::cli::SourceArgs;

pub fn stats(args: &SourceArgs) -> Result<()> {
    let glyphs = args.metadata_dir.join(&args.glyphs);
    let stats = registry_stats(&glyphs)?;

    println!("{}", glyphs.display());
    for (block, count) in &stats.by_block {
        println!("  {:<40} {:>6}  (U+{:04X})", block.name(), count, block.start());
    }
    println!("  {:<40} {:>6}", "Outside known blocks", stats.unclassified);
    println!();
    println!("  SMuFL recommended: {}", stats.recommended());
    println!("  SMuFL optional:    {}", stats.optional());
    println!("  Unicode:           {}", stats.unicode());
    println!("  Accidentals:       {}", stats.accidentals);
    println!("  Total:             {}", stats.total);
    Ok(())
}
