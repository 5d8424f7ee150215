//! Glyph counts per Unicode block.

use std::{collections::BTreeMap, fmt};

use crate::{block::UnicodeBlock, glyph::GlyphEntry};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub total: usize,
    pub accidentals: usize,
    pub by_block: BTreeMap<UnicodeBlock, usize>,
    /// Glyphs outside every expected block.
    pub unclassified: usize,
}

impl RegistryStats {
    pub fn collect<'a>(glyphs: impl IntoIterator<Item = &'a GlyphEntry>) -> Self {
        let mut stats = Self::default();
        for glyph in glyphs {
            stats.total += 1;
            if glyph.is_accidental() {
                stats.accidentals += 1;
            }
            match glyph.block() {
                Some(block) => *stats.by_block.entry(block).or_default() += 1,
                None => stats.unclassified += 1,
            }
        }
        stats
    }

    pub fn count(&self, block: UnicodeBlock) -> usize {
        self.by_block.get(&block).copied().unwrap_or_default()
    }

    pub fn smufl(&self) -> usize {
        self.recommended() + self.optional()
    }

    pub fn recommended(&self) -> usize {
        self.count(UnicodeBlock::SmuflRecommended)
    }

    pub fn optional(&self) -> usize {
        self.count(UnicodeBlock::SmuflOptional)
    }

    /// Glyphs in standard Unicode blocks.
    pub fn unicode(&self) -> usize {
        self.by_block.iter().filter(|(b, _)| !b.is_smufl()).map(|(_, n)| n).sum()
    }
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Glyphs:               {}", self.total)?;
        writeln!(f, "  SMuFL:              {}", self.smufl())?;
        writeln!(f, "    Recommended:      {}", self.recommended())?;
        writeln!(f, "      Accidentals:    {}", self.accidentals)?;
        writeln!(f, "      Other:          {}", self.recommended().saturating_sub(self.accidentals))?;
        writeln!(f, "    Optional:         {}", self.optional())?;
        writeln!(f, "  Unicode:            {}", self.unicode())?;
        for (block, count) in self.by_block.iter().filter(|(b, _)| !b.is_smufl()) {
            writeln!(f, "    {:<36}{count}", format!("{block}:"))?;
        }
        if self.unclassified > 0 {
            writeln!(f, "  Unclassified:       {}", self.unclassified)?;
        }
        Ok(())
    }
}
