//! Unicode block classification of glyph codepoints.

use std::fmt;

use crate::types::Codepoint;

/// Unicode blocks a glyph of the font family is expected to live in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnicodeBlock {
    /// SMuFL recommended characters (U+E000-U+F3FF).
    SmuflRecommended,
    /// SMuFL optional glyphs (U+F400-U+F8FF).
    SmuflOptional,
    BasicLatin,
    Latin1Supplement,
    GeneralPunctuation,
    Arrows,
    MathematicalOperators,
    MiscellaneousTechnical,
    BlockElements,
    GeometricShapes,
    MiscellaneousSymbols,
    Dingbats,
    SupplementalArrowsA,
    SupplementalArrowsB,
    MiscellaneousSymbolsAndArrows,
    MusicalSymbols,
    MiscellaneousSymbolsAndPictographs,
    GeometricShapesExtended,
    SupplementalArrowsC,
    SupplementalSymbolsAndPictographs,
    SymbolsAndPictographsExtendedA,
}

/// Inclusive codepoint ranges for each block.
///
/// Supplemental Symbols and Pictographs stops at U+1F946: the font only
/// covers its leading musical part.
pub const BLOCK_RANGES: &[(u32, u32, UnicodeBlock)] = &[
    (0x0020, 0x007F, UnicodeBlock::BasicLatin),
    (0x00A0, 0x00FF, UnicodeBlock::Latin1Supplement),
    (0x2000, 0x206F, UnicodeBlock::GeneralPunctuation),
    (0x2190, 0x21FF, UnicodeBlock::Arrows),
    (0x2200, 0x22FF, UnicodeBlock::MathematicalOperators),
    (0x2300, 0x23FF, UnicodeBlock::MiscellaneousTechnical),
    (0x2580, 0x259F, UnicodeBlock::BlockElements),
    (0x25A0, 0x25FF, UnicodeBlock::GeometricShapes),
    (0x2600, 0x26FF, UnicodeBlock::MiscellaneousSymbols),
    (0x2700, 0x27BF, UnicodeBlock::Dingbats),
    (0x27F0, 0x27FF, UnicodeBlock::SupplementalArrowsA),
    (0x2900, 0x297F, UnicodeBlock::SupplementalArrowsB),
    (0x2B00, 0x2BFF, UnicodeBlock::MiscellaneousSymbolsAndArrows),
    (0xE000, 0xF3FF, UnicodeBlock::SmuflRecommended),
    (0xF400, 0xF8FF, UnicodeBlock::SmuflOptional),
    (0x1D100, 0x1D1FF, UnicodeBlock::MusicalSymbols),
    (0x1F300, 0x1F5FF, UnicodeBlock::MiscellaneousSymbolsAndPictographs),
    (0x1F780, 0x1F7FF, UnicodeBlock::GeometricShapesExtended),
    (0x1F800, 0x1F8FF, UnicodeBlock::SupplementalArrowsC),
    (0x1F900, 0x1F946, UnicodeBlock::SupplementalSymbolsAndPictographs),
    (0x1FA70, 0x1FAFF, UnicodeBlock::SymbolsAndPictographsExtendedA),
];

impl UnicodeBlock {
    /// Find the block containing `cp`, if any.
    pub fn of(cp: Codepoint) -> Option<Self> {
        let cp = cp.to_u32();
        BLOCK_RANGES
            .iter()
            .find(|(start, end, _)| (*start..=*end).contains(&cp))
            .map(|(_, _, block)| *block)
    }

    /// First codepoint of the block, used as its short label (`E000`, `1D100`).
    pub fn start(self) -> u32 {
        BLOCK_RANGES
            .iter()
            .find(|(_, _, block)| *block == self)
            .map(|(start, _, _)| *start)
            .unwrap_or_default()
    }

    pub fn is_smufl(self) -> bool {
        matches!(self, Self::SmuflRecommended | Self::SmuflOptional)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SmuflRecommended => "SMuFL Recommended",
            Self::SmuflOptional => "SMuFL Optional",
            Self::BasicLatin => "Basic Latin",
            Self::Latin1Supplement => "Latin-1 Supplement",
            Self::GeneralPunctuation => "General Punctuation",
            Self::Arrows => "Arrows",
            Self::MathematicalOperators => "Mathematical Operators",
            Self::MiscellaneousTechnical => "Miscellaneous Technical",
            Self::BlockElements => "Block Elements",
            Self::GeometricShapes => "Geometric Shapes",
            Self::MiscellaneousSymbols => "Miscellaneous Symbols",
            Self::Dingbats => "Dingbats",
            Self::SupplementalArrowsA => "Supplemental Arrows-A",
            Self::SupplementalArrowsB => "Supplemental Arrows-B",
            Self::MiscellaneousSymbolsAndArrows => "Miscellaneous Symbols and Arrows",
            Self::MusicalSymbols => "Musical Symbols",
            Self::MiscellaneousSymbolsAndPictographs => "Miscellaneous Symbols and Pictographs",
            Self::GeometricShapesExtended => "Geometric Shapes Extended",
            Self::SupplementalArrowsC => "Supplemental Arrows-C",
            Self::SupplementalSymbolsAndPictographs => "Supplemental Symbols and Pictographs",
            Self::SymbolsAndPictographsExtendedA => "Symbols and Pictographs Extended-A",
        }
    }
}

impl fmt::Display for UnicodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
