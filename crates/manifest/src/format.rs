use std::{fmt, str::FromStr};

use crate::error::Error;

/// Output flavours of one variant manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportFormat {
    /// Canonical JSON manifest for the font build.
    Manifest,
    /// SMuFL `glyphnames.json`.
    GlyphNames,
    /// Scheme alist of glyph names for LilyPond.
    LilyPond,
    /// Class tag to member glyph names.
    Classes,
    /// SMuFL font metadata: alternates, ligatures and optional glyphs.
    FontMetadata,
}

impl ExportFormat {
    pub const ALL: [Self; 5] = [Self::Manifest, Self::GlyphNames, Self::LilyPond, Self::Classes, Self::FontMetadata];

    pub fn name(self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::GlyphNames => "glyphnames",
            Self::LilyPond => "lilypond",
            Self::Classes => "classes",
            Self::FontMetadata => "metadata",
        }
    }

    /// File name of this output inside a variant's directory.
    pub fn file_name(self, font_name: &str) -> String {
        match self {
            Self::Manifest => "manifest.json".to_string(),
            Self::GlyphNames => "glyphnames.json".to_string(),
            Self::LilyPond => format!("{}-map.ily", slug(font_name)),
            Self::Classes => "classes.json".to_string(),
            Self::FontMetadata => format!("{}.json", slug(font_name)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manifest" | "json" => Ok(Self::Manifest),
            "glyphnames" => Ok(Self::GlyphNames),
            "lilypond" | "ily" => Ok(Self::LilyPond),
            "classes" => Ok(Self::Classes),
            "metadata" | "fontmetadata" => Ok(Self::FontMetadata),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed to `-`.
pub fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("LilyPond".parse::<ExportFormat>().unwrap(), ExportFormat::LilyPond);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Manifest);
        assert_eq!("classes".parse::<ExportFormat>().unwrap(), ExportFormat::Classes);
        assert_eq!(" Metadata ".parse::<ExportFormat>().unwrap(), ExportFormat::FontMetadata);
        assert!("otf".parse::<ExportFormat>().is_err());
        for format in ExportFormat::ALL {
            assert_eq!(format.name().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ExportFormat::Manifest.file_name("Ekmelos 24-EDO"), "manifest.json");
        assert_eq!(ExportFormat::LilyPond.file_name("Ekmelos 24-EDO"), "ekmelos-24-edo-map.ily");
        assert_eq!(ExportFormat::LilyPond.file_name("Ekmelos 72 (HEJI)"), "ekmelos-72-heji-map.ily");
        assert_eq!(ExportFormat::Classes.file_name("Ekmelos 24-EDO"), "classes.json");
        assert_eq!(ExportFormat::FontMetadata.file_name("Ekmelos"), "ekmelos.json");
        assert_eq!(ExportFormat::FontMetadata.file_name("Ekmelos 24-EDO"), "ekmelos-24-edo.json");
    }
}
