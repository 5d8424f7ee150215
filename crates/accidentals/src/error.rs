//! Error types for accidental catalogs and tuning profiles.

use std::result;

use ekmelos_glyph_registry::GlyphName;

use crate::{alteration::Alteration, catalog::Realization};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed metadata: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid alteration '{0}'")]
    InvalidAlteration(String),

    #[error("accidental {0} has no glyphs")]
    EmptyRealization(Alteration),

    #[error("accidental {alteration} references undefined glyph '{glyph}'")]
    DanglingReference { alteration: Alteration, glyph: GlyphName },

    #[error("alteration {alteration} is realized both as {existing} and as {conflicting}")]
    ConflictingDefinition { alteration: Alteration, existing: Realization, conflicting: Realization },

    #[error("unsupported EDO denominator {0} (expected 12, 24 or 72)")]
    UnsupportedDenominator(u32),

    #[error("profile '{profile}': {value} is not a multiple of 1/{denominator}")]
    NotInTuning { profile: String, value: Alteration, denominator: u32 },

    #[error("profile '{profile}': range {min}..{max} spans more than {limit} multiples of 1/{denominator}")]
    RangeTooWide { profile: String, min: Alteration, max: Alteration, denominator: u32, limit: usize },

    #[error("profile '{0}' requires no alteration values")]
    EmptyProfile(String),

    #[error("duplicate profile '{0}'")]
    DuplicateProfile(String),
}

impl Error {
    /// Schema errors are everything that is neither a dangling reference
    /// nor a conflicting definition.
    pub fn is_schema(&self) -> bool {
        !matches!(self, Self::DanglingReference { .. } | Self::ConflictingDefinition { .. })
    }
}

pub type Result<T> = result::Result<T, Error>;
