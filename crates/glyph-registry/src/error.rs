//! Error types for glyph catalog loading.

use std::{fmt, result};

use crate::types::{ClassTag, Codepoint, GlyphName};

/// What a dangling reference was supposed to point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Alternate,
    LigatureComponent,
    ClassMember,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alternate => "alternate",
            Self::LigatureComponent => "ligature component",
            Self::ClassMember => "class member",
        })
    }
}

/// Errors that can occur while loading the master glyph catalog.
///
/// Every variant except [`Error::DanglingReference`] is a schema error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed glyph catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("glyph #{0} has an empty name")]
    EmptyName(usize),

    #[error("duplicate glyph name '{0}'")]
    DuplicateName(GlyphName),

    #[error("codepoint {codepoint} is assigned to both '{first}' and '{second}'")]
    DuplicateCodepoint { codepoint: Codepoint, first: GlyphName, second: GlyphName },

    #[error("'{glyph}' has codepoint {codepoint}, which is not a Unicode scalar value")]
    InvalidCodepoint { glyph: GlyphName, codepoint: Codepoint },

    #[error("'{glyph}' uses undeclared class '{class}'")]
    UndeclaredClass { glyph: GlyphName, class: ClassTag },

    #[error("class '{class}' includes itself: {path}")]
    ClassCycle { class: ClassTag, path: String },

    #[error("alternate chain of '{glyph}' forms a cycle: {path}")]
    AlternateCycle { glyph: GlyphName, path: String },

    #[error("alternate chain of '{glyph}' is deeper than {max} levels")]
    AlternateDepthExceeded { glyph: GlyphName, max: usize },

    #[error("'{alternate}' is listed as an alternate of both '{first}' and '{second}'")]
    AmbiguousAlternate { alternate: GlyphName, first: GlyphName, second: GlyphName },

    #[error("'{0}' lists itself as a ligature component")]
    SelfLigature(GlyphName),

    #[error("{kind} '{to}' referenced by '{from}' is not defined")]
    DanglingReference { from: String, to: String, kind: ReferenceKind },
}

impl Error {
    /// Whether this is a dangling-reference error rather than a schema error.
    pub fn is_dangling_reference(&self) -> bool {
        matches!(self, Self::DanglingReference { .. })
    }
}

pub type Result<T> = result::Result<T, Error>;
