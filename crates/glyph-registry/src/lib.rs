//! # Glyph Registry
//!
//! The validated master glyph catalog of the Ekmelos font family.
//!
//! Loading checks that glyph names and codepoints form a bijection, that every
//! class, alternate and ligature reference resolves, and that alternate chains
//! are acyclic and bounded. All lookup indices are built once at load time.
//!
//! ## Example
//!
//! ```
//! use ekmelos_glyph_registry::{MasterRegistry, RawCatalog, RawGlyph};
//!
//! let raw = RawCatalog::default()
//!     .with_glyph(RawGlyph::new("accidentalSharp", 0xE262).with_classes(["accidentals"]))
//!     .with_class("accidentals", Vec::<String>::new());
//! let registry = MasterRegistry::load(raw).unwrap();
//! assert_eq!(registry.glyphs_in_class("accidentals").count(), 1);
//! ```

mod block;
mod error;
mod glyph;
mod registry;
mod stats;
mod types;

pub use block::{BLOCK_RANGES, UnicodeBlock};
pub use error::{Error, ReferenceKind, Result};
pub use glyph::{GlyphEntry, RawCatalog, RawGlyph};
pub use registry::{MAX_ALTERNATE_DEPTH, MasterRegistry};
pub use stats::RegistryStats;
pub use types::{ClassTag, Codepoint, GlyphName};
