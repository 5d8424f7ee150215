//! Microtonal accidental definitions and the EDO tuning profiles built on them.
//!
//! An [`AccidentalCatalog`] maps exact [`Alteration`] values to the glyphs that
//! draw them, resolved against a [`MasterRegistry`](ekmelos_glyph_registry::MasterRegistry).
//! An [`EdoProfile`] names the values one font variant must be able to draw.

mod alteration;
mod catalog;
mod error;
mod profile;

pub use alteration::Alteration;
pub use catalog::{AccidentalCatalog, AccidentalDefinition, RawDefinition, RawDefinitions, Realization};
pub use error::{Error, Result};
pub use profile::{Edo, EdoProfile, MAX_RANGE_STEPS, RawProfile, RawProfiles, check_unique_names, profiles_from_json};
