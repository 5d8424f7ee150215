//! # Variant derivation
//!
//! Derives the glyph subset each EDO font variant ships, and gates every
//! subset (and the master) with exhaustive consistency checks.
//!
//! ## Example
//!
//! ```
//! use ekmelos_accidentals::{AccidentalCatalog, Edo, EdoProfile, RawDefinition, RawDefinitions};
//! use ekmelos_glyph_registry::{MasterRegistry, RawCatalog, RawGlyph};
//! use ekmelos_variant::{derive, validate};
//!
//! let registry = MasterRegistry::load(
//!     RawCatalog::default().with_glyph(RawGlyph::new("accidentalSharp", 0xE262)),
//! )
//! .unwrap();
//! let catalog = AccidentalCatalog::load(
//!     RawDefinitions::default().with(RawDefinition::new("1/2".parse().unwrap(), ["accidentalSharp"])),
//!     &registry,
//! )
//! .unwrap();
//! let profile = EdoProfile::new("12-EDO", Edo::Twelve, ["1/2".parse().unwrap()]).unwrap();
//!
//! let manifest = derive(&profile, &registry, &catalog).unwrap();
//! assert!(validate(&manifest, &registry).is_clean());
//! ```

mod audit;
mod error;
mod manifest;
mod selector;
mod validator;

pub use audit::{ACCIDENTALS_SCOPE, GLYPHS_SCOPE, audit};
pub use error::{Error, Result};
pub use manifest::{MASTER_NAME, VariantManifest};
pub use selector::{VariantSelector, derive};
pub use validator::{ConsistencyError, Issue, Severity, ValidationReport, validate};
