//! The accidental catalog: alteration values and their glyph realizations.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    fmt,
};

use ekmelos_glyph_registry::{GlyphName, MasterRegistry};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    alteration::Alteration,
    error::{Error, Result},
};

/// One definition as written in `accidentals.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDefinition {
    pub alteration: Alteration,
    /// Glyphs stacked left to right; a single glyph is a primitive accidental.
    pub glyphs: Vec<GlyphName>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl RawDefinition {
    pub fn new<I, S>(alteration: Alteration, glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<GlyphName>,
    {
        Self {
            alteration,
            glyphs: glyphs.into_iter().map(Into::into).collect(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDefinitions {
    pub accidentals: Vec<RawDefinition>,
}

impl RawDefinitions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with(mut self, definition: RawDefinition) -> Self {
        self.accidentals.push(definition);
        self
    }
}

/// How an alteration is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Realization {
    /// A single dedicated glyph.
    Primitive(GlyphName),
    /// Several glyphs stacked visually, in order.
    Composite(Vec<GlyphName>),
}

impl Realization {
    /// Build from a glyph list; `None` when the list is empty.
    pub fn from_glyphs(mut glyphs: Vec<GlyphName>) -> Option<Self> {
        match glyphs.len() {
            0 => None,
            1 => glyphs.pop().map(Self::Primitive),
            _ => Some(Self::Composite(glyphs)),
        }
    }

    pub fn glyphs(&self) -> &[GlyphName] {
        match self {
            Self::Primitive(glyph) => std::slice::from_ref(glyph),
            Self::Composite(glyphs) => glyphs,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}

impl fmt::Display for Realization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.glyphs().iter().map(|g| g.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccidentalDefinition {
    alteration: Alteration,
    realization: Realization,
    description: String,
}

impl AccidentalDefinition {
    pub fn alteration(&self) -> Alteration {
        self.alteration
    }

    pub fn realization(&self) -> &Realization {
        &self.realization
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Accidental definitions indexed by alteration value.
///
/// Every referenced glyph exists in the registry the catalog was loaded
/// against, and no two definitions share an alteration value.
#[derive(Debug, Clone, Default)]
pub struct AccidentalCatalog {
    definitions: BTreeMap<Alteration, AccidentalDefinition>,
}

impl AccidentalCatalog {
    pub fn from_json(json: &str, registry: &MasterRegistry) -> Result<Self> {
        Self::load(RawDefinitions::from_json(json)?, registry)
    }

    /// Load definitions, failing on the first rejected one.
    pub fn load(raw: RawDefinitions, registry: &MasterRegistry) -> Result<Self> {
        let (catalog, mut errors) = Self::load_lenient(raw, registry);
        if errors.is_empty() { Ok(catalog) } else { Err(errors.swap_remove(0)) }
    }

    /// Load definitions, skipping and reporting each rejected one.
    ///
    /// Duplicates with an identical realization are merged silently; the
    /// first definition of a value wins over later conflicting ones.
    pub fn load_lenient(raw: RawDefinitions, registry: &MasterRegistry) -> (Self, Vec<Error>) {
        let mut definitions: BTreeMap<Alteration, AccidentalDefinition> = BTreeMap::new();
        let mut errors = Vec::new();

        for raw in raw.accidentals {
            let alteration = raw.alteration;
            let dangling: Vec<Error> = raw
                .glyphs
                .iter()
                .filter(|g| !registry.contains(g))
                .map(|g| Error::DanglingReference { alteration, glyph: g.clone() })
                .collect();
            if !dangling.is_empty() {
                errors.extend(dangling);
                continue;
            }

            let Some(realization) = Realization::from_glyphs(raw.glyphs) else {
                errors.push(Error::EmptyRealization(alteration));
                continue;
            };

            match definitions.entry(alteration) {
                Entry::Vacant(entry) => {
                    entry.insert(AccidentalDefinition {
                        alteration,
                        realization,
                        description: raw.description,
                    });
                }
                Entry::Occupied(entry) if entry.get().realization == realization => {
                    debug!("Ignoring redundant definition of {alteration}");
                }
                Entry::Occupied(entry) => errors.push(Error::ConflictingDefinition {
                    alteration,
                    existing: entry.get().realization.clone(),
                    conflicting: realization,
                }),
            }
        }

        (Self { definitions }, errors)
    }

    pub fn get(&self, alteration: &Alteration) -> Option<&AccidentalDefinition> {
        self.definitions.get(alteration)
    }

    /// Definitions in ascending alteration order.
    pub fn definitions(&self) -> impl Iterator<Item = &AccidentalDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use ekmelos_glyph_registry::{RawCatalog, RawGlyph};

    use super::*;

    fn alt(s: &str) -> Alteration {
        s.parse().unwrap()
    }

    fn registry() -> MasterRegistry {
        MasterRegistry::load(
            RawCatalog::default()
                .with_glyph(RawGlyph::new("accidentalSharp", 0xE262))
                .with_glyph(RawGlyph::new("arrowUp", 0xE2C0)),
        )
        .unwrap()
    }

    #[test]
    fn test_load() {
        let raw = RawDefinitions::default()
            .with(RawDefinition::new(alt("1/2"), ["accidentalSharp"]))
            .with(RawDefinition::new(alt("2/3"), ["accidentalSharp", "arrowUp"]));
        let catalog = AccidentalCatalog::load(raw, &registry()).unwrap();
        assert_eq!(catalog.len(), 2);

        let sharp = catalog.get(&alt("1/2")).unwrap();
        assert_eq!(sharp.realization(), &Realization::Primitive(GlyphName::new("accidentalSharp")));
        let composite = catalog.get(&alt("2/3")).unwrap();
        assert!(composite.realization().is_composite());
        assert_eq!(composite.realization().to_string(), "[accidentalSharp, arrowUp]");
        assert!(catalog.get(&alt("1/5")).is_none());
    }

    #[test]
    fn test_dangling_reference() {
        let raw = RawDefinitions::default().with(RawDefinition::new(alt("1/4"), ["accidentalQuarterToneSharpStein"]));
        let err = AccidentalCatalog::load(raw, &registry()).unwrap_err();
        assert!(matches!(err, Error::DanglingReference { ref glyph, .. } if glyph == "accidentalQuarterToneSharpStein"));
        assert!(!err.is_schema());
    }

    #[test]
    fn test_empty_realization() {
        let raw = RawDefinitions::default().with(RawDefinition::new(alt("0"), Vec::<String>::new()));
        let err = AccidentalCatalog::load(raw, &registry()).unwrap_err();
        assert!(matches!(err, Error::EmptyRealization(_)));
        assert!(err.is_schema());
    }

    #[test]
    fn test_redundant_duplicate_is_deduplicated() {
        let raw = RawDefinitions::default()
            .with(RawDefinition::new(alt("1/2"), ["accidentalSharp"]))
            .with(RawDefinition::new(alt("2/4"), ["accidentalSharp"]));
        let catalog = AccidentalCatalog::load(raw, &registry()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_conflicting_duplicate() {
        let raw = RawDefinitions::default()
            .with(RawDefinition::new(alt("1/2"), ["accidentalSharp"]))
            .with(RawDefinition::new(alt("1/2"), ["accidentalSharp", "arrowUp"]));
        let err = AccidentalCatalog::load(raw, &registry()).unwrap_err();
        assert!(matches!(err, Error::ConflictingDefinition { .. }));
    }

    #[test]
    fn test_lenient_keeps_valid_definitions() {
        let raw = RawDefinitions::default()
            .with(RawDefinition::new(alt("1/2"), ["accidentalSharp"]))
            .with(RawDefinition::new(alt("1/2"), ["arrowUp"]))
            .with(RawDefinition::new(alt("1/4"), ["missing", "alsoMissing"]))
            .with(RawDefinition::new(alt("2/3"), ["accidentalSharp", "arrowUp"]));
        let (catalog, errors) = AccidentalCatalog::load_lenient(raw, &registry());
        assert_eq!(catalog.len(), 2);
        assert_eq!(errors.len(), 3);
        assert_eq!(
            catalog.get(&alt("1/2")).unwrap().realization(),
            &Realization::Primitive(GlyphName::new("accidentalSharp"))
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"{ "accidentals": [
            { "alteration": "1/2", "glyphs": ["accidentalSharp"], "description": "sharp" },
            { "alteration": 1, "glyphs": ["accidentalSharp", "accidentalSharp"] }
        ] }"#;
        let catalog = AccidentalCatalog::from_json(json, &registry()).unwrap();
        let alterations: Vec<String> = catalog.definitions().map(|d| d.alteration().to_string()).collect();
        assert_eq!(alterations, ["1/2", "1"]);
        assert_eq!(catalog.get(&alt("1/2")).unwrap().description(), "sharp");
    }
}
