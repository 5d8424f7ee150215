//! Derived variant manifests
//!
//! A [`VariantManifest`] is the glyph subset one font of the family ships:
//! - the included glyphs, each with the codepoint it has in the master
//! - the glyph stack each supported alteration value resolves to

use std::collections::{BTreeMap, BTreeSet};

use ekmelos_accidentals::{AccidentalCatalog, Alteration};
use ekmelos_glyph_registry::{Codepoint, GlyphName, MasterRegistry};

/// Name of the manifest that covers the complete registry.
pub const MASTER_NAME: &str = "master";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantManifest {
    name: String,
    denominator: Option<u32>,
    codepoint_map: BTreeMap<GlyphName, Codepoint>,
    resolutions: BTreeMap<Alteration, Vec<GlyphName>>,
}

impl VariantManifest {
    /// Assemble a manifest from its parts without any closure or lookup.
    ///
    /// The glyph set is the key set of `codepoint_map`. Derived manifests
    /// come from [`crate::derive`]; this is for tooling that reads
    /// manifests back and for exercising the validator.
    pub fn from_parts(
        name: impl Into<String>,
        denominator: Option<u32>,
        codepoint_map: BTreeMap<GlyphName, Codepoint>,
        resolutions: BTreeMap<Alteration, Vec<GlyphName>>,
    ) -> Self {
        Self { name: name.into(), denominator, codepoint_map, resolutions }
    }

    /// The master manifest: every registry glyph and every catalog resolution.
    pub fn master(registry: &MasterRegistry, catalog: &AccidentalCatalog) -> Self {
        let codepoint_map = registry
            .glyphs()
            .iter()
            .map(|glyph| (glyph.name().clone(), glyph.codepoint()))
            .collect();
        let resolutions = catalog
            .definitions()
            .map(|def| (def.alteration(), def.realization().glyphs().to_vec()))
            .collect();
        Self::from_parts(MASTER_NAME, None, codepoint_map, resolutions)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// EDO denominator; `None` for the master.
    pub fn denominator(&self) -> Option<u32> {
        self.denominator
    }

    pub fn is_master(&self) -> bool {
        self.denominator.is_none()
    }

    /// Included glyph names in name order.
    pub fn glyphs(&self) -> impl Iterator<Item = &GlyphName> {
        self.codepoint_map.keys()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codepoint_map.contains_key(name)
    }

    pub fn codepoint(&self, name: &str) -> Option<Codepoint> {
        self.codepoint_map.get(name).copied()
    }

    pub fn codepoint_map(&self) -> &BTreeMap<GlyphName, Codepoint> {
        &self.codepoint_map
    }

    /// Included glyphs ordered by codepoint, then name.
    pub fn by_codepoint(&self) -> Vec<(&GlyphName, Codepoint)> {
        let mut entries: Vec<_> = self.codepoint_map.iter().map(|(name, &cp)| (name, cp)).collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Glyph stack each supported alteration value resolves to, ascending.
    pub fn resolutions(&self) -> &BTreeMap<Alteration, Vec<GlyphName>> {
        &self.resolutions
    }

    pub fn resolution(&self, alteration: &Alteration) -> Option<&[GlyphName]> {
        self.resolutions.get(alteration).map(Vec::as_slice)
    }

    pub fn supported_values(&self) -> BTreeSet<Alteration> {
        self.resolutions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.codepoint_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoint_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use ekmelos_accidentals::{RawDefinition, RawDefinitions};
    use ekmelos_glyph_registry::{RawCatalog, RawGlyph};

    use super::*;

    #[test]
    fn test_master_covers_registry() {
        let registry = MasterRegistry::load(
            RawCatalog::default()
                .with_glyph(RawGlyph::new("arrowUp", 0xE2C0))
                .with_glyph(RawGlyph::new("accidentalSharp", 0xE262))
                .with_glyph(RawGlyph::new("accidentalFlat", 0xE260)),
        )
        .unwrap();
        let catalog = AccidentalCatalog::load(
            RawDefinitions::default().with(RawDefinition::new("1/2".parse().unwrap(), ["accidentalSharp"])),
            &registry,
        )
        .unwrap();

        let master = VariantManifest::master(&registry, &catalog);
        assert!(master.is_master());
        assert_eq!(master.name(), MASTER_NAME);
        assert_eq!(master.len(), 3);
        assert_eq!(master.codepoint("arrowUp"), Some(Codepoint(0xE2C0)));
        assert_eq!(master.resolutions().len(), 1);

        let order: Vec<&str> = master.by_codepoint().into_iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(order, ["accidentalFlat", "accidentalSharp", "arrowUp"]);
    }

    #[test]
    fn test_from_parts() {
        let manifest = VariantManifest::from_parts(
            "broken",
            Some(12),
            BTreeMap::from([(GlyphName::new("a"), Codepoint(0xE000)), (GlyphName::new("b"), Codepoint(0xE000))]),
            BTreeMap::new(),
        );
        assert!(!manifest.is_master());
        assert_eq!(manifest.denominator(), Some(12));
        assert!(manifest.contains("b"));
        assert!(manifest.supported_values().is_empty());
    }
}
