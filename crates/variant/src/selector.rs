//! Profile-driven glyph subset derivation.

use std::collections::{BTreeMap, BTreeSet};

use ekmelos_accidentals::{AccidentalCatalog, Alteration, EdoProfile};
use ekmelos_glyph_registry::{GlyphName, MasterRegistry};
use log::{debug, warn};

use crate::{
    error::{Error, Result},
    manifest::VariantManifest,
};

/// Derives variant manifests from one shared registry and catalog.
#[derive(Debug, Clone, Copy)]
pub struct VariantSelector<'a> {
    registry: &'a MasterRegistry,
    catalog: &'a AccidentalCatalog,
}

impl<'a> VariantSelector<'a> {
    pub fn new(registry: &'a MasterRegistry, catalog: &'a AccidentalCatalog) -> Self {
        Self { registry, catalog }
    }

    /// Derive the minimal glyph subset that realizes every value the profile requires.
    ///
    /// Fails if any required value has no accidental definition; all missing
    /// values are named. Included glyphs keep their master codepoints, and
    /// ligature components of included glyphs are included transitively.
    pub fn derive(&self, profile: &EdoProfile) -> Result<VariantManifest> {
        let missing: Vec<Alteration> = profile
            .required_values()
            .iter()
            .filter(|value| self.catalog.get(value).is_none())
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(Error::UnsatisfiableProfile { profile: profile.name().to_string(), values: missing });
        }

        let mut resolutions = BTreeMap::new();
        let mut roots = Vec::new();
        for value in profile.required_values() {
            let Some(definition) = self.catalog.get(value) else { continue };
            let glyphs = definition.realization().glyphs();
            roots.extend(glyphs.iter().cloned());
            resolutions.insert(*value, glyphs.to_vec());
        }

        let included = self.closure(roots);
        let codepoint_map = included
            .into_iter()
            .filter_map(|name| match self.registry.lookup_by_name(&name) {
                Some(glyph) => Some((name, glyph.codepoint())),
                None => {
                    warn!("{}: '{name}' is not in the registry", profile.name());
                    None
                }
            })
            .collect();

        let manifest = VariantManifest::from_parts(profile.name(), Some(profile.denominator()), codepoint_map, resolutions);
        debug!(
            "Derived {}: {} glyphs for {} values",
            manifest.name(),
            manifest.len(),
            manifest.resolutions().len()
        );
        Ok(manifest)
    }

    /// Worklist closure over ligature components.
    fn closure(&self, roots: Vec<GlyphName>) -> BTreeSet<GlyphName> {
        let mut visited = BTreeSet::new();
        let mut worklist = roots;
        while let Some(name) = worklist.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            if let Some(glyph) = self.registry.lookup_by_name(&name) {
                worklist.extend(glyph.ligature().iter().filter(|c| !visited.contains(*c)).cloned());
            }
        }
        visited
    }
}

/// Derive one profile's manifest. See [`VariantSelector::derive`].
pub fn derive(profile: &EdoProfile, registry: &MasterRegistry, catalog: &AccidentalCatalog) -> Result<VariantManifest> {
    VariantSelector::new(registry, catalog).derive(profile)
}
