//! Pure, deterministic serialization of variant manifests
//!
//! Every output is ordered by codepoint, glyph name or alteration value and
//! depends only on the manifest, the registry, the version and the copyright year.

use std::collections::BTreeMap;

use ekmelos_glyph_registry::{ClassTag, Codepoint, GlyphEntry, GlyphName, MasterRegistry};
use ekmelos_variant::VariantManifest;
use serde::Serialize;

use crate::{
    error::Result,
    format::{ExportFormat, slug},
};

pub const DEFAULT_FAMILY: &str = "Ekmelos";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestDocument<'a> {
    font_name: String,
    variant: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    denominator: Option<u32>,
    version: &'a str,
    glyphs: Vec<GlyphRecord<'a>>,
    accidentals: Vec<AccidentalRecord<'a>>,
}

#[derive(Serialize)]
struct GlyphRecord<'a> {
    name: &'a GlyphName,
    codepoint: Codepoint,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    classes: Vec<&'a ClassTag>,
    #[serde(skip_serializing_if = "is_false")]
    optional: bool,
}

#[derive(Serialize)]
struct AccidentalRecord<'a> {
    alteration: String,
    glyphs: &'a [GlyphName],
}

#[derive(Serialize)]
struct GlyphNameRecord<'a> {
    codepoint: Codepoint,
    description: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FontMetadataDocument<'a> {
    font_name: String,
    font_version: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    glyphs_with_alternates: BTreeMap<&'a GlyphName, AlternatesRecord<'a>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    ligatures: BTreeMap<&'a GlyphName, LigatureRecord<'a>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    optional_glyphs: BTreeMap<&'a GlyphName, OptionalGlyphRecord<'a>>,
}

#[derive(Serialize)]
struct AlternatesRecord<'a> {
    alternates: Vec<AlternateRecord<'a>>,
}

#[derive(Serialize)]
struct AlternateRecord<'a> {
    codepoint: Codepoint,
    name: &'a GlyphName,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LigatureRecord<'a> {
    codepoint: Codepoint,
    component_glyphs: &'a [GlyphName],
}

#[derive(Serialize)]
struct OptionalGlyphRecord<'a> {
    classes: Vec<&'a ClassTag>,
    codepoint: Codepoint,
}

fn is_false(value: &bool) -> bool {
    !value
}

/// Serializes manifests against the registry they were derived from.
#[derive(Debug, Clone)]
pub struct ManifestExporter<'a> {
    registry: &'a MasterRegistry,
    version: String,
    family: String,
    year: Option<i32>,
}

impl<'a> ManifestExporter<'a> {
    pub fn new(registry: &'a MasterRegistry, version: impl Into<String>) -> Self {
        Self { registry, version: version.into(), family: DEFAULT_FAMILY.to_string(), year: None }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Copyright year of the LilyPond map header; omitted when unset.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn export(&self, manifest: &VariantManifest, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Manifest => self.manifest_json(manifest),
            ExportFormat::GlyphNames => self.glyphnames_json(manifest),
            ExportFormat::LilyPond => Ok(self.lilypond_map(manifest)),
            ExportFormat::Classes => self.classes_json(manifest),
            ExportFormat::FontMetadata => self.font_metadata_json(manifest),
        }
    }

    /// Font name of a variant: the family for the master, `"Ekmelos 24-EDO"` otherwise.
    pub fn font_name(&self, manifest: &VariantManifest) -> String {
        if manifest.is_master() {
            self.family.clone()
        } else {
            format!("{} {}", self.family, manifest.name())
        }
    }

    fn entry(&self, name: &str) -> Option<&'a GlyphEntry> {
        self.registry.lookup_by_name(name)
    }

    pub fn manifest_json(&self, manifest: &VariantManifest) -> Result<String> {
        let glyphs = manifest
            .by_codepoint()
            .into_iter()
            .map(|(name, codepoint)| {
                let entry = self.entry(name);
                GlyphRecord {
                    name,
                    codepoint,
                    classes: entry.map(|e| e.classes().iter().collect()).unwrap_or_default(),
                    optional: entry.is_some_and(GlyphEntry::is_optional),
                }
            })
            .collect();
        let accidentals = manifest
            .resolutions()
            .iter()
            .map(|(alteration, glyphs)| AccidentalRecord { alteration: alteration.to_string(), glyphs })
            .collect();

        let document = ManifestDocument {
            font_name: self.font_name(manifest),
            variant: manifest.name(),
            denominator: manifest.denominator(),
            version: &self.version,
            glyphs,
            accidentals,
        };
        to_json(&document)
    }

    /// SMuFL glyph names with codepoint and description, keyed by name.
    ///
    /// Glyphs without a real name (`uE262`) are left out.
    pub fn glyphnames_json(&self, manifest: &VariantManifest) -> Result<String> {
        let names: BTreeMap<&str, GlyphNameRecord<'_>> = manifest
            .codepoint_map()
            .iter()
            .filter(|(name, codepoint)| has_real_name(name, **codepoint))
            .map(|(name, &codepoint)| {
                let description = self.entry(name).map(GlyphEntry::description).unwrap_or_default();
                (name.as_str(), GlyphNameRecord { codepoint, description })
            })
            .collect();
        to_json(&names)
    }

    /// Scheme alist mapping glyph names to codepoints, in codepoint order.
    pub fn lilypond_map(&self, manifest: &VariantManifest) -> String {
        let font_name = self.font_name(manifest);
        let map_name = format!("{}-map", slug(&font_name));

        let mut out = String::new();
        out.push_str(&format!("%% {map_name}.ily\n"));
        out.push_str(&format!("%% Glyph names of {font_name} for LilyPond\n"));
        match self.year {
            Some(year) => out.push_str(&format!("%% Copyright (c) {year} {}\n", self.family)),
            None => out.push_str(&format!("%% Copyright (c) {}\n", self.family)),
        }
        out.push_str(&format!("%% Metadata version {}\n\n", self.version));
        out.push_str(&format!("#(define-public {map_name} '(\n"));
        for (name, codepoint) in manifest.by_codepoint() {
            if has_real_name(name, codepoint) {
                out.push_str(&format!("  (\"{name}\" . #x{:04X})\n", codepoint.to_u32()));
            }
        }
        out.push_str("))\n");
        out
    }

    /// Every declared class with its members in this variant, in codepoint order.
    ///
    /// Classes with no member in the variant are left out.
    pub fn classes_json(&self, manifest: &VariantManifest) -> Result<String> {
        let classes: BTreeMap<&ClassTag, Vec<&GlyphName>> = self
            .registry
            .classes()
            .filter_map(|tag| {
                let members: Vec<&GlyphName> = self
                    .registry
                    .glyphs_in_class(tag)
                    .map(GlyphEntry::name)
                    .filter(|name| manifest.contains(name))
                    .collect();
                (!members.is_empty()).then_some((tag, members))
            })
            .collect();
        to_json(&classes)
    }

    /// SMuFL font metadata of the glyphs in this variant.
    ///
    /// Alternates are listed only when they are part of the variant too.
    /// Empty sections are left out.
    pub fn font_metadata_json(&self, manifest: &VariantManifest) -> Result<String> {
        let mut document = FontMetadataDocument {
            font_name: self.font_name(manifest),
            font_version: &self.version,
            glyphs_with_alternates: BTreeMap::new(),
            ligatures: BTreeMap::new(),
            optional_glyphs: BTreeMap::new(),
        };
        for (name, &codepoint) in manifest.codepoint_map() {
            let Some(entry) = self.entry(name) else { continue };
            let alternates: Vec<AlternateRecord<'_>> = entry
                .alternates()
                .iter()
                .filter_map(|alt| manifest.codepoint(alt).map(|codepoint| AlternateRecord { codepoint, name: alt }))
                .collect();
            if !alternates.is_empty() {
                document.glyphs_with_alternates.insert(name, AlternatesRecord { alternates });
            }
            if entry.is_ligature() {
                document
                    .ligatures
                    .insert(name, LigatureRecord { codepoint, component_glyphs: entry.ligature() });
            }
            if entry.is_optional() {
                document
                    .optional_glyphs
                    .insert(name, OptionalGlyphRecord { classes: entry.classes().iter().collect(), codepoint });
            }
        }
        to_json(&document)
    }
}

/// Placeholder names like `u2660` only mirror the codepoint.
fn has_real_name(name: &str, codepoint: Codepoint) -> bool {
    name != format!("u{:04X}", codepoint.to_u32())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Export one manifest. See [`ManifestExporter`].
pub fn export(
    manifest: &VariantManifest,
    registry: &MasterRegistry,
    version: &str,
    format: ExportFormat,
) -> Result<String> {
    ManifestExporter::new(registry, version).export(manifest, format)
}

#[cfg(test)]
mod tests {
    use ekmelos_accidentals::{AccidentalCatalog, RawDefinition, RawDefinitions};
    use ekmelos_glyph_registry::{RawCatalog, RawGlyph};
    use serde_json::Value;

    use super::*;

    fn fixture() -> (MasterRegistry, AccidentalCatalog) {
        let registry = MasterRegistry::load(
            RawCatalog::default()
                .with_glyph(RawGlyph::new("u2660", 0x2660).with_description("Black spade suit"))
                .with_glyph(
                    RawGlyph::new("accidentalSharp", 0xE262)
                        .with_description("Sharp")
                        .with_classes(["accidentals"]),
                )
                .with_glyph(RawGlyph::new("arrowUp", 0xE2C0).with_description("Arrow up"))
                .with_glyph(RawGlyph::new("accidentalSharpSmall", 0xF427))
                .with_class("accidentals", Vec::<String>::new()),
        )
        .unwrap();
        let catalog = AccidentalCatalog::load(
            RawDefinitions::default()
                .with(RawDefinition::new("1/2".parse().unwrap(), ["accidentalSharp"]))
                .with(RawDefinition::new("2/3".parse().unwrap(), ["accidentalSharp", "arrowUp"])),
            &registry,
        )
        .unwrap();
        (registry, catalog)
    }

    #[test]
    fn test_manifest_json() {
        let (registry, catalog) = fixture();
        let master = VariantManifest::master(&registry, &catalog);
        let json = export(&master, &registry, "2026-10-18", ExportFormat::Manifest).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["fontName"], "Ekmelos");
        assert_eq!(value["variant"], "master");
        assert!(value.get("denominator").is_none());
        assert_eq!(value["version"], "2026-10-18");

        let glyphs = value["glyphs"].as_array().unwrap();
        let names: Vec<&str> = glyphs.iter().map(|g| g["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["u2660", "accidentalSharp", "arrowUp", "accidentalSharpSmall"]);
        assert_eq!(glyphs[1]["codepoint"], "U+E262");
        assert_eq!(glyphs[1]["classes"], serde_json::json!(["accidentals"]));
        assert_eq!(glyphs[3]["optional"], true);
        assert!(glyphs[1].get("optional").is_none());

        let accidentals = value["accidentals"].as_array().unwrap();
        assert_eq!(accidentals[0]["alteration"], "1/2");
        assert_eq!(accidentals[1]["glyphs"], serde_json::json!(["accidentalSharp", "arrowUp"]));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_glyphnames_json() {
        let (registry, catalog) = fixture();
        let master = VariantManifest::master(&registry, &catalog);
        let json = export(&master, &registry, "2026-10-18", ExportFormat::GlyphNames).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("u2660"));
        assert_eq!(value["accidentalSharp"]["codepoint"], "U+E262");
        assert_eq!(value["accidentalSharp"]["description"], "Sharp");
        assert_eq!(object.keys().collect::<Vec<_>>(), ["accidentalSharp", "accidentalSharpSmall", "arrowUp"]);
    }

    #[test]
    fn test_lilypond_map() {
        let (registry, catalog) = fixture();
        let master = VariantManifest::master(&registry, &catalog);
        let map = ManifestExporter::new(&registry, "2026-10-18.2").with_year(2026).lilypond_map(&master);

        assert!(map.starts_with("%% ekmelos-map.ily\n"));
        assert!(map.contains("%% Copyright (c) 2026 Ekmelos\n"));
        assert!(map.contains("#(define-public ekmelos-map '(\n"));
        let sharp = map.find("(\"accidentalSharp\" . #xE262)").unwrap();
        let arrow = map.find("(\"arrowUp\" . #xE2C0)").unwrap();
        assert!(sharp < arrow);
        assert!(!map.contains("u2660"));
        assert!(map.ends_with("))\n"));
    }

    #[test]
    fn test_variant_font_name() {
        let (registry, _) = fixture();
        let manifest = VariantManifest::from_parts(
            "24-EDO",
            Some(24),
            BTreeMap::from([(GlyphName::new("accidentalSharp"), Codepoint(0xE262))]),
            BTreeMap::new(),
        );
        let exporter = ManifestExporter::new(&registry, "unversioned");
        assert_eq!(exporter.font_name(&manifest), "Ekmelos 24-EDO");
        assert!(exporter.lilypond_map(&manifest).contains("#(define-public ekmelos-24-edo-map '("));
        assert!(exporter.lilypond_map(&manifest).contains("%% Copyright (c) Ekmelos\n"));
        assert!(exporter.lilypond_map(&manifest).contains("%% Metadata version unversioned\n"));
    }

    fn smufl_registry() -> MasterRegistry {
        MasterRegistry::load(
            RawCatalog::default()
                .with_glyph(
                    RawGlyph::new("accidentalSharp", 0xE262)
                        .with_classes(["accidentalsStandard"])
                        .with_alternates(["accidentalSharpSmall"]),
                )
                .with_glyph(RawGlyph::new("accidentalFlat", 0xE260).with_classes(["accidentalsStandard"]))
                .with_glyph(RawGlyph::new("arrowUp", 0xE2C0))
                .with_glyph(
                    RawGlyph::new("accidentalSharpArrowUp", 0xE2C4).with_ligature(["accidentalSharp", "arrowUp"]),
                )
                .with_glyph(RawGlyph::new("accidentalSharpSmall", 0xF427).with_classes(["accidentalsStandard"]))
                .with_class("accidentalsStandard", Vec::<String>::new())
                .with_class("arrows", ["arrowUp"])
                .with_class("unused", Vec::<String>::new()),
        )
        .unwrap()
    }

    fn variant(names: &[(&str, u32)]) -> VariantManifest {
        VariantManifest::from_parts(
            "24-EDO",
            Some(24),
            names.iter().map(|&(name, cp)| (GlyphName::new(name), Codepoint(cp))).collect(),
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_classes_json() {
        let registry = smufl_registry();
        let manifest = variant(&[("accidentalFlat", 0xE260), ("accidentalSharp", 0xE262)]);
        let json = export(&manifest, &registry, "2026-10-18", ExportFormat::Classes).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value, serde_json::json!({ "accidentalsStandard": ["accidentalFlat", "accidentalSharp"] }));
        assert!(json.ends_with("}\n"));

        let master = ManifestExporter::new(&registry, "2026-10-18")
            .classes_json(&variant(&[
                ("accidentalFlat", 0xE260),
                ("accidentalSharp", 0xE262),
                ("arrowUp", 0xE2C0),
                ("accidentalSharpSmall", 0xF427),
            ]))
            .unwrap();
        let value: Value = serde_json::from_str(&master).unwrap();
        assert_eq!(value["accidentalsStandard"], serde_json::json!(["accidentalFlat", "accidentalSharp", "accidentalSharpSmall"]));
        assert_eq!(value["arrows"], serde_json::json!(["arrowUp"]));
        assert!(value.get("unused").is_none());
    }

    #[test]
    fn test_font_metadata_json() {
        let registry = smufl_registry();
        let all = variant(&[
            ("accidentalFlat", 0xE260),
            ("accidentalSharp", 0xE262),
            ("arrowUp", 0xE2C0),
            ("accidentalSharpArrowUp", 0xE2C4),
            ("accidentalSharpSmall", 0xF427),
        ]);
        let json = export(&all, &registry, "2026-10-18", ExportFormat::FontMetadata).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["fontName"], "Ekmelos 24-EDO");
        assert_eq!(value["fontVersion"], "2026-10-18");
        assert_eq!(
            value["glyphsWithAlternates"],
            serde_json::json!({
                "accidentalSharp": { "alternates": [ { "codepoint": "U+F427", "name": "accidentalSharpSmall" } ] }
            })
        );
        assert_eq!(
            value["ligatures"],
            serde_json::json!({
                "accidentalSharpArrowUp": { "codepoint": "U+E2C4", "componentGlyphs": ["accidentalSharp", "arrowUp"] }
            })
        );
        assert_eq!(
            value["optionalGlyphs"],
            serde_json::json!({
                "accidentalSharpSmall": { "classes": ["accidentalsStandard"], "codepoint": "U+F427" }
            })
        );
    }

    #[test]
    fn test_font_metadata_json_omits_empty_sections() {
        let registry = smufl_registry();
        let manifest = variant(&[("accidentalFlat", 0xE260), ("accidentalSharp", 0xE262)]);
        let json = ManifestExporter::new(&registry, "2026-10-18").font_metadata_json(&manifest).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["fontName", "fontVersion"]);
    }
}
