//! Whole-source audit: every stage in collecting mode.

use ekmelos_accidentals::{AccidentalCatalog, EdoProfile, RawDefinitions};
use ekmelos_glyph_registry::{MasterRegistry, RawCatalog};
use log::info;

use crate::{
    error::Error,
    manifest::{MASTER_NAME, VariantManifest},
    selector::VariantSelector,
    validator::{ConsistencyError, ValidationReport, validate},
};

pub const GLYPHS_SCOPE: &str = "glyphs";
pub const ACCIDENTALS_SCOPE: &str = "accidentals";

/// Report every defect in a metadata source set in one pass.
///
/// Registry defects are reported together; if the registry cannot be built
/// nothing downstream is checked. Rejected accidental definitions are
/// reported and skipped, each profile is derived with every unsatisfiable
/// value reported, and the master plus every derived manifest is validated.
pub fn audit(glyphs: RawCatalog, accidentals: RawDefinitions, profiles: &[EdoProfile]) -> ValidationReport {
    let mut report = ValidationReport::new();

    let registry = match MasterRegistry::load_collecting(glyphs) {
        Ok(registry) => registry,
        Err(errors) => {
            for error in errors {
                report.push(GLYPHS_SCOPE, error);
            }
            return report;
        }
    };

    let (catalog, errors) = AccidentalCatalog::load_lenient(accidentals, &registry);
    for error in errors {
        report.push(ACCIDENTALS_SCOPE, error);
    }

    report.merge(validate(&VariantManifest::master(&registry, &catalog), &registry));

    let selector = VariantSelector::new(&registry, &catalog);
    for profile in profiles {
        match selector.derive(profile) {
            Ok(manifest) => report.merge(validate(&manifest, &registry)),
            Err(Error::UnsatisfiableProfile { profile, values }) => {
                for value in values {
                    report.push(profile.as_str(), ConsistencyError::UnsatisfiableValue { value });
                }
            }
        }
    }

    info!(
        "Audited {} glyphs, {} accidentals, {MASTER_NAME} + {} profiles: {} error(s), {} warning(s)",
        registry.len(),
        catalog.len(),
        profiles.len(),
        report.error_count(),
        report.warning_count()
    );
    report
}

#[cfg(test)]
mod tests {
    use ekmelos_accidentals::{Edo, RawDefinition};
    use ekmelos_glyph_registry::RawGlyph;

    use super::*;

    #[test]
    fn test_registry_failure_stops_audit() {
        let glyphs = RawCatalog::default()
            .with_glyph(RawGlyph::new("a", 0xE000))
            .with_glyph(RawGlyph::new("b", 0xE000))
            .with_glyph(RawGlyph::new("c", 0xE001).with_alternates(["missing"]));
        let accidentals = RawDefinitions::default().with(RawDefinition::new("1/2".parse().unwrap(), ["a"]));
        let report = audit(glyphs, accidentals, &[]);
        assert_eq!(report.error_count(), 2);
        assert!(report.issues().iter().all(|i| i.scope == GLYPHS_SCOPE));
    }

    #[test]
    fn test_clean_source() {
        let glyphs = RawCatalog::default().with_glyph(RawGlyph::new("accidentalSharp", 0xE262));
        let accidentals =
            RawDefinitions::default().with(RawDefinition::new("1/2".parse().unwrap(), ["accidentalSharp"]));
        let profiles = [EdoProfile::new("12-EDO", Edo::Twelve, ["1/2".parse().unwrap()]).unwrap()];
        let report = audit(glyphs, accidentals, &profiles);
        assert!(report.is_clean(), "{report}");
    }
}
