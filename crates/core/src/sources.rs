//! Locating and loading the metadata source files.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Result, anyhow, bail};
use ekmelos_accidentals::{AccidentalCatalog, EdoProfile, RawDefinitions, check_unique_names, profiles_from_json};
use ekmelos_glyph_registry::{MasterRegistry, RawCatalog};
use ekmelos_manifest::slug;
use ekmelos_variant::{MASTER_NAME, VariantManifest};
use log::{error, info};

use crate::{
    config::{ACCIDENTALS_FILENAME, GLYPHS_FILENAME, PROFILES_PATTERN},
    io::{MetadataFile, glob_metadata},
};

/// Paths of one metadata source set.
#[derive(Debug, Clone)]
pub struct MetadataSources {
    pub glyphs: PathBuf,
    pub accidentals: PathBuf,
    pub profiles: Vec<PathBuf>,
}

impl MetadataSources {
    /// Resolve file names and the profile glob against `dir`.
    ///
    /// Absolute file names are used as given.
    pub fn new(dir: &Path, glyphs: &str, accidentals: &str, profiles_pattern: &str) -> Result<Self> {
        let profiles = glob_metadata(dir, profiles_pattern)?;
        if profiles.is_empty() {
            bail!("No profile files match {}", dir.join(profiles_pattern).display());
        }
        Ok(Self { glyphs: dir.join(glyphs), accidentals: dir.join(accidentals), profiles })
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::new(dir, GLYPHS_FILENAME, ACCIDENTALS_FILENAME, PROFILES_PATTERN)
    }

    pub fn read_glyphs(&self) -> Result<RawCatalog> {
        MetadataFile::new(&self.glyphs).parse(RawCatalog::from_json)
    }

    pub fn read_accidentals(&self) -> Result<RawDefinitions> {
        MetadataFile::new(&self.accidentals).parse(RawDefinitions::from_json)
    }

    /// Load every profile file; names must be unique across files and
    /// must map to distinct output directories.
    pub fn load_profiles(&self) -> Result<Vec<EdoProfile>> {
        let mut profiles = Vec::new();
        for path in &self.profiles {
            profiles.extend(MetadataFile::new(path).parse(profiles_from_json)?);
        }
        check_unique_names(&profiles)?;
        check_output_dirs(&profiles)?;
        Ok(profiles)
    }

    pub fn load_registry(&self) -> Result<MasterRegistry> {
        load_registry(&self.glyphs)
    }

    /// Load the accidental catalog, logging every rejected definition before failing.
    pub fn load_catalog(&self, registry: &MasterRegistry) -> Result<AccidentalCatalog> {
        let raw = self.read_accidentals()?;
        let (catalog, errors) = AccidentalCatalog::load_lenient(raw, registry);
        if !errors.is_empty() {
            for e in &errors {
                error!("{}: {e}", self.accidentals.display());
            }
            bail!("{} defect(s) in {}", errors.len(), self.accidentals.display());
        }
        Ok(catalog)
    }

    /// Load and validate the complete source set, failing fast.
    pub fn load(&self) -> Result<Metadata> {
        let registry = self.load_registry()?;
        let catalog = self.load_catalog(&registry)?;
        let profiles = self.load_profiles()?;
        info!(
            "Loaded {} glyphs, {} accidentals, {} profiles",
            registry.len(),
            catalog.len(),
            profiles.len()
        );
        Ok(Metadata { registry: Arc::new(registry), catalog: Arc::new(catalog), profiles })
    }
}

/// Every variant, the master included, is written to `dist/<slug of its name>/`.
fn check_output_dirs(profiles: &[EdoProfile]) -> Result<()> {
    let mut dirs: BTreeMap<String, &str> = BTreeMap::from([(slug(MASTER_NAME), MASTER_NAME)]);
    for profile in profiles {
        let dir = slug(profile.name());
        if dir.is_empty() {
            bail!("Profile name '{}' has no letters or digits to name its output directory", profile.name());
        }
        if let Some(other) = dirs.insert(dir.clone(), profile.name()) {
            bail!("Profiles '{other}' and '{}' would both be written to {dir}/", profile.name());
        }
    }
    Ok(())
}

/// Load a glyph catalog, logging every defect before failing.
pub fn load_registry(path: &Path) -> Result<MasterRegistry> {
    let raw = MetadataFile::new(path).parse(RawCatalog::from_json)?;
    MasterRegistry::load_collecting(raw).map_err(|errors| {
        for e in &errors {
            error!("{}: {e}", path.display());
        }
        anyhow!("{} defect(s) in {}", errors.len(), path.display())
    })
}

/// A validated, immutable metadata set shared by every derivation.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub registry: Arc<MasterRegistry>,
    pub catalog: Arc<AccidentalCatalog>,
    pub profiles: Vec<EdoProfile>,
}

impl Metadata {
    /// First profile whose name or denominator matches `selector`.
    pub fn find_profile(&self, selector: &str) -> Option<&EdoProfile> {
        self.profiles.iter().find(|p| p.matches(selector))
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.iter().map(EdoProfile::name).collect()
    }

    pub fn master(&self) -> VariantManifest {
        VariantManifest::master(&self.registry, &self.catalog)
    }
}
