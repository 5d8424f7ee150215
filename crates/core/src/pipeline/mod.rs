//! Build pipeline logic for Ekmelos metadata.

mod steps;

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, bail};
use ekmelos_glyph_registry::{MasterRegistry, RegistryStats};
use ekmelos_manifest::{ExportFormat, ManifestExporter, slug};
use ekmelos_variant::{ValidationReport, VariantManifest, audit, derive, validate};
use log::{error, warn};

pub use steps::{BUILD_STEPS, BuildState, PipelineStep};

use crate::{
    config::{FAMILY_NAME, MASTER_SELECTOR},
    sources::{MetadataSources, load_registry},
    version::MetadataVersion,
};

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════";

pub struct PipelineContext {
    pub sources: MetadataSources,
    pub dist_dir: PathBuf,
    pub version: MetadataVersion,
}

impl PipelineContext {
    pub fn new(sources: MetadataSources, dist_dir: PathBuf, version: Option<String>) -> Result<Self> {
        let version = MetadataVersion::parse(version.as_deref())?;
        Ok(Self { sources, dist_dir, version })
    }

    /// Output directory of one variant.
    pub fn variant_dir(&self, manifest: &VariantManifest) -> PathBuf {
        self.dist_dir.join(slug(manifest.name()))
    }

    pub fn exporter<'a>(&self, registry: &'a MasterRegistry) -> ManifestExporter<'a> {
        ManifestExporter::new(registry, self.version.to_string())
            .with_family(FAMILY_NAME)
            .with_year(self.version.year())
    }
}

/// What a build wrote.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub written: Vec<PathBuf>,
    pub variants: Vec<String>,
    pub warnings: usize,
}

pub fn run_step(
    name: &str,
    step_num: usize,
    total: usize,
    ctx: &PipelineContext,
    state: &mut BuildState,
    f: impl Fn(&PipelineContext, &mut BuildState) -> Result<()>,
) -> Result<()> {
    println!("\n[{step_num}/{total}] {name}");
    let start = Instant::now();
    f(ctx, state)?;
    println!("  ✓ {name} ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(())
}

pub fn run_steps(steps: &[PipelineStep], ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let total = steps.len();
    for (i, (name, step_fn)) in steps.iter().enumerate() {
        run_step(name, i + 1, total, ctx, state, step_fn)?;
    }
    Ok(())
}

/// Derive, validate and export the master and every profile.
///
/// Variants that pass validation are written even when others fail; the
/// build then fails if any profile was unsatisfiable or any manifest has
/// error-severity issues.
pub fn build(ctx: &PipelineContext) -> Result<BuildSummary> {
    let start = Instant::now();

    println!("{RULE}");
    println!("{FAMILY_NAME} Metadata Build Pipeline ({})", ctx.version);
    println!("{RULE}");

    let mut state = BuildState::default();
    run_steps(BUILD_STEPS, ctx, &mut state)?;

    let summary = state.summary();
    println!("\n{RULE}");
    println!("✨ Build complete in {:.2}s", start.elapsed().as_secs_f64());
    println!("   Output: {}", ctx.dist_dir.display());
    println!("   Variants: {}", summary.variants.join(", "));
    println!("   Files: {}, warnings: {}", summary.written.len(), summary.warnings);
    println!("{RULE}");

    let failures = state.failures();
    if failures > 0 {
        bail!("{failures} variant(s) failed; see the errors above");
    }
    Ok(summary)
}

/// Derive, validate and export a single variant.
///
/// `selector` is a profile name, an EDO denominator, or `master`.
pub fn derive_variant(ctx: &PipelineContext, selector: &str, format: ExportFormat) -> Result<String> {
    let metadata = ctx.sources.load()?;

    let manifest = if selector.trim().eq_ignore_ascii_case(MASTER_SELECTOR) {
        metadata.master()
    } else {
        let profile = metadata.find_profile(selector).with_context(|| {
            format!("No profile matches '{selector}' (available: {})", metadata.profile_names().join(", "))
        })?;
        derive(profile, &metadata.registry, &metadata.catalog)?
    };

    let report = validate(&manifest, &metadata.registry);
    for issue in report.warnings() {
        warn!("{issue}");
    }
    if report.has_errors() {
        for issue in report.errors() {
            error!("{issue}");
        }
        bail!("{} failed validation with {} error(s)", manifest.name(), report.error_count());
    }

    Ok(ctx.exporter(&metadata.registry).export(&manifest, format)?)
}

/// Audit the sources in collecting mode.
///
/// Only unreadable files and malformed profiles fail; every other defect
/// ends up in the report.
pub fn check(sources: &MetadataSources) -> Result<ValidationReport> {
    let glyphs = sources.read_glyphs()?;
    let accidentals = sources.read_accidentals()?;
    let profiles = sources.load_profiles()?;
    Ok(audit(glyphs, accidentals, &profiles))
}

pub fn registry_stats(glyphs: &Path) -> Result<RegistryStats> {
    Ok(load_registry(glyphs)?.stats())
}
