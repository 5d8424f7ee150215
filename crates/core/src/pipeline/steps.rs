//! Pipeline step definitions.

use std::{collections::HashSet, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use ekmelos_accidentals::{AccidentalCatalog, EdoProfile};
use ekmelos_glyph_registry::MasterRegistry;
use ekmelos_manifest::ExportFormat;
use ekmelos_variant::{
    Error as DeriveError, Severity, ValidationReport, VariantManifest, VariantSelector, validate,
};
use log::{error, warn};
use rayon::prelude::*;

use super::{BuildSummary, PipelineContext};
use crate::{
    io::MetadataFile,
    parallel::{collect_parallel, process_parallel_iter},
};

pub type PipelineStep = (&'static str, fn(&PipelineContext, &mut BuildState) -> Result<()>);

pub const BUILD_STEPS: &[PipelineStep] = &[
    ("load-glyphs", step_load_glyphs),
    ("load-accidentals", step_load_accidentals),
    ("load-profiles", step_load_profiles),
    ("derive-variants", step_derive_variants),
    ("validate", step_validate),
    ("export", step_export),
];

/// Data handed from one build step to the next.
#[derive(Debug, Default)]
pub struct BuildState {
    registry: Option<Arc<MasterRegistry>>,
    catalog: Option<Arc<AccidentalCatalog>>,
    profiles: Vec<EdoProfile>,
    /// Master first, then one per satisfiable profile.
    manifests: Vec<VariantManifest>,
    unsatisfiable: Vec<DeriveError>,
    /// One report per manifest, same order.
    reports: Vec<ValidationReport>,
    written: Vec<PathBuf>,
}

impl BuildState {
    fn registry(&self) -> Result<Arc<MasterRegistry>> {
        self.registry.clone().context("Glyph catalog has not been loaded")
    }

    fn catalog(&self) -> Result<Arc<AccidentalCatalog>> {
        self.catalog.clone().context("Accidental catalog has not been loaded")
    }

    /// Manifests whose validation found no errors.
    fn passing(&self) -> impl Iterator<Item = &VariantManifest> {
        self.manifests
            .iter()
            .zip(&self.reports)
            .filter(|(_, report)| !report.has_errors())
            .map(|(manifest, _)| manifest)
    }

    /// Unsatisfiable profiles plus manifests with errors.
    pub fn failures(&self) -> usize {
        self.unsatisfiable.len() + self.reports.iter().filter(|r| r.has_errors()).count()
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            written: self.written.clone(),
            variants: self.passing().map(|m| m.name().to_string()).collect(),
            warnings: self.reports.iter().map(ValidationReport::warning_count).sum(),
        }
    }
}

fn step_load_glyphs(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let registry = ctx.sources.load_registry()?;
    let stats = registry.stats();
    println!(
        "  {} glyphs ({} SMuFL, {} Unicode), {} classes",
        stats.total,
        stats.smufl(),
        stats.unicode(),
        registry.classes().count()
    );
    state.registry = Some(Arc::new(registry));
    Ok(())
}

fn step_load_accidentals(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let registry = state.registry()?;
    let catalog = ctx.sources.load_catalog(&registry)?;
    let composites = catalog.definitions().filter(|d| d.realization().is_composite()).count();
    println!("  {} accidentals ({composites} composite)", catalog.len());
    state.catalog = Some(Arc::new(catalog));
    Ok(())
}

fn step_load_profiles(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    state.profiles = ctx.sources.load_profiles()?;
    for profile in &state.profiles {
        println!("  {}: {} values", profile.name(), profile.required_values().len());
    }
    Ok(())
}

fn step_derive_variants(_ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let registry = state.registry()?;
    let catalog = state.catalog()?;

    println!("  Deriving master + {} profiles...", state.profiles.len());
    let results = collect_parallel(&state.profiles, |profile| {
        VariantSelector::new(&registry, &catalog).derive(profile)
    });

    state.manifests = vec![VariantManifest::master(&registry, &catalog)];
    for result in results {
        match result {
            Ok(manifest) => {
                println!("  {}: {} glyphs", manifest.name(), manifest.len());
                state.manifests.push(manifest);
            }
            Err(e) => {
                error!("{e}");
                state.unsatisfiable.push(e);
            }
        }
    }
    Ok(())
}

fn step_validate(_ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let registry = state.registry()?;
    state.reports = state.manifests.par_iter().map(|manifest| validate(manifest, &registry)).collect();

    for (manifest, report) in state.manifests.iter().zip(&state.reports) {
        for issue in report.issues() {
            match issue.severity() {
                Severity::Error => error!("{issue}"),
                Severity::Warning => warn!("{issue}"),
            }
        }
        println!(
            "  {}: {} error(s), {} warning(s)",
            manifest.name(),
            report.error_count(),
            report.warning_count()
        );
    }
    Ok(())
}

fn step_export(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let registry = state.registry()?;
    let exporter = ctx.exporter(&registry);

    let jobs: Vec<(&VariantManifest, ExportFormat)> = state
        .passing()
        .flat_map(|manifest| ExportFormat::ALL.into_iter().map(move |format| (manifest, format)))
        .collect();
    let targets: Vec<PathBuf> = jobs
        .iter()
        .map(|(manifest, format)| ctx.variant_dir(manifest).join(format.file_name(&exporter.font_name(manifest))))
        .collect();
    let mut seen = HashSet::new();
    if let Some(duplicate) = targets.iter().find(|target| !seen.insert(*target)) {
        bail!("{} would be written by more than one variant", duplicate.display());
    }

    let result = process_parallel_iter("export", jobs.iter().zip(&targets), |((manifest, format), target)| {
        let contents = exporter
            .export(manifest, *format)
            .with_context(|| format!("Failed to export {} as {format}", manifest.name()))?;
        MetadataFile::new(target).write(contents)
    });
    result.ok_or_bail("export")?;

    state.written = targets;
    Ok(())
}
