//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ekmelos_core::{
    ExportFormat, MetadataSources, PipelineContext,
    config::{ACCIDENTALS_FILENAME, DEFAULT_DIST_DIR, DEFAULT_METADATA_DIR, GLYPHS_FILENAME, PROFILES_PATTERN},
};

use crate::commands::{build, check, derive, stats};

#[derive(Parser)]
#[command(name = "ekmelos-meta")]
#[command(about = "Derive, validate and export Ekmelos variant metadata")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the metadata sources live.
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    #[arg(long, default_value = DEFAULT_METADATA_DIR)]
    pub metadata_dir: PathBuf,
    /// Glyph catalog, relative to the metadata directory
    #[arg(long, default_value = GLYPHS_FILENAME)]
    pub glyphs: String,
    /// Accidental definitions, relative to the metadata directory
    #[arg(long, default_value = ACCIDENTALS_FILENAME)]
    pub accidentals: String,
    /// Glob for EDO profile files, relative to the metadata directory
    #[arg(long, default_value = PROFILES_PATTERN)]
    pub profiles: String,
}

impl SourceArgs {
    pub fn sources(&self) -> Result<MetadataSources> {
        MetadataSources::new(&self.metadata_dir, &self.glyphs, &self.accidentals, &self.profiles)
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
    #[arg(long, default_value = DEFAULT_DIST_DIR)]
    pub dist_dir: PathBuf,
    /// Metadata version (YYYY-MM-DD or YYYY-MM-DD.N), defaults to today
    #[arg(short, long)]
    pub version: Option<String>,
}

impl BuildArgs {
    pub fn context(self) -> Result<PipelineContext> {
        PipelineContext::new(self.sources.sources()?, self.dist_dir, self.version)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive, validate and export the master and every profile
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Print one variant to stdout
    Derive {
        /// Profile name, EDO denominator, or "master"
        #[arg(short, long)]
        profile: String,
        #[arg(short, long, default_value = "manifest", value_parser = parse_format)]
        format: ExportFormat,
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Audit the sources and report every defect
    Check {
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Unicode block statistics of the glyph catalog
    Stats {
        #[command(flatten)]
        sources: SourceArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build { args } => build(args)?,
            Commands::Derive { profile, format, args } => derive(args, &profile, format)?,
            Commands::Check { sources } => check(&sources)?,
            Commands::Stats { sources } => stats(&sources)?,
        }
        Ok(())
    }
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse::<ExportFormat>().map_err(|e| e.to_string())
}
