//! Ekmelos Core - metadata build pipeline for the Ekmelos font family.

pub mod config;
pub mod io;
pub mod parallel;
pub mod pipeline;
pub mod sources;
pub mod version;

pub use ekmelos_manifest::ExportFormat;
pub use ekmelos_variant::ValidationReport;
pub use io::MetadataFile;
pub use parallel::BatchResult;
pub use pipeline::{BuildSummary, PipelineContext, build, check, derive_variant, registry_stats};
pub use sources::{Metadata, MetadataSources, load_registry};
pub use version::MetadataVersion;
