//! Export of derived variant manifests.
//!
//! All exports are pure: they return the serialized text and never touch the
//! filesystem. Output is byte-identical for the same manifest, registry and
//! version string.

mod error;
mod exporter;
mod format;

pub use error::{Error, Result};
pub use exporter::{DEFAULT_FAMILY, ManifestExporter, export};
pub use format::{ExportFormat, slug};
