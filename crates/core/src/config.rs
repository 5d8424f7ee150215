//! Configuration constants for Ekmelos metadata builds.

/// Font family name used in exported manifests and LilyPond maps.
pub const FAMILY_NAME: &str = "Ekmelos";

/// Directory holding the metadata sources, relative to the working directory.
pub const DEFAULT_METADATA_DIR: &str = "metadata";

/// Output directory for exported variant metadata.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Master glyph catalog.
pub const GLYPHS_FILENAME: &str = "glyphs.json";

/// Accidental definitions.
pub const ACCIDENTALS_FILENAME: &str = "accidentals.json";

/// Glob pattern for EDO profile files; `profiles.json` plus any `profiles-*.json`.
pub const PROFILES_PATTERN: &str = "profiles*.json";

/// Selector that picks the master manifest in `derive`.
pub const MASTER_SELECTOR: &str = "master";
