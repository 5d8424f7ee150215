//! Integrity checks over derived manifests
//!
//! Validation never stops at the first problem: every violation found in a
//! manifest is recorded in a [`ValidationReport`], tagged with the variant it
//! was found in and a [`Severity`].

use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use ekmelos_accidentals::Alteration;
use ekmelos_glyph_registry::{Codepoint, GlyphName, MasterRegistry};

use crate::manifest::VariantManifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConsistencyError {
    #[error(transparent)]
    Registry(#[from] ekmelos_glyph_registry::Error),

    #[error(transparent)]
    Catalog(#[from] ekmelos_accidentals::Error),

    #[error("no accidental defined for required value {value}")]
    UnsatisfiableValue { value: Alteration },

    #[error("codepoint {codepoint} is shared by {}", names(glyphs))]
    DuplicateCodepoint { codepoint: Codepoint, glyphs: Vec<GlyphName> },

    #[error("'{0}' is not in the master registry")]
    UnknownGlyph(GlyphName),

    #[error("'{glyph}' is at {found} but the master assigns {expected}")]
    CodepointMismatch { glyph: GlyphName, expected: Codepoint, found: Codepoint },

    #[error("alternate '{alternate}' of '{glyph}' is not included")]
    MissingAlternate { glyph: GlyphName, alternate: GlyphName },

    #[error("accidental {alteration} needs '{glyph}', which is not included")]
    PartialRealization { alteration: Alteration, glyph: GlyphName },

    #[error("ligature '{glyph}' needs component '{component}', which is not included")]
    MissingLigatureComponent { glyph: GlyphName, component: GlyphName },
}

impl ConsistencyError {
    /// Subset fonts drop stylistic alternates on purpose, so a missing
    /// alternate only warns; everything else fails the build.
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingAlternate { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

fn names(glyphs: &[GlyphName]) -> String {
    glyphs.iter().map(|g| format!("'{g}'")).collect::<Vec<_>>().join(", ")
}

/// One recorded violation and where it was found.
#[derive(Debug)]
pub struct Issue {
    pub scope: String,
    pub error: ConsistencyError,
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.error.severity()
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity(), self.scope, self.error)
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: impl Into<String>, error: impl Into<ConsistencyError>) {
        self.issues.push(Issue { scope: scope.into(), error: error.into() });
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{issue}")?;
        }
        write!(f, "{} error(s), {} warning(s)", self.error_count(), self.warning_count())
    }
}

/// Cross-check a manifest against the master registry.
///
/// Checked:
/// - no two included glyphs share a codepoint
/// - every included glyph exists in the master at the same codepoint
/// - alternates of included glyphs are included (warning only)
/// - every resolved accidental and every ligature is complete
///
/// Class tags need no check of their own: a loaded registry has already
/// rejected undeclared tags and rebuilt every glyph's tag set from the class
/// index. A class may keep members the variant leaves out, as long as no
/// included accidental or ligature still needs them, which the last check
/// reports as [`ConsistencyError::PartialRealization`] or
/// [`ConsistencyError::MissingLigatureComponent`].
pub fn validate(manifest: &VariantManifest, registry: &MasterRegistry) -> ValidationReport {
    let mut report = ValidationReport::new();
    let scope = manifest.name();

    let mut by_codepoint: BTreeMap<Codepoint, Vec<GlyphName>> = BTreeMap::new();
    for (name, &codepoint) in manifest.codepoint_map() {
        by_codepoint.entry(codepoint).or_default().push(name.clone());
    }
    for (codepoint, glyphs) in by_codepoint.into_iter().filter(|(_, g)| g.len() > 1) {
        report.push(scope, ConsistencyError::DuplicateCodepoint { codepoint, glyphs });
    }

    for (name, &found) in manifest.codepoint_map() {
        let Some(entry) = registry.lookup_by_name(name) else {
            report.push(scope, ConsistencyError::UnknownGlyph(name.clone()));
            continue;
        };
        if entry.codepoint() != found {
            report.push(
                scope,
                ConsistencyError::CodepointMismatch { glyph: name.clone(), expected: entry.codepoint(), found },
            );
        }

        for alternate in entry.alternates().iter().filter(|a| !manifest.contains(a)) {
            report.push(
                scope,
                ConsistencyError::MissingAlternate { glyph: name.clone(), alternate: alternate.clone() },
            );
        }

        for component in entry.ligature().iter().filter(|c| !manifest.contains(c)) {
            report.push(
                scope,
                ConsistencyError::MissingLigatureComponent { glyph: name.clone(), component: component.clone() },
            );
        }
    }

    for (&alteration, glyphs) in manifest.resolutions() {
        for glyph in glyphs.iter().filter(|g| !manifest.contains(g)) {
            report.push(scope, ConsistencyError::PartialRealization { alteration, glyph: glyph.clone() });
        }
    }

    report
}
