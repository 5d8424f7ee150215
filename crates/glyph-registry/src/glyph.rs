//! Raw catalog input and validated glyph entries.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    block::UnicodeBlock,
    error::Result,
    types::{ClassTag, Codepoint, GlyphName},
};

/// One glyph as written in `glyphs.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGlyph {
    pub name: GlyphName,
    pub codepoint: Codepoint,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassTag>,
    /// Stylistic alternates, in preference order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<GlyphName>,
    /// Component glyphs if this glyph is a ligature.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ligature: Vec<GlyphName>,
}

impl RawGlyph {
    pub fn new(name: impl Into<GlyphName>, codepoint: u32) -> Self {
        Self {
            name: name.into(),
            codepoint: Codepoint::new(codepoint),
            description: String::new(),
            classes: Vec::new(),
            alternates: Vec::new(),
            ligature: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ClassTag>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn with_alternates<I, S>(mut self, alternates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<GlyphName>,
    {
        self.alternates.extend(alternates.into_iter().map(Into::into));
        self
    }

    pub fn with_ligature<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<GlyphName>,
    {
        self.ligature.extend(components.into_iter().map(Into::into));
        self
    }
}

/// The whole of `glyphs.json`: glyph list plus class declarations.
///
/// A class lists glyph names and/or other class tags; nested classes are
/// expanded when the registry is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCatalog {
    pub glyphs: Vec<RawGlyph>,
    #[serde(default)]
    pub classes: IndexMap<ClassTag, Vec<String>>,
}

impl RawCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_glyph(mut self, glyph: RawGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    pub fn with_class<I, S>(mut self, tag: impl Into<ClassTag>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.insert(tag.into(), members.into_iter().map(Into::into).collect());
        self
    }
}

/// A validated glyph of the master registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphEntry {
    pub(crate) name: GlyphName,
    pub(crate) codepoint: Codepoint,
    pub(crate) description: String,
    pub(crate) classes: BTreeSet<ClassTag>,
    pub(crate) alternates: Vec<GlyphName>,
    pub(crate) alternate_of: Option<GlyphName>,
    pub(crate) ligature: Vec<GlyphName>,
    pub(crate) block: Option<UnicodeBlock>,
}

impl GlyphEntry {
    pub(crate) fn from_raw(raw: RawGlyph) -> Self {
        let block = UnicodeBlock::of(raw.codepoint);
        Self {
            name: raw.name,
            codepoint: raw.codepoint,
            description: raw.description.trim().to_string(),
            classes: raw.classes.into_iter().collect(),
            alternates: raw.alternates,
            alternate_of: None,
            ligature: raw.ligature,
            block,
        }
    }

    pub fn name(&self) -> &GlyphName {
        &self.name
    }

    pub fn codepoint(&self) -> Codepoint {
        self.codepoint
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All classes the glyph belongs to, after nested class expansion.
    pub fn classes(&self) -> &BTreeSet<ClassTag> {
        &self.classes
    }

    pub fn alternates(&self) -> &[GlyphName] {
        &self.alternates
    }

    /// The glyph this one is a stylistic alternate of.
    pub fn alternate_of(&self) -> Option<&GlyphName> {
        self.alternate_of.as_ref()
    }

    pub fn ligature(&self) -> &[GlyphName] {
        &self.ligature
    }

    pub fn is_ligature(&self) -> bool {
        !self.ligature.is_empty()
    }

    pub fn block(&self) -> Option<UnicodeBlock> {
        self.block
    }

    /// SMuFL optional glyphs (U+F400-U+F8FF) are font-specific extensions.
    pub fn is_optional(&self) -> bool {
        self.block == Some(UnicodeBlock::SmuflOptional)
    }

    /// Whether the glyph counts as an accidental in the catalog statistics.
    ///
    /// Medieval and Renaissance accidentals (U+E9E0-U+E9EF) have no `accidental` prefix.
    pub fn is_accidental(&self) -> bool {
        self.block == Some(UnicodeBlock::SmuflRecommended)
            && (self.name.contains("accidental")
                || self.name.contains("accSagittal")
                || (0xE9E0..=0xE9EF).contains(&self.codepoint.to_u32()))
    }
}
