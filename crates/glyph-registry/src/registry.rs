//! The master glyph registry.
//!
//! Loading validates the raw catalog and builds every lookup index once:
//! - name and codepoint indices (the name/codepoint bijection)
//! - the class index, with nested class declarations expanded
//! - reverse alternate links, after rejecting cyclic or overly deep chains
//!
//! The registry is immutable after a successful load.

use std::{
    collections::{BTreeSet, HashMap},
    result,
};

use indexmap::IndexMap;
use log::{debug, warn};

use crate::{
    error::{Error, ReferenceKind, Result},
    glyph::{GlyphEntry, RawCatalog},
    stats::RegistryStats,
    types::{ClassTag, Codepoint, GlyphName},
};

/// Longest alternate chain accepted (base -> alternate -> alternate ...).
pub const MAX_ALTERNATE_DEPTH: usize = 16;

#[derive(Debug, Clone)]
pub struct MasterRegistry {
    /// Glyphs sorted by codepoint.
    glyphs: Vec<GlyphEntry>,
    by_name: HashMap<GlyphName, usize>,
    by_codepoint: HashMap<Codepoint, usize>,
    /// Declared classes in declaration order, members as glyph indices.
    classes: IndexMap<ClassTag, BTreeSet<usize>>,
}

impl MasterRegistry {
    /// Parse and load a `glyphs.json` document.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::load(RawCatalog::from_json(json)?)
    }

    /// Load a raw catalog, failing with the first defect found.
    pub fn load(raw: RawCatalog) -> Result<Self> {
        Self::load_collecting(raw).map_err(|mut errors| errors.swap_remove(0))
    }

    /// Load a raw catalog, reporting every defect instead of the first one.
    ///
    /// The returned error list is never empty.
    pub fn load_collecting(raw: RawCatalog) -> result::Result<Self, Vec<Error>> {
        let RawCatalog { glyphs: raw_glyphs, classes: declared } = raw;
        let mut errors = Vec::new();

        let mut glyphs: Vec<GlyphEntry> = Vec::with_capacity(raw_glyphs.len());
        let mut seen_names: HashMap<GlyphName, usize> = HashMap::new();
        let mut seen_codepoints: HashMap<Codepoint, usize> = HashMap::new();

        for (i, raw) in raw_glyphs.into_iter().enumerate() {
            if raw.name.trim().is_empty() {
                errors.push(Error::EmptyName(i));
                continue;
            }
            if raw.codepoint.to_char().is_none() {
                errors.push(Error::InvalidCodepoint { glyph: raw.name, codepoint: raw.codepoint });
                continue;
            }
            if seen_names.contains_key(&raw.name) {
                errors.push(Error::DuplicateName(raw.name));
                continue;
            }
            if let Some(&first) = seen_codepoints.get(&raw.codepoint) {
                errors.push(Error::DuplicateCodepoint {
                    codepoint: raw.codepoint,
                    first: glyphs[first].name.clone(),
                    second: raw.name,
                });
                continue;
            }
            seen_names.insert(raw.name.clone(), glyphs.len());
            seen_codepoints.insert(raw.codepoint, glyphs.len());
            glyphs.push(GlyphEntry::from_raw(raw));
        }

        glyphs.sort_by_key(|g| g.codepoint);
        let by_name: HashMap<GlyphName, usize> =
            glyphs.iter().enumerate().map(|(i, g)| (g.name.clone(), i)).collect();
        let by_codepoint: HashMap<Codepoint, usize> =
            glyphs.iter().enumerate().map(|(i, g)| (g.codepoint, i)).collect();

        check_references(&glyphs, &by_name, &mut errors);
        let classes = build_class_index(&mut glyphs, &declared, &by_name, &mut errors);
        link_alternates(&mut glyphs, &by_name, &mut errors);
        check_alternate_chains(&glyphs, &by_name, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        fill_descriptions(&mut glyphs, &by_name);

        let registry = Self { glyphs, by_name, by_codepoint, classes };
        registry.log_warnings();
        Ok(registry)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&GlyphEntry> {
        self.by_name.get(name).map(|&i| &self.glyphs[i])
    }

    pub fn lookup_by_codepoint(&self, codepoint: Codepoint) -> Option<&GlyphEntry> {
        self.by_codepoint.get(&codepoint).map(|&i| &self.glyphs[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Members of a class in codepoint order; empty for an undeclared tag.
    pub fn glyphs_in_class<'a>(&'a self, tag: &str) -> impl Iterator<Item = &'a GlyphEntry> + 'a {
        self.classes
            .get(tag)
            .into_iter()
            .flat_map(|members| members.iter().map(|&i| &self.glyphs[i]))
    }

    pub fn has_class(&self, tag: &str) -> bool {
        self.classes.contains_key(tag)
    }

    /// Declared class tags in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassTag> {
        self.classes.keys()
    }

    /// All glyphs in codepoint order.
    pub fn glyphs(&self) -> &[GlyphEntry] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Follow `alternate_of` links up to the glyph that is not itself an alternate.
    pub fn root_base(&self, name: &str) -> Option<&GlyphEntry> {
        let mut current = self.lookup_by_name(name)?;
        while let Some(base) = current.alternate_of.as_deref().and_then(|b| self.lookup_by_name(b)) {
            current = base;
        }
        Some(current)
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats::collect(&self.glyphs)
    }

    fn log_warnings(&self) {
        for glyph in &self.glyphs {
            if glyph.block.is_none() {
                warn!("{}: {} is not in an expected block", glyph.name, glyph.codepoint);
            }
            if glyph.description.is_empty() {
                warn!("{}: missing description", glyph.name);
            }
        }
        debug!("Loaded {} glyphs in {} classes", self.glyphs.len(), self.classes.len());
    }
}

fn check_references(glyphs: &[GlyphEntry], by_name: &HashMap<GlyphName, usize>, errors: &mut Vec<Error>) {
    for glyph in glyphs {
        for alternate in &glyph.alternates {
            if !by_name.contains_key(alternate) {
                errors.push(dangling(&glyph.name, alternate, ReferenceKind::Alternate));
            }
        }
        for component in &glyph.ligature {
            if component == &glyph.name {
                errors.push(Error::SelfLigature(glyph.name.clone()));
            } else if !by_name.contains_key(component) {
                errors.push(dangling(&glyph.name, component, ReferenceKind::LigatureComponent));
            }
        }
    }
}

fn dangling(from: &str, to: &str, kind: ReferenceKind) -> Error {
    Error::DanglingReference { from: from.to_string(), to: to.to_string(), kind }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Expand nested class declarations and merge them with glyph-side class lists.
///
/// Afterwards every glyph's `classes` equals the set of classes whose index
/// contains it.
fn build_class_index(
    glyphs: &mut [GlyphEntry],
    declared: &IndexMap<ClassTag, Vec<String>>,
    by_name: &HashMap<GlyphName, usize>,
    errors: &mut Vec<Error>,
) -> IndexMap<ClassTag, BTreeSet<usize>> {
    let mut direct: HashMap<&ClassTag, BTreeSet<usize>> = HashMap::new();
    for (i, glyph) in glyphs.iter().enumerate() {
        for tag in &glyph.classes {
            match declared.get_key_value(tag) {
                Some((key, _)) => {
                    direct.entry(key).or_default().insert(i);
                }
                None => errors.push(Error::UndeclaredClass {
                    glyph: glyph.name.clone(),
                    class: tag.clone(),
                }),
            }
        }
    }

    let mut expander = ClassExpander {
        declared,
        by_name,
        direct,
        expanded: HashMap::new(),
        visits: HashMap::new(),
        stack: Vec::new(),
        errors,
    };
    for tag in declared.keys() {
        expander.expand(tag);
    }
    let mut expanded = expander.expanded;

    let index: IndexMap<ClassTag, BTreeSet<usize>> = declared
        .keys()
        .map(|tag| (tag.clone(), expanded.remove(tag).unwrap_or_default()))
        .collect();

    for glyph in glyphs.iter_mut() {
        glyph.classes.clear();
    }
    for (tag, members) in &index {
        for &i in members {
            glyphs[i].classes.insert(tag.clone());
        }
    }
    index
}

struct ClassExpander<'a, 'e> {
    declared: &'a IndexMap<ClassTag, Vec<String>>,
    by_name: &'a HashMap<GlyphName, usize>,
    /// Members named directly, by the class itself or by the glyph's class list.
    direct: HashMap<&'a ClassTag, BTreeSet<usize>>,
    expanded: HashMap<&'a ClassTag, BTreeSet<usize>>,
    visits: HashMap<&'a ClassTag, Visit>,
    stack: Vec<&'a ClassTag>,
    errors: &'e mut Vec<Error>,
}

impl<'a> ClassExpander<'a, '_> {
    fn expand(&mut self, tag: &'a ClassTag) -> BTreeSet<usize> {
        match self.visits.get(tag) {
            Some(Visit::Done) => return self.expanded.get(tag).cloned().unwrap_or_default(),
            Some(Visit::InProgress) => {
                let start = self.stack.iter().position(|t| *t == tag).unwrap_or_default();
                let mut path: Vec<&str> = self.stack[start..].iter().map(|t| t.as_str()).collect();
                path.push(tag.as_str());
                self.errors.push(Error::ClassCycle { class: tag.clone(), path: path.join(" -> ") });
                return BTreeSet::new();
            }
            None => {}
        }

        self.visits.insert(tag, Visit::InProgress);
        self.stack.push(tag);

        let declared = self.declared;
        let mut members = self.direct.get(tag).cloned().unwrap_or_default();
        for member in declared.get(tag).map(Vec::as_slice).unwrap_or_default() {
            if let Some((nested, _)) = declared.get_key_value(member.as_str()) {
                members.extend(self.expand(nested));
            } else if let Some(&i) = self.by_name.get(member.as_str()) {
                members.insert(i);
            } else {
                self.errors.push(dangling(tag, member, ReferenceKind::ClassMember));
            }
        }

        self.stack.pop();
        self.visits.insert(tag, Visit::Done);
        self.expanded.insert(tag, members.clone());
        members
    }
}

/// Record each alternate's base glyph; an alternate may have only one base.
fn link_alternates(glyphs: &mut [GlyphEntry], by_name: &HashMap<GlyphName, usize>, errors: &mut Vec<Error>) {
    let mut links: Vec<(usize, GlyphName)> = Vec::new();
    for glyph in glyphs.iter() {
        for alternate in &glyph.alternates {
            if let Some(&i) = by_name.get(alternate) {
                links.push((i, glyph.name.clone()));
            }
        }
    }

    for (i, base) in links {
        match &glyphs[i].alternate_of {
            Some(first) if *first != base => errors.push(Error::AmbiguousAlternate {
                alternate: glyphs[i].name.clone(),
                first: first.clone(),
                second: base,
            }),
            Some(_) => {}
            None => glyphs[i].alternate_of = Some(base),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    /// Longest alternate chain below the glyph, in links.
    Done(usize),
    Failed,
}

/// Treat alternates as a directed graph and reject cycles and over-deep chains.
fn check_alternate_chains(glyphs: &[GlyphEntry], by_name: &HashMap<GlyphName, usize>, errors: &mut Vec<Error>) {
    let mut marks = vec![Mark::Unvisited; glyphs.len()];
    let mut path = Vec::new();

    for start in 0..glyphs.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        if let Err(e) = visit_alternates(start, glyphs, by_name, &mut marks, &mut path) {
            errors.push(e);
            for &i in &path {
                marks[i] = Mark::Failed;
            }
        }
        path.clear();
    }
}

/// Depth-first walk returning the height of the alternate chain below `node`.
///
/// `path` holds the glyphs above `node`, so `path.len()` is its depth.
fn visit_alternates(
    node: usize,
    glyphs: &[GlyphEntry],
    by_name: &HashMap<GlyphName, usize>,
    marks: &mut [Mark],
    path: &mut Vec<usize>,
) -> Result<usize> {
    let too_deep = |path: &[usize]| Error::AlternateDepthExceeded {
        glyph: glyphs[path.first().copied().unwrap_or(node)].name.clone(),
        max: MAX_ALTERNATE_DEPTH,
    };

    match marks[node] {
        Mark::Failed => return Ok(0),
        Mark::Done(height) if path.len() + height > MAX_ALTERNATE_DEPTH => return Err(too_deep(path.as_slice())),
        Mark::Done(height) => return Ok(height),
        Mark::InProgress => {
            let start = path.iter().position(|&i| i == node).unwrap_or_default();
            let mut names: Vec<&str> = path[start..].iter().map(|&i| glyphs[i].name.as_str()).collect();
            names.push(glyphs[node].name.as_str());
            return Err(Error::AlternateCycle {
                glyph: glyphs[node].name.clone(),
                path: names.join(" -> "),
            });
        }
        Mark::Unvisited => {}
    }

    if path.len() > MAX_ALTERNATE_DEPTH {
        return Err(too_deep(path.as_slice()));
    }

    marks[node] = Mark::InProgress;
    path.push(node);
    let mut height = 0;
    for alternate in &glyphs[node].alternates {
        if let Some(&next) = by_name.get(alternate) {
            height = height.max(1 + visit_alternates(next, glyphs, by_name, marks, path)?);
        }
    }
    path.pop();
    marks[node] = Mark::Done(height);
    Ok(height)
}

/// Derive missing descriptions from ligature components, then from the base
/// glyph of an alternate.
fn fill_descriptions(glyphs: &mut [GlyphEntry], by_name: &HashMap<GlyphName, usize>) {
    let from_ligatures: Vec<(usize, String)> = glyphs
        .iter()
        .enumerate()
        .filter(|(_, g)| g.description.is_empty() && g.is_ligature())
        .map(|(i, g)| {
            let parts: Vec<&str> = g
                .ligature
                .iter()
                .filter_map(|c| by_name.get(c))
                .map(|&c| glyphs[c].description.as_str())
                .filter(|d| !d.is_empty())
                .collect();
            (i, parts.join(", "))
        })
        .collect();
    for (i, description) in from_ligatures {
        glyphs[i].description = description;
    }

    let from_bases: Vec<(usize, String)> = glyphs
        .iter()
        .enumerate()
        .filter(|(_, g)| g.description.is_empty())
        .filter_map(|(i, g)| {
            let mut base = g.alternate_of.as_ref();
            while let Some(&b) = base.and_then(|b| by_name.get(b)) {
                if !glyphs[b].description.is_empty() {
                    return Some((i, glyphs[b].description.clone()));
                }
                base = glyphs[b].alternate_of.as_ref();
            }
            None
        })
        .collect();
    for (i, description) in from_bases {
        glyphs[i].description = description;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::RawGlyph;

    fn sample() -> RawCatalog {
        RawCatalog::default()
            .with_glyph(
                RawGlyph::new("accidentalSharp", 0xE262)
                    .with_description("Sharp")
                    .with_classes(["accidentalsStandard"])
                    .with_alternates(["accidentalSharpSmall"]),
            )
            .with_glyph(RawGlyph::new("accidentalFlat", 0xE260).with_description("Flat"))
            .with_glyph(RawGlyph::new("accidentalSharpSmall", 0xF427))
            .with_glyph(RawGlyph::new("arrowUp", 0xE2C0).with_description("Arrow up"))
            .with_class("accidentalsStandard", ["accidentalFlat"])
            .with_class("accidentals", ["accidentalsStandard", "arrowUp"])
    }

    #[test]
    fn test_load_and_lookup() {
        let registry = MasterRegistry::load(sample()).unwrap();
        assert_eq!(registry.len(), 4);

        let sharp = registry.lookup_by_name("accidentalSharp").unwrap();
        assert_eq!(sharp.codepoint(), Codepoint::new(0xE262));
        let by_cp = registry.lookup_by_codepoint(Codepoint::new(0xE262)).unwrap();
        assert_eq!(by_cp.name(), "accidentalSharp");
        assert!(registry.lookup_by_name("accidentalNatural").is_none());
    }

    #[test]
    fn test_glyphs_sorted_by_codepoint() {
        let registry = MasterRegistry::load(sample()).unwrap();
        let codepoints: Vec<u32> = registry.glyphs().iter().map(|g| g.codepoint().to_u32()).collect();
        assert_eq!(codepoints, [0xE260, 0xE262, 0xE2C0, 0xF427]);
    }

    #[test]
    fn test_nested_classes_expand() {
        let registry = MasterRegistry::load(sample()).unwrap();
        let names: Vec<&str> = registry.glyphs_in_class("accidentals").map(|g| g.name().as_str()).collect();
        assert_eq!(names, ["accidentalFlat", "accidentalSharp", "arrowUp"]);

        let flat = registry.lookup_by_name("accidentalFlat").unwrap();
        let classes: Vec<&str> = flat.classes().iter().map(|c| c.as_str()).collect();
        assert_eq!(classes, ["accidentals", "accidentalsStandard"]);
        assert_eq!(registry.glyphs_in_class("undeclared").count(), 0);
        assert!(registry.has_class("accidentalsStandard"));
        assert!(!registry.has_class("undeclared"));
    }

    #[test]
    fn test_alternate_description_fallback() {
        let registry = MasterRegistry::load(sample()).unwrap();
        let small = registry.lookup_by_name("accidentalSharpSmall").unwrap();
        assert_eq!(small.alternate_of().map(|n| n.as_str()), Some("accidentalSharp"));
        assert_eq!(small.description(), "Sharp");
        assert_eq!(registry.root_base("accidentalSharpSmall").unwrap().name(), "accidentalSharp");
    }

    #[test]
    fn test_ligature_description_fallback() {
        let raw = sample().with_glyph(
            RawGlyph::new("ekmSharpArrowUp", 0xF700).with_ligature(["accidentalSharp", "arrowUp"]),
        );
        let registry = MasterRegistry::load(raw).unwrap();
        let ligature = registry.lookup_by_name("ekmSharpArrowUp").unwrap();
        assert!(ligature.is_ligature());
        assert_eq!(ligature.description(), "Sharp, Arrow up");
    }

    #[test]
    fn test_duplicate_codepoint() {
        let raw = sample().with_glyph(RawGlyph::new("sharpCopy", 0xE262));
        let err = MasterRegistry::load(raw).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateCodepoint { ref first, ref second, .. }
                if first == "accidentalSharp" && second == "sharpCopy"
        ));
    }

    #[test]
    fn test_duplicate_name() {
        let raw = sample().with_glyph(RawGlyph::new("arrowUp", 0xE2C1));
        assert!(matches!(MasterRegistry::load(raw), Err(Error::DuplicateName(n)) if n == "arrowUp"));
    }

    #[test]
    fn test_invalid_codepoint() {
        let raw = sample().with_glyph(RawGlyph::new("surrogate", 0xD800));
        assert!(matches!(MasterRegistry::load(raw), Err(Error::InvalidCodepoint { .. })));
    }

    #[test]
    fn test_undeclared_class() {
        let raw = sample().with_glyph(RawGlyph::new("arrowDown", 0xE2C1).with_classes(["arrows"]));
        assert!(matches!(
            MasterRegistry::load(raw),
            Err(Error::UndeclaredClass { class, .. }) if class == "arrows"
        ));
    }

    #[test]
    fn test_dangling_class_member() {
        let raw = sample().with_class("broken", ["noSuchGlyph"]);
        let err = MasterRegistry::load(raw).unwrap_err();
        assert!(err.is_dangling_reference());
    }

    #[test]
    fn test_class_cycle() {
        let raw = sample().with_class("a", ["b"]).with_class("b", ["a"]);
        let errors = MasterRegistry::load_collecting(raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], Error::ClassCycle { path, .. } if path == "a -> b -> a"));
    }

    #[test]
    fn test_dangling_alternate() {
        let raw = sample().with_glyph(RawGlyph::new("arrowDown", 0xE2C1).with_alternates(["arrowDownSmall"]));
        assert!(matches!(
            MasterRegistry::load(raw),
            Err(Error::DanglingReference { kind: ReferenceKind::Alternate, .. })
        ));
    }

    #[test]
    fn test_alternate_cycle() {
        let raw = RawCatalog::default()
            .with_glyph(RawGlyph::new("a", 0xE000).with_alternates(["b"]))
            .with_glyph(RawGlyph::new("b", 0xE001).with_alternates(["c"]))
            .with_glyph(RawGlyph::new("c", 0xE002).with_alternates(["b"]));
        let errors = MasterRegistry::load_collecting(raw).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, Error::AlternateCycle { path, .. } if path == "b -> c -> b")));
    }

    #[test]
    fn test_self_alternate_is_a_cycle() {
        let raw = RawCatalog::default().with_glyph(RawGlyph::new("a", 0xE000).with_alternates(["a"]));
        assert!(matches!(MasterRegistry::load(raw), Err(Error::AlternateCycle { .. })));
    }

    #[test]
    fn test_alternate_depth_bound() {
        let mut raw = RawCatalog::default();
        for i in 0..=MAX_ALTERNATE_DEPTH as u32 {
            raw = raw.with_glyph(RawGlyph::new(format!("g{i}"), 0xE000 + i).with_alternates([format!("g{}", i + 1)]));
        }
        raw = raw.with_glyph(RawGlyph::new(format!("g{}", MAX_ALTERNATE_DEPTH + 1), 0xE100));
        assert!(matches!(
            MasterRegistry::load(raw),
            Err(Error::AlternateDepthExceeded { glyph, .. }) if glyph == "g0"
        ));
    }

    #[test]
    fn test_chain_at_depth_limit_is_accepted() {
        let mut raw = RawCatalog::default();
        for i in 0..MAX_ALTERNATE_DEPTH as u32 {
            raw = raw.with_glyph(RawGlyph::new(format!("g{i}"), 0xE000 + i).with_alternates([format!("g{}", i + 1)]));
        }
        raw = raw.with_glyph(RawGlyph::new(format!("g{MAX_ALTERNATE_DEPTH}"), 0xE100));
        assert!(MasterRegistry::load(raw).is_ok());
    }

    #[test]
    fn test_ambiguous_alternate() {
        let raw = RawCatalog::default()
            .with_glyph(RawGlyph::new("a", 0xE000).with_alternates(["x"]))
            .with_glyph(RawGlyph::new("b", 0xE001).with_alternates(["x"]))
            .with_glyph(RawGlyph::new("x", 0xE002));
        assert!(matches!(MasterRegistry::load(raw), Err(Error::AmbiguousAlternate { .. })));
    }

    #[test]
    fn test_self_ligature() {
        let raw = sample().with_glyph(RawGlyph::new("loop", 0xE2C2).with_ligature(["arrowUp", "loop"]));
        let err = MasterRegistry::load(raw).unwrap_err();
        assert!(matches!(&err, Error::SelfLigature(name) if name == "loop"));
        assert!(!err.is_dangling_reference());
        assert_eq!(err.to_string(), "'loop' lists itself as a ligature component");
    }

    #[test]
    fn test_collects_all_defects() {
        let raw = sample()
            .with_glyph(RawGlyph::new("sharpCopy", 0xE262))
            .with_glyph(RawGlyph::new("arrowDown", 0xE2C1).with_classes(["arrows"]))
            .with_glyph(RawGlyph::new("ligature", 0xE2C2).with_ligature(["missing"]));
        let errors = MasterRegistry::load_collecting(raw).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{ "glyphs": [ { "name": "accidentalSharp", "codepoint": "U+E262" } ] }"#;
        let registry = MasterRegistry::from_json(json).unwrap();
        assert!(registry.contains("accidentalSharp"));
        assert!(matches!(MasterRegistry::from_json("{"), Err(Error::Malformed(_))));
    }
}
