//! The glyph buffer shaped by substitution and positioning lookups.

use std::ops::Range;

use read_fonts::tables::gdef::GlyphClassDef;

use crate::GlyphId;

/// How a glyph's final position depends on an earlier glyph.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum Attachment {
    #[default]
    None,
    /// A mark attached to the glyph at `base`.
    ///
    /// The offsets of the mark are relative to the pen position of the
    /// base.
    Mark { base: usize },
    /// A glyph in a cursive chain whose vertical offset is relative to the
    /// glyph at `parent`.
    Cursive { parent: usize },
}

/// Positioning adjustments for a glyph, in font units with y up.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct GlyphPosition {
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub attachment: Attachment,
}

/// A single glyph in a [`GlyphCollection`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GlyphEntry {
    pub glyph_id: GlyphId,
    /// The first character this glyph was produced from.
    pub codepoint: char,
    /// Byte range in the source text.
    pub text_range: Range<usize>,
    pub class: GlyphClassDef,
    pub mark_attach_class: u16,
    /// Nonzero for ligatures, and for marks that were skipped over while
    /// forming one. Marks carry the id of the ligature they belong to.
    pub ligature_id: u16,
    /// For a mark inside a ligature, the index of the component it follows.
    pub ligature_component: u16,
    /// The number of glyphs a ligature was formed from; 1 otherwise.
    pub component_count: u16,
    pub position: GlyphPosition,
}

impl GlyphEntry {
    pub fn new(glyph_id: GlyphId, codepoint: char, text_range: Range<usize>) -> Self {
        Self {
            glyph_id,
            codepoint,
            text_range,
            class: GlyphClassDef::Unclassified,
            mark_attach_class: 0,
            ligature_id: 0,
            ligature_component: 0,
            component_count: 1,
            position: GlyphPosition::default(),
        }
    }

    pub fn with_class(mut self, class: GlyphClassDef, mark_attach_class: u16) -> Self {
        self.class = class;
        self.mark_attach_class = mark_attach_class;
        self
    }

    pub fn is_mark(&self) -> bool {
        self.class == GlyphClassDef::Mark
    }
}

/// The glyphs of a single run, in logical order.
///
/// Entries map to glyph positions rather than characters: ligatures shrink
/// the collection and multiple substitutions grow it, and every entry keeps
/// the range of source text it came from.
#[derive(Clone, Default, Debug)]
pub struct GlyphCollection {
    entries: Vec<GlyphEntry>,
    next_ligature_id: u16,
}

impl GlyphCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: GlyphEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GlyphEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[GlyphEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphEntry> + '_ {
        self.entries.iter()
    }

    pub fn glyph_id(&self, index: usize) -> Option<GlyphId> {
        self.entries.get(index).map(|entry| entry.glyph_id)
    }

    pub fn glyph_ids(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.entries.iter().map(|entry| entry.glyph_id)
    }

    /// Replace the glyph at `index`, keeping everything else about it.
    pub fn replace(&mut self, index: usize, glyph_id: GlyphId) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.glyph_id = glyph_id;
        }
    }

    /// Replace the glyph at `index` with a sequence of glyphs.
    ///
    /// Each new entry inherits the source entry's text range and properties.
    /// An empty sequence does nothing.
    pub fn replace_with_sequence(&mut self, index: usize, glyph_ids: &[GlyphId]) {
        let Some((first, rest)) = glyph_ids.split_first() else {
            return;
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        entry.glyph_id = *first;
        let template = entry.clone();
        let inserted = rest.iter().map(|glyph_id| GlyphEntry {
            glyph_id: *glyph_id,
            ..template.clone()
        });
        self.entries.splice(index + 1..index + 1, inserted);
    }

    /// Collapse the entries at `positions` into a single ligature glyph.
    ///
    /// `positions` must be ascending. The ligature replaces the first entry
    /// and spans the text of all components. Entries between the components
    /// that are not themselves components (skipped marks) stay in place and
    /// are tagged with the ligature's id and the index of the component
    /// they follow.
    pub fn ligate(&mut self, positions: &[usize], glyph_id: GlyphId) {
        let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
            return;
        };
        if last >= self.entries.len() {
            return;
        }
        self.next_ligature_id = self.next_ligature_id.wrapping_add(1).max(1);
        let ligature_id = self.next_ligature_id;
        let mut component = 0u16;
        for index in first + 1..last {
            if positions.contains(&index) {
                component += 1;
            } else {
                let mark = &mut self.entries[index];
                mark.ligature_id = ligature_id;
                mark.ligature_component = component;
            }
        }
        let start = positions
            .iter()
            .map(|&i| self.entries[i].text_range.start)
            .min()
            .unwrap_or_default();
        let end = positions
            .iter()
            .map(|&i| self.entries[i].text_range.end)
            .max()
            .unwrap_or_default();
        let head = &mut self.entries[first];
        head.glyph_id = glyph_id;
        head.text_range = start..end;
        head.ligature_id = ligature_id;
        head.ligature_component = 0;
        head.component_count = positions.len() as u16;
        for &index in positions[1..].iter().rev() {
            self.entries.remove(index);
        }
    }

    pub fn set_class(&mut self, index: usize, class: GlyphClassDef, mark_attach_class: u16) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.class = class;
            entry.mark_attach_class = mark_attach_class;
        }
    }

    pub fn position_mut(&mut self, index: usize) -> Option<&mut GlyphPosition> {
        self.entries.get_mut(index).map(|entry| &mut entry.position)
    }
}
