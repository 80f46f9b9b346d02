//! Skipping glyphs according to lookup flags.

use read_fonts::tables::{
    gdef::{Gdef, GlyphClassDef},
    layout::LookupFlag,
};

use crate::collection::{GlyphCollection, GlyphEntry};

/// Decides which glyphs a lookup can see.
///
/// Glyphs that are skipped are invisible to matching: they are stepped over
/// when looking for the next input, backtrack or lookahead glyph.
#[derive(Clone, Copy, Debug)]
pub struct LookupFilter<'a, 'f> {
    flag: LookupFlag,
    mark_filtering_set: Option<u16>,
    gdef: Option<&'f Gdef<'a>>,
}

impl<'a, 'f> LookupFilter<'a, 'f> {
    pub fn new(flag: LookupFlag, mark_filtering_set: Option<u16>, gdef: Option<&'f Gdef<'a>>) -> Self {
        Self {
            flag,
            mark_filtering_set,
            gdef,
        }
    }

    pub fn flag(&self) -> LookupFlag {
        self.flag
    }

    pub fn skips(&self, entry: &GlyphEntry) -> bool {
        match entry.class {
            GlyphClassDef::Base => self.flag.ignore_base_glyphs(),
            GlyphClassDef::Ligature => self.flag.ignore_ligatures(),
            GlyphClassDef::Mark => {
                if self.flag.ignore_marks() {
                    return true;
                }
                if let Some(set) = self.mark_filtering_set {
                    return !self
                        .gdef
                        .is_some_and(|gdef| gdef.is_mark_in_set(entry.glyph_id, set));
                }
                match self.flag.mark_attachment_type_mask() {
                    Some(class) => entry.mark_attach_class != class,
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// The first glyph after `index` that is not skipped.
    pub fn next_unskipped(&self, glyphs: &GlyphCollection, index: usize) -> Option<usize> {
        let entries = glyphs.entries();
        (index + 1..entries.len()).find(|&i| !self.skips(&entries[i]))
    }

    /// The last glyph before `index` that is not skipped.
    pub fn prev_unskipped(&self, glyphs: &GlyphCollection, index: usize) -> Option<usize> {
        let entries = glyphs.entries();
        (0..index.min(entries.len()))
            .rev()
            .find(|&i| !self.skips(&entries[i]))
    }
}
