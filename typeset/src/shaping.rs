//! Applying `GSUB` and `GPOS` lookups.
//!
//! Shaping a run happens in two table passes. The [`ShapePlan`] for each
//! table selects a script and language system and gathers the lookups of
//! the enabled features. Each pass then walks the glyphs left to right and,
//! at every position, tries the selected lookups in order.
//!
//! Within a pass, a lookup that matches and consumes glyphs past the
//! current position moves the cursor past them. A lookup that only changes
//! the glyph under the cursor leaves it in place, so the lookups after it
//! still see the new glyph. No lookup ever runs twice at one position.
//!
//! After positioning, attached marks and cursive chains are resolved into
//! plain offsets.

mod context;
mod filter;
mod gpos;
mod gsub;
mod plan;

pub use filter::LookupFilter;
pub use plan::{LayoutTable, ShapePlan, DEFAULT_GPOS_FEATURES, DEFAULT_GSUB_FEATURES};

use read_fonts::{
    tables::{
        gdef::{Gdef, GlyphClassDef},
        gpos::Gpos,
        gsub::Gsub,
        layout::LookupList,
    },
    TopLevelTable,
};

use crate::{collection::GlyphCollection, Font, GlyphId, Tag};

/// The deepest chain of contextual lookups that will be followed.
pub const MAX_NESTING_LEVEL: usize = 64;

const MAX_OPS_FACTOR: usize = 64;
const MIN_OPS: usize = 1024;

/// The result of trying a lookup at one position.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MatchOutcome {
    NoMatch,
    /// The lookup applied. `next` is the position after the glyphs it
    /// consumed.
    Matched { changed: bool, next: usize },
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }
}

/// Script, language and feature selection for a run.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct ShapeOptions {
    /// An OpenType script tag to use instead of the run's Unicode script.
    pub script: Option<Tag>,
    /// An OpenType language system tag.
    pub language: Option<Tag>,
    /// Features to enable. When empty, the default features of each table
    /// are used.
    pub features: Vec<Tag>,
}

impl ShapeOptions {
    fn features_or<'s>(&'s self, defaults: &'s [Tag]) -> &'s [Tag] {
        if self.features.is_empty() {
            defaults
        } else {
            &self.features
        }
    }
}

/// Substitute and position the glyphs of a single run.
///
/// `unicode_script` is the ISO 15924 code of the run's script, such as
/// `Latn`. On return every glyph carries its advance and offsets in font
/// units.
pub fn shape(
    font: &Font,
    glyphs: &mut GlyphCollection,
    unicode_script: Tag,
    options: &ShapeOptions,
) {
    if glyphs.is_empty() {
        return;
    }
    if let Some(gsub) = font.gsub() {
        let features = options.features_or(DEFAULT_GSUB_FEATURES);
        let plan = ShapePlan::new(
            gsub,
            unicode_script,
            options.script,
            options.language,
            features,
        );
        apply_plan(Gsub::TAG, gsub.lookup_list(), font.gdef(), &plan, glyphs);
    }
    for index in 0..glyphs.len() {
        let Some(glyph_id) = glyphs.glyph_id(index) else {
            continue;
        };
        let advance = font.advance_width(glyph_id);
        if let Some(position) = glyphs.position_mut(index) {
            *position = crate::GlyphPosition {
                x_advance: advance as i32,
                ..Default::default()
            };
        }
    }
    if let Some(gpos) = font.gpos() {
        let features = options.features_or(DEFAULT_GPOS_FEATURES);
        let plan = ShapePlan::new(
            gpos,
            unicode_script,
            options.script,
            options.language,
            features,
        );
        apply_plan(Gpos::TAG, gpos.lookup_list(), font.gdef(), &plan, glyphs);
    }
    gpos::resolve_attachments(glyphs);
}

/// Run one table pass over the whole collection.
///
/// At each position the lookups are tried in index order. The first one
/// that matches ends the position and decides where the next one starts.
fn apply_plan<'a, T: ApplyLookup<'a>>(
    table: Tag,
    lookups: &LookupList<'a, T>,
    gdef: Option<&Gdef<'a>>,
    plan: &ShapePlan,
    glyphs: &mut GlyphCollection,
) {
    if plan.lookups().is_empty() {
        return;
    }
    let mut ctx = ApplyContext::new(table, lookups, gdef, glyphs.len());
    let mut cursor = 0;
    while cursor < glyphs.len() {
        let mut next = cursor + 1;
        for &lookup_index in plan.lookups() {
            if cursor >= glyphs.len() {
                break;
            }
            if let MatchOutcome::Matched { next: end, .. } =
                ctx.apply_lookup(lookup_index, glyphs, cursor, 0)
            {
                next = end.max(cursor + 1);
                break;
            }
            if ctx.is_exhausted() {
                return;
            }
        }
        cursor = next;
    }
}

/// A subtable that can be applied at a position.
pub(crate) trait ApplyLookup<'a>: Sized {
    fn try_apply(
        &self,
        ctx: &mut ApplyContext<'a, '_, Self>,
        glyphs: &mut GlyphCollection,
        filter: &LookupFilter<'a, '_>,
        cursor: usize,
        depth: usize,
    ) -> MatchOutcome;
}

/// State shared by every lookup applied during one table pass.
pub(crate) struct ApplyContext<'a, 'f, T> {
    table: Tag,
    lookups: &'f LookupList<'a, T>,
    gdef: Option<&'f Gdef<'a>>,
    ops_left: usize,
    exhausted: bool,
}

impl<'a, 'f, T: ApplyLookup<'a>> ApplyContext<'a, 'f, T> {
    pub(crate) fn new(
        table: Tag,
        lookups: &'f LookupList<'a, T>,
        gdef: Option<&'f Gdef<'a>>,
        len: usize,
    ) -> Self {
        Self {
            table,
            lookups,
            gdef,
            ops_left: len.saturating_mul(MAX_OPS_FACTOR).max(MIN_OPS),
            exhausted: false,
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Apply the lookup at `lookup_index` at `cursor`.
    ///
    /// Subtables are tried in order and the first that matches wins.
    pub(crate) fn apply_lookup(
        &mut self,
        lookup_index: u16,
        glyphs: &mut GlyphCollection,
        cursor: usize,
        depth: usize,
    ) -> MatchOutcome {
        if depth > MAX_NESTING_LEVEL {
            log::warn!(
                "{} lookup {lookup_index}: nesting limit reached",
                self.table
            );
            return MatchOutcome::NoMatch;
        }
        if self.ops_left == 0 {
            if !self.exhausted {
                log::warn!("{}: operation budget exhausted", self.table);
                self.exhausted = true;
            }
            return MatchOutcome::NoMatch;
        }
        self.ops_left -= 1;
        let lookups = self.lookups;
        let Some(lookup) = lookups.get(lookup_index) else {
            return MatchOutcome::NoMatch;
        };
        let filter = LookupFilter::new(lookup.lookup_flag(), lookup.mark_filtering_set(), self.gdef);
        match glyphs.get(cursor) {
            Some(entry) if !filter.skips(entry) => {}
            _ => return MatchOutcome::NoMatch,
        }
        for subtable in lookup.subtables() {
            let outcome = subtable.try_apply(self, glyphs, &filter, cursor, depth);
            if let MatchOutcome::Matched { changed, next } = outcome {
                // glyphs this lookup stepped over are still visited by others
                let next = (cursor + 1..next)
                    .find(|&index| glyphs.get(index).is_some_and(|entry| filter.skips(entry)))
                    .unwrap_or(next);
                log::trace!(
                    "{} lookup {lookup_index} (type {}) at {cursor}: changed {changed}, next {next}",
                    self.table,
                    lookup.lookup_type(),
                );
                return MatchOutcome::Matched { changed, next };
            }
        }
        MatchOutcome::NoMatch
    }
}

impl<'a, T> ApplyContext<'a, '_, T> {
    /// Replace a glyph and refresh its classes from `GDEF`.
    pub(crate) fn replace(&self, glyphs: &mut GlyphCollection, index: usize, glyph_id: GlyphId) {
        glyphs.replace(index, glyph_id);
        self.update_class(glyphs, index, None);
    }

    /// Refresh the classes of a substituted glyph.
    ///
    /// Without a `GDEF` class for the glyph, `fallback` is used if given,
    /// and the existing class is kept otherwise.
    pub(crate) fn update_class(
        &self,
        glyphs: &mut GlyphCollection,
        index: usize,
        fallback: Option<GlyphClassDef>,
    ) {
        let Some(entry) = glyphs.get(index) else {
            return;
        };
        let glyph_id = entry.glyph_id;
        let class = self
            .gdef
            .and_then(|gdef| gdef.glyph_class(glyph_id))
            .or(fallback)
            .unwrap_or(entry.class);
        let mark_attach_class = self
            .gdef
            .map(|gdef| gdef.mark_attach_class(glyph_id))
            .unwrap_or(entry.mark_attach_class);
        glyphs.set_class(index, class, mark_attach_class);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{collection::GlyphEntry, font::tests::simple_font_data};
    use font_test_data::{
        be_buffer,
        layout::{LayoutTableBuilder, TestLookup},
    };
    use read_fonts::{tables::gsub::SubstitutionSubtable, FontData, FontRead};

    pub(crate) fn latn() -> Tag {
        Tag::new(b"Latn")
    }

    pub(crate) fn glyphs_for(font: &Font, text: &str) -> GlyphCollection {
        let mut glyphs = GlyphCollection::new();
        for (i, ch) in text.char_indices() {
            let gid = font.glyph_id(ch).unwrap_or(GlyphId::NOTDEF);
            glyphs.push(font.entry_for(ch, gid, i..i + ch.len_utf8()));
        }
        glyphs
    }

    pub(crate) fn ids(glyphs: &GlyphCollection) -> Vec<u16> {
        glyphs.glyph_ids().map(|gid| gid.to_u16()).collect()
    }

    /// A format 2 single substitution for one glyph.
    pub(crate) fn single_subst(from: u16, to: u16) -> Vec<u8> {
        be_buffer! { 2u16, 8u16, 1u16, to, 1u16, 1u16, from }.into()
    }

    fn empty_lookups() -> LookupList<'static, SubstitutionSubtable<'static>> {
        LookupList::read(FontData::new(&[0, 0])).unwrap()
    }

    pub(crate) fn font_with_gsub(gsub: Vec<u8>) -> Vec<u8> {
        let mut builder = simple_font_data();
        builder.add_table(Tag::new(b"GSUB"), gsub);
        builder.build()
    }

    #[test]
    fn first_matching_lookup_ends_position() {
        // lookup 0: a -> b, lookup 1: b -> c
        let gsub = LayoutTableBuilder::new()
            .feature(Tag::new(b"liga"), &[1, 0])
            .lookup(TestLookup::new(1, &[single_subst(1, 2).as_slice()]))
            .lookup(TestLookup::new(1, &[single_subst(2, 3).as_slice()]))
            .build();
        let data = font_with_gsub(gsub);
        let font = Font::new(&data).unwrap();
        let mut glyphs = glyphs_for(&font, "ab");
        shape(&font, &mut glyphs, latn(), &ShapeOptions::default());
        // the b produced by lookup 0 is not seen by lookup 1
        assert_eq!(ids(&glyphs), [2, 3]);
        assert_eq!(glyphs.entries()[0].position.x_advance, 500);
    }

    #[test]
    fn disabled_features_do_not_apply() {
        let gsub = LayoutTableBuilder::new()
            .feature(Tag::new(b"smcp"), &[0])
            .lookup(TestLookup::new(1, &[single_subst(1, 2).as_slice()]))
            .build();
        let data = font_with_gsub(gsub);
        let font = Font::new(&data).unwrap();
        let mut glyphs = glyphs_for(&font, "a");
        shape(&font, &mut glyphs, latn(), &ShapeOptions::default());
        assert_eq!(ids(&glyphs), [1]);
        let options = ShapeOptions {
            features: vec![Tag::new(b"smcp")],
            ..Default::default()
        };
        shape(&font, &mut glyphs, latn(), &options);
        assert_eq!(ids(&glyphs), [2]);
    }

    #[test]
    fn self_referential_context_terminates() {
        let _ = env_logger::builder().is_test(true).try_init();
        // a format 3 context on glyph 1 that invokes itself
        let context = be_buffer! {
            3u16, 1u16, 1u16,
            12u16,              // coverage offset
            0u16, 0u16,         // sequenceIndex, lookupListIndex
            1u16, 1u16, 1u16
        };
        let gsub = LayoutTableBuilder::new()
            .feature(Tag::new(b"calt"), &[0])
            .lookup(TestLookup::new(5, &[context.as_slice()]))
            .build();
        let data = font_with_gsub(gsub);
        let font = Font::new(&data).unwrap();
        let mut glyphs = glyphs_for(&font, "aaaa");
        shape(&font, &mut glyphs, latn(), &ShapeOptions::default());
        assert_eq!(ids(&glyphs), [1, 1, 1, 1]);
    }

    #[test]
    fn budget_scales_with_length() {
        let lookups = empty_lookups();
        let ctx = ApplyContext::new(Gsub::TAG, &lookups, None, 3);
        assert_eq!(ctx.ops_left, MIN_OPS);
        let ctx = ApplyContext::new(Gsub::TAG, &lookups, None, 100);
        assert_eq!(ctx.ops_left, 6400);
    }

    #[test]
    fn entries_keep_their_classes_without_gdef() {
        let mut glyphs = GlyphCollection::new();
        glyphs.push(GlyphEntry::new(GlyphId::new(1), 'a', 0..1).with_class(GlyphClassDef::Base, 0));
        let lookups = empty_lookups();
        let ctx = ApplyContext::new(Gsub::TAG, &lookups, None, 1);
        ctx.replace(&mut glyphs, 0, GlyphId::new(4));
        assert_eq!(glyphs.entries()[0].class, GlyphClassDef::Base);
        ctx.update_class(&mut glyphs, 0, Some(GlyphClassDef::Ligature));
        assert_eq!(glyphs.entries()[0].class, GlyphClassDef::Ligature);
    }
}
