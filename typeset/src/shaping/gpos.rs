//! Applying glyph positioning subtables and resolving attachments.

use read_fonts::tables::gpos::{Anchor, PositionSubtable, ValueRecord};

use super::{context, ApplyContext, ApplyLookup, LookupFilter, MatchOutcome};
use crate::collection::{Attachment, GlyphCollection};

impl<'a> ApplyLookup<'a> for PositionSubtable<'a> {
    fn try_apply(
        &self,
        ctx: &mut ApplyContext<'a, '_, Self>,
        glyphs: &mut GlyphCollection,
        filter: &LookupFilter<'a, '_>,
        cursor: usize,
        depth: usize,
    ) -> MatchOutcome {
        let Some(glyph_id) = glyphs.glyph_id(cursor) else {
            return MatchOutcome::NoMatch;
        };
        match self {
            PositionSubtable::Single(table) => {
                let Some(value) = table.value(glyph_id) else {
                    return MatchOutcome::NoMatch;
                };
                adjust(glyphs, cursor, &value);
                MatchOutcome::Matched {
                    changed: !value.is_zero(),
                    next: cursor + 1,
                }
            }
            PositionSubtable::Pair(table) => {
                let Some(second) = filter.next_unskipped(glyphs, cursor) else {
                    return MatchOutcome::NoMatch;
                };
                let Some((first_value, second_value)) = glyphs
                    .glyph_id(second)
                    .and_then(|second_id| table.values(glyph_id, second_id))
                else {
                    return MatchOutcome::NoMatch;
                };
                adjust(glyphs, cursor, &first_value);
                adjust(glyphs, second, &second_value);
                let next = if table.value_format2().is_empty() {
                    second
                } else {
                    second + 1
                };
                MatchOutcome::Matched {
                    changed: !(first_value.is_zero() && second_value.is_zero()),
                    next,
                }
            }
            PositionSubtable::Cursive(table) => {
                let Some(exit) = table.entry_exit(glyph_id).and_then(|rec| rec.exit_anchor) else {
                    return MatchOutcome::NoMatch;
                };
                let Some(next) = filter.next_unskipped(glyphs, cursor) else {
                    return MatchOutcome::NoMatch;
                };
                let Some(entry) = glyphs
                    .glyph_id(next)
                    .and_then(|gid| table.entry_exit(gid))
                    .and_then(|rec| rec.entry_anchor)
                else {
                    return MatchOutcome::NoMatch;
                };
                attach_cursive(glyphs, cursor, next, exit, entry, filter.flag().right_to_left());
                MatchOutcome::Matched {
                    changed: true,
                    next,
                }
            }
            PositionSubtable::MarkToBase(table) => {
                if !table.mark_coverage().contains(glyph_id) {
                    return MatchOutcome::NoMatch;
                }
                let Some(base) = previous_non_mark(glyphs, cursor) else {
                    return MatchOutcome::NoMatch;
                };
                let Some((mark_anchor, base_anchor)) = glyphs
                    .glyph_id(base)
                    .and_then(|base_id| table.anchors(glyph_id, base_id))
                else {
                    return MatchOutcome::NoMatch;
                };
                attach_mark(glyphs, cursor, base, mark_anchor, base_anchor)
            }
            PositionSubtable::MarkToLigature(table) => {
                if !table.mark_coverage().contains(glyph_id) {
                    return MatchOutcome::NoMatch;
                }
                let Some(ligature) = previous_non_mark(glyphs, cursor) else {
                    return MatchOutcome::NoMatch;
                };
                let (Some(mark), Some(target)) = (glyphs.get(cursor), glyphs.get(ligature)) else {
                    return MatchOutcome::NoMatch;
                };
                let ligature_glyph = target.glyph_id;
                let Some(last) = table
                    .component_count(ligature_glyph)
                    .and_then(|count| count.checked_sub(1))
                else {
                    return MatchOutcome::NoMatch;
                };
                // marks from inside the ligature keep the component they
                // followed, others go on the last component
                let component = if mark.ligature_id != 0 && mark.ligature_id == target.ligature_id {
                    (mark.ligature_component as usize).min(last)
                } else {
                    last
                };
                let Some((mark_anchor, ligature_anchor)) =
                    table.anchors(glyph_id, ligature_glyph, component as u16)
                else {
                    return MatchOutcome::NoMatch;
                };
                attach_mark(glyphs, cursor, ligature, mark_anchor, ligature_anchor)
            }
            PositionSubtable::MarkToMark(table) => {
                if !table.mark1_coverage().contains(glyph_id) {
                    return MatchOutcome::NoMatch;
                }
                let Some(previous) = filter.prev_unskipped(glyphs, cursor) else {
                    return MatchOutcome::NoMatch;
                };
                let (Some(mark1), Some(mark2)) = (glyphs.get(cursor), glyphs.get(previous)) else {
                    return MatchOutcome::NoMatch;
                };
                if !mark2.is_mark()
                    || mark1.ligature_id != mark2.ligature_id
                    || mark1.ligature_component != mark2.ligature_component
                {
                    return MatchOutcome::NoMatch;
                }
                let Some((mark_anchor, mark2_anchor)) = table.anchors(glyph_id, mark2.glyph_id)
                else {
                    return MatchOutcome::NoMatch;
                };
                attach_mark(glyphs, cursor, previous, mark_anchor, mark2_anchor)
            }
            PositionSubtable::Contextual(table) => {
                context::apply_context(table, ctx, glyphs, filter, cursor, depth)
            }
            PositionSubtable::ChainContextual(table) => {
                context::apply_chained_context(table, ctx, glyphs, filter, cursor, depth)
            }
            PositionSubtable::Unsupported { .. } => MatchOutcome::NoMatch,
        }
    }
}

fn adjust(glyphs: &mut GlyphCollection, index: usize, value: &ValueRecord) {
    if let Some(position) = glyphs.position_mut(index) {
        position.x_offset += value.x_placement as i32;
        position.y_offset += value.y_placement as i32;
        position.x_advance += value.x_advance as i32;
        position.y_advance += value.y_advance as i32;
    }
}

fn previous_non_mark(glyphs: &GlyphCollection, index: usize) -> Option<usize> {
    let entries = glyphs.entries();
    (0..index.min(entries.len()))
        .rev()
        .find(|&i| !entries[i].is_mark())
}

/// Place the mark at `index` so that its anchor meets the target's.
///
/// The offsets stay relative to the target's origin until
/// [`resolve_attachments`] runs.
fn attach_mark(
    glyphs: &mut GlyphCollection,
    index: usize,
    target: usize,
    mark_anchor: Anchor,
    target_anchor: Anchor,
) -> MatchOutcome {
    let Some(position) = glyphs.position_mut(index) else {
        return MatchOutcome::NoMatch;
    };
    position.x_offset = target_anchor.x as i32 - mark_anchor.x as i32;
    position.y_offset = target_anchor.y as i32 - mark_anchor.y as i32;
    position.attachment = Attachment::Mark { base: target };
    MatchOutcome::Matched {
        changed: true,
        next: index + 1,
    }
}

/// Connect the exit anchor of `index` to the entry anchor of `next`.
///
/// Horizontally the pair is always joined left to right. Vertically the
/// right-to-left flag decides which glyph moves: without it `next` hangs
/// off `index`, with it `index` hangs off `next`.
fn attach_cursive(
    glyphs: &mut GlyphCollection,
    index: usize,
    next: usize,
    exit: Anchor,
    entry: Anchor,
    right_to_left: bool,
) {
    if let Some(position) = glyphs.position_mut(index) {
        position.x_advance = exit.x as i32 + position.x_offset;
    }
    if let Some(position) = glyphs.position_mut(next) {
        let delta = entry.x as i32 + position.x_offset;
        position.x_advance -= delta;
        position.x_offset -= delta;
    }
    let dy = exit.y as i32 - entry.y as i32;
    let (child, parent, dy) = if right_to_left {
        (index, next, -dy)
    } else {
        (next, index, dy)
    };
    if let Some(position) = glyphs.position_mut(child) {
        position.y_offset = dy;
        position.attachment = Attachment::Cursive { parent };
    }
}

/// Turn attachment-relative offsets into offsets from each glyph's own pen
/// position.
///
/// Attached marks lose their advance. Cursive chains accumulate their
/// vertical offsets from parent to child.
pub(crate) fn resolve_attachments(glyphs: &mut GlyphCollection) {
    let len = glyphs.len();
    for index in 0..len {
        if let Some(position) = glyphs.position_mut(index) {
            if matches!(position.attachment, Attachment::Mark { .. }) {
                position.x_advance = 0;
            }
        }
    }
    let cursive_parent = |glyphs: &GlyphCollection, index: usize| match glyphs
        .get(index)
        .map(|entry| entry.position.attachment)
    {
        Some(Attachment::Cursive { parent }) if parent < len => Some(parent),
        _ => None,
    };
    // children after their parent, then children before their parent
    for index in 0..len {
        if let Some(parent) = cursive_parent(glyphs, index).filter(|&parent| parent < index) {
            let dy = glyphs.entries()[parent].position.y_offset;
            if let Some(position) = glyphs.position_mut(index) {
                position.y_offset += dy;
            }
        }
    }
    for index in (0..len).rev() {
        if let Some(parent) = cursive_parent(glyphs, index).filter(|&parent| parent > index) {
            let dy = glyphs.entries()[parent].position.y_offset;
            if let Some(position) = glyphs.position_mut(index) {
                position.y_offset += dy;
            }
        }
    }
    let mut pens = Vec::with_capacity(len);
    let mut pen = 0i32;
    for entry in glyphs.iter() {
        pens.push(pen);
        pen += entry.position.x_advance;
    }
    for index in 0..len {
        let Attachment::Mark { base } = glyphs.entries()[index].position.attachment else {
            continue;
        };
        if base >= index {
            continue;
        }
        let base_position = glyphs.entries()[base].position;
        let dx = pens[base] + base_position.x_offset - pens[index];
        if let Some(position) = glyphs.position_mut(index) {
            position.x_offset += dx;
            position.y_offset += base_position.y_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collection::GlyphEntry,
        font::tests::simple_font_data,
        shaping::{shape, tests::glyphs_for, tests::latn, ShapeOptions},
        Font, GlyphId, GlyphPosition, Tag,
    };
    use font_test_data::{
        be_buffer,
        gpos as test_data,
        layout::{LayoutTableBuilder, TestLookup},
    };
    use read_fonts::{
        tables::{
            gdef::GlyphClassDef,
            gpos::Gpos,
            layout::{LookupFlag, LookupList, LookupSubtable},
        },
        FontData, FontRead, TopLevelTable,
    };

    fn collection(glyphs: &[(u16, GlyphClassDef, i32)]) -> GlyphCollection {
        let mut collection = GlyphCollection::new();
        for (i, (gid, class, advance)) in glyphs.iter().enumerate() {
            let mut entry = GlyphEntry::new(GlyphId::new(*gid), 'x', i..i + 1).with_class(*class, 0);
            entry.position.x_advance = *advance;
            collection.push(entry);
        }
        collection
    }

    fn apply(
        lookup_type: u16,
        data: &[u8],
        glyphs: &mut GlyphCollection,
        cursor: usize,
        flag: u16,
    ) -> MatchOutcome {
        let subtable = PositionSubtable::read_with_type(FontData::new(data), lookup_type).unwrap();
        let lookups: LookupList<PositionSubtable> =
            LookupList::read(FontData::new(&[0, 0])).unwrap();
        let mut ctx = ApplyContext::new(Gpos::TAG, &lookups, None, glyphs.len());
        let filter = LookupFilter::new(LookupFlag::from_bits_truncate(flag), None, None);
        subtable.try_apply(&mut ctx, glyphs, &filter, cursor, 0)
    }

    fn position(glyphs: &GlyphCollection, index: usize) -> GlyphPosition {
        glyphs.entries()[index].position
    }

    #[test]
    fn single_adjustment() {
        let data = test_data::singleposformat2();
        let mut glyphs = collection(&[(0x51, GlyphClassDef::Base, 500)]);
        assert!(apply(1, &data, &mut glyphs, 0, 0).is_match());
        let pos = position(&glyphs, 0);
        assert_eq!((pos.x_offset, pos.x_advance), (30, 536));
    }

    #[test]
    fn pair_with_second_value() {
        let data = test_data::pairposformat1();
        let mut glyphs = collection(&[(0x52, GlyphClassDef::Base, 500), (0x59, GlyphClassDef::Base, 500)]);
        assert_eq!(
            apply(2, &data, &mut glyphs, 0, 0),
            MatchOutcome::Matched {
                changed: true,
                next: 2
            }
        );
        assert_eq!(position(&glyphs, 0).x_advance, 470);
        assert_eq!(position(&glyphs, 1).x_offset, -20);
    }

    #[test]
    fn pair_without_second_value_keeps_second() {
        let data = test_data::pairposformat2();
        let mut glyphs = collection(&[(0x6A, GlyphClassDef::Base, 500), (0x6B, GlyphClassDef::Base, 500)]);
        assert_eq!(
            apply(2, &data, &mut glyphs, 0, 0),
            MatchOutcome::Matched {
                changed: true,
                next: 1
            }
        );
        assert_eq!(position(&glyphs, 0).x_offset, -50);
    }

    #[test]
    fn mark_to_base() {
        let data = test_data::markbaseposformat1();
        let mut glyphs = collection(&[(0x76, GlyphClassDef::Base, 1000), (0x333, GlyphClassDef::Mark, 200)]);
        assert!(apply(4, &data, &mut glyphs, 1, 0).is_match());
        let mark = position(&glyphs, 1);
        assert_eq!(mark.attachment, Attachment::Mark { base: 0 });
        assert_eq!((mark.x_offset, mark.y_offset), (0x3E8 - 0x15A, 0x1C2 - 0x697));
        resolve_attachments(&mut glyphs);
        let mark = position(&glyphs, 1);
        // pulled back over the base's advance
        assert_eq!((mark.x_offset, mark.x_advance), (-0x15A, 0));
        // a base glyph is never a mark target here
        assert_eq!(apply(4, &data, &mut glyphs, 0, 0), MatchOutcome::NoMatch);
    }

    #[test]
    fn mark_to_ligature_component() {
        let data = test_data::markligposformat1();
        let mut glyphs = collection(&[(0x50, GlyphClassDef::Ligature, 900), (0x60, GlyphClassDef::Mark, 0)]);
        assert!(apply(5, &data, &mut glyphs, 1, 0).is_match());
        // an unassociated mark goes on the last component
        assert_eq!(position(&glyphs, 1).x_offset, 600);

        let mut glyphs = collection(&[(0x50, GlyphClassDef::Ligature, 900), (0x60, GlyphClassDef::Mark, 0)]);
        let mut entries = glyphs.entries().to_vec();
        entries[0].ligature_id = 7;
        entries[1].ligature_id = 7;
        entries[1].ligature_component = 0;
        glyphs = GlyphCollection::new();
        entries.into_iter().for_each(|entry| glyphs.push(entry));
        assert!(apply(5, &data, &mut glyphs, 1, 0).is_match());
        assert_eq!(position(&glyphs, 1).x_offset, 100);
    }

    fn cursive_subtable() -> Vec<u8> {
        // glyph 1: entry (50, 100), exit (450, 200)
        be_buffer! {
            1u16, 10u16, 1u16, 16u16, 22u16,
            1u16, 1u16, 1u16,
            1u16, 50i16, 100i16,
            1u16, 450i16, 200i16
        }
        .into()
    }

    #[test]
    fn cursive_chain() {
        let data = cursive_subtable();
        let mut glyphs = collection(&[
            (1, GlyphClassDef::Base, 500),
            (1, GlyphClassDef::Base, 500),
            (1, GlyphClassDef::Base, 500),
        ]);
        assert_eq!(
            apply(3, &data, &mut glyphs, 0, 0),
            MatchOutcome::Matched {
                changed: true,
                next: 1
            }
        );
        assert!(apply(3, &data, &mut glyphs, 1, 0).is_match());
        assert_eq!(apply(3, &data, &mut glyphs, 2, 0), MatchOutcome::NoMatch);
        assert_eq!(position(&glyphs, 0).x_advance, 450);
        let second = position(&glyphs, 1);
        assert_eq!((second.x_advance, second.x_offset), (400, -50));
        assert_eq!(second.attachment, Attachment::Cursive { parent: 0 });
        resolve_attachments(&mut glyphs);
        assert_eq!(position(&glyphs, 1).y_offset, 100);
        assert_eq!(position(&glyphs, 2).y_offset, 200);
    }

    #[test]
    fn cursive_right_to_left_moves_first_glyph() {
        let data = cursive_subtable();
        let mut glyphs = collection(&[(1, GlyphClassDef::Base, 500), (1, GlyphClassDef::Base, 500)]);
        assert!(apply(3, &data, &mut glyphs, 0, LookupFlag::RIGHT_TO_LEFT).is_match());
        let first = position(&glyphs, 0);
        assert_eq!(first.attachment, Attachment::Cursive { parent: 1 });
        assert_eq!(first.y_offset, -100);
        assert_eq!(position(&glyphs, 1).attachment, Attachment::None);
    }

    #[test]
    fn kerning_through_shape() {
        // kern a (1) followed by b (2) by -100
        let pair = be_buffer! {
            1u16, 12u16, 0x0004u16, 0u16, 1u16, 18u16,
            1u16, 1u16, 1u16,
            1u16, 2u16, (-100i16)
        };
        let gpos = LayoutTableBuilder::new()
            .feature(Tag::new(b"kern"), &[0])
            .lookup(TestLookup::new(2, &[pair.as_slice()]))
            .build();
        let mut builder = simple_font_data();
        builder.add_table(Tag::new(b"GPOS"), gpos);
        let data = builder.build();
        let font = Font::new(&data).unwrap();
        let mut glyphs = glyphs_for(&font, "abab");
        shape(&font, &mut glyphs, latn(), &ShapeOptions::default());
        let advances: Vec<_> = glyphs.iter().map(|entry| entry.position.x_advance).collect();
        assert_eq!(advances, [400, 500, 400, 500]);
    }

    #[test]
    fn mark_skipped_by_kerning_is_still_positioned() {
        let pair = be_buffer! {
            1u16, 12u16, 0x0004u16, 0u16, 1u16, 18u16,
            1u16, 1u16, 1u16,
            1u16, 2u16, (-100i16)
        };
        // x placement of 7 on glyph 0
        let single = be_buffer! { 1u16, 8u16, 0x0001u16, 7i16, 1u16, 1u16, 0u16 };
        let gpos = LayoutTableBuilder::new()
            .feature(Tag::new(b"kern"), &[0])
            .feature(Tag::new(b"mark"), &[1])
            .lookup(TestLookup::new(2, &[pair.as_slice()]).with_flag(LookupFlag::IGNORE_MARKS))
            .lookup(TestLookup::new(1, &[single.as_slice()]))
            .build();
        let mut builder = simple_font_data();
        builder.add_table(Tag::new(b"GPOS"), gpos);
        let data = builder.build();
        let font = Font::new(&data).unwrap();
        // the combining acute is unmapped and classed as a mark
        let mut glyphs = glyphs_for(&font, "a\u{301}b");
        shape(&font, &mut glyphs, latn(), &ShapeOptions::default());
        let advances: Vec<_> = glyphs.iter().map(|entry| entry.position.x_advance).collect();
        assert_eq!(advances, [400, 0, 500]);
        assert_eq!(glyphs.entries()[1].position.x_offset, 7);
    }
}
