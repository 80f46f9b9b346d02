//! Applying glyph substitution subtables.

use read_fonts::tables::{gdef::GlyphClassDef, gsub::SubstitutionSubtable};

use super::{
    context::{self, has_room, match_backtrack, match_input, match_lookahead},
    ApplyContext, ApplyLookup, LookupFilter, MatchOutcome,
};
use crate::{collection::GlyphCollection, GlyphId};

impl<'a> ApplyLookup<'a> for SubstitutionSubtable<'a> {
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
            SubstitutionSubtable::Single(table) => {
                let Some(substitute) = table.substitute(glyph_id) else {
                    return MatchOutcome::NoMatch;
                };
                ctx.replace(glyphs, cursor, substitute);
                MatchOutcome::Matched {
                    changed: substitute != glyph_id,
                    next: cursor + 1,
                }
            }
            SubstitutionSubtable::Multiple(table) => {
                let Some(sequence) = table
                    .coverage()
                    .get(glyph_id)
                    .and_then(|index| table.sequences().get(index as usize))
                else {
                    return MatchOutcome::NoMatch;
                };
                let substitutes: Vec<GlyphId> =
                    sequence.glyph_ids().iter().map(|gid| gid.get()).collect();
                if substitutes.is_empty() {
                    // deleting glyphs is not supported
                    log::debug!("empty multiple substitution sequence for {glyph_id}");
                    return MatchOutcome::NoMatch;
                }
                glyphs.replace_with_sequence(cursor, &substitutes);
                for index in cursor..cursor + substitutes.len() {
                    ctx.update_class(glyphs, index, None);
                }
                MatchOutcome::Matched {
                    changed: true,
                    next: cursor + substitutes.len(),
                }
            }
            SubstitutionSubtable::Alternate(table) => {
                let Some(alternate) = table
                    .coverage()
                    .get(glyph_id)
                    .and_then(|index| table.alternate_sets().get(index as usize))
                    .and_then(|set| set.glyph_ids().first())
                    .map(|gid| gid.get())
                else {
                    return MatchOutcome::NoMatch;
                };
                ctx.replace(glyphs, cursor, alternate);
                MatchOutcome::Matched {
                    changed: alternate != glyph_id,
                    next: cursor + 1,
                }
            }
            SubstitutionSubtable::Ligature(table) => {
                let Some(set) = table
                    .coverage()
                    .get(glyph_id)
                    .and_then(|index| table.ligature_sets().get(index as usize))
                else {
                    return MatchOutcome::NoMatch;
                };
                for ligature in set.ligatures() {
                    let components = ligature.component_glyph_ids();
                    let Some(positions) =
                        match_input(glyphs, filter, cursor, components.len(), |i, gid| {
                            components[i].get() == gid
                        })
                    else {
                        continue;
                    };
                    glyphs.ligate(&positions, ligature.ligature_glyph());
                    let fallback = (positions.len() > 1).then_some(GlyphClassDef::Ligature);
                    ctx.update_class(glyphs, cursor, fallback);
                    return MatchOutcome::Matched {
                        changed: true,
                        next: cursor + 1,
                    };
                }
                MatchOutcome::NoMatch
            }
            SubstitutionSubtable::Contextual(table) => {
                context::apply_context(table, ctx, glyphs, filter, cursor, depth)
            }
            SubstitutionSubtable::ChainContextual(table) => {
                context::apply_chained_context(table, ctx, glyphs, filter, cursor, depth)
            }
            SubstitutionSubtable::Reverse(table) => {
                let Some(index) = table.coverage().get(glyph_id) else {
                    return MatchOutcome::NoMatch;
                };
                let backtrack = table.backtrack_coverages();
                let lookahead = table.lookahead_coverages();
                if !has_room(glyphs.len(), cursor, backtrack.len(), 1, lookahead.len())
                    || !match_backtrack(glyphs, filter, cursor, backtrack.len(), |i, gid| {
                        backtrack[i].contains(gid)
                    })
                    || !match_lookahead(glyphs, filter, cursor, lookahead.len(), |i, gid| {
                        lookahead[i].contains(gid)
                    })
                {
                    return MatchOutcome::NoMatch;
                }
                let Some(substitute) = table
                    .substitute_glyph_ids()
                    .get(index as usize)
                    .map(|gid| gid.get())
                else {
                    return MatchOutcome::NoMatch;
                };
                ctx.replace(glyphs, cursor, substitute);
                MatchOutcome::Matched {
                    changed: substitute != glyph_id,
                    next: cursor + 1,
                }
            }
            SubstitutionSubtable::Unsupported { .. } => MatchOutcome::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::GlyphEntry;
    use font_test_data::gsub as test_data;
    use pretty_assertions::assert_eq;
    use read_fonts::{
        tables::{
            gsub::Gsub,
            layout::{LookupFlag, LookupList, LookupSubtable},
        },
        FontData, FontRead, TopLevelTable,
    };

    fn collection(glyphs: &[(u16, GlyphClassDef)]) -> GlyphCollection {
        let mut collection = GlyphCollection::new();
        for (i, (gid, class)) in glyphs.iter().enumerate() {
            collection.push(GlyphEntry::new(GlyphId::new(*gid), 'x', i..i + 1).with_class(*class, 0));
        }
        collection
    }

    fn bases(gids: &[u16]) -> GlyphCollection {
        collection(&gids.iter().map(|gid| (*gid, GlyphClassDef::Base)).collect::<Vec<_>>())
    }

    fn apply(
        lookup_type: u16,
        data: &[u8],
        glyphs: &mut GlyphCollection,
        cursor: usize,
        flag: u16,
    ) -> MatchOutcome {
        let subtable = SubstitutionSubtable::read_with_type(FontData::new(data), lookup_type).unwrap();
        let lookups: LookupList<SubstitutionSubtable> =
            LookupList::read(FontData::new(&[0, 0])).unwrap();
        let mut ctx = ApplyContext::new(Gsub::TAG, &lookups, None, glyphs.len());
        let filter = LookupFilter::new(LookupFlag::from_bits_truncate(flag), None, None);
        subtable.try_apply(&mut ctx, glyphs, &filter, cursor, 0)
    }

    fn ids(glyphs: &GlyphCollection) -> Vec<u16> {
        glyphs.glyph_ids().map(|gid| gid.to_u16()).collect()
    }

    #[test]
    fn single() {
        let data = test_data::singlesubstformat1();
        let mut glyphs = bases(&[0x3C, 0x41]);
        assert_eq!(
            apply(1, &data, &mut glyphs, 0, 0),
            MatchOutcome::Matched {
                changed: true,
                next: 1
            }
        );
        assert_eq!(apply(1, &data, &mut glyphs, 1, 0), MatchOutcome::NoMatch);
        assert_eq!(ids(&glyphs), [0x3C + 192, 0x41]);
    }

    #[test]
    fn multiple() {
        let data = test_data::multiplesubstformat1();
        let mut glyphs = bases(&[0x10, 0xF1, 0x11]);
        assert_eq!(
            apply(2, &data, &mut glyphs, 1, 0),
            MatchOutcome::Matched {
                changed: true,
                next: 4
            }
        );
        assert_eq!(ids(&glyphs), [0x10, 26, 26, 29, 0x11]);
        assert!(glyphs.entries()[1..4].iter().all(|entry| entry.text_range == (1..2)));
    }

    #[test]
    fn alternate_uses_first() {
        let data = test_data::alternatesubstformat1();
        let mut glyphs = bases(&[0x3A]);
        assert!(apply(3, &data, &mut glyphs, 0, 0).is_match());
        assert_eq!(ids(&glyphs), [0xC9]);
    }

    #[test]
    fn ligature_skips_marks_when_asked() {
        let data = test_data::ligaturesubstformat1();
        let make = || {
            collection(&[
                (0x1A, GlyphClassDef::Base),
                (0x300, GlyphClassDef::Mark),
                (0x1D, GlyphClassDef::Base),
            ])
        };
        let mut glyphs = make();
        assert_eq!(apply(4, &data, &mut glyphs, 0, 0), MatchOutcome::NoMatch);
        let mut glyphs = make();
        assert!(apply(4, &data, &mut glyphs, 0, LookupFlag::IGNORE_MARKS).is_match());
        assert_eq!(ids(&glyphs), [0xF0, 0x300]);
        let ligature = &glyphs.entries()[0];
        assert_eq!(ligature.class, GlyphClassDef::Ligature);
        assert_eq!(ligature.text_range, 0..3);
        assert_eq!(ligature.component_count, 2);
        assert_eq!(glyphs.entries()[1].ligature_id, ligature.ligature_id);
    }

    #[test]
    fn ligatures_are_tried_in_order() {
        let data = test_data::ligaturesubstformat1();
        let mut glyphs = bases(&[0x1A, 0x1A, 0x1D]);
        assert!(apply(4, &data, &mut glyphs, 0, 0).is_match());
        assert_eq!(ids(&glyphs), [0xF1]);
    }

    #[test]
    fn reverse_chain_checks_backtrack() {
        let data = test_data::reversechainsinglesubstformat1();
        let mut glyphs = bases(&[0x3C, 0x3B]);
        assert!(apply(8, &data, &mut glyphs, 1, 0).is_match());
        assert_eq!(ids(&glyphs), [0x3C, 0x3A]);
        let mut glyphs = bases(&[0x3B, 0x3B]);
        assert_eq!(apply(8, &data, &mut glyphs, 0, 0), MatchOutcome::NoMatch);
        assert_eq!(apply(8, &data, &mut glyphs, 1, 0), MatchOutcome::NoMatch);
    }
}
