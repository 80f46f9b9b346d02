//! Matching sequence contexts and applying their nested lookups.

use read_fonts::tables::layout::{
    ChainedSequenceContext, SequenceContext, SequenceLookupRecord,
};

use super::{ApplyContext, ApplyLookup, LookupFilter, MatchOutcome};
use crate::{collection::GlyphCollection, GlyphId};

/// True if there are enough glyphs around `cursor` for a rule of this
/// shape. `input` includes the glyph at `cursor`.
pub(super) fn has_room(len: usize, cursor: usize, backtrack: usize, input: usize, lookahead: usize) -> bool {
    cursor >= backtrack && cursor + input + lookahead <= len
}

/// Match `count` glyphs following `cursor`.
///
/// `matches` is called with the index into the sequence (starting at the
/// element after the first) and the candidate glyph. On success returns the
/// positions of every input glyph, the one at `cursor` included.
pub(super) fn match_input(
    glyphs: &GlyphCollection,
    filter: &LookupFilter,
    cursor: usize,
    count: usize,
    mut matches: impl FnMut(usize, GlyphId) -> bool,
) -> Option<Vec<usize>> {
    let mut positions = Vec::with_capacity(count + 1);
    positions.push(cursor);
    let mut pos = cursor;
    for i in 0..count {
        pos = filter.next_unskipped(glyphs, pos)?;
        if !matches(i, glyphs.glyph_id(pos)?) {
            return None;
        }
        positions.push(pos);
    }
    Some(positions)
}

/// Match `count` glyphs before `start`, nearest first.
pub(super) fn match_backtrack(
    glyphs: &GlyphCollection,
    filter: &LookupFilter,
    start: usize,
    count: usize,
    mut matches: impl FnMut(usize, GlyphId) -> bool,
) -> bool {
    let mut pos = start;
    for i in 0..count {
        let Some(prev) = filter.prev_unskipped(glyphs, pos) else {
            return false;
        };
        pos = prev;
        if !glyphs.glyph_id(pos).is_some_and(|gid| matches(i, gid)) {
            return false;
        }
    }
    true
}

/// Match `count` glyphs after `end`, the last input position.
pub(super) fn match_lookahead(
    glyphs: &GlyphCollection,
    filter: &LookupFilter,
    end: usize,
    count: usize,
    mut matches: impl FnMut(usize, GlyphId) -> bool,
) -> bool {
    let mut pos = end;
    for i in 0..count {
        let Some(next) = filter.next_unskipped(glyphs, pos) else {
            return false;
        };
        pos = next;
        if !glyphs.glyph_id(pos).is_some_and(|gid| matches(i, gid)) {
            return false;
        }
    }
    true
}

/// The shape of a chained rule and the predicates for each of its parts.
struct ChainMatch<B, I, L> {
    backtrack: (usize, B),
    input: (usize, I),
    lookahead: (usize, L),
}

impl<B, I, L> ChainMatch<B, I, L>
where
    B: FnMut(usize, GlyphId) -> bool,
    I: FnMut(usize, GlyphId) -> bool,
    L: FnMut(usize, GlyphId) -> bool,
{
    /// Input first, then backtrack, then lookahead.
    fn positions(
        self,
        glyphs: &GlyphCollection,
        filter: &LookupFilter,
        cursor: usize,
    ) -> Option<Vec<usize>> {
        let (backtrack_len, backtrack) = self.backtrack;
        let (input_len, input) = self.input;
        let (lookahead_len, lookahead) = self.lookahead;
        if !has_room(glyphs.len(), cursor, backtrack_len, input_len + 1, lookahead_len) {
            return None;
        }
        let positions = match_input(glyphs, filter, cursor, input_len, input)?;
        let last = *positions.last()?;
        (match_backtrack(glyphs, filter, cursor, backtrack_len, backtrack)
            && match_lookahead(glyphs, filter, last, lookahead_len, lookahead))
        .then_some(positions)
    }
}

fn no_context(_: usize, _: GlyphId) -> bool {
    false
}

/// Apply a `GSUB` type 5 or `GPOS` type 7 subtable at `cursor`.
pub(crate) fn apply_context<'a, T: ApplyLookup<'a>>(
    context: &SequenceContext<'a>,
    ctx: &mut ApplyContext<'a, '_, T>,
    glyphs: &mut GlyphCollection,
    filter: &LookupFilter<'a, '_>,
    cursor: usize,
    depth: usize,
) -> MatchOutcome {
    let Some(glyph_id) = glyphs.glyph_id(cursor) else {
        return MatchOutcome::NoMatch;
    };
    let matched = match context {
        SequenceContext::Format1(table) => {
            let Some(rule_set) = table
                .coverage()
                .get(glyph_id)
                .and_then(|index| table.rule_sets().get(index as usize))
                .and_then(Option::as_ref)
            else {
                return MatchOutcome::NoMatch;
            };
            rule_set.rules().iter().find_map(|rule| {
                let input = rule.input_sequence();
                ChainMatch {
                    backtrack: (0, no_context),
                    input: (input.len(), |i: usize, gid: GlyphId| input[i].get() == gid),
                    lookahead: (0, no_context),
                }
                .positions(glyphs, filter, cursor)
                .map(|positions| (positions, rule.seq_lookup_records()))
            })
        }
        SequenceContext::Format2(table) => {
            if !table.coverage().contains(glyph_id) {
                return MatchOutcome::NoMatch;
            }
            let class_def = table.class_def();
            let class = class_def.get(glyph_id);
            let Some(rule_set) = table
                .rule_sets()
                .get(class as usize)
                .and_then(Option::as_ref)
            else {
                return MatchOutcome::NoMatch;
            };
            rule_set.rules().iter().find_map(|rule| {
                let input = rule.input_sequence();
                ChainMatch {
                    backtrack: (0, no_context),
                    input: (input.len(), |i: usize, gid: GlyphId| {
                        input[i].get() == class_def.get(gid)
                    }),
                    lookahead: (0, no_context),
                }
                .positions(glyphs, filter, cursor)
                .map(|positions| (positions, rule.seq_lookup_records()))
            })
        }
        SequenceContext::Format3(table) => {
            let coverages = table.coverages();
            if !coverages[0].contains(glyph_id) {
                return MatchOutcome::NoMatch;
            }
            let input = &coverages[1..];
            ChainMatch {
                backtrack: (0, no_context),
                input: (input.len(), |i: usize, gid: GlyphId| input[i].contains(gid)),
                lookahead: (0, no_context),
            }
            .positions(glyphs, filter, cursor)
            .map(|positions| (positions, table.seq_lookup_records()))
        }
    };
    match matched {
        Some((positions, records)) => apply_records(ctx, glyphs, positions, records, depth),
        None => MatchOutcome::NoMatch,
    }
}

/// Apply a `GSUB` type 6 or `GPOS` type 8 subtable at `cursor`.
pub(crate) fn apply_chained_context<'a, T: ApplyLookup<'a>>(
    context: &ChainedSequenceContext<'a>,
    ctx: &mut ApplyContext<'a, '_, T>,
    glyphs: &mut GlyphCollection,
    filter: &LookupFilter<'a, '_>,
    cursor: usize,
    depth: usize,
) -> MatchOutcome {
    let Some(glyph_id) = glyphs.glyph_id(cursor) else {
        return MatchOutcome::NoMatch;
    };
    let matched = match context {
        ChainedSequenceContext::Format1(table) => {
            let Some(rule_set) = table
                .coverage()
                .get(glyph_id)
                .and_then(|index| table.rule_sets().get(index as usize))
                .and_then(Option::as_ref)
            else {
                return MatchOutcome::NoMatch;
            };
            rule_set.rules().iter().find_map(|rule| {
                let backtrack = rule.backtrack_sequence();
                let input = rule.input_sequence();
                let lookahead = rule.lookahead_sequence();
                ChainMatch {
                    backtrack: (backtrack.len(), |i: usize, gid: GlyphId| {
                        backtrack[i].get() == gid
                    }),
                    input: (input.len(), |i: usize, gid: GlyphId| input[i].get() == gid),
                    lookahead: (lookahead.len(), |i: usize, gid: GlyphId| {
                        lookahead[i].get() == gid
                    }),
                }
                .positions(glyphs, filter, cursor)
                .map(|positions| (positions, rule.seq_lookup_records()))
            })
        }
        ChainedSequenceContext::Format2(table) => {
            if !table.coverage().contains(glyph_id) {
                return MatchOutcome::NoMatch;
            }
            let backtrack_classes = table.backtrack_class_def();
            let input_classes = table.input_class_def();
            let lookahead_classes = table.lookahead_class_def();
            let class = input_classes.get(glyph_id);
            let Some(rule_set) = table
                .rule_sets()
                .get(class as usize)
                .and_then(Option::as_ref)
            else {
                return MatchOutcome::NoMatch;
            };
            rule_set.rules().iter().find_map(|rule| {
                let backtrack = rule.backtrack_sequence();
                let input = rule.input_sequence();
                let lookahead = rule.lookahead_sequence();
                ChainMatch {
                    backtrack: (backtrack.len(), |i: usize, gid: GlyphId| {
                        backtrack[i].get() == backtrack_classes.get(gid)
                    }),
                    input: (input.len(), |i: usize, gid: GlyphId| {
                        input[i].get() == input_classes.get(gid)
                    }),
                    lookahead: (lookahead.len(), |i: usize, gid: GlyphId| {
                        lookahead[i].get() == lookahead_classes.get(gid)
                    }),
                }
                .positions(glyphs, filter, cursor)
                .map(|positions| (positions, rule.seq_lookup_records()))
            })
        }
        ChainedSequenceContext::Format3(table) => {
            let inputs = table.input_coverages();
            if !inputs[0].contains(glyph_id) {
                return MatchOutcome::NoMatch;
            }
            let backtrack = table.backtrack_coverages();
            let input = &inputs[1..];
            let lookahead = table.lookahead_coverages();
            ChainMatch {
                backtrack: (backtrack.len(), |i: usize, gid: GlyphId| {
                    backtrack[i].contains(gid)
                }),
                input: (input.len(), |i: usize, gid: GlyphId| input[i].contains(gid)),
                lookahead: (lookahead.len(), |i: usize, gid: GlyphId| {
                    lookahead[i].contains(gid)
                }),
            }
            .positions(glyphs, filter, cursor)
            .map(|positions| (positions, table.seq_lookup_records()))
        }
    };
    match matched {
        Some((positions, records)) => apply_records(ctx, glyphs, positions, records, depth),
        None => MatchOutcome::NoMatch,
    }
}

/// Apply the nested lookups of a matched rule.
///
/// Records are applied in order. When a nested lookup changes the length of
/// the collection, the positions after the one it was applied at shift by
/// the same amount.
fn apply_records<'a, T: ApplyLookup<'a>>(
    ctx: &mut ApplyContext<'a, '_, T>,
    glyphs: &mut GlyphCollection,
    mut positions: Vec<usize>,
    records: &[SequenceLookupRecord],
    depth: usize,
) -> MatchOutcome {
    let Some(&last) = positions.last() else {
        return MatchOutcome::NoMatch;
    };
    let mut end = last as isize + 1;
    let mut changed = false;
    for record in records {
        let index = record.sequence_index() as usize;
        let Some(&pos) = positions.get(index) else {
            log::debug!("sequence index {index} is past the matched input");
            continue;
        };
        let before = glyphs.len();
        if let MatchOutcome::Matched { changed: nested, .. } =
            ctx.apply_lookup(record.lookup_list_index(), glyphs, pos, depth + 1)
        {
            changed |= nested;
        }
        let delta = glyphs.len() as isize - before as isize;
        if delta != 0 {
            let floor = pos as isize;
            for later in positions.iter_mut().skip(index + 1) {
                *later = (*later as isize + delta).max(floor) as usize;
            }
            end = (end + delta).max(floor + 1);
        }
        if ctx.is_exhausted() {
            break;
        }
    }
    MatchOutcome::Matched {
        changed,
        next: (end as usize).min(glyphs.len()),
    }
}
