//! Splitting text into runs that share a font.

use std::ops::Range;

use super::{is_whitespace, FontStack};
use crate::Error;

/// A piece of the source text, in order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum Segment {
    /// Text shaped with a single font.
    Run { font_index: usize, range: Range<usize> },
    /// A hard line break. CR LF is a single break.
    LineBreak { font_index: usize, range: Range<usize> },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum State {
    AtBreak,
    InRun { font_index: usize, start: usize },
    /// A run was just started because the font changed.
    AtFallbackBoundary { font_index: usize, start: usize },
}

impl State {
    fn open_run(self) -> Option<(usize, usize)> {
        match self {
            State::AtBreak => None,
            State::InRun { font_index, start } | State::AtFallbackBoundary { font_index, start } => {
                Some((font_index, start))
            }
        }
    }
}

pub(crate) fn is_hard_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` at hard line breaks and font changes.
pub(crate) fn segment(text: &str, fonts: &FontStack) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut state = State::AtBreak;
    let mut chars = text.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if is_hard_break(ch) {
            let mut end = offset + ch.len_utf8();
            if ch == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
                end += 1;
            }
            let font_index = match state.open_run() {
                Some((font_index, start)) => {
                    segments.push(Segment::Run {
                        font_index,
                        range: start..offset,
                    });
                    font_index
                }
                None => 0,
            };
            segments.push(Segment::LineBreak {
                font_index,
                range: offset..end,
            });
            state = State::AtBreak;
            continue;
        }
        let current = state.open_run();
        let font_index = font_for(fonts, ch, current.map(|(font_index, _)| font_index));
        state = match current {
            None => State::InRun {
                font_index,
                start: offset,
            },
            Some((current, start)) if current == font_index => State::InRun { font_index, start },
            Some((current, start)) => {
                segments.push(Segment::Run {
                    font_index: current,
                    range: start..offset,
                });
                State::AtFallbackBoundary {
                    font_index,
                    start: offset,
                }
            }
        };
    }
    if let Some((font_index, start)) = state.open_run() {
        segments.push(Segment::Run {
            font_index,
            range: start..text.len(),
        });
    }
    segments
}

/// The font to use for `ch`, given the font of the run it would join.
fn font_for(fonts: &FontStack, ch: char, current: Option<usize>) -> usize {
    if let Some(current) = current {
        if is_whitespace(ch) || ch.is_control() {
            return current;
        }
    }
    match fonts.iter().position(|font| font.has_glyph(ch)) {
        Some(index) => index,
        None => {
            if !is_whitespace(ch) && !ch.is_control() {
                log::debug!("{}, using .notdef", Error::NoGlyphAvailable(ch));
            }
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        text::tests::{fallback_font_data, primary_font_data},
        Font,
    };
    use pretty_assertions::assert_eq;

    fn run(font_index: usize, range: Range<usize>) -> Segment {
        Segment::Run { font_index, range }
    }

    fn line_break(font_index: usize, range: Range<usize>) -> Segment {
        Segment::LineBreak { font_index, range }
    }

    #[test]
    fn fallback_boundary_at_unsupported_character() {
        let primary = primary_font_data();
        let fallback = fallback_font_data();
        let primary = Font::new(&primary).unwrap();
        let fallback = Font::new(&fallback).unwrap();
        let fonts = FontStack::new(&primary).with_fallback(&fallback);
        assert_eq!(
            segment("abxyc", &fonts),
            [run(0, 0..2), run(1, 2..4), run(0, 4..5)]
        );
        // whitespace stays with the run it follows
        assert_eq!(segment("ax b", &fonts), [run(0, 0..1), run(1, 1..3), run(0, 3..4)]);
    }

    #[test]
    fn unsupported_everywhere_stays_on_primary() {
        let _ = env_logger::builder().is_test(true).try_init();
        let primary = primary_font_data();
        let primary = Font::new(&primary).unwrap();
        let fonts = FontStack::new(&primary);
        assert_eq!(segment("a\u{4E00}b", &fonts), [run(0, 0..5)]);
    }

    #[test]
    fn hard_breaks() {
        let primary = primary_font_data();
        let primary = Font::new(&primary).unwrap();
        let fonts = FontStack::new(&primary);
        assert_eq!(
            segment("ab\r\nc\n\nd\u{2028}", &fonts),
            [
                run(0, 0..2),
                line_break(0, 2..4),
                run(0, 4..5),
                line_break(0, 5..6),
                line_break(0, 6..7),
                run(0, 7..8),
                line_break(0, 8..11),
            ]
        );
        assert!(segment("", &fonts).is_empty());
    }
}
