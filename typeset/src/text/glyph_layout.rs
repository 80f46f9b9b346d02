use std::ops::Range;

use crate::{GlyphId, Point, Rect};

/// A positioned glyph.
///
/// Lengths are in points. `location` is the pen position on the baseline,
/// with y increasing downward.
#[derive(Clone, PartialEq, Debug)]
pub struct GlyphLayout {
    pub glyph_id: GlyphId,
    /// Index of the font in the [`FontStack`](super::FontStack).
    pub font_index: usize,
    /// The first character this glyph was produced from.
    pub codepoint: char,
    /// Byte range in the source text.
    pub text_range: Range<usize>,
    pub line_index: usize,
    pub location: Point,
    /// Placement adjustment from `GPOS`, relative to `location`.
    pub offset: Point,
    pub advance_width: f32,
    pub advance_height: f32,
    /// The height of the line this glyph sits on.
    pub line_height: f32,
    /// The distance from the line top to the baseline.
    pub ascender: f32,
    pub is_whitespace: bool,
    pub is_color: bool,
}

impl GlyphLayout {
    /// Where the glyph is drawn: the pen location plus its offset.
    pub fn origin(&self) -> Point {
        self.location + self.offset
    }

    /// The cell this glyph occupies in its line box.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.location.x,
            self.location.y - self.ascender,
            self.advance_width,
            self.line_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_bounds() {
        let glyph = GlyphLayout {
            glyph_id: GlyphId::new(3),
            font_index: 0,
            codepoint: 'c',
            text_range: 2..3,
            line_index: 1,
            location: Point::new(10.0, 18.0),
            offset: Point::new(1.0, -2.0),
            advance_width: 5.0,
            advance_height: 10.0,
            line_height: 10.0,
            ascender: 8.0,
            is_whitespace: false,
            is_color: false,
        };
        assert_eq!(glyph.bounds(), Rect::new(10.0, 10.0, 5.0, 10.0));
        assert_eq!(glyph.origin(), Point::new(11.0, 16.0));
    }
}
