//! Measuring laid out text.

use std::ops::Range;

use super::{FontStack, GlyphLayout, TextLayout, TextOptions};
use crate::{Rect, Size};

/// The union of the glyph cells, in pixels.
///
/// An empty layout has a zero sized rectangle at the origin.
pub(crate) fn layout_bounds(glyphs: &[GlyphLayout], options: &TextOptions) -> Rect {
    let (sx, sy) = options.pixels_per_point();
    glyphs
        .iter()
        .map(GlyphLayout::bounds)
        .reduce(|acc, bounds| acc.union(&bounds))
        .map(|bounds| bounds.scale(sx, sy))
        .unwrap_or(Rect::new(options.origin.x, options.origin.y, 0.0, 0.0))
}

/// The cell of a single glyph, for hit testing.
#[derive(Clone, PartialEq, Debug)]
pub struct GlyphBounds {
    pub codepoint: char,
    pub text_range: Range<usize>,
    pub line_index: usize,
    /// In pixels.
    pub bounds: Rect,
}

/// Computes the extent of text without rendering it.
#[derive(Clone, Default, Debug)]
pub struct TextMeasurer {
    layout: TextLayout,
}

impl TextMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The size of the laid out text in pixels.
    pub fn measure(&self, text: &str, fonts: &FontStack, options: &TextOptions) -> Size {
        let glyphs = self.layout.layout(text, fonts, options);
        if glyphs.is_empty() {
            return Size::ZERO;
        }
        layout_bounds(&glyphs, options).size()
    }

    /// The bounding rectangle of the laid out text in pixels.
    pub fn measure_bounds(&self, text: &str, fonts: &FontStack, options: &TextOptions) -> Rect {
        let glyphs = self.layout.layout(text, fonts, options);
        layout_bounds(&glyphs, options)
    }

    /// The cell of every glyph, whitespace included, in layout order.
    pub fn measure_character_bounds(
        &self,
        text: &str,
        fonts: &FontStack,
        options: &TextOptions,
    ) -> Vec<GlyphBounds> {
        let (sx, sy) = options.pixels_per_point();
        self.layout
            .layout(text, fonts, options)
            .into_iter()
            .map(|glyph| GlyphBounds {
                codepoint: glyph.codepoint,
                bounds: glyph.bounds().scale(sx, sy),
                text_range: glyph.text_range,
                line_index: glyph.line_index,
            })
            .collect()
    }
}
