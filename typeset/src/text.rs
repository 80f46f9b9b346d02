//! Turning strings into positioned glyphs.
//!
//! A layout call runs a fixed pipeline:
//!
//! 1. The text is split into runs at hard line breaks and wherever the font
//!    that can display a character changes. The primary font is preferred;
//!    the fallbacks in a [`FontStack`] are consulted in order.
//! 2. Each run is shaped with the `GSUB` and `GPOS` lookups of its font.
//! 3. The glyphs are broken into lines at the wrapping width, with tabs
//!    expanded to the next tab stop.
//! 4. Every line is aligned as a whole, and the block as a whole, without
//!    touching the spacing between glyphs.
//!
//! [`GlyphLayout`] lengths are in points in a y-down space. Measuring and
//! rendering convert to pixels using the configured DPI.

mod glyph_layout;
mod layout;
mod measure;
mod options;
mod render;
mod segment;

pub use glyph_layout::GlyphLayout;
pub use layout::TextLayout;
pub use measure::{GlyphBounds, TextMeasurer};
pub use options::{HorizontalAlignment, TextOptions, VerticalAlignment};
pub use render::{render_text_to, GlyphRenderParams, GlyphRenderer, TextRenderer};

use crate::Font;

/// A primary font and the fallback fonts consulted, in order, for
/// characters it cannot display.
///
/// Index 0 is the primary font and index `n` is fallback `n - 1`; these are
/// the values of [`GlyphLayout::font_index`].
#[derive(Clone, Debug)]
pub struct FontStack<'a> {
    fonts: Vec<&'a Font<'a>>,
}

impl<'a> FontStack<'a> {
    pub fn new(primary: &'a Font<'a>) -> Self {
        Self {
            fonts: vec![primary],
        }
    }

    /// Add a fallback after the existing ones.
    pub fn with_fallback(mut self, font: &'a Font<'a>) -> Self {
        self.fonts.push(font);
        self
    }

    pub fn primary(&self) -> &'a Font<'a> {
        self.fonts[0]
    }

    pub fn get(&self, index: usize) -> Option<&'a Font<'a>> {
        self.fonts.get(index).copied()
    }

    /// The number of fonts, the primary included.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Font<'a>> + '_ {
        self.fonts.iter().copied()
    }
}

/// True for characters that take up space but are never drawn.
pub(crate) fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{200B}'
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::font::tests::simple_font_data;
    use font_test_data::FontBuilder;

    /// A fallback font where `x` is glyph 1 and `y` is glyph 2, each 600
    /// units wide, with taller metrics than the primary font.
    pub(crate) fn fallback_font_data() -> Vec<u8> {
        FontBuilder::with_metrics(1000, (1000, -300, 100), &[('x', 1), ('y', 2)], &[0, 600, 600])
            .build()
    }

    pub(crate) fn primary_font_data() -> Vec<u8> {
        simple_font_data().build()
    }

    #[test]
    fn font_stack_order() {
        let primary = primary_font_data();
        let fallback = fallback_font_data();
        let primary = Font::new(&primary).unwrap();
        let fallback = Font::new(&fallback).unwrap();
        let fonts = FontStack::new(&primary).with_fallback(&fallback);
        assert_eq!(fonts.len(), 2);
        assert!(fonts.primary().has_glyph('a'));
        assert!(fonts.get(1).unwrap().has_glyph('x'));
        assert!(fonts.get(2).is_none());
    }

    #[test]
    fn zero_width_space_is_whitespace() {
        assert!(is_whitespace('\u{200B}'));
        assert!(is_whitespace('\t'));
        assert!(!is_whitespace('a'));
    }
}
