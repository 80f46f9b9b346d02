//! Handing laid out glyphs to a drawing backend.

use std::ops::Range;

use super::{measure::layout_bounds, FontStack, TextLayout, TextOptions};
use crate::{GlyphId, Point, Rect, Size};

/// What a renderer needs to draw one glyph.
#[derive(Clone, PartialEq, Debug)]
pub struct GlyphRenderParams {
    pub glyph_id: GlyphId,
    pub font_index: usize,
    pub codepoint: char,
    pub text_range: Range<usize>,
    /// The glyph origin on the baseline, in pixels.
    pub position: Point,
    /// The em size in pixels on each axis.
    pub size: Size,
    /// The glyph has a `COLR` definition.
    pub is_color: bool,
}

/// A drawing backend.
///
/// For each piece of text, `begin_text` is called once with the bounds of
/// the whole layout, then `render_glyph` for every visible glyph in layout
/// order, then `end_text`.
pub trait GlyphRenderer {
    fn begin_text(&mut self, bounds: Rect);

    fn render_glyph(&mut self, params: &GlyphRenderParams);

    fn end_text(&mut self);
}

/// Lays out text and sends it to a [`GlyphRenderer`].
pub struct TextRenderer<'r, R: ?Sized> {
    renderer: &'r mut R,
    layout: TextLayout,
}

impl<'r, R: GlyphRenderer + ?Sized> TextRenderer<'r, R> {
    pub fn new(renderer: &'r mut R) -> Self {
        Self {
            renderer,
            layout: TextLayout::new(),
        }
    }

    /// Render `text`, skipping whitespace.
    ///
    /// The bounds passed to `begin_text` are those returned by
    /// [`TextMeasurer::measure_bounds`](super::TextMeasurer::measure_bounds)
    /// for the same arguments.
    pub fn render_text(&mut self, text: &str, fonts: &FontStack, options: &TextOptions) {
        let glyphs = self.layout.layout(text, fonts, options);
        let (sx, sy) = options.pixels_per_point();
        let size = Size::new(options.font_size * sx, options.font_size * sy);
        self.renderer.begin_text(layout_bounds(&glyphs, options));
        for glyph in glyphs.iter().filter(|glyph| !glyph.is_whitespace) {
            log::trace!("render {} at {:?}", glyph.glyph_id, glyph.origin());
            self.renderer.render_glyph(&GlyphRenderParams {
                glyph_id: glyph.glyph_id,
                font_index: glyph.font_index,
                codepoint: glyph.codepoint,
                text_range: glyph.text_range.clone(),
                position: glyph.origin().scale(sx, sy),
                size,
                is_color: glyph.is_color,
            });
        }
        self.renderer.end_text();
    }
}

/// Render `text` to `renderer` in one call.
pub fn render_text_to<R: GlyphRenderer + ?Sized>(
    renderer: &mut R,
    text: &str,
    fonts: &FontStack,
    options: &TextOptions,
) {
    TextRenderer::new(renderer).render_text(text, fonts, options);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{text::tests::primary_font_data, Font, TextMeasurer};

    #[derive(Default)]
    struct Recorder {
        bounds: Vec<Rect>,
        glyphs: Vec<GlyphRenderParams>,
        ended: usize,
    }

    impl GlyphRenderer for Recorder {
        fn begin_text(&mut self, bounds: Rect) {
            self.bounds.push(bounds);
        }

        fn render_glyph(&mut self, params: &GlyphRenderParams) {
            self.glyphs.push(params.clone());
        }

        fn end_text(&mut self) {
            self.ended += 1;
        }
    }

    #[test]
    fn whitespace_is_not_rendered() {
        let data = primary_font_data();
        let font = Font::new(&data).unwrap();
        let fonts = FontStack::new(&font);
        let options = TextOptions {
            font_size: 10.0,
            dpi: (144.0, 144.0),
            ..Default::default()
        };
        let mut recorder = Recorder::default();
        render_text_to(&mut recorder, "a b\nc", &fonts, &options);
        let rendered: String = recorder.glyphs.iter().map(|glyph| glyph.codepoint).collect();
        assert_eq!(rendered, "abc");
        assert_eq!(recorder.glyphs[1].position, Point::new(15.0, 16.0));
        assert_eq!(recorder.glyphs[0].size, Size::new(20.0, 20.0));
        assert_eq!(recorder.ended, 1);
    }

    #[test]
    fn rendered_bounds_match_measurement() {
        let data = primary_font_data();
        let font = Font::new(&data).unwrap();
        let fonts = FontStack::new(&font);
        let options = TextOptions {
            font_size: 14.0,
            dpi: (96.0, 96.0),
            wrapping_width: 50.0,
            ..Default::default()
        };
        let text = "abc abc\tde\nedcba";
        let mut recorder = Recorder::default();
        TextRenderer::new(&mut recorder).render_text(text, &fonts, &options);
        let measured = TextMeasurer::new().measure_bounds(text, &fonts, &options);
        assert_eq!(recorder.bounds, [measured]);
    }

    #[test]
    fn empty_text_still_brackets() {
        let data = primary_font_data();
        let font = Font::new(&data).unwrap();
        let fonts = FontStack::new(&font);
        let mut recorder = Recorder::default();
        render_text_to(&mut recorder, "", &fonts, &TextOptions::default());
        assert_eq!(recorder.bounds, [Rect::default()]);
        assert!(recorder.glyphs.is_empty());
        assert_eq!(recorder.ended, 1);
    }

    #[test]
    fn whitespace_only_renders_nothing() {
        let data = primary_font_data();
        let font = Font::new(&data).unwrap();
        let fonts = FontStack::new(&font);
        let mut recorder = Recorder::default();
        render_text_to(&mut recorder, "  \n ", &fonts, &TextOptions::default());
        assert_eq!(recorder.bounds, [Rect::default()]);
        assert!(recorder.glyphs.is_empty());
        assert_eq!(recorder.ended, 1);
    }
}
