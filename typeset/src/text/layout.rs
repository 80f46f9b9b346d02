//! Shaping runs and breaking them into aligned lines.

use std::{collections::VecDeque, ops::Range};

use unicode_script::{Script, UnicodeScript};

use super::{
    is_whitespace,
    segment::{segment, Segment},
    FontStack, GlyphLayout, HorizontalAlignment, TextOptions, VerticalAlignment,
};
use crate::{collection::GlyphCollection, shaping, Font, GlyphId, Point, Tag};

/// The script tag used when a run has no characters of a specific script.
const COMMON_SCRIPT: Tag = Tag::new(b"Zyyy");

/// The layout engine.
///
/// It holds no state between calls; a single value can be used for any
/// number of layouts, from any number of threads.
#[derive(Copy, Clone, Default, Debug)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Lay out `text`, returning one entry per glyph in logical order.
    ///
    /// Text made only of whitespace lays out to nothing.
    pub fn layout(&self, text: &str, fonts: &FontStack, options: &TextOptions) -> Vec<GlyphLayout> {
        if text.is_empty() || fonts.is_empty() {
            return Vec::new();
        }
        let mut items = VecDeque::new();
        for segment in segment(text, fonts) {
            match segment {
                Segment::Run { font_index, range } => {
                    let Some(font) = fonts.get(font_index) else {
                        continue;
                    };
                    shape_run(text, range, font, font_index, options, &mut items);
                }
                Segment::LineBreak { font_index, range } => {
                    let Some(font) = fonts.get(font_index) else {
                        continue;
                    };
                    let codepoint = text[range.clone()].chars().next().unwrap_or('\n');
                    let metrics = FontMetricsPt::new(font, options.font_size);
                    items.push_back(Item {
                        glyph_id: font.glyph_id(codepoint).unwrap_or(GlyphId::NOTDEF),
                        font_index,
                        codepoint,
                        text_range: range,
                        advance: 0.0,
                        offset: Point::ZERO,
                        metrics,
                        is_whitespace: true,
                        is_color: false,
                        kind: ItemKind::LineBreak,
                    });
                }
            }
        }
        if items.iter().all(|item| item.is_whitespace) {
            return Vec::new();
        }
        let lines = break_lines(items, options.wrapping_width_points());
        place_lines(lines, options)
    }
}

/// Font metrics scaled to points.
#[derive(Copy, Clone, Debug)]
struct FontMetricsPt {
    line_height: f32,
    ascender: f32,
    advance_height: f32,
}

impl FontMetricsPt {
    fn new(font: &Font, font_size: f32) -> Self {
        let scale = font.scale(font_size);
        let metrics = font.metrics();
        Self {
            line_height: metrics.line_height as f32 * scale,
            ascender: metrics.ascender as f32 * scale,
            advance_height: metrics.advance_height_max as f32 * scale,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum ItemKind {
    Glyph,
    /// A tab advancing to the next multiple of `stop`.
    Tab { stop: f32 },
    LineBreak,
}

/// A shaped glyph waiting for a line.
#[derive(Clone, Debug)]
struct Item {
    glyph_id: GlyphId,
    font_index: usize,
    codepoint: char,
    text_range: Range<usize>,
    advance: f32,
    offset: Point,
    metrics: FontMetricsPt,
    is_whitespace: bool,
    is_color: bool,
    kind: ItemKind,
}

impl Item {
    /// The advance of this item with the pen at `pen`.
    fn advance_at(&self, pen: f32) -> f32 {
        match self.kind {
            ItemKind::Tab { stop } => tab_advance(pen, stop),
            _ => self.advance,
        }
    }

    fn is_break_opportunity(&self) -> bool {
        self.is_whitespace
    }
}

/// The distance from `pen` to the next tab stop.
fn tab_advance(pen: f32, stop: f32) -> f32 {
    if stop <= 0.0 {
        return 0.0;
    }
    ((pen / stop).floor() + 1.0) * stop - pen
}

fn shape_run(
    text: &str,
    range: Range<usize>,
    font: &Font,
    font_index: usize,
    options: &TextOptions,
    items: &mut VecDeque<Item>,
) {
    let run = &text[range.clone()];
    let mut glyphs = GlyphCollection::new();
    for (offset, ch) in run.char_indices() {
        let start = range.start + offset;
        let glyph_id = font.glyph_id(ch).unwrap_or(GlyphId::NOTDEF);
        glyphs.push(font.entry_for(ch, glyph_id, start..start + ch.len_utf8()));
    }
    shaping::shape(font, &mut glyphs, run_script(run), &options.shape_options());

    let scale = font.scale(options.font_size);
    let metrics = FontMetricsPt::new(font, options.font_size);
    let space_advance = font
        .glyph_id(' ')
        .map(|gid| font.advance_width(gid) as f32 * scale);
    for entry in glyphs.iter() {
        let position = &entry.position;
        let scaled = position.x_advance as f32 * scale;
        let advance = if scaled != 0.0 {
            scaled + options.letter_spacing
        } else {
            scaled
        };
        let kind = if entry.codepoint == '\t' {
            let unit = space_advance.unwrap_or(scaled);
            ItemKind::Tab {
                stop: options.tab_width as f32 * unit,
            }
        } else {
            ItemKind::Glyph
        };
        items.push_back(Item {
            glyph_id: entry.glyph_id,
            font_index,
            codepoint: entry.codepoint,
            text_range: entry.text_range.clone(),
            advance,
            offset: Point::new(
                position.x_offset as f32 * scale,
                -(position.y_offset as f32) * scale,
            ),
            metrics,
            is_whitespace: is_whitespace(entry.codepoint),
            is_color: font.is_color(entry.glyph_id),
            kind,
        });
    }
}

/// The script of the first character that has one.
fn run_script(run: &str) -> Tag {
    run.chars()
        .map(|ch| ch.script())
        .find(|script| !matches!(script, Script::Common | Script::Inherited | Script::Unknown))
        .and_then(|script| Tag::new_checked(script.short_name().as_bytes()).ok())
        .unwrap_or(COMMON_SCRIPT)
}

/// An item with its pen position relative to the line start.
#[derive(Clone, Debug)]
struct Placed {
    item: Item,
    x: f32,
    advance: f32,
}

#[derive(Default, Debug)]
struct Line {
    glyphs: Vec<Placed>,
    pen: f32,
    /// Number of glyphs up to and including the last break opportunity.
    last_break: Option<usize>,
}

impl Line {
    fn push(&mut self, item: Item) {
        let advance = item.advance_at(self.pen);
        if item.is_break_opportunity() {
            self.last_break = Some(self.glyphs.len() + 1);
        }
        self.glyphs.push(Placed {
            item,
            x: self.pen,
            advance,
        });
        self.pen += advance;
    }

    fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The width of the line, ignoring trailing whitespace.
    fn width(&self) -> f32 {
        self.glyphs
            .iter()
            .filter(|glyph| !glyph.item.is_whitespace)
            .map(|glyph| glyph.x + glyph.advance)
            .fold(0.0, f32::max)
    }
}

/// Assign items to lines, wrapping at `wrap` points when it is positive.
fn break_lines(mut items: VecDeque<Item>, wrap: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();
    while let Some(item) = items.pop_front() {
        if item.kind == ItemKind::LineBreak {
            line.push(item);
            lines.push(std::mem::take(&mut line));
            continue;
        }
        let advance = item.advance_at(line.pen);
        let overflows = wrap > 0.0
            && advance > 0.0
            && !item.is_whitespace
            && !line.is_empty()
            && line.pen + advance > wrap;
        if overflows {
            items.push_front(item);
            let carried = match line.last_break {
                Some(at) if at < line.glyphs.len() => line.glyphs.split_off(at),
                _ => Vec::new(),
            };
            // the carried glyphs go back to the queue to be placed afresh
            for placed in carried.into_iter().rev() {
                items.push_front(placed.item);
            }
            lines.push(std::mem::take(&mut line));
            continue;
        }
        line.push(item);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Compute final locations, applying line metrics and alignment.
fn place_lines(lines: Vec<Line>, options: &TextOptions) -> Vec<GlyphLayout> {
    let origin = options.origin_points();
    let available = options.wrapping_width_points();
    let metrics: Vec<(f32, f32)> = lines
        .iter()
        .map(|line| {
            let height = line
                .glyphs
                .iter()
                .map(|glyph| glyph.item.metrics.line_height)
                .fold(0.0, f32::max);
            let ascender = line
                .glyphs
                .iter()
                .map(|glyph| glyph.item.metrics.ascender)
                .fold(0.0, f32::max);
            (height * options.line_spacing, ascender)
        })
        .collect();
    let block_height: f32 = metrics.iter().map(|(height, _)| height).sum();
    let y_offset = match options.vertical_alignment {
        VerticalAlignment::Top => 0.0,
        VerticalAlignment::Center => -block_height / 2.0,
        VerticalAlignment::Bottom => -block_height,
    };

    let mut result = Vec::with_capacity(lines.iter().map(|line| line.glyphs.len()).sum());
    let mut top = origin.y + y_offset;
    for (line_index, (line, (height, ascender))) in lines.into_iter().zip(metrics).enumerate() {
        let width = line.width();
        let x_offset = match options.horizontal_alignment {
            HorizontalAlignment::Left => 0.0,
            HorizontalAlignment::Center => (available - width) / 2.0,
            HorizontalAlignment::Right => available - width,
        };
        let baseline = top + ascender;
        for Placed { item, x, advance } in line.glyphs {
            result.push(GlyphLayout {
                glyph_id: item.glyph_id,
                font_index: item.font_index,
                codepoint: item.codepoint,
                text_range: item.text_range,
                line_index,
                location: Point::new(origin.x + x_offset + x, baseline),
                offset: item.offset,
                advance_width: advance,
                advance_height: item.metrics.advance_height,
                line_height: height,
                ascender,
                is_whitespace: item.is_whitespace,
                is_color: item.is_color,
            });
        }
        top += height;
    }
    result
}
