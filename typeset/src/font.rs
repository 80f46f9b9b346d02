//! A loaded font and its global metrics.

use std::ops::Range;

use read_fonts::{
    tables::{
        cmap::Cmap,
        colr::Colr,
        gdef::{Gdef, GlyphClassDef},
        gpos::Gpos,
        gsub::Gsub,
        hmtx::Hmtx,
        layout::{LookupList, LookupSubtable},
    },
    FontRef, ReadError, TableProvider, TopLevelTable,
};

use crate::{collection::GlyphEntry, Error, GlyphId, Tag};

/// Metrics that apply to all glyphs in a font, in font units.
///
/// These are derived from the following tables:
/// * [head](https://learn.microsoft.com/en-us/typography/opentype/spec/head): `units_per_em`, `is_bold`, `is_italic`
/// * [maxp](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp): `glyph_count`
/// * [hhea](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea): the line metrics and `advance_width_max`
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct FontMetrics {
    /// Number of font design units per em unit.
    pub units_per_em: u16,
    /// Number of glyphs in the font.
    pub glyph_count: u16,
    /// Distance from the baseline to the top of the line.
    pub ascender: i16,
    /// Distance from the baseline to the bottom of the line; usually negative.
    pub descender: i16,
    pub line_gap: i16,
    /// `ascender - descender + line_gap`.
    pub line_height: i32,
    pub advance_width_max: u16,
    /// Vertical metrics are not read, so this is the line height.
    pub advance_height_max: i32,
    pub is_bold: bool,
    pub is_italic: bool,
}

/// A font ready for shaping and layout.
///
/// All tables are read and validated up front, so a `Font` that loads
/// successfully never fails later. The font borrows the caller's data.
#[derive(Clone, Debug)]
pub struct Font<'a> {
    font: FontRef<'a>,
    metrics: FontMetrics,
    hmtx: Hmtx<'a>,
    cmap: Cmap<'a>,
    gdef: Option<Gdef<'a>>,
    gsub: Option<Gsub<'a>>,
    gpos: Option<Gpos<'a>>,
    colr: Option<Colr<'a>>,
    unsupported: Vec<Error>,
}

impl<'a> Font<'a> {
    /// Load a font from the bytes of a font file.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        Self::from_font_ref(FontRef::new(data)?)
    }

    /// Load the font at `index` in a font collection.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, Error> {
        Self::from_font_ref(FontRef::from_index(data, index)?)
    }

    pub fn from_font_ref(font: FontRef<'a>) -> Result<Self, Error> {
        let head = font.head()?;
        let hhea = font.hhea()?;
        let maxp = font.maxp()?;
        let ascender = hhea.ascender().to_i16();
        let descender = hhea.descender().to_i16();
        let line_gap = hhea.line_gap().to_i16();
        let line_height = ascender as i32 - descender as i32 + line_gap as i32;
        let metrics = FontMetrics {
            units_per_em: head.units_per_em(),
            glyph_count: maxp.num_glyphs(),
            ascender,
            descender,
            line_gap,
            line_height,
            advance_width_max: hhea.advance_width_max().to_u16(),
            advance_height_max: line_height,
            is_bold: head.mac_style().is_bold(),
            is_italic: head.mac_style().is_italic(),
        };
        let hmtx = font.hmtx()?;
        let cmap = font.cmap()?;
        let gdef = optional(font.gdef())?;
        let gsub = optional(font.gsub())?;
        let gpos = optional(font.gpos())?;
        let colr = optional(font.colr())?;
        let mut unsupported = Vec::new();
        if let Some(gsub) = &gsub {
            collect_unsupported(Gsub::TAG, gsub.lookup_list(), &mut unsupported);
        }
        if let Some(gpos) = &gpos {
            collect_unsupported(Gpos::TAG, gpos.lookup_list(), &mut unsupported);
        }
        log::debug!(
            "loaded font: {} upem, {} glyphs, GDEF {}, GSUB {}, GPOS {}, COLR {}",
            metrics.units_per_em,
            metrics.glyph_count,
            gdef.is_some(),
            gsub.is_some(),
            gpos.is_some(),
            colr.is_some(),
        );
        Ok(Font {
            font,
            metrics,
            hmtx,
            cmap,
            gdef,
            gsub,
            gpos,
            colr,
            unsupported,
        })
    }

    pub fn font_ref(&self) -> &FontRef<'a> {
        &self.font
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn units_per_em(&self) -> u16 {
        self.metrics.units_per_em
    }

    /// The factor converting font units to points at `font_size`.
    pub fn scale(&self, font_size: f32) -> f32 {
        font_size / self.metrics.units_per_em as f32
    }

    /// The glyph mapped to `ch`, or `None` if it is unmapped or mapped to
    /// `.notdef`.
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.cmap
            .map_codepoint(ch)
            .filter(|gid| !gid.is_notdef() && gid.to_u16() < self.metrics.glyph_count)
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyph_id(ch).is_some()
    }

    pub fn lookup_glyph(&self, ch: char) -> Result<GlyphId, Error> {
        self.glyph_id(ch).ok_or(Error::NoGlyphAvailable(ch))
    }

    /// The advance width of a glyph in font units; 0 for glyphs past the
    /// end of `hmtx`.
    pub fn advance_width(&self, glyph_id: GlyphId) -> u16 {
        self.hmtx.advance(glyph_id).unwrap_or_default()
    }

    /// `true` if the glyph has a `COLR` color definition.
    pub fn is_color(&self, glyph_id: GlyphId) -> bool {
        self.colr
            .as_ref()
            .is_some_and(|colr| colr.contains_glyph(glyph_id))
    }

    /// The `GDEF` glyph class, if the font classifies glyphs.
    pub fn glyph_class(&self, glyph_id: GlyphId) -> Option<GlyphClassDef> {
        self.gdef.as_ref()?.glyph_class(glyph_id)
    }

    pub fn mark_attach_class(&self, glyph_id: GlyphId) -> u16 {
        self.gdef
            .as_ref()
            .map(|gdef| gdef.mark_attach_class(glyph_id))
            .unwrap_or_default()
    }

    pub fn gdef(&self) -> Option<&Gdef<'a>> {
        self.gdef.as_ref()
    }

    pub fn gsub(&self) -> Option<&Gsub<'a>> {
        self.gsub.as_ref()
    }

    pub fn gpos(&self) -> Option<&Gpos<'a>> {
        self.gpos.as_ref()
    }

    /// Every lookup subtable that was skipped because its format is not
    /// supported.
    pub fn unsupported_subtables(&self) -> &[Error] {
        &self.unsupported
    }

    /// A classified collection entry for a character.
    ///
    /// Without a `GDEF` glyph class definition, combining marks are
    /// recognized by their code point.
    pub(crate) fn entry_for(&self, ch: char, glyph_id: GlyphId, text_range: Range<usize>) -> GlyphEntry {
        let class = self
            .glyph_class(glyph_id)
            .unwrap_or_else(|| guess_class(ch));
        GlyphEntry::new(glyph_id, ch, text_range)
            .with_class(class, self.mark_attach_class(glyph_id))
    }
}

/// Treat a missing table as absent; any other error is fatal.
fn optional<T>(table: Result<T, ReadError>) -> Result<Option<T>, ReadError> {
    match table {
        Ok(table) => Ok(Some(table)),
        Err(ReadError::TableIsMissing(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

fn collect_unsupported<'a, T: LookupSubtable<'a>>(
    table: Tag,
    lookups: &LookupList<'a, T>,
    out: &mut Vec<Error>,
) {
    for (lookup_index, lookup) in lookups.lookups().iter().enumerate() {
        for subtable in lookup.subtables() {
            if let Some((lookup_type, format)) = subtable.unsupported_format() {
                let err = Error::UnsupportedFormat {
                    table,
                    lookup_index: lookup_index as u16,
                    lookup_type,
                    format,
                };
                log::warn!("{err}");
                out.push(err);
            }
        }
    }
}

fn guess_class(ch: char) -> GlyphClassDef {
    match ch {
        '\u{0300}'..='\u{036F}'
        | '\u{0483}'..='\u{0489}'
        | '\u{0591}'..='\u{05BD}'
        | '\u{064B}'..='\u{065F}'
        | '\u{1AB0}'..='\u{1AFF}'
        | '\u{1DC0}'..='\u{1DFF}'
        | '\u{20D0}'..='\u{20FF}'
        | '\u{FE20}'..='\u{FE2F}' => GlyphClassDef::Mark,
        _ => GlyphClassDef::Base,
    }
}
