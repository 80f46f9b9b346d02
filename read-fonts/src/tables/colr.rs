//! The [COLR](https://docs.microsoft.com/en-us/typography/opentype/spec/colr) table
//!
//! Only the set of color glyphs is exposed; layers and paint graphs are left
//! to the renderer.

use types::{BigEndian, FixedSize, GlyphId16, Offset32, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// A version 0 base glyph record.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct BaseGlyph {
    pub glyph_id: BigEndian<GlyphId16>,
    pub first_layer_index: BigEndian<u16>,
    pub num_layers: BigEndian<u16>,
}

impl FixedSize for BaseGlyph {
    const RAW_BYTE_LEN: usize = 6;
}

/// A version 1 base glyph paint record.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct BaseGlyphPaint {
    pub glyph_id: BigEndian<GlyphId16>,
    pub paint_offset: BigEndian<Offset32>,
}

impl FixedSize for BaseGlyphPaint {
    const RAW_BYTE_LEN: usize = 6;
}

/// The color table.
#[derive(Clone, Debug)]
pub struct Colr<'a> {
    version: u16,
    base_glyph_records: &'a [BaseGlyph],
    base_glyph_paint_records: &'a [BaseGlyphPaint],
}

impl TopLevelTable for Colr<'_> {
    const TAG: Tag = Tag::new(b"COLR");
}

impl<'a> FontRead<'a> for Colr<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        let num_base_glyph_records: u16 = cursor.read()?;
        let base_glyph_records_offset: Offset32 = cursor.read()?;
        // layerRecordsOffset, numLayerRecords
        cursor.advance_by(6);
        let base_glyph_records = match base_glyph_records_offset.non_null() {
            Some(offset) => {
                let len = num_base_glyph_records as usize * BaseGlyph::RAW_BYTE_LEN;
                data.read_array(offset..offset.saturating_add(len))?
            }
            None => &[],
        };
        let base_glyph_paint_records = match version {
            0 => &[],
            _ => {
                let base_glyph_list_offset: Offset32 = cursor.read()?;
                match base_glyph_list_offset.non_null() {
                    Some(offset) => {
                        let count: u32 = data.read_at(offset)?;
                        let start = offset + u32::RAW_BYTE_LEN;
                        let len = (count as usize)
                            .checked_mul(BaseGlyphPaint::RAW_BYTE_LEN)
                            .ok_or(ReadError::OutOfBounds)?;
                        data.read_array(start..start.saturating_add(len))?
                    }
                    None => &[],
                }
            }
        };
        Ok(Colr {
            version,
            base_glyph_records,
            base_glyph_paint_records,
        })
    }
}

impl<'a> Colr<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn base_glyph_records(&self) -> &'a [BaseGlyph] {
        self.base_glyph_records
    }

    pub fn base_glyph_paint_records(&self) -> &'a [BaseGlyphPaint] {
        self.base_glyph_paint_records
    }

    /// `true` if the glyph has a color definition in either version.
    pub fn contains_glyph(&self, gid: GlyphId16) -> bool {
        // both record arrays are sorted by glyph id
        self.base_glyph_paint_records
            .binary_search_by(|rec| rec.glyph_id.get().cmp(&gid))
            .is_ok()
            || self
                .base_glyph_records
                .binary_search_by(|rec| rec.glyph_id.get().cmp(&gid))
                .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::be_buffer;

    #[test]
    fn version0_records() {
        let buf = be_buffer! {
            0u16, 2u16, 14u32, 0u32, 0u16,
            // base glyph records @14
            4u16, 0u16, 2u16,
            9u16, 2u16, 1u16
        };
        let colr = Colr::read(FontData::new(&buf)).unwrap();
        assert!(colr.contains_glyph(GlyphId16::new(4)));
        assert!(colr.contains_glyph(GlyphId16::new(9)));
        assert!(!colr.contains_glyph(GlyphId16::new(5)));
    }

    #[test]
    fn version1_base_glyph_list() {
        let buf = be_buffer! {
            1u16, 0u16, 0u32, 0u32, 0u16,
            // baseGlyphList, then the remaining v1 offsets
            34u32, 0u32, 0u32, 0u32, 0u32,
            // base glyph list @34
            1u32,
            12u16, 100u32
        };
        let colr = Colr::read(FontData::new(&buf)).unwrap();
        assert!(colr.contains_glyph(GlyphId16::new(12)));
        assert!(!colr.contains_glyph(GlyphId16::new(4)));
    }

    #[test]
    fn truncated_records() {
        let buf = be_buffer! { 0u16, 3u16, 14u32, 0u32, 0u16, 4u16, 0u16, 2u16 };
        assert!(Colr::read(FontData::new(&buf)).is_err());
    }
}
