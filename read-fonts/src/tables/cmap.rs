//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use types::{BigEndian, FixedSize, GlyphId16, Offset32, Tag};

use crate::{FontData, FontRead, ReadError, ResolveOffset, TopLevelTable};

/// An encoding record: platform, encoding, and the subtable offset.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct EncodingRecord {
    pub platform_id: BigEndian<u16>,
    pub encoding_id: BigEndian<u16>,
    pub subtable_offset: BigEndian<Offset32>,
}

impl FixedSize for EncodingRecord {
    const RAW_BYTE_LEN: usize = 8;
}

impl EncodingRecord {
    pub fn platform_id(&self) -> u16 {
        self.platform_id.get()
    }

    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    /// A rank for choosing among Unicode subtables; lower is better.
    fn unicode_rank(&self, format: u16) -> Option<u8> {
        match (self.platform_id(), self.encoding_id(), format) {
            (3, 10, 12) | (0, 4, 12) | (0, 6, 12) => Some(0),
            (3, 1, 4) => Some(1),
            (0, 3, 4) => Some(2),
            (0, _, 4) => Some(3),
            (3, 0, 4) => Some(4),
            _ => None,
        }
    }
}

/// A character to glyph mapping subtable.
#[derive(Clone, Debug)]
pub enum CmapSubtable<'a> {
    Format4(Cmap4<'a>),
    Format12(Cmap12<'a>),
}

impl<'a> CmapSubtable<'a> {
    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Format4(_) => 4,
            CmapSubtable::Format12(_) => 12,
        }
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        match self {
            CmapSubtable::Format4(table) => table.map_codepoint(codepoint),
            CmapSubtable::Format12(table) => table.map_codepoint(codepoint),
        }
    }
}

/// The character to glyph index mapping table.
///
/// Subtables in formats other than 4 and 12 are ignored. Among the
/// remaining Unicode subtables the most complete one is chosen when the
/// table is read.
#[derive(Clone, Debug)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    encoding_records: &'a [EncodingRecord],
    best: Option<CmapSubtable<'a>>,
}

impl TopLevelTable for Cmap<'_> {
    const TAG: Tag = Tag::new(b"cmap");
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _version: u16 = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let encoding_records: &[EncodingRecord] = cursor.read_array(num_tables as usize)?;
        let mut best: Option<(u8, CmapSubtable)> = None;
        for record in encoding_records {
            let offset = record.subtable_offset.get();
            let subtable_data = offset
                .non_null()
                .and_then(|offset| data.split_off(offset))
                .ok_or(ReadError::OutOfBounds)?;
            let format: u16 = subtable_data.read_at(0)?;
            let Some(rank) = record.unicode_rank(format) else {
                continue;
            };
            if best.as_ref().is_some_and(|(best_rank, _)| *best_rank <= rank) {
                continue;
            }
            let subtable = match format {
                4 => CmapSubtable::Format4(offset.resolve(data)?),
                _ => CmapSubtable::Format12(offset.resolve(data)?),
            };
            best = Some((rank, subtable));
        }
        Ok(Cmap {
            data,
            encoding_records,
            best: best.map(|(_, subtable)| subtable),
        })
    }
}

impl<'a> Cmap<'a> {
    pub fn encoding_records(&self) -> &'a [EncodingRecord] {
        self.encoding_records
    }

    /// The subtable used for mapping, if any Unicode subtable was found.
    pub fn best_subtable(&self) -> Option<&CmapSubtable<'a>> {
        self.best.as_ref()
    }

    /// Map a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId16> {
        self.best.as_ref()?.map_codepoint(codepoint.into())
    }

    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

/// Format 4: segment mapping to delta values.
#[derive(Clone, Debug)]
pub struct Cmap4<'a> {
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<i16>],
    id_range_offsets: &'a [BigEndian<u16>],
    glyph_id_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let length: u16 = cursor.read()?;
        let _language: u16 = cursor.read()?;
        let seg_count = cursor.read::<u16>()? as usize / 2;
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(6);
        let end_code = cursor.read_array(seg_count)?;
        let _reserved_pad: u16 = cursor.read()?;
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        let id_range_offsets = cursor.read_array(seg_count)?;
        // many fonts have a bogus length field, so clamp to the data we have
        let end = (length as usize).clamp(cursor.position(), data.len());
        let glyph_count = (end - cursor.position()) / 2;
        let glyph_id_array = cursor.read_array(glyph_count)?;
        Ok(Cmap4 {
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
            glyph_id_array,
        })
    }
}

impl Cmap4<'_> {
    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        let codepoint = u16::try_from(codepoint).ok()?;
        // segments are sorted by end code
        let index = self
            .end_code
            .partition_point(|end| end.get() < codepoint);
        let start = self.start_code.get(index)?.get();
        if codepoint < start {
            return None;
        }
        let delta = self.id_delta.get(index)?.get();
        let range_offset = self.id_range_offsets.get(index)?.get() as usize;
        if range_offset == 0 {
            return Some(GlyphId16::new(codepoint.wrapping_add_signed(delta)));
        }
        // the range offset is relative to its own position in the
        // idRangeOffsets array, which immediately precedes glyphIdArray.
        let position = (range_offset / 2 + (codepoint - start) as usize + index)
            .checked_sub(self.id_range_offsets.len())?;
        let gid = self.glyph_id_array.get(position)?.get();
        (gid != 0).then(|| GlyphId16::new(gid.wrapping_add_signed(delta)))
    }
}

/// A sequential map group record in a format 12 subtable.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct SequentialMapGroup {
    pub start_char_code: BigEndian<u32>,
    pub end_char_code: BigEndian<u32>,
    pub start_glyph_id: BigEndian<u32>,
}

impl FixedSize for SequentialMapGroup {
    const RAW_BYTE_LEN: usize = 12;
}

/// Format 12: segmented coverage.
#[derive(Clone, Debug)]
pub struct Cmap12<'a> {
    groups: &'a [SequentialMapGroup],
}

impl<'a> FontRead<'a> for Cmap12<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        // reserved, length, language
        cursor.advance_by(10);
        let num_groups: u32 = cursor.read()?;
        let groups = cursor.read_array(num_groups as usize)?;
        Ok(Cmap12 { groups })
    }
}

impl<'a> Cmap12<'a> {
    pub fn groups(&self) -> &'a [SequentialMapGroup] {
        self.groups
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        let index = self
            .groups
            .partition_point(|group| group.end_char_code.get() < codepoint);
        let group = self.groups.get(index)?;
        let start = group.start_char_code.get();
        if codepoint < start {
            return None;
        }
        let gid = group.start_glyph_id.get().checked_add(codepoint - start)?;
        u16::try_from(gid).ok().map(GlyphId16::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::{be_buffer, bebuffer::BeBuffer};

    fn format4() -> BeBuffer {
        be_buffer! {
            4u16,   // format
            50u16,  // length
            0u16,   // language
            6u16,   // segCountX2
            0u16, 0u16, 0u16,
            // endCode
            [0x0020u16, 0x0045, 0xFFFF],
            0u16,   // reservedPad
            // startCode
            [0x0020u16, 0x0041, 0xFFFF],
            // idDelta: ' ' -> 1, 'A'..='E' through the glyph array
            [-31i16, 0, 1],
            // idRangeOffset
            [0u16, 4, 0],
            // glyphIdArray
            [10u16, 11, 0, 13, 14]
        }
    }

    fn cmap_with(platform: u16, encoding: u16, subtable: &[u8]) -> Vec<u8> {
        let mut buf = be_buffer! {
            0u16, 1u16,
            (platform), (encoding), 12u32
        }
        .to_vec();
        buf.extend_from_slice(subtable);
        buf
    }

    #[test]
    fn format4_delta_and_range_offsets() {
        let buf = format4();
        let table = Cmap4::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.map_codepoint(0x20), Some(GlyphId16::new(1)));
        assert_eq!(table.map_codepoint(0x41), Some(GlyphId16::new(10)));
        assert_eq!(table.map_codepoint(0x42), Some(GlyphId16::new(11)));
        // a zero entry in the glyph array means no glyph
        assert_eq!(table.map_codepoint(0x43), None);
        assert_eq!(table.map_codepoint(0x45), Some(GlyphId16::new(14)));
        assert_eq!(table.map_codepoint(0x30), None);
        assert_eq!(table.map_codepoint(0x1F600), None);
    }

    #[test]
    fn format12_groups() {
        let buf = be_buffer! {
            12u16, 0u16, 40u32, 0u32,
            2u32,  // numGroups
            0x20u32, 0x20u32, 1u32,
            0x1F600u32, 0x1F602u32, 7u32
        };
        let table = Cmap12::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.map_codepoint(0x20), Some(GlyphId16::new(1)));
        assert_eq!(table.map_codepoint(0x1F601), Some(GlyphId16::new(8)));
        assert_eq!(table.map_codepoint(0x1F603), None);
        assert_eq!(table.map_codepoint(0x21), None);
    }

    #[test]
    fn picks_unicode_subtable() {
        let buf = cmap_with(3, 1, &format4());
        let cmap = Cmap::read(FontData::new(&buf)).unwrap();
        assert_eq!(cmap.best_subtable().map(|sub| sub.format()), Some(4));
        assert_eq!(cmap.map_codepoint('A'), Some(GlyphId16::new(10)));
    }

    #[test]
    fn ignores_symbol_encodings() {
        let buf = cmap_with(1, 0, &format4());
        let cmap = Cmap::read(FontData::new(&buf)).unwrap();
        assert!(cmap.best_subtable().is_none());
        assert_eq!(cmap.map_codepoint('A'), None);
    }
}
