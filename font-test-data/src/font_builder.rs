//! Assembling small sfnt fonts for tests

use std::collections::BTreeMap;

use font_types::{Tag, TT_SFNT_VERSION};

use crate::bebuffer::BeBuffer;

/// Builds a font file from individual tables.
///
/// The table directory is written sorted by tag, and each table is padded
/// to a four byte boundary. Checksums are left as zero.
#[derive(Clone, Debug, Default)]
pub struct FontBuilder {
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl FontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A font with the required metric tables and a format 12 cmap.
    ///
    /// `advances` has one entry per glyph, starting with `.notdef`.
    pub fn with_metrics(
        units_per_em: u16,
        (ascender, descender, line_gap): (i16, i16, i16),
        mapping: &[(char, u16)],
        advances: &[u16],
    ) -> Self {
        let mut builder = Self::new();
        builder
            .add_table(Tag::new(b"head"), head(units_per_em))
            .add_table(
                Tag::new(b"hhea"),
                hhea(ascender, descender, line_gap, advances.len() as u16),
            )
            .add_table(Tag::new(b"maxp"), maxp(advances.len() as u16))
            .add_table(Tag::new(b"hmtx"), hmtx(advances))
            .add_table(Tag::new(b"cmap"), cmap12(mapping));
        builder
    }

    /// Add or replace a table.
    pub fn add_table(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let entry_selector = (num_tables.max(1) as f32).log2().floor() as u16;
        let search_range = 2u16.pow(entry_selector as u32) * 16;
        let range_shift = (num_tables * 16).saturating_sub(search_range);
        let mut directory = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);
        let mut offset = 12 + 16 * self.tables.len();
        for (tag, data) in &self.tables {
            directory = directory
                .push(*tag)
                .push(0u32)
                .push(offset as u32)
                .push(data.len() as u32);
            offset += padded_len(data.len());
        }
        let mut font: Vec<u8> = directory.into();
        for data in self.tables.values() {
            font.extend_from_slice(data);
            font.resize(padded_len(font.len()), 0);
        }
        font
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// A version 1.0 `head` table.
pub fn head(units_per_em: u16) -> BeBuffer {
    BeBuffer::new()
        .push(0x00010000u32) // version
        .push(0x00010000u32) // fontRevision
        .push(0u32) // checksumAdjustment
        .push(0x5F0F3CF5u32) // magicNumber
        .push(0u16) // flags
        .push(units_per_em)
        .extend([0u32; 4]) // created, modified
        .extend([0i16, 0, units_per_em as i16, units_per_em as i16]) // bbox
        .push(0u16) // macStyle
        .push(8u16) // lowestRecPPEM
        .push(2i16) // fontDirectionHint
        .push(0i16) // indexToLocFormat
        .push(0i16) // glyphDataFormat
}

/// A version 1.0 `hhea` table.
pub fn hhea(ascender: i16, descender: i16, line_gap: i16, number_of_h_metrics: u16) -> BeBuffer {
    BeBuffer::new()
        .push(1u16)
        .push(0u16)
        .push(ascender)
        .push(descender)
        .push(line_gap)
        .push(0u16) // advanceWidthMax
        .extend([0i16; 11])
        .push(number_of_h_metrics)
}

/// A version 0.5 `maxp` table.
pub fn maxp(num_glyphs: u16) -> BeBuffer {
    BeBuffer::new().push(0x00005000u32).push(num_glyphs)
}

/// An `hmtx` table with a long metric for every glyph.
pub fn hmtx(advances: &[u16]) -> BeBuffer {
    advances
        .iter()
        .fold(BeBuffer::new(), |buf, advance| buf.push(*advance).push(0i16))
}

/// A `cmap` with a single (3, 10) format 12 subtable.
///
/// Each mapping becomes its own group, so the input must be sorted by
/// character.
pub fn cmap12(mapping: &[(char, u16)]) -> BeBuffer {
    let groups = mapping.iter().fold(BeBuffer::new(), |buf, (ch, gid)| {
        buf.push(*ch as u32).push(*ch as u32).push(*gid as u32)
    });
    BeBuffer::new()
        .push(0u16) // version
        .push(1u16) // numTables
        .push(3u16)
        .push(10u16)
        .push(12u32) // subtableOffset
        .push(12u16) // format
        .push(0u16)
        .push(16 + groups.len() as u32) // length
        .push(0u32) // language
        .push(mapping.len() as u32)
        .append(&groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_is_sorted_and_aligned() {
        let mut builder = FontBuilder::new();
        builder
            .add_table(Tag::new(b"maxp"), maxp(3))
            .add_table(Tag::new(b"head"), head(1000));
        let font = builder.build();
        // head sorts first; maxp starts after the padded head
        assert_eq!(&font[12..16], b"head");
        assert_eq!(&font[28..32], b"maxp");
        let maxp_offset = u32::from_be_bytes(font[36..40].try_into().unwrap());
        assert_eq!(maxp_offset, 44 + 56);
        assert_eq!(font.len(), 44 + 56 + 8);
    }
}
