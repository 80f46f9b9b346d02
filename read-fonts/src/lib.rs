//! Reading OpenType tables
//!
//! This crate provides memory safe parsing of the font tables needed for
//! text layout: the table directory, the metric tables, `cmap`, `GDEF`, and the
//! `GSUB` and `GPOS` layout tables.
//!
//! Tables are validated when they are read. A table that loads successfully
//! has had every count, array and non-null offset in its subtree checked
//! against the underlying data, so accessors never need to return errors.
//! Leaf arrays are borrowed from the font data rather than copied.
//!
//! For shaping and text layout built on these tables, see `typeset`.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use read_fonts::{FontRef, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! // Single fonts only. for font collections (.ttc) use FontRef::from_index
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let head = font.head().expect("missing 'head' table");
//! let maxp = font.maxp().expect("missing 'maxp' table");
//!
//! println!("{} units per em, {} glyphs", head.units_per_em(), maxp.num_glyphs());
//! ```
//!
//! [spec]: https://learn.microsoft.com/en-us/typography/opentype/spec/

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font_data;
mod offset;
mod read;
mod table_provider;
pub mod tables;

pub use font_data::{Cursor, FontData};
pub use offset::{Offset, ResolveOffset};
pub use read::{FontRead, FontReadWithArgs, ReadError};
pub use table_provider::{TableProvider, TopLevelTable};

/// Public re-export of the font-types crate.
pub extern crate font_types as types;

use types::{
    BigEndian, FixedSize, Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TTC_HEADER_TAG,
    TT_SFNT_VERSION,
};

/// A record in the [table directory], locating one table in the file.
///
/// [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct TableRecord {
    pub tag: BigEndian<Tag>,
    pub checksum: BigEndian<u32>,
    pub offset: BigEndian<u32>,
    pub length: BigEndian<u32>,
}

impl TableRecord {
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    pub fn checksum(&self) -> u32 {
        self.checksum.get()
    }

    /// Offset from the beginning of the font file.
    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    pub fn length(&self) -> u32 {
        self.length.get()
    }
}

impl FixedSize for TableRecord {
    const RAW_BYTE_LEN: usize = 16;
}

/// The table directory that begins every sfnt font.
#[derive(Clone, Debug)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    table_records: &'a [TableRecord],
}

impl<'a> TableDirectory<'a> {
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn table_records(&self) -> &'a [TableRecord] {
        self.table_records
    }

    fn is_sorted(&self) -> bool {
        self.table_records
            .windows(2)
            .all(|pair| pair[0].tag() < pair[1].tag())
    }
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(6);
        let table_records = cursor.read_array(num_tables as usize)?;
        Ok(TableDirectory {
            sfnt_version,
            table_records,
        })
    }
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
#[derive(Clone, Debug)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    table_directory: TableDirectory<'a>,
    ttc_index: Option<u32>,
    // Fonts are required to have a sorted table directory, but some don't.
    table_directory_sorted: bool,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must be a single font (not a font collection) and must begin
    /// with a table directory. To load a font from a collection, use
    /// [`FontRef::from_index`] instead.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        Self::with_table_directory(data, TableDirectory::read(data)?, None)
    }

    /// Creates a new reference to the font at `index` in the given data.
    ///
    /// This accepts either a font collection (ttc) or a single font file. If a
    /// single font file is provided, the index must be 0.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, ReadError> {
        let font_data = FontData::new(data);
        let tag = font_data.read_at::<Tag>(0)?;
        if tag != TTC_HEADER_TAG {
            return match index {
                0 => Self::new(data),
                _ => Err(ReadError::InvalidCollectionIndex(index)),
            };
        }
        let mut cursor = font_data.cursor();
        cursor.advance::<Tag>();
        let major_version: u16 = cursor.read()?;
        if major_version != 1 && major_version != 2 {
            return Err(ReadError::InvalidTtc(tag));
        }
        cursor.advance::<u16>();
        let num_fonts: u32 = cursor.read()?;
        let offsets: &[BigEndian<u32>] = cursor.read_array(num_fonts as usize)?;
        let offset = offsets
            .get(index as usize)
            .ok_or(ReadError::InvalidCollectionIndex(index))?
            .get() as usize;
        let directory = font_data.read_table_at(offset)?;
        Self::with_table_directory(font_data, directory, Some(index))
    }

    /// Returns the underlying font data.
    ///
    /// For collections this is the whole file, since table offsets are
    /// relative to the start of the file.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// If the font is in a collection, returns its index.
    pub fn ttc_index(&self) -> Option<u32> {
        self.ttc_index
    }

    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the data for the table with the specified tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let records = self.table_directory.table_records();
        let entry = if self.table_directory_sorted {
            records.binary_search_by(|rec| rec.tag().cmp(&tag)).ok()
        } else {
            records.iter().position(|rec| rec.tag() == tag)
        };

        entry.and_then(|idx| records.get(idx)).and_then(|record| {
            let start = record.offset() as usize;
            let len = record.length() as usize;
            self.data.slice(start..start.checked_add(len)?)
        })
    }

    fn with_table_directory(
        data: FontData<'a>,
        table_directory: TableDirectory<'a>,
        ttc_index: Option<u32>,
    ) -> Result<Self, ReadError> {
        if [TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION]
            .contains(&table_directory.sfnt_version())
        {
            let table_directory_sorted = table_directory.is_sorted();
            Ok(FontRef {
                data,
                table_directory,
                ttc_index,
                table_directory_sorted,
            })
        } else {
            Err(ReadError::InvalidSfnt(table_directory.sfnt_version()))
        }
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use font_test_data::{be_buffer, bebuffer::BeBuffer};
    use types::{Tag, TT_SFNT_VERSION};

    use super::*;

    fn two_table_font(first: Tag, second: Tag) -> BeBuffer {
        be_buffer! {
            TT_SFNT_VERSION,
            2u16,    // num tables
            32u16,   // search range
            1u16,    // entry selector
            0u16,    // range shift

            (first),
            0u32,    // checksum
            44u32,   // offset
            2u32,    // length

            (second),
            0u32,
            46u32,
            4u32,

            [0xAAu8, 0xBB],
            [0x01u8, 0x02, 0x03, 0x04]
        }
    }

    #[test]
    fn table_lookup() {
        let buf = two_table_font(Tag::new(b"GDEF"), Tag::new(b"GSUB"));
        let font = FontRef::new(&buf).unwrap();
        assert!(font.table_directory_sorted);
        assert_eq!(
            font.table_data(Tag::new(b"GDEF")).unwrap().as_bytes(),
            &[0xAA, 0xBB]
        );
        assert_eq!(font.table_data(Tag::new(b"GSUB")).unwrap().len(), 4);
        assert!(font.table_data(Tag::new(b"GPOS")).is_none());
    }

    #[test]
    fn unsorted_directory() {
        let buf = two_table_font(Tag::new(b"hmtx"), Tag::new(b"cmap"));
        let font = FontRef::new(&buf).unwrap();
        assert!(!font.table_directory_sorted);
        assert_eq!(font.table_data(Tag::new(b"cmap")).unwrap().len(), 4);
    }

    #[test]
    fn debug_formats_directory() {
        let buf = two_table_font(Tag::new(b"GDEF"), Tag::new(b"GSUB"));
        let font = FontRef::new(&buf).unwrap();
        let formatted = format!("{font:?}");
        assert!(formatted.starts_with("FontRef"));
        assert!(formatted.contains("table_records"));
    }

    #[test]
    fn bad_sfnt_version() {
        let buf = be_buffer! { 0x12345678u32, 0u16, 0u16, 0u16, 0u16 };
        assert!(matches!(
            FontRef::new(&buf),
            Err(ReadError::InvalidSfnt(0x12345678))
        ));
    }

    #[test]
    fn collection_index() {
        let font = two_table_font(Tag::new(b"GDEF"), Tag::new(b"GSUB"));
        // a collection with a single font whose directory starts at 16; all
        // table offsets in the member font are then relative to the file.
        let mut ttc = be_buffer! {
            (TTC_HEADER_TAG),
            1u16,
            0u16,
            1u32,
            16u32
        }
        .to_vec();
        let mut member = font.to_vec();
        // shift the member's table offsets by the ttc header size
        for record in 0..2 {
            let pos = 12 + record * 16 + 8;
            let offset = u32::from_be_bytes(member[pos..pos + 4].try_into().unwrap()) + 16;
            member[pos..pos + 4].copy_from_slice(&offset.to_be_bytes());
        }
        ttc.extend(member);
        let font = FontRef::from_index(&ttc, 0).unwrap();
        assert_eq!(font.ttc_index(), Some(0));
        assert_eq!(
            font.table_data(Tag::new(b"GDEF")).unwrap().as_bytes(),
            &[0xAA, 0xBB]
        );
        assert!(matches!(
            FontRef::from_index(&ttc, 1),
            Err(ReadError::InvalidCollectionIndex(1))
        ));
    }
}
