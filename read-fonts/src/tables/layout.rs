//! OpenType Layout common table formats
//!
//! These are the structures shared by `GSUB` and `GPOS`, described in
//! [chapter 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2)
//! of the OpenType specification.

mod feature;
mod script;
mod sequence;

#[path = "./lookupflag.rs"]
mod lookupflag;

#[cfg(test)]
mod spec_tests;

pub use feature::{Feature, FeatureList, FeatureRecord, TaggedElement};
pub use lookupflag::LookupFlag;
pub use script::{LangSys, LangSysRecord, Script, ScriptList, ScriptRecord, ScriptTags, SelectedScript};
pub use sequence::{
    ChainedSequenceContext, ChainedSequenceContextFormat1, ChainedSequenceContextFormat2,
    ChainedSequenceContextFormat3, ChainedSequenceRule, ChainedSequenceRuleSet, SequenceContext,
    SequenceContextFormat1, SequenceContextFormat2, SequenceContextFormat3, SequenceLookupRecord,
    SequenceRule, SequenceRuleSet,
};

use types::{BigEndian, FixedSize, GlyphId16, Offset16, Offset32};

use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// A [Coverage Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-1)
/// table: an ordered list of glyphs.
#[derive(Clone, Debug)]
pub struct CoverageFormat1<'a> {
    glyph_array: &'a [BigEndian<GlyphId16>],
}

impl<'a> CoverageFormat1<'a> {
    pub fn glyph_array(&self) -> &'a [BigEndian<GlyphId16>] {
        self.glyph_array
    }
}

/// A range record in a coverage format 2 table.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct RangeRecord {
    pub start_glyph_id: BigEndian<GlyphId16>,
    pub end_glyph_id: BigEndian<GlyphId16>,
    pub start_coverage_index: BigEndian<u16>,
}

impl FixedSize for RangeRecord {
    const RAW_BYTE_LEN: usize = 6;
}

impl RangeRecord {
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    pub fn start_coverage_index(&self) -> u16 {
        self.start_coverage_index.get()
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId16> {
        (self.start_glyph_id().to_u16()..=self.end_glyph_id().to_u16()).map(GlyphId16::new)
    }
}

/// A [Coverage Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-2)
/// table: glyph ranges.
#[derive(Clone, Debug)]
pub struct CoverageFormat2<'a> {
    range_records: &'a [RangeRecord],
}

impl<'a> CoverageFormat2<'a> {
    pub fn range_records(&self) -> &'a [RangeRecord] {
        self.range_records
    }
}

/// A coverage table, mapping glyphs to an ordinal index.
#[derive(Clone, Debug)]
pub enum CoverageTable<'a> {
    Format1(CoverageFormat1<'a>),
    Format2(CoverageFormat2<'a>),
}

impl<'a> FontRead<'a> for CoverageTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        match format {
            1 => Ok(CoverageTable::Format1(CoverageFormat1 {
                glyph_array: cursor.read_array(count as usize)?,
            })),
            2 => Ok(CoverageTable::Format2(CoverageFormat2 {
                range_records: cursor.read_array(count as usize)?,
            })),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl CoverageTable<'_> {
    /// If this glyph is in the coverage table, returns its index.
    ///
    /// Glyphs and ranges are sorted in the table, so this is a binary search.
    pub fn get(&self, gid: GlyphId16) -> Option<u16> {
        match self {
            CoverageTable::Format1(table) => table
                .glyph_array
                .binary_search_by(|probe| probe.get().cmp(&gid))
                .ok()
                .map(|index| index as u16),
            CoverageTable::Format2(table) => {
                let index = table
                    .range_records
                    .partition_point(|record| record.end_glyph_id() < gid);
                let record = table.range_records.get(index)?;
                let start = record.start_glyph_id();
                (start <= gid).then(|| {
                    record
                        .start_coverage_index()
                        .wrapping_add(gid.to_u16() - start.to_u16())
                })
            }
        }
    }

    /// `true` if the glyph is covered.
    pub fn contains(&self, gid: GlyphId16) -> bool {
        self.get(gid).is_some()
    }

    /// Iterate over the covered glyphs, in table order.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        // all one expression so that we have a single return type
        let (iter1, iter2) = match self {
            CoverageTable::Format1(t) => (Some(t.glyph_array.iter().map(|g| g.get())), None),
            CoverageTable::Format2(t) => {
                let iter = t.range_records.iter().flat_map(RangeRecord::iter);
                (None, Some(iter))
            }
        };

        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }

    /// The number of glyphs covered.
    pub fn population(&self) -> usize {
        match self {
            CoverageTable::Format1(table) => table.glyph_array.len(),
            CoverageTable::Format2(table) => table
                .range_records
                .iter()
                .map(|record| {
                    (record.end_glyph_id().to_u16() as usize + 1)
                        .saturating_sub(record.start_glyph_id().to_u16() as usize)
                })
                .sum(),
        }
    }
}

/// A [Class Definition Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table-format-1) table.
#[derive(Clone, Debug)]
pub struct ClassDefFormat1<'a> {
    start_glyph_id: GlyphId16,
    class_value_array: &'a [BigEndian<u16>],
}

impl<'a> ClassDefFormat1<'a> {
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id
    }

    pub fn class_value_array(&self) -> &'a [BigEndian<u16>] {
        self.class_value_array
    }
}

/// A class range record in a class definition format 2 table.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct ClassRangeRecord {
    pub start_glyph_id: BigEndian<GlyphId16>,
    pub end_glyph_id: BigEndian<GlyphId16>,
    pub class: BigEndian<u16>,
}

impl FixedSize for ClassRangeRecord {
    const RAW_BYTE_LEN: usize = 6;
}

impl ClassRangeRecord {
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    pub fn class(&self) -> u16 {
        self.class.get()
    }
}

/// A [Class Definition Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table-format-2) table.
#[derive(Clone, Debug)]
pub struct ClassDefFormat2<'a> {
    class_range_records: &'a [ClassRangeRecord],
}

impl<'a> ClassDefFormat2<'a> {
    pub fn class_range_records(&self) -> &'a [ClassRangeRecord] {
        self.class_range_records
    }
}

/// A class definition table.
#[derive(Clone, Debug)]
pub enum ClassDef<'a> {
    Format1(ClassDefFormat1<'a>),
    Format2(ClassDefFormat2<'a>),
}

impl<'a> FontRead<'a> for ClassDef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        match format {
            1 => {
                let start_glyph_id = cursor.read()?;
                let glyph_count: u16 = cursor.read()?;
                Ok(ClassDef::Format1(ClassDefFormat1 {
                    start_glyph_id,
                    class_value_array: cursor.read_array(glyph_count as usize)?,
                }))
            }
            2 => {
                let count: u16 = cursor.read()?;
                Ok(ClassDef::Format2(ClassDefFormat2 {
                    class_range_records: cursor.read_array(count as usize)?,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl ClassDef<'_> {
    /// Get the class for this glyph id.
    ///
    /// Glyphs that are not listed are in class 0.
    pub fn get(&self, gid: GlyphId16) -> u16 {
        match self {
            ClassDef::Format1(table) => gid
                .to_u16()
                .checked_sub(table.start_glyph_id.to_u16())
                .and_then(|index| table.class_value_array.get(index as usize))
                .map(|class| class.get())
                .unwrap_or(0),
            ClassDef::Format2(table) => {
                let index = table
                    .class_range_records
                    .partition_point(|record| record.end_glyph_id() < gid);
                table
                    .class_range_records
                    .get(index)
                    .filter(|record| record.start_glyph_id() <= gid)
                    .map(|record| record.class())
                    .unwrap_or(0)
            }
        }
    }
}

/// A subtable type that can appear in a [`Lookup`].
///
/// Implemented by the `GSUB` and `GPOS` subtable enums.
pub trait LookupSubtable<'a>: Sized {
    /// The lookup type whose subtables point at the real subtable.
    const EXTENSION_TYPE: u16;

    /// Read a subtable of the given lookup type.
    ///
    /// An unknown lookup type should produce an unsupported subtable rather
    /// than an error.
    fn read_with_type(data: FontData<'a>, lookup_type: u16) -> Result<Self, ReadError>;

    /// A placeholder for a subtable in a format that is not understood.
    fn unsupported(lookup_type: u16, format: u16) -> Self;

    /// `Some((lookup_type, format))` if this is an unsupported placeholder.
    fn unsupported_format(&self) -> Option<(u16, u16)>;
}

/// A [Lookup](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-table) table.
///
/// Extension subtables are unwrapped when the lookup is read, so
/// [`lookup_type`](Self::lookup_type) is always the type of the real
/// subtables.
#[derive(Clone, Debug)]
pub struct Lookup<'a, T> {
    lookup_type: u16,
    lookup_flag: LookupFlag,
    mark_filtering_set: Option<u16>,
    subtables: Vec<T>,
    data: FontData<'a>,
}

impl<'a, T: LookupSubtable<'a>> FontRead<'a> for Lookup<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let mut lookup_type: u16 = cursor.read()?;
        let lookup_flag: LookupFlag = cursor.read()?;
        let subtable_count: u16 = cursor.read()?;
        let offsets: &[BigEndian<Offset16>] = cursor.read_array(subtable_count as usize)?;
        let mark_filtering_set = match lookup_flag.use_mark_filtering_set() {
            true => Some(cursor.read()?),
            false => None,
        };
        let mut subtables = Vec::with_capacity(offsets.len());
        for offset in offsets {
            let subtable_data = offset
                .get()
                .non_null()
                .and_then(|offset| data.split_off(offset))
                .ok_or(ReadError::OutOfBounds)?;
            let (subtable_type, subtable_data) = if lookup_type == T::EXTENSION_TYPE {
                match read_extension(subtable_data)? {
                    Some(resolved) => resolved,
                    None => {
                        let format = subtable_data.read_at(0)?;
                        subtables.push(T::unsupported(lookup_type, format));
                        continue;
                    }
                }
            } else {
                (lookup_type, subtable_data)
            };
            let subtable = match T::read_with_type(subtable_data, subtable_type) {
                Ok(subtable) => subtable,
                Err(ReadError::InvalidFormat(format)) => {
                    T::unsupported(subtable_type, format as u16)
                }
                Err(e) => return Err(e),
            };
            // all extension subtables in a lookup must share a type
            lookup_type = subtable_type;
            subtables.push(subtable);
        }
        Ok(Lookup {
            lookup_type,
            lookup_flag,
            mark_filtering_set,
            subtables,
            data,
        })
    }
}

/// Returns the real lookup type and data of an extension subtable.
///
/// `None` means the extension is in an unknown format.
fn read_extension(data: FontData) -> Result<Option<(u16, FontData)>, ReadError> {
    let mut cursor = data.cursor();
    let format: u16 = cursor.read()?;
    if format != 1 {
        return Ok(None);
    }
    let extension_type: u16 = cursor.read()?;
    let offset: Offset32 = cursor.read()?;
    let target = offset
        .non_null()
        .and_then(|offset| data.split_off(offset))
        .ok_or(ReadError::OutOfBounds)?;
    Ok(Some((extension_type, target)))
}

impl<'a, T> Lookup<'a, T> {
    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    pub fn lookup_flag(&self) -> LookupFlag {
        self.lookup_flag
    }

    /// The index of the mark glyph set in `GDEF`, if the flag requests one.
    pub fn mark_filtering_set(&self) -> Option<u16> {
        self.mark_filtering_set
    }

    pub fn subtables(&self) -> &[T] {
        &self.subtables
    }

    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

/// A [LookupList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-list-table) table.
#[derive(Clone, Debug)]
pub struct LookupList<'a, T> {
    lookups: Vec<Lookup<'a, T>>,
}

impl<'a, T: LookupSubtable<'a>> FontRead<'a> for LookupList<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_count: u16 = cursor.read()?;
        let lookups = crate::offset::read_offset_array(&mut cursor, lookup_count as usize, data)?;
        Ok(LookupList { lookups })
    }
}

impl<'a, T> LookupList<'a, T> {
    pub fn lookup_count(&self) -> u16 {
        self.lookups.len() as u16
    }

    pub fn get(&self, index: u16) -> Option<&Lookup<'a, T>> {
        self.lookups.get(index as usize)
    }

    pub fn lookups(&self) -> &[Lookup<'a, T>] {
        &self.lookups
    }
}

/// The header shared by `GSUB` and `GPOS`.
#[derive(Clone, Debug)]
pub(crate) struct LayoutHeader<'a, T> {
    pub(crate) version: types::MajorMinor,
    pub(crate) script_list: ScriptList<'a>,
    pub(crate) feature_list: FeatureList<'a>,
    pub(crate) lookup_list: LookupList<'a, T>,
}

impl<'a, T: LookupSubtable<'a>> FontRead<'a> for LayoutHeader<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: types::MajorMinor = cursor.read()?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major.into()));
        }
        let script_list_offset: Offset16 = cursor.read()?;
        let feature_list_offset: Offset16 = cursor.read()?;
        let lookup_list_offset: Offset16 = cursor.read()?;
        // version 1.1 adds a feature variations offset, which we ignore
        Ok(LayoutHeader {
            version,
            script_list: script_list_offset.resolve(data)?,
            feature_list: feature_list_offset.resolve(data)?,
            lookup_list: lookup_list_offset.resolve(data)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::be_buffer;

    #[test]
    fn coverage_format1_binary_search() {
        let buf = be_buffer! { 1u16, 4u16, [3u16, 7, 8, 20] };
        let coverage = CoverageTable::read(FontData::new(&buf)).unwrap();
        assert_eq!(coverage.get(GlyphId16::new(3)), Some(0));
        assert_eq!(coverage.get(GlyphId16::new(20)), Some(3));
        assert_eq!(coverage.get(GlyphId16::new(9)), None);
        assert_eq!(coverage.population(), 4);
    }

    #[test]
    fn coverage_format2_ranges() {
        let buf = be_buffer! {
            2u16, 2u16,
            10u16, 12u16, 0u16,
            40u16, 41u16, 3u16
        };
        let coverage = CoverageTable::read(FontData::new(&buf)).unwrap();
        assert_eq!(coverage.get(GlyphId16::new(11)), Some(1));
        assert_eq!(coverage.get(GlyphId16::new(41)), Some(4));
        assert_eq!(coverage.get(GlyphId16::new(13)), None);
        assert_eq!(coverage.get(GlyphId16::new(9)), None);
        assert_eq!(coverage.population(), 5);
    }

    #[test]
    fn coverage_search_agrees_with_table_order() {
        let tables = [
            be_buffer! { 1u16, 6u16, [1u16, 2, 5, 9, 200, 1000] },
            be_buffer! { 2u16, 3u16, 1u16, 4u16, 0u16, 9u16, 9u16, 4u16, 100u16, 120u16, 5u16 },
        ];
        for buf in tables {
            let coverage = CoverageTable::read(FontData::new(&buf)).unwrap();
            let glyphs = coverage.iter().collect::<Vec<_>>();
            for raw in 0..1100u16 {
                let gid = GlyphId16::new(raw);
                let linear = glyphs.iter().position(|g| *g == gid).map(|i| i as u16);
                assert_eq!(coverage.get(gid), linear, "{gid}");
            }
        }
    }

    #[test]
    fn truncated_coverage_fails_at_load() {
        let buf = be_buffer! { 1u16, 4u16, [3u16, 7] };
        assert!(matches!(
            CoverageTable::read(FontData::new(&buf)),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn classdef_formats() {
        let buf = be_buffer! { 1u16, 5u16, 3u16, [1u16, 2, 0] };
        let class_def = ClassDef::read(FontData::new(&buf)).unwrap();
        assert_eq!(class_def.get(GlyphId16::new(5)), 1);
        assert_eq!(class_def.get(GlyphId16::new(6)), 2);
        assert_eq!(class_def.get(GlyphId16::new(7)), 0);
        assert_eq!(class_def.get(GlyphId16::new(4)), 0);
        assert_eq!(class_def.get(GlyphId16::new(8)), 0);

        let buf = be_buffer! { 2u16, 2u16, 10u16, 20u16, 1u16, 30u16, 30u16, 7u16 };
        let class_def = ClassDef::read(FontData::new(&buf)).unwrap();
        assert_eq!(class_def.get(GlyphId16::new(15)), 1);
        assert_eq!(class_def.get(GlyphId16::new(30)), 7);
        assert_eq!(class_def.get(GlyphId16::new(25)), 0);
    }

    #[test]
    fn unknown_formats() {
        let buf = be_buffer! { 3u16, 0u16 };
        assert!(matches!(
            CoverageTable::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(3))
        ));
        assert!(matches!(
            ClassDef::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(3))
        ));
    }
}
