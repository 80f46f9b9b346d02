//! the [GPOS] table
//!
//! [GPOS]: https://docs.microsoft.com/en-us/typography/opentype/spec/gpos

#[path = "./value_record.rs"]
mod value_record;

pub use super::layout::{
    ChainedSequenceContext, ClassDef, CoverageTable, FeatureList, Lookup, LookupList,
    ScriptList, SequenceContext,
};
pub use value_record::{ValueFormat, ValueRecord};

use types::{BigEndian, GlyphId16, MajorMinor, Offset16, Tag};

use super::layout::{LayoutHeader, LookupSubtable};
use crate::{Cursor, FontData, FontRead, ReadError, ResolveOffset, TopLevelTable};

/// A GPOS lookup.
pub type PositionLookup<'a> = Lookup<'a, PositionSubtable<'a>>;

/// A typed GPOS [LookupList] table
pub type PositionLookupList<'a> = LookupList<'a, PositionSubtable<'a>>;

/// The glyph positioning table.
#[derive(Clone, Debug)]
pub struct Gpos<'a> {
    header: LayoutHeader<'a, PositionSubtable<'a>>,
}

impl TopLevelTable for Gpos<'_> {
    const TAG: Tag = Tag::new(b"GPOS");
}

impl<'a> FontRead<'a> for Gpos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        LayoutHeader::read(data).map(|header| Gpos { header })
    }
}

impl<'a> Gpos<'a> {
    pub fn version(&self) -> MajorMinor {
        self.header.version
    }

    pub fn script_list(&self) -> &ScriptList<'a> {
        &self.header.script_list
    }

    pub fn feature_list(&self) -> &FeatureList<'a> {
        &self.header.feature_list
    }

    pub fn lookup_list(&self) -> &PositionLookupList<'a> {
        &self.header.lookup_list
    }
}

/// A subtable of any GPOS lookup type.
#[derive(Clone, Debug)]
pub enum PositionSubtable<'a> {
    Single(SinglePos<'a>),
    Pair(PairPos<'a>),
    Cursive(CursivePosFormat1<'a>),
    MarkToBase(MarkBasePosFormat1<'a>),
    MarkToLigature(MarkLigPosFormat1<'a>),
    MarkToMark(MarkMarkPosFormat1<'a>),
    Contextual(SequenceContext<'a>),
    ChainContextual(ChainedSequenceContext<'a>),
    /// A lookup type or subtable format that is not understood.
    Unsupported { lookup_type: u16, format: u16 },
}

impl<'a> LookupSubtable<'a> for PositionSubtable<'a> {
    const EXTENSION_TYPE: u16 = 9;

    fn read_with_type(data: FontData<'a>, lookup_type: u16) -> Result<Self, ReadError> {
        Ok(match lookup_type {
            1 => Self::Single(SinglePos::read(data)?),
            2 => Self::Pair(PairPos::read(data)?),
            3 => Self::Cursive(CursivePosFormat1::read(data)?),
            4 => Self::MarkToBase(MarkBasePosFormat1::read(data)?),
            5 => Self::MarkToLigature(MarkLigPosFormat1::read(data)?),
            6 => Self::MarkToMark(MarkMarkPosFormat1::read(data)?),
            7 => Self::Contextual(SequenceContext::read(data)?),
            8 => Self::ChainContextual(ChainedSequenceContext::read(data)?),
            _ => Self::Unsupported {
                lookup_type,
                format: data.read_at(0)?,
            },
        })
    }

    fn unsupported(lookup_type: u16, format: u16) -> Self {
        Self::Unsupported {
            lookup_type,
            format,
        }
    }

    fn unsupported_format(&self) -> Option<(u16, u16)> {
        match self {
            Self::Unsupported {
                lookup_type,
                format,
            } => Some((*lookup_type, *format)),
            _ => None,
        }
    }
}

fn expect_format(cursor: &mut Cursor, expected: u16) -> Result<(), ReadError> {
    match cursor.read::<u16>()? {
        format if format == expected => Ok(()),
        other => Err(ReadError::InvalidFormat(other.into())),
    }
}

/// An [anchor](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-tables)
/// point, in design units.
///
/// Contour points (format 2) and device tables (format 3) are ignored, so
/// every format reduces to its design coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub x: i16,
    pub y: i16,
}

impl<'a> FontRead<'a> for Anchor {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let anchor = Anchor {
            x: cursor.read()?,
            y: cursor.read()?,
        };
        match format {
            1 => Ok(anchor),
            // anchorPoint
            2 => cursor.read::<u16>().map(|_| anchor),
            // x and y device offsets
            3 => cursor.read::<u32>().map(|_| anchor),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// A table of nullable anchors, one row per glyph and one column per mark
/// class.
///
/// This is the shape of the base array, the mark2 array, and each
/// ligature attach table.
#[derive(Clone, Debug, Default)]
pub struct AnchorMatrix {
    columns: usize,
    anchors: Vec<Option<Anchor>>,
}

impl AnchorMatrix {
    fn read(data: FontData, columns: u16) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let rows: u16 = cursor.read()?;
        let count = rows as usize * columns as usize;
        let offsets: &[BigEndian<Offset16>] = cursor.read_array(count)?;
        let anchors = offsets
            .iter()
            .map(|offset| offset.get().resolve_nullable(data))
            .collect::<Result<_, _>>()?;
        Ok(AnchorMatrix {
            columns: columns as usize,
            anchors,
        })
    }

    pub fn rows(&self) -> usize {
        match self.columns {
            0 => 0,
            columns => self.anchors.len() / columns,
        }
    }

    /// The anchor for the given row and mark class, if one is present.
    pub fn get(&self, row: u16, class: u16) -> Option<Anchor> {
        if class as usize >= self.columns {
            return None;
        }
        let index = row as usize * self.columns + class as usize;
        self.anchors.get(index).copied().flatten()
    }
}

/// A record in a [`MarkArray`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkRecord {
    pub mark_class: u16,
    pub mark_anchor: Anchor,
}

/// A [MarkArray](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-array-table) table.
#[derive(Clone, Debug)]
pub struct MarkArray {
    mark_records: Vec<MarkRecord>,
}

impl MarkArray {
    fn read(data: FontData, class_count: u16) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let mark_count: u16 = cursor.read()?;
        let mut mark_records = Vec::with_capacity(mark_count as usize);
        for _ in 0..mark_count {
            let mark_class: u16 = cursor.read()?;
            if mark_class >= class_count {
                return Err(ReadError::MalformedData("mark class out of range"));
            }
            let anchor_offset: Offset16 = cursor.read()?;
            mark_records.push(MarkRecord {
                mark_class,
                mark_anchor: anchor_offset.resolve(data)?,
            });
        }
        Ok(MarkArray { mark_records })
    }

    /// Records, ordered by mark coverage index.
    pub fn mark_records(&self) -> &[MarkRecord] {
        &self.mark_records
    }
}

/// [Single Adjustment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-1-single-positioning-value):
/// one value for every covered glyph.
#[derive(Clone, Debug)]
pub struct SinglePosFormat1<'a> {
    coverage: CoverageTable<'a>,
    value_record: ValueRecord,
}

/// [Single Adjustment Positioning Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-2-array-of-positioning-values):
/// one value per covered glyph.
#[derive(Clone, Debug)]
pub struct SinglePosFormat2<'a> {
    coverage: CoverageTable<'a>,
    value_records: Vec<ValueRecord>,
}

/// A single adjustment subtable.
#[derive(Clone, Debug)]
pub enum SinglePos<'a> {
    Format1(SinglePosFormat1<'a>),
    Format2(SinglePosFormat2<'a>),
}

impl<'a> FontRead<'a> for SinglePos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let coverage_offset: Offset16 = cursor.read()?;
        let value_format: ValueFormat = cursor.read()?;
        match format {
            1 => Ok(SinglePos::Format1(SinglePosFormat1 {
                value_record: ValueRecord::read_at_cursor(&mut cursor, value_format)?,
                coverage: coverage_offset.resolve(data)?,
            })),
            2 => {
                let value_count: u16 = cursor.read()?;
                let value_records = (0..value_count)
                    .map(|_| ValueRecord::read_at_cursor(&mut cursor, value_format))
                    .collect::<Result<_, _>>()?;
                Ok(SinglePos::Format2(SinglePosFormat2 {
                    value_records,
                    coverage: coverage_offset.resolve(data)?,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> SinglePos<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        match self {
            SinglePos::Format1(table) => &table.coverage,
            SinglePos::Format2(table) => &table.coverage,
        }
    }

    /// The adjustment for `gid`, if it is covered.
    pub fn value(&self, gid: GlyphId16) -> Option<ValueRecord> {
        let index = self.coverage().get(gid)?;
        match self {
            SinglePos::Format1(table) => Some(table.value_record),
            SinglePos::Format2(table) => table.value_records.get(index as usize).copied(),
        }
    }
}

/// A record in a [`PairSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairValueRecord {
    pub second_glyph: GlyphId16,
    pub value_record1: ValueRecord,
    pub value_record2: ValueRecord,
}

/// A [PairSet](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-1-adjustments-for-glyph-pairs) table.
#[derive(Clone, Debug)]
pub struct PairSet {
    pair_value_records: Vec<PairValueRecord>,
}

impl PairSet {
    fn read(data: FontData, formats: (ValueFormat, ValueFormat)) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        let mut pair_value_records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            pair_value_records.push(PairValueRecord {
                second_glyph: cursor.read()?,
                value_record1: ValueRecord::read_at_cursor(&mut cursor, formats.0)?,
                value_record2: ValueRecord::read_at_cursor(&mut cursor, formats.1)?,
            });
        }
        if cursor.position() > data.len() {
            return Err(ReadError::OutOfBounds);
        }
        Ok(PairSet { pair_value_records })
    }

    /// Records, sorted by second glyph.
    pub fn pair_value_records(&self) -> &[PairValueRecord] {
        &self.pair_value_records
    }

    pub fn find(&self, second: GlyphId16) -> Option<&PairValueRecord> {
        self.pair_value_records
            .binary_search_by(|rec| rec.second_glyph.cmp(&second))
            .ok()
            .and_then(|index| self.pair_value_records.get(index))
    }
}

/// [Pair Adjustment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-1-adjustments-for-glyph-pairs):
/// adjustments for glyph pairs.
#[derive(Clone, Debug)]
pub struct PairPosFormat1<'a> {
    coverage: CoverageTable<'a>,
    value_format2: ValueFormat,
    pair_sets: Vec<PairSet>,
}

/// [Pair Adjustment Positioning Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-2-class-pair-adjustment):
/// class pair adjustment.
#[derive(Clone, Debug)]
pub struct PairPosFormat2<'a> {
    coverage: CoverageTable<'a>,
    value_format2: ValueFormat,
    class_def1: ClassDef<'a>,
    class_def2: ClassDef<'a>,
    class1_count: u16,
    class2_count: u16,
    // class1_count * class2_count pairs, row major
    class_records: Vec<(ValueRecord, ValueRecord)>,
}

/// A pair adjustment subtable.
#[derive(Clone, Debug)]
pub enum PairPos<'a> {
    Format1(PairPosFormat1<'a>),
    Format2(PairPosFormat2<'a>),
}

impl<'a> FontRead<'a> for PairPos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let coverage_offset: Offset16 = cursor.read()?;
        let value_format1: ValueFormat = cursor.read()?;
        let value_format2: ValueFormat = cursor.read()?;
        let formats = (value_format1, value_format2);
        match format {
            1 => {
                let count: u16 = cursor.read()?;
                let offsets: &[BigEndian<Offset16>] = cursor.read_array(count as usize)?;
                let pair_sets = offsets
                    .iter()
                    .map(|offset| {
                        offset
                            .get()
                            .non_null()
                            .and_then(|offset| data.split_off(offset))
                            .ok_or(ReadError::OutOfBounds)
                            .and_then(|data| PairSet::read(data, formats))
                    })
                    .collect::<Result<_, _>>()?;
                Ok(PairPos::Format1(PairPosFormat1 {
                    coverage: coverage_offset.resolve(data)?,
                    value_format2,
                    pair_sets,
                }))
            }
            2 => {
                let class_def1_offset: Offset16 = cursor.read()?;
                let class_def2_offset: Offset16 = cursor.read()?;
                let class1_count: u16 = cursor.read()?;
                let class2_count: u16 = cursor.read()?;
                let count = class1_count as usize * class2_count as usize;
                let mut class_records = Vec::with_capacity(count);
                for _ in 0..count {
                    let first = ValueRecord::read_at_cursor(&mut cursor, value_format1)?;
                    let second = ValueRecord::read_at_cursor(&mut cursor, value_format2)?;
                    class_records.push((first, second));
                }
                if cursor.position() > data.len() {
                    return Err(ReadError::OutOfBounds);
                }
                Ok(PairPos::Format2(PairPosFormat2 {
                    coverage: coverage_offset.resolve(data)?,
                    value_format2,
                    class_def1: class_def1_offset.resolve(data)?,
                    class_def2: class_def2_offset.resolve(data)?,
                    class1_count,
                    class2_count,
                    class_records,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> PairPos<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        match self {
            PairPos::Format1(table) => &table.coverage,
            PairPos::Format2(table) => &table.coverage,
        }
    }

    /// The format of the second value record.
    ///
    /// When this is empty the second glyph of a pair stays eligible as the
    /// first glyph of the next pair.
    pub fn value_format2(&self) -> ValueFormat {
        match self {
            PairPos::Format1(table) => table.value_format2,
            PairPos::Format2(table) => table.value_format2,
        }
    }

    /// The adjustments for the pair `(first, second)`, if any.
    pub fn values(&self, first: GlyphId16, second: GlyphId16) -> Option<(ValueRecord, ValueRecord)> {
        let index = self.coverage().get(first)?;
        match self {
            PairPos::Format1(table) => table
                .pair_sets
                .get(index as usize)?
                .find(second)
                .map(|rec| (rec.value_record1, rec.value_record2)),
            PairPos::Format2(table) => {
                let class1 = table.class_def1.get(first);
                let class2 = table.class_def2.get(second);
                if class1 >= table.class1_count || class2 >= table.class2_count {
                    return None;
                }
                let index = class1 as usize * table.class2_count as usize + class2 as usize;
                table.class_records.get(index).copied()
            }
        }
    }
}

impl<'a> PairPosFormat1<'a> {
    pub fn pair_sets(&self) -> &[PairSet] {
        &self.pair_sets
    }
}

/// An entry and exit anchor pair for cursive attachment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryExitRecord {
    pub entry_anchor: Option<Anchor>,
    pub exit_anchor: Option<Anchor>,
}

/// [Cursive Attachment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#cursive-attachment-positioning-format1-cursive-attachment)
#[derive(Clone, Debug)]
pub struct CursivePosFormat1<'a> {
    coverage: CoverageTable<'a>,
    entry_exit_records: Vec<EntryExitRecord>,
}

impl<'a> FontRead<'a> for CursivePosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        expect_format(&mut cursor, 1)?;
        let coverage_offset: Offset16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        let mut entry_exit_records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let entry: Offset16 = cursor.read()?;
            let exit: Offset16 = cursor.read()?;
            entry_exit_records.push(EntryExitRecord {
                entry_anchor: entry.resolve_nullable(data)?,
                exit_anchor: exit.resolve_nullable(data)?,
            });
        }
        Ok(CursivePosFormat1 {
            coverage: coverage_offset.resolve(data)?,
            entry_exit_records,
        })
    }
}

impl<'a> CursivePosFormat1<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    /// The anchors for `gid`, if it is covered.
    pub fn entry_exit(&self, gid: GlyphId16) -> Option<EntryExitRecord> {
        let index = self.coverage.get(gid)?;
        self.entry_exit_records.get(index as usize).copied()
    }
}

/// The common layout of the three mark attachment subtables: two
/// coverages, a class count, the mark array and one anchor array.
fn read_mark_attachment<'a, T>(
    data: FontData<'a>,
    read_target: impl FnOnce(FontData<'a>, u16) -> Result<T, ReadError>,
) -> Result<(CoverageTable<'a>, CoverageTable<'a>, u16, MarkArray, T), ReadError> {
    let mut cursor = data.cursor();
    expect_format(&mut cursor, 1)?;
    let mark_coverage_offset: Offset16 = cursor.read()?;
    let target_coverage_offset: Offset16 = cursor.read()?;
    let mark_class_count: u16 = cursor.read()?;
    let mark_array_offset: Offset16 = cursor.read()?;
    let target_array_offset: Offset16 = cursor.read()?;
    let split = |offset: Offset16| {
        offset
            .non_null()
            .and_then(|offset| data.split_off(offset))
            .ok_or(ReadError::OutOfBounds)
    };
    let mark_array = MarkArray::read(split(mark_array_offset)?, mark_class_count)?;
    let target = read_target(split(target_array_offset)?, mark_class_count)?;
    Ok((
        mark_coverage_offset.resolve(data)?,
        target_coverage_offset.resolve(data)?,
        mark_class_count,
        mark_array,
        target,
    ))
}

/// [Mark-to-Base Attachment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-base-attachment-positioning-format-1-mark-to-base-attachment-point)
#[derive(Clone, Debug)]
pub struct MarkBasePosFormat1<'a> {
    mark_coverage: CoverageTable<'a>,
    base_coverage: CoverageTable<'a>,
    mark_class_count: u16,
    mark_array: MarkArray,
    base_array: AnchorMatrix,
}

impl<'a> FontRead<'a> for MarkBasePosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let (mark_coverage, base_coverage, mark_class_count, mark_array, base_array) =
            read_mark_attachment(data, AnchorMatrix::read)?;
        Ok(MarkBasePosFormat1 {
            mark_coverage,
            base_coverage,
            mark_class_count,
            mark_array,
            base_array,
        })
    }
}

impl<'a> MarkBasePosFormat1<'a> {
    pub fn mark_coverage(&self) -> &CoverageTable<'a> {
        &self.mark_coverage
    }

    pub fn base_coverage(&self) -> &CoverageTable<'a> {
        &self.base_coverage
    }

    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    pub fn mark_array(&self) -> &MarkArray {
        &self.mark_array
    }

    pub fn base_array(&self) -> &AnchorMatrix {
        &self.base_array
    }

    /// The mark and base anchors for attaching `mark` to `base`.
    pub fn anchors(&self, mark: GlyphId16, base: GlyphId16) -> Option<(Anchor, Anchor)> {
        let mark_record = self
            .mark_array
            .mark_records
            .get(self.mark_coverage.get(mark)? as usize)?;
        let base_index = self.base_coverage.get(base)?;
        let base_anchor = self.base_array.get(base_index, mark_record.mark_class)?;
        Some((mark_record.mark_anchor, base_anchor))
    }
}

/// [Mark-to-Ligature Attachment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-ligature-attachment-positioning-format-1-mark-to-ligature-attachment)
#[derive(Clone, Debug)]
pub struct MarkLigPosFormat1<'a> {
    mark_coverage: CoverageTable<'a>,
    ligature_coverage: CoverageTable<'a>,
    mark_class_count: u16,
    mark_array: MarkArray,
    // one matrix per ligature; rows are components
    ligature_array: Vec<AnchorMatrix>,
}

fn read_ligature_array(data: FontData, mark_class_count: u16) -> Result<Vec<AnchorMatrix>, ReadError> {
    let mut cursor = data.cursor();
    let count: u16 = cursor.read()?;
    let offsets: &[BigEndian<Offset16>] = cursor.read_array(count as usize)?;
    offsets
        .iter()
        .map(|offset| {
            offset
                .get()
                .non_null()
                .and_then(|offset| data.split_off(offset))
                .ok_or(ReadError::OutOfBounds)
                .and_then(|data| AnchorMatrix::read(data, mark_class_count))
        })
        .collect()
}

impl<'a> FontRead<'a> for MarkLigPosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let (mark_coverage, ligature_coverage, mark_class_count, mark_array, ligature_array) =
            read_mark_attachment(data, read_ligature_array)?;
        Ok(MarkLigPosFormat1 {
            mark_coverage,
            ligature_coverage,
            mark_class_count,
            mark_array,
            ligature_array,
        })
    }
}

impl<'a> MarkLigPosFormat1<'a> {
    pub fn mark_coverage(&self) -> &CoverageTable<'a> {
        &self.mark_coverage
    }

    pub fn ligature_coverage(&self) -> &CoverageTable<'a> {
        &self.ligature_coverage
    }

    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    /// The number of components the font records for `ligature`.
    pub fn component_count(&self, ligature: GlyphId16) -> Option<usize> {
        let index = self.ligature_coverage.get(ligature)?;
        self.ligature_array
            .get(index as usize)
            .map(|matrix| matrix.rows())
    }

    /// The mark and ligature anchors for attaching `mark` to `component` of
    /// `ligature`.
    pub fn anchors(
        &self,
        mark: GlyphId16,
        ligature: GlyphId16,
        component: u16,
    ) -> Option<(Anchor, Anchor)> {
        let mark_record = self
            .mark_array
            .mark_records
            .get(self.mark_coverage.get(mark)? as usize)?;
        let ligature_index = self.ligature_coverage.get(ligature)?;
        let anchor = self
            .ligature_array
            .get(ligature_index as usize)?
            .get(component, mark_record.mark_class)?;
        Some((mark_record.mark_anchor, anchor))
    }
}

/// [Mark-to-Mark Attachment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-mark-attachment-positioning-format-1-mark-to-mark-attachment)
#[derive(Clone, Debug)]
pub struct MarkMarkPosFormat1<'a> {
    mark1_coverage: CoverageTable<'a>,
    mark2_coverage: CoverageTable<'a>,
    mark_class_count: u16,
    mark1_array: MarkArray,
    mark2_array: AnchorMatrix,
}

impl<'a> FontRead<'a> for MarkMarkPosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let (mark1_coverage, mark2_coverage, mark_class_count, mark1_array, mark2_array) =
            read_mark_attachment(data, AnchorMatrix::read)?;
        Ok(MarkMarkPosFormat1 {
            mark1_coverage,
            mark2_coverage,
            mark_class_count,
            mark1_array,
            mark2_array,
        })
    }
}

impl<'a> MarkMarkPosFormat1<'a> {
    pub fn mark1_coverage(&self) -> &CoverageTable<'a> {
        &self.mark1_coverage
    }

    pub fn mark2_coverage(&self) -> &CoverageTable<'a> {
        &self.mark2_coverage
    }

    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    /// The anchors for attaching `mark1` (the attaching mark) to `mark2`.
    pub fn anchors(&self, mark1: GlyphId16, mark2: GlyphId16) -> Option<(Anchor, Anchor)> {
        let mark_record = self
            .mark1_array
            .mark_records
            .get(self.mark1_coverage.get(mark1)? as usize)?;
        let mark2_index = self.mark2_coverage.get(mark2)?;
        let anchor = self.mark2_array.get(mark2_index, mark_record.mark_class)?;
        Some((mark_record.mark_anchor, anchor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::gpos as test_data;

    #[test]
    fn singleposformat1() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-2-singleposformat1-subtable
        let buf = test_data::singleposformat1();
        let table = SinglePos::read(FontData::new(&buf)).unwrap();
        let value = table.value(GlyphId16::new(0x4F)).unwrap();
        assert_eq!(value.y_placement, -80);
        assert_eq!(value.format(), ValueFormat::Y_PLACEMENT);
        assert!(table.value(GlyphId16::new(0x50)).is_none());
    }

    #[test]
    fn singleposformat2() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-3-singleposformat2-subtable
        let buf = test_data::singleposformat2();
        let table = SinglePos::read(FontData::new(&buf)).unwrap();
        let value = table.value(GlyphId16::new(0x51)).unwrap();
        assert_eq!(value.x_placement, 30);
        assert_eq!(value.x_advance, 36);
    }

    #[test]
    fn pairposformat1() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-4-pairposformat1-subtable
        let buf = test_data::pairposformat1();
        let table = PairPos::read(FontData::new(&buf)).unwrap();
        let (first, second) = table
            .values(GlyphId16::new(0x52), GlyphId16::new(0x59))
            .unwrap();
        assert_eq!(first.x_advance, -30);
        assert_eq!(second.x_placement, -20);
        assert!(table
            .values(GlyphId16::new(0x52), GlyphId16::new(0x5A))
            .is_none());
    }

    #[test]
    fn pairposformat2() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-5-pairposformat2-subtable
        let buf = test_data::pairposformat2();
        let table = PairPos::read(FontData::new(&buf)).unwrap();
        assert!(table.value_format2().is_empty());
        let (first, _) = table
            .values(GlyphId16::new(0x6A), GlyphId16::new(0x6B))
            .unwrap();
        assert_eq!(first.x_placement, -50);
        // class 0 pairs use the zero record
        let (first, _) = table
            .values(GlyphId16::new(0x6A), GlyphId16::new(0x10))
            .unwrap();
        assert!(first.is_zero());
    }

    #[test]
    fn cursiveposformat1() {
        let buf = test_data::cursiveposformat1();
        let table = CursivePosFormat1::read(FontData::new(&buf)).unwrap();
        let record = table.entry_exit(GlyphId16::new(0x203)).unwrap();
        assert_eq!(record.entry_anchor, Some(Anchor { x: 0x5DC, y: 0x2C }));
        assert_eq!(record.exit_anchor, None);
    }

    #[test]
    fn markbaseposformat1() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-7-markbaseposformat1-subtable
        let buf = test_data::markbaseposformat1();
        let table = MarkBasePosFormat1::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.mark_class_count(), 2);
        let (mark, base) = table
            .anchors(GlyphId16::new(0x333), GlyphId16::new(0x76))
            .unwrap();
        assert_eq!(mark, Anchor { x: 0x15A, y: 0x697 });
        assert_eq!(base, Anchor { x: 0x3E8, y: 0x1C2 });
    }

    #[test]
    fn marklig_component_anchors() {
        let buf = test_data::markligposformat1();
        let table = MarkLigPosFormat1::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.component_count(GlyphId16::new(0x50)), Some(2));
        let (_, second) = table
            .anchors(GlyphId16::new(0x60), GlyphId16::new(0x50), 1)
            .unwrap();
        assert_eq!(second, Anchor { x: 700, y: 500 });
        assert!(table
            .anchors(GlyphId16::new(0x60), GlyphId16::new(0x50), 2)
            .is_none());
    }

    #[test]
    fn anchor_formats() {
        let buf = font_test_data::be_buffer! { 2u16, 10i16, (-20i16), 5u16 };
        assert_eq!(
            Anchor::read(FontData::new(&buf)).unwrap(),
            Anchor { x: 10, y: -20 }
        );
        let buf = font_test_data::be_buffer! { 3u16, 10i16, (-20i16) };
        assert!(Anchor::read(FontData::new(&buf)).is_err());
    }
}
