//! Sequence context and chained sequence context tables.
//!
//! These are shared by GSUB lookup types 5 and 6 and GPOS lookup types 7
//! and 8. Format 1 rules match glyph ids, format 2 rules match classes, and
//! format 3 has a single rule made of coverage tables.

use types::{BigEndian, FixedSize, GlyphId16, Offset16, Scalar};

use super::{ClassDef, CoverageTable};
use crate::offset::{read_nullable_offset_array, read_offset_array};
use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// A [SequenceLookupRecord](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-lookup-record).
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct SequenceLookupRecord {
    pub sequence_index: BigEndian<u16>,
    pub lookup_list_index: BigEndian<u16>,
}

impl FixedSize for SequenceLookupRecord {
    const RAW_BYTE_LEN: usize = 4;
}

impl SequenceLookupRecord {
    /// The position in the matched input sequence to apply the lookup at.
    pub fn sequence_index(&self) -> u16 {
        self.sequence_index.get()
    }

    pub fn lookup_list_index(&self) -> u16 {
        self.lookup_list_index.get()
    }
}

/// The first element of an input sequence is implied by the coverage table,
/// so the stored count is one more than the number of stored elements.
fn input_len(glyph_count: u16) -> Result<usize, ReadError> {
    match glyph_count {
        0 => Err(ReadError::MalformedData("empty input sequence")),
        count => Ok(count as usize - 1),
    }
}

/// A rule in a format 1 or format 2 sequence context.
///
/// `T` is [`GlyphId16`] for format 1 and `u16` (a class) for format 2.
#[derive(Clone, Debug)]
pub struct SequenceRule<'a, T: Scalar + Copy> {
    input_sequence: &'a [BigEndian<T>],
    seq_lookup_records: &'a [SequenceLookupRecord],
}

impl<'a, T: Scalar + Copy + 'static> FontRead<'a> for SequenceRule<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let glyph_count: u16 = cursor.read()?;
        let seq_lookup_count: u16 = cursor.read()?;
        Ok(SequenceRule {
            input_sequence: cursor.read_array(input_len(glyph_count)?)?,
            seq_lookup_records: cursor.read_array(seq_lookup_count as usize)?,
        })
    }
}

impl<'a, T: Scalar + Copy> SequenceRule<'a, T> {
    /// The input sequence, excluding the first element.
    pub fn input_sequence(&self) -> &'a [BigEndian<T>] {
        self.input_sequence
    }

    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records
    }
}

/// A set of rules sharing their first input element.
#[derive(Clone, Debug)]
pub struct SequenceRuleSet<'a, T: Scalar + Copy> {
    rules: Vec<SequenceRule<'a, T>>,
}

impl<'a, T: Scalar + Copy + 'static> FontRead<'a> for SequenceRuleSet<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        Ok(SequenceRuleSet {
            rules: read_offset_array(&mut cursor, count as usize, data)?,
        })
    }
}

impl<'a, T: Scalar + Copy> SequenceRuleSet<'a, T> {
    /// The rules, in the order they should be tried.
    pub fn rules(&self) -> &[SequenceRule<'a, T>] {
        &self.rules
    }
}

/// [Sequence Context Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-1-simple-glyph-contexts):
/// simple glyph contexts.
#[derive(Clone, Debug)]
pub struct SequenceContextFormat1<'a> {
    coverage: CoverageTable<'a>,
    rule_sets: Vec<Option<SequenceRuleSet<'a, GlyphId16>>>,
}

impl<'a> SequenceContextFormat1<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    /// Rule sets, indexed by coverage index.
    pub fn rule_sets(&self) -> &[Option<SequenceRuleSet<'a, GlyphId16>>] {
        &self.rule_sets
    }
}

/// [Sequence Context Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-2-class-based-glyph-contexts):
/// class-based glyph contexts.
#[derive(Clone, Debug)]
pub struct SequenceContextFormat2<'a> {
    coverage: CoverageTable<'a>,
    class_def: ClassDef<'a>,
    rule_sets: Vec<Option<SequenceRuleSet<'a, u16>>>,
}

impl<'a> SequenceContextFormat2<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn class_def(&self) -> &ClassDef<'a> {
        &self.class_def
    }

    /// Rule sets, indexed by the class of the first input glyph.
    pub fn rule_sets(&self) -> &[Option<SequenceRuleSet<'a, u16>>] {
        &self.rule_sets
    }
}

/// [Sequence Context Format 3](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-3-coverage-based-glyph-contexts):
/// coverage-based glyph contexts.
#[derive(Clone, Debug)]
pub struct SequenceContextFormat3<'a> {
    coverages: Vec<CoverageTable<'a>>,
    seq_lookup_records: &'a [SequenceLookupRecord],
}

impl<'a> SequenceContextFormat3<'a> {
    /// One coverage table per input position.
    pub fn coverages(&self) -> &[CoverageTable<'a>] {
        &self.coverages
    }

    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records
    }
}

/// A sequence context table, in one of three formats.
#[derive(Clone, Debug)]
pub enum SequenceContext<'a> {
    Format1(SequenceContextFormat1<'a>),
    Format2(SequenceContextFormat2<'a>),
    Format3(SequenceContextFormat3<'a>),
}

impl<'a> FontRead<'a> for SequenceContext<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        match format {
            1 => {
                let coverage_offset: Offset16 = cursor.read()?;
                let count: u16 = cursor.read()?;
                Ok(SequenceContext::Format1(SequenceContextFormat1 {
                    coverage: coverage_offset.resolve(data)?,
                    rule_sets: read_nullable_offset_array(&mut cursor, count as usize, data)?,
                }))
            }
            2 => {
                let coverage_offset: Offset16 = cursor.read()?;
                let class_def_offset: Offset16 = cursor.read()?;
                let count: u16 = cursor.read()?;
                Ok(SequenceContext::Format2(SequenceContextFormat2 {
                    coverage: coverage_offset.resolve(data)?,
                    class_def: class_def_offset.resolve(data)?,
                    rule_sets: read_nullable_offset_array(&mut cursor, count as usize, data)?,
                }))
            }
            3 => {
                let glyph_count: u16 = cursor.read()?;
                let seq_lookup_count: u16 = cursor.read()?;
                let coverages: Vec<CoverageTable> =
                    read_offset_array(&mut cursor, glyph_count as usize, data)?;
                if coverages.is_empty() {
                    return Err(ReadError::MalformedData("empty input sequence"));
                }
                Ok(SequenceContext::Format3(SequenceContextFormat3 {
                    coverages,
                    seq_lookup_records: cursor.read_array(seq_lookup_count as usize)?,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// A rule in a format 1 or format 2 chained sequence context.
#[derive(Clone, Debug)]
pub struct ChainedSequenceRule<'a, T: Scalar + Copy> {
    backtrack_sequence: &'a [BigEndian<T>],
    input_sequence: &'a [BigEndian<T>],
    lookahead_sequence: &'a [BigEndian<T>],
    seq_lookup_records: &'a [SequenceLookupRecord],
}

impl<'a, T: Scalar + Copy + 'static> FontRead<'a> for ChainedSequenceRule<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let backtrack_count: u16 = cursor.read()?;
        let backtrack_sequence = cursor.read_array(backtrack_count as usize)?;
        let input_count: u16 = cursor.read()?;
        let input_sequence = cursor.read_array(input_len(input_count)?)?;
        let lookahead_count: u16 = cursor.read()?;
        let lookahead_sequence = cursor.read_array(lookahead_count as usize)?;
        let seq_lookup_count: u16 = cursor.read()?;
        Ok(ChainedSequenceRule {
            backtrack_sequence,
            input_sequence,
            lookahead_sequence,
            seq_lookup_records: cursor.read_array(seq_lookup_count as usize)?,
        })
    }
}

impl<'a, T: Scalar + Copy> ChainedSequenceRule<'a, T> {
    /// The backtrack sequence, starting with the glyph before the input.
    pub fn backtrack_sequence(&self) -> &'a [BigEndian<T>] {
        self.backtrack_sequence
    }

    /// The input sequence, excluding the first element.
    pub fn input_sequence(&self) -> &'a [BigEndian<T>] {
        self.input_sequence
    }

    pub fn lookahead_sequence(&self) -> &'a [BigEndian<T>] {
        self.lookahead_sequence
    }

    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records
    }
}

/// A set of chained rules sharing their first input element.
#[derive(Clone, Debug)]
pub struct ChainedSequenceRuleSet<'a, T: Scalar + Copy> {
    rules: Vec<ChainedSequenceRule<'a, T>>,
}

impl<'a, T: Scalar + Copy + 'static> FontRead<'a> for ChainedSequenceRuleSet<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        Ok(ChainedSequenceRuleSet {
            rules: read_offset_array(&mut cursor, count as usize, data)?,
        })
    }
}

impl<'a, T: Scalar + Copy> ChainedSequenceRuleSet<'a, T> {
    pub fn rules(&self) -> &[ChainedSequenceRule<'a, T>] {
        &self.rules
    }
}

/// [Chained Sequence Context Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-1-simple-glyph-contexts):
/// simple glyph contexts.
#[derive(Clone, Debug)]
pub struct ChainedSequenceContextFormat1<'a> {
    coverage: CoverageTable<'a>,
    rule_sets: Vec<Option<ChainedSequenceRuleSet<'a, GlyphId16>>>,
}

impl<'a> ChainedSequenceContextFormat1<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn rule_sets(&self) -> &[Option<ChainedSequenceRuleSet<'a, GlyphId16>>] {
        &self.rule_sets
    }
}

/// [Chained Sequence Context Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-2-class-based-glyph-contexts):
/// class-based glyph contexts.
#[derive(Clone, Debug)]
pub struct ChainedSequenceContextFormat2<'a> {
    coverage: CoverageTable<'a>,
    backtrack_class_def: ClassDef<'a>,
    input_class_def: ClassDef<'a>,
    lookahead_class_def: ClassDef<'a>,
    rule_sets: Vec<Option<ChainedSequenceRuleSet<'a, u16>>>,
}

impl<'a> ChainedSequenceContextFormat2<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn backtrack_class_def(&self) -> &ClassDef<'a> {
        &self.backtrack_class_def
    }

    pub fn input_class_def(&self) -> &ClassDef<'a> {
        &self.input_class_def
    }

    pub fn lookahead_class_def(&self) -> &ClassDef<'a> {
        &self.lookahead_class_def
    }

    /// Rule sets, indexed by the input class of the first input glyph.
    pub fn rule_sets(&self) -> &[Option<ChainedSequenceRuleSet<'a, u16>>] {
        &self.rule_sets
    }
}

/// [Chained Sequence Context Format 3](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-3-coverage-based-glyph-contexts):
/// coverage-based glyph contexts.
#[derive(Clone, Debug)]
pub struct ChainedSequenceContextFormat3<'a> {
    backtrack_coverages: Vec<CoverageTable<'a>>,
    input_coverages: Vec<CoverageTable<'a>>,
    lookahead_coverages: Vec<CoverageTable<'a>>,
    seq_lookup_records: &'a [SequenceLookupRecord],
}

impl<'a> ChainedSequenceContextFormat3<'a> {
    /// Backtrack coverages, starting with the glyph before the input.
    pub fn backtrack_coverages(&self) -> &[CoverageTable<'a>] {
        &self.backtrack_coverages
    }

    pub fn input_coverages(&self) -> &[CoverageTable<'a>] {
        &self.input_coverages
    }

    pub fn lookahead_coverages(&self) -> &[CoverageTable<'a>] {
        &self.lookahead_coverages
    }

    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records
    }
}

/// A chained sequence context table, in one of three formats.
#[derive(Clone, Debug)]
pub enum ChainedSequenceContext<'a> {
    Format1(ChainedSequenceContextFormat1<'a>),
    Format2(ChainedSequenceContextFormat2<'a>),
    Format3(ChainedSequenceContextFormat3<'a>),
}

impl<'a> FontRead<'a> for ChainedSequenceContext<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        match format {
            1 => {
                let coverage_offset: Offset16 = cursor.read()?;
                let count: u16 = cursor.read()?;
                Ok(ChainedSequenceContext::Format1(ChainedSequenceContextFormat1 {
                    coverage: coverage_offset.resolve(data)?,
                    rule_sets: read_nullable_offset_array(&mut cursor, count as usize, data)?,
                }))
            }
            2 => {
                let coverage_offset: Offset16 = cursor.read()?;
                let backtrack_offset: Offset16 = cursor.read()?;
                let input_offset: Offset16 = cursor.read()?;
                let lookahead_offset: Offset16 = cursor.read()?;
                let count: u16 = cursor.read()?;
                Ok(ChainedSequenceContext::Format2(ChainedSequenceContextFormat2 {
                    coverage: coverage_offset.resolve(data)?,
                    backtrack_class_def: backtrack_offset.resolve(data)?,
                    input_class_def: input_offset.resolve(data)?,
                    lookahead_class_def: lookahead_offset.resolve(data)?,
                    rule_sets: read_nullable_offset_array(&mut cursor, count as usize, data)?,
                }))
            }
            3 => {
                let backtrack_count: u16 = cursor.read()?;
                let backtrack_coverages =
                    read_offset_array(&mut cursor, backtrack_count as usize, data)?;
                let input_count: u16 = cursor.read()?;
                let input_coverages: Vec<CoverageTable> =
                    read_offset_array(&mut cursor, input_count as usize, data)?;
                if input_coverages.is_empty() {
                    return Err(ReadError::MalformedData("empty input sequence"));
                }
                let lookahead_count: u16 = cursor.read()?;
                let lookahead_coverages =
                    read_offset_array(&mut cursor, lookahead_count as usize, data)?;
                let seq_lookup_count: u16 = cursor.read()?;
                Ok(ChainedSequenceContext::Format3(ChainedSequenceContextFormat3 {
                    backtrack_coverages,
                    input_coverages,
                    lookahead_coverages,
                    seq_lookup_records: cursor.read_array(seq_lookup_count as usize)?,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::be_buffer;

    #[test]
    fn chained_format3() {
        let buf = be_buffer! {
            3u16,
            1u16, [20u16],      // backtrack coverage offsets
            2u16, [26u16, 32u16], // input
            0u16,               // lookahead
            1u16,               // seqLookupCount
            0u16, 4u16,         // record
            // coverage @20
            1u16, 1u16, [5u16],
            // @26
            1u16, 1u16, [6u16],
            // @32
            1u16, 1u16, [7u16]
        };
        let table = ChainedSequenceContext::read(FontData::new(&buf)).unwrap();
        let ChainedSequenceContext::Format3(table) = table else {
            panic!("wrong format");
        };
        assert_eq!(table.backtrack_coverages().len(), 1);
        assert_eq!(table.input_coverages().len(), 2);
        assert!(table.lookahead_coverages().is_empty());
        assert!(table.input_coverages()[1].contains(GlyphId16::new(7)));
        assert_eq!(table.seq_lookup_records()[0].lookup_list_index(), 4);
    }

    #[test]
    fn class_rules_and_null_rule_sets() {
        let buf = be_buffer! {
            2u16,
            12u16,       // coverage
            18u16,       // class def
            2u16,        // rule set count
            0u16,        // class 0: no rules
            28u16,       // class 1
            // coverage @12
            1u16, 1u16, [3u16],
            // class def @18
            1u16, 3u16, 2u16, [1u16, 2],
            // rule set @28
            1u16, 4u16,
            // rule @32: classes [1, 2], one record
            2u16, 1u16, [2u16],
            0u16, 9u16
        };
        let table = SequenceContext::read(FontData::new(&buf)).unwrap();
        let SequenceContext::Format2(table) = table else {
            panic!("wrong format");
        };
        assert!(table.rule_sets()[0].is_none());
        let rules = table.rule_sets()[1].as_ref().unwrap().rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].input_sequence()[0].get(), 2);
        assert_eq!(rules[0].seq_lookup_records()[0].lookup_list_index(), 9);
        assert_eq!(table.class_def().get(GlyphId16::new(4)), 2);
    }

    #[test]
    fn empty_input_is_malformed() {
        let buf = be_buffer! { 0u16, 0u16 };
        assert!(matches!(
            SequenceRule::<GlyphId16>::read(FontData::new(&buf)),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn unknown_format() {
        let buf = be_buffer! { 4u16 };
        assert!(matches!(
            ChainedSequenceContext::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(4))
        ));
    }
}
