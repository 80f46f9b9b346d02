//! the [GSUB] table
//!
//! [GSUB]: https://docs.microsoft.com/en-us/typography/opentype/spec/gsub

pub use super::layout::{
    ChainedSequenceContext, ClassDef, CoverageTable, FeatureList, Lookup, LookupList,
    ScriptList, SequenceContext,
};

use types::{BigEndian, GlyphId16, MajorMinor, Offset16, Tag};

use super::layout::{LayoutHeader, LookupSubtable};
use crate::offset::read_offset_array;
use crate::{FontData, FontRead, ReadError, ResolveOffset, TopLevelTable};

/// A GSUB lookup.
pub type SubstitutionLookup<'a> = Lookup<'a, SubstitutionSubtable<'a>>;

/// A typed GSUB [LookupList] table
pub type SubstitutionLookupList<'a> = LookupList<'a, SubstitutionSubtable<'a>>;

/// The glyph substitution table.
#[derive(Clone, Debug)]
pub struct Gsub<'a> {
    header: LayoutHeader<'a, SubstitutionSubtable<'a>>,
}

impl TopLevelTable for Gsub<'_> {
    const TAG: Tag = Tag::new(b"GSUB");
}

impl<'a> FontRead<'a> for Gsub<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        LayoutHeader::read(data).map(|header| Gsub { header })
    }
}

impl<'a> Gsub<'a> {
    pub fn version(&self) -> MajorMinor {
        self.header.version
    }

    pub fn script_list(&self) -> &ScriptList<'a> {
        &self.header.script_list
    }

    pub fn feature_list(&self) -> &FeatureList<'a> {
        &self.header.feature_list
    }

    pub fn lookup_list(&self) -> &SubstitutionLookupList<'a> {
        &self.header.lookup_list
    }
}

/// A subtable of any GSUB lookup type.
#[derive(Clone, Debug)]
pub enum SubstitutionSubtable<'a> {
    Single(SingleSubst<'a>),
    Multiple(MultipleSubstFormat1<'a>),
    Alternate(AlternateSubstFormat1<'a>),
    Ligature(LigatureSubstFormat1<'a>),
    Contextual(SequenceContext<'a>),
    ChainContextual(ChainedSequenceContext<'a>),
    Reverse(ReverseChainSingleSubstFormat1<'a>),
    /// A lookup type or subtable format that is not understood.
    Unsupported { lookup_type: u16, format: u16 },
}

impl<'a> LookupSubtable<'a> for SubstitutionSubtable<'a> {
    const EXTENSION_TYPE: u16 = 7;

    fn read_with_type(data: FontData<'a>, lookup_type: u16) -> Result<Self, ReadError> {
        Ok(match lookup_type {
            1 => Self::Single(SingleSubst::read(data)?),
            2 => Self::Multiple(MultipleSubstFormat1::read(data)?),
            3 => Self::Alternate(AlternateSubstFormat1::read(data)?),
            4 => Self::Ligature(LigatureSubstFormat1::read(data)?),
            5 => Self::Contextual(SequenceContext::read(data)?),
            6 => Self::ChainContextual(ChainedSequenceContext::read(data)?),
            8 => Self::Reverse(ReverseChainSingleSubstFormat1::read(data)?),
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

/// Reads the format field, failing on anything other than `expected`.
fn expect_format(cursor: &mut crate::Cursor, expected: u16) -> Result<(), ReadError> {
    match cursor.read::<u16>()? {
        format if format == expected => Ok(()),
        other => Err(ReadError::InvalidFormat(other.into())),
    }
}

/// [Single Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#11-single-substitution-format-1)
#[derive(Clone, Debug)]
pub struct SingleSubstFormat1<'a> {
    coverage: CoverageTable<'a>,
    delta_glyph_id: i16,
}

impl<'a> SingleSubstFormat1<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    /// Added to the input glyph id, modulo 65536.
    pub fn delta_glyph_id(&self) -> i16 {
        self.delta_glyph_id
    }
}

/// [Single Substitution Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#12-single-substitution-format-2)
#[derive(Clone, Debug)]
pub struct SingleSubstFormat2<'a> {
    coverage: CoverageTable<'a>,
    substitute_glyph_ids: &'a [BigEndian<GlyphId16>],
}

impl<'a> SingleSubstFormat2<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    /// Substitutes, ordered by coverage index.
    pub fn substitute_glyph_ids(&self) -> &'a [BigEndian<GlyphId16>] {
        self.substitute_glyph_ids
    }
}

/// A [Single Substitution](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#lookuptype-1-single-substitution-subtable) subtable.
#[derive(Clone, Debug)]
pub enum SingleSubst<'a> {
    Format1(SingleSubstFormat1<'a>),
    Format2(SingleSubstFormat2<'a>),
}

impl<'a> FontRead<'a> for SingleSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let coverage_offset: Offset16 = cursor.read()?;
        match format {
            1 => Ok(SingleSubst::Format1(SingleSubstFormat1 {
                delta_glyph_id: cursor.read()?,
                coverage: coverage_offset.resolve(data)?,
            })),
            2 => {
                let glyph_count: u16 = cursor.read()?;
                Ok(SingleSubst::Format2(SingleSubstFormat2 {
                    substitute_glyph_ids: cursor.read_array(glyph_count as usize)?,
                    coverage: coverage_offset.resolve(data)?,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> SingleSubst<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        match self {
            SingleSubst::Format1(table) => &table.coverage,
            SingleSubst::Format2(table) => &table.coverage,
        }
    }

    /// The replacement for `gid`, if it is covered.
    pub fn substitute(&self, gid: GlyphId16) -> Option<GlyphId16> {
        let index = self.coverage().get(gid)?;
        match self {
            SingleSubst::Format1(table) => Some(GlyphId16::new(
                gid.to_u16().wrapping_add_signed(table.delta_glyph_id),
            )),
            SingleSubst::Format2(table) => table
                .substitute_glyph_ids
                .get(index as usize)
                .map(|gid| gid.get()),
        }
    }
}

/// A sequence of glyphs, used for multiple and alternate substitution.
#[derive(Clone, Debug)]
pub struct GlyphArray<'a> {
    glyph_ids: &'a [BigEndian<GlyphId16>],
}

impl<'a> FontRead<'a> for GlyphArray<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        Ok(GlyphArray {
            glyph_ids: cursor.read_array(count as usize)?,
        })
    }
}

impl<'a> GlyphArray<'a> {
    pub fn glyph_ids(&self) -> &'a [BigEndian<GlyphId16>] {
        self.glyph_ids
    }
}

/// A sequence table in a multiple substitution subtable.
pub type Sequence<'a> = GlyphArray<'a>;

/// An alternate set in an alternate substitution subtable.
pub type AlternateSet<'a> = GlyphArray<'a>;

/// Reads the shared `format, coverageOffset, count, offsets[count]` layout of
/// the multiple, alternate and ligature subtables.
fn read_covered_sets<'a, T: FontRead<'a>>(
    data: FontData<'a>,
) -> Result<(CoverageTable<'a>, Vec<T>), ReadError> {
    let mut cursor = data.cursor();
    expect_format(&mut cursor, 1)?;
    let coverage_offset: Offset16 = cursor.read()?;
    let count: u16 = cursor.read()?;
    let sets = read_offset_array(&mut cursor, count as usize, data)?;
    Ok((coverage_offset.resolve(data)?, sets))
}

/// [Multiple Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#21-multiple-substitution-format-1)
#[derive(Clone, Debug)]
pub struct MultipleSubstFormat1<'a> {
    coverage: CoverageTable<'a>,
    sequences: Vec<Sequence<'a>>,
}

impl<'a> FontRead<'a> for MultipleSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let (coverage, sequences) = read_covered_sets(data)?;
        Ok(MultipleSubstFormat1 {
            coverage,
            sequences,
        })
    }
}

impl<'a> MultipleSubstFormat1<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn sequences(&self) -> &[Sequence<'a>] {
        &self.sequences
    }
}

/// [Alternate Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#31-alternate-substitution-format-1)
#[derive(Clone, Debug)]
pub struct AlternateSubstFormat1<'a> {
    coverage: CoverageTable<'a>,
    alternate_sets: Vec<AlternateSet<'a>>,
}

impl<'a> FontRead<'a> for AlternateSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let (coverage, alternate_sets) = read_covered_sets(data)?;
        Ok(AlternateSubstFormat1 {
            coverage,
            alternate_sets,
        })
    }
}

impl<'a> AlternateSubstFormat1<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn alternate_sets(&self) -> &[AlternateSet<'a>] {
        &self.alternate_sets
    }
}

/// A [Ligature](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#41-ligature-substitution-format-1) table.
#[derive(Clone, Debug)]
pub struct Ligature<'a> {
    ligature_glyph: GlyphId16,
    component_glyph_ids: &'a [BigEndian<GlyphId16>],
}

impl<'a> FontRead<'a> for Ligature<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let ligature_glyph = cursor.read()?;
        let component_count: u16 = cursor.read()?;
        let component_glyph_ids = match component_count {
            0 => return Err(ReadError::MalformedData("ligature without components")),
            count => cursor.read_array(count as usize - 1)?,
        };
        Ok(Ligature {
            ligature_glyph,
            component_glyph_ids,
        })
    }
}

impl<'a> Ligature<'a> {
    pub fn ligature_glyph(&self) -> GlyphId16 {
        self.ligature_glyph
    }

    /// The components after the first, which is the covered glyph.
    pub fn component_glyph_ids(&self) -> &'a [BigEndian<GlyphId16>] {
        self.component_glyph_ids
    }
}

/// The ligatures sharing a first component, in preference order.
#[derive(Clone, Debug)]
pub struct LigatureSet<'a> {
    ligatures: Vec<Ligature<'a>>,
}

impl<'a> FontRead<'a> for LigatureSet<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        Ok(LigatureSet {
            ligatures: read_offset_array(&mut cursor, count as usize, data)?,
        })
    }
}

impl<'a> LigatureSet<'a> {
    pub fn ligatures(&self) -> &[Ligature<'a>] {
        &self.ligatures
    }
}

/// [Ligature Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#41-ligature-substitution-format-1)
#[derive(Clone, Debug)]
pub struct LigatureSubstFormat1<'a> {
    coverage: CoverageTable<'a>,
    ligature_sets: Vec<LigatureSet<'a>>,
}

impl<'a> FontRead<'a> for LigatureSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let (coverage, ligature_sets) = read_covered_sets(data)?;
        Ok(LigatureSubstFormat1 {
            coverage,
            ligature_sets,
        })
    }
}

impl<'a> LigatureSubstFormat1<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn ligature_sets(&self) -> &[LigatureSet<'a>] {
        &self.ligature_sets
    }
}

/// [Reverse Chaining Contextual Single Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#81-reverse-chaining-contextual-single-substitution-format-1-coverage-based-glyph-contexts)
#[derive(Clone, Debug)]
pub struct ReverseChainSingleSubstFormat1<'a> {
    coverage: CoverageTable<'a>,
    backtrack_coverages: Vec<CoverageTable<'a>>,
    lookahead_coverages: Vec<CoverageTable<'a>>,
    substitute_glyph_ids: &'a [BigEndian<GlyphId16>],
}

impl<'a> FontRead<'a> for ReverseChainSingleSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        expect_format(&mut cursor, 1)?;
        let coverage_offset: Offset16 = cursor.read()?;
        let backtrack_count: u16 = cursor.read()?;
        let backtrack_coverages = read_offset_array(&mut cursor, backtrack_count as usize, data)?;
        let lookahead_count: u16 = cursor.read()?;
        let lookahead_coverages = read_offset_array(&mut cursor, lookahead_count as usize, data)?;
        let glyph_count: u16 = cursor.read()?;
        Ok(ReverseChainSingleSubstFormat1 {
            substitute_glyph_ids: cursor.read_array(glyph_count as usize)?,
            coverage: coverage_offset.resolve(data)?,
            backtrack_coverages,
            lookahead_coverages,
        })
    }
}

impl<'a> ReverseChainSingleSubstFormat1<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    pub fn backtrack_coverages(&self) -> &[CoverageTable<'a>] {
        &self.backtrack_coverages
    }

    pub fn lookahead_coverages(&self) -> &[CoverageTable<'a>] {
        &self.lookahead_coverages
    }

    pub fn substitute_glyph_ids(&self) -> &'a [BigEndian<GlyphId16>] {
        self.substitute_glyph_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::gsub as test_data;

    fn gids(raw: &[BigEndian<GlyphId16>]) -> Vec<u16> {
        raw.iter().map(|gid| gid.get().to_u16()).collect()
    }

    #[test]
    fn singlesubstformat1() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-2-singlesubstformat1-subtable
        let buf = test_data::singlesubstformat1();
        let table = SingleSubst::read(FontData::new(&buf)).unwrap();
        let SingleSubst::Format1(inner) = &table else {
            panic!("wrong format");
        };
        assert_eq!(inner.delta_glyph_id(), 192);
        assert_eq!(table.substitute(GlyphId16::new(0x3C)), Some(GlyphId16::new(0xFC)));
        assert_eq!(table.substitute(GlyphId16::new(0x3D)), None);
    }

    #[test]
    fn singlesubstformat2() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-3-singlesubstformat2-subtable
        let buf = test_data::singlesubstformat2();
        let table = SingleSubst::read(FontData::new(&buf)).unwrap();
        let SingleSubst::Format2(inner) = &table else {
            panic!("wrong format");
        };
        assert_eq!(gids(inner.substitute_glyph_ids()), [305, 309, 318, 323]);
        assert_eq!(table.substitute(GlyphId16::new(0x52)), Some(GlyphId16::new(309)));
    }

    #[test]
    fn multiplesubstformat1() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-4-multiplesubstformat1-subtable
        let buf = test_data::multiplesubstformat1();
        let table = MultipleSubstFormat1::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.sequences().len(), 1);
        assert_eq!(gids(table.sequences()[0].glyph_ids()), [26, 26, 29]);
    }

    #[test]
    fn alternatesubstformat1() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-5-alternatesubstformat-1-subtable
        let buf = test_data::alternatesubstformat1();
        let table = AlternateSubstFormat1::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.alternate_sets().len(), 1);
        assert_eq!(gids(table.alternate_sets()[0].glyph_ids()), [0xC9, 0xCA]);
    }

    #[test]
    fn ligaturesubstformat1() {
        // https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-6-ligaturesubstformat1-subtable
        let buf = test_data::ligaturesubstformat1();
        let table = LigatureSubstFormat1::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.ligature_sets().len(), 2);
        let ligs = table.ligature_sets()[0].ligatures();
        assert_eq!(ligs.len(), 1);
        assert_eq!(ligs[0].ligature_glyph(), GlyphId16::new(347));
        assert_eq!(gids(ligs[0].component_glyph_ids()), [0x28, 0x17]);
        let ligs = table.ligature_sets()[1].ligatures();
        assert_eq!(ligs.len(), 2);
        assert_eq!(ligs[0].ligature_glyph(), GlyphId16::new(0xF1));
        assert_eq!(ligs[1].ligature_glyph(), GlyphId16::new(0xF0));
    }

    #[test]
    fn reversechainsinglesubstformat1() {
        let buf = test_data::reversechainsinglesubstformat1();
        let table = ReverseChainSingleSubstFormat1::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.backtrack_coverages().len(), 1);
        assert!(table.lookahead_coverages().is_empty());
        assert_eq!(gids(table.substitute_glyph_ids()), [0x3A]);
    }

    #[test]
    fn unknown_lookup_type_is_unsupported() {
        let buf = font_test_data::be_buffer! { 1u16 };
        let subtable = SubstitutionSubtable::read_with_type(FontData::new(&buf), 9).unwrap();
        assert_eq!(subtable.unsupported_format(), Some((9, 1)));
    }
}
