//! the [GDEF] table
//!
//! [GDEF]: https://docs.microsoft.com/en-us/typography/opentype/spec/gdef

use types::{BigEndian, GlyphId16, MajorMinor, Offset16, Offset32, Tag};

use super::layout::{ClassDef, CoverageTable};
use crate::{FontData, FontRead, ReadError, ResolveOffset, TopLevelTable};

/// The glyph classes of the [GlyphClassDef](https://learn.microsoft.com/en-us/typography/opentype/spec/gdef#glyph-class-definition-table).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlyphClassDef {
    #[default]
    Unclassified,
    Base,
    Ligature,
    Mark,
    Component,
}

impl GlyphClassDef {
    pub fn new(raw: u16) -> Self {
        match raw {
            1 => Self::Base,
            2 => Self::Ligature,
            3 => Self::Mark,
            4 => Self::Component,
            _ => Self::Unclassified,
        }
    }
}

/// The [MarkGlyphSets](https://learn.microsoft.com/en-us/typography/opentype/spec/gdef#mark-glyph-sets-table) table.
#[derive(Clone, Debug)]
pub struct MarkGlyphSets<'a> {
    coverages: Vec<CoverageTable<'a>>,
}

impl<'a> FontRead<'a> for MarkGlyphSets<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let count: u16 = cursor.read()?;
        let offsets: &[BigEndian<Offset32>] = cursor.read_array(count as usize)?;
        let coverages = offsets
            .iter()
            .map(|offset| offset.get().resolve(data))
            .collect::<Result<_, _>>()?;
        Ok(MarkGlyphSets { coverages })
    }
}

impl<'a> MarkGlyphSets<'a> {
    pub fn coverages(&self) -> &[CoverageTable<'a>] {
        &self.coverages
    }
}

/// The glyph definition table.
///
/// The attachment point and ligature caret lists are not read.
#[derive(Clone, Debug)]
pub struct Gdef<'a> {
    version: MajorMinor,
    glyph_class_def: Option<ClassDef<'a>>,
    mark_attach_class_def: Option<ClassDef<'a>>,
    mark_glyph_sets_def: Option<MarkGlyphSets<'a>>,
}

impl TopLevelTable for Gdef<'_> {
    const TAG: Tag = Tag::new(b"GDEF");
}

impl<'a> FontRead<'a> for Gdef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: MajorMinor = cursor.read()?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major.into()));
        }
        let glyph_class_def_offset: Offset16 = cursor.read()?;
        // attachListOffset, ligCaretListOffset
        cursor.advance_by(4);
        let mark_attach_class_def_offset: Offset16 = cursor.read()?;
        let mark_glyph_sets_def = if version >= MajorMinor::VERSION_1_2 {
            let offset: Offset16 = cursor.read()?;
            offset.resolve_nullable(data)?
        } else {
            None
        };
        Ok(Gdef {
            version,
            glyph_class_def: glyph_class_def_offset.resolve_nullable(data)?,
            mark_attach_class_def: mark_attach_class_def_offset.resolve_nullable(data)?,
            mark_glyph_sets_def,
        })
    }
}

impl<'a> Gdef<'a> {
    pub fn version(&self) -> MajorMinor {
        self.version
    }

    pub fn glyph_class_def(&self) -> Option<&ClassDef<'a>> {
        self.glyph_class_def.as_ref()
    }

    pub fn mark_attach_class_def(&self) -> Option<&ClassDef<'a>> {
        self.mark_attach_class_def.as_ref()
    }

    pub fn mark_glyph_sets_def(&self) -> Option<&MarkGlyphSets<'a>> {
        self.mark_glyph_sets_def.as_ref()
    }

    /// `None` if the font does not classify glyphs at all.
    pub fn glyph_class(&self, gid: GlyphId16) -> Option<GlyphClassDef> {
        self.glyph_class_def
            .as_ref()
            .map(|class_def| GlyphClassDef::new(class_def.get(gid)))
    }

    /// The mark attachment class of a glyph, or 0.
    pub fn mark_attach_class(&self, gid: GlyphId16) -> u16 {
        self.mark_attach_class_def
            .as_ref()
            .map(|class_def| class_def.get(gid))
            .unwrap_or(0)
    }

    /// `true` if `gid` is in the mark glyph set at `set_index`.
    pub fn is_mark_in_set(&self, gid: GlyphId16, set_index: u16) -> bool {
        self.mark_glyph_sets_def
            .as_ref()
            .and_then(|sets| sets.coverages.get(set_index as usize))
            .is_some_and(|coverage| coverage.contains(gid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::gdef as test_data;

    #[test]
    fn glyph_classes() {
        let buf = test_data::gdef_with_classes();
        let gdef = Gdef::read(FontData::new(&buf)).unwrap();
        assert_eq!(gdef.glyph_class(GlyphId16::new(1)), Some(GlyphClassDef::Base));
        assert_eq!(gdef.glyph_class(GlyphId16::new(3)), Some(GlyphClassDef::Ligature));
        assert_eq!(gdef.glyph_class(GlyphId16::new(5)), Some(GlyphClassDef::Mark));
        assert_eq!(
            gdef.glyph_class(GlyphId16::new(100)),
            Some(GlyphClassDef::Unclassified)
        );
        assert_eq!(gdef.mark_attach_class(GlyphId16::new(5)), 1);
        assert_eq!(gdef.mark_attach_class(GlyphId16::new(6)), 2);
        assert_eq!(gdef.mark_attach_class(GlyphId16::new(1)), 0);
    }

    #[test]
    fn mark_glyph_sets() {
        let buf = test_data::gdef_with_classes();
        let gdef = Gdef::read(FontData::new(&buf)).unwrap();
        assert_eq!(gdef.version(), MajorMinor::VERSION_1_2);
        assert!(gdef.is_mark_in_set(GlyphId16::new(6), 0));
        assert!(!gdef.is_mark_in_set(GlyphId16::new(5), 0));
        // missing sets contain nothing
        assert!(!gdef.is_mark_in_set(GlyphId16::new(6), 4));
    }

    #[test]
    fn empty_version_1_0() {
        let buf = font_test_data::be_buffer! { 1u16, 0u16, 0u16, 0u16, 0u16, 0u16 };
        let gdef = Gdef::read(FontData::new(&buf)).unwrap();
        assert_eq!(gdef.glyph_class(GlyphId16::new(1)), None);
        assert!(!gdef.is_mark_in_set(GlyphId16::new(1), 0));
    }
}
