//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The maximum profile table.
///
/// Only the glyph count is read; the TrueType-specific limits of version
/// 1.0 are not needed for layout.
#[derive(Clone, Debug)]
pub struct Maxp<'a> {
    data: FontData<'a>,
    version: u32,
    num_glyphs: u16,
}

impl TopLevelTable for Maxp<'_> {
    const TAG: Tag = Tag::new(b"maxp");
}

impl<'a> FontRead<'a> for Maxp<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        if version != 0x00005000 && version != 0x00010000 {
            return Err(ReadError::InvalidFormat(version as i64));
        }
        let num_glyphs = cursor.read()?;
        Ok(Maxp {
            data,
            version,
            num_glyphs,
        })
    }
}

impl<'a> Maxp<'a> {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}
