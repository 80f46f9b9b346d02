//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{MajorMinor, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The `macStyle` bits of the head table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MacStyle(u16);

impl MacStyle {
    pub const BOLD: u16 = 0x0001;
    pub const ITALIC: u16 = 0x0002;

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_bold(self) -> bool {
        self.0 & Self::BOLD != 0
    }

    pub fn is_italic(self) -> bool {
        self.0 & Self::ITALIC != 0
    }
}

/// The font header table.
#[derive(Clone, Debug)]
pub struct Head<'a> {
    data: FontData<'a>,
    version: MajorMinor,
    units_per_em: u16,
    bbox: [i16; 4],
    mac_style: MacStyle,
    index_to_loc_format: i16,
}

impl TopLevelTable for Head<'_> {
    const TAG: Tag = Tag::new(b"head");
}

impl<'a> FontRead<'a> for Head<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        // fontRevision, checksumAdjustment
        cursor.advance_by(8);
        let _magic = cursor.read_validate(|magic: &u32| *magic == MAGIC_NUMBER)?;
        // flags
        cursor.advance::<u16>();
        let units_per_em: u16 = cursor.read()?;
        if !(16..=16384).contains(&units_per_em) {
            return Err(ReadError::MalformedData("unitsPerEm out of range"));
        }
        // created, modified
        cursor.advance_by(16);
        let bbox = [cursor.read()?, cursor.read()?, cursor.read()?, cursor.read()?];
        let mac_style = MacStyle(cursor.read()?);
        // lowestRecPPEM, fontDirectionHint
        cursor.advance_by(4);
        let index_to_loc_format = cursor.read()?;
        Ok(Head {
            data,
            version,
            units_per_em,
            bbox,
            mac_style,
            index_to_loc_format,
        })
    }
}

impl<'a> Head<'a> {
    pub fn version(&self) -> MajorMinor {
        self.version
    }

    /// Design units per em. Always in `16..=16384` for a table that loaded.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn x_min(&self) -> i16 {
        self.bbox[0]
    }

    pub fn y_min(&self) -> i16 {
        self.bbox[1]
    }

    pub fn x_max(&self) -> i16 {
        self.bbox[2]
    }

    pub fn y_max(&self) -> i16 {
        self.bbox[3]
    }

    pub fn mac_style(&self) -> MacStyle {
        self.mac_style
    }

    pub fn index_to_loc_format(&self) -> i16 {
        self.index_to_loc_format
    }

    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}
