//! A GPOS ValueRecord

use types::{FixedSize, Scalar};

use crate::{Cursor, FontData, FontReadWithArgs, ReadError};

/// The [ValueFormat](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#valueRecord)
/// flags, describing which fields are present in a [`ValueRecord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ValueFormat(u16);

impl ValueFormat {
    pub const X_PLACEMENT: Self = Self(0x0001);
    pub const Y_PLACEMENT: Self = Self(0x0002);
    pub const X_ADVANCE: Self = Self(0x0004);
    pub const Y_ADVANCE: Self = Self(0x0008);
    pub const X_PLACEMENT_DEVICE: Self = Self(0x0010);
    pub const Y_PLACEMENT_DEVICE: Self = Self(0x0020);
    pub const X_ADVANCE_DEVICE: Self = Self(0x0040);
    pub const Y_ADVANCE_DEVICE: Self = Self(0x0080);

    /// Construct a format from raw bits, discarding the reserved ones.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & 0x00FF)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return the number of bytes required to store a [`ValueRecord`] in this format.
    #[inline]
    pub const fn record_byte_len(self) -> usize {
        self.0.count_ones() as usize * u16::RAW_BYTE_LEN
    }
}

impl Scalar for ValueFormat {
    type Raw = <u16 as Scalar>::Raw;

    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self::from_bits_truncate(u16::from_raw(raw))
    }
}

impl FixedSize for ValueFormat {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN;
}

/// A positioning value record.
///
/// Fields missing from the format read as zero. Device and variation index
/// tables are skipped; their offsets are consumed but never resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueRecord {
    pub x_placement: i16,
    pub y_placement: i16,
    pub x_advance: i16,
    pub y_advance: i16,
    format: ValueFormat,
}

impl ValueRecord {
    /// Read a record in `format` at the cursor, advancing past it.
    pub fn read_at_cursor(cursor: &mut Cursor, format: ValueFormat) -> Result<Self, ReadError> {
        let mut read_field = |flag: ValueFormat| -> Result<i16, ReadError> {
            if format.contains(flag) {
                cursor.read()
            } else {
                Ok(0)
            }
        };
        let record = ValueRecord {
            x_placement: read_field(ValueFormat::X_PLACEMENT)?,
            y_placement: read_field(ValueFormat::Y_PLACEMENT)?,
            x_advance: read_field(ValueFormat::X_ADVANCE)?,
            y_advance: read_field(ValueFormat::Y_ADVANCE)?,
            format,
        };
        let device_fields = format.bits() & 0x00F0;
        cursor.advance_by(device_fields.count_ones() as usize * u16::RAW_BYTE_LEN);
        Ok(record)
    }

    pub fn format(&self) -> ValueFormat {
        self.format
    }

    /// `true` if applying this record changes nothing.
    pub fn is_zero(&self) -> bool {
        self.x_placement == 0 && self.y_placement == 0 && self.x_advance == 0 && self.y_advance == 0
    }
}

impl<'a> FontReadWithArgs<'a> for ValueRecord {
    type Args = ValueFormat;

    fn read_with_args(data: FontData<'a>, args: &ValueFormat) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let record = Self::read_at_cursor(&mut cursor, *args)?;
        // device offsets are skipped, but must still be in bounds
        match cursor.position() <= data.len() {
            true => Ok(record),
            false => Err(ReadError::OutOfBounds),
        }
    }
}
