//! raw font bytes

use std::ops::{Bound, Range, RangeBounds};

use bytemuck::AnyBitPattern;
use types::{FixedSize, Scalar};

use crate::read::{FontRead, ReadError};

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    total_pos: u32,
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// # Note
///
/// Reads advance the cursor even when they fail, so the first error is the
/// one to report.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Empty data, useful for some tests and examples
    pub const EMPTY: FontData<'static> = FontData {
        total_pos: 0,
        bytes: &[],
    };

    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData {
            total_pos: 0,
            bytes,
        }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The position of this data relative to the start of the font file.
    pub fn position_in_file(&self) -> u32 {
        self.total_pos
    }

    /// Returns self[pos..]
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData {
            bytes,
            total_pos: self.total_pos.saturating_add(pos as u32),
        })
    }

    /// returns self[..pos], and updates self to = self[pos..];
    pub fn take_up_to(&mut self, pos: usize) -> Option<FontData<'a>> {
        if pos > self.len() {
            return None;
        }
        let (head, tail) = self.bytes.split_at(pos);
        let head = FontData {
            bytes: head,
            total_pos: self.total_pos,
        };
        self.bytes = tail;
        self.total_pos = self.total_pos.saturating_add(pos as u32);
        Some(head)
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let start = match range.start_bound() {
            Bound::Unbounded => 0,
            Bound::Included(i) => *i,
            Bound::Excluded(i) => i.saturating_add(1),
        };

        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        let total_pos = self.total_pos.saturating_add(start as u32);
        self.bytes
            .get(bounds)
            .map(|bytes| FontData { bytes, total_pos })
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar + FixedSize>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Interpret the bytes in `range` as a slice of some record type `T`.
    ///
    /// `T` must be a type with an alignment of one, such as `BigEndian<u16>` or
    /// a `#[repr(C, packed)]` record of big-endian fields.
    pub fn read_array<T: AnyBitPattern + FixedSize>(
        &self,
        range: Range<usize>,
    ) -> Result<&'a [T], ReadError> {
        let bytes = self
            .bytes
            .get(range)
            .ok_or(ReadError::OutOfBounds)?;
        if bytes.len() % T::RAW_BYTE_LEN != 0 {
            return Err(ReadError::InvalidArrayLen);
        };
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    /// Read a table or subtable starting at `offset`.
    pub fn read_table_at<T: FontRead<'a>>(&self, offset: usize) -> Result<T, ReadError> {
        self.split_off(offset)
            .ok_or(ReadError::OutOfBounds)
            .and_then(T::read)
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// Return the data as a byte slice
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn advance<T: FixedSize>(&mut self) {
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
    }

    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    /// Read a scalar and advance the cursor.
    pub fn read<T: Scalar + FixedSize>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.advance::<T>();
        temp
    }

    /// Read an array of `len` items and advance the cursor.
    pub fn read_array<T: AnyBitPattern + FixedSize>(
        &mut self,
        len: usize,
    ) -> Result<&'a [T], ReadError> {
        let len = len
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let temp = self.data.read_array(self.pos..end);
        self.pos = end;
        temp
    }

    /// read a value, validating it with the provided function if successful.
    pub fn read_validate<T, F>(&mut self, f: F) -> Result<T, ReadError>
    where
        T: Scalar + FixedSize,
        F: FnOnce(&T) -> bool,
    {
        let temp = self.read()?;
        if f(&temp) {
            Ok(temp)
        } else {
            Err(ReadError::ValidationError)
        }
    }

    /// The current position of the cursor, relative to its data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The number of bytes left after the cursor.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The data this cursor reads from.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::BigEndian;

    #[test]
    fn slice_keeps_file_position() {
        let bytes = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let data = FontData::new(&bytes);
        let tail = data.split_off(4).unwrap();
        assert_eq!(tail.position_in_file(), 4);
        let mid = tail.slice(1..3).unwrap();
        assert_eq!(mid.position_in_file(), 5);
        assert_eq!(mid.as_bytes(), &[5, 6]);
        assert!(data.split_off(9).is_none());
    }

    #[test]
    fn out_of_bounds_reads() {
        let data = FontData::new(&[0, 1, 0]);
        assert_eq!(data.read_at::<u16>(0).unwrap(), 1);
        assert!(matches!(data.read_at::<u16>(2), Err(ReadError::OutOfBounds)));
        assert!(matches!(
            data.read_at::<u16>(usize::MAX),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn arrays() {
        let data = FontData::new(&[0, 1, 0, 2, 0, 3]);
        let array: &[BigEndian<u16>] = data.read_array(0..6).unwrap();
        assert_eq!(array.iter().map(|x| x.get()).collect::<Vec<_>>(), [1, 2, 3]);
        assert!(matches!(
            data.read_array::<BigEndian<u16>>(0..5),
            Err(ReadError::InvalidArrayLen)
        ));
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        assert_eq!(cursor.read_array::<BigEndian<u16>>(2).unwrap().len(), 2);
        assert_eq!(cursor.remaining_bytes(), 0);
        assert!(cursor.read::<u16>().is_err());
    }
}
