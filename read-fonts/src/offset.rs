//! Handling offsets

use types::{Offset16, Offset32};

use crate::font_data::FontData;
use crate::read::{FontRead, FontReadWithArgs, ReadError};

/// Any offset type.
pub trait Offset: Copy {
    fn to_usize(self) -> usize;

    fn non_null(self) -> Option<usize> {
        match self.to_usize() {
            0 => None,
            other => Some(other),
        }
    }
}

impl Offset for Offset16 {
    #[inline]
    fn to_usize(self) -> usize {
        self.to_u32() as _
    }
}

impl Offset for Offset32 {
    #[inline]
    fn to_usize(self) -> usize {
        self.to_u32() as _
    }
}

/// A helper trait providing 'resolve' methods for offset types.
///
/// The `data` argument is the structure the offset is relative to. For
/// offsets stored in records this is usually the parent table, not the
/// record itself.
pub trait ResolveOffset {
    /// Resolve an offset that must not be null.
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError>;

    /// Resolve an offset for which null means "absent".
    fn resolve_nullable<'a, T: FontRead<'a>>(
        &self,
        data: FontData<'a>,
    ) -> Result<Option<T>, ReadError>;

    fn resolve_with_args<'a, T: FontReadWithArgs<'a>>(
        &self,
        data: FontData<'a>,
        args: &T::Args,
    ) -> Result<T, ReadError>;
}

impl<O: Offset> ResolveOffset for O {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError> {
        let offset = self.non_null().ok_or(ReadError::NullOffset)?;
        data.read_table_at(offset)
    }

    fn resolve_nullable<'a, T: FontRead<'a>>(
        &self,
        data: FontData<'a>,
    ) -> Result<Option<T>, ReadError> {
        match self.non_null() {
            Some(offset) => data.read_table_at(offset).map(Some),
            None => Ok(None),
        }
    }

    fn resolve_with_args<'a, T: FontReadWithArgs<'a>>(
        &self,
        data: FontData<'a>,
        args: &T::Args,
    ) -> Result<T, ReadError> {
        let offset = self.non_null().ok_or(ReadError::NullOffset)?;
        data.split_off(offset)
            .ok_or(ReadError::OutOfBounds)
            .and_then(|data| T::read_with_args(data, args))
    }
}

/// Read `count` 16-bit offsets at the cursor and resolve each of them against
/// `base`.
///
/// This is the shape of almost every "array of subtables" in the layout
/// tables.
pub(crate) fn read_offset_array<'a, T: FontRead<'a>>(
    cursor: &mut crate::font_data::Cursor<'a>,
    count: usize,
    base: FontData<'a>,
) -> Result<Vec<T>, ReadError> {
    let offsets: &[types::BigEndian<Offset16>] = cursor.read_array(count)?;
    offsets
        .iter()
        .map(|offset| offset.get().resolve(base))
        .collect()
}

/// Like [`read_offset_array`], but null offsets produce `None`.
pub(crate) fn read_nullable_offset_array<'a, T: FontRead<'a>>(
    cursor: &mut crate::font_data::Cursor<'a>,
    count: usize,
    base: FontData<'a>,
) -> Result<Vec<Option<T>>, ReadError> {
    let offsets: &[types::BigEndian<Offset16>] = cursor.read_array(count)?;
    offsets
        .iter()
        .map(|offset| offset.get().resolve_nullable(base))
        .collect()
}
