//! small utilities used in tests

use font_types::Scalar;
use std::collections::HashMap;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar and remember its position under `tag`.
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Append raw bytes, usually another table.
    pub fn append(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    fn data_for(&mut self, tag: &str) -> &mut [u8] {
        let offset = self.offset_for(tag);
        &mut self.data[offset..]
    }

    /// Overwrite the value previously pushed with `tag`.
    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let data = self.data_for(tag);
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();

        if data.len() < new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }

        for (left, right) in data.iter_mut().zip(new_data) {
            *left = *right
        }
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<BeBuffer> for Vec<u8> {
    fn from(value: BeBuffer) -> Self {
        value.data
    }
}

/// Build a [`BeBuffer`] from a list of items.
///
/// Each item is one of:
/// - a typed literal (`1u16`) or a constant (`TT_SFNT_VERSION`)
/// - a parenthesized expression (`(-20i16)`, `(Tag::new(b"liga"))`)
/// - an array of literals of one type (`[1u16, 2, 3]`)
/// - a tagged value (`{0u16: "offset"}`) that can be patched with
///   [`BeBuffer::write_at`]
#[macro_export]
macro_rules! be_buffer {
    ( $( $x:tt ),* $(,)? ) => {
        {
            let builder = $crate::bebuffer::BeBuffer::new();
            $(
                let builder = $crate::be_buffer_add!(builder, $x);
            )*
            builder
        }
    };
}

#[macro_export]
macro_rules! be_buffer_add {
    ($b:ident, $v:literal) => {
        $b.push($v)
    };
    ($b:ident, [$($v:literal),+ $(,)?]) => {
        $b.extend([$($v),*])
    };
    ($b:ident, {$v:tt : $tag:literal}) => {
        $b.push_with_tag($v, $tag)
    };
    ($b:ident, ($v:expr)) => {
        $b.push($v)
    };
    ($b:ident, $v:ident) => {
        $b.push($v)
    };
}
