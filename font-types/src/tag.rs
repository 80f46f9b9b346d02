use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// An OpenType tag.
///
/// A tag is four bytes, each in the printable ASCII range `(0x20..=0x7E)`.
/// Script, language and feature records are all keyed by tags.
///
/// Tags read from fonts are not validated, since real fonts contain invalid
/// ones; use [`Tag::new_checked`] when constructing new tags from user input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes, without validation.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Attempt to create a `Tag` from between one and four bytes.
    ///
    /// Short inputs are padded with spaces. Bytes must be printable ASCII,
    /// the first byte must not be a space, and no non-space byte may follow
    /// a space.
    pub const fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [b' '; 4];
        let mut seen_space = false;
        let mut i = 0;
        while i < src.len() {
            let byte = src[i];
            if byte < 0x20 || byte > 0x7E || (byte == b' ' && i == 0) {
                return Err(InvalidTag::InvalidByte { pos: i, byte });
            }
            if byte != b' ' && seen_space {
                return Err(InvalidTag::ByteAfterSpace { pos: i });
            }
            seen_space |= byte == b' ';
            raw[i] = byte;
            i += 1;
        }
        Ok(Tag(raw))
    }

    /// Construct a new `Tag` from a big-endian `u32`, without validation.
    pub const fn from_u32(src: u32) -> Self {
        Self(src.to_be_bytes())
    }

    /// Create a tag from raw big-endian bytes, without validation.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Return the memory representation of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// The tag as a big-endian `u32`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

/// An error representing an invalid tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTag {
    /// The tag was not between 1 and 4 bytes in length.
    InvalidLength(usize),
    /// The tag contained a byte outside the printable ASCII range, or began
    /// with a space.
    InvalidByte { pos: usize, byte: u8 },
    /// The tag contained a non-space character after a space.
    ByteAfterSpace { pos: usize },
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.0
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(raw)
    }
}

impl crate::raw::FixedSize for Tag {
    const RAW_BYTE_LEN: usize = 4;
}

impl PartialEq<&[u8; 4]> for Tag {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidLength(len) => write!(f, "tag must have length 1..=4 (got {len})"),
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "invalid byte 0x{byte:02X} at index {pos}")
            }
            InvalidTag::ByteAfterSpace { pos } => {
                write!(f, "non-space character at index {pos} follows a space")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidTag {}

// tags serialize as their four character string form
#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagVisitor;

        impl serde::de::Visitor<'_> for TagVisitor {
            type Value = Tag;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("a string of one to four printable ascii characters")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Tag::new_checked(v.as_bytes()).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(TagVisitor)
    }
}
