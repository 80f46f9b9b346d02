//! The lookup flag type.
//!
//! This is kind-of-but-not-quite-exactly a bit enumeration: the high byte is
//! a mark attachment class rather than a set of flags.

use types::{FixedSize, Scalar};

/// The [LookupFlag](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookupFlag) bit enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupFlag(u16);

impl LookupFlag {
    pub const RIGHT_TO_LEFT: u16 = 0x0001;
    pub const IGNORE_BASE_GLYPHS: u16 = 0x0002;
    pub const IGNORE_LIGATURES: u16 = 0x0004;
    pub const IGNORE_MARKS: u16 = 0x0008;
    pub const USE_MARK_FILTERING_SET: u16 = 0x0010;

    /// Return new, empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Construct a LookupFlag from a raw value, discarding the reserved bits.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        const VALID_BITS: u16 = !0x00E0;
        Self(bits & VALID_BITS)
    }

    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Only relevant to cursive attachment: the last glyph in a sequence is
    /// positioned on the baseline.
    pub const fn right_to_left(self) -> bool {
        self.0 & Self::RIGHT_TO_LEFT != 0
    }

    /// If set, skips over base glyphs
    pub const fn ignore_base_glyphs(self) -> bool {
        self.0 & Self::IGNORE_BASE_GLYPHS != 0
    }

    /// If set, skips over ligatures
    pub const fn ignore_ligatures(self) -> bool {
        self.0 & Self::IGNORE_LIGATURES != 0
    }

    /// If set, skips over all combining marks
    pub const fn ignore_marks(self) -> bool {
        self.0 & Self::IGNORE_MARKS != 0
    }

    /// If set, the lookup is followed by a mark filtering set index, and
    /// marks not in that set are skipped.
    pub const fn use_mark_filtering_set(self) -> bool {
        self.0 & Self::USE_MARK_FILTERING_SET != 0
    }

    /// If not zero, skips over all marks of attachment type different from specified.
    pub const fn mark_attachment_type_mask(self) -> Option<u16> {
        match self.0 >> 8 {
            0 => None,
            class => Some(class),
        }
    }
}

impl Scalar for LookupFlag {
    type Raw = <u16 as Scalar>::Raw;

    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(u16::from_raw(raw))
    }
}

impl FixedSize for LookupFlag {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN;
}
