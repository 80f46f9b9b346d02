//! Glyph identifiers
//!
//! Although these are treated as u16s by OpenType, we choose to represent them
//! as a distinct type.

/// A 16-bit glyph identifier.
///
/// Glyph ids are local to a single font. Id 0 is always `.notdef`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct GlyphId16(u16);

impl GlyphId16 {
    /// The identifier reserved for unknown glyphs.
    pub const NOTDEF: GlyphId16 = GlyphId16(0);

    /// Construct a new `GlyphId16`.
    pub const fn new(raw: u16) -> Self {
        GlyphId16(raw)
    }

    /// The identifier as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// `true` if this is the `.notdef` glyph.
    pub const fn is_notdef(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for GlyphId16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

impl From<u16> for GlyphId16 {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<GlyphId16> for u32 {
    fn from(value: GlyphId16) -> u32 {
        value.0 as u32
    }
}

crate::newtype_scalar!(GlyphId16, [u8; 2]);
