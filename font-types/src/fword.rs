//! Font units

/// 16-bit signed quantity in font design units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct FWord(i16);

/// 16-bit unsigned quantity in font design units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct UfWord(u16);

impl FWord {
    pub const fn new(raw: i16) -> Self {
        Self(raw)
    }

    pub const fn to_i16(self) -> i16 {
        self.0
    }
}

impl UfWord {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl From<FWord> for i32 {
    fn from(value: FWord) -> i32 {
        value.0 as i32
    }
}

impl From<UfWord> for i32 {
    fn from(value: UfWord) -> i32 {
        value.0 as i32
    }
}

crate::newtype_scalar!(FWord, [u8; 2]);
crate::newtype_scalar!(UfWord, [u8; 2]);
