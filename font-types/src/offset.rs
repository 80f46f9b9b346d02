//! Offsets to tables
//!
//! OpenType offsets are relative to the start of some enclosing structure,
//! never to the start of the file. Resolving them is left to `read-fonts`.

macro_rules! impl_offset {
    ($name:ident, $bits:literal, $rawty:ty) => {
        #[doc = concat!("A ", stringify!($bits), "-bit offset to a table.")]
        ///
        /// A value of zero is the null offset. Whether a given field may be
        /// null is up to the structure containing it.
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
        #[repr(transparent)]
        pub struct $name($rawty);

        impl $name {
            /// Create a new offset.
            pub const fn new(raw: $rawty) -> Self {
                Self(raw)
            }

            /// Return `true` if this is the null offset.
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            /// The offset as a `u32`.
            pub const fn to_u32(self) -> u32 {
                self.0 as u32
            }

            /// The offset as a `usize`, or `None` if it is null.
            pub const fn non_null(self) -> Option<usize> {
                match self.0 {
                    0 => None,
                    other => Some(other as usize),
                }
            }
        }

        crate::newtype_scalar!($name, [u8; $bits / 8]);
    };
}

impl_offset!(Offset16, 16, u16);
impl_offset!(Offset32, 32, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_offsets() {
        assert!(Offset16::new(0).is_null());
        assert_eq!(Offset16::new(0).non_null(), None);
        assert_eq!(Offset32::new(0x1_0000).non_null(), Some(0x1_0000));
    }
}
