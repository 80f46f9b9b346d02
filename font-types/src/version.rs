/// A packed major/minor version pair, as used by the layout tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MajorMinor {
    pub major: u16,
    pub minor: u16,
}

impl MajorMinor {
    pub const VERSION_1_0: MajorMinor = MajorMinor::new(1, 0);
    pub const VERSION_1_1: MajorMinor = MajorMinor::new(1, 1);
    pub const VERSION_1_2: MajorMinor = MajorMinor::new(1, 2);

    pub const fn new(major: u16, minor: u16) -> Self {
        MajorMinor { major, minor }
    }
}

impl crate::raw::Scalar for MajorMinor {
    type Raw = [u8; 4];

    fn from_raw(raw: Self::Raw) -> Self {
        let major = u16::from_be_bytes([raw[0], raw[1]]);
        let minor = u16::from_be_bytes([raw[2], raw[3]]);
        Self { major, minor }
    }

    fn to_raw(self) -> Self::Raw {
        let [a, b] = self.major.to_be_bytes();
        let [c, d] = self.minor.to_be_bytes();
        [a, b, c, d]
    }
}

impl crate::raw::FixedSize for MajorMinor {
    const RAW_BYTE_LEN: usize = 4;
}

impl std::fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    #[test]
    fn ordering() {
        assert!(MajorMinor::VERSION_1_1 > MajorMinor::VERSION_1_0);
        assert!(MajorMinor::new(2, 0) > MajorMinor::VERSION_1_2);
        assert_eq!(MajorMinor::read(&[0, 1, 0, 2]), Some(MajorMinor::VERSION_1_2));
    }
}
