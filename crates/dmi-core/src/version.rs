//! SMBIOS specification versions.
//!
//! Field presence and meaning are gated on the spec revision the firmware
//! claims, so versions need ordering comparisons. Gating only ever keys on
//! the major.minor pair; the third byte (document revision for SMBIOS 3.x)
//! is carried for display.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecVersion {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl SpecVersion {
    pub const V2_0: SpecVersion = SpecVersion::new(2, 0, 0);
    pub const V2_1: SpecVersion = SpecVersion::new(2, 1, 0);
    pub const V2_3: SpecVersion = SpecVersion::new(2, 3, 0);
    pub const V2_6: SpecVersion = SpecVersion::new(2, 6, 0);
    pub const V3_1: SpecVersion = SpecVersion::new(3, 1, 0);
    pub const V3_2: SpecVersion = SpecVersion::new(3, 2, 0);

    /// Highest revision this decoder fully understands. Newer tables still
    /// decode; a comment warns that new fields may be missing.
    pub const SUPPORTED: SpecVersion = SpecVersion::new(3, 3, 0);

    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        SpecVersion {
            major,
            minor,
            revision,
        }
    }

    /// The major.minor pair, which is what every field gate in the
    /// specification compares against.
    pub const fn pair(self) -> (u8, u8) {
        (self.major, self.minor)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_major_minor_revision() {
        assert!(SpecVersion::new(2, 6, 0) > SpecVersion::new(2, 5, 9));
        assert!(SpecVersion::new(3, 1, 1) >= SpecVersion::V3_1);
        assert!(SpecVersion::new(3, 1, 1) < SpecVersion::V3_2);
        assert!(SpecVersion::new(2, 0, 0) == SpecVersion::V2_0);
    }

    #[test]
    fn pair_ignores_revision() {
        assert_eq!(SpecVersion::new(3, 2, 1).pair(), (3, 2));
    }
}
