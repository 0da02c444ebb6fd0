//! Decode-time configuration.
//!
//! The decode entry point takes configuration explicitly instead of
//! consulting process-wide state; quiet mode, filters and dump mode are
//! plain data here.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DecodeFlags: u32 {
        /// Suppress announcements, diagnostics, handle cross-references and
        /// the marker records.
        const QUIET = 1 << 0;
        /// Stop the walk after the type 127 end-of-table marker even for
        /// entry point forms that do not require it.
        const STOP_AT_EOT = 1 << 1;
        /// The table came from a dump file; its declared address is not
        /// announced.
        const FROM_DUMP = 1 << 2;
        /// Dump each record as hex and raw strings instead of decoding its
        /// fields.
        const DUMP_HEX = 1 << 3;
    }
}

/// Which record types to decode. Everything outside the set still advances
/// the walk; it just is not reported.
#[derive(Debug, Clone)]
pub struct TypeFilter {
    set: [bool; 256],
}

/// Keyword groups accepted by the `--type` option, mapping a hardware area
/// to the record types describing it.
pub const TYPE_KEYWORDS: &[(&str, &[u8])] = &[
    ("bios", &[0, 13]),
    ("system", &[1, 12, 15, 23, 32]),
    ("baseboard", &[2, 10, 41]),
    ("chassis", &[3]),
    ("processor", &[4]),
    ("memory", &[5, 6, 16, 17]),
    ("cache", &[7]),
    ("connector", &[8]),
    ("slot", &[9]),
];

impl TypeFilter {
    pub fn empty() -> Self {
        TypeFilter { set: [false; 256] }
    }

    pub fn insert(&mut self, ty: u8) {
        self.set[usize::from(ty)] = true;
    }

    /// Add every type in a keyword group; returns false for an unknown
    /// keyword (matching is case-insensitive).
    pub fn insert_keyword(&mut self, keyword: &str) -> bool {
        for (name, types) in TYPE_KEYWORDS {
            if name.eq_ignore_ascii_case(keyword) {
                for &ty in *types {
                    self.insert(ty);
                }
                return true;
            }
        }
        false
    }

    pub fn contains(&self, ty: u8) -> bool {
        self.set[usize::from(ty)]
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeConfig {
    pub flags: DecodeFlags,
    /// Decode only these record types; `None` decodes everything.
    pub type_filter: Option<TypeFilter>,
    /// Decode only the record with this handle.
    pub handle_filter: Option<u16>,
}

impl DecodeConfig {
    pub fn quiet(&self) -> bool {
        self.flags.contains(DecodeFlags::QUIET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_groups_expand() {
        let mut filter = TypeFilter::empty();
        assert!(filter.insert_keyword("Memory"));
        for ty in [5, 6, 16, 17] {
            assert!(filter.contains(ty));
        }
        assert!(!filter.contains(7));
        assert!(!filter.insert_keyword("gpu"));
    }
}
