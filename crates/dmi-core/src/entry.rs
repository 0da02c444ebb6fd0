//! Entry point recognition and validation.
//!
//! Three anchor formats exist: the 64-bit SMBIOS 3.x structure (`_SM3_`),
//! the 32-bit SMBIOS 2.x structure (`_SM_`, which embeds a legacy `_DMI_`
//! sub-structure with its own checksum), and the bare legacy DMI anchor
//! (`_DMI_`). A failed signature or checksum means "this is not that kind of
//! entry point" and the caller should try the next candidate; it is a match
//! result, not an error.

use crate::bytes::{u16_at, u32_at, u64_at};
use crate::version::SpecVersion;

/// Callers probing candidate windows should supply at least this many bytes.
pub const ANCHOR_WINDOW: usize = 0x20;

const SMBIOS3_MIN_LEN: u8 = 0x18;
const SMBIOS3_MAX_LEN: u8 = 0x20;
const SMBIOS2_LEN: u8 = 0x1F;
const LEGACY_LEN: usize = 0x0F;

/// Sum of all bytes mod 256 must be zero.
pub(crate) fn checksum_ok(buf: &[u8]) -> bool {
    buf.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)) == 0
}

/// Where the structure table lives and how to walk it, as declared by an
/// entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLocation {
    pub address: u64,
    /// Declared table length. For the 64-bit form this is a maximum, not an
    /// exact size.
    pub length: u32,
    /// Declared record count; 0 means "unknown, walk to the terminator or
    /// the end of the buffer" and only occurs for the 64-bit form.
    pub count: u16,
    pub version: SpecVersion,
    /// The 64-bit form requires the walk to stop at the type 127 marker.
    pub stop_at_eot: bool,
}

/// SMBIOS 3.x 64-bit entry point.
#[derive(Debug, Clone)]
pub struct Smbios3Entry {
    raw: [u8; ANCHOR_WINDOW],
    length: u8,
    version: SpecVersion,
    table_address: u64,
    table_length: u32,
}

impl Smbios3Entry {
    fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < usize::from(SMBIOS3_MIN_LEN) {
            return None;
        }
        let length = buf[0x06];
        // Bound the checksum computation before trusting the length byte.
        if length < SMBIOS3_MIN_LEN || length > SMBIOS3_MAX_LEN {
            tracing::debug!(length, "rejecting _SM3_ anchor: entry length out of range");
            return None;
        }
        if buf.len() < usize::from(length) || !checksum_ok(&buf[..usize::from(length)]) {
            return None;
        }

        let mut raw = [0u8; ANCHOR_WINDOW];
        let copy = buf.len().min(ANCHOR_WINDOW);
        raw[..copy].copy_from_slice(&buf[..copy]);

        Some(Smbios3Entry {
            raw,
            length,
            version: SpecVersion::new(buf[0x07], buf[0x08], buf[0x09]),
            table_address: u64_at(buf, 0x10),
            table_length: u32_at(buf, 0x0C),
        })
    }

    /// The anchor bytes as found, up to the declared entry length.
    pub fn raw(&self) -> &[u8] {
        &self.raw[..usize::from(self.length)]
    }
}

/// SMBIOS 2.x 32-bit entry point with embedded `_DMI_` sub-structure.
#[derive(Debug, Clone)]
pub struct Smbios2Entry {
    raw: [u8; ANCHOR_WINDOW],
    version: SpecVersion,
    /// Set when a known-buggy version encoding was remapped; holds the
    /// original (major, minor) for reporting.
    version_fixup: Option<(u8, u8)>,
    table_address: u32,
    table_length: u16,
    count: u16,
}

impl Smbios2Entry {
    fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < usize::from(SMBIOS2_LEN) {
            return None;
        }
        let length = buf[0x05];
        if length > SMBIOS2_LEN {
            tracing::debug!(length, "rejecting _SM_ anchor: entry length out of range");
            return None;
        }
        if buf.len() < usize::from(length) || !checksum_ok(&buf[..usize::from(length)]) {
            return None;
        }
        // The intermediate anchor carries the table fields and its own
        // independent checksum.
        if &buf[0x10..0x15] != b"_DMI_" || !checksum_ok(&buf[0x10..0x1F]) {
            return None;
        }

        let declared = (buf[0x06], buf[0x07]);
        // Some BIOSes encode the version wrong; remap to the nearest valid
        // revision before it gates any field decode.
        let (version, version_fixup) = match declared {
            (2, 0x1F) | (2, 0x21) => (SpecVersion::new(2, 3, 0), Some(declared)),
            (2, 0x33) => (SpecVersion::new(2, 6, 0), Some(declared)),
            (major, minor) => (SpecVersion::new(major, minor, 0), None),
        };

        let mut raw = [0u8; ANCHOR_WINDOW];
        let copy = buf.len().min(ANCHOR_WINDOW);
        raw[..copy].copy_from_slice(&buf[..copy]);

        Some(Smbios2Entry {
            raw,
            version,
            version_fixup,
            table_address: u32_at(buf, 0x18),
            table_length: u16_at(buf, 0x16),
            count: u16_at(buf, 0x1C),
        })
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw[..usize::from(SMBIOS2_LEN)]
    }

    pub fn version_fixup(&self) -> Option<(u8, u8)> {
        self.version_fixup
    }
}

/// Legacy standalone `_DMI_` anchor.
#[derive(Debug, Clone)]
pub struct LegacyEntry {
    raw: [u8; LEGACY_LEN],
    version: SpecVersion,
    table_address: u32,
    table_length: u16,
    count: u16,
}

impl LegacyEntry {
    fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < LEGACY_LEN || !checksum_ok(&buf[..LEGACY_LEN]) {
            return None;
        }
        let mut raw = [0u8; LEGACY_LEN];
        raw.copy_from_slice(&buf[..LEGACY_LEN]);
        Some(LegacyEntry {
            raw,
            version: SpecVersion::new(buf[0x0E] >> 4, buf[0x0E] & 0x0F, 0),
            table_address: u32_at(buf, 0x08),
            table_length: u16_at(buf, 0x06),
            count: u16_at(buf, 0x0C),
        })
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

/// A recognized and checksum-validated entry point.
#[derive(Debug, Clone)]
pub enum EntryPoint {
    Smbios3(Smbios3Entry),
    Smbios2(Smbios2Entry),
    Legacy(LegacyEntry),
}

impl EntryPoint {
    /// Try each recognizer in priority order: 64-bit, then 32-bit, then
    /// legacy. Returns `None` when no form matches, including on any
    /// checksum mismatch or out-of-range declared length.
    pub fn parse(buf: &[u8]) -> Option<EntryPoint> {
        if buf.len() >= 5 && &buf[..5] == b"_SM3_" {
            return Smbios3Entry::parse(buf).map(EntryPoint::Smbios3);
        }
        if buf.len() >= 4 && &buf[..4] == b"_SM_" {
            return Smbios2Entry::parse(buf).map(EntryPoint::Smbios2);
        }
        if buf.len() >= 5 && &buf[..5] == b"_DMI_" {
            return LegacyEntry::parse(buf).map(EntryPoint::Legacy);
        }
        None
    }

    pub fn version(&self) -> SpecVersion {
        match self {
            EntryPoint::Smbios3(e) => e.version,
            EntryPoint::Smbios2(e) => e.version,
            EntryPoint::Legacy(e) => e.version,
        }
    }

    pub fn table(&self) -> TableLocation {
        match self {
            EntryPoint::Smbios3(e) => TableLocation {
                address: e.table_address,
                length: e.table_length,
                count: 0,
                version: e.version,
                stop_at_eot: true,
            },
            EntryPoint::Smbios2(e) => TableLocation {
                address: u64::from(e.table_address),
                length: u32::from(e.table_length),
                count: e.count,
                version: e.version,
                stop_at_eot: false,
            },
            EntryPoint::Legacy(e) => TableLocation {
                address: u64::from(e.table_address),
                length: u32::from(e.table_length),
                count: e.count,
                version: e.version,
                stop_at_eot: false,
            },
        }
    }

    /// The on-wire anchor bytes, for snapshot passthrough.
    pub fn raw(&self) -> &[u8] {
        match self {
            EntryPoint::Smbios3(e) => e.raw(),
            EntryPoint::Smbios2(e) => e.raw(),
            EntryPoint::Legacy(e) => e.raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn fix_checksum(buf: &mut [u8], at: usize) {
        buf[at] = 0;
        let sum = buf.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        buf[at] = sum.wrapping_neg();
    }

    pub(crate) fn smbios2_anchor(
        major: u8,
        minor: u8,
        table_len: u16,
        table_addr: u32,
        count: u16,
    ) -> [u8; 0x1F] {
        let mut buf = [0u8; 0x1F];
        buf[..4].copy_from_slice(b"_SM_");
        buf[0x05] = 0x1F;
        buf[0x06] = major;
        buf[0x07] = minor;
        buf[0x10..0x15].copy_from_slice(b"_DMI_");
        buf[0x16..0x18].copy_from_slice(&table_len.to_le_bytes());
        buf[0x18..0x1C].copy_from_slice(&table_addr.to_le_bytes());
        buf[0x1C..0x1E].copy_from_slice(&count.to_le_bytes());
        fix_checksum(&mut buf[0x10..0x1F], 0x05);
        fix_checksum(&mut buf, 0x04);
        buf
    }

    pub(crate) fn smbios3_anchor(
        major: u8,
        minor: u8,
        docrev: u8,
        table_len: u32,
        table_addr: u64,
    ) -> [u8; 0x18] {
        let mut buf = [0u8; 0x18];
        buf[..5].copy_from_slice(b"_SM3_");
        buf[0x06] = 0x18;
        buf[0x07] = major;
        buf[0x08] = minor;
        buf[0x09] = docrev;
        buf[0x0C..0x10].copy_from_slice(&table_len.to_le_bytes());
        buf[0x10..0x18].copy_from_slice(&table_addr.to_le_bytes());
        fix_checksum(&mut buf, 0x05);
        buf
    }

    #[test]
    fn smbios2_round_trip() {
        let buf = smbios2_anchor(3, 0, 0x1234, 0xF0000, 9);
        let entry = EntryPoint::parse(&buf).expect("anchor should validate");
        let loc = entry.table();
        assert_eq!(loc.version, SpecVersion::new(3, 0, 0));
        assert_eq!(loc.length, 0x1234);
        assert_eq!(loc.address, 0xF0000);
        assert_eq!(loc.count, 9);
        assert!(!loc.stop_at_eot);
    }

    #[test]
    fn corrupting_any_byte_breaks_recognition() {
        let good = smbios2_anchor(2, 8, 0x40, 0x1000, 2);
        for i in 0..good.len() {
            let mut bad = good;
            bad[i] ^= 0x5A;
            // Flipping the signature changes which recognizer runs; flipping
            // anything else must fail a checksum. Either way: no match.
            assert!(
                EntryPoint::parse(&bad).is_none(),
                "byte {i} corruption still recognized"
            );
        }
    }

    #[test]
    fn smbios3_has_no_count_and_stops_at_eot() {
        let buf = smbios3_anchor(3, 2, 1, 0x800, 0x1234_5678);
        let entry = EntryPoint::parse(&buf).expect("anchor should validate");
        assert_eq!(entry.version(), SpecVersion::new(3, 2, 1));
        let loc = entry.table();
        assert_eq!(loc.count, 0);
        assert!(loc.stop_at_eot);
        assert_eq!(loc.address, 0x1234_5678);
    }

    #[test]
    fn oversized_entry_length_is_rejected() {
        let mut buf = [0u8; 0x30];
        buf[..5].copy_from_slice(b"_SM3_");
        buf[0x06] = 0x21; // one past the hard cap
        fix_checksum(&mut buf[..0x21], 0x05);
        assert!(EntryPoint::parse(&buf).is_none());
    }

    #[test]
    fn legacy_anchor_decodes_bcd_version() {
        let mut buf = [0u8; 0x0F];
        buf[..5].copy_from_slice(b"_DMI_");
        buf[0x06..0x08].copy_from_slice(&0x100u16.to_le_bytes());
        buf[0x08..0x0C].copy_from_slice(&0xE0000u32.to_le_bytes());
        buf[0x0C..0x0E].copy_from_slice(&4u16.to_le_bytes());
        buf[0x0E] = 0x24;
        fix_checksum(&mut buf, 0x05);
        let entry = EntryPoint::parse(&buf).expect("anchor should validate");
        assert_eq!(entry.version(), SpecVersion::new(2, 4, 0));
    }

    #[test]
    fn buggy_versions_are_remapped() {
        for (minor, expect) in [(0x1F, 3), (0x21, 3), (0x33, 6)] {
            let buf = smbios2_anchor(2, minor, 0, 0, 0);
            let entry = EntryPoint::parse(&buf).expect("anchor should validate");
            assert_eq!(entry.version(), SpecVersion::new(2, expect, 0));
            match entry {
                EntryPoint::Smbios2(e) => assert_eq!(e.version_fixup(), Some((2, minor))),
                _ => panic!("wrong form"),
            }
        }
    }
}
