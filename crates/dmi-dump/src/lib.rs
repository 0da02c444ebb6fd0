#![forbid(unsafe_code)]

//! Raw table acquisition and binary snapshot passthrough for the SMBIOS
//! decoder.
//!
//! Two file layouts are supported:
//!
//! - **Dump files**: the entry point anchor at offset 0 with its table
//!   address rewritten to 32, and the structure table at offset 32. This is
//!   the interchange format; [`save_dump`] produces it and [`load_dump`]
//!   reads it back.
//! - **Split files**: an entry point file plus a table file starting at
//!   offset 0 (the layout the kernel exposes under
//!   `/sys/firmware/dmi/tables`). [`load_split`] reads the pair.
//!
//! Table reads tolerate short files: the decoder treats a short table as
//! truncated and still reports everything before the cut.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use dmi_core::{EntryPoint, RawTable};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DumpError>;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no SMBIOS or DMI entry point recognized in {0}")]
    NoEntryPoint(String),
}

/// Offset the structure table is placed at inside a dump file.
const DUMP_TABLE_OFFSET: u64 = 32;

/// Largest window any entry point form needs.
const ANCHOR_WINDOW: usize = 0x20;

/// Read up to `length` bytes at `offset`. A file shorter than requested
/// yields a short buffer, not an error; the walker downstream treats that
/// as a truncated table.
pub fn read_range(path: &Path, offset: u64, length: usize) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    // Read through `take` so a hostile declared length never drives the
    // allocation; only bytes actually present are buffered.
    let mut buf = Vec::new();
    file.take(length as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// An entry point and the table bytes it governs, ready to decode.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub entry: EntryPoint,
    pub table: RawTable,
}

/// Load a dump file: recognize the anchor at offset 0, then read the table
/// from the address the (rewritten) anchor declares.
pub fn load_dump(path: &Path) -> Result<LoadedTable> {
    let anchor = read_range(path, 0, ANCHOR_WINDOW)?;
    let entry = EntryPoint::parse(&anchor)
        .ok_or_else(|| DumpError::NoEntryPoint(path.display().to_string()))?;
    let loc = entry.table();
    let table = read_range(path, loc.address, loc.length as usize)?;
    Ok(LoadedTable {
        entry,
        table: RawTable::new(table),
    })
}

/// Load a split entry-point/table file pair (sysfs layout). The table file
/// holds the table itself, so the anchor's address is ignored and the file
/// is read from offset 0.
pub fn load_split(entry_path: &Path, table_path: &Path) -> Result<LoadedTable> {
    let anchor = read_range(entry_path, 0, ANCHOR_WINDOW)?;
    let entry = EntryPoint::parse(&anchor)
        .ok_or_else(|| DumpError::NoEntryPoint(entry_path.display().to_string()))?;
    let loc = entry.table();
    let table = read_range(table_path, 0, loc.length as usize)?;
    Ok(LoadedTable {
        entry,
        table: RawTable::new(table),
    })
}

/// Rewrite a 32-bit table address field to [`DUMP_TABLE_OFFSET`], keeping
/// the checksum at `checksum_at` valid. The checksum byte participates in
/// its own sum, so adding back the bytes removed keeps the total at zero.
fn rebase_table_address(buf: &mut [u8], addr_at: usize, checksum_at: usize) {
    let old: u8 = buf[addr_at..addr_at + 4]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    buf[checksum_at] = buf[checksum_at]
        .wrapping_add(old)
        .wrapping_sub(DUMP_TABLE_OFFSET as u8);
    buf[addr_at..addr_at + 4].copy_from_slice(&(DUMP_TABLE_OFFSET as u32).to_le_bytes());
}

fn rebase_table_address_64(buf: &mut [u8], addr_at: usize, checksum_at: usize) {
    let old: u8 = buf[addr_at..addr_at + 8]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    buf[checksum_at] = buf[checksum_at]
        .wrapping_add(old)
        .wrapping_sub(DUMP_TABLE_OFFSET as u8);
    buf[addr_at..addr_at + 8].copy_from_slice(&DUMP_TABLE_OFFSET.to_le_bytes());
}

/// Craft the anchor bytes as they appear in a dump file: table address
/// rewritten to [`DUMP_TABLE_OFFSET`] with the affected checksum repaired.
fn crafted_anchor(entry: &EntryPoint) -> Vec<u8> {
    let mut buf = entry.raw().to_vec();
    match entry {
        // The 32-bit form keeps its table fields in the embedded anchor,
        // whose own checksum covers them.
        EntryPoint::Smbios2(_) => rebase_table_address(&mut buf, 0x18, 0x15),
        EntryPoint::Legacy(_) => rebase_table_address(&mut buf, 0x08, 0x05),
        EntryPoint::Smbios3(_) => rebase_table_address_64(&mut buf, 0x10, 0x05),
    }
    buf
}

/// Write a dump file: crafted anchor at offset 0, table at offset 32.
pub fn save_dump(entry: &EntryPoint, table: &RawTable, path: &Path) -> Result<()> {
    let anchor = crafted_anchor(entry);
    let mut file = File::create(path)?;
    file.write_all(&anchor)?;
    // Pad the gap between the anchor and the table.
    let pad = vec![0u8; DUMP_TABLE_OFFSET as usize - anchor.len()];
    file.write_all(&pad)?;
    file.write_all(table.bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_checksum(buf: &mut [u8], at: usize) {
        buf[at] = 0;
        let sum = buf.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        buf[at] = sum.wrapping_neg();
    }

    fn smbios2_anchor(table_len: u16, table_addr: u32, count: u16) -> [u8; 0x1F] {
        let mut buf = [0u8; 0x1F];
        buf[..4].copy_from_slice(b"_SM_");
        buf[0x05] = 0x1F;
        buf[0x06] = 2;
        buf[0x07] = 8;
        buf[0x10..0x15].copy_from_slice(b"_DMI_");
        buf[0x16..0x18].copy_from_slice(&table_len.to_le_bytes());
        buf[0x18..0x1C].copy_from_slice(&table_addr.to_le_bytes());
        buf[0x1C..0x1E].copy_from_slice(&count.to_le_bytes());
        fix_checksum(&mut buf[0x10..0x1F], 0x05);
        fix_checksum(&mut buf, 0x04);
        buf
    }

    fn end_marker() -> Vec<u8> {
        vec![127, 4, 0, 0, 0, 0]
    }

    #[test]
    fn dump_round_trip() {
        let table = end_marker();
        let anchor = smbios2_anchor(table.len() as u16, 0xF0000, 1);
        let entry = EntryPoint::parse(&anchor).expect("anchor should validate");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("smbios.dump");
        save_dump(&entry, &RawTable::new(table.clone()), &path).expect("save");

        let loaded = load_dump(&path).expect("load");
        // The reloaded anchor validates and points at offset 32.
        assert_eq!(loaded.entry.table().address, DUMP_TABLE_OFFSET);
        assert_eq!(loaded.entry.table().count, 1);
        assert_eq!(loaded.table.bytes(), &table[..]);
    }

    #[test]
    fn short_table_reads_are_not_errors() {
        // Anchor claims 100 bytes of table but the file holds 6.
        let table = end_marker();
        let mut anchor = smbios2_anchor(100, 0xF0000, 1).to_vec();
        let entry = EntryPoint::parse(&anchor).expect("anchor should validate");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("short.dump");
        save_dump(&entry, &RawTable::new(table.clone()), &path).expect("save");

        let loaded = load_dump(&path).expect("load");
        assert_eq!(loaded.table.len(), table.len());

        // And a garbage file produces a recognition error, not a panic.
        anchor[0] = b'X';
        std::fs::write(&path, &anchor).expect("write");
        assert!(matches!(
            load_dump(&path),
            Err(DumpError::NoEntryPoint(_))
        ));
    }
}
