//! Hostile-input properties: no table, however corrupt or truncated, may
//! make the decoder panic or read out of bounds.

use dmi_core::decode::decode_table;
use dmi_core::report::TextSink;
use dmi_core::{DecodeConfig, DecodeFlags, EntryPoint, NoOemHook, RawTable, Walker};
use proptest::prelude::*;

fn fix_checksum(buf: &mut [u8], at: usize) {
    buf[at] = 0;
    let sum = buf.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    buf[at] = sum.wrapping_neg();
}

fn smbios3_entry(table_len: u32) -> EntryPoint {
    let mut buf = [0u8; 0x18];
    buf[..5].copy_from_slice(b"_SM3_");
    buf[0x06] = 0x18;
    buf[0x07] = 3;
    buf[0x08] = 3;
    buf[0x0C..0x10].copy_from_slice(&table_len.to_le_bytes());
    buf[0x10..0x18].copy_from_slice(&0x2000u64.to_le_bytes());
    fix_checksum(&mut buf, 0x05);
    EntryPoint::parse(&buf).expect("synthetic entry point must validate")
}

fn legacy_entry(table_len: u16, count: u16) -> EntryPoint {
    let mut buf = [0u8; 0x0F];
    buf[..5].copy_from_slice(b"_DMI_");
    buf[0x06..0x08].copy_from_slice(&table_len.to_le_bytes());
    buf[0x08..0x0C].copy_from_slice(&0xE0000u32.to_le_bytes());
    buf[0x0C..0x0E].copy_from_slice(&count.to_le_bytes());
    buf[0x0E] = 0x26;
    fix_checksum(&mut buf, 0x05);
    EntryPoint::parse(&buf).expect("synthetic entry point must validate")
}

/// A table of plausible records so the walk reaches deep into the field
/// decoders instead of dying on the first header.
fn plausible_table(seed: &[u8]) -> Vec<u8> {
    let mut table = Vec::new();
    let mut i = 0;
    while table.len() < 512 && i + 2 <= seed.len() {
        let ty = seed[i] % 48;
        let length = 4 + seed[i + 1] % 80;
        let mut rec = vec![ty, length, 0, 0];
        rec.resize(usize::from(length), 0xA5);
        // Borrow seed bytes for the formatted area so gates see variety.
        for (j, b) in rec.iter_mut().enumerate().skip(4) {
            *b = seed[(i + j) % seed.len()];
        }
        rec.extend_from_slice(b"str\0\0");
        table.extend_from_slice(&rec);
        i += 2;
    }
    table
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn walker_survives_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..512), count in 0u16..8) {
        let mut walker = Walker::new(&data, count, false);
        while walker.next_record().is_some() {}
        prop_assert!(walker.stop().is_some());
    }

    #[test]
    fn decode_survives_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let entry = smbios3_entry(data.len() as u32);
        let mut sink = TextSink::new(Vec::new());
        decode_table(&entry, &RawTable::new(data), &DecodeConfig::default(), &mut NoOemHook, &mut sink);
    }

    #[test]
    fn decode_survives_random_truncation(seed in proptest::collection::vec(any::<u8>(), 16..128), cut in 0usize..600, count in 0u16..12) {
        let mut table = plausible_table(&seed);
        let declared = table.len() as u16;
        table.truncate(cut.min(table.len()));
        let entry = legacy_entry(declared, count);
        let mut sink = TextSink::new(Vec::new());
        decode_table(&entry, &RawTable::new(table), &DecodeConfig::default(), &mut NoOemHook, &mut sink);
    }

    #[test]
    fn dump_mode_survives_random_truncation(seed in proptest::collection::vec(any::<u8>(), 16..128), cut in 0usize..600) {
        let mut table = plausible_table(&seed);
        let declared = table.len() as u16;
        table.truncate(cut.min(table.len()));
        let entry = legacy_entry(declared, 0);
        let cfg = DecodeConfig { flags: DecodeFlags::DUMP_HEX, ..DecodeConfig::default() };
        let mut sink = TextSink::new(Vec::new());
        decode_table(&entry, &RawTable::new(table), &cfg, &mut NoOemHook, &mut sink);
    }

    #[test]
    fn entry_recognition_never_panics(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = EntryPoint::parse(&data);
    }
}
