//! Full-path scenario: build a table, snapshot it through dmi-dump, reload
//! and decode it, and check the text output survives the round trip intact.

use dmi_core::decode::decode_table;
use dmi_core::report::TextSink;
use dmi_core::{DecodeConfig, DecodeFlags, EntryPoint, NoOemHook, RawTable};

fn fix_checksum(buf: &mut [u8], at: usize) {
    buf[at] = 0;
    let sum = buf.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    buf[at] = sum.wrapping_neg();
}

fn smbios2_entry(table_len: u16, count: u16) -> EntryPoint {
    let mut buf = [0u8; 0x1F];
    buf[..4].copy_from_slice(b"_SM_");
    buf[0x05] = 0x1F;
    buf[0x06] = 3;
    buf[0x07] = 0;
    buf[0x10..0x15].copy_from_slice(b"_DMI_");
    buf[0x16..0x18].copy_from_slice(&table_len.to_le_bytes());
    buf[0x18..0x1C].copy_from_slice(&0xF0000u32.to_le_bytes());
    buf[0x1C..0x1E].copy_from_slice(&count.to_le_bytes());
    fix_checksum(&mut buf[0x10..0x1F], 0x05);
    fix_checksum(&mut buf, 0x04);
    EntryPoint::parse(&buf).expect("synthetic entry point must validate")
}

fn sample_table() -> Vec<u8> {
    // System Information with strings, and the end marker.
    let mut table = vec![1u8, 8, 0x00, 0x00, 1, 2, 0, 0];
    table.extend_from_slice(b"Initech\0Model 7\0\0");
    table.extend_from_slice(&[127, 4, 0x01, 0x00, 0, 0]);
    table
}

fn render(entry: &EntryPoint, table: Vec<u8>, flags: DecodeFlags) -> String {
    let cfg = DecodeConfig {
        flags,
        ..DecodeConfig::default()
    };
    let mut sink = TextSink::new(Vec::new());
    decode_table(entry, &RawTable::new(table), &cfg, &mut NoOemHook, &mut sink);
    String::from_utf8(sink.into_inner()).expect("utf-8")
}

#[test]
fn dump_round_trip_preserves_the_decode() {
    let table = sample_table();
    let entry = smbios2_entry(table.len() as u16, 2);

    let direct = render(&entry, table.clone(), DecodeFlags::empty());
    assert!(direct.contains("\tManufacturer: Initech"), "{direct}");
    assert!(direct.contains("\tProduct Name: Model 7"), "{direct}");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("machine.dump");
    dmi_dump::save_dump(&entry, &RawTable::new(table), &path).expect("save dump");

    let loaded = dmi_dump::load_dump(&path).expect("load dump");
    let replayed = render(
        &loaded.entry,
        loaded.table.bytes().to_vec(),
        DecodeFlags::FROM_DUMP,
    );

    // Identical apart from the table address line, which a dump does not
    // carry.
    let strip = |text: &str| {
        text.lines()
            .filter(|line| !line.starts_with("Table at "))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip(&direct), strip(&replayed));
}
