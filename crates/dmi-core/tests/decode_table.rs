//! End-to-end decode scenarios over synthetic tables.

use dmi_core::decode::decode_table;
use dmi_core::report::{Sink, TextSink, Value};
use dmi_core::{
    DecodeConfig, DecodeFlags, EntryPoint, NoOemHook, OemHook, RawTable, Record, TypeFilter,
    VendorContext,
};

fn fix_checksum(buf: &mut [u8], at: usize) {
    buf[at] = 0;
    let sum = buf.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    buf[at] = sum.wrapping_neg();
}

/// 31-byte 32-bit entry point with both checksums valid.
fn smbios2_entry(major: u8, minor: u8, table_len: u16, count: u16) -> EntryPoint {
    let mut buf = [0u8; 0x1F];
    buf[..4].copy_from_slice(b"_SM_");
    buf[0x05] = 0x1F;
    buf[0x06] = major;
    buf[0x07] = minor;
    buf[0x10..0x15].copy_from_slice(b"_DMI_");
    buf[0x16..0x18].copy_from_slice(&table_len.to_le_bytes());
    buf[0x18..0x1C].copy_from_slice(&0xF0000u32.to_le_bytes());
    buf[0x1C..0x1E].copy_from_slice(&count.to_le_bytes());
    fix_checksum(&mut buf[0x10..0x1F], 0x05);
    fix_checksum(&mut buf, 0x04);
    EntryPoint::parse(&buf).expect("synthetic entry point must validate")
}

fn bios_record() -> Vec<u8> {
    let mut formatted = vec![0u8; 0x12 - 4];
    formatted[0x04 - 4] = 1; // vendor
    formatted[0x05 - 4] = 2; // version
    formatted[0x06 - 4..0x08 - 4].copy_from_slice(&0xE800u16.to_le_bytes());
    formatted[0x08 - 4] = 3; // release date
    formatted[0x09 - 4] = 0x0F; // (15 + 1) * 64 kB of ROM
    let characteristics: u64 = (1 << 7) | (1 << 11); // PCI, upgradeable
    formatted[0x0A - 4..0x12 - 4].copy_from_slice(&characteristics.to_le_bytes());

    let mut rec = vec![0u8, 0x12, 0x00, 0x00];
    rec.extend_from_slice(&formatted);
    rec.extend_from_slice(b"Acme\x002.4\x0009/01/2020\0\0");
    rec
}

fn end_marker(handle: u16) -> Vec<u8> {
    let mut rec = vec![127u8, 4];
    rec.extend_from_slice(&handle.to_le_bytes());
    rec.extend_from_slice(&[0, 0]);
    rec
}

fn decode_to_string(entry: &EntryPoint, table: &[u8], cfg: &DecodeConfig) -> String {
    let mut sink = TextSink::new(Vec::new());
    decode_table(
        entry,
        &RawTable::new(table.to_vec()),
        cfg,
        &mut NoOemHook,
        &mut sink,
    );
    String::from_utf8(sink.into_inner()).expect("utf-8")
}

#[test]
fn two_record_table_decodes_verbatim_with_no_diagnostics() {
    let mut table = bios_record();
    table.extend_from_slice(&end_marker(0x0001));
    let entry = smbios2_entry(2, 8, table.len() as u16, 2);

    let out = decode_to_string(&entry, &table, &DecodeConfig::default());
    let expected = format!(
        "SMBIOS 2.8 present.\n\
         2 structures occupying {} bytes.\n\
         Table at 0x000F0000.\n\
         \n\
         Handle 0x0000, DMI type 0, 18 bytes\n\
         BIOS Information\n\
         \tVendor: Acme\n\
         \tVersion: 2.4\n\
         \tRelease Date: 09/01/2020\n\
         \tAddress: 0xE8000\n\
         \tRuntime Size: 96 kB\n\
         \tROM Size: 1 MB\n\
         \tCharacteristics:\n\
         \t\tPCI is supported\n\
         \t\tBIOS is upgradeable\n\
         \n\
         Handle 0x0001, DMI type 127, 4 bytes\n\
         End Of Table\n\
         \n",
        table.len()
    );
    assert_eq!(out, expected);
}

#[test]
fn quiet_mode_stops_at_the_end_marker() {
    let mut table = bios_record();
    table.extend_from_slice(&end_marker(0x0001));
    let entry = smbios2_entry(2, 8, table.len() as u16, 2);

    let cfg = DecodeConfig {
        flags: DecodeFlags::QUIET,
        ..DecodeConfig::default()
    };
    let out = decode_to_string(&entry, &table, &cfg);
    assert!(out.starts_with("BIOS Information\n"), "{out}");
    assert!(!out.contains("Handle"), "{out}");
    assert!(!out.contains("End Of Table"), "{out}");
    assert!(!out.contains("present"), "{out}");
}

#[test]
fn type_filter_selects_records() {
    let mut table = bios_record();
    table.extend_from_slice(&end_marker(0x0001));
    let entry = smbios2_entry(2, 8, table.len() as u16, 2);

    let mut filter = TypeFilter::empty();
    assert!(filter.insert_keyword("bios"));
    let cfg = DecodeConfig {
        type_filter: Some(filter),
        ..DecodeConfig::default()
    };
    let out = decode_to_string(&entry, &table, &cfg);
    assert!(out.contains("BIOS Information"), "{out}");
    assert!(!out.contains("End Of Table"), "{out}");
    // Filtered runs skip the table summary but keep the version banner.
    assert!(out.contains("SMBIOS 2.8 present."), "{out}");
    assert!(!out.contains("structures occupying"), "{out}");
}

#[test]
fn handle_filter_selects_one_record() {
    let mut table = bios_record();
    table.extend_from_slice(&end_marker(0x0001));
    let entry = smbios2_entry(2, 8, table.len() as u16, 2);

    let cfg = DecodeConfig {
        handle_filter: Some(0x0001),
        ..DecodeConfig::default()
    };
    let out = decode_to_string(&entry, &table, &cfg);
    assert!(!out.contains("BIOS Information"), "{out}");
    assert!(out.contains("End Of Table"), "{out}");
}

#[test]
fn truncated_table_reports_and_stops() {
    let mut table = bios_record();
    table.extend_from_slice(&end_marker(0x0001));
    let declared = table.len() as u16;
    // Cut inside the BIOS record's string area.
    table.truncate(24);
    let entry = smbios2_entry(2, 8, declared, 2);

    let out = decode_to_string(&entry, &table, &DecodeConfig::default());
    assert!(
        out.contains("bytes announced, only 24 bytes available."),
        "{out}"
    );
    assert!(out.contains("<TRUNCATED>"), "{out}");
    assert!(
        out.contains("Wrong DMI structures count: 2 announced, only 1 decoded."),
        "{out}"
    );
    // The truncated record is not decoded.
    assert!(!out.contains("BIOS Information"), "{out}");
}

#[test]
fn short_record_length_is_fatal_to_the_walk() {
    // One good record, then a header with length 3.
    let mut table = bios_record();
    table.extend_from_slice(&[5, 3, 0, 0, 0, 0]);
    let entry = smbios2_entry(2, 8, table.len() as u16, 2);

    let out = decode_to_string(&entry, &table, &DecodeConfig::default());
    assert!(out.contains("BIOS Information"), "{out}");
    assert!(
        out.contains("Invalid entry length (3). DMI table is broken! Stop."),
        "{out}"
    );
    // Post-walk mismatch noise is suppressed after the fatal diagnostic.
    assert!(!out.contains("Wrong DMI structures"), "{out}");
}

#[test]
fn unknown_type_falls_back_to_hex_dump() {
    let mut table = vec![200u8, 5, 0x10, 0x00, 0xAB];
    table.extend_from_slice(b"hello\0\0");
    table.extend_from_slice(&end_marker(0x0011));
    let entry = smbios2_entry(2, 8, table.len() as u16, 2);

    let out = decode_to_string(&entry, &table, &DecodeConfig::default());
    assert!(out.contains("OEM-specific Type"), "{out}");
    assert!(out.contains("\tHeader and Data:"), "{out}");
    assert!(out.contains("C8 05 10 00 AB"), "{out}");
    assert!(out.contains("\tStrings:"), "{out}");
    assert!(out.contains("\t\thello"), "{out}");
}

struct RecordingHook {
    seen: Vec<u8>,
    manufacturer: Option<String>,
}

impl OemHook for RecordingHook {
    fn try_decode(
        &mut self,
        record: &Record<'_>,
        ctx: &VendorContext,
        sink: &mut dyn Sink,
    ) -> bool {
        self.seen.push(record.record_type());
        self.manufacturer = ctx.manufacturer.clone();
        sink.name("Vendor Extension");
        sink.attr("Raw Type", Value::int(record.record_type()));
        true
    }
}

#[test]
fn oem_hook_gets_vendor_context() {
    // System record supplies the vendor, then an OEM record exercises the
    // hook.
    let mut table = vec![1u8, 8, 0x00, 0x00, 1, 2, 0, 0];
    table.extend_from_slice(b"Acme Corp\0Rocket 9\0\0");
    table.extend_from_slice(&[200, 4, 0x10, 0x00, 0, 0]);
    table.extend_from_slice(&end_marker(0x0011));
    let entry = smbios2_entry(2, 8, table.len() as u16, 3);

    let mut hook = RecordingHook {
        seen: Vec::new(),
        manufacturer: None,
    };
    let mut sink = TextSink::new(Vec::new());
    decode_table(
        &entry,
        &RawTable::new(table),
        &DecodeConfig::default(),
        &mut hook,
        &mut sink,
    );
    let out = String::from_utf8(sink.into_inner()).expect("utf-8");

    assert_eq!(hook.seen, vec![200]);
    assert_eq!(hook.manufacturer.as_deref(), Some("Acme Corp"));
    assert!(out.contains("Vendor Extension"), "{out}");
    assert!(!out.contains("OEM-specific Type"), "{out}");
}

#[test]
fn management_device_fixup_is_reported() {
    let mut table = vec![34u8, 0x10, 0x00, 0x00];
    table.extend_from_slice(&[1, 0x04, 0, 0, 0, 0, 0x03]); // through 0x0B
    table.extend_from_slice(b"LM78-");
    table.extend_from_slice(b"compatible\0\0");
    table.extend_from_slice(&end_marker(0x0011));
    let entry = smbios2_entry(2, 8, table.len() as u16, 2);

    let out = decode_to_string(&entry, &table, &DecodeConfig::default());
    assert!(
        out.contains("Invalid entry length (16). Fixed up to 11."),
        "{out}"
    );
    assert!(out.contains("\tDescription: LM78-compatible"), "{out}");
}
