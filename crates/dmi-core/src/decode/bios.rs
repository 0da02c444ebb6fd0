//! BIOS Information (type 0) and BIOS Language Information (type 13).

use crate::report::{Sink, Value};
use crate::table::Record;
use crate::version::SpecVersion;

use super::size::attr_size;

fn runtime_size(sink: &mut dyn Sink, code: u32) {
    if code & 0x0000_03FF != 0 {
        sink.attr("Runtime Size", Value::text(format!("{code} bytes")));
    } else {
        sink.attr("Runtime Size", Value::text(format!("{} kB", code >> 10)));
    }
}

fn rom_size(sink: &mut dyn Sink, code1: u8, code2: u16) {
    if code1 != 0xFF {
        attr_size(sink, "ROM Size", (u64::from(code1) + 1) << 6, 1);
    } else {
        // Extended ROM size: 14-bit value with a 2-bit unit selector.
        let unit = match code2 >> 14 {
            0 => "MB",
            1 => "GB",
            _ => "<OUT OF SPEC>",
        };
        sink.attr("ROM Size", Value::text(format!("{} {unit}", code2 & 0x3FFF)));
    }
}

fn characteristics(sink: &mut dyn Sink, code: u64) {
    static CHARACTERISTICS: [&str; 28] = [
        "ISA is supported", // 4
        "MCA is supported",
        "EISA is supported",
        "PCI is supported",
        "PC Card (PCMCIA) is supported",
        "PNP is supported",
        "APM is supported",
        "BIOS is upgradeable",
        "BIOS shadowing is allowed",
        "VLB is supported",
        "ESCD support is available",
        "Boot from CD is supported",
        "Selectable boot is supported",
        "BIOS ROM is socketed",
        "Boot from PC Card (PCMCIA) is supported",
        "EDD is supported",
        "Japanese floppy for NEC 9800 1.2 MB is supported (int 13h)",
        "Japanese floppy for Toshiba 1.2 MB is supported (int 13h)",
        "5.25\"/360 kB floppy services are supported (int 13h)",
        "5.25\"/1.2 MB floppy services are supported (int 13h)",
        "3.5\"/720 kB floppy services are supported (int 13h)",
        "3.5\"/2.88 MB floppy services are supported (int 13h)",
        "Print screen service is supported (int 5h)",
        "8042 keyboard services are supported (int 9h)",
        "Serial services are supported (int 14h)",
        "Printer services are supported (int 17h)",
        "CGA/mono video services are supported (int 10h)",
        "NEC PC-98", // 31
    ];

    // Bit 3 claims the whole characteristics field is meaningless.
    if code & (1 << 3) != 0 {
        sink.list_item(Value::text("BIOS characteristics not supported"));
        return;
    }
    for (i, label) in CHARACTERISTICS.iter().enumerate() {
        if code & (1u64 << (i + 4)) != 0 {
            sink.list_item(Value::text(*label));
        }
    }
}

fn characteristics_x1(sink: &mut dyn Sink, code: u8) {
    static CHARACTERISTICS: [&str; 8] = [
        "ACPI is supported", // 0
        "USB legacy is supported",
        "AGP is supported",
        "I2O boot is supported",
        "LS-120 boot is supported",
        "ATAPI Zip drive boot is supported",
        "IEEE 1394 boot is supported",
        "Smart battery is supported", // 7
    ];
    for (i, label) in CHARACTERISTICS.iter().enumerate() {
        if code & (1 << i) != 0 {
            sink.list_item(Value::text(*label));
        }
    }
}

fn characteristics_x2(sink: &mut dyn Sink, code: u8) {
    static CHARACTERISTICS: [&str; 5] = [
        "BIOS boot specification is supported", // 0
        "Function key-initiated network boot is supported",
        "Targeted content distribution is supported",
        "UEFI is supported",
        "System is a virtual machine", // 4
    ];
    for (i, label) in CHARACTERISTICS.iter().enumerate() {
        if code & (1 << i) != 0 {
            sink.list_item(Value::text(*label));
        }
    }
}

pub(super) fn bios_information(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("BIOS Information");
    if !rec.has(0x12) {
        return;
    }
    sink.attr("Vendor", rec.string(rec.u8_at(0x04)));
    sink.attr("Version", rec.string(rec.u8_at(0x05)));
    sink.attr("Release Date", rec.string(rec.u8_at(0x08)));
    // On IA-64 there is no legacy BIOS and the base address reads 0; the
    // address and runtime size are meaningless then.
    let base = rec.u16_at(0x06);
    if base != 0 {
        sink.attr("Address", Value::text(format!("0x{base:04X}0")));
        runtime_size(sink, (0x10000 - u32::from(base)) << 4);
    }
    rom_size(
        sink,
        rec.u8_at(0x09),
        if rec.has(0x1A) { rec.u16_at(0x18) } else { 16 },
    );
    sink.list_start("Characteristics", None);
    characteristics(sink, rec.u64_at(0x0A));
    sink.list_end();
    if !rec.has(0x13) {
        return;
    }
    characteristics_x1(sink, rec.u8_at(0x12));
    if !rec.has(0x14) {
        return;
    }
    characteristics_x2(sink, rec.u8_at(0x13));
    if !rec.has(0x18) {
        return;
    }
    if rec.u8_at(0x14) != 0xFF && rec.u8_at(0x15) != 0xFF {
        sink.attr(
            "BIOS Revision",
            Value::text(format!("{}.{}", rec.u8_at(0x14), rec.u8_at(0x15))),
        );
    }
    if rec.u8_at(0x16) != 0xFF && rec.u8_at(0x17) != 0xFF {
        sink.attr(
            "Firmware Revision",
            Value::text(format!("{}.{}", rec.u8_at(0x16), rec.u8_at(0x17))),
        );
    }
}

fn language_format(code: u8) -> &'static str {
    if code & 0x01 != 0 {
        "Abbreviated"
    } else {
        "Long"
    }
}

pub(super) fn bios_language(rec: &Record<'_>, ver: SpecVersion, sink: &mut dyn Sink) {
    sink.name("BIOS Language Information");
    if !rec.has(0x16) {
        return;
    }
    if ver >= SpecVersion::V2_1 {
        sink.attr(
            "Language Description Format",
            Value::text(language_format(rec.u8_at(0x05))),
        );
    }
    let count = rec.u8_at(0x04);
    sink.list_start("Installable Languages", Some(Value::int(count)));
    for i in 1..=count {
        sink.list_item(rec.string(i));
    }
    sink.list_end();
    sink.attr("Currently Installed Language", rec.string(rec.u8_at(0x15)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TextSink;
    use crate::table::Walker;

    #[test]
    fn rom_size_prefers_the_basic_field() {
        let mut sink = TextSink::new(Vec::new());
        rom_size(&mut sink, 0x0F, 0); // (15 + 1) * 64 kB = 1 MB
        rom_size(&mut sink, 0xFF, (1 << 14) | 32); // extended, 32 GB
        let out = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(out, "\tROM Size: 1 MB\n\tROM Size: 32 GB\n");
    }

    #[test]
    fn bios_record_decodes_strings_and_flags() {
        let mut formatted = vec![0u8; 0x12 - 4];
        formatted[0] = 1; // vendor
        formatted[1] = 2; // version
        formatted[4] = 3; // release date
        formatted[0x06 - 4..0x08 - 4].copy_from_slice(&0xE800u16.to_le_bytes());
        formatted[0x09 - 4] = 0x0F;
        // Characteristics: PCI + upgradeable.
        let chars: u64 = (1 << 7) | (1 << 11);
        formatted[0x0A - 4..0x12 - 4].copy_from_slice(&chars.to_le_bytes());

        let mut buf = vec![0u8, 0x12, 0x00, 0x00];
        buf.extend_from_slice(&formatted);
        buf.extend_from_slice(b"Acme\x002.4\x0009/01/2020\0\0");

        let mut walker = Walker::new(&buf, 0, false);
        let rec = walker.next_record().expect("record should parse");
        let mut sink = TextSink::new(Vec::new());
        bios_information(&rec, &mut sink);
        let out = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(
            out,
            "BIOS Information\n\
             \tVendor: Acme\n\
             \tVersion: 2.4\n\
             \tRelease Date: 09/01/2020\n\
             \tAddress: 0xE8000\n\
             \tRuntime Size: 96 kB\n\
             \tROM Size: 1 MB\n\
             \tCharacteristics:\n\
             \t\tPCI is supported\n\
             \t\tBIOS is upgradeable\n"
        );
    }
}
