//! System Slots (type 9), On Board Devices (type 10) and Onboard Device
//! Extended Information (type 41).

use crate::report::{Sink, Value};
use crate::table::Record;

use super::table_lookup;

fn slot_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 40] = [
        "Other", // 0x01
        "Unknown",
        "ISA",
        "MCA",
        "EISA",
        "PCI",
        "PC Card (PCMCIA)",
        "VLB",
        "Proprietary",
        "Processor Card",
        "Proprietary Memory Card",
        "I/O Riser Card",
        "NuBus",
        "PCI-66",
        "AGP",
        "AGP 2x",
        "AGP 4x",
        "PCI-X",
        "AGP 8x",
        "M.2 Socket 1-DP",
        "M.2 Socket 1-SD",
        "M.2 Socket 2",
        "M.2 Socket 3",
        "MXM Type I",
        "MXM Type II",
        "MXM Type III",
        "MXM Type III-HE",
        "MXM Type IV",
        "MXM 3.0 Type A",
        "MXM 3.0 Type B",
        "PCI Express 2 SFF-8639 (U.2)",
        "PCI Express 3 SFF-8639 (U.2)",
        "PCI Express Mini 52-pin with bottom-side keep-outs",
        "PCI Express Mini 52-pin without bottom-side keep-outs",
        "PCI Express Mini 76-pin",
        "PCI Express 4 SFF-8639 (U.2)",
        "PCI Express 5 SFF-8639 (U.2)",
        "OCP NIC 3.0 Small Form Factor (SFF)",
        "OCP NIC 3.0 Large Form Factor (LFF)",
        "OCP NIC Prior to 3.0", // 0x28
    ];
    static TYPES_A0: [&str; 39] = [
        "PC-98/C20", // 0xA0
        "PC-98/C24",
        "PC-98/E",
        "PC-98/Local Bus",
        "PC-98/Card",
        "PCI Express",
        "PCI Express x1",
        "PCI Express x2",
        "PCI Express x4",
        "PCI Express x8",
        "PCI Express x16",
        "PCI Express 2",
        "PCI Express 2 x1",
        "PCI Express 2 x2",
        "PCI Express 2 x4",
        "PCI Express 2 x8",
        "PCI Express 2 x16",
        "PCI Express 3",
        "PCI Express 3 x1",
        "PCI Express 3 x2",
        "PCI Express 3 x4",
        "PCI Express 3 x8",
        "PCI Express 3 x16",
        "", // 0xB7, undefined
        "PCI Express 4",
        "PCI Express 4 x1",
        "PCI Express 4 x2",
        "PCI Express 4 x4",
        "PCI Express 4 x8",
        "PCI Express 4 x16",
        "PCI Express 5",
        "PCI Express 5 x1",
        "PCI Express 5 x2",
        "PCI Express 5 x4",
        "PCI Express 5 x8",
        "PCI Express 5 x16",
        "PCI Express 6+",
        "EDSFF E1",
        "EDSFF E3", // 0xC6
    ];
    if code == 0x30 {
        return Value::text("CXL FLexbus 1.0");
    }
    if (0xA0..=0xC6).contains(&code) {
        let label = TYPES_A0[usize::from(code - 0xA0)];
        if label.is_empty() {
            return Value::OUT_OF_SPEC;
        }
        return Value::text(label);
    }
    table_lookup(code, 0x01, &TYPES)
}

/// Bus width as a prefix of the type label ("x16 PCI Express"). "Other" and
/// "Unknown" render as an empty prefix.
fn slot_bus_width(code: u8) -> Value<'static> {
    static WIDTHS: [&str; 14] = [
        "", // 0x01, "Other"
        "", // "Unknown"
        "8-bit ",
        "16-bit ",
        "32-bit ",
        "64-bit ",
        "128-bit ",
        "x1 ",
        "x2 ",
        "x4 ",
        "x8 ",
        "x12 ",
        "x16 ",
        "x32 ", // 0x0E
    ];
    table_lookup(code, 0x01, &WIDTHS)
}

fn slot_current_usage(code: u8) -> Value<'static> {
    static USAGE: [&str; 5] = [
        "Other", // 0x01
        "Unknown",
        "Available",
        "In Use",
        "Unavailable", // 0x05
    ];
    table_lookup(code, 0x01, &USAGE)
}

fn slot_length(code: u8) -> Value<'static> {
    static LENGTHS: [&str; 6] = [
        "Other", // 0x01
        "Unknown",
        "Short",
        "Long",
        "2.5\" drive form factor",
        "3.5\" drive form factor", // 0x06
    ];
    table_lookup(code, 0x01, &LENGTHS)
}

fn slot_id(sink: &mut dyn Sink, code1: u8, code2: u8, ty: u8) {
    match ty {
        // MCA and EISA use plain slot numbers.
        0x04 | 0x05 => sink.attr("ID", Value::int(code1)),
        // The PCI/AGP/PCI-X/PCI Express families all share one ID scheme.
        0x06 | 0x0E..=0x13 | 0x1F | 0x20 | 0x21..=0x23 | 0xA5..=0xB6 | 0xB8..=0xBD => {
            sink.attr("ID", Value::int(code1));
        }
        0x07 => sink.attr(
            "ID",
            Value::text(format!("Adapter {code1}, Socket {code2}")),
        ),
        _ => {}
    }
}

fn slot_characteristics(sink: &mut dyn Sink, name: &str, code1: u8, code2: u8) {
    static CHARACTERISTICS_1: [&str; 7] = [
        "5.0 V is provided", // 1
        "3.3 V is provided",
        "Opening is shared",
        "PC Card-16 is supported",
        "Cardbus is supported",
        "Zoom Video is supported",
        "Modem ring resume is supported", // 7
    ];
    static CHARACTERISTICS_2: [&str; 7] = [
        "PME signal is supported", // 0
        "Hot-plug devices are supported",
        "SMBus signal is supported",
        "PCIe slot bifurcation is supported",
        "Async/surprise removal is supported",
        "Flexbus slot, CXL 1.0 capable",
        "Flexbus slot, CXL 2.0 capable", // 6
    ];
    if code1 & 0x01 != 0 {
        sink.attr(name, Value::UNKNOWN);
    } else if code1 & 0xFE == 0 && code2 & 0x07 == 0 {
        sink.attr(name, Value::NONE);
    } else {
        sink.list_start(name, None);
        for (i, label) in CHARACTERISTICS_1.iter().enumerate() {
            if code1 & (1 << (i + 1)) != 0 {
                sink.list_item(Value::text(*label));
            }
        }
        for (i, label) in CHARACTERISTICS_2.iter().enumerate() {
            if code2 & (1 << i) != 0 {
                sink.list_item(Value::text(*label));
            }
        }
        sink.list_end();
    }
}

/// Segment:bus:device.function address; all-ones means not mapped.
pub(super) fn segment_bus_func(sink: &mut dyn Sink, code1: u16, code2: u8, code3: u8) {
    if !(code1 == 0xFFFF && code2 == 0xFF && code3 == 0xFF) {
        sink.attr(
            "Bus Address",
            Value::text(format!(
                "{code1:04x}:{code2:02x}:{:02x}.{:x}",
                code3 >> 3,
                code3 & 0x7
            )),
        );
    }
}

fn slot_peers(rec: &Record<'_>, count: usize, sink: &mut dyn Sink) {
    for i in 0..count {
        let off = 0x13 + 5 * i;
        sink.attr(
            &format!("Peer Device {}", i + 1),
            Value::text(format!(
                "{:04x}:{:02x}:{:02x}.{:x} (Width {})",
                rec.u16_at(off),
                rec.u8_at(off + 2),
                rec.u8_at(off + 3) >> 3,
                rec.u8_at(off + 3) & 0x07,
                rec.u8_at(off + 4)
            )),
        );
    }
}

pub(super) fn system_slot(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("System Slot Information");
    if !rec.has(0x0C) {
        return;
    }
    sink.attr("Designation", rec.string(rec.u8_at(0x04)));
    sink.attr(
        "Type",
        Value::text(format!(
            "{}{}",
            slot_bus_width(rec.u8_at(0x06)),
            slot_type(rec.u8_at(0x05))
        )),
    );
    sink.attr("Current Usage", slot_current_usage(rec.u8_at(0x07)));
    sink.attr("Length", slot_length(rec.u8_at(0x08)));
    slot_id(sink, rec.u8_at(0x09), rec.u8_at(0x0A), rec.u8_at(0x05));
    if !rec.has(0x0D) {
        slot_characteristics(sink, "Characteristics", rec.u8_at(0x0B), 0x00);
    } else {
        slot_characteristics(sink, "Characteristics", rec.u8_at(0x0B), rec.u8_at(0x0C));
    }
    if !rec.has(0x11) {
        return;
    }
    segment_bus_func(sink, rec.u16_at(0x0D), rec.u8_at(0x0F), rec.u8_at(0x10));
    if !rec.has(0x13) {
        return;
    }
    sink.attr("Data Bus Width", Value::int(rec.u8_at(0x11)));
    let peers = usize::from(rec.u8_at(0x12));
    sink.attr("Peer Devices", Value::int(peers as u64));
    if usize::from(rec.length()) - 0x13 >= peers * 5 {
        slot_peers(rec, peers, sink);
    }
}

pub(super) fn on_board_device_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 10] = [
        "Other", // 0x01
        "Unknown",
        "Video",
        "SCSI Controller",
        "Ethernet",
        "Token Ring",
        "Sound",
        "PATA Controller",
        "SATA Controller",
        "SAS Controller", // 0x0A
    ];
    table_lookup(code, 0x01, &TYPES)
}

pub(super) fn on_board_devices(rec: &Record<'_>, sink: &mut dyn Sink) {
    let count = (usize::from(rec.length()) - 0x04) / 2;
    for i in 0..count {
        if count == 1 {
            sink.name("On Board Device Information");
        } else {
            sink.name(&format!("On Board Device {} Information", i + 1));
        }
        let device = rec.u8_at(0x04 + 2 * i);
        sink.attr("Type", on_board_device_type(device & 0x7F));
        sink.attr(
            "Status",
            Value::text(if device & 0x80 != 0 { "Enabled" } else { "Disabled" }),
        );
        sink.attr("Description", rec.string(rec.u8_at(0x04 + 2 * i + 1)));
    }
}

pub(super) fn onboard_device_extended(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Onboard Device");
    if !rec.has(0x0B) {
        return;
    }
    sink.attr("Reference Designation", rec.string(rec.u8_at(0x04)));
    sink.attr("Type", on_board_device_type(rec.u8_at(0x05) & 0x7F));
    sink.attr(
        "Status",
        Value::text(if rec.u8_at(0x05) & 0x80 != 0 {
            "Enabled"
        } else {
            "Disabled"
        }),
    );
    sink.attr("Type Instance", Value::int(rec.u8_at(0x06)));
    segment_bus_func(sink, rec.u16_at(0x07), rec.u8_at(0x09), rec.u8_at(0x0A));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TextSink;

    #[test]
    fn slot_types_cover_the_vendor_range() {
        assert_eq!(slot_type(0x06), Value::text("PCI"));
        assert_eq!(slot_type(0x30), Value::text("CXL FLexbus 1.0"));
        assert_eq!(slot_type(0xA5), Value::text("PCI Express"));
        assert_eq!(slot_type(0xB7), Value::OUT_OF_SPEC);
        assert_eq!(slot_type(0xC6), Value::text("EDSFF E3"));
        assert_eq!(slot_type(0x29), Value::OUT_OF_SPEC);
    }

    #[test]
    fn width_prefixes_type() {
        assert_eq!(slot_bus_width(0x0D), Value::text("x16 "));
        assert_eq!(slot_bus_width(0x01), Value::text(""));
    }

    #[test]
    fn bus_address_suppressed_when_unmapped() {
        let mut sink = TextSink::new(Vec::new());
        segment_bus_func(&mut sink, 0xFFFF, 0xFF, 0xFF);
        segment_bus_func(&mut sink, 0, 0x3F, 0x08);
        let out = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(out, "\tBus Address: 0000:3f:01.0\n");
    }
}
