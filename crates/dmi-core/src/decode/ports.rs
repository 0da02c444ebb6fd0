//! Port Connector Information (type 8) and Built-in Pointing Device
//! (type 21).

use crate::report::{Sink, Value};
use crate::table::Record;

use super::table_lookup;

fn connector_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 36] = [
        "None", // 0x00
        "Centronics",
        "Mini Centronics",
        "Proprietary",
        "DB-25 male",
        "DB-25 female",
        "DB-15 male",
        "DB-15 female",
        "DB-9 male",
        "DB-9 female",
        "RJ-11",
        "RJ-45",
        "50 Pin MiniSCSI",
        "Mini DIN",
        "Micro DIN",
        "PS/2",
        "Infrared",
        "HP-HIL",
        "Access Bus (USB)",
        "SSA SCSI",
        "Circular DIN-8 male",
        "Circular DIN-8 female",
        "On Board IDE",
        "On Board Floppy",
        "9 Pin Dual Inline (pin 10 cut)",
        "25 Pin Dual Inline (pin 26 cut)",
        "50 Pin Dual Inline",
        "68 Pin Dual Inline",
        "On Board Sound Input From CD-ROM",
        "Mini Centronics Type-14",
        "Mini Centronics Type-26",
        "Mini Jack (headphones)",
        "BNC",
        "IEEE 1394",
        "SAS/SATA Plug Receptacle",
        "USB Type-C Receptacle", // 0x23
    ];
    static TYPES_A0: [&str; 5] = [
        "PC-98", // 0xA0
        "PC-98 Hireso",
        "PC-H98",
        "PC-98 Note",
        "PC-98 Full", // 0xA4
    ];
    if (0xA0..=0xA4).contains(&code) {
        return Value::text(TYPES_A0[usize::from(code - 0xA0)]);
    }
    if code == 0xFF {
        return Value::text("Other");
    }
    table_lookup(code, 0x00, &TYPES)
}

fn port_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 34] = [
        "None", // 0x00
        "Parallel Port XT/AT Compatible",
        "Parallel Port PS/2",
        "Parallel Port ECP",
        "Parallel Port EPP",
        "Parallel Port ECP/EPP",
        "Serial Port XT/AT Compatible",
        "Serial Port 16450 Compatible",
        "Serial Port 16550 Compatible",
        "Serial Port 16550A Compatible",
        "SCSI Port",
        "MIDI Port",
        "Joystick Port",
        "Keyboard Port",
        "Mouse Port",
        "SSA SCSI",
        "USB",
        "Firewire (IEEE P1394)",
        "PCMCIA Type I",
        "PCMCIA Type II",
        "PCMCIA Type III",
        "Cardbus",
        "Access Bus Port",
        "SCSI II",
        "SCSI Wide",
        "PC-98",
        "PC-98 Hireso",
        "PC-H98",
        "Video Port",
        "Audio Port",
        "Modem Port",
        "Network Port",
        "SATA",
        "SAS", // 0x21
    ];
    static TYPES_A0: [&str; 2] = [
        "8251 Compatible", // 0xA0
        "8251 FIFO Compatible", // 0xA1
    ];
    if (0xA0..=0xA1).contains(&code) {
        return Value::text(TYPES_A0[usize::from(code - 0xA0)]);
    }
    if code == 0xFF {
        return Value::text("Other");
    }
    table_lookup(code, 0x00, &TYPES)
}

pub(super) fn port_connector(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Port Connector Information");
    if !rec.has(0x09) {
        return;
    }
    sink.attr("Internal Reference Designator", rec.string(rec.u8_at(0x04)));
    sink.attr("Internal Connector Type", connector_type(rec.u8_at(0x05)));
    sink.attr("External Reference Designator", rec.string(rec.u8_at(0x06)));
    sink.attr("External Connector Type", connector_type(rec.u8_at(0x07)));
    sink.attr("Port Type", port_type(rec.u8_at(0x08)));
}

fn pointing_device_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 9] = [
        "Other", // 0x01
        "Unknown",
        "Mouse",
        "Track Ball",
        "Track Point",
        "Glide Point",
        "Touch Pad",
        "Touch Screen",
        "Optical Sensor", // 0x09
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn pointing_device_interface(code: u8) -> Value<'static> {
    static INTERFACES: [&str; 8] = [
        "Other", // 0x01
        "Unknown",
        "Serial",
        "PS/2",
        "Infrared",
        "HIP-HIL",
        "Bus Mouse",
        "ADB (Apple Desktop Bus)", // 0x08
    ];
    static INTERFACES_A0: [&str; 3] = [
        "Bus Mouse DB-9", // 0xA0
        "Bus Mouse Micro DIN",
        "USB", // 0xA2
    ];
    if (0xA0..=0xA2).contains(&code) {
        return Value::text(INTERFACES_A0[usize::from(code - 0xA0)]);
    }
    table_lookup(code, 0x01, &INTERFACES)
}

pub(super) fn pointing_device(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Built-in Pointing Device");
    if !rec.has(0x07) {
        return;
    }
    sink.attr("Type", pointing_device_type(rec.u8_at(0x04)));
    sink.attr("Interface", pointing_device_interface(rec.u8_at(0x05)));
    sink.attr("Buttons", Value::int(rec.u8_at(0x06)));
}
