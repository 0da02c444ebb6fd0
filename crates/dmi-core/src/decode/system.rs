//! System-level records: System Information (1), OEM Strings (11), System
//! Configuration Options (12), Group Associations (14), System Event Log
//! (15), System Reset (23), Hardware Security (24), System Power Controls
//! (25), Out-of-band Remote Access (30), Boot Integrity Services (31),
//! System Boot (32) and Additional Information (40).

use crate::entry::checksum_ok;
use crate::report::{Sink, Value};
use crate::table::Record;
use crate::version::SpecVersion;

use super::{structure_type_name, table_lookup};

/// Format a 16-byte UUID. All-0xFF means the field is unsupported, all-zero
/// means it is supported but unset. The first three fields switched to
/// little-endian encoding in spec 2.6; earlier firmware is left in wire
/// order since plenty of it followed RFC 4122 instead.
pub(super) fn uuid_value(p: &[u8], ver: SpecVersion) -> Value<'static> {
    if p.iter().all(|&b| b == 0xFF) {
        return Value::text("Not Present");
    }
    if p.iter().all(|&b| b == 0x00) {
        return Value::text("Not Settable");
    }
    let text = if ver >= SpecVersion::V2_6 {
        format!(
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            p[3], p[2], p[1], p[0], p[5], p[4], p[7], p[6],
            p[8], p[9], p[10], p[11], p[12], p[13], p[14], p[15]
        )
    } else {
        format!(
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            p[0], p[1], p[2], p[3], p[4], p[5], p[6], p[7],
            p[8], p[9], p[10], p[11], p[12], p[13], p[14], p[15]
        )
    };
    Value::text(text)
}

fn wake_up_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 9] = [
        "Reserved", // 0x00
        "Other",
        "Unknown",
        "APM Timer",
        "Modem Ring",
        "LAN Remote",
        "Power Switch",
        "PCI PME#",
        "AC Power Restored", // 0x08
    ];
    table_lookup(code, 0x00, &TYPES)
}

pub(super) fn system_information(rec: &Record<'_>, ver: SpecVersion, sink: &mut dyn Sink) {
    sink.name("System Information");
    if !rec.has(0x08) {
        return;
    }
    sink.attr("Manufacturer", rec.string(rec.u8_at(0x04)));
    sink.attr("Product Name", rec.string(rec.u8_at(0x05)));
    sink.attr("Version", rec.string(rec.u8_at(0x06)));
    sink.attr("Serial Number", rec.string(rec.u8_at(0x07)));
    if !rec.has(0x19) {
        return;
    }
    sink.attr("UUID", uuid_value(rec.bytes_at(0x08, 16), ver));
    sink.attr("Wake-up Type", wake_up_type(rec.u8_at(0x18)));
    if !rec.has(0x1B) {
        return;
    }
    sink.attr("SKU Number", rec.string(rec.u8_at(0x19)));
    sink.attr("Family", rec.string(rec.u8_at(0x1A)));
}

pub(super) fn oem_strings(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("OEM Strings");
    if !rec.has(0x05) {
        return;
    }
    let count = rec.u8_at(0x04);
    for i in 1..=count {
        sink.attr(&format!("String {i}"), rec.string(i));
    }
}

pub(super) fn system_configuration_options(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("System Configuration Options");
    if !rec.has(0x05) {
        return;
    }
    let count = rec.u8_at(0x04);
    for i in 1..=count {
        sink.attr(&format!("Option {i}"), rec.string(i));
    }
}

pub(super) fn group_associations(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Group Associations");
    if !rec.has(0x05) {
        return;
    }
    sink.attr("Name", rec.string(rec.u8_at(0x04)));
    let count = (usize::from(rec.length()) - 0x05) / 3;
    sink.list_start("Items", Some(Value::int(count as u64)));
    for i in 0..count {
        let ty = rec.u8_at(0x05 + 3 * i);
        let handle = rec.u16_at(0x05 + 3 * i + 1);
        sink.list_item(Value::text(format!(
            "0x{handle:04X} ({})",
            structure_type_name(ty)
        )));
    }
    sink.list_end();
}

fn event_log_method(code: u8) -> Value<'static> {
    static METHODS: [&str; 5] = [
        "Indexed I/O, one 8-bit index port, one 8-bit data port", // 0x00
        "Indexed I/O, two 8-bit index ports, one 8-bit data port",
        "Indexed I/O, one 16-bit index port, one 8-bit data port",
        "Memory-mapped physical 32-bit address",
        "General-purpose non-volatile data functions", // 0x04
    ];
    if code >= 0x80 {
        return Value::text("OEM-specific");
    }
    table_lookup(code, 0x00, &METHODS)
}

fn event_log_address(rec: &Record<'_>, method: u8, sink: &mut dyn Sink) {
    match method {
        0x00..=0x02 => sink.attr(
            "Access Address",
            Value::text(format!(
                "Index 0x{:04X}, Data 0x{:04X}",
                rec.u16_at(0x10),
                rec.u16_at(0x12)
            )),
        ),
        0x03 => sink.attr("Access Address", Value::hex32(rec.u32_at(0x10))),
        0x04 => sink.attr("Access Address", Value::hex16(rec.u16_at(0x10))),
        _ => sink.attr("Access Address", Value::UNKNOWN),
    }
}

fn event_log_header_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 2] = ["No Header", "Type 1"];
    if code >= 0x80 {
        return Value::text("OEM-specific");
    }
    table_lookup(code, 0x00, &TYPES)
}

fn event_log_descriptor_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 24] = [
        "", // 0x00, undefined
        "Single-bit ECC memory error",
        "Multi-bit ECC memory error",
        "Parity memory error",
        "Bus timeout",
        "I/O channel block",
        "Software NMI",
        "POST memory resize",
        "POST error",
        "PCI parity error",
        "PCI system error",
        "CPU failure",
        "EISA failsafe timer timeout",
        "Correctable memory log disabled",
        "Logging disabled",
        "", // 0x0F, undefined
        "System limit exceeded",
        "Asynchronous hardware timer expired",
        "System configuration information",
        "Hard disk information",
        "System reconfigured",
        "Uncorrectable CPU-complex error",
        "Log area reset/cleared",
        "System boot", // 0x17
    ];
    if usize::from(code) < TYPES.len() && !TYPES[usize::from(code)].is_empty() {
        return Value::text(TYPES[usize::from(code)]);
    }
    if (0x80..=0xFE).contains(&code) {
        return Value::text("OEM-specific");
    }
    if code == 0xFF {
        return Value::text("End of log");
    }
    Value::OUT_OF_SPEC
}

fn event_log_descriptor_format(code: u8) -> Value<'static> {
    static FORMATS: [&str; 7] = [
        "None", // 0x00
        "Handle",
        "Multiple-event",
        "Multiple-event handle",
        "POST results bitmap",
        "System management",
        "Multiple-event system management", // 0x06
    ];
    if code >= 0x80 {
        return Value::text("OEM-specific");
    }
    table_lookup(code, 0x00, &FORMATS)
}

pub(super) fn system_event_log(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("System Event Log");
    if !rec.has(0x14) {
        return;
    }
    sink.attr(
        "Area Length",
        Value::text(format!("{} bytes", rec.u16_at(0x04))),
    );
    sink.attr("Header Start Offset", Value::hex16(rec.u16_at(0x06)));
    let header_len = rec.u16_at(0x08).wrapping_sub(rec.u16_at(0x06));
    if header_len != 0 {
        let plural = if header_len > 1 { "s" } else { "" };
        sink.attr("Header Length", Value::text(format!("{header_len} byte{plural}")));
    }
    sink.attr("Data Start Offset", Value::hex16(rec.u16_at(0x08)));
    let method = rec.u8_at(0x0A);
    sink.attr("Access Method", event_log_method(method));
    event_log_address(rec, method, sink);
    let status = rec.u8_at(0x0B);
    sink.attr(
        "Status",
        Value::text(format!(
            "{}, {}",
            if status & 0x01 != 0 { "Valid" } else { "Invalid" },
            if status & 0x02 != 0 { "Full" } else { "Not Full" }
        )),
    );
    sink.attr("Change Token", Value::hex32(rec.u32_at(0x0C)));
    if !rec.has(0x17) {
        return;
    }
    sink.attr("Header Format", event_log_header_type(rec.u8_at(0x14)));
    let count = rec.u8_at(0x15);
    let desc_len = rec.u8_at(0x16);
    sink.attr("Supported Log Type Descriptors", Value::int(count));
    if !rec.has(0x17 + usize::from(count) * usize::from(desc_len)) {
        return;
    }
    if desc_len >= 0x02 {
        for i in 0..usize::from(count) {
            let off = 0x17 + i * usize::from(desc_len);
            sink.attr(
                &format!("Descriptor {}", i + 1),
                event_log_descriptor_type(rec.u8_at(off)),
            );
            sink.attr(
                &format!("Data Format {}", i + 1),
                event_log_descriptor_format(rec.u8_at(off + 1)),
            );
        }
    }
}

fn reset_boot_option(code: u8) -> Value<'static> {
    match code {
        0x1 => Value::text("Operating System"),
        0x2 => Value::text("System Utilities"),
        0x3 => Value::text("Do Not Reboot"),
        _ => Value::OUT_OF_SPEC,
    }
}

fn reset_count(sink: &mut dyn Sink, name: &str, code: u16) {
    if code == 0xFFFF {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::int(code));
    }
}

fn reset_timer(sink: &mut dyn Sink, name: &str, code: u16) {
    if code == 0xFFFF {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::text(format!("{code} min")));
    }
}

pub(super) fn system_reset(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("System Reset");
    if !rec.has(0x0D) {
        return;
    }
    let caps = rec.u8_at(0x04);
    sink.attr(
        "Status",
        Value::text(if caps & 0x01 != 0 { "Enabled" } else { "Disabled" }),
    );
    let watchdog = caps & (1 << 5) != 0;
    sink.attr(
        "Watchdog Timer",
        Value::text(if watchdog { "Present" } else { "Not Present" }),
    );
    if !watchdog {
        return;
    }
    sink.attr("Boot Option", reset_boot_option((caps >> 1) & 0x3));
    sink.attr("Boot Option On Limit", reset_boot_option((caps >> 3) & 0x3));
    reset_count(sink, "Reset Count", rec.u16_at(0x05));
    reset_count(sink, "Reset Limit", rec.u16_at(0x07));
    reset_timer(sink, "Timer Interval", rec.u16_at(0x09));
    reset_timer(sink, "Timeout", rec.u16_at(0x0B));
}

fn hardware_security_status(code: u8) -> &'static str {
    match code {
        0x00 => "Disabled",
        0x01 => "Enabled",
        0x02 => "Not Implemented",
        _ => "Unknown",
    }
}

pub(super) fn hardware_security(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Hardware Security");
    if !rec.has(0x05) {
        return;
    }
    let code = rec.u8_at(0x04);
    sink.attr(
        "Power-On Password Status",
        Value::text(hardware_security_status(code >> 6)),
    );
    sink.attr(
        "Keyboard Password Status",
        Value::text(hardware_security_status((code >> 4) & 0x3)),
    );
    sink.attr(
        "Administrator Password Status",
        Value::text(hardware_security_status((code >> 2) & 0x3)),
    );
    sink.attr(
        "Front Panel Reset Status",
        Value::text(hardware_security_status(code & 0x3)),
    );
}

fn bcd_in_range(value: u8, low: u8, high: u8) -> bool {
    if value > 0x99 || value & 0x0F > 0x09 {
        return false;
    }
    (low..=high).contains(&value)
}

pub(super) fn system_power_controls(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("System Power Controls");
    if !rec.has(0x09) {
        return;
    }
    // BCD-encoded month/day/hour/minute/second; out-of-range components
    // render as a wildcard.
    let mut time = String::new();
    let fields = [
        ("", 0x04, 0x01, 0x12),
        ("-", 0x05, 0x01, 0x31),
        (" ", 0x06, 0x00, 0x23),
        (":", 0x07, 0x00, 0x59),
        (":", 0x08, 0x00, 0x59),
    ];
    for (sep, off, low, high) in fields {
        time.push_str(sep);
        let value = rec.u8_at(off);
        if bcd_in_range(value, low, high) {
            time.push_str(&format!("{value:02X}"));
        } else {
            time.push('*');
        }
    }
    sink.attr("Next Scheduled Power-on", Value::text(time));
}

pub(super) fn out_of_band_remote_access(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Out-of-band Remote Access");
    if !rec.has(0x06) {
        return;
    }
    sink.attr("Manufacturer Name", rec.string(rec.u8_at(0x04)));
    let conn = rec.u8_at(0x05);
    sink.attr(
        "Inbound Connection",
        Value::text(if conn & 0x01 != 0 { "Enabled" } else { "Disabled" }),
    );
    sink.attr(
        "Outbound Connection",
        Value::text(if conn & 0x02 != 0 { "Enabled" } else { "Disabled" }),
    );
}

pub(super) fn boot_integrity_services(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Boot Integrity Services Entry Point");
    if !rec.has(0x1C) {
        return;
    }
    sink.attr(
        "Checksum",
        Value::text(if checksum_ok(&rec.data()[..usize::from(rec.length())]) {
            "OK"
        } else {
            "Invalid"
        }),
    );
    let entry16 = rec.u32_at(0x08);
    sink.attr(
        "16-bit Entry Point Address",
        Value::text(format!("{:04X}:{:04X}", entry16 >> 16, entry16 & 0xFFFF)),
    );
    sink.attr("32-bit Entry Point Address", Value::hex32(rec.u32_at(0x0C)));
}

fn boot_status(code: u8) -> Value<'static> {
    static STATUS: [&str; 9] = [
        "No errors detected", // 0
        "No bootable media",
        "Operating system failed to load",
        "Firmware-detected hardware failure",
        "Operating system-detected hardware failure",
        "User-requested boot",
        "System security violation",
        "Previously-requested image",
        "System watchdog timer expired", // 8
    ];
    if usize::from(code) < STATUS.len() {
        return Value::text(STATUS[usize::from(code)]);
    }
    if (128..=191).contains(&code) {
        return Value::text("OEM-specific");
    }
    if code >= 192 {
        return Value::text("Product-specific");
    }
    Value::OUT_OF_SPEC
}

pub(super) fn system_boot(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("System Boot Information");
    if !rec.has(0x0B) {
        return;
    }
    sink.attr("Status", boot_status(rec.u8_at(0x0A)));
}

pub(super) fn additional_information(rec: &Record<'_>, sink: &mut dyn Sink) {
    let count = rec.u8_at(0x04);
    let mut offset = 0x05usize;
    for i in 0..count {
        sink.name(&format!("Additional Information {}", i + 1));
        // Every entry is length-prefixed; a short or overrunning entry ends
        // the list.
        if !rec.has(offset + 1) {
            break;
        }
        let entry_len = usize::from(rec.u8_at(offset));
        if entry_len < 0x05 || !rec.has(offset + entry_len) {
            break;
        }
        sink.attr(
            "Referenced Handle",
            Value::text(format!("0x{:04x}", rec.u16_at(offset + 0x01))),
        );
        sink.attr(
            "Referenced Offset",
            Value::text(format!("0x{:02x}", rec.u8_at(offset + 0x03))),
        );
        sink.attr("String", rec.string(rec.u8_at(offset + 0x04)));
        match entry_len - 0x05 {
            1 => sink.attr(
                "Value",
                Value::text(format!("0x{:02x}", rec.u8_at(offset + 0x05))),
            ),
            2 => sink.attr(
                "Value",
                Value::text(format!("0x{:04x}", rec.u16_at(offset + 0x05))),
            ),
            4 => sink.attr(
                "Value",
                Value::text(format!("0x{:08x}", rec.u32_at(offset + 0x05))),
            ),
            _ => sink.attr("Value", Value::text("Unexpected size")),
        }
        offset += entry_len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_UUID: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
        0xFF,
    ];

    #[test]
    fn uuid_sentinels() {
        assert_eq!(
            uuid_value(&[0xFF; 16], SpecVersion::V2_6),
            Value::text("Not Present")
        );
        assert_eq!(
            uuid_value(&[0x00; 16], SpecVersion::V2_6),
            Value::text("Not Settable")
        );
    }

    #[test]
    fn uuid_byte_order_flips_at_2_6() {
        assert_eq!(
            uuid_value(&SAMPLE_UUID, SpecVersion::V2_0),
            Value::text("00112233-4455-6677-8899-aabbccddeeff")
        );
        assert_eq!(
            uuid_value(&SAMPLE_UUID, SpecVersion::new(3, 0, 0)),
            Value::text("33221100-5544-7766-8899-aabbccddeeff")
        );
    }

    #[test]
    fn boot_status_ranges() {
        assert_eq!(boot_status(0), Value::text("No errors detected"));
        assert_eq!(boot_status(130), Value::text("OEM-specific"));
        assert_eq!(boot_status(200), Value::text("Product-specific"));
        assert_eq!(boot_status(42), Value::OUT_OF_SPEC);
    }

    #[test]
    fn bcd_range_validation() {
        assert!(bcd_in_range(0x31, 0x01, 0x31));
        assert!(!bcd_in_range(0x3A, 0x01, 0x31)); // low nibble not BCD
        assert!(!bcd_in_range(0x32, 0x01, 0x31)); // past the limit
    }
}
