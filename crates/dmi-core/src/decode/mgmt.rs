//! Management interfaces: IPMI Device Information (type 38), Management
//! Controller Host Interface (type 42) and TPM Device (type 43).
//!
//! Type 42 is the one record with nested structure: an interface-specific
//! data block followed by a count-prefixed list of variable-length protocol
//! records, every one of which has to be bounds-checked against the outer
//! record before decoding.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::report::{Sink, Value};
use crate::table::Record;
use crate::version::SpecVersion;

use super::system::uuid_value;
use super::table_lookup;

fn ipmi_interface_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 5] = [
        "Unknown", // 0x00
        "KCS (Keyboard Control Style)",
        "SMIC (Server Management Interface Chip)",
        "BT (Block Transfer)",
        "SSIF (SMBus System Interface)", // 0x04
    ];
    table_lookup(code, 0x00, &TYPES)
}

fn ipmi_register_spacing(code: u8) -> Value<'static> {
    match code {
        0x00 => Value::text("Successive Byte Boundaries"),
        0x01 => Value::text("32-bit Boundaries"),
        0x02 => Value::text("16-byte Boundaries"),
        _ => Value::OUT_OF_SPEC,
    }
}

fn ipmi_base_address(rec: &Record<'_>, interface: u8, lsb: u8, sink: &mut dyn Sink) {
    if interface == 0x04 {
        // SSIF: the address is an SMBus slave address.
        sink.attr(
            "Base Address",
            Value::text(format!("0x{:02X} (SMBus)", rec.u8_at(0x08) >> 1)),
        );
    } else {
        let address = rec.u64_at(0x08);
        let low = (address as u32 & !1) | u32::from(lsb);
        sink.attr(
            "Base Address",
            Value::text(format!(
                "0x{:08X}{:08X} ({})",
                address >> 32,
                low,
                if address & 1 != 0 { "I/O" } else { "Memory-mapped" }
            )),
        );
    }
}

pub(super) fn ipmi_device(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("IPMI Device Information");
    if !rec.has(0x10) {
        return;
    }
    let interface = rec.u8_at(0x04);
    sink.attr("Interface Type", ipmi_interface_type(interface));
    sink.attr(
        "Specification Version",
        Value::text(format!("{}.{}", rec.u8_at(0x05) >> 4, rec.u8_at(0x05) & 0x0F)),
    );
    sink.attr(
        "I2C Slave Address",
        Value::text(format!("0x{:02x}", rec.u8_at(0x06) >> 1)),
    );
    if rec.u8_at(0x07) != 0xFF {
        sink.attr("NV Storage Device Address", Value::int(rec.u8_at(0x07)));
    } else {
        sink.attr("NV Storage Device", Value::text("Not Present"));
    }
    let lsb = if rec.has(0x11) {
        (rec.u8_at(0x10) >> 4) & 1
    } else {
        0
    };
    ipmi_base_address(rec, interface, lsb, sink);
    if !rec.has(0x12) {
        return;
    }
    if interface != 0x04 {
        sink.attr("Register Spacing", ipmi_register_spacing(rec.u8_at(0x10) >> 6));
        if rec.u8_at(0x10) & (1 << 3) != 0 {
            sink.attr(
                "Interrupt Polarity",
                Value::text(if rec.u8_at(0x10) & (1 << 1) != 0 {
                    "Active High"
                } else {
                    "Active Low"
                }),
            );
            sink.attr(
                "Interrupt Trigger Mode",
                Value::text(if rec.u8_at(0x10) & (1 << 0) != 0 {
                    "Level"
                } else {
                    "Edge"
                }),
            );
        }
    }
    if rec.u8_at(0x11) != 0x00 {
        sink.attr("Interrupt Number", Value::int(rec.u8_at(0x11)));
    }
}

fn host_interface_type(code: u8) -> Value<'static> {
    static UARTS: [&str; 7] = [
        "KCS: Keyboard Controller Style", // 0x02
        "8250 UART Register Compatible",
        "16450 UART Register Compatible",
        "16550/16550A UART Register Compatible",
        "16650/16650A UART Register Compatible",
        "16750/16750A UART Register Compatible",
        "16850/16850A UART Register Compatible", // 0x08
    ];
    if (0x02..=0x08).contains(&code) {
        return Value::text(UARTS[usize::from(code - 0x02)]);
    }
    if code <= 0x3F {
        return Value::text("MCTP");
    }
    if code == 0x40 {
        return Value::text("Network");
    }
    if code == 0xF0 {
        return Value::text("OEM");
    }
    Value::OUT_OF_SPEC
}

fn protocol_record_type(code: u8) -> Value<'static> {
    match code {
        0x0 | 0x1 => Value::text("Reserved"),
        0x2 => Value::text("IPMI"),
        0x3 => Value::text("MCTP"),
        0x4 => Value::text("Redfish over IP"),
        0xF0 => Value::text("OEM"),
        _ => Value::OUT_OF_SPEC,
    }
}

fn ip_assignment_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 5] = [
        "Unknown", // 0x0
        "Static",
        "DHCP",
        "AutoConf",
        "Host Selected", // 0x4
    ];
    table_lookup(code, 0x00, &TYPES)
}

fn ip_address_format(code: u8) -> &'static str {
    match code {
        0x1 => "IPv4",
        0x2 => "IPv6",
        0x0 => "Unknown",
        _ => "<OUT OF SPEC>",
    }
}

fn ip_address_text(data: &[u8], format: u8) -> String {
    match format {
        0x1 => Ipv4Addr::new(data[0], data[1], data[2], data[3]).to_string(),
        0x2 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&data[..16]);
            Ipv6Addr::from(octets).to_string()
        }
        _ => "<OUT OF SPEC>".to_string(),
    }
}

/// Redfish-over-IP protocol record body (DSP0270 8.6). `rdata` is already
/// bounds-checked to at least 91 bytes by the caller.
fn redfish_protocol_record(rdata: &[u8], sink: &mut dyn Sink) {
    // The UUID field postdates 2.6, so it is always little-endian.
    sink.subattr("Service UUID", uuid_value(&rdata[0..16], SpecVersion::V3_1));

    let assignment = rdata[16];
    sink.subattr("Host IP Assignment Type", ip_assignment_type(assignment));
    let format = rdata[17];
    let format_name = ip_address_format(format);
    sink.subattr("Host IP Address Format", Value::text(format_name));

    // Address and mask only mean anything for static and autoconf
    // assignment.
    if assignment == 0x1 || assignment == 0x3 {
        sink.subattr(
            &format!("{format_name} Address"),
            Value::text(ip_address_text(&rdata[18..34], format)),
        );
        sink.subattr(
            &format!("{format_name} Mask"),
            Value::text(ip_address_text(&rdata[34..50], format)),
        );
    }

    let discovery = rdata[50];
    sink.subattr(
        "Redfish Service IP Discovery Type",
        ip_assignment_type(discovery),
    );
    let format = rdata[51];
    let format_name = ip_address_format(format);
    sink.subattr("Redfish Service IP Address Format", Value::text(format_name));

    if discovery == 0x1 || discovery == 0x3 {
        sink.subattr(
            &format!("{format_name} Redfish Service Address"),
            Value::text(ip_address_text(&rdata[52..68], format)),
        );
        sink.subattr(
            &format!("{format_name} Redfish Service Mask"),
            Value::text(ip_address_text(&rdata[68..84], format)),
        );
        sink.subattr(
            "Redfish Service Port",
            Value::int(u16::from_le_bytes([rdata[84], rdata[85]])),
        );
        sink.subattr(
            "Redfish Service Vlan",
            Value::int(u32::from_le_bytes([rdata[86], rdata[87], rdata[88], rdata[89]])),
        );
    }

    let host_len = usize::from(rdata[90]);
    // The hostname cannot extend past the protocol record.
    if 91 + host_len > rdata.len() {
        sink.subattr("Redfish Service Hostname", Value::OUT_OF_SPEC);
    } else {
        sink.subattr(
            "Redfish Service Hostname",
            Value::Text(crate::table::filter_ascii(&rdata[91..91 + host_len])),
        );
    }
}

fn protocol_record(record: &[u8], sink: &mut dyn Sink) {
    let id = record[0];
    let len = usize::from(record[1]);
    sink.attr(
        "Protocol ID",
        Value::text(format!("{id:02x} ({})", protocol_record_type(id))),
    );
    // Only Redfish over IP gets a field-level decode.
    if id != 0x4 {
        return;
    }
    // A Redfish record body is at least 91 bytes.
    if len < 91 {
        return;
    }
    redfish_protocol_record(&record[2..2 + len], sink);
}

fn network_device(rec: &Record<'_>, data_len: usize, sink: &mut dyn Sink) {
    let device_type = rec.u8_at(0x06);
    let label = match device_type {
        0x2 => Value::text("USB"),
        0x3 => Value::text("PCI/PCIe"),
        _ if device_type >= 0x80 => Value::text("OEM"),
        _ => Value::OUT_OF_SPEC,
    };
    sink.attr("Device Type", label);
    if device_type == 0x2 && data_len >= 5 {
        sink.attr(
            "idVendor",
            Value::text(format!("0x{:04x}", rec.u16_at(0x07))),
        );
        sink.attr(
            "idProduct",
            Value::text(format!("0x{:04x}", rec.u16_at(0x09))),
        );
    } else if device_type == 0x3 && data_len >= 9 {
        sink.attr("VendorID", Value::text(format!("0x{:04x}", rec.u16_at(0x07))));
        sink.attr("DeviceID", Value::text(format!("0x{:04x}", rec.u16_at(0x09))));
        sink.attr(
            "SubVendorID",
            Value::text(format!("0x{:04x}", rec.u16_at(0x0B))),
        );
        sink.attr(
            "SubDeviceID",
            Value::text(format!("0x{:04x}", rec.u16_at(0x0D))),
        );
    } else if device_type == 0x4 && data_len >= 5 {
        sink.attr(
            "Vendor ID",
            Value::text(format!(
                "0x{:02x}:0x{:02x}:0x{:02x}:0x{:02x}",
                rec.u8_at(0x07),
                rec.u8_at(0x08),
                rec.u8_at(0x09),
                rec.u8_at(0x0A)
            )),
        );
    }
}

/// SMBIOS 3.2+ layout: interface-specific block, then a count-prefixed list
/// of protocol records, each bounds-checked against the outer record. A
/// sub-record overrun aborts this record's parsing only.
fn controller_structure(rec: &Record<'_>, sink: &mut dyn Sink) {
    if !rec.has(0x0B) {
        return;
    }
    let length = usize::from(rec.length());
    let data_len = usize::from(rec.u8_at(0x05));
    let mut consumed = 0x06 + data_len;
    if consumed > length {
        return;
    }

    let interface = rec.u8_at(0x04);
    sink.attr("Host Interface Type", host_interface_type(interface));

    // Only the Network interface type has a defined device block and
    // protocol record list.
    if interface != 0x40 {
        return;
    }
    if data_len != 0 {
        network_device(rec, data_len, sink);
    }

    // The protocol record count byte sits right after the device block.
    let count_offset = consumed;
    consumed += 1;
    if consumed > length {
        sink.diagnostic(&format!(
            "Total read length {consumed} exceeds total structure length {length} (handle 0x{:04x})",
            rec.handle()
        ));
        return;
    }
    let count = usize::from(rec.u8_at(count_offset));
    let mut offset = count_offset + 1;
    for i in 0..count {
        // Two leading bytes (id, length) plus the declared body.
        if offset + 2 > length {
            sink.diagnostic(&format!(
                "Total read length {} exceeds total structure length {length} (handle 0x{:04x}, record {})",
                offset + 2,
                rec.handle(),
                i + 1
            ));
            return;
        }
        let body_len = usize::from(rec.u8_at(offset + 1));
        consumed = offset + 2 + body_len;
        if consumed > length {
            sink.diagnostic(&format!(
                "Total read length {consumed} exceeds total structure length {length} (handle 0x{:04x}, record {})",
                rec.handle(),
                i + 1
            ));
            return;
        }
        protocol_record(rec.bytes_at(offset, 2 + body_len), sink);
        offset += 2 + body_len;
    }
}

pub(super) fn management_controller_host_interface(
    rec: &Record<'_>,
    ver: SpecVersion,
    sink: &mut dyn Sink,
) {
    sink.name("Management Controller Host Interface");
    if ver < SpecVersion::V3_2 {
        // Pre-3.2 layout has a type-dependent variable-length middle with no
        // length specifier; only the leading type (and the OEM vendor ID)
        // can be decoded safely.
        if !rec.has(0x05) {
            return;
        }
        sink.attr("Interface Type", host_interface_type(rec.u8_at(0x04)));
        if !rec.has(0x09) {
            return;
        }
        if rec.u8_at(0x04) == 0xF0 {
            sink.attr(
                "Vendor ID",
                Value::text(format!(
                    "0x{:02X}{:02X}{:02X}{:02X}",
                    rec.u8_at(0x05),
                    rec.u8_at(0x06),
                    rec.u8_at(0x07),
                    rec.u8_at(0x08)
                )),
            );
        }
    } else {
        controller_structure(rec, sink);
    }
}

fn tpm_vendor_id(sink: &mut dyn Sink, id: &[u8]) {
    let mut vendor = String::new();
    for &b in id.iter().take(4) {
        if b == 0 {
            break;
        }
        vendor.push(if (32..127).contains(&b) { b as char } else { '.' });
    }
    sink.attr("Vendor ID", Value::text(vendor));
}

fn tpm_characteristics(sink: &mut dyn Sink, code: u64) {
    static CHARACTERISTICS: [&str; 3] = [
        "Family configurable via firmware update", // 3
        "Family configurable via platform software support",
        "Family configurable via OEM proprietary mechanism", // 5
    ];
    if code & (1 << 2) != 0 {
        sink.list_item(Value::text("TPM Device characteristics not supported"));
        return;
    }
    for (i, label) in CHARACTERISTICS.iter().enumerate() {
        if code & (1 << (i + 3)) != 0 {
            sink.list_item(Value::text(*label));
        }
    }
}

pub(super) fn tpm_device(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("TPM Device");
    if !rec.has(0x1B) {
        return;
    }
    tpm_vendor_id(sink, rec.bytes_at(0x04, 4));
    let major = rec.u8_at(0x08);
    sink.attr(
        "Specification Version",
        Value::text(format!("{}.{}", major, rec.u8_at(0x09))),
    );
    match major {
        0x01 => {
            // The first two firmware bytes repeat the spec version.
            sink.attr(
                "Firmware Revision",
                Value::text(format!("{}.{}", rec.u8_at(0x0C), rec.u8_at(0x0D))),
            );
        }
        0x02 => {
            let fw = rec.u32_at(0x0A);
            sink.attr(
                "Firmware Revision",
                Value::text(format!("{}.{}", fw >> 16, fw & 0xFFFF)),
            );
        }
        _ => {}
    }
    sink.attr("Description", rec.string(rec.u8_at(0x12)));
    sink.list_start("Characteristics", None);
    tpm_characteristics(sink, rec.u64_at(0x13));
    sink.list_end();
    if !rec.has(0x1F) {
        return;
    }
    sink.attr("OEM-specific Information", Value::hex32(rec.u32_at(0x1B)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TextSink;
    use crate::table::Walker;

    #[test]
    fn host_interface_type_ranges() {
        assert_eq!(host_interface_type(0x02), Value::text("KCS: Keyboard Controller Style"));
        assert_eq!(host_interface_type(0x20), Value::text("MCTP"));
        assert_eq!(host_interface_type(0x40), Value::text("Network"));
        assert_eq!(host_interface_type(0xF0), Value::text("OEM"));
        assert_eq!(host_interface_type(0x80), Value::OUT_OF_SPEC);
    }

    #[test]
    fn ip_addresses_format_both_families() {
        assert_eq!(
            ip_address_text(&[192, 168, 1, 10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], 0x1),
            "192.168.1.10"
        );
        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(ip_address_text(&v6, 0x2), "::1");
    }

    #[test]
    fn overrunning_protocol_record_aborts_with_diagnostic() {
        // Network interface, no device data, one protocol record claiming a
        // 200-byte body inside a much shorter structure.
        let formatted = [0x40u8, 0x00, 0x01, 0x04, 200, 0, 0];
        let mut buf = vec![42u8, (4 + formatted.len()) as u8, 0x34, 0x12];
        buf.extend_from_slice(&formatted);
        buf.extend_from_slice(&[0, 0]);
        let mut walker = Walker::new(&buf, 0, false);
        let rec = walker.next_record().expect("record should parse");

        let mut sink = TextSink::new(Vec::new());
        management_controller_host_interface(&rec, SpecVersion::V3_2, &mut sink);
        let out = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert!(out.contains("Host Interface Type: Network"), "{out}");
        assert!(
            out.contains("exceeds total structure length 11 (handle 0x1234, record 1)"),
            "{out}"
        );
    }
}
