//! Memory records: Memory Controller (5), Memory Module (6), Physical
//! Memory Array (16), Memory Device (17), 32/64-bit Memory Error (18/33),
//! Memory Array/Device Mapped Address (19/20) and Memory Channel (37).

use crate::report::{Sink, Value};
use crate::table::Record;

use super::processor::voltage;
use super::size::attr_size;
use super::table_lookup;

fn controller_ed_method(code: u8) -> Value<'static> {
    static METHODS: [&str; 8] = [
        "Other", // 0x01
        "Unknown",
        "None",
        "8-bit Parity",
        "32-bit ECC",
        "64-bit ECC",
        "128-bit ECC",
        "CRC", // 0x08
    ];
    table_lookup(code, 0x01, &METHODS)
}

fn controller_ec_capabilities(sink: &mut dyn Sink, name: &str, code: u8) {
    static CAPABILITIES: [&str; 6] = [
        "Other", // 0
        "Unknown",
        "None",
        "Single-bit Error Correcting",
        "Double-bit Error Correcting",
        "Error Scrubbing", // 5
    ];
    if code & 0x3F == 0 {
        sink.attr(name, Value::NONE);
    } else {
        sink.list_start(name, None);
        for (i, label) in CAPABILITIES.iter().enumerate() {
            if code & (1 << i) != 0 {
                sink.list_item(Value::text(*label));
            }
        }
        sink.list_end();
    }
}

fn controller_interleave(code: u8) -> Value<'static> {
    static INTERLEAVE: [&str; 7] = [
        "Other", // 0x01
        "Unknown",
        "One-way Interleave",
        "Two-way Interleave",
        "Four-way Interleave",
        "Eight-way Interleave",
        "Sixteen-way Interleave", // 0x07
    ];
    table_lookup(code, 0x01, &INTERLEAVE)
}

fn controller_speeds(sink: &mut dyn Sink, name: &str, code: u16) {
    static SPEEDS: [&str; 5] = [
        "Other", // 0
        "Unknown",
        "70 ns",
        "60 ns",
        "50 ns", // 4
    ];
    if code & 0x001F == 0 {
        sink.attr(name, Value::NONE);
    } else {
        sink.list_start(name, None);
        for (i, label) in SPEEDS.iter().enumerate() {
            if code & (1 << i) != 0 {
                sink.list_item(Value::text(*label));
            }
        }
        sink.list_end();
    }
}

static MODULE_TYPES: [&str; 11] = [
    "Other", // 0
    "Unknown",
    "Standard",
    "FPM",
    "EDO",
    "Parity",
    "ECC",
    "SIMM",
    "DIMM",
    "Burst EDO",
    "SDRAM", // 10
];

fn module_type_labels(code: u16) -> Vec<&'static str> {
    MODULE_TYPES
        .iter()
        .enumerate()
        .filter(|(i, _)| code & (1 << i) != 0)
        .map(|(_, &s)| s)
        .collect()
}

fn module_types_list(sink: &mut dyn Sink, name: &str, code: u16) {
    if code & 0x07FF == 0 {
        sink.attr(name, Value::NONE);
    } else {
        sink.list_start(name, None);
        for label in module_type_labels(code) {
            sink.list_item(Value::text(label));
        }
        sink.list_end();
    }
}

fn module_types_flat(sink: &mut dyn Sink, name: &str, code: u16) {
    if code & 0x07FF == 0 {
        sink.attr(name, Value::NONE);
    } else {
        sink.attr(name, Value::Flags(module_type_labels(code)));
    }
}

pub(super) fn memory_controller(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Memory Controller Information");
    if !rec.has(0x0F) {
        return;
    }
    sink.attr("Error Detecting Method", controller_ed_method(rec.u8_at(0x04)));
    controller_ec_capabilities(sink, "Error Correcting Capabilities", rec.u8_at(0x05));
    sink.attr("Supported Interleave", controller_interleave(rec.u8_at(0x06)));
    sink.attr("Current Interleave", controller_interleave(rec.u8_at(0x07)));
    // The exponent is firmware-supplied and can nominally reach 255.
    let module_size = 1u128.checked_shl(u32::from(rec.u8_at(0x08))).unwrap_or(0);
    sink.attr(
        "Maximum Memory Module Size",
        Value::text(format!("{module_size} MB")),
    );
    sink.attr(
        "Maximum Total Memory Size",
        Value::text(format!("{} MB", u128::from(rec.u8_at(0x0E)) * module_size)),
    );
    controller_speeds(sink, "Supported Speeds", rec.u16_at(0x09));
    module_types_list(sink, "Supported Memory Types", rec.u16_at(0x0B));
    voltage(rec.u8_at(0x0D), sink, "Memory Module Voltage");
    let count = usize::from(rec.u8_at(0x0E));
    if !rec.has(0x0F + count * 2) {
        return;
    }
    sink.list_start("Associated Memory Slots", Some(Value::int(count as u64)));
    for i in 0..count {
        sink.list_item(Value::hex16(rec.u16_at(0x0F + 2 * i)));
    }
    sink.list_end();
    if !rec.has(0x10 + count * 2) {
        return;
    }
    controller_ec_capabilities(
        sink,
        "Enabled Error Correcting Capabilities",
        rec.u8_at(0x0F + count * 2),
    );
}

fn module_connections(sink: &mut dyn Sink, code: u8) {
    if code == 0xFF {
        sink.attr("Bank Connections", Value::NONE);
    } else if code & 0xF0 == 0xF0 {
        sink.attr("Bank Connections", Value::int(code & 0x0F));
    } else if code & 0x0F == 0x0F {
        sink.attr("Bank Connections", Value::int(code >> 4));
    } else {
        sink.attr(
            "Bank Connections",
            Value::text(format!("{} {}", code >> 4, code & 0x0F)),
        );
    }
}

fn module_speed(sink: &mut dyn Sink, name: &str, code: u8) {
    if code == 0 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::text(format!("{code} ns")));
    }
}

fn module_size(sink: &mut dyn Sink, name: &str, code: u8) {
    let connection = if code & 0x80 != 0 {
        " (Double-bank Connection)"
    } else {
        " (Single-bank Connection)"
    };
    match code & 0x7F {
        0x7D => sink.attr(name, Value::text(format!("Not Determinable{connection}"))),
        0x7E => sink.attr(name, Value::text(format!("Disabled{connection}"))),
        0x7F => sink.attr(name, Value::text("Not Installed")),
        // The size is a power-of-two exponent, up to 2^124 MB on paper.
        exp => sink.attr(name, Value::text(format!("{} MB{connection}", 1u128 << exp))),
    }
}

fn module_error(sink: &mut dyn Sink, code: u8) {
    if code & (1 << 2) != 0 {
        sink.attr("Error Status", Value::text("See Event Log"));
    } else {
        let status = match code & 0x03 {
            0x00 => "OK",
            0x01 => "Uncorrectable Errors",
            0x02 => "Correctable Errors",
            _ => "Correctable and Uncorrectable Errors",
        };
        sink.attr("Error Status", Value::text(status));
    }
}

pub(super) fn memory_module(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Memory Module Information");
    if !rec.has(0x0C) {
        return;
    }
    sink.attr("Socket Designation", rec.string(rec.u8_at(0x04)));
    module_connections(sink, rec.u8_at(0x05));
    module_speed(sink, "Current Speed", rec.u8_at(0x06));
    module_types_flat(sink, "Type", rec.u16_at(0x07));
    module_size(sink, "Installed Size", rec.u8_at(0x09));
    module_size(sink, "Enabled Size", rec.u8_at(0x0A));
    module_error(sink, rec.u8_at(0x0B));
}

fn array_location(code: u8) -> Value<'static> {
    static LOCATIONS: [&str; 10] = [
        "Other", // 0x01
        "Unknown",
        "System Board Or Motherboard",
        "ISA Add-on Card",
        "EISA Add-on Card",
        "PCI Add-on Card",
        "MCA Add-on Card",
        "PCMCIA Add-on Card",
        "Proprietary Add-on Card",
        "NuBus", // 0x0A
    ];
    static LOCATIONS_A0: [&str; 5] = [
        "PC-98/C20 Add-on Card", // 0xA0
        "PC-98/C24 Add-on Card",
        "PC-98/E Add-on Card",
        "PC-98/Local Bus Add-on Card",
        "CXL Flexbus 1.0", // 0xA4
    ];
    if (0xA0..=0xA4).contains(&code) {
        return Value::text(LOCATIONS_A0[usize::from(code - 0xA0)]);
    }
    table_lookup(code, 0x01, &LOCATIONS)
}

fn array_use(code: u8) -> Value<'static> {
    static USES: [&str; 7] = [
        "Other", // 0x01
        "Unknown",
        "System Memory",
        "Video Memory",
        "Flash Memory",
        "Non-volatile RAM",
        "Cache Memory", // 0x07
    ];
    table_lookup(code, 0x01, &USES)
}

fn array_ec_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 7] = [
        "Other", // 0x01
        "Unknown",
        "None",
        "Parity",
        "Single-bit ECC",
        "Multi-bit ECC",
        "CRC", // 0x07
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn array_error_handle(sink: &mut dyn Sink, code: u16) {
    match code {
        0xFFFE => sink.attr("Error Information Handle", Value::text("Not Provided")),
        0xFFFF => sink.attr("Error Information Handle", Value::text("No Error")),
        _ => sink.attr("Error Information Handle", Value::hex16(code)),
    }
}

pub(super) fn physical_memory_array(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Physical Memory Array");
    if !rec.has(0x0F) {
        return;
    }
    sink.attr("Location", array_location(rec.u8_at(0x04)));
    sink.attr("Use", array_use(rec.u8_at(0x05)));
    sink.attr("Error Correction Type", array_ec_type(rec.u8_at(0x06)));
    let capacity = rec.u32_at(0x07);
    if capacity == 0x8000_0000 {
        // Overflow marker; the 64-bit extended capacity (byte units) holds
        // the real value when the record is long enough.
        if !rec.has(0x17) {
            sink.attr("Maximum Capacity", Value::UNKNOWN);
        } else {
            attr_size(sink, "Maximum Capacity", rec.u64_at(0x0F), 0);
        }
    } else {
        attr_size(sink, "Maximum Capacity", u64::from(capacity), 1);
    }
    if !quiet {
        array_error_handle(sink, rec.u16_at(0x0B));
    }
    sink.attr("Number Of Devices", Value::int(rec.u16_at(0x0D)));
}

fn device_width(sink: &mut dyn Sink, name: &str, code: u16) {
    // Width may read 0 when no module is installed.
    if code == 0xFFFF || code == 0 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::text(format!("{code} bits")));
    }
}

fn device_size(sink: &mut dyn Sink, code: u16) {
    if code == 0 {
        sink.attr("Size", Value::text("No Module Installed"));
    } else if code == 0xFFFF {
        sink.attr("Size", Value::UNKNOWN);
    } else {
        // Bit 15 selects kB units; otherwise the value counts MB.
        let (value, shift) = if code & 0x8000 != 0 {
            (u64::from(code & 0x7FFF), 1)
        } else {
            (u64::from(code & 0x7FFF) << 10, 1)
        };
        attr_size(sink, "Size", value, shift);
    }
}

fn device_extended_size(sink: &mut dyn Sink, code: u32) {
    let code = code & 0x7FFF_FFFF;
    // Use the greatest unit that renders without rounding.
    if code & 0x3FF != 0 {
        sink.attr("Size", Value::text(format!("{code} MB")));
    } else if code & 0xF_FC00 != 0 {
        sink.attr("Size", Value::text(format!("{} GB", code >> 10)));
    } else {
        sink.attr("Size", Value::text(format!("{} TB", code >> 20)));
    }
}

fn device_voltage(sink: &mut dyn Sink, name: &str, code: u16) {
    if code == 0 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        let volts = f64::from(code) / 1000.0;
        if code % 100 != 0 {
            // Trim trailing zeros for odd millivolt values.
            sink.attr(name, Value::text(format!("{volts} V")));
        } else {
            sink.attr(
                name,
                Value::Float {
                    value: volts,
                    places: 1,
                    unit: "V",
                },
            );
        }
    }
}

fn device_form_factor(code: u8) -> Value<'static> {
    static FORM_FACTORS: [&str; 16] = [
        "Other", // 0x01
        "Unknown",
        "SIMM",
        "SIP",
        "Chip",
        "DIP",
        "ZIP",
        "Proprietary Card",
        "DIMM",
        "TSOP",
        "Row Of Chips",
        "RIMM",
        "SODIMM",
        "SRIMM",
        "FB-DIMM",
        "Die", // 0x10
    ];
    table_lookup(code, 0x01, &FORM_FACTORS)
}

fn device_set(sink: &mut dyn Sink, code: u8) {
    match code {
        0 => sink.attr("Set", Value::NONE),
        0xFF => sink.attr("Set", Value::UNKNOWN),
        _ => sink.attr("Set", Value::int(code)),
    }
}

fn device_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 35] = [
        "Other", // 0x01
        "Unknown",
        "DRAM",
        "EDRAM",
        "VRAM",
        "SRAM",
        "RAM",
        "ROM",
        "Flash",
        "EEPROM",
        "FEPROM",
        "EPROM",
        "CDRAM",
        "3DRAM",
        "SDRAM",
        "SGRAM",
        "RDRAM",
        "DDR",
        "DDR2",
        "DDR2 FB-DIMM",
        "Reserved",
        "Reserved",
        "Reserved",
        "DDR3",
        "FBD2",
        "DDR4",
        "LPDDR",
        "LPDDR2",
        "LPDDR3",
        "LPDDR4",
        "Logical non-volatile device",
        "HBM",
        "HBM2",
        "DDR5",
        "LPDDR5", // 0x23
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn device_type_detail(sink: &mut dyn Sink, code: u16) {
    static DETAILS: [&str; 15] = [
        "Other", // 1
        "Unknown",
        "Fast-paged",
        "Static Column",
        "Pseudo-static",
        "RAMBus",
        "Synchronous",
        "CMOS",
        "EDO",
        "Window DRAM",
        "Cache DRAM",
        "Non-Volatile",
        "Registered (Buffered)",
        "Unbuffered (Unregistered)",
        "LRDIMM", // 15
    ];
    if code & 0xFFFE == 0 {
        sink.attr("Type Detail", Value::NONE);
    } else {
        let labels: Vec<&'static str> = DETAILS
            .iter()
            .enumerate()
            .filter(|(i, _)| code & (1 << (i + 1)) != 0)
            .map(|(_, &s)| s)
            .collect();
        sink.attr("Type Detail", Value::Flags(labels));
    }
}

fn device_speed(sink: &mut dyn Sink, name: &str, code1: u16, code2: u32) {
    // 0xFFFF in the 16-bit field defers to the 32-bit extended speed.
    if code1 == 0xFFFF {
        if code2 == 0 {
            sink.attr(name, Value::UNKNOWN);
        } else {
            sink.attr(name, Value::text(format!("{code2} MT/s")));
        }
    } else if code1 == 0 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::text(format!("{code1} MT/s")));
    }
}

fn device_technology(sink: &mut dyn Sink, code: u8) {
    static TECHNOLOGIES: [&str; 7] = [
        "Other", // 0x01
        "Unknown",
        "DRAM",
        "NVDIMM-N",
        "NVDIMM-F",
        "NVDIMM-P",
        "Intel Optane DC persistent memory", // 0x07
    ];
    sink.attr("Memory Technology", table_lookup(code, 0x01, &TECHNOLOGIES));
}

fn device_operating_mode_capability(sink: &mut dyn Sink, code: u16) {
    static MODES: [&str; 5] = [
        "Other", // 1
        "Unknown",
        "Volatile memory",
        "Byte-accessible persistent memory",
        "Block-accessible persistent memory", // 5
    ];
    if code & 0xFFFE == 0 {
        sink.attr("Memory Operating Mode Capability", Value::NONE);
    } else {
        let labels: Vec<&'static str> = MODES
            .iter()
            .enumerate()
            .filter(|(i, _)| code & (1 << (i + 1)) != 0)
            .map(|(_, &s)| s)
            .collect();
        sink.attr("Memory Operating Mode Capability", Value::Flags(labels));
    }
}

fn manufacturer_id(sink: &mut dyn Sink, name: &str, code: u16) {
    // JEP-106: low byte counts continuation codes, high byte is the ID.
    if code == 0 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(
            name,
            Value::text(format!("Bank {}, Hex 0x{:02X}", (code & 0x7F) + 1, code >> 8)),
        );
    }
}

fn product_id(sink: &mut dyn Sink, name: &str, code: u16) {
    if code == 0 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::hex16(code));
    }
}

fn device_memory_size(sink: &mut dyn Sink, name: &str, code: u64) {
    if code == u64::MAX {
        sink.attr(name, Value::UNKNOWN);
    } else if code == 0 {
        sink.attr(name, Value::NONE);
    } else {
        attr_size(sink, name, code, 0);
    }
}

pub(super) fn memory_device(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Memory Device");
    if !rec.has(0x15) {
        return;
    }
    if !quiet {
        sink.attr("Array Handle", Value::hex16(rec.u16_at(0x04)));
        array_error_handle(sink, rec.u16_at(0x06));
    }
    device_width(sink, "Total Width", rec.u16_at(0x08));
    device_width(sink, "Data Width", rec.u16_at(0x0A));
    if rec.has(0x20) && rec.u16_at(0x0C) == 0x7FFF {
        device_extended_size(sink, rec.u32_at(0x1C));
    } else {
        device_size(sink, rec.u16_at(0x0C));
    }
    sink.attr("Form Factor", device_form_factor(rec.u8_at(0x0E)));
    device_set(sink, rec.u8_at(0x0F));
    sink.attr("Locator", rec.string(rec.u8_at(0x10)));
    sink.attr("Bank Locator", rec.string(rec.u8_at(0x11)));
    sink.attr("Type", device_type(rec.u8_at(0x12)));
    device_type_detail(sink, rec.u16_at(0x13));
    if !rec.has(0x17) {
        return;
    }
    // No module installed: the remaining fields carry nothing useful.
    if rec.u16_at(0x0C) == 0 {
        return;
    }
    device_speed(
        sink,
        "Speed",
        rec.u16_at(0x15),
        if rec.has(0x5C) { rec.u32_at(0x54) } else { 0 },
    );
    if !rec.has(0x1B) {
        return;
    }
    sink.attr("Manufacturer", rec.string(rec.u8_at(0x17)));
    sink.attr("Serial Number", rec.string(rec.u8_at(0x18)));
    sink.attr("Asset Tag", rec.string(rec.u8_at(0x19)));
    sink.attr("Part Number", rec.string(rec.u8_at(0x1A)));
    if !rec.has(0x1C) {
        return;
    }
    if rec.u8_at(0x1B) & 0x0F == 0 {
        sink.attr("Rank", Value::UNKNOWN);
    } else {
        sink.attr("Rank", Value::int(rec.u8_at(0x1B) & 0x0F));
    }
    if !rec.has(0x22) {
        return;
    }
    device_speed(
        sink,
        "Configured Memory Speed",
        rec.u16_at(0x20),
        if rec.has(0x5C) { rec.u32_at(0x58) } else { 0 },
    );
    if !rec.has(0x28) {
        return;
    }
    device_voltage(sink, "Minimum Voltage", rec.u16_at(0x22));
    device_voltage(sink, "Maximum Voltage", rec.u16_at(0x24));
    device_voltage(sink, "Configured Voltage", rec.u16_at(0x26));
    if !rec.has(0x34) {
        return;
    }
    device_technology(sink, rec.u8_at(0x28));
    device_operating_mode_capability(sink, rec.u16_at(0x29));
    sink.attr("Firmware Version", rec.string(rec.u8_at(0x2B)));
    manufacturer_id(sink, "Module Manufacturer ID", rec.u16_at(0x2C));
    product_id(sink, "Module Product ID", rec.u16_at(0x2E));
    manufacturer_id(
        sink,
        "Memory Subsystem Controller Manufacturer ID",
        rec.u16_at(0x30),
    );
    product_id(sink, "Memory Subsystem Controller Product ID", rec.u16_at(0x32));
    if !rec.has(0x3C) {
        return;
    }
    device_memory_size(sink, "Non-Volatile Size", rec.u64_at(0x34));
    if !rec.has(0x44) {
        return;
    }
    device_memory_size(sink, "Volatile Size", rec.u64_at(0x3C));
    if !rec.has(0x4C) {
        return;
    }
    device_memory_size(sink, "Cache Size", rec.u64_at(0x44));
    if !rec.has(0x54) {
        return;
    }
    device_memory_size(sink, "Logical Size", rec.u64_at(0x4C));
}

fn error_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 14] = [
        "Other", // 0x01
        "Unknown",
        "OK",
        "Bad Read",
        "Parity Error",
        "Single-bit Error",
        "Double-bit Error",
        "Multi-bit Error",
        "Nibble Error",
        "Checksum Error",
        "CRC Error",
        "Corrected Single-bit Error",
        "Corrected Error",
        "Uncorrectable Error", // 0x0E
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn error_granularity(code: u8) -> Value<'static> {
    static GRANULARITIES: [&str; 4] = [
        "Other", // 0x01
        "Unknown",
        "Device Level",
        "Memory Partition Level", // 0x04
    ];
    table_lookup(code, 0x01, &GRANULARITIES)
}

fn error_operation(code: u8) -> Value<'static> {
    static OPERATIONS: [&str; 5] = [
        "Other", // 0x01
        "Unknown",
        "Read",
        "Write",
        "Partial Write", // 0x05
    ];
    table_lookup(code, 0x01, &OPERATIONS)
}

fn error_syndrome(sink: &mut dyn Sink, code: u32) {
    if code == 0 {
        sink.attr("Vendor Syndrome", Value::UNKNOWN);
    } else {
        sink.attr("Vendor Syndrome", Value::hex32(code));
    }
}

fn error_address_32(sink: &mut dyn Sink, name: &str, code: u32) {
    if code == 0x8000_0000 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::hex32(code));
    }
}

fn error_address_64(sink: &mut dyn Sink, name: &str, code: u64) {
    if code == 0x8000_0000_0000_0000 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::text(format!("0x{:08X}{:08X}", code >> 32, code as u32)));
    }
}

pub(super) fn memory_error_32(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("32-bit Memory Error Information");
    if !rec.has(0x17) {
        return;
    }
    sink.attr("Type", error_type(rec.u8_at(0x04)));
    sink.attr("Granularity", error_granularity(rec.u8_at(0x05)));
    sink.attr("Operation", error_operation(rec.u8_at(0x06)));
    error_syndrome(sink, rec.u32_at(0x07));
    error_address_32(sink, "Memory Array Address", rec.u32_at(0x0B));
    error_address_32(sink, "Device Address", rec.u32_at(0x0F));
    error_address_32(sink, "Resolution", rec.u32_at(0x13));
}

pub(super) fn memory_error_64(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("64-bit Memory Error Information");
    if !rec.has(0x1F) {
        return;
    }
    sink.attr("Type", error_type(rec.u8_at(0x04)));
    sink.attr("Granularity", error_granularity(rec.u8_at(0x05)));
    sink.attr("Operation", error_operation(rec.u8_at(0x06)));
    error_syndrome(sink, rec.u32_at(0x07));
    error_address_64(sink, "Memory Array Address", rec.u64_at(0x0B));
    error_address_64(sink, "Device Address", rec.u64_at(0x13));
    error_address_32(sink, "Resolution", rec.u32_at(0x1B));
}

fn mapped_range_size(sink: &mut dyn Sink, kbytes: u32) {
    if kbytes == 0 {
        sink.attr("Range Size", Value::text("Invalid"));
    } else {
        attr_size(sink, "Range Size", u64::from(kbytes), 1);
    }
}

fn mapped_extended_range(sink: &mut dyn Sink, start: u64, end: u64) {
    if start == end {
        sink.attr("Range Size", Value::text("Invalid"));
    } else {
        attr_size(sink, "Range Size", end.wrapping_sub(start).wrapping_add(1), 0);
    }
}

fn mapped_addresses(rec: &Record<'_>, extended_off: usize, sink: &mut dyn Sink) {
    // When the 32-bit start reads all ones the 64-bit fields (kB units)
    // hold the real range.
    if rec.has(extended_off + 0x10) && rec.u32_at(0x04) == 0xFFFF_FFFF {
        let start = rec.u64_at(extended_off);
        let end = rec.u64_at(extended_off + 8);
        sink.attr(
            "Starting Address",
            Value::text(format!("0x{:08X}{:08X}k", start >> 32, start as u32)),
        );
        sink.attr(
            "Ending Address",
            Value::text(format!("0x{:08X}{:08X}k", end >> 32, end as u32)),
        );
        mapped_extended_range(sink, start, end);
    } else {
        let start = rec.u32_at(0x04);
        let end = rec.u32_at(0x08);
        sink.attr(
            "Starting Address",
            Value::text(format!("0x{:08X}{:03X}", start >> 2, (start & 0x3) << 10)),
        );
        sink.attr(
            "Ending Address",
            Value::text(format!(
                "0x{:08X}{:03X}",
                end >> 2,
                ((end & 0x3) << 10) + 0x3FF
            )),
        );
        mapped_range_size(sink, end.wrapping_sub(start).wrapping_add(1));
    }
}

pub(super) fn memory_array_mapped_address(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Memory Array Mapped Address");
    if !rec.has(0x0F) {
        return;
    }
    mapped_addresses(rec, 0x0F, sink);
    if !quiet {
        sink.attr("Physical Array Handle", Value::hex16(rec.u16_at(0x0C)));
    }
    sink.attr("Partition Width", Value::int(rec.u8_at(0x0E)));
}

fn mapped_row_position(sink: &mut dyn Sink, code: u8) {
    match code {
        0 => sink.attr("Partition Row Position", Value::OUT_OF_SPEC),
        0xFF => sink.attr("Partition Row Position", Value::UNKNOWN),
        _ => sink.attr("Partition Row Position", Value::int(code)),
    }
}

fn mapped_interleave_position(sink: &mut dyn Sink, code: u8) {
    if code != 0 {
        if code == 0xFF {
            sink.attr("Interleave Position", Value::UNKNOWN);
        } else {
            sink.attr("Interleave Position", Value::int(code));
        }
    }
}

fn mapped_interleave_depth(sink: &mut dyn Sink, code: u8) {
    if code != 0 {
        if code == 0xFF {
            sink.attr("Interleaved Data Depth", Value::UNKNOWN);
        } else {
            sink.attr("Interleaved Data Depth", Value::int(code));
        }
    }
}

pub(super) fn memory_device_mapped_address(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Memory Device Mapped Address");
    if !rec.has(0x13) {
        return;
    }
    mapped_addresses(rec, 0x13, sink);
    if !quiet {
        sink.attr("Physical Device Handle", Value::hex16(rec.u16_at(0x0C)));
        sink.attr(
            "Memory Array Mapped Address Handle",
            Value::hex16(rec.u16_at(0x0E)),
        );
    }
    mapped_row_position(sink, rec.u8_at(0x10));
    mapped_interleave_position(sink, rec.u8_at(0x11));
    mapped_interleave_depth(sink, rec.u8_at(0x12));
}

fn channel_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 4] = [
        "Other", // 0x01
        "Unknown",
        "RamBus",
        "SyncLink", // 0x04
    ];
    table_lookup(code, 0x01, &TYPES)
}

pub(super) fn memory_channel(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Memory Channel");
    if !rec.has(0x07) {
        return;
    }
    sink.attr("Type", channel_type(rec.u8_at(0x04)));
    sink.attr("Maximal Load", Value::int(rec.u8_at(0x05)));
    let count = usize::from(rec.u8_at(0x06));
    sink.attr("Devices", Value::int(count as u64));
    if !rec.has(0x07 + 3 * count) {
        return;
    }
    for i in 1..=count {
        sink.attr(&format!("Device {i} Load"), Value::int(rec.u8_at(0x04 + 3 * i)));
        if !quiet {
            sink.attr(
                &format!("Device {i} Handle"),
                Value::hex16(rec.u16_at(0x04 + 3 * i + 1)),
            );
        }
    }
}
