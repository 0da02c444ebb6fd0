//! Base Board Information (type 2) and Chassis Information (type 3).

use std::borrow::Cow;

use crate::report::{Sink, Value};
use crate::table::Record;

use super::{structure_type_name, table_lookup};

fn base_board_features(rec: &Record<'_>, sink: &mut dyn Sink) {
    static FEATURES: [&str; 5] = [
        "Board is a hosting board", // 0
        "Board requires at least one daughter board",
        "Board is removable",
        "Board is replaceable",
        "Board is hot swappable", // 4
    ];
    let code = rec.u8_at(0x09);
    if code & 0x1F == 0 {
        sink.list_start("Features", Some(Value::NONE));
    } else {
        sink.list_start("Features", None);
        for (i, label) in FEATURES.iter().enumerate() {
            if code & (1 << i) != 0 {
                sink.list_item(Value::text(*label));
            }
        }
    }
    sink.list_end();
}

pub(super) fn base_board_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 13] = [
        "Unknown", // 0x01
        "Other",
        "Server Blade",
        "Connectivity Switch",
        "System Management Module",
        "Processor Module",
        "I/O Module",
        "Memory Module",
        "Daughter Board",
        "Motherboard",
        "Processor+Memory Module",
        "Processor+I/O Module",
        "Interconnect Board", // 0x0D
    ];
    table_lookup(code, 0x01, &TYPES)
}

pub(super) fn base_board(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Base Board Information");
    if !rec.has(0x08) {
        return;
    }
    sink.attr("Manufacturer", rec.string(rec.u8_at(0x04)));
    sink.attr("Product Name", rec.string(rec.u8_at(0x05)));
    sink.attr("Version", rec.string(rec.u8_at(0x06)));
    sink.attr("Serial Number", rec.string(rec.u8_at(0x07)));
    if !rec.has(0x09) {
        return;
    }
    sink.attr("Asset Tag", rec.string(rec.u8_at(0x08)));
    if !rec.has(0x0A) {
        return;
    }
    base_board_features(rec, sink);
    if !rec.has(0x0E) {
        return;
    }
    sink.attr("Location In Chassis", rec.string(rec.u8_at(0x0A)));
    if !quiet {
        sink.attr("Chassis Handle", Value::hex16(rec.u16_at(0x0B)));
    }
    sink.attr("Type", base_board_type(rec.u8_at(0x0D)));
    if !rec.has(0x0F) {
        return;
    }
    let count = usize::from(rec.u8_at(0x0E));
    if !rec.has(0x0F + count * 2) {
        return;
    }
    if !quiet {
        sink.list_start("Contained Object Handles", Some(Value::int(count as u64)));
        for i in 0..count {
            sink.list_item(Value::hex16(rec.u16_at(0x0F + 2 * i)));
        }
        sink.list_end();
    }
}

fn chassis_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 36] = [
        "Other", // 0x01
        "Unknown",
        "Desktop",
        "Low Profile Desktop",
        "Pizza Box",
        "Mini Tower",
        "Tower",
        "Portable",
        "Laptop",
        "Notebook",
        "Hand Held",
        "Docking Station",
        "All In One",
        "Sub Notebook",
        "Space-saving",
        "Lunch Box",
        "Main Server Chassis",
        "Expansion Chassis",
        "Sub Chassis",
        "Bus Expansion Chassis",
        "Peripheral Chassis",
        "RAID Chassis",
        "Rack Mount Chassis",
        "Sealed-case PC",
        "Multi-system",
        "CompactPCI",
        "AdvancedTCA",
        "Blade",
        "Blade Enclosing",
        "Tablet",
        "Convertible",
        "Detachable",
        "IoT Gateway",
        "Embedded PC",
        "Mini PC",
        "Stick PC", // 0x24
    ];
    // Bit 7 is the lock bit, not part of the type.
    table_lookup(code & 0x7F, 0x01, &TYPES)
}

fn chassis_state(code: u8) -> Value<'static> {
    static STATES: [&str; 6] = [
        "Other", // 0x01
        "Unknown",
        "Safe",
        "Warning",
        "Critical",
        "Non-recoverable", // 0x06
    ];
    table_lookup(code, 0x01, &STATES)
}

fn chassis_security_status(code: u8) -> Value<'static> {
    static STATUS: [&str; 5] = [
        "Other", // 0x01
        "Unknown",
        "None",
        "External Interface Locked Out",
        "External Interface Enabled", // 0x05
    ];
    table_lookup(code, 0x01, &STATUS)
}

fn chassis_height(sink: &mut dyn Sink, code: u8) {
    if code == 0x00 {
        sink.attr("Height", Value::text("Unspecified"));
    } else {
        sink.attr("Height", Value::text(format!("{code} U")));
    }
}

fn chassis_power_cords(sink: &mut dyn Sink, code: u8) {
    if code == 0x00 {
        sink.attr("Number Of Power Cords", Value::text("Unspecified"));
    } else {
        sink.attr("Number Of Power Cords", Value::int(code));
    }
}

fn chassis_elements(rec: &Record<'_>, count: usize, elem_len: usize, sink: &mut dyn Sink) {
    sink.list_start("Contained Elements", Some(Value::int(count as u64)));
    for i in 0..count {
        if elem_len >= 0x03 {
            let off = 0x15 + i * elem_len;
            let code = rec.u8_at(off);
            // High bit selects between structure types and board types.
            let ty: Cow<'static, str> = if code & 0x80 != 0 {
                Cow::Borrowed(structure_type_name(code & 0x7F))
            } else {
                Cow::Owned(base_board_type(code & 0x7F).to_string())
            };
            let min = rec.u8_at(off + 1);
            let max = rec.u8_at(off + 2);
            if min == max {
                sink.list_item(Value::text(format!("{ty} ({min})")));
            } else {
                sink.list_item(Value::text(format!("{ty} ({min}-{max})")));
            }
        }
    }
    sink.list_end();
}

pub(super) fn chassis(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Chassis Information");
    if !rec.has(0x09) {
        return;
    }
    sink.attr("Manufacturer", rec.string(rec.u8_at(0x04)));
    sink.attr("Type", chassis_type(rec.u8_at(0x05)));
    sink.attr(
        "Lock",
        Value::text(if rec.u8_at(0x05) & 0x80 != 0 {
            "Present"
        } else {
            "Not Present"
        }),
    );
    sink.attr("Version", rec.string(rec.u8_at(0x06)));
    sink.attr("Serial Number", rec.string(rec.u8_at(0x07)));
    sink.attr("Asset Tag", rec.string(rec.u8_at(0x08)));
    if !rec.has(0x0D) {
        return;
    }
    sink.attr("Boot-up State", chassis_state(rec.u8_at(0x09)));
    sink.attr("Power Supply State", chassis_state(rec.u8_at(0x0A)));
    sink.attr("Thermal State", chassis_state(rec.u8_at(0x0B)));
    sink.attr("Security Status", chassis_security_status(rec.u8_at(0x0C)));
    if !rec.has(0x11) {
        return;
    }
    sink.attr("OEM Information", Value::hex32(rec.u32_at(0x0D)));
    if !rec.has(0x13) {
        return;
    }
    chassis_height(sink, rec.u8_at(0x11));
    chassis_power_cords(sink, rec.u8_at(0x12));
    if !rec.has(0x15) {
        return;
    }
    let count = usize::from(rec.u8_at(0x13));
    let elem_len = usize::from(rec.u8_at(0x14));
    if !rec.has(0x15 + count * elem_len) {
        return;
    }
    chassis_elements(rec, count, elem_len, sink);
    if !rec.has(0x16 + count * elem_len) {
        return;
    }
    sink.attr("SKU Number", rec.string(rec.u8_at(0x15 + count * elem_len)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chassis_type_masks_the_lock_bit() {
        assert_eq!(chassis_type(0x03), Value::text("Desktop"));
        assert_eq!(chassis_type(0x83), Value::text("Desktop"));
        assert_eq!(chassis_type(0x25), Value::OUT_OF_SPEC);
    }

    #[test]
    fn board_type_bounds() {
        assert_eq!(base_board_type(0x0A), Value::text("Motherboard"));
        assert_eq!(base_board_type(0x00), Value::OUT_OF_SPEC);
        assert_eq!(base_board_type(0x0E), Value::OUT_OF_SPEC);
    }
}
