//! Portable Battery (type 22) and System Power Supply (type 39).

use crate::report::{Sink, Value};
use crate::table::Record;

use super::table_lookup;

fn battery_chemistry(code: u8) -> Value<'static> {
    static CHEMISTRIES: [&str; 8] = [
        "Other", // 0x01
        "Unknown",
        "Lead Acid",
        "Nickel Cadmium",
        "Nickel Metal Hydride",
        "Lithium Ion",
        "Zinc Air",
        "Lithium Polymer", // 0x08
    ];
    table_lookup(code, 0x01, &CHEMISTRIES)
}

fn battery_capacity(sink: &mut dyn Sink, code: u16, multiplier: u8) {
    if code == 0 {
        sink.attr("Design Capacity", Value::UNKNOWN);
    } else {
        sink.attr(
            "Design Capacity",
            Value::text(format!("{} mWh", u32::from(code) * u32::from(multiplier))),
        );
    }
}

fn battery_voltage(sink: &mut dyn Sink, code: u16) {
    if code == 0 {
        sink.attr("Design Voltage", Value::UNKNOWN);
    } else {
        sink.attr("Design Voltage", Value::text(format!("{code} mV")));
    }
}

fn battery_maximum_error(sink: &mut dyn Sink, code: u8) {
    if code == 0xFF {
        sink.attr("Maximum Error", Value::UNKNOWN);
    } else {
        sink.attr("Maximum Error", Value::text(format!("{code}%")));
    }
}

pub(super) fn portable_battery(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Portable Battery");
    if !rec.has(0x10) {
        return;
    }
    sink.attr("Location", rec.string(rec.u8_at(0x04)));
    sink.attr("Manufacturer", rec.string(rec.u8_at(0x05)));
    // 2.2 moved the date, serial number and chemistry into SBDS fields; the
    // string variants only apply when set or on short (2.1) records.
    if rec.u8_at(0x06) != 0 || !rec.has(0x1A) {
        sink.attr("Manufacture Date", rec.string(rec.u8_at(0x06)));
    }
    if rec.u8_at(0x07) != 0 || !rec.has(0x1A) {
        sink.attr("Serial Number", rec.string(rec.u8_at(0x07)));
    }
    sink.attr("Name", rec.string(rec.u8_at(0x08)));
    if rec.u8_at(0x09) != 0x02 || !rec.has(0x1A) {
        sink.attr("Chemistry", battery_chemistry(rec.u8_at(0x09)));
    }
    battery_capacity(
        sink,
        rec.u16_at(0x0A),
        if rec.has(0x16) { rec.u8_at(0x15) } else { 1 },
    );
    battery_voltage(sink, rec.u16_at(0x0C));
    sink.attr("SBDS Version", rec.string(rec.u8_at(0x0E)));
    battery_maximum_error(sink, rec.u8_at(0x0F));
    if !rec.has(0x1A) {
        return;
    }
    if rec.u8_at(0x07) == 0 {
        sink.attr(
            "SBDS Serial Number",
            Value::text(format!("{:04X}", rec.u16_at(0x10))),
        );
    }
    if rec.u8_at(0x06) == 0 {
        let date = rec.u16_at(0x12);
        sink.attr(
            "SBDS Manufacture Date",
            Value::text(format!(
                "{}-{:02}-{:02}",
                1980 + (date >> 9),
                (date >> 5) & 0x0F,
                date & 0x1F
            )),
        );
    }
    if rec.u8_at(0x09) == 0x02 {
        sink.attr("SBDS Chemistry", rec.string(rec.u8_at(0x14)));
    }
    sink.attr("OEM-specific Information", Value::hex32(rec.u32_at(0x16)));
}

fn power_supply_power(sink: &mut dyn Sink, code: u16) {
    if code == 0x8000 {
        sink.attr("Max Power Capacity", Value::UNKNOWN);
    } else {
        sink.attr("Max Power Capacity", Value::text(format!("{code} W")));
    }
}

fn power_supply_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 8] = [
        "Other", // 0x01
        "Unknown",
        "Linear",
        "Switching",
        "Battery",
        "UPS",
        "Converter",
        "Regulator", // 0x08
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn power_supply_status(code: u8) -> Value<'static> {
    static STATUS: [&str; 5] = [
        "Other", // 0x01
        "Unknown",
        "OK",
        "Non-critical",
        "Critical", // 0x05
    ];
    table_lookup(code, 0x01, &STATUS)
}

fn power_supply_range_switching(code: u8) -> Value<'static> {
    static SWITCHING: [&str; 6] = [
        "Other", // 0x01
        "Unknown",
        "Manual",
        "Auto-switch",
        "Wide Range",
        "N/A", // 0x06
    ];
    table_lookup(code, 0x01, &SWITCHING)
}

pub(super) fn system_power_supply(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("System Power Supply");
    if !rec.has(0x10) {
        return;
    }
    if rec.u8_at(0x04) != 0x00 {
        sink.attr("Power Unit Group", Value::int(rec.u8_at(0x04)));
    }
    sink.attr("Location", rec.string(rec.u8_at(0x05)));
    sink.attr("Name", rec.string(rec.u8_at(0x06)));
    sink.attr("Manufacturer", rec.string(rec.u8_at(0x07)));
    sink.attr("Serial Number", rec.string(rec.u8_at(0x08)));
    sink.attr("Asset Tag", rec.string(rec.u8_at(0x09)));
    sink.attr("Model Part Number", rec.string(rec.u8_at(0x0A)));
    sink.attr("Revision", rec.string(rec.u8_at(0x0B)));
    power_supply_power(sink, rec.u16_at(0x0C));
    let characteristics = rec.u16_at(0x0E);
    if characteristics & (1 << 1) != 0 {
        sink.attr(
            "Status",
            Value::text(format!(
                "Present, {}",
                power_supply_status(((characteristics >> 7) & 0x07) as u8)
            )),
        );
    } else {
        sink.attr("Status", Value::text("Not Present"));
    }
    sink.attr(
        "Type",
        power_supply_type(((characteristics >> 10) & 0x0F) as u8),
    );
    sink.attr(
        "Input Voltage Range Switching",
        power_supply_range_switching(((characteristics >> 3) & 0x0F) as u8),
    );
    sink.attr(
        "Plugged",
        Value::text(if characteristics & (1 << 2) != 0 { "No" } else { "Yes" }),
    );
    sink.attr(
        "Hot Replaceable",
        Value::text(if characteristics & (1 << 0) != 0 { "Yes" } else { "No" }),
    );
    if !rec.has(0x16) {
        return;
    }
    if !quiet {
        if rec.u16_at(0x10) != 0xFFFF {
            sink.attr("Input Voltage Probe Handle", Value::hex16(rec.u16_at(0x10)));
        }
        if rec.u16_at(0x12) != 0xFFFF {
            sink.attr("Cooling Device Handle", Value::hex16(rec.u16_at(0x12)));
        }
        if rec.u16_at(0x14) != 0xFFFF {
            sink.attr("Input Current Probe Handle", Value::hex16(rec.u16_at(0x14)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TextSink;

    #[test]
    fn sbds_date_is_packed_dos_format() {
        // 2002-06-15 packs as ((2002-1980) << 9) | (6 << 5) | 15.
        let date: u16 = (22 << 9) | (6 << 5) | 15;
        assert_eq!(1980 + (date >> 9), 2002);
        assert_eq!((date >> 5) & 0x0F, 6);
        assert_eq!(date & 0x1F, 15);
    }

    #[test]
    fn capacity_uses_the_multiplier() {
        let mut sink = TextSink::new(Vec::new());
        battery_capacity(&mut sink, 4800, 10);
        battery_capacity(&mut sink, 0, 10);
        let out = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(
            out,
            "\tDesign Capacity: 48000 mWh\n\tDesign Capacity: Unknown\n"
        );
    }
}
