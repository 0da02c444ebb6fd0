//! Probe and management device records: Voltage Probe (26), Cooling Device
//! (27), Temperature Probe (28), Electrical Current Probe (29), Management
//! Device (34), Management Device Component (35) and Management Device
//! Threshold Data (36).

use crate::report::{Sink, Value};
use crate::table::Record;

use super::table_lookup;

/// Probes encode readings as signed 16-bit fixed point with 0x8000 meaning
/// "unknown".
const PROBE_UNKNOWN: u16 = 0x8000;

pub(super) fn voltage_probe_location(code: u8) -> Value<'static> {
    static LOCATIONS: [&str; 11] = [
        "Other", // 0x01
        "Unknown",
        "Processor",
        "Disk",
        "Peripheral Bay",
        "System Management Module",
        "Motherboard",
        "Memory Module",
        "Processor Module",
        "Power Unit",
        "Add-in Card", // 0x0B
    ];
    table_lookup(code, 0x01, &LOCATIONS)
}

pub(super) fn probe_status(code: u8) -> Value<'static> {
    static STATUS: [&str; 6] = [
        "Other", // 0x01
        "Unknown",
        "OK",
        "Non-critical",
        "Critical",
        "Non-recoverable", // 0x06
    ];
    table_lookup(code, 0x01, &STATUS)
}

fn probe_value(sink: &mut dyn Sink, name: &str, code: u16, places: usize, unit: &'static str, scale: f64) {
    if code == PROBE_UNKNOWN {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(
            name,
            Value::Float {
                value: f64::from(code as i16) / scale,
                places,
                unit,
            },
        );
    }
}

fn probe_resolution(sink: &mut dyn Sink, code: u16, places: usize, unit: &'static str, scale: f64) {
    if code == PROBE_UNKNOWN {
        sink.attr("Resolution", Value::UNKNOWN);
    } else {
        sink.attr(
            "Resolution",
            Value::Float {
                value: f64::from(code) / scale,
                places,
                unit,
            },
        );
    }
}

fn probe_accuracy(sink: &mut dyn Sink, code: u16) {
    if code == PROBE_UNKNOWN {
        sink.attr("Accuracy", Value::UNKNOWN);
    } else {
        sink.attr(
            "Accuracy",
            Value::Float {
                value: f64::from(code) / 100.0,
                places: 2,
                unit: "%",
            },
        );
    }
}

pub(super) fn voltage_probe(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Voltage Probe");
    if !rec.has(0x14) {
        return;
    }
    sink.attr("Description", rec.string(rec.u8_at(0x04)));
    sink.attr("Location", voltage_probe_location(rec.u8_at(0x05) & 0x1F));
    sink.attr("Status", probe_status(rec.u8_at(0x05) >> 5));
    probe_value(sink, "Maximum Value", rec.u16_at(0x06), 3, "V", 1000.0);
    probe_value(sink, "Minimum Value", rec.u16_at(0x08), 3, "V", 1000.0);
    probe_resolution(sink, rec.u16_at(0x0A), 1, "mV", 10.0);
    probe_value(sink, "Tolerance", rec.u16_at(0x0C), 3, "V", 1000.0);
    probe_accuracy(sink, rec.u16_at(0x0E));
    sink.attr("OEM-specific Information", Value::hex32(rec.u32_at(0x10)));
    if !rec.has(0x16) {
        return;
    }
    probe_value(sink, "Nominal Value", rec.u16_at(0x14), 3, "V", 1000.0);
}

fn cooling_device_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 9] = [
        "Other", // 0x01
        "Unknown",
        "Fan",
        "Centrifugal Blower",
        "Chip Fan",
        "Cabinet Fan",
        "Power Supply Fan",
        "Heat Pipe",
        "Integrated Refrigeration", // 0x09
    ];
    static TYPES_10: [&str; 2] = [
        "Active Cooling", // 0x10
        "Passive Cooling", // 0x11
    ];
    if (0x10..=0x11).contains(&code) {
        return Value::text(TYPES_10[usize::from(code - 0x10)]);
    }
    table_lookup(code, 0x01, &TYPES)
}

fn cooling_device_speed(sink: &mut dyn Sink, code: u16) {
    if code == PROBE_UNKNOWN {
        sink.attr("Nominal Speed", Value::text("Unknown Or Non-rotating"));
    } else {
        sink.attr("Nominal Speed", Value::text(format!("{code} rpm")));
    }
}

pub(super) fn cooling_device(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Cooling Device");
    if !rec.has(0x0C) {
        return;
    }
    if !quiet && rec.u16_at(0x04) != 0xFFFF {
        sink.attr("Temperature Probe Handle", Value::hex16(rec.u16_at(0x04)));
    }
    sink.attr("Type", cooling_device_type(rec.u8_at(0x06) & 0x1F));
    sink.attr("Status", probe_status(rec.u8_at(0x06) >> 5));
    if rec.u8_at(0x07) != 0x00 {
        sink.attr("Cooling Unit Group", Value::int(rec.u8_at(0x07)));
    }
    sink.attr("OEM-specific Information", Value::hex32(rec.u32_at(0x08)));
    if !rec.has(0x0E) {
        return;
    }
    cooling_device_speed(sink, rec.u16_at(0x0C));
    if !rec.has(0x0F) {
        return;
    }
    sink.attr("Description", rec.string(rec.u8_at(0x0E)));
}

fn temperature_probe_location(code: u8) -> Value<'static> {
    static LOCATIONS: [&str; 15] = [
        "Other", // 0x01
        "Unknown",
        "Processor",
        "Disk",
        "Peripheral Bay",
        "System Management Module",
        "Motherboard",
        "Memory Module",
        "Processor Module",
        "Power Unit",
        "Add-in Card",
        "Front Panel Board",
        "Back Panel Board",
        "Power System Board",
        "Drive Back Plane", // 0x0F
    ];
    table_lookup(code, 0x01, &LOCATIONS)
}

pub(super) fn temperature_probe(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Temperature Probe");
    if !rec.has(0x14) {
        return;
    }
    sink.attr("Description", rec.string(rec.u8_at(0x04)));
    sink.attr("Location", temperature_probe_location(rec.u8_at(0x05) & 0x1F));
    sink.attr("Status", probe_status(rec.u8_at(0x05) >> 5));
    probe_value(sink, "Maximum Value", rec.u16_at(0x06), 1, "deg C", 10.0);
    probe_value(sink, "Minimum Value", rec.u16_at(0x08), 1, "deg C", 10.0);
    probe_resolution(sink, rec.u16_at(0x0A), 3, "deg C", 1000.0);
    probe_value(sink, "Tolerance", rec.u16_at(0x0C), 1, "deg C", 10.0);
    probe_accuracy(sink, rec.u16_at(0x0E));
    sink.attr("OEM-specific Information", Value::hex32(rec.u32_at(0x10)));
    if !rec.has(0x16) {
        return;
    }
    probe_value(sink, "Nominal Value", rec.u16_at(0x14), 1, "deg C", 10.0);
}

pub(super) fn current_probe(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Electrical Current Probe");
    if !rec.has(0x14) {
        return;
    }
    sink.attr("Description", rec.string(rec.u8_at(0x04)));
    sink.attr("Location", voltage_probe_location(rec.u8_at(0x05) & 0x1F));
    sink.attr("Status", probe_status(rec.u8_at(0x05) >> 5));
    probe_value(sink, "Maximum Value", rec.u16_at(0x06), 3, "A", 1000.0);
    probe_value(sink, "Minimum Value", rec.u16_at(0x08), 3, "A", 1000.0);
    probe_resolution(sink, rec.u16_at(0x0A), 1, "mA", 10.0);
    probe_value(sink, "Tolerance", rec.u16_at(0x0C), 3, "A", 1000.0);
    probe_accuracy(sink, rec.u16_at(0x0E));
    sink.attr("OEM-specific Information", Value::hex32(rec.u32_at(0x10)));
    if !rec.has(0x16) {
        return;
    }
    probe_value(sink, "Nominal Value", rec.u16_at(0x14), 3, "A", 1000.0);
}

fn management_device_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 13] = [
        "Other", // 0x01
        "Unknown",
        "LM75",
        "LM78",
        "LM79",
        "LM80",
        "LM81",
        "ADM9240",
        "DS1780",
        "MAX1617",
        "GL518SM",
        "W83781D",
        "HT82H791", // 0x0D
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn management_device_address_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 5] = [
        "Other", // 0x01
        "Unknown",
        "I/O Port",
        "Memory",
        "SMBus", // 0x05
    ];
    table_lookup(code, 0x01, &TYPES)
}

pub(super) fn management_device(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Management Device");
    if !rec.has(0x0B) {
        return;
    }
    sink.attr("Description", rec.string(rec.u8_at(0x04)));
    sink.attr("Type", management_device_type(rec.u8_at(0x05)));
    sink.attr("Address", Value::hex32(rec.u32_at(0x06)));
    sink.attr(
        "Address Type",
        management_device_address_type(rec.u8_at(0x0A)),
    );
}

pub(super) fn management_device_component(rec: &Record<'_>, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Management Device Component");
    if !rec.has(0x0B) {
        return;
    }
    sink.attr("Description", rec.string(rec.u8_at(0x04)));
    if !quiet {
        sink.attr("Management Device Handle", Value::hex16(rec.u16_at(0x05)));
        sink.attr("Component Handle", Value::hex16(rec.u16_at(0x07)));
        if rec.u16_at(0x09) != 0xFFFF {
            sink.attr("Threshold Handle", Value::hex16(rec.u16_at(0x09)));
        }
    }
}

pub(super) fn management_device_threshold(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Management Device Threshold Data");
    if !rec.has(0x10) {
        return;
    }
    let thresholds = [
        ("Lower Non-critical Threshold", 0x04),
        ("Upper Non-critical Threshold", 0x06),
        ("Lower Critical Threshold", 0x08),
        ("Upper Critical Threshold", 0x0A),
        ("Lower Non-recoverable Threshold", 0x0C),
        ("Upper Non-recoverable Threshold", 0x0E),
    ];
    for (name, off) in thresholds {
        let code = rec.u16_at(off);
        if code != PROBE_UNKNOWN {
            sink.attr(name, Value::text(format!("{}", code as i16)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TextSink;

    fn capture(f: impl FnOnce(&mut TextSink<Vec<u8>>)) -> String {
        let mut sink = TextSink::new(Vec::new());
        f(&mut sink);
        String::from_utf8(sink.into_inner()).expect("utf-8")
    }

    #[test]
    fn probe_values_are_millesimal_fixed_point() {
        assert_eq!(
            capture(|s| probe_value(s, "Maximum Value", 3300, 3, "V", 1000.0)),
            "\tMaximum Value: 3.300 V\n"
        );
        // Negative readings are signed.
        assert_eq!(
            capture(|s| probe_value(s, "Minimum Value", (-50i16) as u16, 1, "deg C", 10.0)),
            "\tMinimum Value: -5.0 deg C\n"
        );
        assert_eq!(
            capture(|s| probe_value(s, "Tolerance", 0x8000, 3, "V", 1000.0)),
            "\tTolerance: Unknown\n"
        );
    }

    #[test]
    fn cooling_types_cover_the_second_range() {
        assert_eq!(cooling_device_type(0x03), Value::text("Fan"));
        assert_eq!(cooling_device_type(0x11), Value::text("Passive Cooling"));
        assert_eq!(cooling_device_type(0x0A), Value::OUT_OF_SPEC);
    }
}
