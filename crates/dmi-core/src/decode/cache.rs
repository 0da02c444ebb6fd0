//! Cache Information (type 7).

use crate::report::{Sink, Value};
use crate::table::Record;

use super::size::attr_size;
use super::table_lookup;

fn cache_mode(code: u8) -> &'static str {
    match code {
        0x00 => "Write Through",
        0x01 => "Write Back",
        0x02 => "Varies With Memory Address",
        _ => "Unknown",
    }
}

fn cache_location(code: u8) -> Value<'static> {
    match code {
        0x00 => Value::text("Internal"),
        0x01 => Value::text("External"),
        0x03 => Value::UNKNOWN,
        _ => Value::OUT_OF_SPEC,
    }
}

/// 31-bit size field: bit 31 selects a 64K granularity for the rest.
fn attr_cache_size_32(sink: &mut dyn Sink, name: &str, code: u32) {
    let size = if code & 0x8000_0000 != 0 {
        u64::from(code & 0x7FFF_FFFF) << 6
    } else {
        u64::from(code)
    };
    attr_size(sink, name, size, 1);
}

/// Legacy 16-bit size field: bit 15 selects a 64K granularity.
fn attr_cache_size_16(sink: &mut dyn Sink, name: &str, code: u16) {
    let widened = (u32::from(code & 0x8000) << 16) | u32::from(code & 0x7FFF);
    attr_cache_size_32(sink, name, widened);
}

static SRAM_TYPES: [&str; 7] = [
    "Other", // 0
    "Unknown",
    "Non-burst",
    "Burst",
    "Pipeline Burst",
    "Synchronous",
    "Asynchronous", // 6
];

fn sram_labels(code: u16) -> Vec<&'static str> {
    SRAM_TYPES
        .iter()
        .enumerate()
        .filter(|(i, _)| code & (1 << i) != 0)
        .map(|(_, &s)| s)
        .collect()
}

fn sram_types_list(sink: &mut dyn Sink, name: &str, code: u16) {
    if code & 0x007F == 0 {
        sink.attr(name, Value::NONE);
    } else {
        sink.list_start(name, None);
        for label in sram_labels(code) {
            sink.list_item(Value::text(label));
        }
        sink.list_end();
    }
}

fn sram_types_flat(sink: &mut dyn Sink, name: &str, code: u16) {
    if code & 0x007F == 0 {
        sink.attr(name, Value::NONE);
    } else {
        sink.attr(name, Value::Flags(sram_labels(code)));
    }
}

fn error_correction_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 6] = [
        "Other", // 0x01
        "Unknown",
        "None",
        "Parity",
        "Single-bit ECC",
        "Multi-bit ECC", // 0x06
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn system_cache_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 5] = [
        "Other", // 0x01
        "Unknown",
        "Instruction",
        "Data",
        "Unified", // 0x05
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn associativity(code: u8) -> Value<'static> {
    static TYPES: [&str; 14] = [
        "Other", // 0x01
        "Unknown",
        "Direct Mapped",
        "2-way Set-associative",
        "4-way Set-associative",
        "Fully Associative",
        "8-way Set-associative",
        "16-way Set-associative",
        "12-way Set-associative",
        "24-way Set-associative",
        "32-way Set-associative",
        "48-way Set-associative",
        "64-way Set-associative",
        "20-way Set-associative", // 0x0E
    ];
    table_lookup(code, 0x01, &TYPES)
}

fn module_speed(sink: &mut dyn Sink, name: &str, code: u8) {
    if code == 0 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        sink.attr(name, Value::text(format!("{code} ns")));
    }
}

pub(super) fn cache(rec: &Record<'_>, sink: &mut dyn Sink) {
    sink.name("Cache Information");
    if !rec.has(0x0F) {
        return;
    }
    sink.attr("Socket Designation", rec.string(rec.u8_at(0x04)));
    let config = rec.u16_at(0x05);
    sink.attr(
        "Configuration",
        Value::text(format!(
            "{}, {}, Level {}",
            if config & 0x0080 != 0 { "Enabled" } else { "Disabled" },
            if config & 0x0008 != 0 { "Socketed" } else { "Not Socketed" },
            (config & 0x0007) + 1
        )),
    );
    sink.attr(
        "Operational Mode",
        Value::text(cache_mode(((config >> 8) & 0x0003) as u8)),
    );
    sink.attr("Location", cache_location(((config >> 5) & 0x0003) as u8));
    // 3.1 moved the size fields to 32-bit layouts past offset 0x13.
    if rec.has(0x1B) {
        attr_cache_size_32(sink, "Installed Size", rec.u32_at(0x17));
    } else {
        attr_cache_size_16(sink, "Installed Size", rec.u16_at(0x09));
    }
    if rec.has(0x17) {
        attr_cache_size_32(sink, "Maximum Size", rec.u32_at(0x13));
    } else {
        attr_cache_size_16(sink, "Maximum Size", rec.u16_at(0x07));
    }
    sram_types_list(sink, "Supported SRAM Types", rec.u16_at(0x0B));
    sram_types_flat(sink, "Installed SRAM Type", rec.u16_at(0x0D));
    if !rec.has(0x13) {
        return;
    }
    module_speed(sink, "Speed", rec.u8_at(0x0F));
    sink.attr("Error Correction Type", error_correction_type(rec.u8_at(0x10)));
    sink.attr("System Type", system_cache_type(rec.u8_at(0x11)));
    sink.attr("Associativity", associativity(rec.u8_at(0x12)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TextSink;

    fn size_16(code: u16) -> String {
        let mut sink = TextSink::new(Vec::new());
        attr_cache_size_16(&mut sink, "Size", code);
        String::from_utf8(sink.into_inner()).expect("utf-8")
    }

    #[test]
    fn small_granularity_sizes() {
        assert_eq!(size_16(512), "\tSize: 512 kB\n");
        assert_eq!(size_16(0x2000), "\tSize: 8 MB\n");
    }

    #[test]
    fn large_granularity_multiplies_by_64k() {
        assert_eq!(size_16(0x8000 | 512), "\tSize: 32 MB\n");
    }
}
