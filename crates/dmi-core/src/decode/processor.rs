//! Processor Information (type 4).
//!
//! The family field is the messiest in the whole table: a sparse 16-bit code
//! space, two ambiguous legacy codes that can only be told apart by the
//! manufacturer string, and a CPUID-style identification field whose layout
//! depends on the deduced vendor lineage.

use crate::report::{Sink, Value};
use crate::table::Record;
use crate::version::SpecVersion;

use super::table_lookup;

/// Sparse family code table, sorted by code for binary search.
static FAMILIES: [(u16, &str); 214] = [
    (0x01, "Other"),
    (0x02, "Unknown"),
    (0x03, "8086"),
    (0x04, "80286"),
    (0x05, "80386"),
    (0x06, "80486"),
    (0x07, "8087"),
    (0x08, "80287"),
    (0x09, "80387"),
    (0x0A, "80487"),
    (0x0B, "Pentium"),
    (0x0C, "Pentium Pro"),
    (0x0D, "Pentium II"),
    (0x0E, "Pentium MMX"),
    (0x0F, "Celeron"),
    (0x10, "Pentium II Xeon"),
    (0x11, "Pentium III"),
    (0x12, "M1"),
    (0x13, "M2"),
    (0x14, "Celeron M"),
    (0x15, "Pentium 4 HT"),
    (0x18, "Duron"),
    (0x19, "K5"),
    (0x1A, "K6"),
    (0x1B, "K6-2"),
    (0x1C, "K6-3"),
    (0x1D, "Athlon"),
    (0x1E, "AMD29000"),
    (0x1F, "K6-2+"),
    (0x20, "Power PC"),
    (0x21, "Power PC 601"),
    (0x22, "Power PC 603"),
    (0x23, "Power PC 603+"),
    (0x24, "Power PC 604"),
    (0x25, "Power PC 620"),
    (0x26, "Power PC x704"),
    (0x27, "Power PC 750"),
    (0x28, "Core Duo"),
    (0x29, "Core Duo Mobile"),
    (0x2A, "Core Solo Mobile"),
    (0x2B, "Atom"),
    (0x2C, "Core M"),
    (0x2D, "Core m3"),
    (0x2E, "Core m5"),
    (0x2F, "Core m7"),
    (0x30, "Alpha"),
    (0x31, "Alpha 21064"),
    (0x32, "Alpha 21066"),
    (0x33, "Alpha 21164"),
    (0x34, "Alpha 21164PC"),
    (0x35, "Alpha 21164a"),
    (0x36, "Alpha 21264"),
    (0x37, "Alpha 21364"),
    (0x38, "Turion II Ultra Dual-Core Mobile M"),
    (0x39, "Turion II Dual-Core Mobile M"),
    (0x3A, "Athlon II Dual-Core M"),
    (0x3B, "Opteron 6100"),
    (0x3C, "Opteron 4100"),
    (0x3D, "Opteron 6200"),
    (0x3E, "Opteron 4200"),
    (0x3F, "FX"),
    (0x40, "MIPS"),
    (0x41, "MIPS R4000"),
    (0x42, "MIPS R4200"),
    (0x43, "MIPS R4400"),
    (0x44, "MIPS R4600"),
    (0x45, "MIPS R10000"),
    (0x46, "C-Series"),
    (0x47, "E-Series"),
    (0x48, "A-Series"),
    (0x49, "G-Series"),
    (0x4A, "Z-Series"),
    (0x4B, "R-Series"),
    (0x4C, "Opteron 4300"),
    (0x4D, "Opteron 6300"),
    (0x4E, "Opteron 3300"),
    (0x4F, "FirePro"),
    (0x50, "SPARC"),
    (0x51, "SuperSPARC"),
    (0x52, "MicroSPARC II"),
    (0x53, "MicroSPARC IIep"),
    (0x54, "UltraSPARC"),
    (0x55, "UltraSPARC II"),
    (0x56, "UltraSPARC IIi"),
    (0x57, "UltraSPARC III"),
    (0x58, "UltraSPARC IIIi"),
    (0x60, "68040"),
    (0x61, "68xxx"),
    (0x62, "68000"),
    (0x63, "68010"),
    (0x64, "68020"),
    (0x65, "68030"),
    (0x66, "Athlon X4"),
    (0x67, "Opteron X1000"),
    (0x68, "Opteron X2000"),
    (0x69, "Opteron A-Series"),
    (0x6A, "Opteron X3000"),
    (0x6B, "Zen"),
    (0x70, "Hobbit"),
    (0x78, "Crusoe TM5000"),
    (0x79, "Crusoe TM3000"),
    (0x7A, "Efficeon TM8000"),
    (0x80, "Weitek"),
    (0x82, "Itanium"),
    (0x83, "Athlon 64"),
    (0x84, "Opteron"),
    (0x85, "Sempron"),
    (0x86, "Turion 64"),
    (0x87, "Dual-Core Opteron"),
    (0x88, "Athlon 64 X2"),
    (0x89, "Turion 64 X2"),
    (0x8A, "Quad-Core Opteron"),
    (0x8B, "Third-Generation Opteron"),
    (0x8C, "Phenom FX"),
    (0x8D, "Phenom X4"),
    (0x8E, "Phenom X2"),
    (0x8F, "Athlon X2"),
    (0x90, "PA-RISC"),
    (0x91, "PA-RISC 8500"),
    (0x92, "PA-RISC 8000"),
    (0x93, "PA-RISC 7300LC"),
    (0x94, "PA-RISC 7200"),
    (0x95, "PA-RISC 7100LC"),
    (0x96, "PA-RISC 7100"),
    (0xA0, "V30"),
    (0xA1, "Quad-Core Xeon 3200"),
    (0xA2, "Dual-Core Xeon 3000"),
    (0xA3, "Quad-Core Xeon 5300"),
    (0xA4, "Dual-Core Xeon 5100"),
    (0xA5, "Dual-Core Xeon 5000"),
    (0xA6, "Dual-Core Xeon LV"),
    (0xA7, "Dual-Core Xeon ULV"),
    (0xA8, "Dual-Core Xeon 7100"),
    (0xA9, "Quad-Core Xeon 5400"),
    (0xAA, "Quad-Core Xeon"),
    (0xAB, "Dual-Core Xeon 5200"),
    (0xAC, "Dual-Core Xeon 7200"),
    (0xAD, "Quad-Core Xeon 7300"),
    (0xAE, "Quad-Core Xeon 7400"),
    (0xAF, "Multi-Core Xeon 7400"),
    (0xB0, "Pentium III Xeon"),
    (0xB1, "Pentium III Speedstep"),
    (0xB2, "Pentium 4"),
    (0xB3, "Xeon"),
    (0xB4, "AS400"),
    (0xB5, "Xeon MP"),
    (0xB6, "Athlon XP"),
    (0xB7, "Athlon MP"),
    (0xB8, "Itanium 2"),
    (0xB9, "Pentium M"),
    (0xBA, "Celeron D"),
    (0xBB, "Pentium D"),
    (0xBC, "Pentium EE"),
    (0xBD, "Core Solo"),
    // 0xBE is ambiguous and handled separately.
    (0xBF, "Core 2 Duo"),
    (0xC0, "Core 2 Solo"),
    (0xC1, "Core 2 Extreme"),
    (0xC2, "Core 2 Quad"),
    (0xC3, "Core 2 Extreme Mobile"),
    (0xC4, "Core 2 Duo Mobile"),
    (0xC5, "Core 2 Solo Mobile"),
    (0xC6, "Core i7"),
    (0xC7, "Dual-Core Celeron"),
    (0xC8, "IBM390"),
    (0xC9, "G4"),
    (0xCA, "G5"),
    (0xCB, "ESA/390 G6"),
    (0xCC, "z/Architecture"),
    (0xCD, "Core i5"),
    (0xCE, "Core i3"),
    (0xCF, "Core i9"),
    (0xD2, "C7-M"),
    (0xD3, "C7-D"),
    (0xD4, "C7"),
    (0xD5, "Eden"),
    (0xD6, "Multi-Core Xeon"),
    (0xD7, "Dual-Core Xeon 3xxx"),
    (0xD8, "Quad-Core Xeon 3xxx"),
    (0xD9, "Nano"),
    (0xDA, "Dual-Core Xeon 5xxx"),
    (0xDB, "Quad-Core Xeon 5xxx"),
    (0xDD, "Dual-Core Xeon 7xxx"),
    (0xDE, "Quad-Core Xeon 7xxx"),
    (0xDF, "Multi-Core Xeon 7xxx"),
    (0xE0, "Multi-Core Xeon 3400"),
    (0xE4, "Opteron 3000"),
    (0xE5, "Sempron II"),
    (0xE6, "Embedded Opteron Quad-Core"),
    (0xE7, "Phenom Triple-Core"),
    (0xE8, "Turion Ultra Dual-Core Mobile"),
    (0xE9, "Turion Dual-Core Mobile"),
    (0xEA, "Athlon Dual-Core"),
    (0xEB, "Sempron SI"),
    (0xEC, "Phenom II"),
    (0xED, "Athlon II"),
    (0xEE, "Six-Core Opteron"),
    (0xEF, "Sempron M"),
    (0xFA, "i860"),
    (0xFB, "i960"),
    (0x100, "ARMv7"),
    (0x101, "ARMv8"),
    (0x104, "SH-3"),
    (0x105, "SH-4"),
    (0x118, "ARM"),
    (0x119, "StrongARM"),
    (0x12C, "6x86"),
    (0x12D, "MediaGX"),
    (0x12E, "MII"),
    (0x140, "WinChip"),
    (0x15E, "DSP"),
    (0x1F4, "Video Processor"),
    (0x200, "RV32"),
    (0x201, "RV64"),
    (0x202, "RV128"),
];

/// Case-insensitive prefix or plain substring match, the loose test the
/// reference uses against manufacturer strings.
fn vendor_matches(haystack: &str, needle: &str) -> bool {
    if haystack.contains(needle) {
        return true;
    }
    haystack.len() >= needle.len()
        && haystack.is_char_boundary(needle.len())
        && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

/// Resolve the 16-bit family code, following the 0xFE indirection into the
/// Processor Family 2 field when present.
fn family_code(rec: &Record<'_>) -> u16 {
    if rec.u8_at(0x06) == 0xFE && rec.has(0x2A) {
        rec.u16_at(0x28)
    } else {
        u16::from(rec.u8_at(0x06))
    }
}

pub(super) fn processor_family(rec: &Record<'_>, ver: SpecVersion) -> Value<'static> {
    // SMBIOS 2.0 used 0x30 for both "Alpha" and (on Intel boards) "Pentium
    // Pro"; the manufacturer string is the only way to tell.
    if ver.pair() == (2, 0) && rec.u8_at(0x06) == 0x30 && rec.has(0x08) {
        let manufacturer = rec.string(rec.u8_at(0x07)).to_string();
        if vendor_matches(&manufacturer, "Intel") {
            return Value::text("Pentium Pro");
        }
    }

    let code = family_code(rec);

    // 0xBE is "Core 2" on Intel boards and "K7" on AMD boards.
    if code == 0xBE {
        if rec.has(0x08) {
            let manufacturer = rec.string(rec.u8_at(0x07)).to_string();
            if vendor_matches(&manufacturer, "Intel") {
                return Value::text("Core 2");
            }
            if vendor_matches(&manufacturer, "AMD") {
                return Value::text("K7");
            }
        }
        return Value::text("Core 2 or K7");
    }

    match FAMILIES.binary_search_by_key(&code, |&(value, _)| value) {
        Ok(i) => Value::text(FAMILIES[i].1),
        Err(_) => Value::OUT_OF_SPEC,
    }
}

/// CPUID EDX feature flags (Intel AP-485 table 2-4); reserved bits are gaps.
static ID_FLAGS: [Option<&str>; 32] = [
    Some("FPU (Floating-point unit on-chip)"), // 0
    Some("VME (Virtual mode extension)"),
    Some("DE (Debugging extension)"),
    Some("PSE (Page size extension)"),
    Some("TSC (Time stamp counter)"),
    Some("MSR (Model specific registers)"),
    Some("PAE (Physical address extension)"),
    Some("MCE (Machine check exception)"),
    Some("CX8 (CMPXCHG8 instruction supported)"),
    Some("APIC (On-chip APIC hardware supported)"),
    None, // 10
    Some("SEP (Fast system call)"),
    Some("MTRR (Memory type range registers)"),
    Some("PGE (Page global enable)"),
    Some("MCA (Machine check architecture)"),
    Some("CMOV (Conditional move instruction supported)"),
    Some("PAT (Page attribute table)"),
    Some("PSE-36 (36-bit page size extension)"),
    Some("PSN (Processor serial number present and enabled)"),
    Some("CLFSH (CLFLUSH instruction supported)"),
    None, // 20
    Some("DS (Debug store)"),
    Some("ACPI (ACPI supported)"),
    Some("MMX (MMX technology supported)"),
    Some("FXSR (FXSAVE and FXSTOR instructions supported)"),
    Some("SSE (Streaming SIMD extensions)"),
    Some("SSE2 (Streaming SIMD extensions 2)"),
    Some("SS (Self-snoop)"),
    Some("HTT (Multi-threading)"),
    Some("TM (Thermal monitor supported)"),
    None, // 30
    Some("PBE (Pending break enabled)"), // 31
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum IdEncoding {
    Intel,
    Amd,
}

/// Pick the CPUID sub-encoding for a family code, or `None` when the field
/// is not a CPUID signature at all.
fn id_encoding(rec: &Record<'_>, family: u16) -> Option<IdEncoding> {
    match family {
        0x0B..=0x15 // Intel, Cyrix
        | 0x28..=0x2F
        | 0xA1..=0xB3
        | 0xB5
        | 0xB9..=0xC7
        | 0xCD..=0xCF
        | 0xD2..=0xDB // VIA, Intel
        | 0xDD..=0xE0 => Some(IdEncoding::Intel),
        0x18..=0x1D
        | 0x1F
        | 0x38..=0x3F
        | 0x46..=0x4F
        | 0x66..=0x6B
        | 0x83..=0x8F
        | 0xB6..=0xB7
        | 0xE4..=0xEF => Some(IdEncoding::Amd),
        0x01 | 0x02 => {
            // Families "Other" and "Unknown": fall back to version strings
            // known to identify CPUID-capable parts.
            let version = rec.string(rec.u8_at(0x10)).to_string();
            if version.starts_with("Pentium III MMX")
                || version.starts_with("Intel(R) Core(TM)2")
                || version.starts_with("Intel(R) Pentium(R)")
                || version == "Genuine Intel(R) CPU U1400"
            {
                Some(IdEncoding::Intel)
            } else if version.starts_with("AMD Athlon(TM)")
                || version.starts_with("AMD Opteron(tm)")
                || version.starts_with("Dual-Core AMD Opteron(tm)")
            {
                Some(IdEncoding::Amd)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn processor_id(rec: &Record<'_>, sink: &mut dyn Sink) {
    let p = rec.bytes_at(0x08, 8);
    let family = family_code(rec);

    sink.attr(
        "ID",
        Value::text(format!(
            "{:02X} {:02X} {:02X} {:02X} {:02X} {:02X} {:02X} {:02X}",
            p[0], p[1], p[2], p[3], p[4], p[5], p[6], p[7]
        )),
    );

    let dx = u16::from_le_bytes([p[0], p[1]]);
    if family == 0x05 {
        // 80386: DX signature.
        sink.attr(
            "Signature",
            Value::text(format!(
                "Type {}, Family {}, Major Stepping {}, Minor Stepping {}",
                dx >> 12,
                (dx >> 8) & 0xF,
                (dx >> 4) & 0xF,
                dx & 0xF
            )),
        );
        return;
    }
    let encoding = if family == 0x06 {
        // Only some 80486 parts implement CPUID; the DX signature tells.
        let cpuid_capable = dx & 0x0F00 == 0x0400
            && (dx & 0x00F0 == 0x0040 || dx & 0x00F0 >= 0x0070)
            && dx & 0x000F >= 0x0003;
        if !cpuid_capable {
            sink.attr(
                "Signature",
                Value::text(format!(
                    "Type {}, Family {}, Model {}, Stepping {}",
                    (dx >> 12) & 0x3,
                    (dx >> 8) & 0xF,
                    (dx >> 4) & 0xF,
                    dx & 0xF
                )),
            );
            return;
        }
        Some(IdEncoding::Intel)
    } else if matches!(family, 0x100 | 0x101 | 0x118 | 0x119) {
        // ARM: the field is a MIDR, undefined before spec 3.1.0 where it
        // reads all zeroes.
        let midr = u32::from_le_bytes([p[0], p[1], p[2], p[3]]);
        if midr == 0 {
            return;
        }
        sink.attr(
            "Signature",
            Value::text(format!(
                "Implementor 0x{:02x}, Variant 0x{:x}, Architecture {}, Part 0x{:03x}, Revision {}",
                midr >> 24,
                (midr >> 20) & 0xF,
                (midr >> 16) & 0xF,
                (midr >> 4) & 0xFFF,
                midr & 0xF
            )),
        );
        return;
    } else {
        match id_encoding(rec, family) {
            Some(encoding) => Some(encoding),
            None => return, // neither x86 nor ARM
        }
    };

    let eax = u32::from_le_bytes([p[0], p[1], p[2], p[3]]);
    match encoding {
        Some(IdEncoding::Intel) => sink.attr(
            "Signature",
            Value::text(format!(
                "Type {}, Family {}, Model {}, Stepping {}",
                (eax >> 12) & 0x3,
                ((eax >> 20) & 0xFF) + ((eax >> 8) & 0x0F),
                ((eax >> 12) & 0xF0) + ((eax >> 4) & 0x0F),
                eax & 0xF
            )),
        ),
        Some(IdEncoding::Amd) => sink.attr(
            "Signature",
            Value::text(format!(
                "Family {}, Model {}, Stepping {}",
                ((eax >> 8) & 0xF)
                    + if (eax >> 8) & 0xF == 0xF {
                        (eax >> 20) & 0xFF
                    } else {
                        0
                    },
                ((eax >> 4) & 0xF)
                    | if (eax >> 8) & 0xF == 0xF {
                        (eax >> 12) & 0xF0
                    } else {
                        0
                    },
                eax & 0xF
            )),
        ),
        None => {}
    }

    let edx = u32::from_le_bytes([p[4], p[5], p[6], p[7]]);
    if edx & 0xBFEF_FBFF == 0 {
        sink.list_start("Flags", Some(Value::NONE));
    } else {
        sink.list_start("Flags", None);
        for (i, flag) in ID_FLAGS.iter().enumerate() {
            if let Some(flag) = flag {
                if edx & (1 << i) != 0 {
                    sink.list_item(Value::text(*flag));
                }
            }
        }
    }
    sink.list_end();
}

fn processor_type(code: u8) -> Value<'static> {
    static TYPES: [&str; 6] = [
        "Other", // 0x01
        "Unknown",
        "Central Processor",
        "Math Processor",
        "DSP Processor",
        "Video Processor", // 0x06
    ];
    table_lookup(code, 0x01, &TYPES)
}

/// Shared with the memory controller decoder, which reuses the same
/// encoding for module voltage.
pub(super) fn voltage(rec_code: u8, sink: &mut dyn Sink, name: &str) {
    static VOLTAGES: [&str; 3] = ["5.0 V", "3.3 V", "2.9 V"];
    if rec_code & 0x80 != 0 {
        // Bit 7 set: the low bits hold the value in tenths of a volt.
        sink.attr(
            name,
            Value::Float {
                value: f64::from(rec_code & 0x7F) / 10.0,
                places: 1,
                unit: "V",
            },
        );
    } else if rec_code & 0x07 == 0 {
        sink.attr(name, Value::UNKNOWN);
    } else {
        let flags: Vec<&'static str> = VOLTAGES
            .iter()
            .enumerate()
            .filter(|(i, _)| rec_code & (1 << i) != 0)
            .map(|(_, &s)| s)
            .collect();
        sink.attr(name, Value::Flags(flags));
    }
}

fn frequency(sink: &mut dyn Sink, name: &str, code: u16) {
    if code != 0 {
        sink.attr(name, Value::text(format!("{code} MHz")));
    } else {
        sink.attr(name, Value::UNKNOWN);
    }
}

fn status(code: u8) -> Value<'static> {
    match code & 0x07 {
        0x00 => Value::UNKNOWN,
        0x01 => Value::text("Enabled"),
        0x02 => Value::text("Disabled By User"),
        0x03 => Value::text("Disabled By BIOS"),
        0x04 => Value::text("Idle"),
        0x07 => Value::text("Other"),
        _ => Value::OUT_OF_SPEC,
    }
}

fn upgrade(code: u8) -> Value<'static> {
    static UPGRADES: [&str; 62] = [
        "Other", // 0x01
        "Unknown",
        "Daughter Board",
        "ZIF Socket",
        "Replaceable Piggy Back",
        "None",
        "LIF Socket",
        "Slot 1",
        "Slot 2",
        "370-pin Socket",
        "Slot A",
        "Slot M",
        "Socket 423",
        "Socket A (Socket 462)",
        "Socket 478",
        "Socket 754",
        "Socket 940",
        "Socket 939",
        "Socket mPGA604",
        "Socket LGA771",
        "Socket LGA775",
        "Socket S1",
        "Socket AM2",
        "Socket F (1207)",
        "Socket LGA1366",
        "Socket G34",
        "Socket AM3",
        "Socket C32",
        "Socket LGA1156",
        "Socket LGA1567",
        "Socket PGA988A",
        "Socket BGA1288",
        "Socket rPGA988B",
        "Socket BGA1023",
        "Socket BGA1224",
        "Socket BGA1155",
        "Socket LGA1356",
        "Socket LGA2011",
        "Socket FS1",
        "Socket FS2",
        "Socket FM1",
        "Socket FM2",
        "Socket LGA2011-3",
        "Socket LGA1356-3",
        "Socket LGA1150",
        "Socket BGA1168",
        "Socket BGA1234",
        "Socket BGA1364",
        "Socket AM4",
        "Socket LGA1151",
        "Socket BGA1356",
        "Socket BGA1440",
        "Socket BGA1515",
        "Socket LGA3647-1",
        "Socket SP3",
        "Socket SP3r2",
        "Socket LGA2066",
        "Socket BGA1392",
        "Socket BGA1510",
        "Socket BGA1528",
        "Socket LGA4189",
        "Socket LGA1200", // 0x3E
    ];
    table_lookup(code, 0x01, &UPGRADES)
}

fn cache_handle(sink: &mut dyn Sink, name: &str, code: u16, level: &str, ver: SpecVersion) {
    if code == 0xFFFF {
        if ver >= SpecVersion::V2_3 {
            sink.attr(name, Value::text("Not Provided"));
        } else {
            sink.attr(name, Value::text(format!("No {level} Cache")));
        }
    } else {
        sink.attr(name, Value::hex16(code));
    }
}

fn characteristics(sink: &mut dyn Sink, name: &str, code: u16) {
    static CHARACTERISTICS: [&str; 8] = [
        "64-bit capable", // 2
        "Multi-Core",
        "Hardware Thread",
        "Execute Protection",
        "Enhanced Virtualization",
        "Power/Performance Control",
        "128-bit Capable",
        "Arm64 SoC ID", // 9
    ];
    if code & 0x00FC == 0 {
        sink.attr(name, Value::NONE);
    } else {
        sink.list_start(name, None);
        for (i, label) in CHARACTERISTICS.iter().enumerate() {
            if code & (1 << (i + 2)) != 0 {
                sink.list_item(Value::text(*label));
            }
        }
        sink.list_end();
    }
}

pub(super) fn processor(rec: &Record<'_>, ver: SpecVersion, quiet: bool, sink: &mut dyn Sink) {
    sink.name("Processor Information");
    if !rec.has(0x1A) {
        return;
    }
    sink.attr("Socket Designation", rec.string(rec.u8_at(0x04)));
    sink.attr("Type", processor_type(rec.u8_at(0x05)));
    sink.attr("Family", processor_family(rec, ver));
    sink.attr("Manufacturer", rec.string(rec.u8_at(0x07)));
    processor_id(rec, sink);
    sink.attr("Version", rec.string(rec.u8_at(0x10)));
    voltage(rec.u8_at(0x11), sink, "Voltage");
    frequency(sink, "External Clock", rec.u16_at(0x12));
    frequency(sink, "Max Speed", rec.u16_at(0x14));
    frequency(sink, "Current Speed", rec.u16_at(0x16));
    if rec.u8_at(0x18) & (1 << 6) != 0 {
        sink.attr(
            "Status",
            Value::text(format!("Populated, {}", status(rec.u8_at(0x18)))),
        );
    } else {
        sink.attr("Status", Value::text("Unpopulated"));
    }
    sink.attr("Upgrade", upgrade(rec.u8_at(0x19)));
    if !rec.has(0x20) {
        return;
    }
    if !quiet {
        cache_handle(sink, "L1 Cache Handle", rec.u16_at(0x1A), "L1", ver);
        cache_handle(sink, "L2 Cache Handle", rec.u16_at(0x1C), "L2", ver);
        cache_handle(sink, "L3 Cache Handle", rec.u16_at(0x1E), "L3", ver);
    }
    if !rec.has(0x23) {
        return;
    }
    sink.attr("Serial Number", rec.string(rec.u8_at(0x20)));
    sink.attr("Asset Tag", rec.string(rec.u8_at(0x21)));
    sink.attr("Part Number", rec.string(rec.u8_at(0x22)));
    if !rec.has(0x28) {
        return;
    }
    // A count of 0xFF overflows into the 16-bit fields added in 3.0.
    if rec.u8_at(0x23) != 0 {
        let count = if rec.has(0x2C) && rec.u8_at(0x23) == 0xFF {
            u64::from(rec.u16_at(0x2A))
        } else {
            u64::from(rec.u8_at(0x23))
        };
        sink.attr("Core Count", Value::Int(count));
    }
    if rec.u8_at(0x24) != 0 {
        let count = if rec.has(0x2E) && rec.u8_at(0x24) == 0xFF {
            u64::from(rec.u16_at(0x2C))
        } else {
            u64::from(rec.u8_at(0x24))
        };
        sink.attr("Core Enabled", Value::Int(count));
    }
    if rec.u8_at(0x25) != 0 {
        let count = if rec.has(0x30) && rec.u8_at(0x25) == 0xFF {
            u64::from(rec.u16_at(0x2E))
        } else {
            u64::from(rec.u8_at(0x25))
        };
        sink.attr("Thread Count", Value::Int(count));
    }
    characteristics(sink, "Characteristics", rec.u16_at(0x26));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Walker;

    fn processor_record(family: u8, manufacturer: &str) -> Vec<u8> {
        let mut formatted = vec![0u8; 0x1A - 4];
        formatted[0x05 - 4] = 0x03; // central processor
        formatted[0x06 - 4] = family;
        formatted[0x07 - 4] = 1; // manufacturer string index
        let mut buf = vec![4u8, 0x1A, 0x00, 0x00];
        buf.extend_from_slice(&formatted);
        buf.extend_from_slice(manufacturer.as_bytes());
        buf.extend_from_slice(&[0, 0]);
        buf
    }

    fn family_of(buf: &[u8], ver: SpecVersion) -> String {
        let mut walker = Walker::new(buf, 0, false);
        let rec = walker.next_record().expect("record should parse");
        processor_family(&rec, ver).to_string()
    }

    #[test]
    fn table_is_sorted_for_binary_search() {
        for pair in FAMILIES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "misordered at {:#x}", pair[1].0);
        }
    }

    #[test]
    fn ambiguous_0x30_depends_on_vendor_and_version() {
        let intel = processor_record(0x30, "Intel Corp.");
        assert_eq!(family_of(&intel, SpecVersion::V2_0), "Pentium Pro");
        // Same code on a different vendor: plain table lookup.
        let dec = processor_record(0x30, "Digital");
        assert_eq!(family_of(&dec, SpecVersion::V2_0), "Alpha");
        // Later spec revisions define 0x30 unambiguously.
        assert_eq!(family_of(&intel, SpecVersion::new(2, 1, 0)), "Alpha");
    }

    #[test]
    fn ambiguous_0xbe_depends_on_vendor() {
        assert_eq!(
            family_of(&processor_record(0xBE, "Intel"), SpecVersion::V2_6),
            "Core 2"
        );
        assert_eq!(
            family_of(&processor_record(0xBE, "Advanced Micro Devices AMD"), SpecVersion::V2_6),
            "K7"
        );
        assert_eq!(
            family_of(&processor_record(0xBE, "Cyrix"), SpecVersion::V2_6),
            "Core 2 or K7"
        );
    }

    #[test]
    fn unknown_family_is_out_of_spec() {
        assert_eq!(
            family_of(&processor_record(0x5B, "Whoever"), SpecVersion::V2_6),
            "<OUT OF SPEC>"
        );
    }

    #[test]
    fn vendor_match_is_substring_or_ci_prefix() {
        assert!(vendor_matches("GenuineIntel", "Intel"));
        assert!(vendor_matches("intel corp", "Intel"));
        assert!(!vendor_matches("AMD", "Intel"));
    }
}
