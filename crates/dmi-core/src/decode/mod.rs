//! Record dispatch and the table-level decode driver.
//!
//! [`decode_table`] walks a validated table, applies the display filters,
//! and hands each record to the decoder family for its type code. Types
//! 0 through 43 are defined by the specification, 126 and 127 are markers,
//! and everything else is offered to the OEM hook before falling back to a
//! raw hex dump.

mod bios;
mod board;
mod cache;
mod memory;
mod mgmt;
mod ports;
mod power;
mod processor;
mod sensors;
pub(crate) mod size;
mod slots;
mod system;

use crate::config::{DecodeConfig, DecodeFlags};
use crate::entry::EntryPoint;
use crate::report::{Sentinel, Sink, Value};
use crate::table::{RawTable, Record, WalkStop, Walker};
use crate::vendor::{OemHook, VendorContext};
use crate::version::SpecVersion;

/// Name of a structure type code, for cross-reference displays.
pub fn structure_type_name(code: u8) -> &'static str {
    static TYPES: [&str; 44] = [
        "BIOS", // 0
        "System",
        "Base Board",
        "Chassis",
        "Processor",
        "Memory Controller",
        "Memory Module",
        "Cache",
        "Port Connector",
        "System Slots",
        "On Board Devices",
        "OEM Strings",
        "System Configuration Options",
        "BIOS Language",
        "Group Associations",
        "System Event Log",
        "Physical Memory Array",
        "Memory Device",
        "32-bit Memory Error",
        "Memory Array Mapped Address",
        "Memory Device Mapped Address",
        "Built-in Pointing Device",
        "Portable Battery",
        "System Reset",
        "Hardware Security",
        "System Power Controls",
        "Voltage Probe",
        "Cooling Device",
        "Temperature Probe",
        "Electrical Current Probe",
        "Out-of-band Remote Access",
        "Boot Integrity Services",
        "System Boot",
        "64-bit Memory Error",
        "Management Device",
        "Management Device Component",
        "Management Device Threshold Data",
        "Memory Channel",
        "IPMI Device",
        "Power Supply",
        "Additional Information",
        "Onboard Device",
        "Management Controller Host Interface",
        "TPM Device", // 43
    ];
    if code >= 128 {
        return "OEM-specific";
    }
    TYPES
        .get(usize::from(code))
        .copied()
        .unwrap_or(Sentinel::OutOfSpec.as_str())
}

/// Bounded enumeration lookup: `code - base` indexes `table`, anything
/// outside is out of spec.
pub(crate) fn table_lookup(
    code: u8,
    base: u8,
    table: &'static [&'static str],
) -> Value<'static> {
    match code
        .checked_sub(base)
        .map(usize::from)
        .and_then(|i| table.get(i))
    {
        Some(label) => Value::text(*label),
        None => Value::OUT_OF_SPEC,
    }
}

fn hex_rows(bytes: &[u8], sink: &mut dyn Sink) {
    for row in bytes.chunks(16) {
        let line = row
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        sink.list_item(Value::text(line));
    }
}

/// Hex-and-strings dump, used both as the unknown-type fallback and for the
/// whole-table dump mode (which also hex-dumps each string).
fn raw_dump(rec: &Record<'_>, hex_strings: bool, sink: &mut dyn Sink) {
    sink.list_start("Header and Data", None);
    hex_rows(&rec.data()[..usize::from(rec.length())], sink);
    sink.list_end();

    let area = &rec.data()[usize::from(rec.length())..];
    if area.len() >= 2 && (area[0] != 0 || area[1] != 0) {
        sink.list_start("Strings", None);
        for index in 1..=u8::MAX {
            let Some(raw) = rec.string_raw(index) else {
                break;
            };
            if hex_strings {
                // Include the terminating NUL, as on the wire.
                let mut with_nul = raw.to_vec();
                with_nul.push(0);
                hex_rows(&with_nul, sink);
            }
            sink.list_item(Value::Text(crate::table::filter_ascii(raw)));
        }
        sink.list_end();
    }
}

fn decode_record(
    rec: &Record<'_>,
    ver: SpecVersion,
    quiet: bool,
    ctx: &VendorContext,
    hook: &mut dyn OemHook,
    sink: &mut dyn Sink,
) {
    match rec.record_type() {
        0 => bios::bios_information(rec, sink),
        1 => system::system_information(rec, ver, sink),
        2 => board::base_board(rec, quiet, sink),
        3 => board::chassis(rec, sink),
        4 => processor::processor(rec, ver, quiet, sink),
        5 => memory::memory_controller(rec, sink),
        6 => memory::memory_module(rec, sink),
        7 => cache::cache(rec, sink),
        8 => ports::port_connector(rec, sink),
        9 => slots::system_slot(rec, sink),
        10 => slots::on_board_devices(rec, sink),
        11 => system::oem_strings(rec, sink),
        12 => system::system_configuration_options(rec, sink),
        13 => bios::bios_language(rec, ver, sink),
        14 => system::group_associations(rec, sink),
        15 => system::system_event_log(rec, sink),
        16 => memory::physical_memory_array(rec, quiet, sink),
        17 => memory::memory_device(rec, quiet, sink),
        18 => memory::memory_error_32(rec, sink),
        19 => memory::memory_array_mapped_address(rec, quiet, sink),
        20 => memory::memory_device_mapped_address(rec, quiet, sink),
        21 => ports::pointing_device(rec, sink),
        22 => power::portable_battery(rec, sink),
        23 => system::system_reset(rec, sink),
        24 => system::hardware_security(rec, sink),
        25 => system::system_power_controls(rec, sink),
        26 => sensors::voltage_probe(rec, sink),
        27 => sensors::cooling_device(rec, quiet, sink),
        28 => sensors::temperature_probe(rec, sink),
        29 => sensors::current_probe(rec, sink),
        30 => system::out_of_band_remote_access(rec, sink),
        31 => system::boot_integrity_services(rec, sink),
        32 => system::system_boot(rec, sink),
        33 => memory::memory_error_64(rec, sink),
        34 => sensors::management_device(rec, sink),
        35 => sensors::management_device_component(rec, quiet, sink),
        36 => sensors::management_device_threshold(rec, sink),
        37 => memory::memory_channel(rec, quiet, sink),
        38 => mgmt::ipmi_device(rec, sink),
        39 => power::system_power_supply(rec, quiet, sink),
        40 => {
            if rec.has(0x0B) {
                if quiet {
                    return;
                }
                system::additional_information(rec, sink);
            }
        }
        41 => slots::onboard_device_extended(rec, sink),
        42 => mgmt::management_controller_host_interface(rec, ver, sink),
        43 => mgmt::tpm_device(rec, sink),
        126 => sink.name("Inactive"),
        127 => sink.name("End Of Table"),
        ty => {
            if !hook.try_decode(rec, ctx, sink) {
                if quiet {
                    return;
                }
                sink.name(&format!(
                    "{} Type",
                    if ty >= 128 { "OEM-specific" } else { "Unknown" }
                ));
                raw_dump(rec, false, sink);
            }
        }
    }
    sink.separator();
}

/// Decode a whole table against its validated entry point, reporting
/// through `sink`. Produces as much output as the bytes allow; truncation
/// and malformed records degrade to diagnostics, never errors.
pub fn decode_table(
    entry: &EntryPoint,
    table: &RawTable,
    cfg: &DecodeConfig,
    hook: &mut dyn OemHook,
    sink: &mut dyn Sink,
) {
    let loc = entry.table();
    let ver = loc.version;
    let mut quiet = cfg.quiet();
    let dump_hex = cfg.flags.contains(DecodeFlags::DUMP_HEX);

    if !quiet {
        if let EntryPoint::Smbios2(e) = entry {
            if let Some((major, minor)) = e.version_fixup() {
                sink.diagnostic(&format!(
                    "SMBIOS version fixup ({major}.{minor} -> {}.{}).",
                    ver.major, ver.minor
                ));
            }
        }
        match entry {
            EntryPoint::Smbios3(_) => sink.info(&format!(
                "SMBIOS {}.{}.{} present.",
                ver.major, ver.minor, ver.revision
            )),
            EntryPoint::Smbios2(_) => {
                sink.info(&format!("SMBIOS {}.{} present.", ver.major, ver.minor))
            }
            EntryPoint::Legacy(_) => {
                sink.info(&format!("Legacy DMI {}.{} present.", ver.major, ver.minor))
            }
        }
        if ver > SpecVersion::SUPPORTED {
            let s = SpecVersion::SUPPORTED;
            sink.comment(&format!(
                "SMBIOS implementations newer than version {}.{}.{} are not",
                s.major, s.minor, s.revision
            ));
            sink.comment("fully supported by this version of the decoder.");
        }
        if cfg.type_filter.is_none() {
            if loc.count != 0 {
                sink.info(&format!(
                    "{} structures occupying {} bytes.",
                    loc.count, loc.length
                ));
            }
            if !cfg.flags.contains(DecodeFlags::FROM_DUMP) {
                sink.info(&format!("Table at 0x{:08X}.", loc.address));
            }
        }
        sink.separator();
    }

    // The buffer may be shorter than declared (sysfs truncation, SMBIOS 3.x
    // maximum sizes) and is never walked past its declared length.
    let declared = loc.length as usize;
    let available = table.len();
    if !quiet && loc.count != 0 && available < declared {
        sink.diagnostic(&format!(
            "Wrong DMI structures length: {declared} bytes announced, only {available} bytes available."
        ));
    }
    let buf = &table.bytes()[..declared.min(available)];

    let ctx = VendorContext::capture(buf, loc.count);
    let stop_at_eot = loc.stop_at_eot || cfg.flags.contains(DecodeFlags::STOP_AT_EOT);
    let mut walker = Walker::new(buf, loc.count, stop_at_eot);

    while let Some(mut rec) = walker.next_record() {
        // In quiet mode the end marker silently ends the walk.
        if quiet && rec.record_type() == 127 {
            break;
        }
        let display = cfg
            .type_filter
            .as_ref()
            .map_or(true, |f| f.contains(rec.record_type()))
            && cfg.handle_filter.map_or(true, |h| h == rec.handle())
            && !(quiet && matches!(rec.record_type(), 126 | 127));

        if display && (!quiet || dump_hex) {
            sink.record_header(rec.record_type(), rec.length(), rec.handle());
        }

        if rec.record_type() == 34 && rec.fixup_management_device_length() {
            tracing::debug!(handle = rec.handle(), "management device length fixed up");
            if !quiet && display {
                sink.diagnostic("Invalid entry length (16). Fixed up to 11.");
            }
        }

        if display {
            if dump_hex {
                raw_dump(&rec, true, sink);
                sink.separator();
            } else {
                decode_record(&rec, ver, quiet, &ctx, hook, sink);
            }
        }
    }

    match walker.stop() {
        Some(WalkStop::Malformed { length, .. }) => {
            if !quiet {
                sink.diagnostic(&format!(
                    "Invalid entry length ({length}). DMI table is broken! Stop."
                ));
                sink.separator();
                // One diagnostic is enough; suppress the post-walk noise.
                quiet = true;
            }
        }
        Some(WalkStop::Truncated { ty, length, handle }) => {
            let display = cfg.type_filter.as_ref().map_or(true, |f| f.contains(ty))
                && cfg.handle_filter.map_or(true, |h| h == handle);
            if display && (!quiet || dump_hex) {
                sink.record_header(ty, length, handle);
            }
            if display && !quiet {
                sink.diagnostic("<TRUNCATED>");
            }
            sink.separator();
        }
        _ => {}
    }

    if !quiet {
        let walked = walker.records_walked();
        if loc.count != 0 && walked != loc.count {
            sink.diagnostic(&format!(
                "Wrong DMI structures count: {} announced, only {walked} decoded.",
                loc.count
            ));
        }
        let bytes = walker.bytes_walked();
        if bytes > buf.len() || (loc.count != 0 && bytes < buf.len()) {
            sink.diagnostic(&format!(
                "Wrong DMI structures length: {} bytes announced, structures occupy {bytes} bytes.",
                buf.len()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_type_names() {
        assert_eq!(structure_type_name(0), "BIOS");
        assert_eq!(structure_type_name(43), "TPM Device");
        assert_eq!(structure_type_name(200), "OEM-specific");
        assert_eq!(structure_type_name(44), "<OUT OF SPEC>");
    }

    #[test]
    fn lookup_bounds() {
        static T: [&str; 2] = ["a", "b"];
        assert_eq!(table_lookup(1, 1, &T), Value::text("a"));
        assert_eq!(table_lookup(2, 1, &T), Value::text("b"));
        assert_eq!(table_lookup(0, 1, &T), Value::OUT_OF_SPEC);
        assert_eq!(table_lookup(3, 1, &T), Value::OUT_OF_SPEC);
    }
}
