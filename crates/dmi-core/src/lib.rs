#![forbid(unsafe_code)]

//! SMBIOS/DMI structure table decoder.
//!
//! Firmware exposes a hardware inventory (BIOS, system, processors, memory,
//! slots, sensors, ...) as a packed binary table anchored by an entry point
//! structure. This crate locates and validates the entry point, walks the
//! variable-length records bounded by their embedded length fields and
//! string-area terminators, and dispatches each record to a type-specific
//! field decoder that turns raw bytes into display attributes.
//!
//! The crate never reads past the buffer it is given: every record is a
//! bounds-checked view established by the walker, truncated or hostile input
//! degrades to diagnostics and partial output, and recognition failures are
//! ordinary `None` results so callers can probe multiple candidate addresses.
//!
//! Acquiring the raw bytes (sysfs, dump files) lives in the companion
//! `dmi-dump` crate; rendering is abstracted behind [`report::Sink`], with
//! [`report::TextSink`] producing the classic indented text format.

mod config;
pub mod decode;
mod entry;
pub mod report;
mod table;
mod vendor;
mod version;

pub use crate::config::{DecodeConfig, DecodeFlags, TypeFilter, TYPE_KEYWORDS};
pub use crate::entry::{EntryPoint, LegacyEntry, Smbios2Entry, Smbios3Entry, TableLocation};
pub use crate::table::{RawTable, Record, WalkStop, Walker};
pub use crate::vendor::{NoOemHook, OemHook, VendorContext};
pub use crate::version::SpecVersion;

pub(crate) mod bytes {
    //! Little-endian field reads at documented wire offsets.

    pub(crate) fn u16_at(buf: &[u8], off: usize) -> u16 {
        u16::from_le_bytes([buf[off], buf[off + 1]])
    }

    pub(crate) fn u32_at(buf: &[u8], off: usize) -> u32 {
        u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
    }

    pub(crate) fn u64_at(buf: &[u8], off: usize) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&buf[off..off + 8]);
        u64::from_le_bytes(raw)
    }
}
