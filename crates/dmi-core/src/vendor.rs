//! Vendor context and the OEM record-type extension hook.
//!
//! OEM records (type >= 128) can only be interpreted when the machine's
//! maker is known, so a cheap pre-pass captures the manufacturer and product
//! strings from the first System Information record before any decoding
//! happens. The context is then threaded to whoever needs it instead of
//! living in a global.

use crate::report::Sink;
use crate::table::{Record, Walker};

#[derive(Debug, Clone, Default)]
pub struct VendorContext {
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl VendorContext {
    /// Walk the table until the first System Information record (type 1,
    /// length >= 6) and capture its manufacturer/product strings. Uses the
    /// same walking algorithm as the decode pass, so a table too broken to
    /// decode also yields no vendor.
    pub fn capture(buf: &[u8], count: u16) -> VendorContext {
        let mut walker = Walker::new(buf, count, true);
        while let Some(record) = walker.next_record() {
            if record.record_type() == 1 && record.has(6) {
                return VendorContext {
                    manufacturer: record
                        .string_raw(record.u8_at(0x04))
                        .map(|b| String::from_utf8_lossy(b).into_owned()),
                    product: record
                        .string_raw(record.u8_at(0x05))
                        .map(|b| String::from_utf8_lossy(b).into_owned()),
                };
            }
        }
        VendorContext::default()
    }
}

/// Pluggable decoder for record types outside the specification. Consulted
/// for type codes the dispatcher does not recognize; returning `false`
/// falls back to the raw hex dump.
pub trait OemHook {
    fn try_decode(&mut self, record: &Record<'_>, ctx: &VendorContext, sink: &mut dyn Sink)
        -> bool;
}

/// Hook that recognizes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOemHook;

impl OemHook for NoOemHook {
    fn try_decode(
        &mut self,
        _record: &Record<'_>,
        _ctx: &VendorContext,
        _sink: &mut dyn Sink,
    ) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_finds_the_first_system_record() {
        // Type 0 record, then a type 1 with manufacturer/product strings.
        let mut buf = vec![0u8, 4, 0, 0, 0, 0];
        buf.extend_from_slice(&[1, 8, 1, 0, 1, 2, 0, 0]);
        buf.extend_from_slice(b"Acme Corp\0Rocket 9\0\0");
        let ctx = VendorContext::capture(&buf, 0);
        assert_eq!(ctx.manufacturer.as_deref(), Some("Acme Corp"));
        assert_eq!(ctx.product.as_deref(), Some("Rocket 9"));
    }

    #[test]
    fn capture_tolerates_missing_system_record() {
        let buf = [127u8, 4, 0, 0, 0, 0];
        let ctx = VendorContext::capture(&buf, 0);
        assert!(ctx.manufacturer.is_none());
        assert!(ctx.product.is_none());
    }
}
