//! Reporting interface between the decoder and whatever renders its output.
//!
//! Decoders emit `(name, Value)` pairs and list structures in strict
//! depth-first order, one record at a time; nothing is buffered or
//! reordered. Values are tagged variants rather than preformatted strings so
//! sinks can render them however they like; [`TextSink`] reproduces the
//! classic tab-indented text layout.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;

/// Display sentinels for values that exist on the wire but carry no usable
/// information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// String index 0: the field was deliberately left blank.
    NotSpecified,
    /// A string index past the populated string area.
    BadIndex,
    /// An enumeration code the consulted spec revision does not define.
    OutOfSpec,
    Unknown,
    None,
}

impl Sentinel {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentinel::NotSpecified => "Not Specified",
            Sentinel::BadIndex => "<BAD INDEX>",
            Sentinel::OutOfSpec => "<OUT OF SPEC>",
            Sentinel::Unknown => "Unknown",
            Sentinel::None => "None",
        }
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Text(Cow<'a, str>),
    Int(u64),
    /// Zero-padded uppercase hexadecimal with an `0x` prefix.
    Hex { value: u64, digits: u8 },
    /// Fixed-point decimal with a unit suffix (voltages, temperatures).
    Float {
        value: f64,
        places: usize,
        unit: &'static str,
    },
    /// Space-joined flag labels ("flat" bit-field rendering).
    Flags(Vec<&'static str>),
    Sentinel(Sentinel),
}

impl<'a> Value<'a> {
    pub const OUT_OF_SPEC: Value<'static> = Value::Sentinel(Sentinel::OutOfSpec);
    pub const UNKNOWN: Value<'static> = Value::Sentinel(Sentinel::Unknown);
    pub const NONE: Value<'static> = Value::Sentinel(Sentinel::None);

    pub fn text(text: impl Into<Cow<'a, str>>) -> Value<'a> {
        Value::Text(text.into())
    }

    pub fn int(value: impl Into<u64>) -> Value<'static> {
        Value::Int(value.into())
    }

    pub fn hex8(value: u8) -> Value<'static> {
        Value::Hex {
            value: u64::from(value),
            digits: 2,
        }
    }

    pub fn hex16(value: u16) -> Value<'static> {
        Value::Hex {
            value: u64::from(value),
            digits: 4,
        }
    }

    pub fn hex32(value: u32) -> Value<'static> {
        Value::Hex {
            value: u64::from(value),
            digits: 8,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(t) => f.write_str(t),
            Value::Int(v) => write!(f, "{v}"),
            Value::Hex { value, digits } => {
                write!(f, "0x{value:00$X}", usize::from(*digits))
            }
            Value::Float { value, places, unit } => {
                write!(f, "{value:.0$} {unit}", *places)
            }
            Value::Flags(flags) => f.write_str(&flags.join(" ")),
            Value::Sentinel(s) => f.write_str(s.as_str()),
        }
    }
}

/// Rendering interface the decoder drives. Implementations must tolerate any
/// call order the decoder produces; in particular a list may be extended by
/// further items after `list_end` when a record appends extension fields to
/// an earlier list (BIOS characteristics).
pub trait Sink {
    /// One record's `Handle 0x...., DMI type .., .. bytes` banner.
    fn record_header(&mut self, ty: u8, length: u8, handle: u16);

    /// Human-readable record title ("BIOS Information").
    fn name(&mut self, name: &str);

    fn attr(&mut self, name: &str, value: Value<'_>);

    /// Nested attribute one level below the current one (protocol
    /// sub-records).
    fn subattr(&mut self, name: &str, value: Value<'_>);

    fn list_start(&mut self, name: &str, value: Option<Value<'_>>);

    fn list_item(&mut self, value: Value<'_>);

    fn list_end(&mut self);

    /// Blank line between records.
    fn separator(&mut self);

    /// Advisory text interleaved with decoded output (truncation, fixups,
    /// count mismatches). Never fatal.
    fn diagnostic(&mut self, text: &str);

    /// Table-level announcement ("SMBIOS 3.2.0 present.").
    fn info(&mut self, text: &str);

    /// Comment line, rendered as `# ...` in text output.
    fn comment(&mut self, text: &str);
}

/// Renders the traditional text format to any writer. Write errors are
/// ignored, matching the fire-and-forget contract of a console report.
#[derive(Debug)]
pub struct TextSink<W> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        TextSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn record_header(&mut self, ty: u8, length: u8, handle: u16) {
        let _ = writeln!(self.out, "Handle 0x{handle:04X}, DMI type {ty}, {length} bytes");
    }

    fn name(&mut self, name: &str) {
        let _ = writeln!(self.out, "{name}");
    }

    fn attr(&mut self, name: &str, value: Value<'_>) {
        let _ = writeln!(self.out, "\t{name}: {value}");
    }

    fn subattr(&mut self, name: &str, value: Value<'_>) {
        let _ = writeln!(self.out, "\t\t{name}: {value}");
    }

    fn list_start(&mut self, name: &str, value: Option<Value<'_>>) {
        match value {
            Some(value) => {
                let _ = writeln!(self.out, "\t{name}: {value}");
            }
            None => {
                let _ = writeln!(self.out, "\t{name}:");
            }
        }
    }

    fn list_item(&mut self, value: Value<'_>) {
        let _ = writeln!(self.out, "\t\t{value}");
    }

    fn list_end(&mut self) {}

    fn separator(&mut self) {
        let _ = writeln!(self.out);
    }

    fn diagnostic(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn info(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn comment(&mut self, text: &str) {
        let _ = writeln!(self.out, "# {text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_rendering() {
        assert_eq!(Value::text("abc").to_string(), "abc");
        assert_eq!(Value::int(42u16).to_string(), "42");
        assert_eq!(Value::hex16(0xBEEF).to_string(), "0xBEEF");
        assert_eq!(Value::hex32(0x1F).to_string(), "0x0000001F");
        assert_eq!(
            Value::Float {
                value: 3.3,
                places: 1,
                unit: "V"
            }
            .to_string(),
            "3.3 V"
        );
        assert_eq!(Value::Flags(vec!["FPM", "EDO"]).to_string(), "FPM EDO");
        assert_eq!(Value::OUT_OF_SPEC.to_string(), "<OUT OF SPEC>");
    }

    #[test]
    fn text_sink_layout() {
        let mut sink = TextSink::new(Vec::new());
        sink.record_header(0, 24, 0x0015);
        sink.name("BIOS Information");
        sink.attr("Vendor", Value::text("Acme"));
        sink.list_start("Characteristics", None);
        sink.list_item(Value::text("PCI is supported"));
        sink.list_end();
        sink.separator();
        let out = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(
            out,
            "Handle 0x0015, DMI type 0, 24 bytes\n\
             BIOS Information\n\
             \tVendor: Acme\n\
             \tCharacteristics:\n\
             \t\tPCI is supported\n\
             \n"
        );
    }
}
