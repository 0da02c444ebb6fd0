//! Scaled size rendering shared by the memory and cache decoders.

use crate::report::{Sink, Value};

const UNITS: [&str; 8] = ["bytes", "kB", "MB", "GB", "TB", "PB", "EB", "ZB"];

/// Split a magnitude into 10-bit groups (successive kilo-multiples) and pick
/// the largest unit with a non-zero group. When the next lower group is also
/// non-zero, fold it in so values like 1536 kB render exactly instead of
/// truncating to "1 MB". `shift` is 0 when `code` counts bytes, 1 when it
/// counts kilobytes.
pub(crate) fn scaled_size(code: u64, shift: usize) -> (u64, &'static str) {
    let mut split = [0u16; 7];
    for (i, group) in split.iter_mut().enumerate() {
        *group = ((code >> (10 * i)) & 0x3FF) as u16;
    }

    let mut i = 6;
    while i > 0 && split[i] == 0 {
        i -= 1;
    }
    let capacity = if i > 0 && split[i - 1] != 0 {
        i -= 1;
        u64::from(split[i]) + (u64::from(split[i + 1]) << 10)
    } else {
        u64::from(split[i])
    };

    (capacity, UNITS[i + shift])
}

pub(crate) fn attr_size(sink: &mut dyn Sink, name: &str, code: u64, shift: usize) {
    let (capacity, unit) = scaled_size(code, shift);
    sink.attr(name, Value::text(format!("{capacity} {unit}")));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(code: u64, shift: usize) -> String {
        let (capacity, unit) = scaled_size(code, shift);
        format!("{capacity} {unit}")
    }

    #[test]
    fn byte_counts_stay_in_bytes_below_a_kilobyte() {
        assert_eq!(render(1023, 0), "1023 bytes");
        assert_eq!(render(1024, 0), "1 kB");
    }

    #[test]
    fn adjacent_groups_are_combined() {
        // 1536 kB must not collapse to "1 MB".
        assert_eq!(render(1536, 1), "1536 kB");
        // 3 GB + 512 MB expressed in kB.
        assert_eq!(render((3 * 1024 + 512) * 1024, 1), "3584 MB");
    }

    #[test]
    fn isolated_high_group_uses_its_own_unit() {
        assert_eq!(render(2 << 20, 1), "2 GB");
        assert_eq!(render(1 << 40, 0), "1 TB");
    }

    #[test]
    fn kilobyte_shift_reaches_the_top_unit() {
        assert_eq!(render(1 << 60, 1), "1 ZB");
    }
}
