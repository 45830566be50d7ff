//! Fixed-capacity text formatting for diagnostic lines

use core::fmt::{self, Write};

use heapless::String;

/// Longest diagnostic line; longer output is truncated
pub const LINE_CAPACITY: usize = 128;

/// Formatted diagnostic line
pub type Line = String<LINE_CAPACITY>;

/// Writer that drops whatever does not fit instead of failing
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Render `args` into a line, truncating at [`LINE_CAPACITY`]
pub fn format_line(args: fmt::Arguments<'_>) -> Line {
    let mut line = Line::new();
    let _ = Truncating(&mut line).write_fmt(args);
    line
}

/// Human-readable uptime, e.g. `1:02:05 hour(s)` or `01:15 minute(s)`
pub fn format_uptime(total_secs: u64) -> String<32> {
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    let mut w = Truncating(&mut out);
    let _ = if hours > 0 {
        write!(w, "{}:{:02}:{:02} hour(s)", hours, minutes, seconds)
    } else if minutes > 0 {
        write!(w, "{:02}:{:02} minute(s)", minutes, seconds)
    } else {
        write!(w, "{:02}:{:02} second(s)", minutes, seconds)
    };
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_units() {
        assert_eq!(format_uptime(0).as_str(), "00:00 second(s)");
        assert_eq!(format_uptime(42).as_str(), "00:42 second(s)");
        assert_eq!(format_uptime(75).as_str(), "01:15 minute(s)");
        assert_eq!(format_uptime(3725).as_str(), "1:02:05 hour(s)");
    }

    #[test]
    fn test_long_line_truncated() {
        let long = [b'x'; 200];
        let text = core::str::from_utf8(&long).unwrap();
        let line = format_line(format_args!("{}{}", "head:", text));
        assert_eq!(line.len(), LINE_CAPACITY);
        assert!(line.starts_with("head:xxx"));
    }

    #[test]
    fn test_format_args_rendered() {
        let line = format_line(format_args!("stall {} of {}", 3, 15));
        assert_eq!(line.as_str(), "stall 3 of 15");
    }
}
