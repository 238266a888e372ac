//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    if quoted.len() >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Format a `label: value` line with the label padded to `width`.
pub fn format_line<T: ToString>(label: &str, value: T, width: usize) -> String {
    let padded = format!("{:<width$}", format!("{label}:"));
    format!("{} {}", padded.bold(), value.to_string())
}

/// Section heading.
pub fn format_heading(title: &str) -> String {
    format!("# {}", title.on_blue())
}

/// Address count with thousands separators, `65536` gives `65,536`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
