//! ANSI color helpers for terminal output.

use crate::models::status::BinStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

pub fn color_for_status(status: BinStatus) -> &'static str {
    match status {
        BinStatus::Low => GREEN,
        BinStatus::Medium => YELLOW,
        BinStatus::High => RED,
    }
}

pub fn colorize_status(status: BinStatus) -> String {
    format!("{}{}{RESET}", color_for_status(status), status.as_str())
}

/// Grey out placeholders ("", "--").
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" {
        format!("{GREY}{}{RESET}", if v.is_empty() { "--" } else { v })
    } else {
        value.to_string()
    }
}

/// Priority 4-5 red, 3 yellow, 1-2 green.
pub fn color_for_priority(priority: u8) -> &'static str {
    match priority {
        4.. => RED,
        3 => YELLOW,
        _ => GREEN,
    }
}

/// Remove ANSI escape sequences (width computations).
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_keeps_text() {
        assert_eq!(strip_ansi(&colorize_status(BinStatus::High)), "high");
        assert_eq!(strip_ansi(&colorize_optional("")), "--");
    }
}
