//! Formatting helpers for CLI output.

use crate::utils::colors::strip_ansi;
use unicode_width::UnicodeWidthStr;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Display width on a terminal, ignoring ANSI sequences.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(pad))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{}{s}", " ".repeat(pad))
}

pub fn format_percent(percent: f64) -> String {
    format!("{percent:.0}%")
}

pub fn format_weight(kg: f64) -> String {
    format!("{kg:.1} kg")
}

/// Ten-cell gauge, e.g. `[######----]` for 60%.
pub fn fill_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 10.0).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_and_padding() {
        assert_eq!(fill_bar(60.0), "[######----]");
        assert_eq!(fill_bar(140.0), "[##########]");
        assert_eq!(pad_left("7", 3), "  7");
        assert_eq!(display_width(&bold("abc")), 3);
    }
}
