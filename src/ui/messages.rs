//! User-facing console messages.
//!
//! Diagnostics go through `tracing`; these helpers are for what the user
//! asked to see. `set_quiet(true)` silences everything but errors.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn info<T: fmt::Display>(msg: T) {
    if !quiet() {
        println!("{FG_BLUE}{BOLD}{ICON_INFO} {RESET}{msg}");
    }
}

pub fn success<T: fmt::Display>(msg: T) {
    if !quiet() {
        println!("{FG_GREEN}{BOLD}{ICON_OK} {RESET}{msg}");
    }
}

pub fn warning<T: fmt::Display>(msg: T) {
    if !quiet() {
        println!("{FG_YELLOW}{BOLD}{ICON_WARN} {RESET}{msg}");
    }
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{FG_RED}{BOLD}{ICON_ERR} {RESET}{msg}");
}

/// Section header above a table or a detail card.
pub fn header<T: fmt::Display>(msg: T) {
    if !quiet() {
        println!("{FG_BLUE}{BOLD}== {msg} =={RESET}\n");
    }
}
