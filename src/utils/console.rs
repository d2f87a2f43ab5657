// src/utils/console.rs

//! User-facing console output with server-style formatting.
//!
//! Diagnostics go through the `log` facade; this module prints the views
//! themselves (headers, summaries, progress) to stdout.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress all console output (used by `--quiet`).
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn enabled() -> bool {
    !QUIET.load(Ordering::Relaxed)
}

/// Print a success line.
pub fn success(message: &str) {
    if enabled() {
        println!("[{}] ✓ {}", Local::now().format("%H:%M:%S"), message);
    }
}

/// Print a failure line.
pub fn failure(message: &str) {
    if enabled() {
        println!("[{}] ✗ {}", Local::now().format("%H:%M:%S"), message);
    }
}

/// Rewrite the current line with a progress message.
pub fn progress(message: &str) {
    if enabled() {
        print!(
            "\r[{}] [PROG] {:<60}",
            Local::now().format("%H:%M:%S"),
            message
        );
        let _ = std::io::stdout().flush();
    }
}

/// Terminate a progress line.
pub fn end_progress() {
    if enabled() {
        println!();
    }
}

/// Print a header block.
pub fn header(title: &str) {
    if enabled() {
        println!();
        println!("{}", "═".repeat(60));
        println!("  {}", title);
        println!("{}", "═".repeat(60));
    }
}

/// Print a block of pre-rendered lines.
pub fn block(text: &str) {
    if enabled() {
        for line in text.lines() {
            println!("  {}", line);
        }
    }
}

/// Print a summary section.
pub fn summary(title: &str, items: &[(&str, String)]) {
    if enabled() {
        println!();
        println!("[{}] [SUMMARY] {}", Local::now().format("%H:%M:%S"), title);
        for (key, value) in items {
            println!("    {}: {}", key, value);
        }
    }
}
