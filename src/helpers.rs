// Helper utilities for sample-packages
// SPDX-License-Identifier: GPL-3.0-or-later

/// Megabytes per gigabyte
pub const MB_PER_GB: u64 = 1024;

/// Render a float with its shortest round-trip decimal, keeping one
/// fractional digit for whole numbers ("1.0", "0.25", "16.0").
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Render a size for humans: whole numbers without a decimal point
/// ("4"), anything else at full precision ("0.25").
pub fn format_size(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Convert megabytes to gigabytes without losing the fractional part
pub fn mb_to_gb(mb: u64) -> f64 {
    mb as f64 / MB_PER_GB as f64
}

// Logging macros. Everything goes to stderr, stdout is reserved for the
// generated document.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        eprintln!("INFO: {}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!("WARN: {}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!("ERRO: {}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if std::env::var("DEBUG").is_ok() {
            eprintln!("DEBUG: {}", format!($($arg)*))
        }
    };
}
