//! Compact formatting of scattering values and length batches.
//!
//! Values with magnitude above `1e-4` are rounded to five decimals; smaller
//! values are printed as-is so they do not collapse to zero.

use num_complex::Complex64;

use crate::stype::SDict;

/// Threshold above which values are rounded.
pub const ROUNDING_THRESHOLD: f64 = 1e-4;

/// Decimal places kept when rounding.
pub const DECIMALS: i32 = 5;

fn round(value: f64) -> f64 {
    if value.abs() > ROUNDING_THRESHOLD {
        let scale = 10f64.powi(DECIMALS);
        (value * scale).round() / scale
    } else {
        value
    }
}

/// Format a real value.
pub fn format_real(value: f64) -> String {
    format!("{:?}", round(value))
}

/// Format a complex value as `re+imj`.
pub fn format_complex(value: Complex64) -> String {
    let (re, im) = (round(value.re), round(value.im));
    let sign = if im.is_sign_negative() { '-' } else { '+' };
    format!("{:?}{}{:?}j", re, sign, im.abs())
}

/// Format a batch of reals as `[a, b, ...]`.
pub fn format_reals(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|&v| format_real(v)).collect();
    format!("[{}]", items.join(", "))
}

/// Format a batch of complex values; a batch of one prints bare.
pub fn format_batch(values: &[Complex64]) -> String {
    match values {
        [single] => format_complex(*single),
        _ => {
            let items: Vec<String> = values.iter().map(|&v| format_complex(v)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

/// One `p1 -> p2: value` line per entry.
pub fn format_sdict(sdict: &SDict) -> String {
    sdict
        .iter()
        .map(|((p1, p2), value)| format!("{p1} -> {p2}: {}", format_batch(value)))
        .collect::<Vec<_>>()
        .join("\n")
}
