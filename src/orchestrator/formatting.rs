//! Number formatting for assistant responses.
//!
//! Amounts are plain `f64` figures in the books' currency. Rounding is
//! half-up everywhere so that 0.5 of a unit always rounds toward the larger
//! figure.

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;

/// Round to `decimals` places, ties toward positive infinity.
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}

/// Fixed-point rendering after half-up rounding: `fixed(1.25, 1)` is "1.3".
pub fn fixed(value: f64, decimals: u32) -> String {
    format!("{:.*}", decimals as usize, round_half_up(value, decimals))
}

/// Figure in thousands without the suffix: `thousands(850_000.0, 0)` is "850".
pub fn thousands(value: f64, decimals: u32) -> String {
    fixed(value / THOUSAND, decimals)
}

/// Figure in millions without the suffix: `millions(3_931_000.0, 1)` is "3.9".
pub fn millions(value: f64, decimals: u32) -> String {
    fixed(value / MILLION, decimals)
}

/// `numerator / denominator`, or 0 when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `part` as a whole percentage of `total`; 0 when `total` is zero.
pub fn percent_of(part: f64, total: f64) -> i64 {
    round_half_up(ratio(part, total) * 100.0, 0) as i64
}

/// Digit-grouped amount with up to three fraction digits: 26500 -> "26,500".
pub fn grouped(value: f64) -> String {
    let rounded = round_half_up(value.abs(), 3);
    let mut text = format!("{:.3}", rounded);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }

    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut out = String::with_capacity(integer.len() + integer.len() / 3 + 4);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(&fraction);
    }
    if value < 0.0 && out != "0" {
        out.insert(0, '-');
    }
    out
}
