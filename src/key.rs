//! Key and value rendering for the benchmark keyspace.
//!
//! Index `i` maps to `KEY` followed by `i + 1` zero-padded to seven digits.
//! Seven is a minimum width: `i + 1` with more digits is written in full.

pub const KEY_PREFIX: &str = "KEY";
pub const VALUE_PREFIX: &str = "VALUE:";

/// Minimum width of the numeric suffix.
pub const DIGITS: usize = 7;

// u128::MAX has 39 decimal digits.
const MAX_DIGITS: usize = 39;

/// Renders the key for a zero-based index: `format_key(0) == "KEY0000001"`.
pub fn format_key(index: usize) -> String {
    render(KEY_PREFIX, index)
}

/// Renders the value stored under `format_key(index)`.
pub fn format_value(index: usize) -> String {
    render(VALUE_PREFIX, index)
}

fn render(prefix: &str, index: usize) -> String {
    let mut n = index as u128 + 1;
    let mut digits = [0u8; MAX_DIGITS];
    let mut pos = MAX_DIGITS;
    loop {
        pos -= 1;
        digits[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    let width = MAX_DIGITS - pos;

    let mut out = String::with_capacity(prefix.len() + width.max(DIGITS));
    out.push_str(prefix);
    for _ in width..DIGITS {
        out.push('0');
    }
    out.extend(digits[pos..].iter().map(|&d| d as char));
    out
}
