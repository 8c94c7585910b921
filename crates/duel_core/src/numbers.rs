//! Define shared number semantics (conversion + formatting).
//!
//! The script language has a single number type (IEEE-754 `f64`). This module holds the pure conversions the
//! runtime needs: number-to-string formatting, string-to-number parsing, integer coercions for bitwise operators,
//! and the rounding rules of the `Math`/`Number` builtins.
//!
//! ## Notes
//! - Formatting follows the shortest round-trip digit string (what Rust's `{:e}` produces) laid out with the script
//!   language's rules: plain notation for decimal exponents in `-6..21`, exponent notation with an explicit sign
//!   otherwise.

/// Format a number the way string conversion and template literals do.
///
/// ## Examples
/// ```rust
/// use duel_core::numbers::to_display;
///
/// assert_eq!(to_display(5.0), "5");
/// assert_eq!(to_display(-0.0), "0");
/// assert_eq!(to_display(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(to_display(1e21), "1e+21");
/// assert_eq!(to_display(1.5e-7), "1.5e-7");
/// assert_eq!(to_display(f64::NAN), "NaN");
/// ```
pub fn to_display(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let (digits, exp) = shortest_digits(n.abs());
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let point = exp + 1;

    let body = if k <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let e = point - 1;
        let e_sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{e_sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{e_sign}{}", e.abs())
        }
    };
    format!("{sign}{body}")
}

/// Split a positive finite number into its shortest significant digits and decimal exponent.
fn shortest_digits(n: f64) -> (String, i32) {
    let formatted = format!("{n:e}");
    let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    (digits.to_string(), exp)
}

/// Format a number in the given radix (`Number.prototype.toString(radix)`).
///
/// ## Notes
/// - Radix 10 delegates to [`to_display`]. Fractions are emitted to at most 20 digits.
///
/// ## Examples
/// ```rust
/// use duel_core::numbers::to_radix_string;
///
/// assert_eq!(to_radix_string(255.0, 16), "ff");
/// assert_eq!(to_radix_string(-5.0, 2), "-101");
/// assert_eq!(to_radix_string(0.5, 2), "0.1");
/// ```
pub fn to_radix_string(n: f64, radix: u32) -> String {
    if radix == 10 || !n.is_finite() {
        return to_display(n);
    }
    let sign = if n < 0.0 { "-" } else { "" };
    let n = n.abs();
    let mut int = n.trunc();
    let mut frac = n - int;

    let mut int_digits = Vec::new();
    if int == 0.0 {
        int_digits.push('0');
    }
    while int >= 1.0 {
        let d = (int % radix as f64) as u32;
        int_digits.push(std::char::from_digit(d, radix).unwrap_or('0'));
        int = (int / radix as f64).trunc();
    }
    int_digits.reverse();
    let mut out: String = int_digits.into_iter().collect();

    if frac > 0.0 {
        out.push('.');
        for _ in 0..20 {
            frac *= radix as f64;
            let d = frac.trunc() as u32;
            out.push(std::char::from_digit(d, radix).unwrap_or('0'));
            frac -= d as f64;
            if frac == 0.0 {
                break;
            }
        }
    }
    format!("{sign}{out}")
}

/// Format with a fixed number of fraction digits (`Number.prototype.toFixed`).
///
/// ## Notes
/// - Rounding works on the exact binary value, so `1.45` (stored as `1.4499999…`) rounds down.
/// - Only exact ties round away from zero (`(2.5).toFixed(0) === "3"`).
/// - A negative value that rounds to zero keeps its sign; `-0` does not.
///
/// ## Examples
/// ```rust
/// use duel_core::numbers::to_fixed;
///
/// assert_eq!(to_fixed(3.14159, 2), "3.14");
/// assert_eq!(to_fixed(2.5, 0), "3");
/// assert_eq!(to_fixed(1.005, 2), "1.00");
/// assert_eq!(to_fixed(1.45, 1), "1.4");
/// assert_eq!(to_fixed(0.125, 2), "0.13");
/// ```
pub fn to_fixed(n: f64, digits: usize) -> String {
    if !n.is_finite() || n.abs() >= 1e21 {
        return to_display(n);
    }
    let abs = n.abs();
    let body = if is_exact_tie(abs, digits) {
        // The expansion ends exactly at the `5` one place past `digits`.
        let mut text = format!("{:.*}", digits + 1, abs);
        text.pop();
        if text.ends_with('.') {
            text.pop();
        }
        increment_decimal(&text)
    } else {
        format!("{abs:.digits$}")
    };
    if n < 0.0 { format!("-{body}") } else { body }
}

/// `x * 10^digits` is exactly an odd multiple of one half.
///
/// With `x = m * 2^e` and `m` odd, `2 * x * 10^digits = m * 5^digits * 2^(e + 1 + digits)`, which is an
/// odd integer exactly when `e == -(digits + 1)`.
fn is_exact_tie(x: f64, digits: usize) -> bool {
    if x == 0.0 {
        return false;
    }
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 { (fraction, -1074) } else { (fraction | (1u64 << 52), biased - 1075) };
    let exponent = exponent + i64::from(mantissa.trailing_zeros());
    exponent == -(digits as i64 + 1)
}

/// Add one unit in the last place of a non-negative decimal string (`"1.29"` -> `"1.30"`).
fn increment_decimal(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            '.' => continue,
            '9' => *c = '0',
            d => {
                *c = char::from_digit(d.to_digit(10).unwrap_or(0) + 1, 10).unwrap_or('0');
                return chars.into_iter().collect();
            }
        }
    }
    let mut out = String::from("1");
    out.extend(chars);
    out
}

/// Convert a string to a number (`Number("...")`, unary `+`, loose comparisons).
///
/// ## Returns
/// - The parsed value; `NaN` when the trimmed text is not a complete numeric literal. Empty text yields `0`.
///
/// ## Examples
/// ```rust
/// use duel_core::numbers::string_to_number;
///
/// assert_eq!(string_to_number("  42 "), 42.0);
/// assert_eq!(string_to_number(""), 0.0);
/// assert_eq!(string_to_number("0x1f"), 31.0);
/// assert!(string_to_number("12px").is_nan());
/// assert!(string_to_number("inf").is_nan());
/// ```
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(rest) = t.strip_prefix(prefix) {
            return parse_radix_digits(rest, radix).unwrap_or(f64::NAN);
        }
    }
    let valid = t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !valid {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a complete digit string in `radix`; `None` if empty or any digit is invalid.
fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

/// `parseFloat`: parse the longest leading decimal literal, ignoring trailing garbage.
///
/// ## Examples
/// ```rust
/// use duel_core::numbers::parse_float;
///
/// assert_eq!(parse_float("3.5kg"), 3.5);
/// assert_eq!(parse_float("  -1e3x"), -1000.0);
/// assert!(parse_float("abc").is_nan());
/// ```
pub fn parse_float(s: &str) -> f64 {
    let t = s.trim_start();
    let unsigned = t.trim_start_matches(['+', '-']);
    if unsigned.starts_with("Infinity") {
        return if t.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let bytes = t.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut saw_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        saw_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return f64::NAN;
    }
    // Only consume an exponent if it has digits.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    t[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// `parseInt`: parse a leading integer in `radix` (auto-detecting `0x` when no radix is given).
///
/// ## Examples
/// ```rust
/// use duel_core::numbers::parse_int;
///
/// assert_eq!(parse_int("42px", None), 42.0);
/// assert_eq!(parse_int("-0x1A", None), -26.0);
/// assert_eq!(parse_int("101", Some(2)), 5.0);
/// assert!(parse_int("z", Some(10)).is_nan());
/// assert!(parse_int("1", Some(1)).is_nan());
/// ```
pub fn parse_int(s: &str, radix: Option<u32>) -> f64 {
    let mut t = s.trim_start();
    let mut sign = 1.0;
    if let Some(rest) = t.strip_prefix('-') {
        sign = -1.0;
        t = rest;
    } else if let Some(rest) = t.strip_prefix('+') {
        t = rest;
    }

    let mut radix = radix.unwrap_or(0);
    if radix != 0 && !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    let has_hex_prefix = t.starts_with("0x") || t.starts_with("0X");
    if (radix == 0 || radix == 16) && has_hex_prefix {
        t = &t[2..];
        radix = 16;
    }
    if radix == 0 {
        radix = 10;
    }

    let mut value = 0.0f64;
    let mut any = false;
    for c in t.chars() {
        match c.to_digit(radix) {
            Some(d) => {
                value = value * radix as f64 + d as f64;
                any = true;
            }
            None => break,
        }
    }
    if any { sign * value } else { f64::NAN }
}

/// ToInt32 for bitwise operators.
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// ToUint32 for `>>>`.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let m = n.trunc().rem_euclid(4_294_967_296.0);
    m as u32
}

/// `Math.round`: round half up (toward positive infinity), preserving `NaN` and infinities.
///
/// ## Examples
/// ```rust
/// use duel_core::numbers::round_half_up;
///
/// assert_eq!(round_half_up(2.5), 3.0);
/// assert_eq!(round_half_up(-2.5), -2.0);
/// assert_eq!(round_half_up(-2.6), -3.0);
/// ```
pub fn round_half_up(n: f64) -> f64 {
    if !n.is_finite() || n.fract() == 0.0 {
        return n;
    }
    (n + 0.5).floor()
}

/// Return `true` if `n` is an integer that can be used as an array index.
pub fn as_index(n: f64) -> Option<usize> {
    if n >= 0.0 && n.fract() == 0.0 && n < 4_294_967_295.0 {
        Some(n as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_display_integers_and_fractions() {
        assert_eq!(to_display(42.0), "42");
        assert_eq!(to_display(-3.25), "-3.25");
        assert_eq!(to_display(1e20), "100000000000000000000");
        assert_eq!(to_display(0.000001), "0.000001");
        assert_eq!(to_display(0.0000001), "1e-7");
        assert_eq!(to_display(123456789.125), "123456789.125");
        assert_eq!(to_display(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_string_to_number_forms() {
        assert_eq!(string_to_number("1e3"), 1000.0);
        assert_eq!(string_to_number(".5"), 0.5);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("0x").is_nan());
        assert!(string_to_number("1 2").is_nan());
    }

    #[test]
    fn test_int32_wrapping() {
        assert_eq!(to_int32(4_294_967_296.0 + 5.0), 5);
        assert_eq!(to_int32(2_147_483_648.0), i32::MIN);
        assert_eq!(to_int32(-1.0), -1);
        assert_eq!(to_uint32(-1.0), u32::MAX);
        assert_eq!(to_int32(f64::NAN), 0);
    }

    #[test]
    fn test_to_fixed_negative_zero() {
        assert_eq!(to_fixed(-0.0, 2), "0.00");
        assert_eq!(to_fixed(-0.0001, 2), "-0.00");
        assert_eq!(to_fixed(-1.5, 1), "-1.5");
    }

    #[test]
    fn test_to_fixed_rounds_the_stored_value() {
        assert_eq!(to_fixed(1.45, 1), "1.4");
        assert_eq!(to_fixed(1.55, 1), "1.6");
        assert_eq!(to_fixed(8.345, 2), "8.35");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(9.95, 1), "9.9");
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(0.375, 2), "0.38");
        assert_eq!(to_fixed(10.0, 3), "10.000");
    }

    #[test]
    fn test_as_index() {
        assert_eq!(as_index(3.0), Some(3));
        assert_eq!(as_index(-1.0), None);
        assert_eq!(as_index(1.5), None);
    }
}
