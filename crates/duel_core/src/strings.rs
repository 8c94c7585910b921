//! Define shared string semantics (policy + pure helpers).
//!
//! The runtime's string methods delegate here so indexing and slicing rules are implemented exactly once.
//!
//! ## Notes
//! - **Indexing model**: Unicode scalar indexing (Rust `char`), not bytes and not UTF-16 code units. Scripts that
//!   only use BMP characters observe the same indices as a browser would.
//! - **Relative indices**: `slice`-style helpers accept negative offsets counted from the end and clamp out-of-range
//!   values, matching the script language's `slice`/`substring` behaviour.
//! - Offsets arrive as `f64` because that is the only number type evaluated code has.

/// Number of Unicode scalars in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a script number to an integer offset, mapping `NaN` to zero.
fn integer_offset(idx: f64) -> f64 {
    if idx.is_nan() { 0.0 } else { idx.trunc() }
}

/// Resolve a `slice`-style index: negative values count back from `len`; the result is clamped to `0..=len`.
///
/// ## Examples
/// ```rust
/// use duel_core::strings::relative_index;
///
/// assert_eq!(relative_index(5, -2.0), 3);
/// assert_eq!(relative_index(5, 9.0), 5);
/// assert_eq!(relative_index(5, f64::NAN), 0);
/// ```
pub fn relative_index(len: usize, idx: f64) -> usize {
    let idx = integer_offset(idx);
    let len_f = len as f64;
    if idx < 0.0 {
        (len_f + idx).max(0.0) as usize
    } else {
        idx.min(len_f) as usize
    }
}

/// Resolve a `substring`-style index: negative values clamp to zero; the result is clamped to `0..=len`.
pub fn clamp_index(len: usize, idx: f64) -> usize {
    integer_offset(idx).clamp(0.0, len as f64) as usize
}

/// Return the scalar at `idx`, if in range.
pub fn char_at(s: &str, idx: usize) -> Option<char> {
    s.chars().nth(idx)
}

/// Return the scalars in `start..end` as a new string. An empty string is returned when `start >= end`.
pub fn slice_chars(s: &str, start: usize, end: usize) -> String {
    if start >= end {
        return String::new();
    }
    s.chars().skip(start).take(end - start).collect()
}

/// Find the first occurrence of `needle` at or after scalar offset `from`.
///
/// ## Returns
/// - `Some(index)` in scalar units, or `None` if there is no match.
///
/// ## Examples
/// ```rust
/// use duel_core::strings::index_of;
///
/// assert_eq!(index_of("hello", "l", 0), Some(2));
/// assert_eq!(index_of("hello", "l", 3), Some(3));
/// assert_eq!(index_of("héllo", "llo", 0), Some(2));
/// assert_eq!(index_of("hello", "", 9), Some(5));
/// ```
pub fn index_of(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let len = char_len(haystack);
    let from = from.min(len);
    let byte_start = byte_offset(haystack, from);
    haystack[byte_start..]
        .find(needle)
        .map(|b| from + haystack[byte_start..byte_start + b].chars().count())
}

/// Find the last occurrence of `needle` starting at or before scalar offset `from` (default: end of string).
pub fn last_index_of(haystack: &str, needle: &str, from: Option<usize>) -> Option<usize> {
    let len = char_len(haystack);
    let needle_len = char_len(needle);
    let from = from.unwrap_or(len).min(len);
    // The match may start at `from` and extend past it.
    let limit = (from + needle_len).min(len);
    let byte_limit = byte_offset(haystack, limit);
    haystack[..byte_limit]
        .rfind(needle)
        .map(|b| haystack[..b].chars().count())
}

/// Convert a scalar offset to a byte offset (clamped to the string length).
pub fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(b, _)| b).unwrap_or(s.len())
}

/// Pad `s` to `target_len` scalars by repeating `fill` at the start or end.
///
/// ## Notes
/// - An empty `fill` or a `target_len` not exceeding the current length returns `s` unchanged.
///
/// ## Examples
/// ```rust
/// use duel_core::strings::pad;
///
/// assert_eq!(pad("5", 3, "0", true), "005");
/// assert_eq!(pad("ab", 5, "xy", false), "abxyx");
/// ```
pub fn pad(s: &str, target_len: usize, fill: &str, at_start: bool) -> String {
    let len = char_len(s);
    if target_len <= len || fill.is_empty() {
        return s.to_string();
    }
    let padding: String = fill.chars().cycle().take(target_len - len).collect();
    if at_start {
        format!("{padding}{s}")
    } else {
        format!("{s}{padding}")
    }
}

/// Split `s` on `sep` (scalar-wise for an empty separator), keeping at most `limit` pieces.
///
/// ## Examples
/// ```rust
/// use duel_core::strings::split;
///
/// assert_eq!(split("a,b,c", ",", None), vec!["a", "b", "c"]);
/// assert_eq!(split("abc", "", Some(2)), vec!["a", "b"]);
/// assert_eq!(split("", ",", None), vec![""]);
/// ```
pub fn split(s: &str, sep: &str, limit: Option<usize>) -> Vec<String> {
    let limit = limit.unwrap_or(usize::MAX);
    if sep.is_empty() {
        return s.chars().take(limit).map(String::from).collect();
    }
    s.split(sep).take(limit).map(String::from).collect()
}

/// Repeat `s` `count` times, refusing results longer than `max_len` scalars.
pub fn repeat(s: &str, count: usize, max_len: usize) -> Option<String> {
    let total = char_len(s).checked_mul(count)?;
    if total > max_len {
        return None;
    }
    Some(s.repeat(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_index_negative_and_clamped() {
        assert_eq!(relative_index(4, -1.0), 3);
        assert_eq!(relative_index(4, -10.0), 0);
        assert_eq!(relative_index(4, 2.7), 2);
        assert_eq!(relative_index(4, f64::INFINITY), 4);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(4, -3.0), 0);
        assert_eq!(clamp_index(4, 10.0), 4);
    }

    #[test]
    fn test_slice_chars_unicode() {
        assert_eq!(slice_chars("héllo", 1, 3), "él");
        assert_eq!(slice_chars("abc", 2, 1), "");
    }

    #[test]
    fn test_last_index_of() {
        assert_eq!(last_index_of("canal", "a", None), Some(3));
        assert_eq!(last_index_of("canal", "a", Some(2)), Some(1));
        assert_eq!(last_index_of("canal", "z", None), None);
    }

    #[test]
    fn test_repeat_cap() {
        assert_eq!(repeat("ab", 3, 100).as_deref(), Some("ababab"));
        assert!(repeat("ab", 3, 5).is_none());
    }
}
