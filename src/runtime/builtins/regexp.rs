//! Regular expressions on top of `fancy-regex`.
//!
//! Patterns are translated from the script dialect: `\d`, `\w` and their negations become ASCII classes,
//! `[^]` matches anything, and the `i`/`m`/`s` flags become inline flags. `g` and `y` are handled here
//! through `lastIndex`. Backreferences and lookaround pass through unchanged; lookbehind must have a
//! bounded length. A match that exceeds the backtracking limit is treated as no match.
//!
//! Match positions are reported in Unicode scalars, like string indices.

use std::cell::Cell;
use std::rc::Rc;

use duel_core::errors::ErrorKind;
use duel_core::strings;

use super::{MethodEntry, arg};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::{RegExp, Value};

pub(crate) const METHODS: &[MethodEntry] = &[("test", test, 1), ("exec", exec, 1), ("toString", to_string, 0)];

/// One successful match, in scalar offsets.
pub(crate) struct MatchData {
    pub start: usize,
    pub end: usize,
    /// Group 0 is the whole match; non-participating groups are `None`.
    pub groups: Vec<Option<String>>,
    pub names: Vec<Option<String>>,
}

/// Translate a script pattern into `fancy-regex` syntax.
fn translate(source: &str, flags: &str) -> Result<String, String> {
    let mut seen = String::new();
    for flag in flags.chars() {
        if !"gimsuy".contains(flag) || seen.contains(flag) {
            return Err(format!("Invalid flags supplied to RegExp constructor '{flags}'"));
        }
        seen.push(flag);
    }
    let mut out = String::with_capacity(source.len() + 8);
    for (flag, inline) in [('i', "i"), ('m', "m"), ('s', "s")] {
        if flags.contains(flag) {
            out.push_str("(?");
            out.push_str(inline);
            out.push(')');
        }
    }
    let chars: Vec<char> = source.chars().collect();
    let mut in_class = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                let Some(&next) = chars.get(i + 1) else {
                    return Err("\\ at end of pattern".to_string());
                };
                i += 2;
                match next {
                    'd' if in_class => out.push_str("0-9"),
                    'd' => out.push_str("[0-9]"),
                    'D' if !in_class => out.push_str("[^0-9]"),
                    'w' if in_class => out.push_str("0-9A-Za-z_"),
                    'w' => out.push_str("[0-9A-Za-z_]"),
                    'W' if !in_class => out.push_str("[^0-9A-Za-z_]"),
                    '/' => out.push('/'),
                    '-' => out.push_str("\\-"),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
                continue;
            }
            '[' if !in_class => {
                if chars.get(i + 1) == Some(&'^') && chars.get(i + 2) == Some(&']') {
                    out.push_str("(?s:.)");
                    i += 3;
                    continue;
                }
                in_class = true;
                out.push('[');
                if chars.get(i + 1) == Some(&'^') {
                    out.push('^');
                    i += 1;
                }
                // a leading `]` is literal in the script dialect only when escaped; `[]` never matches
                if chars.get(i + 1) == Some(&']') {
                    out.push_str("^\\s\\S]");
                    in_class = false;
                    i += 2;
                    continue;
                }
            }
            '[' => out.push_str("\\["),
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            '&' | '~' if in_class => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        i += 1;
    }
    Ok(out)
}

/// Build a `RegExp` value, reusing compiled patterns.
pub(crate) fn new_regexp(interp: &mut Interpreter, source: &str, flags: &str) -> Result<Value, Interrupt> {
    let regex = match interp.cached_regex(source, flags) {
        Some(regex) => regex,
        None => {
            let translated = translate(source, flags)
                .map_err(|msg| interp.throw(ErrorKind::SyntaxError, format!("Invalid regular expression: /{source}/: {msg}")))?;
            let regex = fancy_regex::Regex::new(&translated).map_err(|err| {
                let detail = err.to_string();
                let detail = detail.lines().last().unwrap_or("invalid pattern").trim().to_string();
                interp.throw(ErrorKind::SyntaxError, format!("Invalid regular expression: /{source}/: {detail}"))
            })?;
            interp.cache_regex(source, flags, regex.clone());
            regex
        }
    };
    Ok(Value::RegExp(Rc::new(RegExp {
        source: source.to_string(),
        flags: flags.to_string(),
        regex,
        last_index: Cell::new(0),
    })))
}

/// Find the first match at or after scalar offset `from` (exactly at `from` when `sticky`).
pub(crate) fn match_at(re: &RegExp, s: &str, from: usize, sticky: bool) -> Option<MatchData> {
    if from > strings::char_len(s) {
        return None;
    }
    let byte_from = strings::byte_offset(s, from);
    let caps = match re.regex.captures_from_pos(s, byte_from) {
        Ok(caps) => caps?,
        Err(err) => {
            tracing::warn!(source = %re.source, error = %err, "regular expression gave up");
            return None;
        }
    };
    let whole = caps.get(0)?;
    if sticky && whole.start() != byte_from {
        return None;
    }
    let start = from + s[byte_from..whole.start()].chars().count();
    let end = start + whole.as_str().chars().count();
    let groups = caps.iter().map(|g| g.map(|m| m.as_str().to_string())).collect();
    let names = re.regex.capture_names().map(|n| n.map(str::to_string)).collect();
    Some(MatchData {
        start,
        end,
        groups,
        names,
    })
}

/// Every match left to right, advancing past empty matches.
pub(crate) fn match_all(re: &RegExp, s: &str) -> Vec<MatchData> {
    let len = strings::char_len(s);
    let mut out = Vec::new();
    let mut from = 0;
    while from <= len {
        let Some(m) = match_at(re, s, from, false) else { break };
        from = if m.end == m.start { m.end + 1 } else { m.end };
        out.push(m);
    }
    out
}

/// `RegExp.prototype.exec` semantics including `lastIndex` updates.
pub(crate) fn exec_with_state(re: &RegExp, s: &str) -> Option<MatchData> {
    let stateful = re.global() || re.sticky();
    let from = if stateful { re.last_index.get() } else { 0 };
    let found = match_at(re, s, from, re.sticky());
    if stateful {
        re.last_index.set(found.as_ref().map_or(0, |m| m.end));
    }
    found
}

/// The array `exec` and non-global `match` return.
pub(crate) fn match_array(m: &MatchData) -> Value {
    Value::array(
        m.groups
            .iter()
            .map(|g| g.as_deref().map(Value::string).unwrap_or_default())
            .collect(),
    )
}

/// Expand `$$`, `$&`, `` $` ``, `$'`, `$n`, `$nn` and `$<name>` in a replacement template.
/// References to groups that do not exist stay literal.
pub(crate) fn expand_replacement(template: &str, subject: &str, m: &MatchData) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let group_count = m.groups.len().saturating_sub(1);
    while i < chars.len() {
        let c = chars[i];
        if c != '$' || i + 1 >= chars.len() {
            out.push(c);
            i += 1;
            continue;
        }
        match chars[i + 1] {
            '$' => {
                out.push('$');
                i += 2;
            }
            '&' => {
                out.push_str(m.groups[0].as_deref().unwrap_or(""));
                i += 2;
            }
            '`' => {
                out.push_str(&strings::slice_chars(subject, 0, m.start));
                i += 2;
            }
            '\'' => {
                out.push_str(&strings::slice_chars(subject, m.end, usize::MAX));
                i += 2;
            }
            '<' => {
                let close = chars[i + 2..].iter().position(|&c| c == '>');
                match close {
                    Some(len) if m.names.iter().any(Option::is_some) => {
                        let name: String = chars[i + 2..i + 2 + len].iter().collect();
                        if let Some(idx) = m.names.iter().position(|n| n.as_deref() == Some(name.as_str())) {
                            out.push_str(m.groups.get(idx).and_then(|g| g.as_deref()).unwrap_or(""));
                        }
                        i += 3 + len;
                    }
                    _ => {
                        out.push('$');
                        i += 1;
                    }
                }
            }
            d if d.is_ascii_digit() => {
                let one = d.to_digit(10).unwrap_or(0) as usize;
                let two = chars
                    .get(i + 2)
                    .and_then(|c| c.to_digit(10))
                    .map(|d2| one * 10 + d2 as usize)
                    .filter(|&n| n >= 1 && n <= group_count);
                match two {
                    Some(n) => {
                        out.push_str(m.groups[n].as_deref().unwrap_or(""));
                        i += 3;
                    }
                    None if one >= 1 && one <= group_count => {
                        out.push_str(m.groups[one].as_deref().unwrap_or(""));
                        i += 2;
                    }
                    None => {
                        out.push('$');
                        i += 1;
                    }
                }
            }
            _ => {
                out.push('$');
                i += 1;
            }
        }
    }
    out
}

fn this_regexp(interp: &Interpreter, this: &Value, method: &str) -> Result<Rc<RegExp>, Interrupt> {
    match this {
        Value::RegExp(re) => Ok(re.clone()),
        _ => Err(interp.type_error(format!("RegExp.prototype.{method} called on incompatible receiver"))),
    }
}

fn test(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let re = this_regexp(interp, this, "test")?;
    let subject = interp.to_string(&arg(args, 0))?;
    Ok(Value::Bool(exec_with_state(&re, &subject).is_some()))
}

fn exec(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let re = this_regexp(interp, this, "exec")?;
    let subject = interp.to_string(&arg(args, 0))?;
    Ok(exec_with_state(&re, &subject).map(|m| match_array(&m)).unwrap_or(Value::Null))
}

fn to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let re = this_regexp(interp, this, "toString")?;
    Ok(Value::string(format!("/{}/{}", re.source, re.flags)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: &str, flags: &str) -> RegExp {
        let translated = translate(source, flags).unwrap();
        RegExp {
            source: source.to_string(),
            flags: flags.to_string(),
            regex: fancy_regex::Regex::new(&translated).unwrap(),
            last_index: Cell::new(0),
        }
    }

    #[test]
    fn test_translate_classes_and_flags() {
        assert_eq!(translate(r"\d+", "gi").unwrap(), "(?i)[0-9]+");
        assert_eq!(translate(r"[\w-]", "").unwrap(), "[0-9A-Za-z_-]");
        assert_eq!(translate(r"[a\-z]", "").unwrap(), r"[a\-z]");
        assert_eq!(translate(r"a\/b", "").unwrap(), "a/b");
        assert_eq!(translate("[^]", "").unwrap(), "(?s:.)");
        assert_eq!(translate("a(?=b)", "").unwrap(), "a(?=b)");
        assert_eq!(translate(r"(a)\1", "").unwrap(), r"(a)\1");
        assert!(translate("a", "gg").is_err());
    }

    #[test]
    fn test_match_positions_are_scalar_offsets() {
        let re = compile("b", "");
        let m = match_at(&re, "ébb", 0, false).unwrap();
        assert_eq!((m.start, m.end), (1, 2));
        assert!(match_at(&re, "ébb", 0, true).is_none());
    }

    #[test]
    fn test_global_exec_walks_and_resets_last_index() {
        let re = compile("a", "g");
        assert_eq!(exec_with_state(&re, "aXa").map(|m| m.start), Some(0));
        assert_eq!(exec_with_state(&re, "aXa").map(|m| m.start), Some(2));
        assert!(exec_with_state(&re, "aXa").is_none());
        assert_eq!(re.last_index.get(), 0);
    }

    #[test]
    fn test_replacement_expansion() {
        let re = compile("(\\w)(\\d)", "");
        let m = match_at(&re, "xa1y", 0, false).unwrap();
        assert_eq!(expand_replacement("[$2$1|$&|$`|$'|$$|$3]", "xa1y", &m), "[1a|a1|x|y|$|$3]");
    }

    #[test]
    fn test_match_all_advances_over_empty_matches() {
        let re = compile("x*", "g");
        assert_eq!(match_all(&re, "ab").len(), 3);
    }

    #[test]
    fn test_lookaround_and_backreferences() {
        let re = compile(r"(\w)\1", "");
        let m = match_at(&re, "abccd", 0, false).unwrap();
        assert_eq!((m.start, m.end), (2, 4));
        let re = compile(r"\d+(?=px)", "");
        assert_eq!(match_at(&re, "5em 12px", 0, false).unwrap().groups[0].as_deref(), Some("12"));
        let re = compile(r"(?<!\$)\b\d+", "g");
        assert_eq!(match_all(&re, "$5 and 7").len(), 1);
        let re = compile(r"(?<year>\d{4})", "");
        let m = match_at(&re, "in 2024", 0, false).unwrap();
        assert_eq!(expand_replacement("<$<year>>", "in 2024", &m), "<2024>");
    }
}
