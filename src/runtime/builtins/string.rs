//! `String` and the methods of string primitives.
//!
//! Indices are Unicode scalar offsets (see [`duel_core::strings`]).

use std::rc::Rc;

use duel_core::errors::INVALID_STRING_LENGTH_MSG;
use duel_core::strings;

use super::regexp::{self, MatchData};
use super::{MethodEntry, arg};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::{Function, RegExp, Value};

pub(crate) const METHODS: &[MethodEntry] = &[
    ("charAt", char_at, 1),
    ("charCodeAt", char_code_at, 1),
    ("codePointAt", code_point_at, 1),
    ("at", at, 1),
    ("indexOf", index_of, 1),
    ("lastIndexOf", last_index_of, 1),
    ("includes", includes, 1),
    ("startsWith", starts_with, 1),
    ("endsWith", ends_with, 1),
    ("slice", slice, 2),
    ("substring", substring, 2),
    ("substr", substr, 2),
    ("toUpperCase", to_upper_case, 0),
    ("toLowerCase", to_lower_case, 0),
    ("toLocaleUpperCase", to_upper_case, 0),
    ("toLocaleLowerCase", to_lower_case, 0),
    ("trim", trim, 0),
    ("trimStart", trim_start, 0),
    ("trimEnd", trim_end, 0),
    ("padStart", pad_start, 2),
    ("padEnd", pad_end, 2),
    ("repeat", repeat, 1),
    ("split", split, 2),
    ("replace", replace, 2),
    ("replaceAll", replace_all, 2),
    ("match", match_, 1),
    ("matchAll", match_all, 1),
    ("search", search, 1),
    ("concat", concat, 1),
    ("localeCompare", locale_compare, 1),
    ("normalize", to_string, 0),
    ("toString", to_string, 0),
    ("valueOf", to_string, 0),
];

const STATICS: &[MethodEntry] = &[("fromCharCode", from_char_code, 1), ("fromCodePoint", from_code_point, 1)];

pub(crate) fn constructor() -> Value {
    let ctor = Function::constructor("String", string_call, string_call, 1);
    let ctor = STATICS
        .iter()
        .fold(ctor, |f, &(name, func, arity)| f.with_prop(name, Value::native(name, func, arity)));
    Value::function(ctor)
}

fn string_call(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    match args.first() {
        None => Ok(Value::string("")),
        Some(value) => Ok(Value::String(interp.to_string(value)?)),
    }
}

fn from_char_code(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut units = Vec::with_capacity(args.len());
    for value in args {
        units.push((duel_core::numbers::to_uint32(interp.to_number(value)?) & 0xFFFF) as u16);
    }
    Ok(Value::string(String::from_utf16_lossy(&units)))
}

fn from_code_point(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut out = String::new();
    for value in args {
        let n = interp.to_number(value)?;
        let c = (n.fract() == 0.0 && n >= 0.0).then(|| char::from_u32(n as u32)).flatten();
        match c {
            Some(c) => out.push(c),
            None => return Err(interp.range_error(format!("Invalid code point {}", duel_core::numbers::to_display(n)))),
        }
    }
    Ok(Value::string(out))
}

/// The receiver as a string; `null`/`undefined` receivers are a `TypeError`.
fn this_str(interp: &mut Interpreter, this: &Value, method: &str) -> Result<Rc<str>, Interrupt> {
    if this.is_nullish() {
        return Err(interp.type_error(format!("String.prototype.{method} called on null or undefined")));
    }
    interp.to_string(this)
}

fn str_arg(interp: &mut Interpreter, args: &[Value], i: usize) -> Result<Rc<str>, Interrupt> {
    interp.to_string(&arg(args, i))
}

fn to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::String(this_str(interp, this, "toString")?))
}

fn char_at(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "charAt")?;
    let idx = interp.to_integer(&arg(args, 0))?;
    let c = (idx >= 0.0).then(|| strings::char_at(&s, idx as usize)).flatten();
    Ok(Value::string(c.map(String::from).unwrap_or_default()))
}

/// UTF-16 unit for BMP scalars; the lead surrogate for astral ones.
fn char_code_at(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "charCodeAt")?;
    let idx = interp.to_integer(&arg(args, 0))?;
    let c = (idx >= 0.0).then(|| strings::char_at(&s, idx as usize)).flatten();
    Ok(Value::Number(match c {
        Some(c) => {
            let mut buf = [0u16; 2];
            f64::from(c.encode_utf16(&mut buf)[0])
        }
        None => f64::NAN,
    }))
}

fn code_point_at(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "codePointAt")?;
    let idx = interp.to_integer(&arg(args, 0))?;
    let c = (idx >= 0.0).then(|| strings::char_at(&s, idx as usize)).flatten();
    Ok(c.map(|c| Value::Number(f64::from(u32::from(c)))).unwrap_or_default())
}

fn at(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "at")?;
    let idx = interp.to_integer(&arg(args, 0))?;
    let len = strings::char_len(&s) as f64;
    let idx = if idx < 0.0 { len + idx } else { idx };
    if idx < 0.0 || idx >= len {
        return Ok(Value::Undefined);
    }
    Ok(strings::char_at(&s, idx as usize).map(|c| Value::string(String::from(c))).unwrap_or_default())
}

fn index_of(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "indexOf")?;
    let needle = str_arg(interp, args, 0)?;
    let from = interp.to_integer(&arg(args, 1))?;
    let from = strings::clamp_index(strings::char_len(&s), from);
    Ok(Value::Number(strings::index_of(&s, &needle, from).map_or(-1.0, |i| i as f64)))
}

fn last_index_of(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "lastIndexOf")?;
    let needle = str_arg(interp, args, 0)?;
    let from = match arg(args, 1) {
        Value::Undefined => None,
        other => {
            let n = interp.to_number(&other)?;
            if n.is_nan() { None } else { Some(strings::clamp_index(strings::char_len(&s), n)) }
        }
    };
    Ok(Value::Number(strings::last_index_of(&s, &needle, from).map_or(-1.0, |i| i as f64)))
}

fn reject_regexp(interp: &Interpreter, value: &Value, method: &str) -> Result<(), Interrupt> {
    if let Value::RegExp(_) = value {
        return Err(interp.type_error(format!(
            "First argument to String.prototype.{method} must not be a regular expression"
        )));
    }
    Ok(())
}

fn includes(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "includes")?;
    reject_regexp(interp, &arg(args, 0), "includes")?;
    let needle = str_arg(interp, args, 0)?;
    let from = interp.to_integer(&arg(args, 1))?;
    let from = strings::clamp_index(strings::char_len(&s), from);
    Ok(Value::Bool(strings::index_of(&s, &needle, from).is_some()))
}

fn starts_with(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "startsWith")?;
    reject_regexp(interp, &arg(args, 0), "startsWith")?;
    let needle = str_arg(interp, args, 0)?;
    let from = interp.to_integer(&arg(args, 1))?;
    let from = strings::clamp_index(strings::char_len(&s), from);
    Ok(Value::Bool(s[strings::byte_offset(&s, from)..].starts_with(needle.as_ref())))
}

fn ends_with(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "endsWith")?;
    reject_regexp(interp, &arg(args, 0), "endsWith")?;
    let needle = str_arg(interp, args, 0)?;
    let len = strings::char_len(&s);
    let end = match arg(args, 1) {
        Value::Undefined => len,
        other => {
            let n = interp.to_integer(&other)?;
            strings::clamp_index(len, n)
        }
    };
    Ok(Value::Bool(s[..strings::byte_offset(&s, end)].ends_with(needle.as_ref())))
}

fn slice(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "slice")?;
    let len = strings::char_len(&s);
    let start = strings::relative_index(len, interp.to_integer(&arg(args, 0))?);
    let end = match arg(args, 1) {
        Value::Undefined => len,
        other => {
            let n = interp.to_integer(&other)?;
            strings::relative_index(len, n)
        }
    };
    Ok(Value::string(strings::slice_chars(&s, start, end)))
}

fn substring(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "substring")?;
    let len = strings::char_len(&s);
    let start = strings::clamp_index(len, interp.to_integer(&arg(args, 0))?);
    let end = match arg(args, 1) {
        Value::Undefined => len,
        other => {
            let n = interp.to_integer(&other)?;
            strings::clamp_index(len, n)
        }
    };
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    Ok(Value::string(strings::slice_chars(&s, start, end)))
}

fn substr(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "substr")?;
    let len = strings::char_len(&s);
    let start = strings::relative_index(len, interp.to_integer(&arg(args, 0))?);
    let count = match arg(args, 1) {
        Value::Undefined => len,
        other => {
            let n = interp.to_integer(&other)?;
            n.clamp(0.0, len as f64) as usize
        }
    };
    Ok(Value::string(strings::slice_chars(&s, start, start.saturating_add(count).min(len))))
}

fn to_upper_case(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::string(this_str(interp, this, "toUpperCase")?.to_uppercase()))
}

fn to_lower_case(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::string(this_str(interp, this, "toLowerCase")?.to_lowercase()))
}

fn trim(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::string(this_str(interp, this, "trim")?.trim()))
}

fn trim_start(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::string(this_str(interp, this, "trimStart")?.trim_start()))
}

fn trim_end(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::string(this_str(interp, this, "trimEnd")?.trim_end()))
}

fn pad(interp: &mut Interpreter, this: &Value, args: &[Value], at_start: bool) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, if at_start { "padStart" } else { "padEnd" })?;
    let target = interp.to_integer(&arg(args, 0))?.max(0.0);
    if target > interp.limits().max_collection_len as f64 {
        return Err(interp.range_error(INVALID_STRING_LENGTH_MSG));
    }
    let fill = match arg(args, 1) {
        Value::Undefined => Rc::from(" "),
        other => interp.to_string(&other)?,
    };
    Ok(Value::string(strings::pad(&s, target as usize, &fill, at_start)))
}

fn pad_start(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    pad(interp, this, args, true)
}

fn pad_end(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    pad(interp, this, args, false)
}

fn repeat(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "repeat")?;
    let count = interp.to_integer(&arg(args, 0))?;
    if count < 0.0 || count.is_infinite() {
        return Err(interp.range_error(format!("Invalid count value: {}", duel_core::numbers::to_display(count))));
    }
    match strings::repeat(&s, count as usize, interp.limits().max_collection_len) {
        Some(out) => Ok(Value::string(out)),
        None => Err(interp.range_error(INVALID_STRING_LENGTH_MSG)),
    }
}

fn split(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "split")?;
    let limit = match arg(args, 1) {
        Value::Undefined => None,
        other => Some(duel_core::numbers::to_uint32(interp.to_number(&other)?) as usize),
    };
    let pieces: Vec<Value> = match arg(args, 0) {
        Value::Undefined => vec![Value::String(s.clone())],
        Value::RegExp(re) => split_regexp(&re, &s),
        other => {
            let sep = interp.to_string(&other)?;
            strings::split(&s, &sep, None).into_iter().map(Value::string).collect()
        }
    };
    let pieces = match limit {
        Some(limit) => pieces.into_iter().take(limit).collect(),
        None => pieces,
    };
    Ok(Value::array(pieces))
}

/// Split on regex matches; capture groups are spliced into the output.
fn split_regexp(re: &RegExp, s: &str) -> Vec<Value> {
    let len = strings::char_len(s);
    if len == 0 {
        return if regexp::match_at(re, s, 0, true).is_some() { Vec::new() } else { vec![Value::string("")] };
    }
    let mut out = Vec::new();
    let mut last = 0;
    for m in regexp::match_all(re, s) {
        if m.start >= len || m.end == last || (m.end == m.start && m.start == 0) {
            continue;
        }
        out.push(Value::string(strings::slice_chars(s, last, m.start)));
        out.extend(m.groups.iter().skip(1).map(|g| g.as_deref().map(Value::string).unwrap_or_default()));
        last = m.end;
    }
    out.push(Value::string(strings::slice_chars(s, last, len)));
    out
}

/// Replacement for one match: call the function or expand the template.
fn replacement_for(
    interp: &mut Interpreter,
    replacement: &Value,
    subject: &str,
    m: &MatchData,
) -> Result<String, Interrupt> {
    if let Value::Function(_) = replacement {
        let mut call_args: Vec<Value> =
            m.groups.iter().map(|g| g.as_deref().map(Value::string).unwrap_or_default()).collect();
        call_args.push(Value::Number(m.start as f64));
        call_args.push(Value::string(subject));
        let result = interp.call(replacement, Value::Undefined, call_args)?;
        return Ok(interp.to_string(&result)?.to_string());
    }
    let template = interp.to_string(replacement)?;
    Ok(regexp::expand_replacement(&template, subject, m))
}

fn replace_matches(
    interp: &mut Interpreter,
    subject: &str,
    matches: Vec<MatchData>,
    replacement: &Value,
) -> Result<Value, Interrupt> {
    let mut out = String::new();
    let mut last = 0;
    for m in &matches {
        out.push_str(&strings::slice_chars(subject, last, m.start));
        out.push_str(&replacement_for(interp, replacement, subject, m)?);
        last = m.end;
        interp.check_len(out.len(), INVALID_STRING_LENGTH_MSG)?;
    }
    out.push_str(&strings::slice_chars(subject, last, usize::MAX));
    Ok(Value::string(out))
}

/// Occurrences of a literal needle as match records.
fn literal_matches(subject: &str, needle: &str, all: bool) -> Vec<MatchData> {
    let needle_len = strings::char_len(needle);
    let len = strings::char_len(subject);
    let mut out = Vec::new();
    let mut from = 0;
    while from <= len {
        let Some(start) = strings::index_of(subject, needle, from) else { break };
        out.push(MatchData {
            start,
            end: start + needle_len,
            groups: vec![Some(needle.to_string())],
            names: vec![None],
        });
        if !all {
            break;
        }
        from = start + needle_len.max(1);
    }
    out
}

fn replace(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "replace")?;
    let replacement = arg(args, 1);
    let matches = match arg(args, 0) {
        Value::RegExp(re) if re.global() => {
            re.last_index.set(0);
            regexp::match_all(&re, &s)
        }
        Value::RegExp(re) => regexp::exec_with_state(&re, &s).into_iter().collect(),
        other => {
            let needle = interp.to_string(&other)?;
            literal_matches(&s, &needle, false)
        }
    };
    replace_matches(interp, &s, matches, &replacement)
}

fn replace_all(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "replaceAll")?;
    let replacement = arg(args, 1);
    let matches = match arg(args, 0) {
        Value::RegExp(re) if !re.global() => {
            return Err(interp.type_error("replaceAll must be called with a global RegExp"));
        }
        Value::RegExp(re) => {
            re.last_index.set(0);
            regexp::match_all(&re, &s)
        }
        other => {
            let needle = interp.to_string(&other)?;
            literal_matches(&s, &needle, true)
        }
    };
    replace_matches(interp, &s, matches, &replacement)
}

/// A pattern argument of `match`/`matchAll`/`search`: strings compile as regex sources.
fn pattern_arg(interp: &mut Interpreter, value: &Value, flags: &str) -> Result<Rc<RegExp>, Interrupt> {
    match value {
        Value::RegExp(re) => Ok(re.clone()),
        Value::Undefined => match regexp::new_regexp(interp, "(?:)", flags)? {
            Value::RegExp(re) => Ok(re),
            _ => Err(interp.type_error("Invalid regular expression")),
        },
        other => {
            let source = interp.to_string(other)?;
            match regexp::new_regexp(interp, &source, flags)? {
                Value::RegExp(re) => Ok(re),
                _ => Err(interp.type_error("Invalid regular expression")),
            }
        }
    }
}

fn match_(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "match")?;
    let re = pattern_arg(interp, &arg(args, 0), "")?;
    if re.global() {
        re.last_index.set(0);
        let all = regexp::match_all(&re, &s);
        if all.is_empty() {
            return Ok(Value::Null);
        }
        return Ok(Value::array(
            all.iter()
                .map(|m| Value::string(m.groups[0].as_deref().unwrap_or("")))
                .collect(),
        ));
    }
    Ok(regexp::exec_with_state(&re, &s)
        .map(|m| regexp::match_array(&m))
        .unwrap_or(Value::Null))
}

fn match_all(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "matchAll")?;
    let re = pattern_arg(interp, &arg(args, 0), "g")?;
    if !re.global() {
        return Err(interp.type_error("String.prototype.matchAll called with a non-global RegExp argument"));
    }
    Ok(Value::array(regexp::match_all(&re, &s).iter().map(regexp::match_array).collect()))
}

fn search(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "search")?;
    let re = pattern_arg(interp, &arg(args, 0), "")?;
    Ok(Value::Number(regexp::match_at(&re, &s, 0, false).map_or(-1.0, |m| m.start as f64)))
}

fn concat(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut out = this_str(interp, this, "concat")?.to_string();
    for value in args {
        out.push_str(&interp.to_string(value)?);
        interp.check_len(out.len(), INVALID_STRING_LENGTH_MSG)?;
    }
    Ok(Value::string(out))
}

fn locale_compare(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let s = this_str(interp, this, "localeCompare")?;
    let other = str_arg(interp, args, 0)?;
    let ordering = s
        .to_lowercase()
        .cmp(&other.to_lowercase())
        .then_with(|| other.as_ref().cmp(s.as_ref()));
    Ok(Value::Number(match ordering {
        std::cmp::Ordering::Less => -1.0,
        std::cmp::Ordering::Equal => 0.0,
        std::cmp::Ordering::Greater => 1.0,
    }))
}
