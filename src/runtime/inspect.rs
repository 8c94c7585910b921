//! Node-style rendering of values for `console.*` output and `Debug`.
//!
//! Nested containers deeper than two levels collapse to `[Object]` / `[Array]`, and cycles render as
//! `[Circular]`. Nothing here calls back into user code.

use duel_core::numbers;

use super::builtins::time;
use super::value::{ObjectClass, Value};

const MAX_DEPTH: usize = 2;

/// Render a value as it would appear nested inside a container (strings quoted).
pub fn inspect(value: &Value) -> String {
    let mut out = String::new();
    let mut seen = Vec::new();
    write_value(&mut out, value, 0, &mut seen);
    out
}

/// Render the arguments of one `console.log` call: top-level strings are printed raw.
pub fn console_line(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(s) => s.to_string(),
            other => inspect(other),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn write_key(out: &mut String, key: &str) {
    if is_plain_key(key) {
        out.push_str(key);
    } else {
        out.push_str(&quote(key));
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize, seen: &mut Vec<usize>) {
    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) if *n == 0.0 && n.is_sign_negative() => out.push_str("-0"),
        Value::Number(n) => out.push_str(&numbers::to_display(*n)),
        Value::String(s) => out.push_str(&quote(s)),
        Value::Function(f) => {
            let name = f.name();
            if name.is_empty() {
                out.push_str("[Function (anonymous)]");
            } else {
                out.push_str(&format!("[Function: {name}]"));
            }
        }
        Value::RegExp(re) => out.push_str(&format!("/{}/{}", re.source, re.flags)),
        Value::Object(object) if matches!(object.borrow().class, ObjectClass::Date(_)) => {
            if let ObjectClass::Date(ms) = object.borrow().class {
                out.push_str(&time::iso_string(ms).unwrap_or_else(|| "Invalid Date".to_string()));
            }
        }
        Value::Object(object) if matches!(object.borrow().class, ObjectClass::Error(_)) => {
            let o = object.borrow();
            let name = o.props.get("name").and_then(Value::as_str).unwrap_or("Error").to_string();
            let message = o.props.get("message").and_then(Value::as_str).unwrap_or("").to_string();
            if message.is_empty() {
                out.push_str(&name);
            } else {
                out.push_str(&format!("{name}: {message}"));
            }
        }
        _ => write_container(out, value, depth, seen),
    }
}

fn write_container(out: &mut String, value: &Value, depth: usize, seen: &mut Vec<usize>) {
    let id = value.identity().unwrap_or_default();
    if seen.contains(&id) {
        out.push_str("[Circular]");
        return;
    }
    let label = match value {
        Value::Array(_) => "[Array]",
        Value::Map(_) => "[Map]",
        Value::Set(_) => "[Set]",
        _ => "[Object]",
    };
    if depth > MAX_DEPTH {
        out.push_str(label);
        return;
    }
    seen.push(id);
    match value {
        Value::Array(items) => {
            let items = items.borrow().clone();
            write_entries(out, "", '[', ']', items.len(), |out, i, seen| {
                write_value(out, &items[i], depth + 1, seen);
            }, seen);
        }
        Value::Object(object) => {
            let props: Vec<(String, Value)> =
                object.borrow().entries().into_iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let prefix = match &object.borrow().constructor {
                Some(ctor) if !ctor.name().is_empty() => format!("{} ", ctor.name()),
                _ => String::new(),
            };
            write_entries(out, &prefix, '{', '}', props.len(), |out, i, seen| {
                write_key(out, &props[i].0);
                out.push_str(": ");
                write_value(out, &props[i].1, depth + 1, seen);
            }, seen);
        }
        Value::Map(map) => {
            let entries: Vec<(Value, Value)> = map.borrow().values().cloned().collect();
            let prefix = format!("Map({}) ", entries.len());
            write_entries(out, &prefix, '{', '}', entries.len(), |out, i, seen| {
                write_value(out, &entries[i].0, depth + 1, seen);
                out.push_str(" => ");
                write_value(out, &entries[i].1, depth + 1, seen);
            }, seen);
        }
        Value::Set(set) => {
            let items: Vec<Value> = set.borrow().values().cloned().collect();
            let prefix = format!("Set({}) ", items.len());
            write_entries(out, &prefix, '{', '}', items.len(), |out, i, seen| {
                write_value(out, &items[i], depth + 1, seen);
            }, seen);
        }
        _ => {}
    }
    seen.pop();
}

fn write_entries(
    out: &mut String,
    prefix: &str,
    open: char,
    close: char,
    len: usize,
    mut write: impl FnMut(&mut String, usize, &mut Vec<usize>),
    seen: &mut Vec<usize>,
) {
    out.push_str(prefix);
    out.push(open);
    if len == 0 {
        out.push(close);
        return;
    }
    out.push(' ');
    for i in 0..len {
        if i > 0 {
            out.push_str(", ");
        }
        write(out, i, seen);
    }
    out.push(' ');
    out.push(close);
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    #[test]
    fn test_nested_strings_are_quoted_but_console_strings_are_raw() {
        let arr = Value::array(vec![Value::string("a"), Value::Number(1.0)]);
        assert_eq!(inspect(&arr), "[ 'a', 1 ]");
        assert_eq!(console_line(&[Value::string("x ="), arr]), "x = [ 'a', 1 ]");
    }

    #[test]
    fn test_object_keys_and_empty_containers() {
        let mut props = IndexMap::new();
        props.insert("a".to_string(), Value::Bool(true));
        props.insert("b-c".to_string(), Value::array(Vec::new()));
        props.insert("d".to_string(), Value::object(IndexMap::new()));
        assert_eq!(inspect(&Value::object(props)), "{ a: true, 'b-c': [], d: {} }");
    }

    #[test]
    fn test_cycles_and_depth_are_bounded() {
        let arr = Value::array(Vec::new());
        if let Value::Array(items) = &arr {
            items.borrow_mut().push(arr.clone());
        }
        assert_eq!(inspect(&arr), "[ [Circular] ]");
        let three = Value::array(vec![Value::array(vec![Value::array(vec![])])]);
        assert_eq!(inspect(&three), "[ [ [] ] ]");
        let four = Value::array(vec![three]);
        assert_eq!(inspect(&four), "[ [ [ [Array] ] ] ]");
        if let Value::Array(items) = &arr {
            items.borrow_mut().clear();
        }
    }

    #[test]
    fn test_negative_zero_and_errors() {
        assert_eq!(inspect(&Value::Number(-0.0)), "-0");
        let err = Value::error(duel_core::errors::ErrorKind::TypeError, "bad");
        assert_eq!(inspect(&err), "TypeError: bad");
    }
}
