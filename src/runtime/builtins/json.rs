//! `JSON.stringify` and `JSON.parse`.
//!
//! Parsing goes through `serde_json` (with `preserve_order`, so object keys keep their source order);
//! stringifying is done by hand because it has to call back into script code (`toJSON`, replacers).

use std::rc::Rc;

use indexmap::IndexMap;

use duel_core::errors::{CIRCULAR_JSON_MSG, ErrorKind, INVALID_STRING_LENGTH_MSG, MAX_CALL_STACK_MSG};
use duel_core::numbers;

use super::{MethodEntry, arg, namespace};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::Value;

const METHODS: &[MethodEntry] = &[("stringify", stringify, 3), ("parse", parse, 2)];

/// Longest indentation unit `stringify` honours.
const MAX_GAP: usize = 10;

pub(crate) fn object() -> Value {
    namespace(METHODS, &[])
}

// ============================================================================
// stringify
// ============================================================================

enum Replacer {
    None,
    Function(Value),
    /// Property allow-list, in output order.
    Keys(Vec<Rc<str>>),
}

struct Serializer {
    replacer: Replacer,
    gap: String,
    /// Identities of the arrays and objects currently being serialised.
    stack: Vec<usize>,
}

fn stringify(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let replacer = match arg(args, 1) {
        f @ Value::Function(_) => Replacer::Function(f),
        Value::Array(items) => {
            let items = items.borrow().clone();
            let mut keys: Vec<Rc<str>> = Vec::new();
            for item in items {
                if matches!(item, Value::String(_) | Value::Number(_)) {
                    let key = interp.to_property_key(&item)?;
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
            Replacer::Keys(keys)
        }
        _ => Replacer::None,
    };
    let gap = match arg(args, 2) {
        Value::Number(n) if n >= 1.0 => " ".repeat((n as usize).min(MAX_GAP)),
        Value::String(s) => s.chars().take(MAX_GAP).collect(),
        _ => String::new(),
    };
    let mut serializer = Serializer {
        replacer,
        gap,
        stack: Vec::new(),
    };
    let value = arg(args, 0);
    let holder = Value::object(IndexMap::from([(String::new(), value.clone())]));
    match serializer.property(interp, &holder, "", value, "")? {
        Some(text) => Ok(Value::string(text)),
        None => Ok(Value::Undefined),
    }
}

impl Serializer {
    /// Serialise `holder[key]`; `None` when the value has no JSON form (functions, `undefined`).
    fn property(
        &mut self,
        interp: &mut Interpreter,
        holder: &Value,
        key: &str,
        mut value: Value,
        indent: &str,
    ) -> Result<Option<String>, Interrupt> {
        if matches!(value, Value::Object(_)) {
            let to_json = interp.get_property(&value, "toJSON")?;
            if matches!(to_json, Value::Function(_)) {
                value = interp.call(&to_json, value, vec![Value::string(key)])?;
            }
        }
        if let Replacer::Function(f) = &self.replacer {
            let f = f.clone();
            value = interp.call(&f, holder.clone(), vec![Value::string(key), value])?;
        }
        let text = match &value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) if n.is_finite() => numbers::to_display(*n),
            Value::Number(_) => "null".to_string(),
            Value::String(s) => quote(s),
            Value::Undefined | Value::Function(_) => return Ok(None),
            Value::Map(_) | Value::Set(_) | Value::RegExp(_) => "{}".to_string(),
            Value::Array(_) => self.array(interp, &value, indent)?,
            Value::Object(_) => self.object(interp, &value, indent)?,
        };
        interp.check_len(text.len(), INVALID_STRING_LENGTH_MSG)?;
        Ok(Some(text))
    }

    fn enter(&mut self, interp: &Interpreter, value: &Value) -> Result<(), Interrupt> {
        let Some(id) = value.identity() else { return Ok(()) };
        if self.stack.contains(&id) {
            return Err(interp.type_error(CIRCULAR_JSON_MSG));
        }
        if self.stack.len() >= interp.limits().max_call_depth {
            return Err(interp.throw(ErrorKind::RangeError, MAX_CALL_STACK_MSG));
        }
        self.stack.push(id);
        Ok(())
    }

    fn array(&mut self, interp: &mut Interpreter, value: &Value, indent: &str) -> Result<String, Interrupt> {
        self.enter(interp, value)?;
        let inner = format!("{indent}{}", self.gap);
        let mut parts = Vec::new();
        let mut i = 0;
        loop {
            let item = match value {
                Value::Array(items) => items.borrow().get(i).cloned(),
                _ => None,
            };
            let Some(item) = item else { break };
            let part = self.property(interp, value, &i.to_string(), item, &inner)?;
            parts.push(part.unwrap_or_else(|| "null".to_string()));
            i += 1;
        }
        self.stack.pop();
        Ok(self.wrap('[', ']', parts, indent))
    }

    fn object(&mut self, interp: &mut Interpreter, value: &Value, indent: &str) -> Result<String, Interrupt> {
        self.enter(interp, value)?;
        let inner = format!("{indent}{}", self.gap);
        let keys = match &self.replacer {
            Replacer::Keys(keys) => keys.clone(),
            _ => interp.own_keys(value),
        };
        let separator = if self.gap.is_empty() { ":" } else { ": " };
        let mut parts = Vec::new();
        for key in keys {
            let owned = match value {
                Value::Object(obj) => obj.borrow().props.get(key.as_ref()).cloned(),
                _ => None,
            };
            let Some(item) = owned else { continue };
            if let Some(text) = self.property(interp, value, &key, item, &inner)? {
                parts.push(format!("{}{separator}{text}", quote(&key)));
            }
        }
        self.stack.pop();
        Ok(self.wrap('{', '}', parts, indent))
    }

    fn wrap(&self, open: char, close: char, parts: Vec<String>, indent: &str) -> String {
        if parts.is_empty() {
            return format!("{open}{close}");
        }
        if self.gap.is_empty() {
            return format!("{open}{}{close}", parts.join(","));
        }
        let inner = format!("{indent}{}", self.gap);
        let body = parts.join(&format!(",\n{inner}"));
        format!("{open}\n{inner}{body}\n{indent}{close}")
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ============================================================================
// parse
// ============================================================================

fn parse(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let text = interp.to_string(&arg(args, 0))?;
    let parsed: serde_json::Value = serde_json::from_str(&text).map_err(|err| {
        interp.throw(ErrorKind::SyntaxError, format!("Unexpected token in JSON at line {} column {}", err.line(), err.column()))
    })?;
    let value = from_json(parsed);
    match arg(args, 1) {
        reviver @ Value::Function(_) => {
            let root = Value::object(IndexMap::from([(String::new(), value)]));
            revive(interp, &reviver, &root, "")
        }
        _ => Ok(value),
    }
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(s),
        serde_json::Value::Array(items) => Value::array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => Value::object(map.into_iter().map(|(k, v)| (k, from_json(v))).collect()),
    }
}

/// Post-order walk calling `reviver(key, value)` with the holder as `this`; `undefined` deletes.
fn revive(interp: &mut Interpreter, reviver: &Value, holder: &Value, key: &str) -> Result<Value, Interrupt> {
    let value = interp.get_property(holder, key)?;
    if value.is_object_like() {
        for child in interp.own_keys(&value) {
            let revived = revive(interp, reviver, &value, &child)?;
            if matches!(revived, Value::Undefined) {
                interp.delete_property(&value, &Value::String(child))?;
            } else {
                interp.set_property(&value, &child, revived)?;
            }
        }
    }
    interp.call(reviver, holder.clone(), vec![Value::string(key), value])
}

#[cfg(test)]
mod tests {
    use super::quote;

    #[test]
    fn quote_escapes_control_characters() {
        assert_eq!(quote("a\"b\\c\n\u{1}"), r#""a\"b\\c\n\u0001""#);
    }
}
