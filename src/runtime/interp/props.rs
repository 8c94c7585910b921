//! Property access on every value kind.
//!
//! Own properties win; built-in methods are looked up by name in the per-kind tables of
//! [`crate::runtime::builtins`]. Objects created by `new F()` also see `F.prototype`.

use std::rc::Rc;

use duel_core::errors::{self, INVALID_ARRAY_LENGTH_MSG};
use duel_core::{numbers, strings};
use indexmap::IndexMap;

use super::Interpreter;
use crate::runtime::builtins::{self, array, collections, errors as error_builtins, function, number, object, regexp, string, time};
use crate::runtime::error::Interrupt;
use crate::runtime::value::{FunctionKind, ObjectClass, Value, enumeration_order};

/// Array index encoded in a property key (`"0"`, `"12"`), if it is one.
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

impl Interpreter {
    /// `base[key]` with a computed key.
    pub(crate) fn get_member(&mut self, base: &Value, key: &Value) -> Result<Value, Interrupt> {
        if let Value::Number(n) = key {
            if let Some(idx) = numbers::as_index(*n) {
                match base {
                    Value::Array(items) => return Ok(items.borrow().get(idx).cloned().unwrap_or_default()),
                    Value::String(s) => {
                        return Ok(strings::char_at(s, idx).map(|c| Value::string(c.to_string())).unwrap_or_default());
                    }
                    _ => {}
                }
            }
        }
        if base.is_nullish() {
            let key = self.to_property_key(key)?;
            return Err(self.type_error(errors::read_property_message(base.kind_name(), &key)));
        }
        let key = self.to_property_key(key)?;
        self.get_property(base, &key)
    }

    /// `base.key`.
    pub(crate) fn get_property(&mut self, base: &Value, key: &str) -> Result<Value, Interrupt> {
        let found = match base {
            Value::Undefined | Value::Null => {
                return Err(self.type_error(errors::read_property_message(base.kind_name(), key)));
            }
            Value::Bool(_) => builtins::find(number::BOOLEAN_METHODS, key),
            Value::Number(_) => builtins::find(number::METHODS, key),
            Value::String(s) => {
                if key == "length" {
                    return Ok(Value::Number(strings::char_len(s) as f64));
                }
                if let Some(idx) = parse_index(key) {
                    return Ok(strings::char_at(s, idx).map(|c| Value::string(c.to_string())).unwrap_or_default());
                }
                builtins::find(string::METHODS, key)
            }
            Value::Array(items) => {
                if key == "length" {
                    return Ok(Value::Number(items.borrow().len() as f64));
                }
                if let Some(idx) = parse_index(key) {
                    return Ok(items.borrow().get(idx).cloned().unwrap_or_default());
                }
                builtins::find(array::METHODS, key).or_else(|| builtins::find(object::INSTANCE_METHODS, key))
            }
            Value::Object(obj) => {
                let (own, class, constructor) = {
                    let o = obj.borrow();
                    (o.props.get(key).cloned(), o.class, o.constructor.clone())
                };
                if let Some(own) = own {
                    return Ok(own);
                }
                if let Some(ctor) = &constructor {
                    if key == "constructor" {
                        return Ok(Value::Function(ctor.clone()));
                    }
                    let proto = ctor.props.borrow().get("prototype").cloned();
                    if let Some(Value::Object(proto)) = proto {
                        if let Some(v) = proto.borrow().props.get(key) {
                            return Ok(v.clone());
                        }
                    }
                }
                match class {
                    ObjectClass::Plain => None,
                    ObjectClass::Error(_) => builtins::find(error_builtins::METHODS, key),
                    ObjectClass::Date(_) => builtins::find(time::DATE_METHODS, key),
                }
                .or_else(|| builtins::find(object::INSTANCE_METHODS, key))
            }
            Value::Function(f) => {
                if let Some(v) = f.props.borrow().get(key) {
                    return Ok(v.clone());
                }
                match key {
                    "name" => return Ok(Value::String(f.name())),
                    "length" => return Ok(Value::Number(f.arity() as f64)),
                    "prototype" => {
                        if let FunctionKind::Closure(c) = &f.kind {
                            if !c.def.is_arrow {
                                let proto = Value::object(IndexMap::new());
                                f.props.borrow_mut().insert("prototype".to_string(), proto.clone());
                                return Ok(proto);
                            }
                        }
                        return Ok(Value::Undefined);
                    }
                    _ => builtins::find(function::METHODS, key),
                }
            }
            Value::Map(map) => {
                if key == "size" {
                    return Ok(Value::Number(map.borrow().len() as f64));
                }
                builtins::find(collections::MAP_METHODS, key)
            }
            Value::Set(set) => {
                if key == "size" {
                    return Ok(Value::Number(set.borrow().len() as f64));
                }
                builtins::find(collections::SET_METHODS, key)
            }
            Value::RegExp(re) => match key {
                "source" => return Ok(Value::string(re.source.as_str())),
                "flags" => return Ok(Value::string(re.flags.as_str())),
                "global" => return Ok(Value::Bool(re.global())),
                "ignoreCase" => return Ok(Value::Bool(re.flags.contains('i'))),
                "multiline" => return Ok(Value::Bool(re.flags.contains('m'))),
                "sticky" => return Ok(Value::Bool(re.sticky())),
                "lastIndex" => return Ok(Value::Number(re.last_index.get() as f64)),
                _ => builtins::find(regexp::METHODS, key),
            },
        };
        Ok(found.unwrap_or_default())
    }

    /// `base[key] = value` with a computed key.
    pub(crate) fn set_member(&mut self, base: &Value, key: &Value, value: Value) -> Result<(), Interrupt> {
        if let (Value::Array(_), Value::Number(n)) = (base, key) {
            if let Some(idx) = numbers::as_index(*n) {
                return self.set_index(base, idx, value);
            }
        }
        let key = self.to_property_key(key)?;
        self.set_property(base, &key, value)
    }

    /// `base.key = value`. Writes to primitives and frozen objects are ignored.
    pub(crate) fn set_property(&mut self, base: &Value, key: &str, value: Value) -> Result<(), Interrupt> {
        match base {
            Value::Undefined | Value::Null => Err(self.type_error(errors::set_property_message(base.kind_name(), key))),
            Value::Array(items) => {
                if key == "length" {
                    let len = self.to_number(&value)?;
                    let Some(len) = numbers::as_index(len) else {
                        return Err(self.range_error(INVALID_ARRAY_LENGTH_MSG));
                    };
                    self.check_len(len, INVALID_ARRAY_LENGTH_MSG)?;
                    items.borrow_mut().resize(len, Value::Undefined);
                    return Ok(());
                }
                match parse_index(key) {
                    Some(idx) => self.set_index(base, idx, value),
                    None => Ok(()),
                }
            }
            Value::Object(obj) => {
                let mut o = obj.borrow_mut();
                if !o.frozen {
                    o.props.insert(key.to_string(), value);
                }
                Ok(())
            }
            Value::Function(f) => {
                f.props.borrow_mut().insert(key.to_string(), value);
                Ok(())
            }
            Value::RegExp(re) if key == "lastIndex" => {
                let n = self.to_integer(&value)?;
                re.last_index.set(n.max(0.0) as usize);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn set_index(&mut self, base: &Value, idx: usize, value: Value) -> Result<(), Interrupt> {
        if let Value::Array(items) = base {
            self.check_len(idx.saturating_add(1), INVALID_ARRAY_LENGTH_MSG)?;
            let mut items = items.borrow_mut();
            if idx >= items.len() {
                items.resize(idx + 1, Value::Undefined);
            }
            items[idx] = value;
        }
        Ok(())
    }

    /// The `delete` operator.
    pub(crate) fn delete_property(&mut self, base: &Value, key: &Value) -> Result<bool, Interrupt> {
        if base.is_nullish() {
            let key = self.to_property_key(key)?;
            return Err(self.type_error(format!("Cannot convert undefined or null to object (deleting '{key}')")));
        }
        let key = self.to_property_key(key)?;
        match base {
            Value::Object(obj) => {
                let mut o = obj.borrow_mut();
                if o.frozen {
                    return Ok(false);
                }
                o.props.shift_remove(key.as_ref());
                Ok(true)
            }
            Value::Array(items) => {
                if let Some(idx) = parse_index(&key) {
                    if let Some(slot) = items.borrow_mut().get_mut(idx) {
                        *slot = Value::Undefined;
                    }
                }
                Ok(true)
            }
            Value::Function(f) => {
                f.props.borrow_mut().shift_remove(key.as_ref());
                Ok(true)
            }
            _ => Ok(true),
        }
    }

    /// The `in` operator: own properties, `F.prototype` members, and built-in members.
    pub(crate) fn has_property(&mut self, key: &Value, base: &Value) -> Result<bool, Interrupt> {
        let key = self.to_property_key(key)?;
        if !base.is_object_like() {
            let shown = self.to_string_lossy(base);
            return Err(self.type_error(format!("Cannot use 'in' operator to search for '{key}' in {shown}")));
        }
        if let Value::Object(obj) = base {
            if obj.borrow().props.contains_key(key.as_ref()) {
                return Ok(true);
            }
        }
        if let Value::Array(items) = base {
            if let Some(idx) = parse_index(&key) {
                return Ok(idx < items.borrow().len());
            }
        }
        Ok(!matches!(self.get_property(base, &key)?, Value::Undefined))
    }

    /// Enumerable own keys, in order (`for…in`, `Object.keys`).
    pub(crate) fn own_keys(&self, value: &Value) -> Vec<Rc<str>> {
        match value {
            Value::Object(obj) => {
                let obj = obj.borrow();
                let is_error = matches!(obj.class, ObjectClass::Error(_));
                obj.entries()
                    .into_iter()
                    .map(|(k, _)| k)
                    .filter(|k| !(is_error && matches!(k.as_str(), "name" | "message")))
                    .map(|k| Rc::from(k.as_str()))
                    .collect()
            }
            Value::Array(items) => (0..items.borrow().len()).map(|i| Rc::from(i.to_string())).collect(),
            Value::String(s) => (0..strings::char_len(s)).map(|i| Rc::from(i.to_string())).collect(),
            Value::Function(f) => enumeration_order(&f.props.borrow())
                .into_iter()
                .map(|(k, _)| Rc::from(k.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Snapshot of the values produced by iterating `value` (`for…of`, spread, `Array.from`).
    pub(crate) fn iterate(&mut self, value: &Value) -> Result<Vec<Value>, Interrupt> {
        match value {
            Value::Array(items) => Ok(items.borrow().clone()),
            Value::String(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
            Value::Map(map) => Ok(map
                .borrow()
                .values()
                .map(|(k, v)| Value::array(vec![k.clone(), v.clone()]))
                .collect()),
            Value::Set(set) => Ok(set.borrow().values().cloned().collect()),
            other => {
                let shown = self.to_string_lossy(other);
                Err(self.type_error(format!("{shown} is not iterable")))
            }
        }
    }
}
