//! Coercions that may run user code (`valueOf` / `toString` on plain objects).

use std::rc::Rc;

use duel_core::numbers;

use super::Interpreter;
use crate::runtime::builtins::time;
use crate::runtime::error::Interrupt;
use crate::runtime::value::{FunctionKind, ObjectClass, Value};

/// Preferred primitive type for ToPrimitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hint {
    /// `+` and `==`: numbers for everything except dates.
    Default,
    Number,
    String,
}

impl Interpreter {
    /// ToPrimitive.
    pub(crate) fn to_primitive(&mut self, value: &Value, hint: Hint) -> Result<Value, Interrupt> {
        match value {
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(value.clone()),
            Value::Array(items) => {
                let id = Rc::as_ptr(items) as *const () as usize;
                if self.joining.contains(&id) {
                    return Ok(Value::string(""));
                }
                let snapshot = items.borrow().clone();
                self.joining.push(id);
                let joined = self.join_values(&snapshot, ",");
                self.joining.pop();
                Ok(Value::string(joined?))
            }
            Value::Object(object) => {
                let (class, value_of, to_string) = {
                    let o = object.borrow();
                    (o.class, o.props.get("valueOf").cloned(), o.props.get("toString").cloned())
                };
                let order = if hint == Hint::String {
                    [to_string, value_of]
                } else {
                    [value_of, to_string]
                };
                for method in order.into_iter().flatten() {
                    if let Value::Function(_) = method {
                        let result = self.call(&method, value.clone(), Vec::new())?;
                        if !result.is_object_like() {
                            return Ok(result);
                        }
                    }
                }
                Ok(match class {
                    ObjectClass::Plain => Value::string("[object Object]"),
                    ObjectClass::Error(kind) => {
                        let message = object.borrow().props.get("message").cloned().unwrap_or_default();
                        let message = self.to_string(&message)?;
                        if message.is_empty() {
                            Value::string(kind.as_str())
                        } else {
                            Value::string(format!("{kind}: {message}"))
                        }
                    }
                    ObjectClass::Date(ms) if hint == Hint::Number => Value::Number(ms),
                    ObjectClass::Date(ms) => Value::string(time::iso_string(ms).unwrap_or_else(|| "Invalid Date".into())),
                })
            }
            Value::Function(function) => Ok(Value::string(match &function.kind {
                FunctionKind::Closure(c) if c.def.is_arrow => "() => { ... }".to_string(),
                FunctionKind::Closure(c) => format!("function {}() {{ ... }}", c.name),
                _ => format!("function {}() {{ [native code] }}", function.name()),
            })),
            Value::Map(_) => Ok(Value::string("[object Map]")),
            Value::Set(_) => Ok(Value::string("[object Set]")),
            Value::RegExp(re) => Ok(Value::string(format!("/{}/{}", re.source, re.flags))),
        }
    }

    /// ToString.
    pub(crate) fn to_string(&mut self, value: &Value) -> Result<Rc<str>, Interrupt> {
        if let Some(s) = value.primitive_to_string() {
            return Ok(s);
        }
        let primitive = self.to_primitive(value, Hint::String)?;
        Ok(primitive.primitive_to_string().unwrap_or_else(|| Rc::from("")))
    }

    /// ToString that never fails; a throwing `toString` falls back to the inspected form.
    pub fn to_string_lossy(&mut self, value: &Value) -> String {
        match self.to_string(value) {
            Ok(s) => s.to_string(),
            Err(_) => crate::runtime::inspect::inspect(value),
        }
    }

    /// ToNumber.
    pub(crate) fn to_number(&mut self, value: &Value) -> Result<f64, Interrupt> {
        if let Some(n) = value.primitive_to_number() {
            return Ok(n);
        }
        let primitive = self.to_primitive(value, Hint::Number)?;
        Ok(primitive.primitive_to_number().unwrap_or(f64::NAN))
    }

    /// ToNumber followed by truncation; `NaN` becomes zero.
    pub(crate) fn to_integer(&mut self, value: &Value) -> Result<f64, Interrupt> {
        let n = self.to_number(value)?;
        Ok(if n.is_nan() { 0.0 } else { n.trunc() })
    }

    /// ToPropertyKey. Numbers use their display form so `obj[1]` and `obj['1']` agree.
    pub(crate) fn to_property_key(&mut self, value: &Value) -> Result<Rc<str>, Interrupt> {
        match value {
            Value::Number(n) => Ok(Rc::from(numbers::to_display(*n))),
            other => self.to_string(other),
        }
    }

    /// `Array.prototype.join` over a snapshot: nullish elements become empty strings.
    pub(crate) fn join_values(&mut self, items: &[Value], separator: &str) -> Result<String, Interrupt> {
        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            if !item.is_nullish() {
                out.push_str(&self.to_string(item)?);
            }
            self.check_len(out.len(), duel_core::errors::INVALID_STRING_LENGTH_MSG)?;
        }
        Ok(out)
    }
}
