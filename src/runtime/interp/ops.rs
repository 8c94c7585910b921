//! Binary operators and abstract equality.

use std::cmp::Ordering;

use duel_core::errors::{ErrorKind, INVALID_STRING_LENGTH_MSG};
use duel_core::lang::globals::{self, GlobalId};
use duel_core::numbers::{to_int32, to_uint32};
use duel_syntax::ast::BinaryOp;

use super::Interpreter;
use super::convert::Hint;
use crate::runtime::error::Interrupt;
use crate::runtime::value::{FunctionKind, ObjectClass, Value, strict_equals};

/// `**` with the script language's edge cases (`1 ** NaN` is NaN, `(-1) ** Infinity` is NaN).
pub(crate) fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

impl Interpreter {
    pub(crate) fn binary(&mut self, op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Interrupt> {
        let value = match op {
            BinaryOp::Add => return self.add(left, right),
            BinaryOp::Sub => Value::Number(self.to_number(left)? - self.to_number(right)?),
            BinaryOp::Mul => Value::Number(self.to_number(left)? * self.to_number(right)?),
            BinaryOp::Div => Value::Number(self.to_number(left)? / self.to_number(right)?),
            BinaryOp::Mod => Value::Number(self.to_number(left)? % self.to_number(right)?),
            BinaryOp::Pow => Value::Number(power(self.to_number(left)?, self.to_number(right)?)),
            BinaryOp::Eq => Value::Bool(self.loose_equals(left, right)?),
            BinaryOp::NotEq => Value::Bool(!self.loose_equals(left, right)?),
            BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
            BinaryOp::StrictNotEq => Value::Bool(!strict_equals(left, right)),
            BinaryOp::Lt => Value::Bool(self.compare(left, right)? == Some(Ordering::Less)),
            BinaryOp::Gt => Value::Bool(self.compare(left, right)? == Some(Ordering::Greater)),
            BinaryOp::LtEq => Value::Bool(matches!(self.compare(left, right)?, Some(Ordering::Less | Ordering::Equal))),
            BinaryOp::GtEq => Value::Bool(matches!(
                self.compare(left, right)?,
                Some(Ordering::Greater | Ordering::Equal)
            )),
            BinaryOp::BitAnd => Value::Number(f64::from(self.int32(left)? & self.int32(right)?)),
            BinaryOp::BitOr => Value::Number(f64::from(self.int32(left)? | self.int32(right)?)),
            BinaryOp::BitXor => Value::Number(f64::from(self.int32(left)? ^ self.int32(right)?)),
            BinaryOp::Shl => {
                let shift = self.uint32(right)? & 31;
                Value::Number(f64::from(self.int32(left)?.wrapping_shl(shift)))
            }
            BinaryOp::Shr => {
                let shift = self.uint32(right)? & 31;
                Value::Number(f64::from(self.int32(left)? >> shift))
            }
            BinaryOp::UShr => {
                let shift = self.uint32(right)? & 31;
                Value::Number(f64::from(self.uint32(left)? >> shift))
            }
            BinaryOp::In => Value::Bool(self.has_property(left, right)?),
            BinaryOp::InstanceOf => Value::Bool(self.instance_of(left, right)?),
        };
        Ok(value)
    }

    fn int32(&mut self, value: &Value) -> Result<i32, Interrupt> {
        Ok(to_int32(self.to_number(value)?))
    }

    fn uint32(&mut self, value: &Value) -> Result<u32, Interrupt> {
        Ok(to_uint32(self.to_number(value)?))
    }

    /// `+`: string concatenation when either primitive operand is a string, numeric addition otherwise.
    pub(crate) fn add(&mut self, left: &Value, right: &Value) -> Result<Value, Interrupt> {
        if let (Value::Number(a), Value::Number(b)) = (left, right) {
            return Ok(Value::Number(a + b));
        }
        let left = self.to_primitive(left, Hint::Default)?;
        let right = self.to_primitive(right, Hint::Default)?;
        if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
            let a = self.to_string(&left)?;
            let b = self.to_string(&right)?;
            self.check_len(a.len() + b.len(), INVALID_STRING_LENGTH_MSG)?;
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(&a);
            joined.push_str(&b);
            return Ok(Value::string(joined));
        }
        Ok(Value::Number(self.to_number(&left)? + self.to_number(&right)?))
    }

    /// Abstract (loose) equality, `==`.
    pub(crate) fn loose_equals(&mut self, left: &Value, right: &Value) -> Result<bool, Interrupt> {
        match (left, right) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => Ok(true),
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => Ok(false),
            (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
                Ok(self.to_number(left)? == self.to_number(right)?)
            }
            (Value::Bool(b), other) | (other, Value::Bool(b)) => {
                let n = Value::Number(f64::from(u8::from(*b)));
                self.loose_equals(&n, other)
            }
            _ if left.is_object_like() && right.is_object_like() => Ok(strict_equals(left, right)),
            _ if left.is_object_like() => {
                let primitive = self.to_primitive(left, Hint::Default)?;
                self.loose_equals(&primitive, right)
            }
            _ if right.is_object_like() => {
                let primitive = self.to_primitive(right, Hint::Default)?;
                self.loose_equals(left, &primitive)
            }
            _ => Ok(strict_equals(left, right)),
        }
    }

    /// Relational comparison; `None` when either side is NaN.
    pub(crate) fn compare(&mut self, left: &Value, right: &Value) -> Result<Option<Ordering>, Interrupt> {
        if let (Value::Number(a), Value::Number(b)) = (left, right) {
            return Ok(a.partial_cmp(b));
        }
        let left = self.to_primitive(left, Hint::Number)?;
        let right = self.to_primitive(right, Hint::Number)?;
        if let (Value::String(a), Value::String(b)) = (&left, &right) {
            return Ok(Some(a.as_ref().cmp(b.as_ref())));
        }
        let a = self.to_number(&left)?;
        let b = self.to_number(&right)?;
        Ok(a.partial_cmp(&b))
    }

    /// `value instanceof ctor`.
    pub(crate) fn instance_of(&mut self, value: &Value, ctor: &Value) -> Result<bool, Interrupt> {
        let Value::Function(ctor) = ctor else {
            return Err(self.type_error("Right-hand side of 'instanceof' is not callable"));
        };
        let target = match &ctor.kind {
            FunctionKind::Bound(bound) => bound.target.clone(),
            _ => ctor.clone(),
        };
        if let FunctionKind::Native(native) = &target.kind {
            return Ok(match globals::from_str(native.name) {
                Some(GlobalId::Array) => matches!(value, Value::Array(_)),
                Some(GlobalId::Object) => value.is_object_like(),
                Some(GlobalId::Map) => matches!(value, Value::Map(_)),
                Some(GlobalId::Set) => matches!(value, Value::Set(_)),
                Some(GlobalId::Date) => {
                    matches!(value, Value::Object(o) if matches!(o.borrow().class, ObjectClass::Date(_)))
                }
                _ => match (ErrorKind::from_str(native.name), value.error_kind()) {
                    (Some(ErrorKind::Error), Some(_)) => true,
                    (Some(wanted), Some(actual)) => wanted == actual,
                    _ => false,
                },
            });
        }
        Ok(match value {
            Value::Object(obj) => obj
                .borrow()
                .constructor
                .as_ref()
                .is_some_and(|made_by| std::rc::Rc::ptr_eq(made_by, &target)),
            _ => false,
        })
    }
}
