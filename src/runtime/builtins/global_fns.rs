//! `parseInt`, `parseFloat`, `isNaN`, `isFinite`.

use duel_core::numbers;

use super::arg;
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::Value;

pub(crate) fn parse_int(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let text = interp.to_string(&arg(args, 0))?;
    let radix = match arg(args, 1) {
        Value::Undefined => None,
        other => {
            let r = numbers::to_int32(interp.to_number(&other)?);
            if r == 0 { None } else { Some(u32::try_from(r).unwrap_or(u32::MAX)) }
        }
    };
    Ok(Value::Number(numbers::parse_int(&text, radix)))
}

pub(crate) fn parse_float(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let text = interp.to_string(&arg(args, 0))?;
    Ok(Value::Number(numbers::parse_float(&text)))
}

pub(crate) fn is_nan(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(interp.to_number(&arg(args, 0))?.is_nan()))
}

pub(crate) fn is_finite(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(interp.to_number(&arg(args, 0))?.is_finite()))
}
