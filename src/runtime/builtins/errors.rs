//! Error constructors.

use duel_core::errors::ErrorKind;

use super::{MethodEntry, arg};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::{Function, NativeFn, Value};

pub(crate) const METHODS: &[MethodEntry] = &[("toString", to_string, 0)];

pub(crate) fn constructor(kind: ErrorKind) -> Value {
    let (name, func): (&'static str, NativeFn) = match kind {
        ErrorKind::Error => ("Error", make_error),
        ErrorKind::TypeError => ("TypeError", make_type_error),
        ErrorKind::RangeError => ("RangeError", make_range_error),
        ErrorKind::ReferenceError => ("ReferenceError", make_reference_error),
        ErrorKind::SyntaxError => ("SyntaxError", make_syntax_error),
    };
    Value::function(Function::constructor(name, func, func, 1))
}

/// `Error(message?)` and `new Error(message?)` behave the same.
fn build(interp: &mut Interpreter, kind: ErrorKind, args: &[Value]) -> Result<Value, Interrupt> {
    let message = match arg(args, 0) {
        Value::Undefined => String::new(),
        other => interp.to_string(&other)?.to_string(),
    };
    Ok(Value::error(kind, &message))
}

fn make_error(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    build(interp, ErrorKind::Error, args)
}

fn make_type_error(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    build(interp, ErrorKind::TypeError, args)
}

fn make_range_error(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    build(interp, ErrorKind::RangeError, args)
}

fn make_reference_error(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    build(interp, ErrorKind::ReferenceError, args)
}

fn make_syntax_error(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    build(interp, ErrorKind::SyntaxError, args)
}

fn to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::String(interp.to_string(this)?))
}
