//! `console.*`: the restricted log sink.

use super::{MethodEntry, namespace};
use crate::runtime::error::Interrupt;
use crate::runtime::inspect::console_line;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::Value;

const METHODS: &[MethodEntry] = &[
    ("log", log, 0),
    ("info", info, 0),
    ("warn", warn, 0),
    ("error", error, 0),
    ("debug", debug, 0),
];

pub(crate) fn object() -> Value {
    namespace(METHODS, &[])
}

fn emit(interp: &mut Interpreter, level: &'static str, args: &[Value]) -> Result<Value, Interrupt> {
    let line = console_line(args);
    tracing::info!(target: "testduel::console", level, "{line}");
    interp.push_output(line);
    Ok(Value::Undefined)
}

fn log(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    emit(interp, "log", args)
}

fn info(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    emit(interp, "info", args)
}

fn warn(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    emit(interp, "warn", args)
}

fn error(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    emit(interp, "error", args)
}

fn debug(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    emit(interp, "debug", args)
}
