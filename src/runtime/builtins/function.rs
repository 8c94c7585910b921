//! `call`, `apply` and `bind`.

use std::rc::Rc;

use indexmap::IndexMap;
use std::cell::RefCell;

use super::{MethodEntry, arg};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::{Bound, Function, FunctionKind, Value};

pub(crate) const METHODS: &[MethodEntry] = &[
    ("call", call, 1),
    ("apply", apply, 2),
    ("bind", bind, 1),
    ("toString", to_string, 0),
];

fn this_function(interp: &Interpreter, this: &Value, method: &str) -> Result<Rc<Function>, Interrupt> {
    match this {
        Value::Function(f) => Ok(f.clone()),
        _ => Err(interp.type_error(format!("Function.prototype.{method} called on a non-function"))),
    }
}

fn call(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    this_function(interp, this, "call")?;
    let rest = args.get(1..).map(<[Value]>::to_vec).unwrap_or_default();
    interp.call(this, arg(args, 0), rest)
}

fn apply(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    this_function(interp, this, "apply")?;
    let list = match arg(args, 1) {
        Value::Undefined | Value::Null => Vec::new(),
        Value::Array(items) => items.borrow().clone(),
        _ => return Err(interp.type_error("CreateListFromArrayLike called on non-object")),
    };
    interp.call(this, arg(args, 0), list)
}

fn bind(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let target = this_function(interp, this, "bind")?;
    Ok(Value::Function(Rc::new(Function {
        kind: FunctionKind::Bound(Bound {
            target,
            this: arg(args, 0),
            args: args.get(1..).map(<[Value]>::to_vec).unwrap_or_default(),
        }),
        props: RefCell::new(IndexMap::new()),
    })))
}

fn to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    this_function(interp, this, "toString")?;
    Ok(Value::String(interp.to_string(this)?))
}
