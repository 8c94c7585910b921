//! Host globals and the per-kind method tables.
//!
//! [`install`] binds exactly the globals a [`CapabilitySet`] grants. Methods of built-in value kinds
//! (strings, arrays, maps, ...) are not globals: property access finds them by name in the `METHODS`
//! tables of the submodules.

pub(crate) mod array;
pub(crate) mod collections;
pub(crate) mod console;
pub(crate) mod errors;
pub(crate) mod function;
pub(crate) mod global_fns;
pub(crate) mod json;
pub(crate) mod math;
pub(crate) mod number;
pub(crate) mod object;
pub(crate) mod regexp;
pub(crate) mod string;
pub(crate) mod time;

use indexmap::IndexMap;

use duel_core::lang::globals::GlobalId;

use super::capabilities::CapabilitySet;
use super::interp::Interpreter;
use super::scope::BindingKind;
use super::value::{NativeFn, Value};

/// `(name, implementation, length)` of one built-in method.
pub(crate) type MethodEntry = (&'static str, NativeFn, usize);

/// Look up `name` in a method table and wrap it as a function value.
pub(crate) fn find(table: &'static [MethodEntry], name: &str) -> Option<Value> {
    table
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|&(name, func, arity)| Value::native(name, func, arity))
}

/// Argument `i`, or `undefined` when absent.
pub(crate) fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or_default()
}

/// A plain object whose properties are the given functions and constants.
pub(crate) fn namespace(methods: &'static [MethodEntry], constants: &[(&str, Value)]) -> Value {
    let mut props = IndexMap::new();
    for (name, value) in constants {
        props.insert((*name).to_string(), value.clone());
    }
    for &(name, func, arity) in methods {
        props.insert(name.to_string(), Value::native(name, func, arity));
    }
    Value::object(props)
}

/// Bind every granted global into the interpreter's globals frame.
pub(crate) fn install(interp: &mut Interpreter, capabilities: &CapabilitySet) {
    let mut installed = 0usize;
    for info in capabilities.globals() {
        interp.globals().declare(info.name, global_value(info.id), BindingKind::Const);
        installed += 1;
    }
    tracing::debug!(installed, classes = ?capabilities.classes().collect::<Vec<_>>(), "installed host globals");
}

fn global_value(id: GlobalId) -> Value {
    match id {
        GlobalId::Undefined => Value::Undefined,
        GlobalId::NaN => Value::Number(f64::NAN),
        GlobalId::Infinity => Value::Number(f64::INFINITY),
        GlobalId::Console => console::object(),
        GlobalId::Date => time::date_constructor(),
        GlobalId::Performance => time::performance(),
        GlobalId::Math => math::object(),
        GlobalId::Json => json::object(),
        GlobalId::String => string::constructor(),
        GlobalId::Number => number::constructor(),
        GlobalId::Boolean => number::boolean_constructor(),
        GlobalId::ParseInt => Value::native("parseInt", global_fns::parse_int, 2),
        GlobalId::ParseFloat => Value::native("parseFloat", global_fns::parse_float, 1),
        GlobalId::IsNaN => Value::native("isNaN", global_fns::is_nan, 1),
        GlobalId::IsFinite => Value::native("isFinite", global_fns::is_finite, 1),
        GlobalId::Array => array::constructor(),
        GlobalId::Object => object::constructor(),
        GlobalId::Map => collections::map_constructor(),
        GlobalId::Set => collections::set_constructor(),
        GlobalId::Error => errors::constructor(duel_core::errors::ErrorKind::Error),
        GlobalId::TypeError => errors::constructor(duel_core::errors::ErrorKind::TypeError),
        GlobalId::RangeError => errors::constructor(duel_core::errors::ErrorKind::RangeError),
        GlobalId::ReferenceError => errors::constructor(duel_core::errors::ErrorKind::ReferenceError),
        GlobalId::SyntaxError => errors::constructor(duel_core::errors::ErrorKind::SyntaxError),
    }
}

#[cfg(test)]
mod tests;
