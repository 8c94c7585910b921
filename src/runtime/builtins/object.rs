//! `Object` statics and the methods every object answers to.

use indexmap::IndexMap;

use super::{MethodEntry, arg};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::{Interpreter, parse_index};
use crate::runtime::value::{Function, ObjectClass, Value, same_value_zero};

pub(crate) const INSTANCE_METHODS: &[MethodEntry] = &[
    ("hasOwnProperty", has_own_property, 1),
    ("propertyIsEnumerable", has_own_property, 1),
    ("toString", to_string, 0),
    ("valueOf", value_of, 0),
];

const STATICS: &[MethodEntry] = &[
    ("keys", keys, 1),
    ("values", values, 1),
    ("entries", entries, 1),
    ("assign", assign, 2),
    ("freeze", freeze, 1),
    ("isFrozen", is_frozen, 1),
    ("fromEntries", from_entries, 1),
    ("create", create, 1),
    ("getOwnPropertyNames", keys, 1),
    ("hasOwn", has_own, 2),
    ("is", is, 2),
];

pub(crate) fn constructor() -> Value {
    let ctor = Function::constructor("Object", object_call, object_call, 1);
    let ctor = STATICS
        .iter()
        .fold(ctor, |f, &(name, func, arity)| f.with_prop(name, Value::native(name, func, arity)));
    Value::function(ctor)
}

fn object_call(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    match arg(args, 0) {
        value if value.is_object_like() => Ok(value),
        _ => Ok(Value::object(IndexMap::new())),
    }
}

fn require_object(interp: &Interpreter, value: &Value) -> Result<(), Interrupt> {
    if value.is_nullish() {
        return Err(interp.type_error("Cannot convert undefined or null to object"));
    }
    Ok(())
}

fn own_entries(interp: &mut Interpreter, value: &Value) -> Result<Vec<(String, Value)>, Interrupt> {
    require_object(interp, value)?;
    let mut out = Vec::new();
    for key in interp.own_keys(value) {
        let v = interp.get_property(value, &key)?;
        out.push((key.to_string(), v));
    }
    Ok(out)
}

fn keys(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let target = arg(args, 0);
    require_object(interp, &target)?;
    Ok(Value::array(interp.own_keys(&target).into_iter().map(Value::String).collect()))
}

fn values(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let entries = own_entries(interp, &arg(args, 0))?;
    Ok(Value::array(entries.into_iter().map(|(_, v)| v).collect()))
}

fn entries(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let entries = own_entries(interp, &arg(args, 0))?;
    Ok(Value::array(
        entries
            .into_iter()
            .map(|(k, v)| Value::array(vec![Value::string(k), v]))
            .collect(),
    ))
}

fn assign(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let target = arg(args, 0);
    require_object(interp, &target)?;
    for source in args.iter().skip(1) {
        if source.is_nullish() {
            continue;
        }
        for (key, value) in own_entries(interp, source)? {
            interp.set_property(&target, &key, value)?;
        }
    }
    Ok(target)
}

fn freeze(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let target = arg(args, 0);
    if let Value::Object(obj) = &target {
        obj.borrow_mut().frozen = true;
    }
    Ok(target)
}

fn is_frozen(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(match arg(args, 0) {
        Value::Object(obj) => obj.borrow().frozen,
        other => !other.is_object_like(),
    }))
}

fn from_entries(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let source = arg(args, 0);
    if source.is_nullish() {
        return Err(interp.type_error(format!("{} is not iterable", source.kind_name())));
    }
    let mut props = IndexMap::new();
    for entry in interp.iterate(&source)? {
        let key = interp.get_member(&entry, &Value::Number(0.0))?;
        let value = interp.get_member(&entry, &Value::Number(1.0))?;
        let key = interp.to_property_key(&key)?;
        props.insert(key.to_string(), value);
    }
    Ok(Value::object(props))
}

/// Without prototypes, `Object.create(proto)` is an empty object regardless of `proto`.
fn create(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let proto = arg(args, 0);
    if !proto.is_object_like() && !matches!(proto, Value::Null) {
        return Err(interp.type_error("Object prototype may only be an Object or null"));
    }
    Ok(Value::object(IndexMap::new()))
}

fn is(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let (a, b) = (arg(args, 0), arg(args, 1));
    let same = match (&a, &b) {
        (Value::Number(x), Value::Number(y)) if *x == 0.0 && *y == 0.0 => x.is_sign_negative() == y.is_sign_negative(),
        _ => same_value_zero(&a, &b),
    };
    Ok(Value::Bool(same))
}

fn owns(interp: &mut Interpreter, target: &Value, key: &Value) -> Result<bool, Interrupt> {
    let key = interp.to_property_key(key)?;
    Ok(match target {
        Value::Object(obj) => obj.borrow().props.contains_key(key.as_ref()),
        Value::Array(items) => key.as_ref() == "length" || parse_index(&key).is_some_and(|i| i < items.borrow().len()),
        Value::String(s) => {
            key.as_ref() == "length" || parse_index(&key).is_some_and(|i| i < duel_core::strings::char_len(s))
        }
        Value::Function(f) => f.props.borrow().contains_key(key.as_ref()),
        _ => false,
    })
}

fn has_own_property(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(owns(interp, this, &arg(args, 0))?))
}

fn has_own(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let target = arg(args, 0);
    require_object(interp, &target)?;
    Ok(Value::Bool(owns(interp, &target, &arg(args, 1))?))
}

fn to_string(_interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let tag = match this {
        Value::Undefined => "Undefined",
        Value::Null => "Null",
        Value::Array(_) => "Array",
        Value::Function(_) => "Function",
        Value::Object(obj) => match obj.borrow().class {
            ObjectClass::Plain => "Object",
            ObjectClass::Error(_) => "Error",
            ObjectClass::Date(_) => "Date",
        },
        Value::Bool(_) => "Boolean",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Map(_) => "Map",
        Value::Set(_) => "Set",
        Value::RegExp(_) => "RegExp",
    };
    Ok(Value::string(format!("[object {tag}]")))
}

fn value_of(_interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(this.clone())
}
