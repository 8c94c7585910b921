//! `Map` and `Set`, keyed by SameValueZero and iterated in insertion order.
//!
//! `keys()`, `values()` and `entries()` return arrays rather than lazy iterators; they spread and
//! `for…of` the same way.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use duel_core::errors::INVALID_ARRAY_LENGTH_MSG;

use super::{MethodEntry, arg};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::{Function, MapKey, MapRef, SetRef, Value};

pub(crate) const MAP_METHODS: &[MethodEntry] = &[
    ("get", map_get, 1),
    ("set", map_set, 2),
    ("has", map_has, 1),
    ("delete", map_delete, 1),
    ("clear", map_clear, 0),
    ("forEach", map_for_each, 1),
    ("keys", map_keys, 0),
    ("values", map_values, 0),
    ("entries", map_entries, 0),
];

pub(crate) const SET_METHODS: &[MethodEntry] = &[
    ("add", set_add, 1),
    ("has", set_has, 1),
    ("delete", set_delete, 1),
    ("clear", set_clear, 0),
    ("forEach", set_for_each, 1),
    ("keys", set_values, 0),
    ("values", set_values, 0),
    ("entries", set_entries, 0),
];

pub(crate) fn map_constructor() -> Value {
    Value::function(Function::constructor("Map", requires_new, map_construct, 0))
}

pub(crate) fn set_constructor() -> Value {
    Value::function(Function::constructor("Set", requires_new, set_construct, 0))
}

fn requires_new(interp: &mut Interpreter, _this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Err(interp.type_error("Constructor requires 'new'"))
}

fn map_construct(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut map = IndexMap::new();
    let source = arg(args, 0);
    if !source.is_nullish() {
        for entry in interp.iterate(&source)? {
            if !entry.is_object_like() {
                let shown = interp.to_string_lossy(&entry);
                return Err(interp.type_error(format!("Iterator value {shown} is not an entry object")));
            }
            let key = interp.get_member(&entry, &Value::Number(0.0))?;
            let value = interp.get_member(&entry, &Value::Number(1.0))?;
            map.insert(MapKey::from_value(&key), (key, value));
        }
    }
    Ok(Value::Map(Rc::new(RefCell::new(map))))
}

fn set_construct(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut set = IndexMap::new();
    let source = arg(args, 0);
    if !source.is_nullish() {
        for item in interp.iterate(&source)? {
            set.insert(MapKey::from_value(&item), item);
        }
    }
    Ok(Value::Set(Rc::new(RefCell::new(set))))
}

fn this_map(interp: &Interpreter, this: &Value, method: &str) -> Result<MapRef, Interrupt> {
    match this {
        Value::Map(map) => Ok(map.clone()),
        _ => Err(interp.type_error(format!("Method Map.prototype.{method} called on incompatible receiver"))),
    }
}

fn this_set(interp: &Interpreter, this: &Value, method: &str) -> Result<SetRef, Interrupt> {
    match this {
        Value::Set(set) => Ok(set.clone()),
        _ => Err(interp.type_error(format!("Method Set.prototype.{method} called on incompatible receiver"))),
    }
}

fn map_get(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let map = this_map(interp, this, "get")?;
    let key = MapKey::from_value(&arg(args, 0));
    Ok(map.borrow().get(&key).map(|(_, v)| v.clone()).unwrap_or_default())
}

fn map_set(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let map = this_map(interp, this, "set")?;
    let key = arg(args, 0);
    let len = map.borrow().len();
    interp.check_len(len + 1, INVALID_ARRAY_LENGTH_MSG)?;
    // -0 is stored as +0
    let key = match key {
        Value::Number(n) if n == 0.0 => Value::Number(0.0),
        other => other,
    };
    map.borrow_mut().insert(MapKey::from_value(&key), (key, arg(args, 1)));
    Ok(this.clone())
}

fn map_has(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let map = this_map(interp, this, "has")?;
    Ok(Value::Bool(map.borrow().contains_key(&MapKey::from_value(&arg(args, 0)))))
}

fn map_delete(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let map = this_map(interp, this, "delete")?;
    let removed = map.borrow_mut().shift_remove(&MapKey::from_value(&arg(args, 0)));
    Ok(Value::Bool(removed.is_some()))
}

fn map_clear(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    this_map(interp, this, "clear")?.borrow_mut().clear();
    Ok(Value::Undefined)
}

fn map_for_each(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let map = this_map(interp, this, "forEach")?;
    let f = arg(args, 0);
    let mut i = 0;
    loop {
        let Some((key, value)) = map.borrow().get_index(i).map(|(_, kv)| kv.clone()) else { break };
        interp.call(&f, arg(args, 1), vec![value, key, this.clone()])?;
        i += 1;
    }
    Ok(Value::Undefined)
}

fn map_keys(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let map = this_map(interp, this, "keys")?;
    let keys = map.borrow().values().map(|(k, _)| k.clone()).collect();
    Ok(Value::array(keys))
}

fn map_values(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let map = this_map(interp, this, "values")?;
    let values = map.borrow().values().map(|(_, v)| v.clone()).collect();
    Ok(Value::array(values))
}

fn map_entries(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    this_map(interp, this, "entries")?;
    Ok(Value::array(interp.iterate(this)?))
}

fn set_add(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let set = this_set(interp, this, "add")?;
    let len = set.borrow().len();
    interp.check_len(len + 1, INVALID_ARRAY_LENGTH_MSG)?;
    let value = match arg(args, 0) {
        Value::Number(n) if n == 0.0 => Value::Number(0.0),
        other => other,
    };
    set.borrow_mut().entry(MapKey::from_value(&value)).or_insert(value);
    Ok(this.clone())
}

fn set_has(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let set = this_set(interp, this, "has")?;
    Ok(Value::Bool(set.borrow().contains_key(&MapKey::from_value(&arg(args, 0)))))
}

fn set_delete(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let set = this_set(interp, this, "delete")?;
    let removed = set.borrow_mut().shift_remove(&MapKey::from_value(&arg(args, 0)));
    Ok(Value::Bool(removed.is_some()))
}

fn set_clear(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    this_set(interp, this, "clear")?.borrow_mut().clear();
    Ok(Value::Undefined)
}

fn set_for_each(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let set = this_set(interp, this, "forEach")?;
    let f = arg(args, 0);
    let mut i = 0;
    loop {
        let Some(value) = set.borrow().get_index(i).map(|(_, v)| v.clone()) else { break };
        interp.call(&f, arg(args, 1), vec![value.clone(), value, this.clone()])?;
        i += 1;
    }
    Ok(Value::Undefined)
}

fn set_values(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let set = this_set(interp, this, "values")?;
    let values = set.borrow().values().cloned().collect();
    Ok(Value::array(values))
}

fn set_entries(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let set = this_set(interp, this, "entries")?;
    let entries = set
        .borrow()
        .values()
        .map(|v| Value::array(vec![v.clone(), v.clone()]))
        .collect();
    Ok(Value::array(entries))
}
