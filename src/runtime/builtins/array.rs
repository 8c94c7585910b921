//! `Array` and the methods of arrays.
//!
//! Callbacks may mutate the array they iterate, so no `RefCell` borrow is held across a call into user
//! code: each step re-reads the element it needs.

use std::cmp::Ordering;

use duel_core::errors::INVALID_ARRAY_LENGTH_MSG;
use duel_core::numbers;

use super::{MethodEntry, arg};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::{ArrayRef, Function, Value, same_value_zero, strict_equals};

pub(crate) const METHODS: &[MethodEntry] = &[
    ("push", push, 1),
    ("pop", pop, 0),
    ("shift", shift, 0),
    ("unshift", unshift, 1),
    ("slice", slice, 2),
    ("splice", splice, 2),
    ("concat", concat, 1),
    ("join", join, 1),
    ("reverse", reverse, 0),
    ("indexOf", index_of, 1),
    ("lastIndexOf", last_index_of, 1),
    ("includes", includes, 1),
    ("find", find, 1),
    ("findIndex", find_index, 1),
    ("findLast", find_last, 1),
    ("findLastIndex", find_last_index, 1),
    ("filter", filter, 1),
    ("map", map, 1),
    ("forEach", for_each, 1),
    ("reduce", reduce, 1),
    ("reduceRight", reduce_right, 1),
    ("some", some, 1),
    ("every", every, 1),
    ("sort", sort, 1),
    ("fill", fill, 1),
    ("flat", flat, 0),
    ("flatMap", flat_map, 1),
    ("at", at, 1),
    ("keys", keys, 0),
    ("values", values, 0),
    ("entries", entries, 0),
    ("toString", to_string, 0),
];

const STATICS: &[MethodEntry] = &[("isArray", is_array, 1), ("from", from, 1), ("of", of, 0)];

pub(crate) fn constructor() -> Value {
    let ctor = Function::constructor("Array", array_call, array_call, 1);
    let ctor = STATICS
        .iter()
        .fold(ctor, |f, &(name, func, arity)| f.with_prop(name, Value::native(name, func, arity)));
    Value::function(ctor)
}

/// `Array(n)` makes `n` holes; any other argument list becomes the elements.
fn array_call(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    if let [Value::Number(n)] = args {
        let Some(len) = numbers::as_index(*n) else {
            return Err(interp.range_error(INVALID_ARRAY_LENGTH_MSG));
        };
        interp.check_len(len, INVALID_ARRAY_LENGTH_MSG)?;
        return Ok(Value::array(vec![Value::Undefined; len]));
    }
    Ok(Value::array(args.to_vec()))
}

fn is_array(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Array(_))))
}

/// `Array.from(iterable | { length }, mapFn?)`.
fn from(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let source = arg(args, 0);
    let items = match &source {
        Value::Object(_) => {
            let len = interp.get_property(&source, "length")?;
            let len = interp.to_integer(&len)?.max(0.0) as usize;
            interp.check_len(len, INVALID_ARRAY_LENGTH_MSG)?;
            let mut items = Vec::with_capacity(len);
            for i in 0..len {
                items.push(interp.get_property(&source, &i.to_string())?);
            }
            items
        }
        Value::Undefined | Value::Null => {
            return Err(interp.type_error(format!("{} is not iterable", source.kind_name())));
        }
        other => interp.iterate(other)?,
    };
    let map_fn = arg(args, 1);
    if matches!(map_fn, Value::Undefined) {
        return Ok(Value::array(items));
    }
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        out.push(interp.call(&map_fn, Value::Undefined, vec![item, Value::Number(i as f64)])?);
    }
    Ok(Value::array(out))
}

fn of(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::array(args.to_vec()))
}

fn this_array(interp: &Interpreter, this: &Value, method: &str) -> Result<ArrayRef, Interrupt> {
    match this {
        Value::Array(items) => Ok(items.clone()),
        _ => Err(interp.type_error(format!("Array.prototype.{method} called on a non-array"))),
    }
}

fn callback(interp: &Interpreter, args: &[Value], method: &str) -> Result<Value, Interrupt> {
    match arg(args, 0) {
        f @ Value::Function(_) => Ok(f),
        other => Err(interp.type_error(format!(
            "{} is not a function (Array.prototype.{method})",
            crate::runtime::inspect::inspect(&other)
        ))),
    }
}

fn element(items: &ArrayRef, i: usize) -> Option<Value> {
    items.borrow().get(i).cloned()
}

/// Call `f(item, index, array)` for every index below the current length.
fn visit(
    interp: &mut Interpreter,
    this: &Value,
    args: &[Value],
    method: &str,
    mut step: impl FnMut(&mut Interpreter, usize, Value, Value) -> Result<bool, Interrupt>,
) -> Result<(), Interrupt> {
    let items = this_array(interp, this, method)?;
    let f = callback(interp, args, method)?;
    let this_arg = arg(args, 1);
    let len = items.borrow().len();
    for i in 0..len {
        let Some(item) = element(&items, i) else { break };
        let result = interp.call(&f, this_arg.clone(), vec![item.clone(), Value::Number(i as f64), this.clone()])?;
        if !step(interp, i, item, result)? {
            break;
        }
    }
    Ok(())
}

fn push(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "push")?;
    let len = items.borrow().len() + args.len();
    interp.check_len(len, INVALID_ARRAY_LENGTH_MSG)?;
    items.borrow_mut().extend_from_slice(args);
    Ok(Value::Number(len as f64))
}

fn pop(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "pop")?;
    let popped = items.borrow_mut().pop();
    Ok(popped.unwrap_or_default())
}

fn shift(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "shift")?;
    let mut items = items.borrow_mut();
    if items.is_empty() {
        return Ok(Value::Undefined);
    }
    Ok(items.remove(0))
}

fn unshift(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "unshift")?;
    let len = items.borrow().len() + args.len();
    interp.check_len(len, INVALID_ARRAY_LENGTH_MSG)?;
    items.borrow_mut().splice(0..0, args.iter().cloned());
    Ok(Value::Number(len as f64))
}

/// Resolve a relative index argument against `len` (`undefined` gives `default`).
fn relative(interp: &mut Interpreter, value: &Value, len: usize, default: usize) -> Result<usize, Interrupt> {
    match value {
        Value::Undefined => Ok(default),
        other => {
            let n = interp.to_integer(other)?;
            Ok(duel_core::strings::relative_index(len, n))
        }
    }
}

fn slice(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "slice")?;
    let len = items.borrow().len();
    let start = relative(interp, &arg(args, 0), len, 0)?;
    let end = relative(interp, &arg(args, 1), len, len)?;
    let out = if start < end { items.borrow()[start..end].to_vec() } else { Vec::new() };
    Ok(Value::array(out))
}

fn splice(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "splice")?;
    let len = items.borrow().len();
    let start = relative(interp, &arg(args, 0), len, 0)?;
    let delete = match args.len() {
        0 => 0,
        1 => len - start,
        _ => {
            let n = interp.to_integer(&args[1])?;
            n.clamp(0.0, (len - start) as f64) as usize
        }
    };
    let inserted = args.get(2..).unwrap_or_default();
    interp.check_len(len - delete + inserted.len(), INVALID_ARRAY_LENGTH_MSG)?;
    let removed: Vec<Value> = items
        .borrow_mut()
        .splice(start..start + delete, inserted.iter().cloned())
        .collect();
    Ok(Value::array(removed))
}

fn concat(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut out = this_array(interp, this, "concat")?.borrow().clone();
    for value in args {
        match value {
            Value::Array(more) => out.extend(more.borrow().iter().cloned()),
            other => out.push(other.clone()),
        }
        interp.check_len(out.len(), INVALID_ARRAY_LENGTH_MSG)?;
    }
    Ok(Value::array(out))
}

fn join(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "join")?;
    let separator = match arg(args, 0) {
        Value::Undefined => ",".into(),
        other => interp.to_string(&other)?,
    };
    let snapshot = items.borrow().clone();
    Ok(Value::string(interp.join_values(&snapshot, &separator)?))
}

fn to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    this_array(interp, this, "toString")?;
    Ok(Value::String(interp.to_string(this)?))
}

fn reverse(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    this_array(interp, this, "reverse")?.borrow_mut().reverse();
    Ok(this.clone())
}

/// Start offset for `indexOf`/`includes`: negative counts back from the end.
fn search_start(interp: &mut Interpreter, value: &Value, len: usize) -> Result<usize, Interrupt> {
    relative(interp, value, len, 0)
}

fn index_of(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "indexOf")?;
    let needle = arg(args, 0);
    let start = search_start(interp, &arg(args, 1), items.borrow().len())?;
    let found = items.borrow().iter().skip(start).position(|v| strict_equals(v, &needle));
    Ok(Value::Number(found.map_or(-1.0, |i| (i + start) as f64)))
}

fn last_index_of(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "lastIndexOf")?;
    let needle = arg(args, 0);
    let len = items.borrow().len();
    let end = match args.get(1) {
        None => len,
        Some(v) => {
            let n = interp.to_integer(v)?;
            if n < 0.0 { (len as f64 + n + 1.0).max(0.0) as usize } else { (n as usize + 1).min(len) }
        }
    };
    let found = items.borrow()[..end].iter().rposition(|v| strict_equals(v, &needle));
    Ok(Value::Number(found.map_or(-1.0, |i| i as f64)))
}

fn includes(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "includes")?;
    let needle = arg(args, 0);
    let start = search_start(interp, &arg(args, 1), items.borrow().len())?;
    let found = items.borrow().iter().skip(start).any(|v| same_value_zero(v, &needle));
    Ok(Value::Bool(found))
}

fn find(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut found = Value::Undefined;
    visit(interp, this, args, "find", |_, _, item, result| {
        if result.truthy() {
            found = item;
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(found)
}

fn find_index(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut found = -1.0;
    visit(interp, this, args, "findIndex", |_, i, _, result| {
        if result.truthy() {
            found = i as f64;
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(Value::Number(found))
}

/// Shared body of `findLast` / `findLastIndex`.
fn find_last_entry(
    interp: &mut Interpreter,
    this: &Value,
    args: &[Value],
    method: &str,
) -> Result<Option<(usize, Value)>, Interrupt> {
    let items = this_array(interp, this, method)?;
    let f = callback(interp, args, method)?;
    let len = items.borrow().len();
    for i in (0..len).rev() {
        let item = element(&items, i).unwrap_or_default();
        let result = interp.call(&f, arg(args, 1), vec![item.clone(), Value::Number(i as f64), this.clone()])?;
        if result.truthy() {
            return Ok(Some((i, item)));
        }
    }
    Ok(None)
}

fn find_last(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(find_last_entry(interp, this, args, "findLast")?.map(|(_, v)| v).unwrap_or_default())
}

fn find_last_index(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let found = find_last_entry(interp, this, args, "findLastIndex")?;
    Ok(Value::Number(found.map_or(-1.0, |(i, _)| i as f64)))
}

fn filter(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut out = Vec::new();
    visit(interp, this, args, "filter", |_, _, item, result| {
        if result.truthy() {
            out.push(item);
        }
        Ok(true)
    })?;
    Ok(Value::array(out))
}

fn map(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut out = Vec::new();
    visit(interp, this, args, "map", |_, _, _, result| {
        out.push(result);
        Ok(true)
    })?;
    Ok(Value::array(out))
}

fn for_each(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    visit(interp, this, args, "forEach", |_, _, _, _| Ok(true))?;
    Ok(Value::Undefined)
}

fn some(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut any = false;
    visit(interp, this, args, "some", |_, _, _, result| {
        any = result.truthy();
        Ok(!any)
    })?;
    Ok(Value::Bool(any))
}

fn every(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut all = true;
    visit(interp, this, args, "every", |_, _, _, result| {
        all = result.truthy();
        Ok(all)
    })?;
    Ok(Value::Bool(all))
}

fn fold(interp: &mut Interpreter, this: &Value, args: &[Value], from_right: bool) -> Result<Value, Interrupt> {
    let method = if from_right { "reduceRight" } else { "reduce" };
    let items = this_array(interp, this, method)?;
    let f = callback(interp, args, method)?;
    let len = items.borrow().len();
    let mut order: Box<dyn Iterator<Item = usize>> = if from_right { Box::new((0..len).rev()) } else { Box::new(0..len) };
    let mut acc = match args.get(1) {
        Some(initial) => initial.clone(),
        None => match order.next() {
            Some(i) => element(&items, i).unwrap_or_default(),
            None => return Err(interp.type_error("Reduce of empty array with no initial value")),
        },
    };
    for i in order {
        let Some(item) = element(&items, i) else { continue };
        acc = interp.call(&f, Value::Undefined, vec![acc, item, Value::Number(i as f64), this.clone()])?;
    }
    Ok(acc)
}

fn reduce(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    fold(interp, this, args, false)
}

fn reduce_right(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    fold(interp, this, args, true)
}

/// Default sort order: `undefined` last, everything else by string value.
fn default_compare(interp: &mut Interpreter, a: &Value, b: &Value) -> Result<Ordering, Interrupt> {
    match (a, b) {
        (Value::Undefined, Value::Undefined) => Ok(Ordering::Equal),
        (Value::Undefined, _) => Ok(Ordering::Greater),
        (_, Value::Undefined) => Ok(Ordering::Less),
        _ => {
            let x = interp.to_string(a)?;
            let y = interp.to_string(b)?;
            Ok(x.encode_utf16().cmp(y.encode_utf16()))
        }
    }
}

/// Stable merge sort whose comparator may fail.
fn merge_sort(
    interp: &mut Interpreter,
    items: Vec<Value>,
    cmp: &mut impl FnMut(&mut Interpreter, &Value, &Value) -> Result<Ordering, Interrupt>,
) -> Result<Vec<Value>, Interrupt> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let mut right = items;
    let left = right.drain(..right.len() / 2).collect();
    let left = merge_sort(interp, left, cmp)?;
    let right = merge_sort(interp, right, cmp)?;
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
        if cmp(interp, a, b)? == Ordering::Greater {
            out.extend(right.next());
        } else {
            out.extend(left.next());
        }
    }
    out.extend(left);
    out.extend(right);
    Ok(out)
}

fn sort(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "sort")?;
    let comparator = arg(args, 0);
    if !matches!(comparator, Value::Undefined | Value::Function(_)) {
        return Err(interp.type_error("The comparison function must be either a function or undefined"));
    }
    let snapshot = items.borrow().clone();
    let sorted = if let Value::Function(_) = comparator {
        merge_sort(interp, snapshot, &mut |interp, a, b| {
            if matches!(a, Value::Undefined) || matches!(b, Value::Undefined) {
                return default_compare(interp, a, b);
            }
            let result = interp.call(&comparator, Value::Undefined, vec![a.clone(), b.clone()])?;
            let n = interp.to_number(&result)?;
            Ok(if n > 0.0 {
                Ordering::Greater
            } else if n < 0.0 {
                Ordering::Less
            } else {
                Ordering::Equal
            })
        })?
    } else {
        merge_sort(interp, snapshot, &mut default_compare)?
    };
    *items.borrow_mut() = sorted;
    Ok(this.clone())
}

fn fill(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "fill")?;
    let len = items.borrow().len();
    let start = relative(interp, &arg(args, 1), len, 0)?;
    let end = relative(interp, &arg(args, 2), len, len)?;
    let value = arg(args, 0);
    for slot in items.borrow_mut().iter_mut().take(end).skip(start) {
        *slot = value.clone();
    }
    Ok(this.clone())
}

fn flatten_into(out: &mut Vec<Value>, items: &[Value], depth: f64) {
    for item in items {
        match item {
            Value::Array(inner) if depth >= 1.0 => {
                let inner = inner.borrow().clone();
                flatten_into(out, &inner, depth - 1.0);
            }
            other => out.push(other.clone()),
        }
    }
}

fn flat(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "flat")?;
    let depth = match arg(args, 0) {
        Value::Undefined => 1.0,
        other => interp.to_integer(&other)?,
    };
    let snapshot = items.borrow().clone();
    let mut out = Vec::new();
    flatten_into(&mut out, &snapshot, depth);
    interp.check_len(out.len(), INVALID_ARRAY_LENGTH_MSG)?;
    Ok(Value::array(out))
}

fn flat_map(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut mapped = Vec::new();
    visit(interp, this, args, "flatMap", |_, _, _, result| {
        mapped.push(result);
        Ok(true)
    })?;
    let mut out = Vec::new();
    flatten_into(&mut out, &mapped, 1.0);
    Ok(Value::array(out))
}

fn at(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "at")?;
    let len = items.borrow().len() as f64;
    let idx = interp.to_integer(&arg(args, 0))?;
    let idx = if idx < 0.0 { len + idx } else { idx };
    if idx < 0.0 || idx >= len {
        return Ok(Value::Undefined);
    }
    Ok(element(&items, idx as usize).unwrap_or_default())
}

fn keys(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let len = this_array(interp, this, "keys")?.borrow().len();
    Ok(Value::array((0..len).map(|i| Value::Number(i as f64)).collect()))
}

fn values(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "values")?;
    let snapshot = items.borrow().clone();
    Ok(Value::array(snapshot))
}

fn entries(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let items = this_array(interp, this, "entries")?;
    let snapshot = items.borrow().clone();
    Ok(Value::array(
        snapshot
            .into_iter()
            .enumerate()
            .map(|(i, v)| Value::array(vec![Value::Number(i as f64), v]))
            .collect(),
    ))
}
