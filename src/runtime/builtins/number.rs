//! `Number`, `Boolean` and the methods of number and boolean primitives.

use duel_core::numbers;

use super::{MethodEntry, arg};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::{Function, Value};

pub(crate) const METHODS: &[MethodEntry] = &[
    ("toFixed", to_fixed, 1),
    ("toString", to_string, 1),
    ("toPrecision", to_precision, 1),
    ("toLocaleString", to_locale_string, 0),
    ("valueOf", value_of, 0),
];

pub(crate) const BOOLEAN_METHODS: &[MethodEntry] = &[("toString", bool_to_string, 0), ("valueOf", value_of, 0)];

const STATICS: &[MethodEntry] = &[
    ("isInteger", is_integer, 1),
    ("isSafeInteger", is_safe_integer, 1),
    ("isFinite", is_finite, 1),
    ("isNaN", is_nan, 1),
    ("parseFloat", super::global_fns::parse_float, 1),
    ("parseInt", super::global_fns::parse_int, 2),
];

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub(crate) fn constructor() -> Value {
    let ctor = Function::constructor("Number", number_call, number_call, 1)
        .with_prop("MAX_SAFE_INTEGER", Value::Number(MAX_SAFE_INTEGER))
        .with_prop("MIN_SAFE_INTEGER", Value::Number(-MAX_SAFE_INTEGER))
        .with_prop("EPSILON", Value::Number(f64::EPSILON))
        .with_prop("MAX_VALUE", Value::Number(f64::MAX))
        .with_prop("MIN_VALUE", Value::Number(5e-324))
        .with_prop("POSITIVE_INFINITY", Value::Number(f64::INFINITY))
        .with_prop("NEGATIVE_INFINITY", Value::Number(f64::NEG_INFINITY))
        .with_prop("NaN", Value::Number(f64::NAN));
    let ctor = STATICS
        .iter()
        .fold(ctor, |f, &(name, func, arity)| f.with_prop(name, Value::native(name, func, arity)));
    Value::function(ctor)
}

pub(crate) fn boolean_constructor() -> Value {
    Value::function(Function::constructor("Boolean", boolean_call, boolean_call, 1))
}

fn number_call(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    match args.first() {
        None => Ok(Value::Number(0.0)),
        Some(value) => Ok(Value::Number(interp.to_number(value)?)),
    }
}

fn boolean_call(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(arg(args, 0).truthy()))
}

fn is_integer(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Number(n) if n.is_finite() && n.fract() == 0.0)))
}

fn is_safe_integer(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(
        matches!(arg(args, 0), Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER),
    ))
}

fn is_finite(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Number(n) if n.is_finite())))
}

fn is_nan(_interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Bool(matches!(arg(args, 0), Value::Number(n) if n.is_nan())))
}

fn this_number(interp: &Interpreter, this: &Value, method: &str) -> Result<f64, Interrupt> {
    match this {
        Value::Number(n) => Ok(*n),
        _ => Err(interp.type_error(format!("Number.prototype.{method} requires that 'this' be a Number"))),
    }
}

/// Fraction-digit or precision argument, validated against `range`.
fn digits_arg(
    interp: &mut Interpreter,
    value: &Value,
    range: std::ops::RangeInclusive<f64>,
    what: &str,
) -> Result<usize, Interrupt> {
    let digits = interp.to_integer(value)?;
    if !range.contains(&digits) {
        return Err(interp.range_error(format!(
            "{what} argument must be between {} and {}",
            range.start(),
            range.end()
        )));
    }
    Ok(digits as usize)
}

fn to_fixed(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let n = this_number(interp, this, "toFixed")?;
    let digits = digits_arg(interp, &arg(args, 0), 0.0..=100.0, "toFixed() digits")?;
    Ok(Value::string(numbers::to_fixed(n, digits)))
}

fn to_string(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let n = this_number(interp, this, "toString")?;
    let radix = match arg(args, 0) {
        Value::Undefined => 10,
        other => digits_arg(interp, &other, 2.0..=36.0, "toString() radix")? as u32,
    };
    Ok(Value::string(numbers::to_radix_string(n, radix)))
}

fn to_precision(interp: &mut Interpreter, this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let n = this_number(interp, this, "toPrecision")?;
    if matches!(arg(args, 0), Value::Undefined) || !n.is_finite() {
        return Ok(Value::string(numbers::to_display(n)));
    }
    let precision = digits_arg(interp, &arg(args, 0), 1.0..=100.0, "toPrecision()")?;
    if n == 0.0 {
        return Ok(Value::string(numbers::to_fixed(0.0, precision - 1)));
    }
    let exponent = n.abs().log10().floor() as i32;
    if exponent < -6 || exponent >= precision as i32 {
        let formatted = format!("{:.*e}", precision - 1, n);
        // Rust writes `1.5e3`; the script language writes `1.5e+3`
        let formatted = match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
        return Ok(Value::string(formatted));
    }
    let fraction = (precision as i32 - 1 - exponent).max(0) as usize;
    Ok(Value::string(numbers::to_fixed(n, fraction)))
}

/// `en-US` grouping with at most three fraction digits.
fn to_locale_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let n = this_number(interp, this, "toLocaleString")?;
    if !n.is_finite() {
        return Ok(Value::string(numbers::to_display(n)));
    }
    let fixed = numbers::to_fixed(n.abs(), 3);
    let (int, frac) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac = frac.trim_end_matches('0');
    let mut grouped = String::new();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if n < 0.0 { "-" } else { "" };
    let out = if frac.is_empty() { format!("{sign}{grouped}") } else { format!("{sign}{grouped}.{frac}") };
    Ok(Value::string(out))
}

fn value_of(_interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(this.clone())
}

fn bool_to_string(_interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::string(if this.truthy() { "true" } else { "false" }))
}
