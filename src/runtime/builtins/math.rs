//! `Math`.

use rand::Rng;

use duel_core::numbers::round_half_up;

use super::{MethodEntry, arg, namespace};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::Value;

const METHODS: &[MethodEntry] = &[
    ("abs", abs, 1),
    ("floor", floor, 1),
    ("ceil", ceil, 1),
    ("round", round, 1),
    ("trunc", trunc, 1),
    ("sign", sign, 1),
    ("sqrt", sqrt, 1),
    ("cbrt", cbrt, 1),
    ("exp", exp, 1),
    ("log", log, 1),
    ("log2", log2, 1),
    ("log10", log10, 1),
    ("sin", sin, 1),
    ("cos", cos, 1),
    ("tan", tan, 1),
    ("asin", asin, 1),
    ("acos", acos, 1),
    ("atan", atan, 1),
    ("atan2", atan2, 2),
    ("pow", pow, 2),
    ("hypot", hypot, 2),
    ("min", min, 2),
    ("max", max, 2),
    ("random", random, 0),
];

pub(crate) fn object() -> Value {
    namespace(
        METHODS,
        &[
            ("PI", Value::Number(std::f64::consts::PI)),
            ("E", Value::Number(std::f64::consts::E)),
            ("LN2", Value::Number(std::f64::consts::LN_2)),
            ("LN10", Value::Number(std::f64::consts::LN_10)),
            ("LOG2E", Value::Number(std::f64::consts::LOG2_E)),
            ("LOG10E", Value::Number(std::f64::consts::LOG10_E)),
            ("SQRT2", Value::Number(std::f64::consts::SQRT_2)),
            ("SQRT1_2", Value::Number(std::f64::consts::FRAC_1_SQRT_2)),
        ],
    )
}

fn unary(interp: &mut Interpreter, args: &[Value], f: fn(f64) -> f64) -> Result<Value, Interrupt> {
    let x = interp.to_number(&arg(args, 0))?;
    Ok(Value::Number(f(x)))
}

fn binary(interp: &mut Interpreter, args: &[Value], f: fn(f64, f64) -> f64) -> Result<Value, Interrupt> {
    let x = interp.to_number(&arg(args, 0))?;
    let y = interp.to_number(&arg(args, 1))?;
    Ok(Value::Number(f(x, y)))
}

fn abs(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::abs)
}

fn floor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::floor)
}

fn ceil(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::ceil)
}

fn round(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, round_half_up)
}

fn trunc(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::trunc)
}

fn sign(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, |x| if x == 0.0 || x.is_nan() { x } else { x.signum() })
}

fn sqrt(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::sqrt)
}

fn cbrt(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::cbrt)
}

fn exp(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::exp)
}

fn log(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::ln)
}

fn log2(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::log2)
}

fn log10(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::log10)
}

fn sin(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::sin)
}

fn cos(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::cos)
}

fn tan(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::tan)
}

fn asin(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::asin)
}

fn acos(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::acos)
}

fn atan(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    unary(interp, args, f64::atan)
}

fn atan2(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    binary(interp, args, f64::atan2)
}

fn pow(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    binary(interp, args, crate::runtime::interp::power)
}

fn hypot(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let mut sum = 0.0f64;
    for value in args {
        let x = interp.to_number(value)?;
        if x.is_infinite() {
            return Ok(Value::Number(f64::INFINITY));
        }
        sum += x * x;
    }
    Ok(Value::Number(sum.sqrt()))
}

/// Shared body of `min`/`max`: any NaN argument poisons the result.
fn extremum(interp: &mut Interpreter, args: &[Value], start: f64, pick_left: fn(f64, f64) -> bool) -> Result<Value, Interrupt> {
    let mut best = start;
    let mut nan = false;
    for value in args {
        let x = interp.to_number(value)?;
        if x.is_nan() {
            nan = true;
        } else if pick_left(x, best) || (x == best && x == 0.0 && pick_left(1.0 / x, 1.0 / best)) {
            best = x;
        }
    }
    Ok(Value::Number(if nan { f64::NAN } else { best }))
}

fn min(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    extremum(interp, args, f64::INFINITY, |a, b| a < b)
}

fn max(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    extremum(interp, args, f64::NEG_INFINITY, |a, b| a > b)
}

fn random(interp: &mut Interpreter, _this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Number(interp.rng().gen_range(0.0..1.0)))
}
