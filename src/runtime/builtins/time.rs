//! Clock reads: `Date` and `performance`.
//!
//! Dates are UTC only; there is no local time zone.

use std::time::{SystemTime, UNIX_EPOCH};

use super::{MethodEntry, namespace};
use crate::runtime::error::Interrupt;
use crate::runtime::interp::Interpreter;
use crate::runtime::value::{Function, JsObject, ObjectClass, Value};

const MS_PER_DAY: f64 = 86_400_000.0;
/// Largest time value a date may hold (±100,000,000 days).
const MAX_TIME: f64 = 8.64e15;

pub(crate) const DATE_METHODS: &[MethodEntry] = &[
    ("getTime", get_time, 0),
    ("valueOf", get_time, 0),
    ("toISOString", to_iso_string, 0),
    ("toJSON", to_json, 0),
    ("toString", to_string, 0),
    ("getFullYear", get_full_year, 0),
    ("getMonth", get_month, 0),
    ("getDate", get_date, 0),
    ("getDay", get_day, 0),
    ("getHours", get_hours, 0),
    ("getMinutes", get_minutes, 0),
    ("getSeconds", get_seconds, 0),
    ("getMilliseconds", get_milliseconds, 0),
];

const DATE_STATICS: &[MethodEntry] = &[("now", now, 0)];
const PERFORMANCE_METHODS: &[MethodEntry] = &[("now", performance_now, 0)];

pub(crate) fn date_constructor() -> Value {
    let ctor = Function::constructor("Date", date_call, date_construct, 7);
    let ctor = DATE_STATICS
        .iter()
        .fold(ctor, |f, &(name, func, arity)| f.with_prop(name, Value::native(name, func, arity)));
    Value::function(ctor)
}

pub(crate) fn performance() -> Value {
    namespace(PERFORMANCE_METHODS, &[])
}

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

fn time_clip(ms: f64) -> f64 {
    if !ms.is_finite() || ms.abs() > MAX_TIME { f64::NAN } else { ms.trunc() + 0.0 }
}

/// Days since the epoch for a proleptic Gregorian date (`month` is 1-based).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// `(year, month 1-12, day 1-31)` for days since the epoch.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Calendar fields of a time value.
struct Fields {
    year: i64,
    month: i64,
    day: i64,
    weekday: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    millis: i64,
}

fn fields(ms: f64) -> Option<Fields> {
    if ms.is_nan() {
        return None;
    }
    let ms = ms as i64;
    let days = ms.div_euclid(MS_PER_DAY as i64);
    let in_day = ms.rem_euclid(MS_PER_DAY as i64);
    let (year, month, day) = civil_from_days(days);
    Some(Fields {
        year,
        month,
        day,
        weekday: (days + 4).rem_euclid(7),
        hours: in_day / 3_600_000,
        minutes: in_day / 60_000 % 60,
        seconds: in_day / 1000 % 60,
        millis: in_day % 1000,
    })
}

/// `YYYY-MM-DDTHH:mm:ss.sssZ`, or `None` for an invalid date.
pub(crate) fn iso_string(ms: f64) -> Option<String> {
    let f = fields(ms)?;
    let year = if (0..=9999).contains(&f.year) {
        format!("{:04}", f.year)
    } else if f.year < 0 {
        format!("-{:06}", -f.year)
    } else {
        format!("+{:06}", f.year)
    };
    Some(format!(
        "{year}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        f.month, f.day, f.hours, f.minutes, f.seconds, f.millis
    ))
}

/// Parse the ISO forms `YYYY-MM-DD` and `YYYY-MM-DDTHH:mm(:ss(.sss))(Z)`, read as UTC.
fn parse_iso(s: &str) -> f64 {
    let s = s.trim();
    let (date, time) = match s.split_once(['T', ' ']) {
        Some((d, t)) => (d, Some(t.trim_end_matches('Z'))),
        None => (s, None),
    };
    let mut parts = date.split('-').map(str::parse::<i64>);
    let (Some(Ok(year)), month, day) = (parts.next(), parts.next(), parts.next()) else {
        return f64::NAN;
    };
    let month = match month {
        Some(Ok(m)) if (1..=12).contains(&m) => m,
        None => 1,
        _ => return f64::NAN,
    };
    let day = match day {
        Some(Ok(d)) if (1..=31).contains(&d) => d,
        None => 1,
        _ => return f64::NAN,
    };
    let mut ms = days_from_civil(year, month, day) as f64 * MS_PER_DAY;
    if let Some(time) = time {
        let mut hms = time.split(':');
        let hours = hms.next().and_then(|h| h.parse::<f64>().ok());
        let minutes = hms.next().and_then(|m| m.parse::<f64>().ok());
        let seconds = hms.next().map(|s| s.parse::<f64>().ok()).unwrap_or(Some(0.0));
        let (Some(h), Some(m), Some(sec)) = (hours, minutes, seconds) else {
            return f64::NAN;
        };
        ms += h * 3_600_000.0 + m * 60_000.0 + (sec * 1000.0).round();
    }
    time_clip(ms)
}

fn date_value(ms: f64) -> Value {
    Value::from_object(JsObject::new(ObjectClass::Date(time_clip(ms))))
}

fn date_call(_interp: &mut Interpreter, _this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::string(iso_string(now_ms()).unwrap_or_default()))
}

fn date_construct(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let ms = match args {
        [] => now_ms(),
        [Value::String(s)] => parse_iso(s),
        [single] => match single {
            Value::Object(o) => match o.borrow().class {
                ObjectClass::Date(ms) => ms,
                _ => f64::NAN,
            },
            other => interp.to_number(other)?,
        },
        [year, month, rest @ ..] => {
            let mut parts = [interp.to_number(year)?, interp.to_number(month)?, 1.0, 0.0, 0.0, 0.0, 0.0];
            for (slot, value) in parts[2..].iter_mut().zip(rest) {
                *slot = interp.to_number(value)?;
            }
            if parts.iter().any(|p| !p.is_finite()) {
                f64::NAN
            } else {
                let [y, mo, d, h, mi, s, milli] = parts.map(|p| p.trunc());
                let y = if (0.0..=99.0).contains(&y) { 1900.0 + y } else { y };
                let year = y as i64 + (mo as i64).div_euclid(12);
                let month = (mo as i64).rem_euclid(12) + 1;
                let days = days_from_civil(year, month, 1) as f64 + d - 1.0;
                days * MS_PER_DAY + h * 3_600_000.0 + mi * 60_000.0 + s * 1000.0 + milli
            }
        }
    };
    Ok(date_value(ms))
}

fn now(_interp: &mut Interpreter, _this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Number(now_ms()))
}

fn performance_now(interp: &mut Interpreter, _this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Number(interp.elapsed_ms()))
}

fn this_time(interp: &Interpreter, this: &Value) -> Result<f64, Interrupt> {
    if let Value::Object(o) = this {
        if let ObjectClass::Date(ms) = o.borrow().class {
            return Ok(ms);
        }
    }
    Err(interp.type_error("this is not a Date object."))
}

fn get_time(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(Value::Number(this_time(interp, this)?))
}

fn to_iso_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    match iso_string(this_time(interp, this)?) {
        Some(s) => Ok(Value::string(s)),
        None => Err(interp.range_error("Invalid time value")),
    }
}

fn to_json(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    Ok(iso_string(this_time(interp, this)?).map(Value::string).unwrap_or(Value::Null))
}

fn to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    let ms = this_time(interp, this)?;
    Ok(Value::string(iso_string(ms).unwrap_or_else(|| "Invalid Date".to_string())))
}

fn field(
    interp: &Interpreter,
    this: &Value,
    pick: impl FnOnce(&Fields) -> i64,
) -> Result<Value, Interrupt> {
    let ms = this_time(interp, this)?;
    Ok(Value::Number(fields(ms).map(|f| pick(&f) as f64).unwrap_or(f64::NAN)))
}

fn get_full_year(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    field(interp, this, |f| f.year)
}

fn get_month(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    field(interp, this, |f| f.month - 1)
}

fn get_date(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    field(interp, this, |f| f.day)
}

fn get_day(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    field(interp, this, |f| f.weekday)
}

fn get_hours(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    field(interp, this, |f| f.hours)
}

fn get_minutes(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    field(interp, this, |f| f.minutes)
}

fn get_seconds(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    field(interp, this, |f| f.seconds)
}

fn get_milliseconds(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> Result<Value, Interrupt> {
    field(interp, this, |f| f.millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_round_trip_around_epoch_and_leap_days() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(days_from_civil(2024, 2, 29)), (2024, 2, 29));
        assert_eq!(civil_from_days(-1), (1969, 12, 31));
    }

    #[test]
    fn test_iso_string_formats_utc() {
        assert_eq!(iso_string(0.0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
        assert_eq!(iso_string(1_700_000_000_123.0).as_deref(), Some("2023-11-14T22:13:20.123Z"));
        assert_eq!(iso_string(f64::NAN), None);
    }

    #[test]
    fn test_parse_iso_date_and_time() {
        assert_eq!(parse_iso("1970-01-02"), MS_PER_DAY);
        assert_eq!(parse_iso("2023-11-14T22:13:20.123Z"), 1_700_000_000_123.0);
        assert!(parse_iso("yesterday").is_nan());
    }
}
