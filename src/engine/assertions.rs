//! `assert`, `assertEqual`, `assertTrue` and `assertFalse`.
//!
//! Each throws a plain `Error` whose message is the caller's `message` argument when it is truthy, or
//! the registry default otherwise.

use duel_core::errors::ErrorKind;
use duel_core::lang::globals::{ASSERTIONS, AssertionId, assert_equal_message, assertion};

use crate::runtime::value::{NativeFn, strict_equals};
use crate::runtime::{BindingKind, Interpreter, Interrupt, Scope, Value};

/// Declare every assertion in `scope` as a constant.
pub fn install(scope: &Scope) {
    for info in ASSERTIONS {
        let func: NativeFn = match info.id {
            AssertionId::Assert => assert,
            AssertionId::AssertEqual => assert_equal,
            AssertionId::AssertTrue => assert_true,
            AssertionId::AssertFalse => assert_false,
        };
        let arity = if info.id == AssertionId::AssertEqual { 3 } else { 2 };
        scope.declare(info.name, Value::native(info.name, func, arity), BindingKind::Const);
    }
}

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or_default()
}

/// The failure to throw: the `message` argument unless it is falsy, otherwise `default`.
fn failure(interp: &mut Interpreter, message: Value, default: impl FnOnce(&mut Interpreter) -> String) -> Interrupt {
    let message = if message.truthy() {
        interp.to_string_lossy(&message)
    } else {
        default(interp)
    };
    interp.throw(ErrorKind::Error, message)
}

fn default_message(id: AssertionId) -> String {
    assertion(id).default_message.unwrap_or_default().to_string()
}

fn assert(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    if arg(args, 0).truthy() {
        return Ok(Value::Undefined);
    }
    Err(failure(interp, arg(args, 1), |_| default_message(AssertionId::Assert)))
}

fn assert_equal(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    let (actual, expected) = (arg(args, 0), arg(args, 1));
    if strict_equals(&actual, &expected) {
        return Ok(Value::Undefined);
    }
    Err(failure(interp, arg(args, 2), |interp| {
        let expected = interp.to_string_lossy(&expected);
        let actual = interp.to_string_lossy(&actual);
        assert_equal_message(&expected, &actual)
    }))
}

fn assert_true(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    if arg(args, 0).truthy() {
        return Ok(Value::Undefined);
    }
    Err(failure(interp, arg(args, 1), |_| default_message(AssertionId::AssertTrue)))
}

fn assert_false(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> Result<Value, Interrupt> {
    if !arg(args, 0).truthy() {
        return Ok(Value::Undefined);
    }
    Err(failure(interp, arg(args, 1), |_| default_message(AssertionId::AssertFalse)))
}

#[cfg(test)]
mod tests {
    use duel_syntax::parser::parse_source;

    use super::*;
    use crate::runtime::{CapabilitySet, Limits};

    fn check(source: &str) -> Option<String> {
        let mut interp = Interpreter::new(&CapabilitySet::standard(), Limits::default(), None);
        let scope = interp.globals().child();
        install(&scope);
        let program = parse_source(source).unwrap();
        interp.begin_unit();
        interp.run_program(&program, &scope).err().map(|e| interp.interrupt_message(&e))
    }

    #[test]
    fn test_passing_assertions_return_normally() {
        assert_eq!(check("assert(1); assertEqual('a', 'a'); assertTrue([]); assertFalse(0);"), None);
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(check("assert(0);").as_deref(), Some("Assertion failed"));
        assert_eq!(check("assertEqual(2, 3);").as_deref(), Some("Expected 3, but got 2"));
        assert_eq!(check("assertTrue(false);").as_deref(), Some("Expected true"));
        assert_eq!(check("assertFalse('x');").as_deref(), Some("Expected false"));
    }

    #[test]
    fn test_equality_is_strict() {
        assert_eq!(check("assertEqual(1, '1');").as_deref(), Some("Expected 1, but got 1"));
        assert_eq!(check("assertEqual([1], [1]);").as_deref(), Some("Expected 1, but got 1"));
        assert_eq!(check("assertEqual(NaN, NaN);").as_deref(), Some("Expected NaN, but got NaN"));
    }

    #[test]
    fn test_explicit_message_replaces_the_default() {
        assert_eq!(check("assertEqual(1, 2, 'custom');").as_deref(), Some("custom"));
        assert_eq!(check("assert(false, 'why');").as_deref(), Some("why"));
        assert_eq!(check("assert(false, '');").as_deref(), Some("Assertion failed"));
        assert_eq!(check("assertEqual(1, 2, null);").as_deref(), Some("Expected 2, but got 1"));
        assert_eq!(check("assertTrue(false, 0);").as_deref(), Some("Expected true"));
        assert_eq!(check("assertFalse(true, false);").as_deref(), Some("Expected false"));
    }

    #[test]
    fn test_failures_are_catchable_errors() {
        assert_eq!(check("try { assert(false); } catch (e) { if (!(e instanceof Error)) throw 'wrong'; }"), None);
    }
}
