use duel_syntax::parser::parse_source;

use crate::runtime::inspect::console_line;
use crate::runtime::{CapabilitySet, Halt, Interpreter, Interrupt, Limits};

fn run_with(limits: Limits, source: &str) -> String {
    let program = parse_source(source).expect("source parses");
    let mut interp = Interpreter::new(&CapabilitySet::standard(), limits, Some(7));
    interp.begin_unit();
    let globals = interp.globals().clone();
    match interp.run_program(&program, &globals) {
        Ok(value) => console_line(&[value]),
        Err(Interrupt::Throw(value)) => format!("throws {}", console_line(&[value])),
        Err(Interrupt::Halt(halt)) => format!("halt {halt}"),
    }
}

fn run(source: &str) -> String {
    run_with(Limits::default(), source)
}

#[test]
fn test_arithmetic_and_precedence() {
    assert_eq!(run("return 1 + 2 * 3 ** 2;"), "19");
    assert_eq!(run("return (1 + 2) * 3;"), "9");
    assert_eq!(run("return 7 % 3 + -7 % 3;"), "0");
    assert_eq!(run("return 0.1 + 0.2;"), "0.30000000000000004");
    assert_eq!(run("return 1 / 0;"), "Infinity");
    assert_eq!(run("return 5 >>> 1 | 8;"), "10");
}

#[test]
fn test_string_concatenation_coerces() {
    assert_eq!(run("return '1' + 2 + 3;"), "123");
    assert_eq!(run("return 1 + 2 + '3';"), "33");
    assert_eq!(run("return [1, 2] + '';"), "1,2");
    assert_eq!(run("return {} + '';"), "[object Object]");
    assert_eq!(run("return `a${1 + 1}b${'c'}`;"), "a2bc");
}

#[test]
fn test_equality_rules() {
    assert_eq!(run("return [1 == '1', 1 === '1', null == undefined, null === undefined, NaN == NaN];"),
        "[ true, false, true, false, false ]");
    assert_eq!(run("const a = []; return [a == a, [] == []];"), "[ true, false ]");
}

#[test]
fn test_let_is_block_scoped_and_var_is_hoisted() {
    assert_eq!(run("let x = 1; { let x = 2; } return x;"), "1");
    assert_eq!(run("function f() { if (true) { var y = 3; } return y; } return f();"), "3");
    assert_eq!(run("return typeof later; var later = 1;"), "undefined");
    assert_eq!(run("return x; let x = 1;"), "throws ReferenceError: Cannot access 'x' before initialization");
}

#[test]
fn test_const_reassignment_is_a_type_error() {
    assert_eq!(run("const c = 1; c = 2;"), "throws TypeError: Assignment to constant variable.");
}

#[test]
fn test_undeclared_identifier() {
    assert_eq!(run("return missing + 1;"), "throws ReferenceError: missing is not defined");
    assert_eq!(run("return typeof missing;"), "undefined");
}

#[test]
fn test_closures_capture_per_iteration_bindings() {
    let source = "
        const fns = [];
        for (let i = 0; i < 3; i++) { fns.push(() => i); }
        return fns.map(f => f());
    ";
    assert_eq!(run(source), "[ 0, 1, 2 ]");
    let counter = "
        function makeCounter() { let n = 0; return { inc() { n += 1; return n; } }; }
        const c = makeCounter(); c.inc(); c.inc();
        return c.inc();
    ";
    assert_eq!(run(counter), "3");
}

#[test]
fn test_function_hoisting_and_recursion() {
    assert_eq!(run("return fact(5); function fact(n) { return n <= 1 ? 1 : n * fact(n - 1); }"), "120");
}

#[test]
fn test_default_rest_and_destructuring_parameters() {
    assert_eq!(run("function f(a, b = a * 2, ...rest) { return [a, b, rest]; } return f(1);"), "[ 1, 2, [] ]");
    assert_eq!(run("function f({ x, y = 5 }, [p, , q]) { return x + y + p + q; } return f({ x: 1 }, [10, 0, 100]);"), "116");
    assert_eq!(run("const { a, ...others } = { a: 1, b: 2, c: 3 }; return others;"), "{ b: 2, c: 3 }");
    assert_eq!(run("let a = 1, b = 2; [a, b] = [b, a]; return [a, b];"), "[ 2, 1 ]");
}

#[test]
fn test_this_binding() {
    assert_eq!(run("const o = { v: 4, get() { return this.v; } }; return o.get();"), "4");
    assert_eq!(run("const o = { v: 4, get() { return [1].map(() => this.v); } }; return o.get();"), "[ 4 ]");
    assert_eq!(run("function F(v) { this.v = v; } const f = new F(9); return f.v;"), "9");
}

#[test]
fn test_constructor_prototype_methods_and_instanceof() {
    let source = "
        function Point(x) { this.x = x; }
        Point.prototype.double = function () { return this.x * 2; };
        const p = new Point(21);
        return [p.double(), p instanceof Point, p instanceof Object, [] instanceof Array];
    ";
    assert_eq!(run(source), "[ 42, true, true, true ]");
}

#[test]
fn test_arrow_is_not_a_constructor() {
    assert_eq!(run("const A = () => 1; new A();"), "throws TypeError: A is not a constructor");
}

#[test]
fn test_calling_a_non_function() {
    assert_eq!(run("const o = {}; o.nope();"), "throws TypeError: o.nope is not a function");
    assert_eq!(run("null.x;"), "throws TypeError: Cannot read properties of null (reading 'x')");
}

#[test]
fn test_optional_chaining_and_nullish_coalescing() {
    assert_eq!(run("const o = null; return o?.a.b.c;"), "undefined");
    assert_eq!(run("const o = { f: null }; return o.f?.();"), "undefined");
    assert_eq!(run("return [null ?? 1, 0 ?? 1, 0 || 1, '' && 2];"), "[ 1, 0, 1, '' ]");
    assert_eq!(run("let x = null; x ??= 5; let y = 1; y ||= 9; return [x, y];"), "[ 5, 1 ]");
}

#[test]
fn test_compound_assignment_evaluates_target_once() {
    let source = "
        let calls = 0;
        const arr = [10, 20];
        function idx() { calls++; return 1; }
        arr[idx()] += 5;
        arr[idx()]++;
        return [arr, calls];
    ";
    assert_eq!(run(source), "[ [ 10, 26 ], 2 ]");
}

#[test]
fn test_update_expressions() {
    assert_eq!(run("let i = 1; const a = i++; const b = ++i; return [a, b, i];"), "[ 1, 3, 3 ]");
}

#[test]
fn test_loops_break_and_continue() {
    let source = "
        let out = [];
        for (let i = 0; i < 10; i++) {
            if (i % 2) continue;
            if (i > 6) break;
            out.push(i);
        }
        let n = 0;
        do { n++; } while (n < 3);
        while (true) { n++; if (n === 5) break; }
        return [out, n];
    ";
    assert_eq!(run(source), "[ [ 0, 2, 4, 6 ], 5 ]");
}

#[test]
fn test_for_of_and_for_in() {
    assert_eq!(run("let s = ''; for (const c of 'abc') s += c.toUpperCase(); return s;"), "ABC");
    assert_eq!(run("const ks = []; for (const k in { a: 1, b: 2 }) ks.push(k); return ks;"), "[ 'a', 'b' ]");
    assert_eq!(run("let t = 0; for (const [k, v] of new Map([['a', 1], ['b', 2]])) t += v; return t;"), "3");
    assert_eq!(run("for (const x of 5) {}"), "throws TypeError: 5 is not iterable");
}

#[test]
fn test_switch_falls_through_until_break() {
    let source = "
        function classify(n) {
            let out = '';
            switch (n) {
                case 1: out += 'one';
                case 2: out += 'two'; break;
                default: out += 'other';
            }
            return out;
        }
        return [classify(1), classify(2), classify('1')];
    ";
    assert_eq!(run(source), "[ 'onetwo', 'two', 'other' ]");
}

#[test]
fn test_try_catch_finally() {
    let source = "
        const log = [];
        function f() {
            try { throw new RangeError('bad'); }
            catch (e) { log.push(e.name + ':' + e.message); return 'caught'; }
            finally { log.push('finally'); }
        }
        const r = f();
        return [r, log];
    ";
    assert_eq!(run(source), "[ 'caught', [ 'RangeError:bad', 'finally' ] ]");
    assert_eq!(run("try { throw 'plain'; } catch { return 'ok'; }"), "ok");
    assert_eq!(run("try { undefinedFn(); } catch (e) { return e instanceof ReferenceError; }"), "true");
}

#[test]
fn test_thrown_non_errors_propagate_unchanged() {
    assert_eq!(run("throw { code: 42 };"), "throws { code: 42 }");
}

#[test]
fn test_deep_recursion_is_a_catchable_range_error() {
    let source = "
        function down(n) { return down(n + 1); }
        try { down(0); } catch (e) { return e instanceof RangeError && e.message; }
    ";
    assert_eq!(run(source), "Maximum call stack size exceeded");
}

#[test]
fn test_step_budget_halts_and_is_not_catchable() {
    let limits = Limits::default().with_max_steps(10_000);
    let out = run_with(limits, "try { while (true) {} } catch (e) { return 'caught'; } finally { return 'finally'; }");
    assert_eq!(out, format!("halt {}", Halt::StepBudget(10_000)));
}

#[test]
fn test_typeof_table() {
    assert_eq!(
        run("return [typeof 1, typeof 'a', typeof true, typeof undefined, typeof null, typeof {}, typeof [], typeof (() => 1)];"),
        "[ 'number', 'string', 'boolean', 'undefined', 'object', 'object', 'object', 'function' ]"
    );
}

#[test]
fn test_delete_and_in() {
    assert_eq!(run("const o = { a: 1, b: 2 }; delete o.a; return ['a' in o, 'b' in o, Object.keys(o)];"),
        "[ false, true, [ 'b' ] ]");
}

#[test]
fn test_spread_in_calls_arrays_and_objects() {
    assert_eq!(run("return Math.max(...[1, 5, 3]);"), "5");
    assert_eq!(run("return [0, ...'ab', ...[1]];"), "[ 0, 'a', 'b', 1 ]");
    assert_eq!(run("const a = { x: 1 }; return { ...a, y: 2, x: 3 };"), "{ x: 3, y: 2 }");
}

#[test]
fn test_function_names_are_inferred() {
    assert_eq!(run("const f = () => 1; const o = { m() {} }; return [f.name, o.m.name];"), "[ 'f', 'm' ]");
    assert_eq!(run("const g = function inner() { return typeof inner; }; return [g.name, g()];"), "[ 'inner', 'function' ]");
}

#[test]
fn test_arguments_object() {
    assert_eq!(run("function f() { return arguments.length; } return f(1, 2, 3);"), "3");
}

#[test]
fn test_console_output_is_captured() {
    let program = parse_source("console.log('a', 1, [2]); console.warn({ k: 'v' });").expect("parses");
    let mut interp = Interpreter::new(&CapabilitySet::standard(), Limits::default(), None);
    interp.begin_unit();
    let globals = interp.globals().clone();
    interp.run_program(&program, &globals).expect("runs");
    assert_eq!(interp.take_output(), vec!["a 1 [ 2 ]".to_string(), "{ k: 'v' }".to_string()]);
}

#[test]
fn test_withheld_capabilities_are_not_defined() {
    let program = parse_source("return Math.abs(-1);").expect("parses");
    let caps = CapabilitySet::standard().without(duel_core::lang::globals::CapabilityClass::Math);
    let mut interp = Interpreter::new(&caps, Limits::default(), None);
    interp.begin_unit();
    let globals = interp.globals().clone();
    let err = interp.run_program(&program, &globals).expect_err("Math is withheld");
    assert_eq!(interp.interrupt_message(&err), "Math is not defined");
}

#[test]
fn test_globals_are_read_only() {
    assert_eq!(run("Math = 1;"), "throws TypeError: Assignment to constant variable.");
}
