use duel_syntax::parser::parse_source;

use crate::runtime::inspect::console_line;
use crate::runtime::{CapabilitySet, Interpreter, Interrupt, Limits};

fn run(source: &str) -> String {
    let program = parse_source(source).expect("source parses");
    let mut interp = Interpreter::new(&CapabilitySet::standard(), Limits::default(), Some(42));
    interp.begin_unit();
    let globals = interp.globals().clone();
    match interp.run_program(&program, &globals) {
        Ok(value) => console_line(&[value]),
        Err(Interrupt::Throw(value)) => format!("throws {}", console_line(&[value])),
        Err(Interrupt::Halt(halt)) => format!("halt {halt}"),
    }
}

// ----------------------------------------------------------------------------
// Arrays
// ----------------------------------------------------------------------------

#[test]
fn test_array_transformations() {
    assert_eq!(run("return [1, 2, 3, 4].filter(n => n % 2 === 0).map(n => n * 10);"), "[ 20, 40 ]");
    assert_eq!(run("return [1, 2, 3].reduce((acc, n) => acc + n, 0);"), "6");
    assert_eq!(run("return [[1, [2]], [3]].flat();"), "[ 1, [ 2 ], 3 ]");
    assert_eq!(run("return [1, 2].flatMap(n => [n, n]);"), "[ 1, 1, 2, 2 ]");
    assert_eq!(run("return [3, 1, 2].indexOf(2);"), "2");
    assert_eq!(run("return [1, NaN].includes(NaN);"), "true");
    assert_eq!(run("return [5, 6, 7].find(n => n > 5);"), "6");
    assert_eq!(run("return [5, 6, 7].findIndex(n => n > 9);"), "-1");
}

#[test]
fn test_reduce_of_empty_array_without_initial_value() {
    assert_eq!(run("[].reduce((a, b) => a + b);"), "throws TypeError: Reduce of empty array with no initial value");
}

#[test]
fn test_default_sort_is_lexicographic_and_stable() {
    assert_eq!(run("return [10, 9, 1, 100].sort();"), "[ 1, 10, 100, 9 ]");
    assert_eq!(run("return [3, undefined, 1].sort();"), "[ 1, 3, undefined ]");
    let stable = "
        const people = [{ n: 'a', age: 30 }, { n: 'b', age: 20 }, { n: 'c', age: 30 }];
        return people.sort((x, y) => x.age - y.age).map(p => p.n).join('');
    ";
    assert_eq!(run(stable), "bac");
}

#[test]
fn test_splice_slice_and_mutators() {
    assert_eq!(run("const a = [1, 2, 3, 4]; const removed = a.splice(1, 2, 'x'); return [a, removed];"),
        "[ [ 1, 'x', 4 ], [ 2, 3 ] ]");
    assert_eq!(run("return [1, 2, 3, 4].slice(-2);"), "[ 3, 4 ]");
    assert_eq!(run("const a = [1, 2]; a.unshift(0); a.push(3); a.shift(); return [a.pop(), a];"), "[ 3, [ 1, 2 ] ]");
    assert_eq!(run("return [1, 2, 3].reverse().join('-');"), "3-2-1");
    assert_eq!(run("return new Array(3).fill(0);"), "[ 0, 0, 0 ]");
}

#[test]
fn test_array_length_assignment_and_invalid_length() {
    assert_eq!(run("const a = [1, 2, 3]; a.length = 1; return a;"), "[ 1 ]");
    assert_eq!(run("new Array(-1);"), "throws RangeError: Invalid array length");
}

#[test]
fn test_array_statics() {
    assert_eq!(run("return Array.from({ length: 3 }, (_, i) => i * i);"), "[ 0, 1, 4 ]");
    assert_eq!(run("return Array.from('hi');"), "[ 'h', 'i' ]");
    assert_eq!(run("return [Array.isArray([]), Array.isArray('a')];"), "[ true, false ]");
    assert_eq!(run("return Array.of(7, 8);"), "[ 7, 8 ]");
}

// ----------------------------------------------------------------------------
// Strings
// ----------------------------------------------------------------------------

#[test]
fn test_string_methods() {
    assert_eq!(run("return ' Hi '.trim().toLowerCase();"), "hi");
    assert_eq!(run("return 'a,b,,c'.split(',');"), "[ 'a', 'b', '', 'c' ]");
    assert_eq!(run("return 'abc'.split('');"), "[ 'a', 'b', 'c' ]");
    assert_eq!(run("return 'hello'.slice(-3, -1);"), "ll");
    assert_eq!(run("return 'hello'.substring(3, 1);"), "el");
    assert_eq!(run("return '5'.padStart(3, '0');"), "005");
    assert_eq!(run("return 'ab'.repeat(3);"), "ababab");
    assert_eq!(run("return 'abc'.at(-1);"), "c");
    assert_eq!(run("return ['Abc'.startsWith('A'), 'Abc'.endsWith('bc'), 'Abc'.includes('x')];"),
        "[ true, true, false ]");
}

#[test]
fn test_string_replace_with_patterns_and_functions() {
    assert_eq!(run("return 'a-b-c'.replace('-', '+');"), "a+b-c");
    assert_eq!(run("return 'a-b-c'.replaceAll('-', '+');"), "a+b+c");
    assert_eq!(run("return 'John Smith'.replace(/(\\w+)\\s(\\w+)/, '$2, $1');"), "Smith, John");
    assert_eq!(run("return 'a1b22'.replace(/\\d+/g, m => `[${m.length}]`);"), "a[1]b[2]");
}

#[test]
fn test_string_match_and_search() {
    assert_eq!(run("return 'x1y23z'.match(/\\d+/g);"), "[ '1', '23' ]");
    assert_eq!(run("return 'abc'.match(/z/);"), "null");
    assert_eq!(run("return 'abc'.search(/c/);"), "2");
}

#[test]
fn test_string_repeat_rejects_negative_counts() {
    assert_eq!(run("'a'.repeat(-1);"), "throws RangeError: Invalid count value: -1");
}

// ----------------------------------------------------------------------------
// Numbers, Math and global functions
// ----------------------------------------------------------------------------

#[test]
fn test_number_formatting() {
    assert_eq!(run("return (1.005).toFixed(2);"), "1.00");
    assert_eq!(run("return (1.45).toFixed(1);"), "1.4");
    assert_eq!(run("return (2.5).toFixed(0);"), "3");
    assert_eq!(run("return (1.45).toPrecision(2);"), "1.4");
    assert_eq!(run("return (255).toString(16);"), "ff");
    assert_eq!(run("return (1234567.891).toLocaleString();"), "1,234,567.891");
    assert_eq!(run("return String(1e21);"), "1e+21");
}

#[test]
fn test_parse_functions() {
    assert_eq!(run("return [parseInt('42px'), parseInt('ff', 16), parseFloat('3.5e2x'), Number('')];"),
        "[ 42, 255, 350, 0 ]");
    assert_eq!(run("return [isNaN('abc'), Number.isNaN('abc'), Number.isInteger(5.0)];"), "[ true, false, true ]");
}

#[test]
fn test_math_functions() {
    assert_eq!(run("return [Math.round(2.5), Math.round(-2.5), Math.trunc(-4.7), Math.sign(-3)];"), "[ 3, -2, -4, -1 ]");
    assert_eq!(run("return [Math.max(), Math.min(1, NaN)];"), "[ -Infinity, NaN ]");
}

#[test]
fn test_math_random_is_reproducible_with_a_seed() {
    let source = "return [Math.random(), Math.random()];";
    assert_eq!(run(source), run(source));
    assert_eq!(run("const r = Math.random(); return r >= 0 && r < 1;"), "true");
}

// ----------------------------------------------------------------------------
// Objects, Map and Set
// ----------------------------------------------------------------------------

#[test]
fn test_object_statics() {
    assert_eq!(run("return Object.entries({ a: 1, b: 2 });"), "[ [ 'a', 1 ], [ 'b', 2 ] ]");
    assert_eq!(run("return Object.assign({ a: 1 }, { b: 2 }, null, { a: 3 });"), "{ a: 3, b: 2 }");
    assert_eq!(run("return Object.fromEntries([['x', 1], ['y', 2]]);"), "{ x: 1, y: 2 }");
    assert_eq!(run("const o = Object.freeze({ a: 1 }); o.a = 2; return [o.a, Object.isFrozen(o)];"), "[ 1, true ]");
    assert_eq!(run("return [Object.is(NaN, NaN), Object.is(0, -0)];"), "[ true, false ]");
    assert_eq!(run("Object.keys(null);"), "throws TypeError: Cannot convert undefined or null to object");
}

#[test]
fn test_integer_keys_enumerate_first() {
    assert_eq!(run("return Object.keys({ b: 1, 2: 1, a: 1, 1: 1 }).join();"), "1,2,b,a");
    assert_eq!(run("return JSON.stringify({ z: 0, 10: 1, 9: 2 });"), r#"{"9":2,"10":1,"z":0}"#);
    assert_eq!(run("const seen = []; for (const k in { x: 1, '01': 2, 0: 3 }) seen.push(k); return seen.join();"), "0,x,01");
    assert_eq!(run("return Object.values({ 4294967295: 'big', 3: 'small' }).join();"), "small,big");
}

#[test]
fn test_has_own_property_and_tag() {
    assert_eq!(run("return [{ a: 1 }.hasOwnProperty('a'), [1].hasOwnProperty('0'), Object.hasOwn({}, 'x')];"),
        "[ true, true, false ]");
    assert_eq!(run("return Object.keys(new Error('m'));"), "[]");
}

#[test]
fn test_map_and_set() {
    let source = "
        const m = new Map();
        m.set('a', 1).set(NaN, 2).set('a', 3);
        const s = new Set([1, 2, 2, 3]);
        s.delete(1);
        return [m.size, m.get('a'), m.get(NaN), m.has('b'), s.size, [...s], [...m.keys()]];
    ";
    assert_eq!(run(source), "[ 2, 3, 2, false, 2, [ 2, 3 ], [ 'a', NaN ] ]");
    assert_eq!(run("return new Map([[1, 'one']]);"), "Map(1) { 1 => 'one' }");
    assert_eq!(run("Map();"), "throws TypeError: Constructor requires 'new'");
}

// ----------------------------------------------------------------------------
// Errors and functions
// ----------------------------------------------------------------------------

#[test]
fn test_error_constructors() {
    assert_eq!(run("const e = new TypeError('bad'); return [e.name, e.message, String(e), e instanceof Error];"),
        "[ 'TypeError', 'bad', 'TypeError: bad', true ]");
    assert_eq!(run("return Error('plain').message;"), "plain");
}

#[test]
fn test_call_apply_bind() {
    let source = "
        function who(greeting, mark) { return greeting + ' ' + this.name + mark; }
        const o = { name: 'Ada' };
        const bound = who.bind(o, 'Hi');
        return [who.call(o, 'Hey', '!'), who.apply(o, ['Yo', '?']), bound('.')];
    ";
    assert_eq!(run(source), "[ 'Hey Ada!', 'Yo Ada?', 'Hi Ada.' ]");
}

// ----------------------------------------------------------------------------
// JSON
// ----------------------------------------------------------------------------

#[test]
fn test_json_stringify() {
    assert_eq!(run("return JSON.stringify({ a: [1, 'x', null], b: undefined, c: () => 1 });"), r#"{"a":[1,"x",null]}"#);
    assert_eq!(run("return JSON.stringify([undefined, NaN]);"), "[null,null]");
    assert_eq!(run("return JSON.stringify({ a: 1, b: [2] }, null, 2);"), "{\n  \"a\": 1,\n  \"b\": [\n    2\n  ]\n}");
    assert_eq!(run("return JSON.stringify({ a: 1, b: 2 }, ['b']);"), r#"{"b":2}"#);
    assert_eq!(run("return JSON.stringify({ a: 1, b: 2 }, (k, v) => typeof v === 'number' ? v * 10 : v);"), r#"{"a":10,"b":20}"#);
    assert_eq!(run("return JSON.stringify(new Date(0));"), r#""1970-01-01T00:00:00.000Z""#);
}

#[test]
fn test_json_stringify_rejects_cycles() {
    assert_eq!(run("const o = {}; o.self = o; JSON.stringify(o);"), "throws TypeError: Converting circular structure to JSON");
}

#[test]
fn test_json_parse() {
    assert_eq!(run(r#"return JSON.parse('{"b": [1, 2.5], "a": "x"}');"#), "{ b: [ 1, 2.5 ], a: 'x' }");
    assert_eq!(run("return JSON.parse('[1, 2]', (k, v) => typeof v === 'number' ? v + 1 : v);"), "[ 2, 3 ]");
    assert_eq!(run("try { JSON.parse('{'); } catch (e) { return e.name; }"), "SyntaxError");
}

// ----------------------------------------------------------------------------
// Dates and regular expressions
// ----------------------------------------------------------------------------

#[test]
fn test_dates_are_utc() {
    assert_eq!(run("const d = new Date(2024, 1, 29, 12); return [d.getFullYear(), d.getMonth(), d.getDate(), d.getDay()];"),
        "[ 2024, 1, 29, 4 ]");
    assert_eq!(run("return new Date('2020-01-02T03:04:05Z').getTime();"), "1577934245000");
    assert_eq!(run("return String(new Date('nonsense'));"), "Invalid Date");
}

#[test]
fn test_regexp_exec_and_last_index() {
    let source = "
        const re = /a(\\d)/g;
        const first = re.exec('a1 a2');
        const second = re.exec('a1 a2');
        return [first[1], first.index, second[1], re.lastIndex, re.test('zzz'), re.lastIndex];
    ";
    assert_eq!(run(source), "[ '1', 0, '2', 5, false, 0 ]");
    assert_eq!(run("return /^ab+c$/i.test('ABBC');"), "true");
}
