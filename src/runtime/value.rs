//! Runtime values for the script interpreter.
//!
//! Reference types (arrays, objects, functions, maps, sets) are `Rc<RefCell<..>>` so that aliasing behaves
//! like the language expects: `const b = a; b.push(1)` is visible through `a`. Primitive strings are
//! `Rc<str>` and cheap to clone.
//!
//! ## Notes
//! - There are no prototype chains. Methods of built-in types are resolved by name in
//!   [`crate::runtime::builtins`]; user objects only carry own properties.
//! - Coercions that may call back into user code (`valueOf`/`toString` methods) live on
//!   [`crate::runtime::Interpreter`]; the helpers here are the pure, primitive-only ones.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use duel_core::errors::ErrorKind;
use duel_core::numbers;
use duel_syntax::ast;
use indexmap::IndexMap;

use super::error::Interrupt;
use super::interp::Interpreter;
use super::scope::Scope;

/// Signature of every host-implemented function: `(interpreter, this, args)`.
pub type NativeFn = fn(&mut Interpreter, &Value, &[Value]) -> Result<Value, Interrupt>;

pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
pub type ObjectRef = Rc<RefCell<JsObject>>;
pub type MapRef = Rc<RefCell<IndexMap<MapKey, (Value, Value)>>>;
pub type SetRef = Rc<RefCell<IndexMap<MapKey, Value>>>;

/// A script value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(Rc<Function>),
    Map(MapRef),
    Set(SetRef),
    RegExp(Rc<RegExp>),
}

/// What kind of object a [`JsObject`] is; decides which built-in methods it answers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectClass {
    Plain,
    Error(ErrorKind),
    /// Milliseconds since the Unix epoch (NaN for an invalid date).
    Date(f64),
}

/// A property bag with insertion-ordered keys.
#[derive(Clone)]
pub struct JsObject {
    pub class: ObjectClass,
    pub props: IndexMap<String, Value>,
    /// The user function this object was created by with `new`, for `instanceof`.
    pub constructor: Option<Rc<Function>>,
    pub frozen: bool,
}

impl JsObject {
    pub fn new(class: ObjectClass) -> Self {
        Self {
            class,
            props: IndexMap::new(),
            constructor: None,
            frozen: false,
        }
    }

    pub fn plain(props: IndexMap<String, Value>) -> Self {
        Self {
            props,
            ..Self::new(ObjectClass::Plain)
        }
    }

    /// Own properties in enumeration order.
    pub fn entries(&self) -> Vec<(&String, &Value)> {
        enumeration_order(&self.props)
    }
}

/// Array-index keys (`"0"` up to `"4294967294"`) ascending, then every other key as inserted.
pub fn enumeration_order(props: &IndexMap<String, Value>) -> Vec<(&String, &Value)> {
    let mut indexed = Vec::new();
    let mut named = Vec::with_capacity(props.len());
    for entry in props {
        match array_index(entry.0) {
            Some(idx) => indexed.push((idx, entry)),
            None => named.push(entry),
        }
    }
    if indexed.is_empty() {
        return named;
    }
    indexed.sort_by_key(|(idx, _)| *idx);
    indexed.into_iter().map(|(_, entry)| entry).chain(named).collect()
}

fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&idx| idx != u32::MAX)
}

/// A callable value plus its own properties (`fn.cache = ...`, static members of built-in constructors).
pub struct Function {
    pub kind: FunctionKind,
    pub props: RefCell<IndexMap<String, Value>>,
}

pub enum FunctionKind {
    Closure(Closure),
    Native(Native),
    Bound(Bound),
}

/// A user-defined function together with the scope it closes over.
pub struct Closure {
    pub def: Rc<ast::Function>,
    pub scope: Scope,
    pub name: Rc<str>,
}

/// A host function.
pub struct Native {
    pub name: &'static str,
    pub func: NativeFn,
    pub arity: usize,
    /// Behaviour under `new`; `None` means the function is not a constructor.
    pub construct: Option<NativeFn>,
}

/// The result of `fn.bind(thisArg, ...args)`.
pub struct Bound {
    pub target: Rc<Function>,
    pub this: Value,
    pub args: Vec<Value>,
}

impl Function {
    pub fn closure(def: Rc<ast::Function>, scope: Scope, name: Rc<str>) -> Self {
        Self {
            kind: FunctionKind::Closure(Closure { def, scope, name }),
            props: RefCell::new(IndexMap::new()),
        }
    }

    pub fn native(name: &'static str, func: NativeFn, arity: usize) -> Self {
        Self {
            kind: FunctionKind::Native(Native {
                name,
                func,
                arity,
                construct: None,
            }),
            props: RefCell::new(IndexMap::new()),
        }
    }

    /// A host constructor: `func` handles plain calls, `construct` handles `new`.
    pub fn constructor(name: &'static str, func: NativeFn, construct: NativeFn, arity: usize) -> Self {
        Self {
            kind: FunctionKind::Native(Native {
                name,
                func,
                arity,
                construct: Some(construct),
            }),
            props: RefCell::new(IndexMap::new()),
        }
    }

    /// The `name` property.
    pub fn name(&self) -> Rc<str> {
        match &self.kind {
            FunctionKind::Closure(c) => c.name.clone(),
            FunctionKind::Native(n) => Rc::from(n.name),
            FunctionKind::Bound(b) => Rc::from(format!("bound {}", b.target.name())),
        }
    }

    /// The `length` property.
    pub fn arity(&self) -> usize {
        match &self.kind {
            FunctionKind::Closure(c) => c.def.arity(),
            FunctionKind::Native(n) => n.arity,
            FunctionKind::Bound(b) => b.target.arity().saturating_sub(b.args.len()),
        }
    }

    /// Name of a host function, if this is one.
    pub fn native_name(&self) -> Option<&'static str> {
        match &self.kind {
            FunctionKind::Native(n) => Some(n.name),
            _ => None,
        }
    }

    /// Set a static member (used when installing built-in constructors).
    pub fn with_prop(self, key: &str, value: Value) -> Self {
        self.props.borrow_mut().insert(key.to_string(), value);
        self
    }
}

/// A compiled regular expression literal or `new RegExp`-style value.
pub struct RegExp {
    pub source: String,
    pub flags: String,
    pub regex: fancy_regex::Regex,
    /// `lastIndex` for global/sticky matching, in characters.
    pub last_index: Cell<usize>,
}

impl RegExp {
    pub fn global(&self) -> bool {
        self.flags.contains('g')
    }

    pub fn sticky(&self) -> bool {
        self.flags.contains('y')
    }
}

/// Key identity for `Map` and `Set` (SameValueZero).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Undefined,
    Null,
    Bool(bool),
    /// Bit pattern with `-0` folded into `+0` and every NaN folded into one.
    Number(u64),
    String(Rc<str>),
    /// Reference identity of an array, object, function, map, set or regexp.
    Ref(usize),
}

impl MapKey {
    pub fn from_value(value: &Value) -> MapKey {
        match value {
            Value::Undefined => MapKey::Undefined,
            Value::Null => MapKey::Null,
            Value::Bool(b) => MapKey::Bool(*b),
            Value::Number(n) => {
                let normalized = if n.is_nan() {
                    f64::NAN
                } else if *n == 0.0 {
                    0.0
                } else {
                    *n
                };
                MapKey::Number(normalized.to_bits())
            }
            Value::String(s) => MapKey::String(s.clone()),
            other => MapKey::Ref(other.identity().unwrap_or_default()),
        }
    }
}

// ============================================================================
// Constructors and predicates
// ============================================================================

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(props: IndexMap<String, Value>) -> Value {
        Value::Object(Rc::new(RefCell::new(JsObject::plain(props))))
    }

    pub fn from_object(object: JsObject) -> Value {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn function(function: Function) -> Value {
        Value::Function(Rc::new(function))
    }

    pub fn native(name: &'static str, func: NativeFn, arity: usize) -> Value {
        Value::function(Function::native(name, func, arity))
    }

    /// An error object with `name` and `message` properties.
    pub fn error(kind: ErrorKind, message: &str) -> Value {
        let mut object = JsObject::new(ObjectClass::Error(kind));
        object.props.insert("name".to_string(), Value::string(kind.as_str()));
        object.props.insert("message".to_string(), Value::string(message));
        Value::from_object(object)
    }

    /// Pointer identity of a reference value.
    pub fn identity(&self) -> Option<usize> {
        let addr = match self {
            Value::Array(a) => Rc::as_ptr(a) as *const () as usize,
            Value::Object(o) => Rc::as_ptr(o) as *const () as usize,
            Value::Function(f) => Rc::as_ptr(f) as *const () as usize,
            Value::Map(m) => Rc::as_ptr(m) as *const () as usize,
            Value::Set(s) => Rc::as_ptr(s) as *const () as usize,
            Value::RegExp(r) => Rc::as_ptr(r) as *const () as usize,
            _ => return None,
        };
        Some(addr)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Anything that is not a primitive.
    pub fn is_object_like(&self) -> bool {
        self.identity().is_some()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The error class of an error object.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Value::Object(o) => match o.borrow().class {
                ObjectClass::Error(kind) => Some(kind),
                _ => None,
            },
            _ => None,
        }
    }

    /// ToBoolean.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// The `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            _ => "object",
        }
    }

    /// A short description of the value's kind for diagnostics ("array", "function", "null", ...).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(o) => match o.borrow().class {
                ObjectClass::Plain => "object",
                ObjectClass::Error(_) => "error",
                ObjectClass::Date(_) => "date",
            },
            Value::Function(_) => "function",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::RegExp(_) => "regexp",
        }
    }

    /// ToString for primitives; `None` for reference values, which need the interpreter.
    pub fn primitive_to_string(&self) -> Option<Rc<str>> {
        let s: Rc<str> = match self {
            Value::Undefined => Rc::from("undefined"),
            Value::Null => Rc::from("null"),
            Value::Bool(b) => Rc::from(if *b { "true" } else { "false" }),
            Value::Number(n) => Rc::from(numbers::to_display(*n)),
            Value::String(s) => s.clone(),
            _ => return None,
        };
        Some(s)
    }

    /// ToNumber for primitives; `None` for reference values.
    pub fn primitive_to_number(&self) -> Option<f64> {
        let n = match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => numbers::string_to_number(s),
            _ => return None,
        };
        Some(n)
    }
}

// ============================================================================
// Equality
// ============================================================================

/// `===`
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        _ => match (a.identity(), b.identity()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// SameValueZero: like `===` except that NaN equals NaN (`includes`, `Map`, `Set`).
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => strict_equals(a, b),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::inspect::inspect(self))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_order_puts_indices_first() {
        let mut props = IndexMap::new();
        for key in ["b", "2", "a", "1", "007", "-1"] {
            props.insert(key.to_string(), Value::Null);
        }
        let keys: Vec<&str> = enumeration_order(&props).into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "b", "a", "007", "-1"]);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(0.0).truthy());
        assert!(!Value::Number(f64::NAN).truthy());
        assert!(!Value::string("").truthy());
        assert!(Value::string("0").truthy());
        assert!(Value::array(vec![]).truthy());
        assert!(!Value::Null.truthy());
    }

    #[test]
    fn test_typeof() {
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::array(vec![]).type_of(), "object");
        assert_eq!(Value::native("f", |_, _, _| Ok(Value::Undefined), 0).type_of(), "function");
    }

    #[test]
    fn test_strict_equality_uses_identity_for_references() {
        let a = Value::array(vec![]);
        let b = a.clone();
        assert!(strict_equals(&a, &b));
        assert!(!strict_equals(&a, &Value::array(vec![])));
        assert!(!strict_equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
        assert!(same_value_zero(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
        assert!(!strict_equals(&Value::Number(1.0), &Value::string("1")));
    }

    #[test]
    fn test_map_keys_fold_zero_and_nan() {
        assert_eq!(MapKey::from_value(&Value::Number(-0.0)), MapKey::from_value(&Value::Number(0.0)));
        assert_eq!(
            MapKey::from_value(&Value::Number(f64::NAN)),
            MapKey::from_value(&Value::Number(-f64::NAN))
        );
        assert_ne!(MapKey::from_value(&Value::Number(1.0)), MapKey::from_value(&Value::string("1")));
    }

    #[test]
    fn test_error_values_carry_name_and_message() {
        let err = Value::error(ErrorKind::TypeError, "boom");
        assert_eq!(err.error_kind(), Some(ErrorKind::TypeError));
        let Value::Object(o) = &err else { panic!("expected object") };
        assert_eq!(o.borrow().props.get("message").and_then(|v| v.as_str().map(str::to_string)), Some("boom".to_string()));
    }
}
