//! Host globals vocabulary.
//!
//! Every name the engine can bind into an evaluation context is listed here together with the
//! [`CapabilityClass`] that gates it. The runtime installs a global only when its class is enabled in the
//! configured capability set, so this table *is* the allow-list.
//!
//! The assertion primitives that the engine injects into test contexts are registered separately in
//! [`ASSERTIONS`], along with their default failure messages.
//!
//! ## Notes
//! - [`EXCLUDED`] lists well-known host facilities that must never appear here (timers, IO, dynamic code).
//!   A guardrail test keeps the two lists disjoint.
//!
//! ## Examples
//! ```rust
//! use duel_core::lang::globals::{self, CapabilityClass, GlobalId};
//!
//! assert_eq!(globals::from_str("Math"), Some(GlobalId::Math));
//! assert_eq!(globals::info_for(GlobalId::Console).class, CapabilityClass::Console);
//! assert!(globals::from_str("setTimeout").is_none());
//! ```

/// A class of host capability that can be granted to evaluated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityClass {
    /// Language constants (`undefined`, `NaN`, `Infinity`); always present.
    Core,
    /// The restricted log sink.
    Console,
    /// Clock reads.
    Time,
    Math,
    Json,
    /// `String`, `Number`, `Boolean` and the numeric parse helpers.
    Primitives,
    /// `Array`, `Object`, `Map`, `Set`.
    Collections,
    /// Error constructors.
    Errors,
}

impl CapabilityClass {
    /// All classes that can be toggled (everything except [`CapabilityClass::Core`]).
    pub const GRANTABLE: &'static [CapabilityClass] = &[
        CapabilityClass::Console,
        CapabilityClass::Time,
        CapabilityClass::Math,
        CapabilityClass::Json,
        CapabilityClass::Primitives,
        CapabilityClass::Collections,
        CapabilityClass::Errors,
    ];

    /// Lower-case name used in CLI flags and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityClass::Core => "core",
            CapabilityClass::Console => "console",
            CapabilityClass::Time => "time",
            CapabilityClass::Math => "math",
            CapabilityClass::Json => "json",
            CapabilityClass::Primitives => "primitives",
            CapabilityClass::Collections => "collections",
            CapabilityClass::Errors => "errors",
        }
    }
}

/// Stable identifier for a host global.
///
/// ## Notes
/// - Variant order matches [`GLOBALS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalId {
    Undefined,
    NaN,
    Infinity,
    Console,
    Date,
    Performance,
    Math,
    Json,
    String,
    Number,
    Boolean,
    ParseInt,
    ParseFloat,
    IsNaN,
    IsFinite,
    Array,
    Object,
    Map,
    Set,
    Error,
    TypeError,
    RangeError,
    ReferenceError,
    SyntaxError,
}

/// Metadata for a host global.
#[derive(Debug, Clone, Copy)]
pub struct GlobalInfo {
    pub id: GlobalId,
    pub name: &'static str,
    pub class: CapabilityClass,
    pub description: &'static str,
}

/// Registry of host globals, in [`GlobalId`] order.
pub const GLOBALS: &[GlobalInfo] = &[
    info(GlobalId::Undefined, "undefined", CapabilityClass::Core, "The undefined value."),
    info(GlobalId::NaN, "NaN", CapabilityClass::Core, "Not-a-number."),
    info(GlobalId::Infinity, "Infinity", CapabilityClass::Core, "Positive infinity."),
    info(GlobalId::Console, "console", CapabilityClass::Console, "Restricted log sink (log/info/warn/error/debug)."),
    info(GlobalId::Date, "Date", CapabilityClass::Time, "Wall-clock reads: Date.now(), new Date(ms).getTime()."),
    info(GlobalId::Performance, "performance", CapabilityClass::Time, "Monotonic clock: performance.now()."),
    info(GlobalId::Math, "Math", CapabilityClass::Math, "Math constants and functions."),
    info(GlobalId::Json, "JSON", CapabilityClass::Json, "JSON.stringify / JSON.parse."),
    info(GlobalId::String, "String", CapabilityClass::Primitives, "String conversion and String.fromCharCode."),
    info(GlobalId::Number, "Number", CapabilityClass::Primitives, "Number conversion, predicates and constants."),
    info(GlobalId::Boolean, "Boolean", CapabilityClass::Primitives, "Boolean conversion."),
    info(GlobalId::ParseInt, "parseInt", CapabilityClass::Primitives, "Parse an integer with optional radix."),
    info(GlobalId::ParseFloat, "parseFloat", CapabilityClass::Primitives, "Parse a leading decimal number."),
    info(GlobalId::IsNaN, "isNaN", CapabilityClass::Primitives, "Coercing NaN check."),
    info(GlobalId::IsFinite, "isFinite", CapabilityClass::Primitives, "Coercing finiteness check."),
    info(GlobalId::Array, "Array", CapabilityClass::Collections, "Array constructor and Array.isArray/from/of."),
    info(GlobalId::Object, "Object", CapabilityClass::Collections, "Object.keys/values/entries/assign/freeze/fromEntries."),
    info(GlobalId::Map, "Map", CapabilityClass::Collections, "Insertion-ordered key/value map."),
    info(GlobalId::Set, "Set", CapabilityClass::Collections, "Insertion-ordered value set."),
    info(GlobalId::Error, "Error", CapabilityClass::Errors, "Generic error constructor."),
    info(GlobalId::TypeError, "TypeError", CapabilityClass::Errors, "Type error constructor."),
    info(GlobalId::RangeError, "RangeError", CapabilityClass::Errors, "Range error constructor."),
    info(GlobalId::ReferenceError, "ReferenceError", CapabilityClass::Errors, "Reference error constructor."),
    info(GlobalId::SyntaxError, "SyntaxError", CapabilityClass::Errors, "Syntax error constructor."),
];

/// Host facilities that are never exposed, regardless of configuration.
pub const EXCLUDED: &[&str] = &[
    "setTimeout",
    "setInterval",
    "setImmediate",
    "queueMicrotask",
    "fetch",
    "XMLHttpRequest",
    "WebSocket",
    "localStorage",
    "sessionStorage",
    "indexedDB",
    "require",
    "process",
    "eval",
    "Function",
    "globalThis",
    "window",
];

/// Return the full metadata entry for a global.
pub fn info_for(id: GlobalId) -> &'static GlobalInfo {
    &GLOBALS[id as usize]
}

/// Return the binding name of a global.
pub fn as_str(id: GlobalId) -> &'static str {
    info_for(id).name
}

/// Resolve a binding name to a global id.
pub fn from_str(name: &str) -> Option<GlobalId> {
    GLOBALS.iter().find(|g| g.name == name).map(|g| g.id)
}

/// Iterate the globals gated by `class`.
pub fn in_class(class: CapabilityClass) -> impl Iterator<Item = &'static GlobalInfo> {
    GLOBALS.iter().filter(move |g| g.class == class)
}

const fn info(id: GlobalId, name: &'static str, class: CapabilityClass, description: &'static str) -> GlobalInfo {
    GlobalInfo {
        id,
        name,
        class,
        description,
    }
}

// ============================================================================
// Assertion primitives
// ============================================================================

/// Stable identifier for an assertion primitive injected into test contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionId {
    Assert,
    AssertEqual,
    AssertTrue,
    AssertFalse,
}

/// Metadata for an assertion primitive.
#[derive(Debug, Clone, Copy)]
pub struct AssertionInfo {
    pub id: AssertionId,
    pub name: &'static str,
    /// Parameter list as shown in docs.
    pub signature: &'static str,
    /// Message used when the caller does not pass one. `AssertEqual` formats its own.
    pub default_message: Option<&'static str>,
}

/// Registry of assertion primitives, in [`AssertionId`] order.
pub const ASSERTIONS: &[AssertionInfo] = &[
    AssertionInfo {
        id: AssertionId::Assert,
        name: "assert",
        signature: "assert(condition, message?)",
        default_message: Some("Assertion failed"),
    },
    AssertionInfo {
        id: AssertionId::AssertEqual,
        name: "assertEqual",
        signature: "assertEqual(actual, expected, message?)",
        default_message: None,
    },
    AssertionInfo {
        id: AssertionId::AssertTrue,
        name: "assertTrue",
        signature: "assertTrue(condition, message?)",
        default_message: Some("Expected true"),
    },
    AssertionInfo {
        id: AssertionId::AssertFalse,
        name: "assertFalse",
        signature: "assertFalse(condition, message?)",
        default_message: Some("Expected false"),
    },
];

/// Return the metadata entry for an assertion primitive.
pub fn assertion(id: AssertionId) -> &'static AssertionInfo {
    &ASSERTIONS[id as usize]
}

/// Format the default `assertEqual` failure message from already-stringified operands.
///
/// ## Examples
/// ```rust
/// use duel_core::lang::globals::assert_equal_message;
///
/// assert_eq!(assert_equal_message("3", "2"), "Expected 3, but got 2");
/// ```
pub fn assert_equal_message(expected: &str, actual: &str) -> String {
    format!("Expected {expected}, but got {actual}")
}
