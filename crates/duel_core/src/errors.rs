//! Shared user-facing error vocabulary used across the syntax frontend, runtime and engine.
//!
//! Message constants live here so the interpreter's thrown errors, the engine's synthetic results and the tests
//! that assert on them never drift apart.

/// Error classes that evaluated code can observe (`err.name`, `instanceof`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    TypeError,
    RangeError,
    ReferenceError,
    SyntaxError,
}

impl ErrorKind {
    /// Every error class, in declaration order.
    pub const ALL: &'static [ErrorKind] = &[
        ErrorKind::Error,
        ErrorKind::TypeError,
        ErrorKind::RangeError,
        ErrorKind::ReferenceError,
        ErrorKind::SyntaxError,
    ];

    /// Constructor name, which is also the `name` property of instances.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
        }
    }

    /// Resolve a constructor name.
    pub fn from_str(name: &str) -> Option<ErrorKind> {
        ErrorKind::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Runtime messages
// ============================================================================

/// Raised (as a catchable `RangeError`) when the call depth limit is hit.
pub const MAX_CALL_STACK_MSG: &str = "Maximum call stack size exceeded";
/// Raised (as a `TypeError`) when a `const` binding is reassigned.
pub const CONST_ASSIGNMENT_MSG: &str = "Assignment to constant variable.";
/// Raised (as a `RangeError`) when a collection or string would exceed the configured length cap.
pub const INVALID_ARRAY_LENGTH_MSG: &str = "Invalid array length";
pub const INVALID_STRING_LENGTH_MSG: &str = "Invalid string length";
/// Raised (as a `TypeError`) by `JSON.stringify` on cyclic structures.
pub const CIRCULAR_JSON_MSG: &str = "Converting circular structure to JSON";

/// Format the `ReferenceError` message for an unknown identifier.
pub fn not_defined_message(name: &str) -> String {
    format!("{name} is not defined")
}

/// Format the `TypeError` message for calling a non-callable value.
pub fn not_a_function_message(callee: &str) -> String {
    format!("{callee} is not a function")
}

/// Format the `TypeError` message for reading a property of `null`/`undefined`.
pub fn read_property_message(base: &str, key: &str) -> String {
    format!("Cannot read properties of {base} (reading '{key}')")
}

/// Format the `TypeError` message for writing a property of `null`/`undefined`.
pub fn set_property_message(base: &str, key: &str) -> String {
    format!("Cannot set properties of {base} (setting '{key}')")
}

// ============================================================================
// Engine messages
// ============================================================================

/// Name of the synthetic result emitted when the program cannot produce bindings.
pub const PROGRAM_EVALUATION_PHASE: &str = "Program Evaluation";
/// Name of the synthetic result emitted when no tests were discovered.
pub const TEST_DISCOVERY_PHASE: &str = "Test Discovery";
/// Message of the empty-discovery synthetic result.
pub const NO_TESTS_FOUND_MSG: &str =
    "No test functions found. Test functions should be named functions in the format: function testName() { ... }";
