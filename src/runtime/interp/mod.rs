//! Tree-walking interpreter.
//!
//! One [`Interpreter`] hosts one run: it owns the globals frame built from a [`CapabilitySet`], the
//! seedable RNG behind `Math.random`, the captured console output, and the execution budget. The engine
//! resets the budget and output at the start of every unit (the program, then each test) via
//! [`Interpreter::begin_unit`].
//!
//! ## Notes
//! - Evaluation is recursive; the engine runs it on a worker thread with a large stack and the call-depth
//!   limit keeps script recursion well inside it.
//! - Closures and the scopes they capture form `Rc` cycles. Captured scopes are tracked weakly and cleared
//!   when the interpreter is dropped.

mod calls;
mod convert;
mod exprs;
mod ops;
mod patterns;
mod props;
mod stmts;

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use duel_core::errors::ErrorKind;
use duel_syntax::ast::{self, Program};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::builtins;
use super::capabilities::CapabilitySet;
use super::error::Interrupt;
use super::limits::{Budget, Limits};
use super::scope::{Scope, WeakScope};
use super::value::Value;

pub use stmts::Completion;
pub(crate) use ops::power;
pub(crate) use props::parse_index;

/// Console lines kept per unit; later lines are still logged but not captured.
pub const MAX_OUTPUT_LINES: usize = 200;

/// The script interpreter.
pub struct Interpreter {
    globals: Scope,
    limits: Limits,
    budget: Budget,
    call_depth: usize,
    rng: StdRng,
    output: Vec<String>,
    clock: Instant,
    captured: Vec<WeakScope>,
    capture_threshold: usize,
    /// `var` names per function body, keyed by definition address (the `Rc` keeps the address stable).
    var_names: HashMap<usize, (Rc<ast::Function>, Rc<[String]>)>,
    regex_cache: HashMap<(String, String), fancy_regex::Regex>,
    /// Arrays currently being joined by ToString; a cycle renders as an empty string.
    joining: Vec<usize>,
}

impl Interpreter {
    /// Build an interpreter whose globals are exactly the ones `capabilities` grants.
    ///
    /// `seed` makes `Math.random` reproducible; `None` seeds from the OS.
    pub fn new(capabilities: &CapabilitySet, limits: Limits, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut interp = Self {
            globals: Scope::root(),
            budget: Budget::start(&limits),
            limits,
            call_depth: 0,
            rng,
            output: Vec::new(),
            clock: Instant::now(),
            captured: Vec::new(),
            capture_threshold: 1024,
            var_names: HashMap::new(),
            regex_cache: HashMap::new(),
            joining: Vec::new(),
        };
        builtins::install(&mut interp, capabilities);
        interp
    }

    /// The frame holding the installed host globals.
    pub fn globals(&self) -> &Scope {
        &self.globals
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Reset the budget, call depth and captured output before evaluating a new unit.
    pub fn begin_unit(&mut self) {
        self.budget = Budget::start(&self.limits);
        self.call_depth = 0;
        self.output.clear();
    }

    /// Console lines captured since the last [`Interpreter::begin_unit`].
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Steps charged to the current unit.
    pub fn steps(&self) -> u64 {
        self.budget.steps()
    }

    /// Execute a parsed program as a function body in a function scope under `parent`.
    ///
    /// Returns the value of a top-level `return`, or `undefined` when the body completes normally.
    pub fn run_program(&mut self, program: &Program, parent: &Scope) -> Result<Value, Interrupt> {
        let scope = parent.function(Some(Value::Undefined));
        let mut names = Vec::new();
        stmts::collect_var_names(&program.body, &mut names);
        for name in &names {
            scope.declare_var(name);
        }
        match self.exec_block_in(&program.body, &scope)? {
            Completion::Return(value) => Ok(value),
            _ => Ok(Value::Undefined),
        }
    }

    /// Human-readable message for a thrown value: an error's `message`, otherwise its string form.
    pub fn thrown_message(&mut self, value: &Value) -> String {
        if let Value::Object(object) = value {
            let message = object.borrow().props.get("message").cloned();
            if value.error_kind().is_some() || message.is_some() {
                if let Some(message) = message {
                    return self.to_string_lossy(&message);
                }
            }
        }
        self.to_string_lossy(value)
    }

    /// Message for any interrupt: thrown values via [`Interpreter::thrown_message`], halts via `Display`.
    pub fn interrupt_message(&mut self, interrupt: &Interrupt) -> String {
        match interrupt {
            Interrupt::Throw(value) => self.thrown_message(value),
            Interrupt::Halt(halt) => halt.to_string(),
        }
    }

    // ========================================================================
    // Crate-internal services for builtins
    // ========================================================================

    /// Build a catchable error of the given class.
    pub(crate) fn throw(&self, kind: ErrorKind, message: impl AsRef<str>) -> Interrupt {
        Interrupt::Throw(Value::error(kind, message.as_ref()))
    }

    pub(crate) fn type_error(&self, message: impl AsRef<str>) -> Interrupt {
        self.throw(ErrorKind::TypeError, message)
    }

    pub(crate) fn range_error(&self, message: impl AsRef<str>) -> Interrupt {
        self.throw(ErrorKind::RangeError, message)
    }

    /// Charge one evaluation step against the unit budget.
    pub(crate) fn tick(&mut self) -> Result<(), Interrupt> {
        self.budget.tick().map_err(Interrupt::Halt)
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Milliseconds since the interpreter was created (`performance.now()`).
    pub(crate) fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    /// Record one console line for the current unit.
    pub(crate) fn push_output(&mut self, line: String) {
        if self.output.len() < MAX_OUTPUT_LINES {
            self.output.push(line);
        }
    }

    /// Fail with `RangeError` if a built-in would create a collection longer than the configured cap.
    pub(crate) fn check_len(&self, len: usize, message: &str) -> Result<(), Interrupt> {
        if len > self.limits.max_collection_len {
            return Err(self.range_error(message));
        }
        Ok(())
    }

    /// Compiled regex for a `(source, flags)` pair, if one was built before.
    pub(crate) fn cached_regex(&self, source: &str, flags: &str) -> Option<fancy_regex::Regex> {
        self.regex_cache.get(&(source.to_string(), flags.to_string())).cloned()
    }

    pub(crate) fn cache_regex(&mut self, source: &str, flags: &str, regex: fancy_regex::Regex) {
        self.regex_cache.insert((source.to_string(), flags.to_string()), regex);
    }

    /// Remember a scope captured by a closure so teardown can break the cycle.
    fn track_capture(&mut self, scope: &Scope) {
        self.captured.push(scope.downgrade());
        if self.captured.len() > self.capture_threshold {
            self.captured.retain(|weak| weak.strong_count() > 0);
            self.capture_threshold = (self.captured.len() * 2).max(1024);
        }
    }

    /// Hoisted `var` names of a function body, computed once per definition.
    fn function_var_names(&mut self, def: &Rc<ast::Function>) -> Rc<[String]> {
        let key = Rc::as_ptr(def) as usize;
        if let Some((_, names)) = self.var_names.get(&key) {
            return names.clone();
        }
        let mut names = Vec::new();
        if let ast::FunctionBody::Block(body) = &def.body {
            stmts::collect_var_names(body, &mut names);
        }
        let names: Rc<[String]> = names.into();
        self.var_names.insert(key, (def.clone(), names.clone()));
        names
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        for weak in self.captured.drain(..) {
            if let Some(scope) = Scope::upgrade(&weak) {
                scope.clear();
            }
        }
        self.globals.clear();
    }
}

#[cfg(test)]
mod tests;
