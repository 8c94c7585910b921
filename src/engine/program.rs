//! Program evaluation: run the program source once and collect its exported bindings.

use duel_syntax::parser;

use crate::runtime::{Interpreter, Scope, Value};

/// Why a program produced no bindings. Rendered as the message of the run's single `error` result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramEvaluationError {
    /// The source did not parse; the message carries the position.
    #[error("SyntaxError: {0}")]
    Syntax(String),
    /// Evaluation threw, or exhausted its budget.
    #[error("{0}")]
    Thrown(String),
    /// Evaluation completed but did not return a plain object.
    #[error("Program must return an object of exports, got {0}")]
    NotAnObject(&'static str),
}

/// The program's exports, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: Vec<(String, Value)>,
}

impl Bindings {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Evaluate `source` as a function body under the interpreter's globals.
///
/// All-or-nothing: either every own enumerable entry of the returned object becomes a binding, or the
/// call fails and nothing is returned.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn evaluate_program(interp: &mut Interpreter, source: &str) -> Result<Bindings, ProgramEvaluationError> {
    let program = parser::parse_source(source).map_err(|errors| {
        let message = errors
            .first()
            .map_or_else(|| "Invalid program".to_string(), |e| e.located(source));
        ProgramEvaluationError::Syntax(message)
    })?;
    interp.begin_unit();
    let globals: Scope = interp.globals().clone();
    let value = interp
        .run_program(&program, &globals)
        .map_err(|interrupt| ProgramEvaluationError::Thrown(interp.interrupt_message(&interrupt)))?;
    let Value::Object(object) = &value else {
        return Err(ProgramEvaluationError::NotAnObject(value.kind_name()));
    };
    if object.borrow().class != crate::runtime::value::ObjectClass::Plain {
        return Err(ProgramEvaluationError::NotAnObject(value.kind_name()));
    }
    let entries = object
        .borrow()
        .entries()
        .into_iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect::<Vec<_>>();
    tracing::debug!(exports = entries.len(), "program evaluated");
    Ok(Bindings { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{CapabilitySet, Limits};

    fn evaluate(source: &str) -> Result<Bindings, ProgramEvaluationError> {
        let mut interp = Interpreter::new(&CapabilitySet::standard(), Limits::default(), Some(1));
        evaluate_program(&mut interp, source)
    }

    #[test]
    fn test_exports_keep_their_order() {
        let bindings = evaluate("const helper = 2; return { b: () => 1, a: helper };").unwrap();
        assert_eq!(bindings.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(matches!(bindings.get("a"), Some(Value::Number(n)) if *n == 2.0));
        assert!(bindings.get("helper").is_none());
    }

    #[test]
    fn test_syntax_errors_carry_a_position() {
        let err = evaluate("return {").unwrap_err();
        assert!(matches!(&err, ProgramEvaluationError::Syntax(m) if m.contains("(line 1, column")), "{err}");
        assert!(err.to_string().starts_with("SyntaxError: "));
    }

    #[test]
    fn test_thrown_errors_use_their_message() {
        assert_eq!(
            evaluate("throw new Error('nope');").unwrap_err(),
            ProgramEvaluationError::Thrown("nope".to_string())
        );
        assert_eq!(evaluate("throw 42;").unwrap_err(), ProgramEvaluationError::Thrown("42".to_string()));
        assert_eq!(
            evaluate("return missing;").unwrap_err().to_string(),
            "missing is not defined"
        );
    }

    #[test]
    fn test_non_object_results_are_rejected() {
        assert_eq!(evaluate("1 + 1;").unwrap_err(), ProgramEvaluationError::NotAnObject("undefined"));
        assert_eq!(evaluate("return [1];").unwrap_err(), ProgramEvaluationError::NotAnObject("array"));
        assert_eq!(evaluate("return () => 1;").unwrap_err(), ProgramEvaluationError::NotAnObject("function"));
        assert_eq!(
            evaluate("return new Error('x');").unwrap_err().to_string(),
            "Program must return an object of exports, got error"
        );
    }
}
