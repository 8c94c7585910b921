//! Non-local exits out of evaluation.

use std::time::Duration;

use super::value::Value;

/// Why evaluation stopped early.
///
/// `Throw` is an ordinary script exception and can be caught by `try`/`catch`. `Halt` is raised by the
/// execution budget and unwinds straight to the host.
#[derive(Debug, Clone)]
pub enum Interrupt {
    Throw(Value),
    Halt(Halt),
}

/// Budget exhaustion. Not observable from script code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Halt {
    #[error("Execution exceeded the step budget of {0} steps")]
    StepBudget(u64),
    #[error("Execution timed out after {} ms", .0.as_millis())]
    TimeBudget(Duration),
}

impl From<Halt> for Interrupt {
    fn from(halt: Halt) -> Self {
        Interrupt::Halt(halt)
    }
}
