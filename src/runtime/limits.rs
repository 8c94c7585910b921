//! Execution limits and the per-unit budget that enforces them.

use std::time::{Duration, Instant};

use super::error::Halt;

/// How often (in steps) the wall clock is consulted.
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// Bounds applied to each unit of evaluation (the program, or one test).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest script call nesting before a catchable `RangeError`.
    pub max_call_depth: usize,
    /// Evaluation steps (statements, calls, loop iterations) per unit.
    pub max_steps: u64,
    /// Wall-clock time per unit.
    pub time_budget: Duration,
    /// Longest array or string a built-in may create.
    pub max_collection_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_call_depth: 400,
            max_steps: 5_000_000,
            time_budget: Duration::from_secs(5),
            max_collection_len: 1 << 24,
        }
    }
}

impl Limits {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = steps;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_max_collection_len(mut self, len: usize) -> Self {
        self.max_collection_len = len;
        self
    }
}

/// Step and clock accounting for one unit.
#[derive(Debug)]
pub(crate) struct Budget {
    steps: u64,
    max_steps: u64,
    started: Instant,
    time_budget: Duration,
}

impl Budget {
    pub(crate) fn start(limits: &Limits) -> Self {
        Self {
            steps: 0,
            max_steps: limits.max_steps,
            started: Instant::now(),
            time_budget: limits.time_budget,
        }
    }

    /// Charge one step.
    pub(crate) fn tick(&mut self) -> Result<(), Halt> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(Halt::StepBudget(self.max_steps));
        }
        if self.steps % CLOCK_CHECK_INTERVAL == 0 && self.started.elapsed() > self.time_budget {
            return Err(Halt::TimeBudget(self.time_budget));
        }
        Ok(())
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_budget_halts() {
        let limits = Limits::default().with_max_steps(3);
        let mut budget = Budget::start(&limits);
        assert!(budget.tick().is_ok());
        assert!(budget.tick().is_ok());
        assert!(budget.tick().is_ok());
        assert_eq!(budget.tick(), Err(Halt::StepBudget(3)));
    }

    #[test]
    fn test_time_budget_halts() {
        let limits = Limits::default().with_time_budget(Duration::ZERO);
        let mut budget = Budget::start(&limits);
        std::thread::sleep(Duration::from_millis(2));
        let result = (0..CLOCK_CHECK_INTERVAL).try_for_each(|_| budget.tick());
        assert_eq!(result, Err(Halt::TimeBudget(Duration::ZERO)));
    }
}
