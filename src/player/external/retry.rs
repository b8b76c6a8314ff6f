//! Bounded retry plan with progressively thinner prompts.

use std::time::Duration;

/// Attempts made before falling back to local targeting.
pub const MAX_ATTEMPTS: usize = 3;

/// Pause between attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(300);

/// How much match context goes into a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextLevel {
    /// Board, previous moves, hits, sunk ships, recent results and events.
    Full,
    /// Board and previous moves only.
    NoHistory,
    /// Board only.
    Minimal,
}

impl ContextLevel {
    /// Context used for the zero-based `attempt`, or `None` once the budget
    /// is spent.
    pub fn for_attempt(attempt: usize) -> Option<Self> {
        match attempt {
            0 => Some(ContextLevel::Full),
            1 => Some(ContextLevel::NoHistory),
            2 => Some(ContextLevel::Minimal),
            _ => None,
        }
    }

    pub fn includes_history(self) -> bool {
        self == ContextLevel::Full
    }

    pub fn includes_moves(self) -> bool {
        self != ContextLevel::Minimal
    }
}

/// Iterator over `(attempt, context)` pairs for one move.
#[derive(Debug, Clone, Default)]
pub struct RetryPlan {
    attempt: usize,
}

impl RetryPlan {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for RetryPlan {
    type Item = (usize, ContextLevel);

    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= MAX_ATTEMPTS {
            return None;
        }
        let level = ContextLevel::for_attempt(self.attempt)?;
        let item = (self.attempt, level);
        self.attempt += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_strips_context_each_attempt() {
        let levels: Vec<_> = RetryPlan::new().map(|(_, level)| level).collect();
        assert_eq!(
            levels,
            vec![ContextLevel::Full, ContextLevel::NoHistory, ContextLevel::Minimal]
        );
        assert_eq!(RetryPlan::new().count(), MAX_ATTEMPTS);
    }
}
