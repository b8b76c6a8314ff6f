use std::collections::VecDeque;

use crate::core::{Position, ShotOutcome};

/// Event log entries kept before trimming.
pub const EVENT_LOG_CAP: usize = 10;
/// Entries left after a trim.
pub const EVENT_LOG_TRIM: usize = 8;
/// Most recent shot results quoted back in prompts.
pub const RECENT_WINDOW: usize = 3;

/// Short-lived learning context of one external move source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveMemory {
    events: Vec<String>,
    recent: VecDeque<(Position, bool)>,
}

impl MoveMemory {
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Latest shot results, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &(Position, bool)> {
        self.recent.iter()
    }

    pub fn push_event(&mut self, event: String) {
        self.events.push(event);
        if self.events.len() > EVENT_LOG_CAP {
            let excess = self.events.len() - EVENT_LOG_TRIM;
            self.events.drain(..excess);
        }
    }

    pub fn record(&mut self, target: Position, outcome: ShotOutcome) {
        self.recent.push_back((target, outcome.is_hit()));
        while self.recent.len() > RECENT_WINDOW {
            self.recent.pop_front();
        }
        let event = match outcome.sunk_name() {
            Some(name) => format!("SUNK {} at {}!", name, target),
            None if outcome.is_hit() => format!("HIT at {}", target),
            None => format!("MISS at {}", target),
        };
        self.push_event(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.recent.clear();
    }
}
