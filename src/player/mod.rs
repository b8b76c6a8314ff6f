//! Move sources
//!
//! A move source proposes the next target for one side:
//! - HeuristicMoveSource: local hunt/target guessing
//! - ExternalMoveSource: asks a chat-completion service, falling back to the
//!   heuristic when the service cannot produce a legal move

use crate::core::{Position, ShotOutcome, TargetView};
use crate::settings::ExternalConfig;

/// Interface implemented by every kind of move source.
///
/// `next_move` must always return a square that is untargeted in `view`
/// while one exists; a source that cannot reach its backend degrades
/// instead of failing.
#[async_trait::async_trait]
pub trait MoveSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Choose the next target given what this side knows.
    async fn next_move(&mut self, view: &TargetView) -> Position;

    /// Inform the source of the result of its last target.
    fn record_outcome(&mut self, _target: Position, _outcome: ShotOutcome) {}

    /// Replace the external-service configuration. Sources without one
    /// ignore it.
    fn update_config(&mut self, _config: ExternalConfig) {}

    /// Forget everything learned during the current match.
    fn reset(&mut self) {}
}

pub mod external;
pub mod heuristic;

pub use external::{ConnectionReport, ExternalMoveSource};
pub use heuristic::HeuristicMoveSource;
