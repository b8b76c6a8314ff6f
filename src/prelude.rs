//! Commonly used types and utilities for ease of import.

pub use crate::core::{GamePhase, MatchState, Position, ShipId, ShotOutcome, Side, TargetView};
pub use crate::orchestrator::{Orchestrator, TickOutcome};
pub use crate::player::{ExternalMoveSource, HeuristicMoveSource, MoveSource};
pub use crate::settings::ExternalConfig;
pub use crate::transport::{ChatTransport, ScriptedTransport};
