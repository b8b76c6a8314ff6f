pub mod core;
mod logging;
pub mod orchestrator;
pub mod player;
pub mod prelude;
pub mod settings;
pub mod transport;

pub use crate::core::*;
pub use logging::init_logging;
pub use orchestrator::{ChosenMove, MoveTicket, Orchestrator, OrchestratorError, PendingMove, TickOutcome};
pub use player::*;
pub use settings::ExternalConfig;
pub use transport::{ChatTransport, ScriptedTransport};
