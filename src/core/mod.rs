//! Core battleship game engine
//!
//! Pure game logic: board and fleet model, placement, shot resolution,
//! target selection and the turn controller. Nothing in here performs I/O
//! or awaits; all randomness comes in through a caller-supplied `Rng`.

pub mod attack;
pub mod board;
pub mod common;
pub mod config;
pub mod game;
pub mod placement;
pub mod ship;
pub mod targeting;

// Re-export commonly used types
pub use attack::{is_game_over, make_attack, AttackResult};
pub use board::{Board, Cell, ParsePositionError, Position};
pub use common::{BoardError, GameError, ShotOutcome};
pub use config::*;
pub use game::{GamePhase, MatchState, ShotRecord, ShotReport, Side, STARTING_SIDE};
pub use placement::{footprint, is_valid_placement, place_ship, place_ships_randomly, remove_ship};
pub use ship::{Fleet, Ship, ShipDef, ShipId};
pub use targeting::{hunt_target, Mark, TargetView};
