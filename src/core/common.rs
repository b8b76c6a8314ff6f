//! Common types for the engine: errors and shot outcomes.

use thiserror::Error;

use super::board::Position;
use super::game::{GamePhase, Side};
use super::ship::ShipId;

/// Result of resolving a single shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The cell had already been targeted; nothing changed.
    Repeat,
    /// Shot missed all ships.
    Miss,
    /// Shot struck a ship that is still afloat.
    Hit(ShipId),
    /// Shot struck the last intact segment of a ship.
    Sunk(ShipId),
}

impl ShotOutcome {
    pub fn is_hit(self) -> bool {
        matches!(self, ShotOutcome::Hit(_) | ShotOutcome::Sunk(_))
    }

    pub fn is_sunk(self) -> bool {
        matches!(self, ShotOutcome::Sunk(_))
    }

    /// Name of the ship this shot sank, if any.
    pub fn sunk_name(self) -> Option<&'static str> {
        match self {
            ShotOutcome::Sunk(id) => Some(id.name()),
            _ => None,
        }
    }
}

/// Errors returned by board and placement operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("{0} does not fit on the board at that origin")]
    FootprintOutOfBounds(&'static str),
    #[error("{0} has not been placed")]
    ShipNotPlaced(&'static str),
    #[error("no legal slot left for {0}")]
    PlacementExhausted(&'static str),
}

/// Errors returned by the turn controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("operation not allowed during {0:?}")]
    WrongPhase(GamePhase),
    #[error("{0:?} has not placed every ship")]
    FleetIncomplete(Side),
    #[error("it is not {0:?}'s turn")]
    NotYourTurn(Side),
    #[error("{0} was already targeted")]
    AlreadyTargeted(Position),
    #[error("placement of {0} is not valid")]
    InvalidPlacement(&'static str),
    #[error(transparent)]
    Board(#[from] BoardError),
}
