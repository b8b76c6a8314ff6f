//! Knowledge-restricted view of the opponent board and hunt/target guessing.
//! Shared by every move source, including the external source's fallback.

use rand::Rng;

use crate::core::board::{Board, Position};
use crate::core::config::BOARD_SIZE;

/// What the attacker knows about a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Unknown,
    Hit,
    Miss,
}

/// The attacking side's picture of the opponent board.
///
/// Ship positions are never carried, only hit/miss/unknown per square,
/// together with the attacker's own shot history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetView {
    marks: [[Mark; BOARD_SIZE]; BOARD_SIZE],
    previous_moves: Vec<Position>,
    hits: Vec<Position>,
    sunk_ships: Vec<&'static str>,
}

impl TargetView {
    pub fn new(
        board: &Board,
        previous_moves: Vec<Position>,
        hits: Vec<Position>,
        sunk_ships: Vec<&'static str>,
    ) -> Self {
        let mut marks = [[Mark::Unknown; BOARD_SIZE]; BOARD_SIZE];
        for pos in Position::all() {
            let cell = board.cell(pos);
            marks[pos.row()][pos.col()] = if cell.is_hit() {
                Mark::Hit
            } else if cell.is_miss() {
                Mark::Miss
            } else {
                Mark::Unknown
            };
        }
        Self {
            marks,
            previous_moves,
            hits,
            sunk_ships,
        }
    }

    /// View of `board` with no shot history attached.
    pub fn from_board(board: &Board) -> Self {
        Self::new(board, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn mark(&self, pos: Position) -> Mark {
        self.marks[pos.row()][pos.col()]
    }

    pub fn is_untargeted(&self, pos: Position) -> bool {
        self.mark(pos) == Mark::Unknown
    }

    pub fn untargeted(&self) -> Vec<Position> {
        Position::all().filter(|&p| self.is_untargeted(p)).collect()
    }

    /// Targets fired so far, oldest first.
    pub fn previous_moves(&self) -> &[Position] {
        &self.previous_moves
    }

    /// Targets that struck a ship, oldest first.
    pub fn hits(&self) -> &[Position] {
        &self.hits
    }

    pub fn sunk_ships(&self) -> &[&'static str] {
        &self.sunk_ships
    }

    pub fn last_hit(&self) -> Option<Position> {
        self.hits.last().copied()
    }
}

/// Pick a target: an untargeted orthogonal neighbour of the most recent hit
/// when one exists, otherwise any untargeted square. Returns
/// [`Position::ORIGIN`] only when nothing is left to shoot at.
pub fn hunt_target<R: Rng + ?Sized>(view: &TargetView, rng: &mut R) -> Position {
    let available = view.untargeted();
    if available.is_empty() {
        return Position::ORIGIN;
    }

    if let Some(last) = view.last_hit() {
        let adjacent: Vec<Position> = last
            .orthogonal_neighbors()
            .filter(|&p| view.is_untargeted(p))
            .collect();
        if !adjacent.is_empty() {
            return adjacent[rng.random_range(0..adjacent.len())];
        }
    }

    available[rng.random_range(0..available.len())]
}
