//! Shot resolution against one side's board and fleet.

use log::trace;

use crate::core::board::{Board, Position};
use crate::core::common::ShotOutcome;
use crate::core::ship::Fleet;

/// Board and fleet after a shot, plus what the shot did.
///
/// For [`ShotOutcome::Repeat`] the board and fleet equal the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackResult {
    pub board: Board,
    pub fleet: Fleet,
    pub outcome: ShotOutcome,
}

impl AttackResult {
    pub fn hit(&self) -> bool {
        self.outcome.is_hit()
    }

    pub fn sunk(&self) -> bool {
        self.outcome.is_sunk()
    }
}

/// Fire at `target`. Inputs are never modified.
pub fn make_attack(board: &Board, fleet: &Fleet, target: Position) -> AttackResult {
    let cell = board.cell(target);
    if !cell.is_untargeted() {
        trace!("{} already targeted", target);
        return AttackResult {
            board: *board,
            fleet: fleet.clone(),
            outcome: ShotOutcome::Repeat,
        };
    }

    match cell.ship_id() {
        Some(id) if cell.has_ship() => {
            let mut new_fleet = fleet.clone();
            let ship = new_fleet.ship_mut(id);
            ship.strike(target);
            let outcome = if ship.is_sunk() {
                ShotOutcome::Sunk(id)
            } else {
                ShotOutcome::Hit(id)
            };
            AttackResult {
                board: board.with_hit(target),
                fleet: new_fleet,
                outcome,
            }
        }
        _ => AttackResult {
            board: board.with_miss(target),
            fleet: fleet.clone(),
            outcome: ShotOutcome::Miss,
        },
    }
}

/// Every ship of the fleet has been sunk.
pub fn is_game_over(fleet: &Fleet) -> bool {
    fleet.all_sunk()
}
