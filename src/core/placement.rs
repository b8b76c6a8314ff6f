//! Ship placement: validation, placement, removal and random layouts.
//!
//! Ships may neither overlap nor touch, diagonals included.

use log::debug;
use rand::Rng;

use crate::core::board::{Board, Position};
use crate::core::common::BoardError;
use crate::core::config::{BOARD_SIZE, PLACEMENT_ATTEMPTS};
use crate::core::ship::{Fleet, Ship};

/// Cells covered by a ship of `size` at `origin`, or `None` if any falls off
/// the board.
pub fn footprint(origin: Position, size: usize, horizontal: bool) -> Option<Vec<Position>> {
    (0..size)
        .map(|i| {
            if horizontal {
                Position::new(origin.row(), origin.col() + i).ok()
            } else {
                Position::new(origin.row() + i, origin.col()).ok()
            }
        })
        .collect()
}

/// `true` when `ship` fits at `origin` without overlapping or touching any
/// other ship.
pub fn is_valid_placement(board: &Board, ship: &Ship, origin: Position, horizontal: bool) -> bool {
    let Some(cells) = footprint(origin, ship.size(), horizontal) else {
        return false;
    };
    cells.iter().all(|&pos| {
        !board.cell(pos).has_ship()
            && pos.neighborhood().all(|adj| {
                let cell = board.cell(adj);
                !cell.has_ship() || cell.ship_id() == Some(ship.id())
            })
    })
}

/// Write `ship` onto a copy of `board`.
///
/// Only bounds are checked here; gate calls with [`is_valid_placement`].
pub fn place_ship(
    board: &Board,
    ship: &Ship,
    origin: Position,
    horizontal: bool,
) -> Result<(Board, Ship), BoardError> {
    let cells = footprint(origin, ship.size(), horizontal)
        .ok_or(BoardError::FootprintOutOfBounds(ship.name()))?;
    let new_board = cells
        .iter()
        .fold(*board, |b, &pos| b.with_ship(pos, ship.id()));
    Ok((new_board, ship.placed_at(cells, horizontal)))
}

/// Clear `ship`'s recorded cells on a copy of `board`.
pub fn remove_ship(board: &Board, ship: &Ship) -> Board {
    ship.positions()
        .iter()
        .fold(*board, |b, &pos| b.without_ship(pos))
}

/// Lay out every ship of `fleet` on a fresh board, in canonical order.
///
/// Each ship gets up to [`PLACEMENT_ATTEMPTS`] random draws, then a
/// row-major horizontal scan for the first legal slot.
pub fn place_ships_randomly<R: Rng + ?Sized>(
    fleet: &Fleet,
    rng: &mut R,
) -> Result<(Board, Fleet), BoardError> {
    let mut board = Board::new();
    let mut placed = fleet.clone();

    for ship in fleet.ships() {
        let slot = random_slot(&board, ship, rng).or_else(|| {
            debug!("random placement gave up on {}, scanning", ship.name());
            scan_slot(&board, ship)
        });
        let (origin, horizontal) = slot.ok_or(BoardError::PlacementExhausted(ship.name()))?;
        let (next_board, next_ship) = place_ship(&board, ship, origin, horizontal)?;
        board = next_board;
        placed = placed.with_ship(next_ship);
    }

    Ok((board, placed))
}

fn random_slot<R: Rng + ?Sized>(board: &Board, ship: &Ship, rng: &mut R) -> Option<(Position, bool)> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let origin = Position::new(
            rng.random_range(0..BOARD_SIZE),
            rng.random_range(0..BOARD_SIZE),
        )
        .ok()?;
        let horizontal = rng.random_bool(0.5);
        if is_valid_placement(board, ship, origin, horizontal) {
            return Some((origin, horizontal));
        }
    }
    None
}

fn scan_slot(board: &Board, ship: &Ship) -> Option<(Position, bool)> {
    Position::all()
        .find(|&origin| is_valid_placement(board, ship, origin, true))
        .map(|origin| (origin, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ship::ShipId;

    #[test]
    fn scan_finds_first_horizontal_slot() {
        let fleet = Fleet::new();
        let carrier = fleet.ship(ShipId::Carrier);
        let (board, _) = place_ship(&Board::new(), carrier, Position::new(0, 0).unwrap(), true).unwrap();
        let destroyer = fleet.ship(ShipId::Destroyer);
        // Column 5 of row 0 touches the carrier's stern.
        assert_eq!(
            scan_slot(&board, destroyer),
            Some((Position::new(0, 6).unwrap(), true))
        );
    }
}
