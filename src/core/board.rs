//! Board state: a fixed grid of cells with copy-on-write mutation.

use std::fmt;
use std::str::FromStr;

use crate::core::common::BoardError;
use crate::core::config::BOARD_SIZE;
use crate::core::ship::ShipId;

/// A square on the board, always within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Top-left square, `A1`.
    pub const ORIGIN: Position = Position { row: 0, col: 0 };

    /// Build a position, rejecting anything outside the board.
    pub fn new(row: usize, col: usize) -> Result<Self, BoardError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(BoardError::OutOfBounds { row, col });
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Same as [`Position::new`] but for signed arithmetic results.
    pub fn checked(row: isize, col: isize) -> Option<Self> {
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as usize, col as usize).ok()
    }

    /// Map a column letter (`A`..=`J`, any case) and a 1-based row number.
    pub fn from_letter_number(letter: char, number: usize) -> Option<Self> {
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return None;
        }
        let col = (letter as u8 - b'A') as usize;
        if number == 0 {
            return None;
        }
        Self::new(number - 1, col).ok()
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Column letter used in coordinate text.
    pub fn letter(self) -> char {
        (b'A' + self.col) as char
    }

    /// Row-major iteration over every square of the board.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE * BOARD_SIZE).map(|i| Position {
            row: (i / BOARD_SIZE) as u8,
            col: (i % BOARD_SIZE) as u8,
        })
    }

    /// In-bounds neighbours in the order up, down, left, right.
    pub fn orthogonal_neighbors(self) -> impl Iterator<Item = Position> {
        let (r, c) = (self.row as isize, self.col as isize);
        [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)]
            .into_iter()
            .filter_map(|(r, c)| Position::checked(r, c))
    }

    /// This square and its eight surrounding squares, clipped to the board.
    pub fn neighborhood(self) -> impl Iterator<Item = Position> {
        let (r, c) = (self.row as isize, self.col as isize);
        (-1..=1).flat_map(move |dr| (-1..=1).filter_map(move |dc| Position::checked(r + dr, c + dc)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), self.row + 1)
    }
}

/// Error returned when coordinate text is not a single `A1`..`J10` token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a board coordinate")]
pub struct ParsePositionError(pub String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let mut chars = text.chars();
        let letter = chars
            .next()
            .ok_or_else(|| ParsePositionError(s.to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParsePositionError(s.to_string()));
        }
        let number: usize = digits
            .parse()
            .map_err(|_| ParsePositionError(s.to_string()))?;
        Position::from_letter_number(letter, number).ok_or_else(|| ParsePositionError(s.to_string()))
    }
}

/// State of a single square.
///
/// `is_hit` and `is_miss` are never both set, `is_miss` implies no ship and
/// `ship_id` is present exactly when `has_ship` is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    has_ship: bool,
    is_hit: bool,
    is_miss: bool,
    ship_id: Option<ShipId>,
}

impl Cell {
    pub fn has_ship(&self) -> bool {
        self.has_ship
    }

    pub fn is_hit(&self) -> bool {
        self.is_hit
    }

    pub fn is_miss(&self) -> bool {
        self.is_miss
    }

    pub fn ship_id(&self) -> Option<ShipId> {
        self.ship_id
    }

    /// Neither hit nor missed yet.
    pub fn is_untargeted(&self) -> bool {
        !self.is_hit && !self.is_miss
    }
}

/// Fixed 10×10 grid, row-major. Every mutator works on a copy.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Create an empty board: no ships, nothing targeted.
    pub fn new() -> Self {
        Board {
            cells: [[Cell::default(); BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.row()][pos.col()]
    }

    pub fn is_untargeted(&self, pos: Position) -> bool {
        self.cell(pos).is_untargeted()
    }

    /// Every untargeted square, row-major.
    pub fn untargeted(&self) -> Vec<Position> {
        Position::all().filter(|&p| self.is_untargeted(p)).collect()
    }

    pub(crate) fn with_ship(mut self, pos: Position, id: ShipId) -> Self {
        let cell = &mut self.cells[pos.row()][pos.col()];
        cell.has_ship = true;
        cell.ship_id = Some(id);
        self
    }

    pub(crate) fn without_ship(mut self, pos: Position) -> Self {
        let cell = &mut self.cells[pos.row()][pos.col()];
        cell.has_ship = false;
        cell.ship_id = None;
        self
    }

    pub(crate) fn with_hit(mut self, pos: Position) -> Self {
        self.cells[pos.row()][pos.col()].is_hit = true;
        self
    }

    pub(crate) fn with_miss(mut self, pos: Position) -> Self {
        self.cells[pos.row()][pos.col()].is_miss = true;
        self
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        write!(f, "{}", self)?;
        write!(f, "}}")
    }
}

/// Owner's view: `S` ship, `X` hit, `o` miss, `.` water.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for c in 0..BOARD_SIZE {
            write!(f, " {}", (b'A' + c as u8) as char)?;
        }
        writeln!(f)?;
        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "{:>2} ", r + 1)?;
            for cell in row.iter() {
                let ch = if cell.is_hit {
                    'X'
                } else if cell.is_miss {
                    'o'
                } else if cell.has_ship {
                    'S'
                } else {
                    '.'
                };
                write!(f, " {}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_text_form() {
        assert_eq!(Position::new(0, 0).unwrap().to_string(), "A1");
        assert_eq!(Position::new(9, 9).unwrap().to_string(), "J10");
        assert_eq!("j10".parse::<Position>().unwrap(), Position::new(9, 9).unwrap());
        assert!("K1".parse::<Position>().is_err());
        assert!("A11".parse::<Position>().is_err());
        assert!("A0".parse::<Position>().is_err());
    }

    #[test]
    fn neighbors_are_clipped() {
        let corner = Position::new(0, 0).unwrap();
        let n: Vec<_> = corner.orthogonal_neighbors().collect();
        assert_eq!(n, vec![Position::new(1, 0).unwrap(), Position::new(0, 1).unwrap()]);
        assert_eq!(corner.neighborhood().count(), 4);
        assert_eq!(Position::new(5, 5).unwrap().neighborhood().count(), 9);
    }
}
