//! Prompt text sent to the chat-completion service.

use std::fmt;

use crate::core::{Mark, Position, TargetView, BOARD_SIZE, SHIPS};

use super::memory::MoveMemory;
use super::retry::ContextLevel;

const STRATEGY: &str = "\
Battleship Strategy Guide:
1. If your last move was a HIT, your next move MUST be an adjacent cell (up, down, left or right) of that hit
2. If you have multiple HITS in a line, you MUST continue in that direction
3. If a line of HITS ended in a MISS, you MUST try the opposite end of the line
4. Otherwise space your shots out to search efficiently for new ships
5. Remember ships are 2-5 cells long and are never placed diagonally";

const RESPONSE_FORMAT: &str = "\
Choose the most strategic coordinate to attack next. Respond with ONLY the coordinate, like \"A1\", \"B5\" or \"J10\", and nothing else.";

/// Attacker's picture of the opponent board, labelled `A`–`J` by `1`–`10`.
struct KnownBoard<'a>(&'a TargetView);

impl fmt::Display for KnownBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..BOARD_SIZE {
            write!(f, " {}", (b'A' + c as u8) as char)?;
        }
        writeln!(f)?;
        for r in 0..BOARD_SIZE {
            write!(f, "{:>2}", r + 1)?;
            for c in 0..BOARD_SIZE {
                let mark = Position::new(r, c).map(|p| self.0.mark(p)).unwrap_or(Mark::Unknown);
                let ch = match mark {
                    Mark::Hit => 'H',
                    Mark::Miss => 'M',
                    Mark::Unknown => '.',
                };
                write!(f, " {}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Board as the attacker knows it. Ship positions never appear.
pub fn render_board(view: &TargetView) -> String {
    KnownBoard(view).to_string()
}

fn join_positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "None".to_string();
    }
    positions
        .iter()
        .map(Position::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

struct Prompt<'a> {
    view: &'a TargetView,
    memory: &'a MoveMemory,
    level: ContextLevel,
}

impl Prompt<'_> {
    fn write_history(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;
        writeln!(f, "Current hits: {}", join_positions(view.hits()))?;
        if view.sunk_ships().is_empty() {
            writeln!(f, "Ships sunk: None")?;
        } else {
            writeln!(f, "Ships sunk: {}", view.sunk_ships().join(", "))?;
        }

        let mut recent = self.memory.recent().peekable();
        if recent.peek().is_some() {
            write!(f, "\nLast moves and results:\n")?;
            for (pos, hit) in recent {
                writeln!(f, "- {}: {}", pos, if *hit { "HIT" } else { "MISS" })?;
            }
        }
        if !self.memory.events().is_empty() {
            write!(f, "\nRecent events:\n")?;
            for event in self.memory.events() {
                writeln!(f, "- {}", event)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Prompt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BATTLESHIP - Choose your next move.\n\n")?;
        writeln!(f, "Ships are placed on a 10x10 grid (A1 to J10).\nFleet:")?;
        for def in SHIPS.iter() {
            writeln!(f, "- {} ({} cells)", def.name(), def.length())?;
        }

        write!(f, "\nCurrent board:\n{}", KnownBoard(self.view))?;
        writeln!(f, "\nLegend: '.' = unknown, 'H' = hit, 'M' = miss")?;

        if self.level.includes_moves() {
            write!(f, "\nPrevious moves: {}\n", join_positions(self.view.previous_moves()))?;
        }
        if self.level.includes_history() {
            self.write_history(f)?;
        }

        write!(f, "\n{}\n\n{}", STRATEGY, RESPONSE_FORMAT)
    }
}

/// Compose the request prompt, keeping only what `level` allows.
pub fn build_prompt(view: &TargetView, memory: &MoveMemory, level: ContextLevel) -> String {
    Prompt { view, memory, level }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{make_attack, place_ship, Board, Fleet, ShipId, ShotOutcome};

    fn view_with_shots() -> (TargetView, MoveMemory) {
        let fleet = Fleet::new();
        let destroyer = fleet.ship(ShipId::Destroyer);
        let (board, ship) = place_ship(&Board::new(), destroyer, Position::new(2, 2).unwrap(), true).unwrap();
        let fleet = fleet.with_ship(ship);
        let hit = Position::new(2, 2).unwrap();
        let miss = Position::new(5, 5).unwrap();
        let board = make_attack(&board, &fleet, hit).board;
        let board = make_attack(&board, &fleet, miss).board;
        let view = TargetView::new(&board, vec![hit, miss], vec![hit], vec!["Submarine"]);
        let mut memory = MoveMemory::default();
        memory.record(hit, ShotOutcome::Hit(ShipId::Destroyer));
        memory.record(miss, ShotOutcome::Miss);
        (view, memory)
    }

    #[test]
    fn board_hides_ships() {
        let (view, _) = view_with_shots();
        let board = render_board(&view);
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines[0], "   A B C D E F G H I J");
        assert_eq!(lines[3], " 3 . . H . . . . . . .");
        assert_eq!(lines[6], " 6 . . . . . M . . . .");
        assert_eq!(lines[10], "10 . . . . . . . . . .");
        assert!(!board.contains('S'));
    }

    #[test]
    fn context_is_stripped_by_level() {
        let (view, memory) = view_with_shots();

        let full = build_prompt(&view, &memory, ContextLevel::Full);
        assert!(full.contains("Previous moves: C3, F6"));
        assert!(full.contains("Current hits: C3"));
        assert!(full.contains("Ships sunk: Submarine"));
        assert!(full.contains("- F6: MISS"));
        assert!(full.contains("HIT at C3"));

        let lean = build_prompt(&view, &memory, ContextLevel::NoHistory);
        assert!(lean.contains("Previous moves: C3, F6"));
        assert!(!lean.contains("Current hits"));
        assert!(!lean.contains("Ships sunk"));
        assert!(!lean.contains("HIT at C3"));

        let minimal = build_prompt(&view, &memory, ContextLevel::Minimal);
        assert!(!minimal.contains("Previous moves"));
        assert!(minimal.contains("Carrier (5 cells)"));
        assert!(minimal.contains("ONLY the coordinate"));
    }
}
