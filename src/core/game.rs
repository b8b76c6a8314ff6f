//! Match state and the turn controller.
//!
//! A match moves Setup → Playing → GameOver. During Playing a side keeps the
//! turn for as long as it hits; the first shot that sinks the last ship of
//! the opposing fleet ends the match with the shooter as winner.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{
    attack::{is_game_over, make_attack},
    board::{Board, Position},
    common::{GameError, ShotOutcome},
    placement::{is_valid_placement, place_ship, place_ships_randomly, remove_ship},
    ship::{Fleet, ShipId},
    targeting::TargetView,
};

/// Lifecycle phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    Playing,
    GameOver,
}

/// One of the two participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub const BOTH: [Side; 2] = [Side::A, Side::B];
}

/// Side that fires first once the match starts.
pub const STARTING_SIDE: Side = Side::A;

/// Shots a side has fired at its opponent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShotRecord {
    moves: Vec<Position>,
    hits: Vec<Position>,
    sunk: Vec<&'static str>,
}

impl ShotRecord {
    pub fn moves(&self) -> &[Position] {
        &self.moves
    }

    pub fn hits(&self) -> &[Position] {
        &self.hits
    }

    pub fn sunk(&self) -> &[&'static str] {
        &self.sunk
    }

    fn push(&mut self, target: Position, outcome: ShotOutcome) {
        self.moves.push(target);
        if outcome.is_hit() {
            self.hits.push(target);
        }
        if let Some(name) = outcome.sunk_name() {
            if !self.sunk.contains(&name) {
                self.sunk.push(name);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SideState {
    board: Board,
    fleet: Fleet,
    record: ShotRecord,
}

impl SideState {
    fn new() -> Self {
        Self {
            board: Board::new(),
            fleet: Fleet::new(),
            record: ShotRecord::default(),
        }
    }
}

/// What a legal shot did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotReport {
    pub shooter: Side,
    pub target: Position,
    pub outcome: ShotOutcome,
    /// Side holding the turn after this shot.
    pub next_turn: Side,
    pub game_over: bool,
}

/// Both boards and fleets plus phase, turn and winner of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    sides: [SideState; 2],
    phase: GamePhase,
    turn: Side,
    winner: Option<Side>,
}

impl MatchState {
    /// Fresh match in Setup with empty boards and unplaced fleets.
    pub fn new() -> Self {
        Self {
            sides: [SideState::new(), SideState::new()],
            phase: GamePhase::Setup,
            turn: STARTING_SIDE,
            winner: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Board holding `side`'s own ships.
    pub fn board(&self, side: Side) -> &Board {
        &self.sides[side.index()].board
    }

    pub fn fleet(&self, side: Side) -> &Fleet {
        &self.sides[side.index()].fleet
    }

    /// Shots fired by `side`.
    pub fn record(&self, side: Side) -> &ShotRecord {
        &self.sides[side.index()].record
    }

    /// What `side` may know about its opponent's board.
    pub fn target_view(&self, side: Side) -> TargetView {
        let record = self.record(side);
        TargetView::new(
            self.board(side.other()),
            record.moves.clone(),
            record.hits.clone(),
            record.sunk.clone(),
        )
    }

    fn require(&self, phase: GamePhase) -> Result<(), GameError> {
        if self.phase != phase {
            return Err(GameError::WrongPhase(self.phase));
        }
        Ok(())
    }

    /// Place (or move) one of `side`'s ships. An already placed ship is
    /// lifted first; an invalid spot leaves everything untouched.
    pub fn place_ship(
        &mut self,
        side: Side,
        id: ShipId,
        origin: Position,
        horizontal: bool,
    ) -> Result<(), GameError> {
        self.require(GamePhase::Setup)?;
        let state = &self.sides[side.index()];
        let ship = state.fleet.ship(id);
        let board = if ship.is_placed() {
            remove_ship(&state.board, ship)
        } else {
            state.board
        };
        if !is_valid_placement(&board, ship, origin, horizontal) {
            return Err(GameError::InvalidPlacement(ship.name()));
        }
        let (board, ship) = place_ship(&board, ship, origin, horizontal)?;
        let fleet = state.fleet.with_ship(ship);
        let state = &mut self.sides[side.index()];
        state.board = board;
        state.fleet = fleet;
        Ok(())
    }

    /// Replace `side`'s layout with a random legal one.
    pub fn randomize<R: Rng + ?Sized>(&mut self, side: Side, rng: &mut R) -> Result<(), GameError> {
        self.require(GamePhase::Setup)?;
        let (board, fleet) = place_ships_randomly(&Fleet::new(), rng)?;
        let state = &mut self.sides[side.index()];
        state.board = board;
        state.fleet = fleet;
        Ok(())
    }

    /// Remove every ship of `side`.
    pub fn clear(&mut self, side: Side) -> Result<(), GameError> {
        self.require(GamePhase::Setup)?;
        self.sides[side.index()] = SideState::new();
        Ok(())
    }

    /// Setup → Playing. Both fleets must be fully placed.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.require(GamePhase::Setup)?;
        for side in Side::BOTH {
            if !self.fleet(side).all_placed() {
                return Err(GameError::FleetIncomplete(side));
            }
        }
        self.phase = GamePhase::Playing;
        self.turn = STARTING_SIDE;
        info!("match started, {:?} to fire", self.turn);
        Ok(())
    }

    /// Resolve a shot by `shooter` against the other side.
    ///
    /// A repeat target is rejected without touching turn or history.
    pub fn fire(&mut self, shooter: Side, target: Position) -> Result<ShotReport, GameError> {
        self.require(GamePhase::Playing)?;
        if shooter != self.turn {
            return Err(GameError::NotYourTurn(shooter));
        }

        let defender = &self.sides[shooter.other().index()];
        let result = make_attack(&defender.board, &defender.fleet, target);
        if result.outcome == ShotOutcome::Repeat {
            return Err(GameError::AlreadyTargeted(target));
        }

        let defender = &mut self.sides[shooter.other().index()];
        defender.board = result.board;
        defender.fleet = result.fleet;
        let fleet_destroyed = is_game_over(&defender.fleet);
        self.sides[shooter.index()].record.push(target, result.outcome);

        if fleet_destroyed {
            self.phase = GamePhase::GameOver;
            self.winner = Some(shooter);
            info!("{:?} sank the last ship at {}", shooter, target);
        } else if !result.outcome.is_hit() {
            self.turn = shooter.other();
        }
        debug!("{:?} fired at {}: {:?}", shooter, target, result.outcome);

        Ok(ShotReport {
            shooter,
            target,
            outcome: result.outcome,
            next_turn: self.turn,
            game_over: fleet_destroyed,
        })
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
