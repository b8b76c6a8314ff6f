//! Drives a match between two move sources.
//!
//! A move is taken in three steps so the slow part can run without holding
//! the orchestrator: [`Orchestrator::begin_move`] reserves the acting side's
//! single in-flight slot, [`PendingMove::choose`] asks the move source, and
//! [`Orchestrator::commit`] applies the result. A commit whose ticket no
//! longer matches (the match was reset, or the slot was released) is
//! discarded.
//!
//! Resetting never waits on a move source that is busy choosing; its memory
//! is cleared the next time the source is locked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rand::Rng;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use crate::core::{GameError, GamePhase, MatchState, Position, ShipId, ShotReport, Side, TargetView};
use crate::player::MoveSource;
use crate::settings::ExternalConfig;

/// One side's move source plus a reset that could not be applied yet.
pub struct SourceSlot {
    source: Mutex<Box<dyn MoveSource>>,
    reset_pending: AtomicBool,
}

impl SourceSlot {
    fn new(source: Box<dyn MoveSource>) -> Self {
        Self {
            source: Mutex::new(source),
            reset_pending: AtomicBool::new(false),
        }
    }

    /// Lock the source, applying any deferred reset first.
    async fn lock(&self) -> MutexGuard<'_, Box<dyn MoveSource>> {
        let mut source = self.source.lock().await;
        if self.reset_pending.swap(false, Ordering::AcqRel) {
            source.reset();
            debug!("{} source reset after its late move", source.name());
        }
        source
    }

    /// Reset now if nobody holds the source, otherwise on the next lock.
    fn request_reset(&self) {
        match self.source.try_lock() {
            Ok(mut source) => {
                self.reset_pending.store(false, Ordering::Release);
                source.reset();
            }
            Err(_) => {
                self.reset_pending.store(true, Ordering::Release);
                debug!("move source busy, reset deferred");
            }
        }
    }
}

pub type SharedMoveSource = Arc<SourceSlot>;

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("a move for {0:?} is already in flight")]
    MoveInProgress(Side),
    #[error("match did not finish within {0} ticks")]
    Stalled(usize),
}

/// Claim on a side's in-flight slot for one match generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTicket {
    side: Side,
    generation: u64,
    serial: u64,
}

impl MoveTicket {
    pub fn side(&self) -> Side {
        self.side
    }
}

/// A reserved move waiting for its source to pick a target.
pub struct PendingMove {
    ticket: MoveTicket,
    view: TargetView,
    source: SharedMoveSource,
}

impl PendingMove {
    pub fn ticket(&self) -> MoveTicket {
        self.ticket
    }

    pub fn view(&self) -> &TargetView {
        &self.view
    }

    /// Ask the move source for its target.
    pub async fn choose(self) -> ChosenMove {
        let target = {
            let mut source = self.source.lock().await;
            source.next_move(&self.view).await
        };
        ChosenMove {
            ticket: self.ticket,
            target,
            source: self.source,
        }
    }
}

/// A target picked by a move source, ready to be committed.
pub struct ChosenMove {
    ticket: MoveTicket,
    target: Position,
    source: SharedMoveSource,
}

impl ChosenMove {
    pub fn ticket(&self) -> MoveTicket {
        self.ticket
    }

    pub fn target(&self) -> Position {
        self.target
    }
}

/// What happened to a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The shot was resolved.
    Applied(ShotReport),
    /// The source picked a square that was already targeted; the turn is
    /// unchanged and the side will be asked again.
    Rejected(Position),
    /// The ticket was stale; nothing changed.
    Discarded,
}

/// Owns the match state and one move source per side.
pub struct Orchestrator {
    state: MatchState,
    sources: [SharedMoveSource; 2],
    in_flight: [Option<u64>; 2],
    generation: u64,
    serial: u64,
    wins: [u32; 2],
}

fn share(source: Box<dyn MoveSource>) -> SharedMoveSource {
    Arc::new(SourceSlot::new(source))
}

impl Orchestrator {
    pub fn new(side_a: Box<dyn MoveSource>, side_b: Box<dyn MoveSource>) -> Self {
        Self {
            state: MatchState::new(),
            sources: [share(side_a), share(side_b)],
            in_flight: [None, None],
            generation: 0,
            serial: 0,
            wins: [0, 0],
        }
    }

    /// Read-only view of the current match.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Matches won by `side` since this orchestrator was created.
    pub fn wins(&self, side: Side) -> u32 {
        self.wins[side.index()]
    }

    pub fn is_move_in_flight(&self, side: Side) -> bool {
        self.in_flight[side.index()].is_some()
    }

    pub fn place_ship(
        &mut self,
        side: Side,
        id: ShipId,
        origin: Position,
        horizontal: bool,
    ) -> Result<(), OrchestratorError> {
        Ok(self.state.place_ship(side, id, origin, horizontal)?)
    }

    pub fn randomize_fleet<R: Rng + ?Sized>(&mut self, side: Side, rng: &mut R) -> Result<(), OrchestratorError> {
        Ok(self.state.randomize(side, rng)?)
    }

    pub fn clear_fleet(&mut self, side: Side) -> Result<(), OrchestratorError> {
        Ok(self.state.clear(side)?)
    }

    /// Setup → Playing.
    pub fn start(&mut self) -> Result<(), OrchestratorError> {
        self.state.start()?;
        Ok(())
    }

    /// Throw the current match away and return to a fresh Setup.
    ///
    /// Moves still in flight are discarded when they are committed, and a
    /// source that is still choosing one is reset once it lets go.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.in_flight = [None, None];
        self.state = MatchState::new();
        for source in &self.sources {
            source.request_reset();
        }
        info!("match reset (generation {})", self.generation);
    }

    /// Swap the move source driving `side`. Takes effect from its next move.
    pub fn replace_move_source(&mut self, side: Side, source: Box<dyn MoveSource>) {
        info!("{:?} now driven by {} source", side, source.name());
        self.sources[side.index()] = share(source);
    }

    /// Hand a new service configuration to `side`'s move source.
    pub async fn update_external_config(&self, side: Side, config: ExternalConfig) {
        self.sources[side.index()].lock().await.update_config(config);
    }

    /// Reserve the in-flight slot of the side holding the turn.
    pub fn begin_move(&mut self) -> Result<PendingMove, OrchestratorError> {
        if self.state.phase() != GamePhase::Playing {
            return Err(GameError::WrongPhase(self.state.phase()).into());
        }
        let side = self.state.turn();
        if self.in_flight[side.index()].is_some() {
            return Err(OrchestratorError::MoveInProgress(side));
        }
        self.serial += 1;
        self.in_flight[side.index()] = Some(self.serial);
        let ticket = MoveTicket {
            side,
            generation: self.generation,
            serial: self.serial,
        };
        debug!("{:?} move {} in flight", side, ticket.serial);
        Ok(PendingMove {
            ticket,
            view: self.state.target_view(side),
            source: Arc::clone(&self.sources[side.index()]),
        })
    }

    /// Apply a chosen move if its ticket is still current.
    pub async fn commit(&mut self, chosen: ChosenMove) -> Result<TickOutcome, OrchestratorError> {
        let ticket = chosen.ticket;
        let slot = &mut self.in_flight[ticket.side.index()];
        if ticket.generation != self.generation || *slot != Some(ticket.serial) {
            warn!("discarding stale {:?} move at {}", ticket.side, chosen.target);
            return Ok(TickOutcome::Discarded);
        }
        *slot = None;

        if self.state.phase() != GamePhase::Playing || self.state.turn() != ticket.side {
            warn!("discarding {:?} move at {}: turn has moved on", ticket.side, chosen.target);
            return Ok(TickOutcome::Discarded);
        }

        let report = match self.state.fire(ticket.side, chosen.target) {
            Ok(report) => report,
            Err(GameError::AlreadyTargeted(target)) => {
                warn!("{:?} picked {} again, asking once more", ticket.side, target);
                return Ok(TickOutcome::Rejected(target));
            }
            Err(e) => return Err(e.into()),
        };

        chosen
            .source
            .lock()
            .await
            .record_outcome(report.target, report.outcome);

        if report.game_over {
            self.wins[report.shooter.index()] += 1;
            info!("{:?} wins", report.shooter);
        }
        Ok(TickOutcome::Applied(report))
    }

    /// Play a single move for the side holding the turn.
    pub async fn tick(&mut self) -> Result<TickOutcome, OrchestratorError> {
        let pending = self.begin_move()?;
        let chosen = pending.choose().await;
        self.commit(chosen).await
    }

    /// Tick until the match ends, giving up after `max_ticks`.
    pub async fn play_out(&mut self, max_ticks: usize) -> anyhow::Result<Side> {
        for _ in 0..max_ticks {
            if let Some(winner) = self.state.winner() {
                return Ok(winner);
            }
            self.tick().await?;
        }
        self.state
            .winner()
            .ok_or_else(|| OrchestratorError::Stalled(max_ticks).into())
    }
}
