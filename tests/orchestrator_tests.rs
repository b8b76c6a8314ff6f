use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::Notify;
use salvo::{
    ExternalConfig, ExternalMoveSource, GameError, GamePhase, HeuristicMoveSource, MoveSource, Orchestrator,
    OrchestratorError, Position, ScriptedTransport, ShipId, ShotOutcome, Side, TargetView, TickOutcome,
};

fn pos(s: &str) -> Position {
    s.parse().unwrap()
}

/// Plays a fixed list of targets, then `A1` forever.
struct Scripted {
    moves: VecDeque<Position>,
}

impl Scripted {
    fn new(moves: &[&str]) -> Self {
        Self {
            moves: moves.iter().map(|m| pos(m)).collect(),
        }
    }
}

#[async_trait::async_trait]
impl MoveSource for Scripted {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn next_move(&mut self, _view: &TargetView) -> Position {
        self.moves.pop_front().unwrap_or(Position::ORIGIN)
    }
}

/// Holds its first move until released; remembers every target it chose.
struct Gated {
    gated: bool,
    entered: Arc<Notify>,
    release: Arc<Notify>,
    chosen: Arc<StdMutex<Vec<Position>>>,
    resets: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl MoveSource for Gated {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn next_move(&mut self, view: &TargetView) -> Position {
        if self.gated {
            self.gated = false;
            self.entered.notify_one();
            self.release.notified().await;
        }
        let target = view.untargeted()[0];
        self.chosen.lock().unwrap().push(target);
        target
    }

    fn reset(&mut self) {
        self.chosen.lock().unwrap().clear();
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

fn heuristics(seed: u64) -> Orchestrator {
    Orchestrator::new(
        Box::new(HeuristicMoveSource::with_seed(seed)),
        Box::new(HeuristicMoveSource::with_seed(seed + 1)),
    )
}

fn setup(orchestrator: &mut Orchestrator, seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    orchestrator.randomize_fleet(Side::A, &mut rng).unwrap();
    orchestrator.randomize_fleet(Side::B, &mut rng).unwrap();
    orchestrator.start().unwrap();
}

/// Ships on rows 1, 3, 5, 7 and 9 from column A; column J stays open water.
fn place_rows(orchestrator: &mut Orchestrator, side: Side) {
    for (id, origin) in [
        (ShipId::Carrier, "A1"),
        (ShipId::Battleship, "A3"),
        (ShipId::Cruiser, "A5"),
        (ShipId::Submarine, "A7"),
        (ShipId::Destroyer, "A9"),
    ] {
        orchestrator.place_ship(side, id, pos(origin), true).unwrap();
    }
}

#[tokio::test]
async fn moves_need_a_started_match() {
    let mut orchestrator = heuristics(1);
    assert!(matches!(
        orchestrator.begin_move(),
        Err(OrchestratorError::Game(GameError::WrongPhase(GamePhase::Setup)))
    ));
    assert!(matches!(
        orchestrator.start(),
        Err(OrchestratorError::Game(GameError::FleetIncomplete(Side::A)))
    ));
}

#[tokio::test]
async fn only_one_move_in_flight_per_side() {
    let mut orchestrator = heuristics(2);
    setup(&mut orchestrator, 2);

    let pending = orchestrator.begin_move().unwrap();
    assert_eq!(pending.ticket().side(), Side::A);
    assert!(orchestrator.is_move_in_flight(Side::A));
    assert!(matches!(
        orchestrator.begin_move(),
        Err(OrchestratorError::MoveInProgress(Side::A))
    ));

    let chosen = pending.choose().await;
    let outcome = orchestrator.commit(chosen).await.unwrap();
    assert!(matches!(outcome, TickOutcome::Applied(_)));
    assert!(!orchestrator.is_move_in_flight(Side::A));
}

#[tokio::test]
async fn completed_moves_from_before_a_reset_are_discarded() {
    let mut orchestrator = heuristics(3);
    setup(&mut orchestrator, 3);

    let chosen = orchestrator.begin_move().unwrap().choose().await;
    orchestrator.reset();
    assert_eq!(orchestrator.state().phase(), GamePhase::Setup);
    assert!(!orchestrator.is_move_in_flight(Side::A));

    setup(&mut orchestrator, 4);
    assert_eq!(orchestrator.commit(chosen).await.unwrap(), TickOutcome::Discarded);
    assert!(orchestrator.state().record(Side::A).moves().is_empty());
}

#[tokio::test]
async fn reset_does_not_wait_for_a_move_in_flight() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let chosen = Arc::new(StdMutex::new(Vec::new()));
    let resets = Arc::new(AtomicUsize::new(0));
    let gated = Gated {
        gated: true,
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
        chosen: Arc::clone(&chosen),
        resets: Arc::clone(&resets),
    };
    let mut orchestrator = Orchestrator::new(Box::new(gated), Box::new(HeuristicMoveSource::with_seed(12)));
    setup(&mut orchestrator, 12);

    let pending = orchestrator.begin_move().unwrap();
    let late = tokio::spawn(pending.choose());
    entered.notified().await;

    // The source is still suspended inside next_move.
    orchestrator.reset();
    assert_eq!(orchestrator.state().phase(), GamePhase::Setup);
    assert!(!orchestrator.is_move_in_flight(Side::A));
    assert_eq!(resets.load(Ordering::SeqCst), 0);

    setup(&mut orchestrator, 13);
    release.notify_one();
    let late_move = late.await.unwrap();
    assert_eq!(chosen.lock().unwrap().len(), 1);

    assert_eq!(orchestrator.commit(late_move).await.unwrap(), TickOutcome::Discarded);
    assert!(orchestrator.state().record(Side::A).moves().is_empty());
    assert!(orchestrator.state().record(Side::B).moves().is_empty());
    assert_eq!(orchestrator.state().turn(), Side::A);

    // The deferred reset lands before the new match's first move.
    let TickOutcome::Applied(report) = orchestrator.tick().await.unwrap() else {
        panic!("first move of the new match should land");
    };
    assert_eq!(resets.load(Ordering::SeqCst), 1);
    assert_eq!(*chosen.lock().unwrap(), vec![report.target]);
}

#[tokio::test]
async fn repeat_target_is_rejected_and_the_side_asked_again() {
    let mut orchestrator = Orchestrator::new(
        Box::new(Scripted::new(&["J10", "J10", "I10"])),
        Box::new(Scripted::new(&["J10"])),
    );
    place_rows(&mut orchestrator, Side::A);
    place_rows(&mut orchestrator, Side::B);
    orchestrator.start().unwrap();

    let TickOutcome::Applied(report) = orchestrator.tick().await.unwrap() else {
        panic!("first shot should land");
    };
    assert_eq!(report.outcome, ShotOutcome::Miss);
    assert_eq!(report.next_turn, Side::B);

    assert!(matches!(orchestrator.tick().await.unwrap(), TickOutcome::Applied(_)));
    assert_eq!(orchestrator.state().turn(), Side::A);

    assert_eq!(orchestrator.tick().await.unwrap(), TickOutcome::Rejected(pos("J10")));
    assert_eq!(orchestrator.state().turn(), Side::A);
    assert_eq!(orchestrator.state().record(Side::A).moves(), &[pos("J10")]);
    assert!(!orchestrator.is_move_in_flight(Side::A));

    let TickOutcome::Applied(report) = orchestrator.tick().await.unwrap() else {
        panic!("retry should land");
    };
    assert_eq!(report.target, pos("I10"));
}

#[tokio::test]
async fn a_hit_keeps_the_turn() {
    let mut orchestrator = Orchestrator::new(
        Box::new(Scripted::new(&["A1", "J10"])),
        Box::new(Scripted::new(&[])),
    );
    place_rows(&mut orchestrator, Side::A);
    place_rows(&mut orchestrator, Side::B);
    orchestrator.start().unwrap();

    orchestrator.tick().await.unwrap();
    assert_eq!(orchestrator.state().turn(), Side::A);
    orchestrator.tick().await.unwrap();
    assert_eq!(orchestrator.state().turn(), Side::B);
}

#[tokio::test]
async fn matches_play_out_and_wins_are_counted() {
    let mut orchestrator = heuristics(5);
    for game in 0..3u64 {
        orchestrator.reset();
        setup(&mut orchestrator, 100 + game);
        let winner = orchestrator.play_out(400).await.unwrap();
        assert_eq!(orchestrator.state().winner(), Some(winner));
        assert!(orchestrator.state().fleet(winner.other()).all_sunk());
        assert!(matches!(
            orchestrator.begin_move(),
            Err(OrchestratorError::Game(GameError::WrongPhase(GamePhase::GameOver)))
        ));
    }
    assert_eq!(orchestrator.wins(Side::A) + orchestrator.wins(Side::B), 3);
}

#[tokio::test]
async fn play_out_gives_up_when_out_of_ticks() {
    let mut orchestrator = heuristics(6);
    setup(&mut orchestrator, 6);
    assert!(orchestrator.play_out(3).await.is_err());
}

#[tokio::test]
async fn external_source_with_a_dead_service_still_finishes() {
    let transport = ScriptedTransport::new();
    transport.repeat_error("connection refused");
    let external = ExternalMoveSource::with_rng(
        ExternalConfig::default(),
        Arc::new(transport.clone()),
        SmallRng::seed_from_u64(8),
    )
    .with_retry_delay(Duration::ZERO);

    let mut orchestrator = Orchestrator::new(Box::new(external), Box::new(HeuristicMoveSource::with_seed(9)));
    setup(&mut orchestrator, 7);
    orchestrator.play_out(400).await.unwrap();

    let shots_by_a = orchestrator.state().record(Side::A).moves().len();
    assert_eq!(transport.posted().len(), shots_by_a * 3);
}

#[tokio::test]
async fn config_updates_reach_the_side_source() {
    let transport = ScriptedTransport::new();
    transport.repeat_text("E5");
    let external = ExternalMoveSource::with_rng(
        ExternalConfig::default(),
        Arc::new(transport.clone()),
        SmallRng::seed_from_u64(10),
    )
    .with_retry_delay(Duration::ZERO);

    let mut orchestrator = heuristics(11);
    orchestrator.replace_move_source(Side::B, Box::new(external));
    orchestrator
        .update_external_config(
            Side::B,
            ExternalConfig {
                endpoint: "http://127.0.0.1:5000".to_string(),
                ..ExternalConfig::default()
            },
        )
        .await;
    // Side A ignores configuration it has no use for.
    orchestrator.update_external_config(Side::A, ExternalConfig::default()).await;

    place_rows(&mut orchestrator, Side::A);
    place_rows(&mut orchestrator, Side::B);
    orchestrator.start().unwrap();
    while orchestrator.state().turn() == Side::A {
        orchestrator.tick().await.unwrap();
    }
    orchestrator.tick().await.unwrap();

    assert_eq!(transport.urls(), vec!["http://127.0.0.1:5000/v1/chat/completions".to_string()]);
}
