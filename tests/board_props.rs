use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use salvo::{make_attack, place_ships_randomly, Board, Fleet, Position, ShotOutcome, BOARD_SIZE, SHIPS};

fn random_layout(seed: u64) -> (Board, Fleet) {
    let mut rng = SmallRng::seed_from_u64(seed);
    place_ships_randomly(&Fleet::new(), &mut rng).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_layout_places_every_ship_apart(seed in any::<u64>()) {
        let (board, fleet) = random_layout(seed);
        prop_assert!(fleet.all_placed());

        let ship_cells = Position::all().filter(|&p| board.cell(p).has_ship()).count();
        let fleet_cells: usize = SHIPS.iter().map(|def| def.length()).sum();
        prop_assert_eq!(ship_cells, fleet_cells);
        prop_assert_eq!(fleet_cells, 17);

        for ship in fleet.ships() {
            prop_assert_eq!(ship.positions().len(), ship.size());
            for &p in ship.positions() {
                prop_assert_eq!(board.cell(p).ship_id(), Some(ship.id()));
                for adj in p.neighborhood() {
                    let cell = board.cell(adj);
                    prop_assert!(!cell.has_ship() || cell.ship_id() == Some(ship.id()));
                }
            }
        }
    }

    #[test]
    fn repeat_shot_changes_nothing(seed in any::<u64>(), row in 0..BOARD_SIZE, col in 0..BOARD_SIZE) {
        let (board, fleet) = random_layout(seed);
        let target = Position::new(row, col).unwrap();
        let first = make_attack(&board, &fleet, target);
        prop_assert_ne!(first.outcome, ShotOutcome::Repeat);

        let second = make_attack(&first.board, &first.fleet, target);
        prop_assert_eq!(second.outcome, ShotOutcome::Repeat);
        prop_assert_eq!(second.board, first.board);
        prop_assert_eq!(second.fleet, first.fleet);
    }

    #[test]
    fn cells_stay_consistent_under_fire(seed in any::<u64>(), shots in 0usize..150) {
        let (mut board, mut fleet) = random_layout(seed);
        let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
        for _ in 0..shots {
            let target = Position::new(rng.random_range(0..BOARD_SIZE), rng.random_range(0..BOARD_SIZE)).unwrap();
            let result = make_attack(&board, &fleet, target);
            board = result.board;
            fleet = result.fleet;
        }
        for p in Position::all() {
            let cell = board.cell(p);
            prop_assert!(!(cell.is_hit() && cell.is_miss()));
            prop_assert!(!cell.is_miss() || !cell.has_ship());
            prop_assert!(!cell.is_hit() || cell.has_ship());
            prop_assert_eq!(cell.ship_id().is_some(), cell.has_ship());
        }
        for ship in fleet.ships() {
            for (i, &p) in ship.positions().iter().enumerate() {
                prop_assert_eq!(ship.hits()[i], board.cell(p).is_hit());
            }
        }
    }
}
