use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::core::{hunt_target, Position, TargetView};

use super::MoveSource;

/// Local move source: follows up the latest hit, otherwise shoots at random.
pub struct HeuristicMoveSource {
    rng: SmallRng,
}

impl HeuristicMoveSource {
    pub fn new() -> Self {
        let mut seed_rng = rand::rng();
        Self::with_rng(SmallRng::from_rng(&mut seed_rng))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        Self { rng }
    }
}

impl Default for HeuristicMoveSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MoveSource for HeuristicMoveSource {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn next_move(&mut self, view: &TargetView) -> Position {
        hunt_target(view, &mut self.rng)
    }
}
