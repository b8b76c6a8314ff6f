use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use salvo::{init_logging, ExternalConfig, HeuristicMoveSource, Orchestrator, Side};

/// Upper bound on moves in one match; 200 shots clear both boards.
const MAX_TICKS: usize = 400;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play heuristic-vs-heuristic matches and print the score.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        games: u32,
    },
    /// Play one seeded match and print a JSON summary.
    Sim { seed1: u64, seed2: u64 },
    /// Print the effective external-service configuration as JSON.
    ///
    /// `SALVO_LLM_*` environment variables override the file, if one is given.
    Config {
        #[arg(long, help = "Saved configuration (camelCase JSON)")]
        file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SideSummary {
    shots: usize,
    hits: usize,
    sunk: Vec<&'static str>,
}

#[derive(Serialize)]
struct SimSummary {
    winner: Side,
    a: SideSummary,
    b: SideSummary,
}

fn seeded(seed: Option<u64>, offset: u64) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s.wrapping_add(offset)),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

fn new_match(orchestrator: &mut Orchestrator, rng: &mut SmallRng) -> anyhow::Result<()> {
    orchestrator.reset();
    for side in Side::BOTH {
        orchestrator.randomize_fleet(side, rng)?;
    }
    orchestrator.start()?;
    Ok(())
}

fn summary(orchestrator: &Orchestrator, side: Side) -> SideSummary {
    let record = orchestrator.state().record(side);
    SideSummary {
        shots: record.moves().len(),
        hits: record.hits().len(),
        sunk: record.sunk().to_vec(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local { seed, games } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (games will be reproducible)", s);
            }
            let mut setup_rng = seeded(seed, 0);
            let mut orchestrator = Orchestrator::new(
                Box::new(HeuristicMoveSource::with_rng(seeded(seed, 1))),
                Box::new(HeuristicMoveSource::with_rng(seeded(seed, 2))),
            );
            for game in 1..=games {
                new_match(&mut orchestrator, &mut setup_rng)?;
                let winner = orchestrator.play_out(MAX_TICKS).await?;
                println!("Game {}: {:?} wins", game, winner);
            }
            println!("\nFinal state of the last match:");
            for side in Side::BOTH {
                println!("{:?}'s waters:\n{}", side, orchestrator.state().board(side));
            }
            println!(
                "Score  A: {}  B: {}",
                orchestrator.wins(Side::A),
                orchestrator.wins(Side::B)
            );
        }
        Commands::Sim { seed1, seed2 } => {
            let mut setup_rng = SmallRng::seed_from_u64(seed1 ^ seed2.rotate_left(32));
            let mut orchestrator = Orchestrator::new(
                Box::new(HeuristicMoveSource::with_seed(seed1)),
                Box::new(HeuristicMoveSource::with_seed(seed2)),
            );
            new_match(&mut orchestrator, &mut setup_rng)?;
            let winner = orchestrator.play_out(MAX_TICKS).await?;
            let result = SimSummary {
                winner,
                a: summary(&orchestrator, Side::A),
                b: summary(&orchestrator, Side::B),
            };
            println!("{}", serde_json::to_string(&result)?);
        }
        Commands::Config { file } => {
            let config = match file {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    ExternalConfig::from_json(&text)
                        .with_context(|| format!("parsing {}", path.display()))?
                        .with_overrides(|key| std::env::var(key).ok())
                }
                None => ExternalConfig::from_env(),
            };
            println!("{}", serde_json::to_string(&config)?);
        }
    }
    Ok(())
}
