//! Tenuki: a heuristic move-selection engine for small-board Go.
//!
//! ## Usage
//!
//! - `tenuki` - Play one demo game against the built-in simulator
//! - `tenuki demo` - Same as above
//! - `tenuki selfplay -n 50 -s 9` - Run a self-play batch, learning weights
//!   between games and persisting them to disk

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tenuki::finders::Strategy;
use tenuki::learning::{JsonFileStore, MemoryStore};
use tenuki::oracle::{GoOracle, SimOracle};
use tenuki::session::GameSession;

/// Tenuki: heuristic Go move selection with pattern-weight learning
#[derive(Parser)]
#[command(name = "tenuki")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game against the built-in random opponent
    Demo,
    /// Play a batch of games, adapting pattern weights between them
    Selfplay {
        /// Number of games to play
        #[arg(short = 'n', long, default_value_t = 10)]
        games: u64,
        /// Board side length (5, 7, 9 or 13)
        #[arg(short, long, default_value_t = 9)]
        size: usize,
        /// Base RNG seed; each game offsets from it
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Where learned weights are persisted
        #[arg(long, default_value = "tenuki-weights.json")]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Selfplay {
            games,
            size,
            seed,
            store,
        }) => run_selfplay(games, size, seed, store),
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_demo() -> Result<()> {
    println!("Tenuki: heuristic Go move selection\n");

    let mut session = GameSession::new(MemoryStore::default(), "simulator");
    let mut oracle = SimOracle::new(5, 42)?;
    let mut rng = fastrand::Rng::with_seed(42);

    let result = session.play(&mut oracle, &mut rng)?;
    println!("Final position:\n{}", oracle.board()?);
    println!(
        "{}: territory {}, networks {}, total {} in {} moves",
        if result.is_win { "Won" } else { "Lost" },
        result.territory,
        result.networks,
        result.total_score,
        result.moves,
    );
    Ok(())
}

fn run_selfplay(games: u64, size: usize, seed: u64, store: PathBuf) -> Result<()> {
    println!("Self-play: {games} games on a {size}x{size} board\n");

    let mut session = GameSession::new(JsonFileStore::new(store), "simulator");
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut wins = 0u64;

    for game in 0..games {
        let mut oracle = SimOracle::new(size, seed.wrapping_add(game))?;
        // A game lost to a misbehaving oracle is skipped, not fatal to the
        // rest of the batch.
        let result = match session.play(&mut oracle, &mut rng) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("game {:>3}: abandoned ({e})", game + 1);
                continue;
            }
        };
        if result.is_win {
            wins += 1;
        }
        println!(
            "game {:>3}: {} (territory {:>4}, networks {}, {} moves)",
            game + 1,
            if result.is_win { "won " } else { "lost" },
            result.territory,
            result.networks,
            result.moves,
        );
    }

    println!("\nWon {wins}/{games}");
    println!("Learned weights:");
    for strategy in Strategy::ALL {
        println!("  {:<17} {:.2}", strategy.name(), session.weights().get(strategy));
    }
    Ok(())
}
