//! Tenuki: a heuristic move-selection engine for small-board Go.
//!
//! No tree search. Each turn the engine takes a fresh snapshot of the board,
//! runs a fixed cascade of tactical pattern finders (eye building,
//! connection, capture, defense, expansion, random fallback), and plays the
//! first candidate that is legal and does not fill its own territory.
//! Between games it nudges a per-pattern weight table from the outcome, so
//! the diagnostic move scoring slowly prefers patterns that have been
//! winning.
//!
//! ## Modules
//!
//! - [`constants`] - Board sizes and tuning thresholds
//! - [`board`] - Board, cell and grid types
//! - [`geometry`] - Neighbor enumeration and distances
//! - [`analysis`] - Groups, liberties, captures, legality
//! - [`shapes`] - Eye detection and shape heuristics
//! - [`finders`] - The tactical pattern finders
//! - [`select`] - Priority-ordered move selection
//! - [`scoring`] - Game scoring and move evaluation
//! - [`learning`] - Weight adaptation and persistence
//! - [`oracle`] - Board-oracle trait and a local simulator
//! - [`session`] - The per-game turn loop
//!
//! ## Example
//!
//! ```
//! use tenuki::learning::MemoryStore;
//! use tenuki::oracle::SimOracle;
//! use tenuki::session::GameSession;
//!
//! // Play one full game against the built-in random opponent.
//! let mut session = GameSession::new(MemoryStore::default(), "simulator");
//! let mut oracle = SimOracle::new(5, 7).unwrap();
//! let mut rng = fastrand::Rng::with_seed(7);
//!
//! let result = session.play(&mut oracle, &mut rng).unwrap();
//! println!("territory {}, networks {}", result.territory, result.networks);
//! ```

pub mod analysis;
pub mod board;
pub mod constants;
pub mod error;
pub mod finders;
pub mod geometry;
pub mod learning;
pub mod oracle;
pub mod scoring;
pub mod select;
pub mod session;
pub mod shapes;
