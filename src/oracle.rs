//! The read-only board oracle boundary and a self-contained simulator.
//!
//! The engine never mutates a board directly during play; it queries an
//! oracle for fresh per-turn state and submits exactly one move (or a pass).
//! In the host game the oracle is the game's own rules engine. [`SimOracle`]
//! is a local stand-in with the same contract - legal placement, capture
//! resolution, single-step ko, and a random-legal opponent - so the engine
//! can be exercised end to end offline.

use crate::analysis::{
    compute_chains, compute_controlled, compute_liberties, compute_valid_moves, group_liberties,
    place_and_resolve,
};
use crate::board::{Board, Cell, Control, Grid, Point};
use crate::constants::{BOARD_SIZES, max_game_len};
use crate::error::EngineError;

/// Whether the game continues after a submitted move or pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    GameOver,
}

/// Read-only contract the engine consumes each turn, plus the two mutating
/// calls that advance the game.
pub trait GoOracle {
    fn board(&self) -> Result<Board, EngineError>;
    fn valid_moves(&self) -> Result<Grid<bool>, EngineError>;
    fn liberties(&self) -> Result<Grid<i32>, EngineError>;
    fn chains(&self) -> Result<Grid<Option<u32>>, EngineError>;
    fn controlled_points(&self) -> Result<Grid<Control>, EngineError>;

    /// Place a friendly stone. The orchestrator validates first, so a
    /// rejection here means engine and oracle disagree about the position.
    fn submit_move(&mut self, p: Point) -> Result<TurnOutcome, EngineError>;

    /// Pass the turn.
    fn pass_turn(&mut self) -> Result<TurnOutcome, EngineError>;

    /// Block until the opponent has moved (or the game ended).
    fn wait_for_opponent(&mut self) -> Result<TurnOutcome, EngineError>;
}

/// One coherent per-turn view of the game: board plus the analysis grids
/// derived from that same board. Never mix grids across snapshots.
pub struct Snapshot {
    pub board: Board,
    pub valid: Grid<bool>,
    pub liberties: Grid<i32>,
    pub chains: Grid<Option<u32>>,
    pub controlled: Grid<Control>,
}

impl Snapshot {
    /// Pull a fresh snapshot from the oracle, verifying that every grid
    /// describes the same, supported board size.
    pub fn capture(oracle: &dyn GoOracle) -> Result<Self, EngineError> {
        let board = oracle.board()?;
        let size = board.size();
        if !BOARD_SIZES.contains(&size) {
            return Err(EngineError::InvalidBoardState(format!(
                "unsupported board size {size}"
            )));
        }

        let valid = oracle.valid_moves()?;
        let liberties = oracle.liberties()?;
        let chains = oracle.chains()?;
        let controlled = oracle.controlled_points()?;
        for (name, got) in [
            ("valid moves", valid.size()),
            ("liberties", liberties.size()),
            ("chains", chains.size()),
            ("controlled", controlled.size()),
        ] {
            if got != size {
                return Err(EngineError::InvalidBoardState(format!(
                    "{name} grid is {got}x{got} for a {size}x{size} board"
                )));
            }
        }

        Ok(Self {
            board,
            valid,
            liberties,
            chains,
            controlled,
        })
    }

    /// Side length of the snapshot's board.
    pub fn size(&self) -> usize {
        self.board.size()
    }
}

/// Local rules simulator implementing [`GoOracle`].
///
/// The opponent plays a uniformly random legal move. Both sides are held to
/// the same legality rules, including the single-step ko check against the
/// position before the most recent placement.
pub struct SimOracle {
    board: Board,
    /// Board as it stood before the most recent placement, for ko.
    prior: Option<Board>,
    rng: fastrand::Rng,
    passes: u32,
    placements: usize,
    game_over: bool,
}

impl SimOracle {
    /// Create a simulator for an empty board of a supported size.
    pub fn new(size: usize, seed: u64) -> Result<Self, EngineError> {
        if !BOARD_SIZES.contains(&size) {
            return Err(EngineError::InvalidBoardState(format!(
                "unsupported board size {size}"
            )));
        }
        Ok(Self {
            board: Board::new(size),
            prior: None,
            rng: fastrand::Rng::with_seed(seed),
            passes: 0,
            placements: 0,
            game_over: false,
        })
    }

    /// Start from a given position instead of an empty board. Intended for
    /// tests and scripted scenarios.
    pub fn from_board(board: Board, seed: u64) -> Result<Self, EngineError> {
        let mut sim = Self::new(board.size(), seed)?;
        sim.board = board;
        Ok(sim)
    }

    /// True once either side has ended the game.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// The position before the most recent placement, if any.
    pub fn previous_board(&self) -> Option<&Board> {
        self.prior.as_ref()
    }

    fn legal_points(&self, color: Cell) -> Vec<Point> {
        let mut points = Vec::new();
        for p in self.board.points() {
            if self.board.get(p) != Cell::Empty {
                continue;
            }
            let (resolved, _) = place_and_resolve(&self.board, p, color);
            if let Some(prev) = &self.prior
                && resolved == *prev
            {
                continue;
            }
            if group_liberties(&resolved, p) > 0 {
                points.push(p);
            }
        }
        points
    }

    fn apply(&mut self, p: Point, color: Cell) {
        let before = self.board.clone();
        let (resolved, _) = place_and_resolve(&self.board, p, color);
        self.prior = Some(before);
        self.board = resolved;
        self.placements += 1;
        self.passes = 0;
        if self.placements >= max_game_len(self.board.size()) {
            self.game_over = true;
        }
    }

    fn outcome(&self) -> TurnOutcome {
        if self.game_over {
            TurnOutcome::GameOver
        } else {
            TurnOutcome::Continue
        }
    }
}

impl GoOracle for SimOracle {
    fn board(&self) -> Result<Board, EngineError> {
        Ok(self.board.clone())
    }

    fn valid_moves(&self) -> Result<Grid<bool>, EngineError> {
        Ok(compute_valid_moves(&self.board, self.prior.as_ref()))
    }

    fn liberties(&self) -> Result<Grid<i32>, EngineError> {
        Ok(compute_liberties(&self.board))
    }

    fn chains(&self) -> Result<Grid<Option<u32>>, EngineError> {
        Ok(compute_chains(&self.board))
    }

    fn controlled_points(&self) -> Result<Grid<Control>, EngineError> {
        Ok(compute_controlled(&self.board))
    }

    fn submit_move(&mut self, p: Point) -> Result<TurnOutcome, EngineError> {
        if self.game_over {
            return Ok(TurnOutcome::GameOver);
        }
        if !self.legal_points(Cell::Friendly).contains(&p) {
            return Err(EngineError::IllegalMove(p.0, p.1));
        }
        self.apply(p, Cell::Friendly);
        Ok(self.outcome())
    }

    fn pass_turn(&mut self) -> Result<TurnOutcome, EngineError> {
        if self.game_over {
            return Ok(TurnOutcome::GameOver);
        }
        self.passes += 1;
        if self.passes >= 2 {
            self.game_over = true;
        }
        Ok(self.outcome())
    }

    fn wait_for_opponent(&mut self) -> Result<TurnOutcome, EngineError> {
        if self.game_over {
            return Ok(TurnOutcome::GameOver);
        }
        let candidates = self.legal_points(Cell::Enemy);
        if candidates.is_empty() {
            self.passes += 1;
            if self.passes >= 2 {
                self.game_over = true;
            }
        } else {
            let p = candidates[self.rng.usize(..candidates.len())];
            self.apply(p, Cell::Enemy);
        }
        Ok(self.outcome())
    }
}
