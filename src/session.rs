//! Per-game turn loop tying the engine together.
//!
//! A [`GameSession`] owns the learned weights and the store they persist to;
//! each call to [`GameSession::play`] runs one full game against an oracle:
//! snapshot, select, submit or pass, wait for the opponent, repeat. At game
//! end it scores the final position, adapts the weights, updates the
//! per-opponent record, and saves. A failed save is logged and swallowed -
//! the game's result still stands.

use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::analysis::place_and_resolve;
use crate::board::{Board, Cell};
use crate::constants::{SNAPSHOT_BACKOFF_MS, SNAPSHOT_RETRIES};
use crate::error::EngineError;
use crate::learning::{LearningData, PatternWeights, WeightStore, adapt_weights};
use crate::oracle::{GoOracle, Snapshot, TurnOutcome};
use crate::scoring::{GameResult, count_networks, count_territory, evaluate_move, score_game};
use crate::select::{Move, select_move};

/// Pull a snapshot, retrying transient board-state failures with a short
/// backoff. Retries are bounded: an oracle that keeps misbehaving fails the
/// current game with the last error, and the caller decides whether to skip
/// the game or stop. The session itself stays usable.
fn capture_with_retry(oracle: &dyn GoOracle) -> Result<Snapshot, EngineError> {
    let mut last = None;
    for attempt in 1..=SNAPSHOT_RETRIES {
        match Snapshot::capture(oracle) {
            Ok(snap) => return Ok(snap),
            Err(e @ EngineError::InvalidBoardState(_)) => {
                warn!("board snapshot attempt {attempt}/{SNAPSHOT_RETRIES} failed: {e}");
                last = Some(e);
                thread::sleep(Duration::from_millis(SNAPSHOT_BACKOFF_MS));
            }
            Err(e) => return Err(e),
        }
    }
    Err(last.unwrap_or_else(|| {
        EngineError::InvalidBoardState("snapshot retries exhausted".to_string())
    }))
}

/// One engine lifetime: learned state plus the store it came from.
pub struct GameSession<S: WeightStore> {
    store: S,
    data: LearningData,
    opponent: String,
    history: Vec<Move>,
}

impl<S: WeightStore> GameSession<S> {
    /// Load learned state from the store and get ready to play.
    pub fn new(store: S, opponent: impl Into<String>) -> Self {
        let data = store.load();
        Self {
            store,
            data,
            opponent: opponent.into(),
            history: Vec::new(),
        }
    }

    pub fn weights(&self) -> &PatternWeights {
        &self.data.weights
    }

    /// Play one game to completion and learn from it.
    pub fn play(
        &mut self,
        oracle: &mut dyn GoOracle,
        rng: &mut fastrand::Rng,
    ) -> Result<GameResult, EngineError> {
        let started = Instant::now();
        self.history.clear();
        let mut previous: Option<Board> = None;

        loop {
            let snap = capture_with_retry(&*oracle)?;
            let (outcome, after) = match select_move(&snap, previous.as_ref(), rng) {
                Some(chosen) => {
                    let score =
                        evaluate_move(&snap, chosen.point, chosen.strategy, &self.data.weights, rng);
                    info!(
                        "move {}: {} at {:?} (eval {:.2}, networks {}, territory {})",
                        self.history.len() + 1,
                        chosen.strategy,
                        chosen.point,
                        score,
                        count_networks(&snap.board),
                        count_territory(&snap.board, &snap.controlled),
                    );
                    self.history.push(Move {
                        point: chosen.point,
                        strategy: chosen.strategy,
                        ordinal: self.history.len(),
                    });
                    // Ko compares against the position right after our
                    // placement, before the opponent's reply.
                    let (after, _) = place_and_resolve(&snap.board, chosen.point, Cell::Friendly);
                    (oracle.submit_move(chosen.point)?, after)
                }
                None => {
                    info!("move {}: no candidate, passing", self.history.len() + 1);
                    (oracle.pass_turn()?, snap.board)
                }
            };
            previous = Some(after);

            if outcome == TurnOutcome::GameOver {
                break;
            }
            if oracle.wait_for_opponent()? == TurnOutcome::GameOver {
                break;
            }
        }

        let final_snap = capture_with_retry(&*oracle)?;
        let result = score_game(
            &final_snap.board,
            &final_snap.controlled,
            self.history.len(),
            started.elapsed(),
        );
        self.learn(&result, final_snap.size());
        info!(
            "game over vs {}: {} (territory {}, networks {}, total {}, {} moves in {:.1?})",
            self.opponent,
            if result.is_win { "won" } else { "lost" },
            result.territory,
            result.networks,
            result.total_score,
            result.moves,
            result.duration,
        );
        Ok(result)
    }

    fn learn(&mut self, result: &GameResult, board_size: usize) {
        adapt_weights(result, &self.history, board_size, &mut self.data.weights);
        self.data
            .opponents
            .entry(self.opponent.clone())
            .or_default()
            .record_game(result, &self.history);
        if let Err(e) = self.store.save(&self.data) {
            warn!("could not persist learning data: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Control, Grid, Point};
    use crate::finders::Strategy;
    use crate::learning::MemoryStore;
    use crate::oracle::SimOracle;

    #[test]
    fn full_game_learns_and_persists() {
        let mut session = GameSession::new(MemoryStore::default(), "sparring-bot");
        let mut oracle = SimOracle::new(5, 21).unwrap();
        let mut rng = fastrand::Rng::with_seed(22);

        let result = session.play(&mut oracle, &mut rng).unwrap();
        assert!(oracle.is_game_over());
        assert!(result.moves > 0);

        let saved = session.store.data.as_ref().expect("store was written");
        let record = &saved.opponents["sparring-bot"];
        assert_eq!(record.wins + record.losses, 1);
        assert!(!record.preferred_patterns.is_empty());
    }

    #[test]
    fn repeated_games_accumulate_records() {
        let mut session = GameSession::new(MemoryStore::default(), "sparring-bot");
        let mut rng = fastrand::Rng::with_seed(5);
        for seed in 0..3 {
            let mut oracle = SimOracle::new(5, seed).unwrap();
            session.play(&mut oracle, &mut rng).unwrap();
        }
        let saved = session.store.data.as_ref().unwrap();
        let record = &saved.opponents["sparring-bot"];
        assert_eq!(record.wins + record.losses, 3);
    }

    /// Oracle whose board reads fail while `failures_left` is nonzero.
    struct FlakyOracle {
        inner: SimOracle,
        failures_left: u32,
    }

    impl GoOracle for FlakyOracle {
        fn board(&self) -> Result<Board, EngineError> {
            if self.failures_left > 0 {
                return Err(EngineError::InvalidBoardState("transient".to_string()));
            }
            self.inner.board()
        }
        fn valid_moves(&self) -> Result<Grid<bool>, EngineError> {
            self.inner.valid_moves()
        }
        fn liberties(&self) -> Result<Grid<i32>, EngineError> {
            self.inner.liberties()
        }
        fn chains(&self) -> Result<Grid<Option<u32>>, EngineError> {
            self.inner.chains()
        }
        fn controlled_points(&self) -> Result<Grid<Control>, EngineError> {
            self.inner.controlled_points()
        }
        fn submit_move(&mut self, p: Point) -> Result<TurnOutcome, EngineError> {
            self.inner.submit_move(p)
        }
        fn pass_turn(&mut self) -> Result<TurnOutcome, EngineError> {
            self.inner.pass_turn()
        }
        fn wait_for_opponent(&mut self) -> Result<TurnOutcome, EngineError> {
            self.inner.wait_for_opponent()
        }
    }

    #[test]
    fn oracle_failure_fails_the_game_not_the_session() {
        let mut session = GameSession::new(MemoryStore::default(), "sparring-bot");
        let mut rng = fastrand::Rng::with_seed(2);

        let mut broken = FlakyOracle {
            inner: SimOracle::new(5, 1).unwrap(),
            failures_left: u32::MAX,
        };
        assert!(matches!(
            session.play(&mut broken, &mut rng),
            Err(EngineError::InvalidBoardState(_))
        ));

        // The same session plays the next game normally.
        let mut oracle = SimOracle::new(5, 4).unwrap();
        assert!(session.play(&mut oracle, &mut rng).is_ok());
    }

    #[test]
    fn snapshot_capture_retries_transient_failures() {
        let oracle = FlakyOracle {
            inner: SimOracle::new(5, 1).unwrap(),
            failures_left: 0,
        };
        assert!(capture_with_retry(&oracle).is_ok());

        let stubborn = FlakyOracle {
            inner: SimOracle::new(5, 1).unwrap(),
            failures_left: u32::MAX,
        };
        assert!(matches!(
            capture_with_retry(&stubborn),
            Err(EngineError::InvalidBoardState(_))
        ));
    }

    /// Rules engine whose valid-move mask knows nothing about ko, and whose
    /// opponent always retakes at (1,1). Legality of the engine's second
    /// placement then rests entirely on the session's own ko bookkeeping.
    struct KoScriptOracle {
        board: Board,
        submissions: Vec<Point>,
        opponent_moved: bool,
    }

    impl GoOracle for KoScriptOracle {
        fn board(&self) -> Result<Board, EngineError> {
            Ok(self.board.clone())
        }
        fn valid_moves(&self) -> Result<Grid<bool>, EngineError> {
            Ok(crate::analysis::compute_valid_moves(&self.board, None))
        }
        fn liberties(&self) -> Result<Grid<i32>, EngineError> {
            Ok(crate::analysis::compute_liberties(&self.board))
        }
        fn chains(&self) -> Result<Grid<Option<u32>>, EngineError> {
            Ok(crate::analysis::compute_chains(&self.board))
        }
        fn controlled_points(&self) -> Result<Grid<Control>, EngineError> {
            Ok(crate::analysis::compute_controlled(&self.board))
        }
        fn submit_move(&mut self, p: Point) -> Result<TurnOutcome, EngineError> {
            self.submissions.push(p);
            let (next, _) = place_and_resolve(&self.board, p, Cell::Friendly);
            self.board = next;
            if self.submissions.len() >= 2 {
                Ok(TurnOutcome::GameOver)
            } else {
                Ok(TurnOutcome::Continue)
            }
        }
        fn pass_turn(&mut self) -> Result<TurnOutcome, EngineError> {
            Ok(TurnOutcome::GameOver)
        }
        fn wait_for_opponent(&mut self) -> Result<TurnOutcome, EngineError> {
            if self.opponent_moved {
                return Ok(TurnOutcome::GameOver);
            }
            self.opponent_moved = true;
            let (next, _) = place_and_resolve(&self.board, (1, 1), Cell::Enemy);
            self.board = next;
            Ok(TurnOutcome::Continue)
        }
    }

    #[test]
    fn ko_recapture_is_refused_even_with_a_naive_mask() {
        // Classic ko: the engine captures at (2,1), the opponent retakes at
        // (1,1) restoring the position. Retaking at once would repeat the
        // board after the engine's first move, so it must play elsewhere.
        let board = Board::from_rows(&[
            "XXO..", //
            "XO.O.",
            "XXO..",
            ".....",
            ".....",
        ])
        .unwrap();
        let mut oracle = KoScriptOracle {
            board,
            submissions: Vec::new(),
            opponent_moved: false,
        };
        let mut session = GameSession::new(MemoryStore::default(), "ko-bot");
        let mut rng = fastrand::Rng::with_seed(3);
        session.play(&mut oracle, &mut rng).unwrap();

        assert_eq!(oracle.submissions[0], (2, 1), "takes the ko");
        assert_ne!(oracle.submissions[1], (2, 1), "may not retake at once");
    }

    #[test]
    fn history_records_strategies_in_order() {
        let mut session = GameSession::new(MemoryStore::default(), "sparring-bot");
        let mut oracle = SimOracle::new(5, 33).unwrap();
        let mut rng = fastrand::Rng::with_seed(34);
        session.play(&mut oracle, &mut rng).unwrap();
        for (i, mv) in session.history.iter().enumerate() {
            assert_eq!(mv.ordinal, i);
        }
        // The very first move on an empty board comes from the corner finder.
        assert_eq!(session.history[0].strategy, Strategy::Corner);
    }
}
