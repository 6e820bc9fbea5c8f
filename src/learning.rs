//! Pattern-weight learning and its persistence boundary.
//!
//! After each game, every pattern that produced a move gets a small additive
//! nudge: up on a win, down on a loss, with a second term rewarding
//! territory efficiency. Weights are always clamped to
//! [`WEIGHT_MIN`, `WEIGHT_MAX`], so no pattern can be learned into oblivion
//! or runaway dominance. One step per game, no replay.
//!
//! Persistence is deliberately forgiving: a missing or corrupt store yields
//! default weights and a warning, never an error. Losing a few games of
//! learning is cheaper than refusing to play.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::constants::{LEARNING_RATE, WEIGHT_MAX, WEIGHT_MIN};
use crate::error::PersistenceError;
use crate::finders::Strategy;
use crate::scoring::GameResult;
use crate::select::Move;

/// Learned per-pattern weights, clamped to [`WEIGHT_MIN`, `WEIGHT_MAX`].
/// Unlisted patterns read as 1.0 (neutral).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternWeights {
    weights: BTreeMap<Strategy, f64>,
}

impl Default for PatternWeights {
    fn default() -> Self {
        let weights = Strategy::ALL.into_iter().map(|s| (s, 1.0)).collect();
        Self { weights }
    }
}

impl PatternWeights {
    pub fn get(&self, strategy: Strategy) -> f64 {
        self.weights.get(&strategy).copied().unwrap_or(1.0)
    }

    /// Add `delta` to a pattern's weight, clamping the result.
    pub fn adjust(&mut self, strategy: Strategy, delta: f64) {
        let w = self.weights.entry(strategy).or_insert(1.0);
        *w = (*w + delta).clamp(WEIGHT_MIN, WEIGHT_MAX);
    }
}

/// Win/loss tally and pattern usage counts against one opponent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OpponentRecord {
    pub wins: u64,
    pub losses: u64,
    /// How often each pattern produced a move against this opponent.
    pub preferred_patterns: BTreeMap<Strategy, u64>,
}

impl OpponentRecord {
    /// Fold one finished game into the record.
    pub fn record_game(&mut self, result: &GameResult, history: &[Move]) {
        if result.is_win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        for mv in history {
            *self.preferred_patterns.entry(mv.strategy).or_insert(0) += 1;
        }
    }
}

/// Everything the engine learns across games.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningData {
    pub weights: PatternWeights,
    pub opponents: BTreeMap<String, OpponentRecord>,
}

/// Nudge the weight of every pattern that produced a move this game.
///
/// Per move: `rate * (win ? +1 : -1)` plus `rate * (efficiency - 0.5)`,
/// where efficiency is territory relative to the whole board. An efficient
/// win reinforces harder than a scraped one; a territory-positive loss is
/// punished less than a rout.
pub fn adapt_weights(
    result: &GameResult,
    history: &[Move],
    board_size: usize,
    weights: &mut PatternWeights,
) {
    let area = (board_size * board_size) as f64;
    let efficiency = result.territory as f64 / area;
    let outcome = if result.is_win { 1.0 } else { -1.0 };
    let delta = LEARNING_RATE * outcome + LEARNING_RATE * (efficiency - 0.5);
    for mv in history {
        weights.adjust(mv.strategy, delta);
    }
}

/// Where learned data lives between games.
pub trait WeightStore {
    /// Load persisted data, falling back to defaults on any failure.
    fn load(&self) -> LearningData;
    fn save(&mut self, data: &LearningData) -> Result<(), PersistenceError>;
}

/// serde_json-backed store at a fixed path.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WeightStore for JsonFileStore {
    fn load(&self) -> LearningData {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no learning data at {}, starting fresh", self.path.display());
                return LearningData::default();
            }
            Err(e) => {
                warn!(
                    "could not read learning data at {}: {e}, starting fresh",
                    self.path.display()
                );
                return LearningData::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "corrupt learning data at {}: {e}, starting fresh",
                    self.path.display()
                );
                LearningData::default()
            }
        }
    }

    fn save(&mut self, data: &LearningData) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    pub data: Option<LearningData>,
}

impl WeightStore for MemoryStore {
    fn load(&self) -> LearningData {
        self.data.clone().unwrap_or_default()
    }

    fn save(&mut self, data: &LearningData) -> Result<(), PersistenceError> {
        self.data = Some(data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result(is_win: bool, territory: i64) -> GameResult {
        GameResult {
            territory,
            networks: 0,
            total_score: territory,
            is_win,
            moves: 1,
            duration: Duration::from_secs(1),
        }
    }

    fn history(strategy: Strategy, len: usize) -> Vec<Move> {
        (0..len)
            .map(|ordinal| Move {
                point: (0, 0),
                strategy,
                ordinal,
            })
            .collect()
    }

    #[test]
    fn wins_raise_losses_lower() {
        let mut weights = PatternWeights::default();
        let moves = history(Strategy::Capture, 1);
        adapt_weights(&result(true, 5), &moves, 5, &mut weights);
        assert!(weights.get(Strategy::Capture) > 1.0);
        adapt_weights(&result(false, -5), &moves, 5, &mut weights);
        adapt_weights(&result(false, -5), &moves, 5, &mut weights);
        assert!(weights.get(Strategy::Capture) < 1.0);
        // Untouched patterns stay neutral.
        assert_eq!(weights.get(Strategy::Corner), 1.0);
    }

    #[test]
    fn weights_stay_clamped_under_repeated_updates() {
        let mut weights = PatternWeights::default();
        let moves = history(Strategy::Random, 50);
        for _ in 0..100 {
            adapt_weights(&result(true, 25), &moves, 5, &mut weights);
        }
        assert_eq!(weights.get(Strategy::Random), WEIGHT_MAX);
        for _ in 0..100 {
            adapt_weights(&result(false, -25), &moves, 5, &mut weights);
        }
        assert_eq!(weights.get(Strategy::Random), WEIGHT_MIN);
    }

    #[test]
    fn opponent_record_accumulates() {
        let mut record = OpponentRecord::default();
        let moves = history(Strategy::Defensive, 3);
        record.record_game(&result(true, 2), &moves);
        record.record_game(&result(false, -2), &moves);
        assert_eq!(record.wins, 1);
        assert_eq!(record.losses, 1);
        assert_eq!(record.preferred_patterns[&Strategy::Defensive], 6);
    }

    #[test]
    fn corrupt_store_yields_defaults() {
        let path = std::env::temp_dir().join("tenuki-corrupt-weights-test.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert_eq!(store.load(), LearningData::default());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_store_yields_defaults() {
        let store = JsonFileStore::new("/nonexistent/tenuki-weights.json");
        assert_eq!(store.load(), LearningData::default());
    }

    #[test]
    fn store_round_trip() {
        let path = std::env::temp_dir().join("tenuki-roundtrip-weights-test.json");
        let mut store = JsonFileStore::new(&path);
        let mut data = LearningData::default();
        data.weights.adjust(Strategy::Connection, 0.3);
        data.opponents
            .entry("Netburners".to_string())
            .or_default()
            .wins = 4;
        store.save(&data).unwrap();
        assert_eq!(store.load(), data);
        fs::remove_file(&path).ok();
    }
}
