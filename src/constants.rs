//! Tunable constants for the move heuristics and the learning loop.
//!
//! Most of the finder thresholds are hand-tuned values, collected here rather
//! than scattered through the finders so that a single place controls the
//! engine's "personality".

// =============================================================================
// Board Geometry
// =============================================================================

/// Board sizes the engine accepts. Standard small-board Go sizes.
pub const BOARD_SIZES: [usize; 4] = [5, 7, 9, 13];

/// Game length cap as a multiple of the board area. A game that runs longer
/// than `size * size * GAME_LEN_FACTOR` placements is cut off instead of
/// looping forever.
pub const GAME_LEN_FACTOR: usize = 3;

// =============================================================================
// Finder Thresholds
// =============================================================================

/// Minimum stone count for an enemy chain to be worth cutting apart.
pub const SIGNIFICANT_CHAIN_SIZE: usize = 3;

/// Minimum stone count for a friendly group to count as a "network" when
/// scoring a finished game.
pub const MIN_NETWORK_SIZE: usize = 3;

/// Manhattan radius within which a candidate counts as "near" an existing eye
/// when looking for a second eye.
pub const EYE_PROXIMITY: usize = 3;

/// Liberty count a defensive move should raise an endangered group to.
pub const DEFENSIVE_TARGET_LIBS: usize = 3;

// =============================================================================
// Learning Parameters
// =============================================================================

/// Step size for per-pattern weight updates after each game.
pub const LEARNING_RATE: f64 = 0.1;

/// Probability of applying the exploration bonus to a move evaluation.
pub const EXPLORATION_RATE: f64 = 0.1;

/// Multiplier applied to a move evaluation when exploring.
pub const EXPLORATION_BONUS: f64 = 1.2;

/// Blend factor between territory potential and influence when evaluating a
/// move (1.0 = territory only).
pub const TERRITORY_WEIGHT: f64 = 0.6;

/// Evaluation bonus for a move that completes an eye.
pub const EYE_FORM_BONUS: f64 = 5.0;

/// Pattern weights are clamped to this range so a losing streak can never
/// drive a pattern to zero, and a winning streak can never make one pattern
/// drown out the rest.
pub const WEIGHT_MIN: f64 = 0.1;
pub const WEIGHT_MAX: f64 = 2.0;

// =============================================================================
// Turn Loop
// =============================================================================

/// How many times a malformed oracle snapshot is retried before the turn is
/// given up on.
pub const SNAPSHOT_RETRIES: u32 = 3;

/// Backoff between snapshot retries, in milliseconds.
pub const SNAPSHOT_BACKOFF_MS: u64 = 100;

/// Maximum number of placements allowed in one game on a board of the given
/// size.
pub const fn max_game_len(size: usize) -> usize {
    size * size * GAME_LEN_FACTOR
}
