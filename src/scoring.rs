//! End-of-game scoring and per-move evaluation.
//!
//! Neither is formal Go scoring. `score_game` produces a cheap proxy result
//! (controlled territory plus established networks) good enough to tell the
//! weight learner whether a game went well. `evaluate_move` rates a single
//! candidate for diagnostics, blending the learned pattern weight with
//! territory potential and board influence.

use std::time::Duration;

use crate::board::{Board, Cell, Control, Grid, Point};
use crate::constants::{
    EXPLORATION_BONUS, EXPLORATION_RATE, EYE_FORM_BONUS, MIN_NETWORK_SIZE, TERRITORY_WEIGHT,
};
use crate::finders::Strategy;
use crate::geometry::{adjacent, diagonal, manhattan};
use crate::learning::PatternWeights;
use crate::oracle::Snapshot;
use crate::shapes::would_form_eye;

/// Outcome of one finished game, derived from the final board snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct GameResult {
    /// Friendly-controlled minus enemy-controlled empty points.
    pub territory: i64,
    /// Friendly groups large enough to count as established.
    pub networks: usize,
    pub total_score: i64,
    pub is_win: bool,
    pub moves: usize,
    pub duration: Duration,
}

/// Count friendly groups of at least [`MIN_NETWORK_SIZE`] stones.
pub fn count_networks(board: &Board) -> usize {
    let mut visited = Grid::<bool>::new(board.size());
    let mut networks = 0;
    for p in board.points() {
        if board.get(p) != Cell::Friendly || visited.get(p) {
            continue;
        }
        let group = crate::analysis::collect_group(board, p);
        for &g in &group {
            visited.set(g, true);
        }
        if group.len() >= MIN_NETWORK_SIZE {
            networks += 1;
        }
    }
    networks
}

/// Signed territory estimate: friendly-controlled empty points minus
/// enemy-controlled ones.
pub fn count_territory(board: &Board, controlled: &Grid<Control>) -> i64 {
    let mut territory = 0i64;
    for p in board.points() {
        if board.get(p) != Cell::Empty {
            continue;
        }
        match controlled.get(p) {
            Control::Friendly => territory += 1,
            Control::Enemy => territory -= 1,
            Control::Neutral => {}
        }
    }
    territory
}

/// Score a finished game from its final position.
pub fn score_game(
    board: &Board,
    controlled: &Grid<Control>,
    moves: usize,
    duration: Duration,
) -> GameResult {
    let territory = count_territory(board, controlled);
    let networks = count_networks(board);
    let total_score = territory + networks as i64;
    GameResult {
        territory,
        networks,
        total_score,
        is_win: total_score > 0,
        moves,
        duration,
    }
}

/// Rate a candidate move: learned pattern weight, plus a territory-potential
/// term, plus a board-influence term. Occasionally inflated by the
/// exploration bonus so no pattern's score ossifies.
pub fn evaluate_move(
    snap: &Snapshot,
    p: Point,
    strategy: Strategy,
    weights: &PatternWeights,
    rng: &mut fastrand::Rng,
) -> f64 {
    let board = &snap.board;
    let size = board.size();

    let mut territory_potential = 0.0;
    for n in adjacent(p, size) {
        if snap.controlled.get(n) == Control::Friendly {
            territory_potential += 2.0;
        }
    }
    for n in diagonal(p, size) {
        if snap.controlled.get(n) == Control::Friendly {
            territory_potential += 1.0;
        }
    }
    if would_form_eye(board, p) {
        territory_potential += EYE_FORM_BONUS;
    }

    let center = (size / 2, size / 2);
    let centrality = (size as f64 - manhattan(p, center) as f64) / size as f64;
    let friendly_adj = adjacent(p, size)
        .into_iter()
        .filter(|&n| board.get(n) == Cell::Friendly)
        .count();
    let influence = centrality + friendly_adj as f64 * 1.5;

    let mut score = weights.get(strategy)
        + territory_potential * TERRITORY_WEIGHT
        + influence * (1.0 - TERRITORY_WEIGHT);
    if rng.f64() < EXPLORATION_RATE {
        score *= EXPLORATION_BONUS;
    }
    score
}
