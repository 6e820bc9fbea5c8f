//! Tactical move finders.
//!
//! Each finder scans the board in row-major order and returns the *first*
//! point matching its pattern, or `None`. First-match rather than best-match
//! is deliberate: the orchestrator runs the finders in a fixed priority
//! order and a turn has a real-time budget, so a cheap greedy scan beats an
//! exhaustive ranking.
//!
//! Returning `None` is the normal "nothing to do here" outcome, not an
//! error; the orchestrator simply tries the next finder.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::{group_liberties, place_and_resolve};
use crate::board::{Board, Cell, Control, Point};
use crate::constants::{DEFENSIVE_TARGET_LIBS, EYE_PROXIMITY, SIGNIFICANT_CHAIN_SIZE};
use crate::geometry::{adjacent, diagonal, manhattan};
use crate::oracle::Snapshot;
use crate::shapes::{
    could_form_eye, is_eye, is_protected_space, is_vulnerable_eye_formation, would_create_strong_shape,
    would_fill_territory, would_form_eye,
};

/// The pattern a move came from. Doubles as the key of the learned weight
/// table, so the set is fixed and the names are stable.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Strategy {
    Impenetrable,
    Connection,
    Strangulation,
    Cutoff,
    Capture,
    Defensive,
    StrongConnection,
    Corner,
    SafeExpansion,
    Random,
}

impl Strategy {
    /// All strategies in orchestrator priority order.
    pub const ALL: [Strategy; 10] = [
        Strategy::Impenetrable,
        Strategy::Connection,
        Strategy::Strangulation,
        Strategy::Cutoff,
        Strategy::Capture,
        Strategy::Defensive,
        Strategy::StrongConnection,
        Strategy::Corner,
        Strategy::SafeExpansion,
        Strategy::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Impenetrable => "Impenetrable",
            Strategy::Connection => "Connection",
            Strategy::Strangulation => "Strangulation",
            Strategy::Cutoff => "Cutoff",
            Strategy::Capture => "Capture",
            Strategy::Defensive => "Defensive",
            Strategy::StrongConnection => "StrongConnection",
            Strategy::Corner => "Corner",
            Strategy::SafeExpansion => "SafeExpansion",
            Strategy::Random => "Random",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn count_adjacent(board: &Board, p: Point, cell: Cell) -> usize {
    adjacent(p, board.size())
        .into_iter()
        .filter(|&n| board.get(n) == cell)
        .count()
}

fn count_diagonal(board: &Board, p: Point, cell: Cell) -> usize {
    diagonal(p, board.size())
        .into_iter()
        .filter(|&n| board.get(n) == cell)
        .count()
}

/// True if a friendly stone placed at `c` would keep at least two liberties
/// once captures resolve. Guards the pressing finders against self-atari.
fn keeps_two_liberties(board: &Board, c: Point) -> bool {
    let (resolved, _) = place_and_resolve(board, c, Cell::Friendly);
    group_liberties(&resolved, c) >= 2
}

// =============================================================================
// 1. Impenetrable / eye-building
// =============================================================================

/// Eye-building cascade: complete an almost-formed eye, grow a second eye
/// near an existing one, start a fresh eye, build a strong shape on the way
/// to an eye, or reinforce territory we already hold.
pub fn find_impenetrable_move(snap: &Snapshot) -> Option<Point> {
    find_eye_completing_move(snap)
        .or_else(|| find_multiple_eye_move(snap))
        .or_else(|| find_new_eye_move(snap))
        .or_else(|| find_strong_shape_move(snap))
        .or_else(|| find_territory_strengthening_move(snap))
}

fn find_eye_completing_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    for p in board.points() {
        if !snap.valid.get(p) {
            continue;
        }
        if count_adjacent(board, p, Cell::Friendly) >= 3
            && count_diagonal(board, p, Cell::Friendly) >= 2
            && !is_vulnerable_eye_formation(board, &snap.liberties, &snap.controlled, p)
        {
            return Some(p);
        }
    }
    None
}

fn find_multiple_eye_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    let existing_eyes: Vec<Point> = board.points().filter(|&p| is_eye(board, p)).collect();

    if !existing_eyes.is_empty() {
        // Grow a second eye within reach of one we already have.
        for p in board.points() {
            if !snap.valid.get(p) || would_fill_territory(board, &snap.controlled, p) {
                continue;
            }
            if !existing_eyes
                .iter()
                .any(|&eye| manhattan(eye, p) <= EYE_PROXIMITY)
            {
                continue;
            }
            if count_adjacent(board, p, Cell::Friendly) >= 2
                && count_adjacent(board, p, Cell::Empty) >= 2
                && count_diagonal(board, p, Cell::Friendly) >= 2
                && could_form_eye(board, p)
                && !is_vulnerable_eye_formation(board, &snap.liberties, &snap.controlled, p)
            {
                return Some(p);
            }
        }
    }

    // Failing that, a placement that opens up two eye spaces at once.
    for p in board.points() {
        if !snap.valid.get(p) || would_fill_territory(board, &snap.controlled, p) {
            continue;
        }
        let mut sim = board.clone();
        sim.set(p, Cell::Friendly);
        let potential_eyes = adjacent(p, board.size())
            .into_iter()
            .filter(|&n| board.get(n) == Cell::Empty && could_form_eye(&sim, n))
            .count();
        if potential_eyes >= 2
            && !is_vulnerable_eye_formation(board, &snap.liberties, &snap.controlled, p)
        {
            return Some(p);
        }
    }
    None
}

fn find_new_eye_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    for p in board.points() {
        if !snap.valid.get(p) || would_fill_territory(board, &snap.controlled, p) {
            continue;
        }
        if count_adjacent(board, p, Cell::Friendly) >= 2
            && count_adjacent(board, p, Cell::Empty) >= 2
            && count_diagonal(board, p, Cell::Friendly) >= 2
        {
            let potential = adjacent(p, board.size())
                .into_iter()
                .filter(|&n| board.get(n) == Cell::Empty && could_form_eye(board, n))
                .count();
            if potential >= 1 {
                return Some(p);
            }
        }
    }
    None
}

fn find_strong_shape_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    for p in board.points() {
        if !snap.valid.get(p) || would_fill_territory(board, &snap.controlled, p) {
            continue;
        }
        if count_adjacent(board, p, Cell::Friendly) >= 2
            && count_adjacent(board, p, Cell::Empty) >= 2
            && count_diagonal(board, p, Cell::Friendly) >= 2
            && would_create_strong_shape(board, p)
        {
            return Some(p);
        }
    }
    None
}

fn find_territory_strengthening_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    for p in board.points() {
        if !snap.valid.get(p) {
            continue;
        }
        if count_adjacent(board, p, Cell::Friendly) >= 2
            && count_adjacent(board, p, Cell::Empty) >= 2
            && !would_fill_territory(board, &snap.controlled, p)
        {
            let strengthens = adjacent(p, board.size()).into_iter().any(|n| {
                board.get(n) == Cell::Empty && snap.controlled.get(n) == Control::Friendly
            });
            if strengthens && would_create_strong_shape(board, p) {
                return Some(p);
            }
        }
    }
    None
}

// =============================================================================
// 2-4. Chain tactics
// =============================================================================

/// Join two or more distinct friendly chains into one.
pub fn find_connection_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    for p in board.points() {
        if !snap.valid.get(p) {
            continue;
        }
        let mut ids: Vec<u32> = adjacent(p, board.size())
            .into_iter()
            .filter(|&n| board.get(n) == Cell::Friendly)
            .filter_map(|n| snap.chains.get(n))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() >= 2 && !would_fill_territory(board, &snap.controlled, p) {
            return Some(p);
        }
    }
    None
}

/// Take the second-to-last liberty of an enemy group, but only from a point
/// where our stone keeps breathing room of its own.
pub fn find_strangulation_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    for s in board.points() {
        if board.get(s) != Cell::Enemy || snap.liberties.get(s) != 2 {
            continue;
        }
        for c in adjacent(s, board.size()) {
            if !snap.valid.get(c) {
                continue;
            }
            if !is_protected_space(board, &snap.controlled, c) && keeps_two_liberties(board, c) {
                return Some(c);
            }
        }
    }
    None
}

/// Sever two sizeable enemy chains by playing between them.
pub fn find_cutoff_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    let size = board.size();

    // Chain ids of enemy groups big enough to be worth cutting.
    let mut chain_sizes: std::collections::HashMap<u32, usize> = std::collections::HashMap::new();
    for p in board.points() {
        if board.get(p) == Cell::Enemy
            && let Some(id) = snap.chains.get(p)
        {
            *chain_sizes.entry(id).or_insert(0) += 1;
        }
    }

    for p in board.points() {
        if !snap.valid.get(p) {
            continue;
        }
        let mut ids: Vec<u32> = adjacent(p, size)
            .into_iter()
            .filter(|&n| board.get(n) == Cell::Enemy)
            .filter_map(|n| snap.chains.get(n))
            .filter(|id| chain_sizes.get(id).copied().unwrap_or(0) >= SIGNIFICANT_CHAIN_SIZE)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() >= 2 && count_adjacent(board, p, Cell::Empty) >= 2 {
            return Some(p);
        }
    }
    None
}

// =============================================================================
// 5-6. Capture and defense
// =============================================================================

/// Finish off enemy groups in atari, then pressure groups down to two
/// liberties when the pressing stone stays safe.
pub fn find_capture_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;

    // Direct captures first.
    for s in board.points() {
        if board.get(s) != Cell::Enemy || snap.liberties.get(s) != 1 {
            continue;
        }
        for c in adjacent(s, board.size()) {
            if snap.valid.get(c) {
                return Some(c);
            }
        }
    }

    // Then squeeze two-liberty groups.
    for s in board.points() {
        if board.get(s) != Cell::Enemy || snap.liberties.get(s) != 2 {
            continue;
        }
        for c in adjacent(s, board.size()) {
            if !snap.valid.get(c) {
                continue;
            }
            if !is_protected_space(board, &snap.controlled, c) && keeps_two_liberties(board, c) {
                return Some(c);
            }
        }
    }
    None
}

/// Rescue friendly groups in atari. An escape that also forms an eye beats
/// one that merely buys liberties.
pub fn find_defensive_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;

    // Eye-forming rescues take priority over plain extensions.
    for s in board.points() {
        if board.get(s) != Cell::Friendly || snap.liberties.get(s) != 1 {
            continue;
        }
        for c in adjacent(s, board.size()) {
            if snap.valid.get(c) && would_form_eye(board, c) {
                return Some(c);
            }
        }
    }

    // Otherwise any response that buys the group real breathing room.
    for s in board.points() {
        if board.get(s) != Cell::Friendly || snap.liberties.get(s) != 1 {
            continue;
        }
        for c in adjacent(s, board.size()) {
            if !snap.valid.get(c) {
                continue;
            }
            let (resolved, _) = place_and_resolve(board, c, Cell::Friendly);
            if group_liberties(&resolved, c) >= DEFENSIVE_TARGET_LIBS {
                return Some(c);
            }
        }
    }
    None
}

// =============================================================================
// 7-10. Development and fallback
// =============================================================================

/// Thick connecting move: two friendly neighbors with plenty of open space
/// around the point. The open-space count looks at all eight surrounding
/// points; two orthogonal friendly stones leave at most two orthogonal
/// neighbors free, so a four-neighbor count could never reach three.
pub fn find_strong_connection_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    for p in board.points() {
        if !snap.valid.get(p) {
            continue;
        }
        let open = count_adjacent(board, p, Cell::Empty) + count_diagonal(board, p, Cell::Empty);
        if count_adjacent(board, p, Cell::Friendly) >= 2
            && open >= 3
            && !would_fill_territory(board, &snap.controlled, p)
        {
            return Some(p);
        }
    }
    None
}

/// First open corner.
pub fn find_corner_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;
    let last = board.size() - 1;
    let corners = [(0, 0), (last, 0), (0, last), (last, last)];
    corners.into_iter().find(|&c| {
        snap.valid.get(c) && !would_fill_territory(board, &snap.controlled, c)
    })
}

/// Expand toward open space, preferring points that sprout an eye, and never
/// snuggling up to more than one enemy stone.
pub fn find_safe_expansion_move(snap: &Snapshot) -> Option<Point> {
    let board = &snap.board;

    for p in board.points() {
        if !snap.valid.get(p) || is_protected_space(board, &snap.controlled, p) {
            continue;
        }
        if would_form_eye(board, p) && count_adjacent(board, p, Cell::Empty) >= 2 {
            return Some(p);
        }
    }

    for p in board.points() {
        if !snap.valid.get(p) || is_protected_space(board, &snap.controlled, p) {
            continue;
        }
        if count_adjacent(board, p, Cell::Empty) >= 2
            && count_adjacent(board, p, Cell::Enemy) <= 1
            && !would_fill_territory(board, &snap.controlled, p)
        {
            return Some(p);
        }
    }
    None
}

/// Uniformly random open point with some breathing room. Guarantees the
/// cascade terminates when no tactical pattern applies.
pub fn find_random_move(snap: &Snapshot, rng: &mut fastrand::Rng) -> Option<Point> {
    let board = &snap.board;
    let candidates: Vec<Point> = board
        .points()
        .filter(|&p| {
            snap.valid.get(p)
                && !would_fill_territory(board, &snap.controlled, p)
                && count_adjacent(board, p, Cell::Empty) >= 2
        })
        .collect();
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.usize(..candidates.len())])
    }
}
