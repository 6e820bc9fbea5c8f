//! Eye detection and shape heuristics.
//!
//! These are rules of thumb, not a life-and-death solver. An "eye" here is an
//! empty point whose orthogonal neighbors are all friendly with enough
//! diagonal support for its board position; the position-dependent diagonal
//! thresholds (corner 1, edge 2, center 3) are the classic false-eye guard.
//!
//! `would_fill_territory` is the universal veto: every finder's candidate is
//! checked against it so the engine never wastes a move filling in space it
//! already owns.

use crate::board::{Board, Cell, Control, Grid, Point};
use crate::geometry::{adjacent, diagonal, is_corner, is_edge, manhattan};

fn count_cells(board: &Board, pts: &[Point], cell: Cell) -> usize {
    pts.iter().filter(|&&p| board.get(p) == cell).count()
}

/// Diagonal support required for a true eye at `p`.
fn eye_diagonal_threshold(p: Point, size: usize) -> usize {
    if is_corner(p, size) {
        1
    } else if is_edge(p, size) {
        2
    } else {
        3
    }
}

/// True if `p` is an eye: empty, every orthogonal neighbor friendly, and
/// enough friendly diagonal support for its position.
pub fn is_eye(board: &Board, p: Point) -> bool {
    if board.get(p) != Cell::Empty {
        return false;
    }
    let size = board.size();
    let adj = adjacent(p, size);
    if count_cells(board, &adj, Cell::Friendly) != adj.len() {
        return false;
    }
    let diag = diagonal(p, size);
    count_cells(board, &diag, Cell::Friendly) >= eye_diagonal_threshold(p, size)
}

/// True if placing a friendly stone at `p` would turn one of its currently
/// empty neighbors into an eye.
pub fn would_form_eye(board: &Board, p: Point) -> bool {
    let size = board.size();
    let mut sim = board.clone();
    sim.set(p, Cell::Friendly);
    adjacent(p, size)
        .into_iter()
        .any(|n| board.get(n) == Cell::Empty && is_eye(&sim, n))
}

/// Predictive eye test without simulation: could `p` still become an eye if
/// we keep playing around it?
///
/// Counts friendly-or-empty support against looser position-dependent
/// thresholds and refuses if the enemy is already leaning on the point.
pub fn could_form_eye(board: &Board, p: Point) -> bool {
    let size = board.size();
    let adj = adjacent(p, size);
    let diag = diagonal(p, size);

    let friendly_adj = count_cells(board, &adj, Cell::Friendly);
    let empty_adj = count_cells(board, &adj, Cell::Empty);
    let friendly_diag = count_cells(board, &diag, Cell::Friendly);
    let empty_diag = count_cells(board, &diag, Cell::Empty);
    let enemy_adj = count_cells(board, &adj, Cell::Enemy);
    let enemy_diag = count_cells(board, &diag, Cell::Enemy);

    let (required_adj, required_diag) = if is_corner(p, size) {
        (2, 1)
    } else if is_edge(p, size) {
        (3, 2)
    } else {
        (4, 3)
    };

    friendly_adj + empty_adj >= required_adj
        && friendly_diag + empty_diag >= required_diag
        && enemy_adj == 0
        && enemy_diag <= 1
}

/// True if an eye built around `p` would be easy for the opponent to ruin.
///
/// Vulnerable when the enemy already touches the point, leans on it
/// diagonally from more than two sides, a supporting friendly stone is down
/// to one liberty, or the surrounding space is not actually ours yet.
pub fn is_vulnerable_eye_formation(
    board: &Board,
    liberties: &Grid<i32>,
    controlled: &Grid<Control>,
    p: Point,
) -> bool {
    let size = board.size();
    let adj = adjacent(p, size);
    let diag = diagonal(p, size);

    if count_cells(board, &adj, Cell::Enemy) > 0 || count_cells(board, &diag, Cell::Enemy) > 2 {
        return true;
    }

    for &n in &adj {
        if board.get(n) == Cell::Friendly && liberties.get(n) < 2 {
            return true;
        }
    }

    let empty_adj: Vec<Point> = adj
        .iter()
        .copied()
        .filter(|&n| board.get(n) == Cell::Empty)
        .collect();
    if empty_adj.len() > 1
        && empty_adj
            .iter()
            .any(|&n| controlled.get(n) != Control::Friendly)
    {
        return true;
    }

    false
}

/// True if a stone at `p` would complete a recognized strong shape with the
/// friendly stones already around it: bamboo joint, tiger's mouth, table
/// shape, or a wall segment.
pub fn would_create_strong_shape(board: &Board, p: Point) -> bool {
    let size = board.size();
    let adj = adjacent(p, size);
    let diag = diagonal(p, size);

    let friendly_adj: Vec<Point> = adj
        .iter()
        .copied()
        .filter(|&n| board.get(n) == Cell::Friendly)
        .collect();
    let friendly_diag = count_cells(board, &diag, Cell::Friendly);

    // Bamboo joint: two friendly neighbors two steps apart through `p`.
    let bamboo = friendly_adj.iter().enumerate().any(|(i, &a)| {
        friendly_adj
            .iter()
            .enumerate()
            .any(|(j, &b)| i != j && manhattan(a, b) == 2)
    });

    // Tiger's mouth / table shape: two orthogonal supports plus a diagonal.
    let tigers_mouth = friendly_adj.len() >= 2 && friendly_diag >= 1;

    // Wall: two friendly neighbors sharing a row or column.
    let wall = friendly_adj
        .iter()
        .enumerate()
        .filter(|&(i, &a)| {
            friendly_adj
                .iter()
                .enumerate()
                .any(|(j, &b)| i != j && (a.0 == b.0 || a.1 == b.1))
        })
        .count()
        >= 2;

    bamboo || tigers_mouth || wall
}

/// True if playing at `p` would just fill in our own settled territory:
/// the point is ours, well surrounded, and almost enclosed already.
pub fn would_fill_territory(board: &Board, controlled: &Grid<Control>, p: Point) -> bool {
    if controlled.get(p) != Control::Friendly {
        return false;
    }
    let adj = adjacent(p, board.size());
    count_cells(board, &adj, Cell::Friendly) >= 2 && count_cells(board, &adj, Cell::Empty) <= 2
}

/// True if `p` is an empty point inside space we already control and keep
/// open on purpose. Attacking finders avoid playing into it.
pub fn is_protected_space(board: &Board, controlled: &Grid<Control>, p: Point) -> bool {
    if board.get(p) != Cell::Empty || controlled.get(p) != Control::Friendly {
        return false;
    }
    let adj = adjacent(p, board.size());
    count_cells(board, &adj, Cell::Friendly) >= 2 && count_cells(board, &adj, Cell::Empty) >= 2
}
