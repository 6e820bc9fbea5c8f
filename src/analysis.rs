//! Group and liberty analysis.
//!
//! Connected groups are discovered with an explicit worklist flood-fill (no
//! recursion, so a pathological board can't blow the stack). On top of the
//! flood-fill sit the legality primitives: liberty reachability, capture
//! detection, and the composite legal-move check with its single-step ko
//! rule.
//!
//! Ko here deliberately compares only against the immediately preceding board
//! snapshot. Full superko would need the whole position history; the simple
//! rule is what the host game enforces and is cheap enough to run per
//! candidate.

use crate::board::{Board, Cell, Control, Grid, Point};
use crate::geometry::adjacent;

/// Collect the maximal same-color group containing `start`.
///
/// Returns an empty vector if `start` is an empty cell.
pub fn collect_group(board: &Board, start: Point) -> Vec<Point> {
    let color = board.get(start);
    if color == Cell::Empty {
        return Vec::new();
    }
    let size = board.size();
    let mut visited = Grid::<bool>::new(size);
    let mut stack = vec![start];
    let mut group = Vec::new();

    while let Some(p) = stack.pop() {
        if visited.get(p) {
            continue;
        }
        visited.set(p, true);
        if board.get(p) == color {
            group.push(p);
            for n in adjacent(p, size) {
                if !visited.get(n) && board.get(n) == color {
                    stack.push(n);
                }
            }
        }
    }
    group
}

/// Count the distinct liberties of the group containing `start`.
///
/// Returns 0 for empty cells.
pub fn group_liberties(board: &Board, start: Point) -> usize {
    let color = board.get(start);
    if color == Cell::Empty {
        return 0;
    }
    let size = board.size();
    let mut visited = Grid::<bool>::new(size);
    let mut counted = Grid::<bool>::new(size);
    let mut stack = vec![start];
    let mut libs = 0;

    while let Some(p) = stack.pop() {
        if visited.get(p) {
            continue;
        }
        visited.set(p, true);
        for n in adjacent(p, size) {
            match board.get(n) {
                Cell::Empty => {
                    if !counted.get(n) {
                        counted.set(n, true);
                        libs += 1;
                    }
                }
                c if c == color && !visited.get(n) => stack.push(n),
                _ => {}
            }
        }
    }
    libs
}

/// True if the group containing `start` can reach at least one empty point.
///
/// Early-exit variant of [`group_liberties`] for when the count itself is not
/// needed.
pub fn has_liberties(board: &Board, start: Point) -> bool {
    let color = board.get(start);
    if color == Cell::Empty {
        return true;
    }
    let size = board.size();
    let mut visited = Grid::<bool>::new(size);
    let mut stack = vec![start];

    while let Some(p) = stack.pop() {
        if visited.get(p) {
            continue;
        }
        visited.set(p, true);
        for n in adjacent(p, size) {
            match board.get(n) {
                Cell::Empty => return true,
                c if c == color && !visited.get(n) => stack.push(n),
                _ => {}
            }
        }
    }
    false
}

/// True if placing a `color` stone at `p` would remove the last liberty of at
/// least one adjacent group of the opposite color.
pub fn captures_enemy(board: &Board, p: Point, color: Cell) -> bool {
    let size = board.size();
    let target = color.opposite();
    let mut sim = board.clone();
    sim.set(p, color);
    adjacent(p, size)
        .into_iter()
        .any(|n| sim.get(n) == target && !has_liberties(&sim, n))
}

/// Place a `color` stone at `p` and remove any opposing groups left without
/// liberties. Returns the resulting board and the number of stones captured.
///
/// Does not test the legality of the placement itself; that is
/// [`is_legal_move`]'s job.
pub fn place_and_resolve(board: &Board, p: Point, color: Cell) -> (Board, usize) {
    let size = board.size();
    let target = color.opposite();
    let mut next = board.clone();
    next.set(p, color);

    let mut captured = 0;
    for n in adjacent(p, size) {
        if next.get(n) == target && !has_liberties(&next, n) {
            for dead in collect_group(&next, n) {
                next.set(dead, Cell::Empty);
                captured += 1;
            }
        }
    }
    (next, captured)
}

/// Composite legality check for a friendly placement at `p`.
///
/// A move is legal when it is in bounds, allowed by the valid-move mask, on
/// an empty cell, does not recreate the immediately preceding board position
/// (simple ko), and either keeps a liberty after captures resolve or captures
/// an enemy group.
pub fn is_legal_move(
    p: Point,
    board: &Board,
    valid: &Grid<bool>,
    previous: Option<&Board>,
) -> bool {
    let size = board.size();
    if p.0 >= size || p.1 >= size {
        return false;
    }
    if !valid.get(p) || board.get(p) != Cell::Empty {
        return false;
    }

    let (resolved, _captured) = place_and_resolve(board, p, Cell::Friendly);
    if let Some(prev) = previous
        && resolved == *prev
    {
        return false;
    }
    group_liberties(&resolved, p) > 0
}

/// Per-point liberty counts: every stone carries its group's liberty count,
/// empty cells carry 0.
pub fn compute_liberties(board: &Board) -> Grid<i32> {
    let size = board.size();
    let mut libs = Grid::<i32>::new(size);
    let mut seen = Grid::<bool>::new(size);

    for p in board.points() {
        if board.get(p) == Cell::Empty || seen.get(p) {
            continue;
        }
        let group = collect_group(board, p);
        let count = group_liberties(board, p) as i32;
        for member in group {
            libs.set(member, count);
            seen.set(member, true);
        }
    }
    libs
}

/// Per-point chain identifiers. Stones in one connected group share an id;
/// empty cells carry `None`. Ids are stable only within one snapshot.
pub fn compute_chains(board: &Board) -> Grid<Option<u32>> {
    let size = board.size();
    let mut chains = Grid::<Option<u32>>::new(size);
    let mut next_id = 0u32;

    for p in board.points() {
        if board.get(p) == Cell::Empty || chains.get(p).is_some() {
            continue;
        }
        for member in collect_group(board, p) {
            chains.set(member, Some(next_id));
        }
        next_id += 1;
    }
    chains
}

/// Estimate territory control of empty points.
///
/// Each maximal empty region is flood-filled; a region bordered by stones of
/// only one color belongs to that color, anything else is neutral. Stones
/// themselves are always neutral in the returned grid.
pub fn compute_controlled(board: &Board) -> Grid<Control> {
    let size = board.size();
    let mut controlled = Grid::<Control>::new(size);
    let mut seen = Grid::<bool>::new(size);

    for start in board.points() {
        if board.get(start) != Cell::Empty || seen.get(start) {
            continue;
        }

        // Flood the empty region, noting which colors border it.
        let mut region = Vec::new();
        let mut stack = vec![start];
        let mut touches_friendly = false;
        let mut touches_enemy = false;
        while let Some(p) = stack.pop() {
            if seen.get(p) {
                continue;
            }
            seen.set(p, true);
            region.push(p);
            for n in adjacent(p, size) {
                match board.get(n) {
                    Cell::Empty => {
                        if !seen.get(n) {
                            stack.push(n);
                        }
                    }
                    Cell::Friendly => touches_friendly = true,
                    Cell::Enemy => touches_enemy = true,
                }
            }
        }

        let owner = match (touches_friendly, touches_enemy) {
            (true, false) => Control::Friendly,
            (false, true) => Control::Enemy,
            _ => Control::Neutral,
        };
        if owner != Control::Neutral {
            for p in region {
                controlled.set(p, owner);
            }
        }
    }
    controlled
}

/// Valid-move mask for the friendly side: empty points whose placement either
/// keeps a liberty or captures, and does not repeat `previous` (simple ko).
pub fn compute_valid_moves(board: &Board, previous: Option<&Board>) -> Grid<bool> {
    let size = board.size();
    let mut valid = Grid::<bool>::new(size);
    for p in board.points() {
        if board.get(p) != Cell::Empty {
            continue;
        }
        let (resolved, _) = place_and_resolve(board, p, Cell::Friendly);
        if let Some(prev) = previous
            && resolved == *prev
        {
            continue;
        }
        if group_liberties(&resolved, p) > 0 {
            valid.set(p, true);
        }
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn single_stone_liberties() {
        let b = board(&[
            ".....", //
            "..X..",
            ".....",
            ".....",
            ".....",
        ]);
        assert_eq!(group_liberties(&b, (2, 1)), 4);
        assert!(has_liberties(&b, (2, 1)));
    }

    #[test]
    fn group_shares_liberties() {
        let b = board(&[
            "XX...", //
            "X....",
            ".....",
            ".....",
            ".....",
        ]);
        let group = collect_group(&b, (0, 0));
        assert_eq!(group.len(), 3);
        // Liberties: (2,0), (1,1), (0,2).
        assert_eq!(group_liberties(&b, (1, 0)), 3);
    }

    #[test]
    fn surrounded_group_has_none() {
        let b = board(&[
            ".O...", //
            "OXO..",
            ".O...",
            ".....",
            ".....",
        ]);
        assert!(!has_liberties(&b, (1, 1)));
        assert_eq!(group_liberties(&b, (1, 1)), 0);
    }

    #[test]
    fn capture_detection_and_resolution() {
        // Friendly play at (0,1) takes the corner stone's last liberty.
        let b = board(&[
            "OX...", //
            ".....",
            ".....",
            ".....",
            ".....",
        ]);
        assert!(captures_enemy(&b, (0, 1), Cell::Friendly));
        let (after, captured) = place_and_resolve(&b, (0, 1), Cell::Friendly);
        assert_eq!(captured, 1);
        assert_eq!(after.get((0, 0)), Cell::Empty);
    }

    #[test]
    fn legality_rejects_occupied_and_suicide() {
        let b = board(&[
            "OX...", //
            "X....",
            ".....",
            ".....",
            ".....",
        ]);
        let valid = compute_valid_moves(&b, None);
        assert!(!is_legal_move((1, 0), &b, &valid, None), "occupied");

        // Enemy-perspective suicide does not apply to us, but our own
        // single-point suicide does: a friendly stone inside an enemy pocket.
        let pocket = board(&[
            ".O...", //
            "O.O..",
            ".O...",
            ".....",
            ".....",
        ]);
        let valid = compute_valid_moves(&pocket, None);
        assert!(!valid.get((1, 1)));
        assert!(!is_legal_move((1, 1), &pocket, &valid, None), "suicide");
    }

    #[test]
    fn legality_rejects_simple_ko() {
        // Playing (0,1) captures the corner stone; forbid it when the
        // resulting position is exactly the previous one.
        let b = board(&[
            "OX...", //
            ".....",
            ".....",
            ".....",
            ".....",
        ]);
        let (after, _) = place_and_resolve(&b, (0, 1), Cell::Friendly);

        let valid = compute_valid_moves(&b, None);
        assert!(is_legal_move((0, 1), &b, &valid, None));
        assert!(!is_legal_move((0, 1), &b, &valid, Some(&after)));

        let masked = compute_valid_moves(&b, Some(&after));
        assert!(!masked.get((0, 1)));
    }

    #[test]
    fn chain_ids_partition_stones() {
        let b = board(&[
            "XX.O.", //
            "...O.",
            ".X...",
            ".....",
            ".....",
        ]);
        let chains = compute_chains(&b);
        assert_eq!(chains.get((0, 0)), chains.get((1, 0)));
        assert_ne!(chains.get((0, 0)), chains.get((1, 2)));
        assert_ne!(chains.get((0, 0)), chains.get((3, 0)));
        assert_eq!(chains.get((3, 0)), chains.get((3, 1)));
        assert_eq!(chains.get((2, 2)), None);
    }

    #[test]
    fn liberty_map_covers_groups_only() {
        let b = board(&[
            "XX...", //
            ".....",
            "...O.",
            ".....",
            ".....",
        ]);
        let libs = compute_liberties(&b);
        // The pair shares liberties (2,0), (0,1) and (1,1).
        assert_eq!(libs.get((0, 0)), 3);
        assert_eq!(libs.get((1, 0)), 3);
        assert_eq!(libs.get((3, 2)), 4);
        assert_eq!(libs.get((2, 2)), 0);
    }

    #[test]
    fn controlled_regions() {
        // Top-left pocket is walled off by friendly stones; the open area
        // touches both colors and stays neutral.
        let b = board(&[
            ".X...", //
            "XX...",
            ".....",
            "...O.",
            ".....",
        ]);
        let controlled = compute_controlled(&b);
        assert_eq!(controlled.get((0, 0)), Control::Friendly);
        assert_eq!(controlled.get((4, 4)), Control::Neutral);
        assert_eq!(controlled.get((1, 1)), Control::Neutral, "stones are neutral");
    }
}
