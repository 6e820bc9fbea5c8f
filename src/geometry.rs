//! Bounded neighbor enumeration.
//!
//! Pure functions of a point and the board size. Everything returned is
//! guaranteed to be in bounds, so callers can index grids without re-checking.

use crate::board::Point;

/// Orthogonal neighbors of `p` within a `size`-wide board (at most 4).
pub fn adjacent((x, y): Point, size: usize) -> Vec<Point> {
    let mut v = Vec::with_capacity(4);
    if x > 0 {
        v.push((x - 1, y));
    }
    if x + 1 < size {
        v.push((x + 1, y));
    }
    if y > 0 {
        v.push((x, y - 1));
    }
    if y + 1 < size {
        v.push((x, y + 1));
    }
    v
}

/// Diagonal neighbors of `p` within a `size`-wide board (at most 4).
pub fn diagonal((x, y): Point, size: usize) -> Vec<Point> {
    let mut v = Vec::with_capacity(4);
    if x > 0 && y > 0 {
        v.push((x - 1, y - 1));
    }
    if x + 1 < size && y > 0 {
        v.push((x + 1, y - 1));
    }
    if x > 0 && y + 1 < size {
        v.push((x - 1, y + 1));
    }
    if x + 1 < size && y + 1 < size {
        v.push((x + 1, y + 1));
    }
    v
}

/// True if `p` is one of the four board corners.
pub fn is_corner((x, y): Point, size: usize) -> bool {
    (x == 0 || x == size - 1) && (y == 0 || y == size - 1)
}

/// True if `p` lies on the outer edge (corners included).
pub fn is_edge((x, y): Point, size: usize) -> bool {
    x == 0 || x == size - 1 || y == 0 || y == size - 1
}

/// Manhattan distance between two points.
pub fn manhattan((ax, ay): Point, (bx, by): Point) -> usize {
    ax.abs_diff(bx) + ay.abs_diff(by)
}
