//! Greedy direction choice for the computer-controlled snake
//!
//! The AI looks exactly one step ahead. Each tick it turns onto the other
//! axis, picking whichever of the two perpendicular directions brings its
//! head closest to the target. It never keeps going straight, which makes
//! it zig-zag toward food even when already lined up with it.

use super::direction::Direction;
use super::state::Position;

/// Score given to a move that leaves the grid
pub const WALL_SCORE: i32 = -1000;

/// Pick the next direction for a snake at `head` chasing `target`
///
/// Off-grid moves are scored far below any on-grid move but not excluded,
/// so a cornered snake still gets an answer. Ties go to the candidate that
/// comes first in `Direction::ALL`.
pub fn greedy_direction(
    head: Position,
    target: Position,
    current: Direction,
    grid_size: usize,
) -> Direction {
    let mut best: Option<(Direction, i32)> = None;

    for candidate in current.perpendicular() {
        let score = move_score(head, target, candidate, grid_size);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(direction, _)| direction).unwrap_or(current)
}

fn move_score(head: Position, target: Position, direction: Direction, grid_size: usize) -> i32 {
    let next = head.moved_in_direction(direction);
    if !next.is_within(grid_size) {
        return WALL_SCORE;
    }
    -next.manhattan_distance(target)
}
