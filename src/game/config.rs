use std::time::Duration;

use super::direction::Direction;
use super::state::Position;

/// Fixed rules of a duel
///
/// `Default` carries the constants the game ships with. None of them are
/// exposed on the command line; smaller boards exist for tests only.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Width and height of the square grid
    pub grid_size: usize,
    /// Points needed to win a round
    pub score_limit: u32,
    /// Period of the game tick while a round is running
    pub tick_interval: Duration,

    /// Spawn cell and heading of the human snake
    pub player_start: Position,
    pub player_direction: Direction,
    /// Spawn cell and heading of the AI snake
    pub ai_start: Position,
    pub ai_direction: Direction,

    /// Random draws tried before food placement falls back to a scan
    pub food_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            score_limit: 5,
            tick_interval: Duration::from_millis(150),
            player_start: Position::new(5, 10),
            player_direction: Direction::Right,
            ai_start: Position::new(14, 10),
            ai_direction: Direction::Left,
            food_attempts: 256,
        }
    }
}

impl GameConfig {
    /// Create a small grid for testing, keeping both spawns on the middle row
    pub fn small(grid_size: usize) -> Self {
        let mid = (grid_size / 2) as i32;
        Self {
            grid_size,
            player_start: Position::new(0, mid),
            ai_start: Position::new(grid_size as i32 - 1, mid),
            ..Default::default()
        }
    }
}
