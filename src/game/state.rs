use std::fmt;

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Check if the position lies on a square grid of the given size
    pub fn is_within(&self, grid_size: usize) -> bool {
        let size = grid_size as i32;
        self.x >= 0 && self.x < size && self.y >= 0 && self.y < size
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A snake on the board
///
/// Segments may overlap each other and the other snake; nothing in the
/// rules treats that as a collision.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if any segment, head included, sits on pos
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend a new head, dropping the tail unless the snake grows
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true for a snake built by `new`)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// One of the two competitors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Ai => f.write_str("ai"),
        }
    }
}

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    Paused,
    Over,
}

/// Outcome of a round, meaningful once the status is `Over`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    None,
    Player,
    Ai,
    /// No free cell was left for food
    Draw,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Winner::Player,
            Side::Ai => Winner::Ai,
        }
    }
}

/// Complete game state, read by the presentation layer after every call
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub player: Snake,
    pub ai: Snake,
    pub food: Position,
    pub player_score: u32,
    pub ai_score: u32,
    pub status: GameStatus,
    pub winner: Winner,
    pub grid_size: usize,
    pub ticks: u32,
}

impl GameState {
    /// Create a fresh, not yet started state
    pub fn new(player: Snake, ai: Snake, food: Position, grid_size: usize) -> Self {
        Self {
            player,
            ai,
            food,
            player_score: 0,
            ai_score: 0,
            status: GameStatus::NotStarted,
            winner: Winner::None,
            grid_size,
            ticks: 0,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.is_within(self.grid_size)
    }

    /// Check if a position is occupied by either snake
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.player.occupies(pos) || self.ai.occupies(pos)
    }

    pub fn snake(&self, side: Side) -> &Snake {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn snake_mut(&mut self, side: Side) -> &mut Snake {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    pub fn score_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Player => &mut self.player_score,
            Side::Ai => &mut self.ai_score,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }
}
