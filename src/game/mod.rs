//! Core rules of the snake duel
//!
//! This module contains all the game logic without any I/O or rendering dependencies:
//! the shared state, the tick update, food placement and the AI's greedy heuristic.

pub mod ai;
pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use ai::greedy_direction;
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, MoveOutcome, TickOutcome, place_food};
pub use state::{GameState, GameStatus, Position, Side, Snake, Winner};
