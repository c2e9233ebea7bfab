//! Snake Duel - you against a greedy AI snake in the terminal
//!
//! This library provides:
//! - Core game logic and the AI heuristic (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - The interactive duel loop (modes module)

pub mod game;
pub mod input;
pub mod logger;
pub mod metrics;
pub mod modes;
pub mod render;
