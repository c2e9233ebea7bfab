use std::time::{Duration, Instant};

use crate::game::Winner;

/// Tally kept across rounds for as long as the program runs
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub rounds_played: u32,
    pub player_wins: u32,
    pub ai_wins: u32,
    pub draws: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            rounds_played: 0,
            player_wins: 0,
            ai_wins: 0,
            draws: 0,
        }
    }

    /// Refresh the round clock; call only while the round is running
    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Restart the round clock, keeping the time already played
    pub fn on_round_start(&mut self) {
        self.start_time = Instant::now()
            .checked_sub(self.elapsed_time)
            .unwrap_or_else(Instant::now);
    }

    pub fn on_round_reset(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_round_over(&mut self, winner: Winner) {
        self.rounds_played += 1;
        match winner {
            Winner::Player => self.player_wins += 1,
            Winner::Ai => self.ai_wins += 1,
            Winner::Draw => self.draws += 1,
            Winner::None => {}
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_win_tally() {
        let mut metrics = GameMetrics::new();

        metrics.on_round_over(Winner::Player);
        metrics.on_round_over(Winner::Ai);
        metrics.on_round_over(Winner::Ai);
        metrics.on_round_over(Winner::Draw);

        assert_eq!(metrics.rounds_played, 4);
        assert_eq!(metrics.player_wins, 1);
        assert_eq!(metrics.ai_wins, 2);
        assert_eq!(metrics.draws, 1);
    }

    #[test]
    fn test_resume_keeps_elapsed_time() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(30);

        metrics.on_round_start();
        metrics.update();

        assert!(metrics.elapsed_time >= Duration::from_secs(30));
    }

    #[test]
    fn test_reset_clears_time() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_round_reset();
        assert_eq!(metrics.elapsed_time, Duration::ZERO);
    }
}
