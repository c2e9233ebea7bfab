use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

use super::{
    ai,
    config::GameConfig,
    direction::Direction,
    state::{GameState, GameStatus, Position, Side, Snake, Winner},
};

/// What happened to one snake during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was skipped, either because the round was not running or
    /// because the other snake already ended it this tick
    NotEvaluated,
    /// The snake moved one cell without eating
    Moved,
    /// The snake landed on the food and grew by one segment
    Ate,
    /// The snake tried to leave the grid; its body was left untouched
    Crashed,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub player: MoveOutcome,
    pub ai: MoveOutcome,
}

impl TickOutcome {
    fn idle() -> Self {
        Self {
            player: MoveOutcome::NotEvaluated,
            ai: MoveOutcome::NotEvaluated,
        }
    }

    /// True when the tick changed nothing
    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }
}

/// The game engine that owns the duel state and applies all rules
///
/// The presentation layer only ever sees `&GameState` through [`GameEngine::state`].
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new engine with an entropy-seeded RNG, ready to start
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let state = initial_state(&config, &mut rng);
        Self { config, state, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only snapshot of the current state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Reset the duel to its initial, not yet started state
    pub fn reset(&mut self) -> &GameState {
        self.state = initial_state(&self.config, &mut self.rng);
        info!(food = %self.state.food, "round reset");
        &self.state
    }

    /// Begin the round. Returns false unless the round had not started yet.
    pub fn start(&mut self) -> bool {
        if self.state.status != GameStatus::NotStarted {
            return false;
        }
        self.state.status = GameStatus::Running;
        info!("round started");
        true
    }

    /// Request a new heading for the human snake
    ///
    /// Only turns onto the other axis are accepted. A reversal, or a request
    /// along the current axis, is ignored and returns false.
    pub fn set_player_direction(&mut self, requested: Direction) -> bool {
        let current = self.state.player.direction;
        if !current.is_perpendicular(requested) {
            return false;
        }
        self.state.player.direction = requested;
        debug!(from = ?current, to = ?requested, "player turned");
        true
    }

    /// Flip between running and paused. No-op before the start or after the end.
    pub fn toggle_pause(&mut self) -> bool {
        self.state.status = match self.state.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            GameStatus::NotStarted | GameStatus::Over => return false,
        };
        debug!(status = ?self.state.status, "pause toggled");
        true
    }

    /// Advance both snakes by one cell
    ///
    /// Both intents are taken from the state as it stood before the tick:
    /// the AI steers toward the food it saw, and both heads are checked
    /// against that same food cell. Effects are applied player first, then
    /// AI. If the player's move ends the round, the AI does not move.
    #[instrument(level = "trace", skip(self), fields(tick = self.state.ticks))]
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::idle();
        }

        let food = self.state.food;
        let player_intent = self.state.player.direction;
        let ai_intent = ai::greedy_direction(
            self.state.ai.head(),
            food,
            self.state.ai.direction,
            self.config.grid_size,
        );

        self.state.ticks += 1;

        let player = self.apply_move(Side::Player, player_intent, food);
        let ai = if self.state.is_running() {
            self.state.ai.direction = ai_intent;
            self.apply_move(Side::Ai, ai_intent, food)
        } else {
            MoveOutcome::NotEvaluated
        };

        TickOutcome { player, ai }
    }

    /// Move one snake, resolving wall collision, eating and the score limit
    fn apply_move(&mut self, side: Side, direction: Direction, food: Position) -> MoveOutcome {
        let new_head = self.state.snake(side).head().moved_in_direction(direction);

        if !self.state.is_in_bounds(new_head) {
            info!(%side, head = %new_head, "snake hit the wall");
            self.finish(side.opponent().into());
            return MoveOutcome::Crashed;
        }

        let ate = new_head == food;
        self.state.snake_mut(side).advance(new_head, ate);
        if !ate {
            return MoveOutcome::Moved;
        }

        let score = self.state.score_mut(side);
        *score += 1;
        let score = *score;
        info!(%side, score, "food eaten");

        if score >= self.config.score_limit {
            self.finish(side.into());
        } else {
            self.relocate_food();
        }

        MoveOutcome::Ate
    }

    fn relocate_food(&mut self) {
        match place_food(
            &mut self.rng,
            self.config.grid_size,
            self.config.food_attempts,
            &self.state.player,
            &self.state.ai,
        ) {
            Some(food) => self.state.food = food,
            None => {
                warn!("no free cell left for food");
                self.finish(Winner::Draw);
            }
        }
    }

    fn finish(&mut self, winner: Winner) {
        self.state.status = GameStatus::Over;
        self.state.winner = winner;
        info!(
            ?winner,
            player_score = self.state.player_score,
            ai_score = self.state.ai_score,
            ticks = self.state.ticks,
            "round over"
        );
    }
}

fn initial_state<R: Rng>(config: &GameConfig, rng: &mut R) -> GameState {
    let player = Snake::new(config.player_start, config.player_direction);
    let ai = Snake::new(config.ai_start, config.ai_direction);

    match place_food(rng, config.grid_size, config.food_attempts, &player, &ai) {
        Some(food) => GameState::new(player, ai, food, config.grid_size),
        None => {
            // Only reachable on boards too small to hold both spawns and food
            let food = player.head();
            let mut state = GameState::new(player, ai, food, config.grid_size);
            state.status = GameStatus::Over;
            state.winner = Winner::Draw;
            state
        }
    }
}

/// Pick a free cell for the food
///
/// Draws uniformly at random and rejects cells covered by either snake. After
/// `attempts` rejected draws it lists the free cells and picks one of them
/// uniformly instead. Returns `None` when both snakes cover the whole board.
pub fn place_food<R: Rng>(
    rng: &mut R,
    grid_size: usize,
    attempts: usize,
    player: &Snake,
    ai: &Snake,
) -> Option<Position> {
    if grid_size == 0 {
        return None;
    }
    let occupied = |pos: Position| player.occupies(pos) || ai.occupies(pos);

    for _ in 0..attempts {
        let x = rng.gen_range(0..grid_size) as i32;
        let y = rng.gen_range(0..grid_size) as i32;
        let pos = Position::new(x, y);

        if !occupied(pos) {
            return Some(pos);
        }
    }

    let free: Vec<Position> = (0..grid_size as i32)
        .flat_map(|y| (0..grid_size as i32).map(move |x| Position::new(x, y)))
        .filter(|&pos| !occupied(pos))
        .collect();
    debug!(free = free.len(), "food sampling exhausted, scanning free cells");

    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_engine() -> GameEngine {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 7);
        engine.start();
        engine
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        engine.state.player_score = 3;
        engine.state.status = GameStatus::Over;
        engine.state.winner = Winner::Ai;

        let state = engine.reset();

        assert_eq!(state.status, GameStatus::NotStarted);
        assert_eq!(state.winner, Winner::None);
        assert_eq!(state.player_score, 0);
        assert_eq!(state.ai_score, 0);
        assert_eq!(state.player.body, vec![Position::new(5, 10)]);
        assert_eq!(state.player.direction, Direction::Right);
        assert_eq!(state.ai.body, vec![Position::new(14, 10)]);
        assert_eq!(state.ai.direction, Direction::Left);
        assert!(state.is_in_bounds(state.food));
        assert!(!state.is_occupied(state.food));
    }

    #[test]
    fn test_start_only_from_not_started() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        assert!(engine.start());
        assert_eq!(engine.state().status, GameStatus::Running);
        assert!(!engine.start());

        engine.state.status = GameStatus::Over;
        assert!(!engine.start());
        assert_eq!(engine.state().status, GameStatus::Over);
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let before = engine.state().clone();

        let outcome = engine.tick();

        assert!(outcome.is_idle());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = started_engine();
        engine.state.food = Position::new(0, 0);

        let outcome = engine.tick();

        assert_eq!(outcome.player, MoveOutcome::Moved);
        assert_eq!(outcome.ai, MoveOutcome::Moved);
        assert_eq!(engine.state().player.body, vec![Position::new(6, 10)]);
        assert_eq!(engine.state().ai.len(), 1);
        assert_eq!(engine.state().ticks, 1);
    }

    #[test]
    fn test_food_consumption_grows_by_one() {
        let mut engine = started_engine();
        engine.state.food = Position::new(6, 10);

        let outcome = engine.tick();

        assert_eq!(outcome.player, MoveOutcome::Ate);
        assert_eq!(engine.state().player_score, 1);
        assert_eq!(engine.state().player.len(), 2);
        assert_eq!(
            engine.state().player.body,
            vec![Position::new(6, 10), Position::new(5, 10)]
        );
        // Placed against the grown player body before the AI moved
        assert!(!engine.state().player.occupies(engine.state().food));
    }

    #[test]
    fn test_five_ticks_toward_food_ahead() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 42);
        engine.reset();
        engine.start();
        engine.state.food = Position::new(10, 10);

        let mut eaten = 0;
        for _ in 0..5 {
            if engine.tick().player == MoveOutcome::Ate {
                eaten += 1;
            }
        }

        assert_eq!(eaten, 1);
        assert_eq!(engine.state().player_score, 1);
        assert_eq!(engine.state().player.len(), 2);
        assert_eq!(engine.state().player.head(), Position::new(10, 10));
        assert_eq!(engine.state().ai_score, 0);
        assert_eq!(engine.state().status, GameStatus::Running);
    }

    #[test]
    fn test_player_wall_collision() {
        let mut engine = started_engine();
        engine.state.player = Snake::new(Position::new(19, 10), Direction::Right);
        let player_before = engine.state().player.clone();
        let ai_before = engine.state().ai.clone();

        let outcome = engine.tick();

        assert_eq!(outcome.player, MoveOutcome::Crashed);
        assert_eq!(outcome.ai, MoveOutcome::NotEvaluated);
        assert_eq!(engine.state().status, GameStatus::Over);
        assert_eq!(engine.state().winner, Winner::Ai);
        assert_eq!(engine.state().player, player_before);
        assert_eq!(engine.state().ai, ai_before);
    }

    #[test]
    fn test_ai_wall_collision() {
        let mut engine = started_engine();
        engine.state.ai = Snake::new(Position::new(0, 5), Direction::Up);
        let ai_before = engine.state().ai.clone();
        let food = engine.state().food;

        let outcome = engine.apply_move(Side::Ai, Direction::Left, food);

        assert_eq!(outcome, MoveOutcome::Crashed);
        assert_eq!(engine.state().status, GameStatus::Over);
        assert_eq!(engine.state().winner, Winner::Player);
        assert_eq!(engine.state().ai, ai_before);
    }

    #[test]
    fn test_player_reaches_score_limit() {
        let mut engine = started_engine();
        engine.state.player_score = 4;
        engine.state.food = Position::new(6, 10);
        let ai_before = engine.state().ai.clone();

        let outcome = engine.tick();

        assert_eq!(outcome.player, MoveOutcome::Ate);
        assert_eq!(outcome.ai, MoveOutcome::NotEvaluated);
        assert_eq!(engine.state().status, GameStatus::Over);
        assert_eq!(engine.state().winner, Winner::Player);
        assert_eq!(engine.state().player_score, 5);
        assert_eq!(engine.state().player.len(), 2);
        // No relocation on the winning bite
        assert_eq!(engine.state().food, Position::new(6, 10));
        assert_eq!(engine.state().ai, ai_before);
    }

    #[test]
    fn test_ai_reaches_score_limit() {
        let mut engine = started_engine();
        engine.state.ai_score = 4;
        // From (6,9) heading Left the AI chooses Down onto the food
        engine.state.ai = Snake::new(Position::new(6, 9), Direction::Left);
        engine.state.player = Snake::new(Position::new(2, 2), Direction::Right);
        engine.state.food = Position::new(6, 10);

        let outcome = engine.tick();

        assert_eq!(outcome.player, MoveOutcome::Moved);
        assert_eq!(outcome.ai, MoveOutcome::Ate);
        assert_eq!(engine.state().status, GameStatus::Over);
        assert_eq!(engine.state().winner, Winner::Ai);
        assert_eq!(engine.state().ai.len(), 2);
        assert_eq!(engine.state().food, Position::new(6, 10));
    }

    #[test]
    fn test_ai_targets_food_seen_before_the_tick() {
        let mut engine = started_engine();
        engine.state.food = Position::new(6, 10);
        engine.state.ai = Snake::new(Position::new(14, 9), Direction::Left);

        engine.tick();

        // Player ate and the food moved, but the AI still steered for (6,10)
        assert_eq!(engine.state().player_score, 1);
        assert_eq!(engine.state().ai.direction, Direction::Down);
        assert_eq!(engine.state().ai.head(), Position::new(14, 10));
    }

    #[test]
    fn test_both_snakes_eat_the_same_food() {
        let mut engine = started_engine();
        engine.state.food = Position::new(6, 10);
        engine.state.ai = Snake::new(Position::new(6, 9), Direction::Left);

        let outcome = engine.tick();

        assert_eq!(outcome.player, MoveOutcome::Ate);
        assert_eq!(outcome.ai, MoveOutcome::Ate);
        assert_eq!(engine.state().player_score, 1);
        assert_eq!(engine.state().ai_score, 1);
        assert_eq!(engine.state().player.len(), 2);
        assert_eq!(engine.state().ai.len(), 2);
        assert!(!engine.state().is_occupied(engine.state().food));
    }

    #[test]
    fn test_ai_direction_persists() {
        let mut engine = started_engine();
        engine.state.food = Position::new(0, 0);

        engine.tick();
        let first = engine.state().ai.direction;
        engine.tick();
        let second = engine.state().ai.direction;

        assert!(first.is_perpendicular(Direction::Left));
        assert!(second.is_perpendicular(first));
    }

    #[test]
    fn test_prevent_reversal() {
        let mut engine = started_engine();

        assert!(!engine.set_player_direction(Direction::Left));
        assert_eq!(engine.state().player.direction, Direction::Right);

        assert!(!engine.set_player_direction(Direction::Right));
        assert_eq!(engine.state().player.direction, Direction::Right);

        assert!(engine.set_player_direction(Direction::Up));
        assert_eq!(engine.state().player.direction, Direction::Up);

        assert!(!engine.set_player_direction(Direction::Down));
        assert!(engine.set_player_direction(Direction::Left));
        assert_eq!(engine.state().player.direction, Direction::Left);
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut engine = started_engine();
        assert!(engine.toggle_pause());
        assert_eq!(engine.state().status, GameStatus::Paused);
        let before = engine.state().clone();

        let outcome = engine.tick();

        assert!(outcome.is_idle());
        assert_eq!(engine.state(), &before);

        assert!(engine.toggle_pause());
        assert_eq!(engine.state().status, GameStatus::Running);
        assert!(!engine.tick().is_idle());
    }

    #[test]
    fn test_pause_ignored_outside_a_round() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);
        assert!(!engine.toggle_pause());
        assert_eq!(engine.state().status, GameStatus::NotStarted);

        engine.state.status = GameStatus::Over;
        assert!(!engine.toggle_pause());
        assert_eq!(engine.state().status, GameStatus::Over);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = started_engine();
        engine.state.status = GameStatus::Over;
        let before = engine.state().clone();

        assert!(engine.tick().is_idle());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_full_board_ends_in_draw() {
        let mut engine = GameEngine::with_seed(GameConfig::small(2), 5);
        engine.start();
        engine.state.player = Snake {
            body: vec![Position::new(0, 0), Position::new(0, 1)],
            direction: Direction::Right,
        };
        engine.state.ai = Snake::new(Position::new(1, 1), Direction::Left);
        engine.state.food = Position::new(1, 0);

        let outcome = engine.tick();

        assert_eq!(outcome.player, MoveOutcome::Ate);
        assert_eq!(outcome.ai, MoveOutcome::NotEvaluated);
        assert_eq!(engine.state().status, GameStatus::Over);
        assert_eq!(engine.state().winner, Winner::Draw);
    }

    #[test]
    fn test_place_food_avoids_both_snakes() {
        let mut rng = StdRng::seed_from_u64(11);
        let player = Snake {
            body: vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(2, 1),
            ],
            direction: Direction::Left,
        };
        let ai = Snake {
            body: vec![Position::new(1, 1), Position::new(0, 1), Position::new(0, 2)],
            direction: Direction::Up,
        };

        for _ in 0..200 {
            let food = place_food(&mut rng, 3, 16, &player, &ai).unwrap();
            assert!(food.is_within(3));
            assert!(!player.occupies(food));
            assert!(!ai.occupies(food));
        }
    }

    #[test]
    fn test_place_food_scan_fallback() {
        let mut rng = StdRng::seed_from_u64(2);
        let player = Snake {
            body: vec![Position::new(0, 0), Position::new(1, 0)],
            direction: Direction::Right,
        };
        let ai = Snake::new(Position::new(0, 1), Direction::Up);

        // Zero random draws forces the scan; only (1,1) is free
        let food = place_food(&mut rng, 2, 0, &player, &ai);
        assert_eq!(food, Some(Position::new(1, 1)));
    }

    #[test]
    fn test_place_food_on_full_board() {
        let mut rng = StdRng::seed_from_u64(2);
        let player = Snake {
            body: vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)],
            direction: Direction::Right,
        };
        let ai = Snake::new(Position::new(0, 1), Direction::Up);

        assert_eq!(place_food(&mut rng, 2, 64, &player, &ai), None);
    }
}
