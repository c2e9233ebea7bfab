use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::{debug, info};

use crate::game::{GameEngine, GameStatus};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive duel against the AI in the terminal
pub struct DuelMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl DuelMode {
    pub fn new(engine: GameEngine) -> Self {
        let renderer = Renderer::new(engine.config().score_limit);

        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!("duel started");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            rounds = self.metrics.rounds_played,
            player_wins = self.metrics.player_wins,
            ai_wins = self.metrics.ai_wins,
            draws = self.metrics.draws,
            "duel finished"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Only exists while the round is running
        let mut tick_timer: Option<Interval> = None;

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event, &mut tick_timer),
                        Some(Err(e)) => {
                            return Err(e).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = next_tick(&mut tick_timer) => {
                    self.on_tick(&mut tick_timer);
                }

                // Render frame
                _ = render_timer.tick() => {
                    if self.engine.state().status == GameStatus::Running {
                        self.metrics.update();
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Option<Interval>) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply_key_action(action, tick_timer);
        }
    }

    fn apply_key_action(&mut self, action: KeyAction, tick_timer: &mut Option<Interval>) {
        match action {
            KeyAction::Turn(direction) => {
                // Keys steer only once the round is underway and until it ends
                if matches!(
                    self.engine.state().status,
                    GameStatus::Running | GameStatus::Paused
                ) {
                    self.engine.set_player_direction(direction);
                }
            }
            KeyAction::Start => {
                if self.engine.start() {
                    self.metrics.on_round_start();
                }
            }
            KeyAction::TogglePause => {
                if self.engine.toggle_pause()
                    && self.engine.state().status == GameStatus::Running
                {
                    self.metrics.on_round_start();
                }
            }
            KeyAction::Restart => {
                self.engine.reset();
                self.metrics.on_round_reset();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        self.sync_tick_timer(tick_timer);
    }

    fn on_tick(&mut self, tick_timer: &mut Option<Interval>) {
        let outcome = self.engine.tick();
        debug!(?outcome, "tick");

        let state = self.engine.state();
        if !outcome.is_idle() && state.status == GameStatus::Over {
            self.metrics.update();
            self.metrics.on_round_over(state.winner);
        }

        self.sync_tick_timer(tick_timer);
    }

    /// Create the tick timer when the round runs, drop it otherwise
    fn sync_tick_timer(&self, tick_timer: &mut Option<Interval>) {
        let running = self.engine.state().status == GameStatus::Running;

        match (running, tick_timer.is_some()) {
            (true, false) => {
                let period = self.engine.config().tick_interval;
                let mut timer = interval_at(Instant::now() + period, period);
                timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *tick_timer = Some(timer);
                debug!(?period, "tick timer started");
            }
            (false, true) => {
                *tick_timer = None;
                debug!("tick timer stopped");
            }
            _ => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Wait for the next tick, or forever when no timer is running
async fn next_tick(tick_timer: &mut Option<Interval>) {
    match tick_timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
