use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameState, GameStatus, Position, Winner};
use crate::metrics::GameMetrics;

/// What occupies a grid cell, in drawing priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    PlayerHead,
    AiHead,
    Food,
    PlayerBody,
    AiBody,
    Empty,
}

impl Cell {
    pub fn at(state: &GameState, pos: Position) -> Self {
        if pos == state.player.head() {
            Cell::PlayerHead
        } else if pos == state.ai.head() {
            Cell::AiHead
        } else if pos == state.food {
            Cell::Food
        } else if state.player.occupies(pos) {
            Cell::PlayerBody
        } else if state.ai.occupies(pos) {
            Cell::AiBody
        } else {
            Cell::Empty
        }
    }

    fn span(self) -> Span<'static> {
        match self {
            Cell::PlayerHead => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::AiHead => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::Food => Span::styled(
                "● ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Cell::PlayerBody => Span::styled("□ ", Style::default().fg(Color::Green)),
            Cell::AiBody => Span::styled("□ ", Style::default().fg(Color::Blue)),
            Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }
}

pub struct Renderer {
    score_limit: u32,
}

impl Renderer {
    pub fn new(score_limit: u32) -> Self {
        Self { score_limit }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match state.status {
            GameStatus::NotStarted => {
                frame.render_widget(self.render_start_screen(), game_area);
            }
            GameStatus::Running => {
                frame.render_widget(self.render_grid(state), game_area);
            }
            GameStatus::Paused => {
                frame.render_widget(self.render_grid(state), game_area);
                let popup = centered(game_area, 24, 5);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_pause(), popup);
            }
            GameStatus::Over => {
                frame.render_widget(self.render_grid(state), game_area);
                let popup = centered(game_area, 40, 11);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_game_over(state), popup);
            }
        }

        let controls = self.render_controls(state.status);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let lines: Vec<Line> = (0..state.grid_size as i32)
            .map(|y| {
                let spans: Vec<Span> = (0..state.grid_size as i32)
                    .map(|x| Cell::at(state, Position::new(x, y)).span())
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" AI vs Player "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("You: ", Style::default().fg(Color::Green)),
            Span::styled(
                format!("{}/{}", state.player_score, self.score_limit),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("AI: ", Style::default().fg(Color::Blue)),
            Span::styled(
                format!("{}/{}", state.ai_score, self.score_limit),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Wins: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}-{}", metrics.player_wins, metrics.ai_wins),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_start_screen(&self) -> Paragraph<'static> {
        let rule = |text: String| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "AI vs Player",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("First to {} points wins!", self.score_limit)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Green snake", Style::default().fg(Color::Green)),
                Span::raw(" = You    "),
                Span::styled("Blue snake", Style::default().fg(Color::Blue)),
                Span::raw(" = AI"),
            ]),
            Line::from(Span::styled(
                "Rules:",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            rule("Hitting the wall = instant loss".to_string()),
            rule("Snakes can pass through themselves".to_string()),
            rule("Compete for the red food!".to_string()),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_pause(&self) -> Paragraph<'static> {
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'static> {
        let (headline, color) = match state.winner {
            Winner::Player => ("YOU WIN!", Color::Green),
            Winner::Ai => ("AI WINS!", Color::Blue),
            Winner::Draw => ("DRAW: NO ROOM LEFT", Color::Yellow),
            Winner::None => ("GAME OVER", Color::Red),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Your Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}/{}", state.player_score, self.score_limit),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("AI Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}/{}", state.ai_score, self.score_limit),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self, status: GameStatus) -> Paragraph<'static> {
        let line = match status {
            GameStatus::NotStarted => Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Cyan)),
                Span::raw(" to start | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
            _ => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Space", Style::default().fg(Color::Cyan)),
                Span::raw(" to pause | "),
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
