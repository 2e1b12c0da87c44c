use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::info;
use rand::rngs::StdRng;
use ratatui::{prelude::*, widgets::*};

use crate::arena::Direction;
use crate::chime::{Cue, Speaker};
use crate::config::GameConfig;
use crate::engine::{Collision, Session, StepResult};
use crate::render::arena_extent;
use crate::score::Scoreboard;
use crate::ticker::Ticker;

#[derive(Debug)]
pub enum GameState {
    ReadyToStart,
    Playing(Session),
    GameOver { session: Session, cause: Collision },
    Exit,
}

/// Runs the screens around a `Session` and turns what happens in it into
/// drawing, sounds, timer changes and high scores.
pub struct Game {
    pub state: GameState,
    config: GameConfig,
    scoreboard: Scoreboard,
    speaker: Box<dyn Speaker>,
    ticker: Ticker,
    rng: StdRng,
}

fn period_of(session: &Session) -> Duration {
    Duration::from_millis(session.period_ms())
}

fn start_session(
    config: &GameConfig,
    rng: &mut StdRng,
    ticker: &mut Ticker,
    now: Instant,
) -> Session {
    let session = Session::new(config.clone(), rng);
    ticker.restart(period_of(&session), now);
    info!(
        "New game: food at {:?}, {} walls",
        session.food(),
        session.walls().len()
    );
    session
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    }
}

impl Game {
    pub fn new(
        config: GameConfig,
        scoreboard: Scoreboard,
        speaker: Box<dyn Speaker>,
        rng: StdRng,
    ) -> Self {
        Game {
            state: GameState::ReadyToStart,
            config,
            scoreboard,
            speaker,
            ticker: Ticker::default(),
            rng,
        }
    }

    /// How long the event loop may block waiting for a key.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.ticker.timeout(now)
    }

    /// Runs a tick if one is due.
    pub fn on_timer(&mut self, now: Instant) {
        if self.ticker.fire(now) {
            self.update(now);
        }
    }

    pub fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let new_state = match &mut self.state {
            GameState::ReadyToStart => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(GameState::Exit),
                KeyCode::Char(' ') | KeyCode::Enter => Some(GameState::Playing(start_session(
                    &self.config,
                    &mut self.rng,
                    &mut self.ticker,
                    now,
                ))),
                KeyCode::Char('x') => {
                    self.scoreboard.reset();
                    None
                }
                _ => None,
            },
            GameState::Playing(session) => match key.code {
                KeyCode::Esc => Some(GameState::Exit),
                KeyCode::Char('q') | KeyCode::Char('m') => {
                    self.ticker.stop();
                    Some(GameState::ReadyToStart)
                }
                KeyCode::Char('r') => {
                    info!("Restarting at score {}", session.score());
                    session.reset(self.config.clone(), &mut self.rng);
                    self.ticker.restart(period_of(session), now);
                    None
                }
                code => {
                    if let Some(direction) = direction_for(code) {
                        session.set_direction(direction);
                    }
                    None
                }
            },
            GameState::GameOver { .. } => match key.code {
                KeyCode::Esc => Some(GameState::Exit),
                KeyCode::Char(' ') | KeyCode::Enter => Some(GameState::Playing(start_session(
                    &self.config,
                    &mut self.rng,
                    &mut self.ticker,
                    now,
                ))),
                KeyCode::Char('q') | KeyCode::Char('m') => Some(GameState::ReadyToStart),
                KeyCode::Char('x') => {
                    self.scoreboard.reset();
                    None
                }
                _ => None,
            },
            GameState::Exit => None,
        };

        if let Some(new_state) = new_state {
            self.state = new_state;
        }
    }

    fn update(&mut self, now: Instant) {
        let GameState::Playing(session) = &mut self.state else {
            return;
        };

        match session.tick(&mut self.rng) {
            StepResult::Ongoing => self.speaker.play(Cue::Move),
            StepResult::Nommed { score, sped_up } => {
                self.speaker.play(Cue::Move);
                self.speaker.play(Cue::Eat);
                if self.scoreboard.record(score) {
                    info!("New high score: {}", score);
                }
                if sped_up {
                    info!("Speeding up to {}ms at score {}", session.period_ms(), score);
                    self.ticker.restart(period_of(session), now);
                }
            }
            StepResult::Collision(cause) => {
                self.ticker.stop();
                self.speaker.play(Cue::GameOver);
                info!("Game over: {} Final score: {}", cause, session.score());
                let session = std::mem::take(session);
                self.state = GameState::GameOver { session, cause };
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let score_text = match &self.state {
            GameState::Playing(session) | GameState::GameOver { session, .. } => format!(
                "SNEK    High Score: {}    Score: {}    Speed: {}ms",
                self.scoreboard.high_score(),
                session.score(),
                session.period_ms()
            ),
            _ => format!("SNEK    High Score: {}", self.scoreboard.high_score()),
        };

        let layout = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + High Score
                Constraint::Min(0),    // Game area
            ])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(score_text)
                .alignment(Alignment::Left)
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        match &self.state {
            GameState::ReadyToStart => {
                frame.render_widget(
                    Paragraph::new(self.menu_text())
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL)),
                    layout[1],
                );
            }
            GameState::Playing(session) => {
                let block = Block::default().title("Playing").borders(Borders::ALL);
                let inner_area = block.inner(layout[1]);

                frame.render_widget(block, layout[1]);
                self.render_arena(frame, session, inner_area);
            }
            GameState::GameOver { session, cause } => {
                let block = Block::default().title("Game Over").borders(Borders::ALL);
                let inner_area = block.inner(layout[1]);

                frame.render_widget(block, layout[1]);
                self.render_arena(frame, session, inner_area);
                frame.render_widget(
                    Paragraph::new(format!(
                        "GAME OVER\n{}\nFinal Score: {}\nSPACE to play again, M for menu",
                        cause,
                        session.score()
                    ))
                    .alignment(Alignment::Center),
                    inner_area,
                );
            }
            GameState::Exit => {}
        }
    }

    fn render_arena(&self, frame: &mut Frame, session: &Session, area: Rect) {
        let (width, height) = arena_extent(&self.config.arena);
        if area.width < width || area.height < height {
            frame.render_widget(
                Paragraph::new(format!(
                    "Terminal too small: the arena needs {}x{}, there is {}x{}",
                    width, height, area.width, area.height
                ))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
                area,
            );
            return;
        }
        frame.render_widget(session, area);
    }

    fn menu_text(&self) -> String {
        let arena = self.config.arena;
        let walls = if self.config.wall_mode {
            format!("on ({})", self.config.wall_count)
        } else {
            "off".to_string()
        };
        format!(
            "Press SPACE to start\n\n\
             Arrows/WASD steer, R restarts, Q back to this menu\n\
             X resets the high score, Esc quits\n\n\
             Grid {}x{}    Speed {}ms    Theme {}    Walls {}",
            arena.columns(),
            arena.rows(),
            self.config.initial_period_ms,
            self.config.theme.name(),
            walls
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chime::Mute;
    use crate::score::MemoryStore;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use rand::SeedableRng;

    fn game_with(config: GameConfig) -> Game {
        Game::new(
            config,
            Scoreboard::new(Box::new(MemoryStore::default())),
            Box::new(Mute),
            StdRng::seed_from_u64(99),
        )
    }

    fn press(game: &mut Game, code: KeyCode, now: Instant) {
        game.handle_input(KeyEvent::new(code, KeyModifiers::NONE), now);
    }

    fn session(game: &Game) -> &Session {
        match &game.state {
            GameState::Playing(session) | GameState::GameOver { session, .. } => session,
            other => panic!("no session in {:?}", other),
        }
    }

    /// Ticks until the game ends, moving the clock well past every period.
    fn play_until_over(game: &mut Game, mut now: Instant) -> Instant {
        for _ in 0..100 {
            if !matches!(game.state, GameState::Playing(_)) {
                break;
            }
            now += Duration::from_secs(1);
            game.on_timer(now);
        }
        now
    }

    fn screen_text(game: &Game) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|f| game.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_start_from_menu() {
        let mut game = game_with(GameConfig::default());
        let now = Instant::now();
        assert!(matches!(game.state, GameState::ReadyToStart));
        assert!(!game.ticker.fire(now + Duration::from_secs(1)));

        press(&mut game, KeyCode::Char(' '), now);

        assert!(matches!(game.state, GameState::Playing(_)));
        assert_eq!(game.ticker.period(), Some(Duration::from_millis(150)));
    }

    #[test]
    fn test_ticks_move_the_snake() {
        let mut game = game_with(GameConfig::default());
        let now = Instant::now();
        press(&mut game, KeyCode::Enter, now);
        let start = session(&game).head();

        game.on_timer(now + Duration::from_millis(10));
        assert_eq!(session(&game).head(), start, "not due yet");

        game.on_timer(now + Duration::from_millis(150));
        assert_ne!(session(&game).head(), start);
    }

    #[test]
    fn test_game_over_stops_timer() {
        let mut game = game_with(GameConfig::default());
        let now = Instant::now();
        press(&mut game, KeyCode::Char(' '), now);
        press(&mut game, KeyCode::Up, now);

        let now = play_until_over(&mut game, now);

        match &game.state {
            GameState::GameOver { session, cause } => {
                assert_eq!(*cause, Collision::Boundary);
                assert_eq!(session.head().y, 0);
            }
            other => panic!("expected game over, got {:?}", other),
        }
        assert_eq!(game.ticker.period(), None);
        assert!(game.scoreboard.high_score() >= session(&game).score());

        // no more ticks until a restart
        let head = session(&game).head();
        game.on_timer(now + Duration::from_secs(5));
        assert_eq!(session(&game).head(), head);
    }

    #[test]
    fn test_play_again_after_game_over() {
        let mut game = game_with(GameConfig::default());
        let now = Instant::now();
        press(&mut game, KeyCode::Char(' '), now);
        press(&mut game, KeyCode::Char('w'), now);
        let now = play_until_over(&mut game, now);

        press(&mut game, KeyCode::Char(' '), now);

        assert!(matches!(game.state, GameState::Playing(_)));
        assert_eq!(session(&game).score(), 0);
        assert_eq!(session(&game).snake().len(), 1);
        assert!(game.ticker.period().is_some());
    }

    #[test]
    fn test_restart_while_playing() {
        let mut game = game_with(GameConfig::default());
        let now = Instant::now();
        press(&mut game, KeyCode::Char(' '), now);
        let start = session(&game).head();
        game.on_timer(now + Duration::from_millis(150));
        game.on_timer(now + Duration::from_millis(300));
        assert_ne!(session(&game).head(), start);

        press(&mut game, KeyCode::Char('r'), now + Duration::from_millis(310));

        assert!(matches!(game.state, GameState::Playing(_)));
        assert_eq!(session(&game).head(), start);
        assert_eq!(session(&game).period_ms(), 150);
    }

    #[test]
    fn test_reversal_key_is_ignored() {
        let mut game = game_with(GameConfig::default());
        let now = Instant::now();
        press(&mut game, KeyCode::Char(' '), now);
        let start = session(&game).head();

        press(&mut game, KeyCode::Left, now);
        game.on_timer(now + Duration::from_millis(150));

        let head = session(&game).head();
        assert_eq!(head.y, start.y);
        assert_eq!(head.x, start.x + 20);
    }

    #[test]
    fn test_menu_and_exit_keys() {
        let mut game = game_with(GameConfig::default());
        let now = Instant::now();
        press(&mut game, KeyCode::Char(' '), now);

        press(&mut game, KeyCode::Char('m'), now);
        assert!(matches!(game.state, GameState::ReadyToStart));
        assert_eq!(game.ticker.period(), None);

        press(&mut game, KeyCode::Esc, now);
        assert!(matches!(game.state, GameState::Exit));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut game = game_with(GameConfig::default());
        let mut release = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        game.handle_input(release, Instant::now());

        assert!(matches!(game.state, GameState::ReadyToStart));
    }

    #[test]
    fn test_reset_high_score_from_menu() {
        let mut game = game_with(GameConfig::default());
        game.scoreboard.record(12);

        press(&mut game, KeyCode::Char('x'), Instant::now());

        assert_eq!(game.scoreboard.high_score(), 0);
    }

    #[test]
    fn test_screens_render() {
        let mut game = game_with(GameConfig::default());
        let now = Instant::now();
        assert!(screen_text(&game).contains("Press SPACE to start"));

        press(&mut game, KeyCode::Char(' '), now);
        assert!(screen_text(&game).contains("Score: 0"));

        press(&mut game, KeyCode::Up, now);
        play_until_over(&mut game, now);
        let text = screen_text(&game);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("You hit the boundary."));
    }

    #[test]
    fn test_small_terminal_notice() {
        let config = GameConfig {
            arena: crate::arena::Arena {
                width: 800,
                height: 800,
                grid: 20,
            },
            ..GameConfig::default()
        };
        let mut game = game_with(config);
        press(&mut game, KeyCode::Char(' '), Instant::now());

        assert!(screen_text(&game).contains("Terminal too small"));
    }
}
