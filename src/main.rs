mod arena;
mod chime;
mod config;
mod engine;
mod game;
mod render;
mod score;
mod theme;
mod ticker;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use ratatui::prelude::*;
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::io;
use std::time::Instant;

use crate::chime::{Bell, Mute, Speaker};
use crate::config::Args;
use crate::game::{Game, GameState};
use crate::score::{FileStore, HighScoreStore, MemoryStore, Scoreboard};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.game_config()?;

    // Set up logging before anything else
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("cannot create log file {:?}", args.log_file))?;
    WriteLogger::init(args.log_level, Config::default(), log_file)
        .context("failed to initialize logger")?;

    info!("Starting Snekwalls with {:?}", config);

    let store: Box<dyn HighScoreStore> = if args.no_persist {
        Box::new(MemoryStore::default())
    } else {
        Box::new(FileStore::new(&args.high_score_file))
    };
    let speaker: Box<dyn Speaker> = if args.mute {
        Box::new(Mute)
    } else {
        Box::new(Bell::new(io::stdout()))
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(config, Scoreboard::new(store), speaker, rng);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut game);

    // Cleanup terminal, even if the game loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    info!("Exiting");
    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, game: &mut Game) -> io::Result<()> {
    loop {
        terminal.draw(|f| game.render(f))?;

        // Wait for input, but never past the next tick
        if event::poll(game.timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                game.handle_input(key, Instant::now());
            }
        }

        game.on_timer(Instant::now());

        if let GameState::Exit = game.state {
            break;
        }
    }
    Ok(())
}
