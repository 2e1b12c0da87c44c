use std::fs;
use std::io;
use std::path::PathBuf;

use log::{error, info};

/// Somewhere to keep the high score between runs.
pub trait HighScoreStore {
    /// The stored score, or 0 if there is none.
    fn load(&self) -> u32;
    fn save(&mut self, score: u32);
    fn clear(&mut self);
}

/// Keeps the high score as a decimal number in a single file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse().unwrap_or_else(|e| {
                error!("Ignoring corrupt high score in {:?}: {}", self.path, e);
                0
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                error!("Error loading high score: {}", e);
                0
            }
        }
    }

    fn save(&mut self, score: u32) {
        if let Err(e) = fs::write(&self.path, score.to_string()) {
            error!("Error saving high score: {}", e);
        }
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => error!("Error clearing high score: {}", e),
        }
    }
}

/// Keeps the score in memory only; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    score: Option<u32>,
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.score.unwrap_or(0)
    }

    fn save(&mut self, score: u32) {
        self.score = Some(score);
    }

    fn clear(&mut self) {
        self.score = None;
    }
}

/// The best score so far, written through to a store whenever it is beaten.
pub struct Scoreboard {
    store: Box<dyn HighScoreStore>,
    high_score: u32,
}

impl Scoreboard {
    pub fn new(store: Box<dyn HighScoreStore>) -> Self {
        let high_score = store.load();
        info!("Loaded high score {}", high_score);
        Scoreboard { store, high_score }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Returns true when `score` is a new high score.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            self.store.save(score);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        info!("High score reset");
        self.high_score = 0;
        self.store.clear();
    }
}
