use std::io::Write;

use crossterm::{execute, style::Print};
use log::{trace, warn};

/// Sound effects the game asks for. Nobody waits for them to finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Move,
    Eat,
    GameOver,
}

pub trait Speaker {
    fn play(&mut self, cue: Cue);
}

/// Rings the terminal bell for food and for game over. Moves stay quiet.
pub struct Bell<W: Write> {
    out: W,
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Bell { out }
    }
}

impl<W: Write> Speaker for Bell<W> {
    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Move => trace!("move"),
            Cue::Eat | Cue::GameOver => {
                if let Err(e) = execute!(self.out, Print('\x07')) {
                    warn!("Could not ring the bell for {:?}: {}", cue, e);
                }
            }
        }
    }
}

pub struct Mute;

impl Speaker for Mute {
    fn play(&mut self, cue: Cue) {
        trace!("muted {:?}", cue);
    }
}
