use clap::ValueEnum;
use ratatui::style::Color;

const WALL_COLOR: Color = Color::Rgb(0x66, 0x66, 0x66);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    #[default]
    Classic,
    Neon,
    Ice,
}

/// Colors used to paint one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub snake: Color,
    pub food: Color,
    pub background: Color,
    pub wall: Color,
}

impl Theme {
    pub fn palette(self) -> Palette {
        let (snake, food, background) = match self {
            Theme::Classic => (
                Color::Rgb(0x33, 0xff, 0x33),
                Color::Rgb(0xff, 0x00, 0x00),
                Color::Rgb(0x22, 0x22, 0x22),
            ),
            Theme::Neon => (
                Color::Rgb(0xff, 0x00, 0xff),
                Color::Rgb(0x00, 0xff, 0xff),
                Color::Rgb(0x00, 0x00, 0x00),
            ),
            Theme::Ice => (
                Color::Rgb(0x00, 0xcc, 0xff),
                Color::Rgb(0xff, 0xff, 0xff),
                Color::Rgb(0x1e, 0x1e, 0x2f),
            ),
        };
        Palette {
            snake,
            food,
            background,
            wall: WALL_COLOR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Neon => "neon",
            Theme::Ice => "ice",
        }
    }
}
