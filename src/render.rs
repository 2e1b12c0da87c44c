use ratatui::prelude::*;

use crate::arena::{Arena, Cell};
use crate::engine::Session;

/// Terminal columns per grid cell, so cells come out roughly square.
pub const CELL_WIDTH: u16 = 2;

/// Terminal columns and rows needed to show the whole arena.
pub fn arena_extent(arena: &Arena) -> (u16, u16) {
    let columns = u16::try_from(arena.columns()).unwrap_or(u16::MAX);
    let rows = u16::try_from(arena.rows()).unwrap_or(u16::MAX);
    (columns.saturating_mul(CELL_WIDTH), rows)
}

impl Widget for &Session {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let config = self.config();
        let palette = config.theme.palette();
        let (width, height) = arena_extent(&config.arena);
        let field = Rect {
            width: width.min(area.width),
            height: height.min(area.height),
            ..area
        };

        buf.set_style(field, Style::default().bg(palette.background));

        if config.wall_mode {
            for wall in self.walls() {
                paint(buf, field, config.arena.grid, *wall, palette.wall);
            }
        }

        paint(buf, field, config.arena.grid, self.food(), palette.food);

        for segment in self.snake() {
            paint(buf, field, config.arena.grid, *segment, palette.snake);
        }
    }
}

fn paint(buf: &mut Buffer, field: Rect, grid: i32, cell: Cell, color: Color) {
    if cell.x < 0 || cell.y < 0 {
        return;
    }
    let column = (cell.x / grid) as u32 * CELL_WIDTH as u32;
    let row = (cell.y / grid) as u32;

    for offset in 0..CELL_WIDTH as u32 {
        let x = field.x as u32 + column + offset;
        let y = field.y as u32 + row;
        if x < field.right() as u32 && y < field.bottom() as u32 {
            buf[(x as u16, y as u16)].set_symbol(" ").set_bg(color);
        }
    }
}
