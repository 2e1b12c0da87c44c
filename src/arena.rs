use rand::Rng;

/// Where a fresh snake spawns, before snapping to the grid.
const START_X: i32 = 160;
const START_Y: i32 = 160;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Velocity of one step when cells are `grid` pixels wide.
    pub fn delta(&self, grid: i32) -> CellDelta {
        match self {
            Direction::Up => CellDelta { x: 0, y: -grid },
            Direction::Down => CellDelta { x: 0, y: grid },
            Direction::Left => CellDelta { x: -grid, y: 0 },
            Direction::Right => CellDelta { x: grid, y: 0 },
        }
    }
}

/// A grid-aligned position, in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellDelta {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(&self, delta: CellDelta) -> Cell {
        Cell {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }
}

/// The playing field: a `width` x `height` pixel canvas cut into square
/// cells of `grid` pixels. Unlike a wrapping field, leaving it is fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
    pub grid: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Arena {
            width: 400,
            height: 400,
            grid: 20,
        }
    }
}

impl Arena {
    pub fn columns(&self) -> i32 {
        self.width / self.grid
    }

    pub fn rows(&self) -> i32 {
        self.height / self.grid
    }

    pub fn cell_count(&self) -> usize {
        (self.columns() as usize) * (self.rows() as usize)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn random_cell(&self, rng: &mut impl Rng) -> Cell {
        Cell {
            x: rng.gen_range(0..self.columns()) * self.grid,
            y: rng.gen_range(0..self.rows()) * self.grid,
        }
    }

    /// Every cell of the arena, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.columns()).map(move |col| Cell {
                x: col * self.grid,
                y: row * self.grid,
            })
        })
    }

    /// Spawn cell, snapped down to the grid and pulled inside small arenas.
    pub fn start_cell(&self) -> Cell {
        let snap = |value: i32, extent: i32| {
            let last = (extent / self.grid - 1).max(0) * self.grid;
            (value / self.grid * self.grid).min(last)
        };
        Cell {
            x: snap(START_X, self.width),
            y: snap(START_Y, self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_opposite_directions() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);

        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_deltas_scale_with_grid() {
        let origin = Cell::new(100, 100);
        assert_eq!(origin.offset(Direction::Up.delta(20)), Cell::new(100, 80));
        assert_eq!(origin.offset(Direction::Down.delta(20)), Cell::new(100, 120));
        assert_eq!(origin.offset(Direction::Left.delta(25)), Cell::new(75, 100));
        assert_eq!(origin.offset(Direction::Right.delta(10)), Cell::new(110, 100));
    }

    #[test]
    fn test_contains_edges() {
        let arena = Arena::default();

        assert!(arena.contains(Cell::new(0, 0)));
        assert!(arena.contains(Cell::new(380, 380)));
        assert!(!arena.contains(Cell::new(-20, 0)));
        assert!(!arena.contains(Cell::new(0, -20)));
        assert!(!arena.contains(Cell::new(400, 0)));
        assert!(!arena.contains(Cell::new(0, 400)));
    }

    #[test]
    fn test_non_square_arena() {
        let arena = Arena {
            width: 300,
            height: 200,
            grid: 50,
        };
        assert_eq!(arena.columns(), 6);
        assert_eq!(arena.rows(), 4);
        assert_eq!(arena.cell_count(), 24);
        assert_eq!(arena.cells().count(), 24);
        assert_eq!(arena.cells().last(), Some(Cell::new(250, 150)));
    }

    #[test]
    fn test_random_cells_are_aligned_and_inside() {
        let arena = Arena {
            width: 120,
            height: 60,
            grid: 30,
        };
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let cell = arena.random_cell(&mut rng);
            assert!(arena.contains(cell), "{cell:?} outside arena");
            assert_eq!(cell.x % 30, 0);
            assert_eq!(cell.y % 30, 0);
        }
    }

    #[test]
    fn test_start_cell() {
        assert_eq!(Arena::default().start_cell(), Cell::new(160, 160));

        // 160 is not a multiple of 25
        let coarse = Arena {
            width: 400,
            height: 400,
            grid: 25,
        };
        assert_eq!(coarse.start_cell(), Cell::new(150, 150));

        let tiny = Arena {
            width: 100,
            height: 60,
            grid: 20,
        };
        assert_eq!(tiny.start_cell(), Cell::new(80, 40));
        assert!(tiny.contains(tiny.start_cell()));
    }
}
