use std::collections::VecDeque;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::arena::{Cell, Direction};
use crate::config::GameConfig;

/// Random samples tried before food falls back to the origin.
pub const FOOD_ATTEMPTS: usize = 100;
/// Random samples tried per wall before walls are drawn from the free cells.
pub const WALL_ATTEMPTS: usize = 100;
/// The tick period shrinks by this much every `SPEED_UP_EVERY` points.
pub const SPEED_STEP_MS: u64 = 10;
pub const SPEED_UP_EVERY: u32 = 5;
pub const MIN_PERIOD_MS: u64 = 50;

/// Why a game ended.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Collision {
    #[error("You hit the boundary.")]
    Boundary,
    #[error("You ran into yourself.")]
    Body,
    #[error("You hit a wall block.")]
    Wall,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StepResult {
    Ongoing,                                 // Moved, same length
    Nommed { score: u32, sped_up: bool },    // Ate the food and grew
    Collision(Collision),                    // Game over
}

/// One game in progress: the snake, its food, the walls and the score.
///
/// Nothing in here draws, plays sounds or touches the disk; the caller turns
/// the `StepResult` of each tick into those effects.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    snake: VecDeque<Cell>,
    heading: Direction,
    next_direction: Direction,
    food: Cell,
    walls: Vec<Cell>,
    score: u32,
    period_ms: u64,
    collision: Option<Collision>,
}

impl Default for Session {
    fn default() -> Self {
        let config = GameConfig::default();
        Session {
            snake: VecDeque::from([config.arena.start_cell()]),
            heading: Direction::Right,
            next_direction: Direction::Right,
            food: Cell::ORIGIN,
            walls: Vec::new(),
            score: 0,
            period_ms: config.initial_period_ms,
            collision: None,
            config,
        }
    }
}

impl Session {
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Self {
        let mut session = Session::default();
        session.reset(config, rng);
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &VecDeque<Cell> {
        &self.snake
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn walls(&self) -> &[Cell] {
        &self.walls
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Starts over with a one-cell snake heading right.
    pub fn reset(&mut self, config: GameConfig, rng: &mut impl Rng) {
        self.snake = VecDeque::from([config.arena.start_cell()]);
        self.heading = Direction::Right;
        self.next_direction = Direction::Right;
        self.score = 0;
        self.period_ms = config.initial_period_ms;
        self.collision = None;
        self.walls.clear();
        self.config = config;

        self.food = self.place_food(rng);
        if self.config.wall_mode {
            self.walls = self.place_walls(self.config.wall_count, rng);
        }
    }

    /// Buffers a direction for the next tick. Reversing the current heading
    /// is ignored; anything else replaces the buffered request.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if requested != self.heading.opposite() {
            self.next_direction = requested;
            true
        } else {
            false
        }
    }

    /// Advances the game by one step.
    pub fn tick(&mut self, rng: &mut impl Rng) -> StepResult {
        if let Some(collision) = self.collision {
            return StepResult::Collision(collision);
        }

        let direction = self.next_direction;
        let new_head = self
            .head()
            .offset(direction.delta(self.config.arena.grid));

        if let Some(collision) = self.collision_at(new_head) {
            debug!("Collision at {:?}: {:?}", new_head, collision);
            self.collision = Some(collision);
            return StepResult::Collision(collision);
        }

        self.heading = direction;
        self.snake.push_front(new_head);

        if new_head != self.food {
            self.snake.pop_back();
            return StepResult::Ongoing;
        }

        self.score += 1;
        self.food = self.place_food(rng);
        let sped_up = self.score % SPEED_UP_EVERY == 0 && self.speed_up();
        StepResult::Nommed {
            score: self.score,
            sped_up,
        }
    }

    // The body is checked before the tail moves, so chasing your own tail
    // into the cell it is about to leave still counts as a hit.
    fn collision_at(&self, pos: Cell) -> Option<Collision> {
        if !self.config.arena.contains(pos) {
            Some(Collision::Boundary)
        } else if self.snake.contains(&pos) {
            Some(Collision::Body)
        } else if self.config.wall_mode && self.walls.contains(&pos) {
            Some(Collision::Wall)
        } else {
            None
        }
    }

    fn speed_up(&mut self) -> bool {
        let faster = self
            .period_ms
            .saturating_sub(SPEED_STEP_MS)
            .max(MIN_PERIOD_MS);
        if faster < self.period_ms {
            self.period_ms = faster;
            true
        } else {
            false
        }
    }

    /// Picks a free cell for the food. Gives up after `FOOD_ATTEMPTS` random
    /// tries and settles for the origin, even if the snake is there.
    pub fn place_food(&self, rng: &mut impl Rng) -> Cell {
        let arena = self.config.arena;
        for _ in 0..FOOD_ATTEMPTS {
            let pos = arena.random_cell(rng);
            if !self.snake.contains(&pos) {
                return pos;
            }
        }

        warn!(
            "No free cell for food after {} attempts, using {:?}",
            FOOD_ATTEMPTS,
            Cell::ORIGIN
        );
        Cell::ORIGIN
    }

    /// Picks `count` distinct cells clear of the snake and the food.
    ///
    /// Random sampling is tried first; once it runs out of attempts the rest
    /// are chosen among the cells still free, so this always terminates.
    /// Returns fewer walls only when the arena has no room for more.
    pub fn place_walls(&self, count: usize, rng: &mut impl Rng) -> Vec<Cell> {
        let arena = self.config.arena;
        let mut walls = Vec::with_capacity(count.min(arena.cell_count()));

        let mut attempts = count.saturating_mul(WALL_ATTEMPTS);
        while walls.len() < count && attempts > 0 {
            attempts -= 1;
            let pos = arena.random_cell(rng);
            if self.is_clear_for_wall(pos, &walls) {
                walls.push(pos);
            }
        }

        if walls.len() < count {
            let free: Vec<Cell> = arena
                .cells()
                .filter(|&pos| self.is_clear_for_wall(pos, &walls))
                .collect();
            let missing = count - walls.len();
            if free.len() < missing {
                warn!(
                    "Only room for {} of {} walls",
                    walls.len() + free.len(),
                    count
                );
            }
            walls.extend(free.choose_multiple(rng, missing).copied());
        }

        walls
    }

    fn is_clear_for_wall(&self, pos: Cell, walls: &[Cell]) -> bool {
        pos != self.food && !self.snake.contains(&pos) && !walls.contains(&pos)
    }
}
