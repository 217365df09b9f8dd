//! The tortoise's belief about the world, rebuilt tick by tick from local
//! sensor snapshots.

use ndarray::Array2;

use crate::agent::AgentState;
use crate::environment::{Cell, Direction, Pos};
use crate::error::{Result, TortoiseError};
use crate::sensor::Sensor;

/// Smallest grid with at least one cell inside the boundary wall.
pub const MIN_GRID_SIZE: usize = 3;

#[derive(Debug, Clone)]
pub struct SpatialMemory {
    size: usize,
    map: Array2<Cell>,
    food: Vec<Pos>,
    water: Vec<Pos>,
    threat: Option<Pos>,
    agent: AgentState,
}

impl SpatialMemory {
    /// A blank memory: boundary cells are `Wall`, everything else `Unknown`.
    pub fn new(size: usize) -> Result<Self> {
        if size < MIN_GRID_SIZE {
            return Err(TortoiseError::InvalidConfig {
                name: "grid_size".to_string(),
                reason: format!("must be at least {}, got {}", MIN_GRID_SIZE, size),
            });
        }
        let last = size - 1;
        let map = Array2::from_shape_fn((size, size), |(x, y)| {
            if x == 0 || y == 0 || x == last || y == last {
                Cell::Wall
            } else {
                Cell::Unknown
            }
        });
        let center = (size / 2) as i32;
        Ok(Self {
            size,
            map,
            food: Vec::new(),
            water: Vec::new(),
            threat: None,
            agent: AgentState::new(Pos::new(center, center), Direction::North),
        })
    }

    /// Folds one tick of readings into the map and entity memory.
    ///
    /// A snapshot that breaks the sensor contract is rejected before
    /// anything is touched.
    pub fn update(&mut self, sensor: &Sensor) -> Result<()> {
        sensor.validate(self.size)?;
        self.agent.observe(sensor);

        let here = sensor.position;
        if sensor.food_here {
            self.mark_food(here);
        } else if sensor.water_here {
            self.mark_water(here);
        } else {
            self.mark(here, Cell::Ground);
        }

        let ahead = sensor.ahead();
        if sensor.food_ahead {
            self.mark_food(ahead);
        } else if sensor.water_ahead {
            self.mark_water(ahead);
        } else if sensor.path_clear_ahead {
            self.mark(ahead, Cell::Ground);
        } else if self.cell(ahead) == Some(Cell::Unknown) {
            self.mark(ahead, Cell::Obstacle);
        }

        self.threat = Some(locate_threat(sensor));
        Ok(())
    }

    fn mark(&mut self, pos: Pos, cell: Cell) {
        if let Some(idx) = pos.index(self.size) {
            // The boundary is permanent
            if self.map[idx] != Cell::Wall {
                self.map[idx] = cell;
            }
        }
    }

    fn mark_food(&mut self, pos: Pos) {
        self.mark(pos, Cell::Food);
        if !self.food.contains(&pos) {
            self.food.push(pos);
        }
    }

    fn mark_water(&mut self, pos: Pos) {
        self.mark(pos, Cell::Water);
        if !self.water.contains(&pos) {
            self.water.push(pos);
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn area(&self) -> usize {
        self.size * self.size
    }

    /// Largest Manhattan distance between two cells of the grid.
    pub fn max_distance(&self) -> u32 {
        2 * (self.size as u32 - 1)
    }

    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        pos.index(self.size).map(|idx| self.map[idx])
    }

    pub fn map(&self) -> &Array2<Cell> {
        &self.map
    }

    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    /// Every food location ever seen, in discovery order.
    pub fn food(&self) -> &[Pos] {
        &self.food
    }

    pub fn water(&self) -> &[Pos] {
        &self.water
    }

    /// Food locations the map still believes hold food.
    pub fn known_food(&self) -> impl Iterator<Item = Pos> + '_ {
        self.food
            .iter()
            .copied()
            .filter(move |p| self.cell(*p) == Some(Cell::Food))
    }

    pub fn threat(&self) -> Option<Pos> {
        self.threat
    }

    pub fn nearest_food(&self, from: Pos) -> Option<u32> {
        self.known_food().map(|p| from.manhattan(p)).min()
    }

    pub fn nearest_water(&self, from: Pos) -> Option<u32> {
        self.water.iter().map(|p| from.manhattan(*p)).min()
    }

    /// Fraction of grid cells that are no longer `Unknown`.
    pub fn exploration_ratio(&self) -> f32 {
        let known = self.map.iter().filter(|c| c.is_known()).count();
        known as f32 / self.area() as f32
    }

    /// One line per grid row, `y` growing downwards.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.area() * 2);
        for y in 0..self.size {
            for x in 0..self.size {
                out.push(self.map[[x, y]].symbol());
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

/// Rotates the relative threat offsets into absolute coordinates.
fn locate_threat(sensor: &Sensor) -> Pos {
    let (dx, dy) = sensor.facing.into_vector();
    let Pos { x, y } = sensor.position;
    if dx == 0 {
        Pos::new(
            x - dy * sensor.threat_lateral,
            y + dy * sensor.threat_forward,
        )
    } else {
        Pos::new(
            x + dx * sensor.threat_forward,
            y + dx * sensor.threat_lateral,
        )
    }
}
