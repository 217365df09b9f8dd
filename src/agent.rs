use std::hash::{Hash, Hasher};

use crate::environment::{Direction, Pos};
use crate::sensor::{Sensor, MAX_LEVEL};

/// What the tortoise knows about itself after the latest tick.
///
/// Two states are the same decision context when the tortoise stands on the
/// same cell facing the same way, so equality and hashing only look at
/// `pos` and `direction`.
#[derive(Debug, Clone, Copy)]
pub struct AgentState {
    pub pos: Pos,
    pub direction: Direction,
    pub thirst_level: u8,
    pub health_level: u8,
    pub path_clear_ahead: bool,
    pub food_ahead: bool,
    pub food_here: bool,
    pub water_ahead: bool,
    pub water_here: bool,
}

impl AgentState {
    pub fn new(pos: Pos, direction: Direction) -> Self {
        Self {
            pos,
            direction,
            thirst_level: MAX_LEVEL,
            health_level: MAX_LEVEL,
            path_clear_ahead: false,
            food_ahead: false,
            food_here: false,
            water_ahead: false,
            water_here: false,
        }
    }

    pub fn observe(&mut self, sensor: &Sensor) {
        self.pos = sensor.position;
        self.direction = sensor.facing;
        self.thirst_level = sensor.thirst_level;
        self.health_level = sensor.health_level;
        self.path_clear_ahead = sensor.path_clear_ahead;
        self.food_ahead = sensor.food_ahead;
        self.food_here = sensor.food_here;
        self.water_ahead = sensor.water_ahead;
        self.water_here = sensor.water_here;
    }

    pub fn ahead(&self) -> Pos {
        self.pos.offset(self.direction.into_vector())
    }
}

impl PartialEq for AgentState {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && self.direction == other.direction
    }
}

impl Eq for AgentState {}

impl Hash for AgentState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
        self.direction.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity_ignores_gauges_and_flags() {
        let a = AgentState::new(Pos::new(1, 1), Direction::South);
        let mut b = a;
        b.thirst_level = 3;
        b.food_here = true;
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn facing_distinguishes_states() {
        let a = AgentState::new(Pos::new(1, 1), Direction::South);
        let b = AgentState::new(Pos::new(1, 1), Direction::North);
        assert_ne!(a, b);
    }

    #[test]
    fn observe_copies_the_snapshot() {
        let mut sensor = Sensor::at(Pos::new(3, 2), Direction::West);
        sensor.thirst_level = 40;
        sensor.water_ahead = true;
        let mut state = AgentState::new(Pos::new(0, 0), Direction::North);
        state.observe(&sensor);
        assert_eq!(state.pos, Pos::new(3, 2));
        assert_eq!(state.ahead(), Pos::new(2, 2));
        assert_eq!(state.thirst_level, 40);
        assert!(state.water_ahead);
    }
}
