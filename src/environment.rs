use std::fmt;

use crate::error::TortoiseError;

/// What the tortoise believes occupies a grid cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Unknown,
    Ground,
    /// Permanent boundary of the world.
    Wall,
    Food,
    Water,
    /// Stone or anything else blocking the way, discovered by bumping into it.
    Obstacle,
}

impl Cell {
    pub fn is_known(self) -> bool {
        self != Cell::Unknown
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Unknown => '?',
            Cell::Ground => '.',
            Cell::Wall => 'X',
            Cell::Food => 'l',
            Cell::Water => 'p',
            Cell::Obstacle => 's',
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Pos {
        Pos { x: self.x + dx, y: self.y + dy }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// `[x, y]` index into a square grid of side `size`, if the position lies on it.
    pub fn index(self, size: usize) -> Option<[usize; 2]> {
        let inside = |v: i32| v >= 0 && (v as usize) < size;
        if inside(self.x) && inside(self.y) {
            Some([self.x as usize, self.y as usize])
        } else {
            None
        }
    }
}

// Facing, in the simulator's numbering: 0 north, 1 east, 2 south, 3 west
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

const DIRECTION_TABLE: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

impl Direction {
    pub fn into_vector(self) -> (i32, i32) {
        DIRECTION_TABLE[self as usize]
    }
}

impl TryFrom<u8> for Direction {
    type Error = TortoiseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::North),
            1 => Ok(Direction::East),
            2 => Ok(Direction::South),
            3 => Ok(Direction::West),
            _ => Err(TortoiseError::InvalidSensor(format!(
                "facing code {} is not one of 0..=3",
                code
            ))),
        }
    }
}

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Eat,
    Drink,
    TurnLeft,
    TurnRight,
    Forward,
    Wait,
}

impl Action {
    /// Actions that never depend on what lies ahead.
    pub const ALWAYS_LEGAL: [Action; 5] = [
        Action::Eat,
        Action::Drink,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Wait,
    ];

    pub fn actions() -> Vec<Action> {
        vec![
            Action::Eat,
            Action::Drink,
            Action::TurnLeft,
            Action::TurnRight,
            Action::Forward,
            Action::Wait,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Eat => "eat",
            Action::Drink => "drink",
            Action::TurnLeft => "left",
            Action::TurnRight => "right",
            Action::Forward => "forward",
            Action::Wait => "wait",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_vectors_follow_the_grid_convention() {
        assert_eq!(Direction::North.into_vector(), (0, -1));
        assert_eq!(Direction::East.into_vector(), (1, 0));
        assert_eq!(Direction::South.into_vector(), (0, 1));
        assert_eq!(Direction::West.into_vector(), (-1, 0));
    }

    #[test]
    fn facing_codes_out_of_range_are_rejected() {
        assert_eq!(Direction::try_from(2).unwrap(), Direction::South);
        assert!(Direction::try_from(4).is_err());
    }

    #[test]
    fn index_rejects_positions_off_the_grid() {
        assert_eq!(Pos::new(1, 3).index(5), Some([1, 3]));
        assert_eq!(Pos::new(-1, 0).index(5), None);
        assert_eq!(Pos::new(0, 5).index(5), None);
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Pos::new(0, 0).manhattan(Pos::new(3, -4)), 7);
    }
}
