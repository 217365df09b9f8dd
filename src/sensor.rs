//! Sensor snapshots delivered by the simulator once per tick.

use serde::Deserialize;

use crate::environment::{Direction, Pos};
use crate::error::{Result, TortoiseError};

/// Upper bound of the thirst and health gauges.
pub const MAX_LEVEL: u8 = 100;

/// One tick of local readings, already checked for well-formed values.
///
/// Thirst is the amount of water left in the body: 100 is fully
/// quenched, 0 is dying of thirst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sensor {
    pub position: Pos,
    pub facing: Direction,
    pub path_clear_ahead: bool,
    pub food_ahead: bool,
    pub food_here: bool,
    pub water_ahead: bool,
    pub water_here: bool,
    pub thirst_level: u8,
    pub health_level: u8,
    /// Cells in front of (positive) or behind (negative) the tortoise.
    pub threat_forward: i32,
    /// Cells to the right of (positive) or left of (negative) the tortoise.
    pub threat_lateral: i32,
}

impl Sensor {
    /// A calm snapshot: nothing around, path clear, threat far behind.
    pub fn at(position: Pos, facing: Direction) -> Self {
        Sensor {
            position,
            facing,
            path_clear_ahead: true,
            food_ahead: false,
            food_here: false,
            water_ahead: false,
            water_here: false,
            thirst_level: MAX_LEVEL,
            health_level: MAX_LEVEL,
            threat_forward: 0,
            threat_lateral: 0,
        }
    }

    pub fn ahead(&self) -> Pos {
        self.position.offset(self.facing.into_vector())
    }

    /// Checks the snapshot against a square grid of side `grid_size`.
    ///
    /// Both the tortoise's cell and the cell it faces must lie on the grid,
    /// and both gauges must be within `0..=100`.
    pub fn validate(&self, grid_size: usize) -> Result<()> {
        if self.position.index(grid_size).is_none() {
            return Err(TortoiseError::InvalidSensor(format!(
                "position ({}, {}) is outside a {}x{} grid",
                self.position.x, self.position.y, grid_size, grid_size
            )));
        }
        let ahead = self.ahead();
        if ahead.index(grid_size).is_none() {
            return Err(TortoiseError::InvalidSensor(format!(
                "cell ahead ({}, {}) is outside a {}x{} grid",
                ahead.x, ahead.y, grid_size, grid_size
            )));
        }
        if self.thirst_level > MAX_LEVEL {
            return Err(TortoiseError::InvalidSensor(format!(
                "thirst level {} exceeds {}",
                self.thirst_level, MAX_LEVEL
            )));
        }
        if self.health_level > MAX_LEVEL {
            return Err(TortoiseError::InvalidSensor(format!(
                "health level {} exceeds {}",
                self.health_level, MAX_LEVEL
            )));
        }
        Ok(())
    }
}

/// Wire form of a snapshot, one CSV row per tick.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorRecord {
    pub x: i32,
    pub y: i32,
    pub facing: u8,
    pub path_clear_ahead: bool,
    pub food_ahead: bool,
    pub food_here: bool,
    pub water_ahead: bool,
    pub water_here: bool,
    pub thirst_level: u8,
    pub health_level: u8,
    pub threat_forward: i32,
    pub threat_lateral: i32,
}

impl TryFrom<SensorRecord> for Sensor {
    type Error = TortoiseError;

    fn try_from(r: SensorRecord) -> Result<Self> {
        Ok(Sensor {
            position: Pos::new(r.x, r.y),
            facing: Direction::try_from(r.facing)?,
            path_clear_ahead: r.path_clear_ahead,
            food_ahead: r.food_ahead,
            food_here: r.food_here,
            water_ahead: r.water_ahead,
            water_here: r.water_here,
            thirst_level: r.thirst_level,
            health_level: r.health_level,
            threat_forward: r.threat_forward,
            threat_lateral: r.threat_lateral,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calm_snapshot_in_the_middle_is_valid() {
        let s = Sensor::at(Pos::new(2, 2), Direction::North);
        assert!(s.validate(5).is_ok());
        assert_eq!(s.ahead(), Pos::new(2, 1));
    }

    #[test]
    fn facing_off_the_edge_is_rejected() {
        let s = Sensor::at(Pos::new(0, 2), Direction::West);
        assert!(matches!(s.validate(5), Err(TortoiseError::InvalidSensor(_))));
    }

    #[test]
    fn position_off_the_grid_is_rejected() {
        let s = Sensor::at(Pos::new(7, 2), Direction::North);
        assert!(s.validate(5).is_err());
    }

    #[test]
    fn gauges_above_one_hundred_are_rejected() {
        let mut s = Sensor::at(Pos::new(2, 2), Direction::North);
        s.thirst_level = 101;
        assert!(s.validate(5).is_err());
        s.thirst_level = 100;
        s.health_level = 200;
        assert!(s.validate(5).is_err());
    }

    #[test]
    fn csv_rows_decode_into_sensors() {
        let data = "x,y,facing,path_clear_ahead,food_ahead,food_here,water_ahead,water_here,thirst_level,health_level,threat_forward,threat_lateral\n\
                    2,3,1,true,false,true,false,false,80,90,-2,1\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: SensorRecord = reader.deserialize().next().unwrap().unwrap();
        let sensor = Sensor::try_from(record).unwrap();
        assert_eq!(sensor.position, Pos::new(2, 3));
        assert_eq!(sensor.facing, Direction::East);
        assert!(sensor.food_here);
        assert_eq!(sensor.threat_forward, -2);
    }

    #[test]
    fn rows_with_missing_fields_fail_to_decode() {
        let data = "x,y,facing\n2,3,1\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: Option<std::result::Result<SensorRecord, csv::Error>> =
            reader.deserialize().next();
        assert!(record.unwrap().is_err());
    }
}
