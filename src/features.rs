//! Hand-crafted features over the remembered world.
//!
//! Each feature describes the state the tortoise expects to be in after
//! taking the candidate action, so the linear value can tell actions apart:
//! stepping forward moves the measuring point one cell ahead, eating on food
//! restores health and uses the food up, drinking on water restores the
//! thirst gauge.

use crate::environment::{Action, Pos};
use crate::memory::SpatialMemory;
use crate::sensor::MAX_LEVEL;

pub const NUM_FEATURES: usize = 7;

/// Health regained by eating on a food cell.
pub const EAT_HEALTH_GAIN: u8 = 20;
/// Thirst gauge regained by drinking on a water cell.
pub const DRINK_THIRST_GAIN: u8 = 20;

pub type FeatureVector = [f32; NUM_FEATURES];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Feature {
    WaterDistance,
    ThreatDistance,
    FoodDistance,
    Exploration,
    RemainingFood,
    Health,
    Thirst,
}

impl Feature {
    /// Every feature, in weight-vector order.
    pub const ALL: [Feature; NUM_FEATURES] = [
        Feature::WaterDistance,
        Feature::ThreatDistance,
        Feature::FoodDistance,
        Feature::Exploration,
        Feature::RemainingFood,
        Feature::Health,
        Feature::Thirst,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::WaterDistance => "water_distance",
            Feature::ThreatDistance => "threat_distance",
            Feature::FoodDistance => "food_distance",
            Feature::Exploration => "exploration",
            Feature::RemainingFood => "remaining_food",
            Feature::Health => "health",
            Feature::Thirst => "thirst",
        }
    }
}

/// Where the tortoise would stand and how its gauges would read one step on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub pos: Pos,
    pub health_level: u8,
    pub thirst_level: u8,
    /// The food under the tortoise is gone.
    pub ate_food: bool,
}

impl Projection {
    pub fn of(memory: &SpatialMemory, action: Action) -> Self {
        let agent = memory.agent();
        let mut projection = Projection {
            pos: agent.pos,
            health_level: agent.health_level,
            thirst_level: agent.thirst_level,
            ate_food: false,
        };
        match action {
            Action::Forward if agent.path_clear_ahead => projection.pos = agent.ahead(),
            Action::Eat if agent.food_here => {
                projection.health_level = restore(agent.health_level, EAT_HEALTH_GAIN);
                projection.ate_food = true;
            }
            Action::Drink if agent.water_here => {
                projection.thirst_level = restore(agent.thirst_level, DRINK_THIRST_GAIN);
            }
            _ => {}
        }
        projection
    }
}

fn restore(level: u8, gain: u8) -> u8 {
    level.saturating_add(gain).min(MAX_LEVEL)
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    expected_food_density: f32,
}

impl FeatureExtractor {
    pub fn new(expected_food_density: f32) -> Self {
        Self { expected_food_density }
    }

    pub fn evaluate(&self, feature: Feature, memory: &SpatialMemory, action: Action) -> f32 {
        let projection = Projection::of(memory, action);
        let span = memory.max_distance() as f32;
        let distance = |d: Option<u32>| d.map_or(1.0, |d| (d as f32 / span).min(1.0));

        match feature {
            Feature::WaterDistance => distance(memory.nearest_water(projection.pos)),
            Feature::ThreatDistance => {
                distance(memory.threat().map(|t| projection.pos.manhattan(t)))
            }
            Feature::FoodDistance => distance(
                memory
                    .known_food()
                    .filter(|p| !(projection.ate_food && *p == projection.pos))
                    .map(|p| projection.pos.manhattan(p))
                    .min(),
            ),
            Feature::Exploration => memory.exploration_ratio(),
            Feature::RemainingFood => {
                let expected = self.expected_food_density * memory.area() as f32;
                if expected <= 0.0 {
                    0.0
                } else {
                    let eaten = usize::from(projection.ate_food);
                    let found = memory.food().len().saturating_sub(eaten) as f32;
                    ((expected - found) / expected).clamp(0.0, 1.0)
                }
            }
            Feature::Health => f32::from(projection.health_level) / f32::from(MAX_LEVEL),
            Feature::Thirst => f32::from(projection.thirst_level) / f32::from(MAX_LEVEL),
        }
    }

    pub fn extract(&self, memory: &SpatialMemory, action: Action) -> FeatureVector {
        let mut values = [0.0; NUM_FEATURES];
        for feature in Feature::ALL.iter() {
            values[feature.index()] = self.evaluate(*feature, memory, action);
        }
        values
    }
}
