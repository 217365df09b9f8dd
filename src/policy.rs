use log::info;
use rand::prelude::*;

use crate::config::{AgentConfig, BrainKind};
use crate::environment::Action;
use crate::error::Result;
use crate::rl::{make_rng, QLearningBrain};
use crate::sensor::Sensor;

/// Anything that can drive the tortoise: one snapshot in, one action out.
pub trait Brain {
    fn decide(&mut self, sensor: &Sensor) -> Result<Action>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Builds the brain selected by `config.brain`.
pub fn build_brain(config: &AgentConfig) -> Result<Box<dyn Brain>> {
    config.validate()?;
    let brain: Box<dyn Brain> = match config.brain {
        BrainKind::Random => Box::new(RandomBrain::new(config.grid_size, make_rng(config.seed))),
        BrainKind::Reflex => Box::new(ReflexBrain::new(config.grid_size, make_rng(config.seed))),
        BrainKind::Learning => Box::new(QLearningBrain::new(config)?),
    };
    info!("Using the {} brain", brain.name());
    Ok(brain)
}

// Forward appears twice so a random walk actually goes somewhere
const RANDOM_CHOICES: [Action; 7] = [
    Action::Eat,
    Action::Drink,
    Action::TurnLeft,
    Action::TurnRight,
    Action::Forward,
    Action::Forward,
    Action::Wait,
];

pub struct RandomBrain {
    grid_size: usize,
    rng: StdRng,
}

impl RandomBrain {
    pub fn new(grid_size: usize, rng: StdRng) -> Self {
        Self { grid_size, rng }
    }
}

impl Brain for RandomBrain {
    fn decide(&mut self, sensor: &Sensor) -> Result<Action> {
        sensor.validate(self.grid_size)?;
        Ok(*RANDOM_CHOICES.choose(&mut self.rng).unwrap_or(&Action::Wait))
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Hard-wired survival rules, no memory and no learning.
pub struct ReflexBrain {
    grid_size: usize,
    rng: StdRng,
}

impl ReflexBrain {
    pub fn new(grid_size: usize, rng: StdRng) -> Self {
        Self { grid_size, rng }
    }

    fn flee(sensor: &Sensor) -> Action {
        if sensor.threat_forward <= 0 && sensor.path_clear_ahead {
            Action::Forward
        } else if sensor.threat_lateral > 0 {
            Action::TurnLeft
        } else {
            Action::TurnRight
        }
    }
}

impl Brain for ReflexBrain {
    fn decide(&mut self, sensor: &Sensor) -> Result<Action> {
        sensor.validate(self.grid_size)?;
        if sensor.threat_forward.abs() < 3 && sensor.threat_lateral.abs() < 3 {
            return Ok(Self::flee(sensor));
        }
        if sensor.food_here && sensor.thirst_level > 10 {
            return Ok(Action::Eat);
        }
        if sensor.water_ahead && sensor.thirst_level < 50 {
            return Ok(Action::Forward);
        }
        if sensor.water_here && sensor.thirst_level < 100 {
            return Ok(Action::Drink);
        }

        let wander: &[Action] = if sensor.path_clear_ahead {
            &[
                Action::Forward,
                Action::TurnRight,
                Action::Forward,
                Action::Wait,
                Action::Forward,
                Action::Forward,
                Action::Forward,
            ]
        } else {
            &[Action::TurnRight, Action::TurnLeft]
        };
        Ok(*wander.choose(&mut self.rng).unwrap_or(&Action::Wait))
    }

    fn name(&self) -> &str {
        "reflex"
    }
}
