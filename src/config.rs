//! Configuration for the tortoise agent, fixed for the lifetime of a run.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, TortoiseError};
use crate::memory::MIN_GRID_SIZE;

/// Which decision procedure drives the tortoise.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BrainKind {
    Random,
    Reflex,
    Learning,
}

impl FromStr for BrainKind {
    type Err = TortoiseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(BrainKind::Random),
            "reflex" => Ok(BrainKind::Reflex),
            "learning" => Ok(BrainKind::Learning),
            _ => Err(TortoiseError::InvalidConfig {
                name: "brain".to_string(),
                reason: format!("unknown brain '{}', expected random, reflex or learning", s),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Side of the square world, boundary walls included.
    pub grid_size: usize,
    /// Learning rate α.
    pub alpha: f32,
    /// Exploration probability ε.
    pub epsilon: f32,
    /// Discount factor γ.
    pub gamma: f32,
    /// Fraction of cells expected to hold food.
    pub expected_food_density: f32,
    /// Where the weight vector lives between runs; `None` keeps it in memory.
    pub weights_path: Option<PathBuf>,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub brain: BrainKind,
    pub reward: RewardConfig,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(invalid("grid_size", format!("must be at least {}", MIN_GRID_SIZE)));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(invalid("alpha", format!("{} is not in (0, 1]", self.alpha)));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(invalid("epsilon", format!("{} is not in [0, 1]", self.epsilon)));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(invalid("gamma", format!("{} is not in [0, 1]", self.gamma)));
        }
        if !(0.0..=1.0).contains(&self.expected_food_density) {
            return Err(invalid(
                "expected_food_density",
                format!("{} is not in [0, 1]", self.expected_food_density),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: String) -> TortoiseError {
    TortoiseError::InvalidConfig { name: name.to_string(), reason }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            alpha: 0.1,
            epsilon: 0.1,
            gamma: 0.7,
            expected_food_density: 0.1,
            weights_path: None,
            seed: None,
            brain: BrainKind::Learning,
            reward: RewardConfig::default(),
        }
    }
}

/// Reward shaping coefficients and thresholds.
#[derive(Debug, Clone)]
pub struct RewardConfig {
    // --- Eating ---
    pub eat_food: f32,
    pub eat_nothing: f32,

    // --- Food seeking ---
    /// Stepping onto food seen ahead.
    pub approach_food_ahead: f32,
    /// Doing anything else while food is ahead.
    pub ignore_food_ahead: f32,
    /// Stepping closer to the nearest remembered food.
    pub approach_known_food: f32,

    // --- Drinking, by thirst level before drinking ---
    pub drink_below_20: f32,
    pub drink_below_50: f32,
    pub drink_below_75: f32,
    pub drink_nothing: f32,
    /// Thirst level under which every tick is penalised.
    pub critical_thirst: u8,
    pub critical_thirst_penalty: f32,

    // --- Exploration ratio ---
    pub explore_low_threshold: f32,
    pub explore_low_penalty: f32,
    pub explore_mid_threshold: f32,
    pub explore_mid_bonus: f32,
    pub explore_high_threshold: f32,
    pub explore_high_bonus: f32,

    // --- Threat ---
    /// Distance strictly below which the threat counts as close.
    pub threat_close_distance: u32,
    pub threat_close_penalty: f32,
    /// Distance at or below which the threat counts as near.
    pub threat_near_distance: u32,
    pub threat_near_penalty: f32,
    /// Extra penalty for an action that closes in on the threat.
    pub threat_approach_penalty: f32,

    // --- Running score ---
    pub score_positive_bonus: f32,
    pub score_negative_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            eat_food: 50.0,
            eat_nothing: -20.0,
            approach_food_ahead: 10.0,
            ignore_food_ahead: -10.0,
            approach_known_food: 2.0,
            drink_below_20: 15.0,
            drink_below_50: 8.0,
            drink_below_75: 2.0,
            drink_nothing: -5.0,
            critical_thirst: 10,
            critical_thirst_penalty: -20.0,
            explore_low_threshold: 0.2,
            explore_low_penalty: -2.0,
            explore_mid_threshold: 0.5,
            explore_mid_bonus: 2.0,
            explore_high_threshold: 0.7,
            explore_high_bonus: 5.0,
            threat_close_distance: 3,
            threat_close_penalty: -20.0,
            threat_near_distance: 5,
            threat_near_penalty: -5.0,
            threat_approach_penalty: -10.0,
            score_positive_bonus: 1.0,
            score_negative_penalty: -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AgentConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.brain, BrainKind::Learning);
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        let mut cfg = AgentConfig::default();
        cfg.epsilon = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = AgentConfig::default();
        cfg.alpha = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = AgentConfig::default();
        cfg.gamma = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn tiny_grid_is_rejected() {
        let mut cfg = AgentConfig::default();
        cfg.grid_size = 2;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn brain_kinds_parse() {
        assert_eq!("reflex".parse::<BrainKind>().unwrap(), BrainKind::Reflex);
        assert!("deep".parse::<BrainKind>().is_err());
    }

    #[test]
    fn exploration_tiers_are_ordered() {
        let r = RewardConfig::default();
        assert!(r.explore_low_threshold < r.explore_mid_threshold);
        assert!(r.explore_mid_threshold < r.explore_high_threshold);
        assert!(r.threat_close_distance <= r.threat_near_distance);
    }
}
