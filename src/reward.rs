//! Hand-tuned reward shaping.
//!
//! Every term looks at the state the action was taken in; the resulting
//! state is only used to tell whether the tortoise actually got closer to
//! remembered food.

use crate::config::RewardConfig;
use crate::environment::Action;
use crate::features::Projection;
use crate::memory::SpatialMemory;

/// One step of experience, held just long enough to learn from it.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub previous: &'a SpatialMemory,
    pub action: Action,
    pub current: &'a SpatialMemory,
}

#[derive(Debug, Clone, Default)]
pub struct RewardModel {
    config: RewardConfig,
}

impl RewardModel {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    /// Sum of all shaping terms for `transition`, given the episode's
    /// cumulative `score` so far. Neither normalised nor clamped.
    pub fn reward(&self, transition: &Transition<'_>, score: f32) -> f32 {
        self.eating(transition)
            + self.food_seeking(transition)
            + self.drinking(transition)
            + self.thirst(transition)
            + self.exploration(transition)
            + self.threat(transition)
            + self.running_score(score)
    }

    fn eating(&self, t: &Transition<'_>) -> f32 {
        match t.action {
            Action::Eat if t.previous.agent().food_here => self.config.eat_food,
            Action::Eat => self.config.eat_nothing,
            _ => 0.0,
        }
    }

    fn food_seeking(&self, t: &Transition<'_>) -> f32 {
        let before = t.previous.agent();
        let mut reward = 0.0;
        if before.food_ahead {
            reward += if t.action == Action::Forward {
                self.config.approach_food_ahead
            } else {
                self.config.ignore_food_ahead
            };
        }
        if t.action == Action::Forward {
            let was = t.previous.nearest_food(before.pos);
            let now = t.current.nearest_food(t.current.agent().pos);
            if let (Some(was), Some(now)) = (was, now) {
                if now < was {
                    reward += self.config.approach_known_food;
                }
            }
        }
        reward
    }

    fn drinking(&self, t: &Transition<'_>) -> f32 {
        if t.action != Action::Drink {
            return 0.0;
        }
        let before = t.previous.agent();
        if !before.water_here {
            return self.config.drink_nothing;
        }
        match before.thirst_level {
            l if l < 20 => self.config.drink_below_20,
            l if l < 50 => self.config.drink_below_50,
            l if l < 75 => self.config.drink_below_75,
            _ => 0.0,
        }
    }

    fn thirst(&self, t: &Transition<'_>) -> f32 {
        if t.previous.agent().thirst_level < self.config.critical_thirst {
            self.config.critical_thirst_penalty
        } else {
            0.0
        }
    }

    fn exploration(&self, t: &Transition<'_>) -> f32 {
        let ratio = t.previous.exploration_ratio();
        let c = &self.config;
        if ratio < c.explore_low_threshold {
            c.explore_low_penalty
        } else if ratio > c.explore_high_threshold {
            c.explore_high_bonus
        } else if ratio > c.explore_mid_threshold {
            c.explore_mid_bonus
        } else {
            0.0
        }
    }

    /// Proximity of the threat to where the action leaves the tortoise.
    fn threat(&self, t: &Transition<'_>) -> f32 {
        let threat = match t.previous.threat() {
            Some(threat) => threat,
            None => return 0.0,
        };
        let c = &self.config;
        let here = t.previous.agent().pos.manhattan(threat);
        let after = Projection::of(t.previous, t.action).pos.manhattan(threat);

        let mut reward = if after < c.threat_close_distance {
            c.threat_close_penalty
        } else if after <= c.threat_near_distance {
            c.threat_near_penalty
        } else {
            0.0
        };
        if after < here {
            reward += c.threat_approach_penalty;
        }
        reward
    }

    fn running_score(&self, score: f32) -> f32 {
        if score > 0.0 {
            self.config.score_positive_bonus
        } else {
            self.config.score_negative_penalty
        }
    }
}
