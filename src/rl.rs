use std::path::PathBuf;

use log::{debug, info, trace, warn};
use rand::prelude::*;

use crate::agent::AgentState;
use crate::config::AgentConfig;
use crate::environment::Action;
use crate::error::Result;
use crate::features::FeatureExtractor;
use crate::memory::SpatialMemory;
use crate::policy::Brain;
use crate::reward::{RewardModel, Transition};
use crate::sensor::Sensor;
use crate::value::ValueEstimator;
use crate::weights::WeightVector;

/// Eat, drink, both turns and wait are always possible; forward only when
/// the cell ahead is passable.
pub fn legal_actions(agent: &AgentState) -> Vec<Action> {
    let mut actions = Action::ALWAYS_LEGAL.to_vec();
    if agent.path_clear_ahead {
        actions.push(Action::Forward);
    }
    actions
}

pub trait ExplorationStrategy {
    fn next_action(
        &mut self,
        memory: &SpatialMemory,
        actions: &[Action],
        estimator: &ValueEstimator,
    ) -> Option<Action>;
}

pub struct EpsilonGreedy {
    epsilon: f32,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f32, rng: StdRng) -> Self {
        EpsilonGreedy { epsilon, rng }
    }
}

impl ExplorationStrategy for EpsilonGreedy {
    fn next_action(
        &mut self,
        memory: &SpatialMemory,
        actions: &[Action],
        estimator: &ValueEstimator,
    ) -> Option<Action> {
        if self.rng.gen::<f32>() < self.epsilon {
            return actions.choose(&mut self.rng).copied();
        }
        estimator.best_action(memory, actions, &mut self.rng)
    }
}

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Temporal-difference learner over the linear value estimate.
#[derive(Debug, Clone)]
pub struct QLearner {
    alpha: f32,
    gamma: f32,
    estimator: ValueEstimator,
    rewards: RewardModel,
    score: f32,
}

impl QLearner {
    pub fn new(config: &AgentConfig, weights: WeightVector) -> Self {
        Self {
            alpha: config.alpha,
            gamma: config.gamma,
            estimator: ValueEstimator::new(
                weights,
                FeatureExtractor::new(config.expected_food_density),
            ),
            rewards: RewardModel::new(config.reward.clone()),
            score: 0.0,
        }
    }

    pub fn estimator(&self) -> &ValueEstimator {
        &self.estimator
    }

    pub fn weights(&self) -> &WeightVector {
        self.estimator.weights()
    }

    /// Cumulative reward collected so far.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Scores `transition` and moves the weights towards the one-step target
    /// `r + γ max_a' Q(s', a')`. Returns the reward.
    ///
    /// A non-finite TD error leaves the weights untouched.
    pub fn learn(&mut self, transition: &Transition<'_>) -> f32 {
        let reward = self.rewards.reward(transition, self.score);
        self.score += reward;

        let next_actions = legal_actions(transition.current.agent());
        let next_value = self.estimator.best_value(transition.current, &next_actions);
        let target = reward + self.gamma * next_value;
        let features = self.estimator.features(transition.previous, transition.action);
        let t_d = target - self.estimator.weights().dot(&features);

        if !t_d.is_finite() {
            warn!(
                "Skipping weight update: non-finite TD error after {} (reward {})",
                transition.action, reward
            );
            return reward;
        }
        self.estimator.update(self.alpha * t_d, &features);
        debug!(
            "{} -> reward {:.3}, td {:.3}, weights {:?}",
            transition.action,
            reward,
            t_d,
            self.weights().as_array()
        );
        reward
    }
}

/// Online Q-learning with linear function approximation, one decision per
/// simulator tick.
pub struct QLearningBrain<S: ExplorationStrategy = EpsilonGreedy> {
    memory: SpatialMemory,
    learner: QLearner,
    exploration: S,
    previous: Option<(SpatialMemory, Action)>,
    weights_path: Option<PathBuf>,
}

impl QLearningBrain<EpsilonGreedy> {
    /// Loads the weight file named in `config` (zeros when absent) and sizes
    /// the memory to the grid.
    pub fn new(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        let weights = match &config.weights_path {
            Some(path) => WeightVector::load(path)?,
            None => WeightVector::zeros(),
        };
        Self::with_weights(config, weights)
    }

    pub fn with_weights(config: &AgentConfig, weights: WeightVector) -> Result<Self> {
        let exploration = EpsilonGreedy::new(config.epsilon, make_rng(config.seed));
        Self::with_strategy(config, weights, exploration)
    }
}

impl<S: ExplorationStrategy> QLearningBrain<S> {
    pub fn with_strategy(
        config: &AgentConfig,
        weights: WeightVector,
        exploration: S,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            "Q-learning brain on a {0}x{0} grid (alpha {1}, epsilon {2}, gamma {3})",
            config.grid_size, config.alpha, config.epsilon, config.gamma
        );
        Ok(Self {
            memory: SpatialMemory::new(config.grid_size)?,
            learner: QLearner::new(config, weights),
            exploration,
            previous: None,
            weights_path: config.weights_path.clone(),
        })
    }

    pub fn memory(&self) -> &SpatialMemory {
        &self.memory
    }

    pub fn learner(&self) -> &QLearner {
        &self.learner
    }

    pub fn weights(&self) -> &WeightVector {
        self.learner.weights()
    }

    /// Runs one decision cycle.
    ///
    /// The snapshot updates memory, the previous action is scored against
    /// the state it was taken in and learned from, the next action is picked
    /// among the legal ones, and the weights are written out. The new memory
    /// and weights are only kept once the save succeeds: a snapshot that
    /// fails validation, or a weight file that cannot be written, leaves the
    /// brain as it was before the call.
    pub fn tick(&mut self, sensor: &Sensor) -> Result<Action> {
        let mut memory = self.memory.clone();
        memory.update(sensor)?;
        trace!("Memory:\n{}", memory.render());

        let mut learner = self.learner.clone();
        if let Some((previous, action)) = &self.previous {
            learner.learn(&Transition {
                previous,
                action: *action,
                current: &memory,
            });
        }

        let actions = legal_actions(memory.agent());
        // `actions` always holds the five unconditional moves
        let action = self
            .exploration
            .next_action(&memory, &actions, learner.estimator())
            .unwrap_or(Action::Wait);

        if let Some(path) = &self.weights_path {
            learner.weights().save(path)?;
        }

        self.learner = learner;
        self.previous = Some((memory.clone(), action));
        self.memory = memory;
        Ok(action)
    }
}

impl<S: ExplorationStrategy> Brain for QLearningBrain<S> {
    fn decide(&mut self, sensor: &Sensor) -> Result<Action> {
        self.tick(sensor)
    }

    fn name(&self) -> &str {
        "learning"
    }
}
