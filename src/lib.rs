//! An online Q-learning tortoise for a partially observable gridworld.
//!
//! Each tick the simulator hands over a [`Sensor`] snapshot. The tortoise
//! folds it into its [`SpatialMemory`], learns from the previous action with a
//! linear value estimate over seven hand-crafted features, and answers with
//! the next [`Action`].

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod features;
pub mod memory;
pub mod policy;
pub mod reward;
pub mod rl;
pub mod sensor;
pub mod value;
pub mod weights;

pub use agent::AgentState;
pub use config::{AgentConfig, BrainKind, RewardConfig};
pub use environment::{Action, Cell, Direction, Pos};
pub use error::{Result, TortoiseError};
pub use features::{Feature, FeatureExtractor, FeatureVector, NUM_FEATURES};
pub use memory::SpatialMemory;
pub use policy::{build_brain, Brain, RandomBrain, ReflexBrain};
pub use reward::{RewardModel, Transition};
pub use rl::{legal_actions, EpsilonGreedy, ExplorationStrategy, QLearner, QLearningBrain};
pub use sensor::{Sensor, SensorRecord};
pub use value::ValueEstimator;
pub use weights::WeightVector;
