use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::environment::Action;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::memory::SpatialMemory;
use crate::weights::WeightVector;

/// Linear action-value approximation `Q(s, a) = w · f(s, a)`.
#[derive(Debug, Clone)]
pub struct ValueEstimator {
    weights: WeightVector,
    features: FeatureExtractor,
}

impl ValueEstimator {
    pub fn new(weights: WeightVector, features: FeatureExtractor) -> Self {
        Self { weights, features }
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn features(&self, memory: &SpatialMemory, action: Action) -> FeatureVector {
        self.features.extract(memory, action)
    }

    pub fn value(&self, memory: &SpatialMemory, action: Action) -> f32 {
        self.weights.dot(&self.features(memory, action))
    }

    /// `max_a Q(s, a)` over `actions`, or 0 when there is nothing to choose.
    pub fn best_value(&self, memory: &SpatialMemory, actions: &[Action]) -> f32 {
        actions
            .iter()
            .map(|a| OrderedFloat(self.value(memory, *a)))
            .max()
            .map_or(0.0, |v| v.into_inner())
    }

    /// `argmax_a Q(s, a)` over `actions`, ties broken uniformly at random.
    ///
    /// The running maximum starts at the first action's value, so sets where
    /// every value is negative still yield their true best action.
    pub fn best_action<R: Rng + ?Sized>(
        &self,
        memory: &SpatialMemory,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        let values: Vec<f32> = actions.iter().map(|a| self.value(memory, *a)).collect();
        let best = values.iter().copied().map(OrderedFloat).max()?;
        let tied: Vec<Action> = actions
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| OrderedFloat(**v) == best)
            .map(|(a, _)| *a)
            .collect();
        tied.choose(rng).copied()
    }

    /// Moves every weight by `step` times its feature value.
    pub fn update(&mut self, step: f32, features: &FeatureVector) {
        self.weights.add_scaled(step, features);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Direction, Pos};
    use crate::features::Feature;
    use crate::sensor::Sensor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn estimator(weights: [f32; 7]) -> ValueEstimator {
        ValueEstimator::new(WeightVector::from_array(weights), FeatureExtractor::new(0.1))
    }

    fn memory_with(sensor: Sensor) -> SpatialMemory {
        let mut m = SpatialMemory::new(5).unwrap();
        m.update(&sensor).unwrap();
        m
    }

    #[test]
    fn value_is_the_weighted_sum() {
        let mut s = Sensor::at(Pos::new(2, 2), Direction::North);
        s.health_level = 50;
        s.thirst_level = 25;
        let m = memory_with(s);
        let mut w = [0.0; 7];
        w[Feature::Health.index()] = 2.0;
        w[Feature::Thirst.index()] = -4.0;
        let v = estimator(w).value(&m, Action::Wait);
        assert!((v - (2.0 * 0.5 - 4.0 * 0.25)).abs() < 1e-6);
    }

    #[test]
    fn empty_action_set_has_zero_value_and_no_action() {
        let m = memory_with(Sensor::at(Pos::new(2, 2), Direction::North));
        let e = estimator([1.0; 7]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(e.best_value(&m, &[]), 0.0);
        assert_eq!(e.best_action(&m, &[], &mut rng), None);
    }

    #[test]
    fn all_negative_values_still_pick_the_best() {
        let mut s = Sensor::at(Pos::new(2, 2), Direction::North);
        s.water_here = true;
        s.thirst_level = 50;
        let m = memory_with(s);
        let mut w = [0.0; 7];
        w[Feature::Thirst.index()] = -1.0;
        let e = estimator(w);
        let mut rng = StdRng::seed_from_u64(3);
        // drinking raises thirst level and so lowers every other action's value
        let actions = [Action::Drink, Action::Wait];
        assert_eq!(e.best_action(&m, &actions, &mut rng), Some(Action::Wait));
        assert!((e.best_value(&m, &actions) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn ties_are_broken_among_the_best_only() {
        let mut s = Sensor::at(Pos::new(2, 2), Direction::North);
        s.food_here = true;
        s.health_level = 10;
        let m = memory_with(s);
        let mut w = [0.0; 7];
        w[Feature::Health.index()] = -1.0;
        let e = estimator(w);
        let mut rng = StdRng::seed_from_u64(7);
        let actions = Action::actions();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let a = e.best_action(&m, &actions, &mut rng).unwrap();
            assert_ne!(a, Action::Eat);
            seen.insert(a);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn best_action_is_deterministic_without_ties() {
        let mut s = Sensor::at(Pos::new(2, 2), Direction::North);
        s.food_here = true;
        s.health_level = 40;
        let m = memory_with(s);
        let mut w = [0.0; 7];
        w[Feature::Health.index()] = 1.0;
        let e = estimator(w);
        let actions = Action::actions();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(e.best_action(&m, &actions, &mut rng), Some(Action::Eat));
        }
    }

    #[test]
    fn update_moves_weights_along_features() {
        let mut e = estimator([0.0; 7]);
        e.update(0.1, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0]);
        assert!((e.weights()[Feature::WaterDistance] - 0.1).abs() < 1e-6);
        assert!((e.weights()[Feature::Thirst] + 0.1).abs() < 1e-6);
    }
}
