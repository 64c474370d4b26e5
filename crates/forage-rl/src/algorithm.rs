//! Q-function trait and its tabular and linear implementations

use forage_core::Action;
use tracing::debug;

use crate::features::{Feature, FeatureExtractor, FeatureVector};
use crate::state::LearningState;
use crate::value_store::ValueStore;

/// A learned estimate of Q(s, a).
///
/// `learn` is the only mutator; the agent calls it once per observed
/// transition with the already-computed TD target.
pub trait QFunction<S> {
    /// Model name
    fn name(&self) -> &str;

    /// Current estimate for taking `action` in `state`
    fn q_value(&self, state: &S, action: Action) -> f64;

    /// Move the estimate for `(state, action)` towards `target` at rate `alpha`
    fn learn(&mut self, state: &S, action: Action, target: f64, alpha: f64);

    /// Number of stored parameters
    fn size(&self) -> usize;

    /// Stored parameters rendered as `(key, value)`, sorted by key
    fn parameters(&self) -> Vec<(String, f64)>;
}

/// Tabular Q-learning: one stored value per literal (state, action) pair
#[derive(Debug, Clone)]
pub struct TabularQ<S> {
    q_table: ValueStore<(S, Action)>,
}

impl<S: LearningState> TabularQ<S> {
    pub fn new() -> Self {
        Self {
            q_table: ValueStore::new(),
        }
    }

    pub fn table(&self) -> &ValueStore<(S, Action)> {
        &self.q_table
    }
}

impl<S: LearningState> Default for TabularQ<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LearningState> QFunction<S> for TabularQ<S> {
    fn name(&self) -> &str {
        "q_learning"
    }

    fn q_value(&self, state: &S, action: Action) -> f64 {
        self.q_table.get(&(state.clone(), action))
    }

    /// Q(s,a) ← (1 − α)·Q(s,a) + α·target
    fn learn(&mut self, state: &S, action: Action, target: f64, alpha: f64) {
        let key = (state.clone(), action);
        let current_q = self.q_table.get(&key);
        self.q_table.set(key, (1.0 - alpha) * current_q + alpha * target);
    }

    fn size(&self) -> usize {
        self.q_table.len()
    }

    fn parameters(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<_> = self
            .q_table
            .iter()
            .map(|((state, action), value)| (format!("({state:?}, {action})"), value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// Linear approximation: Q(s,a) = Σ weight[f] · feature[f]
pub struct LinearQ<S> {
    extractor: Box<dyn FeatureExtractor<S>>,
    weights: ValueStore<Feature<S>>,
}

impl<S: LearningState> LinearQ<S> {
    pub fn new(extractor: Box<dyn FeatureExtractor<S>>) -> Self {
        Self {
            extractor,
            weights: ValueStore::new(),
        }
    }

    pub fn weights(&self) -> &ValueStore<Feature<S>> {
        &self.weights
    }

    pub fn extractor(&self) -> &dyn FeatureExtractor<S> {
        self.extractor.as_ref()
    }

    pub fn features(&self, state: &S, action: Action) -> FeatureVector<S> {
        self.extractor.features(state, action)
    }
}

impl<S: LearningState> QFunction<S> for LinearQ<S> {
    fn name(&self) -> &str {
        "approximate_q_learning"
    }

    fn q_value(&self, state: &S, action: Action) -> f64 {
        self.features(state, action).dot(&self.weights)
    }

    /// One SGD step on the squared TD error:
    /// δ = target − Q(s,a), then weight[f] += α·δ·feature[f] for each active f
    fn learn(&mut self, state: &S, action: Action, target: f64, alpha: f64) {
        let features = self.features(state, action);
        let td_error = target - features.dot(&self.weights);

        for (feature, value) in features.iter() {
            self.weights.add(feature.clone(), alpha * td_error * value);
        }

        debug!(
            extractor = self.extractor.name(),
            active_features = features.len(),
            td_error,
            "Weight update complete"
        );
    }

    fn size(&self) -> usize {
        self.weights.len()
    }

    fn parameters(&self) -> Vec<(String, f64)> {
        self.weights.sorted_entries()
    }
}

impl<S: LearningState> std::fmt::Debug for LinearQ<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearQ")
            .field("extractor", &self.extractor.name())
            .field("weights", &self.weights.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::IdentityExtractor;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Cell(u8);

    impl LearningState for Cell {
        fn legal_actions(&self) -> Vec<Action> {
            vec![Action::North, Action::South]
        }
    }

    /// Two named features regardless of state
    struct PairExtractor;

    impl FeatureExtractor<Cell> for PairExtractor {
        fn name(&self) -> &'static str {
            "PairExtractor"
        }

        fn features(&self, _state: &Cell, action: Action) -> FeatureVector<Cell> {
            let mut features = FeatureVector::new();
            features.set_named("bias", 1.0);
            features.set_named("north", if action == Action::North { 2.0 } else { 0.0 });
            features
        }
    }

    #[test]
    fn test_tabular_initial_value() {
        let q = TabularQ::<Cell>::new();
        assert_eq!(q.q_value(&Cell(1), Action::North), 0.0);
        assert_eq!(q.size(), 0);
    }

    #[test]
    fn test_tabular_learn() {
        let mut q = TabularQ::new();
        q.learn(&Cell(1), Action::North, 10.0, 0.5);
        assert_eq!(q.q_value(&Cell(1), Action::North), 5.0);

        q.learn(&Cell(1), Action::North, 10.0, 0.5);
        assert_eq!(q.q_value(&Cell(1), Action::North), 7.5);
        assert_eq!(q.q_value(&Cell(1), Action::South), 0.0);
        assert_eq!(q.size(), 1);
        assert_eq!(q.parameters(), vec![("(Cell(1), North)".to_string(), 7.5)]);
    }

    #[test]
    fn test_linear_q_value_is_dot_product() {
        let mut q = LinearQ::<Cell>::new(Box::new(PairExtractor));
        q.weights.set(Feature::named("bias"), 0.5);
        q.weights.set(Feature::named("north"), 2.0);

        assert_eq!(q.q_value(&Cell(0), Action::North), 4.5);
        assert_eq!(q.q_value(&Cell(0), Action::South), 0.5);
    }

    #[test]
    fn test_linear_learn_single_feature() {
        let mut q = LinearQ::<Cell>::new(Box::new(IdentityExtractor));
        q.learn(&Cell(3), Action::South, 2.0, 0.25);

        // δ = 2.0 − 0.0, weight += 0.25 · 2.0 · 1.0
        let key = Feature::StateAction(Cell(3), Action::South);
        assert_eq!(q.weights().get(&key), 0.5);
        assert_eq!(q.q_value(&Cell(3), Action::South), 0.5);
    }

    #[test]
    fn test_linear_learn_generalizes_across_states() {
        let mut q = LinearQ::<Cell>::new(Box::new(PairExtractor));
        q.learn(&Cell(0), Action::North, 1.0, 0.1);

        // The shared bias weight moves the estimate of an unseen state too
        assert!(q.q_value(&Cell(9), Action::South) > 0.0);
        assert_eq!(q.size(), 2);
    }
}
