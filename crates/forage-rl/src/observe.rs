//! Inspection of the approximate learner's view of a decision

use forage_core::Action;
use serde::Serialize;
use tracing::debug;

use crate::agent::ApproximateQAgent;
use crate::state::{LearningState, Transition};

/// Snapshot of what the approximate agent sees for one transition: the
/// Q-value of every legal action, the TD target and error the update would
/// apply, the extracted features of the chosen action and the current weights.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub action: Action,
    pub reward: f64,
    pub q_values: Vec<(Action, f64)>,
    pub target: f64,
    pub td_error: f64,
    pub features: Vec<(String, f64)>,
    pub weights: Vec<(String, f64)>,
}

impl UpdateReport {
    /// Emit the report as debug events
    pub fn log(&self) {
        for (action, q) in &self.q_values {
            debug!(action = %action, q, "Q-value");
        }
        debug!(
            action = %self.action,
            reward = self.reward,
            target = self.target,
            td_error = self.td_error,
            "Temporal difference"
        );
        for (name, value) in &self.features {
            debug!(action = %self.action, feature = %name, value, "Feature");
        }
        for (name, weight) in &self.weights {
            debug!(feature = %name, weight, "Weight");
        }
    }

    pub fn to_json(&self) -> forage_core::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Weight of a feature by its rendered name, `0.0` if absent
    pub fn weight(&self, name: &str) -> f64 {
        self.weights
            .iter()
            .find(|(key, _)| key == name)
            .map_or(0.0, |&(_, weight)| weight)
    }
}

impl<S: LearningState> ApproximateQAgent<S> {
    /// Report on `transition` as `update` would see it. Mutates nothing.
    pub fn inspect(&self, transition: &Transition<S>) -> UpdateReport {
        let state = &transition.state;
        let q_values = state
            .legal_actions()
            .into_iter()
            .map(|legal| (legal, self.get_q_value(state, legal)))
            .collect();

        let target = transition.reward
            + self.gamma() * self.compute_value_from_q_values(&transition.next_state);
        let td_error = target - self.get_q_value(state, transition.action);

        UpdateReport {
            action: transition.action,
            reward: transition.reward,
            q_values,
            target,
            td_error,
            features: self
                .q_function()
                .features(state, transition.action)
                .sorted_entries(),
            weights: self.weights().sorted_entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use forage_core::GameState;

    fn simple_agent() -> ApproximateQAgent<GameState> {
        let config = AgentConfig {
            alpha: 0.5,
            gamma: 0.0,
            extractor: "SimpleExtractor".to_string(),
            seed: Some(1),
            ..AgentConfig::default()
        };
        ApproximateQAgent::<GameState>::new(&config).unwrap()
    }

    #[test]
    fn test_inspect_fresh_agent() {
        let agent = simple_agent();
        let state = GameState::from_layout("%%%%%\n%P..%\n%%%%%", 0).unwrap();
        let next = GameState::from_layout("%%%%%\n% P.%\n%%%%%", 0).unwrap();
        let report = agent.inspect(&Transition::new(state, Action::East, next, 10.0));

        assert_eq!(report.action, Action::East);
        assert_eq!(
            report.q_values,
            vec![(Action::East, 0.0), (Action::Stop, 0.0)]
        );
        // gamma is 0, so target = reward and δ = reward - 0
        assert_eq!(report.target, 10.0);
        assert_eq!(report.td_error, 10.0);
        assert_eq!(report.features.len(), 7);
        assert!(report.weights.is_empty());
    }

    #[test]
    fn test_inspect_matches_update() {
        let mut agent = simple_agent();
        let state = GameState::from_layout("%%%%%\n%P..%\n%%%%%", 0).unwrap();
        let next = GameState::from_layout("%%%%%\n% P.%\n%%%%%", 0).unwrap();
        let transition = Transition::new(state.clone(), Action::East, next.clone(), 10.0);

        let before = agent.inspect(&transition);
        agent.update(&state, Action::East, &next, 10.0);
        let after = agent.inspect(&transition);

        // weight[f] moved by α·δ·feature[f]
        let eats_food = before
            .features
            .iter()
            .find(|(name, _)| name == "eats-food")
            .map(|&(_, value)| value)
            .unwrap();
        assert!((after.weight("eats-food") - 0.5 * before.td_error * eats_food).abs() < 1e-12);
        assert_eq!(after.weights.len(), 7);
        assert!(after.td_error < before.td_error);

        let east_q = after
            .q_values
            .iter()
            .find(|(action, _)| *action == Action::East)
            .map(|&(_, q)| q)
            .unwrap();
        assert!((east_q - (before.target - after.td_error)).abs() < 1e-12);
    }

    #[test]
    fn test_inspect_does_not_mutate() {
        let agent = simple_agent();
        let state = GameState::from_layout("%%%%\n%P.%\n%%%%", 0).unwrap();
        let transition = Transition::new(state.clone(), Action::Stop, state, -1.0);

        agent.inspect(&transition);
        assert!(agent.weights().is_empty());
    }

    #[test]
    fn test_report_json() {
        let agent = simple_agent();
        let state = GameState::from_layout("%%%%\n%P.%\n%%%%", 0).unwrap();
        let transition = Transition::new(state.clone(), Action::Stop, state, -1.0);
        let json = agent.inspect(&transition).to_json().unwrap();

        assert!(json.contains("\"action\": \"Stop\""));
        assert!(json.contains("\"td_error\": -1.0"));
        assert!(json.contains("closest-food"));
    }
}
