//! Learning agents - epsilon-greedy policy over a Q-function
//!
//! `LearningAgent` holds the policy logic shared by both learners: value
//! lookup, greedy and exploratory action choice, and the temporal-difference
//! target. The Q-function decides how the target is absorbed: the tabular
//! variant overwrites one entry, the approximate variant takes a gradient
//! step on a weight vector.

use std::marker::PhantomData;

use forage_core::{Action, GameState};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::algorithm::{LinearQ, QFunction, TabularQ};
use crate::config::{
    check_alpha, check_epsilon, check_gamma, validate_learning_params, AgentConfig,
};
use crate::episode::{EpisodeStats, EpisodeTracker};
use crate::features::{Feature, FeatureExtractor};
use crate::state::{LearningState, Reward, Transition};
use crate::value_store::ValueStore;

/// The interface the training harness drives
pub trait ReinforcementAgent<S> {
    /// Algorithm name
    fn name(&self) -> &str;

    /// Action to take in `state`; `None` when no action is legal
    fn get_action(&mut self, state: &S) -> Option<Action>;

    /// Learn from one observed transition
    fn update(&mut self, state: &S, action: Action, next_state: &S, reward: Reward);

    /// End-of-episode notification
    fn final_episode(&mut self, state: &S);

    /// Get learning parameters as JSON
    fn get_params(&self) -> serde_json::Value;

    /// Set learning parameters from JSON
    fn set_params(&mut self, params: serde_json::Value) -> anyhow::Result<()>;
}

/// Epsilon-greedy Q-learner over an arbitrary Q-function
pub struct LearningAgent<S, Q> {
    q_function: Q,
    epsilon: f64,
    alpha: f64,
    gamma: f64,
    freeze_after_training: bool,
    episodes: EpisodeTracker,
    rng: StdRng,
    _state: PhantomData<fn(&S)>,
}

/// Tabular Q-learning agent keyed by literal state
pub type QLearningAgent<S> = LearningAgent<S, TabularQ<S>>;

/// Linear approximate Q-learning agent keyed by feature
pub type ApproximateQAgent<S> = LearningAgent<S, LinearQ<S>>;

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl<S: LearningState, Q: QFunction<S>> LearningAgent<S, Q> {
    /// Create an agent around an existing Q-function
    pub fn with_q_function(config: &AgentConfig, q_function: Q) -> forage_core::Result<Self> {
        validate_learning_params(config.epsilon, config.alpha, config.gamma)?;

        debug!(
            algorithm = q_function.name(),
            epsilon = config.epsilon,
            alpha = config.alpha,
            gamma = config.gamma,
            num_training = config.num_training,
            "Learning agent created"
        );

        Ok(Self {
            q_function,
            epsilon: config.epsilon,
            alpha: config.alpha,
            gamma: config.gamma,
            freeze_after_training: config.freeze_after_training,
            episodes: EpisodeTracker::new(config.num_training),
            rng: build_rng(config.seed),
            _state: PhantomData,
        })
    }

    /// Q(state, action); `0.0` for pairs never learned about
    pub fn get_q_value(&self, state: &S, action: Action) -> f64 {
        self.q_function.q_value(state, action)
    }

    /// max over legal actions of Q(state, a); `0.0` when none are legal
    pub fn compute_value_from_q_values(&self, state: &S) -> f64 {
        state
            .legal_actions()
            .into_iter()
            .map(|action| self.get_q_value(state, action))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Every legal action whose Q-value equals the maximum
    pub fn best_actions(&self, state: &S) -> Vec<Action> {
        let scored: Vec<(Action, f64)> = state
            .legal_actions()
            .into_iter()
            .map(|action| (action, self.get_q_value(state, action)))
            .collect();

        let Some(best) = scored.iter().map(|&(_, q)| q).reduce(f64::max) else {
            return Vec::new();
        };

        scored
            .into_iter()
            .filter(|&(_, q)| q == best)
            .map(|(action, _)| action)
            .collect()
    }

    /// Greedy action, ties broken uniformly at random; `None` when none are legal
    pub fn compute_action_from_q_values(&mut self, state: &S) -> Option<Action> {
        let best = self.best_actions(state);
        best.choose(&mut self.rng).copied()
    }

    /// Epsilon-greedy action choice
    pub fn get_action(&mut self, state: &S) -> Option<Action> {
        let legal_actions = state.legal_actions();
        if legal_actions.is_empty() {
            return None;
        }

        if self.rng.gen::<f64>() < self.epsilon {
            // Explore: random legal action
            legal_actions.choose(&mut self.rng).copied()
        } else {
            // Exploit: greedy action based on Q-values
            self.compute_action_from_q_values(state)
        }
    }

    /// Temporal-difference update towards r + γ·V(s').
    ///
    /// The only mutator of learned values. The harness calls it once per
    /// transition, after the `get_action` call for `state`.
    pub fn update(&mut self, state: &S, action: Action, next_state: &S, reward: Reward) {
        let target = reward + self.gamma * self.compute_value_from_q_values(next_state);
        self.q_function.learn(state, action, target, self.alpha);
    }

    /// Greedy policy for `state`
    pub fn policy(&mut self, state: &S) -> Option<Action> {
        self.compute_action_from_q_values(state)
    }

    /// Value of `state` under the greedy policy
    pub fn value(&self, state: &S) -> f64 {
        self.compute_value_from_q_values(state)
    }

    pub fn start_episode(&mut self) {
        self.episodes.start_episode();
    }

    /// Record the reward of a transition and learn from it
    pub fn observe_transition(&mut self, transition: &Transition<S>) {
        self.episodes.record_reward(transition.reward);
        self.update(
            &transition.state,
            transition.action,
            &transition.next_state,
            transition.reward,
        );
    }

    /// End-of-episode hook. Closes the episode's bookkeeping; does not learn.
    pub fn final_episode(&mut self, state: &S) {
        let episode_reward = self.episodes.stop_episode();
        debug!(
            episode = self.episodes.episodes_so_far(),
            episode_reward,
            terminal = state.legal_actions().is_empty(),
            "Episode finished"
        );

        if self.episodes.training_just_finished() {
            info!(
                algorithm = self.q_function.name(),
                parameters = self.q_function.size(),
                "Training complete"
            );
            for (key, value) in self.q_function.parameters() {
                info!(key = %key, value, "Learned parameter");
            }
        }

        if self.freeze_after_training
            && self.episodes.is_in_testing()
            && (self.epsilon > 0.0 || self.alpha > 0.0)
        {
            info!(
                episodes = self.episodes.episodes_so_far(),
                "Training budget exhausted, disabling exploration and learning"
            );
            self.epsilon = 0.0;
            self.alpha = 0.0;
        }
    }

    pub fn q_function(&self) -> &Q {
        &self.q_function
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Set the exploration rate, e.g. to anneal it towards zero
    pub fn set_epsilon(&mut self, epsilon: f64) -> forage_core::Result<()> {
        check_epsilon(epsilon)?;
        self.epsilon = epsilon;
        Ok(())
    }

    pub fn is_in_training(&self) -> bool {
        self.episodes.is_in_training()
    }

    pub fn is_in_testing(&self) -> bool {
        self.episodes.is_in_testing()
    }

    pub fn episode_stats(&self) -> EpisodeStats {
        self.episodes.stats()
    }

    /// Get learning parameters as JSON
    pub fn get_params(&self) -> serde_json::Value {
        serde_json::json!({
            "algorithm": self.q_function.name(),
            "epsilon": self.epsilon,
            "alpha": self.alpha,
            "gamma": self.gamma,
            "num_training": self.episodes.num_training(),
            "episodes_so_far": self.episodes.episodes_so_far(),
            "parameter_count": self.q_function.size()
        })
    }

    /// Set learning parameters from JSON; absent keys keep their value
    pub fn set_params(&mut self, params: serde_json::Value) -> anyhow::Result<()> {
        let epsilon = params["epsilon"].as_f64();
        let alpha = params["alpha"].as_f64();
        let gamma = params["gamma"].as_f64();

        epsilon.map(check_epsilon).transpose()?;
        alpha.map(check_alpha).transpose()?;
        gamma.map(check_gamma).transpose()?;

        self.epsilon = epsilon.unwrap_or(self.epsilon);
        self.alpha = alpha.unwrap_or(self.alpha);
        self.gamma = gamma.unwrap_or(self.gamma);
        Ok(())
    }
}

impl<S: LearningState> QLearningAgent<S> {
    /// Create a tabular agent; the extractor setting is not used
    pub fn new(config: &AgentConfig) -> forage_core::Result<Self> {
        Self::with_q_function(config, TabularQ::new())
    }
}

impl<S: LearningState> ApproximateQAgent<S> {
    /// Create an approximate agent around a specific extractor
    pub fn with_extractor(
        config: &AgentConfig,
        extractor: Box<dyn FeatureExtractor<S>>,
    ) -> forage_core::Result<Self> {
        Self::with_q_function(config, LinearQ::new(extractor))
    }

    /// The learned weight vector, keyed by feature
    pub fn weights(&self) -> &ValueStore<Feature<S>> {
        self.q_function.weights()
    }
}

impl ApproximateQAgent<GameState> {
    /// Create an approximate agent with the configured extractor
    pub fn new(config: &AgentConfig) -> forage_core::Result<Self> {
        let kind = config.extractor_kind()?;
        info!(extractor = kind.name(), "Using feature extractor");
        Self::with_extractor(config, kind.build())
    }
}

impl<S: LearningState, Q: QFunction<S>> ReinforcementAgent<S> for LearningAgent<S, Q> {
    fn name(&self) -> &str {
        self.q_function.name()
    }

    fn get_action(&mut self, state: &S) -> Option<Action> {
        LearningAgent::get_action(self, state)
    }

    fn update(&mut self, state: &S, action: Action, next_state: &S, reward: Reward) {
        LearningAgent::update(self, state, action, next_state, reward);
    }

    fn final_episode(&mut self, state: &S) {
        LearningAgent::final_episode(self, state);
    }

    fn get_params(&self) -> serde_json::Value {
        LearningAgent::get_params(self)
    }

    fn set_params(&mut self, params: serde_json::Value) -> anyhow::Result<()> {
        LearningAgent::set_params(self, params)
    }
}

impl<S: LearningState, Q: QFunction<S> + std::fmt::Debug> std::fmt::Debug for LearningAgent<S, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearningAgent")
            .field("q_function", &self.q_function)
            .field("epsilon", &self.epsilon)
            .field("alpha", &self.alpha)
            .field("gamma", &self.gamma)
            .field("episodes", &self.episodes)
            .finish_non_exhaustive()
    }
}
