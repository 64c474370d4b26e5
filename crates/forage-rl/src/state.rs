//! State, Transition, and Reward types for RL

use std::fmt::Debug;
use std::hash::Hash;

use forage_core::{Action, GameState};
use serde::{Deserialize, Serialize};

/// Reward value from environment
pub type Reward = f64;

/// A snapshot the learner can act on.
///
/// The environment owns the state; the learner only hashes it and asks
/// which actions are legal. Terminal states have no legal actions.
pub trait LearningState: Clone + Eq + Hash + Debug {
    fn legal_actions(&self) -> Vec<Action>;
}

impl LearningState for GameState {
    fn legal_actions(&self) -> Vec<Action> {
        GameState::legal_actions(self)
    }
}

/// A single observed transition (s, a, s', r)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition<S> {
    pub state: S,
    pub action: Action,
    pub next_state: S,
    pub reward: Reward,
}

impl<S> Transition<S> {
    pub fn new(state: S, action: Action, next_state: S, reward: Reward) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
        }
    }
}
