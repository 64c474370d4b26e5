//! Forage RL - Reinforcement learning for a grid-world forager
//!
//! This crate provides a tabular Q-learner and a linear approximate
//! Q-learner sharing one epsilon-greedy policy core, together with the
//! feature extractors and bounded grid searches that turn a world
//! snapshot into named numeric signals.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod algorithm;
pub mod config;
pub mod episode;
pub mod extractors;
pub mod features;
pub mod observe;
pub mod search;
pub mod state;
pub mod value_store;

pub use agent::{ApproximateQAgent, LearningAgent, QLearningAgent, ReinforcementAgent};
pub use algorithm::{LinearQ, QFunction, TabularQ};
pub use config::AgentConfig;
pub use episode::{EpisodeStats, EpisodeTracker};
pub use extractors::{CoordinateExtractor, IdentityExtractor, SimpleExtractor};
pub use features::{ExtractorKind, Feature, FeatureExtractor, FeatureVector};
pub use observe::UpdateReport;
pub use state::{LearningState, Reward, Transition};
pub use value_store::ValueStore;
