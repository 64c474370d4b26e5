//! Episode bookkeeping for the harness-facing agent protocol

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::Reward;

/// Episodes between progress reports
pub const REPORT_INTERVAL: u32 = 100;

/// Tracks episode counts and accumulated rewards across training and testing
#[derive(Debug, Clone, Default)]
pub struct EpisodeTracker {
    num_training: u32,
    episodes_so_far: u32,
    episode_rewards: Reward,
    last_episode_reward: Reward,
    accum_train_rewards: Reward,
    accum_test_rewards: Reward,
    window_rewards: Reward,
}

impl EpisodeTracker {
    pub fn new(num_training: u32) -> Self {
        Self {
            num_training,
            ..Self::default()
        }
    }

    /// Reset the running reward of the current episode
    pub fn start_episode(&mut self) {
        self.episode_rewards = 0.0;
    }

    pub fn record_reward(&mut self, reward: Reward) {
        self.episode_rewards += reward;
    }

    /// Close the current episode and return its total reward
    pub fn stop_episode(&mut self) -> Reward {
        let reward = self.episode_rewards;

        if self.is_in_training() {
            self.accum_train_rewards += reward;
        } else {
            self.accum_test_rewards += reward;
        }
        self.window_rewards += reward;
        self.last_episode_reward = reward;
        self.episode_rewards = 0.0;
        self.episodes_so_far += 1;

        if self.episodes_so_far % REPORT_INTERVAL == 0 {
            info!(
                episodes = self.episodes_so_far,
                window_average = self.window_rewards / f64::from(REPORT_INTERVAL),
                phase = if self.is_in_training() { "training" } else { "testing" },
                "Episode progress"
            );
            self.window_rewards = 0.0;
        }

        if self.episodes_so_far == self.num_training {
            info!(
                episodes = self.episodes_so_far,
                average_train_reward = self.average_train_reward(),
                "Training done"
            );
        }

        reward
    }

    pub fn is_in_training(&self) -> bool {
        self.episodes_so_far < self.num_training
    }

    pub fn is_in_testing(&self) -> bool {
        !self.is_in_training()
    }

    /// Whether the episode just closed was the last training episode
    pub fn training_just_finished(&self) -> bool {
        self.num_training > 0 && self.episodes_so_far == self.num_training
    }

    pub fn episodes_so_far(&self) -> u32 {
        self.episodes_so_far
    }

    pub fn num_training(&self) -> u32 {
        self.num_training
    }

    /// Reward accumulated so far in the open episode
    pub fn current_episode_reward(&self) -> Reward {
        self.episode_rewards
    }

    fn average_train_reward(&self) -> f64 {
        let episodes = self.episodes_so_far.min(self.num_training);
        if episodes > 0 {
            self.accum_train_rewards / f64::from(episodes)
        } else {
            0.0
        }
    }

    fn average_test_reward(&self) -> f64 {
        let episodes = self.episodes_so_far.saturating_sub(self.num_training);
        if episodes > 0 {
            self.accum_test_rewards / f64::from(episodes)
        } else {
            0.0
        }
    }

    pub fn stats(&self) -> EpisodeStats {
        EpisodeStats {
            episodes_so_far: self.episodes_so_far,
            num_training: self.num_training,
            in_training: self.is_in_training(),
            last_episode_reward: self.last_episode_reward,
            accum_train_rewards: self.accum_train_rewards,
            accum_test_rewards: self.accum_test_rewards,
            average_train_reward: self.average_train_reward(),
            average_test_reward: self.average_test_reward(),
        }
    }
}

/// Episode statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub episodes_so_far: u32,
    pub num_training: u32,
    pub in_training: bool,
    pub last_episode_reward: f64,
    pub accum_train_rewards: f64,
    pub accum_test_rewards: f64,
    pub average_train_reward: f64,
    pub average_test_reward: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_creation() {
        let tracker = EpisodeTracker::new(10);
        assert_eq!(tracker.episodes_so_far(), 0);
        assert!(tracker.is_in_training());
        assert!(!tracker.is_in_testing());
    }

    #[test]
    fn test_zero_budget_is_testing_from_start() {
        let tracker = EpisodeTracker::new(0);
        assert!(tracker.is_in_testing());
        assert!(!tracker.training_just_finished());
    }

    #[test]
    fn test_episode_rewards_accumulate() {
        let mut tracker = EpisodeTracker::new(2);

        tracker.start_episode();
        tracker.record_reward(1.0);
        tracker.record_reward(-0.5);
        assert_eq!(tracker.current_episode_reward(), 0.5);
        assert_eq!(tracker.stop_episode(), 0.5);

        tracker.start_episode();
        tracker.record_reward(1.5);
        tracker.stop_episode();
        assert!(tracker.training_just_finished());

        tracker.start_episode();
        tracker.record_reward(4.0);
        tracker.stop_episode();

        let stats = tracker.stats();
        assert_eq!(stats.episodes_so_far, 3);
        assert!(!stats.in_training);
        assert_eq!(stats.accum_train_rewards, 2.0);
        assert_eq!(stats.accum_test_rewards, 4.0);
        assert_eq!(stats.average_train_reward, 1.0);
        assert_eq!(stats.average_test_reward, 4.0);
        assert_eq!(stats.last_episode_reward, 4.0);
    }

    #[test]
    fn test_start_episode_discards_open_rewards() {
        let mut tracker = EpisodeTracker::new(5);
        tracker.record_reward(3.0);
        tracker.start_episode();
        assert_eq!(tracker.current_episode_reward(), 0.0);
    }

    #[test]
    fn test_report_interval_resets_window() {
        let mut tracker = EpisodeTracker::new(1000);
        for _ in 0..REPORT_INTERVAL {
            tracker.start_episode();
            tracker.record_reward(1.0);
            tracker.stop_episode();
        }
        assert_eq!(tracker.window_rewards, 0.0);
        assert_eq!(tracker.stats().accum_train_rewards, 100.0);
    }

    #[test]
    fn test_stats_serialization() {
        let tracker = EpisodeTracker::new(3);
        let json = serde_json::to_string(&tracker.stats()).unwrap();
        assert!(json.contains("\"num_training\":3"));
    }
}
