//! Construction-time configuration for the learning agents

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use forage_core::ForageError;
use serde::{Deserialize, Serialize};

use crate::features::ExtractorKind;

/// Learning parameters and extractor selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Exploration probability in [0, 1]
    pub epsilon: f64,

    /// Learning rate in (0, 1]
    pub alpha: f64,

    /// Discount factor in [0, 1]
    pub gamma: f64,

    /// Episodes after which exploration and learning are switched off
    pub num_training: u32,

    /// Feature extractor name, e.g. "SimpleExtractor"
    pub extractor: String,

    /// Seed for exploration and tie-breaking; entropy when unset
    pub seed: Option<u64>,

    /// Zero epsilon and alpha once `num_training` episodes have finished
    pub freeze_after_training: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.05,
            alpha: 0.2,
            gamma: 0.8,
            num_training: 0,
            extractor: ExtractorKind::Identity.name().to_string(),
            seed: None,
            freeze_after_training: true,
        }
    }
}

impl AgentConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = path {
            // An explicit path must exist
            tracing::info!("Loading agent config from: {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        } else if let Some(path) = Self::find_config_file() {
            tracing::info!("Loading agent config from: {:?}", path);
            builder = builder.add_source(File::from(path).required(false));
        } else {
            tracing::info!("No agent config file found, using defaults");
        }

        // Environment variables with FORAGE_ prefix, e.g. FORAGE_NUM_TRAINING
        builder = builder.add_source(
            Environment::with_prefix("FORAGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to read agent configuration")?
            .try_deserialize()
            .context("Failed to deserialize agent configuration")?;

        config.validate().context("Invalid agent configuration")?;
        Ok(config)
    }

    /// Find the configuration file
    fn find_config_file() -> Option<PathBuf> {
        // Check in order: FORAGE_CONFIG env, ./forage.toml, ~/.config/forage/forage.toml
        if let Ok(path) = std::env::var("FORAGE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("forage.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("forage").join("forage.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Check parameter ranges and the extractor name
    pub fn validate(&self) -> forage_core::Result<()> {
        validate_learning_params(self.epsilon, self.alpha, self.gamma)?;
        self.extractor_kind()?;
        Ok(())
    }

    /// The configured extractor; unknown names are a configuration error
    pub fn extractor_kind(&self) -> forage_core::Result<ExtractorKind> {
        self.extractor.parse()
    }
}

pub(crate) fn validate_learning_params(
    epsilon: f64,
    alpha: f64,
    gamma: f64,
) -> forage_core::Result<()> {
    check_epsilon(epsilon)?;
    check_alpha(alpha)?;
    check_gamma(gamma)
}

pub(crate) fn check_epsilon(epsilon: f64) -> forage_core::Result<()> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(())
    } else {
        Err(ForageError::InvalidParameter(format!(
            "epsilon must be in [0, 1], got {epsilon}"
        )))
    }
}

pub(crate) fn check_alpha(alpha: f64) -> forage_core::Result<()> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(ForageError::InvalidParameter(format!(
            "alpha must be in (0, 1], got {alpha}"
        )))
    }
}

pub(crate) fn check_gamma(gamma: f64) -> forage_core::Result<()> {
    if (0.0..=1.0).contains(&gamma) {
        Ok(())
    } else {
        Err(ForageError::InvalidParameter(format!(
            "gamma must be in [0, 1], got {gamma}"
        )))
    }
}
