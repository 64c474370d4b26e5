//! Feature vectors and the extractor interface
//!
//! An extractor maps a `(state, action)` pair to a sparse vector of named
//! numeric signals. The approximate agent keeps one weight per feature key,
//! so a key shared across states is what lets learning generalize.

use std::fmt::Debug;
use std::str::FromStr;

use forage_core::{Action, ForageError, GameState};

use crate::extractors::{CoordinateExtractor, IdentityExtractor, SimpleExtractor};
use crate::value_store::ValueStore;

/// Key of a single feature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feature<S> {
    /// A named signal shared across states
    Named(String),
    /// Indicator for a literal state
    State(S),
    /// Indicator for a literal (state, action) pair
    StateAction(S, Action),
}

impl<S> Feature<S> {
    pub fn named(name: impl Into<String>) -> Self {
        Feature::Named(name.into())
    }
}

impl<S: Debug> std::fmt::Display for Feature<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feature::Named(name) => f.write_str(name),
            Feature::State(state) => write!(f, "{state:?}"),
            Feature::StateAction(state, action) => write!(f, "({state:?}, {action})"),
        }
    }
}

/// Sparse feature vector, produced fresh for every query.
///
/// Keys keep the order the extractor inserted them in, so dot products are
/// summed in a fixed order and equal vectors give bit-identical Q-values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<S> {
    entries: Vec<(Feature<S>, f64)>,
}

impl<S: PartialEq> FeatureVector<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set a feature, replacing any previous value for the key
    pub fn set(&mut self, feature: Feature<S>, value: f64) {
        match self.entries.iter_mut().find(|(key, _)| *key == feature) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((feature, value)),
        }
    }

    pub fn set_named(&mut self, name: &str, value: f64) {
        self.set(Feature::named(name), value);
    }

    /// Value of a feature, `0.0` when absent
    pub fn get(&self, feature: &Feature<S>) -> f64 {
        self.entries
            .iter()
            .find(|(key, _)| key == feature)
            .map_or(0.0, |(_, value)| *value)
    }

    pub fn named(&self, name: &str) -> f64 {
        self.entries
            .iter()
            .find(|(key, _)| matches!(key, Feature::Named(n) if n == name))
            .map_or(0.0, |(_, value)| *value)
    }

    /// Divide a named feature by `divisor`; absent features stay absent
    pub fn divide_named(&mut self, name: &str, divisor: f64) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(key, _)| matches!(key, Feature::Named(n) if n == name))
        {
            entry.1 /= divisor;
        }
    }

    pub fn divide_all(&mut self, divisor: f64) {
        for entry in &mut self.entries {
            entry.1 /= divisor;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Feature<S>, f64)> {
        self.entries.iter().map(|(key, value)| (key, *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: PartialEq + Eq + std::hash::Hash> FeatureVector<S> {
    /// Linear combination `Σ weight[f] · feature[f]`
    pub fn dot(&self, weights: &ValueStore<Feature<S>>) -> f64 {
        self.iter().map(|(key, value)| weights.get(key) * value).sum()
    }
}

impl<S: Debug> FeatureVector<S> {
    /// Entries rendered as `(key, value)`, sorted by rendered key
    pub fn sorted_entries(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl<S: PartialEq> Default for FeatureVector<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for feature extractors
pub trait FeatureExtractor<S>: Send + Sync {
    /// Extractor name as used in configuration
    fn name(&self) -> &'static str;

    /// Features of taking `action` in `state`. Pure: no side effects.
    fn features(&self, state: &S, action: Action) -> FeatureVector<S>;
}

/// The closed set of extractors selectable by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorKind {
    Identity,
    Coordinate,
    Simple,
}

impl ExtractorKind {
    pub const ALL: [ExtractorKind; 3] = [
        ExtractorKind::Identity,
        ExtractorKind::Coordinate,
        ExtractorKind::Simple,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ExtractorKind::Identity => "IdentityExtractor",
            ExtractorKind::Coordinate => "CoordinateExtractor",
            ExtractorKind::Simple => "SimpleExtractor",
        }
    }

    /// Construct the extractor for grid-world snapshots
    pub fn build(self) -> Box<dyn FeatureExtractor<GameState>> {
        match self {
            ExtractorKind::Identity => Box::new(IdentityExtractor),
            ExtractorKind::Coordinate => Box::new(CoordinateExtractor),
            ExtractorKind::Simple => Box::new(SimpleExtractor),
        }
    }
}

impl std::fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExtractorKind {
    type Err = ForageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identityextractor" | "identity" => Ok(ExtractorKind::Identity),
            "coordinateextractor" | "coordinate" => Ok(ExtractorKind::Coordinate),
            "simpleextractor" | "simple" => Ok(ExtractorKind::Simple),
            _ => Err(ForageError::UnknownExtractor(s.to_string())),
        }
    }
}
