//! The closed action set of the grid world

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ForageError;

/// A move available to the agent on a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    North,
    South,
    East,
    West,
    Stop,
}

impl Action {
    /// Every action, in the order neighbours are enumerated
    pub const ALL: [Action; 5] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stop,
    ];

    /// Direction vector `(dx, dy)`; `y` grows northwards
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Action::North => (0, 1),
            Action::South => (0, -1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
            Action::Stop => (0, 0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Action::North => "North",
            Action::South => "South",
            Action::East => "East",
            Action::West => "West",
            Action::Stop => "Stop",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ForageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "north" => Ok(Action::North),
            "south" => Ok(Action::South),
            "east" => Ok(Action::East),
            "west" => Ok(Action::West),
            "stop" => Ok(Action::Stop),
            other => Err(ForageError::InvalidParameter(format!(
                "unknown action: {other}"
            ))),
        }
    }
}
