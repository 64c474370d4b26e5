//! Forage Core - Grid-world snapshot types shared by the learners
//!
//! This crate provides the world model the learning agents read: grid
//! positions, boolean occupancy grids, the closed action set, adversary
//! states and the immutable `GameState` snapshot handed over by the
//! environment on every step.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod action;
pub mod error;
pub mod grid;
pub mod state;

pub use action::Action;
pub use error::{ForageError, Result};
pub use grid::{Grid, Position};
pub use state::{GameState, Ghost};
