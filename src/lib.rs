//! A tic-tac-toe opponent that learns by tabular Q-learning.
//!
//! The agent plays naughts against a human (or a stand-in for one) playing crosses,
//! and updates its table of state-action values after every move it made.

pub mod agent;
pub mod core;
pub mod error;
pub mod game;
pub mod persistence;
pub mod player;
pub mod record;

pub use error::{Error, Result};
