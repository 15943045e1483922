pub mod tictactoe;
pub mod training;

pub use training::{play_training_game, GameSummary, Outcome, TrainingSession, TrainingStats};
