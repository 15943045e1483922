//! The core abstractions for this application
//!

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::game::Outcome;
use crate::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerMark {
    Cross,
    Naught,
}

impl PlayerMark {
    /// The human always plays crosses
    pub const HUMAN: PlayerMark = PlayerMark::Cross;
    /// The learning agent always plays naughts
    pub const AGENT: PlayerMark = PlayerMark::Naught;

    pub fn other(&self) -> Self {
        match *self {
            Self::Cross => Self::Naught,
            Self::Naught => Self::Cross,
        }
    }
}

impl Display for PlayerMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerMark::Cross => write!(f, "X"),
            PlayerMark::Naught => write!(f, "O"),
        }
    }
}

/// The Player trait is the seat opposite the agent.
pub trait Player {
    /// You observe the whole board through a reference and return where to play.
    /// The move may be illegal; the training loop asks again in that case.
    /// Returns `Error::InputClosed` when no more moves will ever come.
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr>;

    /// Told when the last move could not be placed, before being asked again
    fn rejected(&mut self, _err: &Error) {}
}

/// Consumes the board after every placed marker
pub trait Renderer {
    fn new_game(&mut self, _b: &TTTBoard) {}
    fn show(&mut self, b: &TTTBoard);
    fn game_over(&mut self, _outcome: Outcome) {}
}

/// Prints the board to stdout
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn new_game(&mut self, b: &TTTBoard) {
        println!("Welcome to the Tic-Tac-Toe Game!");
        print!("{}", b);
    }

    fn show(&mut self, b: &TTTBoard) {
        print!("{}", b);
    }

    fn game_over(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::AgentWon => println!("Player {} won", PlayerMark::AGENT),
            Outcome::HumanWon => println!("Player {} won", PlayerMark::HUMAN),
            Outcome::Draw => println!("It's a tie."),
        }
        println!("Game over.");
    }
}

/// Used for unattended training
pub struct NoRender;

impl Renderer for NoRender {
    fn show(&mut self, _b: &TTTBoard) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Ord, PartialOrd)]
pub enum GameStatus {
    Undecided,
    Draw,
    Won(PlayerMark),
}
