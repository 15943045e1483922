use std::collections::VecDeque;

use crate::core::Player;
use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::{Error, Result};

/// Plays a fixed list of cells in order, then reports its input as closed.
/// Cells are not checked, so a script can contain illegal moves.
pub struct ScriptedPlayer {
    moves: VecDeque<usize>,
    rejections: usize,
}

impl ScriptedPlayer {
    pub fn new(moves: impl IntoIterator<Item = usize>) -> Self {
        ScriptedPlayer {
            moves: moves.into_iter().collect(),
            rejections: 0,
        }
    }

    /// How many of the played moves the game refused
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Player for ScriptedPlayer {
    fn play(&mut self, _b: &TTTBoard) -> Result<TTTAddr> {
        self.moves.pop_front().map(TTTAddr).ok_or(Error::InputClosed)
    }

    fn rejected(&mut self, _err: &Error) {
        self.rejections += 1;
    }
}
