use log::trace;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::core::Player;
use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::{Error, Result};

/// Plays uniformly random empty cells. Stands in for the human in unattended training.
pub struct RandomAi<R> {
    rng: R,
}

impl<R: rand::Rng> Player for RandomAi<R> {
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr> {
        let moves = b.valid_moves();
        let action = *moves.choose(&mut self.rng).ok_or(Error::EmptyActionSet)?;
        trace!("Random AI plays {}", action);
        Ok(action)
    }
}

impl RandomAi<StdRng> {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}
