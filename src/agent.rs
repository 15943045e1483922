//! The learning agent: one Q-table, its learning parameters and its source of randomness.

pub mod policy;
pub mod q_table;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::{Error, Result};

pub use q_table::QTable;

/// Fixed for the lifetime of an agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningConfig {
    /// Learning rate, in (0, 1]
    pub alpha: f64,
    /// Discount factor, in [0, 1]
    pub gamma: f64,
    /// Exploration rate, in [0, 1]
    pub epsilon: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        LearningConfig {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
        }
    }
}

impl LearningConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::InvalidConfig(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Terminal rewards, always seen from the agent's side of the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rewards {
    pub win: f64,
    pub loss: f64,
    pub tie: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Rewards {
            win: 1.0,
            loss: -1.0,
            tie: 0.0,
        }
    }
}

pub struct QAgent<R = StdRng> {
    table: QTable,
    config: LearningConfig,
    rewards: Rewards,
    rng: R,
}

impl QAgent<StdRng> {
    /// seed is for the RNG used when exploring and breaking ties
    pub fn new(table: QTable, config: LearningConfig, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            None => StdRng::from_entropy(),
            Some(seed) => StdRng::seed_from_u64(seed),
        };
        QAgent::with_rng(table, config, rng)
    }
}

impl<R: Rng> QAgent<R> {
    pub fn with_rng(table: QTable, config: LearningConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(QAgent {
            table,
            config,
            rewards: Rewards::default(),
            rng,
        })
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// Epsilon-greedy choice among the empty cells of `board`
    pub fn select_move(&mut self, board: &TTTBoard) -> Result<TTTAddr> {
        let legal = board.valid_moves();
        policy::select_action(&self.table, board, &legal, self.config.epsilon, &mut self.rng)
    }

    /// Move the estimate for (`prev_state`, `prev_action`) toward `reward` plus the
    /// discounted value of `next_state`.
    pub fn learn(
        &mut self,
        prev_state: TTTBoard,
        prev_action: TTTAddr,
        next_state: &TTTBoard,
        reward: f64,
    ) -> f64 {
        let q = self.table.update(
            prev_state,
            prev_action,
            next_state,
            reward,
            self.config.alpha,
            self.config.gamma,
        );
        trace!("Q({prev_action} | {prev_state:?}) <- {q:.4} (reward {reward})");
        q
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.table
    }

    pub fn into_q_table(self) -> QTable {
        self.table
    }
}
