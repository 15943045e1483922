//! Table of state-action value estimates

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::tictactoe::{TTTAddr, TTTBoard};

/// Maps (board, action) pairs to the current estimate of their value for the agent.
/// A pair that was never stored has value 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    data: HashMap<(TTTBoard, TTTAddr), f64>,
}

impl QTable {
    pub fn new() -> Self {
        QTable {
            data: HashMap::new(),
        }
    }

    pub fn value(&self, state: &TTTBoard, action: TTTAddr) -> f64 {
        self.data.get(&(*state, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: TTTBoard, action: TTTAddr, value: f64) {
        self.data.insert((state, action), value);
    }

    /// Largest value over `legal_actions`. A terminal state has none and is worth 0.
    pub fn best_value(&self, state: &TTTBoard, legal_actions: &[TTTAddr]) -> f64 {
        legal_actions
            .iter()
            .map(|&action| self.value(state, action))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// One-step Q-learning
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Returns the new estimate for (s,a).
    pub fn update(
        &mut self,
        prev_state: TTTBoard,
        prev_action: TTTAddr,
        next_state: &TTTBoard,
        reward: f64,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let current = self.value(&prev_state, prev_action);
        let target = reward + gamma * self.best_value(next_state, &next_state.valid_moves());
        let updated = current + alpha * (target - current);
        self.set(prev_state, prev_action, updated);
        updated
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(TTTBoard, TTTAddr), &f64)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn unseen_pairs_are_zero() {
        let table = QTable::new();
        assert_eq!(table.value(&TTTBoard::new(), TTTAddr(4)), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn best_value_over_legal_only() {
        let mut table = QTable::new();
        let s = TTTBoard::from_str("x        ").unwrap();
        table.set(s, TTTAddr(1), 0.5);
        table.set(s, TTTAddr(2), -0.25);
        table.set(s, TTTAddr(8), 3.0);
        assert_eq!(table.best_value(&s, &[TTTAddr(1), TTTAddr(2)]), 0.5);
        assert_eq!(table.best_value(&s, &[TTTAddr(2)]), -0.25);
        assert_eq!(table.best_value(&s, &[]), 0.0);
    }

    #[test]
    fn update_bootstraps_from_next_state() {
        let mut table = QTable::new();
        let s = TTTBoard::from_str("x        ").unwrap();
        let next = TTTBoard::from_str("xo x     ").unwrap();
        table.set(next, TTTAddr(4), 1.0);
        table.set(next, TTTAddr(5), 2.0);
        let q = table.update(s, TTTAddr(1), &next, 0.0, 0.5, 0.9);
        // 0 + 0.5 * (0 + 0.9 * 2 - 0)
        assert!((q - 0.9).abs() < 1e-12);
        assert_eq!(table.value(&s, TTTAddr(1)), q);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn terminal_next_state_has_no_continuation() {
        let mut table = QTable::new();
        let s = TTTBoard::from_str("xx oo    ").unwrap();
        let won = TTTBoard::from_str("xx ooo   ").unwrap();
        // a stale value for a terminal board must not leak into the target
        table.set(won, TTTAddr(2), 100.0);
        let q = table.update(s, TTTAddr(5), &won, 1.0, 0.1, 0.9);
        assert!((q - 0.1).abs() < 1e-12);
    }

    #[test]
    fn repeated_updates_converge_to_reward() {
        let mut table = QTable::new();
        let s = TTTBoard::from_str("xx oo    ").unwrap();
        let won = TTTBoard::from_str("xx ooo   ").unwrap();
        for _ in 0..1000 {
            table.update(s, TTTAddr(5), &won, 1.0, 0.1, 0.9);
        }
        let q = table.value(&s, TTTAddr(5));
        assert!(q > 0.99, "got {q}");
        assert!(q <= 1.0);
    }

    #[test]
    fn negative_rewards_are_stored() {
        let mut table = QTable::new();
        let s = TTTBoard::from_str("xx oo    ").unwrap();
        let lost = TTTBoard::from_str("xxxoo o  ").unwrap();
        let q = table.update(s, TTTAddr(6), &lost, -1.0, 0.1, 0.9);
        assert!((q + 0.1).abs() < 1e-12);
    }
}
