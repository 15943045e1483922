//! Epsilon-greedy action selection

use itertools::Itertools as _;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::agent::q_table::QTable;
use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::{Error, Result};

/// With probability `epsilon` a uniformly random legal action, otherwise one of the
/// actions with the highest value. Ties are broken uniformly at random, so equal
/// estimates do not favour low numbered cells.
pub fn select_action<R: Rng>(
    table: &QTable,
    state: &TTTBoard,
    legal_actions: &[TTTAddr],
    epsilon: f64,
    rng: &mut R,
) -> Result<TTTAddr> {
    if legal_actions.is_empty() {
        return Err(Error::EmptyActionSet);
    }
    if rng.gen::<f64>() < epsilon {
        return legal_actions.choose(rng).copied().ok_or(Error::EmptyActionSet);
    }
    greedy_actions(table, state, legal_actions)
        .choose(rng)
        .copied()
        .ok_or(Error::EmptyActionSet)
}

/// All legal actions sharing the maximal value
pub fn greedy_actions(table: &QTable, state: &TTTBoard, legal_actions: &[TTTAddr]) -> Vec<TTTAddr> {
    legal_actions
        .iter()
        .map(|&action| (action, table.value(state, action)))
        .max_set_by(|(_, q1), (_, q2)| q1.total_cmp(q2))
        .into_iter()
        .map(|(action, _)| action)
        .collect()
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::str::FromStr;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn empty_action_set_is_an_error() {
        let table = QTable::new();
        let mut rng = StdRng::seed_from_u64(1);
        let b = TTTBoard::from_str("xxxoo    ").unwrap();
        let err = select_action(&table, &b, &b.valid_moves(), 0.1, &mut rng).unwrap_err();
        assert!(matches!(err, Error::EmptyActionSet));
    }

    #[test]
    fn greedy_picks_unique_best() {
        let mut table = QTable::new();
        let b = TTTBoard::from_str("x   o    ").unwrap();
        table.set(b, TTTAddr(8), 0.7);
        table.set(b, TTTAddr(2), 0.3);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let a = select_action(&table, &b, &b.valid_moves(), 0.0, &mut rng).unwrap();
            assert_eq!(a, TTTAddr(8));
        }
    }

    #[test]
    fn greedy_set_holds_all_ties() {
        let mut table = QTable::new();
        let b = TTTBoard::new();
        table.set(b, TTTAddr(0), 1.0);
        table.set(b, TTTAddr(4), 1.0);
        table.set(b, TTTAddr(8), 0.5);
        let mut set = greedy_actions(&table, &b, &b.valid_moves());
        set.sort();
        assert_eq!(set, vec![TTTAddr(0), TTTAddr(4)]);
    }

    #[test]
    fn ties_are_broken_uniformly() {
        let table = QTable::new();
        let b = TTTBoard::from_str("xo  x o  ").unwrap();
        let legal = b.valid_moves();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<TTTAddr, usize> = HashMap::new();
        let trials = 1000;
        for _ in 0..trials {
            let a = select_action(&table, &b, &legal, 0.0, &mut rng).unwrap();
            assert!(legal.contains(&a));
            *counts.entry(a).or_default() += 1;
        }
        assert_eq!(counts.len(), legal.len());
        let expected = trials / legal.len();
        for (&a, &n) in counts.iter() {
            assert!(n > expected / 2 && n < expected * 3 / 2, "{a} chosen {n} times");
        }
    }

    #[test]
    fn exploration_reaches_non_greedy_moves() {
        let mut table = QTable::new();
        let b = TTTBoard::new();
        table.set(b, TTTAddr(4), 10.0);
        let mut rng = StdRng::seed_from_u64(3);
        let n_other = (0..1000)
            .map(|_| select_action(&table, &b, &b.valid_moves(), 1.0, &mut rng).unwrap())
            .filter(|&a| a != TTTAddr(4))
            .count();
        // 8 of 9 cells are non-greedy
        assert!(n_other > 800, "{n_other}");
    }

    #[test]
    fn same_seed_same_choices() {
        let table = QTable::new();
        let b = TTTBoard::new();
        let legal = b.valid_moves();
        let mut r1 = StdRng::seed_from_u64(11);
        let mut r2 = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(
                select_action(&table, &b, &legal, 0.3, &mut r1).unwrap(),
                select_action(&table, &b, &legal, 0.3, &mut r2).unwrap()
            );
        }
    }
}
