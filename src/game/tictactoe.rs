use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{GameStatus, PlayerMark};
use crate::{Error, Result};

/// Represents a coordinate on the board
///
///  0 1 2
///  3 4 5
///  6 7 8
///
/// invariant: the number inside must be 0-8
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct TTTAddr(pub usize);

impl TTTAddr {
    pub fn new(num: usize) -> Result<Self> {
        if num < 9 {
            Ok(TTTAddr(num))
        } else {
            Err(Error::IllegalMove {
                addr: num,
                reason: "position must be in the range 0-8",
            })
        }
    }
}

impl TryFrom<usize> for TTTAddr {
    type Error = Error;
    fn try_from(num: usize) -> Result<Self> {
        TTTAddr::new(num)
    }
}

impl From<TTTAddr> for usize {
    fn from(a: TTTAddr) -> usize {
        a.0
    }
}

impl std::fmt::Display for TTTAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// 3 rows (top to bottom), 3 columns (left to right) and the two diagonals
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The board entries from top left row wise to bottom right. `None` is an empty cell.
///
/// Boards are values: placing a marker produces a new board, so a board that is used
/// as a key in the Q-table can never change under it.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TTTBoard([Option<PlayerMark>; 9]);

impl TTTBoard {
    pub fn new() -> Self {
        Self([None; 9])
    }

    /// The marker at `a`, `None` for an empty cell
    pub fn cell(&self, a: TTTAddr) -> Result<Option<PlayerMark>> {
        Ok(self.0[TTTAddr::new(a.0)?.0])
    }

    /// A copy of this board with `marker` placed at `a`.
    pub fn apply(&self, a: TTTAddr, marker: PlayerMark) -> Result<Self> {
        let num = TTTAddr::new(a.0)?.0;
        if self.0[num].is_some() {
            return Err(Error::occupied(a));
        }
        let mut next = *self;
        next.0[num] = Some(marker);
        Ok(next)
    }

    /// Does `marker` hold a full row, column or diagonal?
    pub fn winner(&self, marker: PlayerMark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&num| self.0[num] == Some(marker)))
    }

    /// Every cell is taken. Says nothing about a winner; check that first.
    pub fn is_tie(&self) -> bool {
        self.0.iter().all(|q| q.is_some())
    }

    pub fn game_status(&self) -> GameStatus {
        if self.winner(PlayerMark::Cross) {
            GameStatus::Won(PlayerMark::Cross)
        } else if self.winner(PlayerMark::Naught) {
            GameStatus::Won(PlayerMark::Naught)
        } else if self.is_tie() {
            GameStatus::Draw
        } else {
            GameStatus::Undecided
        }
    }

    pub fn game_is_over(&self) -> bool {
        !matches!(self.game_status(), GameStatus::Undecided)
    }

    /// The empty cells, or nothing at all once the game is decided.
    pub fn valid_moves(&self) -> Vec<TTTAddr> {
        if self.game_is_over() {
            return Vec::new();
        }
        self.empty_cells()
    }

    fn empty_cells(&self) -> Vec<TTTAddr> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(num, &mark)| if mark.is_none() { Some(TTTAddr(num)) } else { None })
            .collect()
    }

    pub fn n_moves_made(&self) -> usize {
        self.0.iter().filter(|&q| q.is_some()).count()
    }
}

impl FromStr for TTTBoard {
    type Err = String;

    /// Nine characters, row wise. `x` and `o` in either case, blank or `.` for empty.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.chars().count() != 9 {
            return Err(format!("Expected 9 cells, got {}", s.chars().count()));
        }
        let mut b = Self::new();
        for (num, c) in s.chars().enumerate() {
            b.0[num] = match c {
                'x' | 'X' => Some(PlayerMark::Cross),
                'o' | 'O' => Some(PlayerMark::Naught),
                ' ' | '.' => None,
                _ => {
                    return Err(format!(
                        "Invalid character {c:?}. May only contain x, o, . or blank space"
                    ))
                }
            };
        }
        Ok(b)
    }
}

impl std::fmt::Display for TTTBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = |m| match m {
            None => ' ',
            Some(PlayerMark::Cross) => 'X',
            Some(PlayerMark::Naught) => 'O',
        };
        writeln!(f, "-------------")?;
        for row in self.0.chunks(3) {
            write!(f, "|")?;
            row.iter().try_for_each(|&mark| write!(f, " {} |", m(mark)))?;
            writeln!(f)?;
            writeln!(f, "-------------")?;
        }
        Ok(())
    }
}
