use std::io::{BufRead, Write};

use crate::core::{Player, PlayerMark};
use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::{Error, Result};

/// A human typing moves, one per line
pub struct ConsolePlayer<I> {
    input: I,
    pub name: String,
}

impl ConsolePlayer<std::io::StdinLock<'static>> {
    pub fn stdin(mark: PlayerMark) -> Self {
        ConsolePlayer::new(std::io::stdin().lock(), mark)
    }
}

impl<I: BufRead> ConsolePlayer<I> {
    pub fn new(input: I, mark: PlayerMark) -> Self {
        ConsolePlayer {
            input,
            name: mark.to_string(),
        }
    }

    fn read_number(&mut self) -> Result<usize> {
        loop {
            print!("Enter your move (0-8): ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::InputClosed);
            }
            let line = line.trim();
            if line.is_empty() {
                eprintln!("At least one non-space character must be input");
                continue;
            }
            match line.parse::<usize>() {
                Ok(num) if (0..=8).contains(&num) => return Ok(num),
                Ok(_) => eprintln!("Number not in range 0-8"),
                Err(_) => eprintln!("Must input a number"),
            }
        }
    }
}

impl<I: BufRead> Player for ConsolePlayer<I> {
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr> {
        println!("Time for {} to make a move", self.name);
        print!("{}", b);
        let num = self.read_number()?;
        TTTAddr::new(num)
    }

    fn rejected(&mut self, err: &Error) {
        eprintln!("Invalid move. Try again. ({err})");
    }
}
