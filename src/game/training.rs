//! The training loop: the human moves, the agent answers, and the agent's previous
//! decision is scored once the consequence of it is known.

use log::{debug, error, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::{QAgent, QTable};
use crate::core::{Player, PlayerMark, Renderer};
use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    AgentWon,
    HumanWon,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingHumanMove,
    AfterHumanMove,
    AwaitingAgentMove,
    AfterAgentMove,
    GameOver(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSummary {
    pub outcome: Outcome,
    pub final_board: TTTBoard,
    pub agent_moves: usize,
    /// Q-table updates made during the game
    pub updates: usize,
}

/// Play one game from an empty board, updating the agent's table as it goes.
///
/// Illegal human moves are reported back to the player and asked for again.
/// `Error::InputClosed` from the player ends the game without any further update.
pub fn play_training_game<R: Rng>(
    agent: &mut QAgent<R>,
    human: &mut dyn Player,
    renderer: &mut dyn Renderer,
) -> Result<GameSummary> {
    let rewards = *agent.rewards();
    let mut board = TTTBoard::new();
    // the agent's last decision, waiting for its consequence
    let mut pending: Option<(TTTBoard, TTTAddr)> = None;
    let mut agent_moves = 0;
    let mut updates = 0;
    let mut phase = Phase::AwaitingHumanMove;
    renderer.new_game(&board);

    loop {
        phase = match phase {
            Phase::AwaitingHumanMove => {
                let action = human.play(&board)?;
                match board.apply(action, PlayerMark::HUMAN) {
                    Ok(next) => {
                        debug!("Player {} played {}", PlayerMark::HUMAN, action);
                        board = next;
                        renderer.show(&board);
                        Phase::AfterHumanMove
                    }
                    Err(e @ Error::IllegalMove { .. }) => {
                        warn!("{e}");
                        human.rejected(&e);
                        Phase::AwaitingHumanMove
                    }
                    Err(e) => return Err(e),
                }
            }
            Phase::AfterHumanMove => {
                let terminal = if board.winner(PlayerMark::HUMAN) {
                    Some((Outcome::HumanWon, rewards.loss))
                } else if board.is_tie() {
                    Some((Outcome::Draw, rewards.tie))
                } else {
                    None
                };
                if let Some((state, action)) = pending.take() {
                    let reward = terminal.map_or(0.0, |(_, r)| r);
                    agent.learn(state, action, &board, reward);
                    updates += 1;
                }
                match terminal {
                    Some((outcome, _)) => Phase::GameOver(outcome),
                    None => Phase::AwaitingAgentMove,
                }
            }
            Phase::AwaitingAgentMove => {
                let action = agent.select_move(&board)?;
                let next = board.apply(action, PlayerMark::AGENT)?;
                debug!("Player {} played {}", PlayerMark::AGENT, action);
                pending = Some((board, action));
                board = next;
                agent_moves += 1;
                renderer.show(&board);
                Phase::AfterAgentMove
            }
            Phase::AfterAgentMove => {
                let terminal = if board.winner(PlayerMark::AGENT) {
                    Some((Outcome::AgentWon, rewards.win))
                } else if board.is_tie() {
                    Some((Outcome::Draw, rewards.tie))
                } else {
                    None
                };
                match terminal {
                    Some((outcome, reward)) => {
                        if let Some((state, action)) = pending.take() {
                            agent.learn(state, action, &board, reward);
                            updates += 1;
                        }
                        Phase::GameOver(outcome)
                    }
                    None => Phase::AwaitingHumanMove,
                }
            }
            Phase::GameOver(outcome) => {
                debug!("Game ended with {:?}\n{}", outcome, board);
                renderer.game_over(outcome);
                return Ok(GameSummary {
                    outcome,
                    final_board: board,
                    agent_moves,
                    updates,
                });
            }
        };
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingStats {
    pub games_played: usize,
    pub agent_wins: usize,
    pub human_wins: usize,
    pub draws: usize,
    /// Games given up on because of an internal error
    pub aborted: usize,
    /// The session ended before all games were played, because the human stopped
    /// answering or reading their input failed
    pub stopped_early: bool,
}

impl TrainingStats {
    fn record(&mut self, summary: &GameSummary) {
        self.games_played += 1;
        match summary.outcome {
            Outcome::AgentWon => self.agent_wins += 1,
            Outcome::HumanWon => self.human_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

/// Repeated games between one agent and one opponent
pub struct TrainingSession<'a, R> {
    agent: &'a mut QAgent<R>,
    human: &'a mut dyn Player,
    renderer: &'a mut dyn Renderer,
    progress_every: usize,
}

impl<'a, R: Rng> TrainingSession<'a, R> {
    pub fn new(
        agent: &'a mut QAgent<R>,
        human: &'a mut dyn Player,
        renderer: &'a mut dyn Renderer,
    ) -> Self {
        TrainingSession {
            agent,
            human,
            renderer,
            progress_every: 1000,
        }
    }

    /// How often to log a progress line, in games
    pub fn progress_every(mut self, games: usize) -> Self {
        self.progress_every = games.max(1);
        self
    }

    /// Play up to `games` games. `on_game` sees every finished game and the table after it.
    pub fn run<F>(&mut self, games: usize, mut on_game: F) -> TrainingStats
    where
        F: FnMut(&GameSummary, &QTable),
    {
        let mut stats = TrainingStats::default();
        for n in 1..=games {
            match play_training_game(&mut *self.agent, &mut *self.human, &mut *self.renderer) {
                Ok(summary) => {
                    stats.record(&summary);
                    on_game(&summary, self.agent.q_table());
                }
                Err(e @ (Error::InputClosed | Error::Io(_))) => {
                    info!("Stopping after {} games: {}", stats.games_played, e);
                    stats.stopped_early = true;
                    break;
                }
                Err(e) => {
                    error!("Game {n} aborted: {e}");
                    stats.aborted += 1;
                }
            }
            if n % self.progress_every == 0 {
                info!(
                    "{n}/{games} games: agent {} / human {} / draw {}, {} Q-values",
                    stats.agent_wins,
                    stats.human_wins,
                    stats.draws,
                    self.agent.q_table().len()
                );
            }
        }
        stats
    }
}
