//! Train a Q-learning tic-tac-toe agent against a human on the console, or against
//! a random stand-in. The learned table is loaded at start and saved at exit.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use log::{info, warn, LevelFilter};
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use simple_logger::SimpleLogger;

use qttt::{
    agent::{LearningConfig, QAgent, Rewards},
    core::{ConsoleRenderer, NoRender, Player, PlayerMark, Renderer},
    game::TrainingSession,
    persistence::{self, DEFAULT_QFILE},
    player::{ConsolePlayer, RandomAi},
    record::{self, GameLog, GameRecord, OpponentKind, Recorder},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// More log output, repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play training games against the agent
    Train {
        /// Who plays crosses against the agent
        #[arg(short, long, default_value = "console")]
        opponent: OpponentKind,

        /// Number of games to play
        #[arg(short, long, default_value_t = 10000)]
        games: usize,

        /// Learning rate
        #[arg(long, default_value_t = 0.1)]
        alpha: f64,

        /// Discount factor
        #[arg(long, default_value_t = 0.9)]
        gamma: f64,

        /// Exploration rate
        #[arg(long, default_value_t = 0.1)]
        epsilon: f64,

        /// Reward given to the agent when the human wins
        #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
        loss_reward: f64,

        /// The seed for the random number generators
        #[arg(long)]
        seed: Option<u64>,

        /// Where the Q-table is loaded from and saved to
        #[arg(long, default_value = DEFAULT_QFILE)]
        qfile: PathBuf,

        /// Append one CSV line per game to this file
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Summarize a record file
    Report {
        #[arg(long, default_value = "score.csv")]
        record: PathBuf,

        /// Only count games against this opponent
        #[arg(short, long)]
        opponent: Option<OpponentKind>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).env().init()?;

    match args.command {
        Commands::Train {
            opponent,
            games,
            alpha,
            gamma,
            epsilon,
            loss_reward,
            seed,
            qfile,
            record,
        } => {
            let config = LearningConfig { alpha, gamma, epsilon };
            let rewards = Rewards {
                loss: loss_reward,
                ..Default::default()
            };
            train(opponent, games, config, rewards, seed, &qfile, record.as_deref())
        }
        Commands::Report { record, opponent } => {
            let report = record::summarize(&record, opponent)?;
            print!("{}", report);
            Ok(())
        }
    }
}

fn train(
    opponent: OpponentKind,
    games: usize,
    config: LearningConfig,
    rewards: Rewards,
    seed: Option<u64>,
    qfile: &std::path::Path,
    record_file: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or(StdRng::from_entropy().gen());
    info!("AI seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let table = persistence::load_or_default(qfile);
    let mut agent = QAgent::new(table, config, Some(rng.gen()))
        .context("Bad learning parameters")?
        .with_rewards(rewards);

    let (mut human, mut renderer): (Box<dyn Player>, Box<dyn Renderer>) = match opponent {
        OpponentKind::Console => (
            Box::new(ConsolePlayer::stdin(PlayerMark::HUMAN)),
            Box::new(ConsoleRenderer),
        ),
        OpponentKind::Random => (Box::new(RandomAi::new(rng.gen())), Box::new(NoRender)),
    };
    let mut game_log = GameLog::new(record_file.map(Recorder::open).transpose()?);

    let stats = TrainingSession::new(&mut agent, human.as_mut(), renderer.as_mut()).run(
        games,
        |summary, table| game_log.record(&GameRecord::new(opponent, summary, table.len())),
    );
    persistence::save_q_table(qfile, agent.q_table())
        .with_context(|| format!("Could not save the Q-table to {}", qfile.display()))?;

    println!(
        "Played {} games: agent won {}, human won {}, {} draws",
        stats.games_played, stats.agent_wins, stats.human_wins, stats.draws
    );
    if stats.aborted > 0 {
        warn!("{} games were aborted", stats.aborted);
    }
    Ok(())
}
