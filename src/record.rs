//! A CSV log of finished training games, and the summary printed by `qttt report`.

use std::io::{Seek, Write};
use std::path::Path;

use anyhow::Context as _;
use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::game::{GameSummary, Outcome};

/// Who sat in the human seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum OpponentKind {
    Console,
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub opponent: OpponentKind,
    pub outcome: Outcome,
    pub agent_moves: usize,
    pub q_entries: usize,
    pub played_at: chrono::DateTime<chrono::Local>,
}

impl GameRecord {
    pub fn new(opponent: OpponentKind, summary: &GameSummary, q_entries: usize) -> Self {
        GameRecord {
            opponent,
            outcome: summary.outcome,
            agent_moves: summary.agent_moves,
            q_entries,
            played_at: chrono::Local::now(),
        }
    }
}

/// Appends records to a CSV file, writing the header only if the file was empty
pub struct Recorder<W: Write = std::fs::File> {
    wtr: csv::Writer<W>,
}

impl Recorder {
    pub fn open(outfile: &Path) -> anyhow::Result<Self> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(outfile)
            .with_context(|| format!("Could not open record file {}", outfile.display()))?;
        let needs_headers = file.seek(std::io::SeekFrom::End(0))? == 0;
        Ok(Recorder::from_writer(file, needs_headers))
    }
}

impl<W: Write> Recorder<W> {
    pub fn from_writer(w: W, has_headers: bool) -> Self {
        let wtr = csv::WriterBuilder::new()
            .has_headers(has_headers)
            .from_writer(w);
        Recorder { wtr }
    }

    /// Each record is flushed, so a failing sink shows up on the game that hit it
    pub fn write(&mut self, record: &GameRecord) -> anyhow::Result<()> {
        self.wtr.serialize(record)?;
        self.wtr.flush()?;
        Ok(())
    }
}

/// Records games until the first failure, then stops recording with a single warning.
/// Recording never interrupts training.
pub struct GameLog<W: Write = std::fs::File> {
    recorder: Option<Recorder<W>>,
}

impl<W: Write> GameLog<W> {
    pub fn new(recorder: Option<Recorder<W>>) -> Self {
        GameLog { recorder }
    }

    pub fn record(&mut self, record: &GameRecord) {
        if let Some(rec) = self.recorder.as_mut() {
            if let Err(e) = rec.write(record) {
                warn!("Could not record game, no further games will be recorded: {e:#}");
                self.recorder = None;
            }
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub games: usize,
    pub agent_wins: usize,
    pub human_wins: usize,
    pub draws: usize,
}

impl Report {
    pub fn add(&mut self, outcome: Outcome) {
        self.games += 1;
        match outcome {
            Outcome::AgentWon => self.agent_wins += 1,
            Outcome::HumanWon => self.human_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pct = |n: usize| {
            if self.games == 0 {
                0.0
            } else {
                100.0 * n as f64 / self.games as f64
            }
        };
        writeln!(f, "Games:      {}", self.games)?;
        writeln!(f, "Agent wins: {} ({:.1}%)", self.agent_wins, pct(self.agent_wins))?;
        writeln!(f, "Human wins: {} ({:.1}%)", self.human_wins, pct(self.human_wins))?;
        writeln!(f, "Draws:      {} ({:.1}%)", self.draws, pct(self.draws))
    }
}

/// Aggregate a record file, optionally only the games against one kind of opponent
pub fn summarize(outfile: &Path, opponent: Option<OpponentKind>) -> anyhow::Result<Report> {
    let file = std::fs::File::open(outfile)
        .with_context(|| format!("The record file {} does not exist", outfile.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut report = Report::default();
    for line in rdr.deserialize() {
        let record: GameRecord = line?;
        if opponent.is_some_and(|o| o != record.opponent) {
            continue;
        }
        report.add(record.outcome);
    }
    Ok(report)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::tictactoe::TTTBoard;

    fn summary(outcome: Outcome) -> GameSummary {
        GameSummary {
            outcome,
            final_board: TTTBoard::new(),
            agent_moves: 3,
            updates: 3,
        }
    }

    #[test]
    fn append_and_summarize() {
        let dir = std::env::temp_dir().join(format!("qttt-record-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("score.csv");
        let _ = std::fs::remove_file(&path);

        let mut rec = Recorder::open(&path).unwrap();
        rec.write(&GameRecord::new(OpponentKind::Random, &summary(Outcome::AgentWon), 10))
            .unwrap();
        rec.write(&GameRecord::new(OpponentKind::Random, &summary(Outcome::Draw), 12))
            .unwrap();
        drop(rec);

        // reopening must not write a second header
        let mut rec = Recorder::open(&path).unwrap();
        rec.write(&GameRecord::new(OpponentKind::Console, &summary(Outcome::HumanWon), 14))
            .unwrap();
        drop(rec);

        let all = summarize(&path, None).unwrap();
        assert_eq!(
            all,
            Report {
                games: 3,
                agent_wins: 1,
                human_wins: 1,
                draws: 1
            }
        );
        let random_only = summarize(&path, Some(OpponentKind::Random)).unwrap();
        assert_eq!(random_only.games, 2);
        assert_eq!(random_only.human_wins, 0);
        std::fs::remove_file(&path).unwrap();
    }

    /// A sink that refuses every write
    struct Full {
        attempts: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl Write for Full {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            self.attempts.set(self.attempts.get() + 1);
            Err(std::io::Error::new(std::io::ErrorKind::Other, "No space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failing_sink_stops_recording_after_first_error() {
        let attempts = std::rc::Rc::new(std::cell::Cell::new(0));
        let full = Full {
            attempts: attempts.clone(),
        };
        let mut log = GameLog::new(Some(Recorder::from_writer(full, true)));
        assert!(log.is_recording());
        log.record(&GameRecord::new(OpponentKind::Random, &summary(Outcome::Draw), 1));
        assert!(!log.is_recording());
        let after_first = attempts.get();
        assert!(after_first > 0);
        for _ in 0..10 {
            log.record(&GameRecord::new(OpponentKind::Random, &summary(Outcome::AgentWon), 2));
        }
        assert_eq!(attempts.get(), after_first);
    }

    #[test]
    fn working_sink_keeps_recording() {
        let mut log = GameLog::new(Some(Recorder::from_writer(Vec::new(), true)));
        for _ in 0..3 {
            log.record(&GameRecord::new(OpponentKind::Random, &summary(Outcome::Draw), 1));
        }
        assert!(log.is_recording());
    }
}
