//! Saving and restoring the Q-table between runs

use std::path::Path;

use log::{info, warn};

use crate::agent::QTable;
use crate::{Error, Result};

pub const DEFAULT_QFILE: &str = "q_values.bitcode";

pub fn load_q_table(path: &Path) -> Result<QTable> {
    let load_err = |reason: String| Error::PersistenceLoad {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| load_err(e.to_string()))?;
    bitcode::deserialize(&bytes).map_err(|e| load_err(e.to_string()))
}

/// The stored table, or an empty one when there is none or it cannot be read.
pub fn load_or_default(path: &Path) -> QTable {
    if !path.exists() {
        info!("No Q-table at {}, starting from scratch", path.display());
        return QTable::new();
    }
    match load_q_table(path) {
        Ok(table) => {
            info!("Loaded {} Q-values from {}", table.len(), path.display());
            table
        }
        Err(e) => {
            warn!("{e}. Starting from an empty table");
            QTable::new()
        }
    }
}

/// Writes to a sibling file first and renames it over `path`, so an interrupted save
/// leaves the previous table intact.
pub fn save_q_table(path: &Path, table: &QTable) -> Result<()> {
    let bytes = bitcode::serialize(table).map_err(|e| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    info!("Saved {} Q-values to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::tictactoe::{TTTAddr, TTTBoard};

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("qttt-persistence-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn save_then_load() {
        let path = scratch("saved.bitcode");
        let mut table = QTable::new();
        table.set(TTTBoard::new(), TTTAddr(4), 0.5);
        table.set("x   o    ".parse().unwrap(), TTTAddr(8), -0.25);
        save_q_table(&path, &table).unwrap();
        let loaded = load_q_table(&path).unwrap();
        assert_eq!(loaded, table);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_gives_empty_table() {
        let path = scratch("does-not-exist.bitcode");
        assert!(load_or_default(&path).is_empty());
        assert!(matches!(load_q_table(&path), Err(Error::PersistenceLoad { .. })));
    }

    #[test]
    fn out_of_range_action_is_rejected() {
        #[derive(serde::Serialize)]
        struct Tampered {
            data: std::collections::HashMap<(TTTBoard, usize), f64>,
        }
        let path = scratch("tampered.bitcode");
        let tampered = Tampered {
            data: [((TTTBoard::new(), 42), 1.0)].into_iter().collect(),
        };
        std::fs::write(&path, bitcode::serialize(&tampered).unwrap()).unwrap();
        assert!(matches!(load_q_table(&path), Err(Error::PersistenceLoad { .. })));
        assert!(load_or_default(&path).is_empty());
        std::fs::remove_file(&path).unwrap();
    }
}
