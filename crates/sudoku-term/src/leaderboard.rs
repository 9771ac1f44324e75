//! Ranked best-times store, persisted as a JSON file.
//!
//! Records are appended and never evicted; only the 10 fastest are surfaced
//! or consulted for admission. A store that cannot be opened degrades to
//! "no score tracking" rather than failing the game.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// How many records are surfaced and used for admission decisions.
pub const TOP_ENTRIES: usize = 10;

/// Longest accepted player name; longer input is truncated.
pub const MAX_NAME_LEN: usize = 20;

/// One completed game on the leaderboard.
///
/// `timestamp` (unix epoch seconds at creation) identifies the record and is
/// shown next to it; ordering always uses `seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub timestamp: u64,
    pub name: String,
    pub seconds: u64,
}

impl ScoreRecord {
    /// Build a record stamped with the current time. Empty names become the
    /// "-" placeholder; names longer than [`MAX_NAME_LEN`] are truncated.
    pub fn new(name: &str, seconds: u64) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            "-".to_string()
        } else {
            name.chars().take(MAX_NAME_LEN).collect()
        };
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            timestamp,
            name,
            seconds,
        }
    }
}

/// Errors from the score file. All of them are recoverable: the caller keeps
/// playing without score tracking.
#[derive(Debug, Clone)]
pub enum ScoreError {
    /// The file could not be read or created
    Storage(String),
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Score storage error: {}", e),
        }
    }
}

impl std::error::Error for ScoreError {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ScoreFile {
    entries: Vec<ScoreRecord>,
}

/// The leaderboard store. The sole writer of the score file; game code only
/// proposes candidate records.
#[derive(Debug)]
pub struct ScoreStore {
    path: Option<PathBuf>,
    entries: Vec<ScoreRecord>,
}

impl ScoreStore {
    /// Where the score file lives unless overridden on the command line.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sudoku_scores.json")
    }

    /// Open (or start) the store backed by `path`. A missing file is an
    /// empty store; an unreadable one is an error. A file that parses badly
    /// is treated as empty rather than refusing to play.
    pub fn open(path: PathBuf) -> Result<Self, ScoreError> {
        let entries = match fs::read_to_string(&path) {
            Ok(json) => {
                let file: ScoreFile = serde_json::from_str(&json).unwrap_or_default();
                file.entries
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(ScoreError::Storage(e.to_string())),
        };
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// A store with no backing file, used by tests and as the degraded mode.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
        }
    }

    /// Total number of persisted records.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// The 10 fastest completions, ascending, ties kept in insertion order.
    pub fn top10(&self) -> Vec<ScoreRecord> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|record| record.seconds);
        sorted.truncate(TOP_ENTRIES);
        sorted
    }

    /// Admission rule: fewer than 10 records, or strictly faster than the
    /// slowest of the current top 10.
    pub fn is_eligible(&self, seconds: u64) -> bool {
        if self.entries.len() < TOP_ENTRIES {
            return true;
        }
        match self.top10().last() {
            Some(slowest) => seconds < slowest.seconds,
            None => true,
        }
    }

    /// Append a record and persist. The record stays in memory even when the
    /// write fails, so a flaky disk costs durability, not the session.
    pub fn insert(&mut self, record: ScoreRecord) -> Result<(), ScoreError> {
        self.entries.push(record);
        self.save()
    }

    fn save(&self) -> Result<(), ScoreError> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };
        let file = ScoreFile {
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| ScoreError::Storage(e.to_string()))?;
        fs::write(path, json).map_err(|e| ScoreError::Storage(e.to_string()))
    }
}
