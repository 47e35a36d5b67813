//! High score ledger.
//!
//! Scores are kept sorted descending and capped at `MAX_HIGH_SCORES`; the HUD
//! lists them in that order. `JsonLedger` persists to a file, `MemoryLedger`
//! never touches disk.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const MAX_HIGH_SCORES: usize = 5;

pub trait ScoreLedger {
    /// Scores in display order.
    fn highscores(&self) -> &[i64];
    fn add(&mut self, value: i64);
    fn save(&mut self) -> Result<(), String>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct LedgerFile {
    highscores: Vec<i64>,
}

fn insert_ranked(scores: &mut Vec<i64>, value: i64) {
    let pos = scores
        .iter()
        .position(|&s| value > s)
        .unwrap_or(scores.len());
    scores.insert(pos, value);
    scores.truncate(MAX_HIGH_SCORES);
}

pub struct JsonLedger {
    path: PathBuf,
    scores: Vec<i64>,
}

impl JsonLedger {
    /// Missing or unreadable files start an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<LedgerFile>(&raw) {
                Ok(file) => {
                    log::info!("Loaded {} high scores", file.highscores.len());
                    let mut scores = Vec::new();
                    for value in file.highscores {
                        insert_ranked(&mut scores, value);
                    }
                    scores
                }
                Err(err) => {
                    log::warn!(
                        "High score file {} is corrupt, starting fresh: {err}",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Vec::new()
            }
            Err(err) => {
                log::warn!(
                    "High score file {} could not be read, starting fresh: {err}",
                    path.display()
                );
                Vec::new()
            }
        };
        Self { path, scores }
    }
}

impl ScoreLedger for JsonLedger {
    fn highscores(&self) -> &[i64] {
        &self.scores
    }

    fn add(&mut self, value: i64) {
        insert_ranked(&mut self.scores, value);
    }

    fn save(&mut self) -> Result<(), String> {
        let file = LedgerFile {
            highscores: self.scores.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| format!("Failed to encode high scores: {e}"))?;
        fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write high scores {}: {e}", self.path.display()))?;
        log::info!("High scores saved ({} entries)", self.scores.len());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    scores: Vec<i64>,
    added: Vec<i64>,
    saves: usize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value passed to `add`, in call order.
    pub fn added(&self) -> &[i64] {
        &self.added
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ScoreLedger for MemoryLedger {
    fn highscores(&self) -> &[i64] {
        &self.scores
    }

    fn add(&mut self, value: i64) {
        self.added.push(value);
        insert_ranked(&mut self.scores, value);
    }

    fn save(&mut self) -> Result<(), String> {
        self.saves += 1;
        Ok(())
    }
}
