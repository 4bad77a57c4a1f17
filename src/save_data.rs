// ============================================
// src/save_data.rs
// High score and session history, read and written through
// ============================================

use bincode::config::standard;
use bincode::{Decode, Encode};
use chrono::{DateTime, TimeZone, Utc};
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::config::Difficulty;
use crate::game::SessionSummary;

const SAVE_FILE_BIN: &str = "save_data.bin";
/// Sessions kept in the history; the oldest are dropped first.
const HISTORY_LIMIT: usize = 200;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode save data: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("cannot encode save data as json: {0}")]
    Json(#[from] serde_json::Error),
}

/// One finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub max_attempts: u32,
    pub best_streak: u32,
}

/// bincode-side form (timestamp as seconds, difficulty as a code)
#[derive(Encode, Decode)]
struct SessionRecordBin {
    timestamp_secs: i64,
    category: String,
    difficulty: u8,
    score: u32,
    max_attempts: u32,
    best_streak: u32,
}

impl From<&SessionRecord> for SessionRecordBin {
    fn from(record: &SessionRecord) -> Self {
        Self {
            timestamp_secs: record.timestamp.timestamp(),
            category: record.category.clone(),
            difficulty: record.difficulty.code(),
            score: record.score,
            max_attempts: record.max_attempts,
            best_streak: record.best_streak,
        }
    }
}

impl From<SessionRecordBin> for SessionRecord {
    fn from(bin: SessionRecordBin) -> Self {
        Self {
            timestamp: Utc
                .timestamp_opt(bin.timestamp_secs, 0)
                .single()
                .unwrap_or_default(),
            category: bin.category,
            difficulty: Difficulty::from_code(bin.difficulty),
            score: bin.score,
            max_attempts: bin.max_attempts,
            best_streak: bin.best_streak,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub high_score: u32,
    pub games_played: u32,
    pub history: Vec<SessionRecord>,
}

#[derive(Encode, Decode)]
struct SaveDataBin {
    high_score: u32,
    games_played: u32,
    history: Vec<SessionRecordBin>,
}

impl From<&SaveData> for SaveDataBin {
    fn from(data: &SaveData) -> Self {
        Self {
            high_score: data.high_score,
            games_played: data.games_played,
            history: data.history.iter().map(SessionRecordBin::from).collect(),
        }
    }
}

impl From<SaveDataBin> for SaveData {
    fn from(bin: SaveDataBin) -> Self {
        Self {
            high_score: bin.high_score,
            games_played: bin.games_played,
            history: bin.history.into_iter().map(SessionRecord::from).collect(),
        }
    }
}

impl SaveData {
    // MARK: Data directory
    pub fn data_dir() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("org", "wordquiz", "WordQuiz")?;
        let data_dir = dirs.data_dir();
        if let Err(e) = fs::create_dir_all(data_dir) {
            warn!("cannot create data directory {}: {e}", data_dir.display());
            return None;
        }
        Some(data_dir.to_path_buf())
    }

    /// Falls back to the working directory when no data directory is available.
    pub fn default_path() -> PathBuf {
        Self::data_dir()
            .map(|dir| dir.join(SAVE_FILE_BIN))
            .unwrap_or_else(|| PathBuf::from(SAVE_FILE_BIN))
    }

    /// JSON copy kept next to the binary file for debugging.
    fn json_path(path: &Path) -> PathBuf {
        path.with_extension("json")
    }

    /// Adds a finished session and raises the high score if needed.
    pub fn record(&mut self, summary: &SessionSummary, at: DateTime<Utc>) {
        self.high_score = self.high_score.max(summary.score);
        self.games_played += 1;
        self.history.push(SessionRecord {
            timestamp: at,
            category: summary.category.clone(),
            difficulty: summary.difficulty,
            score: summary.score,
            max_attempts: summary.max_attempts,
            best_streak: summary.best_streak,
        });
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// MARK: Write binary + JSON
    pub fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        let encoded = bincode::encode_to_vec(SaveDataBin::from(self), standard())?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&encoded)?;
        writer.flush()?;

        let json = serde_json::to_string_pretty(self)?;
        fs::write(Self::json_path(path), json)?;
        Ok(())
    }

    /// MARK: Read binary first, JSON as fallback, default otherwise
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(mut file) = File::open(path) {
                let mut buffer = Vec::new();
                if file.read_to_end(&mut buffer).is_ok() {
                    match bincode::decode_from_slice::<SaveDataBin, _>(&buffer, standard()) {
                        Ok((bin, _)) => return SaveData::from(bin),
                        Err(e) => warn!("corrupt save file {}: {e}", path.display()),
                    }
                }
            }
        }

        let json_path = Self::json_path(path);
        if json_path.exists() {
            if let Ok(file) = File::open(&json_path) {
                let reader = BufReader::new(file);
                if let Ok(data) = serde_json::from_reader(reader) {
                    return data;
                }
            }
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u32) -> SessionSummary {
        SessionSummary {
            category: "Colors".to_string(),
            difficulty: Difficulty::Hard,
            score,
            max_attempts: 10,
            best_streak: score.min(3),
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn record_keeps_the_best_score() {
        let mut data = SaveData::default();
        data.record(&summary(7), at(1));
        data.record(&summary(4), at(2));
        assert_eq!(data.high_score, 7);
        assert_eq!(data.games_played, 2);
        assert_eq!(data.history.len(), 2);
        assert_eq!(data.history[1].score, 4);
    }

    #[test]
    fn history_is_capped() {
        let mut data = SaveData::default();
        for i in 0..(HISTORY_LIMIT as i64 + 5) {
            data.record(&summary(1), at(i));
        }
        assert_eq!(data.history.len(), HISTORY_LIMIT);
        assert_eq!(data.history[0].timestamp, at(5));
        assert_eq!(data.games_played, HISTORY_LIMIT as u32 + 5);
    }

    #[test]
    fn binary_file_restores_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SAVE_FILE_BIN);
        let mut data = SaveData::default();
        data.record(&summary(9), at(1_700_000_000));
        data.save_to(&path).unwrap();

        assert!(path.with_extension("json").exists());
        assert_eq!(SaveData::load_from(&path), data);
    }

    #[test]
    fn json_is_used_when_binary_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SAVE_FILE_BIN);
        let mut data = SaveData::default();
        data.record(&summary(5), at(42));
        data.save_to(&path).unwrap();
        fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

        assert_eq!(SaveData::load_from(&path), data);
    }

    #[test]
    fn missing_files_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = SaveData::load_from(&dir.path().join("absent.bin"));
        assert_eq!(loaded, SaveData::default());
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join(SAVE_FILE_BIN);
        assert!(matches!(
            SaveData::default().save_to(&path),
            Err(SaveError::Io(_))
        ));
    }
}
