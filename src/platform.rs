// ============================================
// src/platform.rs
// What the game asks of its host: sounds and persistence
// ============================================

use std::io::stdout;
use std::path::PathBuf;

use chrono::Utc;
use crossterm::{ExecutableCommand, style::Print};
use log::{debug, info, warn};

use crate::game::SessionSummary;
use crate::save_data::SaveData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCue {
    Click,
    Correct,
    Wrong,
    /// Pronunciation cue for the word being asked
    Word(String),
}

/// Host capabilities the game calls into.
///
/// Implementations must absorb their own failures: a missing sound device or
/// an unwritable save file never interrupts a round.
pub trait Platform {
    fn play_sound(&mut self, cue: SoundCue);

    /// Called once per completed session, right after the high score is updated.
    fn session_finished(&mut self, summary: &SessionSummary);
}

/// Terminal host: answers ring the bell, finished sessions go straight to disk.
pub struct HostPlatform {
    save: SaveData,
    save_path: PathBuf,
    last_cue: Option<SoundCue>,
}

impl HostPlatform {
    pub fn new(save: SaveData, save_path: PathBuf) -> Self {
        Self {
            save,
            save_path,
            last_cue: None,
        }
    }

    pub fn save(&self) -> &SaveData {
        &self.save
    }

    pub fn last_cue(&self) -> Option<&SoundCue> {
        self.last_cue.as_ref()
    }
}

impl Platform for HostPlatform {
    fn play_sound(&mut self, cue: SoundCue) {
        if matches!(cue, SoundCue::Correct | SoundCue::Wrong) {
            if let Err(e) = stdout().execute(Print('\x07')) {
                debug!("terminal bell failed: {e}");
            }
        }
        self.last_cue = Some(cue);
    }

    fn session_finished(&mut self, summary: &SessionSummary) {
        self.save.record(summary, Utc::now());
        match self.save.save_to(&self.save_path) {
            Ok(()) => info!("saved to {}", self.save_path.display()),
            Err(e) => warn!("cannot save to {}: {e}", self.save_path.display()),
        }
    }
}
