// ============================================
// src/config.rs
// Command line and runtime-toggleable settings
// ============================================

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_ROUND_TIME: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Easy → Normal → Hard → Easy
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    /// Only Hard rounds run against the clock.
    pub fn is_timed(self) -> bool {
        self == Difficulty::Hard
    }

    pub fn code(self) -> u8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Difficulty::Easy,
            2 => Difficulty::Hard,
            _ => Difficulty::Normal,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// Values the player can change while the game runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Applies from the next session on.
    pub difficulty: Difficulty,
    pub max_attempts: u32,
    /// Seconds per round in Hard mode.
    pub round_time: f64,
    pub audio_enabled: bool,
    pub show_definitions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            round_time: DEFAULT_ROUND_TIME,
            audio_enabled: true,
            show_definitions: false,
        }
    }
}

impl Settings {
    /// Hard-mode seconds per round; zero, negative or non-finite values fall
    /// back to `DEFAULT_ROUND_TIME`.
    pub fn effective_round_time(&self) -> f64 {
        if self.round_time.is_finite() && self.round_time > 0.0 {
            self.round_time
        } else {
            DEFAULT_ROUND_TIME
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Pick the right word for the picture.")]
pub struct Cli {
    /// Starting difficulty
    #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
    pub difficulty: Difficulty,

    /// Rounds per session
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Seconds per round in Hard mode
    #[arg(long, default_value_t = DEFAULT_ROUND_TIME, value_parser = parse_round_time)]
    pub round_time: f64,

    /// Start with sound off
    #[arg(long)]
    pub mute: bool,

    /// Show word definitions under the picture
    #[arg(long)]
    pub definitions: bool,

    /// JSON file with extra categories (replaces the built-in ones)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Seed for reproducible questions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to keep the high score
    #[arg(long)]
    pub save_file: Option<PathBuf>,

    /// Where to write the log
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            difficulty: self.difficulty,
            max_attempts: self.max_attempts,
            round_time: self.round_time,
            audio_enabled: !self.mute,
            show_definitions: self.definitions,
        }
    }
}

fn parse_round_time(s: &str) -> Result<f64, String> {
    let secs: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err(format!("round time must be a positive number of seconds, got {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_cycles_through_all_levels() {
        let d = Difficulty::Easy;
        assert_eq!(d.next(), Difficulty::Normal);
        assert_eq!(d.next().next(), Difficulty::Hard);
        assert_eq!(d.next().next().next(), Difficulty::Easy);
        assert!(Difficulty::Hard.is_timed());
        assert!(!Difficulty::Normal.is_timed());
    }

    #[test]
    fn difficulty_code_round_trips() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_code(d.code()), d);
        }
    }

    #[test]
    fn cli_defaults_match_settings_defaults() {
        let cli = Cli::parse_from(["wordquiz"]);
        assert_eq!(cli.settings(), Settings::default());
    }

    #[test]
    fn cli_flags_map_to_settings() {
        let cli = Cli::parse_from([
            "wordquiz",
            "--difficulty",
            "hard",
            "--max-attempts",
            "3",
            "--round-time",
            "4.5",
            "--mute",
            "--definitions",
            "--seed",
            "7",
        ]);
        let settings = cli.settings();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.round_time, 4.5);
        assert!(!settings.audio_enabled);
        assert!(settings.show_definitions);
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn cli_rejects_bad_numbers() {
        assert!(Cli::try_parse_from(["wordquiz", "--max-attempts", "0"]).is_err());
        assert!(Cli::try_parse_from(["wordquiz", "--round-time", "-1"]).is_err());
        assert!(Cli::try_parse_from(["wordquiz", "--round-time", "soon"]).is_err());
    }

    #[test]
    fn unusable_round_time_falls_back_to_default() {
        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let settings = Settings {
                round_time: bad,
                ..Settings::default()
            };
            assert_eq!(settings.effective_round_time(), DEFAULT_ROUND_TIME);
        }
        let settings = Settings {
            round_time: 2.5,
            ..Settings::default()
        };
        assert_eq!(settings.effective_round_time(), 2.5);
    }
}
