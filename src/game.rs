// ============================================
// src/game.rs
// Session state machine: rounds, scoring, streaks and timing
// ============================================

use log::{debug, error, info};
use rand::rngs::StdRng;

use crate::catalog::{Catalog, CatalogError, Category};
use crate::config::{Difficulty, Settings};
use crate::effects::{Effects, FeedbackEvent, Outcome, Particle};
use crate::platform::{Platform, SoundCue};
use crate::question::{self, Round};
use crate::timer::RoundTimer;

/// Pause after an answer before the next round.
pub const ADVANCE_DELAY: f64 = 1.5;
/// Pause after the last answer before the session ends.
pub const GAME_OVER_DELAY: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Menu, no round
    Idle,
    /// Waiting for an answer
    Playing,
    /// Answered; the next round (or the end) is due at `wake_at`
    RoundTransition { wake_at: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub category: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub max_attempts: u32,
    pub best_streak: u32,
}

impl SessionSummary {
    pub fn message(&self) -> String {
        format!("Game Over! Score: {}/{}", self.score, self.max_attempts)
    }
}

// --------------------------------------------------
// Snapshots handed to the presentation layer
// --------------------------------------------------

pub enum Screen<'a> {
    Menu(MenuView<'a>),
    Round(RoundView<'a>),
}

pub struct MenuView<'a> {
    pub categories: &'a [Category],
    pub selected: usize,
    pub high_score: u32,
    pub summary: Option<&'a SessionSummary>,
    pub settings: &'a Settings,
}

pub struct RoundView<'a> {
    pub category: &'a Category,
    pub round: &'a Round,
    pub definition: Option<&'a str>,
    pub score: u32,
    pub attempts: u32,
    pub max_attempts: u32,
    pub streak: u32,
    pub difficulty: Difficulty,
    pub time_left: Option<f64>,
    pub timer_fraction: Option<f64>,
    /// False while the answered round is still on screen
    pub awaiting_answer: bool,
    pub feedback: Option<&'a FeedbackEvent>,
    pub particles: &'a [Particle],
    pub settings: &'a Settings,
}

// --------------------------------------------------
// Session
// --------------------------------------------------

pub struct GameSession {
    catalog: Catalog,
    settings: Settings,
    category: usize,
    /// Difficulty of the running session; `settings.difficulty` is the next one
    difficulty: Difficulty,
    max_attempts: u32,
    phase: Phase,
    round: Option<Round>,
    score: u32,
    attempts: u32,
    streak: u32,
    best_streak: u32,
    high_score: u32,
    /// Seconds since creation, advanced only by `on_tick`
    clock: f64,
    timer: RoundTimer,
    effects: Effects,
    last_summary: Option<SessionSummary>,
    rng: StdRng,
}

impl GameSession {
    pub fn new(
        catalog: Catalog,
        settings: Settings,
        high_score: u32,
        rng: StdRng,
    ) -> Result<Self, CatalogError> {
        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            catalog,
            difficulty: settings.difficulty,
            max_attempts: settings.max_attempts.max(1),
            timer: RoundTimer::new(settings.effective_round_time()),
            settings,
            category: 0,
            phase: Phase::Idle,
            round: None,
            score: 0,
            attempts: 0,
            streak: 0,
            best_streak: 0,
            high_score,
            clock: 0.0,
            effects: Effects::new((0.0, 0.0)),
            last_summary: None,
            rng,
        })
    }

    // MARK: Commands from the host

    /// Resets the counters and asks the first question.
    ///
    /// Allowed at any time; a running session is replaced and its pending
    /// transition dropped.
    pub fn start_session(&mut self, platform: &mut impl Platform) {
        self.cue(platform, SoundCue::Click);
        self.score = 0;
        self.attempts = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.difficulty = self.settings.difficulty;
        self.max_attempts = self.settings.max_attempts.max(1);
        self.timer.cancel();
        self.timer.set_duration(self.settings.effective_round_time());
        self.effects.clear_feedback();
        self.last_summary = None;
        info!(
            "session started: category={} difficulty={} rounds={}",
            self.current_category().name(),
            self.difficulty,
            self.max_attempts
        );
        self.begin_round(platform);
    }

    /// Answers the current question. Ignored outside `Playing` or for a word
    /// that is not one of the four options.
    pub fn submit_answer(&mut self, word: &str, platform: &mut impl Platform) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(round) = &self.round else {
            return;
        };
        if !round.has_option(word) {
            return;
        }
        let outcome = if round.is_correct(word) {
            Outcome::Correct
        } else {
            Outcome::Wrong
        };
        self.cue(platform, SoundCue::Click);
        self.resolve(outcome, platform);
    }

    /// Switches category. A round in flight is replaced without costing an attempt.
    pub fn change_category(&mut self, name: &str, platform: &mut impl Platform) {
        let Some(index) = self.catalog.position(name) else {
            return;
        };
        self.cue(platform, SoundCue::Click);
        self.category = index;
        match self.phase {
            Phase::Idle => {}
            // the session is over once this transition fires
            Phase::RoundTransition { .. } if self.attempts >= self.max_attempts => {}
            Phase::Playing | Phase::RoundTransition { .. } => {
                self.timer.cancel();
                self.begin_round(platform);
            }
        }
    }

    /// Moves `step` categories along the catalog, wrapping around.
    pub fn cycle_category(&mut self, step: isize, platform: &mut impl Platform) {
        let len = self.catalog.len() as isize;
        let next = (self.category as isize + step).rem_euclid(len) as usize;
        if let Some(name) = self.catalog.get(next).map(|c| c.name().to_string()) {
            self.change_category(&name, platform);
        }
    }

    /// Easy → Normal → Hard → Easy, applied at the next `start_session`.
    pub fn cycle_difficulty(&mut self, platform: &mut impl Platform) {
        self.cue(platform, SoundCue::Click);
        self.settings.difficulty = self.settings.difficulty.next();
    }

    pub fn toggle_audio(&mut self, platform: &mut impl Platform) {
        self.cue(platform, SoundCue::Click);
        self.settings.audio_enabled = !self.settings.audio_enabled;
    }

    pub fn toggle_definitions(&mut self, platform: &mut impl Platform) {
        self.cue(platform, SoundCue::Click);
        self.settings.show_definitions = !self.settings.show_definitions;
    }

    /// Leaves a running session without recording it.
    pub fn abandon(&mut self, platform: &mut impl Platform) {
        if self.phase == Phase::Idle {
            return;
        }
        self.cue(platform, SoundCue::Click);
        info!(
            "session abandoned after {}/{} rounds",
            self.attempts, self.max_attempts
        );
        self.drop_round();
    }

    /// One frame. `dt` is the real time since the previous frame, in seconds.
    pub fn on_tick(&mut self, dt: f64, platform: &mut impl Platform) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.clock += dt;

        if self.phase == Phase::Playing && self.timer.advance(dt) {
            self.resolve(Outcome::TimedOut, platform);
        }

        if let Phase::RoundTransition { wake_at } = self.phase {
            if self.clock >= wake_at {
                if self.attempts >= self.max_attempts {
                    self.finalize(platform);
                } else {
                    self.begin_round(platform);
                }
            }
        }

        self.effects.tick(self.clock);
    }

    // MARK: Internal transitions

    fn begin_round(&mut self, platform: &mut impl Platform) {
        let time_limit = self.difficulty.is_timed().then(|| self.timer.duration());
        let Some(category) = self.catalog.get(self.category) else {
            self.drop_round();
            return;
        };
        let next = question::next_round(
            category,
            self.difficulty,
            self.clock,
            time_limit,
            &mut self.rng,
        );
        match next {
            Ok(round) => {
                debug!(
                    "new round at {:.2}s: target={} deadline={:?}",
                    round.started_at(),
                    round.target(),
                    round.deadline()
                );
                self.cue(platform, SoundCue::Word(round.target().to_string()));
                if time_limit.is_some() {
                    self.timer.arm();
                } else {
                    self.timer.cancel();
                }
                self.round = Some(round);
                self.phase = Phase::Playing;
            }
            Err(e) => {
                error!("cannot build a round: {e}");
                self.drop_round();
            }
        }
    }

    fn resolve(&mut self, outcome: Outcome, platform: &mut impl Platform) {
        let Some(round) = &self.round else {
            return;
        };
        let message = outcome.message(round.target());

        self.attempts += 1;
        self.timer.cancel();
        match outcome {
            Outcome::Correct => {
                self.score += 1;
                self.streak += 1;
                self.best_streak = self.best_streak.max(self.streak);
                self.cue(platform, SoundCue::Correct);
            }
            Outcome::Wrong | Outcome::TimedOut => {
                self.streak = 0;
                self.cue(platform, SoundCue::Wrong);
            }
        }
        debug!(
            "{outcome:?}: score={} attempts={} streak={}",
            self.score, self.attempts, self.streak
        );
        self.effects.notify(outcome, message, self.clock, &mut self.rng);

        let delay = if self.attempts >= self.max_attempts {
            GAME_OVER_DELAY
        } else {
            ADVANCE_DELAY
        };
        self.phase = Phase::RoundTransition {
            wake_at: self.clock + delay,
        };
    }

    fn finalize(&mut self, platform: &mut impl Platform) {
        self.high_score = self.high_score.max(self.score);
        let summary = SessionSummary {
            category: self.current_category().name().to_string(),
            difficulty: self.difficulty,
            score: self.score,
            max_attempts: self.max_attempts,
            best_streak: self.best_streak,
        };
        info!(
            "session finished: {} (best streak {}, high score {})",
            summary.message(),
            summary.best_streak,
            self.high_score
        );
        self.drop_round();
        platform.session_finished(&summary);
        self.last_summary = Some(summary);
    }

    /// Back to `Idle`; also cancels the timer and any pending transition.
    fn drop_round(&mut self) {
        self.round = None;
        self.timer.cancel();
        self.phase = Phase::Idle;
    }

    fn cue(&self, platform: &mut impl Platform, cue: SoundCue) {
        if self.settings.audio_enabled {
            platform.play_sound(cue);
        }
    }

    // MARK: Queries

    pub fn view(&self) -> Screen<'_> {
        match (&self.round, self.phase) {
            (Some(round), Phase::Playing | Phase::RoundTransition { .. }) => {
                let category = self.current_category();
                Screen::Round(RoundView {
                    category,
                    round,
                    definition: self
                        .settings
                        .show_definitions
                        .then(|| category.definition(round.target()))
                        .flatten(),
                    score: self.score,
                    attempts: self.attempts,
                    max_attempts: self.max_attempts,
                    streak: self.streak,
                    difficulty: self.difficulty,
                    time_left: self.timer.remaining(),
                    timer_fraction: self.timer.fraction(),
                    awaiting_answer: self.phase == Phase::Playing,
                    feedback: self.effects.feedback(),
                    particles: self.effects.particles(),
                    settings: &self.settings,
                })
            }
            _ => Screen::Menu(MenuView {
                categories: self.catalog.categories(),
                selected: self.category,
                high_score: self.high_score,
                summary: self.last_summary.as_ref(),
                settings: &self.settings,
            }),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn current_category(&self) -> &Category {
        // `new` rejects an empty catalog and `category` only takes valid indices
        &self.catalog.categories()[self.category]
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }
}
