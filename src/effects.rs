// ============================================
// src/effects.rs
// Feedback messages and particle bursts
// ============================================

use rand::Rng;

/// Seconds a feedback message stays on screen.
pub const FEEDBACK_DURATION: f64 = 1.0;
pub const BURST_SIZE: usize = 20;
/// Size lost per frame.
const SHRINK_PER_FRAME: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
    TimedOut,
}

impl Outcome {
    pub fn message(self, target: &str) -> String {
        match self {
            Outcome::Correct => "Correct! Good job!".to_string(),
            Outcome::Wrong => format!("Oops! It's {target}"),
            Outcome::TimedOut => format!("Time's up! It's {target}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEvent {
    pub message: String,
    pub outcome: Outcome,
    pub emitted_at: f64,
    pub duration: f64,
}

impl FeedbackEvent {
    pub fn is_visible(&self, now: f64) -> bool {
        now - self.emitted_at < self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Frames left
    pub life: u32,
    pub size: f64,
    pub color: [u8; 3],
}

impl Particle {
    fn spawn<R: Rng + ?Sized>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vx: rng.random_range(-3.0..=3.0),
            vy: rng.random_range(-3.0..=3.0),
            life: rng.random_range(20..=40),
            size: rng.random_range(2.0..=6.0),
            color: [
                rng.random_range(100..=255),
                rng.random_range(100..=255),
                rng.random_range(100..=255),
            ],
        }
    }

    /// One frame of motion. Returns false once the particle is spent.
    fn update(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.life = self.life.saturating_sub(1);
        self.size = (self.size - SHRINK_PER_FRAME).max(0.0);
        self.life > 0 && self.size > 0.0
    }
}

/// Owns everything transient so it can outlive the round that caused it.
#[derive(Debug, Clone)]
pub struct Effects {
    anchor: (f64, f64),
    feedback: Option<FeedbackEvent>,
    particles: Vec<Particle>,
}

impl Effects {
    /// `anchor` is where bursts appear, in adapter coordinates.
    pub fn new(anchor: (f64, f64)) -> Self {
        Self {
            anchor,
            feedback: None,
            particles: Vec::new(),
        }
    }

    pub fn notify<R: Rng + ?Sized>(
        &mut self,
        outcome: Outcome,
        message: String,
        now: f64,
        rng: &mut R,
    ) {
        self.feedback = Some(FeedbackEvent {
            message,
            outcome,
            emitted_at: now,
            duration: FEEDBACK_DURATION,
        });
        if outcome == Outcome::Correct {
            let (x, y) = self.anchor;
            self.particles
                .extend((0..BURST_SIZE).map(|_| Particle::spawn(x, y, rng)));
        }
    }

    /// Advances particles by one frame and drops expired feedback.
    pub fn tick(&mut self, now: f64) {
        self.particles.retain_mut(Particle::update);
        if self.feedback.as_ref().is_some_and(|f| !f.is_visible(now)) {
            self.feedback = None;
        }
    }

    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    pub fn feedback(&self) -> Option<&FeedbackEvent> {
        self.feedback.as_ref()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
