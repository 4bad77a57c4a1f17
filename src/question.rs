// ============================================
// src/question.rs
// One question: a target word and its four options
// ============================================

use rand::Rng;
use rand::seq::{SliceRandom, index};

use crate::catalog::{CatalogError, Category};
use crate::config::Difficulty;

pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    target: String,
    /// Exactly `OPTION_COUNT` distinct words, target included once
    options: Vec<String>,
    started_at: f64,
    deadline: Option<f64>,
}

impl Round {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn has_option(&self, word: &str) -> bool {
        self.options.iter().any(|o| o == word)
    }

    pub fn is_correct(&self, word: &str) -> bool {
        self.target == word
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }
}

/// Builds the next question from `category`.
///
/// The target is uniform over the difficulty's word pool. Distractors are
/// sampled without replacement from the rest of the pool, then all four
/// options are shuffled. `time_limit` is set only for timed rounds.
pub fn next_round<R: Rng + ?Sized>(
    category: &Category,
    difficulty: Difficulty,
    now: f64,
    time_limit: Option<f64>,
    rng: &mut R,
) -> Result<Round, CatalogError> {
    let pool = category.pool(difficulty);
    if pool.len() < OPTION_COUNT {
        return Err(CatalogError::InsufficientWords {
            category: category.name().to_string(),
            found: pool.len(),
        });
    }

    let target_idx = rng.random_range(0..pool.len());
    // Indices into the pool with the target removed.
    let mut options: Vec<String> = index::sample(rng, pool.len() - 1, OPTION_COUNT - 1)
        .into_iter()
        .map(|i| if i >= target_idx { i + 1 } else { i })
        .map(|i| pool[i].to_string())
        .collect();
    options.push(pool[target_idx].to_string());
    options.shuffle(rng);

    Ok(Round {
        target: pool[target_idx].to_string(),
        options,
        started_at: now,
        deadline: time_limit.map(|limit| now + limit),
    })
}
