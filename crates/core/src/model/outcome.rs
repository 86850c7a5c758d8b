use chrono::{DateTime, Utc};

use crate::scoring::Score;

/// The sealed result of a submitted test session.
///
/// Built exactly once, when submission closes the session; nothing mutates
/// it afterwards. `used_fallback` travels with the score so downstream
/// records can tell attempts graded against the builtin question set apart
/// from regular ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    correct_count: usize,
    total_questions: usize,
    percent: u32,
    passed: bool,
    used_fallback: bool,
    completed_at: DateTime<Utc>,
}

impl Outcome {
    /// Builds the outcome from a grade and its session context.
    #[must_use]
    pub fn from_score(score: Score, used_fallback: bool, completed_at: DateTime<Utc>) -> Self {
        Self {
            correct_count: score.correct_count(),
            total_questions: score.total_questions(),
            percent: score.percent(),
            passed: score.passed(),
            used_fallback,
            completed_at,
        }
    }

    // Accessors
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn percent(&self) -> u32 {
        self.percent
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// True when the attempt ran on the builtin fallback questions because
    /// the question bank was unreachable.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
