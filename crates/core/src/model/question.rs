use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two options")]
    NotEnoughOptions,

    #[error("option {0} cannot be empty")]
    EmptyOption(usize),

    #[error("correct option {index} is out of range for {count} options")]
    CorrectOptionOutOfRange { index: usize, count: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Holds the prompt, its ordered answer options, and which option is correct.
/// Questions are immutable once built; a session never edits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option: usize,
}

impl Question {
    /// Creates a new Question.
    ///
    /// Prompt and options are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is empty, fewer than two options
    /// are given, any option is empty, or the correct index is out of range.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::NotEnoughOptions);
        }

        let mut trimmed = Vec::with_capacity(options.len());
        for (index, option) in options.into_iter().enumerate() {
            let option = option.trim().to_owned();
            if option.is_empty() {
                return Err(QuestionError::EmptyOption(index));
            }
            trimmed.push(option);
        }

        if correct_option >= trimmed.len() {
            return Err(QuestionError::CorrectOptionOutOfRange {
                index: correct_option,
                count: trimmed.len(),
            });
        }

        Ok(Self {
            id,
            prompt: prompt.trim().to_owned(),
            options: trimmed,
            correct_option,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Number of answer options on this question.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} options)", self.prompt, self.options.len())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn question_new_happy_path() {
        let question = Question::new(
            QuestionId::new("q1"),
            "Which side should plates be cleared from?",
            options(&["The left", "The right", "Either side", "Across the table"]),
            1,
        )
        .unwrap();

        assert_eq!(question.id(), &QuestionId::new("q1"));
        assert_eq!(question.option_count(), 4);
        assert_eq!(question.correct_option(), 1);
        assert_eq!(question.options()[1], "The right");
    }

    #[test]
    fn question_rejects_empty_prompt() {
        let err = Question::new(QuestionId::new("q1"), "   ", options(&["A", "B"]), 0).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn question_rejects_single_option() {
        let err = Question::new(QuestionId::new("q1"), "Prompt", options(&["A"]), 0).unwrap_err();
        assert_eq!(err, QuestionError::NotEnoughOptions);
    }

    #[test]
    fn question_rejects_blank_option() {
        let err =
            Question::new(QuestionId::new("q1"), "Prompt", options(&["A", "  "]), 0).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption(1));
    }

    #[test]
    fn question_rejects_correct_index_out_of_range() {
        let err =
            Question::new(QuestionId::new("q1"), "Prompt", options(&["A", "B"]), 2).unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectOptionOutOfRange { index: 2, count: 2 }
        );
    }

    #[test]
    fn question_trims_prompt_and_options() {
        let question = Question::new(
            QuestionId::new("q1"),
            "  Prompt  ",
            options(&[" A ", " B "]),
            0,
        )
        .unwrap();

        assert_eq!(question.prompt(), "Prompt");
        assert_eq!(question.options(), &["A".to_owned(), "B".to_owned()]);
    }
}
