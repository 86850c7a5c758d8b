use exam_core::model::{Question, QuestionId};
use storage::repository::{QuestionBank, StoreError};

use crate::error::BeginError;

/// What to do when the question bank cannot supply questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Run the attempt on the builtin question set and flag the outcome.
    BuiltinSet,
    /// Refuse to start the attempt.
    Fail,
}

/// Questions selected for a new session, with their provenance.
#[derive(Debug)]
pub(crate) struct QuestionDraw {
    pub questions: Vec<Question>,
    pub used_fallback: bool,
}

/// Draws questions for a new session, applying the fallback policy when the
/// bank is unreachable or empty.
///
/// A short draw is not a failure: the session simply runs on fewer
/// questions than configured.
pub(crate) async fn draw_for_session(
    bank: &dyn QuestionBank,
    count: u32,
    policy: FallbackPolicy,
) -> Result<QuestionDraw, BeginError> {
    match bank.draw_questions(count).await {
        Ok(questions) if !questions.is_empty() => {
            if questions.len() < usize::try_from(count).unwrap_or(usize::MAX) {
                log::info!(
                    "question bank supplied {} of {count} requested questions",
                    questions.len()
                );
            }
            Ok(QuestionDraw {
                questions,
                used_fallback: false,
            })
        }
        Ok(_) => match policy {
            FallbackPolicy::BuiltinSet => {
                log::warn!("question bank is empty, running on the builtin set");
                Ok(QuestionDraw {
                    questions: builtin_questions(),
                    used_fallback: true,
                })
            }
            FallbackPolicy::Fail => Err(BeginError::QuestionsUnavailable(StoreError::NotFound)),
        },
        Err(err) => match policy {
            FallbackPolicy::BuiltinSet => {
                log::warn!("question bank unavailable ({err}), running on the builtin set");
                Ok(QuestionDraw {
                    questions: builtin_questions(),
                    used_fallback: true,
                })
            }
            FallbackPolicy::Fail => Err(BeginError::QuestionsUnavailable(err)),
        },
    }
}

fn builtin_question(id: &str, prompt: &str, options: &[&str], correct: usize) -> Question {
    Question::new(
        QuestionId::new(id),
        prompt,
        options.iter().map(|option| (*option).to_owned()).collect(),
        correct,
    )
    .expect("builtin question is valid")
}

/// Builtin question set used when the bank cannot supply questions.
///
/// Five basic service questions, enough to keep an attempt meaningful while
/// its result is clearly flagged as a fallback run.
fn builtin_questions() -> Vec<Question> {
    vec![
        builtin_question(
            "fallback-1",
            "How quickly should a newly seated guest be greeted?",
            &[
                "Within one minute",
                "Within five minutes",
                "After they wave",
                "Once they order drinks",
            ],
            0,
        ),
        builtin_question(
            "fallback-2",
            "From which side are finished plates cleared?",
            &[
                "The guest's left",
                "The guest's right",
                "Whichever is closer",
                "Across the table",
            ],
            1,
        ),
        builtin_question(
            "fallback-3",
            "A guest mentions a nut allergy. What happens first?",
            &[
                "Suggest they pick something safe",
                "Inform the kitchen and the manager",
                "Remove nuts from the garnish",
                "Offer the dessert menu",
            ],
            1,
        ),
        builtin_question(
            "fallback-4",
            "When should water glasses be refilled?",
            &[
                "Only when asked",
                "Before they are empty",
                "After each course",
                "At the end of the meal",
            ],
            1,
        ),
        builtin_question(
            "fallback-5",
            "A dish is sent back. What do you do?",
            &[
                "Apologize and alert the kitchen",
                "Offer a discount immediately",
                "Explain how the dish is made",
                "Serve the next course instead",
            ],
            0,
        ),
    ]
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
