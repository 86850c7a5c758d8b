//! Pure grading of completed answer sheets.

use crate::model::{AnswerSheet, Question};

/// Grade for one attempt: raw tally, rounded percent, and the pass verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    correct_count: usize,
    total_questions: usize,
    percent: u32,
    passed: bool,
}

impl Score {
    // Accessors
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// Percent correct, rounded half-up to a whole point.
    #[must_use]
    pub fn percent(&self) -> u32 {
        self.percent
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }
}

/// Grades an answer sheet against its questions.
///
/// A position counts as correct only when its selected option equals the
/// question's correct option; unanswered positions count as wrong, and
/// selections past the end of the question list are ignored. The pass
/// threshold is inclusive: exactly `passing_percent` passes. An empty
/// question list grades to zero percent.
#[must_use]
pub fn score(questions: &[Question], answers: &AnswerSheet, passing_percent: u32) -> Score {
    let total_questions = questions.len();
    let correct_count = answers
        .iter()
        .filter(|&(position, option)| {
            questions
                .get(position)
                .is_some_and(|question| question.correct_option() == option)
        })
        .count();

    let percent = percent_round_half_up(correct_count, total_questions);

    Score {
        correct_count,
        total_questions,
        percent,
        passed: percent >= passing_percent,
    }
}

/// Whole-number percent with ties rounded up, computed in integers.
fn percent_round_half_up(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (200 * correct + total) / (2 * total);
    u32::try_from(scaled).unwrap_or(100)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn build_question(id: u32, correct_option: usize) -> Question {
        Question::new(
            QuestionId::new(format!("q{id}")),
            format!("Prompt {id}"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_option,
        )
        .unwrap()
    }

    fn build_questions(count: u32) -> Vec<Question> {
        (0..count).map(|id| build_question(id, 0)).collect()
    }

    #[test]
    fn empty_sheet_scores_zero() {
        let questions = build_questions(4);
        let graded = score(&questions, &AnswerSheet::new(), 70);

        assert_eq!(graded.correct_count(), 0);
        assert_eq!(graded.percent(), 0);
        assert!(!graded.passed());
    }

    #[test]
    fn all_correct_scores_one_hundred_and_passes_any_threshold() {
        let questions = build_questions(6);
        let mut sheet = AnswerSheet::new();
        for position in 0..6 {
            sheet.record(position, 0);
        }

        let graded = score(&questions, &sheet, 100);
        assert_eq!(graded.correct_count(), 6);
        assert_eq!(graded.percent(), 100);
        assert!(graded.passed());
    }

    #[test]
    fn three_of_four_at_seventy_percent_passes() {
        let questions = build_questions(4);
        let mut sheet = AnswerSheet::new();
        sheet.record(0, 0);
        sheet.record(1, 0);
        sheet.record(2, 0);
        sheet.record(3, 1);

        let graded = score(&questions, &sheet, 70);
        assert_eq!(graded.correct_count(), 3);
        assert_eq!(graded.percent(), 75);
        assert!(graded.passed());
    }

    #[test]
    fn unanswered_positions_count_as_wrong() {
        let questions = build_questions(4);
        let mut sheet = AnswerSheet::new();
        sheet.record(0, 0);

        let graded = score(&questions, &sheet, 70);
        assert_eq!(graded.correct_count(), 1);
        assert_eq!(graded.percent(), 25);
        assert!(!graded.passed());
    }

    #[test]
    fn selections_beyond_the_question_list_are_ignored() {
        let questions = build_questions(2);
        let mut sheet = AnswerSheet::new();
        sheet.record(0, 0);
        sheet.record(5, 0);

        let graded = score(&questions, &sheet, 50);
        assert_eq!(graded.correct_count(), 1);
        assert_eq!(graded.total_questions(), 2);
        assert_eq!(graded.percent(), 50);
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let questions = build_questions(4);
        let mut sheet = AnswerSheet::new();
        sheet.record(0, 0);
        sheet.record(1, 0);
        sheet.record(2, 0);

        let graded = score(&questions, &sheet, 75);
        assert_eq!(graded.percent(), 75);
        assert!(graded.passed());

        let graded = score(&questions, &sheet, 76);
        assert!(!graded.passed());
    }

    #[test]
    fn percent_rounds_half_up() {
        // 1/8 = 12.5% rounds to 13.
        let questions = build_questions(8);
        let mut sheet = AnswerSheet::new();
        sheet.record(0, 0);
        assert_eq!(score(&questions, &sheet, 70).percent(), 13);

        // 1/3 = 33.33% rounds to 33, 2/3 = 66.67% rounds to 67.
        let questions = build_questions(3);
        let mut sheet = AnswerSheet::new();
        sheet.record(0, 0);
        assert_eq!(score(&questions, &sheet, 70).percent(), 33);
        sheet.record(1, 0);
        assert_eq!(score(&questions, &sheet, 70).percent(), 67);
    }

    #[test]
    fn wrong_selection_never_matches_another_question() {
        let questions = vec![build_question(0, 2), build_question(1, 3)];
        let mut sheet = AnswerSheet::new();
        sheet.record(0, 3);
        sheet.record(1, 2);

        let graded = score(&questions, &sheet, 50);
        assert_eq!(graded.correct_count(), 0);
        assert!(!graded.passed());
    }

    #[test]
    fn no_questions_grades_to_zero() {
        let graded = score(&[], &AnswerSheet::new(), 70);
        assert_eq!(graded.total_questions(), 0);
        assert_eq!(graded.percent(), 0);
    }
}
