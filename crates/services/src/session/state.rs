use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::SliceRandom;
use std::fmt;

use exam_core::model::{AnswerSheet, AttemptId, Candidate, Outcome, Question, TestSettings};

use crate::error::SessionError;
use super::progress::SessionProgress;

//
// ─── TEST KIND ─────────────────────────────────────────────────────────────────
//

/// What a test run is for.
///
/// Practice runs score locally and leave no record. Certification runs are
/// tied to a roster member and their result is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestKind {
    Practice,
    Certification(Candidate),
}

impl TestKind {
    #[must_use]
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            TestKind::Practice => None,
            TestKind::Certification(candidate) => Some(candidate),
        }
    }

    #[must_use]
    pub fn is_certification(&self) -> bool {
        matches!(self, TestKind::Certification(_))
    }
}

//
// ─── PHASE AND NAVIGATION ──────────────────────────────────────────────────────
//

/// Phase of a running session.
///
/// There is no not-started phase; a `TestSession` value exists only once the
/// attempt is underway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    Submitting,
    Completed,
}

/// Result of asking the session to move to the next question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward; more questions remain.
    Continuing,
    /// Already on the last question. Submitting is the caller's decision,
    /// never a side effect of navigation.
    ReachedEnd,
    /// The current question must be answered first.
    AnswerRequired,
}

/// One question paired with the candidate's selection, for review screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry<'a> {
    pub question: &'a Question,
    pub selected_option: Option<usize>,
    pub correct_option: usize,
}

impl ReviewEntry<'_> {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected_option == Some(self.correct_option)
    }
}

//
// ─── TEST SESSION ──────────────────────────────────────────────────────────────
//

/// In-memory state of one test attempt.
///
/// Steps through a fixed question list, recording selections on an answer
/// sheet until submission freezes them. Navigation stays legal in every
/// phase so review screens reuse the same cursor; only answers are rejected
/// once the session closes.
pub struct TestSession {
    attempt_id: AttemptId,
    kind: TestKind,
    settings: TestSettings,
    questions: Vec<Question>,
    position: usize,
    answers: AnswerSheet,
    phase: SessionPhase,
    used_fallback: bool,
    started_at: DateTime<Utc>,
    outcome: Option<Outcome>,
}

impl TestSession {
    /// Starts a session over the given questions.
    ///
    /// Question order is shuffled here, once, when the settings ask for it;
    /// the order then stays fixed for the life of the attempt.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` if no questions are provided.
    pub fn start(
        mut questions: Vec<Question>,
        settings: TestSettings,
        kind: TestKind,
        used_fallback: bool,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        if settings.randomize() {
            questions.shuffle(&mut rng());
        }

        Ok(Self {
            attempt_id: AttemptId::new(),
            kind,
            settings,
            questions,
            position: 0,
            answers: AnswerSheet::new(),
            phase: SessionPhase::InProgress,
            used_fallback,
            started_at,
            outcome: None,
        })
    }

    /// Records the selected option for a question position, replacing any
    /// earlier selection there.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` once submission has begun, or an
    /// out-of-range error for a bad position or option.
    pub fn record_answer(&mut self, position: usize, option: usize) -> Result<(), SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::Closed);
        }
        let len = self.questions.len();
        if position >= len {
            return Err(SessionError::OutOfRange { position, len });
        }
        if option >= self.questions[position].option_count() {
            return Err(SessionError::InvalidOption { position, option });
        }

        self.answers.record(position, option);
        Ok(())
    }

    /// Records the selected option for the question currently shown.
    ///
    /// # Errors
    ///
    /// Same as [`record_answer`](Self::record_answer).
    pub fn answer_current(&mut self, option: usize) -> Result<(), SessionError> {
        self.record_answer(self.position, option)
    }

    /// Moves to the next question.
    ///
    /// Stays put on the last question and reports `ReachedEnd`. When the
    /// settings require an answer before moving on, an unanswered current
    /// question reports `AnswerRequired` instead; review navigation after
    /// submission is exempt.
    pub fn next(&mut self) -> Advance {
        if self.phase == SessionPhase::InProgress
            && self.settings.require_answer_to_advance()
            && !self.answers.is_answered(self.position)
        {
            return Advance::AnswerRequired;
        }
        if self.position + 1 >= self.questions.len() {
            return Advance::ReachedEnd;
        }

        self.position += 1;
        Advance::Continuing
    }

    /// Moves to the previous question; does nothing on the first.
    pub fn previous(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Jumps directly to a question position.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if the position does not exist.
    pub fn jump_to(&mut self, position: usize) -> Result<(), SessionError> {
        let len = self.questions.len();
        if position >= len {
            return Err(SessionError::OutOfRange { position, len });
        }

        self.position = position;
        Ok(())
    }

    // Accessors
    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn kind(&self) -> &TestKind {
        &self.kind
    }

    #[must_use]
    pub fn candidate(&self) -> Option<&Candidate> {
        self.kind.candidate()
    }

    #[must_use]
    pub fn settings(&self) -> &TestSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// True when the attempt runs on the builtin fallback questions.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// The question currently shown.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        // The cursor can never leave the question list; navigation is
        // bounds-checked and an empty session cannot start.
        &self.questions[self.position]
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.answers.is_answered(position)
    }

    #[must_use]
    pub fn selected(&self, position: usize) -> Option<usize> {
        self.answers.selected(position)
    }

    /// Number of questions answered so far.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    /// Number of questions still unanswered.
    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.questions.len().saturating_sub(self.answers.answered_count())
    }

    /// The sealed outcome, present once the session is completed.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: self.position,
            total: self.total_questions(),
            answered: self.answered_count(),
            unanswered: self.unanswered_count(),
            is_complete: self.answered_count() == self.total_questions(),
        }
    }

    /// Question-plus-selection pair for review screens.
    #[must_use]
    pub fn review_entry(&self, position: usize) -> Option<ReviewEntry<'_>> {
        let question = self.questions.get(position)?;
        Some(ReviewEntry {
            question,
            selected_option: self.answers.selected(position),
            correct_option: question.correct_option(),
        })
    }

    pub(crate) fn begin_submission(&mut self) {
        self.phase = SessionPhase::Submitting;
    }

    pub(crate) fn complete(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.phase = SessionPhase::Completed;
    }
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("attempt_id", &self.attempt_id)
            .field("kind", &self.kind)
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("answered", &self.answers.answered_count())
            .field("phase", &self.phase)
            .field("used_fallback", &self.used_fallback)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::QuestionId;
    use exam_core::scoring;
    use exam_core::time::fixed_now;

    fn build_question(id: u32) -> Question {
        Question::new(
            QuestionId::new(format!("q{id}")),
            format!("Prompt {id}"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            0,
        )
        .unwrap()
    }

    fn build_questions(count: u32) -> Vec<Question> {
        (0..count).map(build_question).collect()
    }

    fn settings() -> TestSettings {
        TestSettings::new(600, 4, 70, false, false).unwrap()
    }

    fn start_session(count: u32) -> TestSession {
        TestSession::start(
            build_questions(count),
            settings(),
            TestKind::Practice,
            false,
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn start_rejects_empty_question_list() {
        let err = TestSession::start(
            Vec::new(),
            settings(),
            TestKind::Practice,
            false,
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::NoQuestions));
    }

    #[test]
    fn start_keeps_order_when_randomize_is_off() {
        let session = start_session(4);
        let ids: Vec<_> = session.questions().iter().map(|q| q.id().clone()).collect();
        assert_eq!(
            ids,
            vec![
                QuestionId::new("q0"),
                QuestionId::new("q1"),
                QuestionId::new("q2"),
                QuestionId::new("q3"),
            ]
        );
    }

    #[test]
    fn shuffle_is_a_permutation_of_the_draw() {
        let questions = build_questions(30);
        let mut expected: Vec<_> = questions.iter().map(|q| q.id().clone()).collect();

        let session = TestSession::start(
            questions,
            settings().with_randomize(true),
            TestKind::Practice,
            false,
            fixed_now(),
        )
        .unwrap();

        let mut shuffled: Vec<_> = session.questions().iter().map(|q| q.id().clone()).collect();
        expected.sort();
        shuffled.sort();
        assert_eq!(shuffled, expected);
        assert_eq!(session.total_questions(), 30);
    }

    #[test]
    fn record_answer_overwrites_earlier_selection() {
        let mut session = start_session(4);
        session.record_answer(1, 2).unwrap();
        session.record_answer(1, 3).unwrap();

        assert_eq!(session.selected(1), Some(3));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn record_answer_rejects_bad_position() {
        let mut session = start_session(4);
        let err = session.record_answer(9, 0).unwrap_err();
        assert!(matches!(err, SessionError::OutOfRange { position: 9, len: 4 }));
    }

    #[test]
    fn record_answer_rejects_bad_option() {
        let mut session = start_session(4);
        let err = session.record_answer(0, 4).unwrap_err();
        assert!(matches!(err, SessionError::InvalidOption { position: 0, option: 4 }));
    }

    #[test]
    fn answer_current_targets_the_shown_question() {
        let mut session = start_session(4);
        session.jump_to(2).unwrap();
        session.answer_current(1).unwrap();

        assert_eq!(session.selected(2), Some(1));
        assert!(!session.is_answered(0));
    }

    #[test]
    fn next_stops_on_the_last_question() {
        let mut session = start_session(3);
        assert_eq!(session.next(), Advance::Continuing);
        assert_eq!(session.next(), Advance::Continuing);
        assert_eq!(session.next(), Advance::ReachedEnd);
        assert_eq!(session.next(), Advance::ReachedEnd);
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn previous_stays_on_the_first_question() {
        let mut session = start_session(3);
        session.previous();
        assert_eq!(session.position(), 0);

        session.jump_to(2).unwrap();
        session.previous();
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn jump_to_checks_the_range() {
        let mut session = start_session(3);
        assert!(session.jump_to(2).is_ok());

        let err = session.jump_to(3).unwrap_err();
        assert!(matches!(err, SessionError::OutOfRange { position: 3, len: 3 }));
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn require_answer_blocks_an_unanswered_advance() {
        let mut session = TestSession::start(
            build_questions(3),
            settings().with_require_answer_to_advance(true),
            TestKind::Practice,
            false,
            fixed_now(),
        )
        .unwrap();

        assert_eq!(session.next(), Advance::AnswerRequired);
        assert_eq!(session.position(), 0);

        session.answer_current(0).unwrap();
        assert_eq!(session.next(), Advance::Continuing);
    }

    #[test]
    fn answered_count_ignores_traversal_order() {
        let mut session = start_session(4);
        session.answer_current(0).unwrap();
        session.jump_to(3).unwrap();
        session.answer_current(2).unwrap();
        session.previous();
        session.answer_current(1).unwrap();

        assert_eq!(session.answered_count(), 3);
        assert_eq!(session.unanswered_count(), 1);

        let progress = session.progress();
        assert_eq!(progress.answered, 3);
        assert_eq!(progress.position, 2);
        assert!(!progress.is_complete);
    }

    #[test]
    fn submission_closes_answers_but_not_navigation() {
        let mut session = start_session(3);
        session.answer_current(0).unwrap();
        session.begin_submission();

        assert_eq!(session.phase(), SessionPhase::Submitting);
        let err = session.record_answer(1, 0).unwrap_err();
        assert!(matches!(err, SessionError::Closed));

        assert_eq!(session.next(), Advance::Continuing);
        session.previous();
        assert!(session.jump_to(2).is_ok());
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn complete_seals_the_outcome() {
        let mut session = start_session(4);
        session.answer_current(0).unwrap();
        session.begin_submission();

        let graded = scoring::score(session.questions(), session.answers(), 70);
        let outcome = Outcome::from_score(graded, false, fixed_now());
        session.complete(outcome);

        assert_eq!(session.phase(), SessionPhase::Completed);
        let sealed = session.outcome().unwrap();
        assert_eq!(sealed.percent(), 25);
        assert!(!sealed.passed());

        let err = session.answer_current(1).unwrap_err();
        assert!(matches!(err, SessionError::Closed));
    }

    #[test]
    fn require_answer_does_not_block_review_navigation() {
        let mut session = TestSession::start(
            build_questions(2),
            settings().with_require_answer_to_advance(true),
            TestKind::Practice,
            false,
            fixed_now(),
        )
        .unwrap();
        session.begin_submission();

        assert_eq!(session.next(), Advance::Continuing);
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn review_entries_pair_selections_with_questions() {
        let mut session = start_session(3);
        session.record_answer(0, 0).unwrap();
        session.record_answer(1, 2).unwrap();

        let first = session.review_entry(0).unwrap();
        assert!(first.is_correct());

        let second = session.review_entry(1).unwrap();
        assert_eq!(second.selected_option, Some(2));
        assert!(!second.is_correct());

        let third = session.review_entry(2).unwrap();
        assert_eq!(third.selected_option, None);
        assert!(!third.is_correct());

        assert!(session.review_entry(3).is_none());
    }
}
