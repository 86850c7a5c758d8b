use std::sync::Arc;

use exam_core::model::{Candidate, Outcome, StaffMember, TestSettings};
use exam_core::scoring;
use exam_core::Clock;
use storage::repository::{QuestionBank, ResultRecord, ResultSink, SettingsStore, StaffDirectory};

use crate::error::BeginError;
use super::setup::{draw_for_session, FallbackPolicy};
use super::state::{TestKind, TestSession};
use super::timer::{TestTimer, TimerSignal};

//
// ─── ATTEMPT HANDLES ───────────────────────────────────────────────────────────
//

/// Where a finished attempt's result ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// Stored, with the document id the sink assigned.
    Saved(String),
    /// The sink rejected the result; the outcome itself still stands.
    Failed,
    /// Practice attempts are never recorded.
    NotRecorded,
}

/// A running attempt: the session plus its countdown.
#[derive(Debug)]
pub struct ActiveTest {
    session: TestSession,
    timer: TestTimer,
}

impl ActiveTest {
    #[must_use]
    pub fn session(&self) -> &TestSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TestSession {
        &mut self.session
    }

    /// Seconds left on the attempt clock.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    /// Urgency band for the remaining time.
    #[must_use]
    pub fn signal(&self) -> TimerSignal {
        self.timer.signal()
    }

    /// Resolves when the time limit runs out.
    ///
    /// Callers race this against candidate input and pass the test to
    /// [`ProctorService::conclude`] when it fires.
    pub async fn expired(&self) {
        self.timer.expired().await;
    }

    /// Walks away from the attempt without scoring or recording it.
    pub fn abandon(self) {
        self.timer.stop();
    }
}

/// A concluded attempt: the frozen session, its outcome, and whether the
/// result was stored.
#[derive(Debug)]
pub struct FinishedTest {
    session: TestSession,
    outcome: Outcome,
    recorded: RecordStatus,
}

impl FinishedTest {
    /// The sealed session, still navigable for answer review.
    #[must_use]
    pub fn session(&self) -> &TestSession {
        &self.session
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub fn recorded(&self) -> &RecordStatus {
        &self.recorded
    }
}

//
// ─── PROCTOR SERVICE ───────────────────────────────────────────────────────────
//

/// Orchestrates test attempts end to end.
///
/// Starts practice and certification sessions over the configured stores and
/// concludes attempts by scoring, recording, and sealing them.
#[derive(Clone)]
pub struct ProctorService {
    clock: Clock,
    questions: Arc<dyn QuestionBank>,
    results: Arc<dyn ResultSink>,
    roster: Arc<dyn StaffDirectory>,
    settings: Arc<dyn SettingsStore>,
    fallback: FallbackPolicy,
}

impl ProctorService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionBank>,
        results: Arc<dyn ResultSink>,
        roster: Arc<dyn StaffDirectory>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            clock,
            questions,
            results,
            roster,
            settings,
            fallback: FallbackPolicy::BuiltinSet,
        }
    }

    #[must_use]
    pub fn with_fallback_policy(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Starts an unrecorded practice attempt.
    ///
    /// # Errors
    ///
    /// Returns `BeginError` when no questions can be drawn under the current
    /// fallback policy.
    pub async fn begin_practice(&self) -> Result<ActiveTest, BeginError> {
        let settings = self.load_settings().await;
        self.begin(settings, TestKind::Practice).await
    }

    /// Starts a recorded certification attempt for a roster member.
    ///
    /// The member confirms their employee code first, and recorded attempts
    /// are limited to one per calendar day. Certification runs always
    /// require an answer before moving to the next question.
    ///
    /// # Errors
    ///
    /// Returns `BeginError` when the member is inactive, the code does not
    /// match, today's attempt is already spent, or questions cannot be
    /// drawn.
    pub async fn begin_certification(
        &self,
        staff: &StaffMember,
        entered_code: &str,
    ) -> Result<ActiveTest, BeginError> {
        if !staff.is_active() {
            return Err(BeginError::InactiveStaff(staff.id().clone()));
        }
        if !staff.verify_code(entered_code) {
            return Err(BeginError::CodeMismatch);
        }
        if !self
            .roster
            .can_attempt_on(staff.id(), self.clock.today())
            .await?
        {
            return Err(BeginError::AlreadyAttemptedToday(staff.id().clone()));
        }

        let settings = self.load_settings().await.with_require_answer_to_advance(true);
        let kind = TestKind::Certification(Candidate::from_staff(staff));
        self.begin(settings, kind).await
    }

    /// Concludes an attempt: stops the clock, scores the sheet, records the
    /// result for certification runs, and seals the session.
    ///
    /// Recording is best-effort. A sink failure is logged and reported as
    /// `RecordStatus::Failed`; the outcome itself always stands.
    pub async fn conclude(&self, active: ActiveTest) -> FinishedTest {
        let ActiveTest { mut session, timer } = active;
        timer.stop();
        session.begin_submission();

        let graded = scoring::score(
            session.questions(),
            session.answers(),
            session.settings().passing_percent(),
        );
        let outcome = Outcome::from_score(graded, session.used_fallback(), self.clock.now());

        let recorded = match session.kind().candidate().cloned() {
            None => RecordStatus::NotRecorded,
            Some(candidate) => self.record_certification(&session, &candidate, &outcome).await,
        };

        session.complete(outcome.clone());
        FinishedTest {
            session,
            outcome,
            recorded,
        }
    }

    async fn begin(
        &self,
        settings: TestSettings,
        kind: TestKind,
    ) -> Result<ActiveTest, BeginError> {
        let draw =
            draw_for_session(self.questions.as_ref(), settings.question_count(), self.fallback)
                .await?;
        let limit_secs = settings.time_limit_secs();
        let session = TestSession::start(
            draw.questions,
            settings,
            kind,
            draw.used_fallback,
            self.clock.now(),
        )?;
        let timer = TestTimer::start(limit_secs);

        Ok(ActiveTest { session, timer })
    }

    async fn load_settings(&self) -> TestSettings {
        match self.settings.load_test_settings().await {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("test settings unavailable ({err}), using standard values");
                TestSettings::standard()
            }
        }
    }

    async fn record_certification(
        &self,
        session: &TestSession,
        candidate: &Candidate,
        outcome: &Outcome,
    ) -> RecordStatus {
        let record = ResultRecord::new(
            session.attempt_id(),
            candidate,
            outcome,
            session.answers().to_vec(session.total_questions()),
        );

        match self.results.submit_result(&record).await {
            Ok(document_id) => {
                if let Err(err) = self
                    .roster
                    .record_attempt(candidate.staff_id(), outcome.completed_at())
                    .await
                {
                    log::warn!("attempt stamp for {} failed: {err}", candidate.staff_id());
                }
                RecordStatus::Saved(document_id)
            }
            Err(err) => {
                log::warn!(
                    "test result for {} was not stored: {err}",
                    candidate.staff_id()
                );
                RecordStatus::Failed
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
