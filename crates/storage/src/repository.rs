use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use exam_core::model::{
    AttemptId, Candidate, EmployeeCode, Outcome, Question, QuestionError, QuestionId,
    SettingsError, StaffError, StaffId, StaffMember, TestSettings,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── DOCUMENT RECORDS ──────────────────────────────────────────────────────────
//

/// Document shape for a question in the backing store.
///
/// Mirrors the domain `Question` so adapters can serialize/deserialize
/// without leaking store concerns into the domain layer. Field names follow
/// the store's camelCase convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().as_str().to_owned(),
            text: question.prompt().to_owned(),
            options: question.options().to_vec(),
            correct_answer: question.correct_option(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored document fails validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            QuestionId::new(self.id),
            self.text,
            self.options,
            self.correct_answer,
        )
    }
}

/// Document shape for a roster entry in the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    pub id: String,
    pub name: String,
    pub employee_id: String,
    pub is_active: bool,
    pub last_test_date: Option<DateTime<Utc>>,
}

impl StaffRecord {
    #[must_use]
    pub fn from_staff(staff: &StaffMember) -> Self {
        Self {
            id: staff.id().as_str().to_owned(),
            name: staff.name().to_owned(),
            employee_id: staff.employee_code().as_str().to_owned(),
            is_active: staff.is_active(),
            last_test_date: staff.last_attempt_at(),
        }
    }

    /// Convert the record back into a domain `StaffMember`.
    ///
    /// # Errors
    ///
    /// Returns `StaffError` if the stored name or employee code is invalid.
    pub fn into_staff(self) -> Result<StaffMember, StaffError> {
        StaffMember::new(
            StaffId::new(self.id),
            self.name,
            EmployeeCode::new(self.employee_id)?,
            self.is_active,
            self.last_test_date,
        )
    }
}

/// Document shape for the shared test configuration.
///
/// The stored document keeps the time limit in whole minutes; the domain
/// settings work in seconds. Navigation policy is not part of the document,
/// the session layer decides it per test kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfigRecord {
    pub time_limit: u32,
    pub number_of_questions: u32,
    pub passing_score: u32,
    pub randomize_questions: bool,
}

impl TestConfigRecord {
    #[must_use]
    pub fn from_settings(settings: &TestSettings) -> Self {
        Self {
            time_limit: settings.time_limit_secs().div_ceil(60),
            number_of_questions: settings.question_count(),
            passing_score: settings.passing_percent(),
            randomize_questions: settings.randomize(),
        }
    }

    /// Convert the record into validated domain settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the stored values are out of range.
    pub fn into_settings(self) -> Result<TestSettings, SettingsError> {
        TestSettings::new(
            self.time_limit.saturating_mul(60),
            self.number_of_questions,
            self.passing_score,
            self.randomize_questions,
            false,
        )
    }
}

/// Document written to the result store for a completed recorded attempt.
///
/// `answers` holds the selected option per question position, `None` where
/// the question went unanswered. `date` is the attempt's UTC calendar day,
/// which the admin screens filter on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub attempt_id: AttemptId,
    pub staff_id: StaffId,
    pub staff_name: String,
    pub employee_id: EmployeeCode,
    pub score: u32,
    pub passed: bool,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub answers: Vec<Option<usize>>,
    pub used_fallback_questions: bool,
    pub completed_at: DateTime<Utc>,
    pub date: NaiveDate,
}

impl ResultRecord {
    #[must_use]
    pub fn new(
        attempt_id: AttemptId,
        candidate: &Candidate,
        outcome: &Outcome,
        answers: Vec<Option<usize>>,
    ) -> Self {
        Self {
            attempt_id,
            staff_id: candidate.staff_id().clone(),
            staff_name: candidate.name().to_owned(),
            employee_id: candidate.employee_code().clone(),
            score: outcome.percent(),
            passed: outcome.passed(),
            correct_answers: outcome.correct_count(),
            total_questions: outcome.total_questions(),
            answers,
            used_fallback_questions: outcome.used_fallback(),
            completed_at: outcome.completed_at(),
            date: outcome.completed_at().date_naive(),
        }
    }
}

//
// ─── STORE CONTRACTS ───────────────────────────────────────────────────────────
//

/// Supplies questions for new test sessions.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Fetch up to `count` questions for a new session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the bank cannot be reached, or
    /// other storage errors.
    async fn draw_questions(&self, count: u32) -> Result<Vec<Question>, StoreError>;
}

/// Receives completed attempt results.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Store a finished attempt and return the assigned document id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the result cannot be stored.
    async fn submit_result(&self, record: &ResultRecord) -> Result<String, StoreError>;
}

/// Answers eligibility questions about the staff roster.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Whether the staff member may start a recorded attempt on `date`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, or other storage
    /// errors.
    async fn can_attempt_on(&self, id: &StaffId, date: NaiveDate) -> Result<bool, StoreError>;

    /// Stamp the staff member's roster entry with a completed attempt.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, or other storage
    /// errors.
    async fn record_attempt(&self, id: &StaffId, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// Loads the shared test configuration.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the current test settings.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the configuration cannot be read.
    async fn load_test_settings(&self) -> Result<TestSettings, StoreError>;
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

/// Simple in-memory store implementation for testing and prototyping.
///
/// Holds document records internally, so reads exercise the same
/// record-to-domain conversions a remote adapter would.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    questions: Arc<Mutex<Vec<QuestionRecord>>>,
    staff: Arc<Mutex<HashMap<String, StaffRecord>>>,
    config: Arc<Mutex<Option<TestConfigRecord>>>,
    results: Arc<Mutex<Vec<ResultRecord>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the question bank, keeping insertion order for deterministic
    /// draws.
    #[must_use]
    pub fn with_questions(self, questions: &[Question]) -> Self {
        if let Ok(mut guard) = self.questions.lock() {
            guard.extend(questions.iter().map(QuestionRecord::from_question));
        }
        self
    }

    /// Seeds the staff roster.
    #[must_use]
    pub fn with_staff(self, staff: &[StaffMember]) -> Self {
        if let Ok(mut guard) = self.staff.lock() {
            for member in staff {
                let record = StaffRecord::from_staff(member);
                guard.insert(record.id.clone(), record);
            }
        }
        self
    }

    /// Seeds the shared test configuration.
    #[must_use]
    pub fn with_settings(self, settings: &TestSettings) -> Self {
        if let Ok(mut guard) = self.config.lock() {
            *guard = Some(TestConfigRecord::from_settings(settings));
        }
        self
    }

    /// Snapshot of every stored result, in submission order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store lock is poisoned.
    pub fn results(&self) -> Result<Vec<ResultRecord>, StoreError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl QuestionBank for InMemoryStore {
    async fn draw_questions(&self, count: u32) -> Result<Vec<Question>, StoreError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        guard
            .iter()
            .take(count)
            .cloned()
            .map(|record| {
                record
                    .into_question()
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl ResultSink for InMemoryStore {
    async fn submit_result(&self, record: &ResultRecord) -> Result<String, StoreError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        guard.push(record.clone());
        Ok(format!("result-{}", guard.len()))
    }
}

#[async_trait]
impl StaffDirectory for InMemoryStore {
    async fn can_attempt_on(&self, id: &StaffId, date: NaiveDate) -> Result<bool, StoreError> {
        let guard = self
            .staff
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let record = guard.get(id.as_str()).ok_or(StoreError::NotFound)?;
        let staff = record
            .clone()
            .into_staff()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(staff.can_attempt_on(date))
    }

    async fn record_attempt(&self, id: &StaffId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut guard = self
            .staff
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let record = guard.get_mut(id.as_str()).ok_or(StoreError::NotFound)?;
        record.last_test_date = Some(at);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for InMemoryStore {
    async fn load_test_settings(&self) -> Result<TestSettings, StoreError> {
        let guard = self
            .config
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        match guard.clone() {
            Some(record) => record
                .into_settings()
                .map_err(|e| StoreError::Serialization(e.to_string())),
            // Mirrors the config service: an absent document means the
            // standard values.
            None => Ok(TestSettings::standard()),
        }
    }
}

/// Aggregates the store contracts behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionBank>,
    pub results: Arc<dyn ResultSink>,
    pub staff: Arc<dyn StaffDirectory>,
    pub settings: Arc<dyn SettingsStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self::from_store(&store)
    }

    /// Wraps one `InMemoryStore` (typically pre-seeded) behind all four
    /// contracts.
    #[must_use]
    pub fn from_store(store: &InMemoryStore) -> Self {
        Self {
            questions: Arc::new(store.clone()),
            results: Arc::new(store.clone()),
            staff: Arc::new(store.clone()),
            settings: Arc::new(store.clone()),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
