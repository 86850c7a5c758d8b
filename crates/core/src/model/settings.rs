use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,

    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("passing percent must be <= 100")]
    InvalidPassingPercent,
}

//
// ─── TEST SETTINGS ─────────────────────────────────────────────────────────────
//

/// Configuration for one test attempt.
///
/// Controls how many questions are drawn, how long the attempt may run, the
/// pass threshold, and the navigation rules in force.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSettings {
    time_limit_secs: u32,
    question_count: u32,
    passing_percent: u32,
    randomize: bool,
    require_answer_to_advance: bool,
}

impl TestSettings {
    /// Creates the standard settings administrators start from:
    /// 30 minutes, 15 questions, 70 % to pass, question order randomized.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            time_limit_secs: 30 * 60,
            question_count: 15,
            passing_percent: 70,
            randomize: true,
            require_answer_to_advance: false,
        }
    }

    /// Creates custom test settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the time limit or question count is zero, or the
    /// passing percent exceeds 100.
    pub fn new(
        time_limit_secs: u32,
        question_count: u32,
        passing_percent: u32,
        randomize: bool,
        require_answer_to_advance: bool,
    ) -> Result<Self, SettingsError> {
        if time_limit_secs == 0 {
            return Err(SettingsError::InvalidTimeLimit);
        }
        if question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }
        if passing_percent > 100 {
            return Err(SettingsError::InvalidPassingPercent);
        }

        Ok(Self {
            time_limit_secs,
            question_count,
            passing_percent,
            randomize,
            require_answer_to_advance,
        })
    }

    /// Toggles whether question order is shuffled at session start.
    #[must_use]
    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// Toggles whether the current question must be answered before moving on.
    #[must_use]
    pub fn with_require_answer_to_advance(mut self, require: bool) -> Self {
        self.require_answer_to_advance = require;
        self
    }

    // Accessors
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn passing_percent(&self) -> u32 {
        self.passing_percent
    }

    #[must_use]
    pub fn randomize(&self) -> bool {
        self.randomize
    }

    #[must_use]
    pub fn require_answer_to_advance(&self) -> bool {
        self.require_answer_to_advance
    }

    #[must_use]
    pub fn time_limit(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.time_limit_secs))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_standard_values() {
        let settings = TestSettings::standard();
        assert_eq!(settings.time_limit_secs(), 1800);
        assert_eq!(settings.question_count(), 15);
        assert_eq!(settings.passing_percent(), 70);
        assert!(settings.randomize());
        assert!(!settings.require_answer_to_advance());
    }

    #[test]
    fn settings_rejects_zero_time_limit() {
        let err = TestSettings::new(0, 10, 70, true, false).unwrap_err();
        assert_eq!(err, SettingsError::InvalidTimeLimit);
    }

    #[test]
    fn settings_rejects_zero_question_count() {
        let err = TestSettings::new(600, 0, 70, true, false).unwrap_err();
        assert_eq!(err, SettingsError::InvalidQuestionCount);
    }

    #[test]
    fn settings_rejects_percent_over_one_hundred() {
        let err = TestSettings::new(600, 10, 101, true, false).unwrap_err();
        assert_eq!(err, SettingsError::InvalidPassingPercent);
    }

    #[test]
    fn settings_allows_inclusive_bounds() {
        let all = TestSettings::new(1, 1, 100, false, false).unwrap();
        assert_eq!(all.passing_percent(), 100);

        let none = TestSettings::new(1, 1, 0, false, false).unwrap();
        assert_eq!(none.passing_percent(), 0);
    }

    #[test]
    fn settings_builders_toggle_flags() {
        let settings = TestSettings::standard()
            .with_randomize(false)
            .with_require_answer_to_advance(true);

        assert!(!settings.randomize());
        assert!(settings.require_answer_to_advance());
    }

    #[test]
    fn settings_time_limit_as_duration() {
        let settings = TestSettings::new(90, 5, 70, false, false).unwrap();
        assert_eq!(settings.time_limit(), chrono::Duration::seconds(90));
    }
}
