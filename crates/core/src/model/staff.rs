use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::StaffId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StaffError {
    #[error("staff name cannot be empty")]
    EmptyName,

    #[error("employee code cannot be empty")]
    EmptyEmployeeCode,
}

//
// ─── EMPLOYEE CODE ─────────────────────────────────────────────────────────────
//

/// A short code staff members confirm before a recorded attempt (e.g. `W001`).
///
/// This is a confirmation gate against picking the wrong name from a list,
/// not an authentication credential.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeCode(String);

impl EmployeeCode {
    /// Creates a new `EmployeeCode`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `StaffError::EmptyEmployeeCode` if the code is empty or
    /// whitespace-only.
    pub fn new(code: impl Into<String>) -> Result<Self, StaffError> {
        let code = code.into();
        let code = code.trim();
        if code.is_empty() {
            return Err(StaffError::EmptyEmployeeCode);
        }
        Ok(Self(code.to_owned()))
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EmployeeCode({})", self.0)
    }
}

impl fmt::Display for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── STAFF MEMBER ──────────────────────────────────────────────────────────────
//

/// A staff member on the roster who may take tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    id: StaffId,
    name: String,
    employee_code: EmployeeCode,
    is_active: bool,
    last_attempt_at: Option<DateTime<Utc>>,
}

impl StaffMember {
    /// Creates a new staff member.
    ///
    /// # Errors
    ///
    /// Returns `StaffError::EmptyName` if the name is empty or whitespace-only.
    pub fn new(
        id: StaffId,
        name: impl Into<String>,
        employee_code: EmployeeCode,
        is_active: bool,
        last_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<Self, StaffError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StaffError::EmptyName);
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            employee_code,
            is_active,
            last_attempt_at,
        })
    }

    /// Checks an entered code against this member's employee code.
    ///
    /// Surrounding whitespace in the entered code is ignored; the comparison
    /// itself is exact and case-sensitive.
    #[must_use]
    pub fn verify_code(&self, entered: &str) -> bool {
        entered.trim() == self.employee_code.as_str()
    }

    /// Whether this member may start a recorded attempt on the given date.
    ///
    /// Recorded attempts are limited to one per calendar day.
    #[must_use]
    pub fn can_attempt_on(&self, date: NaiveDate) -> bool {
        match self.last_attempt_at {
            Some(last) => last.date_naive() != date,
            None => true,
        }
    }

    /// Stamps the member with a completed attempt.
    pub fn record_attempt(&mut self, at: DateTime<Utc>) {
        self.last_attempt_at = Some(at);
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &StaffId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn employee_code(&self) -> &EmployeeCode {
        &self.employee_code
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn last_attempt_at(&self) -> Option<DateTime<Utc>> {
        self.last_attempt_at
    }
}

//
// ─── CANDIDATE ─────────────────────────────────────────────────────────────────
//

/// Identity snapshot carried by a recorded test session.
///
/// Taken once when the session starts, so the attempt stays traceable even if
/// the roster entry changes mid-test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    staff_id: StaffId,
    name: String,
    employee_code: EmployeeCode,
}

impl Candidate {
    /// Builds the snapshot for a roster member.
    #[must_use]
    pub fn from_staff(staff: &StaffMember) -> Self {
        Self {
            staff_id: staff.id().clone(),
            name: staff.name().to_owned(),
            employee_code: staff.employee_code().clone(),
        }
    }

    // Accessors
    #[must_use]
    pub fn staff_id(&self) -> &StaffId {
        &self.staff_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn employee_code(&self) -> &EmployeeCode {
        &self.employee_code
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
