mod answers;
mod ids;
mod outcome;
mod question;
mod settings;
mod staff;

pub use ids::{AttemptId, QuestionId, StaffId};

pub use answers::AnswerSheet;
pub use outcome::Outcome;
pub use question::{Question, QuestionError};
pub use settings::{SettingsError, TestSettings};
pub use staff::{Candidate, EmployeeCode, StaffError, StaffMember};
