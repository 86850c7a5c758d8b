#![forbid(unsafe_code)]

pub mod error;
pub mod session;

pub use exam_core::Clock;

pub use error::{BeginError, SessionError};

pub use session::{
    ActiveTest, Advance, FallbackPolicy, FinishedTest, ProctorService, RecordStatus, ReviewEntry,
    SessionPhase, SessionProgress, TestKind, TestSession, TestTimer, TimerSignal,
};
