mod progress;
mod setup;
mod state;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{BeginError, SessionError};
pub use progress::SessionProgress;
pub use setup::FallbackPolicy;
pub use state::{Advance, ReviewEntry, SessionPhase, TestKind, TestSession};
pub use timer::{format_mm_ss, TestTimer, TimerSignal};
pub use workflow::{ActiveTest, FinishedTest, ProctorService, RecordStatus};
