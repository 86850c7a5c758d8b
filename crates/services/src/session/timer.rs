use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

//
// ─── TIMER SIGNAL ──────────────────────────────────────────────────────────────
//

/// Urgency band for the remaining time, for display emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Normal,
    /// Five minutes or less remain.
    Warning,
    /// One minute or less remains.
    Urgent,
}

impl TimerSignal {
    #[must_use]
    pub fn from_remaining(remaining_secs: u32) -> Self {
        if remaining_secs <= 60 {
            TimerSignal::Urgent
        } else if remaining_secs <= 300 {
            TimerSignal::Warning
        } else {
            TimerSignal::Normal
        }
    }
}

/// Formats seconds as `M:SS` for countdown displays.
#[must_use]
pub fn format_mm_ss(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

//
// ─── TEST TIMER ────────────────────────────────────────────────────────────────
//

/// Counts a test's time limit down to zero, one second at a time.
///
/// The countdown runs on a spawned task and publishes the remaining seconds
/// through a watch channel, so readers never block the tick loop. The timer
/// fires once: after reaching zero it stays at zero.
#[derive(Debug)]
pub struct TestTimer {
    remaining: watch::Receiver<u32>,
    task: JoinHandle<()>,
}

impl TestTimer {
    /// Starts the countdown from `limit_secs`.
    ///
    /// A zero limit counts as already expired and spawns no ticking work.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn start(limit_secs: u32) -> Self {
        let (tx, rx) = watch::channel(limit_secs);
        let task = tokio::spawn(async move {
            if limit_secs == 0 {
                return;
            }

            let mut ticker = time::interval(Duration::from_secs(1));
            // The first tick completes immediately and only arms the loop.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut expired = false;
                tx.send_modify(|remaining| {
                    *remaining = remaining.saturating_sub(1);
                    expired = *remaining == 0;
                });
                if expired {
                    break;
                }
            }
        });

        Self {
            remaining: rx,
            task,
        }
    }

    /// Seconds left on the clock.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        *self.remaining.borrow()
    }

    /// Urgency band for the remaining time.
    #[must_use]
    pub fn signal(&self) -> TimerSignal {
        TimerSignal::from_remaining(self.remaining_secs())
    }

    /// Resolves when the countdown reaches zero.
    ///
    /// Callers race this against candidate input to force submission on
    /// expiry. A stopped timer never resolves.
    pub async fn expired(&self) {
        let mut rx = self.remaining.clone();
        loop {
            if *rx.borrow_and_update() == 0 {
                return;
            }
            if rx.changed().await.is_err() {
                // Sender gone before reaching zero: the timer was stopped.
                std::future::pending::<()>().await;
            }
        }
    }

    /// Halts the countdown, freezing the remaining time where it is.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for TestTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
