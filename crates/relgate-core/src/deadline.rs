use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("deadline expired during {phase}")]
pub struct DeadlineExpired {
    pub phase: &'static str,
}

/// Caller-supplied time bound, checked cooperatively between phases of a run.
///
/// `Deadline::none()` never expires; `Deadline::after(timeout)` expires once
/// the timeout has elapsed. Long-running collaborators (the history walker,
/// the state store) receive a deadline so no run can hang silently.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    #[must_use]
    pub fn none() -> Self {
        Self { expires_at: None }
    }

    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(timeout),
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// # Errors
    ///
    /// Returns [`DeadlineExpired`] naming `phase` once the deadline passes.
    pub fn check(&self, phase: &'static str) -> Result<(), DeadlineExpired> {
        if self.is_expired() {
            Err(DeadlineExpired { phase })
        } else {
            Ok(())
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
