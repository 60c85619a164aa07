//! Phase status returned to the host.
//!
//! `Ok(..)` means success. An `Err(Status)` aborts the phase for its scope:
//! the single candidate for Filter/Score, the whole cycle for PreFilter and
//! NormalizeScore.

use std::fmt;

/// Why a phase failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// Internal or input error. The host retries the request later.
    Error,
    /// The candidate does not fit; another node may.
    Unschedulable,
    /// The request cannot be placed and retrying this cycle won't help.
    UnschedulableAndUnresolvable,
}

/// A failed phase outcome with human-readable reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    reasons: Vec<String>,
}

impl Status {
    pub fn new(code: Code, reason: impl Into<String>) -> Self {
        Self {
            code,
            reasons: vec![reason.into()],
        }
    }

    /// Wrap an error as a `Code::Error` status.
    pub fn as_status(err: impl std::error::Error) -> Self {
        Self::new(Code::Error, err.to_string())
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// Builder method: append a reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    /// All reasons joined for logging.
    pub fn message(&self) -> String {
        self.reasons.join(", ")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message())
    }
}

impl std::error::Error for Status {}
