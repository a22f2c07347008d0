use std::fmt;

use crate::shared::scan_error::{ScanError, ScanErrorKind};

/// Lifecycle phase of a scanning session. Exactly one holds at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Requesting,
    Scanning,
    Found,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Requesting => write!(f, "requesting"),
            Phase::Scanning => write!(f, "scanning"),
            Phase::Found => write!(f, "found"),
            Phase::Error => write!(f, "error"),
        }
    }
}

/// Observable state of a scanning session.
///
/// `result` is present iff the phase is `Found`; `message` (and the error
/// kind) iff the phase is `Error`. The constructors are the only way to
/// build a value, so every instance satisfies that invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    phase: Phase,
    result: Option<String>,
    message: Option<String>,
    error_kind: Option<ScanErrorKind>,
}

impl SessionState {
    pub fn idle() -> Self {
        Self::bare(Phase::Idle)
    }

    pub fn requesting() -> Self {
        Self::bare(Phase::Requesting)
    }

    pub fn scanning() -> Self {
        Self::bare(Phase::Scanning)
    }

    pub fn found(value: impl Into<String>) -> Self {
        Self {
            result: Some(value.into()),
            ..Self::bare(Phase::Found)
        }
    }

    pub fn error(error: &ScanError) -> Self {
        Self {
            message: Some(error.to_string()),
            error_kind: Some(error.kind()),
            ..Self::bare(Phase::Error)
        }
    }

    fn bare(phase: Phase) -> Self {
        Self {
            phase,
            result: None,
            message: None,
            error_kind: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error_kind(&self) -> Option<ScanErrorKind> {
        self.error_kind
    }

    /// True while a start request would be ignored.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Requesting | Phase::Scanning)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::idle()
    }
}
