//! Outcome type for auxiliary conveniences
//!
//! Remote sync, auto-open and auto-close must never fail the operation
//! they accompany. Their outcome is recorded here and logged instead of
//! being propagated as an error.

use crate::debug;
use std::fmt;

/// Outcome of a best-effort step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort {
    /// The step ran to completion
    Done,
    /// The step was not attempted
    Skipped(String),
    /// The step failed; the message has already been logged
    Failed(String),
}

impl BestEffort {
    /// Convert a result into a best-effort outcome, logging failures under `category`
    pub fn from_result<T>(category: &str, result: anyhow::Result<T>) -> Self {
        match result {
            Ok(_) => BestEffort::Done,
            Err(e) => {
                let message = format!("{e:#}");
                debug::log_category(category, &format!("ignored failure: {message}"));
                BestEffort::Failed(message)
            }
        }
    }

    /// Mark a step as skipped
    pub fn skipped(reason: impl Into<String>) -> Self {
        BestEffort::Skipped(reason.into())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, BestEffort::Done)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BestEffort::Failed(_))
    }
}

impl fmt::Display for BestEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BestEffort::Done => write!(f, "done"),
            BestEffort::Skipped(reason) => write!(f, "skipped ({reason})"),
            BestEffort::Failed(message) => write!(f, "failed ({message})"),
        }
    }
}
