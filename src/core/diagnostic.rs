//! Structured diagnostics reported back to the host toolchain.
//!
//! Every failure the pipelines can hit is surfaced as a [`Diagnostic`] instead
//! of a panic, so the hosting build keeps running and can show the message
//! next to the input that caused it.

use serde::Serialize;
use std::fmt;

/// Diagnostic severity as understood by build hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single reportable condition with a stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub id: &'static str,
    pub severity: Severity,
    pub message: String,
    /// Path of the input the diagnostic points at, when there is one.
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn error<S: Into<String>>(id: &'static str, message: S) -> Self {
        Self {
            id,
            severity: Severity::Error,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning<S: Into<String>>(id: &'static str, message: S) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(id, message)
        }
    }

    pub fn with_location<S: Into<String>>(mut self, location: S) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}
