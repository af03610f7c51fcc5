//! Error types for the generation domain

use crate::core::Diagnostic;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Unset-but-optional configuration is never an error; those cases surface as
/// [`crate::generation::PipelineOutcome::NoOp`] instead.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Malformed analyzer config: {reason}")]
    ConfigMalformed { path: String, reason: String },

    #[error("Malformed service schema: {reason}")]
    SchemaMalformed { path: String, reason: String },

    #[error("Duplicate service name '{name}' in namespace '{namespace}'")]
    DuplicateServiceName { name: String, namespace: String },

    #[error("Duplicate generated unit name: {0}")]
    DuplicateOutputName(String),

    #[error("'{name}' is not a valid {role} identifier")]
    InvalidIdentifier { name: String, role: &'static str },

    #[error("Failed to parse source: {reason}")]
    SourceUnparseable { path: String, reason: String },

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GenerationError {
    pub fn config_malformed<P: Into<String>, R: ToString>(path: P, reason: R) -> Self {
        Self::ConfigMalformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn schema_malformed<P: Into<String>, R: ToString>(path: P, reason: R) -> Self {
        Self::SchemaMalformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable identifier hosts can filter or suppress on
    pub fn diagnostic_id(&self) -> &'static str {
        match self {
            Self::ConfigMalformed { .. } => "SG0001",
            Self::SchemaMalformed { .. } => "SG0002",
            Self::DuplicateServiceName { .. } => "SG0003",
            Self::DuplicateOutputName(_) => "SG0004",
            Self::InvalidIdentifier { .. } => "SG0005",
            Self::SourceUnparseable { .. } => "SG0006",
            Self::TemplateError(_) => "SG0007",
            Self::SerializationError(_) => "SG0008",
            Self::IoError(_) => "SG0009",
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.diagnostic_id(), self.to_string());
        match self {
            Self::ConfigMalformed { path, .. }
            | Self::SchemaMalformed { path, .. }
            | Self::SourceUnparseable { path, .. } => diagnostic.with_location(path.clone()),
            _ => diagnostic,
        }
    }
}
