//! Service model serialization

use crate::generation::{GenerationError, ServiceDescription};

/// Serializes the model as pretty JSON with a fixed key order.
///
/// Keys follow the field order of [`ServiceDescription`] and
/// [`crate::generation::Operation`], so output diffs cleanly across runs and
/// loads back through the schema loader unchanged.
pub fn serialize_model(services: &[ServiceDescription]) -> Result<String, GenerationError> {
    Ok(serde_json::to_string_pretty(services)?)
}
