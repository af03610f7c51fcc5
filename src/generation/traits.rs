//! Port interfaces for the generation domain

use crate::generation::{GenerationError, GeneratedUnit, ServiceDescription};

/// Turns models into source text.
///
/// Implementations must be pure: the same input always renders the same text.
pub trait UnitRenderer: Send + Sync {
    /// Render the controller unit for one service
    fn render_controller(&self, service: &ServiceDescription) -> Result<String, GenerationError>;

    /// Render the aggregate unit carrying the serialized service model
    fn render_service_model(
        &self,
        module_name: &str,
        model_json: &str,
    ) -> Result<String, GenerationError>;
}

/// Destination for committed units outside the in-process host interface
pub trait OutputSink: Send + Sync {
    fn write_units(&self, units: &[GeneratedUnit]) -> Result<(), GenerationError>;
}
