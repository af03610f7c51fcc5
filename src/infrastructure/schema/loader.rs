//! Service schema loading from auxiliary inputs
//!
//! Schemas are JSON by default; a `.yaml`/`.yml` schema file is read as YAML.

use tracing::debug;

use crate::generation::{AdditionalText, GenerationError, ServiceDescription, find_additional_text};

/// Locate `schema_file_name` among the auxiliary inputs and parse it.
///
/// Returns `Ok(None)` when no input path ends with the configured name.
pub fn load_services(
    texts: &[AdditionalText],
    schema_file_name: &str,
) -> Result<Option<Vec<ServiceDescription>>, GenerationError> {
    let Some(schema) = find_additional_text(texts, schema_file_name) else {
        debug!(schema = schema_file_name, "Schema file not among additional texts");
        return Ok(None);
    };

    let services = parse_services(&schema.path, &schema.text)?;
    debug!(path = %schema.path, services = services.len(), "Loaded service schema");

    Ok(Some(services))
}

/// Parse a schema document and apply the shape checks generation relies on.
pub fn parse_services(path: &str, text: &str) -> Result<Vec<ServiceDescription>, GenerationError> {
    let services: Vec<ServiceDescription> = if is_yaml(path) {
        serde_yaml::from_str(text).map_err(|e| GenerationError::schema_malformed(path, e))?
    } else {
        serde_json::from_str(text).map_err(|e| GenerationError::schema_malformed(path, e))?
    };

    for (index, service) in services.iter().enumerate() {
        if service.name.trim().is_empty() {
            return Err(GenerationError::schema_malformed(
                path,
                format!("service at index {index} has an empty Name"),
            ));
        }
        if let Some(position) = service.operations.iter().position(|op| op.name.trim().is_empty()) {
            return Err(GenerationError::schema_malformed(
                path,
                format!(
                    "operation at index {position} of service '{}' has an empty Name",
                    service.name
                ),
            ));
        }
    }

    Ok(services)
}

fn is_yaml(path: &str) -> bool {
    path.ends_with(".yaml") || path.ends_with(".yml")
}
