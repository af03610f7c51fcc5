//! Business rules for the generation domain

use std::collections::HashSet;

use crate::core::utils::is_identifier;
use crate::generation::{GenerationError, ServiceDescription};

/// Service and operation names end up as Rust identifiers in generated code.
pub fn validate_service_identifiers(service: &ServiceDescription) -> Result<(), GenerationError> {
    if !is_identifier(&service.name) {
        return Err(GenerationError::InvalidIdentifier {
            name: service.name.clone(),
            role: "service",
        });
    }

    if let Some(operation) = service
        .operations
        .iter()
        .find(|operation| !is_identifier(&operation.name))
    {
        return Err(GenerationError::InvalidIdentifier {
            name: format!("{}.{}", service.name, operation.name),
            role: "operation",
        });
    }

    Ok(())
}

/// Rejects two services with the same name in the same namespace.
pub fn ensure_unique_services(services: &[ServiceDescription]) -> Result<(), GenerationError> {
    let mut seen = HashSet::new();

    for service in services {
        if !seen.insert((service.source_namespace.as_str(), service.name.as_str())) {
            return Err(GenerationError::DuplicateServiceName {
                name: service.name.clone(),
                namespace: service.source_namespace.clone(),
            });
        }
    }

    Ok(())
}
