//! Service model extraction over a declaration snapshot

use tracing::{debug, warn};

use super::snapshot::{ClassDeclaration, DeclarationSnapshot, MemberKind};
use crate::generation::{Operation, ServiceDescription};

/// Settings the extractor needs from the run configuration
#[derive(Debug, Clone, Copy)]
pub struct ExtractionSettings<'a> {
    /// Classes must live in exactly this namespace
    pub services_namespace: &'a str,
    pub target_namespace: Option<&'a str>,
}

/// Builds one [`ServiceDescription`] per public class in the configured
/// namespace.
///
/// Classes are visited in file order and members in declaration order, so
/// identical snapshots always give identical output.
pub fn extract_services(
    snapshot: &DeclarationSnapshot,
    settings: ExtractionSettings<'_>,
) -> Vec<ServiceDescription> {
    let services: Vec<_> = snapshot
        .classes()
        .filter(|class| class.namespace == settings.services_namespace)
        .filter(|class| class.visibility.is_public())
        .filter_map(|class| {
            if class.name.is_empty() {
                warn!(namespace = %class.namespace, "Skipping class without a name");
                return None;
            }
            Some(describe_class(class, settings.target_namespace))
        })
        .collect();

    debug!(
        namespace = settings.services_namespace,
        services = services.len(),
        "Extracted service model"
    );

    services
}

fn describe_class(class: &ClassDeclaration, target_namespace: Option<&str>) -> ServiceDescription {
    let operations = class
        .members
        .iter()
        .filter(|member| member.kind == MemberKind::Ordinary && member.visibility.is_public())
        .map(|member| {
            Operation::new(
                member.name.clone(),
                member.return_type.clone(),
                placeholder_result(&member.name, &class.name),
            )
        })
        .collect();

    ServiceDescription {
        name: class.name.clone(),
        source_namespace: class.namespace.clone(),
        target_namespace: target_namespace.unwrap_or_default().to_string(),
        operations,
    }
}

/// Stub response for a generated entry point
pub fn placeholder_result(operation: &str, service: &str) -> String {
    format!("This is {operation} from {service}")
}
