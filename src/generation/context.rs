//! Render contexts - what the templates get to see
//!
//! All escaping happens here, before rendering, so templates only splice
//! values that are already safe for their position in the generated code.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::core::utils::to_fn_name;
use crate::generation::rules::validate_service_identifiers;
use crate::generation::sanitizers::{doc_code, embed_in_comment, rust_string_literal, single_line};
use crate::generation::{GenerationError, ServiceDescription};

/// Prefix shared by every generated route
pub const ROUTE_PREFIX: &str = "/api";

/// Names the generated controller already defines for itself
const RESERVED_FN_NAMES: &[&str] = &["dispatch"];

/// Stable route path for one operation of a service
pub fn route_path(service: &str, operation: &str) -> String {
    format!("{ROUTE_PREFIX}/{service}/{operation}")
}

/// One routed entry point as the controller template sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationView {
    pub name: String,
    pub fn_name: String,
    pub route: String,
    pub route_literal: String,
    pub fn_literal: String,
    pub return_type_doc: String,
    pub result_literal: String,
}

/// Context for `controller.rs.tera`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerContext {
    pub service_name: String,
    pub controller_name: String,
    pub source_doc: String,
    pub target_doc: String,
    pub operations: Vec<OperationView>,
}

impl ControllerContext {
    /// Build the controller context for one service.
    ///
    /// A repeated operation name (an overload) keeps declaration order and
    /// gets `/{n}` on its route; handler names that would clash get `_{n}`.
    pub fn from_service(service: &ServiceDescription) -> Result<Self, GenerationError> {
        validate_service_identifiers(service)?;

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let mut used_fn_names: HashSet<String> =
            RESERVED_FN_NAMES.iter().map(|name| name.to_string()).collect();

        let operations = service
            .operations
            .iter()
            .map(|operation| {
                let occurrence = occurrences.entry(operation.name.as_str()).or_insert(0);
                *occurrence += 1;

                let mut route = route_path(&service.name, &operation.name);
                if *occurrence > 1 {
                    route = format!("{route}/{occurrence}");
                }

                let fn_name = unique_fn_name(&operation.name, &mut used_fn_names);

                OperationView {
                    name: operation.name.clone(),
                    route_literal: rust_string_literal(&route),
                    fn_literal: rust_string_literal(&fn_name),
                    route,
                    fn_name,
                    return_type_doc: doc_code(&operation.return_type_name),
                    result_literal: rust_string_literal(&operation.placeholder_result),
                }
            })
            .collect();

        let source = if service.source_namespace.is_empty() {
            service.name.clone()
        } else {
            format!("{}::{}", service.source_namespace, service.name)
        };

        Ok(Self {
            service_name: service.name.clone(),
            controller_name: format!("{}Controller", service.name),
            source_doc: single_line(&source),
            target_doc: single_line(&service.target_namespace),
            operations,
        })
    }
}

fn unique_fn_name(operation: &str, used: &mut HashSet<String>) -> String {
    let base = to_fn_name(operation);
    let mut candidate = base.clone();
    let mut suffix = 1;

    while !used.insert(candidate.clone()) {
        suffix += 1;
        candidate = format!("{base}_{suffix}");
    }

    candidate
}

/// Context for `service_model.rs.tera`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceModelContext {
    pub module_doc: String,
    pub comment_block: String,
}

impl ServiceModelContext {
    pub fn new(module_name: &str, model_json: &str) -> Self {
        Self {
            module_doc: single_line(module_name),
            comment_block: embed_in_comment(model_json),
        }
    }
}
