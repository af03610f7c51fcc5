//! Core types for the generation domain

use serde::{Deserialize, Deserializer, Serialize};

/// Suffix appended to every generated unit name
pub const GENERATED_SUFFIX: &str = ".generated.rs";

/// One externally invokable method of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "Name")]
    pub name: String,
    /// Opaque metadata name of the declared return type
    #[serde(rename = "Type", default, deserialize_with = "null_as_default")]
    pub return_type_name: String,
    /// Stub value the generated entry point returns
    #[serde(rename = "ReturnValue", default, deserialize_with = "null_as_default")]
    pub placeholder_result: String,
}

impl Operation {
    pub fn new<N, T, R>(name: N, return_type_name: T, placeholder_result: R) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        R: Into<String>,
    {
        Self {
            name: name.into(),
            return_type_name: return_type_name.into(),
            placeholder_result: placeholder_result.into(),
        }
    }
}

/// Normalized record of a class's externally relevant operations.
///
/// Field order here is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescription {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Namespace", default, deserialize_with = "null_as_default")]
    pub source_namespace: String,
    #[serde(rename = "TargetNamespace", default, deserialize_with = "null_as_default")]
    pub target_namespace: String,
    /// Declaration order, never re-sorted
    #[serde(rename = "Operations", default, deserialize_with = "null_as_default")]
    pub operations: Vec<Operation>,
}

impl ServiceDescription {
    /// Name of the controller unit rendered for this service
    pub fn controller_unit_name(&self) -> String {
        format!("{}Controller{GENERATED_SUFFIX}", self.name)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A named auxiliary text supplied alongside the program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalText {
    pub path: String,
    pub text: String,
}

impl AdditionalText {
    pub fn new<P: Into<String>, T: Into<String>>(path: P, text: T) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Finds the first auxiliary input whose path ends with `suffix`.
///
/// Matching is suffix based so differing root directories still match.
pub fn find_additional_text<'a>(
    texts: &'a [AdditionalText],
    suffix: &str,
) -> Option<&'a AdditionalText> {
    texts.iter().find(|text| text.path.ends_with(suffix))
}

/// A source text artifact handed to the host toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    pub hint_name: String,
    pub text: String,
}

/// The two independent pipelines of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pipeline {
    /// Declarations to serialized service model
    ServiceModel,
    /// Service schema to controller units
    Controllers,
}

/// Why a pipeline legitimately produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    ConfigMissing,
    NamespaceUnset,
    SchemaFileUnset,
    SchemaFileAbsent,
}

/// Terminal state of a single pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    NoOp(NoOpReason),
    Registered(Vec<GeneratedUnit>),
    Failed(crate::core::Diagnostic),
}

impl PipelineOutcome {
    pub fn units(&self) -> &[GeneratedUnit] {
        match self {
            PipelineOutcome::Registered(units) => units,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PipelineOutcome::Failed(_))
    }
}
