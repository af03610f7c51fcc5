//! servicegen: build-time generation of service models and controller units.
//!
//! A run takes an immutable snapshot of a program's declarations plus named
//! auxiliary texts and produces generated source units and diagnostics.
//! Two pipelines share one resolved `analyzer.config.json`:
//!
//! - declarations to a serialized service model embedded in one aggregate unit
//! - a service schema to one routed controller unit per service
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod generation;
pub mod infrastructure;

pub use application::{BuildScriptHost, GeneratorInput, GeneratorOutput, RunState, SourceGenerator};
pub use crate::core::{Diagnostic, Severity};
pub use generation::{
    AdditionalText, GeneratedUnit, GenerationError, NoOpReason, Operation, PipelineOutcome,
    ServiceDescription,
};
pub use infrastructure::analysis::{DeclarationSnapshot, RustSourceAnalyzer, RustSourceFile};
