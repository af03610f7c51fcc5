//! Generation domain module - turns service descriptions into generated units
//!
//! This module holds the domain types shared by both pipelines, the rules
//! and escaping they rely on, the render contexts templates see, and the
//! orchestrator that drives a run from resolved configuration to registered
//! units.

pub mod context;
pub mod errors;
pub mod orchestrator;
pub mod rules;
pub mod sanitizers;
pub mod traits;
pub mod types;

pub use context::{ControllerContext, OperationView, ServiceModelContext};
pub use errors::GenerationError;
pub use orchestrator::{GenerationOrchestrator, service_model_unit_name};
pub use traits::{OutputSink, UnitRenderer};
pub use types::*;
