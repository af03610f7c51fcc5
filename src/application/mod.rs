//! Application layer - the entry points hosts call

pub mod build_script;
pub mod generator;

pub use build_script::BuildScriptHost;
pub use generator::{GeneratorInput, GeneratorOutput, RunState, SourceGenerator};
