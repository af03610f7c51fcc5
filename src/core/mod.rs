//! Shared building blocks: diagnostics and naming utilities.

pub mod diagnostic;
pub mod utils;

pub use diagnostic::{Diagnostic, Severity};
