//! Output registration and sinks

pub mod filesystem_output;
pub mod registrar;

pub use filesystem_output::FileSystemOutputSink;
pub use registrar::OutputRegistrar;
