//! Service schema serialization and loading

pub mod loader;
pub mod serializer;

pub use loader::{load_services, parse_services};
pub use serializer::serialize_model;
