//! Infrastructure layer - concrete implementations of domain ports

pub mod analysis;
pub mod config;
pub mod generation;
pub mod output;
pub mod schema;
