//! Declaration analysis: the snapshot model, the `syn` front end that builds
//! it from Rust sources, and the service model extractor.

pub mod extractor;
pub mod rust_source;
pub mod snapshot;

pub use extractor::{ExtractionSettings, extract_services, placeholder_result};
pub use rust_source::{RustSourceAnalyzer, RustSourceFile, module_namespace};
pub use snapshot::{
    ClassDeclaration, DeclarationSnapshot, MemberDeclaration, MemberKind, SourceDeclarations,
    Visibility,
};
