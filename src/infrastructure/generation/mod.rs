//! Template rendering for generated units

pub mod template_renderer;

pub use template_renderer::TeraTemplateRenderer;
