//! Tera-based template renderer implementation

use tera::{Context, Tera};

use crate::generation::{
    ControllerContext, GenerationError, ServiceDescription, ServiceModelContext, UnitRenderer,
};

pub const CONTROLLER_TEMPLATE: &str = "controller.rs.tera";
pub const SERVICE_MODEL_TEMPLATE: &str = "service_model.rs.tera";

/// Renders units from the templates compiled into the crate.
///
/// Templates are parsed once in [`TeraTemplateRenderer::new`]; rendering only
/// reads them, so one renderer can serve concurrent runs.
pub struct TeraTemplateRenderer {
    tera: Tera,
}

impl TeraTemplateRenderer {
    pub fn new() -> Result<Self, GenerationError> {
        Self::with_templates(
            include_str!("../../../templates/controller.rs.tera"),
            include_str!("../../../templates/service_model.rs.tera"),
        )
    }

    /// Build a renderer from custom template sources.
    ///
    /// The templates see [`ControllerContext`] and [`ServiceModelContext`].
    pub fn with_templates(controller: &str, service_model: &str) -> Result<Self, GenerationError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (CONTROLLER_TEMPLATE, controller),
            (SERVICE_MODEL_TEMPLATE, service_model),
        ])
        .map_err(|e| GenerationError::TemplateError(format!("Failed to add template: {e}")))?;

        Ok(Self { tera })
    }

    fn render<T: serde::Serialize>(&self, name: &str, value: &T) -> Result<String, GenerationError> {
        let context = Context::from_serialize(value).map_err(|e| {
            GenerationError::TemplateError(format!("Failed to build context for '{name}': {e}"))
        })?;

        self.tera.render(name, &context).map_err(|e| {
            GenerationError::TemplateError(format!("Failed to render template '{name}': {e}"))
        })
    }
}

impl UnitRenderer for TeraTemplateRenderer {
    fn render_controller(&self, service: &ServiceDescription) -> Result<String, GenerationError> {
        let context = ControllerContext::from_service(service)?;
        let rendered = self.render(CONTROLLER_TEMPLATE, &context)?;

        tracing::debug!(
            service = %service.name,
            operations = context.operations.len(),
            bytes = rendered.len(),
            "Rendered controller"
        );

        Ok(rendered)
    }

    fn render_service_model(
        &self,
        module_name: &str,
        model_json: &str,
    ) -> Result<String, GenerationError> {
        self.render(
            SERVICE_MODEL_TEMPLATE,
            &ServiceModelContext::new(module_name, model_json),
        )
    }
}
