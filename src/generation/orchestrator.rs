//! Generation orchestration - coordinates both pipelines of a run

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::utils::primary_module_segment;
use crate::generation::rules::ensure_unique_services;
use crate::generation::{
    AdditionalText, GENERATED_SUFFIX, GeneratedUnit, GenerationError, NoOpReason, Pipeline,
    PipelineOutcome, ServiceDescription, UnitRenderer,
};
use crate::infrastructure::analysis::{DeclarationSnapshot, ExtractionSettings, extract_services};
use crate::infrastructure::config::RunConfig;
use crate::infrastructure::output::OutputRegistrar;
use crate::infrastructure::schema::{load_services, serialize_model};

/// Name of the aggregate unit carrying the serialized service model
pub fn service_model_unit_name(module_name: &str) -> String {
    format!("{}{GENERATED_SUFFIX}", primary_module_segment(module_name))
}

/// Runs the two pipelines against an already resolved [`RunConfig`].
///
/// The orchestrator holds no per-run state, so one instance can serve
/// any number of concurrent runs.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    renderer: Arc<dyn UnitRenderer>,
}

impl GenerationOrchestrator {
    pub fn new(renderer: Arc<dyn UnitRenderer>) -> Self {
        Self { renderer }
    }

    /// Declarations to one aggregate unit embedding the service model
    pub fn service_model_pipeline(
        &self,
        config: &RunConfig,
        module_name: &str,
        snapshot: &DeclarationSnapshot,
    ) -> PipelineOutcome {
        let Some(services_namespace) = config.services_namespace() else {
            debug!(pipeline = ?Pipeline::ServiceModel, "Services namespace unset, nothing to do");
            return PipelineOutcome::NoOp(NoOpReason::NamespaceUnset);
        };

        let settings = ExtractionSettings {
            services_namespace,
            target_namespace: config.target_namespace(),
        };

        finish(
            Pipeline::ServiceModel,
            self.build_service_model(module_name, snapshot, settings),
        )
    }

    /// Service schema to one controller unit per service
    pub fn controller_pipeline(
        &self,
        config: &RunConfig,
        additional_texts: &[AdditionalText],
    ) -> PipelineOutcome {
        let Some(schema_file_name) = config.schema_file_name() else {
            debug!(pipeline = ?Pipeline::Controllers, "Schema file unset, nothing to do");
            return PipelineOutcome::NoOp(NoOpReason::SchemaFileUnset);
        };

        let services = match load_services(additional_texts, schema_file_name) {
            Ok(Some(services)) => services,
            Ok(None) => {
                debug!(
                    pipeline = ?Pipeline::Controllers,
                    schema = schema_file_name,
                    "Schema file not among additional texts, nothing to do"
                );
                return PipelineOutcome::NoOp(NoOpReason::SchemaFileAbsent);
            }
            Err(e) => return finish(Pipeline::Controllers, Err(e)),
        };

        info!(
            schema = schema_file_name,
            services = services.len(),
            "Rendering controllers"
        );

        finish(Pipeline::Controllers, self.build_controllers(&services))
    }

    fn build_service_model(
        &self,
        module_name: &str,
        snapshot: &DeclarationSnapshot,
        settings: ExtractionSettings<'_>,
    ) -> Result<Vec<GeneratedUnit>, GenerationError> {
        let services = extract_services(snapshot, settings);
        ensure_unique_services(&services)?;

        let model_json = serialize_model(&services)?;
        let text = self.renderer.render_service_model(module_name, &model_json)?;

        let mut registrar = OutputRegistrar::new();
        registrar.add(service_model_unit_name(module_name), text)?;
        Ok(registrar.commit())
    }

    fn build_controllers(
        &self,
        services: &[ServiceDescription],
    ) -> Result<Vec<GeneratedUnit>, GenerationError> {
        let mut registrar = OutputRegistrar::new();

        for service in services {
            let text = self.renderer.render_controller(service)?;
            registrar.add(service.controller_unit_name(), text)?;
        }

        Ok(registrar.commit())
    }
}

fn finish(
    pipeline: Pipeline,
    result: Result<Vec<GeneratedUnit>, GenerationError>,
) -> PipelineOutcome {
    match result {
        Ok(units) => PipelineOutcome::Registered(units),
        Err(e) => {
            let diagnostic = e.to_diagnostic();
            warn!(pipeline = ?pipeline, id = diagnostic.id, error = %e, "Pipeline failed");
            PipelineOutcome::Failed(diagnostic)
        }
    }
}
