//! In-process host interface: one immutable input snapshot in, units and
//! diagnostics out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::Diagnostic;
use crate::generation::{
    AdditionalText, GeneratedUnit, GenerationError, GenerationOrchestrator, NoOpReason,
    PipelineOutcome, UnitRenderer,
};
use crate::infrastructure::analysis::DeclarationSnapshot;
use crate::infrastructure::config::{RunConfig, resolve_config};
use crate::infrastructure::generation::TeraTemplateRenderer;
use crate::infrastructure::output::OutputRegistrar;

/// Everything a run may read, materialized by the host beforehand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorInput {
    /// Host program's primary module name, e.g. the crate name
    pub module_name: String,
    pub declarations: DeclarationSnapshot,
    pub additional_texts: Vec<AdditionalText>,
}

/// Terminal state of a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing to do; no units and no diagnostics
    NoOp,
    /// Both pipelines finished; carries the number of units
    Registered(usize),
    /// At least one pipeline failed; no units were registered
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOutput {
    pub units: Vec<GeneratedUnit>,
    pub diagnostics: Vec<Diagnostic>,
    pub state: RunState,
}

impl GeneratorOutput {
    pub fn noop() -> Self {
        Self {
            units: Vec::new(),
            diagnostics: Vec::new(),
            state: RunState::NoOp,
        }
    }

    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            units: Vec::new(),
            diagnostics,
            state: RunState::Failed,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// The generator a host invokes once per run.
///
/// `run` is synchronous, never panics on malformed input and keeps no state
/// between calls, so concurrent runs on one instance do not interfere.
#[derive(Clone)]
pub struct SourceGenerator {
    orchestrator: GenerationOrchestrator,
}

impl SourceGenerator {
    /// Generator backed by the built-in templates
    pub fn new() -> Result<Self, GenerationError> {
        Ok(Self::with_renderer(Arc::new(TeraTemplateRenderer::new()?)))
    }

    pub fn with_renderer(renderer: Arc<dyn UnitRenderer>) -> Self {
        Self {
            orchestrator: GenerationOrchestrator::new(renderer),
        }
    }

    /// Run both pipelines and apply the run-level commit policy: if either
    /// pipeline fails, no unit of the run is registered.
    pub fn run(&self, input: &GeneratorInput) -> GeneratorOutput {
        let config = match resolve(input) {
            Ok(Some(config)) => config,
            Ok(None) => return GeneratorOutput::noop(),
            Err(diagnostic) => return GeneratorOutput::failed(vec![diagnostic]),
        };

        let outcomes = [
            self.orchestrator
                .service_model_pipeline(&config, &input.module_name, &input.declarations),
            self.orchestrator
                .controller_pipeline(&config, &input.additional_texts),
        ];

        combine(outcomes)
    }

    /// Only the declarations to service model pipeline
    pub fn run_model_pipeline(&self, input: &GeneratorInput) -> PipelineOutcome {
        match resolve(input) {
            Ok(Some(config)) => self.orchestrator.service_model_pipeline(
                &config,
                &input.module_name,
                &input.declarations,
            ),
            Ok(None) => PipelineOutcome::NoOp(NoOpReason::ConfigMissing),
            Err(diagnostic) => PipelineOutcome::Failed(diagnostic),
        }
    }

    /// Only the schema to controllers pipeline
    pub fn run_controller_pipeline(&self, input: &GeneratorInput) -> PipelineOutcome {
        match resolve(input) {
            Ok(Some(config)) => self
                .orchestrator
                .controller_pipeline(&config, &input.additional_texts),
            Ok(None) => PipelineOutcome::NoOp(NoOpReason::ConfigMissing),
            Err(diagnostic) => PipelineOutcome::Failed(diagnostic),
        }
    }
}

fn resolve(input: &GeneratorInput) -> Result<Option<RunConfig>, Diagnostic> {
    let config = resolve_config(&input.additional_texts).map_err(|e| {
        warn!(error = %e, "Run aborted by malformed config");
        e.to_diagnostic()
    })?;

    if config.is_none() {
        debug!(module = %input.module_name, "No analyzer config, nothing to do");
    }

    Ok(config)
}

fn combine<const N: usize>(outcomes: [PipelineOutcome; N]) -> GeneratorOutput {
    let mut units = Vec::new();
    let mut diagnostics = Vec::new();
    let mut registered = false;

    for outcome in outcomes {
        match outcome {
            PipelineOutcome::NoOp(reason) => debug!(?reason, "Pipeline skipped"),
            PipelineOutcome::Registered(mut pipeline_units) => {
                registered = true;
                units.append(&mut pipeline_units);
            }
            PipelineOutcome::Failed(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    if !diagnostics.is_empty() {
        warn!(
            failures = diagnostics.len(),
            discarded = units.len(),
            "Run failed, no units registered"
        );
        return GeneratorOutput::failed(diagnostics);
    }

    if !registered {
        return GeneratorOutput::noop();
    }

    // Unit names must be unique across the whole run, not only per pipeline.
    let mut registrar = OutputRegistrar::new();
    for unit in units {
        if let Err(e) = registrar.add(unit.hint_name, unit.text) {
            warn!(error = %e, "Run failed, no units registered");
            return GeneratorOutput::failed(vec![e.to_diagnostic()]);
        }
    }

    let units = registrar.commit();
    GeneratorOutput {
        state: RunState::Registered(units.len()),
        units,
        diagnostics,
    }
}
