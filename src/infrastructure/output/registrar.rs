//! Output registration with unit name uniqueness

use std::collections::HashSet;

use tracing::{debug, info};

use crate::generation::{GenerationError, GeneratedUnit};

/// Stages the units of one pipeline run.
///
/// Nothing is visible to the host until [`OutputRegistrar::commit`]; a
/// pipeline that fails simply drops its registrar, so partial output is
/// never registered.
#[derive(Debug, Default)]
pub struct OutputRegistrar {
    names: HashSet<String>,
    units: Vec<GeneratedUnit>,
}

impl OutputRegistrar {
    /// Empty registrar for one pipeline or run
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage one unit. A name seen before in this run is a hard error because
    /// hosts treat duplicate unit names as ambiguous.
    pub fn add<N: Into<String>>(&mut self, name: N, text: String) -> Result<(), GenerationError> {
        let hint_name = name.into();
        if !self.names.insert(hint_name.clone()) {
            return Err(GenerationError::DuplicateOutputName(hint_name));
        }

        debug!(unit = %hint_name, bytes = text.len(), "Staged generated unit");
        self.units.push(GeneratedUnit { hint_name, text });
        Ok(())
    }

    /// Number of units staged so far
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True when nothing has been staged yet
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Hand over every staged unit in insertion order
    pub fn commit(self) -> Vec<GeneratedUnit> {
        info!(units = self.units.len(), "Registered generated units");
        self.units
    }
}
