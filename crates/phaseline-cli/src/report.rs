//! Phase reports written by the CLI.

use std::io;

use serde::Serialize;

use phaseline::{PhaselineError, SegmentationMode, graph::ProcessGraph, identifier::Id};

/// The segmentation result of one document, ready to be written as TOML.
#[derive(Debug, Serialize)]
pub struct PhaseReport {
    mode: &'static str,
    unassigned: Vec<Id>,
    phases: Vec<PhaseEntry>,
}

#[derive(Debug, Serialize)]
struct PhaseEntry {
    order: usize,
    id: Id,
    name: String,
    members: Vec<Id>,
}

impl PhaseReport {
    /// Capture the phases installed on `graph` by a segmentation in `mode`.
    pub fn new(graph: &ProcessGraph, mode: SegmentationMode) -> Self {
        let mode = match mode {
            SegmentationMode::AutoGenerate => "auto_generate",
            SegmentationMode::ValidateHints => "validate_hints",
        };

        let unassigned = graph
            .elements()
            .filter(|element| element.phase().is_none())
            .map(|element| element.id())
            .collect();

        let phases = graph
            .phases()
            .iter()
            .map(|phase| PhaseEntry {
                order: phase.order(),
                id: phase.id(),
                name: phase.name().to_string(),
                members: phase.members().to_vec(),
            })
            .collect();

        Self {
            mode,
            unassigned,
            phases,
        }
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Render the report as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PhaselineError::Io`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, PhaselineError> {
        toml::to_string(self).map_err(|err| PhaselineError::Io(io::Error::other(err)))
    }
}
