//! TOML process documents.
//!
//! A small debugging format for feeding process graphs to the segmenter:
//!
//! ```toml
//! [[elements]]
//! id = "start"
//! name = "Order received"
//! kind = "start"
//! x = 0.0
//!
//! [[flows]]
//! id = "f1"
//! source = "start"
//! target = "pick"
//!
//! [[phases]]
//! name = "Intake"
//! members = ["start", "pick"]
//! ```

use std::collections::HashSet;

use log::{debug, warn};
use serde::Deserialize;

use phaseline::{
    PhaselineError,
    geometry::Point,
    graph::ProcessGraph,
    identifier::Id,
    model::{Element, ElementKind, Flow, Phase},
};

/// A deserialized process document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessDocument {
    #[serde(default)]
    elements: Vec<ElementEntry>,
    #[serde(default)]
    flows: Vec<FlowEntry>,
    #[serde(default)]
    phases: Vec<HintEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ElementEntry {
    id: Id,
    #[serde(default)]
    name: String,
    kind: ElementKind,
    x: Option<f32>,
    y: Option<f32>,
    documentation: Option<String>,
    #[serde(default)]
    incoming: Vec<Id>,
    #[serde(default)]
    outgoing: Vec<Id>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FlowEntry {
    id: Id,
    source: Id,
    target: Id,
    label: Option<String>,
    condition: Option<String>,
    #[serde(default)]
    default: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HintEntry {
    name: String,
    #[serde(default)]
    members: Vec<Id>,
}

impl ElementEntry {
    fn into_element(self) -> Element {
        let mut element = Element::new(self.id, self.name, self.kind)
            .with_incoming(self.incoming)
            .with_outgoing(self.outgoing);
        // A y without an x does not place the element.
        if let Some(x) = self.x {
            element = element.with_position(Point::new(x, self.y.unwrap_or_default()));
        }
        if let Some(documentation) = self.documentation {
            element = element.with_documentation(documentation);
        }
        element
    }
}

impl FlowEntry {
    fn into_flow(self) -> Flow {
        let mut flow = Flow::new(self.id, self.source, self.target);
        if let Some(label) = self.label {
            flow = flow.with_label(label);
        }
        if let Some(condition) = self.condition {
            flow = flow.with_condition(condition);
        }
        if self.default {
            flow = flow.as_default();
        }
        flow
    }
}

impl ProcessDocument {
    /// Parse a document from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`PhaselineError::Document`] carrying the source text and the
    /// location of the problem when the TOML is malformed or does not match
    /// the document shape.
    pub fn parse(src: &str) -> Result<Self, PhaselineError> {
        toml::from_str(src)
            .map_err(|err| PhaselineError::new_document_error(err.message(), err.span(), src))
    }

    /// Number of elements declared in the document.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Build the process graph described by this document.
    pub fn into_graph(self) -> ProcessGraph {
        let known: HashSet<Id> = self.elements.iter().map(|entry| entry.id).collect();

        let mut builder = ProcessGraph::builder();
        for entry in self.elements {
            builder = builder.with_element(entry.into_element());
        }
        for entry in self.flows {
            if !known.contains(&entry.target) {
                warn!(
                    flow_id:% = entry.id,
                    target:% = entry.target;
                    "Flow targets an unknown element and will not affect ordering"
                );
            } else if !known.contains(&entry.source) {
                warn!(
                    flow_id:% = entry.id,
                    source:% = entry.source,
                    target:% = entry.target;
                    "Flow comes from an unknown element, its target cannot be ordered"
                );
            }
            builder = builder.with_flow(entry.into_flow());
        }
        for hint in self.phases {
            debug!(name = hint.name, members = hint.members.len(); "Phase hint");
            builder = builder.with_phase_hint(Phase::hint(hint.name, hint.members));
        }

        builder.build()
    }
}
