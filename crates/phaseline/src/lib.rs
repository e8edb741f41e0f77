//! Phaseline - deterministic ordering and phase segmentation for process graphs.
//!
//! A process document (tasks, decisions, parallel forks and joins, start and
//! end events, sub-processes) is loaded into a [`graph::ProcessGraph`] by an
//! upstream parser. [`PhaseSegmenter`] then cuts the graph's deterministic
//! topological order into size-bounded, named phases, or validates the coarse
//! phases the parser already suggested, and records each element's phase so a
//! renderer can lay the process out one phase at a time.
//!
//! # Examples
//!
//! ```rust
//! use phaseline::{PhaseSegmenter, config::SegmenterConfig, graph::ProcessGraph};
//! use phaseline::{identifier::Id, model::{Element, ElementKind, Flow}};
//!
//! let mut graph = ProcessGraph::builder()
//!     .with_element(Element::new(Id::new("start"), "Start", ElementKind::Start))
//!     .with_element(Element::new(Id::new("check"), "Validate request", ElementKind::Task))
//!     .with_element(Element::new(Id::new("recheck"), "Validate budget", ElementKind::Task))
//!     .with_element(Element::new(Id::new("end"), "Done", ElementKind::End))
//!     .with_flow(Flow::new(Id::new("f1"), Id::new("start"), Id::new("check")))
//!     .with_flow(Flow::new(Id::new("f2"), Id::new("check"), Id::new("recheck")))
//!     .with_flow(Flow::new(Id::new("f3"), Id::new("recheck"), Id::new("end")))
//!     .build();
//!
//! let segmenter = PhaseSegmenter::new(SegmenterConfig::new(10, 3)?);
//! let (_, phases) = segmenter.segment(&mut graph);
//!
//! assert_eq!(phases.len(), 1);
//! assert_eq!(phases[0].name(), "Validation");
//! assert_eq!(graph.phase_of(Id::new("check")).map(|p| p.order()), Some(1));
//! # Ok::<(), phaseline::config::ConfigError>(())
//! ```

pub mod config;
pub mod graph;

mod error;
mod segment;

pub use phaseline_core::{geometry, identifier, model};

pub use error::PhaselineError;
pub use segment::{
    BREAK_RULES, BreakContext, BreakReason, BreakRule, FALLBACK_PHASE_NAME, PhaseSegmenter,
    SegmentationMode, suggest_phase_name,
};
