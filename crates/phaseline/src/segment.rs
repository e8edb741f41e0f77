//! Phase segmentation.
//!
//! [`PhaseSegmenter`] partitions a [`ProcessGraph`] into ordered, size-bounded
//! phases. It runs in one of two modes:
//!
//! - [`SegmentationMode::AutoGenerate`] walks the graph's topological order,
//!   closing a phase whenever a break rule fires, then merges undersized
//!   neighbours in a single forward pass and names each phase.
//! - [`SegmentationMode::ValidateHints`] keeps the phases the document already
//!   suggested and only splits the ones that are too large.
//!
//! Either way the result is renumbered `1..=N` and installed on the graph,
//! replacing the previous partition.

mod breaks;
mod naming;
mod split;

pub use breaks::{BREAK_RULES, BreakContext, BreakReason, BreakRule};
pub use naming::{FALLBACK_PHASE_NAME, suggest_phase_name};

use std::collections::HashSet;

use log::{debug, info, trace, warn};

use phaseline_core::{
    identifier::Id,
    model::{Element, Phase},
};

use crate::{config::SegmenterConfig, graph::ProcessGraph};

/// Prefix of generated phase ids (`phase_1`, `phase_2`, ...).
const PHASE_ID_PREFIX: &str = "phase";

/// Which strategy a segmentation call used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationMode {
    /// No usable hints; phases were derived from the graph structure.
    AutoGenerate,
    /// Supplied hints were kept, split where oversized.
    ValidateHints,
}

/// A phase before it receives its final id and order.
#[derive(Debug, Clone, PartialEq)]
struct PhaseDraft {
    name: String,
    members: Vec<Id>,
}

impl PhaseDraft {
    fn new(name: impl Into<String>, members: Vec<Id>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    fn named_after(elements: &[&Element]) -> Self {
        Self::new(
            suggest_phase_name(elements),
            elements.iter().map(|element| element.id()).collect(),
        )
    }

    fn len(&self) -> usize {
        self.members.len()
    }

    /// Join `next` onto `self`, keeping member order.
    fn merge(mut self, next: PhaseDraft) -> Self {
        self.name = format!("{} & {}", self.name, next.name);
        self.members.extend(next.members);
        self
    }
}

/// Result of walking an ordered element sequence with the break rules.
#[derive(Debug)]
struct Walk<'g> {
    /// Groups closed by a break rule, in order.
    closed: Vec<Vec<&'g Element>>,
    /// Elements left in the buffer when the sequence ran out.
    remainder: Vec<&'g Element>,
}

impl<'g> Walk<'g> {
    /// All groups, the non-empty remainder last.
    fn into_groups(self) -> Vec<Vec<&'g Element>> {
        let Self {
            mut closed,
            remainder,
        } = self;
        if !remainder.is_empty() {
            closed.push(remainder);
        }
        closed
    }
}

/// Partitions process graphs into presentation phases.
///
/// # Examples
///
/// ```
/// use phaseline::{PhaseSegmenter, SegmentationMode, config::SegmenterConfig, graph::ProcessGraph};
/// use phaseline::{identifier::Id, model::{Element, ElementKind, Flow}};
///
/// let mut builder = ProcessGraph::builder();
/// for i in 0..12 {
///     builder = builder.with_element(Element::new(Id::numbered("t", i), format!("Step {i}"), ElementKind::Task));
/// }
/// for i in 0..11 {
///     builder = builder.with_flow(Flow::new(Id::numbered("f", i), Id::numbered("t", i), Id::numbered("t", i + 1)));
/// }
/// let mut graph = builder.build();
///
/// let segmenter = PhaseSegmenter::new(SegmenterConfig::default());
/// let (mode, phases) = segmenter.segment(&mut graph);
///
/// assert_eq!(mode, SegmentationMode::AutoGenerate);
/// assert_eq!(phases.len(), 2);
/// assert_eq!(phases[0].len(), 10);
/// assert_eq!(phases[1].len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseSegmenter {
    config: SegmenterConfig,
}

impl PhaseSegmenter {
    /// Create a segmenter with already validated size bounds.
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> SegmenterConfig {
        self.config
    }

    /// The mode [`segment`](Self::segment) will use for `graph`.
    ///
    /// Hints are used only when every hint lists at least one member and at
    /// least one member names an element of the graph.
    pub fn mode_for(&self, graph: &ProcessGraph) -> SegmentationMode {
        self.plan(graph).mode()
    }

    /// Segment `graph` and install the resulting phases on it.
    ///
    /// Returns the mode used alongside the installed phases. The previous
    /// phase list is discarded and every element's phase reference is
    /// rewritten.
    pub fn segment<'g>(&self, graph: &'g mut ProcessGraph) -> (SegmentationMode, &'g [Phase]) {
        let plan = self.plan(graph);
        let mode = plan.mode();
        info!(
            mode:? = mode,
            elements = graph.element_count(),
            hints = graph.phase_hints().len();
            "Segmenting process graph"
        );

        let phases = match plan {
            Plan::Generate => self.auto_generate(graph),
            Plan::Hints(drafts) => self.fit_drafts(graph, drafts),
        };

        info!(phases = phases.len(); "Segmentation complete");
        (mode, graph.install_phases(phases))
    }

    /// Build phases from the graph structure alone.
    ///
    /// Elements that cannot be ordered (cycle members and everything
    /// downstream of them) are left out of every phase.
    pub fn auto_generate(&self, graph: &ProcessGraph) -> Vec<Phase> {
        let ordered: Vec<&Element> = graph.topological_sort().collect();
        let omitted = graph.element_count().saturating_sub(ordered.len());
        if omitted > 0 {
            warn!(omitted; "Elements could not be ordered and will not be assigned a phase");
        }

        let drafts: Vec<PhaseDraft> = self
            .walk(graph, ordered)
            .into_groups()
            .iter()
            .map(|group| PhaseDraft::named_after(group))
            .collect();
        debug!(phases = drafts.len(); "Break walk finished");

        renumber(self.merge_undersized(drafts))
    }

    /// Keep supplied phases, splitting any that exceed the maximum size.
    ///
    /// Member ids unknown to the graph are dropped, as are repeat claims on
    /// an element already placed by an earlier hint. Hints left empty are
    /// discarded.
    pub fn validate_hints(&self, graph: &ProcessGraph, hints: &[Phase]) -> Vec<Phase> {
        self.fit_drafts(graph, sanitize_hints(graph, hints))
    }

    /// Choose the mode for `graph`, sanitising its hints once.
    fn plan(&self, graph: &ProcessGraph) -> Plan {
        let hints = graph.phase_hints();
        if hints.is_empty() || hints.iter().any(Phase::is_empty) {
            return Plan::Generate;
        }

        let drafts = sanitize_hints(graph, hints);
        if drafts.is_empty() {
            debug!(hints = hints.len(); "No hint names a known element");
            Plan::Generate
        } else {
            Plan::Hints(drafts)
        }
    }

    /// Keep sanitised drafts that fit and split the rest, then renumber.
    fn fit_drafts(&self, graph: &ProcessGraph, drafts: Vec<PhaseDraft>) -> Vec<Phase> {
        let max = self.config.max_elements_per_phase();
        let drafts = drafts
            .into_iter()
            .flat_map(|draft| {
                if draft.len() <= max {
                    vec![draft]
                } else {
                    debug!(phase = draft.name, size = draft.len(), max; "Splitting oversized phase");
                    self.split(graph, draft)
                }
            })
            .collect();

        renumber(drafts)
    }

    /// Walk `ordered`, closing the buffer whenever a break rule fires.
    fn walk<'g>(&self, graph: &'g ProcessGraph, ordered: Vec<&'g Element>) -> Walk<'g> {
        let mut closed = Vec::new();
        let mut buffer: Vec<&'g Element> = Vec::new();

        for element in ordered {
            buffer.push(element);
            let ctx = BreakContext::new(graph, element, buffer.len(), self.config);
            if let Some(reason) = breaks::evaluate(&ctx) {
                trace!(element_id:% = element.id(), size = buffer.len(), reason:%; "Phase break");
                closed.push(std::mem::take(&mut buffer));
            }
        }

        Walk {
            closed,
            remainder: buffer,
        }
    }

    /// Single forward pass merging an undersized phase into its successor.
    ///
    /// A merged pair is not reconsidered, so a run of small phases can still
    /// leave one undersized phase behind.
    fn merge_undersized(&self, drafts: Vec<PhaseDraft>) -> Vec<PhaseDraft> {
        let min = self.config.min_elements_per_phase();
        let max = self.config.max_elements_per_phase();

        let mut merged = Vec::with_capacity(drafts.len());
        let mut drafts = drafts.into_iter().peekable();
        while let Some(current) = drafts.next() {
            if current.len() < min {
                if let Some(next) = drafts.next_if(|next| current.len() + next.len() <= max) {
                    debug!(first = current.name, second = next.name; "Merging undersized phase");
                    merged.push(current.merge(next));
                    continue;
                }
            }
            merged.push(current);
        }
        merged
    }
}

/// Mode decision together with the sanitised hints it was based on.
enum Plan {
    Generate,
    Hints(Vec<PhaseDraft>),
}

impl Plan {
    fn mode(&self) -> SegmentationMode {
        match self {
            Plan::Generate => SegmentationMode::AutoGenerate,
            Plan::Hints(_) => SegmentationMode::ValidateHints,
        }
    }
}

/// Resolve hints against the graph: drop unknown and already claimed members,
/// then drop hints with nothing left.
fn sanitize_hints(graph: &ProcessGraph, hints: &[Phase]) -> Vec<PhaseDraft> {
    let mut claimed: HashSet<Id> = HashSet::new();

    hints
        .iter()
        .filter_map(|hint| {
            let members: Vec<Id> = hint
                .members()
                .iter()
                .copied()
                .filter(|id| {
                    if !graph.contains_element(*id) {
                        debug!(phase = hint.name(), element_id:% = id; "Dropping unknown hint member");
                        return false;
                    }
                    claimed.insert(*id)
                })
                .collect();
            (!members.is_empty()).then(|| PhaseDraft::new(hint.name(), members))
        })
        .collect()
}

/// Assign orders `1..=N` and matching ids.
fn renumber(drafts: Vec<PhaseDraft>) -> Vec<Phase> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            let order = index + 1;
            Phase::new(
                Id::numbered(PHASE_ID_PREFIX, order),
                draft.name,
                order,
                draft.members,
            )
        })
        .collect()
}
