//! Process graph model.
//!
//! [`ProcessGraph`] holds the elements and flows of one process document
//! together with the phase partition computed for it. Elements and flows are
//! fixed once the graph is built; only the phase list and the per-element
//! phase references change, and only through segmentation.
//!
//! Flows that name an element the graph does not contain are kept but skipped
//! by every query, so a partially valid document still yields a usable graph.

use std::{
    collections::{HashMap, HashSet},
    iter::FusedIterator,
};

use indexmap::IndexMap;
use log::{debug, warn};
use petgraph::{algo::tarjan_scc, graph::DiGraph};

use phaseline_core::{
    identifier::Id,
    model::{Element, ElementKind, Flow, Phase},
};

/// Builder for [`ProcessGraph`].
///
/// Elements and flows may be added in any order. When the graph is built each
/// flow id is appended to its source's outgoing list and its target's incoming
/// list, so elements only need explicit flow lists when the document already
/// provides them.
///
/// # Examples
///
/// ```
/// use phaseline::graph::ProcessGraph;
/// use phaseline::{identifier::Id, model::{Element, ElementKind, Flow}};
///
/// let graph = ProcessGraph::builder()
///     .with_element(Element::new(Id::new("start"), "Start", ElementKind::Start))
///     .with_element(Element::new(Id::new("work"), "Do work", ElementKind::Task))
///     .with_flow(Flow::new(Id::new("f1"), Id::new("start"), Id::new("work")))
///     .build();
///
/// let next: Vec<_> = graph.get_outgoing(Id::new("start")).map(|e| e.id()).collect();
/// assert_eq!(next, vec![Id::new("work")]);
/// ```
#[derive(Debug, Default)]
pub struct ProcessGraphBuilder {
    elements: IndexMap<Id, Element>,
    flows: IndexMap<Id, Flow>,
    phase_hints: Vec<Phase>,
}

impl ProcessGraphBuilder {
    /// Add an element. A later element with the same id replaces the earlier one.
    pub fn with_element(mut self, element: Element) -> Self {
        let id = element.id();
        if self.elements.insert(id, element).is_some() {
            warn!(element_id:% = id; "Duplicate element id, replacing earlier element");
        }
        self
    }

    /// Add a flow. A later flow with the same id replaces the earlier one.
    pub fn with_flow(mut self, flow: Flow) -> Self {
        let id = flow.id();
        if self.flows.insert(id, flow).is_some() {
            warn!(flow_id:% = id; "Duplicate flow id, replacing earlier flow");
        }
        self
    }

    /// Add a coarse phase hint derived from the source document.
    pub fn with_phase_hint(mut self, hint: Phase) -> Self {
        self.phase_hints.push(hint);
        self
    }

    /// Wire flows into their endpoint elements and freeze the graph.
    pub fn build(self) -> ProcessGraph {
        let Self {
            mut elements,
            flows,
            phase_hints,
        } = self;

        for flow in flows.values() {
            if let Some(source) = elements.get_mut(&flow.source()) {
                source.push_outgoing(flow.id());
            }
            if let Some(target) = elements.get_mut(&flow.target()) {
                target.push_incoming(flow.id());
            }
        }

        debug!(
            elements = elements.len(),
            flows = flows.len(),
            phase_hints = phase_hints.len();
            "Process graph built"
        );

        ProcessGraph {
            elements,
            flows,
            phase_hints,
            phases: Vec::new(),
        }
    }
}

/// Elements, flows and phase partition of a single process document.
#[derive(Debug, Default)]
pub struct ProcessGraph {
    elements: IndexMap<Id, Element>,
    flows: IndexMap<Id, Flow>,
    phase_hints: Vec<Phase>,
    phases: Vec<Phase>,
}

impl ProcessGraph {
    /// Start building a graph.
    pub fn builder() -> ProcessGraphBuilder {
        ProcessGraphBuilder::default()
    }

    pub fn element(&self, id: Id) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn contains_element(&self, id: Id) -> bool {
        self.elements.contains_key(&id)
    }

    /// Returns an iterator over all elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Start events in insertion order.
    pub fn start_events(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_kind(|kind| kind == ElementKind::Start)
    }

    /// End events in insertion order.
    pub fn end_events(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_kind(|kind| kind == ElementKind::End)
    }

    /// Number of plain, user and service tasks.
    pub fn task_count(&self) -> usize {
        self.elements_of_kind(ElementKind::is_task).count()
    }

    pub fn decision_count(&self) -> usize {
        self.elements_of_kind(|kind| kind == ElementKind::Decision).count()
    }

    /// Number of parallel splits and joins.
    pub fn parallel_count(&self) -> usize {
        self.elements_of_kind(ElementKind::is_parallel).count()
    }

    pub fn flow(&self, id: Id) -> Option<&Flow> {
        self.flows.get(&id)
    }

    /// Returns an iterator over all flows in insertion order, dangling ones included.
    pub fn flows(&self) -> impl Iterator<Item = &Flow> {
        self.flows.values()
    }

    /// Returns the elements reached through `id`'s outgoing flows, in flow order.
    ///
    /// Flows whose id or target cannot be resolved are skipped. An unknown
    /// `id` yields nothing.
    pub fn get_outgoing(&self, id: Id) -> impl Iterator<Item = &Element> {
        self.outgoing_flows(id).map(|(_, target)| target)
    }

    /// Returns the elements reached through `id`'s incoming flows, in flow order.
    pub fn get_incoming(&self, id: Id) -> impl Iterator<Item = &Element> {
        self.element(id)
            .into_iter()
            .flat_map(|element| element.incoming())
            .filter_map(|flow_id| {
                let flow = self.flows.get(flow_id)?;
                self.elements.get(&flow.source())
            })
    }

    /// Returns each resolvable outgoing flow of `id` paired with its target.
    ///
    /// Renderers use this when they need flow labels or branch conditions.
    pub fn outgoing_flows(&self, id: Id) -> impl Iterator<Item = (&Flow, &Element)> {
        self.element(id)
            .into_iter()
            .flat_map(|element| element.outgoing())
            .filter_map(|flow_id| {
                let flow = self.flows.get(flow_id)?;
                let target = self.elements.get(&flow.target())?;
                Some((flow, target))
            })
    }

    /// Label of the first flow, in insertion order, running from `source` to `target`.
    ///
    /// Returns `None` when no such flow exists or the first one is unlabelled.
    pub fn flow_label(&self, source: Id, target: Id) -> Option<&str> {
        self.flows
            .values()
            .find(|flow| flow.source() == source && flow.target() == target)
            .and_then(Flow::label)
    }

    /// Deterministic topological ordering of every orderable element.
    ///
    /// Kahn's algorithm: among the elements whose predecessors have all been
    /// emitted, the one with the smallest layout x-coordinate goes next (a
    /// missing coordinate counts as 0, equal coordinates go to whichever
    /// became ready first). Every flow whose target is an element counts
    /// towards in-degree, so a flow from an unknown source pins its target.
    /// Elements on a cycle, or downstream of one, never become ready and are
    /// left out.
    ///
    /// The returned iterator is lazy and single-use.
    pub fn topological_sort(&self) -> TopologicalOrder<'_> {
        TopologicalOrder::new(self, None)
    }

    /// Same as [`topological_sort`](Self::topological_sort), restricted to `ids`.
    ///
    /// Only flows with both endpoints in the subset count towards in-degree.
    /// Ids that are not elements of this graph are ignored.
    pub fn topological_sort_subset(&self, ids: &[Id]) -> TopologicalOrder<'_> {
        let scope = ids
            .iter()
            .copied()
            .filter(|id| self.contains_element(*id))
            .collect();
        TopologicalOrder::new(self, Some(scope))
    }

    /// Elements that [`topological_sort`](Self::topological_sort) omits, in insertion order.
    pub fn unorderable_elements(&self) -> Vec<&Element> {
        let ordered: HashSet<Id> = self.topological_sort().map(Element::id).collect();
        self.elements()
            .filter(|element| !ordered.contains(&element.id()))
            .collect()
    }

    /// Groups of elements that sit on a common cycle.
    ///
    /// Each group is a strongly connected component with more than one member,
    /// or a single element with a flow to itself. Members are listed in
    /// insertion order and groups are ordered by their first member.
    pub fn cyclic_groups(&self) -> Vec<Vec<Id>> {
        let mut graph = DiGraph::<Id, ()>::with_capacity(self.elements.len(), self.flows.len());
        let indices: HashMap<Id, _> = self
            .elements
            .keys()
            .map(|id| (*id, graph.add_node(*id)))
            .collect();

        for flow in self.flows.values() {
            if let (Some(&source), Some(&target)) =
                (indices.get(&flow.source()), indices.get(&flow.target()))
            {
                graph.add_edge(source, target, ());
            }
        }

        let mut groups: Vec<Vec<Id>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| {
                let mut ids: Vec<Id> = component.into_iter().map(|idx| graph[idx]).collect();
                ids.sort_by_key(|id| self.insertion_index(*id));
                ids
            })
            .collect();
        groups.sort_by_key(|group| group.first().map(|id| self.insertion_index(*id)));
        groups
    }

    /// The current phase partition, ordered by phase order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, id: Id) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.id() == id)
    }

    /// Members of the phase `phase` that are elements of this graph, in member order.
    ///
    /// An unknown phase id yields nothing.
    pub fn elements_in_phase(&self, phase: Id) -> impl Iterator<Item = &Element> {
        self.phase(phase)
            .into_iter()
            .flat_map(Phase::members)
            .filter_map(|id| self.elements.get(id))
    }

    /// The phase `element` currently belongs to.
    pub fn phase_of(&self, element: Id) -> Option<&Phase> {
        self.element(element)
            .and_then(Element::phase)
            .and_then(|phase| self.phase(phase))
    }

    /// Coarse phase hints supplied when the graph was built.
    pub fn phase_hints(&self) -> &[Phase] {
        &self.phase_hints
    }

    /// Replace the phase partition and rewrite every element's phase reference.
    ///
    /// References are cleared first, so elements outside every phase end up
    /// with no phase rather than a stale one.
    pub(crate) fn install_phases(&mut self, phases: Vec<Phase>) -> &[Phase] {
        for element in self.elements.values_mut() {
            element.set_phase(None);
        }

        for phase in &phases {
            for member in phase.members() {
                if let Some(element) = self.elements.get_mut(member) {
                    element.set_phase(Some(phase.id()));
                }
            }
        }

        self.phases = phases;
        &self.phases
    }

    fn elements_of_kind(
        &self,
        matches: impl Fn(ElementKind) -> bool,
    ) -> impl Iterator<Item = &Element> {
        self.elements
            .values()
            .filter(move |element| matches(element.kind()))
    }

    fn insertion_index(&self, id: Id) -> usize {
        self.elements.get_index_of(&id).unwrap_or(usize::MAX)
    }
}

/// Lazy Kahn's-algorithm walk over a [`ProcessGraph`].
///
/// In-degrees and successors come from the graph's flow table rather than
/// the per-element flow lists, so an element whose lists disagree with the
/// flows is still emitted at most once.
///
/// Created by [`ProcessGraph::topological_sort`] and
/// [`ProcessGraph::topological_sort_subset`].
#[derive(Debug)]
pub struct TopologicalOrder<'g> {
    graph: &'g ProcessGraph,
    in_degree: HashMap<Id, usize>,
    successors: HashMap<Id, Vec<Id>>,
    /// Elements with no pending predecessor, in the order they became ready.
    ready: Vec<Id>,
    emitted: HashSet<Id>,
}

impl<'g> TopologicalOrder<'g> {
    fn new(graph: &'g ProcessGraph, scope: Option<HashSet<Id>>) -> Self {
        let in_scope = |id: Id| scope.as_ref().is_none_or(|scope| scope.contains(&id));

        let mut in_degree: HashMap<Id, usize> = graph
            .elements
            .keys()
            .copied()
            .filter(|id| in_scope(*id))
            .map(|id| (id, 0))
            .collect();
        let mut successors: HashMap<Id, Vec<Id>> = HashMap::new();

        // A flow from an unknown source still counts, leaving its target
        // unorderable. Within a subset both endpoints must be members.
        for flow in graph.flows.values() {
            if scope.is_some() && !in_scope(flow.source()) {
                continue;
            }
            let Some(degree) = in_degree.get_mut(&flow.target()) else {
                continue;
            };
            *degree += 1;
            successors
                .entry(flow.source())
                .or_default()
                .push(flow.target());
        }

        let ready = graph
            .elements
            .keys()
            .copied()
            .filter(|id| in_degree.get(id) == Some(&0))
            .collect();

        Self {
            graph,
            in_degree,
            successors,
            ready,
            emitted: HashSet::new(),
        }
    }

    /// Position in `ready` of the first element with the smallest x.
    fn next_ready_position(&self) -> Option<usize> {
        self.ready
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let a_x = self.graph.elements[*a].layout_x();
                let b_x = self.graph.elements[*b].layout_x();
                a_x.total_cmp(&b_x)
            })
            .map(|(position, _)| position)
    }
}

impl<'g> Iterator for TopologicalOrder<'g> {
    type Item = &'g Element;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.next_ready_position()?;
        let id = self.ready.remove(position);
        self.emitted.insert(id);

        for successor in self.successors.get(&id).into_iter().flatten() {
            let Some(degree) = self.in_degree.get_mut(successor) else {
                continue;
            };
            if *degree == 0 {
                continue;
            }
            *degree -= 1;
            if *degree == 0 && !self.emitted.contains(successor) {
                self.ready.push(*successor);
            }
        }

        self.graph.element(id)
    }
}

impl FusedIterator for TopologicalOrder<'_> {}
