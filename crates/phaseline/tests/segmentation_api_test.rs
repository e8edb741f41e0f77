//! Integration tests for the public segmentation API.
//!
//! These cover the documented end-to-end scenarios and the invariants every
//! segmentation result must satisfy.

use std::collections::{HashMap, HashSet};

use proptest::{prelude::*, test_runner::TestCaseError};

use phaseline::{
    PhaseSegmenter, SegmentationMode,
    config::SegmenterConfig,
    geometry::Point,
    graph::ProcessGraph,
    identifier::Id,
    model::{Element, ElementKind, Flow, Phase},
};

fn segmenter(max: usize, min: usize) -> PhaseSegmenter {
    PhaseSegmenter::new(SegmenterConfig::new(max, min).expect("valid bounds"))
}

fn element(id: &str, kind: ElementKind, x: f32) -> Element {
    Element::new(Id::new(id), id, kind).with_position(Point::new(x, 0.0))
}

fn flow(source: &str, target: &str) -> Flow {
    Flow::new(
        Id::new(&format!("{source}->{target}")),
        Id::new(source),
        Id::new(target),
    )
}

fn member_ids(phase: &Phase) -> Vec<String> {
    phase.members().iter().map(Id::to_string).collect()
}

fn task_chain(n: usize) -> ProcessGraph {
    let mut builder = ProcessGraph::builder();
    for i in 0..n {
        builder = builder.with_element(Element::new(
            Id::numbered("task", i),
            format!("Item{i}"),
            ElementKind::Task,
        ));
    }
    for i in 1..n {
        builder = builder.with_flow(Flow::new(
            Id::numbered("seq", i),
            Id::numbered("task", i - 1),
            Id::numbered("task", i),
        ));
    }
    builder.build()
}

#[test]
fn test_twelve_sequential_tasks() {
    let mut graph = task_chain(12);

    let (_, phases) = segmenter(10, 3).segment(&mut graph);

    assert_eq!(phases.len(), 2);
    assert_eq!(
        phases[0].members(),
        (0..10).map(|i| Id::numbered("task", i)).collect::<Vec<_>>().as_slice()
    );
    assert_eq!(
        phases[1].members(),
        &[Id::numbered("task", 10), Id::numbered("task", 11)]
    );
}

#[test]
fn test_parallel_split_closes_phase() {
    let mut graph = ProcessGraph::builder()
        .with_element(element("Start", ElementKind::Start, 0.0))
        .with_element(element("TaskA", ElementKind::Task, 100.0))
        .with_element(element("Fork", ElementKind::ParallelSplit, 200.0))
        .with_element(element("TaskB", ElementKind::Task, 300.0))
        .with_element(element("TaskC", ElementKind::Task, 310.0))
        .with_element(element("Join", ElementKind::ParallelJoin, 400.0))
        .with_element(element("TaskD", ElementKind::Task, 500.0))
        .with_element(element("End", ElementKind::End, 600.0))
        .with_flow(flow("Start", "TaskA"))
        .with_flow(flow("TaskA", "Fork"))
        .with_flow(flow("Fork", "TaskB"))
        .with_flow(flow("Fork", "TaskC"))
        .with_flow(flow("TaskB", "Join"))
        .with_flow(flow("TaskC", "Join"))
        .with_flow(flow("Join", "TaskD"))
        .with_flow(flow("TaskD", "End"))
        .build();

    let (_, phases) = segmenter(10, 3).segment(&mut graph);

    let members: Vec<_> = phases.iter().map(member_ids).collect();
    assert_eq!(
        members,
        vec![
            vec!["Start", "TaskA", "Fork"],
            vec!["TaskB", "TaskC", "Join"],
            vec!["TaskD", "End"],
        ]
    );
    assert_eq!(phases[0].name(), "TaskA");
    assert_eq!(phases[1].name(), "TaskB & TaskC");
}

#[test]
fn test_parallel_join_waits_for_min_buffer() {
    let mut graph = ProcessGraph::builder()
        .with_element(element("Start", ElementKind::Start, 0.0))
        .with_element(element("Fork", ElementKind::ParallelSplit, 100.0))
        .with_element(element("TaskB", ElementKind::Task, 200.0))
        .with_element(element("Join", ElementKind::ParallelJoin, 300.0))
        .with_element(element("TaskD", ElementKind::Task, 400.0))
        .with_element(element("End", ElementKind::End, 500.0))
        .with_flow(flow("Start", "Fork"))
        .with_flow(flow("Fork", "TaskB"))
        .with_flow(flow("TaskB", "Join"))
        .with_flow(flow("Join", "TaskD"))
        .with_flow(flow("TaskD", "End"))
        .build();

    let (_, phases) = segmenter(10, 3).segment(&mut graph);

    // {Start, Fork} is undersized and merges with {TaskB, Join, TaskD, End};
    // the join alone with two buffered elements does not close a phase.
    let members: Vec<_> = phases.iter().map(member_ids).collect();
    assert_eq!(
        members,
        vec![vec!["Start", "Fork", "TaskB", "Join", "TaskD", "End"]]
    );
    assert_eq!(phases[0].name(), "Start & TaskB & TaskD");
}

#[test]
fn test_oversized_hint_split_into_parts() {
    let mut builder = ProcessGraph::builder();
    for i in 0..25 {
        builder = builder.with_element(Element::new(
            Id::numbered("x", i),
            format!("X{i}"),
            ElementKind::Task,
        ));
    }
    let hint = Phase::hint("X", (0..25).map(|i| Id::numbered("x", i)).collect());
    let mut graph = builder.with_phase_hint(hint).build();

    let seg = segmenter(10, 3);
    let (mode, phases) = seg.segment(&mut graph);
    assert_eq!(mode, SegmentationMode::ValidateHints);

    let names: Vec<_> = phases.iter().map(Phase::name).collect();
    assert_eq!(names, vec!["X (Part 1)", "X (Part 2)", "X (Part 3)"]);
    assert_eq!(phases.iter().map(Phase::len).sum::<usize>(), 25);
    assert!(phases.iter().all(|phase| phase.len() <= 10));
}

#[test]
fn test_shared_verb_names_phase() {
    let mut graph = ProcessGraph::builder()
        .with_element(Element::new(
            Id::new("v1"),
            "Validate customer data",
            ElementKind::Task,
        ))
        .with_element(Element::new(
            Id::new("v2"),
            "Double-check and VALIDATE totals",
            ElementKind::UserTask,
        ))
        .with_flow(Flow::new(Id::new("vf"), Id::new("v1"), Id::new("v2")))
        .build();

    let (_, phases) = segmenter(10, 1).segment(&mut graph);

    assert_eq!(phases.len(), 1);
    assert_eq!(phases[0].name(), "Validation");
}

#[test]
fn test_subprocess_and_decision_breaks() {
    // s, t1, t2, t3, t4, decision(2 branches) | yes, no, sub | end-tail
    let mut graph = ProcessGraph::builder()
        .with_element(element("s", ElementKind::Start, 0.0))
        .with_element(element("t1", ElementKind::Task, 10.0))
        .with_element(element("t2", ElementKind::Task, 20.0))
        .with_element(element("t3", ElementKind::Task, 30.0))
        .with_element(element("t4", ElementKind::Task, 40.0))
        .with_element(element("gate", ElementKind::Decision, 50.0))
        .with_element(element("yes", ElementKind::Task, 60.0))
        .with_element(element("no", ElementKind::Task, 61.0))
        .with_element(element("merge", ElementKind::Merge, 70.0))
        .with_element(element("sub", ElementKind::Subprocess, 80.0))
        .with_element(element("wrap", ElementKind::Task, 90.0))
        .with_element(element("tidy", ElementKind::Task, 95.0))
        .with_element(element("e", ElementKind::End, 100.0))
        .with_flow(flow("s", "t1"))
        .with_flow(flow("t1", "t2"))
        .with_flow(flow("t2", "t3"))
        .with_flow(flow("t3", "t4"))
        .with_flow(flow("t4", "gate"))
        .with_flow(flow("gate", "yes"))
        .with_flow(flow("gate", "no"))
        .with_flow(flow("yes", "merge"))
        .with_flow(flow("no", "merge"))
        .with_flow(flow("merge", "sub"))
        .with_flow(flow("sub", "wrap"))
        .with_flow(flow("wrap", "tidy"))
        .with_flow(flow("tidy", "e"))
        .build();

    let (_, phases) = segmenter(10, 3).segment(&mut graph);

    let members: Vec<_> = phases.iter().map(member_ids).collect();
    assert_eq!(
        members,
        vec![
            vec!["s", "t1", "t2", "t3", "t4", "gate"],
            vec!["yes", "no", "merge", "sub"],
            vec!["wrap", "tidy", "e"],
        ]
    );
}

#[test]
fn test_revalidating_in_bounds_phases_is_stable() {
    let mut graph = task_chain(23);
    let seg = segmenter(6, 2);
    let first: Vec<Vec<Id>> = seg
        .segment(&mut graph)
        .1
        .iter()
        .map(|phase| phase.members().to_vec())
        .collect();

    let hints: Vec<Phase> = graph
        .phases()
        .iter()
        .map(|phase| Phase::hint(phase.name(), phase.members().to_vec()))
        .collect();
    let second: Vec<Vec<Id>> = seg
        .validate_hints(&graph, &hints)
        .iter()
        .map(|phase| phase.members().to_vec())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_downstream_queries_after_segmentation() {
    let mut graph = task_chain(4);
    segmenter(10, 3).segment(&mut graph);

    let phase = graph.phase_of(Id::numbered("task", 2)).expect("assigned");
    let next: Vec<_> = graph
        .get_outgoing(Id::numbered("task", 2))
        .map(Element::id)
        .collect();
    let prev: Vec<_> = graph
        .get_incoming(Id::numbered("task", 2))
        .map(Element::id)
        .collect();

    assert_eq!(phase.order(), 1);
    assert_eq!(next, vec![Id::numbered("task", 3)]);
    assert_eq!(prev, vec![Id::numbered("task", 1)]);
}

// ===================
// Strategies
// ===================

fn kind_strategy() -> impl Strategy<Value = ElementKind> {
    prop::sample::select(ElementKind::ALL.to_vec())
}

fn config_strategy() -> impl Strategy<Value = SegmenterConfig> {
    (1usize..12)
        .prop_flat_map(|max| (Just(max), 1..=max))
        .prop_map(|(max, min)| SegmenterConfig::new(max, min).expect("min <= max"))
}

/// Random process DAG with arbitrary kinds; edges run from lower to higher index.
fn process_strategy() -> impl Strategy<Value = ProcessGraph> {
    (1usize..40)
        .prop_flat_map(|n| {
            (
                prop::collection::vec((kind_strategy(), prop::option::of(0.0f32..1000.0)), n),
                prop::collection::vec((0..n, 0..n), 0..n * 2),
                0..=n,
            )
        })
        .prop_map(|(specs, pairs, hint_chunk)| {
            let mut builder = ProcessGraph::builder();
            for (i, (kind, x)) in specs.iter().enumerate() {
                let mut el = Element::new(Id::numbered("p", i), format!("Node {i}"), *kind);
                if let Some(x) = x {
                    el = el.with_position(Point::new(*x, 0.0));
                }
                builder = builder.with_element(el);
            }
            for (k, (a, b)) in pairs.into_iter().enumerate() {
                if a < b {
                    builder = builder.with_flow(Flow::new(
                        Id::numbered("pf", k),
                        Id::numbered("p", a),
                        Id::numbered("p", b),
                    ));
                }
            }
            // hint_chunk == 0 means no hints; otherwise chunk all elements
            if hint_chunk > 0 {
                let ids: Vec<Id> = (0..specs.len()).map(|i| Id::numbered("p", i)).collect();
                for (c, chunk) in ids.chunks(hint_chunk).enumerate() {
                    builder = builder.with_phase_hint(Phase::hint(format!("H{c}"), chunk.to_vec()));
                }
            }
            builder.build()
        })
}

// ===================
// Property Checks
// ===================

fn check_partition_invariants(
    mut graph: ProcessGraph,
    config: SegmenterConfig,
) -> Result<(), TestCaseError> {
    let seg = PhaseSegmenter::new(config);
    let (mode, phases) = seg.segment(&mut graph);
    let phases = phases.to_vec();

    // orders are exactly 1..=N
    let orders: Vec<usize> = phases.iter().map(Phase::order).collect();
    prop_assert_eq!(orders, (1..=phases.len()).collect::<Vec<_>>());

    // no element in two phases; each member points back at its phase
    let mut seen: HashSet<Id> = HashSet::new();
    for phase in &phases {
        prop_assert!(!phase.is_empty());
        for member in phase.members() {
            prop_assert!(seen.insert(*member), "{} appears twice", member);
            let element = graph.element(*member).expect("member exists");
            prop_assert_eq!(element.phase(), Some(phase.id()));
        }
    }

    // elements outside every phase have no phase reference
    for element in graph.elements() {
        if !seen.contains(&element.id()) {
            prop_assert_eq!(element.phase(), None);
        }
    }

    let max = config.max_elements_per_phase();
    let min = config.min_elements_per_phase();
    match mode {
        SegmentationMode::AutoGenerate => {
            for phase in &phases {
                prop_assert!(phase.len() <= max, "{} exceeds max {}", phase, max);
            }
            let ordered: HashSet<Id> = graph.topological_sort().map(Element::id).collect();
            prop_assert_eq!(seen, ordered);
        }
        SegmentationMode::ValidateHints => {
            for phase in &phases {
                prop_assert!(phase.len() < max + min, "{} exceeds split bound", phase);
            }
            prop_assert_eq!(seen.len(), graph.element_count());
        }
    }
    Ok(())
}

fn check_hint_revalidation_is_idempotent(
    graph: ProcessGraph,
    config: SegmenterConfig,
) -> Result<(), TestCaseError> {
    let seg = PhaseSegmenter::new(config);
    let in_bounds: Vec<Phase> = seg
        .auto_generate(&graph)
        .into_iter()
        .map(|phase| Phase::hint(phase.name(), phase.members().to_vec()))
        .collect();

    let revalidated = seg.validate_hints(&graph, &in_bounds);

    let before: Vec<&[Id]> = in_bounds.iter().map(Phase::members).collect();
    let after: Vec<&[Id]> = revalidated.iter().map(Phase::members).collect();
    prop_assert_eq!(before, after);

    let names: HashMap<usize, &str> = revalidated
        .iter()
        .map(|phase| (phase.order(), phase.name()))
        .collect();
    for (i, hint) in in_bounds.iter().enumerate() {
        prop_assert_eq!(names[&(i + 1)], hint.name());
    }
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn partition_invariants_hold(graph in process_strategy(), config in config_strategy()) {
        check_partition_invariants(graph, config)?;
    }

    #[test]
    fn hint_revalidation_is_idempotent(graph in process_strategy(), config in config_strategy()) {
        check_hint_revalidation_is_idempotent(graph, config)?;
    }
}
