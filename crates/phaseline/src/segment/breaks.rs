//! Break-point rules for the phase walk.
//!
//! After each element is appended to the running buffer the rules in
//! [`BREAK_RULES`] are tried in order; the first one that applies closes the
//! buffer as a phase. The order is significant: a buffer that is full and ends
//! on a fork reports [`BreakReason::MaxSize`], not [`BreakReason::Fork`].

use std::{collections::HashSet, fmt};

use phaseline_core::model::{Boundary, Element};

use crate::{config::SegmenterConfig, graph::ProcessGraph};

/// Why the walk closed a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakReason {
    /// The buffer reached the maximum phase size.
    MaxSize,
    /// The element opens parallel branches.
    Fork,
    /// The element is a sub-process.
    Subprocess,
    /// The element is a genuine decision in a half-full buffer.
    Branch,
    /// The element joins parallel branches and the buffer is big enough.
    Join,
    /// The element ends the process and is not alone in the buffer.
    Terminal,
}

impl fmt::Display for BreakReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            BreakReason::MaxSize => "max size reached",
            BreakReason::Fork => "parallel split",
            BreakReason::Subprocess => "sub-process",
            BreakReason::Branch => "decision",
            BreakReason::Join => "parallel join",
            BreakReason::Terminal => "end event",
        };
        f.write_str(reason)
    }
}

/// State the rules are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct BreakContext<'a> {
    graph: &'a ProcessGraph,
    element: &'a Element,
    buffer_len: usize,
    config: SegmenterConfig,
}

impl<'a> BreakContext<'a> {
    /// `buffer_len` counts the buffer after `element` was appended.
    pub fn new(
        graph: &'a ProcessGraph,
        element: &'a Element,
        buffer_len: usize,
        config: SegmenterConfig,
    ) -> Self {
        Self {
            graph,
            element,
            buffer_len,
            config,
        }
    }

    fn boundary(&self) -> Boundary {
        self.element.kind().boundary()
    }

    /// Number of distinct elements reachable through the element's outgoing flows.
    fn distinct_successors(&self) -> usize {
        self.graph
            .get_outgoing(self.element.id())
            .map(Element::id)
            .collect::<HashSet<_>>()
            .len()
    }
}

/// A single ordered break rule.
#[derive(Clone, Copy)]
pub struct BreakRule {
    pub reason: BreakReason,
    pub applies: fn(&BreakContext<'_>) -> bool,
}

impl fmt::Debug for BreakRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakRule")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Break rules in priority order.
pub const BREAK_RULES: [BreakRule; 6] = [
    BreakRule {
        reason: BreakReason::MaxSize,
        applies: |ctx| ctx.buffer_len >= ctx.config.max_elements_per_phase(),
    },
    BreakRule {
        reason: BreakReason::Fork,
        applies: |ctx| ctx.boundary() == Boundary::Fork,
    },
    BreakRule {
        reason: BreakReason::Subprocess,
        applies: |ctx| ctx.boundary() == Boundary::Subprocess,
    },
    BreakRule {
        reason: BreakReason::Branch,
        applies: |ctx| {
            ctx.boundary() == Boundary::Branch
                && ctx.buffer_len >= ctx.config.max_elements_per_phase() / 2
                && ctx.distinct_successors() > 1
        },
    },
    BreakRule {
        reason: BreakReason::Join,
        applies: |ctx| {
            ctx.boundary() == Boundary::Join
                && ctx.buffer_len >= ctx.config.min_elements_per_phase()
        },
    },
    BreakRule {
        reason: BreakReason::Terminal,
        applies: |ctx| ctx.boundary() == Boundary::Terminal && ctx.buffer_len > 1,
    },
];

/// Returns the first rule that applies, if any.
pub fn evaluate(ctx: &BreakContext<'_>) -> Option<BreakReason> {
    BREAK_RULES
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .map(|rule| rule.reason)
}
