//! Process element types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{geometry::Point, identifier::Id};

/// The closed set of process element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Start,
    End,
    Task,
    UserTask,
    ServiceTask,
    Decision,
    ParallelSplit,
    ParallelJoin,
    Subprocess,
    Merge,
    Gateway,
}

/// Structural role an element kind plays when deciding where phases break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Opens concurrent branches.
    Fork,
    /// Resolves concurrent branches.
    Join,
    /// Chooses between mutually exclusive paths.
    Branch,
    /// Encloses a nested process.
    Subprocess,
    /// Terminates the process.
    Terminal,
    /// Carries no structural weight.
    None,
}

impl ElementKind {
    /// All kinds, in declaration order.
    pub const ALL: [ElementKind; 11] = [
        ElementKind::Start,
        ElementKind::End,
        ElementKind::Task,
        ElementKind::UserTask,
        ElementKind::ServiceTask,
        ElementKind::Decision,
        ElementKind::ParallelSplit,
        ElementKind::ParallelJoin,
        ElementKind::Subprocess,
        ElementKind::Merge,
        ElementKind::Gateway,
    ];

    /// Returns the structural role of this kind.
    pub fn boundary(self) -> Boundary {
        match self {
            ElementKind::ParallelSplit => Boundary::Fork,
            ElementKind::ParallelJoin => Boundary::Join,
            ElementKind::Decision => Boundary::Branch,
            ElementKind::Subprocess => Boundary::Subprocess,
            ElementKind::End => Boundary::Terminal,
            ElementKind::Start
            | ElementKind::Task
            | ElementKind::UserTask
            | ElementKind::ServiceTask
            | ElementKind::Merge
            | ElementKind::Gateway => Boundary::None,
        }
    }

    /// Whether elements of this kind describe work worth naming a phase after.
    pub fn is_nameable(self) -> bool {
        match self {
            ElementKind::Task
            | ElementKind::UserTask
            | ElementKind::ServiceTask
            | ElementKind::Subprocess => true,
            ElementKind::Start
            | ElementKind::End
            | ElementKind::Decision
            | ElementKind::ParallelSplit
            | ElementKind::ParallelJoin
            | ElementKind::Merge
            | ElementKind::Gateway => false,
        }
    }

    /// Whether this kind is any form of gateway.
    pub fn is_gateway(self) -> bool {
        match self {
            ElementKind::Decision
            | ElementKind::ParallelSplit
            | ElementKind::ParallelJoin
            | ElementKind::Merge
            | ElementKind::Gateway => true,
            ElementKind::Start
            | ElementKind::End
            | ElementKind::Task
            | ElementKind::UserTask
            | ElementKind::ServiceTask
            | ElementKind::Subprocess => false,
        }
    }

    /// Whether this kind is a plain, user or service task.
    pub fn is_task(self) -> bool {
        match self {
            ElementKind::Task | ElementKind::UserTask | ElementKind::ServiceTask => true,
            ElementKind::Start
            | ElementKind::End
            | ElementKind::Decision
            | ElementKind::ParallelSplit
            | ElementKind::ParallelJoin
            | ElementKind::Subprocess
            | ElementKind::Merge
            | ElementKind::Gateway => false,
        }
    }

    /// Whether this kind opens or closes parallel branches.
    pub fn is_parallel(self) -> bool {
        match self {
            ElementKind::ParallelSplit | ElementKind::ParallelJoin => true,
            ElementKind::Start
            | ElementKind::End
            | ElementKind::Task
            | ElementKind::UserTask
            | ElementKind::ServiceTask
            | ElementKind::Decision
            | ElementKind::Subprocess
            | ElementKind::Merge
            | ElementKind::Gateway => false,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ElementKind::Start => "start",
            ElementKind::End => "end",
            ElementKind::Task => "task",
            ElementKind::UserTask => "user_task",
            ElementKind::ServiceTask => "service_task",
            ElementKind::Decision => "decision",
            ElementKind::ParallelSplit => "parallel_split",
            ElementKind::ParallelJoin => "parallel_join",
            ElementKind::Subprocess => "subprocess",
            ElementKind::Merge => "merge",
            ElementKind::Gateway => "gateway",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name an [`ElementKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element kind `{0}`")]
pub struct UnknownElementKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownElementKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownElementKind(s.to_string()))
    }
}

/// A process step: task, gateway, event marker or sub-process boundary.
///
/// The incoming and outgoing lists hold flow ids in document order; they are
/// resolved against the owning graph's flow set. The phase reference is the
/// only part that changes after the graph is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: Id,
    name: String,
    kind: ElementKind,
    incoming: Vec<Id>,
    outgoing: Vec<Id>,
    position: Option<Point>,
    documentation: Option<String>,
    phase: Option<Id>,
}

impl Element {
    /// Create a new element with no flows, coordinate or documentation.
    pub fn new(id: Id, name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            position: None,
            documentation: None,
            phase: None,
        }
    }

    /// Attach a layout coordinate.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Attach documentation text.
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Set the ordered incoming flow ids.
    pub fn with_incoming(mut self, flows: Vec<Id>) -> Self {
        self.incoming = flows;
        self
    }

    /// Set the ordered outgoing flow ids.
    pub fn with_outgoing(mut self, flows: Vec<Id>) -> Self {
        self.outgoing = flows;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// The raw name as supplied, possibly empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The trimmed name, or `None` when the element is unnamed.
    pub fn display_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn incoming(&self) -> &[Id] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[Id] {
        &self.outgoing
    }

    pub fn is_gateway(&self) -> bool {
        self.kind.is_gateway()
    }

    /// Whether more than one flow leaves this element.
    pub fn is_branching(&self) -> bool {
        self.outgoing.len() > 1
    }

    /// Whether more than one flow enters this element.
    pub fn is_merging(&self) -> bool {
        self.incoming.len() > 1
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// The x-coordinate used for ordering; a missing coordinate counts as 0.
    pub fn layout_x(&self) -> f32 {
        self.position.map_or(0.0, Point::x)
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// The phase this element currently belongs to, if any.
    pub fn phase(&self) -> Option<Id> {
        self.phase
    }

    /// Overwrite the phase reference.
    ///
    /// The graph that owns the element is responsible for keeping this in
    /// sync with its phase list.
    pub fn set_phase(&mut self, phase: Option<Id>) {
        self.phase = phase;
    }

    /// Append a flow id to the incoming list unless already present.
    pub fn push_incoming(&mut self, flow: Id) {
        if !self.incoming.contains(&flow) {
            self.incoming.push(flow);
        }
    }

    /// Append a flow id to the outgoing list unless already present.
    pub fn push_outgoing(&mut self, flow: Id) {
        if !self.outgoing.contains(&flow) {
            self.outgoing.push(flow);
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
