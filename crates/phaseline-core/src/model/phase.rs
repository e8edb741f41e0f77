//! Presentation phases.

use std::fmt;

use serde::Serialize;

use crate::identifier::Id;

/// An ordered group of elements sized for one presentation unit.
///
/// Phases produced by segmentation carry a 1-based `order` and an id derived
/// from it. Hints supplied by a document parser use [`Phase::hint`] and have
/// no meaningful order until they are validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase {
    id: Id,
    name: String,
    order: usize,
    members: Vec<Id>,
}

impl Phase {
    /// Create a phase with an explicit id and order.
    pub fn new(id: Id, name: impl Into<String>, order: usize, members: Vec<Id>) -> Self {
        Self {
            id,
            name: name.into(),
            order,
            members,
        }
    }

    /// Create a coarse phase hint as supplied by an upstream parser.
    ///
    /// # Examples
    ///
    /// ```
    /// # use phaseline_core::{identifier::Id, model::Phase};
    /// let hint = Phase::hint("Intake", vec![Id::new("receive"), Id::new("log")]);
    /// assert_eq!(hint.len(), 2);
    /// assert_eq!(hint.order(), 0);
    /// ```
    pub fn hint(name: impl Into<String>, members: Vec<Id>) -> Self {
        let name = name.into();
        let id = Id::new(&format!("hint::{name}"));
        Self::new(id, name, 0, members)
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The 1-based position of this phase in the partition.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn members(&self) -> &[Id] {
        &self.members
    }

    /// Returns the number of member elements.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} ({} elements)", self.order, self.name, self.len())
    }
}
