//! Sequence flows between process elements.

use crate::identifier::Id;

/// A directed flow from one element to another.
///
/// Endpoints are plain ids; a flow whose source or target is missing from
/// the owning graph is kept but ignored by every graph query.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    id: Id,
    source: Id,
    target: Id,
    label: Option<String>,
    condition: Option<String>,
    is_default: bool,
}

impl Flow {
    /// Create a new unlabelled, unconditional flow.
    pub fn new(id: Id, source: Id, target: Id) -> Self {
        Self {
            id,
            source,
            target,
            label: None,
            condition: None,
            is_default: false,
        }
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a branch condition, typically on flows leaving a decision.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Mark this flow as the default path out of a gateway.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// Whether this is the gateway's default path, taken when no condition holds.
    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_builder() {
        let flow = Flow::new(Id::new("f1"), Id::new("check"), Id::new("ship"))
            .with_label("yes")
            .with_condition("stock > 0");

        assert_eq!(flow.id(), "f1");
        assert_eq!(flow.source(), "check");
        assert_eq!(flow.target(), "ship");
        assert_eq!(flow.label(), Some("yes"));
        assert_eq!(flow.condition(), Some("stock > 0"));
    }

    #[test]
    fn test_flow_defaults() {
        let flow = Flow::new(Id::new("f2"), Id::new("a"), Id::new("b"));

        assert_eq!(flow.label(), None);
        assert_eq!(flow.condition(), None);
        assert!(!flow.is_default());
    }

    #[test]
    fn test_default_flow() {
        let flow = Flow::new(Id::new("f3"), Id::new("gate"), Id::new("fallback")).as_default();

        assert!(flow.is_default());
        assert_eq!(flow.condition(), None);
    }
}
