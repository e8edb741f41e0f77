//! Splitting of oversized supplied phases.

use std::collections::HashSet;

use log::debug;

use phaseline_core::{identifier::Id, model::Element};

use super::{PhaseDraft, PhaseSegmenter};
use crate::graph::ProcessGraph;

impl PhaseSegmenter {
    /// Split an oversized phase into `"<name> (Part k)"` sub-phases.
    ///
    /// Members are ordered by x-coordinate when all of them have one, and by a
    /// topological sort of the subset otherwise. The ordered members are then
    /// walked with the regular break rules. A trailing remainder smaller than
    /// the minimum joins the previous part; nothing else is re-merged.
    pub(super) fn split(&self, graph: &ProcessGraph, draft: PhaseDraft) -> Vec<PhaseDraft> {
        let ordered = order_members(graph, &draft.members);
        let walk = self.walk(graph, ordered);

        let mut parts = walk.closed;
        if !walk.remainder.is_empty() {
            match parts.last_mut() {
                Some(last) if walk.remainder.len() < self.config.min_elements_per_phase() => {
                    debug!(
                        phase = draft.name,
                        remainder = walk.remainder.len();
                        "Appending small remainder to previous part"
                    );
                    last.extend(walk.remainder);
                }
                _ => parts.push(walk.remainder),
            }
        }

        parts
            .into_iter()
            .enumerate()
            .map(|(index, part)| {
                PhaseDraft::new(
                    format!("{} (Part {})", draft.name, index + 1),
                    part.iter().map(|element| element.id()).collect(),
                )
            })
            .collect()
    }
}

/// Order a phase's members for splitting.
///
/// Members the subset ordering cannot place (cycles inside the phase) follow
/// the ordered ones in their supplied order, so no member is lost.
fn order_members<'g>(graph: &'g ProcessGraph, members: &[Id]) -> Vec<&'g Element> {
    let elements: Vec<&Element> = members.iter().filter_map(|id| graph.element(*id)).collect();

    if elements.iter().all(|element| element.position().is_some()) {
        let mut by_x = elements;
        by_x.sort_by(|a, b| {
            a.position()
                .unwrap_or_default()
                .cmp_x(b.position().unwrap_or_default())
        });
        return by_x;
    }

    let mut ordered: Vec<&Element> = graph.topological_sort_subset(members).collect();
    if ordered.len() < elements.len() {
        let placed: HashSet<Id> = ordered.iter().map(|element| element.id()).collect();
        debug!(
            unplaced = elements.len() - ordered.len();
            "Appending members the subset ordering could not place"
        );
        ordered.extend(
            elements
                .into_iter()
                .filter(|element| !placed.contains(&element.id())),
        );
    }
    ordered
}
