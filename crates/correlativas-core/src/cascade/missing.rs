//! Explanation of why a course is not available.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::course::{CourseId, CourseNode};

/// Prerequisites that keep a course from being available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingPrerequisites {
    /// Courses that must at least be regularized.
    pub regularized_needed: Vec<CourseNode>,
    /// Courses that must be approved.
    pub approved_needed: Vec<CourseNode>,
    /// Prerequisite ids that match no course in the plan.
    pub unresolved: Vec<CourseId>,
}

impl MissingPrerequisites {
    pub fn is_empty(&self) -> bool {
        self.regularized_needed.is_empty()
            && self.approved_needed.is_empty()
            && self.unresolved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regularized_needed.len() + self.approved_needed.len() + self.unresolved.len()
    }
}

/// Compute which prerequisites of `target` are not yet satisfied.
///
/// A course listed under both requirement kinds is reported once, under
/// `approved_needed`. Pure; no state changes.
pub fn missing_prerequisites(nodes: &[CourseNode], target: &CourseNode) -> MissingPrerequisites {
    let mut index: HashMap<&CourseId, &CourseNode> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        index.entry(&node.id).or_insert(node);
    }

    let approved_ids: IndexSet<&CourseId> = target.requires_approved.iter().collect();
    let regularized_ids: IndexSet<&CourseId> = target
        .requires_regularized
        .iter()
        .filter(|id| !approved_ids.contains(*id))
        .collect();

    let mut missing = MissingPrerequisites::default();
    let mut unresolved: IndexSet<CourseId> = IndexSet::new();

    for id in approved_ids {
        match index.get(id) {
            Some(node) if !node.state.satisfies_approved() => {
                missing.approved_needed.push((*node).clone())
            }
            Some(_) => {}
            None => {
                unresolved.insert(id.clone());
            }
        }
    }
    for id in regularized_ids {
        match index.get(id) {
            Some(node) if !node.state.satisfies_regularized() => {
                missing.regularized_needed.push((*node).clone())
            }
            Some(_) => {}
            None => {
                unresolved.insert(id.clone());
            }
        }
    }

    missing.unresolved = unresolved.into_iter().collect();
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::CourseState;

    fn ids(nodes: &[CourseNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn regularized_prereq_counts_once_under_approved() {
        let x = CourseNode::new("x", "X", 1).with_state(CourseState::Regularized);
        let target = CourseNode::new("t", "T", 2)
            .with_state(CourseState::Blocked)
            .requiring_regularized(["x"])
            .requiring_approved(["x"]);
        let missing = missing_prerequisites(&[x, target.clone()], &target);
        assert!(missing.regularized_needed.is_empty());
        assert_eq!(ids(&missing.approved_needed), vec!["x"]);
    }

    #[test]
    fn unsatisfied_in_both_goes_to_approved_bucket() {
        let x = CourseNode::new("x", "X", 1);
        let target = CourseNode::new("t", "T", 2)
            .requiring_regularized(["x"])
            .requiring_approved(["x"]);
        let missing = missing_prerequisites(&[x, target.clone()], &target);
        assert!(missing.regularized_needed.is_empty());
        assert_eq!(ids(&missing.approved_needed), vec!["x"]);
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn satisfied_prereqs_are_not_listed() {
        let a = CourseNode::new("a", "A", 1).with_state(CourseState::Approved);
        let b = CourseNode::new("b", "B", 1).with_state(CourseState::Regularized);
        let c = CourseNode::new("c", "C", 1);
        let target = CourseNode::new("t", "T", 2)
            .requiring_regularized(["a", "b", "c"])
            .requiring_approved(["a"]);
        let missing = missing_prerequisites(&[a, b, c, target.clone()], &target);
        assert_eq!(ids(&missing.regularized_needed), vec!["c"]);
        assert!(missing.approved_needed.is_empty());
    }

    #[test]
    fn unknown_ids_are_unresolved_and_deduplicated() {
        let target = CourseNode::new("t", "T", 2)
            .requiring_regularized(["ghost", "ghost"])
            .requiring_approved(["phantom"]);
        let missing = missing_prerequisites(&[target.clone()], &target);
        let unresolved: Vec<&str> = missing.unresolved.iter().map(CourseId::as_str).collect();
        assert_eq!(unresolved, vec!["phantom", "ghost"]);
        assert!(!missing.is_empty());
    }

    #[test]
    fn no_prerequisites_means_nothing_missing() {
        let target = CourseNode::new("t", "T", 1);
        assert!(missing_prerequisites(&[target.clone()], &target).is_empty());
    }
}
