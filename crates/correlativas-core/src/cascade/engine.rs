//! Availability cascade over a plan's prerequisite graph.
//!
//! A single pass evaluates every node against a snapshot of the previous
//! pass. Unlocking a course can unlock courses that depend on it, so several
//! passes may be needed. The engine repeats passes until one changes nothing
//! or the pass limit is reached.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::depth::prerequisite_depth;
use crate::course::{CourseId, CourseNode, CourseState};

/// Pass count of the original fixed-pass cascade.
pub const LEGACY_FIXED_PASSES: usize = 3;

/// Hard ceiling on passes, whatever the strategy.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// How many passes the cascade may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassLimit {
    /// Longest prerequisite chain + 1, which is enough for any acyclic plan.
    #[default]
    Adaptive,
    /// At most this many passes.
    Fixed(usize),
}

/// Configuration for the cascade engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeConfig {
    pub pass_limit: PassLimit,
    /// Upper bound applied on top of `pass_limit`. Protects against cyclic
    /// plan data.
    pub max_passes: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            pass_limit: PassLimit::default(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl CascadeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed pass budget instead of the adaptive one.
    pub fn with_fixed_passes(mut self, passes: usize) -> Self {
        self.pass_limit = PassLimit::Fixed(passes);
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Pass budget for this particular plan.
    pub fn passes_for(&self, nodes: &[CourseNode]) -> usize {
        let wanted = match self.pass_limit {
            PassLimit::Adaptive => prerequisite_depth(nodes) + 1,
            PassLimit::Fixed(n) => n,
        };
        wanted.clamp(1, self.max_passes.max(1))
    }
}

/// Outcome of one [`CascadeEngine::recompute_with_report`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// Passes that were applied.
    pub passes: usize,
    /// Whether the result is a fixed point (another pass would change nothing).
    pub converged: bool,
    /// Courses whose state differs between input and output, in plan order.
    pub changed: Vec<CourseId>,
}

/// Stateless cascade engine.
#[derive(Debug, Clone, Default)]
pub struct CascadeEngine {
    config: CascadeConfig,
}

impl CascadeEngine {
    /// Create an engine with the adaptive pass limit.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CascadeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Recompute available/blocked status of every non-terminal course.
    ///
    /// Returns a new list; the input is left untouched.
    pub fn recompute(&self, nodes: &[CourseNode]) -> Vec<CourseNode> {
        self.recompute_with_report(nodes).0
    }

    /// Like [`recompute`](Self::recompute) but also reports how the cascade ran.
    pub fn recompute_with_report(&self, nodes: &[CourseNode]) -> (Vec<CourseNode>, CascadeReport) {
        let limit = self.config.passes_for(nodes);
        let mut current = nodes.to_vec();
        let mut passes = 0;
        let mut converged = false;

        while passes < limit {
            let updates = evaluate_pass(&current);
            if updates.is_empty() {
                converged = true;
                break;
            }
            for (idx, state) in updates {
                current[idx].state = state;
            }
            passes += 1;
        }
        if !converged {
            converged = evaluate_pass(&current).is_empty();
        }

        let changed = changed_ids(nodes, &current);

        if converged {
            tracing::debug!(
                courses = nodes.len(),
                passes,
                changed = changed.len(),
                "cascade converged"
            );
        } else {
            tracing::warn!(
                courses = nodes.len(),
                passes,
                limit,
                "cascade stopped at pass limit without converging; plan may contain a prerequisite cycle"
            );
        }

        let report = CascadeReport {
            passes,
            converged,
            changed,
        };
        (current, report)
    }

    /// Set a course's state and propagate the change through the plan.
    ///
    /// The caller must not target a blocked course; that case is routed to
    /// [`missing_prerequisites`](super::missing_prerequisites) instead. An id
    /// that matches no course leaves states unchanged apart from the cascade.
    pub fn apply_manual_transition(
        &self,
        nodes: &[CourseNode],
        id: &CourseId,
        requested: CourseState,
    ) -> Vec<CourseNode> {
        self.apply_manual_transition_with_report(nodes, id, requested).0
    }

    /// Like [`apply_manual_transition`](Self::apply_manual_transition).
    /// `changed` in the report is measured against `nodes`, so it includes
    /// the course that was set by hand.
    pub fn apply_manual_transition_with_report(
        &self,
        nodes: &[CourseNode],
        id: &CourseId,
        requested: CourseState,
    ) -> (Vec<CourseNode>, CascadeReport) {
        let mut updated = nodes.to_vec();
        match updated.iter_mut().find(|n| &n.id == id) {
            Some(node) => {
                tracing::debug!(course = %id, from = %node.state, to = %requested, "manual transition");
                node.state = requested;
            }
            None => tracing::debug!(course = %id, "manual transition for unknown course ignored"),
        }
        let (result, mut report) = self.recompute_with_report(&updated);
        report.changed = changed_ids(nodes, &result);
        (result, report)
    }
}

/// Ids whose state differs between two same-ordered node lists.
fn changed_ids(before: &[CourseNode], after: &[CourseNode]) -> Vec<CourseId> {
    before
        .iter()
        .zip(after.iter())
        .filter(|(b, a)| b.state != a.state)
        .map(|(_, a)| a.id.clone())
        .collect()
}

/// Next state of a course under the quick-tap cycle.
pub fn cycle_state(current: CourseState) -> CourseState {
    current.cycle()
}

/// Evaluate one pass against `snapshot`, returning the `(index, new_state)`
/// pairs that differ from the snapshot.
fn evaluate_pass(snapshot: &[CourseNode]) -> Vec<(usize, CourseState)> {
    let mut states: HashMap<&CourseId, CourseState> = HashMap::with_capacity(snapshot.len());
    for node in snapshot {
        states.entry(&node.id).or_insert(node.state);
    }

    snapshot
        .iter()
        .enumerate()
        .filter_map(|(idx, node)| {
            let next = next_state(node, &states);
            (next != node.state).then_some((idx, next))
        })
        .collect()
}

fn next_state(node: &CourseNode, states: &HashMap<&CourseId, CourseState>) -> CourseState {
    if node.level == 1 {
        return match node.state {
            CourseState::Blocked => CourseState::Available,
            other => other,
        };
    }

    match node.state {
        CourseState::Approved | CourseState::Regularized => node.state,
        CourseState::Blocked if prerequisites_met(node, states) => CourseState::Available,
        CourseState::Available if !prerequisites_met(node, states) => CourseState::Blocked,
        other => other,
    }
}

/// Unknown prerequisite ids are never satisfied.
fn prerequisites_met(node: &CourseNode, states: &HashMap<&CourseId, CourseState>) -> bool {
    let regularized = node.requires_regularized.iter().all(|id| {
        states
            .get(id)
            .is_some_and(|state| state.satisfies_regularized())
    });
    regularized
        && node
            .requires_approved
            .iter()
            .all(|id| states.get(id).is_some_and(|state| state.satisfies_approved()))
}
