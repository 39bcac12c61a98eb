//! Simulation session controller.
//!
//! A session owns the current node list for one user's simulation and
//! enforces the transition contract the engine leaves to its caller: blocked
//! courses cannot be changed directly, and `blocked` is never requested
//! manually. Every change is recorded so the caller can roll back an
//! optimistic update or work out what to persist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cascade::{missing_prerequisites, CascadeEngine, CascadeReport, MissingPrerequisites};
use crate::course::{CourseId, CourseNode, CourseState};
use crate::error::SessionError;
use crate::plan::BackendState;
use crate::stats::PlanStats;

/// A manual state change applied in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub course_id: CourseId,
    pub from: CourseState,
    pub to: CourseState,
    pub at: DateTime<Utc>,
    /// Other courses whose state the cascade changed as a result.
    pub cascaded: Vec<CourseId>,
}

/// Result of a quick tap on a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    Changed {
        from: CourseState,
        to: CourseState,
        report: CascadeReport,
    },
    /// Tapping a blocked course changes nothing; here is why it is blocked.
    Blocked(MissingPrerequisites),
}

/// A change the caller should persist to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub course_id: CourseId,
    /// `None` means the stored record should be removed.
    pub state: Option<BackendState>,
}

#[derive(Debug, Clone)]
pub struct SimulationSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    engine: CascadeEngine,
    initial: Vec<CourseNode>,
    nodes: Vec<CourseNode>,
    history: Vec<Transition>,
    snapshots: Vec<Vec<CourseNode>>,
}

impl SimulationSession {
    /// Start a session from freshly loaded nodes. The nodes are recomputed
    /// once so blocked/available status is consistent from the start.
    pub fn new(engine: CascadeEngine, nodes: Vec<CourseNode>) -> Self {
        let nodes = engine.recompute(&nodes);
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            engine,
            initial: nodes.clone(),
            nodes,
            history: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn nodes(&self) -> &[CourseNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<CourseNode> {
        self.nodes
    }

    pub fn node(&self, id: &CourseId) -> Option<&CourseNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    pub fn stats(&self) -> PlanStats {
        PlanStats::from_nodes(&self.nodes)
    }

    /// Why a course is not available.
    pub fn missing_for(&self, id: &CourseId) -> Result<MissingPrerequisites, SessionError> {
        let target = self
            .node(id)
            .ok_or_else(|| SessionError::UnknownCourse(id.clone()))?;
        Ok(missing_prerequisites(&self.nodes, target))
    }

    /// Set a course's state and cascade the change.
    ///
    /// # Errors
    ///
    /// - [`SessionError::BlockedNotAssignable`] when `state` is `blocked`
    /// - [`SessionError::UnknownCourse`] when `id` is not in the plan
    /// - [`SessionError::CourseBlocked`] when the course is currently blocked
    pub fn set_state(
        &mut self,
        id: &CourseId,
        state: CourseState,
    ) -> Result<CascadeReport, SessionError> {
        if state == CourseState::Blocked {
            return Err(SessionError::BlockedNotAssignable);
        }
        let current = self
            .node(id)
            .ok_or_else(|| SessionError::UnknownCourse(id.clone()))?;
        if current.state == CourseState::Blocked {
            return Err(SessionError::CourseBlocked {
                id: id.clone(),
                missing: missing_prerequisites(&self.nodes, current),
            });
        }
        let from = current.state;
        if from == state {
            return Ok(CascadeReport {
                passes: 0,
                converged: true,
                changed: Vec::new(),
            });
        }

        let (updated, report) = self
            .engine
            .apply_manual_transition_with_report(&self.nodes, id, state);
        let before = std::mem::replace(&mut self.nodes, updated);

        let cascaded = report.changed.iter().filter(|c| *c != id).cloned().collect();
        tracing::info!(session = %self.id, course = %id, %from, to = %state, "course state changed");
        self.snapshots.push(before);
        self.history.push(Transition {
            course_id: id.clone(),
            from,
            to: state,
            at: Utc::now(),
            cascaded,
        });
        Ok(report)
    }

    /// Advance a course along the tap cycle, or explain why it is blocked.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownCourse`] when `id` is not in the plan.
    pub fn tap(&mut self, id: &CourseId) -> Result<TapOutcome, SessionError> {
        let current = self
            .node(id)
            .ok_or_else(|| SessionError::UnknownCourse(id.clone()))?;
        if current.state == CourseState::Blocked {
            return Ok(TapOutcome::Blocked(missing_prerequisites(
                &self.nodes,
                current,
            )));
        }
        let from = current.state;
        let to = from.cycle();
        let report = self.set_state(id, to)?;
        Ok(TapOutcome::Changed { from, to, report })
    }

    /// Roll back the most recent transition.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NothingToUndo`] when no transition was applied.
    pub fn undo(&mut self) -> Result<Transition, SessionError> {
        let (Some(before), Some(transition)) = (self.snapshots.pop(), self.history.pop()) else {
            return Err(SessionError::NothingToUndo);
        };
        self.nodes = before;
        tracing::info!(session = %self.id, course = %transition.course_id, "transition undone");
        Ok(transition)
    }

    /// Backend records that differ from what was loaded, in plan order.
    pub fn pending_changes(&self) -> Vec<PendingChange> {
        self.initial
            .iter()
            .zip(self.nodes.iter())
            .filter_map(|(before, after)| {
                let old = BackendState::from_course_state(before.state);
                let new = BackendState::from_course_state(after.state);
                (old != new).then(|| PendingChange {
                    course_id: after.id.clone(),
                    state: new,
                })
            })
            .collect()
    }
}
