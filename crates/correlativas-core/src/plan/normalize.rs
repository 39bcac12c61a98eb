use indexmap::IndexMap;

use super::raw::BackendState;
use super::PlanDocument;
use crate::course::{CourseId, CourseNode, CourseState};
use crate::error::PlanError;

/// Build the course node list for a plan.
///
/// Every course starts from its stored backend state (`available` when none
/// is stored); blocking is left to the cascade engine. Edges whose owning
/// course is unknown are dropped. Edges pointing at an unknown prerequisite
/// are kept and will never be satisfied.
///
/// # Errors
///
/// Returns [`PlanError::DuplicateCourse`] if two courses share an id and
/// [`PlanError::InvalidLevel`] for level 0.
pub fn normalize(plan: &PlanDocument) -> Result<Vec<CourseNode>, PlanError> {
    let mut courses: IndexMap<CourseId, CourseNode> = IndexMap::with_capacity(plan.courses.len());

    for (pos, raw) in plan.courses.iter().enumerate() {
        let id = raw.id.to_course_id();
        if raw.level == 0 {
            return Err(PlanError::InvalidLevel { id, level: 0 });
        }
        if courses.contains_key(&id) {
            return Err(PlanError::DuplicateCourse(id));
        }
        let node = CourseNode {
            id: id.clone(),
            sequence_number: raw.sequence_number.unwrap_or(pos as u32 + 1),
            name: raw.name.trim().to_string(),
            level: raw.level,
            state: CourseState::Available,
            requires_regularized: Vec::new(),
            requires_approved: Vec::new(),
        };
        courses.insert(id, node);
    }

    for (edges, approved) in [(&plan.regularized_edges, false), (&plan.approved_edges, true)] {
        for edge in edges {
            let owner = edge.course_id.to_course_id();
            let requires = edge.requires_id.to_course_id();
            if !courses.contains_key(&requires) {
                tracing::warn!(course = %owner, prerequisite = %requires, "prerequisite references unknown course");
            }
            let Some(node) = courses.get_mut(&owner) else {
                tracing::warn!(course = %owner, "prerequisite edge for unknown course skipped");
                continue;
            };
            let set = if approved {
                &mut node.requires_approved
            } else {
                &mut node.requires_regularized
            };
            if !set.contains(&requires) {
                set.push(requires);
            }
        }
    }

    // Later rows override earlier ones.
    for stored in &plan.states {
        let id = stored.course_id.to_course_id();
        match courses.get_mut(&id) {
            Some(node) => node.state = BackendState::to_course_state(stored.state),
            None => tracing::debug!(course = %id, "stored state for course outside plan ignored"),
        }
    }

    tracing::debug!(courses = courses.len(), "plan normalized");
    Ok(courses.into_values().collect())
}
