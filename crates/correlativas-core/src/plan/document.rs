use serde::{Deserialize, Serialize};
use std::path::Path;

use super::raw::{BackendState, RawCourse, RawCourseState, RawId, RawPrerequisite};
use crate::course::{CourseId, CourseNode};
use crate::error::{CoreError, PlanError};

/// A program plan plus the user's stored states, as one JSON document.
///
/// ```json
/// {
///   "courses": [{ "id": 1, "numero": 1, "nombre": "Análisis I", "nivel": 1 }],
///   "regularized_edges": [{ "materia_id": 5, "correlativa_id": 1 }],
///   "approved_edges": [],
///   "states": [{ "materia_id": 1, "estado": "regular" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(default)]
    pub courses: Vec<RawCourse>,
    #[serde(default)]
    pub regularized_edges: Vec<RawPrerequisite>,
    #[serde(default)]
    pub approved_edges: Vec<RawPrerequisite>,
    #[serde(default)]
    pub states: Vec<RawCourseState>,
}

impl PlanDocument {
    /// Read a plan document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::LoadFailed`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path).map_err(|e| PlanError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| PlanError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write the document back as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Normalize into course nodes. See [`super::normalize`].
    pub fn nodes(&self) -> Result<Vec<CourseNode>, PlanError> {
        super::normalize(self)
    }

    /// Store the backend state for a course. `None` removes the stored record.
    ///
    /// Every row stored for the course is updated or removed. New rows reuse
    /// the id form of the course row (number or string).
    pub fn record_state(&mut self, id: &CourseId, state: Option<BackendState>) {
        let Some(state) = state else {
            self.states.retain(|s| &s.course_id.to_course_id() != id);
            return;
        };

        let mut found = false;
        for row in self
            .states
            .iter_mut()
            .filter(|s| &s.course_id.to_course_id() == id)
        {
            row.state = Some(state);
            found = true;
        }
        if !found {
            self.states.push(RawCourseState {
                course_id: self.raw_id_for(id),
                state: Some(state),
            });
        }
    }

    /// Stored backend state for a course, if any. With duplicate rows the
    /// last one counts, as in [`super::normalize`].
    pub fn stored_state(&self, id: &CourseId) -> Option<BackendState> {
        self.states
            .iter()
            .rev()
            .find(|s| &s.course_id.to_course_id() == id)
            .and_then(|s| s.state)
    }

    fn raw_id_for(&self, id: &CourseId) -> RawId {
        self.courses
            .iter()
            .find(|c| &c.id.to_course_id() == id)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| RawId::from_course_id(id))
    }
}
