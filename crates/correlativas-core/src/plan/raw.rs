use serde::{Deserialize, Serialize};
use std::fmt;

use crate::course::{CourseId, CourseState};

/// Backend ids arrive as numbers or strings depending on the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl RawId {
    pub fn to_course_id(&self) -> CourseId {
        match self {
            RawId::Int(n) => CourseId(n.to_string()),
            RawId::Text(s) => CourseId(s.trim().to_string()),
        }
    }

    /// Encode a course id, keeping numeric ids numeric. Ids that a number
    /// would not print back verbatim (`"007"`, `"+3"`) stay text.
    pub fn from_course_id(id: &CourseId) -> Self {
        match id.as_str().parse::<i64>() {
            Ok(n) if n.to_string() == id.as_str() => RawId::Int(n),
            _ => RawId::Text(id.as_str().to_string()),
        }
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Int(n) => write!(f, "{n}"),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

/// A course row of a program plan.
///
/// Field names follow the backend tables; the English names are accepted on
/// the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCourse {
    pub id: RawId,
    /// Falls back to the row position when absent.
    #[serde(
        default,
        rename = "numero",
        alias = "sequence_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_number: Option<u32>,
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    #[serde(rename = "nivel", alias = "level", alias = "anio")]
    pub level: u8,
}

/// One prerequisite edge: `course_id` requires `requires_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPrerequisite {
    #[serde(rename = "materia_id", alias = "course_id")]
    pub course_id: RawId,
    #[serde(rename = "correlativa_id", alias = "requires_id")]
    pub requires_id: RawId,
}

/// The user's stored state for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCourseState {
    #[serde(rename = "materia_id", alias = "course_id")]
    pub course_id: RawId,
    #[serde(default, rename = "estado", alias = "state")]
    pub state: Option<BackendState>,
}

/// Course state as persisted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendState {
    Approved,
    Regular,
    Cursado,
    NoCursado,
}

impl BackendState {
    /// Inbound mapping. Never yields `Blocked`: only the cascade blocks.
    pub fn to_course_state(state: Option<BackendState>) -> CourseState {
        match state {
            Some(BackendState::Approved) => CourseState::Approved,
            Some(BackendState::Regular) | Some(BackendState::Cursado) => CourseState::Regularized,
            Some(BackendState::NoCursado) | None => CourseState::Available,
        }
    }

    /// Outbound mapping. Available and blocked are session-local and have no
    /// backend representation.
    pub fn from_course_state(state: CourseState) -> Option<BackendState> {
        match state {
            CourseState::Approved => Some(BackendState::Approved),
            CourseState::Regularized => Some(BackendState::Regular),
            CourseState::Available | CourseState::Blocked => None,
        }
    }
}
