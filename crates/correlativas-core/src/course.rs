//! Course model for a degree plan.
//!
//! A plan is a flat list of [`CourseNode`]s. Each node carries two kinds of
//! prerequisite edges:
//!
//! - `requires_regularized`: the prerequisite must be regularized or approved
//! - `requires_approved`: the prerequisite must be approved
//!
//! Only `state` changes during a simulation session.
//!
//! ```text
//!         [prereqs satisfied]
//! available ----------------> (stays available)
//!    |  ^
//!    |  | [prereqs satisfied, was blocked]
//!    v  |
//! blocked  <---- [prereqs unsatisfied, was available]
//!
//! regularized, approved: manual only, never touched by the cascade
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;

/// Backend-assigned course identifier, unique within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CourseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Completion state of a course within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseState {
    /// Fully completed, including the final exam
    Approved,
    /// Coursework done, final exam pending
    Regularized,
    /// All prerequisites met, can be taken
    Available,
    /// At least one prerequisite missing
    Blocked,
}

impl CourseState {
    pub const ALL: [CourseState; 4] = [
        CourseState::Approved,
        CourseState::Regularized,
        CourseState::Available,
        CourseState::Blocked,
    ];

    /// Approved and regularized are only changed by explicit user action.
    pub fn is_terminal(self) -> bool {
        matches!(self, CourseState::Approved | CourseState::Regularized)
    }

    /// Whether this state satisfies a "must be regularized" prerequisite.
    pub fn satisfies_regularized(self) -> bool {
        self.is_terminal()
    }

    /// Whether this state satisfies a "must be approved" prerequisite.
    pub fn satisfies_approved(self) -> bool {
        self == CourseState::Approved
    }

    /// Quick-tap cycle: available → regularized → approved → available.
    ///
    /// Blocked maps to itself.
    pub fn cycle(self) -> CourseState {
        match self {
            CourseState::Available => CourseState::Regularized,
            CourseState::Regularized => CourseState::Approved,
            CourseState::Approved => CourseState::Available,
            CourseState::Blocked => CourseState::Blocked,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CourseState::Approved => "approved",
            CourseState::Regularized => "regularized",
            CourseState::Available => "available",
            CourseState::Blocked => "blocked",
        }
    }
}

impl fmt::Display for CourseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" | "aprobada" => Ok(CourseState::Approved),
            "regularized" | "regular" => Ok(CourseState::Regularized),
            "available" | "disponible" => Ok(CourseState::Available),
            "blocked" | "bloqueada" => Ok(CourseState::Blocked),
            other => Err(format!(
                "unknown course state '{other}' (expected approved, regularized, available or blocked)"
            )),
        }
    }
}

/// One course of a degree plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseNode {
    pub id: CourseId,
    /// Position in the official plan, for display ordering only.
    pub sequence_number: u32,
    pub name: String,
    /// Academic year (1-based). Level 1 courses are never blocked.
    pub level: u8,
    pub state: CourseState,
    #[serde(default)]
    pub requires_regularized: Vec<CourseId>,
    #[serde(default)]
    pub requires_approved: Vec<CourseId>,
}

impl CourseNode {
    /// Create an available course with no prerequisites.
    pub fn new(id: impl Into<CourseId>, name: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            sequence_number: 0,
            name: name.into(),
            level,
            state: CourseState::Available,
            requires_regularized: Vec::new(),
            requires_approved: Vec::new(),
        }
    }

    pub fn with_sequence_number(mut self, n: u32) -> Self {
        self.sequence_number = n;
        self
    }

    pub fn with_state(mut self, state: CourseState) -> Self {
        self.state = state;
        self
    }

    pub fn requiring_regularized<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CourseId>,
    {
        self.requires_regularized.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn requiring_approved<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CourseId>,
    {
        self.requires_approved.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Union of both prerequisite sets, in declaration order.
    ///
    /// Used for drawing dependency edges; state logic reads the two sets
    /// separately.
    pub fn all_prerequisites(&self) -> Vec<CourseId> {
        let set: IndexSet<&CourseId> = self
            .requires_regularized
            .iter()
            .chain(self.requires_approved.iter())
            .collect();
        set.into_iter().cloned().collect()
    }

    pub fn has_prerequisites(&self) -> bool {
        !self.requires_regularized.is_empty() || !self.requires_approved.is_empty()
    }
}
