//! # Correlativas Core Library
//!
//! Core logic for the correlativas (course prerequisite) simulator of the
//! student companion app. A degree plan is modelled as a dependency graph of
//! courses; the library tracks each course's completion state and recomputes
//! which courses are unlocked or blocked whenever a state changes.
//!
//! ## Architecture
//!
//! - **Plan**: normalizes raw backend records (courses, two kinds of
//!   prerequisite edges, stored user states) into typed course nodes
//! - **Cascade Engine**: pure, synchronous recomputation of available/blocked
//!   status and manual state transitions
//! - **Stats**: counts by state and completion percentage
//! - **Session**: owns one simulation's node list, enforces the transition
//!   contract, supports undo and reports changes to persist
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CascadeEngine`]: availability cascade
//! - [`SimulationSession`]: per-user simulation controller
//! - [`PlanDocument`]: plan + stored states as a JSON document
//! - [`Config`]: application configuration management

pub mod cascade;
pub mod course;
pub mod error;
pub mod plan;
pub mod session;
pub mod stats;
pub mod storage;

pub use cascade::{
    cycle_state, missing_prerequisites, prerequisite_depth, CascadeConfig, CascadeEngine,
    CascadeReport, MissingPrerequisites, PassLimit,
};
pub use course::{CourseId, CourseNode, CourseState};
pub use error::{ConfigError, CoreError, PlanError, SessionError};
pub use plan::{normalize, BackendState, PlanDocument};
pub use session::{PendingChange, SimulationSession, TapOutcome, Transition};
pub use stats::{LevelStats, PlanStats};
pub use storage::Config;
