//! Correlativas cascade engine.
//!
//! Recomputes which courses of a plan are available or blocked after any
//! state change, and explains why a blocked course is blocked.
//!
//! The engine is stateless and performs no I/O: every operation takes a node
//! list and returns a new one. Callers own the current list (see
//! [`crate::session::SimulationSession`]).

mod depth;
mod engine;
mod missing;

#[cfg(test)]
mod engine_tests;

pub use depth::prerequisite_depth;
pub use engine::{
    cycle_state, CascadeConfig, CascadeEngine, CascadeReport, PassLimit, DEFAULT_MAX_PASSES,
    LEGACY_FIXED_PASSES,
};
pub use missing::{missing_prerequisites, MissingPrerequisites};
