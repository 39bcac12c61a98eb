//! Plan loading: raw backend records to course nodes.
//!
//! The backend delivers three collections for a program plan (courses,
//! regularized-prerequisite edges, approved-prerequisite edges) plus the
//! user's per-course states. [`normalize`] turns them into the strongly typed
//! [`CourseNode`](crate::course::CourseNode) list the cascade engine consumes.
//! [`PlanDocument`] is the JSON file form of the same data.

mod document;
mod normalize;
mod raw;

pub use document::PlanDocument;
pub use normalize::normalize;
pub use raw::{BackendState, RawCourse, RawCourseState, RawId, RawPrerequisite};
