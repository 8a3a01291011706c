//! Task board domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its closed enums.
//! - Define the validated creation/edit boundary.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Only validated `TaskFields` can create or edit a task.

pub mod draft;
pub mod task;
