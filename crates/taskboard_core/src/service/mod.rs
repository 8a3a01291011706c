//! Board use-case services.
//!
//! # Responsibility
//! - Orchestrate the task collection, its projections and drag gestures.
//! - Keep storage access behind the persistence adapter.
//!
//! # Invariants
//! - `TaskStore` is the only writer of the task collection.
//! - Projections and the drag coordinator read snapshots only.

pub mod board;
pub mod drag;
pub mod persistence;
pub mod task_store;
pub mod view;
