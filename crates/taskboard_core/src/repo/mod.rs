//! Durable storage contracts and implementations.
//!
//! # Responsibility
//! - Define the string-keyed store the persistence adapter writes through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Services never reach into SQLite directly; they hold a `KeyValueStore`.

pub mod kv_repo;
