//! Task domain model.
//!
//! # Responsibility
//! - Define the task record shared by the store, the service and callers.
//! - Own the single-line text codec used for file persistence.
//!
//! # Invariants
//! - `TaskStatus` is a closed set; its labels are the persisted values.
//! - Record identity (`TaskId`) is session-local and never persisted.

pub mod task;
