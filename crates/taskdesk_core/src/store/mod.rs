//! In-memory task collection and its file persistence.
//!
//! # Responsibility
//! - Own the ordered task sequence exclusively.
//! - Provide positional CRUD, search, sorting and line-file persistence.
//!
//! # Invariants
//! - Out-of-range positions never panic and never mutate the store.
//! - A failed load leaves the store contents untouched.

pub mod task_store;
