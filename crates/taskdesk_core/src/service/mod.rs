//! Core use-case services.
//!
//! # Responsibility
//! - Validate user input at the boundary between callers and the store.
//! - Keep front ends (CLI, GUI) decoupled from persistence details.

pub mod task_service;
