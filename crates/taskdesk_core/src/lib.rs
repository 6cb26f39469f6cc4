//! Core task-tracking logic for taskdesk.
//! Front ends (CLI, GUI) consume this crate and hold no business rules.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{CodecError, Task, TaskId, TaskStatus, FIELD_DELIMITER};
pub use service::task_service::{
    parse_input_date, TaskDraft, TaskService, TaskServiceError, TaskServiceResult,
    TaskValidationError, INPUT_DATE_HINT,
};
pub use store::task_store::{
    LoadOutcome, StoreError, StoreResult, TaskStore, DEFAULT_TASKS_FILE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
