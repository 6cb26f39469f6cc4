//! Task use-case service.
//!
//! # Responsibility
//! - Turn raw user text into validated task records.
//! - Drive the store for every user action and persist to one file.
//!
//! # Invariants
//! - Validation failures never mutate the store.
//! - Log events carry metadata only (indices, counts), never task text.

use crate::model::task::{Task, TaskStatus};
use crate::store::task_store::{LoadOutcome, StoreError, StoreResult, TaskStore};
use chrono::NaiveDate;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Accepted shape of user-entered due dates.
pub const INPUT_DATE_HINT: &str = "DD/MM/YYYY";

static INPUT_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid input date regex"));

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    InvalidDueDate(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::InvalidDueDate(value) => {
                write!(f, "invalid due date `{value}`; expected {INPUT_DATE_HINT}")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    Validation(TaskValidationError),
    /// No task at the given position.
    TaskNotFound(usize),
    Store(StoreError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(index) => write!(f, "no task at index {index}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::TaskNotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for TaskServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Raw, unvalidated input for creating or replacing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// `DD/MM/YYYY`, or blank for no due date.
    pub due_date: String,
    pub status: TaskStatus,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates the draft into a fresh record.
    ///
    /// # Contract
    /// - All text fields are trimmed first.
    /// - Empty title -> `EmptyTitle`.
    /// - Non-blank date must match `DD/MM/YYYY` and be a real calendar day.
    pub fn into_task(self) -> Result<Task, TaskValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        let due_date = parse_input_date(&self.due_date)?;
        Ok(Task::new(
            title,
            self.description.trim(),
            due_date,
            self.status,
        ))
    }
}

/// Parses a user-entered `DD/MM/YYYY` date; blank input means no date.
pub fn parse_input_date(input: &str) -> Result<Option<NaiveDate>, TaskValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !INPUT_DATE_RE.is_match(trimmed) {
        return Err(TaskValidationError::InvalidDueDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .map(Some)
        .map_err(|_| TaskValidationError::InvalidDueDate(trimmed.to_string()))
}

/// Use-case service over one store bound to one file.
#[derive(Debug)]
pub struct TaskService {
    store: TaskStore,
    path: PathBuf,
}

impl TaskService {
    /// Creates an empty service bound to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: TaskStore::new(),
            path: path.into(),
        }
    }

    /// Creates a service and loads `path` if it exists.
    pub fn open(path: impl Into<PathBuf>) -> TaskServiceResult<Self> {
        let mut service = Self::new(path);
        service.reload()?;
        Ok(service)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.get_all()
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.store.get(index)
    }

    /// Validates and appends a task. Returns its position.
    pub fn create_task(&mut self, draft: TaskDraft) -> TaskServiceResult<usize> {
        let task = draft.into_task().inspect_err(|err| {
            warn!("event=task_create module=service status=rejected reason={err}");
        })?;
        self.store.add(task);
        let index = self.store.len() - 1;
        info!("event=task_create module=service status=ok index={index}");
        Ok(index)
    }

    /// Validates and replaces the task at `index` wholesale.
    pub fn modify_task(&mut self, index: usize, draft: TaskDraft) -> TaskServiceResult<()> {
        if self.store.get(index).is_none() {
            return Err(TaskServiceError::TaskNotFound(index));
        }
        let task = draft.into_task().inspect_err(|err| {
            warn!("event=task_modify module=service status=rejected index={index} reason={err}");
        })?;
        self.store.update(index, task);
        info!("event=task_modify module=service status=ok index={index}");
        Ok(())
    }

    pub fn delete_task(&mut self, index: usize) -> TaskServiceResult<Task> {
        let removed = self
            .store
            .delete(index)
            .ok_or(TaskServiceError::TaskNotFound(index))?;
        info!("event=task_delete module=service status=ok index={index}");
        Ok(removed)
    }

    pub fn complete_task(&mut self, index: usize) -> TaskServiceResult<()> {
        if !self.store.mark_completed(index) {
            return Err(TaskServiceError::TaskNotFound(index));
        }
        info!("event=task_complete module=service status=ok index={index}");
        Ok(())
    }

    /// Trimmed search; a blank query lists everything.
    pub fn search(&self, query: &str) -> Vec<Task> {
        let query = query.trim();
        if query.is_empty() {
            return self.store.get_all().to_vec();
        }
        self.store.search(query)
    }

    pub fn sort_by_date(&mut self) {
        self.store.sort_by_date();
    }

    pub fn sort_by_status(&mut self) {
        self.store.sort_by_status();
    }

    pub fn save(&self) -> StoreResult<()> {
        self.store.save_to_file(&self.path)
    }

    /// Reloads from the bound file, replacing in-memory state.
    pub fn reload(&mut self) -> StoreResult<LoadOutcome> {
        self.store.load_from_file(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_input_date, TaskValidationError};
    use chrono::NaiveDate;

    #[test]
    fn parse_input_date_requires_two_digit_day_and_month() {
        assert_eq!(
            parse_input_date(" 05/03/2024 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_input_date("5/3/2024").unwrap_err(),
            TaskValidationError::InvalidDueDate("5/3/2024".to_string())
        );
    }

    #[test]
    fn parse_input_date_rejects_impossible_day() {
        assert!(parse_input_date("31/02/2024").is_err());
        assert_eq!(parse_input_date("   ").unwrap(), None);
    }
}
