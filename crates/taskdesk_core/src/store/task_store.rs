//! Ordered task store with positional CRUD and line-file persistence.
//!
//! # Responsibility
//! - Keep tasks in insertion order until a sort is applied.
//! - Search and sort over the in-memory sequence.
//! - Save/load the sequence as one encoded line per task.
//!
//! # Invariants
//! - Positional operations are partial: an out-of-range index yields
//!   `None`/`false` and leaves the sequence unchanged.
//! - Both sorts are stable.
//! - Loading replaces the whole sequence, or nothing on error.

use crate::model::task::{CodecError, Task, TaskId};
use log::{error, info, warn};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default persistence file, relative to the working directory.
pub const DEFAULT_TASKS_FILE: &str = "tasks.txt";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for save/load.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// A line carried a malformed due date; the load was aborted.
    Format {
        path: PathBuf,
        line: usize,
        source: CodecError,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Format { path, line, source } => {
                write!(f, "{}:{line}: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Format { source, .. } => Some(source),
        }
    }
}

/// What a successful [`TaskStore::load_from_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file does not exist; the store was left as it was.
    Missing,
    /// The store was replaced by `loaded` records; `skipped` lines did not
    /// decode into a record.
    Loaded { loaded: usize, skipped: usize },
}

/// In-memory ordered collection of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task. No duplicate check, no validation.
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Replaces the task at `index` and returns the previous one.
    ///
    /// Returns `None` and does nothing when `index` is out of range.
    pub fn update(&mut self, index: usize, task: Task) -> Option<Task> {
        let slot = self.tasks.get_mut(index)?;
        Some(std::mem::replace(slot, task))
    }

    /// Removes the task at `index`; later positions shift down by one.
    ///
    /// Returns `None` and does nothing when `index` is out of range.
    pub fn delete(&mut self, index: usize) -> Option<Task> {
        if index < self.tasks.len() {
            Some(self.tasks.remove(index))
        } else {
            None
        }
    }

    /// Read-only view of the current sequence.
    ///
    /// Re-fetch after any mutation; positions change on delete and sort.
    pub fn get_all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Marks the task at `index` completed. Returns `false` when out of range.
    pub fn mark_completed(&mut self, index: usize) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.mark_completed();
                true
            }
            None => false,
        }
    }

    /// Current position of the task with `id`, if it is still stored.
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn get_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Case-insensitive substring search over title, status label and
    /// description. Any field matching is sufficient.
    ///
    /// Returns copies in current store order; an empty query matches all.
    pub fn search(&self, query: &str) -> Vec<Task> {
        let needle = query.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&needle)
                    || task.status.label().to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Stable sort by due date ascending; undated tasks go last.
    pub fn sort_by_date(&mut self) {
        self.tasks
            .sort_by(|left, right| match (left.due_date, right.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
    }

    /// Stable sort by status label, compared as plain strings.
    pub fn sort_by_status(&mut self) {
        self.tasks
            .sort_by(|left, right| left.status.label().cmp(right.status.label()));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Overwrites `path` with one encoded line per task, in store order.
    ///
    /// # Side effects
    /// - Creates or truncates the file.
    /// - Emits `tasks_save` logging events with count and duration.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let started_at = Instant::now();

        match self.write_lines(path) {
            Ok(()) => {
                info!(
                    "event=tasks_save module=store status=ok count={} duration_ms={}",
                    self.tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Replaces the store contents with the tasks decoded from `path`.
    ///
    /// # Contract
    /// - Missing file: `Ok(LoadOutcome::Missing)`, store untouched.
    /// - Lines that are not four fields (or carry an unknown status) are
    ///   skipped and counted.
    /// - A malformed due date aborts with `StoreError::Format`; the store is
    ///   left untouched.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> StoreResult<LoadOutcome> {
        let path = path.as_ref();
        let started_at = Instant::now();

        if !path.exists() {
            info!("event=tasks_load module=store status=ok outcome=missing");
            return Ok(LoadOutcome::Missing);
        }

        let (tasks, skipped) = match read_tasks(path) {
            Ok(result) => result,
            Err(err) => {
                error!(
                    "event=tasks_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        if skipped > 0 {
            warn!("event=tasks_load module=store status=partial skipped={skipped}");
        }
        let loaded = tasks.len();
        self.tasks = tasks;
        info!(
            "event=tasks_load module=store status=ok outcome=loaded count={} duration_ms={}",
            loaded,
            started_at.elapsed().as_millis()
        );
        Ok(LoadOutcome::Loaded { loaded, skipped })
    }

    fn write_lines(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for task in &self.tasks {
            writeln!(writer, "{}", task.encode())?;
        }
        writer.flush()
    }
}

fn read_tasks(path: &Path) -> StoreResult<(Vec<Task>, usize)> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(io_error)?);
    let mut tasks = Vec::new();
    let mut skipped = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error)?;
        match Task::decode(&line) {
            Ok(Some(task)) => tasks.push(task),
            Ok(None) => skipped += 1,
            Err(source) => {
                return Err(StoreError::Format {
                    path: path.to_path_buf(),
                    line: number + 1,
                    source,
                });
            }
        }
    }

    Ok((tasks, skipped))
}
