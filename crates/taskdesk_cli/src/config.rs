//! Command-line configuration.
//!
//! # Responsibility
//! - Declare global flags (with environment fallbacks) and subcommands.
//! - Resolve flags into a `CliConfig` the rest of the binary consumes.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use taskdesk_core::{default_log_level, Task, TaskDraft, TaskStatus, DEFAULT_TASKS_FILE};

#[derive(Debug, Parser)]
#[command(name = "taskdesk", version, about = "Track short tasks in a plain text file")]
pub struct Cli {
    /// Task file to read and write.
    #[arg(long, short, env = "TASKDESK_FILE", default_value = DEFAULT_TASKS_FILE, global = true)]
    pub file: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TASKDESK_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory for log files. Logging is off when unset.
    #[arg(long, env = "TASKDESK_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new task
    Add(TaskFields),

    /// Change the task at INDEX; omitted fields keep their current value
    Edit {
        index: usize,
        #[command(flatten)]
        fields: EditFields,
    },

    /// Delete the task at INDEX
    #[command(visible_alias = "delete")]
    Rm { index: usize },

    /// Mark the task at INDEX as completed
    Done { index: usize },

    /// List tasks in stored order
    #[command(visible_alias = "ls")]
    List {
        #[arg(long)]
        json: bool,
    },

    /// Case-insensitive search in title, status and description
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },

    /// Reorder the stored tasks
    Sort {
        #[arg(value_enum)]
        by: SortKey,
    },
}

#[derive(Debug, Args)]
pub struct TaskFields {
    pub title: String,

    #[arg(long, short, default_value = "")]
    pub description: String,

    /// Due date as DD/MM/YYYY
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long, value_enum, default_value_t = StatusArg::Pending)]
    pub status: StatusArg,
}

impl TaskFields {
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due.clone().unwrap_or_default(),
            status: self.status.into(),
        }
    }
}

#[derive(Debug, Args)]
pub struct EditFields {
    pub title: Option<String>,

    #[arg(long, short)]
    pub description: Option<String>,

    /// Due date as DD/MM/YYYY; an empty value clears it
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

impl EditFields {
    /// Starts from `current` and replaces only the fields that were given.
    pub fn overlay(&self, current: &Task) -> TaskDraft {
        TaskDraft {
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            due_date: self
                .due
                .clone()
                .unwrap_or_else(|| current.formatted_due_date()),
            status: self.status.map_or(current.status, TaskStatus::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pending,
    Completed,
}

impl From<StatusArg> for TaskStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => Self::Pending,
            StatusArg::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Date,
    Status,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub tasks_file: PathBuf,
    pub log_level: String,
    /// Absolute; `None` disables logging.
    pub log_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Applies defaults; relative log directories resolve against `cwd`.
    pub fn resolve(cli: &Cli, cwd: &Path) -> Self {
        Self {
            tasks_file: cli.file.clone(),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: cli.log_dir.as_ref().map(|dir| {
                if dir.is_absolute() {
                    dir.clone()
                } else {
                    cwd.join(dir)
                }
            }),
        }
    }
}
