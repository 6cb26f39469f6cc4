//! Task record and its line codec.
//!
//! # Responsibility
//! - Hold the fields of one task (title, description, due date, status).
//! - Render the due date for display (`DD/MM/YYYY`).
//! - Encode/decode the pipe-delimited persistence line.
//!
//! # Invariants
//! - The constructor performs no validation; callers validate input first.
//! - The only in-place transition is `Pending -> Completed`.
//! - Encoded lines have the shape `title|description|YYYY-MM-DD|status`.
//!   The delimiter is not escaped inside field values.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Session-local identifier assigned to every record.
///
/// Positions shift on delete and sort; this does not.
pub type TaskId = Uuid;

/// Field separator of the persisted line format.
pub const FIELD_DELIMITER: char = '|';

const FIELD_COUNT: usize = 4;
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

// chrono alone accepts short, signed and space-padded numbers.
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid iso date regex"));

/// Two-valued task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work not finished yet.
    #[default]
    Pending,
    /// Work finished.
    Completed,
}

impl TaskStatus {
    pub const PENDING_LABEL: &'static str = "En cours";
    pub const COMPLETED_LABEL: &'static str = "Terminé";

    /// Human-readable label, also used as the persisted value.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => Self::PENDING_LABEL,
            Self::Completed => Self::COMPLETED_LABEL,
        }
    }

    /// Parses a persisted label. Anything else is rejected.
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            Self::PENDING_LABEL => Some(Self::Pending),
            Self::COMPLETED_LABEL => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode failure that must abort a whole load.
///
/// Structural mismatches (wrong field count, unknown status) are not errors;
/// [`Task::decode`] reports them as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// `source` is `None` when the segment is not shaped `YYYY-MM-DD`.
    InvalidDueDate {
        value: String,
        source: Option<chrono::ParseError>,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDueDate {
                value,
                source: Some(source),
            } => write!(f, "invalid due date `{value}`: {source}"),
            Self::InvalidDueDate {
                value,
                source: None,
            } => write!(f, "invalid due date `{value}`: expected YYYY-MM-DD"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDueDate { source, .. } => {
                source.as_ref().map(|err| err as &(dyn Error + 'static))
            }
        }
    }
}

/// One user-visible to-do item.
///
/// Equality compares content only; `id` is excluded so a record survives a
/// save/load cycle as an equal value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "Uuid::new_v4")]
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.due_date == other.due_date
            && self.status == other.status
    }
}

impl Eq for Task {}

impl Task {
    /// Creates a record with a fresh id. Does not validate any field.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
        status: TaskStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            due_date,
            status,
        }
    }

    /// Sets the status to `Completed`. Idempotent.
    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Due date as `DD/MM/YYYY`, or an empty string when unset.
    pub fn formatted_due_date(&self) -> String {
        self.due_date
            .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Encodes this record as one persistence line (without newline).
    pub fn encode(&self) -> String {
        let due = self
            .due_date
            .map(|date| date.format(ISO_DATE_FORMAT).to_string())
            .unwrap_or_default();
        format!(
            "{title}{d}{description}{d}{due}{d}{status}",
            title = self.title,
            description = self.description,
            status = self.status.label(),
            d = FIELD_DELIMITER,
        )
    }

    /// Decodes one persistence line.
    ///
    /// # Contract
    /// - `Ok(None)` when the line does not split into exactly four fields or
    ///   the status field is not a known label.
    /// - `Err(CodecError::InvalidDueDate)` when the date field is non-empty
    ///   and not an ISO-8601 calendar date.
    pub fn decode(line: &str) -> Result<Option<Self>, CodecError> {
        let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if parts.len() != FIELD_COUNT {
            return Ok(None);
        }
        let (title, description, due, status) = (parts[0], parts[1], parts[2], parts[3]);

        let due_date = if due.is_empty() {
            None
        } else {
            Some(parse_iso_date(due)?)
        };

        let Some(status) = TaskStatus::from_label(status) else {
            return Ok(None);
        };

        Ok(Some(Self::new(title, description, due_date, status)))
    }
}

fn parse_iso_date(value: &str) -> Result<NaiveDate, CodecError> {
    if !ISO_DATE_RE.is_match(value) {
        return Err(CodecError::InvalidDueDate {
            value: value.to_string(),
            source: None,
        });
    }
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).map_err(|source| {
        CodecError::InvalidDueDate {
            value: value.to_string(),
            source: Some(source),
        }
    })
}
