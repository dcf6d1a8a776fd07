//! Task model for the Taskline service.
//!
//! A [`Task`] is the sole entity: a numeric id, free-form text, a completion
//! flag, and an ISO-8601 creation timestamp. Ids are allocated as
//! max-existing + 1, so gaps left by deletions are never reused.

use serde::{Deserialize, Serialize};

/// A single to-do record.
///
/// Serialized to JSON with camelCase field names (`createdAt`), matching the
/// API surface the front-end consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique positive identifier within one data file.
    pub id: u64,
    /// User-supplied description, unconstrained.
    pub text: String,
    /// Completion flag, `false` on creation.
    pub completed: bool,
    /// ISO-8601 creation timestamp, set once at creation and kept verbatim
    /// thereafter.
    pub created_at: String,
}

impl Task {
    /// Creates a new, uncompleted task.
    #[must_use]
    pub const fn new(id: u64, text: String, created_at: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }

    /// Applies a partial update, overwriting only the fields the patch
    /// carries. `id` and `created_at` are not patchable.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// A partial update to a task: a shallow merge of the provided fields.
///
/// Absent fields leave the task untouched; unknown JSON fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    /// Replacement text, if provided.
    pub text: Option<String>,
    /// Replacement completion flag, if provided.
    pub completed: Option<bool>,
}

/// Returns the id for the next created task: one past the highest existing
/// id, or 1 when the list is empty.
#[must_use]
pub fn next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
}
