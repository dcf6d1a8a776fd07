//! Flat-file record codec: one task per line, `id|text|completed|createdAt`.
//!
//! Records are joined by `\n` with no trailing newline, and blank lines are
//! ignored on read. Fields are escaped on write (`\\` for backslash, `\|`
//! for pipe, `\n` for newline) so task text may contain the delimiter
//! characters. Files produced by writers that never escape still parse,
//! provided no field contains a bare backslash.

use crate::task::Task;

/// Number of `|`-separated fields in a well-formed record line.
const FIELD_COUNT: usize = 4;

/// Error type for record decode operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The line does not split into exactly four fields.
    #[error("expected 4 fields, got {0}")]
    FieldCount(usize),
    /// The id field is not a non-negative integer.
    #[error("invalid id field: {0:?}")]
    InvalidId(String),
}

/// Encodes a single task as one record line.
#[must_use]
pub fn encode_line(task: &Task) -> String {
    format!(
        "{}|{}|{}|{}",
        task.id,
        escape(&task.text),
        task.completed,
        escape(&task.created_at)
    )
}

/// Decodes one record line into a [`Task`].
///
/// The completion field reads as `true` iff it is the literal string
/// `true`; any other value reads as `false`.
///
/// # Errors
///
/// Returns [`RecordError`] if the line does not have exactly four fields or
/// the id is not an integer.
pub fn decode_line(line: &str) -> Result<Task, RecordError> {
    let fields = split_fields(line);
    let count = fields.len();
    let Ok([id, text, completed, created_at]) = <[String; FIELD_COUNT]>::try_from(fields) else {
        return Err(RecordError::FieldCount(count));
    };
    let id = id
        .parse()
        .map_err(|_| RecordError::InvalidId(id.clone()))?;
    Ok(Task {
        id,
        text,
        completed: completed == "true",
        created_at,
    })
}

/// Encodes a full task list as a newline-joined snapshot, no trailing
/// newline.
#[must_use]
pub fn encode_snapshot(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(encode_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decodes a snapshot line by line, skipping blank lines.
///
/// Yields `(line_number, result)` pairs so callers can report which lines
/// were malformed; line numbers are 1-based.
pub fn decode_snapshot(content: &str) -> impl Iterator<Item = (usize, Result<Task, RecordError>)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, decode_line(line)))
}

/// Escapes backslash, pipe, and newline within a field value.
fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for ch in field.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

/// Splits a line on unescaped pipes, decoding `\\`, `\|`, and `\n`.
///
/// An unrecognized or trailing escape keeps the backslash verbatim, so
/// unescaped legacy content passes through unless it happens to contain a
/// recognized escape sequence.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('\\') => current.push('\\'),
                Some('|') => current.push('|'),
                Some('n') => current.push('\n'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '|' => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
