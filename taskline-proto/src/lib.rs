//! Task model and flat-file record codec for the Taskline service.
//!
//! This crate is pure data: the [`task::Task`] entity, partial updates,
//! id allocation, and the pipe-delimited line format used for on-disk
//! snapshots. All I/O lives in the server crate.

pub mod record;
pub mod task;
