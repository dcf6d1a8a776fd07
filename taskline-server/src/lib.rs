//! Taskline server library.
//!
//! Exposes the HTTP surface, the task store, the static-file responder, and
//! the configuration system for use in tests and embedding.

pub mod api;
pub mod config;
pub mod server;
pub mod static_files;
pub mod store;
