//! Application layer logic for flatdo.
//!
//! This crate provides the operations engine, the storage seam, and the
//! configuration shared by the CLI and the TUI.

pub mod config;
pub mod service;

// Re-exports for convenience
pub use config::FlatdoConfig;
pub use service::{OpOutcome, ServiceError, TaskRow, TaskService, TaskStore};
