//! Kanban CLI library
//!
//! This library exposes the CLI commands for use in integration tests.
//! The binary is in `main.rs` and uses this library.

pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;

pub use commands::Command;
pub use context::BoardContext;
pub use error::{CliError, CliResult};
