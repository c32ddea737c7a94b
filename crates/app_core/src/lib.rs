//! ArchiveShell Core Domain Logic
//!
//! This crate contains:
//! - Shell state (archive, index, current directory)
//! - Command parsing
//! - Configuration
//! - Error types
//! - Navigation
//! - Content transforms (`tail`, `rev`)

pub mod command;
pub mod config;
pub mod content;
pub mod error;
pub mod navigation;
pub mod state;

#[cfg(test)]
mod test_support;

pub use command::Command;
pub use config::ShellConfig;
pub use error::AppError;
pub use navigation::Navigator;
pub use state::{Outcome, ShellState};
