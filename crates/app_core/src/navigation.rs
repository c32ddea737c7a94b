//! Current directory tracking

use crate::AppError;
use app_fs::path::{self, ROOT};
use app_fs::VfsIndex;

/// Navigation state: the current directory inside the archive
///
/// Always holds a canonical directory path (trailing `/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: String,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: ROOT.to_string(),
        }
    }

    /// Current directory
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_at_root(&self) -> bool {
        self.current == ROOT
    }

    /// Change the current directory
    ///
    /// `..` always succeeds and stops at the root. Any other path must
    /// resolve to a directory in the index; on failure the current directory
    /// is left unchanged. An empty path returns to the root.
    pub fn change_dir(&mut self, index: &VfsIndex, raw: &str) -> Result<&str, AppError> {
        let target = path::resolve_dir(raw, &self.current);

        if raw == ".." || raw.is_empty() {
            let target = if raw.is_empty() { ROOT.to_string() } else { target };
            return Ok(self.enter(target));
        }

        match index.lookup(&target) {
            Ok(entry) if entry.is_dir() => Ok(self.enter(target)),
            _ => {
                let as_file = path::resolve_file(raw, &self.current);
                match index.lookup(&as_file) {
                    Ok(entry) if entry.is_file() => Err(AppError::NotADirectory(raw.to_string())),
                    _ => Err(AppError::NotFound(raw.to_string())),
                }
            }
        }
    }

    fn enter(&mut self, target: String) -> &str {
        if target != self.current {
            tracing::debug!("cd {} -> {}", self.current, target);
        }
        self.current = target;
        &self.current
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
