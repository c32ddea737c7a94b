//! ArchiveShell File System Layer
//!
//! Presents a single archive as a virtual file system:
//! - Archive reader: member enumeration and lazy content access
//! - Path normalization against a current directory
//! - In-memory index mapping canonical paths to entries
//! - Encoding detection for member names and file content

mod archive;
mod encoding;
mod index;
pub mod path;

pub use archive::{ArchiveFormat, ArchiveMember, ArchiveReader, ContentHandle, EntryKind};
pub use encoding::{decode_bytes, detect_encoding, system_encoding_hint, EncodingHint};
pub use index::{Entry, VfsIndex};

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

pub type Result<T> = std::result::Result<T, FsError>;
