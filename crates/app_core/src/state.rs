//! Shell state: the archive, its index and the current directory

use crate::content;
use crate::{AppError, Command, Navigator, ShellConfig};
use app_fs::path;
use app_fs::{ArchiveReader, Entry, FsError, VfsIndex};

/// Result of a successfully executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Directory listing (may be empty)
    Listing(Vec<String>),
    /// File-derived text
    Text(String),
    /// Entry moved to a new key
    Moved { from: String, to: String },
    /// A path to display (`pwd`)
    Path(String),
    /// Nothing to print
    Silent,
    /// The session should end
    Exit,
}

/// One shell session over one archive
///
/// Owns everything it touches, so independent sessions never share state.
pub struct ShellState {
    archive: ArchiveReader,
    index: VfsIndex,
    navigation: Navigator,
}

impl ShellState {
    /// Open the configured archive and index it
    pub fn open(config: &ShellConfig) -> Result<Self, AppError> {
        let archive = ArchiveReader::open(&config.vfs_path).map_err(|e| {
            AppError::Init(format!("cannot open {}: {}", config.vfs_path.display(), e))
        })?;
        Self::new(archive)
    }

    /// Index an already opened archive
    pub fn new(archive: ArchiveReader) -> Result<Self, AppError> {
        let index = VfsIndex::build(archive.members()?);

        Ok(Self {
            archive,
            index,
            navigation: Navigator::new(),
        })
    }

    pub fn index(&self) -> &VfsIndex {
        &self.index
    }

    /// Current directory
    pub fn current_dir(&self) -> &str {
        self.navigation.current()
    }

    /// Names in a directory; `None` lists the current directory
    pub fn list(&self, raw: Option<&str>) -> Result<Vec<String>, AppError> {
        let cwd = self.navigation.current();
        let Some(raw) = raw else {
            return Ok(self.index.list(cwd));
        };

        let entry = self
            .index
            .locate(raw, cwd)
            .map_err(|_| AppError::NotFound(raw.to_string()))?;

        if entry.is_dir() {
            Ok(self.index.list(entry.path()))
        } else {
            Ok(vec![entry.name().to_string()])
        }
    }

    /// Change the current directory
    pub fn change_dir(&mut self, raw: &str) -> Result<&str, AppError> {
        self.navigation.change_dir(&self.index, raw)
    }

    /// Last `lines` lines of a file
    pub fn tail(&self, raw: &str, lines: usize) -> Result<String, AppError> {
        let text = self.read_text(raw)?;
        Ok(content::tail(&text, lines))
    }

    /// File lines with their characters reversed
    pub fn reverse(&self, raw: &str) -> Result<String, AppError> {
        let text = self.read_text(raw)?;
        Ok(content::reverse_lines(&text))
    }

    /// Move or rename an entry; returns its new path
    pub fn move_entry(&mut self, source: &str, destination: &str) -> Result<String, AppError> {
        let cwd = self.navigation.current();
        let from = self
            .index
            .locate(source, cwd)
            .map_err(|_| AppError::NotFound(source.to_string()))?
            .path()
            .to_string();
        let to = path::resolve_file(destination, cwd);

        let moved = self.index.relocate(&from, &to)?;
        tracing::info!("mv {} -> {}", from, moved);
        Ok(moved)
    }

    /// Run a parsed command
    pub fn execute(&mut self, command: Command) -> Result<Outcome, AppError> {
        tracing::debug!("Executing {:?} in {}", command, self.current_dir());

        match command {
            Command::Ls(raw) => self.list(raw.as_deref()).map(Outcome::Listing),
            Command::Cd(raw) => {
                self.change_dir(raw.as_deref().unwrap_or(""))?;
                Ok(Outcome::Silent)
            }
            Command::Tail { path, lines } => self.tail(&path, lines).map(Outcome::Text),
            Command::Mv {
                source,
                destination,
            } => {
                let to = self.move_entry(&source, &destination)?;
                Ok(Outcome::Moved { from: source, to })
            }
            Command::Rev(path) => self.reverse(&path).map(Outcome::Text),
            Command::Pwd => Ok(Outcome::Path(self.current_dir().to_string())),
            Command::Exit => Ok(Outcome::Exit),
        }
    }

    /// Resolve `raw` to a file and decode its content
    fn read_text(&self, raw: &str) -> Result<String, AppError> {
        let entry = self.resolve_file(raw)?;
        let handle = entry
            .content()
            .ok_or_else(|| AppError::NotAFile(raw.to_string()))?;

        if entry.size() == 0 {
            return Ok(String::new());
        }

        let bytes = self.archive.read(handle)?;
        let (text, _) = app_fs::decode_bytes(&bytes, app_fs::system_encoding_hint());
        Ok(text)
    }

    fn resolve_file(&self, raw: &str) -> Result<&Entry, AppError> {
        self.index
            .locate_file(raw, self.navigation.current())
            .map_err(|e| match e {
                FsError::NotAFile(_) => AppError::NotAFile(raw.to_string()),
                _ => AppError::NotFound(raw.to_string()),
            })
    }
}
