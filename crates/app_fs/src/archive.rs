//! Archive reader for the virtual file system
//!
//! Enumerates archive members once and serves their content lazily from the
//! open archive handle.

use crate::{encoding, FsError, Result};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Kind of an archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Location of a member's bytes inside the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentHandle {
    /// Position of the member in archive order
    ordinal: usize,

    /// Byte offset of the data (plain tar only)
    offset: u64,

    /// Uncompressed size in bytes
    size: u64,
}

impl ContentHandle {
    #[cfg(test)]
    pub(crate) fn for_test(ordinal: usize) -> Self {
        Self {
            ordinal,
            offset: 0,
            size: 0,
        }
    }
}

/// Member listed by the archive reader
#[derive(Debug, Clone)]
pub struct ArchiveMember {
    /// Member name as stored in the archive (decoded to UTF-8)
    pub name: String,

    pub kind: EntryKind,

    /// Uncompressed size in bytes
    pub size: u64,

    pub handle: ContentHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    TarGz,
    Zip,
}

/// Upper bound on the buffer reserved up front for a member read
const MAX_PREALLOC: u64 = 1 << 20;

enum Source {
    Tar(File),
    TarGz(File),
    Zip(zip::ZipArchive<File>),
}

/// Read-only handle on an archive file
///
/// The underlying file stays open until the reader is dropped.
pub struct ArchiveReader {
    path: PathBuf,
    format: ArchiveFormat,
    source: Mutex<Source>,
}

impl ArchiveReader {
    /// Open an archive file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let format = Self::detect_format(&path)?;

        let file = File::open(&path)?;
        let source = match format {
            ArchiveFormat::Tar => Source::Tar(file),
            ArchiveFormat::TarGz => Source::TarGz(file),
            ArchiveFormat::Zip => Source::Zip(
                zip::ZipArchive::new(file).map_err(|e| FsError::Archive(e.to_string()))?,
            ),
        };

        tracing::info!("Opened {:?} archive {:?}", format, path);

        Ok(Self {
            path,
            format,
            source: Mutex::new(source),
        })
    }

    /// Detect archive format from the file name
    fn detect_format(path: &Path) -> Result<ArchiveFormat> {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".tar") {
            Ok(ArchiveFormat::Tar)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") || name.ends_with(".gz") {
            Ok(ArchiveFormat::TarGz)
        } else if name.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else {
            Err(FsError::Archive(format!("Unknown archive format: {}", name)))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// List all members of the archive in archive order
    pub fn members(&self) -> Result<Vec<ArchiveMember>> {
        let hint = encoding::system_encoding_hint();
        let mut source = self.source.lock();

        let members = match &mut *source {
            Source::Tar(file) => {
                file.seek(SeekFrom::Start(0))?;
                list_tar_members(tar::Archive::new(file), hint)?
            }
            Source::TarGz(file) => {
                file.seek(SeekFrom::Start(0))?;
                list_tar_members(tar::Archive::new(flate2::read::GzDecoder::new(file)), hint)?
            }
            Source::Zip(archive) => list_zip_members(archive, hint)?,
        };

        tracing::debug!("Listed {} members of {:?}", members.len(), self.path);
        Ok(members)
    }

    /// Read the full content of a member
    pub fn read(&self, handle: &ContentHandle) -> Result<Vec<u8>> {
        let mut source = self.source.lock();
        let mut buffer = Vec::with_capacity(handle.size.min(MAX_PREALLOC) as usize);

        match &mut *source {
            Source::Tar(file) => {
                file.seek(SeekFrom::Start(handle.offset))?;
                file.take(handle.size).read_to_end(&mut buffer)?;
            }
            Source::TarGz(file) => {
                file.seek(SeekFrom::Start(0))?;
                let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
                let mut entry = archive
                    .entries()?
                    .nth(handle.ordinal)
                    .ok_or_else(|| {
                        FsError::Archive(format!("Member #{} vanished", handle.ordinal))
                    })??;
                entry.read_to_end(&mut buffer)?;
            }
            Source::Zip(archive) => {
                let mut zip_file = archive
                    .by_index(handle.ordinal)
                    .map_err(|e| FsError::Archive(e.to_string()))?;
                zip_file.read_to_end(&mut buffer)?;
            }
        }

        if buffer.len() as u64 != handle.size {
            return Err(FsError::Archive(format!(
                "Short read: expected {} bytes, got {}",
                handle.size,
                buffer.len()
            )));
        }

        Ok(buffer)
    }
}

impl Drop for ArchiveReader {
    fn drop(&mut self) {
        tracing::info!("Closed archive {:?}", self.path);
    }
}

fn decode_name(raw: &[u8], hint: encoding::EncodingHint) -> String {
    encoding::decode_bytes(raw, hint).0
}

fn list_tar_members<R: Read>(
    mut archive: tar::Archive<R>,
    hint: encoding::EncodingHint,
) -> Result<Vec<ArchiveMember>> {
    let mut members = Vec::new();

    for (ordinal, entry) in archive.entries()?.enumerate() {
        let entry = entry?;
        let header = entry.header();
        let entry_type = header.entry_type();
        let name = decode_name(&entry.path_bytes(), hint);

        let kind = if entry_type.is_dir() {
            EntryKind::Directory
        } else if entry_type.is_file() {
            EntryKind::File
        } else {
            tracing::debug!("Skipping {:?} member: {}", entry_type, name);
            continue;
        };

        let size = match kind {
            EntryKind::File => entry.size(),
            EntryKind::Directory => 0,
        };

        members.push(ArchiveMember {
            name,
            kind,
            size,
            handle: ContentHandle {
                ordinal,
                offset: entry.raw_file_position(),
                size,
            },
        });
    }

    Ok(members)
}

fn list_zip_members(
    archive: &mut zip::ZipArchive<File>,
    hint: encoding::EncodingHint,
) -> Result<Vec<ArchiveMember>> {
    let mut members = Vec::with_capacity(archive.len());

    for ordinal in 0..archive.len() {
        let file = archive
            .by_index_raw(ordinal)
            .map_err(|e| FsError::Archive(e.to_string()))?;

        let name = decode_name(file.name_raw(), hint);
        let kind = if file.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let size = match kind {
            EntryKind::File => file.size(),
            EntryKind::Directory => 0,
        };

        members.push(ArchiveMember {
            name,
            kind,
            size,
            handle: ContentHandle {
                ordinal,
                offset: 0,
                size,
            },
        });
    }

    Ok(members)
}
