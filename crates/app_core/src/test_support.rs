//! On-disk archive fixtures for unit tests

use app_fs::{ArchiveReader, VfsIndex};
use std::fs::File;
use std::path::PathBuf;
use tempfile::TempDir;

pub const FILE1: &[u8] = b"Hello, World!\nThis is a test file.\nSecond line.\n";

/// Temporary archive, removed when dropped
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

/// Build a tar archive; names ending with `/` become directory members
pub fn archive_with(members: &[(&str, &[u8])]) -> Fixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vfs.tar");
    let mut builder = tar::Builder::new(File::create(&path).unwrap());

    for (name, content) in members {
        let mut header = tar::Header::new_gnu();
        if name.ends_with('/') {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_mode(0o755);
            header.set_size(0);
            builder.append_data(&mut header, name, std::io::empty()).unwrap();
        } else {
            header.set_entry_type(tar::EntryType::Regular);
            header.set_mode(0o644);
            header.set_size(content.len() as u64);
            builder.append_data(&mut header, name, *content).unwrap();
        }
    }

    builder.finish().unwrap();
    Fixture { _dir: dir, path }
}

/// The archive used throughout the shell tests
pub fn sample_archive() -> Fixture {
    archive_with(&[
        ("file1.txt", FILE1),
        ("dir1/", b""),
        ("dir1/file2.txt", b"Another file in a directory.\n"),
        ("dir1/dir2/file3.txt", b"Nested directory file.\n"),
        ("empty/", b""),
    ])
}

pub fn index_of(fixture: &Fixture) -> VfsIndex {
    let reader = ArchiveReader::open(&fixture.path).unwrap();
    VfsIndex::build(reader.members().unwrap())
}
