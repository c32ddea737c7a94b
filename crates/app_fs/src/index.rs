//! In-memory index of the archive hierarchy
//!
//! Flat archive member names are reconciled into a directory tree keyed by
//! canonical absolute path (see [`crate::path`]). Directories that are only
//! implied by a member's path prefix are synthesized, so every non-root
//! ancestor of every key is itself a directory key.

use crate::archive::{ArchiveMember, ContentHandle, EntryKind};
use crate::path::{self, ROOT, SEPARATOR};
use crate::{FsError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

/// Indexed archive entry
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Canonical absolute path (directories end with `/`)
    path: String,
    kind: EntryKind,
    size: u64,
    /// Content location, `None` for directories
    content: Option<ContentHandle>,
}

impl Entry {
    fn directory(path: String) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            size: 0,
            content: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path component
    pub fn name(&self) -> &str {
        path::file_name(&self.path)
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content(&self) -> Option<&ContentHandle> {
        self.content.as_ref()
    }
}

/// Mapping from canonical path to entry
#[derive(Debug, Clone)]
pub struct VfsIndex {
    entries: BTreeMap<String, Entry>,
}

impl VfsIndex {
    /// Create an index holding only the root directory
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(ROOT.to_string(), Entry::directory(ROOT.to_string()));
        Self { entries }
    }

    /// Build the index from archive members
    ///
    /// Duplicate member names resolve to the last one listed. A member that
    /// would give a file and a directory the same name is skipped.
    pub fn build<I>(members: I) -> Self
    where
        I: IntoIterator<Item = ArchiveMember>,
    {
        let mut index = Self::new();

        for member in members {
            let is_dir = member.kind == EntryKind::Directory;
            let Some(key) = path::canonical_member(&member.name, is_dir) else {
                tracing::debug!("Skipping root member {:?}", member.name);
                continue;
            };

            if let Some(clash) = index.clash(&key, member.kind) {
                tracing::warn!("Skipping member {:?}: conflicts with {}", member.name, clash);
                continue;
            }

            index.insert(Entry {
                path: key,
                kind: member.kind,
                size: member.size,
                content: (!is_dir).then_some(member.handle),
            });
        }

        tracing::info!("Indexed {} entries", index.len());
        index
    }

    /// Insert an entry, synthesizing missing ancestor directories
    fn insert(&mut self, entry: Entry) {
        self.ensure_ancestors(&entry.path);
        self.entries.insert(entry.path.clone(), entry);
    }

    fn ensure_ancestors(&mut self, key: &str) {
        for ancestor in path::ancestors(key) {
            self.entries
                .entry(ancestor.clone())
                .or_insert_with(|| Entry::directory(ancestor));
        }
    }

    /// A file standing where one of `key`'s ancestor directories would go
    fn file_ancestor(&self, key: &str) -> Option<String> {
        path::ancestors(key)
            .iter()
            .map(|dir| path::to_file_form(dir))
            .find(|file| self.entries.get(file).is_some_and(Entry::is_file))
    }

    /// Existing key that `key` cannot coexist with
    fn clash(&self, key: &str, kind: EntryKind) -> Option<String> {
        let other = match kind {
            EntryKind::File => format!("{}{}", key, SEPARATOR),
            EntryKind::Directory => path::to_file_form(key),
        };
        if self.entries.contains_key(&other) {
            return Some(other);
        }
        self.file_ancestor(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Iterate entries in canonical path order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Sorted, deduplicated names of the immediate children of a directory
    ///
    /// Unknown directories yield an empty list.
    pub fn list(&self, dir: &str) -> Vec<String> {
        let prefix = if path::is_dir_form(dir) {
            dir.to_string()
        } else {
            format!("{}{}", dir, SEPARATOR)
        };

        let mut names = BTreeSet::new();

        let children = self
            .entries
            .range::<str, _>((Bound::Excluded(prefix.as_str()), Bound::Unbounded))
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(&prefix));

        for key in children {
            if let Some(name) = key[prefix.len()..].split(SEPARATOR).next() {
                if !name.is_empty() {
                    names.insert(name.to_string());
                }
            }
        }

        names.into_iter().collect()
    }

    /// Entry at an exact canonical path
    pub fn lookup(&self, path: &str) -> Result<&Entry> {
        self.entries
            .get(path)
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    /// Resolve a raw user path against `cwd`, trying a file then a directory
    pub fn locate(&self, raw: &str, cwd: &str) -> Result<&Entry> {
        let file_key = path::resolve_file(raw, cwd);
        if let Some(entry) = self.entries.get(&file_key) {
            return Ok(entry);
        }

        let dir_key = path::resolve_dir(raw, cwd);
        self.entries
            .get(&dir_key)
            .ok_or(FsError::NotFound(file_key))
    }

    /// Resolve a raw user path that must name a file
    pub fn locate_file(&self, raw: &str, cwd: &str) -> Result<&Entry> {
        let entry = self.locate(raw, cwd)?;
        if entry.is_dir() {
            return Err(FsError::NotAFile(entry.path().to_string()));
        }
        Ok(entry)
    }

    /// Move the entry at `source` to `destination`
    ///
    /// `source` is an exact key. `destination` is a canonical path in file
    /// form; when it names an existing directory the entry moves inside it.
    /// Directories carry their whole subtree along and missing destination
    /// parents are synthesized. Returns the new key of the moved entry.
    pub fn relocate(&mut self, source: &str, destination: &str) -> Result<String> {
        let kind = self.lookup(source)?.kind();

        if source == ROOT {
            return Err(FsError::InvalidOperation("cannot move the root directory".into()));
        }

        let target = self.target_key(source, destination, kind);
        if target == source {
            return Ok(target);
        }
        if let Some(file) = self.file_ancestor(&target) {
            return Err(FsError::NotADirectory(file));
        }

        match kind {
            EntryKind::File => {
                let as_dir = format!("{}{}", target, SEPARATOR);
                if self.entries.contains_key(&as_dir) {
                    return Err(FsError::InvalidOperation(format!(
                        "cannot overwrite directory {} with a file",
                        as_dir
                    )));
                }

                let mut entry = self
                    .entries
                    .remove(source)
                    .ok_or_else(|| FsError::NotFound(source.to_string()))?;
                entry.path = target.clone();
                self.insert(entry);
            }
            EntryKind::Directory => {
                if target.starts_with(source) {
                    return Err(FsError::InvalidOperation(format!(
                        "cannot move {} into itself",
                        source
                    )));
                }
                if self.entries.contains_key(&target)
                    || self.entries.contains_key(&path::to_file_form(&target))
                {
                    return Err(FsError::InvalidOperation(format!(
                        "destination {} already exists",
                        target
                    )));
                }

                let subtree: Vec<String> = self
                    .entries
                    .range::<str, _>((Bound::Included(source), Bound::Unbounded))
                    .map(|(key, _)| key)
                    .take_while(|key| key.starts_with(source))
                    .cloned()
                    .collect();

                for key in subtree {
                    if let Some(mut entry) = self.entries.remove(&key) {
                        entry.path = format!("{}{}", target, &key[source.len()..]);
                        self.insert(entry);
                    }
                }
            }
        }

        tracing::debug!("Moved {} -> {}", source, target);
        Ok(target)
    }

    /// Final key for a move, following existing destination directories
    fn target_key(&self, source: &str, destination: &str, kind: EntryKind) -> String {
        let destination_dir = if destination == ROOT {
            ROOT.to_string()
        } else {
            format!("{}{}", destination, SEPARATOR)
        };

        let base = if self.entries.contains_key(&destination_dir) && destination_dir != source {
            format!("{}{}", destination_dir, path::file_name(source))
        } else {
            destination.to_string()
        };

        match kind {
            EntryKind::File => base,
            EntryKind::Directory => format!("{}{}", base, SEPARATOR),
        }
    }
}

impl Default for VfsIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, kind: EntryKind, ordinal: usize) -> ArchiveMember {
        ArchiveMember {
            name: name.to_string(),
            kind,
            size: 0,
            handle: ContentHandle::for_test(ordinal),
        }
    }

    fn sample() -> VfsIndex {
        VfsIndex::build(vec![
            member("file1.txt", EntryKind::File, 0),
            member("dir1/", EntryKind::Directory, 1),
            member("dir1/file2.txt", EntryKind::File, 2),
            member("dir1/dir2/file3.txt", EntryKind::File, 3),
        ])
    }

    #[test]
    fn test_build_keys() {
        let index = sample();
        assert!(index.lookup("/").unwrap().is_dir());
        assert!(index.lookup("/file1.txt").unwrap().is_file());
        assert!(index.lookup("/dir1/").unwrap().is_dir());
        assert!(index.lookup("/dir1/file2.txt").unwrap().is_file());
        assert!(matches!(index.lookup("/dir1"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_implied_directories() {
        let index = sample();
        let dir2 = index.lookup("/dir1/dir2/").unwrap();
        assert!(dir2.is_dir());
        assert_eq!(dir2.name(), "dir2");
        assert!(dir2.content().is_none());
    }

    #[test]
    fn test_list_root() {
        let index = sample();
        assert_eq!(index.list("/"), vec!["dir1", "file1.txt"]);
    }

    #[test]
    fn test_list_children_once_sorted() {
        let index = sample();
        assert_eq!(index.list("/dir1/"), vec!["dir2", "file2.txt"]);
        assert_eq!(index.list("/dir1"), vec!["dir2", "file2.txt"]);

        for entry in index.iter().filter(|e| e.is_dir()) {
            let names = index.list(entry.path());
            let mut sorted = names.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(names, sorted);
            assert!(!names.iter().any(|n| n.is_empty() || n == entry.name()));
        }
    }

    #[test]
    fn test_list_unknown_is_empty() {
        let index = sample();
        assert!(index.list("/nowhere/").is_empty());
        assert!(VfsIndex::new().list("/").is_empty());
    }

    #[test]
    fn test_list_sibling_prefix_not_mixed() {
        let index = VfsIndex::build(vec![
            member("dir/a.txt", EntryKind::File, 0),
            member("dir-extra/b.txt", EntryKind::File, 1),
        ]);
        assert_eq!(index.list("/dir/"), vec!["a.txt"]);
    }

    #[test]
    fn test_duplicate_last_wins() {
        let index = VfsIndex::build(vec![
            member("a.txt", EntryKind::File, 0),
            member("a.txt", EntryKind::File, 7),
        ]);
        let entry = index.lookup("/a.txt").unwrap();
        assert_eq!(entry.content(), Some(&ContentHandle::for_test(7)));
    }

    #[test]
    fn test_locate() {
        let index = sample();
        assert!(index.locate("file2.txt", "/dir1/").unwrap().is_file());
        assert!(index.locate("dir2", "/dir1/").unwrap().is_dir());
        assert!(index.locate("/dir1/", "/").unwrap().is_dir());
        assert!(matches!(index.locate("ghost", "/"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_locate_file() {
        let index = sample();
        assert_eq!(index.locate_file("../file1.txt", "/dir1/").unwrap().path(), "/file1.txt");
        assert!(matches!(
            index.locate_file("dir2", "/dir1/"),
            Err(FsError::NotAFile(ref p)) if p == "/dir1/dir2/"
        ));
        assert!(matches!(index.locate_file("ghost", "/"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_relocate_file() {
        let mut index = sample();
        let original = index.lookup("/file1.txt").unwrap().clone();

        let target = index
            .relocate("/file1.txt", "/dir1/file1_renamed.txt")
            .unwrap();
        assert_eq!(target, "/dir1/file1_renamed.txt");

        let moved = index.lookup("/dir1/file1_renamed.txt").unwrap();
        assert_eq!(moved.content(), original.content());
        assert_eq!(moved.kind(), EntryKind::File);
        assert!(matches!(index.lookup("/file1.txt"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_relocate_missing_source() {
        let mut index = sample();
        assert!(matches!(
            index.relocate("/ghost.txt", "/x.txt"),
            Err(FsError::NotFound(_))
        ));
    }

    #[test]
    fn test_relocate_into_existing_dir() {
        let mut index = sample();
        let target = index.relocate("/file1.txt", "/dir1").unwrap();
        assert_eq!(target, "/dir1/file1.txt");
        assert_eq!(index.list("/dir1/"), vec!["dir2", "file1.txt", "file2.txt"]);
    }

    #[test]
    fn test_relocate_creates_parents() {
        let mut index = sample();
        index.relocate("/file1.txt", "/new/deep/file.txt").unwrap();
        assert!(index.lookup("/new/").unwrap().is_dir());
        assert!(index.lookup("/new/deep/").unwrap().is_dir());
        assert_eq!(index.list("/new/deep/"), vec!["file.txt"]);
    }

    #[test]
    fn test_relocate_directory_subtree() {
        let mut index = sample();
        let target = index.relocate("/dir1/", "/moved").unwrap();
        assert_eq!(target, "/moved/");
        assert!(index.lookup("/moved/file2.txt").unwrap().is_file());
        assert!(index.lookup("/moved/dir2/file3.txt").unwrap().is_file());
        assert!(index.lookup("/dir1/").is_err());
        assert!(index.lookup("/dir1/file2.txt").is_err());
        assert_eq!(index.list("/"), vec!["file1.txt", "moved"]);
    }

    #[test]
    fn test_relocate_rejects_bad_moves() {
        let mut index = sample();
        assert!(matches!(
            index.relocate("/", "/x"),
            Err(FsError::InvalidOperation(_))
        ));
        assert!(matches!(
            index.relocate("/dir1/", "/dir1/dir2/inner"),
            Err(FsError::InvalidOperation(_))
        ));
        assert!(matches!(
            index.relocate("/dir1/", "/file1.txt"),
            Err(FsError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_relocate_file_replaces_file() {
        let mut index = sample();
        index.relocate("/file1.txt", "/dir1/file2.txt").unwrap();
        let entry = index.lookup("/dir1/file2.txt").unwrap();
        assert_eq!(entry.content(), Some(&ContentHandle::for_test(0)));
        assert_eq!(index.list("/"), vec!["dir1"]);
    }

    #[test]
    fn test_relocate_through_file_rejected() {
        let mut index = sample();
        let err = index
            .relocate("/dir1/file2.txt", "/file1.txt/x.txt")
            .unwrap_err();
        assert!(matches!(err, FsError::NotADirectory(ref p) if p == "/file1.txt"));

        // Nothing changed
        assert!(index.lookup("/dir1/file2.txt").unwrap().is_file());
        assert!(index.lookup("/file1.txt/").is_err());
        assert!(index.lookup("/file1.txt/x.txt").is_err());

        assert!(matches!(
            index.relocate("/dir1/", "/file1.txt/nested"),
            Err(FsError::NotADirectory(_))
        ));
        assert!(index.lookup("/dir1/dir2/file3.txt").is_ok());
    }

    #[test]
    fn test_build_skips_file_directory_clash() {
        let index = VfsIndex::build(vec![
            member("a", EntryKind::File, 0),
            member("a/b.txt", EntryKind::File, 1),
            member("c/d.txt", EntryKind::File, 2),
            member("c", EntryKind::File, 3),
            member("e", EntryKind::File, 4),
            member("e/", EntryKind::Directory, 5),
        ]);

        assert!(index.lookup("/a").unwrap().is_file());
        assert!(index.lookup("/a/").is_err());
        assert!(index.lookup("/c/").unwrap().is_dir());
        assert!(index.lookup("/c").is_err());
        assert!(index.lookup("/e").unwrap().is_file());
        assert!(index.lookup("/e/").is_err());
        assert_eq!(index.list("/"), vec!["a", "c", "e"]);
    }

    #[test]
    fn test_relocate_same_place_is_noop() {
        let mut index = sample();
        let before = index.len();
        assert_eq!(index.relocate("/file1.txt", "/file1.txt").unwrap(), "/file1.txt");
        assert_eq!(index.len(), before);
    }
}
