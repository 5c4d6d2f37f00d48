//! File system abstraction following Ruff's pattern
//!
//! This module provides the [`FileSystem`] trait that abstracts reading files and
//! listing directories by [`Location`]. Traversal and document loading only ever
//! go through this trait, so the same code runs against the real disk
//! ([`OsFileSystem`]) or an in-memory tree ([`MemoryFileSystem`]).
//!
//! All text is decoded as UTF-8. Nothing is cached: every call hits storage.

use std::collections::BTreeMap;
use std::io;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use langws_source::Location;
use rustc_hash::FxHashMap;

/// Whether a directory entry is a file or a directory.
///
/// Other node kinds (symlinks, sockets, devices) never produce an [`Entry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// One immediate child returned by [`FileSystem::read_directory`].
///
/// The entry is unresolved: it carries the child's `name` and its `container`,
/// and [`Entry::location`] performs the join only when asked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    kind: EntryKind,
    name: String,
    container: Location,
}

impl Entry {
    #[must_use]
    pub fn new(kind: EntryKind, name: impl Into<String>, container: Location) -> Self {
        Self {
            kind,
            name: name.into(),
            container,
        }
    }

    #[must_use]
    pub fn file(name: impl Into<String>, container: Location) -> Self {
        Self::new(EntryKind::File, name, container)
    }

    #[must_use]
    pub fn directory(name: impl Into<String>, container: Location) -> Self {
        Self::new(EntryKind::Directory, name, container)
    }

    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn container(&self) -> &Location {
        &self.container
    }

    /// Resolve the entry's full location (`container` + `name`).
    #[must_use]
    pub fn location(&self) -> Location {
        self.container.join(&self.name)
    }
}

/// Trait for file system operations
///
/// This follows Ruff's pattern of abstracting file system operations behind a trait,
/// allowing different implementations for testing, in-memory operation, and real file access.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file.
    async fn read_file(&self, location: &Location) -> io::Result<String>;

    /// Read the entire contents of a file without suspending.
    fn read_file_sync(&self, location: &Location) -> io::Result<String>;

    /// List the immediate children of a directory.
    ///
    /// Every returned entry has `container == location`.
    async fn read_directory(&self, location: &Location) -> io::Result<Vec<Entry>>;
}

/// Standard file system implementation backed by `tokio::fs` and `std::fs`
///
/// Only `file://` locations are supported. Symbolic links are not followed: they
/// are neither files nor directories and are dropped from listings.
pub struct OsFileSystem;

fn location_to_path(location: &Location) -> io::Result<Utf8PathBuf> {
    location.to_path().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{location}' is not a file location"),
        )
    })
}

#[async_trait]
impl FileSystem for OsFileSystem {
    async fn read_file(&self, location: &Location) -> io::Result<String> {
        let path = location_to_path(location)?;
        tokio::fs::read_to_string(path).await
    }

    fn read_file_sync(&self, location: &Location) -> io::Result<String> {
        let path = location_to_path(location)?;
        std::fs::read_to_string(path)
    }

    async fn read_directory(&self, location: &Location) -> io::Result<Vec<Entry>> {
        let path = location_to_path(location)?;
        let mut reader = tokio::fs::read_dir(&path).await?;
        let mut entries = Vec::new();

        while let Some(dir_entry) = reader.next_entry().await? {
            let file_type = dir_entry.file_type().await?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                tracing::trace!("Skipping {:?}: not a file or directory", dir_entry.path());
                continue;
            };

            let Ok(name) = dir_entry.file_name().into_string() else {
                tracing::debug!("Skipping {:?}: name is not UTF-8", dir_entry.path());
                continue;
            };

            entries.push(Entry::new(kind, name, location.clone()));
        }

        Ok(entries)
    }
}

#[derive(Clone, Debug)]
enum Node {
    File(String),
    Directory,
    /// Anything a listing should drop, e.g. a symlink the provider does not resolve.
    Other,
}

/// In-memory file system
///
/// Directories are implicit: adding a file creates every ancestor. Listings
/// are returned in location order, which makes traversal results stable.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: BTreeMap<Location, Node>,
    failures: FxHashMap<Location, io::ErrorKind>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, location: Location, content: impl Into<String>) {
        self.add_ancestors(&location);
        self.nodes.insert(location, Node::File(content.into()));
    }

    pub fn add_directory(&mut self, location: Location) {
        self.add_ancestors(&location);
        self.nodes.insert(location, Node::Directory);
    }

    /// Add a node that is neither a file nor a directory.
    pub fn add_other(&mut self, location: Location) {
        self.add_ancestors(&location);
        self.nodes.insert(location, Node::Other);
    }

    /// Make every listing of `location` fail with `kind`.
    pub fn fail_directory(&mut self, location: Location, kind: io::ErrorKind) {
        self.failures.insert(location, kind);
    }

    fn add_ancestors(&mut self, location: &Location) {
        let mut parent = location.parent();
        while let Some(directory) = parent {
            parent = directory.parent();
            self.nodes.entry(directory).or_insert(Node::Directory);
        }
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn read_file(&self, location: &Location) -> io::Result<String> {
        self.read_file_sync(location)
    }

    fn read_file_sync(&self, location: &Location) -> io::Result<String> {
        match self.nodes.get(location) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Directory | Node::Other) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{location}' is not a file"),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{location}' not found"),
            )),
        }
    }

    async fn read_directory(&self, location: &Location) -> io::Result<Vec<Entry>> {
        if let Some(kind) = self.failures.get(location) {
            return Err(io::Error::new(
                *kind,
                format!("cannot list '{location}'"),
            ));
        }

        match self.nodes.get(location) {
            Some(Node::Directory) => {}
            Some(Node::File(_) | Node::Other) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("'{location}' is not a directory"),
                ))
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("'{location}' not found"),
                ))
            }
        }

        let entries = self
            .nodes
            .iter()
            .filter(|(child, _)| child.parent().as_ref() == Some(location))
            .filter_map(|(child, node)| {
                let kind = match node {
                    Node::File(_) => EntryKind::File,
                    Node::Directory => EntryKind::Directory,
                    Node::Other => return None,
                };
                Some(Entry::new(kind, child.name()?, location.clone()))
            })
            .collect();

        Ok(entries)
    }
}
