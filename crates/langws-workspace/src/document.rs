//! Loaded documents and the store that hands them out.
//!
//! A [`Document`] is a cheap, clonable handle. Its [`DocumentId`] is assigned
//! once per [`Location`] by the store and never changes, so repeated
//! initializations of the same workspace see the same identities.

use std::io;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use langws_source::Location;

use crate::fs::FileSystem;

/// Stable, compact identifier for documents across the subsystem.
///
/// [`DocumentId`] decouples document identity from URIs, providing efficient keys
/// for maps. Once assigned to a location, a [`DocumentId`] remains stable for the
/// lifetime of the store.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DocumentId(u32);

impl DocumentId {
    /// Create a [`DocumentId`] from a raw u32 value.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        DocumentId(raw)
    }
}

#[derive(Debug)]
struct DocumentInner {
    id: DocumentId,
    location: Location,
    text: String,
}

/// Handle to a loaded source document.
#[derive(Clone, Debug)]
pub struct Document(Arc<DocumentInner>);

impl Document {
    fn new(id: DocumentId, location: Location, text: String) -> Self {
        Self(Arc::new(DocumentInner { id, location, text }))
    }

    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.0.id
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.0.location
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.0.text
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.0.text.lines().count()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Document {}

/// Source of document handles.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return the document for `location`, loading it on first request.
    ///
    /// Calling this again for the same location returns the same document.
    async fn get_or_create_document(&self, location: &Location) -> io::Result<Document>;

    /// Return the document for `location`, creating it from `text` if the store
    /// has not seen the location yet. Used for documents that do not exist on disk.
    fn get_or_create_with_text(&self, location: Location, text: String) -> Document;

    fn get_document(&self, location: &Location) -> Option<Document>;
}

/// [`DocumentStore`] that loads text through a [`FileSystem`].
///
/// Text is read with [`FileSystem::read_file`] the first time a location is
/// requested and kept for the lifetime of the store. Two concurrent first
/// requests may both read; the first insert wins and both get that document.
pub struct TextDocumentStore {
    fs: Arc<dyn FileSystem>,
    documents: DashMap<Location, Document>,
    next_id: AtomicU32,
}

impl TextDocumentStore {
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            documents: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn allocate_id(&self) -> DocumentId {
        DocumentId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl DocumentStore for TextDocumentStore {
    async fn get_or_create_document(&self, location: &Location) -> io::Result<Document> {
        if let Some(document) = self.get_document(location) {
            return Ok(document);
        }

        let text = self.fs.read_file(location).await?;
        Ok(self.get_or_create_with_text(location.clone(), text))
    }

    fn get_or_create_with_text(&self, location: Location, text: String) -> Document {
        match self.documents.entry(location) {
            Entry::Occupied(occupied) => occupied.get().clone(),
            Entry::Vacant(vacant) => {
                let document = Document::new(self.allocate_id(), vacant.key().clone(), text);
                tracing::trace!("Created document {:?} for {}", document.id(), document.location());
                vacant.insert(document.clone());
                document
            }
        }
    }

    fn get_document(&self, location: &Location) -> Option<Document> {
        self.documents.get(location).map(|document| document.value().clone())
    }
}
