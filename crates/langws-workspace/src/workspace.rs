//! Workspace initialization
//!
//! [`WorkspaceInitializer`] turns a set of host-supplied [`WorkspaceFolder`]s into
//! loaded documents and hands them to the build stage in one call:
//!
//! 1. build the inclusion filter from the registered languages,
//! 2. resolve each folder's starting location,
//! 3. walk every root concurrently and flatten the results in folder order,
//! 4. get or create a [`Document`] for each collected location,
//! 5. let the additional-documents hook append its own documents,
//! 6. run [`DocumentBuilder::build`] once over the full list.
//!
//! The behavior at steps 1, 2 and 5 is supplied by [`WorkspaceHooks`].

use std::fmt;
use std::io;
use std::sync::Arc;

use camino::Utf8Path;
use futures::future;
use futures::future::BoxFuture;
use futures::FutureExt;
use langws_source::Location;
use langws_source::LocationError;
use rustc_hash::FxHashSet;
use tracing::instrument;

use crate::builder::DocumentBuilder;
use crate::document::Document;
use crate::document::DocumentStore;
use crate::error::WorkspaceError;
use crate::fs::Entry;
use crate::fs::FileSystem;
use crate::language::FileExtensionSet;
use crate::language::LanguageRegistry;
use crate::walk::traverse;
use crate::walk::InclusionFilter;

/// Directory names never descended into by the default inclusion filter.
pub const EXCLUDED_DIRECTORIES: &[&str] = &["node_modules", "out"];

/// A project root supplied by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub uri: Location,
    pub name: String,
}

impl WorkspaceFolder {
    #[must_use]
    pub fn new(uri: Location, name: impl Into<String>) -> Self {
        Self {
            uri,
            name: name.into(),
        }
    }

    /// Folder for an absolute path, named after its final component.
    pub fn from_path(path: &Utf8Path) -> Result<Self, LocationError> {
        let uri = Location::from_path(path)?;
        let name = uri.name().unwrap_or_else(|| uri.to_string());
        Ok(Self { uri, name })
    }
}

/// Accumulates the documents handed to the build step.
///
/// Traversal results are pushed first; the additional-documents hook appends
/// after them through the same collector.
pub struct DocumentCollector {
    store: Arc<dyn DocumentStore>,
    documents: Vec<Document>,
}

impl DocumentCollector {
    fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            documents: Vec::new(),
        }
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Get or create the document at `location` and append it.
    pub async fn add_location(&mut self, location: &Location) -> io::Result<Document> {
        let document = self.store.get_or_create_document(location).await?;
        self.documents.push(document.clone());
        Ok(document)
    }

    /// Append a document whose text does not come from storage.
    pub fn add_text(&mut self, location: Location, text: impl Into<String>) -> Document {
        let document = self.store.get_or_create_with_text(location, text.into());
        self.documents.push(document.clone());
        document
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}

type RootFolderFn = dyn Fn(&WorkspaceFolder) -> Location + Send + Sync;
type AdditionalDocumentsFn = dyn for<'a> Fn(
        &'a [WorkspaceFolder],
        &'a mut DocumentCollector,
    ) -> BoxFuture<'a, Result<(), WorkspaceError>>
    + Send
    + Sync;
type IncludeNodeFn = dyn Fn(&Entry, &FileExtensionSet) -> bool + Send + Sync;

/// The three points where a language implementation specializes initialization.
///
/// - `root_folder`: where traversal of a folder starts. Defaults to the folder itself.
/// - `additional_documents`: contributes documents traversal cannot find. Defaults to none.
/// - `include_node`: the inclusion filter. Defaults to [`default_include_node`]
///   over [`EXCLUDED_DIRECTORIES`].
#[derive(Clone)]
pub struct WorkspaceHooks {
    root_folder: Arc<RootFolderFn>,
    additional_documents: Arc<AdditionalDocumentsFn>,
    include_node: Arc<IncludeNodeFn>,
}

impl Default for WorkspaceHooks {
    fn default() -> Self {
        Self {
            root_folder: Arc::new(folder_root),
            additional_documents: Arc::new(no_additional_documents),
            include_node: Arc::new(excluding(Vec::new())),
        }
    }
}

impl fmt::Debug for WorkspaceHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceHooks").finish_non_exhaustive()
    }
}

impl WorkspaceHooks {
    #[must_use]
    pub fn with_root_folder<F>(mut self, root_folder: F) -> Self
    where
        F: Fn(&WorkspaceFolder) -> Location + Send + Sync + 'static,
    {
        self.root_folder = Arc::new(root_folder);
        self
    }

    /// Install a hook that appends documents after traversal.
    ///
    /// The hook returns a boxed future so it can read storage without blocking.
    #[must_use]
    pub fn with_additional_documents<F>(mut self, additional_documents: F) -> Self
    where
        F: for<'a> Fn(
                &'a [WorkspaceFolder],
                &'a mut DocumentCollector,
            ) -> BoxFuture<'a, Result<(), WorkspaceError>>
            + Send
            + Sync
            + 'static,
    {
        self.additional_documents = Arc::new(additional_documents);
        self
    }

    #[must_use]
    pub fn with_include_node<F>(mut self, include_node: F) -> Self
    where
        F: Fn(&Entry, &FileExtensionSet) -> bool + Send + Sync + 'static,
    {
        self.include_node = Arc::new(include_node);
        self
    }

    /// Use the default inclusion filter, also skipping directories named in `names`.
    ///
    /// Replaces any predicate installed with [`WorkspaceHooks::with_include_node`].
    #[must_use]
    pub fn with_excluded_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_node = Arc::new(excluding(names.into_iter().map(Into::into).collect()));
        self
    }

    #[must_use]
    pub fn root_folder(&self, folder: &WorkspaceFolder) -> Location {
        (self.root_folder)(folder)
    }

    pub fn additional_documents<'a>(
        &self,
        folders: &'a [WorkspaceFolder],
        collector: &'a mut DocumentCollector,
    ) -> BoxFuture<'a, Result<(), WorkspaceError>> {
        (self.additional_documents)(folders, collector)
    }

    #[must_use]
    pub fn include_node(&self, entry: &Entry, extensions: &FileExtensionSet) -> bool {
        (self.include_node)(entry, extensions)
    }
}

fn folder_root(folder: &WorkspaceFolder) -> Location {
    folder.uri.clone()
}

fn no_additional_documents<'a>(
    _folders: &'a [WorkspaceFolder],
    _collector: &'a mut DocumentCollector,
) -> BoxFuture<'a, Result<(), WorkspaceError>> {
    future::ok(()).boxed()
}

fn excluding(
    extra: Vec<String>,
) -> impl Fn(&Entry, &FileExtensionSet) -> bool + Send + Sync + 'static {
    let excluded: FxHashSet<String> = EXCLUDED_DIRECTORIES
        .iter()
        .map(ToString::to_string)
        .chain(extra)
        .collect();
    move |entry, extensions| default_include_node(entry, extensions, &excluded)
}

/// Skip hidden and excluded directories; keep files with a recognized suffix.
#[must_use]
pub fn default_include_node(
    entry: &Entry,
    extensions: &FileExtensionSet,
    excluded_dirs: &FxHashSet<String>,
) -> bool {
    let name = entry.name();
    if entry.is_directory() {
        !name.starts_with('.') && !excluded_dirs.contains(name)
    } else {
        extensions.matches(name)
    }
}

/// Loads every document of a workspace and builds them together.
///
/// The initializer keeps no state between calls. Calling
/// [`WorkspaceInitializer::initialize_workspace`] again repeats the whole
/// sequence; the [`DocumentStore`] hands back existing documents for locations
/// it already knows.
pub struct WorkspaceInitializer {
    fs: Arc<dyn FileSystem>,
    languages: LanguageRegistry,
    documents: Arc<dyn DocumentStore>,
    builder: Arc<dyn DocumentBuilder>,
    hooks: WorkspaceHooks,
}

impl WorkspaceInitializer {
    #[must_use]
    pub fn new(
        fs: Arc<dyn FileSystem>,
        languages: LanguageRegistry,
        documents: Arc<dyn DocumentStore>,
        builder: Arc<dyn DocumentBuilder>,
    ) -> Self {
        Self {
            fs,
            languages,
            documents,
            builder,
            hooks: WorkspaceHooks::default(),
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: WorkspaceHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Discover, load and build every document in `folders`.
    ///
    /// Either every matching document is loaded and built, or the first error is
    /// returned and the build step never runs.
    #[instrument(skip_all, fields(folders = folders.len()))]
    pub async fn initialize_workspace(
        &self,
        folders: &[WorkspaceFolder],
    ) -> Result<(), WorkspaceError> {
        let extensions = self.languages.file_extensions();
        if extensions.is_empty() {
            tracing::warn!("No file extensions registered; only hook documents will be built");
        }

        let hooks = &self.hooks;
        let filter: &InclusionFilter<'_> =
            &|entry: &Entry| hooks.include_node(entry, &extensions);

        let roots: Vec<Location> = folders
            .iter()
            .map(|folder| hooks.root_folder(folder))
            .collect();

        let found = future::try_join_all(
            roots
                .iter()
                .map(|root| traverse(self.fs.as_ref(), root, Some(filter))),
        )
        .await?;

        let mut collector = DocumentCollector::new(self.documents.clone());
        for (root, locations) in roots.iter().zip(found) {
            tracing::debug!("Found {} documents under {root}", locations.len());
            for location in &locations {
                collector.add_location(location).await?;
            }
        }

        let discovered = collector.documents().len();
        hooks.additional_documents(folders, &mut collector).await?;
        let documents = collector.into_documents();

        tracing::info!(
            "Building {} documents ({} from hooks)",
            documents.len(),
            documents.len() - discovered
        );
        self.builder
            .build(documents)
            .await
            .map_err(WorkspaceError::Build)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::document::TextDocumentStore;
    use crate::fs::MemoryFileSystem;
    use crate::language::Language;

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[derive(Default)]
    struct RecordingBuilder {
        calls: Mutex<Vec<Vec<Document>>>,
    }

    #[async_trait]
    impl DocumentBuilder for RecordingBuilder {
        async fn build(&self, documents: Vec<Document>) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(documents);
            Ok(())
        }
    }

    struct FailingBuilder;

    #[async_trait]
    impl DocumentBuilder for FailingBuilder {
        async fn build(&self, _documents: Vec<Document>) -> anyhow::Result<()> {
            anyhow::bail!("link errors")
        }
    }

    fn setup(fs: MemoryFileSystem) -> (WorkspaceInitializer, Arc<RecordingBuilder>) {
        let fs: Arc<dyn FileSystem> = Arc::new(fs);
        let store = Arc::new(TextDocumentStore::new(fs.clone()));
        let builder = Arc::new(RecordingBuilder::default());
        let languages: LanguageRegistry = [Language::new("lang", [".lang"])].into_iter().collect();
        let initializer = WorkspaceInitializer::new(fs, languages, store, builder.clone());
        (initializer, builder)
    }

    mod include_node {
        use super::*;

        fn extensions() -> FileExtensionSet {
            [".lang"].into_iter().collect()
        }

        #[test]
        fn test_hidden_directory_rejected() {
            let hooks = WorkspaceHooks::default();
            let entry = Entry::directory(".git", loc("file:///ws"));
            assert!(!hooks.include_node(&entry, &extensions()));
        }

        #[test]
        fn test_excluded_directories_rejected() {
            let hooks = WorkspaceHooks::default();
            for name in EXCLUDED_DIRECTORIES {
                let entry = Entry::directory(*name, loc("file:///ws"));
                assert!(!hooks.include_node(&entry, &extensions()), "{name}");
            }
        }

        #[test]
        fn test_plain_directory_accepted() {
            let hooks = WorkspaceHooks::default();
            let entry = Entry::directory("src", loc("file:///ws"));
            assert!(hooks.include_node(&entry, &extensions()));
        }

        #[test]
        fn test_files_filtered_by_suffix() {
            let hooks = WorkspaceHooks::default();
            assert!(hooks.include_node(&Entry::file("a.lang", loc("file:///ws")), &extensions()));
            assert!(!hooks.include_node(&Entry::file("b.txt", loc("file:///ws")), &extensions()));
        }

        #[test]
        fn test_hidden_file_with_known_suffix_accepted() {
            let hooks = WorkspaceHooks::default();
            let entry = Entry::file(".config.lang", loc("file:///ws"));
            assert!(hooks.include_node(&entry, &extensions()));
        }

        #[test]
        fn test_extra_excluded_dirs_keep_defaults() {
            let hooks = WorkspaceHooks::default().with_excluded_dirs(["target"]);
            let target = Entry::directory("target", loc("file:///ws"));
            let node_modules = Entry::directory("node_modules", loc("file:///ws"));
            assert!(!hooks.include_node(&target, &extensions()));
            assert!(!hooks.include_node(&node_modules, &extensions()));
        }
    }

    #[tokio::test]
    async fn test_root_folder_redirects_traversal() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file(loc("file:///ws/top.lang"), "");
        fs.add_file(loc("file:///ws/src/inner.lang"), "");
        let (initializer, builder) = setup(fs);
        let initializer = initializer.with_hooks(
            WorkspaceHooks::default().with_root_folder(|folder| folder.uri.join("src")),
        );

        initializer
            .initialize_workspace(&[WorkspaceFolder::new(loc("file:///ws"), "ws")])
            .await
            .unwrap();

        let calls = builder.calls.lock().unwrap();
        let locations: Vec<&Location> = calls[0].iter().map(Document::location).collect();
        assert_eq!(locations, vec![&loc("file:///ws/src/inner.lang")]);
    }

    #[tokio::test]
    async fn test_custom_include_node_replaces_default() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file(loc("file:///ws/a.lang"), "");
        fs.add_file(loc("file:///ws/node_modules/b.lang"), "");
        let (initializer, builder) = setup(fs);
        let initializer = initializer
            .with_hooks(WorkspaceHooks::default().with_include_node(|entry, extensions| {
                entry.is_directory() || extensions.matches(entry.name())
            }));

        initializer
            .initialize_workspace(&[WorkspaceFolder::new(loc("file:///ws"), "ws")])
            .await
            .unwrap();

        assert_eq!(builder.calls.lock().unwrap()[0].len(), 2);
    }

    #[tokio::test]
    async fn test_hook_error_skips_build() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file(loc("file:///ws/a.lang"), "");
        let (initializer, builder) = setup(fs);
        let initializer =
            initializer.with_hooks(WorkspaceHooks::default().with_additional_documents(
                |_, _| {
                    async { Err(io::Error::new(io::ErrorKind::NotFound, "library missing").into()) }
                        .boxed()
                },
            ));

        let err = initializer
            .initialize_workspace(&[WorkspaceFolder::new(loc("file:///ws"), "ws")])
            .await
            .unwrap_err();

        assert!(matches!(err, WorkspaceError::Io(_)));
        assert!(builder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_build_failure_is_surfaced() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file(loc("file:///ws/a.lang"), "");
        let fs: Arc<dyn FileSystem> = Arc::new(fs);
        let store = Arc::new(TextDocumentStore::new(fs.clone()));
        let languages: LanguageRegistry = [Language::new("lang", [".lang"])].into_iter().collect();
        let initializer =
            WorkspaceInitializer::new(fs, languages, store, Arc::new(FailingBuilder));

        let err = initializer
            .initialize_workspace(&[WorkspaceFolder::new(loc("file:///ws"), "ws")])
            .await
            .unwrap_err();

        assert!(matches!(err, WorkspaceError::Build(_)));
        assert_eq!(err.to_string(), "link errors");
    }

    #[tokio::test]
    async fn test_no_folders_builds_empty_set_once() {
        let (initializer, builder) = setup(MemoryFileSystem::new());

        initializer.initialize_workspace(&[]).await.unwrap();

        let calls = builder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].is_empty());
    }

    #[test]
    fn test_folder_from_path_uses_last_component() {
        let folder = WorkspaceFolder::from_path(Utf8Path::new("/home/user/project")).unwrap();
        assert_eq!(folder.name, "project");
        assert_eq!(folder.uri, loc("file:///home/user/project"));
    }
}
