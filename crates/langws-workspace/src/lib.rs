mod builder;
mod document;
mod error;
mod fs;
mod language;
mod walk;
mod workspace;

pub use builder::DocumentBuilder;
pub use document::Document;
pub use document::DocumentId;
pub use document::DocumentStore;
pub use document::TextDocumentStore;
pub use error::WorkspaceError;
pub use fs::Entry;
pub use fs::EntryKind;
pub use fs::FileSystem;
pub use fs::MemoryFileSystem;
pub use fs::OsFileSystem;
pub use language::FileExtensionSet;
pub use language::Language;
pub use language::LanguageRegistry;
pub use walk::traverse;
pub use walk::InclusionFilter;
pub use workspace::default_include_node;
pub use workspace::DocumentCollector;
pub use workspace::WorkspaceFolder;
pub use workspace::WorkspaceHooks;
pub use workspace::WorkspaceInitializer;
pub use workspace::EXCLUDED_DIRECTORIES;
