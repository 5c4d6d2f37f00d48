use async_trait::async_trait;

use crate::document::Document;

/// The build stage that indexes, links and validates a set of documents.
///
/// Workspace initialization calls [`DocumentBuilder::build`] exactly once with
/// every document it loaded, so the builder always sees the complete set.
#[async_trait]
pub trait DocumentBuilder: Send + Sync {
    async fn build(&self, documents: Vec<Document>) -> anyhow::Result<()>;
}
