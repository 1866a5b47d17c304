//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{IndexRecord, SearchResult};
use crate::error::Result;

/// A storage backend for embedded documents with similarity search.
///
/// # Example
///
/// ```rust,ignore
/// use sales_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new(1536);
/// store.upsert(&records).await?;
/// let results = store.search(&query_embedding, 4).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert records, replacing any with the same id. Records must have
    /// embeddings of the store's dimensionality.
    async fn upsert(&self, records: &[IndexRecord]) -> Result<()>;

    /// Search for the `top_k` most similar records to the given embedding.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Number of stored records.
    async fn len(&self) -> usize;

    /// All stored records in insertion order.
    async fn records(&self) -> Vec<IndexRecord>;
}
