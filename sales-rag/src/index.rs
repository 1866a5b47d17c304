//! Index manager: loads the persisted index or builds it once.
//!
//! [`IndexManager::obtain_index`] is the single entry point. A complete
//! index on disk is loaded without touching the embedding service; anything
//! else triggers a full build from the dataset.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sales_rag::{IndexManager, SalesRagConfig};
//!
//! let manager = IndexManager::new(SalesRagConfig::default(), Arc::new(embedder));
//! let index = manager.obtain_index().await?;
//! println!("{} documents indexed", index.document_count());
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::SalesRagConfig;
use crate::document::{Document, IndexRecord, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::inmemory::InMemoryVectorStore;
use crate::loader;
use crate::persist::{self, FORMAT_VERSION, IndexManifest, IndexState};
use crate::vectorstore::VectorStore;

/// A loaded, read-only similarity index over the sales documents.
pub struct SalesIndex {
    manifest: IndexManifest,
    store: Arc<dyn VectorStore>,
}

impl SalesIndex {
    /// Wrap an already populated store.
    pub fn new(manifest: IndexManifest, store: Arc<dyn VectorStore>) -> Self {
        Self { manifest, store }
    }

    /// The manifest the index was built or loaded with.
    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.manifest.document_count
    }

    /// Embedding model the stored vectors came from.
    pub fn embedding_model(&self) -> &str {
        &self.manifest.embedding_model
    }

    /// Return the `top_k` records most similar to `embedding`.
    pub async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        self.store.search(embedding, top_k).await
    }
}

impl std::fmt::Debug for SalesIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesIndex").field("manifest", &self.manifest).finish_non_exhaustive()
    }
}

/// Builds the index on first use and loads it afterwards.
pub struct IndexManager {
    config: SalesRagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl IndexManager {
    /// Create a manager for the dataset and index directory in `config`.
    pub fn new(config: SalesRagConfig, embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { config, embedding_provider }
    }

    /// Directory holding the persisted index.
    pub fn index_dir(&self) -> &Path {
        &self.config.index_dir
    }

    /// Whether a complete index is already persisted.
    pub async fn index_exists(&self) -> Result<bool> {
        Ok(matches!(persist::probe(&self.config.index_dir).await?, IndexState::Complete(_)))
    }

    /// Load the persisted index, or build and persist it if there is none.
    ///
    /// # Errors
    ///
    /// - [`RagError::Index`] if a complete index exists but was built with a
    ///   different format or embedding model, or if the index directory holds
    ///   files that no build wrote. Such a directory is never modified.
    /// - [`RagError::EmptyDataset`] if a build finds no documents.
    /// - [`RagError::Embedding`] if the embedding service fails during a
    ///   build. Nothing is persisted in that case.
    pub async fn obtain_index(&self) -> Result<SalesIndex> {
        let dir = &self.config.index_dir;
        match persist::probe(dir).await? {
            IndexState::Complete(manifest) => self.load(manifest).await,
            IndexState::Incomplete => {
                warn!(path = %dir.display(), "found an interrupted index build; rebuilding");
                persist::remove(dir).await?;
                self.build().await
            }
            IndexState::Missing => {
                info!(path = %dir.display(), "no persisted index; building a new one");
                self.build().await
            }
            IndexState::Foreign => Err(RagError::Index(format!(
                "{} is not a sales-rag index; refusing to overwrite it",
                dir.display()
            ))),
        }
    }

    async fn load(&self, manifest: IndexManifest) -> Result<SalesIndex> {
        let dir = &self.config.index_dir;
        if manifest.format_version != FORMAT_VERSION {
            return Err(RagError::Index(format!(
                "{} uses format version {} (expected {FORMAT_VERSION}); delete it to rebuild",
                dir.display(),
                manifest.format_version
            )));
        }
        let model = self.embedding_provider.model();
        if manifest.embedding_model != model {
            return Err(RagError::Index(format!(
                "{} was built with embedding model '{}' but '{model}' is configured; \
                 delete it to rebuild",
                dir.display(),
                manifest.embedding_model
            )));
        }

        let records = persist::read_records(dir, &manifest).await?;
        let store = InMemoryVectorStore::new(manifest.dimensions);
        store.upsert(&records).await?;
        info!(path = %dir.display(), document_count = records.len(), "loaded persisted index");
        Ok(SalesIndex::new(manifest, Arc::new(store)))
    }

    async fn build(&self) -> Result<SalesIndex> {
        let documents = loader::prepare_documents(&self.config.dataset_path)?;
        if documents.is_empty() {
            return Err(RagError::EmptyDataset);
        }

        let records = self.embed_documents(documents).await?;
        let dimensions = records[0].embedding.len();
        let store = InMemoryVectorStore::new(dimensions);
        store.upsert(&records).await?;

        let manifest =
            IndexManifest::new(self.embedding_provider.model(), dimensions, records.len());
        persist::write_index(&self.config.index_dir, &manifest, &records).await?;
        info!(
            path = %self.config.index_dir.display(),
            document_count = records.len(),
            dimensions,
            "built and persisted new index"
        );
        Ok(SalesIndex::new(manifest, Arc::new(store)))
    }

    async fn embed_documents(&self, documents: Vec<Document>) -> Result<Vec<IndexRecord>> {
        let model = self.embedding_provider.model();
        let batch_size = self.config.embed_batch_size;
        let batch_count = documents.len().div_ceil(batch_size);
        let mut records = Vec::with_capacity(documents.len());
        let mut dimensions: Option<usize> = None;

        for (batch_index, batch) in documents.chunks(batch_size).enumerate() {
            let texts: Vec<&str> = batch.iter().map(|d| d.text.as_str()).collect();
            let embeddings =
                self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
                    error!(batch = batch_index + 1, error = %e, "embedding failed during build");
                    e
                })?;

            if embeddings.len() != batch.len() {
                return Err(RagError::Embedding {
                    provider: model.to_string(),
                    message: format!(
                        "expected {} embeddings, got {}",
                        batch.len(),
                        embeddings.len()
                    ),
                });
            }

            for (document, embedding) in batch.iter().zip(embeddings) {
                let expected = *dimensions.get_or_insert(embedding.len());
                if embedding.is_empty() || embedding.len() != expected {
                    return Err(RagError::Embedding {
                        provider: model.to_string(),
                        message: format!(
                            "embedding for '{}' has {} dimensions, expected {expected}",
                            document.id,
                            embedding.len()
                        ),
                    });
                }
                records.push(IndexRecord::new(document.clone(), embedding));
            }
            info!(batch = batch_index + 1, batch_count, "embedded batch");
        }

        let advertised = self.embedding_provider.dimensions();
        if let Some(returned) = dimensions.filter(|&dims| dims != advertised) {
            warn!(
                returned,
                advertised,
                "embedding dimensions differ from the provider's advertised size"
            );
        }
        Ok(records)
    }
}
