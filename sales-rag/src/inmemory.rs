//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps every record in a `Vec` behind a
//! `tokio::sync::RwLock` and scores the whole set on each search. A weekly
//! sales dataset is a few thousand rows, so an exact scan is fast enough.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexRecord, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

#[derive(Debug, Default)]
struct Records {
    items: Vec<IndexRecord>,
    positions: HashMap<String, usize>,
}

/// An in-memory vector store using cosine similarity for search.
///
/// Records keep their insertion order; upserting an existing id replaces the
/// record in place.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    dimensions: usize,
    records: RwLock<Records>,
}

impl InMemoryVectorStore {
    /// Create a new empty store for embeddings of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, records: RwLock::new(Records::default()) }
    }

    /// Dimensionality accepted by this store.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, records: &[IndexRecord]) -> Result<()> {
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != self.dimensions) {
            return Err(RagError::VectorStore {
                backend: "InMemory".to_string(),
                message: format!(
                    "record '{}' has {} dimensions, expected {}",
                    bad.id,
                    bad.embedding.len(),
                    self.dimensions
                ),
            });
        }

        let mut guard = self.records.write().await;
        let store = &mut *guard;
        for record in records {
            match store.positions.get(&record.id) {
                Some(&position) => store.items[position] = record.clone(),
                None => {
                    let position = store.items.len();
                    store.positions.insert(record.id.clone(), position);
                    store.items.push(record.clone());
                }
            }
        }
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if embedding.len() != self.dimensions {
            return Err(RagError::VectorStore {
                backend: "InMemory".to_string(),
                message: format!(
                    "query has {} dimensions, expected {}",
                    embedding.len(),
                    self.dimensions
                ),
            });
        }

        let store = self.records.read().await;
        let mut scored: Vec<SearchResult> = store
            .items
            .iter()
            .map(|record| SearchResult {
                record: record.clone(),
                score: cosine_similarity(&record.embedding, embedding),
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn len(&self) -> usize {
        self.records.read().await.items.len()
    }

    async fn records(&self) -> Vec<IndexRecord> {
        self.records.read().await.items.clone()
    }
}
