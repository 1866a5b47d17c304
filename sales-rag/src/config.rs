//! Configuration for the sales RAG pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Upper bound for [`SalesRagConfig::top_k`].
pub const MAX_TOP_K: usize = 50;

/// Upper bound for [`SalesRagConfig::embed_batch_size`]; the OpenAI
/// embeddings endpoint rejects larger inputs.
pub const MAX_EMBED_BATCH_SIZE: usize = 2048;

/// Configuration parameters for building the index and answering questions.
///
/// Deserialization fills missing fields with defaults and runs the same
/// validation as [`SalesRagConfigBuilder::build`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "UncheckedConfig")]
pub struct SalesRagConfig {
    /// Path of the CSV dataset read when the index is built.
    pub dataset_path: PathBuf,
    /// Directory holding the persisted index.
    pub index_dir: PathBuf,
    /// Number of documents retrieved per question.
    pub top_k: usize,
    /// Minimum cosine similarity for retrieved documents.
    pub similarity_threshold: f32,
    /// Number of documents sent per embedding request.
    pub embed_batch_size: usize,
    /// Embedding model name, recorded in the index manifest.
    pub embedding_model: String,
    /// Chat completion model name.
    pub chat_model: String,
    /// Sampling temperature for the chat model.
    pub temperature: f32,
}

impl Default for SalesRagConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("Walmart_Sales.csv"),
            index_dir: PathBuf::from("sales_index"),
            top_k: 4,
            similarity_threshold: 0.0,
            embed_batch_size: 500,
            embedding_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
        }
    }
}

impl SalesRagConfig {
    /// Create a new builder for constructing a [`SalesRagConfig`].
    pub fn builder() -> SalesRagConfigBuilder {
        SalesRagConfigBuilder::default()
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct UncheckedConfig {
    dataset_path: PathBuf,
    index_dir: PathBuf,
    top_k: usize,
    similarity_threshold: f32,
    embed_batch_size: usize,
    embedding_model: String,
    chat_model: String,
    temperature: f32,
}

impl Default for UncheckedConfig {
    fn default() -> Self {
        let defaults = SalesRagConfig::default();
        Self {
            dataset_path: defaults.dataset_path,
            index_dir: defaults.index_dir,
            top_k: defaults.top_k,
            similarity_threshold: defaults.similarity_threshold,
            embed_batch_size: defaults.embed_batch_size,
            embedding_model: defaults.embedding_model,
            chat_model: defaults.chat_model,
            temperature: defaults.temperature,
        }
    }
}

impl TryFrom<UncheckedConfig> for SalesRagConfig {
    type Error = RagError;

    fn try_from(raw: UncheckedConfig) -> Result<Self> {
        SalesRagConfig::builder()
            .dataset_path(raw.dataset_path)
            .index_dir(raw.index_dir)
            .top_k(raw.top_k)
            .similarity_threshold(raw.similarity_threshold)
            .embed_batch_size(raw.embed_batch_size)
            .embedding_model(raw.embedding_model)
            .chat_model(raw.chat_model)
            .temperature(raw.temperature)
            .build()
    }
}

/// Builder for constructing a validated [`SalesRagConfig`].
#[derive(Debug, Clone, Default)]
pub struct SalesRagConfigBuilder {
    config: SalesRagConfig,
}

impl SalesRagConfigBuilder {
    /// Set the dataset path.
    pub fn dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dataset_path = path.into();
        self
    }

    /// Set the directory of the persisted index.
    pub fn index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.index_dir = dir.into();
        self
    }

    /// Set the number of documents retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for retrieved documents.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Set the number of documents per embedding request.
    pub fn embed_batch_size(mut self, size: usize) -> Self {
        self.config.embed_batch_size = size;
        self
    }

    /// Set the embedding model name.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    /// Set the chat model name.
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    /// Set the chat model sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Build the [`SalesRagConfig`], validating that parameters are in range.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `top_k` is zero or greater than [`MAX_TOP_K`]
    /// - `similarity_threshold` is not within `-1.0..=1.0`
    /// - `embed_batch_size` is zero or greater than [`MAX_EMBED_BATCH_SIZE`]
    /// - a model name is empty
    /// - `temperature` is not within `0.0..=2.0`
    pub fn build(self) -> Result<SalesRagConfig> {
        let config = self.config;
        if config.top_k == 0 || config.top_k > MAX_TOP_K {
            return Err(RagError::Config(format!(
                "top_k ({}) must be between 1 and {MAX_TOP_K}",
                config.top_k
            )));
        }
        if !(-1.0..=1.0).contains(&config.similarity_threshold) {
            return Err(RagError::Config(format!(
                "similarity_threshold ({}) must be between -1.0 and 1.0",
                config.similarity_threshold
            )));
        }
        if config.embed_batch_size == 0 || config.embed_batch_size > MAX_EMBED_BATCH_SIZE {
            return Err(RagError::Config(format!(
                "embed_batch_size ({}) must be between 1 and {MAX_EMBED_BATCH_SIZE}",
                config.embed_batch_size
            )));
        }
        if config.embedding_model.trim().is_empty() {
            return Err(RagError::Config("embedding_model must not be empty".to_string()));
        }
        if config.chat_model.trim().is_empty() {
            return Err(RagError::Config("chat_model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(RagError::Config(format!(
                "temperature ({}) must be between 0.0 and 2.0",
                config.temperature
            )));
        }
        Ok(config)
    }
}
