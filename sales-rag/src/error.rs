//! Error types for the `sales-rag` crate.

use thiserror::Error;

/// Errors that can occur while preparing, indexing, or querying sales data.
#[derive(Debug, Error)]
pub enum RagError {
    /// A record in the source dataset could not be parsed.
    #[error("Dataset error (line {line}): {message}")]
    Dataset {
        /// The 1-based line of the offending record, counting the header.
        line: u64,
        /// A description of the failure.
        message: String,
    },

    /// Document preparation produced nothing to index.
    #[error("no documents to index: the dataset is missing or has no rows")]
    EmptyDataset,

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The persisted index is unusable.
    #[error("Index error: {0}")]
    Index(String),

    /// The language model failed to produce an answer.
    #[error("Model error ({provider}): {message}")]
    Model {
        /// The chat model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The question was empty after trimming whitespace.
    #[error("question must not be empty")]
    EmptyQuestion,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A convenience result type for sales RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
