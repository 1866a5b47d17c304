//! # sales-rag
//!
//! Retrieval-augmented question answering over weekly retail sales data.
//!
//! ## Overview
//!
//! Each CSV row is rendered as one English sentence, embedded, and stored in
//! a persisted index. Questions are embedded the same way; the closest
//! sentences are handed to a chat model as context.
//!
//! - [`loader`] - CSV rows to [`Document`]s
//! - [`IndexManager`] - build the index once, load it afterwards
//! - [`SalesAssistant`] - retrieve and answer, recording a [`ChatSession`]
//! - [`EmbeddingProvider`] / [`ChatModel`] - service seams; the `openai`
//!   feature provides REST implementations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sales_rag::openai::{OpenAIChatModel, OpenAIEmbeddingProvider};
//! use sales_rag::{ChatSession, IndexManager, SalesAssistant, SalesRagConfig};
//!
//! let config = SalesRagConfig::builder().top_k(4).build()?;
//! let embedder: Arc<dyn sales_rag::EmbeddingProvider> =
//!     Arc::new(OpenAIEmbeddingProvider::from_env()?);
//! let index = IndexManager::new(config.clone(), embedder.clone()).obtain_index().await?;
//!
//! let assistant = SalesAssistant::builder()
//!     .config(config)
//!     .embedding_provider(embedder)
//!     .index(index)
//!     .chat_model(Arc::new(OpenAIChatModel::from_env()?))
//!     .build()?;
//!
//! let mut session = ChatSession::new();
//! println!("{}", assistant.answer(&mut session, "Sales at store 20 on 2012-02-10?").await?);
//! ```

pub mod assistant;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod inmemory;
pub mod llm;
pub mod loader;
pub mod persist;
pub mod session;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;

pub use assistant::{NO_RELEVANT_DATA, SalesAssistant, SalesAssistantBuilder, build_prompt};
pub use config::{SalesRagConfig, SalesRagConfigBuilder};
pub use document::{Document, IndexRecord, SalesRow, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{IndexManager, SalesIndex};
pub use inmemory::InMemoryVectorStore;
pub use llm::ChatModel;
pub use persist::IndexManifest;
pub use session::{ChatSession, GREETING, Role, Turn};
pub use vectorstore::VectorStore;

#[cfg(feature = "openai")]
pub use openai::{OpenAIChatModel, OpenAIEmbeddingProvider};
