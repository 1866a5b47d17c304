//! Question answering over the sales index.
//!
//! The [`SalesAssistant`] embeds a question, retrieves the closest sales
//! sentences, and asks the chat model to answer from them. The caller owns
//! the [`ChatSession`] and passes it to every [`answer`](SalesAssistant::answer)
//! call.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sales_rag::{ChatSession, SalesAssistant, SalesRagConfig};
//!
//! let assistant = SalesAssistant::builder()
//!     .config(SalesRagConfig::default())
//!     .embedding_provider(embedder)
//!     .index(index)
//!     .chat_model(Arc::new(chat))
//!     .build()?;
//!
//! let mut session = ChatSession::new();
//! let answer = assistant.answer(&mut session, "Which store sold the most?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::config::SalesRagConfig;
use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::SalesIndex;
use crate::llm::ChatModel;
use crate::session::{ChatSession, Role};

/// Answer returned when retrieval finds nothing above the threshold.
pub const NO_RELEVANT_DATA: &str = "I could not find any sales records relevant to that question.";

/// Build the prompt sent to the chat model.
///
/// The retrieved sentences are separated by blank lines and followed by the
/// question.
pub fn build_prompt(question: &str, results: &[SearchResult]) -> String {
    let context =
        results.iter().map(|r| r.record.text.as_str()).collect::<Vec<_>>().join("\n\n");
    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up \
         an answer.\n\n{context}\n\nQuestion: {question}\nHelpful Answer:"
    )
}

/// Retrieval-augmented question answering over a [`SalesIndex`].
///
/// Construct one via [`SalesAssistant::builder()`].
pub struct SalesAssistant {
    config: SalesRagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: SalesIndex,
    chat_model: Arc<dyn ChatModel>,
}

impl SalesAssistant {
    /// Create a new [`SalesAssistantBuilder`].
    pub fn builder() -> SalesAssistantBuilder {
        SalesAssistantBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &SalesRagConfig {
        &self.config
    }

    /// Return a reference to the loaded index.
    pub fn index(&self) -> &SalesIndex {
        &self.index
    }

    /// Embed the question and return the most similar documents.
    ///
    /// At most `top_k` results, in descending score order, none below
    /// `similarity_threshold`.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(question).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            e
        })?;

        let results = self.index.search(&query_embedding, self.config.top_k).await.map_err(|e| {
            error!(error = %e, "index search failed");
            e
        })?;

        let threshold = self.config.similarity_threshold;
        let filtered: Vec<SearchResult> =
            results.into_iter().filter(|r| r.score >= threshold).collect();
        info!(result_count = filtered.len(), "retrieval completed");
        Ok(filtered)
    }

    /// Answer `question` from the indexed sales data and record the turn in
    /// `session`.
    ///
    /// Failures are recorded too: the assistant turn then reads
    /// `An error occurred: …` and the error is returned.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyQuestion`] for a blank question (nothing recorded).
    /// - [`RagError::Embedding`], [`RagError::VectorStore`] or
    ///   [`RagError::Model`] when a service call fails.
    pub async fn answer(&self, session: &mut ChatSession, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::EmptyQuestion);
        }

        session.push(Role::User, question);
        match self.generate(question).await {
            Ok(answer) => {
                session.push(Role::Assistant, answer.clone());
                Ok(answer)
            }
            Err(e) => {
                session.push(Role::Assistant, format!("An error occurred: {e}"));
                Err(e)
            }
        }
    }

    async fn generate(&self, question: &str) -> Result<String> {
        let results = self.retrieve(question).await?;
        if results.is_empty() {
            return Ok(NO_RELEVANT_DATA.to_string());
        }

        let prompt = build_prompt(question, &results);
        let answer = self.chat_model.complete(&prompt).await.map_err(|e| {
            error!(model = self.chat_model.name(), error = %e, "generation failed");
            e
        })?;
        info!(model = self.chat_model.name(), answer_len = answer.len(), "answer generated");
        Ok(answer)
    }
}

/// Builder for constructing a [`SalesAssistant`].
///
/// All fields are required. Call [`build()`](SalesAssistantBuilder::build)
/// to validate and produce the assistant.
#[derive(Default)]
pub struct SalesAssistantBuilder {
    config: Option<SalesRagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<SalesIndex>,
    chat_model: Option<Arc<dyn ChatModel>>,
}

impl SalesAssistantBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: SalesRagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider used for questions.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the index to search.
    pub fn index(mut self, index: SalesIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the chat model.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Build the [`SalesAssistant`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a field is missing, or if the index was
    /// built with a different embedding model than the provider uses.
    pub fn build(self) -> Result<SalesAssistant> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let index = self.index.ok_or_else(|| RagError::Config("index is required".to_string()))?;
        let chat_model =
            self.chat_model.ok_or_else(|| RagError::Config("chat_model is required".to_string()))?;

        if index.embedding_model() != embedding_provider.model() {
            return Err(RagError::Config(format!(
                "index was built with '{}' but the embedding provider uses '{}'",
                index.embedding_model(),
                embedding_provider.model()
            )));
        }

        Ok(SalesAssistant { config, embedding_provider, index, chat_model })
    }
}
