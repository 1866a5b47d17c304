//! Startup wiring: credential check, index, and assistant construction.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use sales_rag::openai::{API_KEY_ENV, OpenAIChatModel, OpenAIEmbeddingProvider};
use sales_rag::{EmbeddingProvider, IndexManager, SalesAssistant, SalesRagConfig};
use tracing::info;

use crate::console::spinner;

/// Fail unless an API key was provided. Runs before any file or network I/O
/// other than reading `.env`.
pub fn require_api_key(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => bail!("{API_KEY_ENV} not found. Please set it in your environment or .env file."),
    }
}

/// Obtain the index and build the assistant against the OpenAI API at
/// `base_url`.
pub async fn build_assistant(
    config: SalesRagConfig,
    api_key: &str,
    base_url: &str,
) -> Result<SalesAssistant> {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAIEmbeddingProvider::new(api_key)?
            .with_model(&config.embedding_model)
            .with_base_url(base_url),
    );
    let chat_model = OpenAIChatModel::new(api_key)?
        .with_model(&config.chat_model)
        .with_temperature(config.temperature)
        .with_base_url(base_url);

    let manager = IndexManager::new(config.clone(), embedder.clone());
    let message = if manager.index_exists().await? {
        "Loading vector store...".to_string()
    } else {
        format!(
            "Building vector store in {} from {}... this may take a few minutes on first run.",
            manager.index_dir().display(),
            config.dataset_path.display()
        )
    };

    let progress = spinner(message);
    let index = manager.obtain_index().await;
    progress.finish_and_clear();
    let index = index.context("failed to load the application")?;
    info!(document_count = index.document_count(), "index ready");

    Ok(SalesAssistant::builder()
        .config(config)
        .embedding_provider(embedder)
        .index(index)
        .chat_model(Arc::new(chat_model))
        .build()?)
}
