//! Command-line flags.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sales_rag::SalesRagConfig;
use sales_rag::openai::OPENAI_API_BASE;

/// Ask questions about weekly retail sales data.
///
/// Requires `OPENAI_API_KEY` in the environment or in a `.env` file.
#[derive(Debug, Parser)]
#[command(name = "sales-rag", version, about)]
pub struct Args {
    /// CSV dataset read when the index is built [default: Walmart_Sales.csv]
    #[arg(long, env = "SALES_RAG_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Directory of the persisted index; delete it to force a rebuild [default: sales_index]
    #[arg(long, env = "SALES_RAG_INDEX_DIR")]
    pub index_dir: Option<PathBuf>,

    /// Documents retrieved per question, 1 to 50 [default: 4]
    #[arg(long, env = "SALES_RAG_TOP_K")]
    pub top_k: Option<usize>,

    /// Minimum cosine similarity of retrieved documents [default: 0.0]
    #[arg(long, env = "SALES_RAG_SIMILARITY_THRESHOLD", allow_negative_numbers = true)]
    pub similarity_threshold: Option<f32>,

    /// Documents per embedding request [default: 500]
    #[arg(long, env = "SALES_RAG_EMBED_BATCH_SIZE")]
    pub embed_batch_size: Option<usize>,

    /// Embedding model [default: text-embedding-3-small]
    #[arg(long, env = "SALES_RAG_EMBEDDING_MODEL")]
    pub embedding_model: Option<String>,

    /// Chat completion model [default: gpt-3.5-turbo]
    #[arg(long, env = "SALES_RAG_CHAT_MODEL")]
    pub chat_model: Option<String>,

    /// Chat model temperature [default: 0.0]
    #[arg(long, env = "SALES_RAG_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_API_BASE)]
    pub base_url: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "SALES_RAG_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Overlay the given flags on the default configuration and validate.
    pub fn to_config(&self) -> Result<SalesRagConfig> {
        let mut builder = SalesRagConfig::builder();
        if let Some(dataset) = &self.dataset {
            builder = builder.dataset_path(dataset.clone());
        }
        if let Some(dir) = &self.index_dir {
            builder = builder.index_dir(dir.clone());
        }
        if let Some(k) = self.top_k {
            builder = builder.top_k(k);
        }
        if let Some(threshold) = self.similarity_threshold {
            builder = builder.similarity_threshold(threshold);
        }
        if let Some(size) = self.embed_batch_size {
            builder = builder.embed_batch_size(size);
        }
        if let Some(model) = &self.embedding_model {
            builder = builder.embedding_model(model);
        }
        if let Some(model) = &self.chat_model {
            builder = builder.chat_model(model);
        }
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        Ok(builder.build()?)
    }
}
