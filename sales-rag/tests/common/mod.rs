//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sales_rag::{ChatModel, EmbeddingProvider, RagError, SalesRagConfig};

pub const HEADER: &str =
    "Store,Date,Weekly_Sales,Holiday_Flag,Temperature,Fuel_Price,CPI,Unemployment\n";

/// Write a dataset with `rows` weekly records, one store per row.
pub fn write_dataset(dir: &Path, rows: usize) -> PathBuf {
    let mut csv = HEADER.to_string();
    for i in 0..rows {
        let day = (i % 28) + 1;
        csv.push_str(&format!(
            "{},{day:02}-02-2012,{}.25,{},{}.5,3.125,211.456,7.89\n",
            i + 1,
            1000 + i,
            i % 2,
            40 + i
        ));
    }
    let path = dir.join("sales.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

pub fn config(dir: &Path, dataset: PathBuf) -> SalesRagConfig {
    SalesRagConfig::builder()
        .dataset_path(dataset)
        .index_dir(dir.join("index"))
        .embedding_model(MockEmbeddingProvider::MODEL)
        .build()
        .unwrap()
}

/// Deterministic hash-based embeddings that count how often they are asked.
pub struct MockEmbeddingProvider {
    model: String,
    dimensions: usize,
    fail: bool,
    pub batch_calls: AtomicUsize,
    pub texts_embedded: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub const MODEL: &'static str = "mock-embedding";

    pub fn new() -> Self {
        Self {
            model: Self::MODEL.to_string(),
            dimensions: 16,
            fail: false,
            batch_calls: AtomicUsize::new(0),
            texts_embedded: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::new() }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        // One independent hash per component so distinct texts point in
        // distinct directions.
        let mut emb: Vec<f32> = (0..self.dimensions)
            .map(|i| {
                let hash = text.bytes().fold(i as u64 + 1, |acc, b| {
                    acc.wrapping_mul(1_099_511_628_211).wrapping_add(b as u64)
                });
                ((hash >> 11) % 2001) as f32 / 1000.0 - 1.0
            })
            .collect();
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        emb
    }

    fn check(&self) -> sales_rag::Result<()> {
        if self.fail {
            return Err(RagError::Embedding {
                provider: "Mock".into(),
                message: "service unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> sales_rag::Result<Vec<f32>> {
        self.check()?;
        self.texts_embedded.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> sales_rag::Result<Vec<Vec<f32>>> {
        self.check()?;
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Chat model that records prompts and replies with a fixed answer.
pub struct MockChatModel {
    reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockChatModel {
    pub fn answering(reply: &str) -> Self {
        Self { reply: Ok(reply.to_string()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn failing(message: &str) -> Self {
        Self { reply: Err(message.to_string()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        "mock-chat"
    }

    async fn complete(&self, prompt: &str) -> sales_rag::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .map_err(|message| RagError::Model { provider: "Mock".into(), message })
    }
}
