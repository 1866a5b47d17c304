//! Data types for sales rows, rendered documents, and search results.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One weekly record for a single store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRow {
    /// Store identifier.
    pub store: u32,
    /// Week ending date.
    pub date: NaiveDate,
    /// Sales for the week, in dollars.
    pub weekly_sales: f64,
    /// `1` for a holiday week, `0` otherwise. Kept as the raw integer.
    pub holiday_flag: u8,
    /// Average temperature in the region.
    pub temperature: f64,
    /// Fuel price in the region.
    pub fuel_price: f64,
    /// Consumer price index.
    pub cpi: f64,
    /// Unemployment rate.
    pub unemployment: f64,
}

impl SalesRow {
    /// Render the row as the sentence that gets embedded.
    pub fn to_sentence(&self) -> String {
        format!(
            "On {}, at Store {}, weekly sales were ${:.2}. \
             The holiday status was {} (1 for holiday, 0 for non-holiday). \
             The temperature was {:.2}, fuel price was ${:.3}, CPI was {:.3}, \
             and unemployment rate was {:.3}.",
            self.date.format("%Y-%m-%d"),
            self.store,
            self.weekly_sales,
            self.holiday_flag,
            self.temperature,
            self.fuel_price,
            self.cpi,
            self.unemployment,
        )
    }
}

/// A text document derived from exactly one [`SalesRow`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Positional identifier (`row-<n>`).
    pub id: String,
    /// The rendered sentence.
    pub text: String,
    /// Display metadata copied from the row.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Build the document for the row at zero-based position `index`.
    pub fn from_row(index: usize, row: &SalesRow) -> Self {
        let metadata = HashMap::from([
            ("store".to_string(), row.store.to_string()),
            ("date".to_string(), row.date.format("%Y-%m-%d").to_string()),
            ("holiday".to_string(), row.holiday_flag.to_string()),
        ]);
        Self { id: format!("row-{index}"), text: row.to_sentence(), metadata }
    }
}

/// A [`Document`] paired with its embedding, as stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexRecord {
    /// Identifier of the source document.
    pub id: String,
    /// The document text.
    pub text: String,
    /// The vector embedding for the text.
    pub embedding: Vec<f32>,
    /// Metadata inherited from the document.
    pub metadata: HashMap<String, String>,
}

impl IndexRecord {
    /// Attach an embedding to a document.
    pub fn new(document: Document, embedding: Vec<f32>) -> Self {
        Self { id: document.id, text: document.text, embedding, metadata: document.metadata }
    }
}

/// A retrieved [`IndexRecord`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved record.
    pub record: IndexRecord,
    /// The cosine similarity score (higher is more relevant).
    pub score: f32,
}
