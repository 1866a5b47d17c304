//! Document preparation: reads the sales CSV and renders each row as a sentence.
//!
//! The dataset must have the header columns `Store`, `Date`, `Weekly_Sales`,
//! `Holiday_Flag`, `Temperature`, `Fuel_Price`, `CPI` and `Unemployment`, in
//! any order. Dates are `DD-MM-YYYY`.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};

use crate::document::{Document, SalesRow};
use crate::error::{RagError, Result};

const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Store")]
    store: u32,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Weekly_Sales")]
    weekly_sales: f64,
    #[serde(rename = "Holiday_Flag")]
    holiday_flag: u8,
    #[serde(rename = "Temperature")]
    temperature: f64,
    #[serde(rename = "Fuel_Price")]
    fuel_price: f64,
    #[serde(rename = "CPI")]
    cpi: f64,
    #[serde(rename = "Unemployment")]
    unemployment: f64,
}

impl CsvRow {
    fn into_row(self, line: u64) -> Result<SalesRow> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            RagError::Dataset { line, message: format!("invalid date '{}': {e}", self.date) }
        })?;
        Ok(SalesRow {
            store: self.store,
            date,
            weekly_sales: self.weekly_sales,
            holiday_flag: self.holiday_flag,
            temperature: self.temperature,
            fuel_price: self.fuel_price,
            cpi: self.cpi,
            unemployment: self.unemployment,
        })
    }
}

/// Parse every row of a CSV stream, preserving order.
///
/// # Errors
///
/// Returns [`RagError::Dataset`] for the first record that is missing a
/// column, has a non-numeric field, or has a malformed date.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<SalesRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header.
        let line = index as u64 + 2;
        let record = record.map_err(|e| RagError::Dataset {
            line: e.position().map(|p| p.line()).unwrap_or(line),
            message: e.to_string(),
        })?;
        rows.push(record.into_row(line)?);
    }
    Ok(rows)
}

/// Read all rows from the CSV file at `path`.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<SalesRow>> {
    let file = File::open(path.as_ref())?;
    parse_rows(io::BufReader::new(file))
}

/// Render the row at zero-based position `index` as a [`Document`].
pub fn render_document(index: usize, row: &SalesRow) -> Document {
    Document::from_row(index, row)
}

/// Load the dataset and render one [`Document`] per row, in file order.
///
/// A missing file is logged and yields an empty list; the index manager
/// refuses to build from an empty list.
///
/// # Errors
///
/// Returns [`RagError::Dataset`] for malformed records and [`RagError::Io`]
/// for read failures other than a missing file.
pub fn prepare_documents(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading dataset");

    let rows = match load_rows(path) {
        Ok(rows) => rows,
        Err(RagError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            error!(
                path = %path.display(),
                "dataset not found; place the sales CSV at this path"
            );
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let documents: Vec<Document> =
        rows.iter().enumerate().map(|(index, row)| render_document(index, row)).collect();
    info!(document_count = documents.len(), "converted rows into text documents");
    Ok(documents)
}
