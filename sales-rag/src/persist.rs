//! On-disk layout of a built index.
//!
//! An index directory holds two files:
//!
//! - `records.jsonl`: one [`IndexRecord`] per line, in document order.
//! - `manifest.json`: an [`IndexManifest`] describing the build.
//!
//! Builds are written to a sibling `<dir>.staging` directory that starts
//! with a `.sales-rag-build` marker and ends with the manifest, then renamed
//! into place. A directory holding only these files but no readable manifest
//! is an interrupted build. Anything else is left alone.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use crate::document::IndexRecord;
use crate::error::{RagError, Result};

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

const MANIFEST_FILE: &str = "manifest.json";
const RECORDS_FILE: &str = "records.jsonl";
const BUILD_MARKER: &str = ".sales-rag-build";

/// The only entries a build ever writes.
const BUILD_FILES: [&str; 3] = [BUILD_MARKER, RECORDS_FILE, MANIFEST_FILE];

/// Completeness and compatibility record for a persisted index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexManifest {
    /// On-disk format version, see [`FORMAT_VERSION`].
    pub format_version: u32,
    /// Embedding model that produced the stored vectors.
    pub embedding_model: String,
    /// Dimensionality of the stored vectors.
    pub dimensions: usize,
    /// Number of records in `records.jsonl`.
    pub document_count: usize,
    /// When the build finished.
    pub created_at: DateTime<Utc>,
}

impl IndexManifest {
    /// Manifest for a build finishing now.
    pub fn new(
        embedding_model: impl Into<String>,
        dimensions: usize,
        document_count: usize,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            embedding_model: embedding_model.into(),
            dimensions,
            document_count,
            created_at: Utc::now(),
        }
    }
}

/// What was found at an index location.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexState {
    /// Nothing exists at the location.
    Missing,
    /// The directory holds nothing but build files and has no readable
    /// manifest.
    Incomplete,
    /// A finished build.
    Complete(IndexManifest),
    /// The path holds files no build wrote. It is never modified.
    Foreign,
}

/// Inspect `dir` without reading the records.
pub async fn probe(dir: &Path) -> Result<IndexState> {
    if !fs::try_exists(dir).await? {
        return Ok(IndexState::Missing);
    }

    if !fs::metadata(dir).await?.is_dir() || !holds_only_build_files(dir).await? {
        return Ok(IndexState::Foreign);
    }

    let manifest_path = dir.join(MANIFEST_FILE);
    if !fs::try_exists(&manifest_path).await? {
        return Ok(IndexState::Incomplete);
    }

    let raw = fs::read_to_string(&manifest_path).await?;
    match serde_json::from_str::<IndexManifest>(&raw) {
        Ok(manifest) => Ok(IndexState::Complete(manifest)),
        Err(e) => {
            warn!(path = %manifest_path.display(), error = %e, "unreadable index manifest");
            Ok(IndexState::Incomplete)
        }
    }
}

async fn holds_only_build_files(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if !BUILD_FILES.iter().any(|file| name == *file) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn not_an_index(dir: &Path) -> RagError {
    RagError::Index(format!(
        "{} is not a sales-rag index; refusing to overwrite it",
        dir.display()
    ))
}

/// Read the records of a complete index, checking them against `manifest`.
///
/// # Errors
///
/// Returns [`RagError::Index`] if the record count or any vector's length
/// disagrees with the manifest.
pub async fn read_records(dir: &Path, manifest: &IndexManifest) -> Result<Vec<IndexRecord>> {
    let raw = fs::read_to_string(dir.join(RECORDS_FILE)).await?;
    let mut records = Vec::with_capacity(manifest.document_count);
    for line in raw.lines().filter(|line| !line.trim().is_empty()) {
        let record: IndexRecord = serde_json::from_str(line)?;
        if record.embedding.len() != manifest.dimensions {
            return Err(RagError::Index(format!(
                "record '{}' has {} dimensions but the manifest says {}",
                record.id,
                record.embedding.len(),
                manifest.dimensions
            )));
        }
        records.push(record);
    }

    if records.len() != manifest.document_count {
        return Err(RagError::Index(format!(
            "{} holds {} records but the manifest says {}",
            dir.display(),
            records.len(),
            manifest.document_count
        )));
    }
    Ok(records)
}

/// Write a complete index to `dir`, replacing any interrupted build there.
///
/// # Errors
///
/// Returns [`RagError::Index`] if `dir` or its staging directory holds files
/// that no build wrote; nothing is touched in that case.
pub async fn write_index(
    dir: &Path,
    manifest: &IndexManifest,
    records: &[IndexRecord],
) -> Result<()> {
    if probe(dir).await? == IndexState::Foreign {
        return Err(not_an_index(dir));
    }
    let staging = staging_dir(dir)?;
    remove(&staging).await?;
    fs::create_dir_all(&staging).await?;
    fs::write(staging.join(BUILD_MARKER), b"").await?;

    let file = fs::File::create(staging.join(RECORDS_FILE)).await?;
    let mut writer = BufWriter::new(file);
    for record in records {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
    }
    writer.flush().await?;

    fs::write(staging.join(MANIFEST_FILE), serde_json::to_vec_pretty(manifest)?).await?;

    remove(dir).await?;
    fs::rename(&staging, dir).await?;
    debug!(path = %dir.display(), records = records.len(), "index written");
    Ok(())
}

/// Remove the index at `dir`, if any.
///
/// # Errors
///
/// Returns [`RagError::Index`] if `dir` holds files that no build wrote.
pub async fn remove(dir: &Path) -> Result<()> {
    match probe(dir).await? {
        IndexState::Missing => Ok(()),
        IndexState::Foreign => Err(not_an_index(dir)),
        IndexState::Incomplete | IndexState::Complete(_) => {
            fs::remove_dir_all(dir).await?;
            Ok(())
        }
    }
}

fn staging_dir(dir: &Path) -> Result<PathBuf> {
    let name = dir.file_name().ok_or_else(|| {
        RagError::Config(format!("index directory '{}' has no final component", dir.display()))
    })?;
    let mut staging_name = name.to_os_string();
    staging_name.push(".staging");
    Ok(dir.with_file_name(staging_name))
}
