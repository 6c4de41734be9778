//! Resume ingestion: PDF file → ordered, retrieval-sized passages.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub mod chunker;
pub mod pdf;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read resume at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF: {0}")]
    Pdf(String),

    #[error("No extractable text in resume")]
    Empty,
}

/// A bounded span of resume text, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// 1-based page the passage came from.
    pub page: usize,
    /// Position in document order, across all pages.
    pub index: usize,
    pub text: String,
}

/// Reads and splits the resume at `path`.
pub fn load_resume(path: &Path) -> Result<Vec<Passage>, IngestError> {
    let data = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let passages = passages_from_pdf(&data)?;
    info!(path = %path.display(), passages = passages.len(), "Resume ingested");
    Ok(passages)
}

/// Splits in-memory PDF bytes into passages.
pub fn passages_from_pdf(data: &[u8]) -> Result<Vec<Passage>, IngestError> {
    let pages = pdf::extract_pages(data)?;
    let passages = passages_from_pages(&pages);
    if passages.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(passages)
}

/// Chunks each page independently so passage boundaries follow pages.
pub fn passages_from_pages(pages: &[String]) -> Vec<Passage> {
    let mut passages = Vec::new();
    for (page_idx, page_text) in pages.iter().enumerate() {
        for text in chunker::chunk_text(page_text) {
            passages.push(Passage {
                page: page_idx + 1,
                index: passages.len(),
                text,
            });
        }
    }
    passages
}
