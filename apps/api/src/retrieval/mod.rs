//! In-memory embedding index over resume passages.
//!
//! Brute-force cosine similarity: a resume is a handful of passages, so an
//! approximate index would buy nothing. Rebuilt from scratch per agent.

use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::ingest::Passage;
use crate::llm_client::{LlmError, TextEmbedder};

/// Passages returned per query.
pub const DEFAULT_TOP_K: usize = 4;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Embedding backend error: {0}")]
    Llm(#[from] LlmError),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Cannot build an index from zero passages")]
    Empty,
}

#[derive(Debug, Clone)]
struct IndexedPassage {
    passage: Passage,
    embedding: Vec<f32>,
}

/// A retrieved passage with its similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    entries: Vec<IndexedPassage>,
    dimensions: usize,
}

impl EmbeddingIndex {
    /// Embeds every passage in one backend call and stores the vectors.
    pub async fn build(
        passages: Vec<Passage>,
        embedder: &dyn TextEmbedder,
    ) -> Result<Self, IndexError> {
        if passages.is_empty() {
            return Err(IndexError::Empty);
        }

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;
        let index = Self::from_embeddings(passages, embeddings)?;

        info!(
            passages = index.len(),
            dimensions = index.dimensions,
            "Embedding index built"
        );
        Ok(index)
    }

    /// Pairs passages with precomputed vectors. All vectors must share one size.
    pub fn from_embeddings(
        passages: Vec<Passage>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, IndexError> {
        if passages.is_empty() {
            return Err(IndexError::Empty);
        }
        if embeddings.len() != passages.len() {
            return Err(IndexError::Llm(LlmError::EmbeddingCount {
                expected: passages.len(),
                actual: embeddings.len(),
            }));
        }

        let dimensions = embeddings[0].len();
        let entries = passages
            .into_iter()
            .zip(embeddings)
            .map(|(passage, embedding)| {
                if embedding.len() != dimensions {
                    return Err(IndexError::DimensionMismatch {
                        expected: dimensions,
                        actual: embedding.len(),
                    });
                }
                Ok(IndexedPassage { passage, embedding })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries, dimensions })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embeds `query` with the same model and returns the `k` closest passages.
    pub async fn search(
        &self,
        query: &str,
        embedder: &dyn TextEmbedder,
        k: usize,
    ) -> Result<Vec<ScoredPassage>, IndexError> {
        let mut vectors = embedder.embed(&[query.to_string()]).await?;
        let query_vec = vectors.pop().ok_or(LlmError::EmbeddingCount {
            expected: 1,
            actual: 0,
        })?;
        let hits = self.nearest(&query_vec, k)?;
        debug!(k, hits = hits.len(), "Retrieved passages");
        Ok(hits)
    }

    /// Ranks stored passages by cosine similarity to `query_vec`.
    /// Ties keep document order.
    pub fn nearest(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredPassage>, IndexError> {
        if query_vec.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query_vec.len(),
            });
        }

        let mut scored: Vec<ScoredPassage> = self
            .entries
            .iter()
            .map(|entry| ScoredPassage {
                passage: entry.passage.clone(),
                score: cosine_similarity(query_vec, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine similarity between two vectors. Zero for empty, mismatched or
/// zero-norm input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    dot_product / denominator
}
