//! Brute-force passage ranking over an in-memory snapshot of the store.

use std::cmp::Ordering;

use ragdb_core::error::{Error, Result};
use ragdb_core::traits::Embedder;
use ragdb_core::types::{ScoredPassage, StoredRecord};

use crate::store::VectorStore;

pub struct SearchEngine {
    records: Vec<StoredRecord>,
    embedder: Box<dyn Embedder>,
}

impl SearchEngine {
    /// Snapshot the store and bind the query-side embedder. The embedder
    /// must be the model the store was built with; anything else would make
    /// similarity scores meaningless.
    pub fn open(store: &VectorStore, embedder: Box<dyn Embedder>) -> Result<Self> {
        if let Some(id) = store.embedder_id()? {
            if id != embedder.id() {
                return Err(Error::Schema(format!(
                    "store was built with embedder '{}', queries use '{}'",
                    id,
                    embedder.id()
                )));
            }
        }
        if let Some(dim) = store.embedding_dim()? {
            if dim != embedder.dim() {
                return Err(Error::DimensionMismatch { expected: dim, actual: embedder.dim() });
            }
        }
        let records = store.all()?;
        Ok(Self { records, embedder })
    }

    pub fn count(&self) -> usize { self.records.len() }

    /// Rank every stored passage against `query` and return the best
    /// `top_k` (fewer if the store holds fewer records). Full scan, O(n·d):
    /// the corpus is small by design and the deterministic ranking is part
    /// of the contract.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredPassage>> {
        if top_k == 0 {
            return Err(Error::InvalidArgument("top_k must be positive".to_string()));
        }
        if self.records.is_empty() {
            return Ok(Vec::new());
        }
        let query_embedding = self.embedder.embed(query)?;
        let mut scored: Vec<ScoredPassage> = self
            .records
            .iter()
            .map(|record| ScoredPassage {
                score: cosine_similarity(&query_embedding, &record.embedding),
                record: record.clone(),
            })
            .collect();
        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// Cosine similarity `dot(a,b) / (‖a‖·‖b‖)`, defined as 0 when either
/// vector has zero magnitude (never divides by zero).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denominator = (norm_a * norm_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    dot / denominator
}
