//! Domain types shared by the ingestion pipeline and the vector engine.

use serde::{Deserialize, Serialize};

/// A passage of a source document that is independently embedded and indexed.
///
/// - `doc_id`: stable document identity (file stem)
/// - `source`: original path to the source file
/// - `chunk_index`/`total_chunks`: position within the parent document
/// - `start_offset`/`end_offset`: character offsets into the normalized
///   document text; `end_offset - start_offset` equals the window size for
///   every chunk except possibly the last one
/// - `content`: the text payload of the chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub doc_id: String,
    pub source: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub content: String,
}

/// A persisted row of the vector store: a chunk, its embedding, and the
/// rowid that fixes its insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: i64,
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}

/// One ranked hit for a single query. `score` is cosine similarity in
/// `[-1, 1]`; higher is more similar. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub score: f32,
    pub record: StoredRecord,
}
