//! SQLite layout for the passage store.
//!
//! Rowids fix insertion order, which the search engine relies on for
//! deterministic tie-breaking. The `meta` table pins schema version,
//! embedding dimensionality, and the producing model so a layout or model
//! change is rejected instead of silently corrupting similarity scores.

pub const SCHEMA_VERSION: &str = "1";

pub const META_SCHEMA_VERSION: &str = "schema_version";
pub const META_EMBEDDING_DIM: &str = "embedding_dim";
pub const META_EMBEDDER_ID: &str = "embedder_id";

pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS passages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    doc_id TEXT NOT NULL,
    source TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    total_chunks INTEGER NOT NULL,
    start_offset INTEGER NOT NULL,
    end_offset INTEGER NOT NULL,
    content TEXT NOT NULL,
    embedding BLOB NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_passages_doc_id ON passages(doc_id);
"#;

/// Encode an embedding as little-endian f32 bytes.
pub fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Decode a little-endian f32 blob back into a vector.
pub fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
