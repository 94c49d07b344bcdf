//! ragdb-vector
//!
//! SQLite-backed passage store plus the offline index writer and the
//! brute-force search engine. The store is the single source of truth for
//! embedding dimensionality and model identity; the search engine ranks an
//! in-memory snapshot with an exact full scan.

pub mod schema;
pub mod search;
pub mod store;
pub mod writer;

pub use search::{cosine_similarity, SearchEngine};
pub use store::VectorStore;
pub use writer::{IndexReport, IndexWriter};
