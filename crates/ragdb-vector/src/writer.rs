//! Offline indexing pass: embed chunks and atomically swap the store.

use indicatif::{ProgressBar, ProgressStyle};

use ragdb_core::error::{Error, Result};
use ragdb_core::traits::Embedder;
use ragdb_core::types::DocumentChunk;

use crate::store::VectorStore;

#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub documents: usize,
    pub chunks_indexed: usize,
    pub chunks_skipped: usize,
}

pub struct IndexWriter<'a> {
    store: &'a mut VectorStore,
    embedder: &'a dyn Embedder,
}

impl<'a> IndexWriter<'a> {
    pub fn new(store: &'a mut VectorStore, embedder: &'a dyn Embedder) -> Self {
        Self { store, embedder }
    }

    /// Replace the whole corpus with `chunks`. Chunks that are empty after
    /// trimming are skipped and counted rather than aborting the batch;
    /// a batch where every chunk is invalid is an error. The store swap
    /// happens in one transaction after every embedding succeeded.
    pub fn rebuild(&mut self, chunks: &[DocumentChunk]) -> Result<IndexReport> {
        if chunks.is_empty() {
            println!("No chunks to index");
            self.store.clear()?;
            return Ok(IndexReport::default());
        }
        println!("Indexing {} chunks into {}", chunks.len(), self.store.db_path().display());
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        let mut records = Vec::with_capacity(chunks.len());
        let mut skipped = 0usize;
        for (i, chunk) in chunks.iter().enumerate() {
            pb.set_position((i + 1) as u64);
            pb.set_message(format!("Processing chunk {}", i + 1));
            if chunk.content.trim().is_empty() {
                skipped += 1;
                continue;
            }
            let embedding = self.embedder.embed(&chunk.content)?;
            records.push((chunk.clone(), embedding));
        }
        if records.is_empty() {
            pb.abandon_with_message("❌ No valid chunks");
            return Err(Error::InvalidInput("every chunk in the batch was empty".to_string()));
        }
        self.store.replace_all(self.embedder.id(), &records)?;
        pb.finish_with_message("✅ Indexing completed!");

        let report = IndexReport {
            documents: count_documents(chunks),
            chunks_indexed: records.len(),
            chunks_skipped: skipped,
        };
        println!(
            "📊 Indexed {} chunks from {} documents ({} skipped)",
            report.chunks_indexed, report.documents, report.chunks_skipped
        );
        Ok(report)
    }
}

fn count_documents(chunks: &[DocumentChunk]) -> usize {
    let mut ids: Vec<&str> = chunks.iter().map(|c| c.doc_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}
