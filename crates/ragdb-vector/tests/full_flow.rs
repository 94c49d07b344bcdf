use std::fs;

use tempfile::TempDir;

use ragdb_core::chunker::ChunkingConfig;
use ragdb_core::data_processor::DataProcessor;
use ragdb_embed::get_default_embedder;
use ragdb_vector::{IndexWriter, SearchEngine, VectorStore};

fn write_corpus(dir: &std::path::Path) {
    fs::write(
        dir.join("fire.txt"),
        "Starting a fire requires dry tinder and patience. ".repeat(20),
    )
    .expect("write fire.txt");
    fs::write(
        dir.join("water.txt"),
        "Collect rainwater in clean barrels before the storm. ".repeat(20),
    )
    .expect("write water.txt");
    fs::write(dir.join("empty.txt"), "").expect("write empty.txt");
}

#[test]
fn index_then_search_full_flow() {
    std::env::set_var("RAGDB_USE_FAKE_EMBEDDINGS", "1");

    let data = TempDir::new().expect("data dir");
    write_corpus(data.path());

    let processor =
        DataProcessor::with_chunking(ChunkingConfig { window_size: 200, overlap_size: 40 });
    let chunks = processor.process_directory(data.path()).expect("process");
    eprintln!("processed corpus into {} chunks", chunks.len());
    assert!(chunks.len() > 2);
    for c in &chunks {
        assert!(c.total_chunks >= 1);
        assert!(c.chunk_index < c.total_chunks);
    }

    let db = TempDir::new().expect("db dir");
    let db_path = db.path().join("rag.db");
    let embedder = get_default_embedder().expect("embedder");
    let mut store = VectorStore::open(&db_path).expect("open store");
    let report = IndexWriter::new(&mut store, embedder.as_ref())
        .rebuild(&chunks)
        .expect("rebuild");
    assert_eq!(report.chunks_indexed, chunks.len());
    assert_eq!(report.documents, 2, "the empty document contributes no chunks");
    assert_eq!(report.chunks_skipped, 0);
    assert_eq!(store.count().expect("count"), chunks.len());

    let engine =
        SearchEngine::open(&store, get_default_embedder().expect("embedder")).expect("engine");
    let results = engine.search("fire tinder", 5).expect("search");
    eprintln!("'fire tinder' -> {} hits", results.len());
    assert!(!results.is_empty());
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    let top = &results[0];
    assert_eq!(top.record.chunk.doc_id, "fire");
    assert!(!top.record.chunk.content.trim().is_empty());
    assert!(top.record.chunk.source.ends_with("fire.txt"));
}

#[test]
fn reindexing_the_same_corpus_is_deterministic() {
    std::env::set_var("RAGDB_USE_FAKE_EMBEDDINGS", "1");

    let data = TempDir::new().expect("data dir");
    write_corpus(data.path());

    let processor = DataProcessor::new();
    let chunks = processor.process_directory(data.path()).expect("process");

    let db = TempDir::new().expect("db dir");
    let db_path = db.path().join("rag.db");
    let embedder = get_default_embedder().expect("embedder");
    let mut store = VectorStore::open(&db_path).expect("open store");

    IndexWriter::new(&mut store, embedder.as_ref()).rebuild(&chunks).expect("first rebuild");
    let first: Vec<_> = store
        .all()
        .expect("all")
        .into_iter()
        .map(|r| (r.chunk, r.embedding.iter().map(|f| f.to_bits()).collect::<Vec<u32>>()))
        .collect();

    IndexWriter::new(&mut store, embedder.as_ref()).rebuild(&chunks).expect("second rebuild");
    let second: Vec<_> = store
        .all()
        .expect("all")
        .into_iter()
        .map(|r| (r.chunk, r.embedding.iter().map(|f| f.to_bits()).collect::<Vec<u32>>()))
        .collect();

    // Rowids advance across rebuilds; the record content must not.
    assert_eq!(first, second);
}
