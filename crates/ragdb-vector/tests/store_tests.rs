use tempfile::TempDir;

use ragdb_core::error::Error;
use ragdb_core::types::DocumentChunk;
use ragdb_vector::VectorStore;

fn chunk(doc_id: &str, chunk_index: usize, content: &str) -> DocumentChunk {
    DocumentChunk {
        doc_id: doc_id.to_string(),
        source: format!("assets/data/docs/{doc_id}.txt"),
        chunk_index,
        total_chunks: chunk_index + 1,
        start_offset: chunk_index * 550,
        end_offset: chunk_index * 550 + content.chars().count(),
        content: content.to_string(),
    }
}

#[test]
fn records_round_trip_exactly_across_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("rag.db");

    let records = vec![
        (chunk("alpha", 0, "héllo wörld 日本語"), vec![0.25f32, -0.0, 1.5e-7]),
        (chunk("alpha", 1, "second window"), vec![1.0f32, 2.0, 3.0]),
        (chunk("beta", 0, "another document"), vec![-4.5f32, f32::MIN_POSITIVE, 0.0]),
    ];

    {
        let mut store = VectorStore::open(&db_path).expect("open");
        store.insert("fake:d3", &records).expect("insert");
    }

    let store = VectorStore::open(&db_path).expect("reopen");
    assert_eq!(store.count().expect("count"), 3);
    assert_eq!(store.embedding_dim().expect("dim"), Some(3));
    assert_eq!(store.embedder_id().expect("id").as_deref(), Some("fake:d3"));

    let loaded = store.all().expect("all");
    assert_eq!(loaded.len(), records.len());
    for (stored, (chunk, embedding)) in loaded.iter().zip(&records) {
        assert_eq!(&stored.chunk, chunk);
        // Bit-exact vector round-trip, not just approximate equality.
        let stored_bits: Vec<u32> = stored.embedding.iter().map(|f| f.to_bits()).collect();
        let expect_bits: Vec<u32> = embedding.iter().map(|f| f.to_bits()).collect();
        assert_eq!(stored_bits, expect_bits);
    }
    // Insertion order is preserved by ascending rowid.
    for pair in loaded.windows(2) {
        assert!(pair[0].id < pair[1].id);
    }
}

#[test]
fn second_batch_with_different_dimension_is_rejected_atomically() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = VectorStore::open(&tmp.path().join("rag.db")).expect("open");

    let first: Vec<_> = (0..4).map(|i| (chunk("a", i, "text"), vec![0.1f32; 384])).collect();
    store.insert("fake:d384", &first).expect("first insert");

    let second: Vec<_> = (0..2).map(|i| (chunk("b", i, "text"), vec![0.2f32; 768])).collect();
    let err = store.insert("fake:d384", &second).expect_err("dimension mismatch");
    assert!(matches!(err, Error::DimensionMismatch { expected: 384, actual: 768 }));

    // The store still contains exactly the first batch.
    assert_eq!(store.count().expect("count"), 4);
    assert_eq!(store.embedding_dim().expect("dim"), Some(384));
}

#[test]
fn batch_mixing_dimensions_internally_writes_nothing() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = VectorStore::open(&tmp.path().join("rag.db")).expect("open");

    let batch = vec![
        (chunk("a", 0, "ok"), vec![0.1f32; 8]),
        (chunk("a", 1, "bad"), vec![0.1f32; 9]),
    ];
    assert!(matches!(
        store.insert("fake:d8", &batch),
        Err(Error::DimensionMismatch { expected: 8, actual: 9 })
    ));
    assert_eq!(store.count().expect("count"), 0);
    assert_eq!(store.embedding_dim().expect("dim"), None);
}

#[test]
fn empty_batch_requires_an_initialized_store() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = VectorStore::open(&tmp.path().join("rag.db")).expect("open");

    assert!(matches!(store.insert("fake:d3", &[]), Err(Error::Schema(_))));

    store
        .insert("fake:d3", &[(chunk("a", 0, "text"), vec![1.0f32, 0.0, 0.0])])
        .expect("insert");
    store.insert("fake:d3", &[]).expect("empty batch is a no-op once initialized");
    assert_eq!(store.count().expect("count"), 1);
}

#[test]
fn clear_is_idempotent_and_releases_the_dimensionality() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = VectorStore::open(&tmp.path().join("rag.db")).expect("open");

    store
        .insert("fake:d3", &[(chunk("a", 0, "text"), vec![1.0f32, 0.0, 0.0])])
        .expect("insert");
    store.clear().expect("clear");
    store.clear().expect("clear twice");
    assert_eq!(store.count().expect("count"), 0);
    assert_eq!(store.embedding_dim().expect("dim"), None);
    assert_eq!(store.embedder_id().expect("id"), None);

    // A fresh corpus may establish a new dimensionality and model.
    store
        .insert("fake:d5", &[(chunk("b", 0, "text"), vec![0.0f32; 5])])
        .expect("insert after clear");
    assert_eq!(store.embedding_dim().expect("dim"), Some(5));
}

#[test]
fn records_from_a_different_model_are_refused() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = VectorStore::open(&tmp.path().join("rag.db")).expect("open");

    store
        .insert("all-MiniLM-L6-v2", &[(chunk("a", 0, "text"), vec![0.0f32; 3])])
        .expect("insert");
    let err = store
        .insert("some-other-model", &[(chunk("b", 0, "text"), vec![0.0f32; 3])])
        .expect_err("model mixing");
    assert!(matches!(err, Error::Schema(_)));
    assert_eq!(store.count().expect("count"), 1);
}

#[test]
fn failed_replace_all_leaves_the_previous_corpus_intact() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = VectorStore::open(&tmp.path().join("rag.db")).expect("open");

    let initial = vec![(chunk("a", 0, "first corpus"), vec![1.0f32, 0.0])];
    store.insert("fake:d2", &initial).expect("insert");

    let broken = vec![
        (chunk("b", 0, "ok"), vec![0.5f32, 0.5]),
        (chunk("b", 1, "bad"), vec![0.5f32, 0.5, 0.5]),
    ];
    assert!(store.replace_all("fake:d2", &broken).is_err());

    let records = store.all().expect("all");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].chunk.content, "first corpus");
}

#[test]
fn replace_all_swaps_the_corpus_in_one_step() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = VectorStore::open(&tmp.path().join("rag.db")).expect("open");

    store
        .insert("fake:d2", &[(chunk("a", 0, "old"), vec![1.0f32, 0.0])])
        .expect("insert");
    store
        .replace_all("fake:d3", &[(chunk("b", 0, "new"), vec![0.0f32, 1.0, 0.0])])
        .expect("replace");

    let records = store.all().expect("all");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].chunk.content, "new");
    assert_eq!(store.embedding_dim().expect("dim"), Some(3));
    assert_eq!(store.embedder_id().expect("id").as_deref(), Some("fake:d3"));
}
