use ragdb_core::error::Error;
use ragdb_core::traits::Embedder;
use ragdb_embed::get_default_embedder;

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading the real model
    std::env::set_var("RAGDB_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder().expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384, "embedding dim is 384");
    assert_eq!(embedder.dim(), 384);

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn empty_input_is_rejected() {
    std::env::set_var("RAGDB_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder().expect("embedder");
    assert!(matches!(embedder.embed(""), Err(Error::EmptyInput)));
    assert!(matches!(embedder.embed("   \n\t"), Err(Error::EmptyInput)));

    // A batch with one empty item fails as a whole at this layer; the
    // indexing pipeline filters such chunks before embedding.
    let texts = vec!["fine".to_string(), " ".to_string()];
    assert!(embedder.embed_batch(&texts).is_err());
}

#[test]
fn batch_matches_per_item_embedding_in_order() {
    std::env::set_var("RAGDB_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder().expect("embedder");
    let texts = vec![
        "growing potatoes in sandy soil".to_string(),
        "starting a fire with flint".to_string(),
        "preserving meat without refrigeration".to_string(),
    ];
    let batch = embedder.embed_batch(&texts).expect("embed_batch");
    assert_eq!(batch.len(), texts.len());
    for (text, from_batch) in texts.iter().zip(&batch) {
        let single = embedder.embed(text).expect("embed");
        assert_eq!(&single, from_batch, "batch output preserves order");
    }
}
