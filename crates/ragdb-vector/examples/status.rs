use std::path::PathBuf;

use ragdb_vector::VectorStore;

fn main() -> anyhow::Result<()> {
    let db_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/db/rag.db"));
    let store = VectorStore::open(&db_path)?;
    println!("store: {}", db_path.display());
    println!("records={}", store.count()?);
    println!(
        "dim={} embedder={}",
        store.embedding_dim()?.map_or_else(|| "-".to_string(), |d| d.to_string()),
        store.embedder_id()?.unwrap_or_else(|| "-".to_string()),
    );
    Ok(())
}
