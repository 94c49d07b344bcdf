use std::env;
use std::path::PathBuf;

use ragdb_embed::get_default_embedder;
use ragdb_vector::{SearchEngine, VectorStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [--top-k N] [db_path]", args[0]);
        eprintln!("Example: {} 'pruning apple trees' --top-k 5 assets/db/rag.db", args[0]);
        std::process::exit(1);
    }
    let query_text = &args[1];
    let mut top_k = 5usize;
    let mut db_path = PathBuf::from("assets/db/rag.db");
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--top-k" => {
                if i + 1 < args.len() {
                    if let Ok(k) = args[i + 1].parse::<usize>() {
                        top_k = k;
                        i += 1;
                    } else {
                        eprintln!("Error: --top-k requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --top-k requires a number");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => db_path = PathBuf::from(&args[i]),
            _ => {}
        }
        i += 1;
    }

    println!("🔍 ragdb-search\n===============");
    println!("Query: {}", query_text);
    println!("Store: {}", db_path.display());

    let store = VectorStore::open(&db_path)?;
    let embedder = get_default_embedder()?;
    let engine = SearchEngine::open(&store, embedder)?;
    let results = engine.search(query_text, top_k)?;

    println!("\n🔍 Found {} results for: \"{}\"", results.len(), query_text);
    for (i, result) in results.iter().enumerate() {
        let c = &result.record.chunk;
        println!(
            "\n  {}. score={:.4}  doc={}  chunk={}/{}  chars={}..{}",
            i + 1,
            result.score,
            c.doc_id,
            c.chunk_index + 1,
            c.total_chunks,
            c.start_offset,
            c.end_offset
        );
        println!("     📄 Source: {}", c.source);
        println!("     📝 Content: {}", c.content);
    }
    Ok(())
}
