use std::env;
use std::path::PathBuf;

use ragdb_core::chunker::ChunkingConfig;
use ragdb_core::config::{expand_path, resolve_with_base, Config};
use ragdb_core::data_processor::DataProcessor;
use ragdb_embed::get_embedder;
use ragdb_vector::{IndexWriter, SearchEngine, VectorStore};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <ingest|query> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();
    let base_dir =
        expand_path(config.get::<String>("data.base_dir").unwrap_or_else(|_| ".".to_string()));
    let db_path = resolve_with_base(
        &base_dir,
        config.get::<String>("data.db_path").unwrap_or_else(|_| "assets/db/rag.db".to_string()),
    );
    let model_dir = config
        .get::<String>("embedding.model_dir")
        .ok()
        .map(|p| resolve_with_base(&base_dir, p));
    match cmd.as_str() {
        "ingest" => {
            let data_dir = args.first().map(PathBuf::from).unwrap_or_else(|| {
                let dir: String = config
                    .get("data.raw_txt_dir")
                    .unwrap_or_else(|_| "assets/data/docs".to_string());
                resolve_with_base(&base_dir, dir)
            });
            println!("Ingesting from {}", data_dir.display());
            let chunking = ChunkingConfig {
                window_size: config.get("chunking.window_size").unwrap_or(700),
                overlap_size: config.get("chunking.overlap_size").unwrap_or(150),
            };
            let processor = DataProcessor::with_chunking(chunking);
            let chunks = processor.process_directory(&data_dir)?;
            let embedder = get_embedder(model_dir.as_deref())?;
            let mut store = VectorStore::open(&db_path)?;
            let report = IndexWriter::new(&mut store, embedder.as_ref()).rebuild(&chunks)?;
            println!(
                "✅ Ingest complete ({} chunks from {} documents)",
                report.chunks_indexed, report.documents
            );
        }
        "query" => {
            let query_text = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: ragdb query \"<query>\" [top_k]");
                std::process::exit(1)
            });
            let top_k = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);
            let store = VectorStore::open(&db_path)?;
            let embedder = get_embedder(model_dir.as_deref())?;
            let engine = SearchEngine::open(&store, embedder)?;
            let results = engine.search(&query_text, top_k)?;
            if results.is_empty() {
                println!("No results ({} records in store)", engine.count());
            }
            for (i, result) in results.iter().enumerate() {
                let c = &result.record.chunk;
                println!(
                    "\n  {}. score={:.4}  doc={}  source={}",
                    i + 1,
                    result.score,
                    c.doc_id,
                    c.source
                );
                println!("     📝 {}", c.content);
            }
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
