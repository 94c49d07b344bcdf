use std::{env, path::PathBuf};

use ragdb_core::chunker::ChunkingConfig;
use ragdb_core::config::{expand_path, resolve_with_base, Config};
use ragdb_core::data_processor::DataProcessor;
use ragdb_embed::get_embedder;
use ragdb_vector::{IndexWriter, VectorStore};

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut data_dir = None;
    let mut window_size = None;
    let mut overlap_size = None;
    let mut limit = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--window" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        window_size = Some(n);
                        i += 1;
                    } else {
                        eprintln!("Error: --window requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --window requires a number");
                    std::process::exit(1);
                }
            }
            "--overlap" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        overlap_size = Some(n);
                        i += 1;
                    } else {
                        eprintln!("Error: --overlap requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --overlap requires a number");
                    std::process::exit(1);
                }
            }
            "--limit" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        limit = Some(n);
                        i += 1;
                    } else {
                        eprintln!("Error: --limit requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --limit requires a number");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => data_dir = Some(PathBuf::from(&args[i])),
            other => {
                eprintln!("Unknown flag: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let base_dir =
        expand_path(config.get::<String>("data.base_dir").unwrap_or_else(|_| ".".to_string()));
    let data_dir = data_dir.unwrap_or_else(|| {
        let dir: String =
            config.get("data.raw_txt_dir").unwrap_or_else(|_| "assets/data/docs".to_string());
        resolve_with_base(&base_dir, dir)
    });
    let db_path = resolve_with_base(
        &base_dir,
        config.get::<String>("data.db_path").unwrap_or_else(|_| "assets/db/rag.db".to_string()),
    );
    let chunking = ChunkingConfig {
        window_size: window_size
            .unwrap_or_else(|| config.get("chunking.window_size").unwrap_or(700)),
        overlap_size: overlap_size
            .unwrap_or_else(|| config.get("chunking.overlap_size").unwrap_or(150)),
    };
    // Fail on bad parameters before touching any document.
    chunking.validate()?;

    println!("RAGDB Indexer\n=============");
    println!("Data directory: {}", data_dir.display());
    println!("Store: {}", db_path.display());
    println!("Window: {} chars, overlap: {} chars", chunking.window_size, chunking.overlap_size);

    let processor = DataProcessor::with_chunking(chunking);
    let chunks = if let Some(limit) = limit {
        println!("🔢 Limiting indexing to {} files", limit);
        processor.process_directory_limited(&data_dir, limit)?
    } else {
        processor.process_directory(&data_dir)?
    };

    let model_dir = config
        .get::<String>("embedding.model_dir")
        .ok()
        .map(|p| resolve_with_base(&base_dir, p));
    let embedder = get_embedder(model_dir.as_deref())?;
    let mut store = VectorStore::open(&db_path)?;
    let report = IndexWriter::new(&mut store, embedder.as_ref()).rebuild(&chunks)?;

    println!("\n✅ Indexing completed successfully!");
    println!(
        "📊 {} chunks from {} documents ({} skipped)",
        report.chunks_indexed, report.documents, report.chunks_skipped
    );
    println!("\n💡 To search, use: cargo run --bin ragdb-search '<query>'");
    Ok(())
}
