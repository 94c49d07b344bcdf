//! Corpus ingestion: walk source files, normalize, and chunk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::chunker::{normalize_whitespace, split_windows, ChunkingConfig};
use crate::error::Result;
use crate::types::DocumentChunk;

#[derive(Default)]
pub struct DataProcessor {
    chunking: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_chunking(chunking: ChunkingConfig) -> Self { Self { chunking } }

    /// Chunk every `.txt` file under `data_dir` (recursive, sorted order).
    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let files = self.list_txt_files(data_dir);
        if files.is_empty() {
            println!("No .txt files found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        self.process_paths(&files)
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<DocumentChunk>> {
        let mut files = self.list_txt_files(data_dir);
        if files.is_empty() {
            println!("No .txt files found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        if files.len() > limit {
            files.truncate(limit);
            println!("🔢 Limited to first {} files", limit);
        }
        self.process_paths(&files)
    }

    /// Chunk an explicit set of files, preserving the given order.
    pub fn process_paths(&self, files: &[PathBuf]) -> Result<Vec<DocumentChunk>> {
        self.chunking.validate()?;
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            println!("Processing file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            let content = self.read_file_content(file_path)?;
            let chunks = self.chunk_document(&content, file_path)?;
            if chunks.is_empty() {
                println!("  0 chunks (document is empty)");
            }
            all_chunks.extend(chunks);
        }
        println!("Processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    fn chunk_document(&self, content: &str, file_path: &Path) -> Result<Vec<DocumentChunk>> {
        let text = normalize_whitespace(content);
        let windows = split_windows(&text, &self.chunking)?;
        let doc_id = extract_doc_id(file_path);
        let total_chunks = windows.len();
        Ok(windows
            .into_iter()
            .enumerate()
            .map(|(chunk_index, w)| DocumentChunk {
                doc_id: doc_id.clone(),
                source: file_path.to_string_lossy().to_string(),
                chunk_index,
                total_chunks,
                start_offset: w.start,
                end_offset: w.end,
                content: w.text,
            })
            .collect())
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") {
                txt_files.push(path.to_path_buf());
            }
        }
        txt_files.sort();
        txt_files
    }
}

fn extract_doc_id(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string_lossy().to_string())
}
