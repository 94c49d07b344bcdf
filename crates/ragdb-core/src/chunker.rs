//! Sliding-window text segmentation.
//!
//! The window function is pure: same text and config always produce the same
//! ordered sequence of windows. Offsets are character offsets so the math in
//! the invariants below holds for multi-byte UTF-8 text as well.

use crate::error::{Error, Result};

/// Window/overlap sizes in characters.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub window_size: usize,
    pub overlap_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { window_size: 700, overlap_size: 150 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidConfig("window_size must be positive".to_string()));
        }
        if self.overlap_size >= self.window_size {
            return Err(Error::InvalidConfig(format!(
                "overlap_size ({}) must be smaller than window_size ({})",
                self.overlap_size, self.window_size
            )));
        }
        Ok(())
    }
}

/// One window over a document: `[start, end)` in characters plus the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Split `text` into overlapping windows of `window_size` characters.
///
/// The start position advances by `window_size - overlap_size` per step, so
/// adjacent windows share exactly `overlap_size` characters. The final window
/// may be shorter than `window_size`; iteration stops once a window reaches
/// the end of the text. Empty input yields no windows.
pub fn split_windows(text: &str, config: &ChunkingConfig) -> Result<Vec<TextWindow>> {
    config.validate()?;

    // Byte offset of every character boundary, so windows slice on char
    // boundaries while offsets stay character-based.
    let mut boundaries: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
    boundaries.push(text.len());
    let char_count = boundaries.len() - 1;

    let step = config.window_size - config.overlap_size;
    let mut windows = Vec::new();
    let mut start = 0usize;
    while start < char_count {
        let end = (start + config.window_size).min(char_count);
        windows.push(TextWindow {
            start,
            end,
            text: text[boundaries[start]..boundaries[end]].to_string(),
        });
        if end == char_count {
            break;
        }
        start += step;
    }
    Ok(windows)
}

/// Collapse all runs of whitespace (including CR/LF) into single spaces.
///
/// Applied once at document load time; the window function itself never
/// rewrites its input.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
