use crate::error::Result;

/// The single capability the engine needs from a model provider: turn text
/// into a fixed-dimension vector. Concrete model choice is configuration,
/// not a type hierarchy.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the backing model (e.g. `all-MiniLM-L6-v2`).
    /// A store remembers this id; mixing vectors from different models is
    /// rejected at insert time.
    fn id(&self) -> &str;
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Maximum token length per input; longer inputs are truncated.
    fn max_len(&self) -> usize;
    /// Embed one text. Input must be non-empty after trimming.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
    /// Batch form of `embed`: order-preserving, same length as the input.
    /// Exists as a performance hook; the default is per-item embedding.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}
