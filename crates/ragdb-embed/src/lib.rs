//! Local sentence embeddings.
//!
//! `MiniLmEmbedder` runs an `all-MiniLM-L6-v2` style BERT encoder from a
//! local model directory (tokenizer.json + config.json + weights) and pools
//! the hidden states into one L2-normalized vector per input. `FakeEmbedder`
//! produces deterministic hashed vectors for tests and development; switch
//! with `RAGDB_USE_FAKE_EMBEDDINGS=1`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use ragdb_core::error::{Error, Result};
use ragdb_core::traits::Embedder;

mod device;
mod pool;
mod tokenize;

pub use device::select_device;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_padded;

/// Maximum tokens per input; longer inputs are truncated.
const MAX_LEN: usize = 256;

/// Dimensionality of the fake embedder, matching the MiniLM family.
const FAKE_DIM: usize = 384;

pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    id: String,
    dim: usize,
}

impl MiniLmEmbedder {
    /// Load the model from the conventional directory (see
    /// `RAGDB_MODEL_DIR` / `MODEL_DIR` / `assets/models/all-MiniLM-L6-v2`).
    pub fn new() -> Result<Self> {
        let model_dir = resolve_model_dir()?;
        Self::from_dir(&model_dir)
    }

    pub fn from_dir(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        println!("🔄 Loading embedding model from {}...", model_dir.display());

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            Error::ModelUnavailable(format!("tokenizer {}: {}", tokenizer_path.display(), e))
        })?;

        let config_path = model_dir.join("config.json");
        let config_text = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::ModelUnavailable(format!("config {}: {}", config_path.display(), e))
        })?;
        let config: BertConfig = serde_json::from_str(&config_text).map_err(|e| {
            Error::ModelUnavailable(format!("config {}: {}", config_path.display(), e))
        })?;

        let vb = load_weights(model_dir, &device)?;
        let model = BertModel::load(vb, &config)
            .map_err(|e| Error::ModelUnavailable(format!("model weights: {e}")))?;

        let id = model_dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "sentence-encoder".to_string());
        let dim = config.hidden_size;
        println!("✅ Embedding model '{}' loaded (dim={})", id, dim);
        Ok(Self { model, tokenizer, device, id, dim })
    }

    fn forward_pass(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) =
            tokenize_padded(&self.tokenizer, text, MAX_LEN, &self.device)?;
        let token_type_ids = input_ids.zeros_like().map_err(op_err)?;
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(op_err)?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let out: Vec<f32> = pooled
            .to_device(&Device::Cpu)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(op_err)?;
        if start.elapsed().as_millis() > 100 {
            println!("⚠️  Slow embedding ({} ms)", start.elapsed().as_millis());
        }
        Ok(out)
    }
}

fn op_err(e: candle_core::Error) -> Error {
    Error::Operation(format!("embedding forward pass failed: {e}"))
}

impl Embedder for MiniLmEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { MAX_LEN }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        self.forward_pass(text)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors_path = model_dir.join("model.safetensors");
    let tensors: HashMap<String, Tensor> = if safetensors_path.exists() {
        candle_core::safetensors::load(&safetensors_path, device).map_err(|e| {
            Error::ModelUnavailable(format!("weights {}: {}", safetensors_path.display(), e))
        })?
    } else {
        let pickle_path = model_dir.join("pytorch_model.bin");
        candle_core::pickle::read_all(&pickle_path)
            .map_err(|e| {
                Error::ModelUnavailable(format!("weights {}: {}", pickle_path.display(), e))
            })?
            .into_iter()
            .collect()
    };
    Ok(VarBuilder::from_tensors(tensors, DType::F32, device))
}

/// Deterministic hashed bag-of-words embedder. Same input text always maps
/// to the same unit-norm vector; no model files required.
pub struct FakeEmbedder {
    dim: usize,
    id: String,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim, id: format!("fake:d{dim}") }
    }
}

impl Embedder for FakeEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { MAX_LEN }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}

/// Construct the configured embedder: the fake one when
/// `RAGDB_USE_FAKE_EMBEDDINGS` is set, otherwise the local MiniLM model
/// from `model_dir` (falling back to the resolution chain when `None`).
pub fn get_embedder(model_dir: Option<&Path>) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("RAGDB_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        println!("🧪 Using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(FAKE_DIM)));
    }
    match model_dir {
        Some(dir) => Ok(Box::new(MiniLmEmbedder::from_dir(dir)?)),
        None => Ok(Box::new(MiniLmEmbedder::new()?)),
    }
}

/// `get_embedder` with the default model-directory resolution.
pub fn get_default_embedder() -> Result<Box<dyn Embedder>> {
    get_embedder(None)
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RAGDB_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            println!("📦 Using RAGDB_MODEL_DIR: {}", p.display());
            return Ok(p);
        }
    }
    if let Ok(dir) = std::env::var("MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            println!("📦 Using MODEL_DIR: {}", p.display());
            return Ok(p);
        }
    }
    for candidate in ["assets/models/all-MiniLM-L6-v2", "../assets/models/all-MiniLM-L6-v2"] {
        let p = Path::new(candidate);
        if p.exists() {
            println!("📦 Using model dir: {}", p.display());
            return Ok(p.to_path_buf());
        }
    }
    Err(Error::ModelUnavailable(
        "could not locate the all-MiniLM-L6-v2 model directory; set RAGDB_MODEL_DIR".to_string(),
    ))
}
