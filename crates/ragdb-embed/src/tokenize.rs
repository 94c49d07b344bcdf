use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

use ragdb_core::error::{Error, Result};

/// Padding token id for BERT-family vocabularies.
const PAD_TOKEN_ID: u32 = 0;

/// Encode `text` and pad/truncate to exactly `max_len` tokens, returning
/// `(input_ids, attention_mask)` tensors of shape `[1, max_len]`.
pub fn tokenize_padded(
    tokenizer: &Tokenizer,
    text: &str,
    max_len: usize,
    device: &Device,
) -> Result<(Tensor, Tensor)> {
    let enc = tokenizer
        .encode(text, true)
        .map_err(|e| Error::InvalidInput(format!("tokenization failed: {e}")))?;
    let mut ids = enc.get_ids().to_vec();
    let mut mask = enc.get_attention_mask().to_vec();
    if ids.len() > max_len {
        ids.truncate(max_len);
        mask.truncate(max_len);
    }
    if ids.len() < max_len {
        let pad = max_len - ids.len();
        ids.extend(std::iter::repeat(PAD_TOKEN_ID).take(pad));
        mask.extend(std::iter::repeat(0u32).take(pad));
    }
    to_tensors(ids, mask, max_len, device)
        .map_err(|e| Error::Operation(format!("building input tensors failed: {e}")))
}

fn to_tensors(
    ids: Vec<u32>,
    mask: Vec<u32>,
    max_len: usize,
    device: &Device,
) -> candle_core::Result<(Tensor, Tensor)> {
    let input_ids = Tensor::from_iter(ids, device)?.reshape((1, max_len))?;
    let attention_mask = Tensor::from_iter(mask, device)?.reshape((1, max_len))?;
    Ok((input_ids, attention_mask))
}
