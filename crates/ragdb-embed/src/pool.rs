use candle_core::Tensor;

use ragdb_core::error::{Error, Result};

/// Mean-pool `hidden` (`[B, T, H]`) over the unmasked tokens of
/// `attention_mask` (`[B, T]`), then L2-normalize each row.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    assert_eq!(hidden.dims().len(), 3, "hidden shape must be [B,T,H]");
    mean_pool(hidden, attention_mask)
        .map_err(|e| Error::Operation(format!("pooling failed: {e}")))
}

fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask = attention_mask
        .to_device(hidden.device())?
        .to_dtype(hidden.dtype())?;
    let mask_3d = mask.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask_3d)?.sum(1)?;
    let counts = mask.sum_keepdim(1)?;
    let mean = summed.broadcast_div(&counts)?;

    let eps = Tensor::new(&[1e-12f32], hidden.device())?.to_dtype(hidden.dtype())?;
    let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?.broadcast_add(&eps)?;
    mean.broadcast_div(&norm)
}
