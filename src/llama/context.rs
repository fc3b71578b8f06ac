use tracing::warn;

use super::*;
use candle_core::Tensor;
use candle_transformers::models::llama::Cache;

/// KV cache for one sequence, bounded by `n_ctx` positions.
pub struct LlamaContext {
    cache: Cache,
    n_ctx: usize,
}

impl LlamaContext {
    pub fn from_model(
        model: &LlamaModel,
        backend: &LlamaBackend,
        n_ctx: usize,
    ) -> Result<Self, LlamaError> {
        let cache = Cache::new(true, backend.dtype, model.config(), &backend.device)?;
        Ok(Self { cache, n_ctx })
    }

    /// Drop every cached key/value so the next sequence starts at position 0.
    pub fn reset(&mut self, model: &LlamaModel, backend: &LlamaBackend) -> Result<(), LlamaError> {
        self.cache = Cache::new(true, backend.dtype, model.config(), &backend.device)?;
        Ok(())
    }

    /// Run `tokens` starting at position `n_pos`, returning the logits of the
    /// last one.
    pub fn decode(
        &mut self,
        model: &LlamaModel,
        backend: &LlamaBackend,
        tokens: &[u32],
        n_pos: usize,
    ) -> Result<Tensor, LlamaError> {
        if n_pos + tokens.len() > self.n_ctx {
            warn!(
                "{} tokens exceeding context size ({n_pos}/{})",
                tokens.len(),
                self.n_ctx
            );
        }
        let input = Tensor::new(tokens, &backend.device)?.unsqueeze(0)?;
        let logits = model.net().forward(&input, n_pos, &mut self.cache)?;
        Ok(logits.squeeze(0)?)
    }
}

/// Total sequence length allowed for a prompt of `n_prompt` tokens.
///
/// `max_gen_len` defaults to `n_ctx - 1`; the result never exceeds `n_ctx`.
pub fn sequence_budget(
    n_prompt: usize,
    max_gen_len: Option<usize>,
    n_ctx: usize,
) -> Result<usize, LlamaError> {
    if n_prompt > n_ctx {
        return Err(LlamaError::PromptTooLong {
            n_tokens: n_prompt,
            max_seq_len: n_ctx,
        });
    }
    let max_gen_len = max_gen_len.unwrap_or(n_ctx.saturating_sub(1));

    Ok(n_ctx.min(n_prompt.saturating_add(max_gen_len)))
}
