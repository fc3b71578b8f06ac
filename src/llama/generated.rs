use super::*;

pub type LlamaGenerated = Result<u32, LlamaError>;

/// Autoregressive decoding loop. Yields sampled token ids until EOS or until
/// the sequence reaches `total_len`; EOS itself is never yielded.
pub struct LlamaGeneratedTokens<'a> {
    pub model: &'a LlamaModel,
    pub backend: &'a LlamaBackend,
    pub ctx: &'a mut LlamaContext,
    pub vocab: &'a LlamaVocab,
    pub smpl: &'a mut LlamaSampler,
    /// Tokens not yet fed to the model (the prompt, then each sampled token)
    pub pending: Vec<u32>,
    pub n_pos: usize,
    pub total_len: usize,
    pub is_done: bool,
}

impl Iterator for LlamaGeneratedTokens<'_> {
    type Item = LlamaGenerated;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done || self.n_pos + self.pending.len() >= self.total_len {
            return None;
        }

        let logits = match self
            .ctx
            .decode(self.model, self.backend, &self.pending, self.n_pos)
        {
            Ok(logits) => logits,
            Err(e) => {
                self.is_done = true;
                return Some(Err(e));
            }
        };
        self.n_pos += self.pending.len();

        let new_token_id = match self.smpl.sample(&logits) {
            Ok(token) => token,
            Err(e) => {
                self.is_done = true;
                return Some(Err(e));
            }
        };

        if self.vocab.is_eog(new_token_id) {
            // End of generation
            self.is_done = true;
            return None;
        }

        self.pending.clear();
        self.pending.push(new_token_id);

        Some(Ok(new_token_id))
    }
}
