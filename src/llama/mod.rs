//! Llama-2 chat generator on top of candle.
//!
//! The network comes from candle-transformers, tokenization from the
//! tokenizers crate and sampling from candle's logits processor. This module
//! turns dialogs into prompts, enforces the length budgets and runs the
//! decoding loop.

use crate::generator::{BuildParams, ChatGenerator, SamplingParams};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

//======================================================================= Errors
mod error;
pub use error::*;

//========================================================= Device and precision
mod backend;
pub use backend::*;

//=============================================================== Model weights
mod model;
pub use model::*;

//============================================================ Chat messages
mod chat_message;
pub use chat_message::*;

//======================================================== Llama-2 chat format
mod chat_template;
pub use chat_template::*;

//==================================================================== Tokenizer
mod vocab;
pub use vocab::*;

//============================================================= KV cache/budget
mod context;
pub use context::*;

//===================================================================== Sampler
mod sampler;
pub use sampler::*;

//============================================================ Decoding loop
mod generated;
pub use generated::*;

/// Fails when a batch holds more dialogs than the generator was built for.
pub fn check_batch_size(n_dialogs: usize, max_batch_size: usize) -> Result<(), LlamaError> {
    if n_dialogs > max_batch_size {
        return Err(LlamaError::BatchTooLarge {
            n_dialogs,
            max_batch_size,
        });
    }
    Ok(())
}

/// A dialog after formatting and tokenization.
enum EncodedDialog {
    Prompt { tokens: Vec<u32>, total_len: usize },
    Unsafe,
}

pub struct Llama {
    backend: LlamaBackend,
    model: LlamaModel,
    vocab: LlamaVocab,
    template: LlamaChatTemplate,
    max_seq_len: usize,
    max_batch_size: usize,
    seed: u64,
}

impl Llama {
    /// Assemble a generator from loaded parts. `max_seq_len` is clamped to
    /// the model's trained context.
    pub fn new(
        backend: LlamaBackend,
        model: LlamaModel,
        vocab: LlamaVocab,
        params: &BuildParams,
    ) -> Result<Self, LlamaError> {
        check_limits(params)?;

        let n_ctx_train = model.n_ctx_train();
        let max_seq_len = if params.max_seq_len > n_ctx_train {
            warn!(
                "max_seq_len {} exceeds the model context {n_ctx_train}, clamping",
                params.max_seq_len
            );
            n_ctx_train
        } else {
            params.max_seq_len
        };

        Ok(Self {
            backend,
            model,
            vocab,
            template: LlamaChatTemplate,
            max_seq_len,
            max_batch_size: params.max_batch_size,
            seed: params.seed,
        })
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    fn encode(
        &self,
        dialog: &[LlamaChatMessage],
        max_gen_len: Option<usize>,
    ) -> Result<EncodedDialog, LlamaError> {
        let segments = self.template.apply(dialog)?;
        if self.template.is_unsafe(dialog) {
            warn!("dialog contains reserved chat tags, skipping generation");
            return Ok(EncodedDialog::Unsafe);
        }
        let tokens = self.vocab.tokenize_segments(&segments)?;
        let total_len = sequence_budget(tokens.len(), max_gen_len, self.max_seq_len)?;

        Ok(EncodedDialog::Prompt { tokens, total_len })
    }

    fn generate(
        &self,
        ctx: &mut LlamaContext,
        smpl: &mut LlamaSampler,
        tokens: Vec<u32>,
        total_len: usize,
    ) -> Result<String, LlamaError> {
        ctx.reset(&self.model, &self.backend)?;
        let n_prompt = tokens.len();

        let t_start = Instant::now();
        let chunks = LlamaGeneratedTokens {
            model: &self.model,
            backend: &self.backend,
            ctx,
            vocab: &self.vocab,
            smpl,
            pending: tokens,
            n_pos: 0,
            total_len,
            is_done: false,
        };
        let generated = chunks.collect::<Result<Vec<_>, _>>()?;

        let n_decode = generated.len();
        let elapsed = humantime::format_duration(t_start.elapsed());
        let speed = n_decode as f64 / t_start.elapsed().as_secs_f64();
        info!("prompt {n_prompt} tokens, decoded {n_decode} tokens in {elapsed}, speed: {speed:.2} tok/s");

        self.vocab.detokenize(&generated)
    }
}

fn check_limits(params: &BuildParams) -> Result<(), LlamaError> {
    if params.max_seq_len == 0 {
        return Err(LlamaError::InvalidParams("max_seq_len must be positive".into()));
    }
    if params.max_batch_size == 0 {
        return Err(LlamaError::InvalidParams("max_batch_size must be positive".into()));
    }
    Ok(())
}

impl ChatGenerator for Llama {
    type Error = LlamaError;

    #[instrument(skip_all, fields(ckpt_dir = %params.ckpt_dir.display()))]
    fn build(params: &BuildParams) -> Result<Self, LlamaError> {
        check_limits(params)?;

        let backend = LlamaBackend::default();
        let model = LlamaModel::load(&params.ckpt_dir, &backend)?;
        let vocab = LlamaVocab::from_file(
            &params.tokenizer_path,
            model.bos_token(),
            model.eos_token(),
        )?;
        debug!(bos = vocab.bos(), eos = vocab.eos(), "special tokens");

        Self::new(backend, model, vocab, params)
    }

    #[instrument(skip_all, fields(n_dialogs = dialogs.len()))]
    fn chat_completion(
        &mut self,
        dialogs: &[Dialog],
        params: &SamplingParams,
    ) -> Result<Vec<ChatPrediction>, LlamaError> {
        check_batch_size(dialogs.len(), self.max_batch_size)?;

        // Reject malformed dialogs before spending time on any generation
        let encoded = dialogs
            .iter()
            .map(|dialog| self.encode(dialog, params.max_gen_len))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ctx = LlamaContext::from_model(&self.model, &self.backend, self.max_seq_len)?;
        let mut smpl = LlamaSampler::new(self.seed, params.temperature, params.top_p);

        encoded
            .into_iter()
            .map(|dialog| match dialog {
                EncodedDialog::Prompt { tokens, total_len } => {
                    let content = self.generate(&mut ctx, &mut smpl, tokens, total_len)?;
                    Ok(ChatPrediction::assistant(content))
                }
                EncodedDialog::Unsafe => Ok(ChatPrediction::assistant(UNSAFE_ERROR)),
            })
            .collect()
    }
}
