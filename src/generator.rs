use crate::llama::{ChatPrediction, Dialog};
use serde::Serialize;
use std::path::PathBuf;

/// Parameters needed to construct a generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildParams {
    pub ckpt_dir: PathBuf,
    pub tokenizer_path: PathBuf,
    pub max_seq_len: usize,
    pub max_batch_size: usize,
    pub seed: u64,
}

/// Sampling configuration for a chat completion call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    /// `None` lets the generator pick its own limit.
    pub max_gen_len: Option<usize>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.95,
            max_gen_len: None,
        }
    }
}

/// A chat model that can answer a batch of dialogs.
///
/// `run` only talks to the model through this trait, so any backend (or a
/// test double) can be plugged in.
pub trait ChatGenerator: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the model described by `params`.
    fn build(params: &BuildParams) -> Result<Self, Self::Error>;

    /// Generate one reply per dialog. Replies come back in input order.
    fn chat_completion(
        &mut self,
        dialogs: &[Dialog],
        params: &SamplingParams,
    ) -> Result<Vec<ChatPrediction>, Self::Error>;
}
