use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlamaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
    #[error("no *.safetensors checkpoint files found in '{}'", .0.display())]
    NoCheckpointFiles(PathBuf),
    #[error("model has no '{0}' token")]
    MissingSpecialToken(&'static str),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("invalid dialog: {0}")]
    InvalidDialog(String),
    #[error("batch of {n_dialogs} dialogs exceeds max_batch_size {max_batch_size}")]
    BatchTooLarge {
        n_dialogs: usize,
        max_batch_size: usize,
    },
    #[error("prompt of {n_tokens} tokens exceeds max_seq_len {max_seq_len}")]
    PromptTooLong { n_tokens: usize, max_seq_len: usize },
}

impl From<tokenizers::Error> for LlamaError {
    fn from(e: tokenizers::Error) -> Self {
        Self::Tokenizer(e.to_string())
    }
}
