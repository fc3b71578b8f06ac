use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems detected before any model resource is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Checkpoint directory '{}' not found.", .0.display())]
    MissingCheckpointDir(PathBuf),
    #[error("Tokenizer file '{}' not found.", .0.display())]
    MissingTokenizerFile(PathBuf),
}
