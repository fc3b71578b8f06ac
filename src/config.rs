use crate::generator::{BuildParams, SamplingParams};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

/// Run a few coding instructions through a Llama chat model
#[derive(Parser, Serialize, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding config.json and the *.safetensors weights
    #[arg(long)]
    pub ckpt_dir: PathBuf,

    /// Path to tokenizer.json
    #[arg(long)]
    pub tokenizer_path: PathBuf,

    /// Sampling temperature, lower is more deterministic
    #[arg(long, default_value_t = 0.2)]
    pub temperature: f64,

    /// Nucleus sampling threshold
    #[arg(long, default_value_t = 0.95)]
    pub top_p: f64,

    /// Maximum sequence length (prompt plus generation)
    #[arg(long, default_value_t = 512)]
    pub max_seq_len: usize,

    /// Maximum number of instructions in one batch
    #[arg(long, default_value_t = 8)]
    pub max_batch_size: usize,

    /// Maximum number of generated tokens, unlimited when omitted
    #[arg(long)]
    pub max_gen_len: Option<usize>,

    /// Seed for the sampler
    #[arg(long, default_value_t = 1)]
    pub seed: u64,
}

impl Args {
    pub fn build_params(&self) -> BuildParams {
        BuildParams {
            ckpt_dir: self.ckpt_dir.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            max_seq_len: self.max_seq_len,
            max_batch_size: self.max_batch_size,
            seed: self.seed,
        }
    }

    pub fn sampling_params(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            top_p: self.top_p,
            max_gen_len: self.max_gen_len,
        }
    }
}
