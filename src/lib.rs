use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod generator;
pub mod instructions;
pub mod llama;
pub mod transcript;

pub use config::Args;
pub use error::ConfigError;
pub use generator::{BuildParams, ChatGenerator, SamplingParams};

/// Log filter from `RUST_LOG`, falling back to `info` when it is unset or
/// unparsable.
pub fn log_filter() -> EnvFilter {
    filter_or_info(std::env::var(EnvFilter::DEFAULT_ENV).ok())
}

fn filter_or_info(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Make sure the checkpoint directory and tokenizer file exist, in that order.
pub fn validate_paths(ckpt_dir: &Path, tokenizer_path: &Path) -> Result<(), ConfigError> {
    if !ckpt_dir.is_dir() {
        return Err(ConfigError::MissingCheckpointDir(ckpt_dir.to_path_buf()));
    }
    if !tokenizer_path.is_file() {
        return Err(ConfigError::MissingTokenizerFile(tokenizer_path.to_path_buf()));
    }
    Ok(())
}

/// Validate paths, build the generator, answer the example instructions in
/// one batch and write the transcript to `out`.
#[instrument(skip_all)]
pub fn run<G: ChatGenerator, W: Write>(args: &Args, out: &mut W) -> anyhow::Result<()> {
    validate_paths(&args.ckpt_dir, &args.tokenizer_path)?;

    let mut generator = G::build(&args.build_params())?;

    let instructions = instructions::example_instructions();
    let sampling = args.sampling_params();
    debug!(?sampling, n_instructions = instructions.len(), "chat completion");
    let results = generator.chat_completion(&instructions, &sampling)?;
    info!("received {} results", results.len());

    transcript::write_transcript(out, &instructions, &results)?;
    out.flush()?;

    Ok(())
}
