use tracing::{debug, info};

use super::*;
use candle_nn::VarBuilder;
use candle_transformers::models::llama::{self as llama_net, LlamaEosToks};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Network weights plus the config they were built from.
pub struct LlamaModel {
    net: llama_net::Llama,
    config: llama_net::Config,
}

impl LlamaModel {
    /// Load `config.json` and every `*.safetensors` shard in `ckpt_dir`.
    pub fn load(ckpt_dir: &Path, backend: &LlamaBackend) -> Result<Self, LlamaError> {
        let t_start = Instant::now();

        let config_path = ckpt_dir.join("config.json");
        let config: llama_net::LlamaConfig =
            serde_json::from_slice(&std::fs::read(&config_path)?)?;
        let config = config.into_config(false);
        debug!(
            vocab_size = config.vocab_size,
            hidden_size = config.hidden_size,
            num_layers = config.num_hidden_layers,
            max_position_embeddings = config.max_position_embeddings,
            "model config"
        );

        let weight_files = find_checkpoints(ckpt_dir)?;
        info!("loading {} checkpoint file(s)", weight_files.len());

        // Safety: the shards are mapped read-only and must not be modified
        // while the model is alive.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&weight_files, backend.dtype, &backend.device)?
        };
        let model = Self::from_var_builder(vb, config)?;

        let elapsed = humantime::format_duration(t_start.elapsed());
        info!("loaded model in {elapsed}");

        Ok(model)
    }

    pub fn from_var_builder(vb: VarBuilder, config: llama_net::Config) -> Result<Self, LlamaError> {
        let net = llama_net::Llama::load(vb, &config)?;
        Ok(Self { net, config })
    }

    pub fn net(&self) -> &llama_net::Llama {
        &self.net
    }

    pub fn config(&self) -> &llama_net::Config {
        &self.config
    }

    pub fn bos_token(&self) -> Option<u32> {
        self.config.bos_token_id
    }

    /// First EOS id declared by the config
    pub fn eos_token(&self) -> Option<u32> {
        match &self.config.eos_token_id {
            Some(LlamaEosToks::Single(id)) => Some(*id),
            Some(LlamaEosToks::Multiple(ids)) => ids.first().copied(),
            None => None,
        }
    }

    pub fn n_ctx_train(&self) -> usize {
        self.config.max_position_embeddings
    }
}

/// Sorted list of safetensors shards in `dir`.
pub fn find_checkpoints(dir: &Path) -> Result<Vec<PathBuf>, LlamaError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "safetensors") {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(LlamaError::NoCheckpointFiles(dir.to_path_buf()));
    }
    files.sort();

    Ok(files)
}
