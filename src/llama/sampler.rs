use super::*;
use candle_core::Tensor;
use candle_transformers::generation::{LogitsProcessor, Sampling};

pub struct LlamaSampler(LogitsProcessor);

impl LlamaSampler {
    pub fn new(seed: u64, temperature: f64, top_p: f64) -> Self {
        Self(LogitsProcessor::from_sampling(
            seed,
            sampling_for(temperature, top_p),
        ))
    }

    /// Pick the next token from the last position's logits.
    pub fn sample(&mut self, logits: &Tensor) -> Result<u32, LlamaError> {
        Ok(self.0.sample(logits)?)
    }
}

/// Nucleus sampling for positive temperatures, greedy otherwise.
pub fn sampling_for(temperature: f64, top_p: f64) -> Sampling {
    if temperature > 0.0 {
        Sampling::TopP {
            p: top_p,
            temperature,
        }
    } else {
        Sampling::ArgMax
    }
}
