use tracing::debug;

use super::*;
use std::path::Path;
use tokenizers::Tokenizer;

#[derive(Debug)]
pub struct LlamaVocab {
    bos: u32,
    eos: u32,
    tokenizer: Tokenizer,
}

impl LlamaVocab {
    /// Load tokenizer.json. BOS/EOS come from the model config when it names
    /// them, otherwise from the tokenizer's `<s>` / `</s>` entries.
    pub fn from_file(
        path: &Path,
        bos: Option<u32>,
        eos: Option<u32>,
    ) -> Result<Self, LlamaError> {
        let tokenizer = Tokenizer::from_file(path)?;
        Self::new(tokenizer, bos, eos)
    }

    pub fn new(tokenizer: Tokenizer, bos: Option<u32>, eos: Option<u32>) -> Result<Self, LlamaError> {
        let bos = bos
            .or_else(|| tokenizer.token_to_id("<s>"))
            .ok_or(LlamaError::MissingSpecialToken("<s>"))?;
        let eos = eos
            .or_else(|| tokenizer.token_to_id("</s>"))
            .ok_or(LlamaError::MissingSpecialToken("</s>"))?;

        Ok(Self {
            bos,
            eos,
            tokenizer,
        })
    }

    pub fn bos(&self) -> u32 {
        self.bos
    }

    pub fn eos(&self) -> u32 {
        self.eos
    }

    pub fn is_eog(&self, token: u32) -> bool {
        token == self.eos
    }

    /// Tokenize without the tokenizer's own special tokens
    pub fn tokenize(&self, txt: &str) -> Result<Vec<u32>, LlamaError> {
        let encoding = self.tokenizer.encode(txt, false)?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Turn prompt segments into one token stream: BOS + text (+ EOS) each.
    pub fn tokenize_segments(&self, segments: &[PromptSegment]) -> Result<Vec<u32>, LlamaError> {
        let mut tokens = Vec::new();
        for segment in segments {
            tokens.push(self.bos);
            tokens.extend(self.tokenize(&segment.text)?);
            if segment.eos {
                tokens.push(self.eos);
            }
        }
        debug!("Tokenized {} tokens", tokens.len());

        Ok(tokens)
    }

    pub fn detokenize(&self, tokens: &[u32]) -> Result<String, LlamaError> {
        Ok(self.tokenizer.decode(tokens, true)?)
    }
}
