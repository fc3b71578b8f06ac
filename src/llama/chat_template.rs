use super::*;

pub const B_INST: &str = "[INST]";
pub const E_INST: &str = "[/INST]";
pub const B_SYS: &str = "<<SYS>>\n";
pub const E_SYS: &str = "\n<</SYS>>\n\n";

const SPECIAL_TAGS: [&str; 4] = [B_INST, E_INST, "<<SYS>>", "<</SYS>>"];

pub const UNSAFE_ERROR: &str = "Error: special tags are not allowed as part of the prompt.";

/// A piece of the prompt that is tokenized on its own. Every segment starts
/// with BOS, finished turns also end with EOS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSegment {
    pub text: String,
    pub eos: bool,
}

/// Llama-2 chat format
#[derive(Debug, Default, Clone, Copy)]
pub struct LlamaChatTemplate;

impl LlamaChatTemplate {
    /// True when a message smuggles in the format's own control tags.
    pub fn is_unsafe(&self, dialog: &[LlamaChatMessage]) -> bool {
        dialog
            .iter()
            .any(|msg| SPECIAL_TAGS.iter().any(|tag| msg.content.contains(tag)))
    }

    /// Apply chat template
    pub fn apply(&self, dialog: &[LlamaChatMessage]) -> Result<Vec<PromptSegment>, LlamaError> {
        let merged = merge_system(dialog)?;

        let roles_ok = merged.iter().enumerate().all(|(i, msg)| {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            msg.role == expected
        });
        if !roles_ok {
            return Err(LlamaError::InvalidDialog(
                "roles must be 'system' (optional), then 'user' and 'assistant' alternating".into(),
            ));
        }
        let Some(last) = merged.last().filter(|m| m.role == Role::User) else {
            return Err(LlamaError::InvalidDialog("last message must be from user".into()));
        };

        let mut segments: Vec<PromptSegment> = merged
            .chunks_exact(2)
            .map(|pair| PromptSegment {
                text: format!(
                    "{B_INST} {} {E_INST} {} ",
                    pair[0].content.trim(),
                    pair[1].content.trim()
                ),
                eos: true,
            })
            .collect();
        segments.push(PromptSegment {
            text: format!("{B_INST} {} {E_INST}", last.content.trim()),
            eos: false,
        });

        Ok(segments)
    }
}

fn merge_system(dialog: &[LlamaChatMessage]) -> Result<Vec<LlamaChatMessage>, LlamaError> {
    match dialog {
        [] => Err(LlamaError::InvalidDialog("dialog is empty".into())),
        [system, first, rest @ ..] if system.role == Role::System => {
            let mut merged = Vec::with_capacity(rest.len() + 1);
            merged.push(LlamaChatMessage::new(
                first.role,
                format!("{B_SYS}{}{E_SYS}{}", system.content, first.content),
            ));
            merged.extend_from_slice(rest);
            Ok(merged)
        }
        [system] if system.role == Role::System => Err(LlamaError::InvalidDialog(
            "system message must be followed by a user message".into(),
        )),
        _ => Ok(dialog.to_vec()),
    }
}
