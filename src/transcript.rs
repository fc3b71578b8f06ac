use crate::llama::{ChatPrediction, Dialog, Role};
use std::io::{self, Write};

pub const SEPARATOR: &str = "==================================";

/// "user" -> "User"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn role_label(role: Role) -> String {
    capitalize(&role.to_string())
}

/// Write each instruction followed by the generated reply.
pub fn write_transcript<W: Write>(
    out: &mut W,
    instructions: &[Dialog],
    results: &[ChatPrediction],
) -> io::Result<()> {
    for (instruction, result) in instructions.iter().zip(results) {
        for msg in instruction {
            writeln!(out, "{}: {}\n", role_label(msg.role), msg.content)?;
        }
        writeln!(
            out,
            "> {}: {}",
            role_label(result.generation.role),
            result.generation.content
        )?;
        writeln!(out, "\n{SEPARATOR}\n")?;
    }
    Ok(())
}
