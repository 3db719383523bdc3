use std::fs;
use log::info;
use thiserror::Error;

/// Instruction prepended to conversations that arrive without a system turn.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful, friendly AI assistant. Provide concise, accurate, and helpful responses to user queries.";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read system prompt file '{path}': {source}")] Io {
        path: String,
        source: std::io::Error,
    },
    #[error("System prompt file '{0}' is empty")] Empty(String),
}

/// Resolves the system instruction text once at startup. With no path the
/// built-in default is used; otherwise the file contents are read verbatim
/// (trailing newline stripped).
pub fn load_system_prompt(path: Option<&str>) -> Result<String, PromptError> {
    match path {
        None => Ok(DEFAULT_SYSTEM_PROMPT.to_string()),
        Some(path) => {
            let text = fs
                ::read_to_string(path)
                .map_err(|source| PromptError::Io { path: path.to_string(), source })?;
            let text = text.trim_end_matches('\n').to_string();
            if text.is_empty() {
                return Err(PromptError::Empty(path.to_string()));
            }
            info!("Loaded system prompt from '{}' ({} bytes)", path, text.len());
            Ok(text)
        }
    }
}
