pub mod openai;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::cli::Args;
use crate::models::chat::Message;
use self::openai::OpenAIChatClient;

/// The remote completion collaborator. One call in, one reply text out; the
/// provider is opaque and untrusted for latency and failure behavior, so any
/// failure surfaces as a plain error for the caller to collapse.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        max_tokens: u32,
        temperature: f32
    ) -> Result<String, Box<dyn StdError + Send + Sync>>;
}

pub fn new_client(args: &Args) -> Result<Arc<dyn CompletionClient>, Box<dyn StdError + Send + Sync>> {
    let client = OpenAIChatClient::new(args.chat_api_key.clone(), args.chat_base_url.clone())?;
    Ok(Arc::new(client))
}
