use async_trait::async_trait;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;

use super::CompletionClient;
use crate::models::chat::Message;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAIChatClient {
    http: HttpClient,
    base_url: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: AssistantTurn,
}

#[derive(Deserialize)]
struct AssistantTurn {
    content: String,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        if api_key.is_empty() {
            return Err("Chat completion API key is required".into());
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
                format!("Invalid API key format: {}", e)
            )?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAIChatClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        max_tokens: u32,
        temperature: f32
    ) -> Result<String, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let req = ChatCompletionRequest {
            model,
            messages,
            max_tokens,
            temperature,
        };

        let resp = self.http
            .post(&url)
            .json(&req)
            .send().await?
            .error_for_status()?
            .json::<ChatCompletionResponse>().await?;

        let content = resp.choices
            .first()
            .ok_or_else(|| "No response from completion API".to_string())?
            .message.content.clone();

        Ok(content)
    }
}
