use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address and port for the WebSocket server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Port for the HTTP API server.
    #[arg(long, env = "PORT", default_value = "5000")]
    pub http_port: u16,

    /// API key for the chat completion provider.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gpt-4o)
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o")]
    pub chat_model: String,

    /// Base URL for the chat completion provider API. Defaults to the public
    /// OpenAI endpoint if not set.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Optional path to a file containing the system instruction text. The
    /// built-in default instruction is used if not set.
    #[arg(long, env = "SYSTEM_PROMPT_PATH")]
    pub system_prompt_path: Option<String>,
}
