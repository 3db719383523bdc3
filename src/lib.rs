pub mod cli;
pub mod config;
pub mod llm;
pub mod mediator;
pub mod models;
pub mod server;

use cli::Args;
use log::info;
use mediator::ChatMediator;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("WS Server Address: {}", args.server_addr);
    info!("HTTP API Port: {}", args.http_port);
    info!("Chat Model: {}", args.chat_model);
    info!(
        "System Prompt Source: {}",
        args.system_prompt_path.as_deref().unwrap_or("built-in default")
    );
    info!("-------------------------");

    let system_prompt = config::prompt::load_system_prompt(args.system_prompt_path.as_deref())?;
    let client = llm::chat::new_client(&args)?;
    let mediator = Arc::new(ChatMediator::new(client, args.chat_model.clone(), system_prompt));

    let server = Server::new(args.server_addr.clone(), args.http_port, mediator);
    server.run().await?;

    Ok(())
}
