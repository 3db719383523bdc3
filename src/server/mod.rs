pub mod api;
pub mod websocket;

use crate::mediator::ChatMediator;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    http_port: u16,
    mediator: Arc<ChatMediator>,
}

impl Server {
    pub fn new(addr: String, http_port: u16, mediator: Arc<ChatMediator>) -> Self {
        Self { addr, http_port, mediator }
    }

    /// Starts the HTTP API in a background task, then runs the WebSocket
    /// accept loop on the current task.
    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(self.http_port, self.mediator.clone()).await?;
        websocket::start_ws_server(&self.addr, self.mediator.clone()).await?;
        Ok(())
    }
}
