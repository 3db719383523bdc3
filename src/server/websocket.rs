use crate::mediator::ChatMediator;
use crate::models::websocket::{ ClientMessage, ServerMessage };

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::io::{ AsyncRead, AsyncWrite };

use tokio_tungstenite::{ accept_async, WebSocketStream };
use tokio_tungstenite::tungstenite::protocol::Message;

use log::{ info, warn, error };
use futures::{ SinkExt, StreamExt };

const MAX_MESSAGE_SIZE: usize = 1 * 1024 * 1024;

pub async fn start_ws_server(
    addr: &str,
    mediator: Arc<ChatMediator>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("WS server listening on: {}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        info!("Incoming connection from: {}", peer);
        let mediator_clone = Arc::clone(&mediator);

        tokio::spawn(async move {
            match accept_async(stream).await {
                Ok(ws) => {
                    handle_connection(peer, ws, mediator_clone).await;
                }
                Err(e) => {
                    error!("Handshake failed for {}: {}", peer, e);
                }
            }
        });
    }
}

pub async fn handle_connection<S>(
    peer: SocketAddr,
    websocket: WebSocketStream<S>,
    mediator: Arc<ChatMediator>
)
    where S: AsyncRead + AsyncWrite + Unpin
{
    info!("New WebSocket connection: {}", peer);

    let (mut tx, mut rx) = websocket.split();

    let status = ServerMessage::Status { message: "Connected".to_string() };
    if tx.send(Message::Text(serde_json::to_string(&status).unwrap())).await.is_err() {
        error!("Failed to send connect status to {}", peer);
        return;
    }

    while let Some(msg) = rx.next().await {
        match msg {
            Ok(message) => {
                if message.len() > MAX_MESSAGE_SIZE {
                    warn!(
                        "Message from {} exceeds size limit ({} > {})",
                        peer,
                        message.len(),
                        MAX_MESSAGE_SIZE
                    );
                    let error_msg = ServerMessage::Error {
                        message: "Message too large".to_string(),
                    };
                    let json = serde_json::to_string(&error_msg).unwrap();
                    if tx.send(Message::Text(json)).await.is_err() {
                        error!("Failed to send size limit error to {}", peer);
                    }
                    break;
                }

                match message {
                    Message::Text(text) => {
                        let reply = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::ChatMessage { messages }) => {
                                chat_event_response(&mediator, messages).await
                            }
                            Err(e) => {
                                error!("Failed to parse message from {}: {}", peer, e);
                                ServerMessage::Error {
                                    message: format!("Failed to parse message: {}", e),
                                }
                            }
                        };

                        let json = serde_json::to_string(&reply).unwrap();
                        if let Err(e) = tx.send(Message::Text(json)).await {
                            error!("Error sending response to {}: {}", peer, e);
                            break;
                        }
                    }
                    Message::Close(_) => {
                        info!("Received close frame from {}", peer);
                        break;
                    }
                    Message::Ping(ping_data) => {
                        if tx.send(Message::Pong(ping_data)).await.is_err() {
                            error!("Failed to send pong to {}", peer);
                            break;
                        }
                    }
                    Message::Pong(_) => {/* Usually ignore pongs */}
                    Message::Binary(_) => {
                        warn!("Ignoring binary message from {}", peer);
                    }
                    Message::Frame(_) => {/* Usually ignore raw frames */}
                }
            }
            Err(e) => {
                match e {
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::Protocol(_)
                    | tokio_tungstenite::tungstenite::Error::Utf8 => {
                        info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                    }
                    tokio_tungstenite::tungstenite::Error::Io(ref io_err) if
                        io_err.kind() == std::io::ErrorKind::ConnectionReset
                    => {
                        info!("WebSocket connection reset by peer {}", peer);
                    }
                    _ => {
                        error!("Error receiving message from {}: {}", peer, e);
                    }
                }
                break;
            }
        }
    }
    info!("WebSocket connection closed for {}", peer);
}

/// Maps one `chat_message` event to its outbound event. Every mediator
/// failure, the empty-input case included, becomes an `error` event carrying
/// the failure text.
pub(crate) async fn chat_event_response(
    mediator: &ChatMediator,
    messages: Vec<crate::models::chat::Message>
) -> ServerMessage {
    match mediator.mediate(messages).await {
        Ok(envelope) => ServerMessage::ChatResponse { message: envelope },
        Err(e) => ServerMessage::Error { message: e.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::testing::MockCompletionClient;
    use crate::models::chat::{ Message as ChatTurn, Role };

    fn mediator(client: Arc<MockCompletionClient>) -> ChatMediator {
        ChatMediator::new(client, "test-model".to_string(), "You are a test assistant.".to_string())
    }

    #[tokio::test]
    async fn chat_event_success_is_a_chat_response() {
        let m = mediator(MockCompletionClient::replying("Hello!"));
        let event = chat_event_response(&m, vec![ChatTurn::new(Role::User, "Hi")]).await;

        match event {
            ServerMessage::ChatResponse { message } => {
                assert_eq!(message.role, Role::Assistant);
                assert_eq!(message.content, "Hello!");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_conversation_is_an_error_event() {
        let client = MockCompletionClient::replying("Hello!");
        let m = mediator(client.clone());
        let event = chat_event_response(&m, vec![]).await;

        match event {
            ServerMessage::Error { message } => assert_eq!(message, "No messages provided"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn remote_failure_is_an_error_event_with_cause_text() {
        let m = mediator(MockCompletionClient::failing("connection timed out"));
        let event = chat_event_response(&m, vec![ChatTurn::new(Role::User, "Hi")]).await;

        match event {
            ServerMessage::Error { message } => assert_eq!(message, "connection timed out"),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
