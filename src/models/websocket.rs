use serde::{ Serialize, Deserialize };

use super::chat::{ Message, ReplyEnvelope };

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "chat_message")] ChatMessage {
        messages: Vec<Message>,
    },
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "status")] Status {
        message: String,
    },
    #[serde(rename = "chat_response")] ChatResponse {
        message: ReplyEnvelope,
    },
    #[serde(rename = "error")] Error {
        message: String,
    },
}
