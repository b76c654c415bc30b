use common::messages::Response;
use thiserror::Error;
use tokio::sync::mpsc;
use warp::ws::Message;

#[derive(Error, Debug)]
pub enum SendError {
    #[error("Error sending message")]
    Closed,
    #[error("Error serializing message: {0}")]
    Serialize(#[from] serde_json::Error),
}

// Outgoing half of a client's websocket
#[derive(Debug, Clone)]
pub struct Sender(pub mpsc::UnboundedSender<Result<Message, warp::Error>>);

pub trait SendMsg {
    fn send(&self, msg: &str) -> Result<(), SendError>;

    fn send_response(&self, response: &Response) -> Result<(), SendError> {
        let msg = serde_json::to_string(response)?;
        self.send(&msg)
    }
}

impl SendMsg for Sender {
    fn send(&self, msg: &str) -> Result<(), SendError> {
        self.0
            .send(Ok(Message::text(msg)))
            .map_err(|_| SendError::Closed)
    }
}
