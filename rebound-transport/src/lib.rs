//! Serialization and delivery of ball snapshots to remote observers.
//!
//! [`NetworkBroadcaster`] is the concrete [`StateBroadcaster`](rebound_core::StateBroadcaster):
//! each `send_ball_action` call is turned into one frame by a [`Serializer`]
//! and handed to a [`Sender`]. Frames are always line-safe text so the same
//! serializers work for stdout, files and WebSocket clients.

use std::io;
use thiserror::Error;

mod broadcaster;
mod sender;
mod serializer;
#[cfg(feature = "websocket")]
mod websocket;

pub use broadcaster::{BroadcastStats, NetworkBroadcaster};
pub use sender::{FileSender, NullSender, Sender, StdioSender};
pub use serializer::{BinarySerializer, JsonSerializer, Serializer};
#[cfg(feature = "websocket")]
pub use websocket::WebSocketSender;

/// Error types for serialization operations
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary serialization error: {0}")]
    Binary(#[from] bincode::Error),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Error types that can occur while delivering frames.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}
