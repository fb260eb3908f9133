//! Line-level JSON codec.
//!
//! The transport is line-delimited: one JSON object per line, no
//! framing beyond the newline. Decoding failures map to a typed error
//! the host can answer with, instead of tearing the connection down.

use thiserror::Error;

use crate::messages::{ClientRequest, ServerMessage};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed request: {0}")]
    Decode(serde_json::Error),

    #[error("failed to encode message: {0}")]
    Encode(serde_json::Error),
}

/// Parse one inbound line into a [`ClientRequest`].
pub fn decode_request(line: &str) -> Result<ClientRequest, ProtocolError> {
    serde_json::from_str(line.trim()).map_err(ProtocolError::Decode)
}

/// Serialize one outbound message to a single line (no trailing
/// newline).
pub fn encode_message(message: &ServerMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}

/// Client-side pair of the above: serialize a request to one line.
pub fn encode_request(request: &ClientRequest) -> Result<String, ProtocolError> {
    serde_json::to_string(request).map_err(ProtocolError::Encode)
}

/// Client-side pair of the above: parse one inbound line into a
/// [`ServerMessage`].
pub fn decode_message(line: &str) -> Result<ServerMessage, ProtocolError> {
    serde_json::from_str(line.trim()).map_err(ProtocolError::Decode)
}
