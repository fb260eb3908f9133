//! matchbook-protocol
//!
//! Wire-level message types and line codec for the matchbook host.
//!
//! Every message is one line of JSON shaped as `{"type": .., "payload": ..}`:
//! - [`messages`] : typed requests, responses, and events.
//! - [`codec`]    : string-level decode/encode with protocol errors.

pub mod codec;
pub mod messages;

pub use codec::{decode_message, decode_request, encode_message, encode_request, ProtocolError};
pub use messages::{
    ClientRequest, ErrorMessage, NewOrderRequest, OrderAccepted, ServerMessage, SnapshotRequest,
    SubscribeRequest, DEFAULT_BOOK_DEPTH,
};
