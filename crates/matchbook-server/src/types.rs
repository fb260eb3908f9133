//! Shared types for the matchbook TCP host.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connected clients
//! - `ClientHandle`: a client's outbound channel plus subscription state
//! - `EngineRequest`: messages flowing from client tasks to the engine loop
//! - channel aliases between clients and the engine loop

use std::collections::HashMap;
use std::sync::Arc;

use matchbook_core::{Order, OrderBook};
use matchbook_protocol::ServerMessage;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Identifier for a connected client.
///
/// This is intentionally opaque; we just guarantee uniqueness over the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

/// Outbound messages from the host to a given client.
pub type OutboundTx = mpsc::UnboundedSender<ServerMessage>;
pub type OutboundRx = mpsc::UnboundedReceiver<ServerMessage>;

/// Per-client state kept by the host.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub tx: OutboundTx,

    /// Book depth for `ORDER_BOOK_CHANGE` events; `None` until the
    /// client subscribes.
    pub depth: Option<usize>,
}

/// Registry of connected clients.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, ClientHandle>>>;

/// Message flowing from a client task into the central engine task.
#[derive(Debug)]
pub enum EngineRequest {
    /// Fire-and-forget order submission.
    SubmitOrder { order: Order },

    /// Point-in-time book query; answered through the oneshot.
    Snapshot { reply: oneshot::Sender<OrderBook> },
}

/// Channel from clients to the engine task.
pub type EngineTx = mpsc::UnboundedSender<EngineRequest>;
pub type EngineRx = mpsc::UnboundedReceiver<EngineRequest>;
