//! Central engine loop.
//!
//! This task exclusively owns the `MatchingEngine` and processes all
//! `EngineRequest`s coming from client tasks, strictly in arrival
//! order. Nothing else ever touches the book, which is what upholds
//! the no-interleaving guarantee: a match-then-insert sequence can
//! never overlap another order's.
//!
//! Book changes flow through the facade's own subscription mechanism
//! into a local channel and are drained into per-client broadcasts
//! after each request.

use matchbook_core::{MatchingEngine, OrderBook};
use matchbook_protocol::ServerMessage;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::depth::book_with_limit;
use crate::types::{ClientRegistry, EngineRequest, EngineRx};

/// Run the central engine processing loop.
///
/// - `engine_rx`: receives requests from all client tasks.
/// - `clients`: registry of connected clients and their outbound channels.
pub async fn run_engine_loop(mut engine_rx: EngineRx, clients: ClientRegistry) {
    let mut engine = MatchingEngine::new();

    let (change_tx, mut change_rx) = mpsc::unbounded_channel::<OrderBook>();
    let _subscription = engine.subscribe(move |book| {
        let _ = change_tx.send(book.clone());
    });

    while let Some(request) = engine_rx.recv().await {
        match request {
            EngineRequest::SubmitOrder { order } => engine.process_order(order),
            EngineRequest::Snapshot { reply } => {
                // The requesting client may have timed out and dropped
                // the receiver; that is its problem, not ours.
                let _ = reply.send(engine.snapshot());
            }
        }

        while let Ok(book) = change_rx.try_recv() {
            broadcast_change(&book, &clients).await;
        }
    }

    info!("engine loop shutting down (request channel closed)");
}

/// Send `ORDER_BOOK_CHANGE` to every subscribed client, truncated to
/// that client's requested depth.
async fn broadcast_change(book: &OrderBook, clients: &ClientRegistry) {
    let guard = clients.read().await;

    for (client_id, handle) in guard.iter() {
        if let Some(limit) = handle.depth {
            let message = ServerMessage::OrderBookChange(book_with_limit(book, limit));
            if handle.tx.send(message).is_err() {
                debug!(client = client_id.0, "change event for disconnected client dropped");
            }
        }
    }
}
