//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ClientId`.
//! - Spawns:
//!   - a per-client task to handle I/O,
//!   - a single central engine task that owns the `MatchingEngine`.
//!
//! The actual per-client logic and engine loop live in `client` and
//! `engine_task` modules respectively.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use crate::client;
use crate::config::Config;
use crate::engine_task;
use crate::types::{
    ClientHandle, ClientId, ClientRegistry, EngineRx, EngineTx, OutboundRx, OutboundTx,
};

/// Global-ish counter for assigning unique `ClientId`s.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    ClientId(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Run the TCP server with the given configuration.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    // Shared registry of clients and their outbound channels.
    let clients: ClientRegistry = Arc::new(RwLock::new(HashMap::new()));

    // Channel from clients to the engine task.
    let (engine_tx, engine_rx): (EngineTx, EngineRx) = mpsc::unbounded_channel();

    // Spawn the central engine task.
    {
        let clients = clients.clone();
        tokio::spawn(async move {
            engine_task::run_engine_loop(engine_rx, clients).await;
        });
    }

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let connected = {
            let guard = clients.read().await;
            guard.len()
        };

        if connected >= config.max_clients {
            warn!(
                %peer_addr,
                max_clients = config.max_clients,
                "rejecting connection: client limit reached"
            );
            // Just drop the stream; the client sees the connection close.
            continue;
        }

        let client_id = next_client_id();
        info!(client = client_id.0, %peer_addr, "accepted connection");

        // Outbound channel for this client.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        {
            let mut guard = clients.write().await;
            guard.insert(
                client_id,
                ClientHandle {
                    tx: out_tx.clone(),
                    depth: None,
                },
            );
        }

        let clients = clients.clone();
        let engine_tx = engine_tx.clone();
        let snapshot_timeout = config.snapshot_timeout;

        tokio::spawn(async move {
            let result = client::run_client(
                client_id,
                stream,
                engine_tx,
                out_tx,
                out_rx,
                clients,
                snapshot_timeout,
            )
            .await;

            match result {
                Ok(()) => info!(client = client_id.0, "client disconnected"),
                Err(err) => warn!(client = client_id.0, error = %err, "client task failed"),
            }
        });
    }
}
