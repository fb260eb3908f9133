//! Per-connection I/O.
//!
//! Each connection gets a reader loop (this task) and a writer task fed
//! by the client's outbound channel. Requests are validated here, at
//! the boundary; the engine only ever sees well-formed orders.

use std::time::Duration;

use anyhow::Result;
use matchbook_protocol::{codec, ClientRequest, ErrorMessage, OrderAccepted, ServerMessage};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::depth::book_with_limit;
use crate::types::{ClientId, ClientRegistry, EngineRequest, EngineTx, OutboundRx, OutboundTx};

/// Run the client I/O loop for a single connection.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    engine_tx: EngineTx,
    out_tx: OutboundTx,
    mut out_rx: OutboundRx,
    clients: ClientRegistry,
    snapshot_timeout: Duration,
) -> Result<()> {
    let (read_half, write_half) = stream.into_split();

    // Writer task: serialize ServerMessages as JSON lines.
    let writer = tokio::spawn(async move {
        let mut write_half = write_half;

        while let Some(message) = out_rx.recv().await {
            let line = match codec::encode_message(&message) {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, "failed to encode outbound message");
                    continue;
                }
            };

            if write_half.write_all(line.as_bytes()).await.is_err()
                || write_half.write_all(b"\n").await.is_err()
            {
                break;
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match codec::decode_request(&line) {
            Ok(request) => {
                handle_request(
                    client_id,
                    request,
                    &engine_tx,
                    &out_tx,
                    &clients,
                    snapshot_timeout,
                )
                .await;
            }
            Err(err) => {
                debug!(client = client_id.0, error = %err, "rejecting malformed request");
                let _ = out_tx.send(ServerMessage::Error(ErrorMessage::new("malformed request")));
            }
        }
    }

    // Deregister on disconnect; dropping the last sender ends the
    // writer task.
    {
        let mut guard = clients.write().await;
        guard.remove(&client_id);
    }
    drop(out_tx);
    let _ = writer.await;

    Ok(())
}

async fn handle_request(
    client_id: ClientId,
    request: ClientRequest,
    engine_tx: &EngineTx,
    out_tx: &OutboundTx,
    clients: &ClientRegistry,
    snapshot_timeout: Duration,
) {
    match request {
        ClientRequest::ProcessOrder(new_order) => {
            let order = match new_order.to_order() {
                Ok(order) => order,
                Err(err) => {
                    debug!(client = client_id.0, error = %err, "order rejected");
                    let _ = out_tx.send(ServerMessage::Error(ErrorMessage::new(err.to_string())));
                    return;
                }
            };

            if engine_tx.send(EngineRequest::SubmitOrder { order }).is_err() {
                warn!(client = client_id.0, "engine channel closed");
                let _ = out_tx.send(ServerMessage::Error(ErrorMessage::new("engine unavailable")));
                return;
            }

            let _ = out_tx.send(ServerMessage::OrderAccepted(OrderAccepted {
                id: Uuid::new_v4(),
                order: new_order,
            }));
        }

        ClientRequest::GetSnapshot(snapshot) => {
            let (reply_tx, reply_rx) = oneshot::channel();

            if engine_tx.send(EngineRequest::Snapshot { reply: reply_tx }).is_err() {
                warn!(client = client_id.0, "engine channel closed");
                let _ = out_tx.send(ServerMessage::Error(ErrorMessage::new("engine unavailable")));
                return;
            }

            // Bounded wait with a single rejection path on expiry.
            match timeout(snapshot_timeout, reply_rx).await {
                Ok(Ok(book)) => {
                    let _ = out_tx.send(ServerMessage::Snapshot(book_with_limit(
                        &book,
                        snapshot.limit,
                    )));
                }
                Ok(Err(_)) | Err(_) => {
                    debug!(client = client_id.0, "snapshot query timed out");
                    let _ =
                        out_tx.send(ServerMessage::Error(ErrorMessage::new("snapshot timed out")));
                }
            }
        }

        ClientRequest::Subscribe(subscribe) => {
            let mut guard = clients.write().await;
            if let Some(handle) = guard.get_mut(&client_id) {
                handle.depth = Some(subscribe.limit);
                debug!(client = client_id.0, limit = subscribe.limit, "client subscribed");
            }
        }
    }
}
