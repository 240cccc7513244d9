//! Common test utilities for ledgerlink-client integration tests
//!
//! A lightweight mock WebSocket node for exercising client behavior without
//! a real ledger node. Besides answering frames through a caller-supplied
//! handler, the server can drop every live connection on demand (`kick_all`,
//! for reconnection tests) and push id-less frames to all connections
//! (`push`, for notification tests).

use futures::stream::FuturesUnordered;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Mock WebSocket node for client testing.
pub struct MockWsServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    kick_tx: broadcast::Sender<()>,
    push_tx: broadcast::Sender<String>,
    message_rx: Option<mpsc::Receiver<String>>,
}

impl MockWsServer {
    /// Start a mock node that echoes every frame back unchanged.
    #[allow(dead_code)]
    pub async fn new() -> Self {
        Self::with_handler(|msg| async move { Some(msg) }).await
    }

    /// Start a mock node with a custom frame handler.
    ///
    /// The handler receives each inbound text frame and may return a frame
    /// to send back, or `None` to stay silent.
    pub async fn with_handler<F, Fut>(handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Option<String>> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (kick_tx, _) = broadcast::channel::<()>(4);
        let (push_tx, _) = broadcast::channel::<String>(64);
        let (msg_tx, msg_rx) = mpsc::channel::<String>(100);

        let handler = Arc::new(handler);
        let kick_tx_server = kick_tx.clone();
        let push_tx_server = push_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    accept_result = listener.accept() => {
                        let Ok((stream, _)) = accept_result else { break };
                        let handler = Arc::clone(&handler);
                        let msg_tx = msg_tx.clone();
                        let mut kick_rx = kick_tx_server.subscribe();
                        let mut push_rx = push_tx_server.subscribe();

                        tokio::spawn(async move {
                            let Ok(ws_stream) = accept_async(stream).await else {
                                return;
                            };
                            let (mut write, mut read) = ws_stream.split();
                            // Handler futures run concurrently with the loop
                            // so pushes go out while a response is pending
                            let mut pending = FuturesUnordered::new();

                            loop {
                                tokio::select! {
                                    _ = kick_rx.recv() => {
                                        // Drop the connection abruptly
                                        break;
                                    }
                                    pushed = push_rx.recv() => {
                                        if let Ok(text) = pushed {
                                            let _ = write.send(Message::Text(text)).await;
                                        }
                                    }
                                    Some(response) = pending.next() => {
                                        if let Some(response) = response {
                                            let _ = write
                                                .send(Message::Text(response))
                                                .await;
                                        }
                                    }
                                    msg = read.next() => {
                                        match msg {
                                            Some(Ok(Message::Text(text))) => {
                                                let _ = msg_tx.send(text.clone()).await;
                                                pending.push(handler(text));
                                            }
                                            Some(Ok(Message::Close(_))) | None => break,
                                            Some(Err(_)) => break,
                                            _ => {}
                                        }
                                    }
                                }
                            }
                        });
                    }
                }
            }
        });

        // Give the accept loop a moment to come up
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Self {
            addr,
            shutdown_tx,
            kick_tx,
            push_tx,
            message_rx: Some(msg_rx),
        }
    }

    /// WebSocket URL for connecting to this node.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    #[allow(dead_code)]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Drop every live connection while continuing to accept new ones.
    #[allow(dead_code)]
    pub fn kick_all(&self) {
        let _ = self.kick_tx.send(());
    }

    /// Push a frame to every live connection.
    #[allow(dead_code)]
    pub fn push(&self, text: impl Into<String>) {
        let _ = self.push_tx.send(text.into());
    }

    /// Wait for the next frame received by the node, up to 5 seconds.
    #[allow(dead_code)]
    pub async fn wait_for_message(&mut self) -> Option<String> {
        let rx = self.message_rx.as_mut()?;
        tokio::time::timeout(tokio::time::Duration::from_secs(5), rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// Stop accepting connections and drop every live one.
    pub async fn shutdown(self) {
        self.kick_all();
        let _ = self.shutdown_tx.send(()).await;
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }
}

/// Build a success response frame for the given id.
#[allow(dead_code)]
pub fn mock_response(id: u64, result: serde_json::Value) -> String {
    serde_json::json!({
        "id": id,
        "result": result,
    })
    .to_string()
}

/// Build an error response frame for the given id.
#[allow(dead_code)]
pub fn mock_error_response(id: u64, code: i32, message: &str) -> String {
    serde_json::json!({
        "id": id,
        "error": {
            "code": code,
            "message": message,
        },
    })
    .to_string()
}

/// Build an id-less notification frame.
#[allow(dead_code)]
pub fn mock_notification(method: &str, params: serde_json::Value) -> String {
    serde_json::json!({
        "method": method,
        "params": params,
    })
    .to_string()
}

/// Parse the numeric id out of a request frame.
#[allow(dead_code)]
pub fn request_id(text: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()?
        .get("id")?
        .as_u64()
}

/// Parse the method out of a request or notification frame.
#[allow(dead_code)]
pub fn request_method(text: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()?
        .get("method")?
        .as_str()
        .map(str::to_string)
}
