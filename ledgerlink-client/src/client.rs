//! Resilient node RPC client over WebSocket
//!
//! `NodeClient` multiplexes many outstanding calls and notifications over a
//! single duplex WebSocket connection to a ledger node, reconnecting
//! automatically according to the configured backoff strategy.
//!
//! # Client Lifecycle
//!
//! 1. **Connect**: `ClientBuilder::new(url).connect()` establishes the socket
//! 2. **Use**: issue calls, send notifications, register handlers
//! 3. **Reconnect**: on a drop, pending calls fail with `ConnectionLost` and
//!    the backoff strategy drives reconnection transparently
//! 4. **Close**: `close()` (or backoff exhaustion) terminates; every pending
//!    call fails with `ConnectionAborted` and `Closed` is broadcast once
//!
//! # Cloning
//!
//! `NodeClient` is cheaply cloneable; all clones share the same connection,
//! pending set, and handlers, so the client can be used from many tasks.
//!
//! # Error surface
//!
//! Transport instability is absorbed internally. A caller only ever sees the
//! resolution of its own call (`Rpc`, `ConnectionLost`, `NotConnected`, a
//! `Protocol` error for a malformed matching response) or the terminal
//! `ConnectionAborted`.

use crate::{
    connection::{ConnectionManager, ConnectionState, LifecycleEvent},
    metrics::{self, ClientMetrics},
    notification::NotificationHandler,
    request::RequestTracker,
};
use futures::{SinkExt, StreamExt};
use ledgerlink_core::{codec, Error, Frame, Result, RpcNotification, RpcRequest};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsSink = futures::stream::SplitSink<
    WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;
type WsStream =
    futures::stream::SplitStream<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>;

/// Resilient JSON-RPC client over a reconnecting WebSocket.
#[derive(Clone)]
pub struct NodeClient {
    /// Write half of the socket; replaced wholesale on reconnect
    pub(crate) sink: Arc<Mutex<WsSink>>,
    /// Pending request correlation
    pub(crate) tracker: RequestTracker,
    /// Method-keyed notification dispatch
    pub(crate) notifications: NotificationHandler,
    /// Connection state machine and backoff
    pub(crate) connection: Arc<ConnectionManager>,
    /// Metrics, present when observability is enabled
    pub(crate) metrics: Option<Arc<ClientMetrics>>,
}

impl NodeClient {
    /// Connect without automatic reconnection.
    ///
    /// The first drop is terminal. For resilience use
    /// `ClientBuilder::new(url).with_default_reconnect().connect()`.
    pub async fn connect(url: &str) -> Result<Self> {
        crate::ClientBuilder::new(url).connect().await
    }

    /// Current connection state.
    pub async fn state(&self) -> ConnectionState {
        self.connection.state().await
    }

    /// Whether the connection is currently open.
    pub async fn is_open(&self) -> bool {
        matches!(self.connection.state().await, ConnectionState::Open)
    }

    /// Subscribe to connection lifecycle events.
    ///
    /// `Open` is broadcast on every successful (re)connect; `Closed` exactly
    /// once, when the connection terminates.
    pub fn lifecycle_events(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.connection.subscribe()
    }

    /// Issue a call and await its response.
    ///
    /// The pending entry is registered before the frame is sent, so a
    /// response cannot race the registration. Fails immediately with
    /// [`Error::NotConnected`] unless the connection is open.
    #[tracing::instrument(skip(self, params), fields(method = %method.as_ref()))]
    pub async fn call<P, R>(&self, method: impl Into<String> + AsRef<str>, params: P) -> Result<R>
    where
        P: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        if !self.is_open().await {
            return Err(Error::NotConnected);
        }

        let start = std::time::Instant::now();
        let method = method.into();
        let params_value =
            serde_json::to_value(params).map_err(|e| Error::Serialization(e.to_string()))?;
        let params_value = if params_value.is_null() {
            None
        } else {
            Some(params_value)
        };

        let id = self.tracker.next_id();
        let request = RpcRequest::new(method.clone(), params_value, id.clone());

        // Register before sending so the response cannot win the race
        let rx = self.tracker.register(id.clone()).await;

        let request_text = codec::encode(&request)?;
        if let Err(e) = self
            .sink
            .lock()
            .await
            .send(Message::Text(request_text))
            .await
        {
            let err = Error::Transport(e.to_string());
            self.tracker.fail(&id, err.clone()).await;
            if let Some(ref m) = self.metrics {
                m.record_error("transport");
            }
            return Err(err);
        }

        tracing::debug!("request sent, awaiting response");

        let response = rx
            .await
            .map_err(|_| Error::Internal("response channel dropped".to_string()))??;

        let duration = start.elapsed().as_secs_f64();

        if let Some(error) = response.error {
            if let Some(ref m) = self.metrics {
                m.record_request(&method, "error", duration);
                m.record_error("rpc");
            }
            tracing::debug!(method = %method, code = error.code, "call failed");
            return Err(Error::Rpc(error));
        }

        let result = response.result.ok_or_else(|| {
            Error::Protocol("response carries neither result nor error".to_string())
        })?;
        let deserialized: R =
            serde_json::from_value(result).map_err(|e| Error::Serialization(e.to_string()))?;

        if let Some(ref m) = self.metrics {
            m.record_request(&method, "success", duration);
        }

        tracing::debug!(method = %method, duration_secs = duration, "call completed");
        Ok(deserialized)
    }

    /// Send a fire-and-forget notification. No reply will ever arrive; only
    /// send-boundary errors are reported.
    pub async fn notify<P>(&self, method: impl Into<String>, params: P) -> Result<()>
    where
        P: serde::Serialize,
    {
        if !self.is_open().await {
            return Err(Error::NotConnected);
        }

        let params_value =
            serde_json::to_value(params).map_err(|e| Error::Serialization(e.to_string()))?;
        let params_value = if params_value.is_null() {
            None
        } else {
            Some(params_value)
        };

        let notification = RpcNotification::new(method, params_value);
        let text = codec::encode(&notification)?;

        self.sink
            .lock()
            .await
            .send(Message::Text(text))
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(())
    }

    /// Register a handler for inbound notifications with the given method.
    pub async fn on_notification<F, Fut>(&self, method: impl Into<String>, handler: F)
    where
        F: Fn(RpcNotification) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.notifications.register(method, handler).await;
    }

    /// Access the notification handler registry.
    pub fn notification_handler(&self) -> &NotificationHandler {
        &self.notifications
    }

    /// Close the connection. Idempotent.
    ///
    /// Every pending call fails with [`Error::ConnectionAborted`] and the
    /// `Closed` lifecycle event is broadcast exactly once.
    pub async fn close(&self) {
        if !self.connection.close().await {
            return;
        }
        tracing::info!("closing connection");
        self.tracker.fail_all(Error::ConnectionAborted).await;
        if let Some(ref m) = self.metrics {
            m.update_connection_state(metrics::STATE_CLOSED);
        }
        // Nudge the server so the receive loop observes the close promptly
        let _ = self.sink.lock().await.send(Message::Close(None)).await;
    }

    /// Receive loop: routes inbound frames and drives reconnection.
    ///
    /// One task per client owns the read half. When the socket drops, every
    /// pending call fails with `ConnectionLost`, then the backoff strategy
    /// drives reconnect attempts until one succeeds (the sink is replaced
    /// wholesale) or the budget is exhausted (terminal close).
    pub(crate) async fn receive_loop(
        mut receiver: WsStream,
        tracker: RequestTracker,
        notifications: NotificationHandler,
        sink: Arc<Mutex<WsSink>>,
        connection: Arc<ConnectionManager>,
        metrics: Option<Arc<ClientMetrics>>,
    ) {
        loop {
            while let Some(message) = receiver.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if let Err(e) =
                            Self::route_frame(&text, &tracker, &notifications, &metrics).await
                        {
                            tracing::warn!(error = %e, "discarding inbound frame");
                            if let Some(ref m) = metrics {
                                m.record_error("protocol");
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!("connection closed by server");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "websocket error");
                        if let Some(ref m) = metrics {
                            m.record_error("websocket");
                        }
                        break;
                    }
                    _ => {} // ping/pong/binary: ignored
                }
            }

            // Explicit close: pending calls were already failed there.
            if connection.is_closed() {
                return;
            }

            // Unexpected drop: each outstanding call fails exactly once.
            tracker.fail_all(Error::ConnectionLost).await;
            connection.begin_reconnect().await;
            if let Some(ref m) = metrics {
                m.update_connection_state(metrics::STATE_CONNECTING);
            }

            loop {
                match connection.next_reconnect_delay().await {
                    Some(delay) => {
                        let attempt = match connection.state().await {
                            ConnectionState::Connecting { attempt } => attempt,
                            _ => 0,
                        };
                        tracing::info!(
                            delay_secs = delay.as_secs_f64(),
                            attempt = attempt,
                            "reconnecting"
                        );
                        if let Some(ref m) = metrics {
                            m.record_reconnection_attempt();
                        }

                        tokio::time::sleep(delay).await;

                        match connect_async(connection.url()).await {
                            Ok((ws_stream, _)) => {
                                if connection.is_closed() {
                                    // Closed while this attempt was in flight
                                    return;
                                }
                                tracing::info!("reconnected");
                                let (new_sink, new_receiver) = ws_stream.split();
                                *sink.lock().await = new_sink;
                                connection.opened().await;
                                if let Some(ref m) = metrics {
                                    m.update_connection_state(metrics::STATE_OPEN);
                                    m.record_reconnection_success();
                                }
                                receiver = new_receiver;
                                break;
                            }
                            Err(e) => {
                                // Swallowed into the retry loop by design of
                                // the propagation policy
                                tracing::warn!(error = %e, "reconnect attempt failed");
                                if let Some(ref m) = metrics {
                                    m.record_error("reconnection");
                                }
                            }
                        }
                    }
                    None => {
                        tracing::error!("reconnection abandoned, closing");
                        if let Some(ref m) = metrics {
                            m.update_connection_state(metrics::STATE_CLOSED);
                        }
                        tracker.fail_all(Error::ConnectionAborted).await;
                        return;
                    }
                }
            }
        }
    }

    /// Route one inbound frame.
    async fn route_frame(
        text: &str,
        tracker: &RequestTracker,
        notifications: &NotificationHandler,
        metrics: &Option<Arc<ClientMetrics>>,
    ) -> Result<()> {
        match codec::decode_frame(text)? {
            Frame::Response(response) => {
                let id = response.id.clone();
                tracker.complete(&id, response).await;
            }
            Frame::Notification(notification) => {
                if let Some(ref m) = metrics {
                    m.record_notification(&notification.method);
                }
                tracing::debug!(method = %notification.method, "notification received");
                notifications.handle(notification).await;
            }
            Frame::Request(request) => {
                // The node never calls back into the client
                tracing::warn!(method = %request.method, "unexpected inbound request, dropping");
            }
        }
        Ok(())
    }
}
