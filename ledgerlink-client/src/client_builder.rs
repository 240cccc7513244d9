//! Client builder
//!
//! Fluent configuration for a `NodeClient` before connecting:
//! - reconnection strategy (default: none, first drop is terminal)
//! - OpenTelemetry observability
//! - service name for telemetry
//!
//! # Examples
//!
//! ```rust,no_run
//! use ledgerlink_client::{ClientBuilder, FibonacciBackoff};
//! use std::time::Duration;
//!
//! # async fn example() -> ledgerlink_core::Result<()> {
//! // With reconnection
//! let client = ClientBuilder::new("ws://localhost:8080/rpc")
//!     .with_reconnect(Box::new(FibonacciBackoff::default()))
//!     .connect()
//!     .await?;
//!
//! // With observability
//! let client2 = ClientBuilder::new("ws://localhost:8080/rpc")
//!     .with_default_observability()
//!     .service_name("ledger-watcher")
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    backoff::{FibonacciBackoff, NoReconnect, ReconnectStrategy},
    connection::ConnectionManager,
    metrics::{self, ClientMetrics},
    notification::NotificationHandler,
    request::RequestTracker,
    NodeClient,
};
use futures::StreamExt;
use ledgerlink_core::{Error, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_tungstenite::connect_async;

/// Builder for configuring and connecting a [`NodeClient`].
pub struct ClientBuilder {
    url: String,
    reconnect_strategy: Option<Box<dyn ReconnectStrategy>>,
    observability_config: Option<ledgerlink_core::ObservabilityConfig>,
    service_name: Option<String>,
}

impl ClientBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_strategy: None,
            observability_config: None,
            service_name: None,
        }
    }

    /// Enable automatic reconnection with the given strategy.
    pub fn with_reconnect(mut self, strategy: Box<dyn ReconnectStrategy>) -> Self {
        self.reconnect_strategy = Some(strategy);
        self
    }

    /// Enable automatic reconnection with the default Fibonacci backoff.
    pub fn with_default_reconnect(mut self) -> Self {
        self.reconnect_strategy = Some(Box::new(FibonacciBackoff::default()));
        self
    }

    /// Disable automatic reconnection (the default): the first drop is
    /// terminal.
    pub fn without_reconnect(mut self) -> Self {
        self.reconnect_strategy = None;
        self
    }

    /// Enable OpenTelemetry observability with a custom configuration.
    pub fn with_observability(mut self, config: ledgerlink_core::ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Enable OpenTelemetry observability with defaults.
    pub fn with_default_observability(mut self) -> Self {
        self.observability_config = Some(ledgerlink_core::ObservabilityConfig::default());
        self
    }

    /// Set the service name used for telemetry.
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Connect and return the client.
    ///
    /// Only the initial connect surfaces a transport error directly; once
    /// the client is running, connect failures feed the backoff loop.
    pub async fn connect(self) -> Result<NodeClient> {
        let tracker = RequestTracker::new();
        let notifications = NotificationHandler::new();

        let client_metrics = if let Some(mut config) = self.observability_config {
            if let Some(name) = self.service_name {
                config.service_name = name;
            }
            ledgerlink_core::init_observability(config.clone()).map_err(|e| {
                Error::Internal(format!("failed to initialize observability: {}", e))
            })?;
            Some(Arc::new(ClientMetrics::new(&config.service_name)))
        } else {
            None
        };

        let strategy = self
            .reconnect_strategy
            .unwrap_or_else(|| Box::new(NoReconnect));
        let connection = Arc::new(ConnectionManager::new(self.url.clone(), strategy));

        tracing::info!(url = %self.url, "connecting");
        let (ws_stream, _) = connect_async(&self.url)
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let (sink, receiver) = ws_stream.split();
        let sink = Arc::new(Mutex::new(sink));

        connection.opened().await;
        if let Some(ref m) = client_metrics {
            m.update_connection_state(metrics::STATE_OPEN);
        }

        let client = NodeClient {
            sink: sink.clone(),
            tracker: tracker.clone(),
            notifications: notifications.clone(),
            connection: connection.clone(),
            metrics: client_metrics.clone(),
        };

        tracing::info!("connected");

        tokio::spawn(NodeClient::receive_loop(
            receiver,
            tracker,
            notifications,
            sink,
            connection,
            client_metrics,
        ));

        Ok(client)
    }
}
