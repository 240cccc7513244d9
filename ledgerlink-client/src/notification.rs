//! Notification dispatch
//!
//! Server-pushed frames without an id never touch the request correlation
//! layer; they are routed here by method name. Handlers run synchronously in
//! wire-arrival order from the receive loop, so a handler that blocks stalls
//! inbound processing. Spawn a task inside the handler for slow work.
//!
//! An inbound notification whose method has no registered handler is logged
//! at debug and dropped.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ledgerlink_client::NodeClient;
//!
//! # async fn example(client: &NodeClient) {
//! client
//!     .on_notification("Atoms.subscribeUpdate", |notif| async move {
//!         println!("ledger update: {:?}", notif.params);
//!     })
//!     .await;
//! # }
//! ```

use ledgerlink_core::RpcNotification;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Type-erased async notification handler.
pub type NotificationFn =
    Arc<dyn Fn(RpcNotification) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Method-keyed registry of notification handlers.
#[derive(Clone)]
pub struct NotificationHandler {
    handlers: Arc<Mutex<HashMap<String, NotificationFn>>>,
}

impl NotificationHandler {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a handler for a notification method.
    ///
    /// A later registration for the same method replaces the earlier one.
    pub async fn register<F, Fut>(&self, method: impl Into<String>, handler: F)
    where
        F: Fn(RpcNotification) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: NotificationFn = Arc::new(move |notif| Box::pin(handler(notif)));
        self.handlers.lock().await.insert(method.into(), handler);
    }

    /// Dispatch an inbound notification to its handler, if any.
    pub async fn handle(&self, notification: RpcNotification) {
        let method = notification.method.clone();
        let handlers = self.handlers.lock().await;

        if let Some(handler) = handlers.get(&method) {
            let handler = Arc::clone(handler);
            drop(handlers); // release the lock before running the handler

            handler(notification).await;
        } else {
            tracing::debug!(method = %method, "no handler for notification, dropping");
        }
    }

    pub async fn has_handler(&self, method: &str) -> bool {
        self.handlers.lock().await.contains_key(method)
    }

    /// Remove a handler. Returns whether one was registered.
    pub async fn unregister(&self, method: &str) -> bool {
        self.handlers.lock().await.remove(method).is_some()
    }

    /// All registered notification methods.
    pub async fn methods(&self) -> Vec<String> {
        self.handlers.lock().await.keys().cloned().collect()
    }
}

impl Default for NotificationHandler {
    fn default() -> Self {
        Self::new()
    }
}
