//! Request correlation
//!
//! Correlates outgoing requests with the responses that eventually arrive,
//! possibly out of order, on the shared socket.
//!
//! # Request Lifecycle
//!
//! 1. **Allocate**: take the next id from the monotonic counter
//! 2. **Register**: create a oneshot channel keyed by the id
//! 3. **Send**: transmit the request frame
//! 4. **Wait**: the caller awaits the oneshot receiver
//! 5. **Complete**: the receive loop matches the response id and resolves
//!    the channel, or `fail_all` rejects every pending entry on an outage
//!
//! # Id allocation
//!
//! The counter is never reset for the life of the client, across any number
//! of reconnects. A response that straggles in from a previous socket can
//! therefore never collide with a request issued on the current one; its id
//! simply matches nothing and is dropped.
//!
//! # Timeouts
//!
//! There are no internal timeouts. A caller that wants one races the
//! receiver against `tokio::time::timeout`.

use ledgerlink_core::{Error, Id, Result, RpcResponse};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};

/// Tracks pending requests awaiting their responses.
#[derive(Clone)]
pub struct RequestTracker {
    pending: Arc<Mutex<HashMap<Id, oneshot::Sender<Result<RpcResponse>>>>>,
    counter: Arc<AtomicU64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Allocate the next request id. Monotonic for the life of the client.
    pub fn next_id(&self) -> Id {
        Id::Number(self.counter.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a pending request and get the receiver for its response.
    pub async fn register(&self, id: Id) -> oneshot::Receiver<Result<RpcResponse>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);
        rx
    }

    /// Resolve a pending request with the matching response.
    ///
    /// A response whose id matches nothing (stale socket, duplicate, server
    /// bug) is logged at debug and discarded; it must not disturb any other
    /// pending call.
    pub async fn complete(&self, id: &Id, response: RpcResponse) {
        match self.pending.lock().await.remove(id) {
            Some(tx) => {
                let _ = tx.send(Ok(response));
            }
            None => {
                tracing::debug!(id = %id, "response matches no pending request, dropping");
            }
        }
    }

    /// Reject a single pending request.
    pub async fn fail(&self, id: &Id, error: Error) {
        if let Some(tx) = self.pending.lock().await.remove(id) {
            let _ = tx.send(Err(error));
        }
    }

    /// Reject every pending request with the given error.
    ///
    /// The map is drained under the lock, so each pending call is rejected
    /// exactly once and a concurrent `register` lands cleanly in the fresh
    /// set rather than being swept up here.
    pub async fn fail_all(&self, error: Error) {
        let drained: Vec<_> = {
            let mut pending = self.pending.lock().await;
            pending.drain().collect()
        };
        if !drained.is_empty() {
            tracing::debug!(count = drained.len(), error = %error, "failing pending requests");
        }
        for (_, tx) in drained {
            let _ = tx.send(Err(error.clone()));
        }
    }

    /// Number of requests currently awaiting responses.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}
