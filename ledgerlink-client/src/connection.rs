//! Connection lifecycle management
//!
//! Tracks the WebSocket connection state and coordinates reconnection. There
//! is exactly one live transport at a time; the receive loop replaces the
//! write half wholesale on every successful reconnect.
//!
//! # Connection States
//!
//! - **Connecting**: Establishing or re-establishing the socket, with the
//!   current attempt number
//! - **Open**: Connected and able to carry calls
//! - **Closed**: Terminal, by explicit close or by backoff exhaustion
//!
//! # State Transitions
//!
//! ```text
//! Connecting { attempt } → Open → Connecting { attempt } → ...
//!           ↓                ↓
//!         Closed ←──────── Closed
//! ```
//!
//! Transport errors during an attempt never surface individually: they are
//! swallowed into the retry loop and show up only as the next `Connecting`
//! attempt or, once the strategy gives up, as the terminal `Closed`.
//!
//! # Lifecycle events
//!
//! Observers subscribe to a broadcast channel carrying [`LifecycleEvent`]s.
//! `Open` is emitted on every successful (re)connect; `Closed` is emitted
//! exactly once, no matter how many paths race to close the connection.

use crate::backoff::ReconnectStrategy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};

/// Connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Establishing the socket; `attempt` counts failed tries this outage
    Connecting { attempt: u32 },
    /// Connected and operational
    Open,
    /// Terminal: explicitly closed or reconnection abandoned
    Closed,
}

/// Lifecycle event broadcast to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The connection was established (initial connect or reconnect)
    Open,
    /// The connection is terminally closed; emitted exactly once
    Closed,
}

/// Owns the connection state and the reconnect strategy.
pub struct ConnectionManager {
    state: RwLock<ConnectionState>,
    strategy: RwLock<Box<dyn ReconnectStrategy>>,
    events: broadcast::Sender<LifecycleEvent>,
    closed: AtomicBool,
    url: String,
}

impl ConnectionManager {
    pub fn new(url: String, strategy: Box<dyn ReconnectStrategy>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: RwLock::new(ConnectionState::Connecting { attempt: 0 }),
            strategy: RwLock::new(strategy),
            events,
            closed: AtomicBool::new(false),
            url,
        }
    }

    /// Current connection state.
    pub async fn state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Transition to `Open` after a successful connect.
    ///
    /// Resets the backoff strategy so the next outage starts its delay
    /// sequence over, and broadcasts [`LifecycleEvent::Open`].
    pub async fn opened(&self) {
        *self.state.write().await = ConnectionState::Open;
        self.strategy.write().await.reset();
        let _ = self.events.send(LifecycleEvent::Open);
    }

    /// Begin a reconnection cycle after the socket dropped.
    pub async fn begin_reconnect(&self) {
        *self.state.write().await = ConnectionState::Connecting { attempt: 0 };
    }

    /// Consume the next delay from the strategy.
    ///
    /// `Some(delay)` advances the `Connecting` attempt counter; `None` means
    /// the budget is exhausted and the connection transitions terminally to
    /// `Closed`.
    pub async fn next_reconnect_delay(&self) -> Option<Duration> {
        // An explicit close during a reconnect cycle ends it
        if self.is_closed() {
            return None;
        }
        let attempt = match self.state().await {
            ConnectionState::Connecting { attempt } => attempt,
            _ => 0,
        };

        let delay = self.strategy.write().await.next_delay();

        match delay {
            Some(_) => {
                *self.state.write().await = ConnectionState::Connecting {
                    attempt: attempt + 1,
                };
            }
            None => {
                self.close().await;
            }
        }

        delay
    }

    /// Transition terminally to `Closed`.
    ///
    /// Returns `true` only for the call that performed the transition;
    /// [`LifecycleEvent::Closed`] goes out exactly once regardless of how
    /// many paths (explicit close, backoff exhaustion) race here.
    pub async fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        *self.state.write().await = ConnectionState::Closed;
        let _ = self.events.send(LifecycleEvent::Closed);
        true
    }

    /// Whether the connection is terminally closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::{FibonacciBackoff, NoReconnect};

    fn manager(strategy: Box<dyn ReconnectStrategy>) -> ConnectionManager {
        ConnectionManager::new("ws://localhost:8080".to_string(), strategy)
    }

    #[tokio::test]
    async fn test_initial_state_is_connecting() {
        let m = manager(Box::new(NoReconnect));
        assert_eq!(m.state().await, ConnectionState::Connecting { attempt: 0 });
    }

    #[tokio::test]
    async fn test_open_transition_and_event() {
        let m = manager(Box::new(NoReconnect));
        let mut events = m.subscribe();

        m.opened().await;
        assert_eq!(m.state().await, ConnectionState::Open);
        assert_eq!(events.recv().await.unwrap(), LifecycleEvent::Open);
    }

    #[tokio::test]
    async fn test_reconnect_attempt_counting() {
        let strategy = FibonacciBackoff::new(
            Duration::from_millis(10),
            Duration::from_millis(100),
        )
        .with_max_attempts(2);
        let m = manager(Box::new(strategy));

        m.begin_reconnect().await;
        assert!(m.next_reconnect_delay().await.is_some());
        assert_eq!(m.state().await, ConnectionState::Connecting { attempt: 1 });

        assert!(m.next_reconnect_delay().await.is_some());
        assert_eq!(m.state().await, ConnectionState::Connecting { attempt: 2 });

        assert!(m.next_reconnect_delay().await.is_none());
        assert_eq!(m.state().await, ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_closed_event_emitted_exactly_once() {
        let m = manager(Box::new(NoReconnect));
        let mut events = m.subscribe();

        assert!(m.close().await);
        assert!(!m.close().await);
        assert!(!m.close().await);

        assert_eq!(events.recv().await.unwrap(), LifecycleEvent::Closed);
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_exhaustion_closes_terminally() {
        let m = manager(Box::new(NoReconnect));
        let mut events = m.subscribe();

        m.begin_reconnect().await;
        assert!(m.next_reconnect_delay().await.is_none());
        assert!(m.is_closed());
        assert_eq!(events.recv().await.unwrap(), LifecycleEvent::Closed);
    }

    #[tokio::test]
    async fn test_close_ends_reconnect_cycle() {
        let strategy = FibonacciBackoff::new(
            Duration::from_millis(10),
            Duration::from_millis(100),
        );
        let m = manager(Box::new(strategy));

        m.begin_reconnect().await;
        assert!(m.next_reconnect_delay().await.is_some());

        m.close().await;
        assert!(m.next_reconnect_delay().await.is_none());
    }

    #[tokio::test]
    async fn test_strategy_resets_on_open() {
        let strategy = FibonacciBackoff::new(
            Duration::from_millis(10),
            Duration::from_millis(100),
        )
        .with_max_attempts(2);
        let m = manager(Box::new(strategy));

        m.begin_reconnect().await;
        m.next_reconnect_delay().await;
        m.next_reconnect_delay().await;

        // Successful open restores the full budget
        m.opened().await;
        m.begin_reconnect().await;
        assert!(m.next_reconnect_delay().await.is_some());
        assert!(m.next_reconnect_delay().await.is_some());
        assert!(m.next_reconnect_delay().await.is_none());
    }
}
