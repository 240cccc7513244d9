//! Reconnection integration tests against a mock node

mod common;

use common::{mock_response, request_id, request_method, MockWsServer};
use ledgerlink_client::{ClientBuilder, ConnectionState, FixedDelay, LifecycleEvent};
use ledgerlink_core::Error;
use serde_json::{json, Value};
use std::time::Duration;

async fn ping_server() -> MockWsServer {
    MockWsServer::with_handler(|text| async move {
        let id = request_id(&text)?;
        match request_method(&text).as_deref() {
            Some("ping") => Some(mock_response(id, json!("pong"))),
            // Leave everything else pending forever
            _ => None,
        }
    })
    .await
}

#[tokio::test]
async fn test_pending_calls_fail_exactly_once_on_drop() {
    let server = ping_server().await;
    let client = ClientBuilder::new(server.url())
        .with_reconnect(Box::new(FixedDelay::new(Duration::from_millis(50))))
        .connect()
        .await
        .unwrap();

    // Issue calls the node will never answer
    let mut handles = Vec::new();
    for _ in 0..4 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.call::<_, Value>("hang", Value::Null).await
        }));
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    server.kick_all();

    // Each pending call resolves exactly once, with ConnectionLost
    for handle in handles {
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(Error::ConnectionLost)));
    }

    client.close().await;
    server.shutdown().await;
}

#[tokio::test]
async fn test_call_succeeds_after_reconnect() {
    let server = ping_server().await;
    let client = ClientBuilder::new(server.url())
        .with_reconnect(Box::new(FixedDelay::new(Duration::from_millis(50))))
        .connect()
        .await
        .unwrap();
    let mut events = client.lifecycle_events();

    let before: String = client.call("ping", Value::Null).await.unwrap();
    assert_eq!(before, "pong");

    server.kick_all();

    // Wait for the reconnect to complete
    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event, LifecycleEvent::Open);
    assert_eq!(client.state().await, ConnectionState::Open);

    // The fresh socket carries calls end to end
    let after: String = client.call("ping", Value::Null).await.unwrap();
    assert_eq!(after, "pong");

    client.close().await;
    server.shutdown().await;
}

#[tokio::test]
async fn test_exhausted_backoff_closes_exactly_once() {
    let server = ping_server().await;
    let client = ClientBuilder::new(server.url())
        .with_reconnect(Box::new(
            FixedDelay::new(Duration::from_millis(20)).with_max_attempts(2),
        ))
        .connect()
        .await
        .unwrap();
    let mut events = client.lifecycle_events();

    // Take the node away entirely so every reconnect attempt fails
    server.shutdown().await;

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event, LifecycleEvent::Closed);
    assert_eq!(client.state().await, ConnectionState::Closed);

    // No further events of any kind
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(matches!(
        events.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));

    // The closed client rejects new work at the send boundary
    let err = client.call::<_, Value>("ping", Value::Null).await.unwrap_err();
    assert!(matches!(err, Error::NotConnected));
}

#[tokio::test]
async fn test_no_reconnect_first_drop_is_terminal() {
    let server = ping_server().await;
    let client = ClientBuilder::new(server.url()).connect().await.unwrap();
    let mut events = client.lifecycle_events();

    server.kick_all();

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event, LifecycleEvent::Closed);
    assert_eq!(client.state().await, ConnectionState::Closed);

    server.shutdown().await;
}

#[tokio::test]
async fn test_ids_do_not_collide_across_reconnect() {
    let server = ping_server().await;
    let client = ClientBuilder::new(server.url())
        .with_reconnect(Box::new(FixedDelay::new(Duration::from_millis(50))))
        .connect()
        .await
        .unwrap();
    let mut events = client.lifecycle_events();

    // Leave a call pending across the drop; its id is consumed forever
    let hanging = {
        let client = client.clone();
        tokio::spawn(async move { client.call::<_, Value>("hang", Value::Null).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    server.kick_all();
    assert!(matches!(
        hanging.await.unwrap(),
        Err(Error::ConnectionLost)
    ));

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event, LifecycleEvent::Open);

    // The post-reconnect call correlates cleanly on a fresh id
    let result: String = client.call("ping", Value::Null).await.unwrap();
    assert_eq!(result, "pong");

    client.close().await;
    server.shutdown().await;
}
