//! Reconnect scheduling, driven on a paused clock.
//!
//! `start_paused = true` freezes Tokio's clock and auto-advances it to the
//! next timer whenever every task is idle, so the gaps between handshake
//! attempts can be asserted exactly.

mod common;

use std::time::Duration;

use common::{MockConnector, endpoint};
use doodlesync_transport::{
    ConnectionState, ReconnectPolicy, TransportClient, TransportConfig,
    TransportError,
};
use tokio::time::Instant;

fn gaps_ms(attempts: &[Instant]) -> Vec<u128> {
    attempts
        .windows(2)
        .map(|w| (w[1] - w[0]).as_millis())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_delays_are_linear_and_stop_after_five() {
    let (connector, mut servers) = MockConnector::new(&[true]);
    let client =
        TransportClient::new(connector.clone(), TransportConfig::default());

    client.connect(endpoint()).await.unwrap();
    let server = servers.recv().await.unwrap();
    drop(server);

    tokio::time::sleep(Duration::from_secs(120)).await;

    let attempts = connector.attempts();
    assert_eq!(attempts.len(), 6, "initial open plus five reconnects");
    assert_eq!(gaps_ms(&attempts), vec![2000, 4000, 6000, 8000, 10000]);
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_successful_reconnect_resets_attempts() {
    let (connector, mut servers) = MockConnector::new(&[true, false, true]);
    let client =
        TransportClient::new(connector.clone(), TransportConfig::default());

    client.connect(endpoint()).await.unwrap();
    let first = servers.recv().await.unwrap();
    drop(first);

    // Attempt 1 fails, attempt 2 succeeds.
    let second = servers.recv().await.unwrap();
    assert_eq!(gaps_ms(&connector.attempts()), vec![2000, 4000]);
    assert_eq!(client.state(), ConnectionState::Open);

    let lost_at = Instant::now();
    drop(second);
    tokio::time::sleep(Duration::from_secs(3)).await;

    let attempts = connector.attempts();
    assert_eq!(attempts.len(), 4);
    assert_eq!((attempts[3] - lost_at).as_millis(), 2000);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_cancels_pending_reconnect() {
    let (connector, mut servers) = MockConnector::new(&[true]);
    let client =
        TransportClient::new(connector.clone(), TransportConfig::default());

    client.connect(endpoint()).await.unwrap();
    let mut state = client.watch_state();
    drop(servers.recv().await.unwrap());
    state
        .wait_for(|s| *s == ConnectionState::Closed)
        .await
        .unwrap();

    // A reconnect is now scheduled 2s out.
    client.disconnect().await;
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(connector.attempts().len(), 1);
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_initial_connect_failure_is_returned_and_not_retried() {
    let (connector, _servers) = MockConnector::new(&[]);
    let client =
        TransportClient::new(connector.clone(), TransportConfig::default());

    let result = client.connect(endpoint()).await;
    assert!(matches!(result, Err(TransportError::ConnectFailed(_))));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(connector.attempts().len(), 1);
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_policy_stays_closed() {
    let (connector, mut servers) = MockConnector::new(&[true, true]);
    let config = TransportConfig {
        reconnect: ReconnectPolicy::disabled(),
        ..Default::default()
    };
    let client = TransportClient::new(connector.clone(), config);

    client.connect(endpoint()).await.unwrap();
    drop(servers.recv().await.unwrap());
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(connector.attempts().len(), 1);
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_hung_handshake_times_out_and_retries() {
    let (connector, mut servers) = MockConnector::hanging(&[true]);
    let client =
        TransportClient::new(connector.clone(), TransportConfig::default());

    client.connect(endpoint()).await.unwrap();
    drop(servers.recv().await.unwrap());
    tokio::time::sleep(Duration::from_secs(120)).await;

    // Each stalled attempt burns the 10s handshake limit before the next
    // delay starts counting.
    let attempts = connector.attempts();
    assert_eq!(attempts.len(), 6);
    assert_eq!(gaps_ms(&attempts), vec![2000, 14000, 16000, 18000, 20000]);
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_interrupts_hung_reconnect() {
    let (connector, mut servers) = MockConnector::hanging(&[true]);
    let config = TransportConfig {
        connect_timeout: Duration::from_secs(3600),
        ..Default::default()
    };
    let client = TransportClient::new(connector.clone(), config);

    client.connect(endpoint()).await.unwrap();
    let mut state = client.watch_state();
    drop(servers.recv().await.unwrap());
    state
        .wait_for(|s| *s == ConnectionState::Connecting)
        .await
        .unwrap();
    assert_eq!(connector.attempts().len(), 2);

    tokio::time::timeout(Duration::from_secs(1), client.disconnect())
        .await
        .expect("disconnect queued behind the handshake");
    assert_eq!(client.state(), ConnectionState::Closed);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(connector.attempts().len(), 2);
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_cancels_hung_initial_connect() {
    let (connector, _servers) = MockConnector::hanging(&[]);
    let client =
        TransportClient::new(connector.clone(), TransportConfig::default());
    let mut state = client.watch_state();

    let connecting = tokio::spawn({
        let client = client.clone();
        async move { client.connect(endpoint()).await }
    });
    state
        .wait_for(|s| *s == ConnectionState::Connecting)
        .await
        .unwrap();

    client.disconnect().await;
    let result = connecting.await.unwrap();
    assert!(matches!(result, Err(TransportError::Cancelled)));
    assert_eq!(client.state(), ConnectionState::Closed);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(connector.attempts().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_newer_connect_supersedes_hung_one() {
    let (connector, mut servers) = MockConnector::hanging(&[]);
    let client =
        TransportClient::new(connector.clone(), TransportConfig::default());
    let mut state = client.watch_state();

    let first = tokio::spawn({
        let client = client.clone();
        async move { client.connect(endpoint()).await }
    });
    state
        .wait_for(|s| *s == ConnectionState::Connecting)
        .await
        .unwrap();

    // The second handshake also stalls, then hits the 10s limit.
    let second = client.connect(endpoint()).await;
    assert!(matches!(first.await.unwrap(), Err(TransportError::Cancelled)));
    assert!(matches!(second, Err(TransportError::ConnectFailed(_))));
    assert_eq!(gaps_ms(&connector.attempts()), vec![0]);
    assert!(servers.try_recv().is_err());
}
