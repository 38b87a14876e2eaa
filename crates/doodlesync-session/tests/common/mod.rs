//! In-memory connector so sessions can run without a real server.
//!
//! Each successful `connect` hands the test a [`ServerSide`]: a pair of
//! channels standing in for the server end of the socket. Dropping
//! `to_client` looks like the server closing the connection.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use doodlesync_transport::{Connection, Connector, Endpoint, TransportError};
use tokio::sync::mpsc;
use tokio::time::Instant;

pub struct ServerSide {
    pub to_client: mpsc::UnboundedSender<Vec<u8>>,
    pub from_client: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl ServerSide {
    pub fn push(&self, json: &str) {
        self.to_client.send(json.as_bytes().to_vec()).unwrap();
    }

    pub async fn next_text(&mut self) -> String {
        let bytes = self.from_client.recv().await.expect("client hung up");
        String::from_utf8(bytes).unwrap()
    }
}

#[derive(Default)]
struct Script {
    /// `true` = the next handshake succeeds. Empty = every handshake fails.
    plan: VecDeque<bool>,
    attempts: Vec<(Instant, String)>,
}

#[derive(Clone)]
pub struct MockConnector {
    script: Arc<Mutex<Script>>,
    servers: mpsc::UnboundedSender<ServerSide>,
}

impl MockConnector {
    pub fn new(plan: &[bool]) -> (Self, mpsc::UnboundedReceiver<ServerSide>) {
        let (servers, rx) = mpsc::unbounded_channel();
        let script = Script {
            plan: plan.iter().copied().collect(),
            attempts: Vec::new(),
        };
        (
            Self {
                script: Arc::new(Mutex::new(script)),
                servers,
            },
            rx,
        )
    }

    /// Times at which a handshake was attempted.
    pub fn attempts(&self) -> Vec<Instant> {
        self.script
            .lock()
            .unwrap()
            .attempts
            .iter()
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn urls(&self) -> Vec<String> {
        self.script
            .lock()
            .unwrap()
            .attempts
            .iter()
            .map(|(_, url)| url.clone())
            .collect()
    }
}

impl Connector for MockConnector {
    type Connection = MockConnection;

    async fn connect(&self, url: &str) -> Result<MockConnection, TransportError> {
        let succeed = {
            let mut script = self.script.lock().unwrap();
            script.attempts.push((Instant::now(), url.to_string()));
            script.plan.pop_front().unwrap_or(false)
        };
        if !succeed {
            return Err(TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            )));
        }

        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        let _ = self.servers.send(ServerSide {
            to_client,
            from_client,
        });
        Ok(MockConnection {
            inbound: tokio::sync::Mutex::new(inbound),
            outbound,
        })
    }
}

pub struct MockConnection {
    inbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
}

impl Connection for MockConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        self.outbound.send(data.to_vec()).map_err(|_| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "server gone",
            ))
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.inbound.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

pub fn endpoint() -> Endpoint {
    Endpoint::new("ws://mock", "game-1", "player-1")
}
