//! Reconnect policy and backoff bookkeeping.

use std::time::Duration;

/// How the client reacts to an unexpected close.
///
/// Delays grow linearly: attempt `n` (1-indexed) waits
/// `base_delay × n`. After `max_attempts` consecutive failures the client
/// stops trying and stays `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Upper bound on consecutive reconnect attempts.
    pub max_attempts: u32,
    /// Delay unit multiplied by the attempt number.
    pub base_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl ReconnectPolicy {
    /// A policy that never reconnects.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Delay before attempt `attempt` (1-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Configuration for a [`TransportClient`](crate::TransportClient).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub reconnect: ReconnectPolicy,
    /// How long one open handshake may take before it counts as failed.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reconnect: ReconnectPolicy::default(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Attempt counter over a [`ReconnectPolicy`].
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ReconnectPolicy,
    attempts: u32,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    /// Claims the next attempt, returning its 1-indexed number and delay,
    /// or `None` once the policy is exhausted.
    pub fn next_delay(&mut self) -> Option<(u32, Duration)> {
        if self.attempts >= self.policy.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some((self.attempts, self.policy.delay_for(self.attempts)))
    }

    /// Number of attempts claimed since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Forgets all claimed attempts (called after a successful open).
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
