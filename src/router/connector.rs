// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Single reusable SSH session with reconnect and exponential backoff

use std::future::Future;
use std::time::Duration;

use super::session::SshSession;
use crate::config::RouterConfig;
use crate::error::RouterError;

/// Backoff is 2^n seconds, capped at 2^8 = 256 seconds
const MAX_BACKOFF_EXPONENT: u32 = 8;

/// Something that can execute a shell command on the router
pub trait CommandRunner: Send {
    /// Runs `command` and returns its stdout
    fn run(&mut self, command: &str) -> impl Future<Output = Result<String, RouterError>> + Send;
}

/// Tracks connection health and error state
#[derive(Clone, Debug)]
pub(crate) struct ConnectionState {
    consecutive_errors: u32,
    last_error_time: Option<tokio::time::Instant>,
    last_success_time: Option<tokio::time::Instant>,
}

impl ConnectionState {
    fn new() -> Self {
        Self {
            consecutive_errors: 0,
            last_error_time: None,
            last_success_time: None,
        }
    }

    fn record_success(&mut self) {
        self.consecutive_errors = 0;
        self.last_success_time = Some(tokio::time::Instant::now());
    }

    fn record_error(&mut self) {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        self.last_error_time = Some(tokio::time::Instant::now());
    }

    fn backoff_delay(&self) -> Duration {
        Duration::from_secs(1_u64 << self.consecutive_errors.min(MAX_BACKOFF_EXPONENT))
    }

    fn should_skip_attempt(&self) -> bool {
        if self.consecutive_errors < 3 {
            return false;
        }

        if let Some(last_error) = self.last_error_time {
            last_error.elapsed() < self.backoff_delay()
        } else {
            false
        }
    }
}

/// Snapshot of the connector health for reporting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectionHealth {
    pub consecutive_errors: u32,
    pub has_succeeded: bool,
    pub connected: bool,
}

/// Owns the one SSH session to the router
///
/// The session is opened lazily, reused across polls and dropped on the first
/// failure so the next command reconnects.
pub struct Connector {
    router: RouterConfig,
    session: Option<SshSession>,
    state: ConnectionState,
}

impl Connector {
    #[must_use]
    pub fn new(router: RouterConfig) -> Self {
        Self {
            router,
            session: None,
            state: ConnectionState::new(),
        }
    }

    /// Current connection health
    #[must_use]
    pub fn health(&self) -> ConnectionHealth {
        ConnectionHealth {
            consecutive_errors: self.state.consecutive_errors,
            has_succeeded: self.state.last_success_time.is_some(),
            connected: self.session.is_some(),
        }
    }

    /// Closes the session if one is open
    pub async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!("Closing SSH session to {}", self.router.address());
            session.close().await;
        }
    }

    async fn ensure_session(&mut self) -> Result<&mut SshSession, RouterError> {
        if self.state.should_skip_attempt() {
            let delay = self.state.backoff_delay();
            tracing::debug!(
                "Skipping connection attempt to {} (backoff: {} consecutive errors, delay: {:?})",
                self.router.address(),
                self.state.consecutive_errors,
                delay
            );
            return Err(RouterError::Backoff {
                addr: self.router.address(),
                errors: self.state.consecutive_errors,
            });
        }

        let session = match self.session.take() {
            Some(session) => {
                tracing::trace!("Reusing SSH session to {}", self.router.address());
                session
            }
            None => {
                tracing::debug!("Opening new SSH session to {}", self.router.address());
                SshSession::open(&self.router).await?
            }
        };
        Ok(self.session.insert(session))
    }

    async fn try_run(&mut self, command: &str) -> Result<String, RouterError> {
        let session = self.ensure_session().await?;
        session.exec(command).await
    }
}

impl CommandRunner for Connector {
    async fn run(&mut self, command: &str) -> Result<String, RouterError> {
        match self.try_run(command).await {
            Ok(output) => {
                self.state.record_success();
                Ok(output)
            }
            Err(e) => {
                if !matches!(e, RouterError::Backoff { .. }) {
                    self.state.record_error();
                    tracing::trace!(
                        "Router error recorded, consecutive errors: {}",
                        self.state.consecutive_errors
                    );
                }
                // A broken session is never reused
                if let Some(session) = self.session.take() {
                    session.close().await;
                }
                Err(e)
            }
        }
    }
}
