// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Low-level SSH session to the router

mod auth;
mod handler;

use std::sync::Arc;
use std::time::Duration;

use russh::ChannelMsg;
use russh::client::{self, Handle};
use tokio::time::timeout;

use crate::config::RouterConfig;
use crate::error::RouterError;
use handler::SshHandler;

/// Connection and handshake timeout (10 seconds)
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-command read timeout (30 seconds)
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle sessions are torn down by russh after this long
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(300);

/// Extended data stream number used for stderr
const SSH_EXTENDED_DATA_STDERR: u32 = 1;

/// An authenticated SSH session
pub(super) struct SshSession {
    handle: Handle<SshHandler>,
}

impl SshSession {
    /// Opens the TCP connection, performs the SSH handshake and authenticates
    pub(super) async fn open(router: &RouterConfig) -> Result<Self, RouterError> {
        let addr = router.address();
        tracing::trace!("Attempting SSH connection to: {}", addr);

        let config = Arc::new(client::Config {
            inactivity_timeout: Some(INACTIVITY_TIMEOUT),
            ..Default::default()
        });

        let handle = timeout(
            CONNECTION_TIMEOUT,
            client::connect(config, (router.host.as_str(), router.port), SshHandler),
        )
        .await
        .map_err(|_| RouterError::Timeout(CONNECTION_TIMEOUT))?
        .map_err(|e| RouterError::Connect {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;
        tracing::trace!("SSH handshake completed with: {}", addr);

        let mut session = Self { handle };
        timeout(
            CONNECTION_TIMEOUT,
            session.authenticate(&router.username, &router.auth),
        )
        .await
        .map_err(|_| RouterError::Timeout(CONNECTION_TIMEOUT))??;

        Ok(session)
    }

    /// Runs a command and returns its stdout
    ///
    /// Output on stderr is logged and otherwise ignored.
    pub(super) async fn exec(&mut self, command: &str) -> Result<String, RouterError> {
        let command_error = |reason: String| RouterError::Command {
            command: command.to_string(),
            reason,
        };

        timeout(READ_TIMEOUT, async {
            let mut channel = self.handle.channel_open_session().await?;
            channel.exec(true, command).await?;

            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            let mut exit_status = None;
            while let Some(msg) = channel.wait().await {
                match msg {
                    ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                    ChannelMsg::ExtendedData { ref data, ext } if ext == SSH_EXTENDED_DATA_STDERR => {
                        stderr.extend_from_slice(data);
                    }
                    ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                    _ => {}
                }
            }

            if !stderr.is_empty() {
                tracing::warn!(
                    "Command '{}' wrote to stderr: {}",
                    command,
                    String::from_utf8_lossy(&stderr).trim()
                );
            }
            tracing::trace!(
                "Command '{}' finished with status {:?}, {} bytes of output",
                command,
                exit_status,
                stdout.len()
            );

            Ok::<_, RouterError>(String::from_utf8_lossy(&stdout).into_owned())
        })
        .await
        .map_err(|_| command_error(format!("no response within {READ_TIMEOUT:?}")))?
    }

    /// Politely closes the session
    pub(super) async fn close(self) {
        if let Err(e) = self
            .handle
            .disconnect(russh::Disconnect::ByApplication, "", "English")
            .await
        {
            tracing::debug!("Error while closing SSH session: {}", e);
        }
    }
}
