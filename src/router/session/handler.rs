// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! russh client event handler

/// Handler for russh client events
///
/// Server keys are accepted without a known_hosts check.
#[derive(Debug, Clone, Default)]
pub(crate) struct SshHandler;

impl russh::client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        tracing::trace!(
            "Accepting router host key ({})",
            server_public_key.algorithm().as_str()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_debug() {
        let handler = SshHandler;
        assert!(format!("{:?}", handler).contains("SshHandler"));
    }
}
