// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! SSH authentication

use std::path::Path;
use std::sync::Arc;

use russh::client::AuthResult;
use russh::keys::{PrivateKeyWithHashAlg, load_secret_key};
use secrecy::ExposeSecret;

use super::SshSession;
use crate::config::AuthMethod;
use crate::error::RouterError;

impl SshSession {
    pub(super) async fn authenticate(
        &mut self,
        username: &str,
        auth: &AuthMethod,
    ) -> Result<(), RouterError> {
        tracing::trace!("Attempting login for user: {}", username);
        let result = match auth {
            AuthMethod::Password(password) => {
                self.handle
                    .authenticate_password(username, password.expose_secret())
                    .await?
            }
            AuthMethod::KeyFile(path) => {
                let key = load_key(path)?;
                // RSA keys need an explicit signature hash; others ignore it
                let hash_alg = self.handle.best_supported_rsa_hash().await?.flatten();
                self.handle
                    .authenticate_publickey(
                        username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await?
            }
        };

        match result {
            AuthResult::Success => {
                tracing::debug!("Login successful for user: {}", username);
                Ok(())
            }
            AuthResult::Failure { .. } => {
                tracing::trace!("Login rejected for user: {}", username);
                Err(RouterError::Auth(username.to_string()))
            }
        }
    }
}

/// Loads an unencrypted private key (ed25519, ECDSA, RSA) from disk
fn load_key(path: &Path) -> Result<russh::keys::PrivateKey, RouterError> {
    load_secret_key(path, None).map_err(|e| RouterError::KeyLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_key_missing_file() {
        let err = load_key(Path::new("/nonexistent/id_ed25519")).unwrap_err();
        assert!(matches!(err, RouterError::KeyLoad { ref path, .. } if path.contains("id_ed25519")));
    }

    #[test]
    fn test_load_key_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id_rsa");
        std::fs::write(&path, "not a key").unwrap();
        assert!(matches!(load_key(&path), Err(RouterError::KeyLoad { .. })));
    }
}
