// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the router presence tracker
//!
//! Loads and validates configuration from environment variables (and `.env`).

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::{AppError, Result};


/// Default configuration values
pub mod defaults {
    pub const SERVER_ADDR: &str = "0.0.0.0:9100";
    pub const SSH_PORT: u16 = 22;
    pub const CONSIDER_HOME_SECS: u64 = 180;
    pub const POLL_INTERVAL_SECS: u64 = 30;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const ROUTER_HOST: &str = "ROUTER_HOST";
    pub const ROUTER_PORT: &str = "ROUTER_PORT";
    pub const ROUTER_USERNAME: &str = "ROUTER_USERNAME";
    pub const ROUTER_PASSWORD: &str = "ROUTER_PASSWORD";
    pub const ROUTER_SSH_KEY: &str = "ROUTER_SSH_KEY";
    pub const CONSIDER_HOME_SECONDS: &str = "CONSIDER_HOME_SECONDS";
    pub const POLL_INTERVAL_SECONDS: &str = "POLL_INTERVAL_SECONDS";
    pub const STATE_FILE: &str = "STATE_FILE";
    pub const ENABLED_DEVICES: &str = "ENABLED_DEVICES";
}

/// How the SSH session authenticates
///
/// Only the key path is kept; the key itself is read at connect time.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    Password(SecretString),
    KeyFile(PathBuf),
}

/// Connection settings for the router
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: AuthMethod,
}

impl RouterConfig {
    /// `host:port` form used for connecting and logging
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates router configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Router host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err(format!("Invalid SSH port 0 for router '{}'", self.host));
        }

        if self.username.trim().is_empty() {
            return Err(format!(
                "Username cannot be empty for router '{}'",
                self.host
            ));
        }

        if let AuthMethod::KeyFile(path) = &self.auth {
            if path.as_os_str().is_empty() {
                return Err("SSH key path cannot be empty".to_string());
            }
        }

        Ok(())
    }
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub router: RouterConfig,
    pub poll_interval_secs: u64,
    pub consider_home_secs: u64,
    pub state_file: Option<PathBuf>,
    /// MACs whose tracker entities start enabled
    pub enabled_devices: Vec<String>,
}

impl Config {
    /// Builds a configuration for `router` with every other setting at its default
    #[must_use]
    pub fn with_router(router: RouterConfig) -> Self {
        Config {
            server_addr: defaults::SERVER_ADDR.to_string(),
            router,
            poll_interval_secs: defaults::POLL_INTERVAL_SECS,
            consider_home_secs: defaults::CONSIDER_HOME_SECS,
            state_file: None,
            enabled_devices: Vec::new(),
        }
    }

    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = non_empty(env_vars::ROUTER_HOST).ok_or_else(|| {
            AppError::Config(format!("{} must be set", env_vars::ROUTER_HOST))
        })?;
        let username = non_empty(env_vars::ROUTER_USERNAME).ok_or_else(|| {
            AppError::Config(format!("{} must be set", env_vars::ROUTER_USERNAME))
        })?;

        let port = match non_empty(env_vars::ROUTER_PORT) {
            Some(v) => v.trim().parse::<u16>().map_err(|e| {
                AppError::Config(format!("Invalid {} '{}': {}", env_vars::ROUTER_PORT, v, e))
            })?,
            None => defaults::SSH_PORT,
        };

        // A key path wins over a password when both are present
        let auth = if let Some(path) = non_empty(env_vars::ROUTER_SSH_KEY) {
            AuthMethod::KeyFile(PathBuf::from(path.trim()))
        } else if let Some(password) = lookup(env_vars::ROUTER_PASSWORD) {
            AuthMethod::Password(SecretString::from(password))
        } else {
            return Err(AppError::Config(format!(
                "Either {} or {} must be set",
                env_vars::ROUTER_PASSWORD,
                env_vars::ROUTER_SSH_KEY
            )));
        };

        let router = RouterConfig {
            host: host.trim().to_string(),
            port,
            username: username.trim().to_string(),
            auth,
        };
        router.validate().map_err(AppError::Config)?;

        let server_addr = non_empty(env_vars::SERVER_ADDR)
            .unwrap_or_else(|| defaults::SERVER_ADDR.to_string());

        let poll_interval_secs = parse_secs(
            non_empty(env_vars::POLL_INTERVAL_SECONDS),
            env_vars::POLL_INTERVAL_SECONDS,
            defaults::POLL_INTERVAL_SECS,
        );
        let consider_home_secs = parse_secs(
            non_empty(env_vars::CONSIDER_HOME_SECONDS),
            env_vars::CONSIDER_HOME_SECONDS,
            defaults::CONSIDER_HOME_SECS,
        );

        let state_file = non_empty(env_vars::STATE_FILE).map(PathBuf::from);

        let enabled_devices = non_empty(env_vars::ENABLED_DEVICES)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|mac| !mac.is_empty())
                    .map(str::to_uppercase)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            server_addr,
            router,
            poll_interval_secs,
            consider_home_secs,
            state_file,
            enabled_devices,
        })
    }
}

fn parse_secs(value: Option<String>, name: &str, default: u64) -> u64 {
    match value {
        Some(v) => match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                tracing::warn!("Invalid {} '{}', using default {}s", name, v, default);
                default
            }
        },
        None => default,
    }
}
