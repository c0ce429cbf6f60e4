// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Error types for the router presence tracker

use std::time::Duration;

use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Router (SSH) error
    #[error("Router error: {0}")]
    Router(#[from] RouterError),

    /// Metrics encoding error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),
}

/// Errors raised while talking to the router over SSH
#[derive(Debug, Error)]
pub enum RouterError {
    /// TCP connect or SSH handshake failed
    #[error("Failed to connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },

    /// The router rejected the supplied credentials
    #[error("Authentication rejected for user '{0}'")]
    Auth(String),

    /// The private key file could not be read or decoded
    #[error("Failed to load SSH key from {path}: {reason}")]
    KeyLoad { path: String, reason: String },

    /// Channel or command execution failure
    #[error("Command '{command}' failed: {reason}")]
    Command { command: String, reason: String },

    /// Operation did not finish in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Attempt skipped because of exponential backoff
    #[error("Connection to {addr} temporarily disabled after {errors} consecutive errors")]
    Backoff { addr: String, errors: u32 },

    /// Low-level SSH protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;
