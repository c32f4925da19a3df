//! Error types for the printing library

use thiserror::Error;

/// Printing error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Failed to open or negotiate a device connection
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error while talking to a device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No matching hardware transport capability in this runtime
    #[error("Transport not supported: {0}")]
    NotSupported(String),

    /// Operation requires an open transmission channel
    #[error("Not connected")]
    NotConnected,

    /// Timeout waiting for the device
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
