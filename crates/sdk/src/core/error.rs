//! Error types for SDK operations.

use armada_chain::TransportError;
use thiserror::Error;

/// Errors that can occur during SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Missing or placeholder address, missing RPC endpoint, missing signer.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Neither the current nor the legacy call shape is available.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Settlement was awaited but produced no receipt.
    #[error("Transaction failure: {0}")]
    TransactionFailure(String),

    #[error("Decode error: {0}")]
    Decode(String),

    /// Network, RPC and revert failures from the transport, passed through.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SdkError {
    pub(crate) fn signer_required(operation: &str) -> Self {
        SdkError::Configuration(format!("signer required for {operation}"))
    }

    pub(crate) fn decode(what: &str, function: &str) -> Self {
        SdkError::Decode(format!("unexpected {what} returned by {function}"))
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
