//! Transport and signer traits.
//!
//! - [`ChainTransport`]: read connection to a node (view calls, submission,
//!   receipt polling)
//! - [`Signer`]: caller-supplied identity that authorizes transactions

use async_trait::async_trait;

use crate::types::{Address, ContractCall, DynSolValue, Receipt, SignedTransaction, TxHash};

// ============================================================================
// Error Types
// ============================================================================

/// Transport layer errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ============================================================================
// Layer 0: Pure Infrastructure
// ============================================================================

/// Connection to a blockchain node.
///
/// Implementations perform read-only contract calls and relay signed
/// transactions. They never sign anything themselves.
#[async_trait]
pub trait ChainTransport: Send + Sync {
    /// Execute a read-only contract call and return the decoded result.
    async fn call(&self, call: &ContractCall) -> Result<DynSolValue, TransportError>;

    /// Submit a signed transaction, returning its hash.
    async fn submit_transaction(&self, tx: SignedTransaction) -> Result<TxHash, TransportError>;

    /// Wait until the transaction settles.
    ///
    /// Returns `Ok(None)` when the node reports no receipt (e.g. the
    /// transaction was dropped).
    async fn wait_for_receipt(&self, hash: &TxHash) -> Result<Option<Receipt>, TransportError>;

    /// Chain id of the connected network.
    async fn chain_id(&self) -> Result<u64, TransportError>;
}

/// Write-capable identity (wallet integration).
#[async_trait]
pub trait Signer: Send + Sync {
    /// Address of this signer, if the wallet exposes it.
    fn address(&self) -> Option<Address>;

    /// Sign a contract call for submission.
    async fn sign_transaction(&self, call: ContractCall) -> Result<SignedTransaction, TransportError>;
}
