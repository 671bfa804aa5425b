//! Chain transport abstraction for the Armada SDK.
//!
//! This crate is the bottom layer of the SDK. It knows how to read contract
//! state, submit signed transactions and wait for them to settle, but has no
//! knowledge of ships, voyages or any other game concept.
//!
//! # Architecture
//!
//! ```text
//! armada-sdk:   GameClient / flows (composite operations)
//!                    │
//!                    ▼
//!               contract wrappers (GameToken, CoreGame, ...)
//!                    │
//! armada-chain:      ▼
//!               ChainTransport + Signer  ──►  PendingTransaction ──► Receipt
//! ```
//!
//! The node connection and the wallet are supplied by the caller through the
//! [`ChainTransport`] and [`Signer`] traits.
//!
//! # Usage
//!
//! ```ignore
//! use armada_chain::{ChainTransport, ContractCall, PendingTransaction, Signer};
//!
//! async fn approve(transport: Arc<dyn ChainTransport>, signer: &dyn Signer) -> Result<(), TransportError> {
//!     let call = ContractCall::new(token, "approve").with_address(spender).with_uint(amount);
//!     let signed = signer.sign_transaction(call).await?;
//!     let hash = transport.submit_transaction(signed).await?;
//!     let receipt = PendingTransaction::new(hash, transport).wait().await?;
//!     Ok(())
//! }
//! ```

pub mod pending;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export all traits
pub use traits::{ChainTransport, Signer, TransportError};

// Re-export all types
pub use pending::PendingTransaction;
pub use types::{
    Address, B256, ContractCall, DynSolValue, Receipt, ReceiptStatus, SignedTransaction, TxHash,
    U256,
};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockChain, MockSigner, RecordedCall};
