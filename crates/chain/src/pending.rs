//! Handle for a submitted transaction.

use std::fmt;
use std::sync::Arc;

use crate::traits::{ChainTransport, TransportError};
use crate::types::{Receipt, TxHash};

/// A transaction that has been submitted but not yet observed as settled.
#[derive(Clone)]
pub struct PendingTransaction {
    hash: TxHash,
    transport: Arc<dyn ChainTransport>,
}

impl PendingTransaction {
    pub fn new(hash: TxHash, transport: Arc<dyn ChainTransport>) -> Self {
        Self { hash, transport }
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Wait for settlement.
    ///
    /// No timeout is applied here; this suspends as long as the transport does.
    pub async fn wait(&self) -> Result<Option<Receipt>, TransportError> {
        tracing::trace!(hash = %self.hash, "waiting for receipt");
        self.transport.wait_for_receipt(&self.hash).await
    }
}

impl fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}
