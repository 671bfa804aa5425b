//! Settlement of submitted transactions.

use armada_chain::{PendingTransaction, Receipt, TransportError};

use crate::core::error::{Result, SdkError};

/// Wait for `pending` to settle and require a successful receipt.
///
/// # Errors
///
/// - `TransactionFailure` if settlement produced no receipt
/// - `Transport(Reverted)` if the receipt reports a revert
/// - transport errors from the wait itself, unchanged
pub async fn settle(pending: &PendingTransaction, operation: &str) -> Result<Receipt> {
    let hash = pending.hash();

    match pending.wait().await? {
        None => Err(SdkError::TransactionFailure(format!(
            "{operation} transaction {hash} settled without a receipt"
        ))),
        Some(receipt) if !receipt.is_success() => Err(TransportError::Reverted(hash).into()),
        Some(receipt) => Ok(receipt),
    }
}
