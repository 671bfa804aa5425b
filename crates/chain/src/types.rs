//! Common types for contract interactions.

use serde::{Deserialize, Serialize};

pub use alloy_dyn_abi::DynSolValue;
pub use alloy_primitives::{Address, B256, U256};

/// Transaction hash.
pub type TxHash = B256;

/// A single contract function invocation.
///
/// The function is addressed by name; mapping names to selectors and encoding
/// the arguments is the transport's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    /// Contract address
    pub to: Address,

    /// Function name as it appears in the contract ABI (e.g. `"allowance"`)
    pub function: String,

    /// Positional arguments
    pub args: Vec<DynSolValue>,
}

impl ContractCall {
    pub fn new(to: Address, function: impl Into<String>) -> Self {
        Self {
            to,
            function: function.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: DynSolValue) -> Self {
        self.args.push(arg);
        self
    }

    /// Append a `uint256` argument.
    pub fn with_uint(self, value: U256) -> Self {
        self.with_arg(DynSolValue::Uint(value, 256))
    }

    /// Append a `uint8` argument.
    pub fn with_u8(self, value: u8) -> Self {
        self.with_arg(DynSolValue::Uint(U256::from(value), 8))
    }

    /// Append an `address` argument.
    pub fn with_address(self, value: Address) -> Self {
        self.with_arg(DynSolValue::Address(value))
    }
}

/// A contract call signed by a [`Signer`](crate::Signer), ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    /// Sender address
    pub from: Address,

    /// The call being authorized
    pub call: ContractCall,

    /// Signer-specific signature bytes
    pub signature: Vec<u8>,
}

/// Final outcome of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    /// Transaction executed successfully
    Success,

    /// Transaction was mined but reverted
    Reverted,
}

/// Confirmation record for a settled transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Hash of the settled transaction
    pub transaction_hash: TxHash,

    /// Block that included the transaction
    pub block_number: u64,

    /// Gas consumed by execution
    pub gas_used: u64,

    /// Execution outcome
    pub status: ReceiptStatus,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}
