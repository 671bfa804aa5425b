//! In-memory chain and signer for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::traits::{ChainTransport, Signer, TransportError};
use crate::types::{
    Address, B256, ContractCall, DynSolValue, Receipt, ReceiptStatus, SignedTransaction, TxHash,
    U256,
};

/// Mock chain id (BSC testnet).
const MOCK_CHAIN_ID: u64 = 97;

/// A transport-level interaction observed by [`MockChain`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Read {
        to: Address,
        function: String,
        args: Vec<DynSolValue>,
    },
    Submit {
        from: Address,
        to: Address,
        function: String,
        args: Vec<DynSolValue>,
    },
    Wait {
        hash: TxHash,
    },
    ChainId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Revert,
    Missing,
}

struct ReadResponse {
    function: String,
    args: Option<Vec<DynSolValue>>,
    value: DynSolValue,
}

#[derive(Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    reads: Vec<ReadResponse>,
    read_failures: HashMap<String, String>,
    allowances: HashMap<(Address, Address), U256>,
    submit_failures: HashMap<String, VecDeque<String>>,
    receipt_outcomes: HashMap<String, VecDeque<Outcome>>,
    pending: HashMap<TxHash, Outcome>,
    tx_counter: u64,
    block_number: u64,
}

/// Mock chain for testing without a network.
///
/// Records every transport call and simulates a token's allowance storage:
/// `allowance` reads are answered from it and successful `approve`
/// submissions update it. Other reads are answered from canned responses.
#[derive(Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<MockState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle usable wherever a transport is expected.
    pub fn transport(&self) -> Arc<dyn ChainTransport> {
        Arc::new(self.clone())
    }

    /// Answer every read of `function` with `value`.
    pub fn set_read(&self, function: &str, value: DynSolValue) {
        self.state.lock().unwrap().reads.push(ReadResponse {
            function: function.to_string(),
            args: None,
            value,
        });
    }

    /// Answer reads of `function` with exactly these arguments with `value`.
    pub fn set_read_for(&self, function: &str, args: Vec<DynSolValue>, value: DynSolValue) {
        self.state.lock().unwrap().reads.push(ReadResponse {
            function: function.to_string(),
            args: Some(args),
            value,
        });
    }

    /// Make every read of `function` fail with an RPC error.
    pub fn fail_read(&self, function: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .read_failures
            .insert(function.to_string(), message.to_string());
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((owner, spender), amount);
    }

    pub fn allowance_of(&self, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Reject the next submission of `function` with a network error.
    pub fn fail_next_submit(&self, function: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .submit_failures
            .entry(function.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    /// Settle the next submission of `function` with a reverted receipt.
    pub fn revert_next(&self, function: &str) {
        self.queue_outcome(function, Outcome::Revert);
    }

    /// Settle the next submission of `function` without a receipt.
    pub fn drop_next_receipt(&self, function: &str) {
        self.queue_outcome(function, Outcome::Missing);
    }

    fn queue_outcome(&self, function: &str, outcome: Outcome) {
        self.state
            .lock()
            .unwrap()
            .receipt_outcomes
            .entry(function.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Submitted transactions as `(function, args)`, in order.
    pub fn submissions(&self) -> Vec<(String, Vec<DynSolValue>)> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Submit { function, args, .. } => {
                    Some((function.clone(), args.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Names of submitted functions, in order.
    pub fn submitted_functions(&self) -> Vec<String> {
        self.submissions().into_iter().map(|(f, _)| f).collect()
    }

    /// Number of reads of `function`.
    pub fn read_count(&self, function: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| matches!(call, RecordedCall::Read { function: f, .. } if f == function))
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

fn expect_address(args: &[DynSolValue], index: usize) -> Result<Address, TransportError> {
    args.get(index)
        .and_then(DynSolValue::as_address)
        .ok_or_else(|| TransportError::Decode(format!("argument {index} is not an address")))
}

fn expect_uint(args: &[DynSolValue], index: usize) -> Result<U256, TransportError> {
    args.get(index)
        .and_then(DynSolValue::as_uint)
        .map(|(value, _)| value)
        .ok_or_else(|| TransportError::Decode(format!("argument {index} is not a uint")))
}

#[async_trait]
impl ChainTransport for MockChain {
    async fn call(&self, call: &ContractCall) -> Result<DynSolValue, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::Read {
            to: call.to,
            function: call.function.clone(),
            args: call.args.clone(),
        });

        if let Some(message) = state.read_failures.get(&call.function) {
            return Err(TransportError::Rpc(message.clone()));
        }

        if call.function == "allowance" {
            let owner = expect_address(&call.args, 0)?;
            let spender = expect_address(&call.args, 1)?;
            let amount = state
                .allowances
                .get(&(owner, spender))
                .copied()
                .unwrap_or(U256::ZERO);
            return Ok(DynSolValue::Uint(amount, 256));
        }

        // Exact-argument responses take precedence over function-wide ones.
        let exact = state.reads.iter().rev().find(|r| {
            r.function == call.function && r.args.as_deref() == Some(call.args.as_slice())
        });
        let any = state
            .reads
            .iter()
            .rev()
            .find(|r| r.function == call.function && r.args.is_none());

        exact
            .or(any)
            .map(|r| r.value.clone())
            .ok_or_else(|| {
                TransportError::Rpc(format!(
                    "execution reverted: no mock response for {}",
                    call.function
                ))
            })
    }

    async fn submit_transaction(&self, tx: SignedTransaction) -> Result<TxHash, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::Submit {
            from: tx.from,
            to: tx.call.to,
            function: tx.call.function.clone(),
            args: tx.call.args.clone(),
        });

        if let Some(message) = state
            .submit_failures
            .get_mut(&tx.call.function)
            .and_then(VecDeque::pop_front)
        {
            return Err(TransportError::Network(message));
        }

        let outcome = state
            .receipt_outcomes
            .get_mut(&tx.call.function)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Outcome::Success);

        if tx.call.function == "approve" && outcome == Outcome::Success {
            let spender = expect_address(&tx.call.args, 0)?;
            let amount = expect_uint(&tx.call.args, 1)?;
            state.allowances.insert((tx.from, spender), amount);
        }

        state.tx_counter += 1;
        let hash = B256::left_padding_from(&state.tx_counter.to_be_bytes());
        state.pending.insert(hash, outcome);

        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: &TxHash) -> Result<Option<Receipt>, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::Wait { hash: *hash });

        let status = match state.pending.get(hash).copied() {
            Some(Outcome::Success) => ReceiptStatus::Success,
            Some(Outcome::Revert) => ReceiptStatus::Reverted,
            Some(Outcome::Missing) | None => return Ok(None),
        };

        state.block_number += 1;
        Ok(Some(Receipt {
            transaction_hash: *hash,
            block_number: state.block_number,
            gas_used: 21_000, // Mock gas cost
            status,
        }))
    }

    async fn chain_id(&self) -> Result<u64, TransportError> {
        self.state.lock().unwrap().calls.push(RecordedCall::ChainId);
        Ok(MOCK_CHAIN_ID)
    }
}

/// Mock wallet that signs without touching the network.
#[derive(Debug, Clone)]
pub struct MockSigner {
    address: Option<Address>,
}

impl MockSigner {
    pub fn new(address: Address) -> Self {
        Self {
            address: Some(address),
        }
    }

    /// A signer whose wallet does not expose an address.
    pub fn without_address() -> Self {
        Self { address: None }
    }
}

#[async_trait]
impl Signer for MockSigner {
    fn address(&self) -> Option<Address> {
        self.address
    }

    async fn sign_transaction(&self, call: ContractCall) -> Result<SignedTransaction, TransportError> {
        let from = self
            .address
            .ok_or_else(|| TransportError::Signing("signer has no address".to_string()))?;

        Ok(SignedTransaction {
            from,
            call,
            signature: from.to_vec(),
        })
    }
}
