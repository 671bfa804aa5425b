//! Game contract integrations.
//!
//! Each on-chain contract is represented as a struct with methods corresponding
//! to its functions. Reads return decoded values; writes take the signer as an
//! explicit argument and return a [`PendingTransaction`] without waiting for it.
//!
//! A wrapper may also carry a bound signer (see [`ContractHandle::connect`]),
//! used by the signer-less legacy call shape in [`crate::flows`].

pub mod core_game;
pub mod game_token;
pub mod pirate_pool;
pub mod ship_registry;

use std::fmt;
use std::sync::Arc;

use armada_chain::{Address, ChainTransport, ContractCall, DynSolValue, PendingTransaction, Signer};

use crate::core::error::{Result, SdkError};

// Re-export contract types
pub use core_game::CoreGame;
pub use game_token::GameToken;
pub use pirate_pool::PiratePool;
pub use ship_registry::ShipRegistry;

/// Address plus connection shared by every contract wrapper.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    transport: Arc<dyn ChainTransport>,
    signer: Option<Arc<dyn Signer>>,
}

impl ContractHandle {
    pub fn new(address: Address, transport: Arc<dyn ChainTransport>) -> Self {
        Self {
            address,
            transport,
            signer: None,
        }
    }

    /// Copy of this handle bound to `signer`.
    pub fn connect(&self, signer: Arc<dyn Signer>) -> Self {
        Self {
            signer: Some(signer),
            ..self.clone()
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn transport(&self) -> &Arc<dyn ChainTransport> {
        &self.transport
    }

    pub fn bound_signer(&self) -> Option<&Arc<dyn Signer>> {
        self.signer.as_ref()
    }

    /// Bound signer, or a configuration error naming `operation`.
    pub(crate) fn require_bound(&self, operation: &str) -> Result<Arc<dyn Signer>> {
        self.signer
            .clone()
            .ok_or_else(|| SdkError::signer_required(operation))
    }

    pub(crate) fn call(&self, function: &str) -> ContractCall {
        ContractCall::new(self.address, function)
    }

    pub(crate) async fn read(&self, call: ContractCall) -> Result<DynSolValue> {
        tracing::trace!(to = %call.to, function = %call.function, "contract read");
        Ok(self.transport.call(&call).await?)
    }

    /// Sign and submit `call` without waiting for settlement.
    pub(crate) async fn send(
        &self,
        signer: &dyn Signer,
        call: ContractCall,
    ) -> Result<PendingTransaction> {
        let from = signer
            .address()
            .ok_or_else(|| SdkError::signer_required(&call.function))?;

        tracing::debug!(
            %from,
            to = %call.to,
            function = %call.function,
            "submitting transaction"
        );

        let signed = signer.sign_transaction(call).await?;
        let hash = self.transport.submit_transaction(signed).await?;
        Ok(PendingTransaction::new(hash, Arc::clone(&self.transport)))
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("bound", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}
