//! Game token (ERC-20) integration.
//!
//! ```solidity
//! function balanceOf(address owner) view returns (uint256);
//! function allowance(address owner, address spender) view returns (uint256);
//! function decimals() view returns (uint8);
//! function approve(address spender, uint256 amount) returns (bool);
//! ```

use std::sync::Arc;

use armada_chain::{Address, ChainTransport, PendingTransaction, Signer, U256};

use super::ContractHandle;
use crate::core::error::Result;
use crate::utils::conversion::{to_u8, to_u256};

/// The token wagered on voyages and staked in the pirate pool.
#[derive(Debug, Clone)]
pub struct GameToken {
    handle: ContractHandle,
}

impl GameToken {
    pub fn new(address: Address, transport: Arc<dyn ChainTransport>) -> Self {
        Self {
            handle: ContractHandle::new(address, transport),
        }
    }

    pub fn connect(&self, signer: Arc<dyn Signer>) -> Self {
        Self {
            handle: self.handle.connect(signer),
        }
    }

    pub fn address(&self) -> Address {
        self.handle.address()
    }

    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        let value = self
            .handle
            .read(self.handle.call("balanceOf").with_address(owner))
            .await?;
        to_u256(&value, "balanceOf")
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        let call = self
            .handle
            .call("allowance")
            .with_address(owner)
            .with_address(spender);
        let value = self.handle.read(call).await?;
        to_u256(&value, "allowance")
    }

    pub async fn decimals(&self) -> Result<u8> {
        let value = self.handle.read(self.handle.call("decimals")).await?;
        to_u8(&value, "decimals")
    }

    /// Set the allowance of `spender` to exactly `amount`.
    pub async fn approve(
        &self,
        signer: &dyn Signer,
        spender: Address,
        amount: U256,
    ) -> Result<PendingTransaction> {
        let call = self
            .handle
            .call("approve")
            .with_address(spender)
            .with_uint(amount);
        self.handle.send(signer, call).await
    }
}
