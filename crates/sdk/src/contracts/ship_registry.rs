//! Ship registry (soulbound ship NFT) integration.
//!
//! ```solidity
//! function shipsOfOwner(address owner) view returns (uint256[]);
//! function shipsOfOwnerOptimized(address owner) view returns (uint256[]);
//! function hasPirate(address owner) view returns (bool);
//! ```

use std::sync::Arc;

use armada_chain::{Address, ChainTransport, U256};

use super::ContractHandle;
use crate::core::error::Result;
use crate::utils::conversion::{to_bool, to_u256_list};

#[derive(Debug, Clone)]
pub struct ShipRegistry {
    handle: ContractHandle,
}

impl ShipRegistry {
    pub fn new(address: Address, transport: Arc<dyn ChainTransport>) -> Self {
        Self {
            handle: ContractHandle::new(address, transport),
        }
    }

    pub fn address(&self) -> Address {
        self.handle.address()
    }

    pub async fn ships_of_owner(&self, owner: Address) -> Result<Vec<U256>> {
        self.id_list("shipsOfOwner", owner).await
    }

    /// Same result as [`ships_of_owner`](Self::ships_of_owner) from a cheaper
    /// on-chain index.
    pub async fn ships_of_owner_optimized(&self, owner: Address) -> Result<Vec<U256>> {
        self.id_list("shipsOfOwnerOptimized", owner).await
    }

    pub async fn has_pirate(&self, owner: Address) -> Result<bool> {
        let value = self
            .handle
            .read(self.handle.call("hasPirate").with_address(owner))
            .await?;
        to_bool(&value, "hasPirate")
    }

    async fn id_list(&self, function: &str, owner: Address) -> Result<Vec<U256>> {
        let value = self
            .handle
            .read(self.handle.call(function).with_address(owner))
            .await?;
        to_u256_list(&value, function)
    }
}
