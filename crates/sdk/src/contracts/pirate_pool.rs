//! Pirate pool (staking) contract integration.
//!
//! ```solidity
//! function stake(uint256 amount);
//! function unstake(uint256 amount);
//! function claim();
//! function getUserOverview(address user) view returns (uint256 staked, uint256 pending, uint256 apyBps);
//! function getPoolsOverview() view returns (uint256 totalStaked, uint256 totalRewards, uint256 apyBps);
//! ```

use std::sync::Arc;

use armada_chain::{Address, ChainTransport, PendingTransaction, Signer, U256};

use super::ContractHandle;
use crate::core::error::Result;
use crate::core::types::{PoolsOverview, UserOverview};
use crate::utils::conversion::{field, to_items, to_u32, to_u256};

#[derive(Debug, Clone)]
pub struct PiratePool {
    handle: ContractHandle,
}

impl PiratePool {
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

    pub async fn stake(&self, signer: &dyn Signer, amount: U256) -> Result<PendingTransaction> {
        let call = self.handle.call("stake").with_uint(amount);
        self.handle.send(signer, call).await
    }

    pub async fn unstake(&self, signer: &dyn Signer, amount: U256) -> Result<PendingTransaction> {
        let call = self.handle.call("unstake").with_uint(amount);
        self.handle.send(signer, call).await
    }

    /// Claim accrued staking rewards.
    pub async fn claim(&self, signer: &dyn Signer) -> Result<PendingTransaction> {
        self.handle.send(signer, self.handle.call("claim")).await
    }

    pub async fn user_overview(&self, user: Address) -> Result<UserOverview> {
        const FUNCTION: &str = "getUserOverview";

        let value = self
            .handle
            .read(self.handle.call(FUNCTION).with_address(user))
            .await?;
        let fields = to_items(&value, FUNCTION)?;

        Ok(UserOverview {
            user,
            staked: to_u256(field(fields, 0, FUNCTION)?, FUNCTION)?,
            pending_rewards: to_u256(field(fields, 1, FUNCTION)?, FUNCTION)?,
            apy_bps: to_u32(field(fields, 2, FUNCTION)?, FUNCTION)?,
        })
    }

    pub async fn pools_overview(&self) -> Result<PoolsOverview> {
        const FUNCTION: &str = "getPoolsOverview";

        let value = self.handle.read(self.handle.call(FUNCTION)).await?;
        let fields = to_items(&value, FUNCTION)?;

        Ok(PoolsOverview {
            total_staked: to_u256(field(fields, 0, FUNCTION)?, FUNCTION)?,
            total_rewards: to_u256(field(fields, 1, FUNCTION)?, FUNCTION)?,
            apy_bps: to_u32(field(fields, 2, FUNCTION)?, FUNCTION)?,
        })
    }
}
