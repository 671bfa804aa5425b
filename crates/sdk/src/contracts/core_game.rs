//! Core game contract integration.
//!
//! ```solidity
//! function buyShip(uint8 level, uint256 quantity) payable;
//! function voyage(uint256 shipId, uint256 wager);
//! function upgradeShip(uint256 shipA, uint256 shipB);
//! function finishDay();
//! function claimWinnerReward();
//!
//! function getShipPrice() view returns (uint256);
//! function getFomoStatus() view returns (uint256, uint256, uint256, uint256, uint256);
//! function getUserShips(address owner) view returns (Ship[]);
//! function getLevel(uint256 shipId) view returns (uint8);
//! function getFaction(uint256 shipId) view returns (uint8);
//! function getLevelsAndFactions(uint256[] shipIds) view returns (uint8[], uint8[]);
//! ```
//!
//! `getLevelsAndFactions` is optional; deployments without it revert.
//!
//! `Ship` is `(id, level, faction, runsLeft, imageCid)`. Older deployments omit
//! `runsLeft`.

use std::sync::Arc;

use armada_chain::{Address, ChainTransport, DynSolValue, PendingTransaction, Signer, U256};

use super::ContractHandle;
use crate::core::error::{Result, SdkError};
use crate::core::types::{Faction, FomoStatus, ShipInfo};
use crate::utils::conversion::{field, to_faction, to_items, to_u8, to_u32, to_u64, to_u256};

/// Core game contract: ship purchases, voyages, upgrades and the daily FOMO round.
#[derive(Debug, Clone)]
pub struct CoreGame {
    handle: ContractHandle,
}

impl CoreGame {
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

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    pub async fn buy_ship(
        &self,
        signer: &dyn Signer,
        level: u8,
        quantity: u64,
    ) -> Result<PendingTransaction> {
        let call = self
            .handle
            .call("buyShip")
            .with_u8(level)
            .with_uint(U256::from(quantity));
        self.handle.send(signer, call).await
    }

    pub async fn voyage(
        &self,
        signer: &dyn Signer,
        ship_id: U256,
        wager: U256,
    ) -> Result<PendingTransaction> {
        let call = self
            .handle
            .call("voyage")
            .with_uint(ship_id)
            .with_uint(wager);
        self.handle.send(signer, call).await
    }

    /// Merge `ship_b` into `ship_a`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when both ids are equal; nothing is sent.
    pub async fn upgrade_ship(
        &self,
        signer: &dyn Signer,
        ship_a: U256,
        ship_b: U256,
    ) -> Result<PendingTransaction> {
        check_distinct(ship_a, ship_b)?;
        let call = self
            .handle
            .call("upgradeShip")
            .with_uint(ship_a)
            .with_uint(ship_b);
        self.handle.send(signer, call).await
    }

    pub async fn finish_day(&self, signer: &dyn Signer) -> Result<PendingTransaction> {
        self.handle.send(signer, self.handle.call("finishDay")).await
    }

    pub async fn claim_winner_reward(&self, signer: &dyn Signer) -> Result<PendingTransaction> {
        self.handle
            .send(signer, self.handle.call("claimWinnerReward"))
            .await
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub async fn ship_price(&self) -> Result<U256> {
        let value = self.handle.read(self.handle.call("getShipPrice")).await?;
        to_u256(&value, "getShipPrice")
    }

    pub async fn fomo_status(&self) -> Result<FomoStatus> {
        const FUNCTION: &str = "getFomoStatus";

        let value = self.handle.read(self.handle.call(FUNCTION)).await?;
        let fields = to_items(&value, FUNCTION)?;

        Ok(FomoStatus {
            cargo_keys: to_u256(field(fields, 0, FUNCTION)?, FUNCTION)?,
            fort_keys: to_u256(field(fields, 1, FUNCTION)?, FUNCTION)?,
            cargo_jackpot: to_u256(field(fields, 2, FUNCTION)?, FUNCTION)?,
            fort_jackpot: to_u256(field(fields, 3, FUNCTION)?, FUNCTION)?,
            remaining_time: to_u64(field(fields, 4, FUNCTION)?, FUNCTION)?,
        })
    }

    pub async fn user_ships(&self, owner: Address) -> Result<Vec<ShipInfo>> {
        let call = self.handle.call("getUserShips").with_address(owner);
        let value = self.handle.read(call).await?;
        to_items(&value, "getUserShips")?
            .iter()
            .map(decode_ship)
            .collect()
    }

    pub async fn level_of(&self, ship_id: U256) -> Result<u8> {
        let value = self
            .handle
            .read(self.handle.call("getLevel").with_uint(ship_id))
            .await?;
        to_u8(&value, "getLevel")
    }

    pub async fn faction_of(&self, ship_id: U256) -> Result<Faction> {
        let value = self
            .handle
            .read(self.handle.call("getFaction").with_uint(ship_id))
            .await?;
        to_faction(&value, "getFaction")
    }

    /// Level and faction of every id in one read, in input order.
    pub async fn levels_and_factions(&self, ship_ids: &[U256]) -> Result<Vec<(u8, Faction)>> {
        const FUNCTION: &str = "getLevelsAndFactions";

        let ids = ship_ids
            .iter()
            .map(|&id| DynSolValue::Uint(id, 256))
            .collect();
        let call = self.handle.call(FUNCTION).with_arg(DynSolValue::Array(ids));
        let value = self.handle.read(call).await?;

        let fields = to_items(&value, FUNCTION)?;
        let levels = to_items(field(fields, 0, FUNCTION)?, FUNCTION)?;
        let factions = to_items(field(fields, 1, FUNCTION)?, FUNCTION)?;
        if levels.len() != ship_ids.len() || factions.len() != ship_ids.len() {
            return Err(SdkError::decode("array length", FUNCTION));
        }

        levels
            .iter()
            .zip(factions)
            .map(|(level, faction)| -> Result<(u8, Faction)> {
                Ok((to_u8(level, FUNCTION)?, to_faction(faction, FUNCTION)?))
            })
            .collect()
    }
}

pub(crate) fn check_distinct(ship_a: U256, ship_b: U256) -> Result<()> {
    if ship_a == ship_b {
        return Err(SdkError::InvalidArgument(
            "cannot upgrade using the same ship twice".to_string(),
        ));
    }
    Ok(())
}

fn decode_ship(value: &DynSolValue) -> Result<ShipInfo> {
    const FUNCTION: &str = "getUserShips";

    let fields = to_items(value, FUNCTION)?;
    let mut ship = ShipInfo::new(
        to_u256(field(fields, 0, FUNCTION)?, FUNCTION)?,
        to_u8(field(fields, 1, FUNCTION)?, FUNCTION)?,
        to_faction(field(fields, 2, FUNCTION)?, FUNCTION)?,
    );

    // Trailing fields are identified by type since `runsLeft` may be absent.
    for extra in fields.iter().skip(3) {
        match extra.as_str() {
            Some(cid) => ship.image_cid = Some(cid.to_string()).filter(|c| !c.is_empty()),
            None => ship.runs_left = Some(to_u32(extra, FUNCTION)?),
        }
    }

    Ok(ship)
}
