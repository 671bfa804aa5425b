//! Read-only projections of on-chain game state.

use armada_chain::{Address, U256};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Ship faction.
///
/// On-chain the faction is a `uint8` (0 = cargo, 1 = fort); some getters return
/// the uppercase name instead.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Faction {
    Cargo,
    Fort,
    Unknown,
}

impl Faction {
    pub fn from_index(index: u64) -> Self {
        match index {
            0 => Faction::Cargo,
            1 => Faction::Fort,
            _ => Faction::Unknown,
        }
    }

    /// Parse a faction name, mapping anything unrecognized to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Faction::Unknown)
    }
}

/// A ship owned by a player.
///
/// Fetched, never mutated locally: upgrades and voyages happen on-chain and are
/// observed by re-fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipInfo {
    /// Token id
    pub id: U256,

    /// Current level (starts at 1, raised by upgrades)
    pub level: u8,

    pub faction: Faction,

    /// Voyages left before the ship is exhausted (absent on older contracts)
    pub runs_left: Option<u32>,

    /// Content identifier for the ship image
    pub image_cid: Option<String>,
}

impl ShipInfo {
    pub fn new(id: U256, level: u8, faction: Faction) -> Self {
        Self {
            id,
            level,
            faction,
            runs_left: None,
            image_cid: None,
        }
    }

    /// Whether the ship may be sent on another voyage.
    pub fn can_voyage(&self) -> bool {
        self.runs_left.is_none_or(|runs| runs > 0)
    }
}

/// State of the FOMO key competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FomoStatus {
    pub cargo_keys: U256,
    pub fort_keys: U256,
    pub cargo_jackpot: U256,
    pub fort_jackpot: U256,
    /// Seconds until the current round ends
    pub remaining_time: u64,
}

impl FomoStatus {
    /// Faction currently holding more keys, `None` on a tie.
    pub fn leading_faction(&self) -> Option<Faction> {
        match self.cargo_keys.cmp(&self.fort_keys) {
            std::cmp::Ordering::Greater => Some(Faction::Cargo),
            std::cmp::Ordering::Less => Some(Faction::Fort),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_round_over(&self) -> bool {
        self.remaining_time == 0
    }
}

/// A staker's position in the pirate pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOverview {
    pub user: Address,
    pub staked: U256,
    pub pending_rewards: U256,
    /// Annual yield in basis points
    pub apy_bps: u32,
}

impl UserOverview {
    pub fn apy(&self) -> f64 {
        f64::from(self.apy_bps) / 10_000.0
    }
}

/// Aggregate figures for the pirate pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolsOverview {
    pub total_staked: U256,
    pub total_rewards: U256,
    /// Annual yield in basis points
    pub apy_bps: u32,
}

impl PoolsOverview {
    pub fn apy(&self) -> f64 {
        f64::from(self.apy_bps) / 10_000.0
    }
}
