//! Network and contract configuration.

use std::env;

use armada_chain::Address;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::core::error::{Result, SdkError};
use crate::utils::conversion::{is_placeholder, parse_address};

/// Environment keys read by [`SdkConfig::from_env`].
pub mod keys {
    pub const GAME_TOKEN: &str = "NEXT_PUBLIC_GAMETOKEN_ADDRESS";
    pub const CORE_GAME: &str = "NEXT_PUBLIC_COREGAMEV2_ADDRESS";
    pub const SHIP_REGISTRY: &str = "NEXT_PUBLIC_SHIPSBT_ADDRESS";
    pub const PIRATE_POOL: &str = "NEXT_PUBLIC_PIRATEPOOL_ADDRESS";
    pub const RPC_URL: &str = "NEXT_PUBLIC_RPC_URL";
    pub const NETWORK: &str = "ARMADA_NETWORK";
}

/// Supported networks.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// BNB Smart Chain testnet
    #[default]
    BscTestnet,
    /// BNB Smart Chain mainnet
    BscMainnet,
    /// Local development node
    Local,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::BscTestnet => 97,
            Network::BscMainnet => 56,
            Network::Local => 31_337,
        }
    }
}

/// Addresses of the four game contracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub game_token: Address,
    pub core_game: Address,
    pub ship_registry: Address,
    pub pirate_pool: Address,
}

impl ContractAddresses {
    /// `(name, address)` pairs in a stable order.
    pub fn named(&self) -> [(&'static str, Address); 4] {
        [
            ("game token", self.game_token),
            ("core game", self.core_game),
            ("ship registry", self.ship_registry),
            ("pirate pool", self.pirate_pool),
        ]
    }
}

/// SDK configuration.
///
/// Built once per session by the caller and passed into
/// [`GameClientBuilder`](crate::GameClientBuilder); the client never reads the
/// environment itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    pub network: Network,

    /// RPC endpoint used when no transport is supplied directly
    pub rpc_url: Option<String>,

    pub contracts: ContractAddresses,
}

impl SdkConfig {
    pub fn new(network: Network, contracts: ContractAddresses) -> Self {
        Self {
            network,
            rpc_url: None,
            contracts,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// Environment variables:
    /// - `NEXT_PUBLIC_GAMETOKEN_ADDRESS` - Game token address
    /// - `NEXT_PUBLIC_COREGAMEV2_ADDRESS` - Core game address
    /// - `NEXT_PUBLIC_SHIPSBT_ADDRESS` - Ship registry address
    /// - `NEXT_PUBLIC_PIRATEPOOL_ADDRESS` - Pirate pool address
    /// - `NEXT_PUBLIC_RPC_URL` - RPC endpoint
    /// - `ARMADA_NETWORK` - bsc-testnet, bsc-mainnet or local (default: bsc-testnet)
    ///
    /// Unset addresses become the zero placeholder, which
    /// [`validate`](Self::validate) rejects.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).unwrap_or_default();

        let network = match lookup(keys::NETWORK) {
            Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<Network>().map_err(|_| {
                SdkError::Configuration(format!(
                    "Invalid {}: {}. Must be bsc-testnet, bsc-mainnet, or local",
                    keys::NETWORK,
                    raw
                ))
            })?,
            _ => Network::default(),
        };

        let contracts = ContractAddresses {
            game_token: parse_address("game token", &read(keys::GAME_TOKEN))?,
            core_game: parse_address("core game", &read(keys::CORE_GAME))?,
            ship_registry: parse_address("ship registry", &read(keys::SHIP_REGISTRY))?,
            pirate_pool: parse_address("pirate pool", &read(keys::PIRATE_POOL))?,
        };

        for (name, address) in contracts.named() {
            if is_placeholder(&address) {
                tracing::warn!(contract = name, "contract address not configured");
            }
        }

        let rpc_url = Some(read(keys::RPC_URL)).filter(|url| !url.trim().is_empty());

        Ok(Self {
            network,
            rpc_url,
            contracts,
        })
    }

    /// Set custom RPC URL.
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Set contract addresses.
    pub fn with_contracts(mut self, contracts: ContractAddresses) -> Self {
        self.contracts = contracts;
        self
    }

    /// Configured RPC endpoint, if non-empty.
    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Check that every contract address is set.
    pub fn validate(&self) -> Result<()> {
        for (name, address) in self.contracts.named() {
            if is_placeholder(&address) {
                return Err(SdkError::Configuration(format!(
                    "{name} address is missing or the zero placeholder"
                )));
            }
        }
        Ok(())
    }
}
