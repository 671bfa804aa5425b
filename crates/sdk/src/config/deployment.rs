//! Deployment information management.
//!
//! Deployment artifacts (network, RPC endpoint, contract addresses) can be kept
//! in a TOML file next to the application:
//!
//! ```toml
//! network = "bsc-testnet"
//! rpc_url = "https://data-seed-prebsc-1-s1.binance.org:8545"
//!
//! [contracts]
//! game_token = "0x..."
//! core_game = "0x..."
//! ship_registry = "0x..."
//! pirate_pool = "0x..."
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::network::{ContractAddresses, Network, SdkConfig};

/// Deployment information stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    /// Network the contracts are deployed on
    pub network: Network,

    /// RPC endpoint for that network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Deployed contract addresses
    pub contracts: ContractAddresses,
}

impl DeploymentInfo {
    pub fn new(network: Network, contracts: ContractAddresses) -> Self {
        Self {
            network,
            rpc_url: None,
            contracts,
        }
    }

    /// Load deployment info from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployment file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse deployment file {}", path.display()))
    }

    /// Save deployment info to a TOML file, replacing any existing content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("Failed to serialize deployment info")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write deployment file {}", path.display()))?;

        tracing::info!(path = %path.display(), network = %self.network, "saved deployment info");
        Ok(())
    }

    pub fn into_config(self) -> SdkConfig {
        SdkConfig {
            network: self.network,
            rpc_url: self.rpc_url,
            contracts: self.contracts,
        }
    }
}

impl From<&SdkConfig> for DeploymentInfo {
    fn from(config: &SdkConfig) -> Self {
        Self {
            network: config.network,
            rpc_url: config.rpc_url.clone(),
            contracts: config.contracts,
        }
    }
}
