//! Client SDK for the Armada naval game contracts.
//!
//! Game rules live on-chain. This crate wraps the four contracts (game token,
//! core game, ship registry, pirate pool) and orchestrates the multi-step
//! operations a player performs:
//!
//! ```text
//!                 GameClient (composite operations, events)
//!                     │
//!      ┌──────────────┼──────────────┬───────────────┐
//!      ▼              ▼              ▼               ▼
//!  GameToken      CoreGame      ShipRegistry     PiratePool     contracts
//!      └──────────────┴──────┬───────┴───────────────┘
//!                            ▼
//!             armada_chain::{ChainTransport, Signer}
//! ```
//!
//! Callers that only hold a contract wrapper can use [`flows`] instead of the
//! client.
//!
//! # Usage
//!
//! ```ignore
//! use armada_sdk::{GameClient, GameEvent, SdkConfig};
//!
//! let client = GameClient::builder()
//!     .config(SdkConfig::from_env()?)
//!     .transport(transport)
//!     .signer(wallet)
//!     .build()?;
//!
//! client.on(GameEvent::VoyageExecuted, |receipt| {
//!     println!("voyage settled in block {}", receipt.block_number);
//! });
//!
//! let receipt = client.voyage(None, ship_id, wager).await?;
//! ```

pub mod allowance;
pub mod builder;
pub mod client;
pub mod config;
pub mod contracts;
pub mod core;
pub mod events;
pub mod fleet;
pub mod flows;
pub mod tx;
pub mod utils;

pub use allowance::{AllowancePolicy, Operation, SpendRequest, SpendRule, ensure_allowance};
pub use builder::{ConnectResult, Connector, GameClientBuilder};
pub use client::{DEFAULT_SHIP_LEVEL, DEFAULT_SHIP_QUANTITY, GameClient};
pub use config::{ContractAddresses, DeploymentInfo, Network, SdkConfig};
pub use contracts::{CoreGame, GameToken, PiratePool, ShipRegistry};
pub use crate::core::{Faction, FomoStatus, PoolsOverview, Result, SdkError, ShipInfo, UserOverview};
pub use events::{EventRegistry, GameEvent, ListenerId};
pub use flows::{
    CurrentHandle, CurrentSurface, FlowHandle, LegacyHandle, LegacySurface, RawHandle,
    buy_ship_flow, upgrade_flow, voyage_flow,
};
pub use tx::settle;

// Re-export transport layer types
pub use armada_chain::{
    Address, B256, ChainTransport, PendingTransaction, Receipt, ReceiptStatus, Signer,
    TransportError, TxHash, U256,
};
