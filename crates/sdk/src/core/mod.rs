//! Core types and errors for the SDK.

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{Result, SdkError};
pub use types::{Faction, FomoStatus, PoolsOverview, ShipInfo, UserOverview};
