//! SDK configuration and deployment files.

pub mod deployment;
pub mod network;

// Re-export commonly used items
pub use deployment::DeploymentInfo;
pub use network::{ContractAddresses, Network, SdkConfig, keys};
