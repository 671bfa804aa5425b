//! Client builder.

use std::sync::Arc;

use armada_chain::{ChainTransport, Signer, TransportError};

use crate::allowance::AllowancePolicy;
use crate::client::GameClient;
use crate::config::SdkConfig;
use crate::core::error::{Result, SdkError};

/// Outcome of opening a transport.
pub type ConnectResult = std::result::Result<Arc<dyn ChainTransport>, TransportError>;

/// Opens a transport for an RPC endpoint.
pub trait Connector: Send + Sync {
    fn connect(&self, rpc_url: &str) -> ConnectResult;
}

impl<F> Connector for F
where
    F: Fn(&str) -> ConnectResult + Send + Sync,
{
    fn connect(&self, rpc_url: &str) -> ConnectResult {
        self(rpc_url)
    }
}

/// Builder for [`GameClient`].
///
/// - **Required**: configuration, plus either a transport or a connector for
///   the configured RPC endpoint
/// - **Optional**: default signer, allowance policy
///
/// `build()` validates everything up front, so a built client never fails on
/// configuration at call time except for a missing signer.
#[derive(Default)]
pub struct GameClientBuilder {
    config: Option<SdkConfig>,
    transport: Option<Arc<dyn ChainTransport>>,
    connector: Option<Box<dyn Connector>>,
    signer: Option<Arc<dyn Signer>>,
    policy: Option<AllowancePolicy>,
}

impl GameClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration (required).
    pub fn config(mut self, config: SdkConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an already open transport. Takes precedence over the connector.
    pub fn transport(mut self, transport: Arc<dyn ChainTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Open the transport from the configured RPC endpoint at build time.
    pub fn connector(mut self, connector: impl Connector + 'static) -> Self {
        self.connector = Some(Box::new(connector));
        self
    }

    /// Signer used when an operation is called without one.
    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn policy(mut self, policy: AllowancePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// `Configuration` if:
    /// - no configuration was given
    /// - any contract address is missing or the zero placeholder
    /// - no transport was given and none can be opened (empty RPC endpoint or
    ///   no connector)
    ///
    /// Connector failures are returned as `Transport` errors.
    pub fn build(self) -> Result<GameClient> {
        let config = self.config.ok_or_else(|| {
            SdkError::Configuration("configuration is required. Use .config() to set it".into())
        })?;
        config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let rpc_url = config.rpc_url().ok_or_else(|| {
                    SdkError::Configuration("RPC endpoint is missing and no transport was given".into())
                })?;
                let connector = self.connector.ok_or_else(|| {
                    SdkError::Configuration(format!("no connector registered for {rpc_url}"))
                })?;
                tracing::debug!(rpc_url, network = %config.network, "opening transport");
                connector.connect(rpc_url)?
            }
        };

        Ok(GameClient::new(
            config,
            transport,
            self.signer,
            self.policy.unwrap_or_default(),
        ))
    }
}
