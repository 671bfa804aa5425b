//! Aggregated game client.
//!
//! [`GameClient`] owns one wrapper per contract and adds the composite
//! operations. Each composite operation runs strictly in sequence:
//!
//! ```text
//! resolve signer ─▶ validate args ─▶ allowance (per policy) ─▶ submit ─▶ settle ─▶ emit event
//! ```
//!
//! Every step before `submit` that can fail does so without touching the
//! network, except the allowance read itself.

use std::fmt;
use std::sync::Arc;

use armada_chain::{Address, ChainTransport, PendingTransaction, Receipt, Signer, U256};

use crate::allowance::{AllowancePolicy, Operation, SpendRequest, ensure_allowance};
use crate::builder::GameClientBuilder;
use crate::config::SdkConfig;
use crate::contracts::core_game::check_distinct;
use crate::contracts::{CoreGame, GameToken, PiratePool, ShipRegistry};
use crate::core::error::{Result, SdkError};
use crate::core::types::{FomoStatus, PoolsOverview, ShipInfo, UserOverview};
use crate::events::{EventRegistry, GameEvent, ListenerId};
use crate::flows::FlowHandle;
use crate::tx::settle;

/// Level bought when none is given.
pub const DEFAULT_SHIP_LEVEL: u8 = 1;

/// Number of ships bought when no quantity is given.
pub const DEFAULT_SHIP_QUANTITY: u64 = 1;

/// Single entry point to the game contracts.
pub struct GameClient {
    config: SdkConfig,
    transport: Arc<dyn ChainTransport>,
    signer: Option<Arc<dyn Signer>>,
    policy: AllowancePolicy,
    events: EventRegistry,

    game_token: GameToken,
    core_game: CoreGame,
    ship_registry: ShipRegistry,
    pirate_pool: PiratePool,
}

impl GameClient {
    pub fn builder() -> GameClientBuilder {
        GameClientBuilder::new()
    }

    /// Assemble a client from parts that [`GameClientBuilder`] has validated.
    pub(crate) fn new(
        config: SdkConfig,
        transport: Arc<dyn ChainTransport>,
        signer: Option<Arc<dyn Signer>>,
        policy: AllowancePolicy,
    ) -> Self {
        let contracts = config.contracts;

        Self {
            game_token: GameToken::new(contracts.game_token, Arc::clone(&transport)),
            core_game: CoreGame::new(contracts.core_game, Arc::clone(&transport)),
            ship_registry: ShipRegistry::new(contracts.ship_registry, Arc::clone(&transport)),
            pirate_pool: PiratePool::new(contracts.pirate_pool, Arc::clone(&transport)),
            config,
            transport,
            signer,
            policy,
            events: EventRegistry::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn ChainTransport> {
        &self.transport
    }

    pub fn policy(&self) -> &AllowancePolicy {
        &self.policy
    }

    pub fn game_token(&self) -> &GameToken {
        &self.game_token
    }

    pub fn core_game(&self) -> &CoreGame {
        &self.core_game
    }

    pub fn ship_registry(&self) -> &ShipRegistry {
        &self.ship_registry
    }

    pub fn pirate_pool(&self) -> &PiratePool {
        &self.pirate_pool
    }

    /// Spender for every allowance check made by this client.
    pub fn spender(&self) -> Address {
        self.core_game.address()
    }

    /// Current-shape flow handle over this client's wrappers.
    pub fn flow_handle(&self) -> FlowHandle {
        FlowHandle::current(
            Arc::new(self.core_game.clone()),
            Some(self.game_token.clone()),
        )
    }

    /// Check that the transport is connected to the configured network.
    pub async fn verify_network(&self) -> Result<()> {
        let expected = self.config.network.chain_id();
        let actual = self.transport.chain_id().await?;
        if actual != expected {
            return Err(SdkError::Configuration(format!(
                "connected to chain {actual}, but {} is chain {expected}",
                self.config.network
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    /// Register a listener for `event`.
    pub fn on<F>(&self, event: GameEvent, listener: F) -> ListenerId
    where
        F: Fn(&Receipt) + Send + Sync + 'static,
    {
        self.events.on(event, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    // ------------------------------------------------------------------
    // Composite operations
    // ------------------------------------------------------------------

    /// Buy ships. `level` and `quantity` default to 1.
    pub async fn buy_ship(
        &self,
        signer: Option<&dyn Signer>,
        level: Option<u8>,
        quantity: Option<u64>,
    ) -> Result<Receipt> {
        let level = level.unwrap_or(DEFAULT_SHIP_LEVEL);
        let quantity = quantity.unwrap_or(DEFAULT_SHIP_QUANTITY);

        let signer = self.resolve_signer(signer, Operation::BuyShip)?;
        self.prepare(Operation::BuyShip, signer, SpendRequest::quantity(quantity))
            .await?;
        let pending = self.core_game.buy_ship(signer, level, quantity).await?;
        self.complete(Operation::BuyShip, pending).await
    }

    /// Send a ship on a voyage, approving `wager` for the core game first if
    /// the current allowance is short.
    pub async fn voyage(
        &self,
        signer: Option<&dyn Signer>,
        ship_id: U256,
        wager: U256,
    ) -> Result<Receipt> {
        let signer = self.resolve_signer(signer, Operation::Voyage)?;
        self.prepare(Operation::Voyage, signer, SpendRequest::wager(wager))
            .await?;
        let pending = self.core_game.voyage(signer, ship_id, wager).await?;
        self.complete(Operation::Voyage, pending).await
    }

    /// Merge two ships.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no usable signer resolves. This is checked first,
    ///   so it wins over a same-id argument.
    /// - `InvalidArgument` if `ship_a == ship_b`.
    ///
    /// Both are raised before any network call.
    pub async fn upgrade_ship(
        &self,
        signer: Option<&dyn Signer>,
        ship_a: U256,
        ship_b: U256,
    ) -> Result<Receipt> {
        let signer = self.resolve_signer(signer, Operation::UpgradeShip)?;
        check_distinct(ship_a, ship_b)?;
        self.prepare(Operation::UpgradeShip, signer, SpendRequest::default())
            .await?;
        let pending = self.core_game.upgrade_ship(signer, ship_a, ship_b).await?;
        self.complete(Operation::UpgradeShip, pending).await
    }

    pub async fn finish_day(&self, signer: Option<&dyn Signer>) -> Result<Receipt> {
        let signer = self.resolve_signer(signer, Operation::FinishDay)?;
        self.prepare(Operation::FinishDay, signer, SpendRequest::default())
            .await?;
        let pending = self.core_game.finish_day(signer).await?;
        self.complete(Operation::FinishDay, pending).await
    }

    pub async fn claim_winner_reward(&self, signer: Option<&dyn Signer>) -> Result<Receipt> {
        let signer = self.resolve_signer(signer, Operation::ClaimWinnerReward)?;
        self.prepare(Operation::ClaimWinnerReward, signer, SpendRequest::default())
            .await?;
        let pending = self.core_game.claim_winner_reward(signer).await?;
        self.complete(Operation::ClaimWinnerReward, pending).await
    }

    /// The explicit signer, else the default one; either way it must expose
    /// an address.
    fn resolve_signer<'a>(
        &'a self,
        signer: Option<&'a dyn Signer>,
        operation: Operation,
    ) -> Result<&'a dyn Signer> {
        let signer: &dyn Signer = match signer {
            Some(signer) => signer,
            None => self
                .signer
                .as_deref()
                .ok_or_else(|| SdkError::signer_required(operation.as_ref()))?,
        };

        if signer.address().is_none() {
            return Err(SdkError::signer_required(operation.as_ref()));
        }
        Ok(signer)
    }

    async fn prepare(
        &self,
        operation: Operation,
        signer: &dyn Signer,
        request: SpendRequest,
    ) -> Result<()> {
        let required = self
            .policy
            .required_amount(operation, request, &self.core_game)
            .await?;

        match required {
            Some(amount) => {
                ensure_allowance(signer, &self.game_token, self.spender(), amount).await
            }
            None => Ok(()),
        }
    }

    async fn complete(&self, operation: Operation, pending: PendingTransaction) -> Result<Receipt> {
        let receipt = settle(&pending, operation.as_ref()).await?;

        let event = GameEvent::from(operation);
        let delivered = self.events.emit(event, &receipt);

        tracing::info!(
            %operation,
            hash = %receipt.transaction_hash,
            block = receipt.block_number,
            listeners = delivered,
            "operation settled"
        );
        Ok(receipt)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub async fn ship_price(&self) -> Result<U256> {
        self.core_game.ship_price().await
    }

    pub async fn fomo_status(&self) -> Result<FomoStatus> {
        self.core_game.fomo_status().await
    }

    pub async fn user_ships(&self, owner: Address) -> Result<Vec<ShipInfo>> {
        self.core_game.user_ships(owner).await
    }

    pub async fn token_balance(&self, owner: Address) -> Result<U256> {
        self.game_token.balance_of(owner).await
    }

    pub async fn token_decimals(&self) -> Result<u8> {
        self.game_token.decimals().await
    }

    pub async fn user_overview(&self, user: Address) -> Result<UserOverview> {
        self.pirate_pool.user_overview(user).await
    }

    pub async fn pools_overview(&self) -> Result<PoolsOverview> {
        self.pirate_pool.pools_overview().await
    }

    pub async fn has_pirate(&self, owner: Address) -> Result<bool> {
        self.ship_registry.has_pirate(owner).await
    }
}

impl fmt::Debug for GameClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameClient")
            .field("config", &self.config)
            .field("has_default_signer", &self.signer.is_some())
            .field("policy", &self.policy)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
