//! Composite flows for callers holding raw contract handles.
//!
//! Some callers only have a contract wrapper, not a [`GameClient`](crate::GameClient).
//! Two call shapes are in use:
//!
//! - **Current**: signer-first methods on a top-level surface
//!   ([`CurrentSurface`]).
//! - **Legacy**: signer-less methods on a nested wrapper already bound to a
//!   signer ([`LegacySurface`]).
//!
//! [`FlowHandle::resolve`] picks the shape once; the flow functions then submit,
//! wait for settlement and fail on an empty receipt. Flows emit no events.
//!
//! ```ignore
//! let handle = FlowHandle::resolve(
//!     RawHandle::new()
//!         .with_current(Arc::new(core_game.clone()))
//!         .with_game_token(token),
//! )?;
//! let receipt = voyage_flow(&handle, Some(&signer), ship_id, wager).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use armada_chain::{Address, PendingTransaction, Receipt, Signer, U256};
use async_trait::async_trait;

use crate::allowance::ensure_allowance;
use crate::contracts::core_game::check_distinct;
use crate::contracts::{CoreGame, GameToken};
use crate::core::error::{Result, SdkError};
use crate::tx::settle;

// ============================================================================
// Surfaces
// ============================================================================

/// Signer-first game surface.
#[async_trait]
pub trait CurrentSurface: Send + Sync {
    /// Contract address; also the spender for allowance checks.
    fn address(&self) -> Address;

    async fn buy_ship(
        &self,
        signer: &dyn Signer,
        level: u8,
        quantity: u64,
    ) -> Result<PendingTransaction>;

    async fn voyage(
        &self,
        signer: &dyn Signer,
        ship_id: U256,
        wager: U256,
    ) -> Result<PendingTransaction>;

    async fn upgrade_ship(
        &self,
        signer: &dyn Signer,
        ship_a: U256,
        ship_b: U256,
    ) -> Result<PendingTransaction>;
}

/// Signer-less game surface that submits with its own bound signer.
#[async_trait]
pub trait LegacySurface: Send + Sync {
    fn address(&self) -> Address;

    /// Signer every submission goes out with.
    fn bound_signer(&self) -> Option<Arc<dyn Signer>>;

    async fn buy_ship(&self, level: u8, quantity: u64) -> Result<PendingTransaction>;

    async fn voyage(&self, ship_id: U256, wager: U256) -> Result<PendingTransaction>;

    async fn upgrade_ship(&self, ship_a: U256, ship_b: U256) -> Result<PendingTransaction>;
}

#[async_trait]
impl CurrentSurface for CoreGame {
    fn address(&self) -> Address {
        CoreGame::address(self)
    }

    async fn buy_ship(
        &self,
        signer: &dyn Signer,
        level: u8,
        quantity: u64,
    ) -> Result<PendingTransaction> {
        CoreGame::buy_ship(self, signer, level, quantity).await
    }

    async fn voyage(
        &self,
        signer: &dyn Signer,
        ship_id: U256,
        wager: U256,
    ) -> Result<PendingTransaction> {
        CoreGame::voyage(self, signer, ship_id, wager).await
    }

    async fn upgrade_ship(
        &self,
        signer: &dyn Signer,
        ship_a: U256,
        ship_b: U256,
    ) -> Result<PendingTransaction> {
        CoreGame::upgrade_ship(self, signer, ship_a, ship_b).await
    }
}

#[async_trait]
impl LegacySurface for CoreGame {
    fn address(&self) -> Address {
        CoreGame::address(self)
    }

    fn bound_signer(&self) -> Option<Arc<dyn Signer>> {
        self.handle().bound_signer().cloned()
    }

    async fn buy_ship(&self, level: u8, quantity: u64) -> Result<PendingTransaction> {
        let signer = self.handle().require_bound("buyShip")?;
        CoreGame::buy_ship(self, signer.as_ref(), level, quantity).await
    }

    async fn voyage(&self, ship_id: U256, wager: U256) -> Result<PendingTransaction> {
        let signer = self.handle().require_bound("voyage")?;
        CoreGame::voyage(self, signer.as_ref(), ship_id, wager).await
    }

    async fn upgrade_ship(&self, ship_a: U256, ship_b: U256) -> Result<PendingTransaction> {
        let signer = self.handle().require_bound("upgradeShip")?;
        CoreGame::upgrade_ship(self, signer.as_ref(), ship_a, ship_b).await
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Whatever the caller happens to hold, before the call shape is chosen.
#[derive(Clone, Default)]
pub struct RawHandle {
    pub current: Option<Arc<dyn CurrentSurface>>,
    pub legacy: Option<Arc<dyn LegacySurface>>,
    /// Token wrapper enabling the allowance check on voyages
    pub game_token: Option<GameToken>,
}

impl RawHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current(mut self, surface: Arc<dyn CurrentSurface>) -> Self {
        self.current = Some(surface);
        self
    }

    pub fn with_legacy(mut self, surface: Arc<dyn LegacySurface>) -> Self {
        self.legacy = Some(surface);
        self
    }

    pub fn with_game_token(mut self, token: GameToken) -> Self {
        self.game_token = Some(token);
        self
    }
}

#[derive(Clone)]
pub struct CurrentHandle {
    surface: Arc<dyn CurrentSurface>,
    game_token: Option<GameToken>,
}

#[derive(Clone)]
pub struct LegacyHandle {
    surface: Arc<dyn LegacySurface>,
    game_token: Option<GameToken>,
}

/// A game surface with its call shape fixed.
#[derive(Clone)]
pub enum FlowHandle {
    Current(CurrentHandle),
    Legacy(LegacyHandle),
}

impl FlowHandle {
    /// Choose the call shape: current if present, else legacy.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` if `raw` has neither surface.
    pub fn resolve(raw: RawHandle) -> Result<Self> {
        let RawHandle {
            current,
            legacy,
            game_token,
        } = raw;

        if let Some(surface) = current {
            return Ok(FlowHandle::current(surface, game_token));
        }
        if let Some(surface) = legacy {
            return Ok(FlowHandle::Legacy(LegacyHandle {
                surface,
                game_token,
            }));
        }
        Err(SdkError::UnsupportedOperation(
            "operation not available on the SDK".to_string(),
        ))
    }

    /// Current-shape handle over a known surface.
    pub fn current(surface: Arc<dyn CurrentSurface>, game_token: Option<GameToken>) -> Self {
        FlowHandle::Current(CurrentHandle {
            surface,
            game_token,
        })
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, FlowHandle::Legacy(_))
    }

    /// Spender for allowance checks: the surface's contract address.
    pub fn spender(&self) -> Address {
        match self {
            FlowHandle::Current(h) => h.surface.address(),
            FlowHandle::Legacy(h) => h.surface.address(),
        }
    }

    pub fn game_token(&self) -> Option<&GameToken> {
        match self {
            FlowHandle::Current(h) => h.game_token.as_ref(),
            FlowHandle::Legacy(h) => h.game_token.as_ref(),
        }
    }
}

impl fmt::Debug for FlowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = if self.is_legacy() { "Legacy" } else { "Current" };
        f.debug_struct("FlowHandle")
            .field("shape", &shape)
            .field("spender", &self.spender())
            .field("game_token", &self.game_token().map(GameToken::address))
            .finish()
    }
}

// ============================================================================
// Flows
// ============================================================================

fn require_signer<'a>(signer: Option<&'a dyn Signer>, operation: &str) -> Result<&'a dyn Signer> {
    signer.ok_or_else(|| SdkError::signer_required(operation))
}

/// Bound signer of a legacy surface, provided `explicit` is the same account.
fn spending_signer(
    handle: &LegacyHandle,
    explicit: &dyn Signer,
    operation: &str,
) -> Result<Arc<dyn Signer>> {
    let bound = handle
        .surface
        .bound_signer()
        .ok_or_else(|| SdkError::signer_required(operation))?;

    let (Some(explicit_address), Some(bound_address)) = (explicit.address(), bound.address())
    else {
        return Err(SdkError::signer_required(operation));
    };
    if explicit_address != bound_address {
        return Err(SdkError::Configuration(format!(
            "{operation} is sent by {bound_address}, not by the given signer {explicit_address}"
        )));
    }
    Ok(bound)
}

pub async fn buy_ship_flow(
    handle: &FlowHandle,
    signer: Option<&dyn Signer>,
    level: u8,
    quantity: u64,
) -> Result<Receipt> {
    let pending = match handle {
        FlowHandle::Current(h) => {
            let signer = require_signer(signer, "buyShip")?;
            h.surface.buy_ship(signer, level, quantity).await?
        }
        FlowHandle::Legacy(h) => h.surface.buy_ship(level, quantity).await?,
    };
    settle(&pending, "buyShip").await
}

/// Send a ship on a voyage, approving the wager first when possible.
///
/// The allowance check runs only when `signer` is given and the handle carries
/// a token wrapper. On a legacy handle the check covers the bound signer, the
/// account the voyage is sent from.
///
/// # Errors
///
/// `Configuration` before any call if a legacy handle has no bound signer, or
/// if `signer` reports a different address than the bound one.
pub async fn voyage_flow(
    handle: &FlowHandle,
    signer: Option<&dyn Signer>,
    ship_id: U256,
    wager: U256,
) -> Result<Receipt> {
    if let FlowHandle::Current(_) = handle {
        require_signer(signer, "voyage")?;
    }

    if let (Some(signer), Some(token)) = (signer, handle.game_token()) {
        match handle {
            FlowHandle::Current(_) => {
                ensure_allowance(signer, token, handle.spender(), wager).await?;
            }
            FlowHandle::Legacy(h) => {
                let bound = spending_signer(h, signer, "voyage")?;
                ensure_allowance(bound.as_ref(), token, handle.spender(), wager).await?;
            }
        }
    } else {
        tracing::debug!(legacy = handle.is_legacy(), "voyage flow without allowance check");
    }

    let pending = match handle {
        FlowHandle::Current(h) => {
            let signer = require_signer(signer, "voyage")?;
            h.surface.voyage(signer, ship_id, wager).await?
        }
        FlowHandle::Legacy(h) => h.surface.voyage(ship_id, wager).await?,
    };
    settle(&pending, "voyage").await
}

pub async fn upgrade_flow(
    handle: &FlowHandle,
    signer: Option<&dyn Signer>,
    ship_a: U256,
    ship_b: U256,
) -> Result<Receipt> {
    check_distinct(ship_a, ship_b)?;

    let pending = match handle {
        FlowHandle::Current(h) => {
            let signer = require_signer(signer, "upgradeShip")?;
            h.surface.upgrade_ship(signer, ship_a, ship_b).await?
        }
        FlowHandle::Legacy(h) => h.surface.upgrade_ship(ship_a, ship_b).await?,
    };
    settle(&pending, "upgradeShip").await
}

#[cfg(test)]
mod tests {
    use armada_chain::{DynSolValue, MockChain, MockSigner};

    use super::*;

    fn owner() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn core_game(chain: &MockChain) -> CoreGame {
        CoreGame::new(Address::repeat_byte(0x22), chain.transport())
    }

    fn token(chain: &MockChain) -> GameToken {
        GameToken::new(Address::repeat_byte(0x11), chain.transport())
    }

    fn uint(v: u64) -> DynSolValue {
        DynSolValue::Uint(U256::from(v), 256)
    }

    #[test]
    fn resolution_prefers_current_then_legacy() {
        let chain = MockChain::new();
        let core = Arc::new(core_game(&chain));

        let both = RawHandle::new()
            .with_current(core.clone())
            .with_legacy(core.clone());
        assert!(!FlowHandle::resolve(both).unwrap().is_legacy());

        let legacy = RawHandle::new().with_legacy(core);
        assert!(FlowHandle::resolve(legacy).unwrap().is_legacy());

        let err = FlowHandle::resolve(RawHandle::new()).unwrap_err();
        assert!(matches!(
            err,
            SdkError::UnsupportedOperation(ref m) if m == "operation not available on the SDK"
        ));
    }

    #[tokio::test]
    async fn current_voyage_approves_then_submits() {
        let chain = MockChain::new();
        let handle = FlowHandle::resolve(
            RawHandle::new()
                .with_current(Arc::new(core_game(&chain)))
                .with_game_token(token(&chain)),
        )
        .unwrap();
        let signer = MockSigner::new(owner());

        let receipt = voyage_flow(&handle, Some(&signer), U256::from(3u64), U256::from(10u64))
            .await
            .unwrap();

        assert_eq!(
            chain.submissions(),
            vec![
                (
                    "approve".to_string(),
                    vec![DynSolValue::Address(handle.spender()), uint(10)]
                ),
                ("voyage".to_string(), vec![uint(3), uint(10)]),
            ]
        );
        assert!(receipt.is_success());
    }

    #[tokio::test]
    async fn current_without_signer_fails_before_any_call() {
        let chain = MockChain::new();
        let handle = FlowHandle::resolve(
            RawHandle::new()
                .with_current(Arc::new(core_game(&chain)))
                .with_game_token(token(&chain)),
        )
        .unwrap();

        let result = voyage_flow(&handle, None, U256::from(1u64), U256::from(1u64)).await;
        assert!(matches!(result, Err(SdkError::Configuration(_))));

        let result = buy_ship_flow(&handle, None, 1, 1).await;
        assert!(matches!(result, Err(SdkError::Configuration(_))));
        assert_eq!(chain.call_count(), 0);
    }

    #[tokio::test]
    async fn legacy_uses_bound_signer_and_skips_allowance() {
        let chain = MockChain::new();
        let bound = core_game(&chain).connect(Arc::new(MockSigner::new(owner())));
        let handle = FlowHandle::resolve(
            RawHandle::new()
                .with_legacy(Arc::new(bound))
                .with_game_token(token(&chain)),
        )
        .unwrap();

        voyage_flow(&handle, None, U256::from(2u64), U256::from(5u64))
            .await
            .unwrap();
        buy_ship_flow(&handle, None, 1, 2).await.unwrap();

        assert_eq!(chain.read_count("allowance"), 0);
        assert_eq!(chain.submitted_functions(), vec!["voyage", "buyShip"]);
    }

    #[tokio::test]
    async fn legacy_voyage_approves_for_the_bound_account() {
        let chain = MockChain::new();
        let bound = core_game(&chain).connect(Arc::new(MockSigner::new(owner())));
        let handle = FlowHandle::resolve(
            RawHandle::new()
                .with_legacy(Arc::new(bound))
                .with_game_token(token(&chain)),
        )
        .unwrap();
        let same_account = MockSigner::new(owner());

        voyage_flow(&handle, Some(&same_account), U256::from(1u64), U256::from(10u64))
            .await
            .unwrap();

        assert_eq!(chain.submitted_functions(), vec!["approve", "voyage"]);
        assert_eq!(
            chain.allowance_of(owner(), handle.spender()),
            U256::from(10u64)
        );
    }

    #[tokio::test]
    async fn legacy_voyage_rejects_a_different_explicit_signer() {
        let chain = MockChain::new();
        let bound = core_game(&chain).connect(Arc::new(MockSigner::new(Address::repeat_byte(0xbb))));
        let handle = FlowHandle::resolve(
            RawHandle::new()
                .with_legacy(Arc::new(bound))
                .with_game_token(token(&chain)),
        )
        .unwrap();
        let other = MockSigner::new(owner());

        let result = voyage_flow(&handle, Some(&other), U256::from(1u64), U256::from(10u64)).await;

        assert!(matches!(result, Err(SdkError::Configuration(_))));
        assert_eq!(chain.call_count(), 0);
    }

    #[tokio::test]
    async fn legacy_without_bound_signer_is_configuration_error() {
        let chain = MockChain::new();
        let handle =
            FlowHandle::resolve(RawHandle::new().with_legacy(Arc::new(core_game(&chain)))).unwrap();

        let result = buy_ship_flow(&handle, None, 1, 1).await;
        assert!(matches!(result, Err(SdkError::Configuration(ref m)) if m.contains("signer required")));
        assert_eq!(chain.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_receipt_is_transaction_failure() {
        let chain = MockChain::new();
        chain.drop_next_receipt("buyShip");
        let handle =
            FlowHandle::resolve(RawHandle::new().with_current(Arc::new(core_game(&chain)))).unwrap();
        let signer = MockSigner::new(owner());

        let result = buy_ship_flow(&handle, Some(&signer), 1, 1).await;
        assert!(matches!(result, Err(SdkError::TransactionFailure(_))));
    }

    #[tokio::test]
    async fn upgrade_flow_rejects_same_ship() {
        let chain = MockChain::new();
        let handle =
            FlowHandle::resolve(RawHandle::new().with_current(Arc::new(core_game(&chain)))).unwrap();
        let signer = MockSigner::new(owner());

        let err = upgrade_flow(&handle, Some(&signer), U256::from(5u64), U256::from(5u64))
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidArgument(_)));
        assert_eq!(chain.call_count(), 0);

        upgrade_flow(&handle, Some(&signer), U256::from(5u64), U256::from(6u64))
            .await
            .unwrap();
        assert_eq!(chain.submitted_functions(), vec!["upgradeShip"]);
    }
}
