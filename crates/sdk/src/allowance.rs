//! Token allowance pre-check and per-operation spend rules.
//!
//! Token-spending calls fail on-chain if the spender's allowance is short, so
//! the approval must settle before the dependent call is submitted.
//! [`ensure_allowance`] performs that check; [`AllowancePolicy`] decides how
//! much each composite operation needs.

use std::collections::HashMap;

use armada_chain::{Address, Signer, U256};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::contracts::{CoreGame, GameToken};
use crate::core::error::{Result, SdkError};
use crate::tx::settle;

/// Make sure `spender` may move at least `required` of the signer's tokens.
///
/// Reads `allowance(owner, spender)` and, if it is short, submits
/// `approve(spender, required)` and waits for it to settle. The approval sets
/// the allowance to `required` rather than topping it up. Nothing is retried.
pub async fn ensure_allowance(
    signer: &dyn Signer,
    token: &GameToken,
    spender: Address,
    required: U256,
) -> Result<()> {
    let owner = signer
        .address()
        .ok_or_else(|| SdkError::signer_required("allowance check"))?;

    let current = token.allowance(owner, spender).await?;
    if current >= required {
        tracing::trace!(%owner, %spender, %current, %required, "allowance sufficient");
        return Ok(());
    }

    tracing::debug!(%owner, %spender, %current, %required, "approving allowance");
    let pending = token.approve(signer, spender, required).await?;
    settle(&pending, "approve").await?;
    Ok(())
}

// ============================================================================
// Policy
// ============================================================================

/// Composite operations that may spend tokens.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    BuyShip,
    Voyage,
    UpgradeShip,
    FinishDay,
    ClaimWinnerReward,
}

/// How much allowance an operation needs before it is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendRule {
    /// No pre-check
    Skip,
    /// The voyage wager
    Wager,
    /// `getShipPrice()` times the purchased quantity
    ShipPrice,
    /// A fixed amount
    Fixed(U256),
}

/// Amounts an operation request carries that a [`SpendRule`] may refer to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpendRequest {
    pub wager: U256,
    pub quantity: u64,
}

impl SpendRequest {
    pub fn wager(wager: U256) -> Self {
        Self {
            wager,
            ..Self::default()
        }
    }

    pub fn quantity(quantity: u64) -> Self {
        Self {
            quantity,
            ..Self::default()
        }
    }
}

/// Per-operation allowance rules.
///
/// Operations without an explicit rule are [`SpendRule::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowancePolicy {
    rules: HashMap<Operation, SpendRule>,
}

impl Default for AllowancePolicy {
    /// Only `voyage` spends tokens, bounded by its wager.
    fn default() -> Self {
        Self::empty().with_rule(Operation::Voyage, SpendRule::Wager)
    }
}

impl AllowancePolicy {
    /// Policy that never checks allowance.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn with_rule(mut self, operation: Operation, rule: SpendRule) -> Self {
        self.rules.insert(operation, rule);
        self
    }

    pub fn rule(&self, operation: Operation) -> SpendRule {
        self.rules
            .get(&operation)
            .copied()
            .unwrap_or(SpendRule::Skip)
    }

    /// Allowance `operation` needs for `request`, or `None` to skip the check.
    pub async fn required_amount(
        &self,
        operation: Operation,
        request: SpendRequest,
        core_game: &CoreGame,
    ) -> Result<Option<U256>> {
        let amount = match self.rule(operation) {
            SpendRule::Skip => return Ok(None),
            SpendRule::Wager => request.wager,
            SpendRule::Fixed(amount) => amount,
            SpendRule::ShipPrice => {
                let price = core_game.ship_price().await?;
                price
                    .checked_mul(U256::from(request.quantity))
                    .ok_or_else(|| {
                        SdkError::InvalidArgument(format!(
                            "ship price {price} times quantity {} overflows",
                            request.quantity
                        ))
                    })?
            }
        };
        Ok(Some(amount))
    }
}
